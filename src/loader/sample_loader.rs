// Where user samples live between sessions. The store only moves encoded WAV
// bytes around; decoding happens in the kit registry.

use std::path::{Path, PathBuf};

use crate::error::{DrumError, DrumResult};
use crate::shared::PadId;

pub trait SampleStore {
    fn get(&self, pad: PadId) -> DrumResult<Option<Vec<u8>>>;
    fn put(&mut self, pad: PadId, bytes: &[u8]) -> DrumResult<()>;
    fn delete(&mut self, pad: PadId) -> DrumResult<()>;
}

// one WAV per pad: <root>/<pad>.wav
#[derive(Clone, Debug)]
pub struct FsSampleStore {
    root: PathBuf,
}

impl FsSampleStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, pad: PadId) -> PathBuf {
        self.root.join(format!("{}.wav", pad.as_str()))
    }
}

impl SampleStore for FsSampleStore {
    fn get(&self, pad: PadId) -> DrumResult<Option<Vec<u8>>> {
        let path = self.path_for(pad);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(DrumError::Store { path, source }),
        }
    }

    fn put(&mut self, pad: PadId, bytes: &[u8]) -> DrumResult<()> {
        std::fs::create_dir_all(&self.root).map_err(|source| DrumError::Store {
            path: self.root.clone(),
            source,
        })?;
        let path = self.path_for(pad);
        std::fs::write(&path, bytes).map_err(|source| DrumError::Store { path, source })
    }

    fn delete(&mut self, pad: PadId) -> DrumResult<()> {
        let path = self.path_for(pad);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(DrumError::Store { path, source }),
        }
    }
}

#[cfg(test)]
pub use memory::MemorySampleStore;

#[cfg(test)]
mod memory {
    use std::collections::HashMap;

    use super::SampleStore;
    use crate::error::DrumResult;
    use crate::shared::PadId;

    #[derive(Clone, Debug, Default)]
    pub struct MemorySampleStore {
        blobs: HashMap<PadId, Vec<u8>>,
    }

    impl SampleStore for MemorySampleStore {
        fn get(&self, pad: PadId) -> DrumResult<Option<Vec<u8>>> {
            Ok(self.blobs.get(&pad).cloned())
        }

        fn put(&mut self, pad: PadId, bytes: &[u8]) -> DrumResult<()> {
            self.blobs.insert(pad, bytes.to_vec());
            Ok(())
        }

        fn delete(&mut self, pad: PadId) -> DrumResult<()> {
            self.blobs.remove(&pad);
            Ok(())
        }
    }
}

// Files dropped next to the project named after a pad (kick.wav, tom1.wav, ...)
// are what the import key picks up.
pub fn import_candidate(project_dir: &Path, pad: PadId) -> Option<PathBuf> {
    let path = project_dir.join(format!("{}.wav", pad.as_str()));
    path.is_file().then_some(path)
}

pub fn read_import(path: &Path) -> DrumResult<Vec<u8>> {
    std::fs::read(path).map_err(|source| DrumError::Store {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &mut dyn SampleStore) {
        assert_eq!(store.get(PadId::Snare).unwrap(), None);
        store.put(PadId::Snare, b"RIFF....").unwrap();
        assert_eq!(store.get(PadId::Snare).unwrap().as_deref(), Some(&b"RIFF...."[..]));
        assert_eq!(store.get(PadId::Kick).unwrap(), None);
        store.put(PadId::Snare, b"second").unwrap();
        assert_eq!(store.get(PadId::Snare).unwrap().as_deref(), Some(&b"second"[..]));
        store.delete(PadId::Snare).unwrap();
        assert_eq!(store.get(PadId::Snare).unwrap(), None);
        // deleting twice is fine
        store.delete(PadId::Snare).unwrap();
    }

    #[test]
    fn filesystem_store_contract() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FsSampleStore::new(dir.path().join("samples"));
        exercise(&mut store);
    }

    #[test]
    fn memory_store_contract() {
        exercise(&mut MemorySampleStore::default());
    }

    #[test]
    fn filesystem_store_names_files_after_pads() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FsSampleStore::new(dir.path());
        store.put(PadId::Tom2, b"x").unwrap();
        assert!(dir.path().join("tom2.wav").is_file());
    }

    #[test]
    fn import_picks_up_pad_named_files() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(import_candidate(dir.path(), PadId::Crash), None);
        std::fs::write(dir.path().join("crash.wav"), b"data").unwrap();
        let path = import_candidate(dir.path(), PadId::Crash).unwrap();
        assert_eq!(read_import(&path).unwrap(), b"data");
    }
}
