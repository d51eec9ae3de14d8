pub mod sample_loader;

pub use sample_loader::{FsSampleStore, SampleStore, import_candidate, read_import};

#[cfg(test)]
pub use sample_loader::MemorySampleStore;
