// to be called on main startup and quit; saves state of app so we can reload it later
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{DrumError, DrumResult};
use crate::pipeline::project::ProjectState;

pub const DRUMTTY_DIR: &str = ".drumtty";
const PROJECT_FILE: &str = "project.json";

// <project_dir>/.drumtty
pub fn state_dir(project_dir: &Path) -> PathBuf {
    project_dir.join(DRUMTTY_DIR)
}

// <project_dir>/.drumtty/project.json
fn project_file_path(project_dir: &Path) -> PathBuf {
    state_dir(project_dir).join(PROJECT_FILE)
}

// A missing file is a fresh project; a broken one is logged and replaced by
// defaults rather than refusing to start.
pub fn load_project(project_dir: &Path) -> ProjectState {
    let path = project_file_path(project_dir);
    let data = match std::fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ProjectState::default(),
        Err(e) => {
            warn!(path = %path.display(), "could not read project file: {e}");
            return ProjectState::default();
        }
    };
    match serde_json::from_str::<ProjectState>(&data) {
        Ok(state) => state.sanitized(),
        Err(e) => {
            warn!(path = %path.display(), "ignoring corrupt project file: {e}");
            ProjectState::default()
        }
    }
}

// Save the project state to disk, making the files if they don't exist already
pub fn save_project(project_dir: &Path, state: &ProjectState) -> DrumResult<()> {
    let path = project_file_path(project_dir);
    if let Some(parent) = path.parent() {
        // create .drumtty/ if needed
        std::fs::create_dir_all(parent).map_err(|source| DrumError::Store {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(&path, json).map_err(|source| DrumError::Store { path, source })
}
