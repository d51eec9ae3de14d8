use std::path::PathBuf;

use thiserror::Error;

use crate::shared::PadId;

pub type DrumResult<T> = Result<T, DrumError>;

#[derive(Debug, Error)]
pub enum DrumError {
    // sound stays off for the session
    #[error("audio backend unavailable: {0}")]
    AudioInit(String),

    #[error("could not decode sample for {pad:?}: {source}")]
    Decode {
        pad: PadId,
        #[source]
        source: hound::Error,
    },

    #[error("malformed kit file: {0}")]
    KitFile(#[from] serde_json::Error),

    #[error("sample store error at {path}: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
