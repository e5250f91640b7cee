use std::path::PathBuf;

use thiserror::Error;

use crate::fsm::FsmError;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to read or write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown action `{0}` in input script")]
    UnknownAction(String),

    #[error("bad scripted input `{0}`, expected ACTION@MILLISECONDS")]
    BadScriptEntry(String),

    #[error("window system: {0}")]
    Window(String),

    #[error(transparent)]
    Fsm(#[from] FsmError),
}

pub type Result<T, E = GameError> = std::result::Result<T, E>;
