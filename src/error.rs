//! Error types
//!
//! Gameplay never fails; these cover the I/O edges (level files, settings,
//! terminal).

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Could not open level file {}: {source}", path.display())]
    LevelIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read settings {}: {source}", path.display())]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings {}: {source}", path.display())]
    SettingsFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not open serial log {}: {source}", path.display())]
    SerialIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not start the timer thread: {0}")]
    Timer(#[source] std::io::Error),

    #[error("Terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
}
