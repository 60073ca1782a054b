//! Error taxonomy shared across NaoWatch crates.
//!
//! `Navigation` is fatal for one museum's pass; `Extraction` ambiguity is
//! normally surfaced as an `Unknown` verdict rather than an error; channel
//! failures are caught per channel by the dispatcher.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WatchError>;

#[derive(Debug, Error)]
pub enum WatchError {
    /// Page or calendar iframe never reached a usable state.
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// Calendar was reachable but its state could not be read at all.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// A notification channel failed to deliver.
    #[error("Notification error: {0}")]
    Notification(String),

    /// Bad configuration: unparsable file, invalid date, malformed address.
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
