//! # NaoWatch Core
//! Shared types, error taxonomy, traits, and configuration.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::WatchConfig;
pub use error::{Result, WatchError};
pub use traits::{AvailabilityProbe, Notifier};
pub use types::{
    AvailabilityResult, AvailabilityStatus, MuseumFailure, MuseumTarget, RunSummary, TargetDate,
};
