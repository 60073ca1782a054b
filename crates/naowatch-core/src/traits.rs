//! Seams between the crates: notification delivery and availability probing.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AvailabilityResult, MuseumTarget, TargetDate};

/// One independent notification delivery mechanism (desktop, Telegram, email).
///
/// A channel is only constructed when its credentials are configured; a
/// missing channel is silently disabled, never an error.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver one message. Errors are per-channel and caught by the
    /// dispatcher; they never stop the other channels.
    async fn send(&self, title: &str, body: &str) -> Result<()>;
}

/// Source of availability verdicts for one museum's booking page.
///
/// Contract: on success, exactly one `AvailabilityResult` per requested
/// date, ambiguity reported as `Unknown` rather than an error. An `Err`
/// means the page itself never became usable and yields no results for
/// that museum.
#[async_trait]
pub trait AvailabilityProbe: Send + Sync {
    async fn check(
        &self,
        museum: &MuseumTarget,
        dates: &[TargetDate],
    ) -> Result<Vec<AvailabilityResult>>;
}
