//! # NaoWatch Browser
//! Drives a headless Chrome session against a booking page: popup
//! dismissal, calendar iframe entry, month alignment, and day-cell
//! classification.
//!
//! The CDP session is synchronous; `BrowserProbe` wraps one full museum
//! pass in `spawn_blocking` so the rest of the tool stays async.

pub mod extractor;
pub mod navigator;
pub mod probe;
pub mod session;

pub use extractor::DayVerdict;
pub use navigator::PopupOutcome;
pub use probe::BrowserProbe;
pub use session::{BrowserSettings, Session};
