//! The browser-backed availability probe: one full museum pass.

use std::path::Path;

use async_trait::async_trait;
use naowatch_core::error::{Result, WatchError};
use naowatch_core::traits::AvailabilityProbe;
use naowatch_core::types::{AvailabilityResult, MuseumTarget, TargetDate};

use crate::extractor;
use crate::navigator;
use crate::session::{BrowserSettings, Session};

/// Checks a booking page with a headless Chrome session.
///
/// The whole pass for one museum runs on a blocking thread; the session
/// is dropped (browser killed) when the pass ends, on success or error.
pub struct BrowserProbe {
    settings: BrowserSettings,
}

impl BrowserProbe {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl AvailabilityProbe for BrowserProbe {
    async fn check(
        &self,
        museum: &MuseumTarget,
        dates: &[TargetDate],
    ) -> Result<Vec<AvailabilityResult>> {
        let settings = self.settings.clone();
        let museum = museum.clone();
        let dates = dates.to_vec();

        tokio::task::spawn_blocking(move || check_blocking(&settings, &museum, &dates))
            .await
            .map_err(|e| WatchError::Navigation(format!("Browser task panicked: {e}")))?
    }
}

/// Sequential pass: prepare the page once, then read every date.
fn check_blocking(
    settings: &BrowserSettings,
    museum: &MuseumTarget,
    dates: &[TargetDate],
) -> Result<Vec<AvailabilityResult>> {
    let session = Session::launch(settings)?;

    navigator::prepare(&session, &museum.url)?;
    navigator::dismiss_popup(&session);
    navigator::enter_calendar(&session)?;

    let mut results = Vec::with_capacity(dates.len());
    for date in dates {
        // Month alignment is best-effort; a misaligned calendar surfaces
        // as an Unknown verdict below, not as a fatal error.
        if let Err(e) = extractor::ensure_month(&session, date) {
            tracing::debug!("Month alignment failed for {date}: {e}");
        }
        let verdict = extractor::classify_day(&session, date);
        tracing::info!(
            "{} {} => {} ({})",
            museum.name,
            date,
            verdict.status,
            verdict.evidence
        );

        if let Some(dir) = &settings.screenshot_dir {
            save_screenshot(&session, dir, date);
        }

        results.push(AvailabilityResult::new(
            museum.clone(),
            *date,
            verdict.status,
            verdict.evidence,
        ));
    }
    Ok(results)
}

/// Best-effort screenshot for manual verification; failures are logged,
/// never fatal.
fn save_screenshot(session: &Session, dir: &Path, date: &TargetDate) {
    let path = dir.join(format!("{}.png", date.file_stem()));
    let png = match session.screenshot_png() {
        Ok(png) => png,
        Err(e) => {
            tracing::warn!("Screenshot capture failed for {date}: {e}");
            return;
        }
    };
    if let Err(e) = std::fs::create_dir_all(dir).and_then(|_| std::fs::write(&path, png)) {
        tracing::warn!("Screenshot write failed for {}: {e}", path.display());
    } else {
        tracing::debug!("Screenshot saved: {}", path.display());
    }
}
