//! Page preparation: load, popup dismissal, calendar iframe entry.
//!
//! The popup may or may not be present, so dismissal is an explicit
//! tri-state step rather than error-driven control flow.

use naowatch_core::error::{Result, WatchError};

use crate::session::Session;

/// Outcome of the optional popup-dismissal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupOutcome {
    /// A visible "OK" button was found and clicked.
    Dismissed,
    /// No popup on the page — not an error.
    NotPresent,
    /// The check itself failed; the page may still be usable.
    Failed,
}

/// Selector for the booking calendar iframe on the Eventos pages.
const CALENDAR_IFRAME_SELECTOR: &str = "#bsvCalendarIframe, iframe[src*=\"calendar\"]";

const DISMISS_POPUP_JS: &str = r#"
(() => {
    const btn = Array.from(document.querySelectorAll('button'))
        .find(b => b.textContent.trim() === 'OK' && b.offsetParent !== null);
    if (!btn) return 'not_present';
    btn.click();
    return 'dismissed';
})()
"#;

// The .src property resolves relative URLs against the page, unlike the
// raw attribute.
const IFRAME_SRC_JS: &str = r#"
(() => {
    const frame = document.querySelector('#bsvCalendarIframe, iframe[src*="calendar"]');
    return frame ? frame.src : null;
})()
"#;

/// Load the booking page and wait for the initial render.
pub fn prepare(session: &Session, url: &str) -> Result<()> {
    session.goto(url)?;
    session.settle(1200);
    Ok(())
}

/// Look for a blocking modal and click its "OK" button if present.
pub fn dismiss_popup(session: &Session) -> PopupOutcome {
    match session.eval(DISMISS_POPUP_JS) {
        Ok(value) => {
            let outcome = parse_popup_outcome(value.as_ref().and_then(|v| v.as_str()));
            if outcome == PopupOutcome::Dismissed {
                tracing::info!("Popup dismissed, waiting for the calendar to load");
                // The iframe only starts loading after the modal closes.
                session.settle(3000);
            } else {
                tracing::debug!("No popup to dismiss");
            }
            outcome
        }
        Err(e) => {
            tracing::warn!("Popup check failed: {e}");
            PopupOutcome::Failed
        }
    }
}

pub(crate) fn parse_popup_outcome(value: Option<&str>) -> PopupOutcome {
    match value {
        Some("dismissed") => PopupOutcome::Dismissed,
        Some("not_present") => PopupOutcome::NotPresent,
        _ => PopupOutcome::Failed,
    }
}

/// Locate the calendar iframe and navigate the tab into it.
///
/// CDP has no frame-context switch the way WebDriver does; navigating to
/// the iframe's own URL gives the same DOM with plain selectors.
pub fn enter_calendar(session: &Session) -> Result<String> {
    session
        .tab()
        .wait_for_element(CALENDAR_IFRAME_SELECTOR)
        .map_err(|e| WatchError::Navigation(format!("Calendar iframe not found: {e}")))?;

    let src = match session.eval(IFRAME_SRC_JS)? {
        Some(serde_json::Value::String(src)) if !src.is_empty() => src,
        _ => {
            return Err(WatchError::Navigation(
                "Calendar iframe has no src".into(),
            ));
        }
    };

    tracing::debug!("Entering calendar iframe: {src}");
    session.goto(&src)?;
    session.settle(2000);
    Ok(src)
}
