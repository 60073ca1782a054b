//! Calendar extraction: month alignment and day-cell classification.
//!
//! The booking widget marks each day button with an availability image
//! (`available.svg`, `only_one_left.svg`, `sold_out.svg`) or a state
//! class. Classification never retries and never errors: an ambiguous
//! cell is an `Unknown` verdict with the evidence attached.

use std::sync::LazyLock;

use naowatch_core::error::Result;
use naowatch_core::types::{AvailabilityStatus, TargetDate};
use regex::Regex;
use serde::Deserialize;

use crate::session::Session;

/// Maximum month-navigation clicks before giving up.
const MAX_MONTH_STEPS: u32 = 12;

const NEXT_ARROW_SELECTOR: &str = "img[src*=\"arrow_next_calendar.svg\"]";
const PREV_ARROW_SELECTOR: &str = "img[src*=\"arrow_prev_calendar.svg\"]";

static MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(January|February|March|April|May|June|July|August|September|October|November|December)\s+(20\d{2})\b",
    )
    .expect("static month heading regex")
});

/// Verdict for one day cell.
#[derive(Debug, Clone)]
pub struct DayVerdict {
    pub status: AvailabilityStatus,
    pub evidence: String,
}

impl DayVerdict {
    fn new(status: AvailabilityStatus, evidence: impl Into<String>) -> Self {
        Self {
            status,
            evidence: evidence.into(),
        }
    }
}

/// Step the calendar until the target date's month is displayed.
///
/// A heading that cannot be parsed is logged and left alone; the day
/// classification will surface the ambiguity as `Unknown`.
pub fn ensure_month(session: &Session, date: &TargetDate) -> Result<()> {
    let target = (date.year(), date.month());

    for _ in 0..MAX_MONTH_STEPS {
        let text = session.body_text()?;
        let displayed = match parse_displayed_month(&text) {
            Some(d) => d,
            None => {
                tracing::debug!("No month heading found in calendar");
                return Ok(());
            }
        };
        if displayed == target {
            return Ok(());
        }

        let forward = displayed < target;
        let selector = if forward { NEXT_ARROW_SELECTOR } else { PREV_ARROW_SELECTOR };
        tracing::debug!(
            "Calendar shows {}-{:02}, stepping {} toward {}-{:02}",
            displayed.0,
            displayed.1,
            if forward { "forward" } else { "back" },
            target.0,
            target.1
        );

        let arrow = match session.tab().find_element(selector) {
            Ok(el) => el,
            Err(e) => {
                tracing::debug!("Month arrow not found ({selector}): {e}");
                return Ok(());
            }
        };
        if let Err(e) = arrow.click() {
            tracing::debug!("Month arrow click failed: {e}");
            return Ok(());
        }
        session.settle(2000);
    }

    tracing::debug!("Gave up aligning the calendar month after {MAX_MONTH_STEPS} steps");
    Ok(())
}

/// Parse "October 2025"-style heading text into (year, month).
pub(crate) fn parse_displayed_month(text: &str) -> Option<(i32, u32)> {
    let caps = MONTH_RE.captures(text)?;
    let month = month_number(caps.get(1)?.as_str())?;
    let year = caps.get(2)?.as_str().parse().ok()?;
    Some((year, month))
}

pub(crate) fn month_number(name: &str) -> Option<u32> {
    let n = match name.to_ascii_lowercase().as_str() {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        "december" => 12,
        _ => return None,
    };
    Some(n)
}

#[derive(Debug, Deserialize)]
struct RawVerdict {
    state: String,
    evidence: String,
}

/// Classify the target day's cell. Returns a verdict in every case.
pub fn classify_day(session: &Session, date: &TargetDate) -> DayVerdict {
    let js = day_probe_js(date.day());
    let raw = match session.eval(&js) {
        Ok(Some(serde_json::Value::String(json))) => {
            match serde_json::from_str::<RawVerdict>(&json) {
                Ok(raw) => raw,
                Err(e) => {
                    return DayVerdict::new(
                        AvailabilityStatus::Unknown,
                        format!("unparsable probe result: {e}"),
                    );
                }
            }
        }
        Ok(_) => {
            return DayVerdict::new(AvailabilityStatus::Unknown, "probe returned no value");
        }
        Err(e) => {
            return DayVerdict::new(AvailabilityStatus::Unknown, format!("probe failed: {e}"));
        }
    };

    match raw.state.as_str() {
        "available" => DayVerdict::new(AvailabilityStatus::Available, raw.evidence),
        "sold_out" => DayVerdict::new(AvailabilityStatus::SoldOut, raw.evidence),
        "missing" => fallback_from_page_text(session, raw.evidence),
        _ => DayVerdict::new(AvailabilityStatus::Unknown, raw.evidence),
    }
}

/// When the date cell is missing, fall back to scanning the visible page
/// text for the booking symbols.
fn fallback_from_page_text(session: &Session, cell_evidence: String) -> DayVerdict {
    let text = match session.body_text() {
        Ok(text) => text,
        Err(e) => {
            return DayVerdict::new(
                AvailabilityStatus::Unknown,
                format!("{cell_evidence}; body text unreadable: {e}"),
            );
        }
    };
    match scan_page_text(&text) {
        Some((status, marker)) => DayVerdict::new(
            status,
            format!("{cell_evidence}; page text {marker}"),
        ),
        None => DayVerdict::new(AvailabilityStatus::Unknown, cell_evidence),
    }
}

/// Scan visible text for availability markers. Negatives beat positives:
/// legends and notes often contain the word "Available".
pub(crate) fn scan_page_text(text: &str) -> Option<(AvailabilityStatus, &'static str)> {
    static NEGATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)Sold\s*out|Fully\s*booked|Unavailable|[×✕✖]")
            .expect("static negative marker regex")
    });
    // ○ open, △ few left
    static POSITIVE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[○◯△]").expect("static positive marker regex"));

    if NEGATIVE_RE.is_match(text) {
        return Some((AvailabilityStatus::SoldOut, "negative marker"));
    }
    if POSITIVE_RE.is_match(text) {
        return Some((AvailabilityStatus::Available, "positive marker"));
    }
    None
}

/// Build the in-page classification probe for one day number.
///
/// Mirrors the widget's DOM: a `.title-day` span inside a day button,
/// with availability images and layout classes on the button.
fn day_probe_js(day: u32) -> String {
    format!(
        r#"
(() => {{
    const day = '{day}';
    const span = Array.from(document.querySelectorAll('.title-day'))
        .find(s => s.textContent.trim() === day);
    let btn = span ? span.closest('button') : null;
    if (!btn) {{
        btn = Array.from(document.querySelectorAll('button'))
            .find(b => b.textContent.trim() === day);
    }}
    if (!btn) {{
        return JSON.stringify({{ state: 'missing', evidence: 'date cell not found' }});
    }}
    const cls = btn.className || '';
    const has = sel => !!btn.querySelector(sel);
    if (has('img[src*="available.svg"]'))
        return JSON.stringify({{ state: 'available', evidence: 'available.svg' }});
    if (has('img[src*="only_one_left.svg"]'))
        return JSON.stringify({{ state: 'available', evidence: 'only_one_left.svg (few left)' }});
    if (has('img[src*="sold_out.svg"]'))
        return JSON.stringify({{ state: 'sold_out', evidence: 'sold_out.svg' }});
    if (cls.includes('sold-out-layout'))
        return JSON.stringify({{ state: 'sold_out', evidence: 'sold-out-layout class' }});
    if (cls.includes('pointer-none'))
        return JSON.stringify({{ state: 'sold_out', evidence: 'pointer-none class (closed)' }});
    if (cls.includes('day-active'))
        return JSON.stringify({{ state: 'unsure', evidence: 'day-active without marker' }});
    return JSON.stringify({{ state: 'unsure', evidence: 'unrecognized cell state: ' + cls }});
}})()
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_number() {
        assert_eq!(month_number("October"), Some(10));
        assert_eq!(month_number("january"), Some(1));
        assert_eq!(month_number("DECEMBER"), Some(12));
        assert_eq!(month_number("Smarch"), None);
    }

    #[test]
    fn test_parse_displayed_month() {
        assert_eq!(
            parse_displayed_month("Sun Mon Tue\nOctober 2025\n1 2 3"),
            Some((2025, 10))
        );
        assert_eq!(parse_displayed_month("september 2025"), Some((2025, 9)));
        assert_eq!(parse_displayed_month("no heading here"), None);
        // Year outside the 20xx window is not a heading.
        assert_eq!(parse_displayed_month("October 1999"), None);
    }

    #[test]
    fn test_scan_page_text_negative_beats_positive() {
        // "Sold out" next to a legend circle: negative wins.
        let (status, _) = scan_page_text("○ Available  Sold out").unwrap();
        assert_eq!(status, AvailabilityStatus::SoldOut);
    }

    #[test]
    fn test_scan_page_text_positive_symbols() {
        let (status, _) = scan_page_text("7日 ○").unwrap();
        assert_eq!(status, AvailabilityStatus::Available);
        let (status, _) = scan_page_text("7日 △ few left").unwrap();
        assert_eq!(status, AvailabilityStatus::Available);
    }

    #[test]
    fn test_scan_page_text_cross_symbol() {
        let (status, _) = scan_page_text("7日 ×").unwrap();
        assert_eq!(status, AvailabilityStatus::SoldOut);
    }

    #[test]
    fn test_scan_page_text_no_markers() {
        assert!(scan_page_text("nothing to see").is_none());
    }

    #[test]
    fn test_day_probe_js_embeds_day() {
        let js = day_probe_js(7);
        assert!(js.contains("const day = '7'"));
        assert!(js.contains("available.svg"));
        assert!(js.contains("sold_out.svg"));
    }
}
