//! Browser session lifecycle.
//!
//! One session per museum pass. Dropping the session kills the Chrome
//! process, so the browser is released on every path, including errors.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use naowatch_core::error::{Result, WatchError};

/// Settings for one browser session.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub headless: bool,
    pub timeout: Duration,
    pub screenshot_dir: Option<PathBuf>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            timeout: Duration::from_millis(45_000),
            screenshot_dir: None,
        }
    }
}

/// A live Chrome session with one tab.
pub struct Session {
    // Held so the browser process outlives the tab handle.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl Session {
    /// Launch Chrome and open a fresh tab.
    pub fn launch(settings: &BrowserSettings) -> Result<Self> {
        let options = LaunchOptions::default_builder()
            .headless(settings.headless)
            .build()
            .map_err(|e| WatchError::Navigation(format!("Browser launch options: {e}")))?;

        let browser = Browser::new(options)
            .map_err(|e| WatchError::Navigation(format!("Browser launch: {e}")))?;
        let tab = browser
            .new_tab()
            .map_err(|e| WatchError::Navigation(format!("New tab: {e}")))?;
        tab.set_default_timeout(settings.timeout);

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    pub fn tab(&self) -> &Tab {
        &self.tab
    }

    /// Navigate the tab and wait until the load settles.
    pub fn goto(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| WatchError::Navigation(format!("Navigate to {url}: {e}")))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| WatchError::Navigation(format!("Page load timeout for {url}: {e}")))?;
        Ok(())
    }

    /// Run a JS expression and return its JSON value, if any.
    pub fn eval(&self, expression: &str) -> Result<Option<serde_json::Value>> {
        let object = self
            .tab
            .evaluate(expression, false)
            .map_err(|e| WatchError::Extraction(format!("Evaluate failed: {e}")))?;
        Ok(object.value)
    }

    /// Visible text of the current document body.
    pub fn body_text(&self) -> Result<String> {
        match self.eval("document.body ? document.body.innerText : ''")? {
            Some(serde_json::Value::String(text)) => Ok(text),
            _ => Ok(String::new()),
        }
    }

    /// Full-page PNG screenshot.
    pub fn screenshot_png(&self) -> Result<Vec<u8>> {
        self.tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| WatchError::Extraction(format!("Screenshot failed: {e}")))
    }

    /// Let dynamic content settle. The booking widget repaints after
    /// navigation and month changes.
    pub fn settle(&self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}
