//! NaoWatch configuration system.
//!
//! Layered: TOML file (`~/.naowatch/config.toml`, optional) → environment
//! variables (the tool is historically `.env`-driven) → CLI flags applied by
//! the binary. A channel with no credentials stays `None` and is silently
//! disabled.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WatchError};
use crate::types::MuseumTarget;

const CHICHU_URL: &str = "https://benesse-artsite.eventos.tokyo/web/portal/797/event/8483/module/booth/239565/176695?language=eng";
const TESHIMA_URL: &str = "https://benesse-artsite.eventos.tokyo/web/portal/797/event/8483/module/booth/239565/185773?language=eng";

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_museums")]
    pub museums: Vec<MuseumEntry>,
    #[serde(default = "default_dates")]
    pub dates: Vec<String>,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub channels: ChannelConfig,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            museums: default_museums(),
            dates: default_dates(),
            browser: BrowserConfig::default(),
            channels: ChannelConfig::default(),
        }
    }
}

/// One museum booking page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuseumEntry {
    pub name: String,
    pub url: String,
}

fn default_museums() -> Vec<MuseumEntry> {
    vec![
        MuseumEntry {
            name: "Chichu Art Museum".into(),
            url: CHICHU_URL.into(),
        },
        MuseumEntry {
            name: "Teshima Art Museum".into(),
            url: TESHIMA_URL.into(),
        },
    ]
}

fn default_dates() -> Vec<String> {
    vec!["2025-10-07".into()]
}

/// Browser session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_true")]
    pub headless: bool,
    /// Navigation timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Directory for per-date screenshots; disabled when unset.
    #[serde(default)]
    pub screenshot_dir: Option<String>,
}

fn default_true() -> bool {
    true
}
fn default_timeout_ms() -> u64 {
    45_000
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            timeout_ms: default_timeout_ms(),
            screenshot_dir: None,
        }
    }
}

/// Notification channel configuration. Each channel is independent and
/// optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelConfig {
    #[serde(default)]
    pub desktop: bool,
    #[serde(default)]
    pub telegram: Option<TelegramChannelConfig>,
    #[serde(default)]
    pub email: Option<EmailChannelConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramChannelConfig {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailChannelConfig {
    pub from: String,
    pub to: String,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Defaults to `from` when unset.
    #[serde(default)]
    pub smtp_user: Option<String>,
    pub smtp_pass: String,
}

impl EmailChannelConfig {
    pub fn username(&self) -> &str {
        self.smtp_user.as_deref().unwrap_or(&self.from)
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".into()
}
fn default_smtp_port() -> u16 {
    587
}

impl WatchConfig {
    /// Load config from the default path, falling back to defaults.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WatchError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| WatchError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Get the default config path (~/.naowatch/config.toml).
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".naowatch")
            .join("config.toml")
    }

    /// Apply environment variable overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides through a lookup closure. Split out so tests can
    /// inject an environment without touching the process.
    pub fn apply_env_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        // Targets. TARGET_URLS (comma separated) beats TARGET_URL.
        if let Some(urls) = get("TARGET_URLS").filter(|s| !s.trim().is_empty()) {
            self.museums = urls
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .enumerate()
                .map(|(i, url)| MuseumEntry {
                    name: format!("Museum {}", i + 1),
                    url: url.to_string(),
                })
                .collect();
        } else if let Some(url) = get("TARGET_URL").filter(|s| !s.trim().is_empty()) {
            self.museums = vec![MuseumEntry {
                name: "Museum".into(),
                url: url.trim().to_string(),
            }];
        }

        // Dates. TARGET_DATES (comma separated) beats TARGET_DATE.
        if let Some(dates) = get("TARGET_DATES").filter(|s| !s.trim().is_empty()) {
            self.dates = dates
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        } else if let Some(date) = get("TARGET_DATE").filter(|s| !s.trim().is_empty()) {
            self.dates = vec![date.trim().to_string()];
        }

        // Browser.
        if let Some(v) = get("HEADLESS") {
            self.browser.headless = v.trim() != "0";
        }
        if let Some(ms) = get("TIMEOUT_MS").and_then(|v| v.trim().parse().ok()) {
            self.browser.timeout_ms = ms;
        }

        // Channels — present credentials enable, absence leaves disabled.
        if let Some(v) = get("DESKTOP_NOTIFY") {
            self.channels.desktop = v.trim() == "1";
        }
        if let (Some(bot_token), Some(chat_id)) =
            (get("TELEGRAM_BOT_TOKEN"), get("TELEGRAM_CHAT_ID"))
            && !bot_token.is_empty()
            && !chat_id.is_empty()
        {
            self.channels.telegram = Some(TelegramChannelConfig { bot_token, chat_id });
        }
        if let (Some(from), Some(to), Some(smtp_pass)) =
            (get("EMAIL_FROM"), get("EMAIL_TO"), get("SMTP_PASS"))
            && !from.is_empty()
            && !to.is_empty()
            && !smtp_pass.is_empty()
        {
            self.channels.email = Some(EmailChannelConfig {
                from,
                to,
                smtp_host: get("SMTP_HOST").unwrap_or_else(default_smtp_host),
                smtp_port: get("SMTP_PORT")
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or_else(default_smtp_port),
                smtp_user: get("SMTP_USER").filter(|s| !s.is_empty()),
                smtp_pass,
            });
        }
    }

    /// Museums as check targets.
    pub fn targets(&self) -> Vec<MuseumTarget> {
        self.museums
            .iter()
            .map(|m| MuseumTarget::new(&m.name, &m.url))
            .collect()
    }
}
