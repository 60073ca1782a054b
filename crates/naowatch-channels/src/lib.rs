//! # NaoWatch Channels
//! Notification channel implementations and the dispatcher that fans an
//! availability hit out to every enabled channel.

pub mod desktop;
pub mod dispatch;
pub mod email;
pub mod telegram;

pub use desktop::DesktopNotifier;
pub use dispatch::{Dispatcher, format_message};
pub use email::EmailNotifier;
pub use telegram::TelegramNotifier;

use naowatch_core::config::ChannelConfig;
use naowatch_core::traits::Notifier;

/// Build every channel the configuration enables. A channel with missing
/// credentials is simply not constructed.
pub fn enabled_channels(config: &ChannelConfig) -> Vec<Box<dyn Notifier>> {
    let mut channels: Vec<Box<dyn Notifier>> = Vec::new();

    if config.desktop {
        channels.push(Box::new(DesktopNotifier::new()));
    }
    if let Some(tg) = &config.telegram {
        channels.push(Box::new(TelegramNotifier::new(tg.clone())));
    }
    if let Some(email) = &config.email {
        channels.push(Box::new(EmailNotifier::new(email.clone())));
    }

    for ch in &channels {
        tracing::info!("Notification channel enabled: {}", ch.name());
    }
    channels
}
