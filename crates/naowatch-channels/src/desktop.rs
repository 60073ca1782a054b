//! Desktop channel — OS notification (libnotify / macOS notification
//! center) via notify-rust.

use async_trait::async_trait;
use naowatch_core::error::{Result, WatchError};
use naowatch_core::traits::Notifier;

#[derive(Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    fn name(&self) -> &str {
        "desktop"
    }

    async fn send(&self, title: &str, body: &str) -> Result<()> {
        let title = title.to_string();
        let body = body.to_string();

        // notify-rust blocks on the notification daemon.
        tokio::task::spawn_blocking(move || {
            notify_rust::Notification::new()
                .appname("naowatch")
                .summary(&title)
                .body(&body)
                .show()
                .map(|_| ())
        })
        .await
        .map_err(|e| WatchError::Notification(format!("Desktop notify task: {e}")))?
        .map_err(|e| WatchError::Notification(format!("Desktop notify: {e}")))
    }
}
