//! Notification dispatch — fan one availability hit out to every enabled
//! channel. Each channel is best-effort: a failure is logged and the
//! remaining channels are still attempted.

use naowatch_core::config::ChannelConfig;
use naowatch_core::traits::Notifier;
use naowatch_core::types::AvailabilityResult;

use crate::enabled_channels;

/// Message for one available result: (title, body).
pub fn format_message(result: &AvailabilityResult) -> (String, String) {
    (
        format!("{} tickets available!", result.museum.name),
        format!(
            "{} appears to have availability on {}.\nBook ASAP: {}",
            result.museum.name, result.date, result.museum.url
        ),
    )
}

pub struct Dispatcher {
    channels: Vec<Box<dyn Notifier>>,
}

impl Dispatcher {
    pub fn new(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self { channels }
    }

    pub fn from_config(config: &ChannelConfig) -> Self {
        Self::new(enabled_channels(config))
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Send the formatted message through every channel. Only `Available`
    /// results produce messages. Returns the number of successful
    /// deliveries.
    pub async fn dispatch(&self, result: &AvailabilityResult) -> usize {
        if !result.status.is_available() {
            return 0;
        }

        let (title, body) = format_message(result);
        let mut delivered = 0;
        for channel in &self.channels {
            match channel.send(&title, &body).await {
                Ok(()) => {
                    tracing::info!("Notification sent via {}", channel.name());
                    delivered += 1;
                }
                Err(e) => {
                    tracing::warn!("Channel '{}' failed: {e}", channel.name());
                }
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use naowatch_core::error::{Result, WatchError};
    use naowatch_core::types::{AvailabilityStatus, MuseumTarget, TargetDate};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeChannel {
        name: &'static str,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    impl FakeChannel {
        fn new(name: &'static str, fail: bool) -> (Box<dyn Notifier>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Box::new(Self {
                    name,
                    fail,
                    calls: calls.clone(),
                }),
                calls,
            )
        }
    }

    #[async_trait]
    impl Notifier for FakeChannel {
        fn name(&self) -> &str {
            self.name
        }

        async fn send(&self, _title: &str, _body: &str) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(WatchError::Notification("simulated outage".into()))
            } else {
                Ok(())
            }
        }
    }

    fn result(status: AvailabilityStatus) -> AvailabilityResult {
        AvailabilityResult::new(
            MuseumTarget::new("Chichu Art Museum", "https://example.test/chichu"),
            "2025-10-07".parse::<TargetDate>().unwrap(),
            status,
            "available.svg",
        )
    }

    #[tokio::test]
    async fn test_available_reaches_every_channel_once() {
        let (a, a_calls) = FakeChannel::new("a", false);
        let (b, b_calls) = FakeChannel::new("b", false);
        let dispatcher = Dispatcher::new(vec![a, b]);

        let delivered = dispatcher.dispatch(&result(AvailabilityStatus::Available)).await;
        assert_eq!(delivered, 2);
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failing_channel_does_not_block_others() {
        let (failing, failing_calls) = FakeChannel::new("failing", true);
        let (ok, ok_calls) = FakeChannel::new("ok", false);
        let dispatcher = Dispatcher::new(vec![failing, ok]);

        let delivered = dispatcher.dispatch(&result(AvailabilityStatus::Available)).await;
        assert_eq!(delivered, 1);
        assert_eq!(failing_calls.load(Ordering::SeqCst), 1);
        assert_eq!(ok_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sold_out_sends_nothing() {
        let (ch, calls) = FakeChannel::new("ch", false);
        let dispatcher = Dispatcher::new(vec![ch]);

        let delivered = dispatcher.dispatch(&result(AvailabilityStatus::SoldOut)).await;
        assert_eq!(delivered, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_sends_nothing() {
        let (ch, calls) = FakeChannel::new("ch", false);
        let dispatcher = Dispatcher::new(vec![ch]);

        let delivered = dispatcher.dispatch(&result(AvailabilityStatus::Unknown)).await;
        assert_eq!(delivered, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_format_message() {
        let (title, body) = format_message(&result(AvailabilityStatus::Available));
        assert_eq!(title, "Chichu Art Museum tickets available!");
        assert!(body.contains("2025-10-07"));
        assert!(body.contains("https://example.test/chichu"));
        assert!(body.contains("Book ASAP"));
    }

    #[test]
    fn test_empty_dispatcher() {
        let dispatcher = Dispatcher::new(Vec::new());
        assert!(dispatcher.is_empty());
        assert_eq!(dispatcher.channel_count(), 0);
    }
}
