//! The run orchestrator.
//!
//! One run: for each museum, one probe pass over all requested dates. A
//! museum whose page never becomes ready is recorded as a failure and the
//! run continues with the next museum. Every `Available` result is handed
//! to the dispatcher exactly once.

use std::sync::Arc;

use naowatch_channels::Dispatcher;
use naowatch_core::traits::AvailabilityProbe;
use naowatch_core::types::{MuseumFailure, MuseumTarget, RunSummary, TargetDate};

pub struct Orchestrator {
    probe: Arc<dyn AvailabilityProbe>,
    dispatcher: Dispatcher,
}

impl Orchestrator {
    pub fn new(probe: Arc<dyn AvailabilityProbe>, dispatcher: Dispatcher) -> Self {
        Self { probe, dispatcher }
    }

    /// One full check pass. Returns the aggregate summary; the caller
    /// derives the process exit code from it.
    pub async fn run(&self, museums: &[MuseumTarget], dates: &[TargetDate]) -> RunSummary {
        let mut summary = RunSummary::default();

        for museum in museums {
            tracing::info!("Checking {} for {} date(s)", museum.name, dates.len());
            match self.probe.check(museum, dates).await {
                Ok(results) => {
                    summary.results.extend(results);
                }
                Err(e) => {
                    tracing::error!("{} check failed: {e}", museum.name);
                    summary.failures.push(MuseumFailure {
                        museum: museum.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        for result in summary.available() {
            let delivered = self.dispatcher.dispatch(result).await;
            tracing::info!(
                "{} {} available — {}/{} channel(s) delivered",
                result.museum.name,
                result.date,
                delivered,
                self.dispatcher.channel_count()
            );
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use naowatch_core::error::{Result, WatchError};
    use naowatch_core::traits::Notifier;
    use naowatch_core::types::{AvailabilityResult, AvailabilityStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Probe returning a canned status per museum; museums named
    /// "down-*" fail with a navigation error.
    struct StubProbe {
        status: AvailabilityStatus,
        calls: AtomicUsize,
    }

    impl StubProbe {
        fn new(status: AvailabilityStatus) -> Self {
            Self {
                status,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AvailabilityProbe for StubProbe {
        async fn check(
            &self,
            museum: &MuseumTarget,
            dates: &[TargetDate],
        ) -> Result<Vec<AvailabilityResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if museum.name.starts_with("down-") {
                return Err(WatchError::Navigation("page load timeout".into()));
            }
            Ok(dates
                .iter()
                .map(|d| AvailabilityResult::new(museum.clone(), *d, self.status, "stub"))
                .collect())
        }
    }

    struct CountingChannel {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Notifier for CountingChannel {
        fn name(&self) -> &str {
            "counting"
        }

        async fn send(&self, _title: &str, _body: &str) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn counting_dispatcher() -> (Dispatcher, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let channel = CountingChannel {
            calls: calls.clone(),
        };
        (Dispatcher::new(vec![Box::new(channel)]), calls)
    }

    fn museums(names: &[&str]) -> Vec<MuseumTarget> {
        names
            .iter()
            .map(|n| MuseumTarget::new(*n, format!("https://example.test/{n}")))
            .collect()
    }

    fn dates(strs: &[&str]) -> Vec<TargetDate> {
        strs.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_one_result_per_museum_date_pair() {
        let probe = Arc::new(StubProbe::new(AvailabilityStatus::Unknown));
        let (dispatcher, _) = counting_dispatcher();
        let orch = Orchestrator::new(probe, dispatcher);

        let summary = orch
            .run(
                &museums(&["chichu", "teshima"]),
                &dates(&["2025-10-01", "2025-10-07"]),
            )
            .await;

        assert_eq!(summary.results.len(), 4);
        assert!(summary.failures.is_empty());
        assert_eq!(summary.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_sold_out_never_dispatches_and_exits_clean() {
        let probe = Arc::new(StubProbe::new(AvailabilityStatus::SoldOut));
        let (dispatcher, sends) = counting_dispatcher();
        let orch = Orchestrator::new(probe, dispatcher);

        let summary = orch
            .run(&museums(&["chichu"]), &dates(&["2025-10-07"]))
            .await;

        assert_eq!(sends.load(Ordering::SeqCst), 0);
        assert_eq!(summary.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_available_dispatches_once_per_result() {
        let probe = Arc::new(StubProbe::new(AvailabilityStatus::Available));
        let (dispatcher, sends) = counting_dispatcher();
        let orch = Orchestrator::new(probe, dispatcher);

        let summary = orch
            .run(&museums(&["chichu"]), &dates(&["2025-10-01", "2025-10-07"]))
            .await;

        assert_eq!(summary.results.len(), 2);
        // One channel, two available results => two sends.
        assert_eq!(sends.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_partial_failure_continues_and_exits_nonzero() {
        let probe = Arc::new(StubProbe::new(AvailabilityStatus::SoldOut));
        let (dispatcher, _) = counting_dispatcher();
        let probe_ref = probe.clone();
        let orch = Orchestrator::new(probe, dispatcher);

        let summary = orch
            .run(&museums(&["down-chichu", "teshima"]), &dates(&["2025-10-07"]))
            .await;

        // Both museums attempted.
        assert_eq!(probe_ref.calls.load(Ordering::SeqCst), 2);
        // Only the healthy museum produced a result.
        assert_eq!(summary.results.len(), 1);
        assert_eq!(summary.results[0].museum.name, "teshima");
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].museum, "down-chichu");
        assert_ne!(summary.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_unknown_never_dispatches() {
        let probe = Arc::new(StubProbe::new(AvailabilityStatus::Unknown));
        let (dispatcher, sends) = counting_dispatcher();
        let orch = Orchestrator::new(probe, dispatcher);

        orch.run(&museums(&["chichu"]), &dates(&["2025-10-07"])).await;
        assert_eq!(sends.load(Ordering::SeqCst), 0);
    }
}
