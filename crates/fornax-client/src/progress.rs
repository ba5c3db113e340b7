use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fornax_common::{
    error::Result,
    types::{ProcessType, TransactionControl, TransactionStatus},
};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{Duration, Instant},
};
use tracing::warn;

/// Authoritative transaction read used by the one-shot status poll.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<TransactionControl>;
}

/// Raised by the one-shot poll when a job reached DONE: tells the caller which
/// cached list to refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    SuppliersRefreshed,
    ReportReady,
}

struct EstimatorState {
    /// Bumped on every clear; a poll whose captured epoch no longer matches
    /// was scheduled for a dismissed job and its result is discarded.
    epoch: u64,
    transaction: Option<TransactionControl>,
    estimated_time_ms: i64,
    ticker: Option<JoinHandle<()>>,
    poll: Option<JoinHandle<()>>,
}

/// Simulated progress for one batch job, deliberately decoupled from server
/// truth. A local ticker walks 0..=100 across the server's duration estimate,
/// and a single delayed poll fetches the authoritative status once the
/// estimate elapses. The two signals may disagree when the estimate is off;
/// the authoritative read wins when it arrives.
pub struct ProgressEstimator {
    source: Arc<dyn TransactionSource>,
    state: Arc<Mutex<EstimatorState>>,
    progress_tx: watch::Sender<u8>,
    events_tx: mpsc::UnboundedSender<StatusEvent>,
}

impl ProgressEstimator {
    pub fn new(
        source: Arc<dyn TransactionSource>,
    ) -> (Self, mpsc::UnboundedReceiver<StatusEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (progress_tx, _) = watch::channel(0);
        let estimator = Self {
            source,
            state: Arc::new(Mutex::new(EstimatorState {
                epoch: 0,
                transaction: None,
                estimated_time_ms: 0,
                ticker: None,
                poll: None,
            })),
            progress_tx,
            events_tx,
        };
        (estimator, events_rx)
    }

    pub fn progress(&self) -> watch::Receiver<u8> {
        self.progress_tx.subscribe()
    }

    pub fn transaction(&self) -> Option<TransactionControl> {
        self.lock().transaction.clone()
    }

    /// (Re)starts the simulated progress over `estimated_time_ms`: a tick every
    /// `estimated_time_ms / 100` ms adds 1, clamped at 100, where the ticker
    /// stops itself. A previous ticker is torn down first. A non-positive
    /// estimate (the empty-batch case) schedules nothing and progress stays
    /// at 0.
    pub fn start_estimate(&self, estimated_time_ms: i64) {
        let mut state = self.lock();
        if let Some(ticker) = state.ticker.take() {
            ticker.abort();
        }
        state.estimated_time_ms = estimated_time_ms;
        self.progress_tx.send_replace(0);

        if estimated_time_ms <= 0 {
            return;
        }

        // Sub-100ms estimates would give a zero period, which tokio's interval
        // rejects.
        let period = Duration::from_millis((estimated_time_ms / 100).max(1) as u64);
        let progress_tx = self.progress_tx.clone();
        state.ticker = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            let mut progress: u8 = 0;
            loop {
                ticker.tick().await;
                progress = progress.saturating_add(1).min(100);
                progress_tx.send_replace(progress);
                if progress >= 100 {
                    break;
                }
            }
        }));
    }

    /// Schedules the single authoritative status check, `estimated_time_ms`
    /// from now. It never adjusts the simulated progress; it only reports a
    /// [`StatusEvent`] for completed jobs, and is discarded if the estimator
    /// was cleared in the meantime.
    pub fn watch_status(&self, transaction: TransactionControl, estimated_time_ms: i64) {
        let mut state = self.lock();
        if let Some(poll) = state.poll.take() {
            poll.abort();
        }
        let epoch = state.epoch;
        let id = transaction.id.clone();
        state.transaction = Some(transaction);

        let source = Arc::clone(&self.source);
        let shared = Arc::clone(&self.state);
        let events_tx = self.events_tx.clone();
        state.poll = Some(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(estimated_time_ms.max(0) as u64)).await;

            let record = match source.fetch(&id).await {
                Ok(record) => record,
                Err(err) => {
                    warn!(transaction = %id, error = %err, "authoritative status check failed");
                    return;
                }
            };

            {
                let mut state = shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                if state.epoch != epoch {
                    // Cleared while the poll was in flight; stale result.
                    return;
                }
                state.transaction = Some(record.clone());
            }

            let event = match (record.process_type, record.status) {
                (ProcessType::RevalidateSupplier, TransactionStatus::Done) => {
                    Some(StatusEvent::SuppliersRefreshed)
                }
                (ProcessType::GenerateReport, TransactionStatus::Done) => {
                    Some(StatusEvent::ReportReady)
                }
                _ => None,
            };
            if let Some(event) = event {
                let _ = events_tx.send(event);
            }
        }));
    }

    /// Dismisses the progress UI state: stops the ticker, invalidates any
    /// in-flight poll, and resets everything to idle. The server-side batch is
    /// not cancellable from here; it keeps running unobserved.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.epoch += 1;
        if let Some(ticker) = state.ticker.take() {
            ticker.abort();
        }
        if let Some(poll) = state.poll.take() {
            poll.abort();
        }
        state.transaction = None;
        state.estimated_time_ms = 0;
        self.progress_tx.send_replace(0);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EstimatorState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for ProgressEstimator {
    fn drop(&mut self) {
        let mut state = self.lock();
        if let Some(ticker) = state.ticker.take() {
            ticker.abort();
        }
        if let Some(poll) = state.poll.take() {
            poll.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use fornax_common::{
        error::Result,
        time,
        types::{ProcessType, TransactionControl, TransactionStatus},
    };
    use tokio::time::{Duration, sleep};

    use super::{ProgressEstimator, StatusEvent, TransactionSource};

    struct FixedSource {
        record: Mutex<TransactionControl>,
    }

    #[async_trait]
    impl TransactionSource for FixedSource {
        async fn fetch(&self, _id: &str) -> Result<TransactionControl> {
            Ok(self.record.lock().unwrap().clone())
        }
    }

    fn record(process_type: ProcessType, status: TransactionStatus) -> TransactionControl {
        let now = time::now();
        TransactionControl {
            id: "tx-1".to_string(),
            process_type,
            status,
            estimated_time_ms: 1_000,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    fn estimator(
        process_type: ProcessType,
        status: TransactionStatus,
    ) -> (ProgressEstimator, tokio::sync::mpsc::UnboundedReceiver<StatusEvent>) {
        let source = Arc::new(FixedSource {
            record: Mutex::new(record(process_type, status)),
        });
        ProgressEstimator::new(source)
    }

    #[tokio::test(start_paused = true)]
    async fn progress_climbs_monotonically_to_100_and_stops() {
        let (estimator, _events) =
            estimator(ProcessType::RevalidateSupplier, TransactionStatus::Updating);
        let rx = estimator.progress();

        estimator.start_estimate(1_000);

        let mut last = 0;
        for _ in 0..200 {
            sleep(Duration::from_millis(10)).await;
            let current = *rx.borrow();
            assert!(current >= last, "progress went backwards: {last} -> {current}");
            last = current;
        }
        assert_eq!(last, 100);

        // Self-terminated: nothing moves it past 100.
        sleep(Duration::from_secs(10)).await;
        assert_eq!(*rx.borrow(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn non_positive_estimate_never_ticks() {
        let (estimator, _events) =
            estimator(ProcessType::RevalidateSupplier, TransactionStatus::Updating);
        let rx = estimator.progress();

        estimator.start_estimate(0);
        sleep(Duration::from_secs(60)).await;
        assert_eq!(*rx.borrow(), 0);

        estimator.start_estimate(-5);
        sleep(Duration::from_secs(60)).await;
        assert_eq!(*rx.borrow(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_tears_down_the_old_ticker() {
        let (estimator, _events) =
            estimator(ProcessType::RevalidateSupplier, TransactionStatus::Updating);
        let rx = estimator.progress();

        estimator.start_estimate(1_000);
        sleep(Duration::from_millis(500)).await;
        assert!(*rx.borrow() > 0);

        estimator.start_estimate(10_000);
        assert_eq!(*rx.borrow(), 0);

        // The new cadence is 100ms per tick; the old 10ms cadence is gone.
        sleep(Duration::from_millis(450)).await;
        assert!(*rx.borrow() <= 5, "old ticker still running");
    }

    #[tokio::test(start_paused = true)]
    async fn poll_reports_completed_revalidation() {
        let (estimator, mut events) =
            estimator(ProcessType::RevalidateSupplier, TransactionStatus::Done);

        estimator.watch_status(
            record(ProcessType::RevalidateSupplier, TransactionStatus::Updating),
            1_000,
        );

        // Not yet: the check only fires after the estimate elapses.
        sleep(Duration::from_millis(500)).await;
        assert!(events.try_recv().is_err());

        sleep(Duration::from_millis(600)).await;
        assert!(matches!(
            events.try_recv(),
            Ok(StatusEvent::SuppliersRefreshed)
        ));

        // The authoritative record replaced the submission-time snapshot.
        let current = estimator.transaction().unwrap();
        assert_eq!(current.status, TransactionStatus::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_reports_completed_report_job() {
        let (estimator, mut events) =
            estimator(ProcessType::GenerateReport, TransactionStatus::Done);

        estimator.watch_status(
            record(ProcessType::GenerateReport, TransactionStatus::Updating),
            200,
        );
        sleep(Duration::from_millis(300)).await;
        assert!(matches!(events.try_recv(), Ok(StatusEvent::ReportReady)));
    }

    #[tokio::test(start_paused = true)]
    async fn still_updating_job_raises_no_event() {
        let (estimator, mut events) =
            estimator(ProcessType::RevalidateSupplier, TransactionStatus::Updating);

        estimator.watch_status(
            record(ProcessType::RevalidateSupplier, TransactionStatus::Updating),
            200,
        );
        sleep(Duration::from_millis(300)).await;
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_discards_the_in_flight_poll() {
        let (estimator, mut events) =
            estimator(ProcessType::RevalidateSupplier, TransactionStatus::Done);
        let rx = estimator.progress();

        estimator.start_estimate(1_000);
        estimator.watch_status(
            record(ProcessType::RevalidateSupplier, TransactionStatus::Updating),
            1_000,
        );
        sleep(Duration::from_millis(300)).await;

        estimator.clear();
        assert_eq!(*rx.borrow(), 0);
        assert!(estimator.transaction().is_none());

        sleep(Duration::from_secs(5)).await;
        assert!(events.try_recv().is_err());
        assert_eq!(*rx.borrow(), 0);
    }
}
