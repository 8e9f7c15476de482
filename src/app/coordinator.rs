//! Background request coordination.
//!
//! Each request runs fetch-then-parse on its own worker thread and writes the
//! result into a single shared slot. The slot keeps only the newest write:
//! requests are not cancelled or ordered, so a slow older request can land
//! after a faster newer one. `Delivery::seq` lets a consumer notice that.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crate::app::pipeline::run_feed;
use crate::data::Fetch;
use crate::domain::{EarthquakeRecord, QueryParams};
use crate::error::{AppError, EXIT_UPSTREAM};

/// Result of one completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    /// Submission order, starting at 1 for the coordinator's first request.
    pub seq: u64,
    pub params: QueryParams,
    pub records: Vec<EarthquakeRecord>,
}

/// Handle returned by `submit`; the worker itself is detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: u64,
}

#[derive(Debug, Default)]
struct SlotState {
    latest: Option<Delivery>,
    pending: usize,
}

/// Single-value cell with replace-on-write semantics.
#[derive(Debug, Default)]
pub struct ResultSlot {
    state: Mutex<SlotState>,
    changed: Condvar,
}

impl ResultSlot {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) {
        self.lock().pending += 1;
    }

    /// Claim the slot for a new request only if it is empty and idle.
    ///
    /// Check and claim happen under one lock, so concurrent callers cannot
    /// both win.
    fn try_begin(&self) -> bool {
        let mut state = self.lock();
        if state.latest.is_some() || state.pending > 0 {
            return false;
        }
        state.pending += 1;
        true
    }

    fn abandon(&self) {
        let mut state = self.lock();
        state.pending = state.pending.saturating_sub(1);
        self.changed.notify_all();
    }

    fn deliver(&self, delivery: Delivery) {
        let mut state = self.lock();
        state.pending = state.pending.saturating_sub(1);
        state.latest = Some(delivery);
        self.changed.notify_all();
    }

    pub fn latest(&self) -> Option<Delivery> {
        self.lock().latest.clone()
    }

    pub fn pending(&self) -> usize {
        self.lock().pending
    }

    /// Block until a delivery newer than `after_seq` exists, or the timeout elapses.
    pub fn wait_newer(&self, after_seq: u64, timeout: Duration) -> Option<Delivery> {
        let guard = self.lock();
        let (state, _) = self
            .changed
            .wait_timeout_while(guard, timeout, |s| {
                s.latest.as_ref().is_none_or(|d| d.seq <= after_seq)
            })
            .unwrap_or_else(PoisonError::into_inner);
        state.latest.as_ref().filter(|d| d.seq > after_seq).cloned()
    }

    /// Block until no request is in flight; returns false on timeout.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let guard = self.lock();
        let (state, _) = self
            .changed
            .wait_timeout_while(guard, timeout, |s| s.pending > 0)
            .unwrap_or_else(PoisonError::into_inner);
        state.pending == 0
    }
}

/// Owns the fetcher and the current result slot.
pub struct RequestCoordinator {
    fetcher: Arc<dyn Fetch>,
    slot: Mutex<Arc<ResultSlot>>,
    next_seq: AtomicU64,
}

impl RequestCoordinator {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            fetcher,
            slot: Mutex::new(Arc::new(ResultSlot::default())),
            next_seq: AtomicU64::new(0),
        }
    }

    /// The slot new requests currently deliver into.
    pub fn slot(&self) -> Arc<ResultSlot> {
        Arc::clone(&self.slot.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Start a fetch-then-parse on a new worker thread.
    pub fn submit(&self, params: QueryParams) -> Result<RequestTicket, AppError> {
        let slot = self.slot();
        slot.begin();
        self.spawn_worker(slot, params)
    }

    /// Run one request into `slot`, whose pending count the caller already raised.
    fn spawn_worker(&self, slot: Arc<ResultSlot>, params: QueryParams) -> Result<RequestTicket, AppError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let fetcher = Arc::clone(&self.fetcher);
        let worker_slot = Arc::clone(&slot);
        let spawned = thread::Builder::new()
            .name(format!("quake-fetch-{seq}"))
            .spawn(move || {
                let started = Instant::now();
                let records = run_feed(fetcher.as_ref(), &params);
                tracing::debug!(
                    seq,
                    count = records.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "request finished"
                );
                worker_slot.deliver(Delivery {
                    seq,
                    params,
                    records,
                });
            });

        if let Err(e) = spawned {
            slot.abandon();
            return Err(AppError::new(EXIT_UPSTREAM, format!("Failed to start fetch worker: {e}")));
        }

        tracing::debug!(seq, ?params, "request submitted");
        Ok(RequestTicket { seq })
    }

    /// Submit only if the current slot holds no result and nothing is in flight.
    ///
    /// Repeated calls with an already populated slot are no-ops, so the caller
    /// must `reset` before parameters change.
    pub fn request_for(&self, params: QueryParams) -> Result<Option<RequestTicket>, AppError> {
        let slot = self.slot();
        if !slot.try_begin() {
            return Ok(None);
        }
        self.spawn_worker(slot, params).map(Some)
    }

    pub fn latest(&self) -> Option<Delivery> {
        self.slot().latest()
    }

    pub fn wait(&self, timeout: Duration) -> Option<Delivery> {
        self.slot().wait_newer(0, timeout)
    }

    /// Drop the current slot; in-flight workers finish into the old one unseen.
    pub fn reset(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Arc::new(ResultSlot::default());
        tracing::debug!("result slot reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::tests::StubFetch;
    use crate::data::fixtures::SAMPLE;

    /// Fetcher whose latency is `min_magnitude * 100ms`.
    struct SlowFetch;

    impl Fetch for SlowFetch {
        fn try_fetch(&self, params: &QueryParams) -> Result<String, AppError> {
            thread::sleep(Duration::from_millis(params.min_magnitude as u64 * 100));
            Ok(format!(
                r#"{{"features": [{{"properties": {{"mag": {}.0, "place": "p", "time": 1, "url": "u"}}}}]}}"#,
                params.min_magnitude
            ))
        }
    }

    fn params_with_min(min_magnitude: i32) -> QueryParams {
        QueryParams {
            min_magnitude,
            ..QueryParams::default()
        }
    }

    #[test]
    fn delivers_parsed_records() {
        let coordinator = RequestCoordinator::new(Arc::new(StubFetch::ok(SAMPLE)));
        let ticket = coordinator.submit(QueryParams::default()).unwrap();
        assert_eq!(ticket.seq, 1);

        let delivery = coordinator.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(delivery.seq, 1);
        assert_eq!(delivery.records.len(), 3);
        assert_eq!(coordinator.latest(), Some(delivery));
    }

    #[test]
    fn failed_fetch_delivers_empty_list() {
        let coordinator = RequestCoordinator::new(Arc::new(StubFetch::failing("offline")));
        coordinator.submit(QueryParams::default()).unwrap();
        let delivery = coordinator.wait(Duration::from_secs(5)).unwrap();
        assert!(delivery.records.is_empty());
    }

    #[test]
    fn request_for_skips_when_populated_or_in_flight() {
        let stub = Arc::new(StubFetch::ok(SAMPLE));
        let coordinator = RequestCoordinator::new(stub.clone());

        assert!(coordinator.request_for(QueryParams::default()).unwrap().is_some());
        coordinator.wait(Duration::from_secs(5)).unwrap();
        assert!(coordinator.request_for(QueryParams::default()).unwrap().is_none());
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);

        coordinator.reset();
        assert!(coordinator.latest().is_none());
        let ticket = coordinator.request_for(QueryParams::default()).unwrap().unwrap();
        assert_eq!(ticket.seq, 2);
        coordinator.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn concurrent_request_for_submits_once() {
        let stub = Arc::new(StubFetch::ok(SAMPLE));
        let coordinator = Arc::new(RequestCoordinator::new(stub.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let coordinator = Arc::clone(&coordinator);
                thread::spawn(move || coordinator.request_for(QueryParams::default()).unwrap())
            })
            .collect();
        let submitted = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .count();

        assert_eq!(submitted, 1);
        assert!(coordinator.slot().wait_idle(Duration::from_secs(5)));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stale_result_can_overwrite_fresh_one() {
        let coordinator = RequestCoordinator::new(Arc::new(SlowFetch));
        let slot = coordinator.slot();

        let older = coordinator.submit(params_with_min(3)).unwrap();
        let newer = coordinator.submit(params_with_min(0)).unwrap();
        assert!(newer.seq > older.seq);

        assert!(slot.wait_idle(Duration::from_secs(5)));
        let last = slot.latest().unwrap();
        assert_eq!(last.seq, older.seq);
        assert_eq!(last.records[0].magnitude(), 3.0);
    }

    #[test]
    fn reset_hides_in_flight_results() {
        let coordinator = RequestCoordinator::new(Arc::new(SlowFetch));
        let old_slot = coordinator.slot();
        coordinator.submit(params_with_min(2)).unwrap();
        coordinator.reset();

        assert!(old_slot.wait_idle(Duration::from_secs(5)));
        assert!(old_slot.latest().is_some());
        assert!(coordinator.latest().is_none());
        assert!(coordinator.wait(Duration::from_millis(50)).is_none());
    }
}
