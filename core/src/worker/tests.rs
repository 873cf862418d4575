//! Integration tests for the Worker module

use super::*;
use crate::channel::{tally_channel, TallyReceiver};
use crate::client::{HttpClient, TransportError};
use crate::stop::StopSignal;

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Mock HttpClient
// ============================================================================

struct MockClient {
    status: u16,
    delay: Option<Duration>,
    transport_error: Option<TransportError>,
    fail_every: Option<usize>,
    panic_at: Option<usize>,
    calls: AtomicUsize,
}

impl MockClient {
    fn ok() -> Self {
        Self::with_status(200)
    }

    fn with_status(status: u16) -> Self {
        Self {
            status,
            delay: None,
            transport_error: None,
            fail_every: None,
            panic_at: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn unreachable() -> Self {
        Self {
            transport_error: Some(TransportError::Connect("connection refused".into())),
            ..Self::ok()
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn with_fail_every(mut self, n: usize) -> Self {
        self.fail_every = Some(n);
        self
    }

    fn with_panic_at(mut self, call: usize) -> Self {
        self.panic_at = Some(call);
        self
    }

    fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst) as u64
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn get(&self, _url: &str) -> Result<u16, TransportError> {
        let count = self.calls.fetch_add(1, Ordering::SeqCst);

        if self.panic_at == Some(count) {
            panic!("simulated client panic");
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = &self.transport_error {
            return Err(err.clone());
        }

        if let Some(fail_every) = self.fail_every {
            if count % fail_every == fail_every - 1 {
                return Ok(500);
            }
        }

        Ok(self.status)
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn create_test_worker(id: usize, client: Arc<MockClient>) -> (Worker, TallyReceiver, StopSignal) {
    let (tally_tx, tally_rx) = tally_channel(1);
    let stop = StopSignal::new();

    let worker = WorkerBuilder::new(id)
        .client(client)
        .target_url("http://mock.invalid/")
        .stop_signal(stop.clone())
        .tally_tx(tally_tx)
        .build()
        .expect("Failed to build worker");

    (worker, tally_rx, stop)
}

async fn run_for(worker: Worker, stop: &StopSignal, duration: Duration) {
    let handle = tokio::spawn(worker.run());
    tokio::time::sleep(duration).await;
    stop.close();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("Worker did not stop")
        .expect("Worker task panicked");
}

// ============================================================================
// Integration Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_worker_always_ok_counts_only_successes() {
    let client = Arc::new(MockClient::ok().with_delay(Duration::from_millis(1)));
    let (worker, mut tally_rx, stop) = create_test_worker(0, Arc::clone(&client));

    run_for(worker, &stop, Duration::from_millis(50)).await;

    let tallies = tally_rx.drain(1);
    assert_eq!(tallies.len(), 1);
    let tally = tallies[0];
    assert!(tally.successes > 0);
    assert_eq!(tally.failures, 0);
    assert_eq!(tally.total(), client.calls());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_worker_unreachable_counts_only_failures() {
    let client = Arc::new(MockClient::unreachable());
    let (worker, mut tally_rx, stop) = create_test_worker(0, Arc::clone(&client));

    run_for(worker, &stop, Duration::from_millis(30)).await;

    let tally = tally_rx.drain(1)[0];
    assert_eq!(tally.successes, 0);
    assert!(tally.failures > 0);
    assert_eq!(tally.total(), client.calls());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_worker_non_ok_status_is_failure() {
    let client = Arc::new(MockClient::with_status(404).with_delay(Duration::from_millis(1)));
    let (worker, mut tally_rx, stop) = create_test_worker(0, Arc::clone(&client));

    run_for(worker, &stop, Duration::from_millis(30)).await;

    let tally = tally_rx.drain(1)[0];
    assert_eq!(tally.successes, 0);
    assert_eq!(tally.failures, client.calls());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_worker_mixed_outcomes_account_for_every_call() {
    let client = Arc::new(
        MockClient::ok()
            .with_delay(Duration::from_millis(1))
            .with_fail_every(3),
    );
    let (worker, mut tally_rx, stop) = create_test_worker(0, Arc::clone(&client));

    run_for(worker, &stop, Duration::from_millis(60)).await;

    let tally = tally_rx.drain(1)[0];
    assert_eq!(tally.total(), client.calls());
    assert!(tally.successes > 0);
    assert!(tally.failures > 0);
}

#[tokio::test]
async fn test_worker_stopped_before_start_emits_zero_tally() {
    let client = Arc::new(MockClient::ok());
    let (worker, mut tally_rx, stop) = create_test_worker(0, Arc::clone(&client));

    stop.close();
    worker.run().await;

    let tallies = tally_rx.drain(1);
    assert_eq!(tallies, vec![Tally::new()]);
    assert_eq!(client.calls(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_worker_finishes_in_flight_request() {
    let client = Arc::new(MockClient::ok().with_delay(Duration::from_millis(150)));
    let (worker, mut tally_rx, stop) = create_test_worker(0, Arc::clone(&client));

    let handle = tokio::spawn(worker.run());

    // Close while the first request is still in flight
    tokio::time::sleep(Duration::from_millis(30)).await;
    stop.close();
    assert!(!handle.is_finished());

    handle.await.expect("Worker task panicked");

    let tally = tally_rx.drain(1)[0];
    assert_eq!(client.calls(), 1);
    assert_eq!(tally.successes, 1);
    assert_eq!(tally.failures, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_worker_emits_tally_on_panic() {
    let client = Arc::new(MockClient::ok().with_panic_at(3));
    let (worker, mut tally_rx, _stop) = create_test_worker(0, Arc::clone(&client));

    let result = tokio::spawn(worker.run()).await;
    assert!(result.unwrap_err().is_panic());

    let tallies = tally_rx.drain(1);
    assert_eq!(tallies.len(), 1);
    assert_eq!(tallies[0].successes, 3);
    assert_eq!(tallies[0].failures, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_worker_emits_tally_on_abort() {
    let client = Arc::new(MockClient::ok().with_delay(Duration::from_millis(5)));
    let (worker, mut tally_rx, _stop) = create_test_worker(0, Arc::clone(&client));

    let handle = tokio::spawn(worker.run());
    tokio::time::sleep(Duration::from_millis(30)).await;
    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());

    let tallies = tally_rx.drain(1);
    assert_eq!(tallies.len(), 1);
}

#[test]
fn test_worker_debug_format() {
    let client = Arc::new(MockClient::ok());
    let (worker, _rx, _stop) = create_test_worker(7, client);

    assert_eq!(worker.id(), 7);
    let debug = format!("{:?}", worker);
    assert!(debug.contains("Worker"));
    assert!(debug.contains("mock.invalid"));
}
