//! Tests for the Orchestrator module

use super::aggregator::{aggregate_worker_stats, PoolStats};
use super::builder::OrchestratorBuilder;
use crate::config::RunConfig;
use crate::error::BenchError;
use crate::monitor::{interrupt, TerminationCause};
use crate::progress::{ProgressEvent, RecordingReporter, SilentReporter};
use crate::testing::MockClient;
use crate::worker::WorkerStats;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

fn builder(client: Arc<MockClient>, config: RunConfig) -> OrchestratorBuilder {
    OrchestratorBuilder::new()
        .config(config)
        .client(client)
        .reporter(Arc::new(SilentReporter))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_pool_stats_default() {
    let stats = PoolStats::default();
    assert_eq!(stats.workers, 0);
    assert_eq!(stats.issued, 0);
    assert_eq!(stats.longest_worker, Duration::ZERO);
}

#[test]
fn test_aggregate_worker_stats_longest_worker() {
    let t0 = tokio::time::Instant::now();
    let span = |ms| WorkerStats {
        started_at: Some(t0),
        ended_at: Some(t0 + Duration::from_millis(ms)),
        ..Default::default()
    };

    let stats = aggregate_worker_stats(&[span(30), span(120), WorkerStats::default(), span(45)]);
    assert_eq!(stats.longest_worker, Duration::from_millis(120));
}

#[test]
fn test_aggregate_worker_stats_empty() {
    let stats = aggregate_worker_stats(&[]);
    assert_eq!(stats.workers, 0);
    assert_eq!(stats.issued, 0);
}

#[test]
fn test_aggregate_worker_stats_sums() {
    let workers = vec![
        WorkerStats {
            issued: 10,
            failed: 1,
            received: 900,
            ..Default::default()
        },
        WorkerStats {
            issued: 7,
            failed: 0,
            received: 700,
            ..Default::default()
        },
    ];

    let stats = aggregate_worker_stats(&workers);
    assert_eq!(stats.workers, 2);
    assert_eq!(stats.issued, 17);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.received, 1600);
}

#[test]
fn test_builder_missing_client() {
    let result = OrchestratorBuilder::new()
        .config(RunConfig::new(10, 1))
        .build();
    assert!(matches!(result, Err(BenchError::MissingConfig("client"))));
}

#[test]
fn test_builder_invalid_config() {
    let client = Arc::new(MockClient::new("mock://target"));
    let result = builder(client, RunConfig::new(2, 4)).build();
    assert!(matches!(result, Err(BenchError::Config(_))));
}

// ============================================================================
// Runs
// ============================================================================

#[tokio::test]
async fn test_run_reaches_quota() {
    let client = Arc::new(MockClient::new("mock://target"));
    let reporter = RecordingReporter::default();

    let orchestrator = builder(Arc::clone(&client), RunConfig::new(100, 4).with_target("mock://target"))
        .reporter(Arc::new(reporter.clone()))
        .build()
        .unwrap();

    let outcome = orchestrator.run().await.unwrap();

    assert_eq!(outcome.cause, TerminationCause::QuotaReached);
    assert_eq!(outcome.statistics.total_requests(), 100);
    assert_eq!(outcome.statistics.total_failed_requests(), 0);
    assert_eq!(outcome.statistics.response_time_samples().len(), 100);
    assert_eq!(outcome.statistics.total_received(), 100 * 256);
    assert_eq!(outcome.pool.workers, 4);
    assert_eq!(outcome.pool.issued, 100);
    assert_eq!(client.calls(), 100);

    let events = reporter.events();
    assert_eq!(
        events.first(),
        Some(&ProgressEvent::Benchmarking {
            target: "mock://target".into()
        })
    );
    assert_eq!(events.last(), Some(&ProgressEvent::Finished(100)));
}

#[tokio::test]
async fn test_run_continues_on_error() {
    let client = Arc::new(MockClient::new("mock://target").with_fail_every(3));
    let config = RunConfig::new(100, 4).with_abort_on_error(false);

    let outcome = builder(client, config).build().unwrap().run().await.unwrap();

    assert_eq!(outcome.cause, TerminationCause::QuotaReached);
    assert_eq!(outcome.statistics.total_requests(), 100);
    assert_eq!(outcome.statistics.total_failed_requests(), 33);
    assert_eq!(outcome.statistics.err_response(), 33);
    assert_eq!(outcome.statistics.response_time_samples().len(), 67);
}

#[tokio::test]
async fn test_run_fail_fast() {
    let client = Arc::new(MockClient::new("mock://target").with_fail_at(4));
    let config = RunConfig::new(1000, 1).with_abort_on_error(true);

    let outcome = builder(client, config).build().unwrap().run().await.unwrap();

    assert_eq!(outcome.cause, TerminationCause::FailFast);
    assert_eq!(outcome.statistics.total_requests(), 5);
    assert_eq!(outcome.statistics.total_failed_requests(), 1);
    assert_eq!(outcome.statistics.err_connect(), 1);
    assert_eq!(outcome.statistics.response_time_samples().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_run_time_limit() {
    let client = Arc::new(MockClient::new("mock://target").with_delay(Duration::from_millis(300)));
    let config = RunConfig::new(10_000, 2).with_time_limit_secs(1);

    let outcome = builder(client, config).build().unwrap().run().await.unwrap();

    assert_eq!(outcome.cause, TerminationCause::TimeLimit);
    assert!(outcome.statistics.total_requests() < 10_000);
    assert!(outcome.statistics.total_requests() <= outcome.pool.issued);
    assert!(outcome.statistics.total_execution_time() >= Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_run_interrupted() {
    let client = Arc::new(MockClient::new("mock://target").with_delay(Duration::from_millis(100)));
    let (interrupt_tx, interrupt_rx) = oneshot::channel();

    let orchestrator = builder(client, RunConfig::new(10_000, 2))
        .interrupt(interrupt::from_receiver(interrupt_rx))
        .build()
        .unwrap();

    let run = tokio::spawn(orchestrator.run());
    tokio::time::sleep(Duration::from_millis(450)).await;
    interrupt_tx.send(()).unwrap();

    let outcome = run.await.unwrap().unwrap();
    assert_eq!(outcome.cause, TerminationCause::Interrupted);
    assert!(outcome.statistics.total_requests() <= 10);
    assert!(outcome.statistics.total_execution_time() >= Duration::from_millis(450));
}
