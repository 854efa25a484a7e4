// tests/integration/pipeline.rs
//! End-to-end pipeline runs against in-memory stage implementations.

use crate::common;
use async_trait::async_trait;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::sync::Mutex;
use track2slack::{
    compose_message, execute, AppError, CompletionResult, Cuid, Delivery, DeliveryHttpClient,
    DeliverySource, Notification, PackageStatus, RunNotifier, RunReport, StatusMap,
    StatusResolver, TrackingCode, WebhookResponse,
};

struct StubSource {
    deliveries: Vec<Delivery>,
    complete_calls: Mutex<Vec<Vec<Cuid>>>,
}

impl StubSource {
    fn new(deliveries: Vec<Delivery>) -> Self {
        Self {
            deliveries,
            complete_calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Vec<Cuid>> {
        self.complete_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliverySource for StubSource {
    async fn in_transit(&self) -> Result<Vec<Delivery>, AppError> {
        Ok(self.deliveries.clone())
    }

    async fn complete(&self, cuids: &[Cuid]) -> Result<Vec<CompletionResult>, AppError> {
        self.complete_calls.lock().unwrap().push(cuids.to_vec());
        // The real API is idempotent: acknowledging a cuid twice is a no-op.
        Ok(self
            .deliveries
            .iter()
            .filter(|d| cuids.contains(&d.cuid))
            .map(common::completion)
            .collect())
    }
}

struct StubResolver {
    statuses: StatusMap,
}

#[async_trait]
impl StatusResolver for StubResolver {
    async fn resolve(&self, codes: &[TrackingCode]) -> StatusMap {
        codes
            .iter()
            .map(|code| {
                let status = self
                    .statuses
                    .get(code)
                    .copied()
                    .unwrap_or(PackageStatus::Unknown);
                (code.clone(), status)
            })
            .collect()
    }
}

struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    fn sent(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl RunNotifier for RecordingNotifier {
    async fn notify(&self, report: &RunReport) -> Result<Notification, AppError> {
        let date = NaiveDate::from_ymd_opt(2023, 5, 4).expect("valid test date");
        let message = compose_message(report, &common::template(), date);
        self.messages.lock().unwrap().push(message.clone());
        Ok(Notification {
            message,
            response: WebhookResponse {
                status: 200,
                body: "ok".to_string(),
            },
        })
    }
}

fn code(value: &str) -> TrackingCode {
    TrackingCode::new(value).expect("valid test code")
}

#[tokio::test]
async fn delivered_shipments_are_completed_and_summarized() {
    let source = StubSource::new(vec![
        common::delivery("c1", "T1", "Socks"),
        common::delivery("c2", "T2", "Mug"),
    ]);
    let resolver = StubResolver {
        statuses: [
            (code("T1"), PackageStatus::Delivered),
            (code("T2"), PackageStatus::InTransit),
        ]
        .into_iter()
        .collect(),
    };
    let notifier = RecordingNotifier::new();

    let summary = execute(&source, &resolver, &notifier)
        .await
        .expect("run should succeed");

    assert_eq!(summary.in_transit, 2);
    assert_eq!(summary.completed, 1);

    // Completion received exactly the delivered cuid, nothing else.
    let calls = source.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], vec![Cuid::new("c1").unwrap()]);

    // The notification ran exactly once, after completion.
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("DELIVERED - 1 packages"));
    assert!(sent[0].contains("IN_TRANSIT - 1 packages"));
    assert!(sent[0].contains("Cuid: c1 - Socks - https://www.17track.net/en#nums=T1"));
    assert!(!sent[0].contains("Mug -"));
}

#[tokio::test]
async fn unknown_statuses_never_complete_anything() {
    let source = StubSource::new(vec![common::delivery("c1", "T1", "Socks")]);
    let resolver = StubResolver {
        statuses: StatusMap::new(),
    };
    let notifier = RecordingNotifier::new();

    let summary = execute(&source, &resolver, &notifier)
        .await
        .expect("run should succeed");

    assert_eq!(summary.completed, 0);
    assert_eq!(source.calls(), vec![Vec::<Cuid>::new()]);
    assert!(notifier.sent()[0].contains("UNKNOWN - 1 packages"));
}

#[tokio::test]
async fn completing_the_same_set_twice_acknowledges_the_same_set() {
    let source = StubSource::new(vec![
        common::delivery("c1", "T1", "Socks"),
        common::delivery("c2", "T2", "Mug"),
    ]);
    let cuids = vec![Cuid::new("c1").unwrap(), Cuid::new("c2").unwrap()];

    let first = source.complete(&cuids).await.expect("first call succeeds");
    let second = source.complete(&cuids).await.expect("second call succeeds");

    assert_eq!(first, second);
    assert_eq!(source.calls().len(), 2);
}

#[tokio::test]
async fn completing_an_empty_set_issues_no_network_call() {
    // Nothing listens on this port; any attempted request would fail.
    let client =
        DeliveryHttpClient::with_token("http://127.0.0.1:9", "token").expect("client builds");

    let completed = client
        .complete(&[])
        .await
        .expect("empty completion must not touch the network");

    assert!(completed.is_empty());
}
