// src/pipeline.rs
//! Pipeline seams and the linear run.
//!
//! Each trait describes a single capability so every stage can be exercised
//! in isolation; [`execute`] wires them into the run:
//! fetch → extract codes → resolve statuses → filter delivered → complete →
//! notify. Any unrecovered stage failure propagates and aborts the run — no
//! stage is retried.

use crate::delivery::{CompletionResult, Delivery};
use crate::error::AppError;
use crate::notify::Notification;
use crate::tracker::StatusMap;
use crate::types::{Cuid, TrackingCode};

/// Read and write access to the delivery-management API.
#[async_trait::async_trait]
pub trait DeliverySource {
    /// Lists the in-transit deliveries.
    async fn in_transit(&self) -> Result<Vec<Delivery>, AppError>;

    /// Marks the given cuids completed; returns the acknowledged subset.
    /// Completing an empty set must be a no-op with no network call.
    async fn complete(&self, cuids: &[Cuid]) -> Result<Vec<CompletionResult>, AppError>;
}

/// Resolves tracking codes to shipment statuses.
#[async_trait::async_trait]
pub trait StatusResolver {
    async fn resolve(&self, codes: &[TrackingCode]) -> StatusMap;
}

/// Delivers the run summary to its destination.
#[async_trait::async_trait]
pub trait RunNotifier {
    async fn notify(&self, report: &RunReport) -> Result<Notification, AppError>;
}

/// Everything the notification stage needs to know about a run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub deliveries: Vec<Delivery>,
    pub statuses: StatusMap,
    pub completed: Vec<CompletionResult>,
}

/// Terminal output of a successful run.
#[derive(Debug)]
pub struct RunSummary {
    pub in_transit: usize,
    pub completed: usize,
    pub notification: Notification,
}

/// One tracking code per delivery, in input order.
pub fn extract_codes(deliveries: &[Delivery]) -> Vec<TrackingCode> {
    deliveries.iter().map(|d| d.tracking_code.clone()).collect()
}

/// Cuids of the deliveries whose resolved status is `DELIVERED`.
///
/// Every other status — `UNKNOWN` included — silently excludes the delivery
/// from completion; that is the filter policy, not an error.
pub fn select_delivered(deliveries: &[Delivery], statuses: &StatusMap) -> Vec<Cuid> {
    deliveries
        .iter()
        .filter(|d| {
            statuses
                .get(&d.tracking_code)
                .is_some_and(|status| status.is_delivered())
        })
        .map(|d| d.cuid.clone())
        .collect()
}

/// Runs the whole pipeline once. The notification stage runs exactly once,
/// after completion results are known.
pub async fn execute<S, R, N>(
    source: &S,
    resolver: &R,
    notifier: &N,
) -> Result<RunSummary, AppError>
where
    S: DeliverySource + Sync + ?Sized,
    R: StatusResolver + Sync + ?Sized,
    N: RunNotifier + Sync + ?Sized,
{
    let deliveries = source.in_transit().await?;
    log::info!("Found {} deliveries in transit", deliveries.len());

    let codes = extract_codes(&deliveries);
    let statuses = resolver.resolve(&codes).await;
    for (code, status) in &statuses {
        log::debug!("Status for {}: {}", code, status);
    }

    let delivered = select_delivered(&deliveries, &statuses);
    let completed = source.complete(&delivered).await?;
    log::info!("Completed {} deliveries", completed.len());

    let report = RunReport {
        deliveries,
        statuses,
        completed,
    };
    let notification = notifier.notify(&report).await?;
    log::info!("Summary sent to webhook");

    Ok(RunSummary {
        in_transit: report.deliveries.len(),
        completed: report.completed.len(),
        notification,
    })
}
