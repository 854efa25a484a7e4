// src/notify/mod.rs
//! Slack notification — composes the run summary and posts it to the
//! configured incoming webhook.
//!
//! Message composition is a pure function over the run report so the format
//! can be tested without a webhook on the other end.

use crate::error::AppError;
use crate::pipeline::{RunNotifier, RunReport};
use crate::tracker::{PackageStatus, StatusMap};
use crate::types::TrackingUrlTemplate;
use chrono::NaiveDate;
use indexmap::IndexMap;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(15);

/// Raw webhook answer, kept for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

/// The composed message plus the webhook's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub response: WebhookResponse,
}

/// Posts run summaries to a Slack incoming webhook.
pub struct NotificationService {
    webhook_url: Url,
    template: TrackingUrlTemplate,
    client: Client,
}

impl NotificationService {
    pub fn new(webhook_url: Url, template: TrackingUrlTemplate) -> Result<Self, AppError> {
        let client = Client::builder().timeout(WEBHOOK_TIMEOUT).build()?;
        Ok(Self {
            webhook_url,
            template,
            client,
        })
    }

    /// Composes the summary for today and sends it through the webhook.
    ///
    /// A transport failure or non-2xx answer is `AppError::Notify` — terminal
    /// for the run, no retry.
    pub async fn notify(&self, report: &RunReport) -> Result<Notification, AppError> {
        let today = chrono::Local::now().date_naive();
        let message = compose_message(report, &self.template, today);

        log::debug!("POST {}", self.webhook_url);
        let response = self
            .client
            .post(self.webhook_url.clone())
            .json(&serde_json::json!({ "text": message }))
            .send()
            .await
            .map_err(|err| AppError::Notify(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| AppError::Notify(err.to_string()))?;

        if !status.is_success() {
            return Err(AppError::Notify(format!(
                "webhook answered {}: {}",
                status, body
            )));
        }
        log::info!("Message sent to Slack ({} chars)", message.len());

        Ok(Notification {
            message,
            response: WebhookResponse {
                status: status.as_u16(),
                body,
            },
        })
    }
}

#[async_trait::async_trait]
impl RunNotifier for NotificationService {
    async fn notify(&self, report: &RunReport) -> Result<Notification, AppError> {
        NotificationService::notify(self, report).await
    }
}

/// Groups the status map by status value, in first-seen order.
pub fn count_statuses(statuses: &StatusMap) -> IndexMap<PackageStatus, usize> {
    let mut counts = IndexMap::new();
    for status in statuses.values() {
        *counts.entry(*status).or_insert(0) += 1;
    }
    counts
}

/// Builds the summary text: date, in-transit total, one count line per
/// distinct status, then one line per auto-completed delivery with its
/// tracking link.
pub fn compose_message(
    report: &RunReport,
    template: &TrackingUrlTemplate,
    date: NaiveDate,
) -> String {
    let count_lines = count_statuses(&report.statuses)
        .into_iter()
        .map(|(status, count)| format!("{} - {} packages", status, count));

    let completed_lines = report.completed.iter().map(|completed| {
        format!(
            "Cuid: {} - {} - {}",
            completed.cuid,
            completed.item.name,
            template.render(&completed.tracking_code)
        )
    });

    let mut lines = vec![
        format!(":calendar: {}\n", date.format("%d %B %Y")),
        format!("We have {} :package: in shipping\n", report.deliveries.len()),
        format!("I found out in {} that:", template.site()),
    ];
    lines.extend(count_lines);
    lines.push(String::new());
    lines.push(format!(
        "And also I have auto completed {} :package: deliveries:\n",
        report.completed.len()
    ));
    lines.extend(completed_lines);

    lines.join("\n")
}
