// src/tracker/mod.rs
//! Package tracker — resolves tracking codes against the tracking website.
//!
//! Each code is one HTTP GET against the rendered template URL; the status
//! text is pulled out of the page with the configured CSS selector and
//! normalized into [`PackageStatus`]. Lookups fan out concurrently and each
//! one is an isolated failure domain: a dead page degrades that single code
//! to `UNKNOWN` instead of aborting the batch.

pub mod status;

use crate::config::TrackerConfig;
use crate::error::AppError;
use crate::pipeline::StatusResolver;
use crate::types::{StatusSelector, TrackingCode, TrackingUrlTemplate};
use futures::future::join_all;
use indexmap::IndexMap;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;

pub use status::PackageStatus;

/// Mapping from tracking code to resolved status, insertion-ordered.
pub type StatusMap = IndexMap<TrackingCode, PackageStatus>;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(20);

// The tracking site serves a stripped page to obvious bots.
const TRACKER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";

/// Emitted once per resolved code, as each resolution completes.
/// Observers must not assume any ordering across codes.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEvent {
    pub tracking_code: TrackingCode,
    pub status: PackageStatus,
}

type TrackedListener = Box<dyn Fn(&TrackedEvent) + Send + Sync>;

/// Resolves shipment statuses by scraping the tracking website.
pub struct PackageTracker {
    client: Client,
    template: TrackingUrlTemplate,
    selector: Selector,
    selector_source: StatusSelector,
    listeners: Vec<TrackedListener>,
}

impl PackageTracker {
    /// Builds a tracker; fails if the selector does not parse.
    pub fn new(config: &TrackerConfig) -> Result<Self, AppError> {
        let selector = parse_selector(&config.status_selector)?;
        let client = Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .user_agent(TRACKER_USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            template: config.url_template.clone(),
            selector,
            selector_source: config.status_selector.clone(),
            listeners: Vec::new(),
        })
    }

    /// Registers a listener for per-code tracked events.
    pub fn on_tracked(mut self, listener: impl Fn(&TrackedEvent) + Send + Sync + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Resolves every code to a status, concurrently.
    ///
    /// Infallible by design: per-code failures are logged and degraded to
    /// `Unknown`. The returned map carries one entry per distinct input code,
    /// in input order.
    pub async fn get_package_statuses(&self, codes: &[TrackingCode]) -> StatusMap {
        let lookups = codes.iter().map(|code| async move {
            let status = match self.lookup(code).await {
                Ok(status) => status,
                Err(err) => {
                    log::warn!("Tracking lookup for {} degraded to UNKNOWN: {}", code, err);
                    PackageStatus::Unknown
                }
            };
            self.emit(TrackedEvent {
                tracking_code: code.clone(),
                status,
            });
            (code.clone(), status)
        });

        join_all(lookups).await.into_iter().collect()
    }

    async fn lookup(&self, code: &TrackingCode) -> Result<PackageStatus, AppError> {
        let url = self.template.render(code);
        log::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body = response.text().await?;

        let raw = extract_first_match(&body, &self.selector).ok_or_else(|| {
            AppError::TrackingParse {
                tracking_code: code.to_string(),
                selector: self.selector_source.to_string(),
            }
        })?;
        Ok(PackageStatus::normalize(&raw))
    }

    fn emit(&self, event: TrackedEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }
}

#[async_trait::async_trait]
impl StatusResolver for PackageTracker {
    async fn resolve(&self, codes: &[TrackingCode]) -> StatusMap {
        self.get_package_statuses(codes).await
    }
}

fn parse_selector(selector: &StatusSelector) -> Result<Selector, AppError> {
    Selector::parse(selector.as_str())
        .map_err(|err| {
            crate::types::ValidationError::InvalidSelector {
                selector: selector.to_string(),
                reason: err.to_string(),
            }
            .into()
        })
}

/// Text of the first element matching `selector`, whitespace-collapsed.
/// `None` when nothing matches or the match is empty.
pub fn extract_first_match(html: &str, selector: &Selector) -> Option<String> {
    let document = Html::parse_document(html);
    let element = document.select(selector).next()?;
    let text = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
