// src/config.rs
use crate::error::AppError;
use crate::types::{StatusSelector, TrackingUrlTemplate, ValidationError};
use std::env;
use url::Url;

/// Delivery API endpoint and credentials.
#[derive(Debug, Clone)]
pub struct DeliveryApiConfig {
    pub base_url: String,
    pub email: String,
    pub password: String,
}

/// Tracking-site lookup configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub url_template: TrackingUrlTemplate,
    pub status_selector: StatusSelector,
}

/// Resolved run configuration — validated and ready to drive all stages.
///
/// The automation has no CLI surface; everything comes from the environment
/// (the run is triggered by an external cron, not an operator).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: DeliveryApiConfig,
    pub tracker: TrackerConfig,
    pub webhook_url: Url,
}

impl AppConfig {
    /// Resolves a complete configuration from environment variables.
    ///
    /// Fails with `MissingConfiguration` naming the first absent variable;
    /// no network traffic happens before resolution succeeds.
    pub fn resolve() -> Result<Self, AppError> {
        let base_url = require("API_URL")?.trim_end_matches('/').to_string();
        let email = require("API_USER_EMAIL")?;
        let password = require("API_USER_PASSWORD")?;

        let url_template = TrackingUrlTemplate::new(require("TRACKING_URL")?)?;
        let status_selector = StatusSelector::new(require("TRACKING_STATUS_SELECTOR")?)?;

        let webhook_raw = require("SLACK_WEBHOOK_URL")?;
        let webhook_url = Url::parse(&webhook_raw).map_err(|err| {
            ValidationError::InvalidWebhookUrl {
                url: webhook_raw,
                reason: err.to_string(),
            }
        })?;

        Ok(AppConfig {
            api: DeliveryApiConfig {
                base_url,
                email,
                password,
            },
            tracker: TrackerConfig {
                url_template,
                status_selector,
            },
            webhook_url,
        })
    }
}

fn require(name: &str) -> Result<String, AppError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::MissingConfiguration(format!(
            "{} environment variable not set",
            name
        ))),
    }
}

/// Verbosity comes from the environment too (`VERBOSE=1`).
pub fn verbose_from_env() -> bool {
    matches!(
        env::var("VERBOSE").ok().as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "true" | "yes")
    )
}
