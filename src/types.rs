// src/types.rs
//! Validated domain types.
//!
//! Identifiers and configuration values arrive as raw strings (API payloads,
//! environment variables); the newtypes here validate them once at the
//! boundary so the rest of the crate can rely on their shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Validation failures for domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid cuid: {0}")]
    InvalidCuid(String),

    #[error("Invalid tracking code: {0}")]
    InvalidTrackingCode(String),

    #[error("Tracking URL template must contain the {{trackingCode}} placeholder: {0}")]
    MissingPlaceholder(String),

    #[error("Invalid status selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid webhook URL '{url}': {reason}")]
    InvalidWebhookUrl { url: String, reason: String },
}

/// Unique identifier of a delivery record in the delivery-management system.
///
/// Cuids are minted by the delivery API; this type only checks that the value
/// is non-empty and contains no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cuid(String);

#[allow(dead_code)] // Constructors used by lib consumers and tests, not the bin target
impl Cuid {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() || value.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidCuid(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Carrier-assigned code used to query shipment status on the tracking site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackingCode(String);

impl TrackingCode {
    #[allow(dead_code)] // Used by lib consumers and tests, not the bin target
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ValidationError::InvalidTrackingCode(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Placeholder the tracking URL template must carry.
pub const TRACKING_CODE_PLACEHOLDER: &str = "{trackingCode}";

/// URL template for the tracking site, e.g.
/// `https://t.17track.net/en#nums={trackingCode}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingUrlTemplate(String);

impl TrackingUrlTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self, ValidationError> {
        let template = template.into();
        if !template.contains(TRACKING_CODE_PLACEHOLDER) {
            return Err(ValidationError::MissingPlaceholder(template));
        }
        Ok(Self(template))
    }

    /// Substitutes a tracking code into the template.
    pub fn render(&self, code: &TrackingCode) -> String {
        self.0.replace(TRACKING_CODE_PLACEHOLDER, code.as_str())
    }

    /// The tracking site origin (`scheme://host`), used in the notification
    /// intro line. Falls back to the raw template when the template does not
    /// parse as a URL.
    pub fn site(&self) -> String {
        let stripped = self.0.replace(TRACKING_CODE_PLACEHOLDER, "");
        match Url::parse(&stripped) {
            Ok(url) => match url.host_str() {
                Some(host) => format!("{}://{}", url.scheme(), host),
                None => self.0.clone(),
            },
            Err(_) => self.0.clone(),
        }
    }

    #[allow(dead_code)] // Used by lib consumers and tests, not the bin target
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// CSS selector locating the status text on a tracking page.
///
/// Parse-validated at construction so a typo in `TRACKING_STATUS_SELECTOR`
/// fails the run before any page is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSelector(String);

impl StatusSelector {
    pub fn new(selector: impl Into<String>) -> Result<Self, ValidationError> {
        let selector = selector.into();
        scraper::Selector::parse(&selector).map_err(|err| ValidationError::InvalidSelector {
            selector: selector.clone(),
            reason: err.to_string(),
        })?;
        Ok(Self(selector))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatusSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
