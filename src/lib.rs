// src/lib.rs
//! track2slack library — reconciles in-transit deliveries against carrier
//! tracking pages and reports to Slack.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `AppError`, `DeliveryErrorCode`, `ValidationError`
//! - **Configuration** — `AppConfig` and the per-collaborator configs
//! - **Domain model** — `Delivery`, `CompletionResult`, `PackageStatus`
//! - **Delivery API client** — `DeliveryHttpClient`
//! - **Tracking** — `PackageTracker`, `StatusMap`, `TrackedEvent`
//! - **Notification** — `NotificationService`, `compose_message`
//! - **Pipeline** — the stage traits and `pipeline::execute`

// Internal modules — must match what's in main.rs
mod config;
mod delivery;
mod error;
mod notify;
mod pipeline;
mod tracker;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, DeliveryErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{verbose_from_env, AppConfig, DeliveryApiConfig, TrackerConfig};

// --- Domain Types ---
pub use crate::types::{
    Cuid, StatusSelector, TrackingCode, TrackingUrlTemplate, TRACKING_CODE_PLACEHOLDER,
};

// --- Domain Model ---
pub use crate::delivery::{CompletionResult, Delivery, DeliveryItem};

// --- Delivery API Client ---
pub use crate::delivery::DeliveryHttpClient;

// --- Tracking ---
pub use crate::tracker::{
    extract_first_match, PackageStatus, PackageTracker, StatusMap, TrackedEvent,
};

// --- Notification ---
pub use crate::notify::{compose_message, count_statuses, Notification, NotificationService, WebhookResponse};

// --- Pipeline ---
pub use crate::pipeline::{
    execute, extract_codes, select_delivered, DeliverySource, RunNotifier, RunReport, RunSummary,
    StatusResolver,
};
