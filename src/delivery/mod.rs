// src/delivery/mod.rs
//! Delivery-management API interaction.
//!
//! The domain records here are created by the delivery API and are read-only
//! to this system; unknown `item` fields are carried along rather than
//! rejected. The HTTP client lives in [`client`].

pub mod client;

use crate::types::{Cuid, TrackingCode};
use serde::{Deserialize, Serialize};

pub use client::DeliveryHttpClient;

/// The shipped item attached to a delivery. The API sends more fields than
/// we use; everything beyond `name` is preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryItem {
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DeliveryItem {
    #[allow(dead_code)] // Test constructor, exercised through the library API
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// A delivery record fetched from the in-transit collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub cuid: Cuid,
    pub tracking_code: TrackingCode,
    pub item: DeliveryItem,
}

/// A completion acknowledged by the delivery API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResult {
    pub cuid: Cuid,
    pub tracking_code: TrackingCode,
    pub item: DeliveryItem,
}
