// src/tracker/status.rs
//! Shipment status vocabulary and normalization.

use std::fmt;

/// Status of one tracked shipment, computed fresh each run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageStatus {
    Delivered,
    InTransit,
    OutForDelivery,
    PickUp,
    Undelivered,
    Expired,
    NotFound,
    Unknown,
}

/// Known status substrings, checked in order against the lowercased scrape.
///
/// "undelivered" must precede "delivered" — the latter is a substring of the
/// former.
const STATUS_PATTERNS: &[(&str, PackageStatus)] = &[
    ("undelivered", PackageStatus::Undelivered),
    ("out for delivery", PackageStatus::OutForDelivery),
    ("delivered", PackageStatus::Delivered),
    ("pick up", PackageStatus::PickUp),
    ("pickup", PackageStatus::PickUp),
    ("in transit", PackageStatus::InTransit),
    ("transit", PackageStatus::InTransit),
    ("expired", PackageStatus::Expired),
    ("not found", PackageStatus::NotFound),
];

impl PackageStatus {
    /// Normalizes free-text scraped from a tracking page.
    ///
    /// Unrecognized text maps to `Unknown`, never to an error — one malformed
    /// page must not abort the batch.
    pub fn normalize(raw: &str) -> Self {
        let text = raw.trim().to_lowercase();
        for (pattern, status) in STATUS_PATTERNS {
            if text.contains(pattern) {
                return *status;
            }
        }
        PackageStatus::Unknown
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, PackageStatus::Delivered)
    }
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Delivered => "DELIVERED",
            Self::InTransit => "IN_TRANSIT",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::PickUp => "PICK_UP",
            Self::Undelivered => "UNDELIVERED",
            Self::Expired => "EXPIRED",
            Self::NotFound => "NOT_FOUND",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{}", label)
    }
}
