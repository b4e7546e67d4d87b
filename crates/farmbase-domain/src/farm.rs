//! Farm domain types.

use serde::{Deserialize, Serialize};

/// Farm review lifecycle status.
///
/// Stored in the database as the SCREAMING_SNAKE_CASE string. New farms
/// always start as `PendingApproval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FarmStatus {
    PendingApproval,
    Approved,
    Rejected,
}

impl FarmStatus {
    /// Parse from the stored string value. Returns `None` for unknown values.
    pub fn from_str_value(v: &str) -> Option<Self> {
        match v {
            "PENDING_APPROVAL" => Some(Self::PendingApproval),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Stored string value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PendingApproval => "PENDING_APPROVAL",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

/// Geographic point in WGS 84, `[longitude, latitude]` order as in GeoJSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    /// GeoJSON-style coordinate pair.
    pub fn coordinates(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// One farmers-market sales entry (market name + operating times).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSalesEntry {
    pub market: String,
    pub times: String,
}
