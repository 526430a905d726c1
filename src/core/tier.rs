//! Delivery fee tiers keyed on straight-line distance from the depot.
//!
//! The intervals are half-open on the left: a distance sitting exactly on a
//! boundary (5, 10, 15 or 20 km) belongs to the lower tier.

use serde::{Deserialize, Serialize};

pub const FALLBACK_LABEL: &str = "Unknown";
pub const FALLBACK_FEE: &str = "N/A";
pub const FALLBACK_COLOR: &str = "#dddddd";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeeTier {
    UpTo5,
    UpTo10,
    UpTo15,
    UpTo20,
    Over20,
}

impl FeeTier {
    pub const ALL: [FeeTier; 5] = [
        FeeTier::UpTo5,
        FeeTier::UpTo10,
        FeeTier::UpTo15,
        FeeTier::UpTo20,
        FeeTier::Over20,
    ];

    /// Returns `None` for NaN; everything else lands in exactly one tier.
    pub fn classify(km: f64) -> Option<FeeTier> {
        if km.is_nan() {
            None
        } else if km <= 5.0 {
            Some(FeeTier::UpTo5)
        } else if km <= 10.0 {
            Some(FeeTier::UpTo10)
        } else if km <= 15.0 {
            Some(FeeTier::UpTo15)
        } else if km <= 20.0 {
            Some(FeeTier::UpTo20)
        } else {
            Some(FeeTier::Over20)
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FeeTier::UpTo5 => "≤ 5 km",
            FeeTier::UpTo10 => "> 5 km and ≤ 10 km",
            FeeTier::UpTo15 => "> 10 km and ≤ 15 km",
            FeeTier::UpTo20 => "> 15 km and ≤ 20 km",
            FeeTier::Over20 => "> 20 km",
        }
    }

    pub fn fee(self) -> &'static str {
        match self {
            FeeTier::UpTo5 | FeeTier::UpTo10 => "$6",
            FeeTier::UpTo15 => "$8",
            FeeTier::UpTo20 => "$10",
            FeeTier::Over20 => "$12",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            FeeTier::UpTo5 => "#2ca02c",
            FeeTier::UpTo10 => "#ffcc00",
            FeeTier::UpTo15 => "#ff7f0e",
            FeeTier::UpTo20 => "#d62728",
            FeeTier::Over20 => "#9467bd",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Classifies a raw distance cell. Blank or non-numeric text yields `None`.
pub fn classify_distance(raw: &str) -> Option<FeeTier> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().and_then(FeeTier::classify)
}
