use crate::core::tier::{FeeTier, FALLBACK_COLOR, FALLBACK_FEE, FALLBACK_LABEL};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Join key shared by boundaries and pricing rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JoinKey {
    pub postcode: String,
    pub suburb: String,
}

/// One suburb polygon from the boundary file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boundary {
    pub postcode: String,
    pub suburb: String,
    /// Polygon or MultiPolygon, passed through untouched.
    pub geometry: serde_json::Value,
}

impl Boundary {
    pub fn key(&self) -> JoinKey {
        JoinKey {
            postcode: self.postcode.clone(),
            suburb: self.suburb.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRow {
    pub postcode: String,
    pub suburb: String,
    /// Distance cell as written in the table; parsed at classification time.
    pub distance: String,
    /// Every other column of the table, keyed by header.
    pub extra: BTreeMap<String, String>,
}

impl PricingRow {
    pub fn key(&self) -> JoinKey {
        JoinKey {
            postcode: self.postcode.clone(),
            suburb: self.suburb.clone(),
        }
    }
}

/// A boundary after the join, carrying its fee tier and display color.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneArea {
    pub boundary: Boundary,
    pub pricing: Option<PricingRow>,
    pub tier: Option<FeeTier>,
    pub search_key: String,
}

impl ZoneArea {
    pub fn postcode(&self) -> &str {
        &self.boundary.postcode
    }

    pub fn suburb(&self) -> &str {
        &self.boundary.suburb
    }

    pub fn distance(&self) -> &str {
        self.pricing.as_ref().map(|p| p.distance.as_str()).unwrap_or("")
    }

    pub fn distance_range(&self) -> &'static str {
        self.tier.map(FeeTier::label).unwrap_or(FALLBACK_LABEL)
    }

    pub fn fee(&self) -> &'static str {
        self.tier.map(FeeTier::fee).unwrap_or(FALLBACK_FEE)
    }

    pub fn fill_color(&self) -> &'static str {
        self.tier.map(FeeTier::color).unwrap_or(FALLBACK_COLOR)
    }

    /// Stable index of the zone in the page palette; the fallback sits last.
    pub fn zone_index(&self) -> usize {
        self.tier.map(FeeTier::index).unwrap_or(FeeTier::ALL.len())
    }
}

/// Counters reported after the merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub boundaries: usize,
    pub pricing_rows: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub unclassified: usize,
    pub duplicate_pricing_keys: usize,
    pub per_tier: [usize; 5],
}

/// Output of the extract phase.
#[derive(Debug, Clone, Default)]
pub struct SourceData {
    pub boundaries: Vec<Boundary>,
    pub pricing: Vec<PricingRow>,
}

/// Output of the transform phase.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub areas: Vec<ZoneArea>,
    pub stats: MergeStats,
}
