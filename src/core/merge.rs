use crate::core::tier::classify_distance;
use crate::domain::model::{Boundary, JoinKey, MergeStats, PricingRow, ZoneArea};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Left-joins boundaries with pricing rows on `(postcode, suburb)`.
///
/// Every boundary yields exactly one area, in input order. When the pricing
/// table repeats a key the first row wins.
pub fn merge(boundaries: Vec<Boundary>, pricing: Vec<PricingRow>) -> (Vec<ZoneArea>, MergeStats) {
    let mut stats = MergeStats {
        boundaries: boundaries.len(),
        pricing_rows: pricing.len(),
        ..MergeStats::default()
    };

    let mut by_key: HashMap<JoinKey, PricingRow> = HashMap::with_capacity(pricing.len());
    for row in pricing {
        match by_key.entry(row.key()) {
            Entry::Occupied(existing) => {
                tracing::warn!(
                    "Duplicate pricing row for {} {}, keeping distance {}",
                    existing.key().suburb,
                    existing.key().postcode,
                    existing.get().distance
                );
                stats.duplicate_pricing_keys += 1;
            }
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
        }
    }

    let areas: Vec<ZoneArea> = boundaries
        .into_iter()
        .map(|boundary| {
            let pricing = by_key.get(&boundary.key()).cloned();
            let tier = match &pricing {
                Some(row) => {
                    stats.matched += 1;
                    let tier = classify_distance(&row.distance);
                    if tier.is_none() {
                        tracing::debug!(
                            "Distance '{}' for {} {} is not a number",
                            row.distance,
                            boundary.suburb,
                            boundary.postcode
                        );
                        stats.unclassified += 1;
                    }
                    tier
                }
                None => {
                    stats.unmatched += 1;
                    None
                }
            };

            if let Some(tier) = tier {
                stats.per_tier[tier.index()] += 1;
            }

            let search_key = format!("{} {}", boundary.suburb, boundary.postcode);
            ZoneArea {
                boundary,
                pricing,
                tier,
                search_key,
            }
        })
        .collect();

    (areas, stats)
}
