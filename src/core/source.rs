use crate::config::ColumnConfig;
use crate::core::normalize::{normalize_key, normalize_text};
use crate::domain::model::{Boundary, PricingRow};
use crate::utils::error::{MapError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    r#type: String,
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    geometry: Option<serde_json::Value>,
    #[serde(default)]
    properties: Option<serde_json::Map<String, serde_json::Value>>,
}

const GEOMETRY_TYPES: [&str; 7] = [
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
    "GeometryCollection",
];

/// Type of a geometry object a map layer can draw: a known GeoJSON type with
/// its `coordinates` (or `geometries`) array present.
fn drawable_type(geometry: &serde_json::Value) -> Option<&str> {
    let kind = geometry.get("type")?.as_str()?;
    if !GEOMETRY_TYPES.contains(&kind) {
        return None;
    }
    let member = if kind == "GeometryCollection" {
        "geometries"
    } else {
        "coordinates"
    };
    geometry.get(member)?.as_array()?;
    Some(kind)
}

/// Parses a GeoJSON FeatureCollection into suburb boundaries.
///
/// Only the postcode and suburb properties survive; features without a
/// drawable geometry are dropped.
pub fn load_boundaries(data: &[u8], columns: &ColumnConfig) -> Result<Vec<Boundary>> {
    let root: FeatureCollection = serde_json::from_slice(data)?;

    if root.r#type != "FeatureCollection" {
        return Err(MapError::BoundaryError {
            message: format!("expected a FeatureCollection, found '{}'", root.r#type),
        });
    }

    let total = root.features.len();
    let mut boundaries = Vec::with_capacity(total);
    let mut skipped = 0usize;

    for (index, feature) in root.features.into_iter().enumerate() {
        let geometry = match feature.geometry {
            Some(geometry) if !geometry.is_null() => geometry,
            _ => {
                tracing::warn!("Feature #{} has no geometry, skipping", index);
                skipped += 1;
                continue;
            }
        };

        match drawable_type(&geometry) {
            Some("Polygon") | Some("MultiPolygon") => {}
            Some(other) => tracing::warn!(
                "Feature #{} has geometry type {}, expected Polygon or MultiPolygon",
                index,
                other
            ),
            None => {
                tracing::warn!(
                    "Feature #{} has an invalid geometry ({:?}), skipping",
                    index,
                    geometry.get("type")
                );
                skipped += 1;
                continue;
            }
        }

        let properties = feature.properties.unwrap_or_default();
        let postcode = properties
            .get(&columns.boundary_postcode)
            .map(normalize_key)
            .unwrap_or_default();
        let suburb = properties
            .get(&columns.boundary_suburb)
            .map(normalize_key)
            .unwrap_or_default();

        if postcode.is_empty() && suburb.is_empty() {
            tracing::warn!(
                "Feature #{} has neither '{}' nor '{}', it will not match any price",
                index,
                columns.boundary_postcode,
                columns.boundary_suburb
            );
        }

        boundaries.push(Boundary {
            postcode,
            suburb,
            geometry,
        });
    }

    if total > 0 && boundaries.is_empty() {
        return Err(MapError::BoundaryError {
            message: format!("none of the {} features has a usable geometry", total),
        });
    }

    tracing::debug!(
        "Loaded {} boundaries ({} skipped)",
        boundaries.len(),
        skipped
    );
    Ok(boundaries)
}

/// Parses the pricing table. Cells are kept as text; the distance column is
/// classified later so that a malformed value degrades to the fallback tier
/// instead of aborting the run.
pub fn load_pricing(
    data: &[u8],
    columns: &ColumnConfig,
    source_name: &str,
) -> Result<Vec<PricingRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let position = |column: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == column)
            .ok_or_else(|| MapError::MissingColumnError {
                column: column.to_string(),
                source_name: source_name.to_string(),
            })
    };

    let postcode_idx = position(&columns.pricing_postcode)?;
    let suburb_idx = position(&columns.pricing_suburb)?;
    let distance_idx = position(&columns.distance)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let extra: BTreeMap<String, String> = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| ![postcode_idx, suburb_idx, distance_idx].contains(idx))
            .map(|(idx, header)| (header.to_string(), cell(idx).trim().to_string()))
            .collect();

        rows.push(PricingRow {
            postcode: normalize_text(cell(postcode_idx)),
            suburb: normalize_text(cell(suburb_idx)),
            distance: cell(distance_idx).trim().to_string(),
            extra,
        });
    }

    tracing::debug!("Loaded {} pricing rows from {}", rows.len(), source_name);
    Ok(rows)
}
