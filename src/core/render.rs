use crate::config::MapConfig;
use crate::core::export::feature_collection;
use crate::core::tier::{FeeTier, FALLBACK_COLOR, FALLBACK_FEE, FALLBACK_LABEL};
use crate::domain::model::ZoneArea;
use crate::html::ZONE_MAP_HTML;
use crate::utils::error::{MapError, Result};
use chrono::{DateTime, Utc};
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::HashMap;

pub const SEARCH_PLACEHOLDER: &str = "Search suburb or postcode";
pub const EXPORT_FILENAME: &str = "delivery_zones.csv";

#[derive(Debug, Serialize)]
struct ZoneEntry {
    label: &'static str,
    fee: &'static str,
    color: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageConfig<'a> {
    center: [f64; 2],
    zoom: u8,
    tiles: &'a str,
    attribution: &'a str,
    fill_opacity: f64,
    storage_key: &'a str,
    layer_name: &'a str,
    search_placeholder: &'static str,
    export_filename: &'static str,
    generated_at: String,
    /// The five tiers in order, then the fallback.
    zones: Vec<ZoneEntry>,
}

fn zone_entries() -> Vec<ZoneEntry> {
    FeeTier::ALL
        .iter()
        .map(|tier| ZoneEntry {
            label: tier.label(),
            fee: tier.fee(),
            color: tier.color(),
        })
        .chain(std::iter::once(ZoneEntry {
            label: FALLBACK_LABEL,
            fee: FALLBACK_FEE,
            color: FALLBACK_COLOR,
        }))
        .collect()
}

/// Serializes `value` for inclusion inside a `<script>` element.
///
/// `<`, `>` and `&` only ever occur inside JSON strings, where the `\u` escape
/// is equivalent, so no payload can close the script tag.
pub fn script_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029"))
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Replaces `__NAME__` tokens in one pass, so substituted text is never
/// scanned again. Unknown tokens are an error.
fn fill_template(template: &str, values: &HashMap<&str, String>) -> Result<String> {
    let re = Regex::new(r"__([A-Z](?:[A-Z_]*[A-Z])?)__").map_err(|e| MapError::RenderError {
        message: format!("invalid template pattern: {}", e),
    })?;

    let mut missing = Vec::new();
    let filled = re.replace_all(template, |caps: &Captures| match values.get(&caps[1]) {
        Some(value) => value.clone(),
        None => {
            missing.push(caps[1].to_string());
            caps[0].to_string()
        }
    });

    if !missing.is_empty() {
        return Err(MapError::RenderError {
            message: format!("template tokens without a value: {}", missing.join(", ")),
        });
    }
    Ok(filled.into_owned())
}

/// Renders the standalone page for `areas`.
pub fn render_page(
    areas: &[ZoneArea],
    map: &MapConfig,
    generated_at: DateTime<Utc>,
) -> Result<String> {
    let page_config = PageConfig {
        center: [map.center_lat, map.center_lon],
        zoom: map.zoom,
        tiles: &map.tiles,
        attribution: &map.attribution,
        fill_opacity: map.fill_opacity,
        storage_key: &map.storage_key,
        layer_name: &map.layer_name,
        search_placeholder: SEARCH_PLACEHOLDER,
        export_filename: EXPORT_FILENAME,
        generated_at: generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        zones: zone_entries(),
    };

    let mut values = HashMap::new();
    values.insert("TITLE", escape_html(&map.title));
    values.insert("CONFIG_JSON", script_json(&page_config)?);
    values.insert("DATA_JSON", script_json(&feature_collection(areas))?);

    let page = fill_template(ZONE_MAP_HTML, &values)?;
    tracing::debug!("Rendered page for {} areas ({} bytes)", areas.len(), page.len());
    Ok(page)
}
