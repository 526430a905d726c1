use crate::domain::model::ZoneArea;
use crate::utils::error::{MapError, Result};
use serde_json::{json, Map, Value};
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

const CSV_HEADER: [&str; 6] = [
    "postcode",
    "suburb",
    "distance_km",
    "distance_range",
    "fee",
    "fill_color",
];

/// Properties attached to every feature; extra pricing columns never
/// overwrite these.
const RESERVED_PROPERTIES: [&str; 8] = [
    "postcode",
    "suburb",
    "distance_km",
    "distance_range",
    "fee",
    "fill_color",
    "search_key",
    "zone",
];

/// Area → zone table, one row per boundary.
pub fn zone_csv(areas: &[ZoneArea]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for area in areas {
        writer.write_record([
            area.postcode(),
            area.suburb(),
            area.distance(),
            area.distance_range(),
            area.fee(),
            area.fill_color(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| MapError::ProcessingError {
            message: format!("failed to flush CSV writer: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| MapError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

/// String-only properties for one area, as embedded in the page.
pub fn feature_properties(area: &ZoneArea) -> Map<String, Value> {
    let mut properties = Map::new();

    if let Some(pricing) = &area.pricing {
        for (key, value) in &pricing.extra {
            if !RESERVED_PROPERTIES.contains(&key.as_str()) {
                properties.insert(key.clone(), Value::String(value.clone()));
            }
        }
    }

    properties.insert("postcode".into(), area.postcode().into());
    properties.insert("suburb".into(), area.suburb().into());
    properties.insert("distance_km".into(), area.distance().into());
    properties.insert("distance_range".into(), area.distance_range().into());
    properties.insert("fee".into(), area.fee().into());
    properties.insert("fill_color".into(), area.fill_color().into());
    properties.insert("search_key".into(), area.search_key.clone().into());
    properties.insert("zone".into(), area.zone_index().to_string().into());
    properties
}

pub fn feature_collection(areas: &[ZoneArea]) -> Value {
    let features: Vec<Value> = areas
        .iter()
        .map(|area| {
            json!({
                "type": "Feature",
                "properties": feature_properties(area),
                "geometry": area.boundary.geometry,
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

pub fn merged_geojson(areas: &[ZoneArea]) -> Result<String> {
    Ok(serde_json::to_string(&feature_collection(areas))?)
}

/// Packs `(name, bytes)` pairs into an in-memory ZIP archive.
pub fn bundle(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for (name, data) in files {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(data)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::merge::merge;
    use crate::domain::model::{Boundary, PricingRow};
    use std::collections::BTreeMap;
    use std::io::Read;

    fn sample_areas() -> Vec<ZoneArea> {
        let boundaries = vec![
            Boundary {
                postcode: "5000".to_string(),
                suburb: "Adelaide".to_string(),
                geometry: json!({"type": "Polygon", "coordinates": []}),
            },
            Boundary {
                postcode: "5950".to_string(),
                suburb: "Export Park, SA".to_string(),
                geometry: json!({"type": "Polygon", "coordinates": []}),
            },
        ];
        let mut extra = BTreeMap::new();
        extra.insert("State".to_string(), "SA".to_string());
        extra.insert("fee".to_string(), "should not leak".to_string());
        let pricing = vec![PricingRow {
            postcode: "5000".to_string(),
            suburb: "Adelaide".to_string(),
            distance: "12.5".to_string(),
            extra,
        }];
        merge(boundaries, pricing).0
    }

    #[test]
    fn test_zone_csv_rows() {
        let csv = zone_csv(&sample_areas()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "postcode,suburb,distance_km,distance_range,fee,fill_color");
        assert_eq!(lines[1], "5000,Adelaide,12.5,> 10 km and ≤ 15 km,$8,#ff7f0e");
        // Commas in names are quoted by the writer.
        assert_eq!(lines[2], "5950,\"Export Park, SA\",,Unknown,N/A,#dddddd");
    }

    #[test]
    fn test_feature_properties_are_strings() {
        let areas = sample_areas();
        let properties = feature_properties(&areas[0]);

        assert!(properties.values().all(Value::is_string));
        assert_eq!(properties["State"], "SA");
        assert_eq!(properties["fee"], "$8");
        assert_eq!(properties["zone"], "2");
        assert_eq!(properties["search_key"], "Adelaide 5000");
    }

    #[test]
    fn test_merged_geojson_is_feature_collection() {
        let text = merged_geojson(&sample_areas()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"].as_array().unwrap().len(), 2);
        assert_eq!(value["features"][1]["properties"]["fill_color"], "#dddddd");
    }

    #[test]
    fn test_bundle_contains_files() {
        let files = vec![
            ("map.html".to_string(), b"<html></html>".to_vec()),
            ("map.csv".to_string(), b"postcode\n".to_vec()),
        ];
        let data = bundle(&files).unwrap();

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 2);
        let mut content = String::new();
        archive
            .by_name("map.html")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<html></html>");
    }
}
