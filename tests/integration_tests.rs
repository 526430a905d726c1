use anyhow::Result;
use delivery_zone_map::config::{ColumnConfig, MapConfig, OutputConfig};
use delivery_zone_map::utils::validation::Validate;
use delivery_zone_map::{CliConfig, EtlEngine, LocalStorage, MapError, TomlConfig, ZoneMapPipeline};
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

const SUBURBS: &str = r#"{
  "type": "FeatureCollection",
  "name": "Suburbs_GDA2020",
  "features": [
    {"type": "Feature", "properties": {"postcode": 5000, "suburb": "Adelaide"},
     "geometry": {"type": "Polygon", "coordinates": [[[138.58, -34.92], [138.62, -34.92], [138.62, -34.94], [138.58, -34.94], [138.58, -34.92]]]}},
    {"type": "Feature", "properties": {"postcode": 5006, "suburb": "North Adelaide"},
     "geometry": {"type": "Polygon", "coordinates": [[[138.58, -34.90], [138.61, -34.90], [138.61, -34.92], [138.58, -34.92], [138.58, -34.90]]]}},
    {"type": "Feature", "properties": {"postcode": 5045, "suburb": "Glenelg"},
     "geometry": {"type": "Polygon", "coordinates": [[[138.50, -34.97], [138.53, -34.97], [138.53, -34.99], [138.50, -34.99], [138.50, -34.97]]]}},
    {"type": "Feature", "properties": {"postcode": 5108, "suburb": "Salisbury"},
     "geometry": {"type": "MultiPolygon", "coordinates": [[[[138.63, -34.75], [138.66, -34.75], [138.66, -34.77], [138.63, -34.77], [138.63, -34.75]]]]}},
    {"type": "Feature", "properties": {"postcode": 5112, "suburb": "Elizabeth"},
     "geometry": {"type": "Polygon", "coordinates": [[[138.66, -34.70], [138.69, -34.70], [138.69, -34.72], [138.66, -34.72], [138.66, -34.70]]]}},
    {"type": "Feature", "properties": {"postcode": 5173, "suburb": "Aldinga"},
     "geometry": {"type": "Polygon", "coordinates": [[[138.45, -35.27], [138.48, -35.27], [138.48, -35.29], [138.45, -35.29], [138.45, -35.27]]]}}
  ]
}"#;

const PRICING: &str = "postcode,suburb,Distance_to_32WrightCt_km,State\n\
5000,Adelaide,5,SA\n\
5006,North Adelaide,9.8,SA\n\
5045,Glenelg,15,SA\n\
5108,Salisbury,20,SA\n\
5112,Elizabeth,unknown,SA\n";

fn write_inputs(dir: &Path) -> (String, String) {
    let boundaries = dir.join("suburbs.geojson");
    let pricing = dir.join("pricing.csv");
    std::fs::write(&boundaries, SUBURBS).unwrap();
    std::fs::write(&pricing, PRICING).unwrap();
    (
        boundaries.to_str().unwrap().to_string(),
        pricing.to_str().unwrap().to_string(),
    )
}

fn cli_config(dir: &Path, formats: &[&str], bundle: bool) -> CliConfig {
    let (boundaries, pricing) = write_inputs(dir);
    CliConfig {
        boundaries,
        pricing,
        columns: ColumnConfig::default(),
        map: MapConfig::default(),
        outputs: OutputConfig {
            output_path: dir.join("site").to_str().unwrap().to_string(),
            output_formats: formats.iter().map(|f| f.to_string()).collect(),
            bundle,
            ..OutputConfig::default()
        },
        verbose: false,
        monitor: false,
    }
}

#[tokio::test]
async fn test_end_to_end_html_only() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = cli_config(temp_dir.path(), &["html"], false);
    assert!(config.validate().is_ok());

    let pipeline = ZoneMapPipeline::new(LocalStorage::default(), config);
    let engine = EtlEngine::new(pipeline);
    let output_path = engine.run().await?;

    assert!(output_path.ends_with("delivery_zone_map.html"));
    let html = std::fs::read_to_string(&output_path)?;

    assert!(html.contains("leaflet.js"));
    assert!(html.contains("\"search_key\":\"Glenelg 5045\""));
    assert!(html.contains("\"distance_range\":\"\\u003e 10 km and ≤ 15 km\""));
    assert!(html.contains("localStorage"));
    assert!(html.contains("exportCsv"));

    let site = temp_dir.path().join("site");
    assert!(!site.join("delivery_zone_map.csv").exists());
    assert!(!site.join("delivery_zone_map.zip").exists());
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_all_outputs() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = cli_config(temp_dir.path(), &["html", "csv", "geojson"], true);

    let pipeline = ZoneMapPipeline::new(LocalStorage::default(), config);
    let engine = EtlEngine::new_with_monitoring(pipeline, false);
    engine.run().await?;

    let site = temp_dir.path().join("site");
    let csv = std::fs::read_to_string(site.join("delivery_zone_map.csv"))?;
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 7);
    assert_eq!(lines[1], "5000,Adelaide,5,≤ 5 km,$6,#2ca02c");
    assert_eq!(lines[2], "5006,North Adelaide,9.8,> 5 km and ≤ 10 km,$6,#ffcc00");
    assert_eq!(lines[3], "5045,Glenelg,15,> 10 km and ≤ 15 km,$8,#ff7f0e");
    assert_eq!(lines[4], "5108,Salisbury,20,> 15 km and ≤ 20 km,$10,#d62728");
    assert_eq!(lines[5], "5112,Elizabeth,unknown,Unknown,N/A,#dddddd");
    assert_eq!(lines[6], "5173,Aldinga,,Unknown,N/A,#dddddd");

    let geojson: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(site.join("delivery_zone_map.geojson"))?)?;
    let features = geojson["features"].as_array().unwrap();
    assert_eq!(features.len(), 6);
    assert_eq!(features[0]["properties"]["State"], "SA");
    assert_eq!(features[3]["geometry"]["type"], "MultiPolygon");

    let zip_data = std::fs::read(site.join("delivery_zone_map.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    assert_eq!(archive.len(), 3);

    let mut csv_in_zip = String::new();
    archive
        .by_name("delivery_zone_map.csv")?
        .read_to_string(&mut csv_in_zip)?;
    assert_eq!(csv_in_zip, csv);
    Ok(())
}

#[tokio::test]
async fn test_missing_distance_column_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = cli_config(temp_dir.path(), &["html"], false);
    config.columns.distance = "km".to_string();

    let pipeline = ZoneMapPipeline::new(LocalStorage::default(), config);
    let err = EtlEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, MapError::MissingColumnError { .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(!temp_dir.path().join("site").exists());
    Ok(())
}

#[tokio::test]
async fn test_missing_input_file_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = cli_config(temp_dir.path(), &["html"], false);
    config.boundaries = temp_dir
        .path()
        .join("absent.geojson")
        .to_str()
        .unwrap()
        .to_string();

    let pipeline = ZoneMapPipeline::new(LocalStorage::default(), config);
    let err = EtlEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, MapError::IoError(_)));
    Ok(())
}

#[tokio::test]
async fn test_toml_config_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let (boundaries, pricing) = write_inputs(temp_dir.path());
    let output = temp_dir.path().join("toml-site");

    let config_content = format!(
        r#"
[pipeline]
name = "toml-e2e"

[source]
boundaries = "{}"
pricing = "{}"

[map]
title = "Test zones"
storage_key = "test-overrides"

[load]
output_path = "{}"
html_filename = "zones.html"
output_formats = ["html", "csv"]
"#,
        boundaries.replace('\\', "/"),
        pricing.replace('\\', "/"),
        output.to_str().unwrap().replace('\\', "/")
    );
    let config_path = temp_dir.path().join("zone-map.toml");
    tokio::fs::write(&config_path, config_content).await?;

    let config = TomlConfig::from_file(&config_path)?;
    config.validate()?;

    let pipeline = ZoneMapPipeline::new(LocalStorage::default(), config);
    let output_path = EtlEngine::new(pipeline).run().await?;

    let html = std::fs::read_to_string(&output_path)?;
    assert!(html.contains("<title>Test zones</title>"));
    assert!(html.contains("\"storageKey\":\"test-overrides\""));
    assert!(output.join("zones.csv").exists());
    Ok(())
}
