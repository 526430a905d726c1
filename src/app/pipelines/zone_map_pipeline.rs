use crate::core::export::{bundle, merged_geojson, zone_csv};
use crate::core::merge::merge;
use crate::core::render::render_page;
use crate::core::source::{load_boundaries, load_pricing};
use crate::core::{ConfigProvider, Pipeline, SourceData, Storage, TransformResult};
use crate::utils::error::Result;
use chrono::Utc;

/// Boundaries + pricing table in, zone map page (and companions) out.
pub struct ZoneMapPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
}

impl<S: Storage, C: ConfigProvider> ZoneMapPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ZoneMapPipeline<S, C> {
    async fn extract(&self) -> Result<SourceData> {
        let columns = self.config.columns();

        tracing::info!("🔄 Loading boundaries from {}", self.config.boundaries_path());
        let raw = self.storage.read_file(self.config.boundaries_path()).await?;
        let boundaries = load_boundaries(&raw, columns)?;

        tracing::info!("🔄 Loading pricing table from {}", self.config.pricing_path());
        let raw = self.storage.read_file(self.config.pricing_path()).await?;
        let pricing = load_pricing(&raw, columns, self.config.pricing_path())?;

        Ok(SourceData {
            boundaries,
            pricing,
        })
    }

    async fn transform(&self, data: SourceData) -> Result<TransformResult> {
        tracing::info!(
            "🔗 Joining {} boundaries with {} pricing rows",
            data.boundaries.len(),
            data.pricing.len()
        );
        let (areas, stats) = merge(data.boundaries, data.pricing);

        if stats.unmatched > 0 {
            tracing::warn!(
                "{} of {} areas have no pricing row and use the fallback color",
                stats.unmatched,
                stats.boundaries
            );
        }
        if stats.unclassified > 0 {
            tracing::warn!(
                "{} matched areas have a non-numeric distance",
                stats.unclassified
            );
        }
        tracing::debug!("Areas per tier: {:?}", stats.per_tier);

        Ok(TransformResult { areas, stats })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let outputs = self.config.outputs();
        let mut written: Vec<(String, Vec<u8>)> = Vec::new();

        tracing::info!("🗺️ Rendering map page");
        let page = render_page(&result.areas, self.config.map(), Utc::now())?;
        written.push((outputs.html_filename.clone(), page.into_bytes()));

        if outputs.wants("csv") {
            let csv = zone_csv(&result.areas)?;
            written.push((outputs.companion_filename("csv"), csv.into_bytes()));
        }

        if outputs.wants("geojson") {
            let geojson = merged_geojson(&result.areas)?;
            written.push((outputs.companion_filename("geojson"), geojson.into_bytes()));
        }

        for (name, data) in &written {
            let path = outputs.file_path(name);
            self.storage.write_file(&path, data).await?;
            tracing::info!("💾 Wrote {}", path);
        }

        if outputs.bundle {
            let archive = bundle(&written)?;
            let path = outputs.file_path(&outputs.bundle_filename);
            tracing::debug!("Writing bundle ({} bytes, {} files)", archive.len(), written.len());
            self.storage.write_file(&path, &archive).await?;
            tracing::info!("📦 Wrote {}", path);
        }

        Ok(outputs.file_path(&outputs.html_filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnConfig, MapConfig, OutputConfig};
    use crate::utils::error::MapError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put(&self, path: &str, data: &str) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                MapError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        columns: ColumnConfig,
        map: MapConfig,
        outputs: OutputConfig,
    }

    impl MockConfig {
        fn new(formats: &[&str], bundle: bool) -> Self {
            Self {
                columns: ColumnConfig::default(),
                map: MapConfig::default(),
                outputs: OutputConfig {
                    output_path: "out".to_string(),
                    output_formats: formats.iter().map(|f| f.to_string()).collect(),
                    bundle,
                    ..OutputConfig::default()
                },
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn boundaries_path(&self) -> &str {
            "suburbs.geojson"
        }

        fn pricing_path(&self) -> &str {
            "pricing.csv"
        }

        fn columns(&self) -> &ColumnConfig {
            &self.columns
        }

        fn map(&self) -> &MapConfig {
            &self.map
        }

        fn outputs(&self) -> &OutputConfig {
            &self.outputs
        }
    }

    const SUBURBS: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"postcode": 5000, "suburb": "Adelaide"},
         "geometry": {"type": "Polygon", "coordinates": [[[138.59, -34.92], [138.61, -34.92], [138.59, -34.92]]]}},
        {"type": "Feature", "properties": {"postcode": 5112, "suburb": "Elizabeth"},
         "geometry": {"type": "Polygon", "coordinates": [[[138.66, -34.71], [138.68, -34.71], [138.66, -34.71]]]}},
        {"type": "Feature", "properties": {"postcode": 5400, "suburb": "Outback"},
         "geometry": {"type": "Polygon", "coordinates": [[[139.0, -34.5], [139.1, -34.5], [139.0, -34.5]]]}}
    ]}"#;

    const PRICING: &str = "postcode,suburb,Distance_to_32WrightCt_km\n\
                           5000,Adelaide,5\n\
                           5112,Elizabeth,22.4\n";

    async fn seeded_storage() -> MockStorage {
        let storage = MockStorage::new();
        storage.put("suburbs.geojson", SUBURBS).await;
        storage.put("pricing.csv", PRICING).await;
        storage
    }

    #[tokio::test]
    async fn test_extract_reads_both_sources() {
        let config = MockConfig::new(&["html"], false);
        let pipeline = ZoneMapPipeline::new(seeded_storage().await, config);

        let data = pipeline.extract().await.unwrap();

        assert_eq!(data.boundaries.len(), 3);
        assert_eq!(data.pricing.len(), 2);
        assert_eq!(data.boundaries[0].postcode, "5000");
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let pipeline = ZoneMapPipeline::new(MockStorage::new(), MockConfig::new(&["html"], false));
        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, MapError::IoError(_)));
    }

    #[tokio::test]
    async fn test_transform_classifies_and_counts() {
        let config = MockConfig::new(&["html"], false);
        let pipeline = ZoneMapPipeline::new(seeded_storage().await, config);

        let data = pipeline.extract().await.unwrap();
        let result = pipeline.transform(data).await.unwrap();

        assert_eq!(result.areas.len(), 3);
        assert_eq!(result.areas[0].fee(), "$6");
        assert_eq!(result.areas[1].fee(), "$12");
        assert_eq!(result.areas[2].fill_color(), "#dddddd");
        assert_eq!(result.stats.matched, 2);
        assert_eq!(result.stats.unmatched, 1);
    }

    #[tokio::test]
    async fn test_load_writes_requested_outputs() {
        let storage = seeded_storage().await;
        let config = MockConfig::new(&["html", "csv", "geojson"], true);
        let pipeline = ZoneMapPipeline::new(storage.clone(), config);

        let data = pipeline.extract().await.unwrap();
        let result = pipeline.transform(data).await.unwrap();
        let path = pipeline.load(result).await.unwrap();

        assert!(path.ends_with("delivery_zone_map.html"));
        let html = storage.get_file(&path).await.unwrap();
        assert!(String::from_utf8(html).unwrap().contains("Elizabeth 5112"));

        let outputs = OutputConfig {
            output_path: "out".to_string(),
            ..OutputConfig::default()
        };
        let csv_path = outputs.file_path("delivery_zone_map.csv");
        let csv = String::from_utf8(storage.get_file(&csv_path).await.unwrap()).unwrap();
        assert!(csv.contains("5112,Elizabeth,22.4,> 20 km,$12,#9467bd"));

        let bundle_path = outputs.file_path("delivery_zone_map.zip");
        let archive = storage.get_file(&bundle_path).await.unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(archive)).unwrap();
        assert_eq!(archive.len(), 3);
    }

    #[tokio::test]
    async fn test_load_html_only_by_default() {
        let storage = seeded_storage().await;
        let pipeline = ZoneMapPipeline::new(storage.clone(), MockConfig::new(&["html"], false));

        let data = pipeline.extract().await.unwrap();
        let result = pipeline.transform(data).await.unwrap();
        pipeline.load(result).await.unwrap();

        let files = storage.files.lock().await;
        // Two inputs plus the page.
        assert_eq!(files.len(), 3);
    }
}
