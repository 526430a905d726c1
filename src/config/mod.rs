pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::{MapError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_output_formats, validate_path,
    validate_range, Validate,
};
use serde::{Deserialize, Serialize};

pub const SUPPORTED_FORMATS: [&str; 3] = ["html", "csv", "geojson"];
pub const BOUNDARY_EXTENSIONS: [&str; 2] = ["geojson", "json"];
pub const PRICING_EXTENSIONS: [&str; 1] = ["csv"];

/// Names of the properties and columns the join reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
#[serde(default)]
pub struct ColumnConfig {
    /// Postcode property in the boundary file
    #[cfg_attr(feature = "cli", arg(long, default_value = "postcode"))]
    pub boundary_postcode: String,

    /// Suburb property in the boundary file
    #[cfg_attr(feature = "cli", arg(long, default_value = "suburb"))]
    pub boundary_suburb: String,

    /// Postcode column in the pricing table
    #[cfg_attr(feature = "cli", arg(long = "postcode-column", default_value = "postcode"))]
    pub pricing_postcode: String,

    /// Suburb column in the pricing table
    #[cfg_attr(feature = "cli", arg(long = "suburb-column", default_value = "suburb"))]
    pub pricing_suburb: String,

    /// Distance (km) column in the pricing table
    #[cfg_attr(
        feature = "cli",
        arg(long = "distance-column", default_value = "Distance_to_32WrightCt_km")
    )]
    pub distance: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            boundary_postcode: "postcode".to_string(),
            boundary_suburb: "suburb".to_string(),
            pricing_postcode: "postcode".to_string(),
            pricing_suburb: "suburb".to_string(),
            distance: "Distance_to_32WrightCt_km".to_string(),
        }
    }
}

impl Validate for ColumnConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("columns.boundary_postcode", &self.boundary_postcode)?;
        validate_non_empty_string("columns.boundary_suburb", &self.boundary_suburb)?;
        validate_non_empty_string("columns.pricing_postcode", &self.pricing_postcode)?;
        validate_non_empty_string("columns.pricing_suburb", &self.pricing_suburb)?;
        validate_non_empty_string("columns.distance", &self.distance)?;
        Ok(())
    }
}

/// How the page presents the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
#[serde(default)]
pub struct MapConfig {
    /// Page title
    #[cfg_attr(feature = "cli", arg(long, default_value = "Adelaide Shipping Zones"))]
    pub title: String,

    /// Name of the zone layer in the layer control
    #[cfg_attr(feature = "cli", arg(long, default_value = "Adelaide Shipping Zones"))]
    pub layer_name: String,

    #[cfg_attr(
        feature = "cli",
        arg(long, default_value_t = -34.93, allow_negative_numbers = true)
    )]
    pub center_lat: f64,

    #[cfg_attr(
        feature = "cli",
        arg(long, default_value_t = 138.6, allow_negative_numbers = true)
    )]
    pub center_lon: f64,

    #[cfg_attr(feature = "cli", arg(long, default_value_t = 12))]
    pub zoom: u8,

    /// Tile URL template
    #[cfg_attr(
        feature = "cli",
        arg(long, default_value = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png")
    )]
    pub tiles: String,

    #[cfg_attr(
        feature = "cli",
        arg(long, default_value = "&copy; OpenStreetMap contributors")
    )]
    pub attribution: String,

    #[cfg_attr(feature = "cli", arg(long, default_value_t = 0.6))]
    pub fill_opacity: f64,

    /// localStorage key holding manual recoloring
    #[cfg_attr(feature = "cli", arg(long, default_value = "delivery-zone-overrides"))]
    pub storage_key: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            title: "Adelaide Shipping Zones".to_string(),
            layer_name: "Adelaide Shipping Zones".to_string(),
            center_lat: -34.93,
            center_lon: 138.6,
            zoom: 12,
            tiles: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors".to_string(),
            fill_opacity: 0.6,
            storage_key: "delivery-zone-overrides".to_string(),
        }
    }
}

impl Validate for MapConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("map.title", &self.title)?;
        validate_non_empty_string("map.layer_name", &self.layer_name)?;
        validate_range("map.center_lat", self.center_lat, -90.0, 90.0)?;
        validate_range("map.center_lon", self.center_lon, -180.0, 180.0)?;
        validate_range("map.zoom", self.zoom, 0, 20)?;
        validate_non_empty_string("map.tiles", &self.tiles)?;
        validate_range("map.fill_opacity", self.fill_opacity, 0.0, 1.0)?;
        validate_non_empty_string("map.storage_key", &self.storage_key)?;
        Ok(())
    }
}

/// What gets written, and where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
#[serde(default)]
pub struct OutputConfig {
    #[cfg_attr(feature = "cli", arg(long, default_value = "./output"))]
    pub output_path: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "delivery_zone_map.html"))]
    pub html_filename: String,

    /// Outputs to write: html, csv, geojson
    #[cfg_attr(
        feature = "cli",
        arg(long = "formats", value_delimiter = ',', default_value = "html")
    )]
    pub output_formats: Vec<String>,

    /// Also pack every written file into a ZIP archive
    #[cfg_attr(feature = "cli", arg(long = "bundle"))]
    pub bundle: bool,

    #[cfg_attr(feature = "cli", arg(long, default_value = "delivery_zone_map.zip"))]
    pub bundle_filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            html_filename: "delivery_zone_map.html".to_string(),
            output_formats: vec!["html".to_string()],
            bundle: false,
            bundle_filename: "delivery_zone_map.zip".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn wants(&self, format: &str) -> bool {
        self.output_formats.iter().any(|f| f == format)
    }

    /// Path of `filename` inside the output directory.
    pub fn file_path(&self, filename: &str) -> String {
        std::path::Path::new(&self.output_path)
            .join(filename)
            .to_string_lossy()
            .into_owned()
    }

    /// Sibling of the HTML page with another extension.
    pub fn companion_filename(&self, extension: &str) -> String {
        std::path::Path::new(&self.html_filename)
            .with_extension(extension)
            .to_string_lossy()
            .into_owned()
    }
}

impl Validate for OutputConfig {
    fn validate(&self) -> Result<()> {
        validate_path("load.output_path", &self.output_path)?;
        validate_path("load.html_filename", &self.html_filename)?;
        validate_output_formats("load.output_formats", &self.output_formats, &SUPPORTED_FORMATS)?;
        // The page is the primary output; the other formats are companions.
        if !self.wants("html") {
            return Err(MapError::ConfigValidationError {
                field: "load.output_formats".to_string(),
                message: "the html page is always written, include 'html' in the list".to_string(),
            });
        }
        if self.bundle {
            validate_file_extension("load.bundle_filename", &self.bundle_filename, &["zip"])?;
        }
        Ok(())
    }
}

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_path("source.boundaries", config.boundaries_path())?;
    validate_file_extension("source.boundaries", config.boundaries_path(), &BOUNDARY_EXTENSIONS)?;
    validate_path("source.pricing", config.pricing_path())?;
    validate_file_extension("source.pricing", config.pricing_path(), &PRICING_EXTENSIONS)?;
    config.columns().validate()?;
    config.map().validate()?;
    config.outputs().validate()?;
    Ok(())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, clap::Parser)]
#[command(name = "delivery-zone-map")]
#[command(about = "Render delivery fee zones onto an interactive suburb map")]
pub struct CliConfig {
    /// Boundary file (GeoJSON FeatureCollection)
    #[arg(long)]
    pub boundaries: String,

    /// Pricing table (CSV with a distance column)
    #[arg(long)]
    pub pricing: String,

    #[command(flatten)]
    pub columns: ColumnConfig,

    #[command(flatten)]
    pub map: MapConfig,

    #[command(flatten)]
    pub outputs: OutputConfig,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn boundaries_path(&self) -> &str {
        &self.boundaries
    }

    fn pricing_path(&self) -> &str {
        &self.pricing
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

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
