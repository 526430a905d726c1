use clap::Parser;
use delivery_zone_map::config::toml_config::TomlConfig;
use delivery_zone_map::core::source::{load_boundaries, load_pricing};
use delivery_zone_map::core::{ConfigProvider, Storage};
use delivery_zone_map::utils::{logger, validation::Validate};
use delivery_zone_map::{EtlEngine, LocalStorage, ZoneMapPipeline};

#[derive(Parser)]
#[command(name = "toml-map")]
#[command(about = "Build the delivery zone map from a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "zone-map.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the output directory from config
    #[arg(long)]
    output_path: Option<String>,

    /// Load and check the inputs without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based zone map build");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(output_path) = args.output_path.clone() {
        tracing::info!("🔧 Output path overridden to: {}", output_path);
        config.load.output_path = output_path;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    let storage = LocalStorage::default();

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        if let Err(e) = perform_dry_run(&storage, &config).await {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = ZoneMapPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Map generated: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Map build failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Pipeline: {}", config.pipeline_name());
    println!("  Boundaries: {}", config.boundaries_path());
    println!("  Pricing: {}", config.pricing_path());
    println!(
        "  Join: {}/{} ↔ {}/{}",
        config.columns.boundary_postcode,
        config.columns.boundary_suburb,
        config.columns.pricing_postcode,
        config.columns.pricing_suburb
    );
    println!("  Distance column: {}", config.columns.distance);
    println!(
        "  Map: {} @ ({}, {}) zoom {}",
        config.map.title, config.map.center_lat, config.map.center_lon, config.map.zoom
    );
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.load.output_formats.join(", "));
    if config.load.bundle {
        println!("  Bundle: {}", config.load.bundle_filename);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

/// Loads and joins the inputs through the same storage the real run uses.
async fn perform_dry_run<S: Storage>(storage: &S, config: &TomlConfig) -> anyhow::Result<()> {
    use anyhow::Context;

    let raw = storage
        .read_file(config.boundaries_path())
        .await
        .with_context(|| format!("reading {}", config.boundaries_path()))?;
    let boundaries = load_boundaries(&raw, config.columns())?;

    let raw = storage
        .read_file(config.pricing_path())
        .await
        .with_context(|| format!("reading {}", config.pricing_path()))?;
    let pricing = load_pricing(&raw, config.columns(), config.pricing_path())?;

    let (_, stats) = delivery_zone_map::core::merge::merge(boundaries, pricing);

    println!("🔍 Dry Run Analysis:");
    println!("  Boundaries: {}", stats.boundaries);
    println!("  Pricing rows: {}", stats.pricing_rows);
    println!("  Matched: {}", stats.matched);
    println!("  Unmatched (fallback color): {}", stats.unmatched);
    println!("  Non-numeric distance: {}", stats.unclassified);
    if stats.duplicate_pricing_keys > 0 {
        println!("  Duplicate pricing keys: {}", stats.duplicate_pricing_keys);
    }
    for tier in delivery_zone_map::FeeTier::ALL {
        println!(
            "  {:<22} {:>4}  {}",
            tier.label(),
            stats.per_tier[tier.index()],
            tier.fee()
        );
    }

    println!();
    println!("✅ Dry run complete. Remove --dry-run to write the map.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
[source]
boundaries = "suburbs.geojson"
pricing = "pricing.csv"
"#;

    #[tokio::test]
    async fn test_dry_run_reads_through_storage_base() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("suburbs.geojson"),
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"postcode": 5000, "suburb": "Adelaide"},
                 "geometry": {"type": "Polygon", "coordinates": []}}
            ]}"#,
        )
        .unwrap();
        std::fs::write(
            temp_dir.path().join("pricing.csv"),
            "postcode,suburb,Distance_to_32WrightCt_km\n5000,Adelaide,3\n",
        )
        .unwrap();

        let config = TomlConfig::from_toml_str(CONFIG).unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        assert!(perform_dry_run(&storage, &config).await.is_ok());

        let elsewhere = LocalStorage::new(temp_dir.path().join("elsewhere"));
        assert!(perform_dry_run(&elsewhere, &config).await.is_err());
    }
}
