pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod html;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;
pub use core::{etl::EtlEngine, tier::FeeTier, ZoneMapPipeline};
pub use utils::error::{MapError, Result};
