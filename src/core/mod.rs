pub mod etl;
pub mod export;
pub mod merge;
pub mod normalize;
pub mod render;
pub mod source;
pub mod tier;

pub use crate::app::pipelines::zone_map_pipeline::ZoneMapPipeline;
pub use crate::domain::model::{SourceData, TransformResult, ZoneArea};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
