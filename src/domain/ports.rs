use crate::config::{ColumnConfig, MapConfig, OutputConfig};
use crate::domain::model::{SourceData, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn boundaries_path(&self) -> &str;
    fn pricing_path(&self) -> &str;
    fn columns(&self) -> &ColumnConfig;
    fn map(&self) -> &MapConfig;
    fn outputs(&self) -> &OutputConfig;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceData>;
    async fn transform(&self, data: SourceData) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
