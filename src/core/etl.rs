use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs extract, transform and load; returns the path of the page.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting zone map build");
        self.monitor.log_stats("Start");

        let source = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} boundaries and {} pricing rows",
            source.boundaries.len(),
            source.pricing.len()
        );
        self.monitor.log_stats("Extract");

        let result = self.pipeline.transform(source).await?;
        tracing::info!(
            "Merged {} areas ({} matched, {} unmatched, {} unclassified)",
            result.areas.len(),
            result.stats.matched,
            result.stats.unmatched,
            result.stats.unclassified
        );
        self.monitor.log_stats("Transform");

        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}
