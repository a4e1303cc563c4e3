use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting feed export...");

        // Extract
        let extraction = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Extracted {} records from {} of {} sources",
            extraction.records.len(),
            extraction.source_count - extraction.failures.len(),
            extraction.source_count
        );
        for failure in &extraction.failures {
            tracing::warn!(
                "🔶 Source {} contributed no records: {} ({:?})",
                failure.source,
                failure.reason,
                failure.reason.category()
            );
        }

        // Transform
        let result = self.pipeline.transform(extraction).await?;
        tracing::info!(
            "🔄 Built table with {} rows x {} columns",
            result.table.rows.len(),
            result.table.header.len()
        );

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("💾 Output saved to: {}", output_path);

        Ok(output_path)
    }
}
