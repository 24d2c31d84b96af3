use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("🚀 Starting order extraction");

        // Extract
        let phase = Instant::now();
        let pages = self.pipeline.extract().await?;
        tracing::info!("Extracted {} pages in {:?}", pages.len(), phase.elapsed());

        // Transform
        let phase = Instant::now();
        let result = self.pipeline.transform(pages).await?;
        tracing::info!(
            "Transformed into {} records / {} addresses ({} pages skipped) in {:?}",
            result.records.len(),
            result.listings.len(),
            result.skipped_pages.len(),
            phase.elapsed()
        );

        // Load
        let phase = Instant::now();
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to {} in {:?}", output_path, phase.elapsed());

        tracing::info!("✅ Finished in {:?}", started.elapsed());
        Ok(output_path)
    }
}
