use crate::core::report::render_summary;
use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
    print_summary: bool,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
            print_summary: true,
        }
    }

    /// 關閉終端機摘要 (測試或只需要檔案輸出時)
    pub fn quiet(mut self) -> Self {
        self.print_summary = false;
        self
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting sales analysis");

        // Extract
        tracing::info!("📥 Loading sales data...");
        let records = self.pipeline.extract().await?;
        tracing::info!("Loaded {} sales records", records.len());
        self.monitor.log_stats("Extract");

        // Transform
        tracing::info!("🔄 Analyzing top sellers, discounts and inventory...");
        let report = self.pipeline.transform(records).await?;
        tracing::info!(
            "Analyzed {} top items across {} scenarios",
            report.top_sellers.len(),
            report.simulations.len()
        );
        self.monitor.log_stats("Transform");

        if self.print_summary {
            println!("{}", render_summary(&report));
        }

        // Load
        tracing::info!("💾 Writing report outputs...");
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}
