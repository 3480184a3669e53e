use crate::core::aggregate::{revenue_per_item, top_selling_items, total_revenue};
use crate::core::chart::{render_consumption_chart, render_revenue_chart};
use crate::core::discount::{discounted_revenue_per_item, DiscountSchedule};
use crate::core::loader::parse_sales_csv;
use crate::core::report::{consumption_csv, revenue_csv, summary_json};
use crate::core::simulation::simulate_consumption;
use crate::core::{AnalysisReport, ConfigProvider, Pipeline, SaleRecord, Storage};
use crate::utils::error::{AnalysisError, Result};
use chrono::Utc;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// 讀取銷售 CSV、計算營收與庫存模擬，並輸出報表檔案
pub struct SalesPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) source: S,
    pub(crate) sink: S,
    pub(crate) config: C,
}

impl<S: Storage, C: ConfigProvider> SalesPipeline<S, C> {
    pub fn new(source: S, sink: S, config: C) -> Self {
        Self {
            source,
            sink,
            config,
        }
    }

    fn wants(&self, format: &str) -> bool {
        self.config.output_formats().iter().any(|f| f == format)
    }

    fn render_outputs(&self, report: &AnalysisReport) -> Result<Vec<(String, Vec<u8>)>> {
        let mut files = Vec::new();

        if self.wants("csv") {
            files.push(("revenue.csv".to_string(), revenue_csv(report)?.into_bytes()));
            for simulation in &report.simulations {
                files.push((
                    format!("consumption_{}.csv", simulation.scenario.slug()),
                    consumption_csv(simulation)?.into_bytes(),
                ));
            }
        }

        if self.wants("json") {
            files.push(("summary.json".to_string(), summary_json(report)?.into_bytes()));
        }

        if self.wants("svg") && self.config.charts_enabled() {
            let revenue_chart = render_revenue_chart(
                &report.revenue_without_discount,
                &report.revenue_with_discount,
            )?;
            files.push(("revenue.svg".to_string(), revenue_chart.into_bytes()));

            let consumption_chart = render_consumption_chart(&report.simulations)?;
            files.push(("inventory.svg".to_string(), consumption_chart.into_bytes()));
        }

        Ok(files)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SalesPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SaleRecord>> {
        tracing::debug!("Reading sales CSV from: {}", self.config.input_path());
        let data = self.source.read_file(self.config.input_path()).await?;
        tracing::debug!("Read {} bytes", data.len());

        parse_sales_csv(&data)
    }

    async fn transform(&self, data: Vec<SaleRecord>) -> Result<AnalysisReport> {
        if data.is_empty() {
            return Err(AnalysisError::EmptyDataset);
        }

        let top_sellers = top_selling_items(&data, self.config.top_n());
        let skus: Vec<String> = top_sellers.iter().map(|item| item.sku.clone()).collect();
        tracing::debug!("Top sellers: {:?}", skus);

        let revenue_without_discount = revenue_per_item(&data, &skus);
        let schedule = DiscountSchedule::new(self.config.discount_tiers())?;
        tracing::debug!("Discount tiers: {:?}", schedule.tiers());
        let revenue_with_discount = discounted_revenue_per_item(&data, &skus, &schedule);

        let total_without_discount = total_revenue(&revenue_without_discount);
        let total_with_discount = total_revenue(&revenue_with_discount);
        tracing::info!(
            "💰 Revenue without discount: {:.2}, with discount: {:.2}",
            total_without_discount,
            total_with_discount
        );

        // 每個情境都從相同的初始庫存重新開始
        let simulations = self
            .config
            .scenarios()
            .iter()
            .map(|scenario| {
                simulate_consumption(
                    &skus,
                    self.config.initial_inventory(),
                    self.config.horizon_days(),
                    scenario,
                )
            })
            .collect();

        Ok(AnalysisReport {
            generated_at: Utc::now(),
            record_count: data.len(),
            top_sellers,
            revenue_without_discount,
            revenue_with_discount,
            total_without_discount,
            total_with_discount,
            simulations,
        })
    }

    async fn load(&self, report: AnalysisReport) -> Result<String> {
        let files = self.render_outputs(&report)?;
        tracing::debug!("Writing {} report files", files.len());

        for (name, data) in &files {
            self.sink.write_file(name, data).await?;
            tracing::debug!("Wrote {} ({} bytes)", name, data.len());
        }

        let Some(archive) = self.config.archive_name() else {
            return Ok(self.config.output_path().to_string());
        };

        // 將所有輸出打包成一個 ZIP
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (name, data) in &files {
                zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                zip.write_all(data)?;
            }
            zip.finish()?.into_inner()
        };

        tracing::debug!("Writing archive {} ({} bytes)", archive, zip_data.len());
        self.sink.write_file(archive, &zip_data).await?;

        Ok(format!("{}/{}", self.config.output_path(), archive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{DiscountTier, Scenario};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn put(&self, path: &str, data: &str) {
            self.files
                .lock()
                .await
                .insert(path.to_string(), data.as_bytes().to_vec());
        }

        async fn names(&self) -> Vec<String> {
            let mut names: Vec<String> = self.files.lock().await.keys().cloned().collect();
            names.sort();
            names
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                AnalysisError::IoError(std::io::Error::new(
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

    struct TestConfig {
        formats: Vec<String>,
        archive: Option<String>,
        top_n: usize,
    }

    impl Default for TestConfig {
        fn default() -> Self {
            Self {
                formats: vec!["csv".to_string(), "json".to_string()],
                archive: None,
                top_n: 2,
            }
        }
    }

    impl ConfigProvider for TestConfig {
        fn input_path(&self) -> &str {
            "sales.csv"
        }
        fn output_path(&self) -> &str {
            "out"
        }
        fn top_n(&self) -> usize {
            self.top_n
        }
        fn initial_inventory(&self) -> u32 {
            5
        }
        fn horizon_days(&self) -> u32 {
            7
        }
        fn discount_tiers(&self) -> Vec<DiscountTier> {
            crate::core::discount::default_tiers()
        }
        fn scenarios(&self) -> Vec<Scenario> {
            vec![Scenario::without_discount(1), Scenario::with_discount(2)]
        }
        fn output_formats(&self) -> &[String] {
            &self.formats
        }
        fn charts_enabled(&self) -> bool {
            true
        }
        fn archive_name(&self) -> Option<&str> {
            self.archive.as_deref()
        }
    }

    const SALES: &str = "Style,SKU,Qty,Amount\n\
                         S1,A,1,100\n\
                         S1,A,2,100\n\
                         S2,B,3,10\n\
                         S3,C,1,1000\n";

    #[tokio::test]
    async fn test_transform_computes_revenue_and_simulations() {
        let source = MockStorage::default();
        source.put("sales.csv", SALES).await;
        let pipeline = SalesPipeline::new(source, MockStorage::default(), TestConfig::default());

        let records = pipeline.extract().await.unwrap();
        assert_eq!(records.len(), 4);

        let report = pipeline.transform(records).await.unwrap();
        let top: Vec<&str> = report.top_sellers.iter().map(|i| i.sku.as_str()).collect();
        assert_eq!(top, vec!["A", "B"]);
        assert_eq!(report.total_without_discount, 330.0);
        // A: 100 + 200 * 0.9, B: 30 * 0.9
        assert!((report.total_with_discount - (280.0 + 27.0)).abs() < 1e-9);

        assert_eq!(report.simulations.len(), 2);
        assert_eq!(report.simulations[0].items[0].depleted_on, Some(5));
        assert_eq!(report.simulations[1].items[0].depleted_on, Some(3));
    }

    #[tokio::test]
    async fn test_transform_rejects_empty_input() {
        let pipeline = SalesPipeline::new(
            MockStorage::default(),
            MockStorage::default(),
            TestConfig::default(),
        );
        assert!(matches!(
            pipeline.transform(Vec::new()).await,
            Err(AnalysisError::EmptyDataset)
        ));
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let pipeline = SalesPipeline::new(
            MockStorage::default(),
            MockStorage::default(),
            TestConfig::default(),
        );
        assert!(matches!(
            pipeline.extract().await,
            Err(AnalysisError::IoError(_))
        ));
    }

    #[tokio::test]
    async fn test_load_writes_selected_formats() {
        let source = MockStorage::default();
        source.put("sales.csv", SALES).await;
        let sink = MockStorage::default();
        let pipeline = SalesPipeline::new(source, sink.clone(), TestConfig::default());

        let records = pipeline.extract().await.unwrap();
        let report = pipeline.transform(records).await.unwrap();
        let output = pipeline.load(report).await.unwrap();

        assert_eq!(output, "out");
        assert_eq!(
            sink.names().await,
            vec![
                "consumption_with_discount.csv".to_string(),
                "consumption_without_discount.csv".to_string(),
                "revenue.csv".to_string(),
                "summary.json".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_load_with_archive_and_charts() {
        let source = MockStorage::default();
        source.put("sales.csv", SALES).await;
        let sink = MockStorage::default();
        let config = TestConfig {
            formats: vec!["svg".to_string()],
            archive: Some("report.zip".to_string()),
            ..TestConfig::default()
        };
        let pipeline = SalesPipeline::new(source, sink.clone(), config);

        let records = pipeline.extract().await.unwrap();
        let report = pipeline.transform(records).await.unwrap();
        let output = pipeline.load(report).await.unwrap();

        assert_eq!(output, "out/report.zip");
        let zip_data = sink.read_file("report.zip").await.unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort();
        assert_eq!(names, vec!["inventory.svg", "revenue.svg"]);
    }
}
