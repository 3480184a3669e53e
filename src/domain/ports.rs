use crate::domain::model::{AnalysisReport, DiscountTier, SaleRecord, Scenario};
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
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn top_n(&self) -> usize;
    fn initial_inventory(&self) -> u32;
    fn horizon_days(&self) -> u32;
    fn discount_tiers(&self) -> Vec<DiscountTier>;
    fn scenarios(&self) -> Vec<Scenario>;
    fn output_formats(&self) -> &[String];
    fn charts_enabled(&self) -> bool;
    fn archive_name(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SaleRecord>>;
    async fn transform(&self, data: Vec<SaleRecord>) -> Result<AnalysisReport>;
    async fn load(&self, report: AnalysisReport) -> Result<String>;
}
