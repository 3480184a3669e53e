pub mod aggregate;
pub mod chart;
pub mod discount;
pub mod etl;
pub mod loader;
pub mod report;
pub mod simulation;

pub use crate::domain::model::{AnalysisReport, SaleRecord};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
