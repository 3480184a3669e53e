pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::{DiscountTier, Scenario};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "sales-insight")]
#[command(about = "Top sellers, discount revenue and inventory depletion from a sales CSV")]
pub struct CliConfig {
    /// Sales CSV with SKU, Qty and Amount columns
    #[arg(long, default_value = "./consolidated-sales.csv")]
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Number of top-selling SKUs to analyze
    #[arg(long, default_value = "10")]
    pub top_n: usize,

    /// Starting units per SKU for the inventory simulation
    #[arg(long, default_value = "365")]
    pub initial_inventory: u32,

    /// Simulation horizon in days
    #[arg(long, default_value = "365")]
    pub days: u32,

    #[arg(long, default_value = "1")]
    pub base_daily_units: u32,

    #[arg(long, default_value = "2")]
    pub discount_daily_units: u32,

    /// Discount tiers as MIN_QTY:MULTIPLIER, e.g. 3:0.85,2:0.90 (highest matching threshold wins)
    #[arg(long, value_delimiter = ',', value_parser = parse_discount_tier, default_value = "2:0.90")]
    pub discount_tiers: Vec<DiscountTier>,

    #[arg(long, value_delimiter = ',', default_value = "csv,json,svg")]
    pub formats: Vec<String>,

    /// Also bundle all outputs into this ZIP file inside the output path
    #[arg(long)]
    pub archive: Option<String>,

    #[arg(long, help = "Skip SVG chart rendering")]
    pub no_charts: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
pub fn parse_discount_tier(value: &str) -> std::result::Result<DiscountTier, String> {
    let (qty, multiplier) = value
        .split_once(':')
        .ok_or_else(|| format!("expected MIN_QTY:MULTIPLIER, got '{}'", value))?;
    let min_qty = qty
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid minimum quantity '{}': {}", qty, e))?;
    let multiplier = multiplier
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid multiplier '{}': {}", multiplier, e))?;
    Ok(DiscountTier::new(min_qty, multiplier))
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn top_n(&self) -> usize {
        self.top_n
    }

    fn initial_inventory(&self) -> u32 {
        self.initial_inventory
    }

    fn horizon_days(&self) -> u32 {
        self.days
    }

    fn discount_tiers(&self) -> Vec<DiscountTier> {
        self.discount_tiers.clone()
    }

    fn scenarios(&self) -> Vec<Scenario> {
        vec![
            Scenario::without_discount(self.base_daily_units),
            Scenario::with_discount(self.discount_daily_units),
        ]
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn charts_enabled(&self) -> bool {
        !self.no_charts
    }

    fn archive_name(&self) -> Option<&str> {
        self.archive.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_file_extension("input", &self.input, &["csv"])?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_positive_number("top_n", self.top_n, 1)?;
        validation::validate_range("days", self.days, 1, 3650)?;
        validation::validate_discount_tiers("discount_tiers", &self.discount_tiers)?;
        validation::validate_output_formats("formats", &self.formats)?;

        if let Some(archive) = &self.archive {
            validation::validate_file_extension("archive", archive, &["zip"])?;
        }

        Ok(())
    }
}
