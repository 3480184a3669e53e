use crate::core::discount::default_tiers;
use crate::core::ConfigProvider;
use crate::domain::model::{DiscountTier, Scenario};
use crate::utils::error::{AnalysisError, Result};
use crate::utils::logger;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: ReportConfig,
    pub input: InputConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub discount: Option<DiscountConfig>,
    pub simulation: Option<SimulationConfig>,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub top_n: Option<usize>,
    pub initial_inventory: Option<u32>,
    pub horizon_days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountConfig {
    #[serde(default)]
    pub tiers: Vec<DiscountTier>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
    pub archive: Option<String>,
    pub charts: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

fn default_output_formats() -> Vec<String> {
    vec!["csv".to_string(), "json".to_string(), "svg".to_string()]
}

pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_INITIAL_INVENTORY: u32 = 365;
pub const DEFAULT_HORIZON_DAYS: u32 = 365;

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AnalysisError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SALES_CSV})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AnalysisError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("report.name", &self.report.name)?;
        validation::validate_path("input.path", &self.input.path)?;
        validation::validate_file_extension("input.path", &self.input.path, &["csv"])?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_positive_number("analysis.top_n", self.top_n(), 1)?;
        validation::validate_range("analysis.horizon_days", self.horizon_days(), 1, 3650)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;
        validation::validate_discount_tiers("discount.tiers", &self.discount_tiers())?;

        if let Some(level) = self.log_level() {
            if !logger::LOG_LEVELS.contains(&level.trim().to_lowercase().as_str()) {
                return Err(AnalysisError::InvalidConfigValueError {
                    field: "monitoring.log_level".to_string(),
                    value: level.to_string(),
                    reason: format!("Expected one of: {}", logger::LOG_LEVELS.join(", ")),
                });
            }
        }

        if let Some(archive) = &self.load.archive {
            validation::validate_file_extension("load.archive", archive, &["zip"])?;
        }

        let scenarios = self.scenarios();
        if scenarios.is_empty() {
            return Err(AnalysisError::MissingConfigError {
                field: "simulation.scenarios".to_string(),
            });
        }
        for scenario in &scenarios {
            validation::validate_non_empty_string("simulation.scenarios.name", &scenario.name)?;
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn top_n(&self) -> usize {
        self.analysis.top_n.unwrap_or(DEFAULT_TOP_N)
    }

    fn initial_inventory(&self) -> u32 {
        self.analysis
            .initial_inventory
            .unwrap_or(DEFAULT_INITIAL_INVENTORY)
    }

    fn horizon_days(&self) -> u32 {
        self.analysis.horizon_days.unwrap_or(DEFAULT_HORIZON_DAYS)
    }

    fn discount_tiers(&self) -> Vec<DiscountTier> {
        // 沒有 [discount] 區段時使用預設階梯；明確給空陣列代表不打折
        match &self.discount {
            Some(discount) => discount.tiers.clone(),
            None => default_tiers(),
        }
    }

    fn scenarios(&self) -> Vec<Scenario> {
        match &self.simulation {
            Some(simulation) => simulation.scenarios.clone(),
            None => vec![Scenario::without_discount(1), Scenario::with_discount(2)],
        }
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn charts_enabled(&self) -> bool {
        self.load.charts.unwrap_or(true)
    }

    fn archive_name(&self) -> Option<&str> {
        self.load.archive.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[report]
name = "amazon-sales"

[input]
path = "./consolidated-sales.csv"

[load]
output_path = "./output"
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str(MINIMAL).unwrap();

        assert_eq!(config.top_n(), 10);
        assert_eq!(config.initial_inventory(), 365);
        assert_eq!(config.horizon_days(), 365);
        assert_eq!(config.discount_tiers(), vec![DiscountTier::new(2, 0.90)]);
        assert_eq!(config.scenarios().len(), 2);
        assert_eq!(config.output_formats().join(","), "csv,json,svg");
        assert!(config.charts_enabled());
        assert!(!config.monitoring_enabled());
        assert_eq!(config.log_level(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let toml_content = r#"
[report]
name = "q3"
description = "Quarter review"

[input]
path = "q3.csv"

[analysis]
top_n = 5
initial_inventory = 100
horizon_days = 90

[[discount.tiers]]
min_qty = 4
multiplier = 0.8

[[simulation.scenarios]]
name = "Baseline"
daily_units = 1

[[simulation.scenarios]]
name = "Flash Sale"
daily_units = 5

[load]
output_path = "./q3-output"
output_formats = ["json"]
archive = "q3.zip"
charts = false

[monitoring]
enabled = true
log_level = "debug"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.top_n(), 5);
        assert_eq!(config.horizon_days(), 90);
        assert_eq!(config.discount_tiers(), vec![DiscountTier::new(4, 0.8)]);
        assert_eq!(config.scenarios()[1], Scenario::new("Flash Sale", 5));
        assert_eq!(config.archive_name(), Some("q3.zip"));
        assert!(!config.charts_enabled());
        assert!(config.monitoring_enabled());
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SALES_INSIGHT_TEST_CSV", "from-env.csv");

        let toml_content = MINIMAL.replace("./consolidated-sales.csv", "${SALES_INSIGHT_TEST_CSV}");
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(config.input_path(), "from-env.csv");

        std::env::remove_var("SALES_INSIGHT_TEST_CSV");
    }

    #[test]
    fn test_unset_env_var_is_kept() {
        let toml_content = MINIMAL.replace("./output", "${SALES_INSIGHT_UNSET_VAR}");
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(config.output_path(), "${SALES_INSIGHT_UNSET_VAR}");
    }

    #[test]
    fn test_config_validation() {
        let bad_tier = format!("{}\n[[discount.tiers]]\nmin_qty = 2\nmultiplier = 1.5\n", MINIMAL);
        let config = TomlConfig::from_toml_str(&bad_tier).unwrap();
        assert!(config.validate().is_err());

        let bad_level = format!("{}\n[monitoring]\nenabled = true\nlog_level = \"loud\"\n", MINIMAL);
        let config = TomlConfig::from_toml_str(&bad_level).unwrap();
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidConfigValueError { .. })
        ));

        let no_scenarios = format!("{}\n[simulation]\nscenarios = []\n", MINIMAL);
        let config = TomlConfig::from_toml_str(&no_scenarios).unwrap();
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            TomlConfig::from_toml_str("[report\nname ="),
            Err(AnalysisError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.report.name, "amazon-sales");
    }
}
