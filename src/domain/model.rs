use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// 視為空值的儲存格內容 (與常見試算表/資料分析工具的 NA 標記一致)
pub const MISSING_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(value: &str) -> bool {
    value.is_empty() || MISSING_TOKENS.contains(&value)
}

fn missing_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None => Ok(None),
        Some(value) if is_missing(value) => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

// inf 之類的非有限值也當成缺值，避免污染加總
fn finite_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let amount: Option<f64> = missing_as_none(deserializer)?;
    Ok(amount.filter(|value| value.is_finite()))
}

/// 銷售 CSV 中的一列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "Style", default)]
    pub style: Option<String>,
    #[serde(rename = "Qty", default, deserialize_with = "missing_as_none")]
    pub qty: Option<u32>,
    #[serde(rename = "Amount", default, deserialize_with = "finite_amount")]
    pub amount: Option<f64>,
}

impl SaleRecord {
    pub fn new(sku: &str, qty: u32, amount: Option<f64>) -> Self {
        Self {
            sku: sku.to_string(),
            style: None,
            qty: Some(qty),
            amount,
        }
    }

    pub fn quantity(&self) -> u32 {
        self.qty.unwrap_or(0)
    }

    /// Qty × Amount；沒有單價的列 (例如取消的訂單) 不計營收
    pub fn revenue(&self) -> f64 {
        self.amount
            .map(|amount| f64::from(self.quantity()) * amount)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSales {
    pub sku: String,
    pub total_qty: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRevenue {
    pub sku: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountTier {
    pub min_qty: u32,
    pub multiplier: f64,
}

impl DiscountTier {
    pub fn new(min_qty: u32, multiplier: f64) -> Self {
        Self {
            min_qty,
            multiplier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub daily_units: u32,
}

impl Scenario {
    pub fn new(name: &str, daily_units: u32) -> Self {
        Self {
            name: name.to_string(),
            daily_units,
        }
    }

    pub fn without_discount(daily_units: u32) -> Self {
        Self::new("Without Discount", daily_units)
    }

    pub fn with_discount(daily_units: u32) -> Self {
        Self::new("With Discount", daily_units)
    }

    /// 用於輸出檔名，例如 "With Discount" -> "with_discount"
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.name.len());
        for c in self.name.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.ends_with('_') {
                slug.push('_');
            }
        }
        slug.trim_matches('_').to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuConsumption {
    pub sku: String,
    /// 第 1 天到第 N 天的累計消耗量
    pub cumulative: Vec<u32>,
    pub depleted_on: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub scenario: Scenario,
    pub horizon_days: u32,
    pub initial_inventory: u32,
    pub items: Vec<SkuConsumption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub record_count: usize,
    pub top_sellers: Vec<ItemSales>,
    pub revenue_without_discount: Vec<ItemRevenue>,
    pub revenue_with_discount: Vec<ItemRevenue>,
    pub total_without_discount: f64,
    pub total_with_discount: f64,
    pub simulations: Vec<SimulationResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revenue_skips_missing_amount() {
        assert_eq!(SaleRecord::new("A", 3, Some(100.0)).revenue(), 300.0);
        assert_eq!(SaleRecord::new("A", 3, None).revenue(), 0.0);

        let blank_qty = SaleRecord {
            qty: None,
            ..SaleRecord::new("A", 0, Some(50.0))
        };
        assert_eq!(blank_qty.quantity(), 0);
        assert_eq!(blank_qty.revenue(), 0.0);
    }

    #[test]
    fn test_scenario_slug() {
        assert_eq!(Scenario::with_discount(2).slug(), "with_discount");
        assert_eq!(Scenario::new("  Promo #2 (BOGO) ", 3).slug(), "promo_2_bogo");
    }
}
