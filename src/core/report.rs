use crate::domain::model::{AnalysisReport, SimulationResult};
use crate::utils::error::{AnalysisError, Result};
use std::collections::HashMap;
use std::fmt;

/// 終端機輸出的分析摘要
pub fn render_summary(report: &AnalysisReport) -> String {
    Summary(report).to_string()
}

struct Summary<'a>(&'a AnalysisReport);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        writeln!(f, "Top {} Selling Items (by Qty):", report.top_sellers.len())?;
        for (rank, item) in report.top_sellers.iter().enumerate() {
            writeln!(f, "  {:>2}. {:<24} {:>8}", rank + 1, item.sku, item.total_qty)?;
        }

        writeln!(f)?;
        writeln!(f, "Revenue Without Discount:")?;
        for row in &report.revenue_without_discount {
            writeln!(f, "  {:<24} {:>14.2}", row.sku, row.revenue)?;
        }
        writeln!(f, "  {:<24} {:>14.2}", "Total", report.total_without_discount)?;

        writeln!(f)?;
        writeln!(f, "Revenue With Discount:")?;
        for row in &report.revenue_with_discount {
            writeln!(f, "  {:<24} {:>14.2}", row.sku, row.revenue)?;
        }
        writeln!(f, "  {:<24} {:>14.2}", "Total", report.total_with_discount)?;

        let difference = report.total_with_discount - report.total_without_discount;
        writeln!(f, "  {:<24} {:>14.2}", "Difference", difference)?;

        for simulation in &report.simulations {
            writeln!(f)?;
            writeln!(f, "Consumption Days {}:", simulation.scenario.name)?;
            for item in &simulation.items {
                match item.depleted_on {
                    Some(day) => writeln!(f, "{}: Consumed by day {}", item.sku, day)?,
                    None => writeln!(f, "{}: Not consumed", item.sku)?,
                }
            }
        }

        Ok(())
    }
}

/// sku,total_qty,revenue,discounted_revenue (依銷量排序)
pub fn revenue_csv(report: &AnalysisReport) -> Result<String> {
    let discounted: HashMap<&str, f64> = report
        .revenue_with_discount
        .iter()
        .map(|row| (row.sku.as_str(), row.revenue))
        .collect();
    let revenue: HashMap<&str, f64> = report
        .revenue_without_discount
        .iter()
        .map(|row| (row.sku.as_str(), row.revenue))
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["sku", "total_qty", "revenue", "discounted_revenue"])?;
    for item in &report.top_sellers {
        let sku = item.sku.as_str();
        writer.write_record([
            sku.to_string(),
            item.total_qty.to_string(),
            format!("{:.2}", revenue.get(sku).copied().unwrap_or(0.0)),
            format!("{:.2}", discounted.get(sku).copied().unwrap_or(0.0)),
        ])?;
    }

    finish_csv(writer)
}

/// day 欄加上每個 SKU 一欄的累計消耗量
pub fn consumption_csv(simulation: &SimulationResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["day".to_string()];
    header.extend(simulation.items.iter().map(|item| item.sku.clone()));
    writer.write_record(&header)?;

    for day in 0..simulation.horizon_days as usize {
        let mut row = vec![(day + 1).to_string()];
        row.extend(simulation.items.iter().map(|item| {
            item.cumulative
                .get(day)
                .map(|c| c.to_string())
                .unwrap_or_default()
        }));
        writer.write_record(&row)?;
    }

    finish_csv(writer)
}

pub fn summary_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| AnalysisError::ProcessingError {
            message: format!("Failed to flush CSV output: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| AnalysisError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}
