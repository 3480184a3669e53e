use crate::domain::model::SaleRecord;
use crate::utils::error::{AnalysisError, Result};

pub const REQUIRED_COLUMNS: [&str; 3] = ["SKU", "Qty", "Amount"];

/// 解析銷售 CSV，欄位與儲存格前後空白會被忽略，多餘欄位直接略過
pub fn parse_sales_csv(data: &[u8]) -> Result<Vec<SaleRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(AnalysisError::MissingColumn {
                column: column.to_string(),
            });
        }
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in reader.deserialize::<SaleRecord>() {
        let record = row?;
        if record.sku.is_empty() {
            skipped += 1;
            continue;
        }
        records.push(record);
    }

    if skipped > 0 {
        tracing::warn!("⚠️ Skipped {} rows without a SKU", skipped);
    }
    tracing::debug!("Parsed {} sales rows", records.len());

    Ok(records)
}
