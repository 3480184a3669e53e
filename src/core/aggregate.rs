use crate::domain::model::{ItemRevenue, ItemSales, SaleRecord};
use std::cmp::Ordering;
use std::collections::HashMap;

/// 依 SKU 加總銷售數量，取前 n 名 (同數量時依 SKU 字母排序)
pub fn top_selling_items(records: &[SaleRecord], n: usize) -> Vec<ItemSales> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for record in records {
        *totals.entry(record.sku.as_str()).or_insert(0) += u64::from(record.quantity());
    }

    let mut items: Vec<ItemSales> = totals
        .into_iter()
        .map(|(sku, total_qty)| ItemSales {
            sku: sku.to_string(),
            total_qty,
        })
        .collect();

    items.sort_by(|a, b| b.total_qty.cmp(&a.total_qty).then_with(|| a.sku.cmp(&b.sku)));
    items.truncate(n);
    items
}

/// 對指定的 SKU 以 `value` 加總，每個 SKU 都會出現在結果中
pub(crate) fn sum_per_item<F>(records: &[SaleRecord], skus: &[String], value: F) -> Vec<ItemRevenue>
where
    F: Fn(&SaleRecord) -> f64,
{
    let mut totals: HashMap<&str, f64> = skus.iter().map(|sku| (sku.as_str(), 0.0)).collect();

    for record in records {
        if let Some(total) = totals.get_mut(record.sku.as_str()) {
            *total += value(record);
        }
    }

    let mut rows: Vec<ItemRevenue> = totals
        .into_iter()
        .map(|(sku, revenue)| ItemRevenue {
            sku: sku.to_string(),
            revenue,
        })
        .collect();
    sort_by_revenue(&mut rows);
    rows
}

pub fn revenue_per_item(records: &[SaleRecord], skus: &[String]) -> Vec<ItemRevenue> {
    sum_per_item(records, skus, SaleRecord::revenue)
}

pub fn total_revenue(rows: &[ItemRevenue]) -> f64 {
    rows.iter().map(|row| row.revenue).sum()
}

pub(crate) fn sort_by_revenue(rows: &mut [ItemRevenue]) {
    rows.sort_by(|a, b| {
        b.revenue
            .partial_cmp(&a.revenue)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.sku.cmp(&b.sku))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<SaleRecord> {
        vec![
            SaleRecord::new("A", 1, Some(100.0)),
            SaleRecord::new("B", 3, Some(10.0)),
            SaleRecord::new("A", 2, Some(100.0)),
            SaleRecord::new("C", 3, None),
            SaleRecord::new("D", 1, Some(1000.0)),
        ]
    }

    #[test]
    fn test_top_selling_orders_by_quantity_then_sku() {
        let top = top_selling_items(&sample(), 3);
        let skus: Vec<&str> = top.iter().map(|i| i.sku.as_str()).collect();
        // A、B、C 都是 3 件，依 SKU 排序
        assert_eq!(skus, vec!["A", "B", "C"]);
        assert!(top.iter().all(|i| i.total_qty == 3));
    }

    #[test]
    fn test_top_selling_with_n_larger_than_items() {
        assert_eq!(top_selling_items(&sample(), 50).len(), 4);
        assert!(top_selling_items(&[], 10).is_empty());
    }

    #[test]
    fn test_revenue_per_item_sorted_desc() {
        let skus = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let rows = revenue_per_item(&sample(), &skus);

        assert_eq!(rows[0], ItemRevenue { sku: "A".to_string(), revenue: 300.0 });
        assert_eq!(rows[1], ItemRevenue { sku: "B".to_string(), revenue: 30.0 });
        // C 沒有單價，但仍然列出
        assert_eq!(rows[2], ItemRevenue { sku: "C".to_string(), revenue: 0.0 });
        assert_eq!(total_revenue(&rows), 330.0);
    }

    #[test]
    fn test_revenue_ignores_skus_outside_selection() {
        let rows = revenue_per_item(&sample(), &["B".to_string()]);
        assert_eq!(rows.len(), 1);
        assert_eq!(total_revenue(&rows), 30.0);
    }
}
