use crate::domain::model::{Scenario, SimulationResult, SkuConsumption};

/// 以固定日銷量模擬每個 SKU 的庫存消耗。
///
/// 每個 SKU 都從 `initial_inventory` 開始，第 1 天到第 `horizon_days` 天
/// 每天賣出 `min(daily_units, 剩餘庫存)`。累計序列的長度固定為 `horizon_days`，
/// 售完之後持續補上最後的累計值。
pub fn simulate_consumption(
    skus: &[String],
    initial_inventory: u32,
    horizon_days: u32,
    scenario: &Scenario,
) -> SimulationResult {
    let mut items: Vec<SkuConsumption> = skus
        .iter()
        .map(|sku| SkuConsumption {
            sku: sku.clone(),
            cumulative: Vec::with_capacity(horizon_days as usize),
            depleted_on: None,
        })
        .collect();
    let mut remaining = vec![initial_inventory; skus.len()];

    for day in 1..=horizon_days {
        for (item, left) in items.iter_mut().zip(remaining.iter_mut()) {
            let consumed = item.cumulative.last().copied().unwrap_or(0);

            if *left == 0 {
                item.cumulative.push(consumed);
                continue;
            }

            let sold = scenario.daily_units.min(*left);
            *left -= sold;
            let consumed = consumed + sold;
            item.cumulative.push(consumed);

            tracing::trace!(
                "Day {}: Selling {} of {}. Inventory left: {}.",
                day,
                sold,
                item.sku,
                left
            );

            if item.depleted_on.is_none() && sold > 0 && consumed >= initial_inventory {
                item.depleted_on = Some(day);
            }
        }
    }

    let depleted = items.iter().filter(|i| i.depleted_on.is_some()).count();
    tracing::debug!(
        "Simulated '{}' over {} days: {}/{} SKUs sold out",
        scenario.name,
        horizon_days,
        depleted,
        items.len()
    );

    SimulationResult {
        scenario: scenario.clone(),
        horizon_days,
        initial_inventory,
        items,
    }
}
