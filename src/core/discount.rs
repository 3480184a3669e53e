use crate::core::aggregate::sum_per_item;
use crate::domain::model::{DiscountTier, ItemRevenue, SaleRecord};
use crate::utils::error::Result;
use crate::utils::validation::validate_discount_tiers;

/// 階梯式折扣：採用門檻不超過購買數量的最高一階
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountSchedule {
    // 依 min_qty 由大到小排序
    tiers: Vec<DiscountTier>,
}

impl DiscountSchedule {
    pub fn new(mut tiers: Vec<DiscountTier>) -> Result<Self> {
        validate_discount_tiers("discount.tiers", &tiers)?;
        tiers.sort_by(|a, b| b.min_qty.cmp(&a.min_qty));
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[DiscountTier] {
        &self.tiers
    }

    pub fn multiplier_for(&self, qty: u32) -> f64 {
        self.tiers
            .iter()
            .find(|tier| qty >= tier.min_qty)
            .map(|tier| tier.multiplier)
            .unwrap_or(1.0)
    }

    pub fn discounted_revenue(&self, record: &SaleRecord) -> f64 {
        record.revenue() * self.multiplier_for(record.quantity())
    }
}

impl Default for DiscountSchedule {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
        }
    }
}

/// 預設折扣：購買 2 件以上一律 ×0.90 (3 件以上也是 0.90，不另外打 85 折)
pub fn default_tiers() -> Vec<DiscountTier> {
    vec![DiscountTier::new(2, 0.90)]
}

pub fn discounted_revenue_per_item(
    records: &[SaleRecord],
    skus: &[String],
    schedule: &DiscountSchedule,
) -> Vec<ItemRevenue> {
    sum_per_item(records, skus, |record| schedule.discounted_revenue(record))
}
