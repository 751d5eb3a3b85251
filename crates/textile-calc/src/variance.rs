//! 成本差異分解

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use textile_core::{AnalyticsConfig, Item};

/// 差異方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarianceStatus {
    /// 超支
    Loss,
    /// 節省
    Saving,
}

/// 差異主因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootCause {
    /// 單價變動為主
    RateDriven,
    /// 用量變動為主
    QuantityDriven,
}

/// 浪費等級
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WasteBand {
    Efficient,
    LowWaste,
    Moderate,
    HighWaste,
}

/// 差異計算結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceResult {
    /// 計劃金額
    pub planned_amount: Decimal,

    /// 實際金額
    pub actual_amount: Decimal,

    /// 差異（正值為超支）
    pub variance: Decimal,

    /// 價格差異（以實際用量計價）
    pub price_variance: Decimal,

    /// 用量差異（以計劃單價計價）
    pub quantity_variance: Decimal,

    /// 效率（%）；實際用量為零或過小（溢出）時未定義
    pub efficiency_pct: Option<Decimal>,

    /// 浪費（%）= 100 - 效率
    pub waste_pct: Option<Decimal>,

    /// 交叉項 (實際量 - 計劃量) × (實際價 - 計劃價)，已包含在價格差異中
    cross_term: Decimal,
}

impl VarianceResult {
    pub fn status(&self) -> VarianceStatus {
        if self.variance > Decimal::ZERO {
            VarianceStatus::Loss
        } else {
            VarianceStatus::Saving
        }
    }

    /// 主因：|價格差異| 與 |用量差異| 取較大者，相等時視為單價因素
    pub fn root_cause(&self) -> RootCause {
        if self.price_variance.abs() >= self.quantity_variance.abs() {
            RootCause::RateDriven
        } else {
            RootCause::QuantityDriven
        }
    }

    pub fn cross_term(&self) -> Decimal {
        self.cross_term
    }

    pub fn is_efficiency_defined(&self) -> bool {
        self.efficiency_pct.is_some()
    }

    /// 顯示用：效率四捨五入到一位小數
    pub fn efficiency_pct_display(&self) -> Option<Decimal> {
        self.efficiency_pct.map(round_one_dp)
    }

    /// 顯示用：浪費四捨五入到一位小數
    pub fn waste_pct_display(&self) -> Option<Decimal> {
        self.waste_pct.map(round_one_dp)
    }

    /// 浪費等級；效率未定義時無等級
    pub fn waste_band(&self, config: &AnalyticsConfig) -> Option<WasteBand> {
        self.waste_pct.map(|waste| {
            if waste > config.high_waste_pct {
                WasteBand::HighWaste
            } else if waste > config.moderate_waste_pct {
                WasteBand::Moderate
            } else if waste > Decimal::ZERO {
                WasteBand::LowWaste
            } else {
                WasteBand::Efficient
            }
        })
    }
}

fn round_one_dp(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// 差異計算器
pub struct VarianceCalculator;

impl VarianceCalculator {
    /// 計算物料的成本差異分解
    pub fn calculate(item: &Item) -> VarianceResult {
        let planned = item.planned;
        let actual = item.actual;

        let planned_amount = planned.amount();
        let actual_amount = actual.amount();
        let variance = actual_amount - planned_amount;

        let price_variance = (actual.rate - planned.rate) * actual.qty;
        let quantity_variance = (actual.qty - planned.qty) * planned.rate;
        let cross_term = (actual.qty - planned.qty) * (actual.rate - planned.rate);

        let efficiency_pct = if actual.qty > Decimal::ZERO {
            planned
                .qty
                .checked_div(actual.qty)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        } else {
            None
        };
        if efficiency_pct.is_none() {
            tracing::debug!("物料 {} 實際用量 {}，效率無法計算", item.id, actual.qty);
        }
        let waste_pct = efficiency_pct.map(|eff| Decimal::ONE_HUNDRED - eff);

        VarianceResult {
            planned_amount,
            actual_amount,
            variance,
            price_variance,
            quantity_variance,
            efficiency_pct,
            waste_pct,
            cross_term,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use textile_core::{ConsumptionLine, InventoryPosition};

    fn item(pq: i64, pr: i64, aq: i64, ar: i64) -> Item {
        Item::new(
            1,
            "Fabric".to_string(),
            "kg".to_string(),
            ConsumptionLine::new(Decimal::from(pq), Decimal::from(pr)),
            ConsumptionLine::new(Decimal::from(aq), Decimal::from(ar)),
            InventoryPosition::new(Decimal::from(200), Decimal::from(40), 4, Decimal::from(80)),
        )
    }

    #[test]
    fn test_fabric_variance() {
        let result = VarianceCalculator::calculate(&item(100, 250, 110, 260));

        assert_eq!(result.planned_amount, Decimal::from(25000));
        assert_eq!(result.actual_amount, Decimal::from(28600));
        assert_eq!(result.variance, Decimal::from(3600));
        assert_eq!(result.price_variance, Decimal::from(1100));
        assert_eq!(result.quantity_variance, Decimal::from(2500));
        assert_eq!(result.status(), VarianceStatus::Loss);
        assert_eq!(result.root_cause(), RootCause::QuantityDriven);

        // 100 / 110 × 100 = 90.909...
        assert_eq!(result.efficiency_pct_display(), Some(Decimal::new(909, 1)));
        assert_eq!(result.waste_pct_display(), Some(Decimal::new(91, 1)));
    }

    #[test]
    fn test_decomposition_sums_to_variance() {
        let result = VarianceCalculator::calculate(&item(100, 250, 110, 260));

        // 價格差異以實際用量計價，已吸收交叉項
        assert_eq!(
            result.price_variance + result.quantity_variance,
            result.variance
        );
        assert_eq!(result.cross_term(), Decimal::from(100));
        assert_ne!(
            result.price_variance + result.quantity_variance + result.cross_term(),
            result.variance
        );
    }

    #[test]
    fn test_saving() {
        let result = VarianceCalculator::calculate(&item(100, 250, 95, 240));

        assert_eq!(result.variance, Decimal::from(-2200));
        assert_eq!(result.status(), VarianceStatus::Saving);
        assert_eq!(result.root_cause(), RootCause::QuantityDriven);
        assert!(result.waste_pct.unwrap() < Decimal::ZERO);
    }

    #[test]
    fn test_zero_variance_counts_as_saving() {
        let result = VarianceCalculator::calculate(&item(100, 250, 100, 250));

        assert_eq!(result.variance, Decimal::ZERO);
        assert_eq!(result.status(), VarianceStatus::Saving);
        assert_eq!(result.efficiency_pct, Some(Decimal::ONE_HUNDRED));
        assert_eq!(result.waste_pct, Some(Decimal::ZERO));
    }

    #[test]
    fn test_rate_driven() {
        let result = VarianceCalculator::calculate(&item(100, 250, 101, 300));
        assert_eq!(result.root_cause(), RootCause::RateDriven);
    }

    #[test]
    fn test_tiny_actual_qty_has_undefined_efficiency() {
        let mut fabric = item(100, 250, 110, 260);
        fabric.actual.qty = Decimal::new(1, 28);

        let result = VarianceCalculator::calculate(&fabric);
        assert_eq!(result.efficiency_pct, None);
        assert_eq!(result.waste_pct, None);
        assert_eq!(result.planned_amount, Decimal::from(25000));
    }

    #[test]
    fn test_zero_actual_qty_has_undefined_efficiency() {
        let result = VarianceCalculator::calculate(&item(100, 250, 0, 260));

        assert_eq!(result.actual_amount, Decimal::ZERO);
        assert_eq!(result.variance, Decimal::from(-25000));
        assert!(!result.is_efficiency_defined());
        assert_eq!(result.efficiency_pct, None);
        assert_eq!(result.waste_pct, None);
        assert_eq!(result.waste_band(&AnalyticsConfig::default()), None);
    }

    #[rstest]
    #[case(100, 120, WasteBand::HighWaste)]
    #[case(100, 105, WasteBand::Moderate)]
    #[case(100, 102, WasteBand::LowWaste)]
    #[case(100, 100, WasteBand::Efficient)]
    #[case(100, 90, WasteBand::Efficient)]
    fn test_waste_band(#[case] planned_qty: i64, #[case] actual_qty: i64, #[case] band: WasteBand) {
        let result = VarianceCalculator::calculate(&item(planned_qty, 10, actual_qty, 10));
        assert_eq!(result.waste_band(&AnalyticsConfig::default()), Some(band));
    }
}
