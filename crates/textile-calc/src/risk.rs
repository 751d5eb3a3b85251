//! 綜合風險評分

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use textile_core::{AnalyticsConfig, AnalyticsError, Item};

use crate::reorder::{ReorderCalculator, ReorderResult};
use crate::variance::VarianceCalculator;

/// 風險等級
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn from_score(score: u8, config: &AnalyticsConfig) -> Self {
        if score >= config.high_risk_threshold {
            RiskBand::High
        } else if score >= config.medium_risk_threshold {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Low => "LOW",
            RiskBand::Medium => "MEDIUM",
            RiskBand::High => "HIGH",
        }
    }
}

/// 風險分項
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    /// 庫存缺口（僅低於再訂購點時計分）
    pub stock_risk: Decimal,

    /// 提前期暴露（不封頂）
    pub lead_risk: Decimal,

    /// 成本超支（僅超支時計分）
    pub variance_risk: Decimal,

    /// 供應商延遲
    pub delay_risk: Decimal,
}

impl RiskBreakdown {
    /// 未取整、未封頂的分項總和
    pub fn raw_total(&self) -> Decimal {
        self.stock_risk + self.lead_risk + self.variance_risk + self.delay_risk
    }
}

/// 風險評分器
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: AnalyticsConfig,
}

impl RiskScorer {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// 計算各風險分項
    pub fn breakdown(&self, item: &Item, as_of: NaiveDate) -> textile_core::Result<RiskBreakdown> {
        let reorder = ReorderCalculator::calculate(item, as_of)?;
        self.breakdown_from(item, &reorder)
    }

    /// 以已計算的再訂購結果求風險分項
    ///
    /// 提前期參考天數為 0 時返回 [`AnalyticsError::ConfigError`]。
    pub fn breakdown_from(
        &self,
        item: &Item,
        reorder: &ReorderResult,
    ) -> textile_core::Result<RiskBreakdown> {
        let config = &self.config;
        let variance = VarianceCalculator::calculate(item);

        // 比值溢出代表庫存遠高於再訂購點
        let stock_ratio = if reorder.reorder_level > Decimal::ZERO {
            item.inventory
                .current
                .checked_div(reorder.reorder_level)
                .unwrap_or(Decimal::ONE)
        } else {
            Decimal::ONE
        };
        let stock_risk = if stock_ratio < Decimal::ONE {
            (Decimal::ONE - stock_ratio) * config.stock_risk_weight
        } else {
            Decimal::ZERO
        };

        let lead_risk = Decimal::from(item.inventory.lead_days)
            .checked_div(Decimal::from(config.lead_reference_days))
            .and_then(|ratio| ratio.checked_mul(config.lead_risk_weight))
            .ok_or_else(|| {
                AnalyticsError::ConfigError(format!(
                    "提前期參考天數 {} 無法計算物料 {} 的提前期風險",
                    config.lead_reference_days, item.id
                ))
            })?;

        let variance_risk =
            if variance.variance > Decimal::ZERO && variance.planned_amount > Decimal::ZERO {
                variance
                    .variance
                    .checked_div(variance.planned_amount)
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                    .map_or(config.variance_risk_cap, |pct| pct.min(config.variance_risk_cap))
            } else {
                Decimal::ZERO
            };

        let delay_risk = (Decimal::from(item.delay_history) * config.delay_points_per_incident)
            .min(config.delay_risk_cap);

        if lead_risk > config.lead_risk_weight {
            tracing::debug!(
                "物料 {} 提前期 {} 天，提前期風險 {} 超出權重 {}",
                item.id,
                item.inventory.lead_days,
                lead_risk,
                config.lead_risk_weight
            );
        }

        Ok(RiskBreakdown {
            stock_risk,
            lead_risk,
            variance_risk,
            delay_risk,
        })
    }

    /// 綜合風險分數，範圍 [0, max_score]
    pub fn score(&self, item: &Item, as_of: NaiveDate) -> textile_core::Result<u8> {
        let breakdown = self.breakdown(item, as_of)?;
        Ok(self.score_from(&breakdown))
    }

    /// 將分項合成為整數分數（四捨五入後封頂）
    pub fn score_from(&self, breakdown: &RiskBreakdown) -> u8 {
        let max = self.config.max_score;
        breakdown
            .raw_total()
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .max(Decimal::ZERO)
            .min(Decimal::from(max))
            .to_u8()
            .unwrap_or(max)
    }

    pub fn band(&self, score: u8) -> RiskBand {
        RiskBand::from_score(score, &self.config)
    }
}
