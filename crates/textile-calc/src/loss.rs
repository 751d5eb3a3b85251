//! 停產損失估算

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use textile_core::{AnalyticsConfig, AnalyticsError, Item};

use crate::reorder::{ReorderCalculator, ReorderResult};

/// 停產損失估算結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LossResult {
    /// 距停產的生產小時數
    pub hours_until_stop: Decimal,
    pub loss_per_hour: Decimal,
    pub loss_per_day: Decimal,
    pub worker_idle_cost: Decimal,
    /// 每日總損失 = 每日產值損失 + 工人閒置成本
    pub total_loss: Decimal,
    pub coverage_days: Decimal,
}

/// 停產損失計算器
///
/// 呼叫端通常只對需要再訂購的物料估算損失，但此處不強制該前提。
#[derive(Debug, Clone, Default)]
pub struct ProductionLossCalculator {
    config: AnalyticsConfig,
}

impl ProductionLossCalculator {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn calculate(&self, item: &Item, as_of: NaiveDate) -> textile_core::Result<LossResult> {
        let reorder = ReorderCalculator::calculate(item, as_of)?;
        self.calculate_from(item, &reorder)
    }

    /// 以已計算的再訂購結果估算損失
    pub fn calculate_from(
        &self,
        item: &Item,
        reorder: &ReorderResult,
    ) -> textile_core::Result<LossResult> {
        let hours_per_day = self.config.production_hours_per_day;
        let coverage_days = reorder.coverage_days;

        let overflow = || AnalyticsError::InvalidInput(format!("物料 {} 的停產損失溢出", item.id));
        let loss_per_day = item
            .production_value
            .checked_mul(hours_per_day)
            .ok_or_else(overflow)?;

        Ok(LossResult {
            hours_until_stop: coverage_days
                .checked_mul(hours_per_day)
                .ok_or_else(overflow)?,
            loss_per_hour: item.production_value,
            loss_per_day,
            worker_idle_cost: item.worker_cost,
            total_loss: loss_per_day
                .checked_add(item.worker_cost)
                .ok_or_else(overflow)?,
            coverage_days,
        })
    }
}
