//! 情境模擬（What-if）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use textile_core::{AnalyticsError, Item};

use crate::reorder::{ReorderCalculator, StockStatus};

/// 模擬擾動參數
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Perturbation {
    /// 日耗用量增加（%）
    pub consumption_increase_pct: Decimal,

    /// 提前期增加（天，可為負）
    pub lead_time_increase_days: i64,

    /// 單價上漲（%）
    pub rate_increase_pct: Decimal,
}

impl Perturbation {
    /// 不做任何擾動
    pub fn none() -> Self {
        Self::default()
    }

    /// 建構器模式：設置耗用量增加
    pub fn with_consumption_increase_pct(mut self, pct: Decimal) -> Self {
        self.consumption_increase_pct = pct;
        self
    }

    /// 建構器模式：設置提前期增加
    pub fn with_lead_time_increase_days(mut self, days: i64) -> Self {
        self.lead_time_increase_days = days;
        self
    }

    /// 建構器模式：設置單價上漲
    pub fn with_rate_increase_pct(mut self, pct: Decimal) -> Self {
        self.rate_increase_pct = pct;
        self
    }

    pub fn is_identity(&self) -> bool {
        self.consumption_increase_pct.is_zero()
            && self.lead_time_increase_days == 0
            && self.rate_increase_pct.is_zero()
    }
}

/// 單一情境下的再訂購數據
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSnapshot {
    pub daily: Decimal,
    pub lead_days: u32,
    pub rate: Decimal,
    pub reorder_level: Decimal,
    pub reorder_qty: Decimal,
    pub coverage_days: Decimal,
    /// 實際用量 × 單價
    pub cost: Decimal,
}

/// 模擬結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub item_id: u32,
    pub item_name: String,
    pub original: ScenarioSnapshot,
    pub simulated: ScenarioSnapshot,
}

impl SimulationResult {
    /// 成本影響 = 模擬成本 - 原始成本
    pub fn cost_impact(&self) -> Decimal {
        self.simulated.cost - self.original.cost
    }

    /// 模擬後的庫存狀態
    pub fn status(&self) -> StockStatus {
        if self.simulated.reorder_qty > Decimal::ZERO {
            StockStatus::ReorderRequired
        } else {
            StockStatus::Stable
        }
    }
}

/// 情境模擬器
pub struct Simulator;

impl Simulator {
    /// 對物料套用擾動後重新計算再訂購點與成本；原物料不變
    pub fn simulate(item: &Item, perturbation: &Perturbation) -> textile_core::Result<SimulationResult> {
        let perturbed = Self::perturb(item, perturbation)?;

        tracing::debug!(
            "模擬物料 {}：日耗用 {} → {}，提前期 {} → {}，單價 {} → {}",
            item.id,
            item.inventory.daily,
            perturbed.inventory.daily,
            item.inventory.lead_days,
            perturbed.inventory.lead_days,
            item.actual.rate,
            perturbed.actual.rate
        );

        Ok(SimulationResult {
            item_id: item.id,
            item_name: item.name.clone(),
            original: Self::snapshot(item)?,
            simulated: Self::snapshot(&perturbed)?,
        })
    }

    /// 產生擾動後的物料副本
    pub fn perturb(item: &Item, perturbation: &Perturbation) -> textile_core::Result<Item> {
        let mut perturbed = item.clone();

        perturbed.inventory.daily =
            Self::scale(item.inventory.daily, perturbation.consumption_increase_pct).ok_or_else(|| {
                AnalyticsError::InvalidInput(format!(
                    "耗用量變動 {}% 使物料 {} 的日耗用量溢出",
                    perturbation.consumption_increase_pct, item.id
                ))
            })?;
        if item.inventory.has_consumption() && !perturbed.inventory.has_consumption() {
            return Err(AnalyticsError::InvalidInput(format!(
                "耗用量變動 {}% 使物料 {} 的日耗用量不大於 0",
                perturbation.consumption_increase_pct, item.id
            )));
        }

        let invalid_lead = || {
            AnalyticsError::InvalidInput(format!(
                "提前期變動 {} 天使物料 {} 的提前期無效",
                perturbation.lead_time_increase_days, item.id
            ))
        };
        let lead = i64::from(item.inventory.lead_days)
            .checked_add(perturbation.lead_time_increase_days)
            .ok_or_else(invalid_lead)?;
        perturbed.inventory.lead_days = u32::try_from(lead).map_err(|_| invalid_lead())?;

        perturbed.actual.rate =
            Self::scale(item.actual.rate, perturbation.rate_increase_pct).ok_or_else(|| {
                AnalyticsError::InvalidInput(format!(
                    "單價變動 {}% 使物料 {} 的單價溢出",
                    perturbation.rate_increase_pct, item.id
                ))
            })?;
        if perturbed.actual.rate < Decimal::ZERO {
            return Err(AnalyticsError::InvalidInput(format!(
                "單價變動 {}% 使物料 {} 的單價為負數",
                perturbation.rate_increase_pct, item.id
            )));
        }

        Ok(perturbed)
    }

    /// value × (1 + pct / 100)
    fn scale(value: Decimal, pct: Decimal) -> Option<Decimal> {
        let factor = Decimal::ONE.checked_add(pct / Decimal::ONE_HUNDRED)?;
        value.checked_mul(factor)
    }

    fn snapshot(item: &Item) -> textile_core::Result<ScenarioSnapshot> {
        let inventory = &item.inventory;
        let coverage_days = ReorderCalculator::coverage_days(item)?;

        let overflow = |what: &str| {
            AnalyticsError::InvalidInput(format!("物料 {} 的模擬{}溢出", item.id, what))
        };
        let reorder_level = inventory
            .daily
            .checked_mul(Decimal::from(inventory.lead_days))
            .and_then(|demand| demand.checked_add(inventory.safety))
            .ok_or_else(|| overflow("再訂購點"))?;
        let cost = item
            .actual
            .qty
            .checked_mul(item.actual.rate)
            .ok_or_else(|| overflow("成本"))?;

        Ok(ScenarioSnapshot {
            daily: inventory.daily,
            lead_days: inventory.lead_days,
            rate: item.actual.rate,
            reorder_level,
            reorder_qty: reorder_level - inventory.current,
            coverage_days,
            cost,
        })
    }
}
