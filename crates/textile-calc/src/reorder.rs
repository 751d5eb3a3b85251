//! 再訂購點計算

use chrono::{Days, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use textile_core::{AnalyticsError, InventoryPosition, Item};

/// 庫存狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    /// 無需補貨
    Stable,
    /// 需要再訂購
    ReorderRequired,
}

/// 再訂購計算結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderResult {
    /// 再訂購點 = 日耗用 × 提前期 + 安全庫存
    pub reorder_level: Decimal,

    /// 建議再訂購量（≤ 0 表示無需補貨）
    pub reorder_qty: Decimal,

    /// 覆蓋天數（一位小數）
    pub coverage_days: Decimal,

    /// 預計缺貨日期
    pub stockout_date: NaiveDate,

    /// 距最晚下單日的天數
    pub days_until_order: u64,

    /// 最晚下單日期
    pub order_by_date: NaiveDate,

    /// 預計到貨日期
    pub delivery_date: NaiveDate,
}

impl ReorderResult {
    pub fn needs_reorder(&self) -> bool {
        self.reorder_qty > Decimal::ZERO
    }

    pub fn status(&self) -> StockStatus {
        if self.needs_reorder() {
            StockStatus::ReorderRequired
        } else {
            StockStatus::Stable
        }
    }
}

/// 再訂購計算器
pub struct ReorderCalculator;

impl ReorderCalculator {
    /// 計算再訂購點、覆蓋天數與關鍵日期
    ///
    /// 所有日期以 `as_of` 為基準按日曆日推算。日耗用量為零時返回
    /// [`AnalyticsError::ZeroDailyConsumption`]。
    pub fn calculate(item: &Item, as_of: NaiveDate) -> textile_core::Result<ReorderResult> {
        let inventory = &item.inventory;
        let lead_days = u64::from(inventory.lead_days);

        let reorder_level = Self::reorder_level(inventory);
        let reorder_qty = reorder_level - inventory.current;
        let coverage_days = Self::coverage_days(item)?;

        let whole_days = coverage_days.floor().to_u64().ok_or_else(|| {
            AnalyticsError::DateOverflow(format!(
                "物料 {} 的覆蓋天數過大：{}",
                item.id, coverage_days
            ))
        })?;
        let days_until_order = whole_days.saturating_sub(lead_days);

        let stockout_date = add_days(as_of, whole_days)?;
        let order_by_date = add_days(as_of, days_until_order)?;
        let delivery_date = add_days(order_by_date, lead_days)?;

        tracing::debug!(
            "物料 {} 再訂購點 {}，建議量 {}，覆蓋 {} 天",
            item.id,
            reorder_level,
            reorder_qty,
            coverage_days
        );

        Ok(ReorderResult {
            reorder_level,
            reorder_qty,
            coverage_days,
            stockout_date,
            days_until_order,
            order_by_date,
            delivery_date,
        })
    }

    /// 再訂購點（不需要日耗用量為正）
    pub fn reorder_level(inventory: &InventoryPosition) -> Decimal {
        inventory.daily * Decimal::from(inventory.lead_days) + inventory.safety
    }

    /// 覆蓋天數 = 現有庫存 / 日耗用，四捨五入到一位小數
    pub fn coverage_days(item: &Item) -> textile_core::Result<Decimal> {
        let inventory = &item.inventory;
        if !inventory.has_consumption() {
            tracing::warn!("物料 {} 日耗用量為 {}，無法計算覆蓋天數", item.id, inventory.daily);
            return Err(AnalyticsError::ZeroDailyConsumption { item_id: item.id });
        }

        let coverage = inventory.current.checked_div(inventory.daily).ok_or_else(|| {
            AnalyticsError::DateOverflow(format!(
                "物料 {} 的覆蓋天數過大：{} / {}",
                item.id, inventory.current, inventory.daily
            ))
        })?;

        Ok(coverage.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
    }
}

fn add_days(date: NaiveDate, days: u64) -> textile_core::Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| AnalyticsError::DateOverflow(format!("{} + {} 天", date, days)))
}
