//! 生產訂單模型（僅用於訂單台帳彙總）

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 訂單預算狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// 超出預算
    OverBudget,
    /// 預算內
    UnderBudget,
}

/// 生產訂單
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// 訂單編號（如 ORD-2024-001）
    pub id: String,

    /// 開始日期
    pub date: NaiveDate,

    /// 計劃成本
    pub planned: Decimal,

    /// 實際成本
    pub actual: Decimal,
}

impl Order {
    /// 台帳中實際/計劃比例的顯示上限（%）
    pub const SPEND_RATIO_CAP: u32 = 130;

    /// 創建新的訂單
    pub fn new(id: String, date: NaiveDate, planned: Decimal, actual: Decimal) -> Self {
        Self {
            id,
            date,
            planned,
            actual,
        }
    }

    /// 差異 = 實際 - 計劃
    pub fn variance(&self) -> Decimal {
        self.actual - self.planned
    }

    pub fn is_over_budget(&self) -> bool {
        self.variance() > Decimal::ZERO
    }

    pub fn status(&self) -> OrderStatus {
        if self.is_over_budget() {
            OrderStatus::OverBudget
        } else {
            OrderStatus::UnderBudget
        }
    }

    /// 實際/計劃比例（%），上限 130；計劃成本為零時無意義
    pub fn spend_ratio_pct(&self) -> Option<Decimal> {
        if self.planned <= Decimal::ZERO {
            return None;
        }
        let cap = Decimal::from(Self::SPEND_RATIO_CAP);
        let ratio = self
            .actual
            .checked_div(self.planned)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map_or(cap, |pct| pct.min(cap));
        Some(ratio)
    }
}
