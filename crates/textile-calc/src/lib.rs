//! # Textile Analytics Engine
//!
//! 庫存分析計算引擎：成本差異、再訂購點、風險評分、停產損失與情境模擬。
//! 所有計算皆為純函數，不持有狀態，可在多執行緒中直接呼叫。

pub mod catalog;
pub mod dashboard;
pub mod loss;
pub mod reorder;
pub mod risk;
pub mod simulation;
pub mod variance;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use textile_core::Item;

// Re-export 主要類型
pub use catalog::{CatalogAnalyzer, ItemScore, ReorderAlert, StockHealth, VarianceReport, WasteIndex};
pub use dashboard::{DashboardOverview, OrderLedger, SupplierPerformance};
pub use loss::{LossResult, ProductionLossCalculator};
pub use reorder::{ReorderCalculator, ReorderResult, StockStatus};
pub use risk::{RiskBand, RiskBreakdown, RiskScorer};
pub use simulation::{Perturbation, ScenarioSnapshot, SimulationResult, Simulator};
pub use variance::{RootCause, VarianceCalculator, VarianceResult, VarianceStatus, WasteBand};

/// 計算成本差異分解
pub fn compute_variance(item: &Item) -> VarianceResult {
    VarianceCalculator::calculate(item)
}

/// 計算再訂購點與關鍵日期
pub fn compute_reorder(item: &Item, as_of: NaiveDate) -> textile_core::Result<ReorderResult> {
    ReorderCalculator::calculate(item, as_of)
}

/// 以預設參數計算風險分數
pub fn compute_risk_score(item: &Item, as_of: NaiveDate) -> textile_core::Result<u8> {
    RiskScorer::default().score(item, as_of)
}

/// 以預設參數（每日 8 小時）估算停產損失
pub fn compute_production_loss(item: &Item, as_of: NaiveDate) -> textile_core::Result<LossResult> {
    ProductionLossCalculator::default().calculate(item, as_of)
}

/// 情境模擬
pub fn simulate(item: &Item, perturbation: &Perturbation) -> textile_core::Result<SimulationResult> {
    Simulator::simulate(item, perturbation)
}

/// 分析警告（不中斷批次計算）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsWarning {
    pub item_id: u32,
    pub message: String,
    pub severity: WarningSeverity,
}

impl AnalyticsWarning {
    pub fn new(item_id: u32, message: String, severity: WarningSeverity) -> Self {
        Self {
            item_id,
            message,
            severity,
        }
    }

    pub fn warning(item_id: u32, message: String) -> Self {
        Self::new(item_id, message, WarningSeverity::Warning)
    }

    pub fn error(item_id: u32, message: String) -> Self {
        Self::new(item_id, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningSeverity {
    Warning,
    Error,
}
