//! 物料模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AnalyticsError, Result};

/// 用量與單價（計劃或實際）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionLine {
    /// 數量
    pub qty: Decimal,

    /// 單價
    pub rate: Decimal,
}

impl ConsumptionLine {
    pub fn new(qty: Decimal, rate: Decimal) -> Self {
        Self { qty, rate }
    }

    /// 金額 = 數量 × 單價
    pub fn amount(&self) -> Decimal {
        self.qty * self.rate
    }
}

/// 庫存狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryPosition {
    /// 現有庫存
    pub current: Decimal,

    /// 日耗用量
    pub daily: Decimal,

    /// 採購提前期（天）
    pub lead_days: u32,

    /// 安全庫存
    pub safety: Decimal,
}

impl InventoryPosition {
    pub fn new(current: Decimal, daily: Decimal, lead_days: u32, safety: Decimal) -> Self {
        Self {
            current,
            daily,
            lead_days,
            safety,
        }
    }

    /// 是否有正的日耗用量（覆蓋天數計算的前提）
    pub fn has_consumption(&self) -> bool {
        self.daily > Decimal::ZERO
    }
}

/// 物料（一條庫存材料線）
///
/// 分析引擎只讀取物料，不會修改它；所有衍生結果每次呼叫時重新計算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// 物料ID
    pub id: u32,

    /// 物料名稱
    pub name: String,

    /// 計量單位
    pub unit: String,

    /// BOM 計劃用量
    pub planned: ConsumptionLine,

    /// 實際耗用
    pub actual: ConsumptionLine,

    /// 庫存參數
    pub inventory: InventoryPosition,

    /// 最低庫存（僅供參考）
    pub minimum_stock: Decimal,

    /// 供應商名稱
    pub supplier: String,

    /// 每小時產值（物料可用時）
    pub production_value: Decimal,

    /// 停工時每日工人閒置成本
    pub worker_cost: Decimal,

    /// 供應商歷史延遲次數
    pub delay_history: u32,
}

impl Item {
    /// 創建新的物料
    pub fn new(
        id: u32,
        name: String,
        unit: String,
        planned: ConsumptionLine,
        actual: ConsumptionLine,
        inventory: InventoryPosition,
    ) -> Self {
        Self {
            id,
            name,
            unit,
            planned,
            actual,
            inventory,
            minimum_stock: Decimal::ZERO,
            supplier: String::new(),
            production_value: Decimal::ZERO,
            worker_cost: Decimal::ZERO,
            delay_history: 0,
        }
    }

    /// 建構器模式：設置供應商
    pub fn with_supplier(mut self, supplier: String) -> Self {
        self.supplier = supplier;
        self
    }

    /// 建構器模式：設置每小時產值
    pub fn with_production_value(mut self, value: Decimal) -> Self {
        self.production_value = value;
        self
    }

    /// 建構器模式：設置工人閒置成本
    pub fn with_worker_cost(mut self, cost: Decimal) -> Self {
        self.worker_cost = cost;
        self
    }

    /// 建構器模式：設置延遲次數
    pub fn with_delay_history(mut self, delays: u32) -> Self {
        self.delay_history = delays;
        self
    }

    /// 建構器模式：設置最低庫存
    pub fn with_minimum_stock(mut self, minimum_stock: Decimal) -> Self {
        self.minimum_stock = minimum_stock;
        self
    }

    /// 建構器模式：替換庫存參數
    pub fn with_inventory(mut self, inventory: InventoryPosition) -> Self {
        self.inventory = inventory;
        self
    }

    /// 物料編碼，例如 `ITM-007`
    pub fn item_code(&self) -> String {
        format!("ITM-{:03}", self.id)
    }

    /// 檢查所有數量與金額欄位非負
    ///
    /// 日耗用量為零在此處是允許的；它只在覆蓋天數相關計算中才是錯誤。
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("planned.qty", self.planned.qty),
            ("planned.rate", self.planned.rate),
            ("actual.qty", self.actual.qty),
            ("actual.rate", self.actual.rate),
            ("inventory.current", self.inventory.current),
            ("inventory.daily", self.inventory.daily),
            ("inventory.safety", self.inventory.safety),
            ("minimum_stock", self.minimum_stock),
            ("production_value", self.production_value),
            ("worker_cost", self.worker_cost),
        ];

        for (field, value) in fields {
            if value < Decimal::ZERO {
                return Err(AnalyticsError::InvalidInput(format!(
                    "物料 {} 的 {} 不可為負數：{}",
                    self.id, field, value
                )));
            }
        }

        Ok(())
    }
}

/// 依物料ID查找
pub fn find_item(items: &[Item], id: u32) -> Result<&Item> {
    items
        .iter()
        .find(|item| item.id == id)
        .ok_or(AnalyticsError::ItemNotFound(id))
}
