//! # Textile Core
//!
//! 紡織庫存分析的核心資料模型與類型定義

pub mod config;
pub mod item;
pub mod order;
pub mod purchase;
pub mod record;
pub mod supplier;

// Re-export 主要類型
pub use config::AnalyticsConfig;
pub use item::{find_item, ConsumptionLine, InventoryPosition, Item};
pub use order::{Order, OrderStatus};
pub use purchase::{
    PurchaseOrder, PurchaseOrderPriority, PurchaseOrderSession, PurchaseOrderStatus,
    PurchaseOrderTotals,
};
pub use record::{ItemPatch, ItemRecord, OrderRecord, SupplierRecord};
pub use supplier::{Supplier, SupplierGrade};

/// 分析引擎錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// 日耗用量為零時無法計算覆蓋天數與再訂購日期
    #[error("物料 {item_id} 的日耗用量為零，無法計算覆蓋天數")]
    ZeroDailyConsumption { item_id: u32 },

    #[error("無效的輸入: {0}")]
    InvalidInput(String),

    #[error("無效的日期: {0}")]
    InvalidDate(String),

    #[error("日期溢出: {0}")]
    DateOverflow(String),

    #[error("找不到物料: {0}")]
    ItemNotFound(u32),

    #[error("配置錯誤: {0}")]
    ConfigError(String),

    #[error("序列化錯誤: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
