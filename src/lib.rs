//! # Textile Analytics
//!
//! 紡織庫存決策支援引擎的統一入口。
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//! use textile_analytics::model::{ConsumptionLine, InventoryPosition, Item};
//!
//! let item = Item::new(
//!     1,
//!     "Fabric".to_string(),
//!     "kg".to_string(),
//!     ConsumptionLine::new(Decimal::from(100), Decimal::from(250)),
//!     ConsumptionLine::new(Decimal::from(110), Decimal::from(260)),
//!     InventoryPosition::new(Decimal::from(200), Decimal::from(40), 4, Decimal::from(80)),
//! );
//!
//! let as_of = NaiveDate::from_ymd_opt(2024, 2, 18).unwrap();
//! let reorder = textile_analytics::engine::compute_reorder(&item, as_of).unwrap();
//! assert_eq!(reorder.reorder_qty, Decimal::from(40));
//! ```

pub mod logging;

pub use textile_calc as engine;
pub use textile_core as model;

pub use textile_calc::{
    compute_production_loss, compute_reorder, compute_risk_score, compute_variance, simulate,
    CatalogAnalyzer, Perturbation,
};
pub use textile_core::{AnalyticsConfig, AnalyticsError, Item, Result};
