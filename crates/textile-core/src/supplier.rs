//! 供應商模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 供應商評級
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SupplierGrade {
    C,
    B,
    BPlus,
    A,
    APlus,
}

impl SupplierGrade {
    /// 依可靠度（0-10）查表評級，低於 6 為 C
    pub fn from_reliability(reliability: Decimal) -> Self {
        if reliability >= Decimal::from(9) {
            SupplierGrade::APlus
        } else if reliability >= Decimal::from(8) {
            SupplierGrade::A
        } else if reliability >= Decimal::from(7) {
            SupplierGrade::BPlus
        } else if reliability >= Decimal::from(6) {
            SupplierGrade::B
        } else {
            SupplierGrade::C
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SupplierGrade::APlus => "A+",
            SupplierGrade::A => "A",
            SupplierGrade::BPlus => "B+",
            SupplierGrade::B => "B",
            SupplierGrade::C => "C",
        }
    }
}

/// 供應商（描述性資料）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub name: String,

    /// 供應的物料名稱
    pub item: String,

    /// 承諾交期（天）
    pub promised_lead_days: u32,

    /// 實際交期（天）
    pub actual_lead_days: u32,

    /// 價格變動（%）
    pub price_change_pct: Decimal,

    /// 可靠度（0-10）
    pub reliability: Decimal,

    pub contact: String,
}

impl Supplier {
    pub fn new(name: String, item: String, promised_lead_days: u32, actual_lead_days: u32) -> Self {
        Self {
            name,
            item,
            promised_lead_days,
            actual_lead_days,
            price_change_pct: Decimal::ZERO,
            reliability: Decimal::ZERO,
            contact: String::new(),
        }
    }

    /// 建構器模式：設置價格變動
    pub fn with_price_change_pct(mut self, pct: Decimal) -> Self {
        self.price_change_pct = pct;
        self
    }

    /// 建構器模式：設置可靠度
    pub fn with_reliability(mut self, reliability: Decimal) -> Self {
        self.reliability = reliability;
        self
    }

    /// 建構器模式：設置聯絡方式
    pub fn with_contact(mut self, contact: String) -> Self {
        self.contact = contact;
        self
    }

    pub fn is_on_time(&self) -> bool {
        self.actual_lead_days <= self.promised_lead_days
    }

    /// 實際交期超出承諾的天數（準時為 0）
    pub fn lead_slip_days(&self) -> u32 {
        self.actual_lead_days.saturating_sub(self.promised_lead_days)
    }

    pub fn grade(&self) -> SupplierGrade {
        SupplierGrade::from_reliability(self.reliability)
    }
}
