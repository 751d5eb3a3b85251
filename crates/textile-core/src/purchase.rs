//! 採購單模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AnalyticsError, Item, Result};

/// 採購單狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseOrderStatus {
    Draft,
    Submitted,
    Approved,
    Cancelled,
}

/// 採購單優先級
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PurchaseOrderPriority {
    Low,
    Medium,
    High,
    Critical,
}

/// 採購單金額明細
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderTotals {
    /// 小計 = 數量 × 單價
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    /// 折扣後金額
    pub taxable_amount: Decimal,
    pub gst_amount: Decimal,
    /// 含稅總額
    pub total: Decimal,
    pub advance_amount: Decimal,
    pub balance_due: Decimal,
}

/// 採購單
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// 採購單ID
    pub id: Uuid,

    /// 採購單號（如 PO-123456）
    pub po_number: String,

    pub po_date: NaiveDate,

    pub status: PurchaseOrderStatus,

    pub priority: PurchaseOrderPriority,

    pub requested_by: String,

    pub department: String,

    pub item_name: String,

    /// 物料編碼（如 ITM-001）
    pub item_code: String,

    pub unit: String,

    /// 下單時的現有庫存
    pub current_stock: Decimal,

    /// 下單時的再訂購點
    pub reorder_level: Decimal,

    /// 訂購數量
    pub order_qty: Decimal,

    /// 單價
    pub unit_rate: Decimal,

    /// 稅率（%）
    pub gst_pct: Decimal,

    /// 折扣（%）
    pub discount_pct: Decimal,

    /// 預付款比例（%）
    pub advance_pct: Decimal,

    pub supplier_name: String,

    /// 需求日期
    pub required_by: Option<NaiveDate>,

    /// 預計到貨日期
    pub expected_delivery: Option<NaiveDate>,

    pub approved_by: Option<String>,

    pub approval_date: Option<NaiveDate>,

    pub remarks: String,
}

impl PurchaseOrder {
    /// 預設稅率（%）
    pub const DEFAULT_GST_PCT: u32 = 18;

    /// 創建新的採購單草稿
    pub fn new(
        po_number: String,
        po_date: NaiveDate,
        item_name: String,
        order_qty: Decimal,
        unit_rate: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            po_number,
            po_date,
            status: PurchaseOrderStatus::Draft,
            priority: PurchaseOrderPriority::High,
            requested_by: String::new(),
            department: "Production".to_string(),
            item_name,
            item_code: String::new(),
            unit: String::new(),
            current_stock: Decimal::ZERO,
            reorder_level: Decimal::ZERO,
            order_qty,
            unit_rate,
            gst_pct: Decimal::from(Self::DEFAULT_GST_PCT),
            discount_pct: Decimal::ZERO,
            advance_pct: Decimal::ZERO,
            supplier_name: String::new(),
            required_by: None,
            expected_delivery: None,
            approved_by: None,
            approval_date: None,
            remarks: String::new(),
        }
    }

    /// 依物料與再訂購結果預填草稿
    ///
    /// 訂購數量取建議再訂購量（不足零時為零），單價取實際單價。
    pub fn for_item(
        item: &Item,
        po_number: String,
        po_date: NaiveDate,
        reorder_level: Decimal,
        reorder_qty: Decimal,
    ) -> Self {
        let mut po = Self::new(
            po_number,
            po_date,
            item.name.clone(),
            reorder_qty.max(Decimal::ZERO),
            item.actual.rate,
        );
        po.item_code = item.item_code();
        po.unit = item.unit.clone();
        po.current_stock = item.inventory.current;
        po.reorder_level = reorder_level;
        po.supplier_name = item.supplier.clone();
        po
    }

    /// 建構器模式：設置優先級
    pub fn with_priority(mut self, priority: PurchaseOrderPriority) -> Self {
        self.priority = priority;
        self
    }

    /// 建構器模式：設置申請人
    pub fn with_requested_by(mut self, requested_by: String) -> Self {
        self.requested_by = requested_by;
        self
    }

    /// 建構器模式：設置稅率
    pub fn with_gst_pct(mut self, pct: Decimal) -> Self {
        self.gst_pct = pct;
        self
    }

    /// 建構器模式：設置折扣
    pub fn with_discount_pct(mut self, pct: Decimal) -> Self {
        self.discount_pct = pct;
        self
    }

    /// 建構器模式：設置預付款比例
    pub fn with_advance_pct(mut self, pct: Decimal) -> Self {
        self.advance_pct = pct;
        self
    }

    /// 建構器模式：設置需求與預計到貨日期
    pub fn with_schedule(mut self, required_by: NaiveDate, expected_delivery: NaiveDate) -> Self {
        self.required_by = Some(required_by);
        self.expected_delivery = Some(expected_delivery);
        self
    }

    /// 計算金額明細
    pub fn totals(&self) -> PurchaseOrderTotals {
        let hundred = Decimal::ONE_HUNDRED;
        let subtotal = self.order_qty * self.unit_rate;
        let discount_amount = subtotal * self.discount_pct / hundred;
        let taxable_amount = subtotal - discount_amount;
        let gst_amount = taxable_amount * self.gst_pct / hundred;
        let total = taxable_amount + gst_amount;
        let advance_amount = total * self.advance_pct / hundred;

        PurchaseOrderTotals {
            subtotal,
            discount_amount,
            taxable_amount,
            gst_amount,
            total,
            advance_amount,
            balance_due: total - advance_amount,
        }
    }

    /// 檢查採購單內容
    pub fn validate(&self) -> Result<()> {
        if self.order_qty <= Decimal::ZERO {
            return Err(AnalyticsError::InvalidInput(format!(
                "採購單 {} 的訂購數量必須大於 0：{}",
                self.po_number, self.order_qty
            )));
        }

        if self.unit_rate < Decimal::ZERO {
            return Err(AnalyticsError::InvalidInput(format!(
                "採購單 {} 的單價不可為負數",
                self.po_number
            )));
        }

        let percents = [
            ("gst_pct", self.gst_pct),
            ("discount_pct", self.discount_pct),
            ("advance_pct", self.advance_pct),
        ];
        for (field, value) in percents {
            if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                return Err(AnalyticsError::InvalidInput(format!(
                    "採購單 {} 的 {} 必須介於 0 到 100：{}",
                    self.po_number, field, value
                )));
            }
        }

        Ok(())
    }

    /// 提交草稿
    pub fn submit(mut self) -> Result<Self> {
        if self.status != PurchaseOrderStatus::Draft {
            return Err(AnalyticsError::InvalidInput(format!(
                "只有草稿可以提交：{} 目前為 {:?}",
                self.po_number, self.status
            )));
        }
        self.validate()?;
        self.status = PurchaseOrderStatus::Submitted;
        Ok(self)
    }

    /// 核准已提交的採購單
    pub fn approve(mut self, approved_by: String, approval_date: NaiveDate) -> Result<Self> {
        if self.status != PurchaseOrderStatus::Submitted {
            return Err(AnalyticsError::InvalidInput(format!(
                "只有已提交的採購單可以核准：{} 目前為 {:?}",
                self.po_number, self.status
            )));
        }
        self.status = PurchaseOrderStatus::Approved;
        self.approved_by = Some(approved_by);
        self.approval_date = Some(approval_date);
        Ok(self)
    }

    pub fn cancel(mut self) -> Self {
        self.status = PurchaseOrderStatus::Cancelled;
        self
    }

    /// 收貨：返回庫存增加訂購數量後的新物料
    pub fn receive_into(&self, item: &Item) -> Result<Item> {
        if item.name != self.item_name {
            return Err(AnalyticsError::InvalidInput(format!(
                "採購單 {} 屬於 {}，不能入庫到 {}",
                self.po_number, self.item_name, item.name
            )));
        }
        if self.status == PurchaseOrderStatus::Cancelled {
            return Err(AnalyticsError::InvalidInput(format!(
                "採購單 {} 已取消",
                self.po_number
            )));
        }

        let mut received = item.clone();
        received.inventory.current += self.order_qty;
        Ok(received)
    }
}

/// 會話內已提交的採購單清單（由呼叫端持有）
///
/// 同一物料重複提交時取代先前的採購單。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchaseOrderSession {
    submitted: Vec<PurchaseOrder>,
}

impl PurchaseOrderSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 提交草稿並記錄；返回是否取代了既有採購單
    pub fn submit(&mut self, draft: PurchaseOrder) -> Result<bool> {
        let po = draft.submit()?;

        match self
            .submitted
            .iter()
            .position(|existing| existing.item_name == po.item_name)
        {
            Some(index) => {
                self.submitted[index] = po;
                Ok(true)
            }
            None => {
                self.submitted.push(po);
                Ok(false)
            }
        }
    }

    pub fn orders(&self) -> &[PurchaseOrder] {
        &self.submitted
    }

    pub fn find_by_item(&self, item_name: &str) -> Option<&PurchaseOrder> {
        self.submitted.iter().find(|po| po.item_name == item_name)
    }

    pub fn len(&self) -> usize {
        self.submitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submitted.is_empty()
    }

    /// 所有已提交採購單的含稅總額
    pub fn committed_total(&self) -> Decimal {
        self.submitted.iter().map(|po| po.totals().total).sum()
    }
}
