//! 資料存取邊界的扁平記錄與轉換
//!
//! 外部資料層以扁平欄位（`planned_qty`、`daily_consumption`…）傳遞物料；
//! 分析引擎只接受巢狀的 [`Item`]。所有轉換集中在此處。

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    AnalyticsError, ConsumptionLine, InventoryPosition, Item, Order, Result, Supplier,
};

/// 扁平物料記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    pub unit: String,
    pub planned_qty: Decimal,
    pub planned_rate: Decimal,
    pub actual_qty: Decimal,
    pub actual_rate: Decimal,
    pub current_stock: Decimal,
    #[serde(default)]
    pub minimum_stock: Decimal,
    pub daily_consumption: Decimal,
    pub lead_time_days: u32,
    pub safety_stock: Decimal,
    #[serde(default)]
    pub supplier_name: String,
    #[serde(default)]
    pub production_value: Decimal,
    #[serde(default)]
    pub worker_cost: Decimal,
    #[serde(default)]
    pub delay_history: u32,
}

impl ItemRecord {
    /// 解析 JSON 陣列並轉換為物料清單
    pub fn parse_catalog(json: &str) -> Result<Vec<Item>> {
        let records: Vec<ItemRecord> = serde_json::from_str(json)?;
        records.into_iter().map(Item::try_from).collect()
    }
}

impl TryFrom<ItemRecord> for Item {
    type Error = AnalyticsError;

    fn try_from(record: ItemRecord) -> Result<Self> {
        let item = Item::new(
            record.id,
            record.name,
            record.unit,
            ConsumptionLine::new(record.planned_qty, record.planned_rate),
            ConsumptionLine::new(record.actual_qty, record.actual_rate),
            InventoryPosition::new(
                record.current_stock,
                record.daily_consumption,
                record.lead_time_days,
                record.safety_stock,
            ),
        )
        .with_minimum_stock(record.minimum_stock)
        .with_supplier(record.supplier_name)
        .with_production_value(record.production_value)
        .with_worker_cost(record.worker_cost)
        .with_delay_history(record.delay_history);

        item.validate()?;
        Ok(item)
    }
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            unit: item.unit.clone(),
            planned_qty: item.planned.qty,
            planned_rate: item.planned.rate,
            actual_qty: item.actual.qty,
            actual_rate: item.actual.rate,
            current_stock: item.inventory.current,
            minimum_stock: item.minimum_stock,
            daily_consumption: item.inventory.daily,
            lead_time_days: item.inventory.lead_days,
            safety_stock: item.inventory.safety,
            supplier_name: item.supplier.clone(),
            production_value: item.production_value,
            worker_cost: item.worker_cost,
            delay_history: item.delay_history,
        }
    }
}

/// 物料部分更新（未提供的欄位保持不變）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub planned_qty: Option<Decimal>,
    pub planned_rate: Option<Decimal>,
    pub actual_qty: Option<Decimal>,
    pub actual_rate: Option<Decimal>,
    pub current_stock: Option<Decimal>,
    pub minimum_stock: Option<Decimal>,
    pub daily_consumption: Option<Decimal>,
    pub lead_time_days: Option<u32>,
    pub safety_stock: Option<Decimal>,
    pub supplier_name: Option<String>,
    pub production_value: Option<Decimal>,
    pub worker_cost: Option<Decimal>,
    pub delay_history: Option<u32>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// 套用更新，返回新的物料；原物料不變
    pub fn apply(&self, item: &Item) -> Result<Item> {
        let mut updated = item.clone();

        if let Some(name) = &self.name {
            updated.name = name.clone();
        }
        if let Some(unit) = &self.unit {
            updated.unit = unit.clone();
        }
        if let Some(qty) = self.planned_qty {
            updated.planned.qty = qty;
        }
        if let Some(rate) = self.planned_rate {
            updated.planned.rate = rate;
        }
        if let Some(qty) = self.actual_qty {
            updated.actual.qty = qty;
        }
        if let Some(rate) = self.actual_rate {
            updated.actual.rate = rate;
        }
        if let Some(current) = self.current_stock {
            updated.inventory.current = current;
        }
        if let Some(minimum) = self.minimum_stock {
            updated.minimum_stock = minimum;
        }
        if let Some(daily) = self.daily_consumption {
            updated.inventory.daily = daily;
        }
        if let Some(lead) = self.lead_time_days {
            updated.inventory.lead_days = lead;
        }
        if let Some(safety) = self.safety_stock {
            updated.inventory.safety = safety;
        }
        if let Some(supplier) = &self.supplier_name {
            updated.supplier = supplier.clone();
        }
        if let Some(value) = self.production_value {
            updated.production_value = value;
        }
        if let Some(cost) = self.worker_cost {
            updated.worker_cost = cost;
        }
        if let Some(delays) = self.delay_history {
            updated.delay_history = delays;
        }

        updated.validate()?;
        Ok(updated)
    }
}

/// 扁平訂單記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(default)]
    pub id: u32,
    pub order_code: String,
    /// 例如 `15 Jan 2024` 或 `2024-01-15`
    pub start_date: String,
    pub planned_total: Decimal,
    pub actual_total: Decimal,
}

impl OrderRecord {
    const DATE_FORMATS: [&'static str; 2] = ["%d %b %Y", "%Y-%m-%d"];

    fn parse_date(raw: &str) -> Result<NaiveDate> {
        let trimmed = raw.trim();
        Self::DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
            .ok_or_else(|| AnalyticsError::InvalidDate(raw.to_string()))
    }
}

impl TryFrom<OrderRecord> for Order {
    type Error = AnalyticsError;

    fn try_from(record: OrderRecord) -> Result<Self> {
        let date = OrderRecord::parse_date(&record.start_date)?;
        Ok(Order::new(
            record.order_code,
            date,
            record.planned_total,
            record.actual_total,
        ))
    }
}

/// 扁平供應商記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierRecord {
    pub supplier_name: String,
    pub item: String,
    #[serde(default)]
    pub contact: String,
    pub promised_lead_days: u32,
    pub actual_lead_days: u32,
    #[serde(default)]
    pub price_change_percent: Decimal,
    #[serde(default)]
    pub reliability_score: Decimal,
}

impl From<SupplierRecord> for Supplier {
    fn from(record: SupplierRecord) -> Self {
        Supplier::new(
            record.supplier_name,
            record.item,
            record.promised_lead_days,
            record.actual_lead_days,
        )
        .with_price_change_pct(record.price_change_percent)
        .with_reliability(record.reliability_score)
        .with_contact(record.contact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FABRIC_JSON: &str = r#"[{
        "id": 1,
        "name": "Fabric",
        "unit": "kg",
        "planned_qty": 100,
        "planned_rate": 250,
        "actual_qty": 110,
        "actual_rate": 260,
        "current_stock": 200,
        "minimum_stock": 80,
        "daily_consumption": 40,
        "lead_time_days": 4,
        "safety_stock": 80,
        "supplier_name": "Rajesh Textiles",
        "production_value": 4200,
        "worker_cost": 1800,
        "delay_history": 2
    }]"#;

    #[test]
    fn test_flat_record_to_item() {
        let items = ItemRecord::parse_catalog(FABRIC_JSON).unwrap();
        assert_eq!(items.len(), 1);

        let item = &items[0];
        assert_eq!(item.id, 1);
        assert_eq!(item.planned, ConsumptionLine::new(Decimal::from(100), Decimal::from(250)));
        assert_eq!(item.actual, ConsumptionLine::new(Decimal::from(110), Decimal::from(260)));
        assert_eq!(item.inventory.current, Decimal::from(200));
        assert_eq!(item.inventory.daily, Decimal::from(40));
        assert_eq!(item.inventory.lead_days, 4);
        assert_eq!(item.inventory.safety, Decimal::from(80));
        assert_eq!(item.minimum_stock, Decimal::from(80));
        assert_eq!(item.supplier, "Rajesh Textiles");
        assert_eq!(item.delay_history, 2);
    }

    #[test]
    fn test_item_back_to_flat_record() {
        let items = ItemRecord::parse_catalog(FABRIC_JSON).unwrap();
        let record = ItemRecord::from(&items[0]);

        assert_eq!(record.daily_consumption, Decimal::from(40));
        assert_eq!(record.supplier_name, "Rajesh Textiles");
        assert_eq!(Item::try_from(record).unwrap(), items[0]);
    }

    #[test]
    fn test_negative_record_rejected() {
        let json = FABRIC_JSON.replace("\"current_stock\": 200", "\"current_stock\": -5");
        let err = ItemRecord::parse_catalog(&json).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput(_)));
    }

    #[test]
    fn test_item_patch() {
        let items = ItemRecord::parse_catalog(FABRIC_JSON).unwrap();
        let patch: ItemPatch =
            serde_json::from_str(r#"{ "current_stock": 150, "delay_history": 3 }"#).unwrap();

        assert!(!patch.is_empty());
        let updated = patch.apply(&items[0]).unwrap();

        assert_eq!(updated.inventory.current, Decimal::from(150));
        assert_eq!(updated.delay_history, 3);
        assert_eq!(updated.name, "Fabric");
        // 原物料不變
        assert_eq!(items[0].inventory.current, Decimal::from(200));
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let items = ItemRecord::parse_catalog(FABRIC_JSON).unwrap();
        let patch = ItemPatch::default();

        assert!(patch.is_empty());
        assert_eq!(patch.apply(&items[0]).unwrap(), items[0]);
    }

    #[test]
    fn test_order_record_dates() {
        let record = OrderRecord {
            id: 1,
            order_code: "ORD-2024-001".to_string(),
            start_date: "15 Jan 2024".to_string(),
            planned_total: Decimal::from(38000),
            actual_total: Decimal::from(41200),
        };
        let order = Order::try_from(record.clone()).unwrap();
        assert_eq!(order.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(order.variance(), Decimal::from(3200));

        let iso = OrderRecord {
            start_date: "2024-02-01".to_string(),
            ..record.clone()
        };
        assert_eq!(
            Order::try_from(iso).unwrap().date,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );

        let bad = OrderRecord {
            start_date: "sometime".to_string(),
            ..record
        };
        assert!(matches!(
            Order::try_from(bad),
            Err(AnalyticsError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_supplier_record() {
        let record: SupplierRecord = serde_json::from_str(
            r#"{
                "supplier_name": "Rajesh Textiles",
                "item": "Fabric",
                "contact": "+91 98400 11111",
                "promised_lead_days": 4,
                "actual_lead_days": 5,
                "price_change_percent": 4,
                "reliability_score": 7.2
            }"#,
        )
        .unwrap();

        let supplier = Supplier::from(record);
        assert_eq!(supplier.name, "Rajesh Textiles");
        assert_eq!(supplier.reliability, Decimal::new(72, 1));
        assert!(!supplier.is_on_time());
    }
}
