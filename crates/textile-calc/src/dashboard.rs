//! 儀表板彙總：總覽、訂單台帳、供應商績效

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use textile_core::{Item, Order, OrderStatus, Supplier, SupplierGrade};

use crate::catalog::CatalogAnalyzer;
use crate::reorder::ReorderCalculator;

/// 儀表板總覽
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardOverview {
    /// 計劃總成本
    pub planned_cost: Decimal,

    /// 實際總成本
    pub actual_cost: Decimal,

    /// 淨差異
    pub net_variance: Decimal,

    /// 需要再訂購的物料數
    pub items_at_risk: usize,

    /// 平均風險分數（僅計入可評分的物料）
    pub avg_risk_score: u8,

    /// 無法評分的物料數（如日耗用量為零）
    pub unscored_items: usize,

    pub active_orders: usize,

    pub orders_over_budget: usize,
}

impl DashboardOverview {
    pub fn build(analyzer: &CatalogAnalyzer, items: &[Item], orders: &[Order]) -> Self {
        let planned_cost: Decimal = items.iter().map(|i| i.planned.amount()).sum();
        let actual_cost: Decimal = items.iter().map(|i| i.actual.amount()).sum();

        let items_at_risk = items
            .iter()
            .filter(|i| ReorderCalculator::reorder_level(&i.inventory) > i.inventory.current)
            .count();

        let scores = analyzer.score_all(items);
        let scored: Vec<u8> = scores
            .iter()
            .filter_map(|s| s.score.as_ref().ok().copied())
            .collect();
        let avg_risk_score = if scored.is_empty() {
            0
        } else {
            let sum: Decimal = scored.iter().map(|s| Decimal::from(*s)).sum();
            (sum / Decimal::from(scored.len()))
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_u8()
                .unwrap_or(analyzer.config().max_score)
        };

        Self {
            planned_cost,
            actual_cost,
            net_variance: actual_cost - planned_cost,
            items_at_risk,
            avg_risk_score,
            unscored_items: scores.len() - scored.len(),
            active_orders: orders.len(),
            orders_over_budget: orders.iter().filter(|o| o.is_over_budget()).count(),
        }
    }
}

/// 訂單台帳列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLedgerRow {
    pub order_id: String,
    pub date: NaiveDate,
    pub planned: Decimal,
    pub actual: Decimal,
    pub variance: Decimal,
    pub status: OrderStatus,
    /// 實際/計劃（%），上限 130
    pub spend_ratio_pct: Option<Decimal>,
}

/// 訂單台帳
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLedger {
    pub rows: Vec<OrderLedgerRow>,
    pub total_planned: Decimal,
    pub total_actual: Decimal,
    pub total_variance: Decimal,
    pub over_budget_count: usize,
    /// 絕對差異最大值（趨勢圖縮放用）
    pub max_abs_variance: Decimal,
}

impl OrderLedger {
    pub fn build(orders: &[Order]) -> Self {
        let rows: Vec<OrderLedgerRow> = orders
            .iter()
            .map(|order| OrderLedgerRow {
                order_id: order.id.clone(),
                date: order.date,
                planned: order.planned,
                actual: order.actual,
                variance: order.variance(),
                status: order.status(),
                spend_ratio_pct: order.spend_ratio_pct(),
            })
            .collect();

        let total_planned: Decimal = rows.iter().map(|r| r.planned).sum();
        let total_actual: Decimal = rows.iter().map(|r| r.actual).sum();
        let max_abs_variance = rows
            .iter()
            .map(|r| r.variance.abs())
            .max()
            .unwrap_or(Decimal::ZERO);

        Self {
            over_budget_count: rows
                .iter()
                .filter(|r| r.status == OrderStatus::OverBudget)
                .count(),
            total_variance: total_actual - total_planned,
            total_planned,
            total_actual,
            max_abs_variance,
            rows,
        }
    }
}

/// 供應商績效列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierPerformance {
    pub supplier_name: String,
    pub item: String,
    pub promised_lead_days: u32,
    pub actual_lead_days: u32,
    pub on_time: bool,
    pub lead_slip_days: u32,
    pub price_change_pct: Decimal,
    pub reliability: Decimal,
    pub grade: SupplierGrade,
    pub contact: String,
}

impl SupplierPerformance {
    pub fn build(suppliers: &[Supplier]) -> Vec<Self> {
        suppliers
            .iter()
            .map(|s| Self {
                supplier_name: s.name.clone(),
                item: s.item.clone(),
                promised_lead_days: s.promised_lead_days,
                actual_lead_days: s.actual_lead_days,
                on_time: s.is_on_time(),
                lead_slip_days: s.lead_slip_days(),
                price_change_pct: s.price_change_pct,
                reliability: s.reliability,
                grade: s.grade(),
                contact: s.contact.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textile_core::{AnalyticsConfig, ConsumptionLine, InventoryPosition};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 18).unwrap()
    }

    fn item(id: u32, actual_qty: i64, current: i64, daily: i64) -> Item {
        Item::new(
            id,
            format!("ITEM-{}", id),
            "kg".to_string(),
            ConsumptionLine::new(Decimal::from(100), Decimal::from(250)),
            ConsumptionLine::new(Decimal::from(actual_qty), Decimal::from(260)),
            InventoryPosition::new(Decimal::from(current), Decimal::from(daily), 4, Decimal::from(80)),
        )
        .with_delay_history(2)
    }

    fn order(code: &str, planned: i64, actual: i64) -> Order {
        Order::new(
            code.to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            Decimal::from(planned),
            Decimal::from(actual),
        )
    }

    #[test]
    fn test_overview() {
        let items = vec![item(1, 110, 200, 40), item(2, 110, 200, 40), item(3, 95, 1000, 0)];
        let orders = vec![order("ORD-1", 38000, 41200), order("ORD-2", 52000, 49800)];
        let analyzer = CatalogAnalyzer::new(AnalyticsConfig::default(), as_of());

        let overview = DashboardOverview::build(&analyzer, &items, &orders);

        assert_eq!(overview.planned_cost, Decimal::from(75000));
        assert_eq!(overview.actual_cost, Decimal::from(28600 * 2 + 24700));
        assert_eq!(overview.net_variance, Decimal::from(6900));
        // 第三項庫存 1000 ≥ 再訂購點 80
        assert_eq!(overview.items_at_risk, 2);
        assert_eq!(overview.avg_risk_score, 40);
        assert_eq!(overview.unscored_items, 1);
        assert_eq!(overview.active_orders, 2);
        assert_eq!(overview.orders_over_budget, 1);
    }

    #[test]
    fn test_empty_overview() {
        let analyzer = CatalogAnalyzer::new(AnalyticsConfig::default(), as_of());
        let overview = DashboardOverview::build(&analyzer, &[], &[]);

        assert_eq!(overview.planned_cost, Decimal::ZERO);
        assert_eq!(overview.avg_risk_score, 0);
        assert_eq!(overview.items_at_risk, 0);
    }

    #[test]
    fn test_order_ledger() {
        let ledger = OrderLedger::build(&[
            order("ORD-1", 38000, 41200),
            order("ORD-2", 52000, 49800),
            order("ORD-3", 10000, 20000),
        ]);

        assert_eq!(ledger.rows.len(), 3);
        assert_eq!(ledger.total_planned, Decimal::from(100000));
        assert_eq!(ledger.total_actual, Decimal::from(111000));
        assert_eq!(ledger.total_variance, Decimal::from(11000));
        assert_eq!(ledger.over_budget_count, 2);
        assert_eq!(ledger.max_abs_variance, Decimal::from(10000));
        assert_eq!(ledger.rows[1].status, OrderStatus::UnderBudget);
        assert_eq!(ledger.rows[2].spend_ratio_pct, Some(Decimal::from(130)));
    }

    #[test]
    fn test_supplier_performance() {
        let suppliers = vec![
            Supplier::new("Rajesh Textiles".to_string(), "Fabric".to_string(), 4, 5)
                .with_reliability(Decimal::new(72, 1)),
            Supplier::new("Kumar Threads".to_string(), "Thread".to_string(), 3, 3)
                .with_reliability(Decimal::new(91, 1)),
        ];

        let rows = SupplierPerformance::build(&suppliers);
        assert!(!rows[0].on_time);
        assert_eq!(rows[0].lead_slip_days, 1);
        assert_eq!(rows[0].grade, SupplierGrade::BPlus);
        assert!(rows[1].on_time);
        assert_eq!(rows[1].grade, SupplierGrade::APlus);
    }
}
