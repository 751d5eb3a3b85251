//! 紡織庫存儀表板示例

use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use textile_analytics::engine::{DashboardOverview, OrderLedger, SupplierPerformance};
use textile_analytics::model::{
    find_item, ItemRecord, Order, OrderRecord, PurchaseOrder, PurchaseOrderSession, Supplier,
    SupplierRecord,
};
use textile_analytics::{logging, simulate, AnalyticsConfig, CatalogAnalyzer, Perturbation};

const ITEMS: &str = r#"[
    { "id": 1, "name": "Fabric", "unit": "kg",
      "planned_qty": 100, "planned_rate": 250, "actual_qty": 110, "actual_rate": 260,
      "current_stock": 200, "minimum_stock": 80, "daily_consumption": 40,
      "lead_time_days": 4, "safety_stock": 80, "supplier_name": "Rajesh Textiles",
      "production_value": 4200, "worker_cost": 1800, "delay_history": 2 },
    { "id": 2, "name": "Thread", "unit": "spools",
      "planned_qty": 500, "planned_rate": 12, "actual_qty": 480, "actual_rate": 12.5,
      "current_stock": 900, "minimum_stock": 150, "daily_consumption": 60,
      "lead_time_days": 3, "safety_stock": 150, "supplier_name": "Kumar Threads",
      "production_value": 1500, "worker_cost": 900, "delay_history": 0 },
    { "id": 3, "name": "Dye", "unit": "L",
      "planned_qty": 60, "planned_rate": 400, "actual_qty": 72, "actual_rate": 430,
      "current_stock": 45, "minimum_stock": 30, "daily_consumption": 15,
      "lead_time_days": 10, "safety_stock": 30, "supplier_name": "Color Chem",
      "production_value": 3000, "worker_cost": 1200, "delay_history": 4 },
    { "id": 4, "name": "Zips", "unit": "pcs",
      "planned_qty": 1000, "planned_rate": 3, "actual_qty": 0, "actual_rate": 3,
      "current_stock": 2500, "minimum_stock": 200, "daily_consumption": 0,
      "lead_time_days": 5, "safety_stock": 200, "supplier_name": "Metro Trims" }
]"#;

const ORDERS: &str = r#"[
    { "id": 1, "order_code": "ORD-2024-001", "start_date": "15 Jan 2024",
      "planned_total": 38000, "actual_total": 41200 },
    { "id": 2, "order_code": "ORD-2024-002", "start_date": "2024-01-22",
      "planned_total": 52000, "actual_total": 49800 }
]"#;

const SUPPLIERS: &str = r#"[
    { "supplier_name": "Rajesh Textiles", "item": "Fabric", "contact": "+91 98400 11223",
      "promised_lead_days": 4, "actual_lead_days": 5,
      "price_change_percent": 4, "reliability_score": 7.2 },
    { "supplier_name": "Kumar Threads", "item": "Thread", "contact": "+91 98400 44556",
      "promised_lead_days": 3, "actual_lead_days": 3,
      "price_change_percent": 1.5, "reliability_score": 9.1 }
]"#;

fn main() -> anyhow::Result<()> {
    logging::init();

    println!("=== 紡織庫存儀表板示例 ===\n");

    let as_of = NaiveDate::from_ymd_opt(2024, 2, 18).context("無效的基準日期")?;
    let items = ItemRecord::parse_catalog(ITEMS).context("解析物料目錄失敗")?;
    let orders = serde_json::from_str::<Vec<OrderRecord>>(ORDERS)?
        .into_iter()
        .map(Order::try_from)
        .collect::<textile_analytics::Result<Vec<_>>>()
        .context("解析訂單失敗")?;
    let suppliers: Vec<Supplier> = serde_json::from_str::<Vec<SupplierRecord>>(SUPPLIERS)?
        .into_iter()
        .map(Supplier::from)
        .collect();

    let analyzer = CatalogAnalyzer::new(AnalyticsConfig::default(), as_of);

    let overview = DashboardOverview::build(&analyzer, &items, &orders);
    println!("總覽:");
    println!("  計劃成本: {}", overview.planned_cost);
    println!("  實際成本: {}", overview.actual_cost);
    println!("  淨差異: {}", overview.net_variance);
    println!("  需再訂購物料: {}", overview.items_at_risk);
    println!("  平均風險分數: {}（未評分 {}）", overview.avg_risk_score, overview.unscored_items);

    println!("\n成本差異:");
    let report = analyzer.variance_report(&items);
    for row in &report.rows {
        println!(
            "  - {}: 差異 {}，價格 {}，數量 {}，{:?}（{:?}）",
            row.name,
            row.result.variance,
            row.result.price_variance,
            row.result.quantity_variance,
            row.status,
            row.root_cause
        );
    }
    for warning in &report.warnings {
        println!("  ! 物料 {}: {}", warning.item_id, warning.message);
    }

    println!("\n浪費排行:");
    let waste = analyzer.waste_index(&items);
    for entry in &waste.entries {
        match entry.waste_pct {
            Some(pct) => println!("  - {}: 浪費 {}%", entry.name, pct.round_dp(1)),
            None => println!("  - {}: 無實際用量", entry.name),
        }
    }
    println!("  浪費成本合計: {}", waste.total_waste_cost);

    println!("\n再訂購警示:");
    let (alerts, warnings) = analyzer.reorder_alerts(&items);
    for alert in alerts.iter().filter(|a| a.reorder.needs_reorder()) {
        println!(
            "  - {}: 建議訂購 {} {}，最遲 {} 下單，風險 {}（{}），停產損失 {}",
            alert.name,
            alert.reorder.reorder_qty,
            alert.unit,
            alert.reorder.order_by_date,
            alert.risk_score,
            alert.risk_band.as_str(),
            alert.loss.total_loss
        );
    }
    for warning in &warnings {
        println!("  ! 物料 {}: {}", warning.item_id, warning.message);
    }

    println!("\n庫存健康度:");
    for health in analyzer.stock_health(&items) {
        let coverage = health
            .coverage_days
            .map(|d| format!("{} 天", d))
            .unwrap_or_else(|| "無耗用".to_string());
        println!(
            "  - {}: {}% 再訂購點，覆蓋 {}",
            health.name, health.pct_of_reorder_level, coverage
        );
    }

    println!("\n訂單台帳:");
    let ledger = OrderLedger::build(&orders);
    for row in &ledger.rows {
        println!("  - {} ({}): 差異 {}，{:?}", row.order_id, row.date, row.variance, row.status);
    }
    println!("  總差異: {}", ledger.total_variance);

    println!("\n供應商績效:");
    for perf in SupplierPerformance::build(&suppliers) {
        println!(
            "  - {} ({}): 延遲 {} 天，評級 {}",
            perf.supplier_name,
            perf.item,
            perf.lead_slip_days,
            perf.grade.as_str()
        );
    }

    println!("\n情境模擬（耗用 +20%，提前期 +2 天，單價 +10%）:");
    let perturbation = Perturbation::none()
        .with_consumption_increase_pct(Decimal::from(20))
        .with_lead_time_increase_days(2)
        .with_rate_increase_pct(Decimal::from(10));
    let result = simulate(find_item(&items, 1)?, &perturbation)?;
    println!(
        "  {}: 再訂購點 {} → {}，成本影響 {}",
        result.item_name,
        result.original.reorder_level,
        result.simulated.reorder_level,
        result.cost_impact()
    );

    println!("\n採購單:");
    let mut session = PurchaseOrderSession::new();
    let (critical, unscored) = analyzer.critical_alerts(&items);
    for warning in &unscored {
        println!("  ! 物料 {}: {}（N/A）", warning.item_id, warning.message);
    }
    for (index, alert) in critical.iter().enumerate() {
        let item = find_item(&items, alert.item_id)?;
        let draft = PurchaseOrder::for_item(
            item,
            format!("PO-{:06}", index + 1),
            as_of,
            alert.reorder.reorder_level,
            alert.reorder.reorder_qty,
        )
        .with_schedule(alert.reorder.order_by_date, alert.reorder.delivery_date);
        session.submit(draft)?;
    }
    for po in session.orders() {
        let totals = po.totals();
        println!(
            "  - {} {}: {} × {} = {}（含稅 {}）",
            po.po_number, po.item_name, po.order_qty, po.unit_rate, totals.subtotal, totals.total
        );
    }
    println!("  已承諾金額: {}", session.committed_total());

    tracing::info!("示例完成");
    Ok(())
}
