//! 物料目錄批次分析
//!
//! 每個物料的計算互相獨立，以 rayon 平行計算；結果保持輸入順序，
//! 與逐筆計算完全一致。

use chrono::NaiveDate;
use rayon::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use textile_core::{AnalyticsConfig, Item};

use crate::loss::{LossResult, ProductionLossCalculator};
use crate::reorder::{ReorderCalculator, ReorderResult};
use crate::risk::{RiskBand, RiskScorer};
use crate::variance::{RootCause, VarianceCalculator, VarianceResult, VarianceStatus, WasteBand};
use crate::AnalyticsWarning;

/// 單一物料的評分結果
#[derive(Debug)]
pub struct ItemScore {
    pub item_id: u32,
    pub score: textile_core::Result<u8>,
}

/// 再訂購警示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderAlert {
    pub item_id: u32,
    pub name: String,
    pub unit: String,
    pub supplier: String,
    pub current_stock: Decimal,
    pub daily_usage: Decimal,
    pub lead_days: u32,
    pub safety_stock: Decimal,
    pub delay_history: u32,
    pub reorder: ReorderResult,
    pub risk_score: u8,
    pub risk_band: RiskBand,
    pub loss: LossResult,
}

/// 差異報表列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceRow {
    pub item_id: u32,
    pub name: String,
    pub unit: String,
    pub planned_qty: Decimal,
    pub planned_rate: Decimal,
    pub actual_qty: Decimal,
    pub actual_rate: Decimal,
    pub result: VarianceResult,
    pub status: VarianceStatus,
    pub root_cause: RootCause,
}

/// 差異報表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VarianceReport {
    pub rows: Vec<VarianceRow>,
    pub warnings: Vec<AnalyticsWarning>,
}

/// 浪費排行項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasteEntry {
    pub item_id: u32,
    pub name: String,
    pub efficiency_pct: Option<Decimal>,
    pub waste_pct: Option<Decimal>,
    pub variance: Decimal,
    pub band: Option<WasteBand>,
}

/// 浪費排行榜與彙總
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WasteIndex {
    /// 依浪費率由高到低排序；效率未定義者排最後
    pub entries: Vec<WasteEntry>,
    /// 平均效率（僅計入效率有定義的物料）
    pub average_efficiency_pct: Option<Decimal>,
    /// 浪費成本 = 所有正差異之和
    pub total_waste_cost: Decimal,
    /// 效率 ≥ 100% 的物料數
    pub efficient_items: usize,
    pub total_items: usize,
}

/// 庫存健康度
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockHealth {
    pub item_id: u32,
    pub name: String,
    pub current_stock: Decimal,
    pub reorder_level: Decimal,
    /// 現有庫存佔再訂購點的百分比，上限 100
    pub pct_of_reorder_level: Decimal,
    /// 日耗用量為零時為 `None`
    pub coverage_days: Option<Decimal>,
    pub is_critical: bool,
}

/// 目錄分析器
#[derive(Debug, Clone)]
pub struct CatalogAnalyzer {
    config: AnalyticsConfig,
    as_of: NaiveDate,
}

impl CatalogAnalyzer {
    pub fn new(config: AnalyticsConfig, as_of: NaiveDate) -> Self {
        Self { config, as_of }
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// 批次計算風險分數（保持輸入順序）
    pub fn score_all(&self, items: &[Item]) -> Vec<ItemScore> {
        tracing::info!("開始批次風險評分：物料 {} 筆", items.len());
        let start_time = std::time::Instant::now();

        let scorer = RiskScorer::new(self.config.clone());
        let scores: Vec<ItemScore> = items
            .par_iter()
            .map(|item| ItemScore {
                item_id: item.id,
                score: scorer.score(item, self.as_of),
            })
            .collect();

        tracing::info!("批次風險評分完成，耗時 {:?}", start_time.elapsed());
        scores
    }

    /// 所有物料的再訂購警示；無法計算的物料轉為警告
    pub fn reorder_alerts(&self, items: &[Item]) -> (Vec<ReorderAlert>, Vec<AnalyticsWarning>) {
        let mut alerts = Vec::with_capacity(items.len());
        let mut warnings = Vec::new();
        for (item, result) in items.iter().zip(self.alert_results(items)) {
            match result {
                Ok(alert) => alerts.push(alert),
                Err(err) => warnings.push(AnalyticsWarning::error(
                    item.id,
                    format!("無法計算再訂購警示：{}", err),
                )),
            }
        }

        tracing::debug!("再訂購警示 {} 筆，警告 {} 筆", alerts.len(), warnings.len());
        (alerts, warnings)
    }

    /// 需要再訂購的物料，依風險分數由高到低（同分依物料ID）
    ///
    /// 低於再訂購點但無法評分的物料（如日耗用量為零）不會出現在警示中，
    /// 改以警告返回，呼叫端可顯示為 N/A。
    pub fn critical_alerts(&self, items: &[Item]) -> (Vec<ReorderAlert>, Vec<AnalyticsWarning>) {
        let mut critical = Vec::new();
        let mut unscored = Vec::new();
        for (item, result) in items.iter().zip(self.alert_results(items)) {
            match result {
                Ok(alert) if alert.reorder.needs_reorder() => critical.push(alert),
                Ok(_) => {}
                Err(err) => {
                    let reorder_level = ReorderCalculator::reorder_level(&item.inventory);
                    if reorder_level > item.inventory.current {
                        unscored.push(AnalyticsWarning::error(
                            item.id,
                            format!(
                                "{} 庫存 {} 低於再訂購點 {}，但無法評分：{}",
                                item.name, item.inventory.current, reorder_level, err
                            ),
                        ));
                    }
                }
            }
        }

        critical.sort_by(|a, b| {
            b.risk_score
                .cmp(&a.risk_score)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        (critical, unscored)
    }

    /// 逐筆建立警示（保持輸入順序）
    fn alert_results(&self, items: &[Item]) -> Vec<textile_core::Result<ReorderAlert>> {
        let scorer = RiskScorer::new(self.config.clone());
        let loss_calculator = ProductionLossCalculator::new(self.config.clone());

        items
            .par_iter()
            .map(|item| self.build_alert(item, &scorer, &loss_calculator))
            .collect()
    }

    fn build_alert(
        &self,
        item: &Item,
        scorer: &RiskScorer,
        loss_calculator: &ProductionLossCalculator,
    ) -> textile_core::Result<ReorderAlert> {
        let reorder = ReorderCalculator::calculate(item, self.as_of)?;
        let risk_score = scorer.score_from(&scorer.breakdown_from(item, &reorder)?);
        let loss = loss_calculator.calculate_from(item, &reorder)?;

        Ok(ReorderAlert {
            item_id: item.id,
            name: item.name.clone(),
            unit: item.unit.clone(),
            supplier: item.supplier.clone(),
            current_stock: item.inventory.current,
            daily_usage: item.inventory.daily,
            lead_days: item.inventory.lead_days,
            safety_stock: item.inventory.safety,
            delay_history: item.delay_history,
            reorder,
            risk_score,
            risk_band: scorer.band(risk_score),
            loss,
        })
    }

    /// 差異報表；效率未定義的物料附帶警告
    pub fn variance_report(&self, items: &[Item]) -> VarianceReport {
        let rows: Vec<VarianceRow> = items
            .par_iter()
            .map(|item| {
                let result = VarianceCalculator::calculate(item);
                VarianceRow {
                    item_id: item.id,
                    name: item.name.clone(),
                    unit: item.unit.clone(),
                    planned_qty: item.planned.qty,
                    planned_rate: item.planned.rate,
                    actual_qty: item.actual.qty,
                    actual_rate: item.actual.rate,
                    status: result.status(),
                    root_cause: result.root_cause(),
                    result,
                }
            })
            .collect();

        let warnings = rows
            .iter()
            .filter(|row| !row.result.is_efficiency_defined())
            .map(|row| {
                AnalyticsWarning::warning(
                    row.item_id,
                    format!("{} 實際用量 {}，效率與浪費率未定義", row.name, row.actual_qty),
                )
            })
            .collect();

        VarianceReport { rows, warnings }
    }

    /// 浪費排行榜
    pub fn waste_index(&self, items: &[Item]) -> WasteIndex {
        let mut entries: Vec<WasteEntry> = items
            .par_iter()
            .map(|item| {
                let result = VarianceCalculator::calculate(item);
                WasteEntry {
                    item_id: item.id,
                    name: item.name.clone(),
                    efficiency_pct: result.efficiency_pct,
                    waste_pct: result.waste_pct,
                    variance: result.variance,
                    band: result.waste_band(&self.config),
                }
            })
            .collect();

        entries.sort_by(|a, b| match (a.waste_pct, b.waste_pct) {
            (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.item_id.cmp(&b.item_id)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.item_id.cmp(&b.item_id),
        });

        let efficiencies: Vec<Decimal> = entries.iter().filter_map(|e| e.efficiency_pct).collect();
        let average_efficiency_pct = if efficiencies.is_empty() {
            None
        } else {
            // 逐項先除以筆數再加總
            let count = Decimal::from(efficiencies.len());
            Some(efficiencies.iter().map(|eff| *eff / count).sum())
        };

        let total_waste_cost = entries
            .iter()
            .map(|e| e.variance)
            .filter(|v| *v > Decimal::ZERO)
            .sum();

        let efficient_items = efficiencies
            .iter()
            .filter(|eff| **eff >= Decimal::ONE_HUNDRED)
            .count();

        WasteIndex {
            total_items: entries.len(),
            entries,
            average_efficiency_pct,
            total_waste_cost,
            efficient_items,
        }
    }

    /// 庫存健康矩陣
    pub fn stock_health(&self, items: &[Item]) -> Vec<StockHealth> {
        items
            .par_iter()
            .map(|item| {
                let current = item.inventory.current;
                let reorder_level = ReorderCalculator::reorder_level(&item.inventory);
                let pct_of_reorder_level = if reorder_level > Decimal::ZERO {
                    current
                        .checked_div(reorder_level)
                        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                        .map_or(Decimal::ONE_HUNDRED, |pct| pct.min(Decimal::ONE_HUNDRED))
                        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                } else {
                    Decimal::ONE_HUNDRED
                };

                StockHealth {
                    item_id: item.id,
                    name: item.name.clone(),
                    current_stock: current,
                    reorder_level,
                    pct_of_reorder_level,
                    coverage_days: ReorderCalculator::coverage_days(item).ok(),
                    is_critical: current < reorder_level,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WarningSeverity;
    use textile_core::{AnalyticsError, ConsumptionLine, InventoryPosition};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 18).unwrap()
    }

    fn item(id: u32, name: &str, actual_qty: i64, current: i64, daily: i64, delays: u32) -> Item {
        Item::new(
            id,
            name.to_string(),
            "kg".to_string(),
            ConsumptionLine::new(Decimal::from(100), Decimal::from(250)),
            ConsumptionLine::new(Decimal::from(actual_qty), Decimal::from(260)),
            InventoryPosition::new(Decimal::from(current), Decimal::from(daily), 4, Decimal::from(80)),
        )
        .with_production_value(Decimal::from(1000))
        .with_worker_cost(Decimal::from(500))
        .with_delay_history(delays)
    }

    fn catalog() -> Vec<Item> {
        vec![
            item(1, "Fabric", 110, 200, 40, 2),
            item(2, "Thread", 95, 1000, 10, 0),
            item(3, "Dye", 120, 50, 20, 5),
            item(4, "Zips", 0, 100, 0, 1),
        ]
    }

    fn analyzer() -> CatalogAnalyzer {
        CatalogAnalyzer::new(AnalyticsConfig::default(), as_of())
    }

    #[test]
    fn test_score_all_keeps_order_and_errors() {
        let scores = analyzer().score_all(&catalog());

        let ids: Vec<u32> = scores.iter().map(|s| s.item_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(*scores[0].score.as_ref().unwrap(), 40);
        assert!(matches!(
            scores[3].score,
            Err(AnalyticsError::ZeroDailyConsumption { item_id: 4 })
        ));
    }

    #[test]
    fn test_reorder_alerts_and_warnings() {
        let (alerts, warnings) = analyzer().reorder_alerts(&catalog());

        assert_eq!(alerts.len(), 3);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].item_id, 4);

        let fabric = &alerts[0];
        assert_eq!(fabric.reorder.reorder_qty, Decimal::from(40));
        assert_eq!(fabric.risk_score, 40);
        assert_eq!(fabric.risk_band, RiskBand::Medium);
        assert_eq!(fabric.loss.total_loss, Decimal::from(8500));
    }

    #[test]
    fn test_critical_alerts_sorted_by_risk() {
        let (critical, unscored) = analyzer().critical_alerts(&catalog());

        // Thread 庫存充足；Zips 無法計算，但庫存 100 高於再訂購點 80
        let ids: Vec<u32> = critical.iter().map(|a| a.item_id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert!(critical[0].risk_score >= critical[1].risk_score);
        assert!(unscored.is_empty());
    }

    #[test]
    fn test_unscorable_item_below_safety_stock_is_reported() {
        let items = vec![item(1, "Fabric", 110, 200, 40, 2), item(4, "Zips", 0, 10, 0, 1)];

        let (critical, unscored) = analyzer().critical_alerts(&items);

        let ids: Vec<u32> = critical.iter().map(|a| a.item_id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(unscored.len(), 1);
        assert_eq!(unscored[0].item_id, 4);
        assert_eq!(unscored[0].severity, WarningSeverity::Error);
    }

    #[test]
    fn test_zero_lead_reference_reported_per_item() {
        let config = AnalyticsConfig::default().with_lead_reference_days(0);
        let analyzer = CatalogAnalyzer::new(config, as_of());

        let scores = analyzer.score_all(&catalog());
        for score in &scores[..3] {
            assert!(matches!(score.score, Err(AnalyticsError::ConfigError(_))));
        }
        // 日耗用為零先於配置錯誤被發現
        assert!(matches!(
            scores[3].score,
            Err(AnalyticsError::ZeroDailyConsumption { item_id: 4 })
        ));

        let (critical, unscored) = analyzer.critical_alerts(&catalog());
        assert!(critical.is_empty());
        let ids: Vec<u32> = unscored.iter().map(|w| w.item_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_variance_report() {
        let report = analyzer().variance_report(&catalog());

        assert_eq!(report.rows.len(), 4);
        assert_eq!(report.rows[0].result.variance, Decimal::from(3600));
        assert_eq!(report.rows[0].status, VarianceStatus::Loss);
        assert_eq!(report.rows[1].status, VarianceStatus::Saving);

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].item_id, 4);
    }

    #[test]
    fn test_waste_index() {
        let index = analyzer().waste_index(&catalog());

        let order: Vec<u32> = index.entries.iter().map(|e| e.item_id).collect();
        // Dye 浪費最高，Zips 效率未定義排最後
        assert_eq!(order, vec![3, 1, 2, 4]);
        assert_eq!(index.total_items, 4);
        assert_eq!(index.efficient_items, 1);
        assert_eq!(index.entries[0].band, Some(WasteBand::HighWaste));
        assert_eq!(index.entries[3].band, None);

        // 正差異：Fabric 3600 + Dye 6200
        assert_eq!(index.total_waste_cost, Decimal::from(9800));
        assert!(index.average_efficiency_pct.is_some());
    }

    #[test]
    fn test_stock_health() {
        let health = analyzer().stock_health(&catalog());

        assert_eq!(health[0].reorder_level, Decimal::from(240));
        assert_eq!(health[0].pct_of_reorder_level, Decimal::from(83));
        assert!(health[0].is_critical);

        assert_eq!(health[1].pct_of_reorder_level, Decimal::ONE_HUNDRED);
        assert!(!health[1].is_critical);

        // Zips：日耗用為零時覆蓋天數為 N/A，但健康度仍可計算
        assert_eq!(health[3].coverage_days, None);
        assert_eq!(health[3].reorder_level, Decimal::from(80));
        assert!(!health[3].is_critical);
    }

    #[test]
    fn test_empty_catalog() {
        let analyzer = analyzer();
        assert!(analyzer.score_all(&[]).is_empty());
        assert!(analyzer.critical_alerts(&[]).0.is_empty());

        let index = analyzer.waste_index(&[]);
        assert_eq!(index.average_efficiency_pct, None);
        assert_eq!(index.total_waste_cost, Decimal::ZERO);
    }
}
