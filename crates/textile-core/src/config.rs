//! 分析參數配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AnalyticsError, Result};

/// 分析引擎參數
///
/// 預設值即為儀表板沿用的常數：風險權重 40/20/20/20、提前期基準 7 天、
/// 每次延遲 4 分、每日生產 8 小時、HIGH ≥ 70、MEDIUM ≥ 40。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// 庫存缺口風險權重（低於再訂購點時的最大分數）
    pub stock_risk_weight: Decimal,

    /// 提前期風險權重（提前期等於基準天數時的分數，不封頂）
    pub lead_risk_weight: Decimal,

    /// 提前期基準天數
    pub lead_reference_days: u32,

    /// 成本超支風險上限
    pub variance_risk_cap: Decimal,

    /// 每次供應商延遲的風險分數
    pub delay_points_per_incident: Decimal,

    /// 延遲風險上限
    pub delay_risk_cap: Decimal,

    /// 總分上限
    pub max_score: u8,

    /// HIGH 風險門檻
    pub high_risk_threshold: u8,

    /// MEDIUM 風險門檻
    pub medium_risk_threshold: u8,

    /// 每日生產小時數
    pub production_hours_per_day: Decimal,

    /// 高浪費門檻（%，嚴格大於）
    pub high_waste_pct: Decimal,

    /// 中度浪費門檻（%，嚴格大於）
    pub moderate_waste_pct: Decimal,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            stock_risk_weight: Decimal::from(40),
            lead_risk_weight: Decimal::from(20),
            lead_reference_days: 7,
            variance_risk_cap: Decimal::from(20),
            delay_points_per_incident: Decimal::from(4),
            delay_risk_cap: Decimal::from(20),
            max_score: 100,
            high_risk_threshold: 70,
            medium_risk_threshold: 40,
            production_hours_per_day: Decimal::from(8),
            high_waste_pct: Decimal::from(8),
            moderate_waste_pct: Decimal::from(3),
        }
    }
}

impl AnalyticsConfig {
    /// 從 JSON 載入配置，未提供的欄位使用預設值
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置風險門檻
    pub fn with_risk_thresholds(mut self, medium: u8, high: u8) -> Self {
        self.medium_risk_threshold = medium;
        self.high_risk_threshold = high;
        self
    }

    /// 建構器模式：設置每日生產小時數
    pub fn with_production_hours_per_day(mut self, hours: Decimal) -> Self {
        self.production_hours_per_day = hours;
        self
    }

    /// 建構器模式：設置提前期基準天數
    pub fn with_lead_reference_days(mut self, days: u32) -> Self {
        self.lead_reference_days = days;
        self
    }

    /// 建構器模式：設置延遲風險參數
    pub fn with_delay_risk(mut self, points_per_incident: Decimal, cap: Decimal) -> Self {
        self.delay_points_per_incident = points_per_incident;
        self.delay_risk_cap = cap;
        self
    }

    /// 檢查參數一致性
    pub fn validate(&self) -> Result<()> {
        if self.lead_reference_days == 0 {
            return Err(AnalyticsError::ConfigError(
                "提前期基準天數必須大於 0".to_string(),
            ));
        }

        if self.production_hours_per_day <= Decimal::ZERO {
            return Err(AnalyticsError::ConfigError(
                "每日生產小時數必須大於 0".to_string(),
            ));
        }

        let weights = [
            ("stock_risk_weight", self.stock_risk_weight),
            ("lead_risk_weight", self.lead_risk_weight),
            ("variance_risk_cap", self.variance_risk_cap),
            ("delay_points_per_incident", self.delay_points_per_incident),
            ("delay_risk_cap", self.delay_risk_cap),
        ];
        if let Some((name, _)) = weights.iter().find(|(_, w)| *w < Decimal::ZERO) {
            return Err(AnalyticsError::ConfigError(format!("{} 不可為負數", name)));
        }

        if self.medium_risk_threshold > self.high_risk_threshold
            || self.high_risk_threshold > self.max_score
        {
            return Err(AnalyticsError::ConfigError(format!(
                "風險門檻必須滿足 MEDIUM ≤ HIGH ≤ 上限：{} / {} / {}",
                self.medium_risk_threshold, self.high_risk_threshold, self.max_score
            )));
        }

        if self.moderate_waste_pct > self.high_waste_pct {
            return Err(AnalyticsError::ConfigError(
                "中度浪費門檻不可高於高浪費門檻".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyticsConfig::default();

        assert_eq!(config.stock_risk_weight, Decimal::from(40));
        assert_eq!(config.lead_reference_days, 7);
        assert_eq!(config.high_risk_threshold, 70);
        assert_eq!(config.medium_risk_threshold, 40);
        assert_eq!(config.production_hours_per_day, Decimal::from(8));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = AnalyticsConfig::default()
            .with_risk_thresholds(30, 60)
            .with_production_hours_per_day(Decimal::from(16))
            .with_lead_reference_days(14);

        assert_eq!(config.medium_risk_threshold, 30);
        assert_eq!(config.high_risk_threshold, 60);
        assert_eq!(config.production_hours_per_day, Decimal::from(16));
        assert_eq!(config.lead_reference_days, 14);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            AnalyticsConfig::from_json_str(r#"{ "production_hours_per_day": "16" }"#).unwrap();

        assert_eq!(config.production_hours_per_day, Decimal::from(16));
        assert_eq!(config.stock_risk_weight, Decimal::from(40));
        assert_eq!(config.high_risk_threshold, 70);
    }

    #[test]
    fn test_invalid_json_config_rejected() {
        let err = AnalyticsConfig::from_json_str(r#"{ "lead_reference_days": 0 }"#).unwrap_err();
        assert!(matches!(err, AnalyticsError::ConfigError(_)));

        let err = AnalyticsConfig::from_json_str(
            r#"{ "medium_risk_threshold": 80, "high_risk_threshold": 70 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, AnalyticsError::ConfigError(_)));

        let err = AnalyticsConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, AnalyticsError::Serialization(_)));
    }
}
