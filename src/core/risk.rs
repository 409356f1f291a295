//! Risk tiers for concentration, liquidity and leverage.
//!
//! Tiers are a pure threshold function of a percentage. The thresholds are
//! policy, so they come from configuration; the defaults are the house limits
//! the dashboard has always shown ("<30% ideal" for the top five, and so on).

use crate::core::analytics::{ConcentrationMetrics, LiquiditySlice, PortfolioSummary};
use crate::core::model::LiquidityType;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RiskTier::Low => "Healthy",
                RiskTier::Moderate => "Moderate",
                RiskTier::High => "High",
            }
        )
    }
}

/// A percentage below `moderate` is low risk, below `high` moderate, and
/// anything else high.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub moderate: f64,
    pub high: f64,
}

impl TierThresholds {
    pub const fn new(moderate: f64, high: f64) -> Self {
        Self { moderate, high }
    }

    pub fn classify(&self, percentage: f64) -> RiskTier {
        if percentage < self.moderate {
            RiskTier::Low
        } else if percentage < self.high {
            RiskTier::Moderate
        } else {
            RiskTier::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Share of the five largest positions.
    pub top5: TierThresholds,
    /// Share of the single largest position.
    pub single_position: TierThresholds,
    /// Share of holdings in illiquid asset classes.
    pub illiquid: TierThresholds,
    /// Total debt over gross assets.
    pub debt_to_assets: TierThresholds,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        RiskThresholds {
            top5: TierThresholds::new(30.0, 50.0),
            single_position: TierThresholds::new(10.0, 20.0),
            illiquid: TierThresholds::new(40.0, 60.0),
            debt_to_assets: TierThresholds::new(10.0, 25.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskMeasure {
    pub percentage: f64,
    pub tier: RiskTier,
    /// Upper bound of the low tier, shown as the "ideal" limit.
    pub ideal_below: f64,
}

impl RiskMeasure {
    fn measure(percentage: f64, thresholds: &TierThresholds) -> Self {
        RiskMeasure {
            percentage,
            tier: thresholds.classify(percentage),
            ideal_below: thresholds.moderate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskProfile {
    pub top5: RiskMeasure,
    pub single_position: RiskMeasure,
    pub illiquid: RiskMeasure,
    pub debt_to_assets: RiskMeasure,
}

/// Share of the portfolio in illiquid asset classes, `0.0` if there is none.
pub fn illiquid_percentage(liquidity: &[LiquiditySlice]) -> f64 {
    liquidity
        .iter()
        .find(|slice| slice.liquidity_type == LiquidityType::Illiquid)
        .map_or(0.0, |slice| slice.percentage)
}

pub fn assess_risk(
    concentration: &ConcentrationMetrics,
    liquidity: &[LiquiditySlice],
    summary: &PortfolioSummary,
    thresholds: &RiskThresholds,
) -> RiskProfile {
    RiskProfile {
        top5: RiskMeasure::measure(concentration.top5_percentage, &thresholds.top5),
        single_position: RiskMeasure::measure(
            concentration.largest_position_percentage,
            &thresholds.single_position,
        ),
        illiquid: RiskMeasure::measure(illiquid_percentage(liquidity), &thresholds.illiquid),
        debt_to_assets: RiskMeasure::measure(
            summary.debt_to_assets(),
            &thresholds.debt_to_assets,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold_boundaries() {
        let t = RiskThresholds::default();

        assert_eq!(t.top5.classify(29.99), RiskTier::Low);
        assert_eq!(t.top5.classify(30.0), RiskTier::Moderate);
        assert_eq!(t.top5.classify(49.99), RiskTier::Moderate);
        assert_eq!(t.top5.classify(50.0), RiskTier::High);

        assert_eq!(t.single_position.classify(9.5), RiskTier::Low);
        assert_eq!(t.single_position.classify(10.0), RiskTier::Moderate);
        assert_eq!(t.single_position.classify(20.0), RiskTier::High);

        assert_eq!(t.illiquid.classify(39.9), RiskTier::Low);
        assert_eq!(t.illiquid.classify(59.9), RiskTier::Moderate);
        assert_eq!(t.illiquid.classify(60.0), RiskTier::High);

        assert_eq!(t.debt_to_assets.classify(5.5), RiskTier::Low);
        assert_eq!(t.debt_to_assets.classify(25.0), RiskTier::High);
    }

    #[test]
    fn test_thresholds_partial_override() {
        let yaml_str = r#"
top5:
  moderate: 40.0
  high: 70.0
"#;
        let t: RiskThresholds = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(t.top5, TierThresholds::new(40.0, 70.0));
        assert_eq!(t.single_position, RiskThresholds::default().single_position);
    }

    #[test]
    fn test_assess_risk() {
        let concentration = ConcentrationMetrics {
            top5_percentage: 98.0,
            largest_position_percentage: 8.0,
            top_positions: Vec::new(),
        };
        let liquidity = vec![LiquiditySlice {
            liquidity_type: LiquidityType::Illiquid,
            label: "Illiquid",
            color: "#EF4444",
            total_value: 45.0,
            percentage: 45.0,
        }];
        let summary = PortfolioSummary {
            gross_assets: 100.0,
            total_debt: 0.0,
            net_worth: 100.0,
            holdings_count: 6,
        };

        let profile = assess_risk(
            &concentration,
            &liquidity,
            &summary,
            &RiskThresholds::default(),
        );
        assert_eq!(profile.top5.tier, RiskTier::High);
        assert_eq!(profile.single_position.tier, RiskTier::Low);
        assert_eq!(profile.illiquid.tier, RiskTier::Moderate);
        assert_eq!(profile.illiquid.percentage, 45.0);
        assert_eq!(profile.debt_to_assets.tier, RiskTier::Low);
        assert_eq!(profile.top5.ideal_below, 30.0);
    }

    #[test]
    fn test_illiquid_percentage_absent() {
        assert_eq!(illiquid_percentage(&[]), 0.0);
    }
}
