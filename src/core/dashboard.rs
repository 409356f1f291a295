//! The full report for one portfolio, every panel computed from one snapshot.
use crate::core::analytics::{
    self, AllocationSlice, ConcentrationMetrics, DebtSummary, HoldingReturn, LiquiditySlice,
    PortfolioSummary,
};
use crate::core::indicators::{self, HistoryPoint, IndicatorReading};
use crate::core::model::{IndicatorName, Portfolio, Snapshot};
use crate::core::performance::{
    self, MonthlyReturnsConfig, MonthlySeries, PerformanceSummary, SeriesSource,
};
use crate::core::risk::{self, RiskProfile, RiskThresholds};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub reporting_year: i32,
    pub as_of: NaiveDate,
    pub thresholds: RiskThresholds,
    pub monthly_returns: MonthlyReturnsConfig,
}

impl ReportOptions {
    /// Jan 1 of the reporting year, the base of YTD returns.
    pub fn reference_date(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.reporting_year, 1, 1)
            .with_context(|| format!("Invalid reporting year: {}", self.reporting_year))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub portfolio: Portfolio,
    pub reporting_year: i32,
    pub as_of: NaiveDate,
    pub summary: PortfolioSummary,
    pub allocation: Vec<AllocationSlice>,
    pub holdings: Vec<HoldingReturn>,
    pub portfolio_ytd_return: Option<f64>,
    pub liquidity: Vec<LiquiditySlice>,
    pub debt: DebtSummary,
    pub concentration: ConcentrationMetrics,
    pub risk: RiskProfile,
    pub monthly_returns: MonthlySeries,
    pub performance: PerformanceSummary,
    pub macro_latest: Vec<IndicatorReading>,
    pub macro_history: BTreeMap<IndicatorName, Vec<HistoryPoint>>,
}

impl Dashboard {
    #[instrument(name = "BuildDashboard", skip_all, fields(portfolio = %portfolio.id))]
    pub fn build(
        portfolio: &Portfolio,
        snapshot: &Snapshot,
        options: &ReportOptions,
    ) -> Result<Self> {
        let pid = portfolio.id.as_str();
        let reference_date = options.reference_date()?;

        let summary = analytics::compute_summary(pid, &snapshot.holdings, &snapshot.debt_items);
        let allocation = analytics::compute_allocation_breakdown(
            pid,
            &snapshot.holdings,
            &snapshot.asset_classes,
        );

        let jan1_values =
            analytics::year_start_values(&snapshot.performance_snapshots, reference_date);
        let holdings = analytics::compute_holdings_with_returns(
            pid,
            &snapshot.holdings,
            &snapshot.asset_classes,
            &jan1_values,
        );
        let portfolio_ytd_return = analytics::compute_portfolio_ytd_return(&holdings);

        let liquidity = analytics::compute_liquidity_breakdown(
            pid,
            &snapshot.holdings,
            &snapshot.asset_classes,
        );
        let debt = analytics::compute_debt_summary(pid, &snapshot.debt_items);
        let concentration =
            analytics::compute_concentration_metrics(pid, &snapshot.holdings, summary.gross_assets);
        let risk = risk::assess_risk(&concentration, &liquidity, &summary, &options.thresholds);

        let monthly_returns = if options.monthly_returns.demo {
            MonthlySeries {
                source: SeriesSource::Demo,
                months: performance::demo_monthly_returns(
                    &allocation,
                    &options.monthly_returns,
                    options.reporting_year,
                    options.as_of,
                ),
            }
        } else {
            MonthlySeries {
                source: SeriesSource::Snapshots,
                months: performance::compute_monthly_returns(
                    pid,
                    &snapshot.holdings,
                    &snapshot.performance_snapshots,
                    options.reporting_year,
                    options.as_of,
                ),
            }
        };
        let performance = performance::summarize_performance(&holdings, &monthly_returns.months);

        debug!(
            "Dashboard built: {} holdings, net worth {}",
            summary.holdings_count, summary.net_worth
        );
        Ok(Dashboard {
            portfolio: portfolio.clone(),
            reporting_year: options.reporting_year,
            as_of: options.as_of,
            summary,
            allocation,
            holdings,
            portfolio_ytd_return,
            liquidity,
            debt,
            concentration,
            risk,
            monthly_returns,
            performance,
            macro_latest: indicators::latest_indicators(&snapshot.macro_indicators),
            macro_history: indicators::indicator_history(&snapshot.macro_indicators),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analytics::tests::{asset_class, date, holding};
    use crate::core::model::{DebtItem, DebtType, LiquidityType, PerformanceSnapshot};
    use crate::core::risk::RiskTier;

    fn options() -> ReportOptions {
        ReportOptions {
            reporting_year: 2025,
            as_of: date(2025, 3, 31),
            thresholds: RiskThresholds::default(),
            monthly_returns: MonthlyReturnsConfig::default(),
        }
    }

    fn portfolio() -> Portfolio {
        Portfolio {
            id: "p1".to_string(),
            name: "Family Office".to_string(),
            description: None,
        }
    }

    fn snapshot() -> Snapshot {
        let mut stocks = holding("a", "eq", 600.0, 400.0);
        stocks.valuation_date = date(2025, 3, 31);
        let mut fund = holding("b", "pe", 400.0, 500.0);
        fund.valuation_date = date(2025, 3, 31);

        let perf = |id: &str, holding_id: &str, d: NaiveDate, value: f64| PerformanceSnapshot {
            id: id.to_string(),
            holding_id: holding_id.to_string(),
            snapshot_date: d,
            value,
        };

        Snapshot {
            portfolios: vec![portfolio()],
            asset_classes: vec![
                asset_class("eq", LiquidityType::Liquid, 1),
                asset_class("pe", LiquidityType::Illiquid, 2),
            ],
            holdings: vec![stocks, fund],
            debt_items: vec![DebtItem {
                id: "d1".to_string(),
                portfolio_id: "p1".to_string(),
                name: "Margin".to_string(),
                debt_type: DebtType::Margin,
                balance: 100.0,
                interest_rate: Some(7.0),
                lender: None,
                notes: None,
            }],
            performance_snapshots: vec![
                perf("s1", "a", date(2025, 1, 1), 500.0),
                perf("s2", "b", date(2025, 1, 1), 500.0),
                perf("s3", "a", date(2025, 1, 31), 550.0),
                perf("s4", "b", date(2025, 1, 31), 500.0),
                perf("s5", "a", date(2025, 2, 28), 500.0),
                perf("s6", "b", date(2025, 2, 28), 450.0),
            ],
            macro_indicators: vec![],
        }
    }

    #[test]
    fn test_build_combines_every_panel() {
        let dashboard = Dashboard::build(&portfolio(), &snapshot(), &options()).unwrap();

        assert_eq!(dashboard.summary.gross_assets, 1000.0);
        assert_eq!(dashboard.summary.net_worth, 900.0);
        assert_eq!(dashboard.allocation[0].percentage, 60.0);
        assert_eq!(dashboard.holdings[0].holding.id, "a");
        assert_eq!(dashboard.holdings[0].ytd_return, Some(20.0));
        assert_eq!(dashboard.holdings[0].asset_class_name.as_deref(), Some("Class eq"));
        assert_eq!(dashboard.holdings[1].liquidity_type, Some(LiquidityType::Illiquid));
        assert_eq!(dashboard.holdings[1].weight, 40.0);
        assert_eq!(dashboard.performance.holdings_with_gains, 1);
        assert_eq!(dashboard.performance.holdings_count, 2);
        // (600 * 20% + 400 * -20%) / 1000
        assert!((dashboard.portfolio_ytd_return.unwrap() - 4.0).abs() < 1e-9);
        assert_eq!(dashboard.liquidity.len(), 2);
        assert_eq!(dashboard.debt.avg_interest_rate, 7.0);
        assert_eq!(dashboard.concentration.largest_position_percentage, 60.0);
        assert_eq!(dashboard.risk.single_position.tier, RiskTier::High);
        assert_eq!(dashboard.risk.illiquid.tier, RiskTier::Moderate);
        assert_eq!(dashboard.risk.debt_to_assets.tier, RiskTier::Moderate);
        assert!(dashboard.macro_latest.is_empty());
    }

    #[test]
    fn test_monthly_series_from_snapshots() {
        let dashboard = Dashboard::build(&portfolio(), &snapshot(), &options()).unwrap();
        let series = &dashboard.monthly_returns;

        assert_eq!(series.source, SeriesSource::Snapshots);
        let returns: Vec<Option<f64>> = series.months.iter().map(|m| m.return_pct).collect();
        assert_eq!(returns.len(), 3);
        assert!((returns[0].unwrap() - 5.0).abs() < 1e-9);
        assert!((returns[1].unwrap() - (-100.0 / 1050.0 * 100.0)).abs() < 1e-9);
        assert!((returns[2].unwrap() - (50.0 / 950.0 * 100.0)).abs() < 1e-9);
        assert_eq!(dashboard.performance.best_month.as_ref().unwrap().label, "Mar");
        assert_eq!(dashboard.performance.worst_month.as_ref().unwrap().label, "Feb");
    }

    #[test]
    fn test_demo_series_is_labelled() {
        let mut options = options();
        options.monthly_returns.demo = true;
        let dashboard = Dashboard::build(&portfolio(), &snapshot(), &options).unwrap();

        assert_eq!(dashboard.monthly_returns.source, SeriesSource::Demo);
        assert_eq!(dashboard.monthly_returns.months.len(), 3);
    }

    #[test]
    fn test_build_is_idempotent() {
        let snapshot = snapshot();
        let first = Dashboard::build(&portfolio(), &snapshot, &options()).unwrap();
        let second = Dashboard::build(&portfolio(), &snapshot, &options()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_reporting_year() {
        let mut options = options();
        options.reporting_year = i32::MAX;
        assert!(options.reference_date().is_err());
        assert!(Dashboard::build(&portfolio(), &snapshot(), &options).is_err());
    }
}
