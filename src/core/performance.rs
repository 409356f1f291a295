//! Monthly return series and the performance overview built on top of the
//! per-holding returns.
use crate::core::analytics::{AllocationSlice, HoldingReturn};
use crate::core::model::{Holding, PerformanceSnapshot};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Fixed monthly returns (percent) used by the demo series, before scaling.
pub const DEMO_MONTHLY_SEEDS: [f64; 12] =
    [0.8, 1.2, -0.5, 0.9, 1.5, -0.3, 0.7, 1.1, -0.8, 0.6, 1.3, 0.4];

/// Monthly volatility the demo seeds are calibrated against.
const DEMO_BASE_VOLATILITY: f64 = 0.015;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyReturnsConfig {
    /// Use the seeded demo series instead of aggregating snapshots.
    pub demo: bool,
    /// Monthly volatility per asset class name, for the demo series.
    pub volatility: HashMap<String, f64>,
    pub default_volatility: f64,
}

impl Default for MonthlyReturnsConfig {
    fn default() -> Self {
        MonthlyReturnsConfig {
            demo: false,
            volatility: HashMap::from([
                ("Public Equities".to_string(), 0.025),
                ("Private Investments".to_string(), 0.005),
                ("Real Estate".to_string(), 0.003),
                ("Cash & Equivalents".to_string(), 0.001),
                ("Alternatives".to_string(), 0.015),
            ]),
            default_volatility: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReturn {
    pub year: i32,
    pub month: u32,
    pub label: &'static str,
    pub return_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesSource {
    Snapshots,
    Demo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySeries {
    pub source: SeriesSource,
    pub months: Vec<MonthlyReturn>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub top_performers: Vec<HoldingReturn>,
    pub bottom_performers: Vec<HoldingReturn>,
    pub total_unrealized_gain: f64,
    /// Holdings with a positive unrealized gain, out of `holdings_count`.
    pub holdings_with_gains: usize,
    pub holdings_count: usize,
    pub avg_total_return: Option<f64>,
    pub best_month: Option<MonthlyReturn>,
    pub worst_month: Option<MonthlyReturn>,
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Months of `year` that have started by `as_of`.
fn reported_months(year: i32, as_of: NaiveDate) -> u32 {
    match as_of.year().cmp(&year) {
        std::cmp::Ordering::Less => 0,
        std::cmp::Ordering::Equal => as_of.month(),
        std::cmp::Ordering::Greater => 12,
    }
}

fn value_at(observations: &[(NaiveDate, f64)], date: NaiveDate) -> Option<f64> {
    observations
        .iter()
        .rev()
        .find(|(observed, _)| *observed <= date)
        .map(|(_, value)| *value)
}

/// Opening and closing value of a holding over `(start, end]`. A holding
/// without an observation inside the window has no data for it.
fn month_values(
    observations: &[(NaiveDate, f64)],
    start: NaiveDate,
    end: NaiveDate,
) -> Option<(f64, f64)> {
    let observed_in_month = observations
        .iter()
        .any(|(observed, _)| *observed > start && *observed <= end);
    if !observed_in_month {
        return None;
    }
    value_at(observations, start).zip(value_at(observations, end))
}

/// Aggregates month-over-month portfolio returns from value snapshots.
///
/// A holding's value on a date is its latest observation on or before that
/// date, where observations are its snapshots plus its current valuation.
/// January opens on Jan 1; every later month opens on the previous month end.
/// Only holdings valued at the opening date and observed again within the
/// month count towards it. A month where no holding qualifies has no return.
pub fn compute_monthly_returns(
    portfolio_id: &str,
    holdings: &[Holding],
    snapshots: &[PerformanceSnapshot],
    year: i32,
    as_of: NaiveDate,
) -> Vec<MonthlyReturn> {
    let mut observations: HashMap<&str, Vec<(NaiveDate, f64)>> = holdings
        .iter()
        .filter(|h| h.portfolio_id == portfolio_id)
        .map(|h| (h.id.as_str(), Vec::new()))
        .collect();
    for snapshot in snapshots {
        if let Some(series) = observations.get_mut(snapshot.holding_id.as_str()) {
            series.push((snapshot.snapshot_date, snapshot.value));
        }
    }
    for holding in holdings.iter().filter(|h| h.portfolio_id == portfolio_id) {
        if let Some(series) = observations.get_mut(holding.id.as_str()) {
            series.push((holding.valuation_date, holding.current_value));
        }
    }
    for series in observations.values_mut() {
        series.sort_by_key(|(date, _)| *date);
    }

    let mut months = Vec::new();
    for month in 1..=reported_months(year, as_of) {
        let start = if month == 1 {
            NaiveDate::from_ymd_opt(year, 1, 1)
        } else {
            month_end(year, month - 1)
        };
        let end = month_end(year, month).map(|end| end.min(as_of));

        let return_pct = start.zip(end).and_then(|(start, end)| {
            let (opening, closing) = observations
                .values()
                .filter_map(|series| month_values(series, start, end))
                .fold((0.0, 0.0), |(open, close), (s, e)| (open + s, close + e));
            (opening > 0.0).then(|| ((closing - opening) / opening) * 100.0)
        });
        debug!("Monthly return {year}-{month:02}: {return_pct:?}");

        months.push(MonthlyReturn {
            year,
            month,
            label: MONTH_LABELS[(month - 1) as usize],
            return_pct,
        });
    }
    months
}

/// Seeded placeholder series, scaled by the value-weighted volatility of the
/// asset mix. Does not reflect real performance.
pub fn demo_monthly_returns(
    allocation: &[AllocationSlice],
    config: &MonthlyReturnsConfig,
    year: i32,
    as_of: NaiveDate,
) -> Vec<MonthlyReturn> {
    let total_value: f64 = allocation.iter().map(|a| a.total_value).sum();
    let weighted_volatility = if total_value > 0.0 {
        allocation
            .iter()
            .map(|a| {
                let volatility = config
                    .volatility
                    .get(&a.asset_class.name)
                    .copied()
                    .unwrap_or(config.default_volatility);
                volatility * (a.total_value / total_value)
            })
            .sum()
    } else {
        0.0
    };
    debug!("Demo series weighted volatility: {weighted_volatility}");

    (1..=reported_months(year, as_of))
        .map(|month| {
            let index = (month - 1) as usize;
            MonthlyReturn {
                year,
                month,
                label: MONTH_LABELS[index],
                return_pct: Some(
                    DEMO_MONTHLY_SEEDS[index] * (weighted_volatility / DEMO_BASE_VOLATILITY),
                ),
            }
        })
        .collect()
}

pub fn summarize_performance(
    holdings: &[HoldingReturn],
    months: &[MonthlyReturn],
) -> PerformanceSummary {
    let mut by_ytd: Vec<&HoldingReturn> =
        holdings.iter().filter(|h| h.ytd_return.is_some()).collect();
    by_ytd.sort_by(|a, b| {
        b.ytd_return
            .unwrap_or(0.0)
            .total_cmp(&a.ytd_return.unwrap_or(0.0))
    });

    let top_performers = by_ytd.iter().take(3).map(|h| (*h).clone()).collect();
    let bottom_performers = by_ytd.iter().rev().take(3).map(|h| (*h).clone()).collect();

    let total_unrealized_gain = holdings.iter().map(|h| h.unrealized_gain).sum();
    let holdings_with_gains = holdings.iter().filter(|h| h.unrealized_gain > 0.0).count();
    let total_returns: Vec<f64> = holdings.iter().filter_map(|h| h.total_return).collect();
    let avg_total_return = (!total_returns.is_empty())
        .then(|| total_returns.iter().sum::<f64>() / total_returns.len() as f64);

    let mut best_month: Option<&MonthlyReturn> = None;
    let mut worst_month: Option<&MonthlyReturn> = None;
    for month in months {
        let Some(value) = month.return_pct else {
            continue;
        };
        if best_month.is_none_or(|best| value > best.return_pct.unwrap_or(f64::MIN)) {
            best_month = Some(month);
        }
        if worst_month.is_none_or(|worst| value < worst.return_pct.unwrap_or(f64::MAX)) {
            worst_month = Some(month);
        }
    }

    PerformanceSummary {
        top_performers,
        bottom_performers,
        total_unrealized_gain,
        holdings_with_gains,
        holdings_count: holdings.len(),
        avg_total_return,
        best_month: best_month.cloned(),
        worst_month: worst_month.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analytics::compute_holdings_with_returns;
    use crate::core::analytics::tests::{asset_class, date, holding};
    use crate::core::model::LiquidityType;

    fn snapshot(holding_id: &str, on: NaiveDate, value: f64) -> PerformanceSnapshot {
        PerformanceSnapshot {
            id: format!("{holding_id}-{on}"),
            holding_id: holding_id.to_string(),
            snapshot_date: on,
            value,
        }
    }

    #[test]
    fn test_month_end() {
        assert_eq!(month_end(2024, 2), Some(date(2024, 2, 29)));
        assert_eq!(month_end(2025, 12), Some(date(2025, 12, 31)));
    }

    #[test]
    fn test_monthly_returns_from_snapshots() {
        let mut a = holding("a", "eq", 121.0, 100.0);
        a.valuation_date = date(2025, 3, 15);
        let snapshots = vec![
            snapshot("a", date(2025, 1, 1), 100.0),
            snapshot("a", date(2025, 1, 31), 110.0),
            snapshot("a", date(2025, 2, 28), 110.0),
        ];

        let months = compute_monthly_returns("p1", &[a], &snapshots, 2025, date(2025, 3, 20));
        assert_eq!(months.len(), 3);
        assert_eq!(months[0].label, "Jan");
        assert!((months[0].return_pct.unwrap() - 10.0).abs() < 1e-9);
        assert!((months[1].return_pct.unwrap()).abs() < 1e-9);
        assert!((months[2].return_pct.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_returns_only_count_holdings_valued_at_both_ends() {
        let mut a = holding("a", "eq", 100.0, 100.0);
        a.valuation_date = date(2025, 1, 31);
        let mut b = holding("b", "eq", 500.0, 100.0);
        b.valuation_date = date(2025, 1, 20);
        let snapshots = vec![snapshot("a", date(2025, 1, 1), 100.0)];

        // b has no value on Jan 1, so January only reflects a, which is flat.
        let months = compute_monthly_returns("p1", &[a, b], &snapshots, 2025, date(2025, 1, 31));
        assert_eq!(months.len(), 1);
        assert!((months[0].return_pct.unwrap()).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_returns_without_data_are_unknown() {
        let mut a = holding("a", "eq", 100.0, 100.0);
        a.valuation_date = date(2025, 6, 30);
        let months = compute_monthly_returns("p1", &[a], &[], 2025, date(2025, 4, 10));
        assert_eq!(months.len(), 4);
        assert!(months.iter().all(|m| m.return_pct.is_none()));

        assert!(compute_monthly_returns("p1", &[], &[], 2026, date(2025, 4, 10)).is_empty());
        assert_eq!(
            compute_monthly_returns("p1", &[], &[], 2024, date(2025, 4, 10)).len(),
            12
        );
    }

    #[test]
    fn test_months_without_new_observations_have_no_return() {
        let mut a = holding("a", "eq", 110.0, 100.0);
        a.valuation_date = date(2025, 1, 31);
        let snapshots = vec![snapshot("a", date(2025, 1, 1), 100.0)];

        let months =
            compute_monthly_returns("p1", &[a.clone()], &snapshots, 2025, date(2025, 4, 30));
        let returns: Vec<(&str, Option<f64>)> =
            months.iter().map(|m| (m.label, m.return_pct)).collect();
        assert_eq!(months.len(), 4);
        assert!((returns[0].1.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(
            &returns[1..],
            &[("Feb", None), ("Mar", None), ("Apr", None)]
        );

        // A later year with no observations at all.
        let months = compute_monthly_returns("p1", &[a], &snapshots, 2026, date(2026, 3, 15));
        assert_eq!(months.len(), 3);
        assert!(months.iter().all(|m| m.return_pct.is_none()));
    }

    #[test]
    fn test_holding_without_new_data_is_left_out_of_month() {
        let mut a = holding("a", "eq", 120.0, 100.0);
        a.valuation_date = date(2025, 2, 28);
        let mut b = holding("b", "eq", 500.0, 100.0);
        b.valuation_date = date(2025, 1, 31);
        let snapshots = vec![
            snapshot("a", date(2025, 1, 31), 100.0),
            snapshot("b", date(2025, 1, 1), 400.0),
        ];

        // b was last valued in January, so February only reflects a.
        let months = compute_monthly_returns("p1", &[a, b], &snapshots, 2025, date(2025, 2, 28));
        assert!((months[1].return_pct.unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_demo_monthly_returns_scaling() {
        let mut equities = asset_class("eq", LiquidityType::Liquid, 1);
        equities.name = "Public Equities".to_string();
        let mut cash = asset_class("cash", LiquidityType::Liquid, 6);
        cash.name = "Cash & Equivalents".to_string();
        let allocation = vec![
            AllocationSlice {
                asset_class: equities,
                total_value: 500.0,
                percentage: 50.0,
            },
            AllocationSlice {
                asset_class: cash,
                total_value: 500.0,
                percentage: 50.0,
            },
        ];

        let config = MonthlyReturnsConfig::default();
        let months = demo_monthly_returns(&allocation, &config, 2025, date(2025, 2, 1));
        // (0.025 + 0.001) / 2 = 0.013 weighted volatility
        let scale = 0.013 / 0.015;
        assert_eq!(months.len(), 2);
        assert!((months[0].return_pct.unwrap() - 0.8 * scale).abs() < 1e-9);
        assert!((months[1].return_pct.unwrap() - 1.2 * scale).abs() < 1e-9);

        let months = demo_monthly_returns(&[], &config, 2025, date(2025, 2, 1));
        assert!(months.iter().all(|m| m.return_pct == Some(0.0)));
    }

    #[test]
    fn test_summarize_performance() {
        let holdings: Vec<Holding> = (0..5)
            .map(|i| holding(&format!("h{i}"), "eq", 100.0 + i as f64, 100.0))
            .collect();
        let mut jan1 = HashMap::new();
        for (i, h) in holdings.iter().enumerate().take(4) {
            jan1.insert(h.id.clone(), 100.0 - i as f64 * 10.0);
        }
        let returns = compute_holdings_with_returns("p1", &holdings, &[], &jan1);

        let months = vec![
            MonthlyReturn {
                year: 2025,
                month: 1,
                label: "Jan",
                return_pct: Some(1.0),
            },
            MonthlyReturn {
                year: 2025,
                month: 2,
                label: "Feb",
                return_pct: None,
            },
            MonthlyReturn {
                year: 2025,
                month: 3,
                label: "Mar",
                return_pct: Some(-2.0),
            },
        ];

        let summary = summarize_performance(&returns, &months);
        let top: Vec<&str> = summary
            .top_performers
            .iter()
            .map(|h| h.holding.id.as_str())
            .collect();
        assert_eq!(top, vec!["h3", "h2", "h1"]);
        let bottom: Vec<&str> = summary
            .bottom_performers
            .iter()
            .map(|h| h.holding.id.as_str())
            .collect();
        assert_eq!(bottom, vec!["h0", "h1", "h2"]);
        assert!((summary.total_unrealized_gain - 10.0).abs() < 1e-9);
        assert_eq!(summary.holdings_with_gains, 4);
        assert_eq!(summary.holdings_count, 5);
        assert!((summary.avg_total_return.unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(summary.best_month.unwrap().label, "Jan");
        assert_eq!(summary.worst_month.unwrap().label, "Mar");
    }

    #[test]
    fn test_summarize_performance_empty() {
        let summary = summarize_performance(&[], &[]);
        assert!(summary.top_performers.is_empty());
        assert_eq!(summary.total_unrealized_gain, 0.0);
        assert_eq!(summary.holdings_with_gains, 0);
        assert_eq!(summary.avg_total_return, None);
        assert_eq!(summary.best_month, None);
    }
}
