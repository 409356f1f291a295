//! Provides functions for performing financial calculations on portfolios.
//!
//! Every function here is pure: it reads the entities it is given, filtered
//! to one portfolio id, and returns plain values. Zero denominators yield `0.0`
//! for shares of a total and `None` for returns without a reference point.
use crate::core::model::{AssetClass, DebtItem, Holding, LiquidityType, PerformanceSnapshot};
use chrono::NaiveDate;
use rust_decimal::{Decimal, prelude::*};
use rust_finprim::rate::cagr;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Headline numbers of a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub gross_assets: f64,
    pub total_debt: f64,
    pub net_worth: f64,
    pub holdings_count: usize,
}

impl PortfolioSummary {
    /// Debt as a percentage of gross assets.
    pub fn debt_to_assets(&self) -> f64 {
        percentage_of(self.total_debt, self.gross_assets)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationSlice {
    pub asset_class: AssetClass,
    pub total_value: f64,
    pub percentage: f64,
}

/// A holding together with its derived returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingReturn {
    pub holding: Holding,
    /// Name, color and liquidity of the holding's asset class, when known.
    pub asset_class_name: Option<String>,
    pub asset_class_color: Option<String>,
    pub liquidity_type: Option<LiquidityType>,
    /// Share of the portfolio's gross assets, in percent.
    pub weight: f64,
    pub ytd_return: Option<f64>,
    pub total_return: Option<f64>,
    pub unrealized_gain: f64,
    pub annualized_return: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiquiditySlice {
    pub liquidity_type: LiquidityType,
    pub label: &'static str,
    pub color: &'static str,
    pub total_value: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebtSummary {
    pub items: Vec<DebtItem>,
    pub total_debt: f64,
    pub avg_interest_rate: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionWeight {
    pub holding_id: String,
    pub label: String,
    pub current_value: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcentrationMetrics {
    pub top5_percentage: f64,
    pub largest_position_percentage: f64,
    pub top_positions: Vec<PositionWeight>,
}

/// `value / total * 100`, or `0.0` when `total` is not positive.
pub fn percentage_of(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        (value / total) * 100.0
    } else {
        0.0
    }
}

fn portfolio_holdings<'a>(
    portfolio_id: &'a str,
    holdings: &'a [Holding],
) -> impl Iterator<Item = &'a Holding> + 'a {
    holdings.iter().filter(move |h| h.portfolio_id == portfolio_id)
}

pub fn compute_summary(
    portfolio_id: &str,
    holdings: &[Holding],
    debt_items: &[DebtItem],
) -> PortfolioSummary {
    let (gross_assets, holdings_count) = portfolio_holdings(portfolio_id, holdings)
        .fold((0.0, 0), |(sum, count), h| (sum + h.current_value, count + 1));
    let total_debt: f64 = debt_items
        .iter()
        .filter(|d| d.portfolio_id == portfolio_id)
        .map(|d| d.balance)
        .sum();

    debug!("Summary for {portfolio_id}: gross {gross_assets}, debt {total_debt}");
    PortfolioSummary {
        gross_assets,
        total_debt,
        net_worth: gross_assets - total_debt,
        holdings_count,
    }
}

/// Groups holdings by asset class. Every asset class appears, even without
/// holdings; holdings pointing at an unknown class are not counted.
pub fn compute_allocation_breakdown(
    portfolio_id: &str,
    holdings: &[Holding],
    asset_classes: &[AssetClass],
) -> Vec<AllocationSlice> {
    let mut totals: HashMap<&str, f64> = asset_classes
        .iter()
        .map(|ac| (ac.id.as_str(), 0.0))
        .collect();
    for holding in portfolio_holdings(portfolio_id, holdings) {
        if let Some(total) = totals.get_mut(holding.asset_class_id.as_str()) {
            *total += holding.current_value;
        }
    }

    let grand_total: f64 = totals.values().sum();

    let mut classes: Vec<&AssetClass> = asset_classes.iter().collect();
    classes.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.name.cmp(&b.name))
    });

    classes
        .into_iter()
        .map(|ac| {
            let total_value = totals.get(ac.id.as_str()).copied().unwrap_or(0.0);
            AllocationSlice {
                asset_class: ac.clone(),
                total_value,
                percentage: percentage_of(total_value, grand_total),
            }
        })
        .collect()
}

/// Value of each holding on the reference date, keyed by holding id.
pub fn year_start_values(
    snapshots: &[PerformanceSnapshot],
    reference_date: NaiveDate,
) -> HashMap<String, f64> {
    snapshots
        .iter()
        .filter(|s| s.snapshot_date == reference_date)
        .map(|s| (s.holding_id.clone(), s.value))
        .collect()
}

/// Computes YTD, total and annualized returns for each holding, largest
/// position first, joined with its asset class.
pub fn compute_holdings_with_returns(
    portfolio_id: &str,
    holdings: &[Holding],
    asset_classes: &[AssetClass],
    jan1_values: &HashMap<String, f64>,
) -> Vec<HoldingReturn> {
    let classes: HashMap<&str, &AssetClass> = asset_classes
        .iter()
        .map(|ac| (ac.id.as_str(), ac))
        .collect();
    let gross_assets: f64 = portfolio_holdings(portfolio_id, holdings)
        .map(|h| h.current_value)
        .sum();

    let mut results: Vec<HoldingReturn> = portfolio_holdings(portfolio_id, holdings)
        .map(|holding| {
            let current = holding.current_value;
            let cost = holding.cost_basis;

            let ytd_return = jan1_values
                .get(&holding.id)
                .filter(|jan1| **jan1 > 0.0)
                .map(|jan1| ((current - jan1) / jan1) * 100.0);
            let total_return = (cost > 0.0).then(|| ((current - cost) / cost) * 100.0);

            let asset_class = classes.get(holding.asset_class_id.as_str());

            HoldingReturn {
                holding: holding.clone(),
                asset_class_name: asset_class.map(|ac| ac.name.clone()),
                asset_class_color: asset_class.map(|ac| ac.color.clone()),
                liquidity_type: asset_class.map(|ac| ac.liquidity_type),
                weight: percentage_of(current, gross_assets),
                ytd_return,
                total_return,
                unrealized_gain: current - cost,
                annualized_return: annualized_return(holding),
            }
        })
        .collect();

    results.sort_by(|a, b| b.holding.current_value.total_cmp(&a.holding.current_value));
    results
}

/// CAGR between cost basis and current value over the holding period.
fn annualized_return(holding: &Holding) -> Option<f64> {
    let acquired = holding.acquisition_date?;
    let days = (holding.valuation_date - acquired).num_days();
    if days <= 0 || holding.cost_basis <= 0.0 || holding.current_value <= 0.0 {
        return None;
    }

    let begin_bal = Decimal::from_f64(holding.cost_basis)?;
    let end_bal = Decimal::from_f64(holding.current_value)?;
    let n_years = Decimal::from_f64(days as f64 / 365.0)?;
    if n_years.is_zero() {
        return None;
    }

    let rate = cagr(begin_bal, end_bal, n_years);
    let percentage = (rate * Decimal::from(100)).to_f64();
    debug!("cagr for {}: {begin_bal}, {end_bal}, {n_years} = {rate}", holding.id);
    percentage
}

/// Groups holdings by the liquidity type of their asset class. Only types
/// that have holdings appear; holdings without a known class are skipped.
pub fn compute_liquidity_breakdown(
    portfolio_id: &str,
    holdings: &[Holding],
    asset_classes: &[AssetClass],
) -> Vec<LiquiditySlice> {
    let liquidity_by_class: HashMap<&str, LiquidityType> = asset_classes
        .iter()
        .map(|ac| (ac.id.as_str(), ac.liquidity_type))
        .collect();

    let mut totals: BTreeMap<LiquidityType, f64> = BTreeMap::new();
    for holding in portfolio_holdings(portfolio_id, holdings) {
        match liquidity_by_class.get(holding.asset_class_id.as_str()) {
            Some(liquidity_type) => {
                *totals.entry(*liquidity_type).or_insert(0.0) += holding.current_value;
            }
            None => debug!(
                "Holding {} has no asset class, left out of liquidity",
                holding.id
            ),
        }
    }

    let grand_total: f64 = totals.values().sum();
    totals
        .into_iter()
        .map(|(liquidity_type, total_value)| {
            let (label, color) = liquidity_type.display_info();
            LiquiditySlice {
                liquidity_type,
                label,
                color,
                total_value,
                percentage: percentage_of(total_value, grand_total),
            }
        })
        .collect()
}

/// Totals debt and computes the balance-weighted average interest rate.
/// Missing rates count as zero.
pub fn compute_debt_summary(portfolio_id: &str, debt_items: &[DebtItem]) -> DebtSummary {
    let mut items: Vec<DebtItem> = debt_items
        .iter()
        .filter(|d| d.portfolio_id == portfolio_id)
        .cloned()
        .collect();
    items.sort_by(|a, b| b.balance.total_cmp(&a.balance));

    let total_debt: f64 = items.iter().map(|d| d.balance).sum();
    let weighted_interest: f64 = items
        .iter()
        .map(|d| d.balance * d.interest_rate.unwrap_or(0.0))
        .sum();
    let avg_interest_rate = if total_debt > 0.0 {
        weighted_interest / total_debt
    } else {
        0.0
    };

    DebtSummary {
        count: items.len(),
        items,
        total_debt,
        avg_interest_rate,
    }
}

pub fn compute_concentration_metrics(
    portfolio_id: &str,
    holdings: &[Holding],
    total_value: f64,
) -> ConcentrationMetrics {
    let mut sorted: Vec<&Holding> = portfolio_holdings(portfolio_id, holdings).collect();
    sorted.sort_by(|a, b| b.current_value.total_cmp(&a.current_value));

    let top_positions: Vec<PositionWeight> = sorted
        .iter()
        .take(5)
        .map(|h| PositionWeight {
            holding_id: h.id.clone(),
            label: h.short_label().to_string(),
            current_value: h.current_value,
            percentage: percentage_of(h.current_value, total_value),
        })
        .collect();

    let top5_value: f64 = top_positions.iter().map(|p| p.current_value).sum();
    let largest_position_percentage = top_positions
        .first()
        .map_or(0.0, |p| p.percentage);

    ConcentrationMetrics {
        top5_percentage: percentage_of(top5_value, total_value),
        largest_position_percentage,
        top_positions,
    }
}

/// Value-weighted YTD return over the holdings that have one. Holdings
/// without a year-start value are left out of both sides of the average.
pub fn compute_portfolio_ytd_return(holdings_with_returns: &[HoldingReturn]) -> Option<f64> {
    let contributors: Vec<(f64, f64)> = holdings_with_returns
        .iter()
        .filter_map(|h| h.ytd_return.map(|ytd| (ytd, h.holding.current_value)))
        .collect();

    let total_value: f64 = contributors.iter().map(|(_, value)| value).sum();
    if contributors.is_empty() || total_value <= 0.0 {
        return None;
    }

    Some(
        contributors
            .iter()
            .map(|(ytd, value)| ytd * (value / total_value))
            .sum(),
    )
}
