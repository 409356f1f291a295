//! Portfolio entities as read from the persistence layer.
//!
//! Everything here is an immutable input to the analytics functions; nothing
//! in the crate mutates a loaded [`Snapshot`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// How quickly holdings of an asset class can be turned into cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidityType {
    Liquid,
    SemiLiquid,
    Illiquid,
}

impl LiquidityType {
    /// Returns display label and chart color for the liquidity type
    pub fn display_info(&self) -> (&'static str, &'static str) {
        match self {
            LiquidityType::Liquid => ("Liquid", "#10B981"),
            LiquidityType::SemiLiquid => ("Semi-Liquid", "#F59E0B"),
            LiquidityType::Illiquid => ("Illiquid", "#EF4444"),
        }
    }
}

impl Display for LiquidityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_info().0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClass {
    pub id: String,
    pub name: String,
    pub liquidity_type: LiquidityType,
    pub display_order: i32,
    pub color: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub id: String,
    pub portfolio_id: String,
    pub asset_class_id: String,
    pub name: String,
    #[serde(default)]
    pub ticker: Option<String>,
    pub current_value: f64,
    pub cost_basis: f64,
    #[serde(default)]
    pub shares: Option<f64>,
    #[serde(default)]
    pub is_private: bool,
    pub valuation_date: NaiveDate,
    #[serde(default)]
    pub acquisition_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Holding {
    /// Ticker if the holding has one, otherwise the first word of its name.
    pub fn short_label(&self) -> &str {
        self.ticker
            .as_deref()
            .or_else(|| self.name.split_whitespace().next())
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtType {
    Margin,
    Loc,
    Mortgage,
    Other,
}

impl Display for DebtType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DebtType::Margin => "Margin",
                DebtType::Loc => "Line of Credit",
                DebtType::Mortgage => "Mortgage",
                DebtType::Other => "Other",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtItem {
    pub id: String,
    pub portfolio_id: String,
    pub name: String,
    pub debt_type: DebtType,
    pub balance: f64,
    /// Annual rate as a percentage, e.g. 6.5 for 6.5%.
    #[serde(default)]
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub lender: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub id: String,
    pub holding_id: String,
    pub snapshot_date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorName {
    FedFunds,
    #[serde(rename = "treasury_10y")]
    Treasury10y,
    CpiYoy,
}

impl IndicatorName {
    pub const ALL: [IndicatorName; 3] = [
        IndicatorName::FedFunds,
        IndicatorName::Treasury10y,
        IndicatorName::CpiYoy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IndicatorName::FedFunds => "Fed Funds Rate",
            IndicatorName::Treasury10y => "10Y Treasury",
            IndicatorName::CpiYoy => "CPI (YoY)",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            IndicatorName::FedFunds => "fed_funds",
            IndicatorName::Treasury10y => "treasury_10y",
            IndicatorName::CpiYoy => "cpi_yoy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroIndicator {
    pub indicator_name: IndicatorName,
    pub value: f64,
    pub indicator_date: NaiveDate,
    pub source: String,
}

/// Everything a report needs, as loaded from a [`crate::core::SnapshotSource`].
///
/// `portfolios` may hold more than one portfolio; analytics select one by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub portfolios: Vec<Portfolio>,
    #[serde(default)]
    pub asset_classes: Vec<AssetClass>,
    #[serde(default)]
    pub holdings: Vec<Holding>,
    #[serde(default)]
    pub debt_items: Vec<DebtItem>,
    #[serde(default)]
    pub performance_snapshots: Vec<PerformanceSnapshot>,
    #[serde(default)]
    pub macro_indicators: Vec<MacroIndicator>,
}

impl Snapshot {
    pub fn asset_class_map(&self) -> HashMap<&str, &AssetClass> {
        self.asset_classes
            .iter()
            .map(|ac| (ac.id.as_str(), ac))
            .collect()
    }

    /// Lists data-integrity problems. These belong to whoever produced the
    /// data; analytics tolerate them.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let classes = self.asset_class_map();

        for holding in &self.holdings {
            if !classes.contains_key(holding.asset_class_id.as_str()) {
                problems.push(format!(
                    "Holding {} references unknown asset class {}",
                    holding.id, holding.asset_class_id
                ));
            }
            if holding.current_value < 0.0 || holding.cost_basis < 0.0 {
                problems.push(format!("Holding {} has a negative value", holding.id));
            }
            if holding.shares.is_some_and(|s| s < 0.0) {
                problems.push(format!("Holding {} has negative shares", holding.id));
            }
        }

        for debt in &self.debt_items {
            if debt.balance < 0.0 {
                problems.push(format!("Debt item {} has a negative balance", debt.id));
            }
        }

        let mut seen = HashSet::new();
        for snapshot in &self.performance_snapshots {
            if !seen.insert((snapshot.holding_id.as_str(), snapshot.snapshot_date)) {
                problems.push(format!(
                    "Duplicate snapshot for holding {} on {}",
                    snapshot.holding_id, snapshot.snapshot_date
                ));
            }
        }

        problems
    }
}
