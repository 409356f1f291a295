//! Macro economic indicators shown next to the portfolio.
use crate::core::model::{IndicatorName, MacroIndicator};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorReading {
    pub name: IndicatorName,
    pub label: &'static str,
    pub value: f64,
    pub date: NaiveDate,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Most recent reading of each tracked indicator. Indicators without any
/// reading are left out.
pub fn latest_indicators(indicators: &[MacroIndicator]) -> Vec<IndicatorReading> {
    IndicatorName::ALL
        .iter()
        .filter_map(|name| {
            indicators
                .iter()
                .filter(|i| i.indicator_name == *name)
                .max_by_key(|i| i.indicator_date)
                .map(|latest| IndicatorReading {
                    name: *name,
                    label: name.label(),
                    value: latest.value,
                    date: latest.indicator_date,
                    source: latest.source.clone(),
                })
        })
        .collect()
}

/// Chronological readings per indicator, for sparklines.
pub fn indicator_history(
    indicators: &[MacroIndicator],
) -> BTreeMap<IndicatorName, Vec<HistoryPoint>> {
    IndicatorName::ALL
        .iter()
        .map(|name| {
            let mut history: Vec<HistoryPoint> = indicators
                .iter()
                .filter(|i| i.indicator_name == *name)
                .map(|i| HistoryPoint {
                    date: i.indicator_date,
                    value: i.value,
                })
                .collect();
            history.sort_by_key(|p| p.date);
            (*name, history)
        })
        .collect()
}
