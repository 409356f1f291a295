//! Terminal presentation of the dashboard panels

pub mod alloc;
pub mod holdings;
pub mod import;
pub mod indicators;
pub mod liquidity;
pub mod performance;
pub mod risk;
pub mod setup;
pub mod summary;
pub mod ui;

use crate::core::Dashboard;
use anyhow::Result;
use serde_json::json;

/// A report over one portfolio. `Dashboard` prints every panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Summary,
    Allocation,
    Holdings,
    Liquidity,
    Risk,
    Performance,
    Macro,
    Dashboard,
}

pub fn render_report(report: Report, dashboard: &Dashboard, currency: &str) -> String {
    match report {
        Report::Summary => summary::render(dashboard, currency),
        Report::Allocation => alloc::render(dashboard, currency),
        Report::Holdings => holdings::render(dashboard, currency),
        Report::Liquidity => liquidity::render(dashboard, currency),
        Report::Risk => risk::render(dashboard, currency),
        Report::Performance => performance::render(dashboard, currency),
        Report::Macro => indicators::render(dashboard),
        Report::Dashboard => {
            let panels = [
                summary::render(dashboard, currency),
                alloc::render(dashboard, currency),
                holdings::render(dashboard, currency),
                liquidity::render(dashboard, currency),
                risk::render(dashboard, currency),
                performance::render(dashboard, currency),
                indicators::render(dashboard),
            ];
            panels.join(&format!("\n\n{}\n\n", ui::separator()))
        }
    }
}

/// The computed values behind a report, as pretty printed JSON.
pub fn report_json(report: Report, dashboard: &Dashboard) -> Result<String> {
    let value = match report {
        Report::Summary => json!({
            "portfolio": dashboard.portfolio,
            "as_of": dashboard.as_of,
            "summary": dashboard.summary,
            "debt_to_assets": dashboard.summary.debt_to_assets(),
            "portfolio_ytd_return": dashboard.portfolio_ytd_return,
        }),
        Report::Allocation => json!({ "allocation": dashboard.allocation }),
        Report::Holdings => json!({ "holdings": dashboard.holdings }),
        Report::Liquidity => json!({
            "liquidity": dashboard.liquidity,
            "debt": dashboard.debt,
        }),
        Report::Risk => json!({
            "concentration": dashboard.concentration,
            "risk": dashboard.risk,
        }),
        Report::Performance => json!({
            "monthly_returns": dashboard.monthly_returns,
            "performance": dashboard.performance,
            "portfolio_ytd_return": dashboard.portfolio_ytd_return,
        }),
        Report::Macro => json!({
            "latest": dashboard.macro_latest,
            "history": dashboard.macro_history,
        }),
        Report::Dashboard => serde_json::to_value(dashboard)?,
    };
    Ok(serde_json::to_string_pretty(&value)?)
}
