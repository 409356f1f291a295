use super::ui;
use crate::core::Dashboard;
use crate::core::analytics::HoldingReturn;
use crate::core::performance::SeriesSource;
use comfy_table::Cell;

fn performers_table(title: &str, performers: &[HoldingReturn]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(title),
        ui::header_cell("YTD"),
        ui::header_cell("Total"),
    ]);
    for item in performers {
        table.add_row(vec![
            Cell::new(&item.holding.name),
            ui::optional_change_cell(item.ytd_return),
            ui::optional_change_cell(item.total_return),
        ]);
    }
    table.to_string()
}

/// Monthly returns and the best and worst holdings of the year.
pub fn render(dashboard: &Dashboard, currency: &str) -> String {
    let series = &dashboard.monthly_returns;
    let summary = &dashboard.performance;

    let mut months = ui::new_styled_table();
    months.set_header(vec![ui::header_cell("Month"), ui::header_cell("Return")]);
    for month in &series.months {
        months.add_row(vec![
            Cell::new(format!("{} {}", month.label, month.year)),
            ui::optional_change_cell(month.return_pct),
        ]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text(
            &format!("Monthly Returns {}", dashboard.reporting_year),
            ui::StyleType::Title
        )
    );
    if series.source == SeriesSource::Demo {
        output.push_str(&format!(
            "{}\n\n",
            ui::style_text(
                "Demo series: illustrative returns, not actual performance",
                ui::StyleType::Warning
            )
        ));
    }
    if series.months.is_empty() {
        output.push_str(&ui::style_text(
            "No months reported yet",
            ui::StyleType::Subtle,
        ));
    } else {
        output.push_str(&months.to_string());
        let values: Vec<f64> = series.months.iter().filter_map(|m| m.return_pct).collect();
        output.push_str(&format!("\n{}", ui::sparkline(&values)));
    }

    if let Some(best) = &summary.best_month {
        output.push_str(&format!(
            "\nBest month: {} ({:.2}%)",
            best.label,
            best.return_pct.unwrap_or(0.0)
        ));
    }
    if let Some(worst) = &summary.worst_month {
        output.push_str(&format!(
            "\nWorst month: {} ({:.2}%)",
            worst.label,
            worst.return_pct.unwrap_or(0.0)
        ));
    }

    if !summary.top_performers.is_empty() {
        output.push_str("\n\n");
        output.push_str(&performers_table("Top Performers", &summary.top_performers));
        output.push_str("\n\n");
        output.push_str(&performers_table(
            "Bottom Performers",
            &summary.bottom_performers,
        ));
    }

    output.push_str(&format!(
        "\n\nUnrealized Gain ({}): {}",
        ui::style_text(currency, ui::StyleType::TotalLabel),
        ui::style_text(
            &ui::format_amount(summary.total_unrealized_gain),
            ui::StyleType::TotalValue
        )
    ));
    output.push_str(&format!(
        "\nHoldings with Gains: {} of {}",
        summary.holdings_with_gains, summary.holdings_count
    ));
    output.push_str(&format!(
        "\nAverage Total Return: {}",
        summary
            .avg_total_return
            .map_or("N/A".to_string(), |r| format!("{r:.2}%"))
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::sample_dashboard;

    #[test]
    fn test_render_performance() {
        let output = render(&sample_dashboard(), "USD");

        assert!(output.contains("Monthly Returns 2025"));
        assert!(output.contains("Jan 2025"));
        assert!(output.contains("5.00%"));
        assert!(output.contains("Best month: Mar"));
        assert!(output.contains("Worst month: Feb"));
        assert!(output.contains("Top Performers"));
        assert!(output.contains("Holdings with Gains: 1 of 2"));
        assert!(!output.contains("Demo series"));
    }

    #[test]
    fn test_demo_series_is_flagged() {
        let mut dashboard = sample_dashboard();
        dashboard.monthly_returns.source = SeriesSource::Demo;
        let output = render(&dashboard, "USD");
        assert!(output.contains("Demo series"));
    }
}
