use super::ui;
use crate::core::Dashboard;
use comfy_table::Cell;

/// Headline figures of the portfolio.
pub fn render(dashboard: &Dashboard, currency: &str) -> String {
    let summary = &dashboard.summary;
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Metric"), ui::header_cell(currency)]);

    table.add_row(vec![
        Cell::new("Gross Assets"),
        ui::amount_cell(summary.gross_assets),
    ]);
    table.add_row(vec![
        Cell::new("Total Debt"),
        ui::amount_cell(summary.total_debt),
    ]);
    table.add_row(vec![
        Cell::new(ui::style_text("Net Worth", ui::StyleType::TotalLabel)),
        ui::amount_cell(summary.net_worth),
    ]);
    table.add_row(vec![
        Cell::new("Debt / Assets"),
        ui::format_percentage_cell(summary.debt_to_assets()),
    ]);
    table.add_row(vec![
        Cell::new("Holdings"),
        Cell::new(summary.holdings_count).set_alignment(comfy_table::CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new(format!("YTD Return ({})", dashboard.reporting_year)),
        ui::optional_change_cell(dashboard.portfolio_ytd_return),
    ]);

    let mut output = format!(
        "Portfolio: {}\n",
        ui::style_text(&dashboard.portfolio.name, ui::StyleType::Title)
    );
    if let Some(description) = &dashboard.portfolio.description {
        output.push_str(&format!(
            "{}\n",
            ui::style_text(description, ui::StyleType::Subtle)
        ));
    }
    output.push_str(&format!(
        "{}\n\n",
        ui::style_text(
            &format!("As of {}", dashboard.as_of),
            ui::StyleType::Subtle
        )
    ));
    output.push_str(&table.to_string());

    output.push_str(&format!(
        "\n\nNet Worth ({}): {}",
        ui::style_text(currency, ui::StyleType::TotalLabel),
        ui::style_text(
            &ui::format_amount(summary.net_worth),
            ui::StyleType::TotalValue
        )
    ));
    output
}
