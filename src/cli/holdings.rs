use super::ui;
use crate::core::Dashboard;
use comfy_table::Cell;

/// Holdings with their returns, largest position first.
pub fn render(dashboard: &Dashboard, currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Holding"),
        ui::header_cell("Ticker"),
        ui::header_cell("Asset Class"),
        ui::header_cell(&format!("Value ({currency})")),
        ui::header_cell("Weight"),
        ui::header_cell("Cost Basis"),
        ui::header_cell("Unrealized Gain"),
        ui::header_cell("YTD"),
        ui::header_cell("Total"),
        ui::header_cell("Annualized"),
    ]);

    for item in &dashboard.holdings {
        let holding = &item.holding;
        let name = if holding.is_private {
            format!(
                "{} {}",
                holding.name,
                ui::style_text("(private)", ui::StyleType::Subtle)
            )
        } else {
            holding.name.clone()
        };
        let class_name = item.asset_class_name.as_deref().unwrap_or("Unclassified");

        table.add_row(vec![
            Cell::new(name),
            Cell::new(holding.ticker.as_deref().unwrap_or("-")),
            Cell::new(class_name),
            ui::amount_cell(holding.current_value),
            ui::format_percentage_cell(item.weight),
            ui::amount_cell(holding.cost_basis),
            ui::amount_cell(item.unrealized_gain),
            ui::optional_change_cell(item.ytd_return),
            ui::optional_change_cell(item.total_return),
            ui::optional_change_cell(item.annualized_return),
        ]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text(
            &format!("Holdings ({})", dashboard.holdings.len()),
            ui::StyleType::Title
        )
    );
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\n{}",
        ui::style_text(
            &format!("YTD returns are measured from {}-01-01", dashboard.reporting_year),
            ui::StyleType::Subtle
        )
    ));
    output
}
