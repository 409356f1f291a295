use super::ui;
use crate::core::Dashboard;
use comfy_table::Cell;

/// Allocation by asset class, in display order.
pub fn render(dashboard: &Dashboard, currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Asset Class"),
        ui::header_cell("Liquidity"),
        ui::header_cell(&format!("Value ({currency})")),
        ui::header_cell("Allocation (%)"),
    ]);

    let mut total = 0.0;
    for slice in &dashboard.allocation {
        total += slice.total_value;
        let name = match &slice.asset_class.icon {
            Some(icon) => format!("{} [{icon}]", slice.asset_class.name),
            None => slice.asset_class.name.clone(),
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(ui::style_text(
                &slice.asset_class.liquidity_type.to_string(),
                ui::StyleType::Subtle,
            )),
            ui::amount_cell(slice.total_value),
            ui::format_percentage_cell(slice.percentage),
        ]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Asset Allocation", ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\nTotal ({}): {}",
        ui::style_text(currency, ui::StyleType::TotalLabel),
        ui::style_text(&ui::format_amount(total), ui::StyleType::TotalValue)
    ));
    output
}
