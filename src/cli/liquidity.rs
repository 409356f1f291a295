use super::ui;
use crate::core::Dashboard;
use comfy_table::Cell;

/// Liquidity profile followed by the debt schedule.
pub fn render(dashboard: &Dashboard, currency: &str) -> String {
    let mut liquidity = ui::new_styled_table();
    liquidity.set_header(vec![
        ui::header_cell("Liquidity"),
        ui::header_cell(&format!("Value ({currency})")),
        ui::header_cell("Share (%)"),
    ]);
    for slice in &dashboard.liquidity {
        liquidity.add_row(vec![
            Cell::new(slice.label),
            ui::amount_cell(slice.total_value),
            ui::format_percentage_cell(slice.percentage),
        ]);
    }

    let debt = &dashboard.debt;
    let mut debts = ui::new_styled_table();
    debts.set_header(vec![
        ui::header_cell("Debt"),
        ui::header_cell("Type"),
        ui::header_cell("Lender"),
        ui::header_cell(&format!("Balance ({currency})")),
        ui::header_cell("Rate"),
    ]);
    for item in &debt.items {
        debts.add_row(vec![
            Cell::new(&item.name),
            Cell::new(item.debt_type.to_string()),
            Cell::new(item.lender.as_deref().unwrap_or("-")),
            ui::amount_cell(item.balance),
            ui::format_optional_cell(item.interest_rate, |r| format!("{r:.2}%")),
        ]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Liquidity Profile", ui::StyleType::Title)
    );
    if dashboard.liquidity.is_empty() {
        output.push_str(&ui::style_text("No holdings", ui::StyleType::Subtle));
    } else {
        output.push_str(&liquidity.to_string());
    }

    output.push_str(&format!(
        "\n\n{}\n\n",
        ui::style_text("Debt", ui::StyleType::Title)
    ));
    if debt.items.is_empty() {
        output.push_str(&ui::style_text("No debt", ui::StyleType::Subtle));
        return output;
    }
    output.push_str(&debts.to_string());
    output.push_str(&format!(
        "\n\nTotal Debt ({}): {} across {} items, weighted rate {:.2}%",
        ui::style_text(currency, ui::StyleType::TotalLabel),
        ui::style_text(&ui::format_amount(debt.total_debt), ui::StyleType::TotalValue),
        debt.count,
        debt.avg_interest_rate
    ));
    output
}
