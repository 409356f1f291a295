use super::ui;
use crate::core::Dashboard;
use crate::core::risk::RiskMeasure;
use comfy_table::Cell;

fn measure_row(label: &str, measure: &RiskMeasure) -> Vec<Cell> {
    vec![
        Cell::new(label),
        ui::format_percentage_cell(measure.percentage),
        Cell::new(ui::style_text(
            &format!("<{:.0}%", measure.ideal_below),
            ui::StyleType::Subtle,
        )),
        ui::tier_cell(measure.tier),
    ]
}

/// Concentration, liquidity and leverage risk, with the largest positions.
pub fn render(dashboard: &Dashboard, currency: &str) -> String {
    let risk = &dashboard.risk;
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Measure"),
        ui::header_cell("Value"),
        ui::header_cell("Ideal"),
        ui::header_cell("Risk"),
    ]);
    table.add_row(measure_row("Top 5 Positions", &risk.top5));
    table.add_row(measure_row("Largest Position", &risk.single_position));
    table.add_row(measure_row("Illiquid Assets", &risk.illiquid));
    table.add_row(measure_row("Debt / Assets", &risk.debt_to_assets));

    let mut positions = ui::new_styled_table();
    positions.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Position"),
        ui::header_cell(&format!("Value ({currency})")),
        ui::header_cell("Weight (%)"),
    ]);
    for (rank, position) in dashboard.concentration.top_positions.iter().enumerate() {
        positions.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&position.label),
            ui::amount_cell(position.current_value),
            ui::format_percentage_cell(position.percentage),
        ]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Risk Profile", ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    if !dashboard.concentration.top_positions.is_empty() {
        output.push_str(&format!(
            "\n\n{}\n\n",
            ui::style_text("Top Positions", ui::StyleType::Title)
        ));
        output.push_str(&positions.to_string());
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::sample_dashboard;

    #[test]
    fn test_render_risk() {
        let output = render(&sample_dashboard(), "USD");

        assert!(output.contains("Top 5 Positions"));
        assert!(output.contains("100.00%"));
        assert!(output.contains("<30%"));
        assert!(output.contains("High"));
        assert!(output.contains("Moderate"));
        assert!(output.contains("Top Positions"));
    }
}
