use super::ui;
use crate::core::Dashboard;
use comfy_table::Cell;

/// Latest macro readings with a trend line over their history.
pub fn render(dashboard: &Dashboard) -> String {
    let mut output = format!(
        "{}\n\n",
        ui::style_text("Macro Indicators", ui::StyleType::Title)
    );
    if dashboard.macro_latest.is_empty() {
        output.push_str(&ui::style_text(
            "No indicator readings",
            ui::StyleType::Subtle,
        ));
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Indicator"),
        ui::header_cell("Value"),
        ui::header_cell("As Of"),
        ui::header_cell("Source"),
        ui::header_cell("Trend"),
    ]);
    for reading in &dashboard.macro_latest {
        let trend = dashboard
            .macro_history
            .get(&reading.name)
            .map(|points| {
                let values: Vec<f64> = points.iter().map(|p| p.value).collect();
                ui::sparkline(&values)
            })
            .unwrap_or_default();

        table.add_row(vec![
            Cell::new(reading.label),
            ui::format_percentage_cell(reading.value),
            Cell::new(reading.date.to_string()),
            Cell::new(ui::style_text(&reading.source, ui::StyleType::Subtle)),
            Cell::new(trend),
        ]);
    }
    output.push_str(&table.to_string());
    output
}
