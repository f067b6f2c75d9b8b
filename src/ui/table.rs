use eframe::egui::{Button, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::{AppState, UiEvent};

const HEADERS: [&str; 7] = [
    "Manufacturer",
    "Model",
    "Type",
    "Solar factor",
    "Transmittance",
    "U factor",
    "Cost",
];

// ---------------------------------------------------------------------------
// Selected glasses (right side panel)
// ---------------------------------------------------------------------------

/// Render the selection table with its "Clear all" and per-row remove buttons.
pub fn selection_panel(ui: &mut Ui, state: &AppState, events: &mut Vec<UiEvent>) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Selected glasses");
        if ui
            .button(RichText::new("Clear all").color(Color32::RED))
            .clicked()
        {
            events.push(UiEvent::ClearAll);
        }
    });
    if ui
        .add_enabled(!state.view.is_empty(), Button::new("Select all visible"))
        .clicked()
    {
        events.push(UiEvent::PointsSelected(state.all_visible_points()));
    }
    ui.separator();

    let rows = state.table_rows();
    if rows.is_empty() {
        ui.label("Click points on the plot to add them here.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(true)
        .max_scroll_height(400.0)
        .columns(Column::auto().at_least(40.0), HEADERS.len())
        .column(Column::exact(24.0))
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
            header.col(|_ui: &mut Ui| {});
        })
        .body(|mut body| {
            for row in &rows {
                body.row(20.0, |mut table_row| {
                    for cell in [
                        &row.manufacturer,
                        &row.model,
                        &row.glass_type,
                        &row.solar_factor,
                        &row.transmittance,
                        &row.u_factor,
                        &row.cost,
                    ] {
                        table_row.col(|ui: &mut Ui| {
                            ui.label(cell.as_str());
                        });
                    }
                    table_row.col(|ui: &mut Ui| {
                        if ui.small_button("×").on_hover_text("Remove").clicked() {
                            events.push(UiEvent::Remove(row.remove));
                        }
                    });
                });
            }
        });
}
