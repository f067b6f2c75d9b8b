use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::filter::Range;
use crate::data::model::GlassType;
use crate::selection::export_csv;
use crate::state::{AppState, UiEvent};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Emits at most one `FilterChanged` per frame.
pub fn side_panel(ui: &mut Ui, state: &AppState, events: &mut Vec<UiEvent>) {
    ui.heading("Filters");
    ui.separator();

    let mut criteria = state.criteria.clone();
    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Glass type");
            for glass_type in GlassType::ALL {
                let mut checked = criteria.glass_types.contains(&glass_type);
                if ui.checkbox(&mut checked, glass_type.label()).changed() {
                    if checked {
                        criteria.glass_types.insert(glass_type);
                    } else {
                        criteria.glass_types.remove(&glass_type);
                    }
                    changed = true;
                }
            }
            ui.add_space(8.0);

            changed |= range_slider(ui, "Solar factor (0-100)", &mut criteria.solar_factor);
            ui.add_space(8.0);
            changed |= range_slider(ui, "Transmittance (0-100)", &mut criteria.transmittance);
            ui.add_space(12.0);

            // ---- Active filter summary ----
            egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                let summary = state.filter_summary();
                ui.label(summary.types_line);
                ui.label(summary.solar_factor_line);
                ui.label(summary.transmittance_line);
            });
        });

    if changed {
        events.push(UiEvent::FilterChanged(criteria));
    }
}

/// Two sliders for the bounds of an inclusive range; keeps `min <= max`.
fn range_slider(ui: &mut Ui, label: &str, range: &mut Range) -> bool {
    ui.strong(label);
    let min_changed = ui
        .add(Slider::new(&mut range.min, 0.0..=100.0).step_by(1.0).text("min"))
        .changed();
    let max_changed = ui
        .add(Slider::new(&mut range.max, 0.0..=100.0).step_by(1.0).text("max"))
        .changed();

    if min_changed && range.min > range.max {
        range.max = range.min;
    }
    if max_changed && range.max < range.min {
        range.min = range.max;
    }
    min_changed || max_changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            let has_selection = !state.selection.is_empty();
            if ui
                .add_enabled(has_selection, egui::Button::new("Export selection…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} glasses loaded, {} visible, {} selected",
            state.dataset.len(),
            state.view.len(),
            state.selection.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Bottom strip with the total-count message.
pub fn total_bar(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(state.total_message());
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export selected glasses")
        .set_file_name("selected_glasses.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match export_csv(&state.table_rows(), &path) {
            Ok(()) => {
                log::info!(
                    "Exported {} selected glasses to {}",
                    state.selection.len(),
                    path.display()
                );
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export selection: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
