use eframe::egui::{self, Pos2, RichText, Ui};
use egui_plot::{MarkerShape, Plot, PlotPoint, Points};

use crate::color::{color_for_hex, highlight_color};
use crate::data::model::GlassRecord;
use crate::data::sizing::SIZE_MISSING;
use crate::selection::format_cost;
use crate::state::{AppState, UiEvent};

/// Clicks further than this (in screen points) from every marker select nothing.
const PICK_RADIUS: f32 = 20.0;

// ---------------------------------------------------------------------------
// Scatter plot (central panel)
// ---------------------------------------------------------------------------

/// Render the solar factor × transmittance scatter plot.
pub fn glass_plot(ui: &mut Ui, state: &AppState, events: &mut Vec<UiEvent>) {
    if state.view.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No glass found with the current filters");
        });
        return;
    }

    let dataset = &state.dataset;
    let highlighted = state.highlighted_keys();

    let plot_response = Plot::new("glass_plot")
        .x_axis_label("Solar factor (0-100)")
        .y_axis_label("Luminous transmittance (0-100)")
        .include_x(0.0)
        .include_x(100.0)
        .include_y(0.0)
        .include_y(100.0)
        .show_x(false)
        .show_y(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (point_index, rec) in state.view.iter(dataset) {
                let size = state.sizes.get(point_index).copied().unwrap_or(SIZE_MISSING);
                let radius = (size / 2.0) as f32;
                let xy = [rec.solar_factor, rec.luminous_transmittance];

                plot_ui.points(
                    Points::new(vec![xy])
                        .name(rec.display_name())
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(radius)
                        .color(color_for_hex(&rec.color_hex)),
                );

                if highlighted.contains(&rec.key) {
                    plot_ui.points(
                        Points::new(vec![xy])
                            .shape(MarkerShape::Circle)
                            .filled(false)
                            .radius(radius + 3.0)
                            .color(highlight_color(&rec.color_hex)),
                    );
                }
            }
        });

    let transform = plot_response.transform;
    let screen_points: Vec<Pos2> = state
        .view
        .iter(dataset)
        .map(|(_, rec)| {
            transform.position_from_point(&PlotPoint::new(rec.solar_factor, rec.luminous_transmittance))
        })
        .collect();

    let response = plot_response.response;

    if response.clicked() {
        let picked = response
            .interact_pointer_pos()
            .and_then(|pos| nearest_point(&screen_points, pos, PICK_RADIUS))
            .and_then(|point_index| state.point(point_index));
        if let Some(point) = picked {
            events.push(UiEvent::PointsSelected(vec![point]));
        }
    }

    let hovered = response
        .hover_pos()
        .and_then(|pos| nearest_point(&screen_points, pos, PICK_RADIUS))
        .and_then(|point_index| state.visible_record(point_index));
    if let Some(rec) = hovered {
        response.on_hover_ui_at_pointer(|ui: &mut Ui| {
            tooltip(ui, rec, &state.currency_symbol);
        });
    }
}

/// Index of the screen point closest to `pointer`, if within `max_distance`.
pub fn nearest_point(points: &[Pos2], pointer: Pos2, max_distance: f32) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.distance_sq(pointer)))
        .filter(|(_, d2)| *d2 <= max_distance * max_distance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

fn tooltip(ui: &mut Ui, rec: &GlassRecord, currency_symbol: &str) {
    ui.label(RichText::new(rec.display_name()).strong());
    egui::Grid::new("glass_tooltip")
        .num_columns(2)
        .spacing([12.0, 2.0])
        .show(ui, |ui: &mut Ui| {
            let mut field = |name: &str, value: String| {
                ui.strong(name);
                ui.label(value);
                ui.end_row();
            };
            field("Type", rec.glass_type.to_string());
            field("Solar factor", format!("{:.1}", rec.solar_factor));
            field("Transmittance", format!("{:.1}", rec.luminous_transmittance));
            field("U factor", rec.u_factor.to_string());
            field("External reflectance", rec.external_reflectance.to_string());
            field("Internal reflectance", rec.internal_reflectance.to_string());
            field("Cost", format_cost(rec.cost, currency_symbol));
            field("Aspect", rec.aspect.clone());
            field("Color", rec.color_hex.clone());
        });
}
