use eframe::egui;

use crate::state::{AppState, UiEvent};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GlassDashboardApp {
    pub state: AppState,
}

impl GlassDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for GlassDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Widgets only record what happened; the state changes once per frame.
        let mut events: Vec<UiEvent> = Vec::new();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: total count ----
        egui::TopBottomPanel::bottom("total_bar").show(ctx, |ui| {
            panels::total_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state, &mut events);
            });

        // ---- Right side panel: selected glasses ----
        egui::SidePanel::right("selection_panel")
            .default_width(560.0)
            .resizable(true)
            .show(ctx, |ui| {
                table::selection_panel(ui, &self.state, &mut events);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::glass_plot(ui, &self.state, &mut events);
        });

        if !events.is_empty() {
            self.state.apply(events);
            ctx.request_repaint();
        }
    }
}
