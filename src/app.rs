use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct StaffScopeApp {
    pub state: AppState,
}

impl StaffScopeApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl Default for StaffScopeApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for StaffScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + tab strip ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
            panels::tab_strip(ui, &mut self.state);
        });

        // ---- Central panel: active tab ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.active_tab {
            Tab::Overview => charts::overview_tab(ui, &self.state),
            Tab::Charts => charts::charts_tab(ui, &self.state),
            Tab::MissingData => charts::missing_tab(ui, &mut self.state),
            Tab::DataView => panels::data_view(ui, &mut self.state),
        });
    }
}
