mod app;
mod color;
mod data;
mod state;
mod ui;

use app::StaffScopeApp;
use data::prepare::ExclusionRules;
use eframe::egui;
use state::AppState;

/// Environment variable pointing at a JSON exclusion-rules file.
/// Defaults apply when unset or unreadable.
const RULES_ENV: &str = "STAFFSCOPE_RULES";

fn load_rules() -> ExclusionRules {
    let Ok(path) = std::env::var(RULES_ENV) else {
        return ExclusionRules::default();
    };
    match std::fs::read_to_string(&path)
        .map_err(anyhow::Error::from)
        .and_then(|text| serde_json::from_str(&text).map_err(anyhow::Error::from))
    {
        Ok(rules) => {
            log::info!("Loaded exclusion rules from {path}");
            rules
        }
        Err(e) => {
            log::warn!("Ignoring rules file {path}: {e:#}");
            ExclusionRules::default()
        }
    }
}

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "StaffScope – HR Dashboard",
        options,
        Box::new(|_cc| {
            let state = AppState {
                rules: load_rules(),
                ..Default::default()
            };
            Ok(Box::new(StaffScopeApp::new(state)))
        }),
    )
}
