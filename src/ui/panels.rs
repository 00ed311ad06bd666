use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar: file open, sheet selector, row counts.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let sheet_names: Vec<String> = state
            .workbook
            .as_ref()
            .map(|wb| wb.sheet_names().iter().map(|s| s.to_string()).collect())
            .unwrap_or_default();

        if !sheet_names.is_empty() {
            let current = state.selected_sheet.clone().unwrap_or_default();
            let mut picked: Option<String> = None;
            egui::ComboBox::from_id_salt("sheet_select")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for name in &sheet_names {
                        if ui.selectable_label(current == *name, name).clicked() {
                            picked = Some(name.clone());
                        }
                    }
                });
            if let Some(name) = picked {
                state.select_sheet(&name);
            }
        }

        if let Some(p) = &state.prepared {
            ui.separator();
            ui.label(format!(
                "{} employees, {} visible",
                p.frame.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Render the tab strip below the menu bar.
pub fn tab_strip(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            if ui
                .selectable_label(state.active_tab == tab, tab.label())
                .clicked()
            {
                state.active_tab = tab;
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Data-view tab: per-column filters + table
// ---------------------------------------------------------------------------

/// Render the filterable table view of the prepared frame.
pub fn data_view(ui: &mut Ui, state: &mut AppState) {
    let Some(prepared) = &state.prepared else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let columns = prepared.frame.columns.clone();
    let unique = prepared.frame.unique_values();

    ui.heading("Filter by value");

    ScrollArea::horizontal()
        .id_salt("filter_row")
        .show(ui, |ui: &mut Ui| {
            ui.horizontal_top(|ui: &mut Ui| {
                for col in &columns {
                    let Some(all_values) = unique.get(col) else {
                        continue;
                    };
                    if all_values.is_empty() {
                        continue;
                    }

                    let n_selected = state
                        .filters
                        .get(col)
                        .map(|sel| sel.len())
                        .unwrap_or(0);
                    let header_text = if n_selected == 0 {
                        format!("{col} (all)")
                    } else {
                        format!("{col} ({n_selected})")
                    };

                    egui::CollapsingHeader::new(RichText::new(header_text).strong())
                        .id_salt(col)
                        .default_open(false)
                        .show(ui, |ui: &mut Ui| {
                            if ui.small_button("Clear").clicked() {
                                state.clear_filter(col);
                            }
                            for val in all_values {
                                let is_selected = state
                                    .filters
                                    .get(col)
                                    .map(|sel| sel.contains(val))
                                    .unwrap_or(false);
                                let mut checked = is_selected;
                                if ui.checkbox(&mut checked, val.to_string()).changed() {
                                    state.toggle_filter_value(col, val);
                                }
                            }
                        });
                }
            });
        });

    ui.separator();

    let Some(prepared) = &state.prepared else {
        return;
    };
    let frame = &prepared.frame;
    let visible = &state.visible_indices;

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().resizable(true).at_least(60.0), frame.columns.len())
        .header(22.0, |mut header| {
            for col in &frame.columns {
                header.col(|ui| {
                    ui.strong(col);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, visible.len(), |mut row| {
                let frame_row = &frame.rows[visible[row.index()]];
                for cell in frame_row {
                    row.col(|ui| {
                        ui.label(cell.to_string());
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open employee data")
        .add_filter("Supported files", &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"])
        .add_filter("Excel / OpenDocument", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(workbook) => {
                log::info!(
                    "Loaded workbook with sheets {:?}",
                    workbook.sheet_names()
                );
                state.set_workbook(workbook);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Upload failed: {e:#}"));
                state.loading = false;
            }
        }
    }
}
