use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::ColorMap;
use crate::data::model::{CellValue, Frame};
use crate::data::prepare::{
    category_distribution, missingness, presence_split, CategoryCount, COL_AGE, COL_DEPARTMENT,
    COL_EDUCATION, COL_GENDER, COL_RELIGION,
};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Overview tab – metric boxes
// ---------------------------------------------------------------------------

pub fn overview_tab(ui: &mut Ui, state: &AppState) {
    let Some(prepared) = &state.prepared else {
        empty_hint(ui);
        return;
    };
    let sum = &prepared.summary;

    ui.add_space(12.0);
    ui.columns(3, |cols| {
        metric_box(
            &mut cols[0],
            "Employees",
            &sum.total.to_string(),
            Color32::from_rgb(0x1e, 0x3d, 0x59),
        );
        metric_box(
            &mut cols[1],
            "Complete records",
            &format!("{} ({}%)", sum.complete, sum.complete_pct),
            Color32::from_rgb(0x2a, 0x4d, 0x6f),
        );
        metric_box(
            &mut cols[2],
            "Incomplete records",
            &format!("{} ({}%)", sum.incomplete, sum.incomplete_pct),
            Color32::from_rgb(0x4a, 0x7c, 0xa8),
        );
    });
}

fn metric_box(ui: &mut Ui, title: &str, value: &str, fill: Color32) {
    egui::Frame::new()
        .fill(fill)
        .corner_radius(8)
        .inner_margin(16)
        .show(ui, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new(title).color(Color32::WHITE).size(14.0));
                ui.label(
                    RichText::new(value)
                        .color(Color32::WHITE)
                        .size(24.0)
                        .strong(),
                );
            });
        });
}

// ---------------------------------------------------------------------------
// Charts tab – demographic distributions
// ---------------------------------------------------------------------------

pub fn charts_tab(ui: &mut Ui, state: &AppState) {
    let Some(prepared) = &state.prepared else {
        empty_hint(ui);
        return;
    };
    let frame = &prepared.frame;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols| {
                category_chart(&mut cols[0], frame, COL_GENDER, "Employees by gender", None);
                category_chart(&mut cols[1], frame, COL_RELIGION, "Employees by religion", None);
            });
            ui.add_space(8.0);
            ui.columns(2, |cols| {
                category_chart(
                    &mut cols[0],
                    frame,
                    COL_DEPARTMENT,
                    "Top departments",
                    Some(5),
                );
                category_chart(
                    &mut cols[1],
                    frame,
                    COL_EDUCATION,
                    "Employees by education level",
                    None,
                );
            });
            ui.add_space(8.0);
            age_histogram(ui, frame);
        });
}

/// Bar chart over one categorical column; skipped when the column is
/// absent or entirely null.
fn category_chart(ui: &mut Ui, frame: &Frame, column: &str, title: &str, top_n: Option<usize>) {
    let dist = category_distribution(frame, column, top_n);
    if dist.is_empty() {
        return;
    }

    ui.strong(title);
    let unique = frame.unique_values();
    let colors = unique
        .get(column)
        .map(|vals| ColorMap::new(column, vals));

    let charts: Vec<BarChart> = dist
        .iter()
        .enumerate()
        .map(|(i, cat): (usize, &CategoryCount)| {
            let color = colors
                .as_ref()
                .map(|cm| cm.color_for(&cat.value))
                .unwrap_or(Color32::LIGHT_BLUE);
            let bar = Bar::new(i as f64, cat.count as f64).width(0.6).fill(color);
            BarChart::new(vec![bar])
                .name(format!("{} ({}%)", cat.value, cat.pct))
                .color(color)
        })
        .collect();

    Plot::new(format!("chart_{column}"))
        .legend(Legend::default())
        .height(220.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show_x(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Histogram of the derived age column, 20 equal-width bins.
fn age_histogram(ui: &mut Ui, frame: &Frame) {
    let Some(cells) = frame.column(COL_AGE) else {
        return;
    };
    let ages: Vec<f64> = cells.filter_map(CellValue::as_f64).collect();
    if ages.is_empty() {
        return;
    }

    let min = ages.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = ages.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let n_bins = 20usize;
    let width = ((max - min) / n_bins as f64).max(1.0);

    let mut counts = vec![0usize; n_bins];
    for age in &ages {
        let bin = (((age - min) / width) as usize).min(n_bins - 1);
        counts[bin] += 1;
    }

    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .filter(|(_, &c)| c > 0)
        .map(|(i, &c)| {
            Bar::new(min + (i as f64 + 0.5) * width, c as f64)
                .width(width * 0.95)
                .fill(Color32::from_rgb(0x2f, 0x41, 0x56))
        })
        .collect();

    ui.strong("Age distribution");
    Plot::new("age_histogram")
        .height(220.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .x_axis_label("Age")
        .y_axis_label("Employees")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Missing-data tab – missingness report + presence split
// ---------------------------------------------------------------------------

pub fn missing_tab(ui: &mut Ui, state: &mut AppState) {
    let Some(prepared) = &state.prepared else {
        empty_hint(ui);
        return;
    };
    let frame = &prepared.frame;
    let report = missingness(frame);

    if report.is_empty() {
        ui.label("No missing values in this sheet.");
    } else {
        ui.strong("Missing values per column");
        let bars: Vec<BarChart> = report
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let bar = Bar::new(i as f64, m.nulls as f64)
                    .width(0.6)
                    .fill(Color32::from_rgb(0x56, 0x7c, 0x8d));
                BarChart::new(vec![bar]).name(format!("{}: {} ({}%)", m.column, m.nulls, m.pct))
            })
            .collect();

        Plot::new("missingness_chart")
            .legend(Legend::default())
            .height(260.0)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_zoom(false)
            .show_x(false)
            .show(ui, |plot_ui| {
                for chart in bars {
                    plot_ui.bar_chart(chart);
                }
            });
    }

    ui.separator();
    ui.strong("Presence for a single column");

    let columns = frame.columns.clone();
    let current = state.missing_column.clone().unwrap_or_default();
    let mut picked: Option<String> = None;
    egui::ComboBox::from_id_salt("missing_column")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for col in &columns {
                if ui.selectable_label(current == *col, col).clicked() {
                    picked = Some(col.clone());
                }
            }
        });
    if let Some(col) = picked {
        state.missing_column = Some(col);
    }

    let Some(prepared) = &state.prepared else {
        return;
    };
    if let Some(col) = &state.missing_column {
        let split = presence_split(&prepared.frame, col);
        ui.add_space(4.0);
        ui.columns(2, |cols| {
            metric_box(
                &mut cols[0],
                "Present",
                &format!("{} ({}%)", split.present, split.present_pct),
                Color32::from_rgb(0x2f, 0x41, 0x56),
            );
            metric_box(
                &mut cols[1],
                "Missing",
                &format!("{} ({}%)", split.missing, split.missing_pct),
                Color32::from_rgb(0xc8, 0xd9, 0xe6),
            );
        });
    }
}

fn empty_hint(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading("Open a workbook to explore it  (File → Open…)");
    });
}
