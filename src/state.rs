use std::collections::BTreeSet;

use chrono::Datelike;

use crate::data::filter::{filtered_indices, FilterState};
use crate::data::model::{CellValue, Workbook};
use crate::data::prepare::{prepare, ExclusionRules, Prepared};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The dashboard tabs, mirroring the analyst workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Charts,
    MissingData,
    DataView,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Charts, Tab::MissingData, Tab::DataView];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Charts => "Charts",
            Tab::MissingData => "Missing data",
            Tab::DataView => "Data view",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded workbook (None until the user opens a file).
    pub workbook: Option<Workbook>,

    /// Name of the currently selected sheet.
    pub selected_sheet: Option<String>,

    /// Exclusion configuration applied on every pipeline run.
    pub rules: ExclusionRules,

    /// Pipeline output for the selected sheet.
    pub prepared: Option<Prepared>,

    /// Per-column filter selections (data-view tab).
    pub filters: FilterState,

    /// Indices of prepared rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Column inspected on the missing-data tab.
    pub missing_column: Option<String>,

    pub active_tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            workbook: None,
            selected_sheet: None,
            rules: ExclusionRules::default(),
            prepared: None,
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            missing_column: None,
            active_tab: Tab::Overview,
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded workbook and prepare its first sheet.
    pub fn set_workbook(&mut self, workbook: Workbook) {
        let first_sheet = workbook.sheets.first().map(|(n, _)| n.clone());
        self.workbook = Some(workbook);
        self.status_message = None;
        self.loading = false;

        match first_sheet {
            Some(name) => self.select_sheet(&name),
            None => {
                self.selected_sheet = None;
                self.prepared = None;
            }
        }
    }

    /// Select a sheet by name and re-run the whole pipeline against it.
    /// Every selection change is a full, independent re-run.
    pub fn select_sheet(&mut self, name: &str) {
        let Some(raw) = self.workbook.as_ref().and_then(|wb| wb.sheet(name)) else {
            return;
        };

        let current_year = chrono::Local::now().year();
        let prepared = prepare(raw, &self.rules, current_year);
        log::info!(
            "Prepared sheet '{name}': {} of {} rows kept",
            prepared.frame.len(),
            raw.len()
        );

        self.filters = FilterState::default();
        self.visible_indices = (0..prepared.frame.len()).collect();
        self.missing_column = prepared.frame.columns.first().cloned();
        self.selected_sheet = Some(name.to_string());
        self.prepared = Some(prepared);
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(p) = &self.prepared {
            self.visible_indices = filtered_indices(&p.frame, &self.filters);
        }
    }

    /// Toggle a single value in a column's multiselect filter.
    pub fn toggle_filter_value(&mut self, column: &str, value: &CellValue) {
        let selected = self.filters.entry(column.to_string()).or_default();
        if selected.contains(value) {
            selected.remove(value);
        } else {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Drop a column's selection entirely (back to "no constraint").
    pub fn clear_filter(&mut self, column: &str) {
        self.filters.insert(column.to_string(), BTreeSet::new());
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Frame;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn workbook() -> Workbook {
        let staff = Frame::new(
            vec!["department".into(), "gender".into()],
            vec![
                vec![s("Finance"), s("Female")],
                vec![s("Municipal Council"), s("Male")],
                vec![s("Health"), s("Male")],
            ],
        );
        let other = Frame::new(vec!["gender".into()], vec![vec![s("Female")]]);
        Workbook {
            sheets: vec![("staff".into(), staff), ("other".into(), other)],
        }
    }

    #[test]
    fn set_workbook_prepares_first_sheet() {
        let mut state = AppState::default();
        state.set_workbook(workbook());
        assert_eq!(state.selected_sheet.as_deref(), Some("staff"));
        // excluded department dropped by the pipeline
        let prepared = state.prepared.as_ref().unwrap();
        assert_eq!(prepared.frame.len(), 2);
        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn sheet_change_resets_filters() {
        let mut state = AppState::default();
        state.set_workbook(workbook());
        state.toggle_filter_value("gender", &s("Female"));
        assert_eq!(state.visible_indices, vec![0]);

        state.select_sheet("other");
        assert!(state.filters.is_empty());
        assert_eq!(state.visible_indices, vec![0]);
        assert_eq!(state.missing_column.as_deref(), Some("gender"));
    }

    #[test]
    fn toggle_and_clear_filter() {
        let mut state = AppState::default();
        state.set_workbook(workbook());
        state.toggle_filter_value("gender", &s("Male"));
        assert_eq!(state.visible_indices, vec![1]);

        state.toggle_filter_value("gender", &s("Male"));
        // empty selection again means no constraint
        assert_eq!(state.visible_indices, vec![0, 1]);

        state.toggle_filter_value("gender", &s("Female"));
        state.clear_filter("gender");
        assert_eq!(state.visible_indices, vec![0, 1]);
    }
}
