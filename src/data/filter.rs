use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, Frame};

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of selected values.
/// An absent column or an empty set means "no filter" (show all rows),
/// matching the data-view tab's multiselect behaviour.
pub type FilterState = BTreeMap<String, BTreeSet<CellValue>>;

/// Return indices of rows that pass all active filters.
///
/// A row passes a column filter when:
/// * The column has no selection (absent or empty set) → passes
/// * The column does not exist in the frame → passes (stale filter entry)
/// * The row's value for that column is in the selected set → passes
pub fn filtered_indices(frame: &Frame, filters: &FilterState) -> Vec<usize> {
    let active: Vec<(usize, &BTreeSet<CellValue>)> = filters
        .iter()
        .filter(|(_, selected)| !selected.is_empty())
        .filter_map(|(col, selected)| frame.column_index(col).map(|i| (i, selected)))
        .collect();

    frame
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| active.iter().all(|(idx, selected)| selected.contains(&row[*idx])))
        .map(|(i, _)| i)
        .collect()
}
