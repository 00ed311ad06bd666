use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common spreadsheet dtypes.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Whether the cell holds no value.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Try to interpret the value as an `f64` for histogram binning.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Frame – one rectangular sheet of the workbook
// ---------------------------------------------------------------------------

/// A rectangular table: named columns, rows of cells.
/// Invariant: every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Frame {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Frame { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate the cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &CellValue>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[idx]))
    }

    /// For each column the sorted set of unique non-null values.
    /// Feeds the filter widgets and chart colour maps.
    pub fn unique_values(&self) -> BTreeMap<String, BTreeSet<CellValue>> {
        let mut unique: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();
        for (idx, col) in self.columns.iter().enumerate() {
            let vals: BTreeSet<CellValue> = self
                .rows
                .iter()
                .map(|r| r[idx].clone())
                .filter(|v| !v.is_null())
                .collect();
            unique.insert(col.clone(), vals);
        }
        unique
    }
}

// ---------------------------------------------------------------------------
// Workbook – the complete loaded file
// ---------------------------------------------------------------------------

/// All sheets of an uploaded workbook, in file order.
#[derive(Debug, Clone)]
pub struct Workbook {
    pub sheets: Vec<(String, Frame)>,
}

impl Workbook {
    /// Sheet names in file order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Look up a sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&Frame> {
        self.sheets.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> Frame {
        Frame::new(
            vec!["department".into(), "gender".into()],
            vec![
                vec![
                    CellValue::String("Finance".into()),
                    CellValue::String("Female".into()),
                ],
                vec![CellValue::String("Finance".into()), CellValue::Null],
            ],
        )
    }

    #[test]
    fn column_lookup() {
        let f = sample_frame();
        assert_eq!(f.column_index("gender"), Some(1));
        assert_eq!(f.column_index("missing"), None);
        let genders: Vec<&CellValue> = f.column("gender").unwrap().collect();
        assert_eq!(genders.len(), 2);
    }

    #[test]
    fn unique_values_skip_nulls() {
        let f = sample_frame();
        let unique = f.unique_values();
        assert_eq!(unique["gender"].len(), 1);
        assert_eq!(unique["department"].len(), 1);
    }

    #[test]
    fn cell_ordering_is_total() {
        let mut vals = vec![
            CellValue::String("b".into()),
            CellValue::Null,
            CellValue::Integer(3),
            CellValue::Float(1.5),
        ];
        vals.sort();
        assert_eq!(vals[0], CellValue::Null);
        assert_eq!(vals[3], CellValue::String("b".into()));
    }
}
