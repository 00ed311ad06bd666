use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use super::model::{CellValue, Frame};

// ---------------------------------------------------------------------------
// Well-known column names (exact, after whitespace trim)
// ---------------------------------------------------------------------------

pub const COL_DEPARTMENT: &str = "department";
pub const COL_JOB_TITLE: &str = "job-title";
pub const COL_GENDER: &str = "gender";
pub const COL_RELIGION: &str = "religion";
pub const COL_EDUCATION: &str = "education-level";
pub const COL_NATIONALITY: &str = "nationality";
pub const COL_BIRTHDATE: &str = "birthdate";
pub const COL_AGE: &str = "age";

// ---------------------------------------------------------------------------
// Exclusion rules
// ---------------------------------------------------------------------------

/// Which rows are dropped before anything is shown to the analyst.
/// Deserializable so the defaults can be overridden by a JSON rules file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExclusionRules {
    /// Departments removed entirely (exact match on `department`).
    pub departments: Vec<String>,
    /// `(department, job title)` pairs removed selectively.
    pub department_title_pairs: Vec<(String, String)>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        ExclusionRules {
            departments: vec![
                "Municipal Council".to_string(),
                "Internal Audit".to_string(),
                "External Contractors".to_string(),
            ],
            department_title_pairs: vec![(
                "Municipal Planning".to_string(),
                "Laborer".to_string(),
            )],
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline output
// ---------------------------------------------------------------------------

/// Result of one full preparation pass over a raw sheet.
#[derive(Debug, Clone)]
pub struct Prepared {
    /// Cleaned frame: normalized columns, exclusions applied,
    /// derived `age` column appended when a birthdate column exists.
    pub frame: Frame,
    /// Per-row derived ages, aligned with `frame.rows`.
    /// `None` when the sheet has no birthdate column.
    pub ages: Option<Vec<Option<i64>>>,
    pub summary: SummaryStats,
}

/// Run the full pipeline over one raw sheet.
///
/// Step order is fixed: normalization, exclusion, then age derivation —
/// age must be computed on the already-excluded row set so its coverage
/// matches the row counts shown to the analyst.
pub fn prepare(raw: &Frame, rules: &ExclusionRules, current_year: i32) -> Prepared {
    let frame = normalize_columns(raw);
    let mut frame = apply_exclusions(&frame, rules);

    let ages = derive_ages(&frame, current_year);
    if let Some(ages) = &ages {
        attach_age_column(&mut frame, ages);
    }

    let summary = summary_stats(&frame);
    Prepared { frame, ages, summary }
}

// ---------------------------------------------------------------------------
// Step 1: column normalization
// ---------------------------------------------------------------------------

/// Trim whitespace from every column name and drop columns whose trimmed
/// name duplicates an earlier one (first occurrence wins, silently).
/// Idempotent: normalizing a normalized frame is a no-op.
pub fn normalize_columns(frame: &Frame) -> Frame {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut keep: Vec<usize> = Vec::new();
    let mut columns: Vec<String> = Vec::new();

    for (idx, name) in frame.columns.iter().enumerate() {
        let trimmed = name.trim().to_string();
        if seen.insert(trimmed.clone()) {
            keep.push(idx);
            columns.push(trimmed);
        }
    }

    let rows = frame
        .rows
        .iter()
        .map(|r| keep.iter().map(|&i| r[i].clone()).collect())
        .collect();

    Frame::new(columns, rows)
}

// ---------------------------------------------------------------------------
// Step 2: organizational exclusion
// ---------------------------------------------------------------------------

/// Drop rows per the exclusion rules. A rule whose column(s) are absent
/// from the frame is skipped silently and rows pass through unfiltered.
pub fn apply_exclusions(frame: &Frame, rules: &ExclusionRules) -> Frame {
    let dept_idx = frame.column_index(COL_DEPARTMENT);
    let title_idx = frame.column_index(COL_JOB_TITLE);

    let Some(dept_idx) = dept_idx else {
        return frame.clone();
    };

    let rows = frame
        .rows
        .iter()
        .filter(|row| {
            let dept = match &row[dept_idx] {
                CellValue::String(s) => s.as_str(),
                _ => return true,
            };
            if rules.departments.iter().any(|d| d == dept) {
                return false;
            }
            if let Some(title_idx) = title_idx {
                if let CellValue::String(title) = &row[title_idx] {
                    if rules
                        .department_title_pairs
                        .iter()
                        .any(|(d, t)| d == dept && t == title)
                    {
                        return false;
                    }
                }
            }
            true
        })
        .cloned()
        .collect();

    Frame::new(frame.columns.clone(), rows)
}

// ---------------------------------------------------------------------------
// Step 3: age derivation
// ---------------------------------------------------------------------------

/// Derive `current_year − birth_year` per row from the birthdate column.
/// Returns `None` when the column is absent. A null or unparseable
/// birthdate yields a null age for that row; the row is kept.
pub fn derive_ages(frame: &Frame, current_year: i32) -> Option<Vec<Option<i64>>> {
    let cells = frame.column(COL_BIRTHDATE)?;
    Some(
        cells
            .map(|cell| birth_year(cell).map(|y| i64::from(current_year - y)))
            .collect(),
    )
}

fn birth_year(cell: &CellValue) -> Option<i32> {
    match cell {
        CellValue::Date(d) => Some(d.year()),
        CellValue::String(s) => parse_date(s).map(|d| d.year()),
        _ => None,
    }
}

/// Accept the date spellings seen in real HR exports.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Append the derived ages as an `age` column, unless the sheet already
/// carries one (the source column wins in that case).
fn attach_age_column(frame: &mut Frame, ages: &[Option<i64>]) {
    if frame.column_index(COL_AGE).is_some() {
        return;
    }
    frame.columns.push(COL_AGE.to_string());
    for (row, age) in frame.rows.iter_mut().zip(ages) {
        row.push(match age {
            Some(a) => CellValue::Integer(*a),
            None => CellValue::Null,
        });
    }
}

// ---------------------------------------------------------------------------
// Step 4: summary statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub total: usize,
    /// Rows with no null in any column.
    pub complete: usize,
    /// Rows with at least one null.
    pub incomplete: usize,
    pub complete_pct: f64,
    pub incomplete_pct: f64,
}

pub fn summary_stats(frame: &Frame) -> SummaryStats {
    let total = frame.len();
    let complete = frame
        .rows
        .iter()
        .filter(|r| r.iter().all(|c| !c.is_null()))
        .count();
    let incomplete = total - complete;

    SummaryStats {
        total,
        complete,
        incomplete,
        complete_pct: pct1(complete, total),
        incomplete_pct: pct1(incomplete, total),
    }
}

/// `round(100 * count / total, 1)`, defined as `0.0` for an empty frame.
fn pct1(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (100.0 * count as f64 / total as f64 * 10.0).round() / 10.0
}

/// Same zero-guard, two decimal places (missingness report).
fn pct2(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (100.0 * count as f64 / total as f64 * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Step 5: missingness report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMissing {
    pub column: String,
    pub nulls: usize,
    pub pct: f64,
}

/// Null count and percentage per column, restricted to columns with at
/// least one null, in original column order.
pub fn missingness(frame: &Frame) -> Vec<ColumnMissing> {
    let total = frame.len();
    frame
        .columns
        .iter()
        .enumerate()
        .filter_map(|(idx, col)| {
            let nulls = frame.rows.iter().filter(|r| r[idx].is_null()).count();
            if nulls == 0 {
                return None;
            }
            Some(ColumnMissing {
                column: col.clone(),
                nulls,
                pct: pct2(nulls, total),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Step 6: category distribution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub value: CellValue,
    pub count: usize,
    /// Share of the column's non-null cells, one decimal place.
    pub pct: f64,
}

/// Value counts over one column, descending by count, ties broken by
/// first appearance in the data. Nulls are never a category. An absent
/// column yields an empty distribution.
pub fn category_distribution(
    frame: &Frame,
    column: &str,
    top_n: Option<usize>,
) -> Vec<CategoryCount> {
    let Some(cells) = frame.column(column) else {
        return Vec::new();
    };

    // First-seen order; linear scan keeps ties stable.
    let mut order: Vec<CellValue> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    let mut non_null = 0usize;

    for cell in cells {
        if cell.is_null() {
            continue;
        }
        non_null += 1;
        match order.iter().position(|v| v == cell) {
            Some(i) => counts[i] += 1,
            None => {
                order.push(cell.clone());
                counts.push(1);
            }
        }
    }

    let mut indices: Vec<usize> = (0..order.len()).collect();
    indices.sort_by(|&a, &b| counts[b].cmp(&counts[a]).then(a.cmp(&b)));
    if let Some(n) = top_n {
        indices.truncate(n);
    }

    indices
        .into_iter()
        .map(|i| CategoryCount {
            value: order[i].clone(),
            count: counts[i],
            pct: pct1(counts[i], non_null),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Step 7: presence / absence split
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresenceSplit {
    pub present: usize,
    pub missing: usize,
    pub present_pct: f64,
    pub missing_pct: f64,
}

/// Partition one column's rows into non-null and null, with counts and
/// percentages of the frame total. An absent column reads as all-missing
/// over zero rows, which the zero-guard turns into all-zero output.
pub fn presence_split(frame: &Frame, column: &str) -> PresenceSplit {
    let total = frame.len();
    let missing = match frame.column(column) {
        Some(cells) => cells.filter(|c| c.is_null()).count(),
        None => {
            return PresenceSplit {
                present: 0,
                missing: 0,
                present_pct: 0.0,
                missing_pct: 0.0,
            }
        }
    };
    let present = total - missing;

    PresenceSplit {
        present,
        missing,
        present_pct: pct1(present, total),
        missing_pct: pct1(missing, total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn frame(columns: &[&str], rows: Vec<Vec<CellValue>>) -> Frame {
        Frame::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    #[test]
    fn normalization_trims_and_drops_duplicates() {
        let f = frame(
            &["  department ", "gender", "department"],
            vec![vec![s("Finance"), s("Female"), s("shadow")]],
        );
        let n = normalize_columns(&f);
        assert_eq!(n.columns, vec!["department", "gender"]);
        assert_eq!(n.rows[0], vec![s("Finance"), s("Female")]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let f = frame(
            &[" department", "department ", "gender"],
            vec![vec![s("Finance"), s("dup"), s("Female")]],
        );
        let once = normalize_columns(&f);
        let twice = normalize_columns(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn excluded_departments_never_survive() {
        let rules = ExclusionRules::default();
        let f = frame(
            &["department", "gender"],
            vec![
                vec![s("Municipal Council"), s("Female")],
                vec![s("Internal Audit"), s("Male")],
                vec![s("External Contractors"), CellValue::Null],
                vec![s("Finance"), s("Female")],
            ],
        );
        let out = apply_exclusions(&f, &rules);
        assert_eq!(out.len(), 1);
        assert_eq!(out.rows[0][0], s("Finance"));
    }

    #[test]
    fn department_title_pair_is_selective() {
        let rules = ExclusionRules::default();
        let f = frame(
            &["department", "job-title"],
            vec![
                vec![s("Municipal Planning"), s("Laborer")],
                vec![s("Municipal Planning"), s("Engineer")],
                vec![s("Finance"), s("Laborer")],
            ],
        );
        let out = apply_exclusions(&f, &rules);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn exclusion_skipped_when_department_column_absent() {
        let rules = ExclusionRules::default();
        let f = frame(&["gender"], vec![vec![s("Female")], vec![s("Male")]]);
        let out = apply_exclusions(&f, &rules);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn pair_rule_skipped_without_job_title_column() {
        let rules = ExclusionRules::default();
        let f = frame(&["department"], vec![vec![s("Municipal Planning")]]);
        let out = apply_exclusions(&f, &rules);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn age_from_exact_birth_year() {
        let f = frame(&["birthdate"], vec![vec![s("1995-01-01")]]);
        let ages = derive_ages(&f, 2025).unwrap();
        assert_eq!(ages, vec![Some(30)]);
    }

    #[test]
    fn age_null_for_null_or_garbage_birthdate() {
        let f = frame(
            &["birthdate"],
            vec![
                vec![CellValue::Null],
                vec![s("not a date")],
                vec![s("12/06/1990")],
            ],
        );
        let ages = derive_ages(&f, 2025).unwrap();
        assert_eq!(ages, vec![None, None, Some(35)]);
    }

    #[test]
    fn ages_absent_without_birthdate_column() {
        let f = frame(&["gender"], vec![vec![s("Female")]]);
        assert!(derive_ages(&f, 2025).is_none());
    }

    #[test]
    fn summary_counts_are_consistent() {
        let f = frame(
            &["a", "b"],
            vec![
                vec![s("x"), s("y")],
                vec![s("x"), CellValue::Null],
                vec![CellValue::Null, CellValue::Null],
            ],
        );
        let sum = summary_stats(&f);
        assert_eq!(sum.total, 3);
        assert_eq!(sum.complete + sum.incomplete, sum.total);
        assert_eq!(sum.complete_pct, 33.3);
        assert_eq!(sum.incomplete_pct, 66.7);
    }

    #[test]
    fn empty_frame_yields_zero_percentages() {
        let f = frame(&["a"], vec![]);
        let sum = summary_stats(&f);
        assert_eq!(sum.total, 0);
        assert_eq!(sum.complete_pct, 0.0);
        assert_eq!(sum.incomplete_pct, 0.0);

        let split = presence_split(&f, "a");
        assert_eq!(split.present_pct, 0.0);
        assert_eq!(split.missing_pct, 0.0);
    }

    #[test]
    fn missingness_skips_fully_populated_columns() {
        let f = frame(
            &["a", "b"],
            vec![
                vec![s("x"), CellValue::Null],
                vec![s("y"), s("z")],
            ],
        );
        let report = missingness(&f);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].column, "b");
        assert_eq!(report[0].nulls, 1);
        assert_eq!(report[0].pct, 50.0);
        assert!(report.iter().all(|m| m.nulls > 0));
    }

    #[test]
    fn distribution_orders_by_count_then_first_seen() {
        let f = frame(
            &["gender"],
            vec![
                vec![s("Male")],
                vec![s("Female")],
                vec![s("Female")],
                vec![s("Other")],
                vec![CellValue::Null],
            ],
        );
        let dist = category_distribution(&f, "gender", None);
        let values: Vec<&CellValue> = dist.iter().map(|c| &c.value).collect();
        assert_eq!(values, vec![&s("Female"), &s("Male"), &s("Other")]);
        // counts sum to total minus the column's nulls
        let total: usize = dist.iter().map(|c| c.count).sum();
        assert_eq!(total, 4);
        assert_eq!(dist[0].pct, 50.0);
    }

    #[test]
    fn distribution_top_n_and_absent_column() {
        let f = frame(
            &["department"],
            vec![
                vec![s("A")],
                vec![s("A")],
                vec![s("B")],
                vec![s("C")],
            ],
        );
        let top = category_distribution(&f, "department", Some(2));
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].value, s("A"));

        assert!(category_distribution(&f, "nope", None).is_empty());
    }

    #[test]
    fn presence_split_counts_and_percentages() {
        let f = frame(
            &["religion"],
            vec![vec![s("x")], vec![CellValue::Null], vec![s("y")], vec![s("z")]],
        );
        let split = presence_split(&f, "religion");
        assert_eq!(split.present, 3);
        assert_eq!(split.missing, 1);
        assert_eq!(split.present_pct, 75.0);
        assert_eq!(split.missing_pct, 25.0);
    }

    // 10-row sheet: 2 rows in excluded departments, 1 municipal laborer,
    // 1 null birthdate among the 7 survivors.
    #[test]
    fn end_to_end_scenario() {
        let rules = ExclusionRules::default();
        let mut rows = vec![
            vec![s("Female"), s("Municipal Council"), s("1990-05-01"), s("Clerk")],
            vec![s("Male"), s("Internal Audit"), s("1985-02-11"), s("Auditor")],
            vec![s("Male"), s("Municipal Planning"), s("1980-07-20"), s("Laborer")],
            vec![s("Female"), s("Finance"), CellValue::Null, s("Analyst")],
        ];
        for i in 0..6 {
            rows.push(vec![
                s(if i % 2 == 0 { "Male" } else { "Female" }),
                s("Finance"),
                s("1992-03-15"),
                s("Analyst"),
            ]);
        }
        let f = frame(&["gender", " department", "birthdate", "job-title"], rows);
        assert_eq!(f.len(), 10);

        let prepared = prepare(&f, &rules, 2025);
        assert_eq!(prepared.frame.len(), 7);
        assert_eq!(prepared.summary.total, 7);

        let report = missingness(&prepared.frame);
        let bd = report.iter().find(|m| m.column == "birthdate").unwrap();
        assert_eq!(bd.nulls, 1);
        assert_eq!(bd.pct, 14.29);

        let ages = prepared.ages.unwrap();
        assert_eq!(ages.iter().filter(|a| a.is_some()).count(), 6);
        assert!(prepared.frame.column_index(COL_AGE).is_some());
    }

    #[test]
    fn prepare_leaves_input_untouched() {
        let rules = ExclusionRules::default();
        let f = frame(
            &["department", "birthdate"],
            vec![vec![s("Municipal Council"), s("1990-01-01")]],
        );
        let before = f.clone();
        let _ = prepare(&f, &rules, 2025);
        assert_eq!(f, before);
    }

    #[test]
    fn existing_age_column_is_not_overwritten() {
        let rules = ExclusionRules::default();
        let f = frame(
            &["birthdate", "age"],
            vec![vec![s("1990-01-01"), CellValue::Integer(99)]],
        );
        let prepared = prepare(&f, &rules, 2025);
        assert_eq!(prepared.frame.columns, vec!["birthdate", "age"]);
        assert_eq!(prepared.frame.rows[0][1], CellValue::Integer(99));
        // derived ages are still reported alongside
        assert_eq!(prepared.ages, Some(vec![Some(35)]));
    }

    #[test]
    fn rules_deserialize_from_json() {
        let json = r#"{
            "departments": ["Archive"],
            "department_title_pairs": [["Archive", "Clerk"]]
        }"#;
        let rules: ExclusionRules = serde_json::from_str(json).unwrap();
        assert_eq!(rules.departments, vec!["Archive"]);
        assert_eq!(rules.department_title_pairs.len(), 1);
    }
}
