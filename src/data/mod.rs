/// Data layer: core types, loading, preparation, and filtering.
///
/// Architecture:
/// ```text
///  .xlsx / .xls / .ods / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Workbook (named sheets)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ prepare   │  normalize → exclusions → derived age → aggregates
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply per-column predicates → filtered indices
///   └──────────┘
/// ```
pub mod filter;
pub mod loader;
pub mod model;
pub mod prepare;
