/// Render-only layer: panels, charts, and the data table.
/// All aggregation lives in `data`; these modules just draw its output.
pub mod charts;
pub mod panels;
