/// UI layer: filter widgets and chart bindings.
///
/// Everything here renders from [`crate::state::AppState`]; the data
/// layer never touches egui.

pub mod charts;
pub mod panels;
