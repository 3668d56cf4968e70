use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::export;
use crate::state::{AppState, Facet};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Job Market Filters");
    ui.separator();

    let (max_experience, max_salary) = match &state.dataset {
        Some(ds) => (ds.max_experience, ds.max_salary),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Categorical facets (collapsible checkbox lists) ----
            for facet in Facet::ALL {
                let all_values = state.facet_values(facet);
                let n_selected = state.facet_selection(facet).len();
                let n_total = all_values.len();
                let header_text = format!("{}  ({n_selected}/{n_total})", facet.label());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(facet.label())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.small("No selection = no restriction");
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(facet);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(facet);
                            }
                        });

                        for val in &all_values {
                            let mut checked = state.facet_selection(facet).contains(val);
                            if ui.checkbox(&mut checked, val).changed() {
                                state.toggle_value(facet, val);
                            }
                        }
                    });
            }

            ui.separator();

            // ---- Experience range ----
            ui.strong("Years of Experience");
            let mut range_changed = false;
            range_changed |= ui
                .add(
                    Slider::new(&mut state.experience_range.0, 0.0..=max_experience)
                        .text("min")
                        .fixed_decimals(0),
                )
                .changed();
            range_changed |= ui
                .add(
                    Slider::new(&mut state.experience_range.1, 0.0..=max_experience)
                        .text("max")
                        .fixed_decimals(0),
                )
                .changed();
            if state.experience_range.0 > state.experience_range.1 {
                state.experience_range.1 = state.experience_range.0;
            }

            ui.separator();

            // ---- Salary range ----
            ui.strong("Salary Range");
            range_changed |= ui
                .add(
                    Slider::new(&mut state.salary_range.0, 0.0..=max_salary)
                        .text("from")
                        .fixed_decimals(0),
                )
                .changed();
            range_changed |= ui
                .add(
                    Slider::new(&mut state.salary_range.1, 0.0..=max_salary)
                        .text("to")
                        .fixed_decimals(0),
                )
                .changed();
            if state.salary_range.0 > state.salary_range.1 {
                state.salary_range.1 = state.salary_range.0;
            }

            if range_changed {
                state.refilter();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export filtered CSV…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} postings loaded, {} match the filters",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(err) = &state.load_error {
            ui.label(RichText::new(err).color(Color32::RED));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// CSV export dialog
// ---------------------------------------------------------------------------

/// Ask for a destination and write the filtered table as CSV.
pub fn export_dialog(state: &mut AppState) {
    let Some(ds) = &state.dataset else {
        state.status_message = Some("Nothing to export".to_string());
        return;
    };

    let file = rfd::FileDialog::new()
        .set_title("Export filtered postings")
        .set_file_name(export_file_name(state))
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match export::to_csv_string(ds, &state.visible_indices)
            .and_then(|csv| std::fs::write(&path, csv).map_err(Into::into))
        {
            Ok(()) => {
                log::info!(
                    "exported {} postings to {}",
                    state.visible_indices.len(),
                    path.display()
                );
                state.status_message = None;
            }
            Err(e) => {
                log::error!("CSV export failed: {e:#}");
                state.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }
}

/// `filtered_jobs_<msa>.csv` when a single MSA is selected, a generic
/// name otherwise.
fn export_file_name(state: &AppState) -> String {
    match state.filters.msas.iter().next() {
        Some(msa) if state.filters.msas.len() == 1 => {
            format!("filtered_jobs_{}.csv", msa.replace(' ', "_"))
        }
        _ => "filtered_jobs.csv".to_string(),
    }
}
