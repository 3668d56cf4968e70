use std::f64::consts::TAU;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::ColorMap;
use crate::data::aggregate::{EducationShare, HistogramBin, TreemapBranch};
use crate::state::AppState;

const ACCENT: Color32 = Color32::from_rgb(66, 133, 190);

// ---------------------------------------------------------------------------
// Central panel – all charts for the current filter state
// ---------------------------------------------------------------------------

/// Render every summary chart in a scrollable central panel.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    if let Some(err) = &state.load_error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(format!("Failed to load dataset: {err}"));
        });
        return;
    }
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No dataset loaded.");
        });
        return;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Job Market Insights");
            if state.visible_indices.is_empty() {
                ui.label("No postings match the current filters.");
            }
            ui.add_space(8.0);

            let s = &state.summaries;
            ranked_bar_chart(ui, "industries", "Top Industries (NAICS2)", &s.top_industries);
            ranked_bar_chart(
                ui,
                "occupations",
                "Top Occupations (SOC5)",
                &s.top_occupations,
            );
            salary_histogram(ui, &s.salary_histogram);
            ranked_bar_chart(ui, "skills", "Top Specialized Skills", &s.top_skills);
            ranked_bar_chart(
                ui,
                "certifications",
                "Top Certifications",
                &s.top_certifications,
            );
            ranked_bar_chart(ui, "companies", "Top Hiring Companies", &s.top_companies);
            education_pie(ui, &s.education);
            treemap(
                ui,
                "Specialized Skills by Industry (NAICS2)",
                &s.skills_by_industry,
            );
            treemap(
                ui,
                "Certifications by Industry (NAICS2)",
                &s.certifications_by_industry,
            );
        });
}

// ---------------------------------------------------------------------------
// Horizontal top-N bar chart
// ---------------------------------------------------------------------------

fn ranked_bar_chart(ui: &mut Ui, id: &str, title: &str, entries: &[(String, u64)]) {
    ui.strong(title);
    if entries.is_empty() {
        ui.label("No data for the current filters.");
        ui.add_space(12.0);
        return;
    }

    // Largest count at the top: bar 0 sits at the highest y position.
    let n = entries.len();
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            Bar::new((n - 1 - i) as f64, *count as f64)
                .name(label)
                .width(0.6)
                .fill(ACCENT)
        })
        .collect();

    let labels: Vec<String> = entries.iter().rev().map(|(l, _)| l.clone()).collect();
    let chart = BarChart::new(bars).horizontal();

    Plot::new(format!("bar_{id}"))
        .height((n as f32) * 26.0 + 40.0)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_grid(false)
        .y_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
    ui.add_space(12.0);
}

// ---------------------------------------------------------------------------
// Salary histogram
// ---------------------------------------------------------------------------

fn salary_histogram(ui: &mut Ui, bins: &[HistogramBin]) {
    ui.strong("Salary Distribution");
    if bins.is_empty() {
        ui.label("No data for the current filters.");
        ui.add_space(12.0);
        return;
    }

    let bars: Vec<Bar> = bins
        .iter()
        .map(|bin| {
            Bar::new((bin.lo + bin.hi) / 2.0, bin.count as f64)
                .name(format!("{:.0}–{:.0}", bin.lo, bin.hi))
                .width((bin.hi - bin.lo) * 0.95)
                .fill(ACCENT)
        })
        .collect();

    Plot::new("salary_histogram")
        .height(220.0)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(|mark, _range| format!("{}k", (mark.value / 1000.0).round()))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
    ui.add_space(12.0);
}

// ---------------------------------------------------------------------------
// Education pie chart
// ---------------------------------------------------------------------------

fn education_pie(ui: &mut Ui, shares: &[EducationShare]) {
    ui.strong("Minimum Education Required");
    if shares.is_empty() {
        ui.label("No data for the current filters.");
        ui.add_space(12.0);
        return;
    }

    let labels: Vec<String> = shares.iter().map(|s| s.level.to_string()).collect();
    let colors = ColorMap::new(labels.clone());

    ui.horizontal(|ui: &mut Ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(200.0, 200.0), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = rect.height() / 2.0 - 6.0;

        // Wedges as triangle fans so large shares stay well-formed.
        let mut angle = -TAU / 4.0;
        for (share, label) in shares.iter().zip(&labels) {
            let sweep = share.fraction * TAU;
            let color = colors.color_for(label);
            let steps = ((sweep / 0.05).ceil() as usize).max(1);
            for step in 0..steps {
                let a0 = angle + sweep * step as f64 / steps as f64;
                let a1 = angle + sweep * (step + 1) as f64 / steps as f64;
                painter.add(Shape::convex_polygon(
                    vec![center, arc_point(center, radius, a0), arc_point(center, radius, a1)],
                    color,
                    Stroke::NONE,
                ));
            }
            angle += sweep;
        }

        // Legend
        ui.vertical(|ui: &mut Ui| {
            for (share, label) in shares.iter().zip(&labels) {
                ui.horizontal(|ui: &mut Ui| {
                    let (swatch, _) =
                        ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
                    ui.painter_at(swatch).rect_filled(swatch, 2.0, colors.color_for(label));
                    ui.label(format!(
                        "{label} — {} ({:.1}%)",
                        share.count,
                        share.fraction * 100.0
                    ));
                });
            }
        });
    });
    ui.add_space(12.0);
}

fn arc_point(center: Pos2, radius: f32, angle: f64) -> Pos2 {
    Pos2 {
        x: center.x + radius * angle.cos() as f32,
        y: center.y + radius * angle.sin() as f32,
    }
}

// ---------------------------------------------------------------------------
// Industry → tag treemap (slice-and-dice layout)
// ---------------------------------------------------------------------------

fn treemap(ui: &mut Ui, title: &str, branches: &[TreemapBranch]) {
    ui.strong(title);
    let grand_total: u64 = branches.iter().map(|b| b.total).sum();
    if grand_total == 0 {
        ui.label("No data for the current filters.");
        ui.add_space(12.0);
        return;
    }

    let colors = ColorMap::new(branches.iter().map(|b| b.industry.clone()));
    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 280.0), Sense::hover());
    let painter = ui.painter_at(rect);

    let header_h = 18.0;
    let mut x = rect.left();
    for branch in branches {
        let w = rect.width() * branch.total as f32 / grand_total as f32;
        let base = colors.color_for(&branch.industry);

        // Industry header strip
        let header = Rect::from_min_size(Pos2::new(x, rect.top()), egui::vec2(w, header_h));
        painter.rect_filled(header, 0.0, base);
        if w > 50.0 {
            painter.text(
                header.left_center() + egui::vec2(3.0, 0.0),
                Align2::LEFT_CENTER,
                &branch.industry,
                FontId::proportional(11.0),
                Color32::WHITE,
            );
        }

        // Leaf tiles stacked below the header
        let body_top = rect.top() + header_h;
        let body_h = rect.height() - header_h;
        let mut y = body_top;
        for (i, (tag, count)) in branch.leaves.iter().enumerate() {
            let h = body_h * *count as f32 / branch.total as f32;
            let tile = Rect::from_min_size(Pos2::new(x, y), egui::vec2(w, h));
            painter.rect_filled(tile, 0.0, shade(base, 0.15 + 0.1 * (i % 4) as f32));
            painter.rect_stroke(
                tile,
                0.0,
                Stroke::new(1.0, Color32::from_gray(30)),
                egui::StrokeKind::Inside,
            );
            if h > 15.0 && w > 70.0 {
                painter.text(
                    tile.left_top() + egui::vec2(3.0, 2.0),
                    Align2::LEFT_TOP,
                    format!("{tag} ({count})"),
                    FontId::proportional(10.0),
                    Color32::WHITE,
                );
            }
            y += h;
        }
        x += w;
    }
    ui.add_space(12.0);
}

/// Mix a colour toward white by `t`.
fn shade(base: Color32, t: f32) -> Color32 {
    let mix = |c: u8| (c as f32 + (255.0 - c as f32) * t) as u8;
    Color32::from_rgb(mix(base.r()), mix(base.g()), mix(base.b()))
}
