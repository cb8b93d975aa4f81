use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use sales_panda::data::filter::AmountRange;
use sales_panda::data::model::{weekday_name, WEEKDAYS};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🚀 Filters");
    ui.separator();

    // Copy the option lists out so the widgets below can mutate `state`.
    let (years, quarters, regions, bounds) = match &state.dataset {
        Some(ds) => (ds.years(), ds.quarters(), ds.regions(), ds.amount_bounds()),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year / quarter ----
            ui.strong("📅 Year");
            let year_text = state
                .filters
                .year
                .map_or_else(|| "All".to_string(), |y| y.to_string());
            egui::ComboBox::from_id_salt("year")
                .selected_text(year_text)
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut state.filters.year, None, "All");
                    for y in &years {
                        ui.selectable_value(&mut state.filters.year, Some(*y), y.to_string());
                    }
                });

            ui.strong("📊 Quarter");
            let quarter_text = state
                .filters
                .quarter
                .map_or_else(|| "All".to_string(), |q| format!("Q{q}"));
            egui::ComboBox::from_id_salt("quarter")
                .selected_text(quarter_text)
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut state.filters.quarter, None, "All");
                    for q in &quarters {
                        ui.selectable_value(&mut state.filters.quarter, Some(*q), format!("Q{q}"));
                    }
                });
            ui.separator();

            // ---- Regions ----
            let n_selected = regions
                .iter()
                .filter(|r| state.is_region_selected(r))
                .count();
            egui::CollapsingHeader::new(
                RichText::new(format!("🌎 Regions  ({n_selected}/{})", regions.len())).strong(),
            )
            .id_salt("regions")
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("All").clicked() {
                        state.select_all_regions();
                    }
                    if ui.small_button("None").clicked() {
                        state.select_no_regions();
                    }
                });
                for region in &regions {
                    let mut checked = state.is_region_selected(region);
                    if ui.checkbox(&mut checked, region.as_str()).changed() {
                        state.toggle_region(region);
                    }
                }
            });

            // ---- Weekdays ----
            let n_days = WEEKDAYS
                .iter()
                .filter(|d| state.is_weekday_selected(**d))
                .count();
            egui::CollapsingHeader::new(
                RichText::new(format!("📅 Weekdays  ({n_days}/7)")).strong(),
            )
            .id_salt("weekdays")
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("All").clicked() {
                        state.select_all_weekdays();
                    }
                    if ui.small_button("None").clicked() {
                        state.select_no_weekdays();
                    }
                });
                for day in WEEKDAYS {
                    let mut checked = state.is_weekday_selected(day);
                    if ui.checkbox(&mut checked, weekday_name(day)).changed() {
                        state.toggle_weekday(day);
                    }
                }
            });
            ui.separator();

            // ---- Value range ----
            if let Some((lo, hi)) = bounds {
                ui.strong(format!("💰 Value range ({})", state.currency));
                let range = state
                    .filters
                    .amount
                    .get_or_insert(AmountRange { min: lo, max: hi });
                ui.add(egui::Slider::new(&mut range.min, lo..=hi).text("min"));
                ui.add(egui::Slider::new(&mut range.max, lo..=hi).text("max"));
                if range.min > range.max {
                    range.max = range.min;
                }
                ui.separator();
            }

            if ui.button("Reset filters").clicked() {
                state.reset_filters();
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
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let has_data = state.dataset.is_some();
            if ui.add_enabled(has_data, egui::Button::new("Reload")).clicked() {
                state.reload();
                ui.close_menu();
            }
            if ui
                .add_enabled(has_data, egui::Button::new("Export normalized CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let loaded = state.dataset.as_ref().map(|ds| ds.len());
        if let Some(total) = loaded {
            let visible = state.report().map_or(0, |r| r.matched_sales);
            ui.label(format!("{total} sales loaded, {visible} visible"));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export normalized sales")
        .set_file_name("vendas_tratadas.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
