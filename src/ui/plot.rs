use std::f32::consts::TAU;

use eframe::egui::{
    self, pos2, Align2, Color32, FontId, Rect, RichText, Sense, Shape, Stroke, Ui, Vec2,
};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};
use sales_panda::data::aggregate::{LabeledValue, MonthlyRevenue};
use sales_panda::data::model::MonthBucket;

use crate::color::{ColorMap, ACCENT, ACCENT_DARK};

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

/// Placeholder shown instead of a chart when a view has nothing to draw.
pub fn no_data(ui: &mut Ui) {
    ui.add_space(24.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new("No data found for the selected filters.")
                .italics()
                .color(Color32::GRAY),
        );
    });
    ui.add_space(24.0);
}

/// Months are placed at fractional years so the x axis reads as a timeline.
fn month_x(month: &MonthBucket) -> f64 {
    month.year as f64 + (month.month - 1) as f64 / 12.0
}

// ---------------------------------------------------------------------------
// Monthly revenue (line)
// ---------------------------------------------------------------------------

pub fn monthly_line(ui: &mut Ui, monthly: &[MonthlyRevenue]) {
    if monthly.is_empty() {
        no_data(ui);
        return;
    }

    let points: Vec<[f64; 2]> = monthly
        .iter()
        .map(|m| [month_x(&m.month), m.revenue])
        .collect();

    Plot::new("monthly_revenue")
        .height(320.0)
        .x_axis_label("Month")
        .y_axis_label("Revenue")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name("Revenue")
                    .color(ACCENT)
                    .width(4.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .radius(4.0)
                    .color(ACCENT_DARK),
            );
        });
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// Vertical bars, one per entry, in the given order. Hovering a bar shows
/// its label.
pub fn bar_series(
    ui: &mut Ui,
    id: &str,
    values: &[LabeledValue],
    color: impl Fn(&LabeledValue) -> Color32,
) {
    if values.is_empty() {
        no_data(ui);
        return;
    }

    let bars: Vec<Bar> = values
        .iter()
        .enumerate()
        .map(|(i, v)| Bar::new(i as f64, v.value).name(&v.label).fill(color(v)))
        .collect();

    Plot::new(id)
        .height(280.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).width(0.7));
        });
}

// ---------------------------------------------------------------------------
// Proportions (pie)
// ---------------------------------------------------------------------------

/// Pie of each entry's share of the positive total, with a legend below.
/// Entries with zero or negative value get no slice.
pub fn pie(ui: &mut Ui, values: &[LabeledValue], colors: &ColorMap) {
    let total: f64 = values.iter().map(|v| v.value.max(0.0)).sum();
    if total <= 0.0 {
        no_data(ui);
        return;
    }

    let size = ui.available_width().min(260.0);
    let (rect, _) = ui.allocate_exact_size(Vec2::splat(size), Sense::hover());
    let painter = ui.painter_at(rect);
    let center = rect.center();
    let radius = size * 0.45;

    // Start at twelve o'clock.
    let mut start = -TAU / 4.0;
    for v in values {
        let share = (v.value.max(0.0) / total) as f32;
        if share <= 0.0 {
            continue;
        }
        let sweep = share * TAU;
        let color = colors.color_for(&v.label);
        // Triangle fan: every piece is convex even when the slice is not.
        let steps = (share * 96.0).ceil().max(1.0) as usize;
        for s in 0..steps {
            let a0 = start + sweep * s as f32 / steps as f32;
            let a1 = start + sweep * (s + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![
                    center,
                    center + radius * Vec2::angled(a0),
                    center + radius * Vec2::angled(a1),
                ],
                color,
                Stroke::NONE,
            ));
        }
        start += sweep;
    }

    for v in values {
        let pct = v.value.max(0.0) / total * 100.0;
        ui.label(
            RichText::new(format!("■ {}  {pct:.1}%", v.label)).color(colors.color_for(&v.label)),
        );
    }
}

/// Treemap of the positive entries, each tile's area proportional to its
/// value. Tiles keep the input order.
pub fn treemap(ui: &mut Ui, values: &[LabeledValue], colors: &ColorMap) {
    let tiles: Vec<&LabeledValue> = values.iter().filter(|v| v.value > 0.0).collect();
    if tiles.is_empty() {
        no_data(ui);
        return;
    }

    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(Vec2::new(width, 220.0), Sense::hover());
    let painter = ui.painter_at(rect);
    let weights: Vec<f64> = tiles.iter().map(|v| v.value).collect();

    for (v, tile) in tiles.iter().zip(treemap_layout(&weights, rect)) {
        let tile = tile.shrink(1.0);
        painter.rect_filled(tile, 3.0, colors.color_for(&v.label));
        if tile.width() > 48.0 && tile.height() > 18.0 {
            painter.text(
                tile.center(),
                Align2::CENTER_CENTER,
                &v.label,
                FontId::proportional(13.0),
                Color32::BLACK,
            );
        }
    }
}

/// Split `rect` into one tile per weight. The weights are halved by running
/// total and each half takes its share of the longer side, recursively.
fn treemap_layout(weights: &[f64], rect: Rect) -> Vec<Rect> {
    let mut tiles = Vec::with_capacity(weights.len());
    split_tiles(weights, rect, &mut tiles);
    tiles
}

fn split_tiles(weights: &[f64], rect: Rect, tiles: &mut Vec<Rect>) {
    match weights {
        [] => {}
        [_] => tiles.push(rect),
        _ => {
            let total: f64 = weights.iter().sum();
            let last = weights.len() - 1;
            let mut running = 0.0;
            let cut = weights[..last]
                .iter()
                .position(|w| {
                    running += w;
                    running >= total / 2.0
                })
                .map_or(last, |i| i + 1);

            let head: f64 = weights[..cut].iter().sum();
            let share = if total > 0.0 { (head / total) as f32 } else { 0.5 };
            let (a, b) = if rect.width() >= rect.height() {
                let x = rect.left() + rect.width() * share;
                (
                    Rect::from_min_max(rect.min, pos2(x, rect.max.y)),
                    Rect::from_min_max(pos2(x, rect.min.y), rect.max),
                )
            } else {
                let y = rect.top() + rect.height() * share;
                (
                    Rect::from_min_max(rect.min, pos2(rect.max.x, y)),
                    Rect::from_min_max(pos2(rect.min.x, y), rect.max),
                )
            };
            split_tiles(&weights[..cut], a, tiles);
            split_tiles(&weights[cut..], b, tiles);
        }
    }
}

// ---------------------------------------------------------------------------
// Rankings (table with inline bars)
// ---------------------------------------------------------------------------

/// Ranked table: position, label and a bar scaled to the first entry.
pub fn ranking_table(
    ui: &mut Ui,
    id: &str,
    values: &[LabeledValue],
    color: Color32,
    format_value: impl Fn(f64) -> String,
) {
    if values.is_empty() {
        no_data(ui);
        return;
    }

    let max = values.iter().map(|v| v.value).fold(0.0, f64::max);

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::exact(28.0))
            .column(Column::initial(180.0).at_least(80.0).clip(true))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                header.col(|ui| {
                    ui.strong("Name");
                });
                header.col(|ui| {
                    ui.strong("Value");
                });
            })
            .body(|mut body| {
                for (i, v) in values.iter().enumerate() {
                    body.row(22.0, |mut row| {
                        row.col(|ui| {
                            ui.label((i + 1).to_string());
                        });
                        row.col(|ui| {
                            ui.label(&v.label);
                        });
                        row.col(|ui| {
                            let fraction = if max > 0.0 {
                                (v.value / max).clamp(0.0, 1.0) as f32
                            } else {
                                0.0
                            };
                            ui.add(
                                egui::ProgressBar::new(fraction)
                                    .fill(color)
                                    .text(format_value(v.value)),
                            );
                        });
                    });
                }
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn treemap_areas_follow_weights() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), Vec2::new(100.0, 50.0));
        let weights = [50.0, 30.0, 20.0];
        let tiles = treemap_layout(&weights, rect);

        assert_eq!(tiles.len(), 3);
        for (tile, w) in tiles.iter().zip(weights) {
            let share = tile.area() / rect.area();
            assert!((share as f64 - w / 100.0).abs() < 1e-4, "{tile:?}");
        }
        assert_eq!(tiles[0], Rect::from_min_max(pos2(0.0, 0.0), pos2(50.0, 50.0)));
        assert_eq!(tiles[2].max, rect.max);
    }

    #[test]
    fn treemap_edge_cases() {
        let rect = Rect::from_min_size(pos2(10.0, 10.0), Vec2::new(40.0, 80.0));
        assert!(treemap_layout(&[], rect).is_empty());
        assert_eq!(treemap_layout(&[7.0], rect), vec![rect]);

        // Taller than wide: the first cut is horizontal.
        let tiles = treemap_layout(&[1.0, 1.0], rect);
        assert_eq!(tiles[0].max, pos2(50.0, 50.0));
        assert_eq!(tiles[1].min, pos2(10.0, 50.0));
    }
}
