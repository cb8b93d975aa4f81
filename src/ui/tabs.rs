use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use sales_panda::data::kpi::{KpiSnapshot, Trend};
use sales_panda::data::report::SalesReport;

use crate::color::{ColorMap, ACCENT, ACCENT_DARK};
use crate::state::{AppState, Tab};
use crate::ui::format::{group_thousands, money, signed_percent};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render KPI cards and the active tab.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a sales file to start  (File → Open…)");
        });
        return;
    }

    let currency = state.currency.clone();
    let colors = state.region_colors.clone();
    let mut tab = state.active_tab;

    let Some(report) = state.report() else {
        return;
    };

    ui.heading("Sales Dashboard");
    ui.add_space(8.0);
    kpi_cards(ui, &report.kpi, report.matched_sales, &currency);
    ui.add_space(12.0);

    if report.is_empty() {
        plot::no_data(ui);
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        for t in Tab::ALL {
            ui.selectable_value(&mut tab, t, t.label());
        }
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match tab {
            Tab::Trend => trend_tab(ui, report),
            Tab::Products => products_tab(ui, report, &currency),
            Tab::Regions => regions_tab(ui, report, &colors),
            Tab::Customers => customers_tab(ui, report, &currency),
            Tab::Temporal => temporal_tab(ui, report),
            Tab::Insights => insights_tab(ui, report, &currency),
        });

    state.active_tab = tab;
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

fn kpi_cards(ui: &mut Ui, kpi: &KpiSnapshot, matched: usize, currency: &str) {
    // Growth needs at least two sales to mean anything.
    let growth = (matched > 1).then_some(kpi.growth_pct);

    ui.columns(4, |cols: &mut [Ui]| {
        metric_card(
            &mut cols[0],
            "💰 Total revenue",
            money(currency, kpi.total_revenue),
            growth,
        );
        metric_card(
            &mut cols[1],
            "🧾 Orders",
            group_thousands(kpi.order_count as f64, 0),
            None,
        );
        metric_card(
            &mut cols[2],
            "🎟 Average ticket",
            money(currency, kpi.average_ticket),
            None,
        );
        metric_card(
            &mut cols[3],
            "👥 Unique customers",
            group_thousands(kpi.unique_customers as f64, 0),
            None,
        );
    });
}

fn metric_card(ui: &mut Ui, title: &str, value: String, delta: Option<f64>) {
    ui.group(|ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(title).small().color(Color32::GRAY));
        ui.label(RichText::new(value).size(22.0).strong());
        if let Some(delta) = delta {
            ui.label(RichText::new(signed_percent(delta)).color(delta_color(delta)));
        }
    });
}

fn delta_color(delta: f64) -> Color32 {
    if delta > 0.0 {
        Color32::from_rgb(0x3c, 0xc8, 0x6e)
    } else if delta < 0.0 {
        Color32::from_rgb(0xe8, 0x4a, 0x5f)
    } else {
        Color32::GRAY
    }
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

fn trend_tab(ui: &mut Ui, report: &SalesReport) {
    ui.strong("📈 Monthly revenue");
    plot::monthly_line(ui, &report.monthly_revenue);

    ui.columns(2, |cols: &mut [Ui]| {
        let ui = &mut cols[0];
        ui.strong("📊 Trend analysis");
        ui.label(
            RichText::new(format!("Monthly change: {}", signed_percent(report.kpi.growth_pct)))
                .color(delta_color(report.kpi.growth_pct)),
        );
        let trend = match report.trend {
            Trend::Up => "↗ Up",
            Trend::Down => "↘ Down",
            Trend::Stable => "➡ Stable",
        };
        ui.label(format!("Trend: {trend}"));

        let ui = &mut cols[1];
        ui.strong("🎯 Monthly performance");
        match report.best_month_progress {
            Some(progress) => {
                ui.add(egui::ProgressBar::new((progress / 100.0) as f32).fill(ACCENT));
                ui.label(
                    RichText::new(format!("{progress:.1}% of the best month")).small(),
                );
            }
            None => {
                ui.label(RichText::new("No positive month yet").small());
            }
        }
    });
}

fn products_tab(ui: &mut Ui, report: &SalesReport, currency: &str) {
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("🏆 Top products by revenue");
        plot::ranking_table(
            &mut cols[0],
            "products_by_revenue",
            &report.top_products_by_revenue,
            ACCENT,
            |v| money(currency, v),
        );

        cols[1].strong("📦 Top products by quantity");
        plot::ranking_table(
            &mut cols[1],
            "products_by_quantity",
            &report.top_products_by_quantity,
            ACCENT_DARK,
            |v| group_thousands(v, 0),
        );
    });
}

fn regions_tab(ui: &mut Ui, report: &SalesReport, colors: &ColorMap) {
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("🌎 Revenue by region");
        plot::bar_series(
            &mut cols[0],
            "revenue_by_region",
            &report.revenue_by_region,
            |v| colors.color_for(&v.label),
        );

        cols[1].strong("🥧 Share by region");
        plot::pie(&mut cols[1], &report.revenue_by_region, colors);
    });

    ui.add_space(12.0);
    ui.strong("🧱 Region treemap");
    plot::treemap(ui, &report.revenue_by_region, colors);
}

fn customers_tab(ui: &mut Ui, report: &SalesReport, currency: &str) {
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("🎟 Top customers by average ticket");
        plot::ranking_table(
            &mut cols[0],
            "customers_by_ticket",
            &report.top_customers_by_ticket,
            ACCENT,
            |v| money(currency, v),
        );

        cols[1].strong("🔁 Top customers by frequency");
        plot::ranking_table(
            &mut cols[1],
            "customers_by_frequency",
            &report.top_customers_by_frequency,
            ACCENT_DARK,
            |v| group_thousands(v, 0),
        );
    });
}

fn temporal_tab(ui: &mut Ui, report: &SalesReport) {
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("⏰ Sales by hour of day");
        plot::bar_series(&mut cols[0], "revenue_by_hour", &report.revenue_by_hour, |_| {
            ACCENT
        });

        cols[1].strong("📅 Sales by weekday");
        plot::bar_series(
            &mut cols[1],
            "revenue_by_weekday",
            &report.revenue_by_weekday,
            |_| ACCENT_DARK,
        );
    });
}

fn insights_tab(ui: &mut Ui, report: &SalesReport, currency: &str) {
    let Some(ins) = &report.insights else {
        plot::no_data(ui);
        return;
    };

    ui.columns(3, |cols: &mut [Ui]| {
        metric_card(
            &mut cols[0],
            "📦 Unique products",
            ins.unique_products.to_string(),
            None,
        );
        metric_card(
            &mut cols[1],
            "🏢 Active regions",
            ins.active_regions.to_string(),
            None,
        );
        metric_card(
            &mut cols[2],
            "📅 Period (days)",
            ins.period_days.to_string(),
            None,
        );
    });
    ui.add_space(12.0);

    ui.columns(2, |cols: &mut [Ui]| {
        let ui = &mut cols[0];
        ui.strong("📈 Sales statistics");
        ui.label(format!("Mean sale: {}", money(currency, ins.mean_sale)));
        ui.label(format!("Largest sale: {}", money(currency, ins.max_sale)));
        ui.label(format!("Smallest sale: {}", money(currency, ins.min_sale)));

        let ui = &mut cols[1];
        ui.strong("🎯 Insights");
        ui.label(format!("{:.1} orders per day on average", ins.orders_per_day));
        ui.label(format!(
            "Average ticket: {}",
            money(currency, report.kpi.average_ticket)
        ));
        ui.label(format!("{} unique products sold", ins.unique_products));
    });
}
