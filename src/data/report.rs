use serde::Serialize;

use super::aggregate::{
    monthly_revenue, revenue_by_hour, revenue_by_region, revenue_by_weekday, top_n, Dimension,
    LabeledValue, Metric, MonthlyRevenue,
};
use super::filter::{filter_dataset, FilterSpec};
use super::kpi::{self, best_month_progress, Insights, KpiSnapshot, Trend};
use super::model::SalesDataset;

/// Every dashboard view computed for one filter specification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesReport {
    /// Sales that passed the filter.
    pub matched_sales: usize,
    pub kpi: KpiSnapshot,
    pub trend: Trend,
    pub best_month_progress: Option<f64>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub top_products_by_revenue: Vec<LabeledValue>,
    pub top_products_by_quantity: Vec<LabeledValue>,
    pub revenue_by_region: Vec<LabeledValue>,
    pub top_customers_by_ticket: Vec<LabeledValue>,
    pub top_customers_by_frequency: Vec<LabeledValue>,
    pub revenue_by_hour: Vec<LabeledValue>,
    pub revenue_by_weekday: Vec<LabeledValue>,
    /// `None` when nothing matched the filter.
    pub insights: Option<Insights>,
}

impl SalesReport {
    /// Filter `dataset` with `spec` and compute every view, with rankings
    /// cut to `top_n_cutoff` entries.
    pub fn compute(dataset: &SalesDataset, spec: &FilterSpec, top_n_cutoff: usize) -> Self {
        let view = filter_dataset(dataset, spec);
        let snapshot = kpi::compute(&view);
        let monthly = monthly_revenue(&view);

        SalesReport {
            matched_sales: view.len(),
            kpi: snapshot,
            trend: Trend::from_growth(snapshot.growth_pct),
            best_month_progress: best_month_progress(&monthly),
            monthly_revenue: monthly,
            top_products_by_revenue: top_n(&view, Dimension::Product, Metric::Sum, top_n_cutoff),
            top_products_by_quantity: top_n(&view, Dimension::Product, Metric::Count, top_n_cutoff),
            revenue_by_region: revenue_by_region(&view),
            top_customers_by_ticket: top_n(&view, Dimension::Customer, Metric::Mean, top_n_cutoff),
            top_customers_by_frequency: top_n(
                &view,
                Dimension::Customer,
                Metric::Count,
                top_n_cutoff,
            ),
            revenue_by_hour: revenue_by_hour(&view),
            revenue_by_weekday: revenue_by_weekday(&view),
            insights: kpi::insights(&view, &snapshot),
        }
    }

    /// Whether the filter matched nothing; consumers show a "no data" state.
    pub fn is_empty(&self) -> bool {
        self.matched_sales == 0
    }
}
