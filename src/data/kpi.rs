use std::collections::HashSet;

use serde::Serialize;

use super::aggregate::{mean, monthly_revenue, MonthlyRevenue};
use super::model::Sale;

// ---------------------------------------------------------------------------
// KPI snapshot
// ---------------------------------------------------------------------------

/// Headline figures for a filtered view. All zero for an empty view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub total_revenue: f64,
    /// Distinct order identifiers.
    pub order_count: usize,
    /// Distinct customer names.
    pub unique_customers: usize,
    /// Total revenue per unique customer, 0 without customers.
    pub average_ticket: f64,
    /// Month-over-month growth of the last month, in percent.
    pub growth_pct: f64,
}

/// Growth of the last month over the one before it, in percent.
///
/// Defined as 0 with fewer than two months, and also 0 when the previous
/// month's revenue is exactly zero.
pub fn growth_pct(monthly: &[MonthlyRevenue]) -> f64 {
    let [.., previous, last] = monthly else {
        return 0.0;
    };
    if previous.revenue == 0.0 {
        return 0.0;
    }
    (last.revenue - previous.revenue) / previous.revenue * 100.0
}

/// Compute the KPI snapshot of a filtered view.
pub fn compute(sales: &[&Sale]) -> KpiSnapshot {
    let total_revenue: f64 = sales.iter().map(|s| s.amount).sum();
    let order_count = sales
        .iter()
        .map(|s| s.order_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let unique_customers = sales
        .iter()
        .map(|s| s.customer.as_str())
        .collect::<HashSet<_>>()
        .len();
    let average_ticket = if unique_customers > 0 {
        total_revenue / unique_customers as f64
    } else {
        0.0
    };

    KpiSnapshot {
        total_revenue,
        order_count,
        unique_customers,
        average_ticket,
        growth_pct: growth_pct(&monthly_revenue(sales)),
    }
}

// ---------------------------------------------------------------------------
// Trend helpers
// ---------------------------------------------------------------------------

/// Direction of the month-over-month change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn from_growth(growth_pct: f64) -> Self {
        if growth_pct > 0.0 {
            Trend::Up
        } else if growth_pct < 0.0 {
            Trend::Down
        } else {
            Trend::Stable
        }
    }
}

/// Last month's revenue as a percentage of the best month, capped at 100.
///
/// `None` when there are no months or no month has positive revenue.
pub fn best_month_progress(monthly: &[MonthlyRevenue]) -> Option<f64> {
    let last = monthly.last()?;
    let best = monthly
        .iter()
        .map(|m| m.revenue)
        .fold(f64::NEG_INFINITY, f64::max);
    if best <= 0.0 {
        return None;
    }
    Some((last.revenue / best * 100.0).min(100.0))
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

/// Descriptive statistics shown next to the KPIs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Insights {
    pub unique_products: usize,
    pub active_regions: usize,
    /// Whole days between the first and the last sale.
    pub period_days: i64,
    pub mean_sale: f64,
    pub max_sale: f64,
    pub min_sale: f64,
    /// Orders per day over the period, rounded to one decimal with ties to
    /// even (0.25 → 0.2).
    pub orders_per_day: f64,
}

/// Insights of a filtered view, `None` when the view is empty.
pub fn insights(sales: &[&Sale], kpi: &KpiSnapshot) -> Option<Insights> {
    let first = sales.iter().map(|s| s.order_date).min()?;
    let last = sales.iter().map(|s| s.order_date).max()?;
    let period_days = (last - first).num_days();

    let unique_products = sales
        .iter()
        .map(|s| s.product.as_str())
        .collect::<HashSet<_>>()
        .len();
    let active_regions = sales
        .iter()
        .map(|s| s.region.as_str())
        .collect::<HashSet<_>>()
        .len();

    let amounts = || sales.iter().map(|s| s.amount);
    let orders_per_day = kpi.order_count as f64 / period_days.max(1) as f64;

    Some(Insights {
        unique_products,
        active_regions,
        period_days,
        mean_sale: mean(amounts()),
        max_sale: amounts().fold(f64::NEG_INFINITY, f64::max),
        min_sale: amounts().fold(f64::INFINITY, f64::min),
        orders_per_day: (orders_per_day * 10.0).round_ties_even() / 10.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{MonthBucket, RawSale, SalesDataset};
    use crate::data::normalize::normalize;

    fn dataset(rows: &[(&str, &str, &str, f64)]) -> SalesDataset {
        let raw = rows
            .iter()
            .map(|(id, date, customer, amount)| RawSale {
                order_id: id.to_string(),
                order_date: date.to_string(),
                product: format!("product-{id}"),
                customer: customer.to_string(),
                region: "R".to_string(),
                amount: *amount,
            })
            .collect();
        normalize(raw, None)
    }

    fn month(year: i32, month: u32, revenue: f64) -> MonthlyRevenue {
        MonthlyRevenue {
            month: MonthBucket { year, month },
            revenue,
        }
    }

    #[test]
    fn empty_view_is_all_zero() {
        let kpi = compute(&[]);
        assert_eq!(kpi, KpiSnapshot::default());
        assert_eq!(kpi.total_revenue, 0.0);
        assert_eq!(kpi.order_count, 0);
        assert_eq!(kpi.unique_customers, 0);
        assert_eq!(kpi.average_ticket, 0.0);
        assert_eq!(kpi.growth_pct, 0.0);
        assert!(insights(&[], &kpi).is_none());
    }

    #[test]
    fn two_month_scenario() {
        let ds = dataset(&[
            ("O1", "05/01/2023", "Ana", 100.0),
            ("O2", "20/01/2023", "Bia", 200.0),
            ("O3", "10/02/2023", "Ana", 150.0),
        ]);
        let view = ds.view();
        let series = monthly_revenue(&view);
        assert_eq!(series, vec![month(2023, 1, 300.0), month(2023, 2, 150.0)]);

        let kpi = compute(&view);
        assert_eq!(kpi.total_revenue, 450.0);
        assert_eq!(kpi.order_count, 3);
        assert_eq!(kpi.unique_customers, 2);
        assert_eq!(kpi.average_ticket, 225.0);
        assert_eq!(kpi.growth_pct, -50.0);
        assert_eq!(Trend::from_growth(kpi.growth_pct), Trend::Down);
    }

    #[test]
    fn order_count_is_distinct() {
        let ds = dataset(&[
            ("O1", "05/01/2023", "Ana", 10.0),
            ("O1", "05/01/2023", "Ana", 20.0),
            ("O2", "06/01/2023", "Ana", 30.0),
        ]);
        let kpi = compute(&ds.view());
        assert_eq!(kpi.order_count, 2);
        assert_eq!(kpi.unique_customers, 1);
        assert_eq!(kpi.average_ticket, 60.0);
    }

    #[test]
    fn growth_edge_cases() {
        assert_eq!(growth_pct(&[]), 0.0);
        assert_eq!(growth_pct(&[month(2023, 1, 10.0)]), 0.0);
        assert_eq!(growth_pct(&[month(2023, 1, 0.0), month(2023, 2, 10.0)]), 0.0);
        assert_eq!(
            growth_pct(&[month(2022, 12, 1.0), month(2023, 1, 50.0), month(2023, 2, 75.0)]),
            50.0
        );
    }

    #[test]
    fn best_month_progress_is_capped() {
        assert_eq!(best_month_progress(&[]), None);
        assert_eq!(best_month_progress(&[month(2023, 1, -5.0)]), None);
        assert_eq!(
            best_month_progress(&[month(2023, 1, 200.0), month(2023, 2, 50.0)]),
            Some(25.0)
        );
        assert_eq!(best_month_progress(&[month(2023, 1, 80.0)]), Some(100.0));
    }

    #[test]
    fn insights_over_period() {
        let ds = dataset(&[
            ("O1", "01/01/2023", "Ana", 10.0),
            ("O2", "05/01/2023", "Bia", 30.0),
            ("O3", "11/01/2023", "Ana", 20.0),
        ]);
        let view = ds.view();
        let kpi = compute(&view);
        let ins = insights(&view, &kpi).unwrap();
        assert_eq!(ins.period_days, 10);
        assert_eq!(ins.unique_products, 3);
        assert_eq!(ins.active_regions, 1);
        assert_eq!(ins.mean_sale, 20.0);
        assert_eq!(ins.max_sale, 30.0);
        assert_eq!(ins.min_sale, 10.0);
        assert_eq!(ins.orders_per_day, 0.3);
    }

    #[test]
    fn orders_per_day_rounds_ties_to_even() {
        let quiet = dataset(&[
            ("O1", "01/01/2023", "Ana", 1.0),
            ("O2", "05/01/2023", "Ana", 1.0),
            ("O3", "10/01/2023", "Ana", 1.0),
            ("O4", "15/01/2023", "Ana", 1.0),
            ("O5", "21/01/2023", "Ana", 1.0),
        ]);
        let view = quiet.view();
        let ins = insights(&view, &compute(&view)).unwrap();
        assert_eq!(ins.period_days, 20);
        assert_eq!(ins.orders_per_day, 0.2);

        let rows: Vec<(String, &str)> = (0..15)
            .map(|i| (format!("O{i}"), if i == 0 { "01/01/2023" } else { "21/01/2023" }))
            .collect();
        let busy = dataset(
            &rows
                .iter()
                .map(|(id, date)| (id.as_str(), *date, "Ana", 1.0))
                .collect::<Vec<_>>(),
        );
        let view = busy.view();
        let ins = insights(&view, &compute(&view)).unwrap();
        assert_eq!(ins.orders_per_day, 0.8);
    }

    #[test]
    fn single_day_period_counts_as_one_day() {
        let ds = dataset(&[("O1", "01/01/2023", "Ana", 10.0), ("O2", "01/01/2023", "Bia", 5.0)]);
        let view = ds.view();
        let ins = insights(&view, &compute(&view)).unwrap();
        assert_eq!(ins.period_days, 0);
        assert_eq!(ins.orders_per_day, 2.0);
    }
}
