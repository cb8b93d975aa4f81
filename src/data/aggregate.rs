use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::model::{weekday_name, MonthBucket, Sale, WEEKDAYS};

/// Ranking cutoff used by the dashboard views.
pub const DEFAULT_TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One entry of a grouped aggregate: a display label and its value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

impl LabeledValue {
    fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Revenue of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    pub month: MonthBucket,
    pub revenue: f64,
}

/// Entity a ranking groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Product,
    Customer,
    Region,
}

impl Dimension {
    fn key(self, sale: &Sale) -> &str {
        match self {
            Dimension::Product => &sale.product,
            Dimension::Customer => &sale.customer,
            Dimension::Region => &sale.region,
        }
    }
}

/// How the sale amounts of a group are reduced to one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Total revenue.
    Sum,
    /// Average ticket (mean sale amount).
    Mean,
    /// Number of sale lines.
    Count,
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Sum => self.sum,
            Metric::Mean if self.count == 0 => 0.0,
            Metric::Mean => self.sum / self.count as f64,
            Metric::Count => self.count as f64,
        }
    }
}

/// Mean of the values, or 0 when there are none.
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Group by `dimension` and reduce with `metric`.
///
/// Groups come back in order of first appearance so a later stable sort
/// keeps that order between ties.
pub fn group_by(sales: &[&Sale], dimension: Dimension, metric: Metric) -> Vec<LabeledValue> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Accumulator)> = Vec::new();

    for sale in sales {
        let key = dimension.key(sale);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push((key, Accumulator::default()));
            groups.len() - 1
        });
        let acc = &mut groups[slot].1;
        acc.sum += sale.amount;
        acc.count += 1;
    }

    groups
        .into_iter()
        .map(|(key, acc)| LabeledValue::new(key, acc.value(metric)))
        .collect()
}

/// Stable descending sort by value.
fn rank_descending(values: &mut [LabeledValue]) {
    values.sort_by(|a, b| b.value.total_cmp(&a.value));
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Revenue per month, chronological.
pub fn monthly_revenue(sales: &[&Sale]) -> Vec<MonthlyRevenue> {
    let mut by_month: BTreeMap<MonthBucket, f64> = BTreeMap::new();
    for sale in sales {
        *by_month.entry(sale.month).or_default() += sale.amount;
    }
    by_month
        .into_iter()
        .map(|(month, revenue)| MonthlyRevenue { month, revenue })
        .collect()
}

/// The `n` highest groups by `metric`, descending, ties in first-appearance
/// order.
pub fn top_n(sales: &[&Sale], dimension: Dimension, metric: Metric, n: usize) -> Vec<LabeledValue> {
    let mut ranked = group_by(sales, dimension, metric);
    rank_descending(&mut ranked);
    ranked.truncate(n);
    ranked
}

/// Revenue of every region, descending.
pub fn revenue_by_region(sales: &[&Sale]) -> Vec<LabeledValue> {
    let mut ranked = group_by(sales, Dimension::Region, Metric::Sum);
    rank_descending(&mut ranked);
    ranked
}

/// Revenue per hour of day, always 24 entries labelled `00`–`23`.
pub fn revenue_by_hour(sales: &[&Sale]) -> Vec<LabeledValue> {
    let mut hours = [0.0f64; 24];
    for sale in sales {
        if let Some(slot) = hours.get_mut(sale.hour as usize) {
            *slot += sale.amount;
        }
    }
    hours
        .iter()
        .enumerate()
        .map(|(h, v)| LabeledValue::new(format!("{h:02}"), *v))
        .collect()
}

/// Revenue per weekday, always 7 entries from Monday to Sunday.
pub fn revenue_by_weekday(sales: &[&Sale]) -> Vec<LabeledValue> {
    let mut days = [0.0f64; 7];
    for sale in sales {
        days[sale.weekday.num_days_from_monday() as usize] += sale.amount;
    }
    WEEKDAYS
        .iter()
        .zip(days)
        .map(|(day, v)| LabeledValue::new(weekday_name(*day), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RawSale;
    use crate::data::normalize::normalize;
    use crate::data::model::SalesDataset;

    fn sales(rows: &[(&str, &str, &str, &str, &str, f64)]) -> SalesDataset {
        let raw = rows
            .iter()
            .map(|(id, date, product, customer, region, amount)| RawSale {
                order_id: id.to_string(),
                order_date: date.to_string(),
                product: product.to_string(),
                customer: customer.to_string(),
                region: region.to_string(),
                amount: *amount,
            })
            .collect();
        normalize(raw, None)
    }

    #[test]
    fn monthly_series_is_chronological() {
        let ds = sales(&[
            ("3", "10/02/2023", "P", "C", "R", 150.0),
            ("1", "05/01/2023", "P", "C", "R", 100.0),
            ("4", "01/12/2022", "P", "C", "R", 5.0),
            ("2", "20/01/2023", "P", "C", "R", 200.0),
        ]);
        let series = monthly_revenue(&ds.view());
        let labels: Vec<String> = series.iter().map(|m| m.month.to_string()).collect();
        assert_eq!(labels, vec!["2022-12", "2023-01", "2023-02"]);
        assert_eq!(series[1].revenue, 300.0);
        assert_eq!(series[2].revenue, 150.0);
    }

    #[test]
    fn top_n_limits_and_sorts_descending() {
        let rows: Vec<(String, f64)> = (0..15).map(|i| (format!("P{i}"), i as f64)).collect();
        let rows: Vec<(&str, &str, &str, &str, &str, f64)> = rows
            .iter()
            .map(|(p, v)| ("o", "01/01/2023", p.as_str(), "C", "R", *v))
            .collect();
        let ds = sales(&rows);
        let top = top_n(&ds.view(), Dimension::Product, Metric::Sum, DEFAULT_TOP_N);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].label, "P14");
        assert!(top.windows(2).all(|w| w[0].value >= w[1].value));
    }

    #[test]
    fn ties_keep_first_appearance_order() {
        let ds = sales(&[
            ("1", "01/01/2023", "Desk", "C", "R", 50.0),
            ("2", "01/01/2023", "Lamp", "C", "R", 80.0),
            ("3", "01/01/2023", "Chair", "C", "R", 50.0),
            ("4", "01/01/2023", "Sofa", "C", "R", 50.0),
        ]);
        let top = top_n(&ds.view(), Dimension::Product, Metric::Sum, 3);
        let labels: Vec<&str> = top.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, vec!["Lamp", "Desk", "Chair"]);
    }

    #[test]
    fn mean_and_count_metrics() {
        let ds = sales(&[
            ("1", "01/01/2023", "P", "Ana", "R", 100.0),
            ("2", "01/01/2023", "P", "Ana", "R", 300.0),
            ("3", "01/01/2023", "P", "Bia", "R", 250.0),
        ]);
        let view = ds.view();
        let ticket = top_n(&view, Dimension::Customer, Metric::Mean, 10);
        assert_eq!(ticket[0], LabeledValue::new("Bia", 250.0));
        assert_eq!(ticket[1], LabeledValue::new("Ana", 200.0));

        let freq = top_n(&view, Dimension::Customer, Metric::Count, 10);
        assert_eq!(freq[0], LabeledValue::new("Ana", 2.0));
        assert_eq!(freq[1], LabeledValue::new("Bia", 1.0));
    }

    #[test]
    fn region_revenue_partitions_total() {
        let ds = sales(&[
            ("1", "01/01/2023", "P", "C", "North", 10.5),
            ("2", "01/01/2023", "P", "C", "South", 20.25),
            ("3", "01/01/2023", "P", "C", "North", -3.0),
            ("4", "01/01/2023", "P", "C", "East", 7.0),
        ]);
        let view = ds.view();
        let regions = revenue_by_region(&view);
        assert_eq!(regions.len(), 3);
        assert_eq!(regions[0].label, "South");
        let total: f64 = view.iter().map(|s| s.amount).sum();
        let partitioned: f64 = regions.iter().map(|r| r.value).sum();
        assert!((total - partitioned).abs() < 1e-9);
    }

    #[test]
    fn temporal_breakdowns_are_dense() {
        let ds = sales(&[("1", "03/01/2023 14:10", "P", "C", "R", 42.0)]); // Tuesday
        let view = ds.view();

        let hours = revenue_by_hour(&view);
        assert_eq!(hours.len(), 24);
        assert_eq!(hours[14], LabeledValue::new("14", 42.0));
        assert_eq!(hours.iter().filter(|h| h.value != 0.0).count(), 1);

        let days = revenue_by_weekday(&view);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].label, "Monday");
        assert_eq!(days[1], LabeledValue::new("Tuesday", 42.0));
        assert_eq!(days[6], LabeledValue::new("Sunday", 0.0));
    }

    #[test]
    fn empty_view_degrades_to_empty_or_zero() {
        let view: Vec<&Sale> = Vec::new();
        assert!(monthly_revenue(&view).is_empty());
        assert!(top_n(&view, Dimension::Customer, Metric::Mean, 10).is_empty());
        assert!(revenue_by_region(&view).is_empty());
        assert_eq!(revenue_by_hour(&view).len(), 24);
        assert!(revenue_by_weekday(&view).iter().all(|d| d.value == 0.0));
        assert_eq!(mean(Vec::<f64>::new()), 0.0);
    }
}
