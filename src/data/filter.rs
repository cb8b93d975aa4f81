use std::collections::{BTreeSet, HashSet};

use chrono::Weekday;

use super::model::{Sale, SalesDataset, WEEKDAYS};

// ---------------------------------------------------------------------------
// Filter specification
// ---------------------------------------------------------------------------

/// Inclusive bounds on the sale amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountRange {
    pub min: f64,
    pub max: f64,
}

impl AmountRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Declarative inclusion constraints, combined with logical AND.
///
/// A `None` field means "no restriction on that dimension". A `Some` set
/// restricts to its members, so `Some(empty)` lets nothing through; this is
/// different from `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub year: Option<i32>,
    pub quarter: Option<u32>,
    pub regions: Option<BTreeSet<String>>,
    pub weekdays: Option<HashSet<Weekday>>,
    pub amount: Option<AmountRange>,
}

impl FilterSpec {
    /// The dashboard's initial selection: every year and quarter, every
    /// region and weekday, and the dataset's full amount range.
    pub fn select_all(dataset: &SalesDataset) -> Self {
        FilterSpec {
            year: None,
            quarter: None,
            regions: Some(dataset.regions().into_iter().collect()),
            weekdays: Some(WEEKDAYS.iter().copied().collect()),
            amount: dataset
                .amount_bounds()
                .map(|(min, max)| AmountRange { min, max }),
        }
    }

    /// Whether a single sale satisfies every active constraint.
    pub fn matches(&self, sale: &Sale) -> bool {
        if self.year.is_some_and(|y| sale.year != y) {
            return false;
        }
        if self.quarter.is_some_and(|q| sale.quarter != q) {
            return false;
        }
        if let Some(regions) = &self.regions {
            if !regions.contains(&sale.region) {
                return false;
            }
        }
        if let Some(weekdays) = &self.weekdays {
            if !weekdays.contains(&sale.weekday) {
                return false;
            }
        }
        if let Some(range) = &self.amount {
            if !range.contains(sale.amount) {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Keep the sales that pass `spec`, preserving input order.
///
/// Accepts any iterator of borrowed sales so a filtered view can be fed back
/// in; applying the same spec twice yields the same view.
pub fn apply<'a, I>(sales: I, spec: &FilterSpec) -> Vec<&'a Sale>
where
    I: IntoIterator<Item = &'a Sale>,
{
    sales.into_iter().filter(|s| spec.matches(s)).collect()
}

/// Filter a whole dataset.
pub fn filter_dataset<'a>(dataset: &'a SalesDataset, spec: &FilterSpec) -> Vec<&'a Sale> {
    apply(&dataset.sales, spec)
}
