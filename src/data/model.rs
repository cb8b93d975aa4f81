use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use chrono::{NaiveDateTime, Weekday};
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Column names – the fixed, case-sensitive input schema
// ---------------------------------------------------------------------------

pub const COL_ORDER_ID: &str = "Order ID";
pub const COL_ORDER_DATE: &str = "Order Date";
pub const COL_PRODUCT: &str = "Product Name";
pub const COL_CUSTOMER: &str = "Customer Name";
pub const COL_REGION: &str = "Region";
pub const COL_SALES: &str = "Sales";

/// Every column a source must provide, in export order.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_ORDER_ID,
    COL_ORDER_DATE,
    COL_PRODUCT,
    COL_CUSTOMER,
    COL_REGION,
    COL_SALES,
];

/// Monday first, the order every weekday breakdown is reported in.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English weekday name ("Monday" … "Sunday").
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// ---------------------------------------------------------------------------
// RawSale – one row as read from the source, date still textual
// ---------------------------------------------------------------------------

/// A source row with its required columns resolved but the date unparsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSale {
    pub order_id: String,
    pub order_date: String,
    pub product: String,
    pub customer: String,
    pub region: String,
    pub amount: f64,
}

// ---------------------------------------------------------------------------
// MonthBucket – the time-series grouping key
// ---------------------------------------------------------------------------

/// A calendar month. Ordering is chronological and the `Display` form is
/// zero-padded `YYYY-MM`, so the text sorts the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Sale – one normalized transaction
// ---------------------------------------------------------------------------

/// A normalized transaction: typed timestamp plus the derived calendar fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub order_id: String,
    pub order_date: NaiveDateTime,
    pub product: String,
    pub customer: String,
    pub region: String,
    /// Sale amount; zero and negative values are kept as-is.
    pub amount: f64,
    pub month: MonthBucket,
    pub year: i32,
    /// Calendar quarter, 1–4.
    pub quarter: u32,
    pub weekday: Weekday,
    /// Hour of day, 0–23.
    pub hour: u32,
}

// ---------------------------------------------------------------------------
// SalesDataset – the loaded, normalized dataset
// ---------------------------------------------------------------------------

/// The normalized dataset. Built once per load and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SalesDataset {
    /// Normalized sales in source order.
    pub sales: Vec<Sale>,
    /// Rows dropped because their date could not be parsed.
    pub dropped_rows: usize,
    /// File the dataset was loaded from, if any.
    pub source: Option<PathBuf>,
}

impl SalesDataset {
    /// Number of sales.
    pub fn len(&self) -> usize {
        self.sales.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    /// Borrow every sale, in order, as an unfiltered view.
    pub fn view(&self) -> Vec<&Sale> {
        self.sales.iter().collect()
    }

    /// Distinct years, most recent first.
    pub fn years(&self) -> Vec<i32> {
        let set: BTreeSet<i32> = self.sales.iter().map(|s| s.year).collect();
        set.into_iter().rev().collect()
    }

    /// Distinct quarters, ascending.
    pub fn quarters(&self) -> Vec<u32> {
        let set: BTreeSet<u32> = self.sales.iter().map(|s| s.quarter).collect();
        set.into_iter().collect()
    }

    /// Distinct regions, sorted.
    pub fn regions(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.sales.iter().map(|s| s.region.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Smallest and largest sale amount, `None` for an empty dataset.
    pub fn amount_bounds(&self) -> Option<(f64, f64)> {
        self.sales.iter().map(|s| s.amount).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}
