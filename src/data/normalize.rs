use std::path::PathBuf;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use super::model::{MonthBucket, RawSale, Sale, SalesDataset};

// ---------------------------------------------------------------------------
// Date parsing
// ---------------------------------------------------------------------------

/// Year-first layouts (`2023-07-15 13:45:00`, `2023-07-15T13:45`).
const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];
const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d"];

/// Day-first layouts with a four-digit year (`15/07/2023 14:30`).
const DAY_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];
const DAY_FIRST_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Day-first layouts with a two-digit year (`15/07/23`).
const SHORT_YEAR_DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%y %H:%M",
    "%d-%m-%y %H:%M:%S",
    "%d-%m-%y %H:%M",
    "%d.%m.%y %H:%M:%S",
    "%d.%m.%y %H:%M",
];
const SHORT_YEAR_DATE_FORMATS: &[&str] = &["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"];

/// Format used when a normalized timestamp is written back out.
pub const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Field order of the date part, decided from the digit counts of its first
/// and last fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateLayout {
    YearFirst,
    DayFirst,
    DayFirstShortYear,
}

impl DateLayout {
    fn detect(text: &str) -> Option<Self> {
        let date = text.split([' ', 'T']).next()?;
        let fields: Vec<&str> = date.split(['/', '-', '.']).collect();
        let [first, middle, last] = fields[..] else {
            return None;
        };
        let numeric = |f: &str| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit());
        if !(numeric(first) && numeric(middle) && numeric(last)) {
            return None;
        }

        match (first.len(), last.len()) {
            (4, 1..=2) => Some(Self::YearFirst),
            (1..=2, 4) => Some(Self::DayFirst),
            (1..=2, 2) => Some(Self::DayFirstShortYear),
            _ => None,
        }
    }

    fn formats(self) -> (&'static [&'static str], &'static [&'static str]) {
        match self {
            Self::YearFirst => (ISO_DATETIME_FORMATS, ISO_DATE_FORMATS),
            Self::DayFirst => (DAY_FIRST_DATETIME_FORMATS, DAY_FIRST_DATE_FORMATS),
            Self::DayFirstShortYear => (SHORT_YEAR_DATETIME_FORMATS, SHORT_YEAR_DATE_FORMATS),
        }
    }
}

/// Parse an order date using the day-first convention.
///
/// A four-digit leading field is read as an ISO year-first date; anything
/// else is day-first, with two-digit years placed in the current era
/// (`31/12/23` is 2023-12-31). Returns `None` for anything that does not
/// match a known layout or names an impossible calendar date
/// (e.g. `31/02/2023`).
pub fn parse_order_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    let (datetime_formats, date_formats) = DateLayout::detect(text)?.formats();

    datetime_formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            date_formats
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Build a [`Sale`] from a raw row and its parsed timestamp, deriving the
/// calendar fields.
pub fn derive_sale(raw: RawSale, order_date: NaiveDateTime) -> Sale {
    let year = order_date.year();
    let month = order_date.month();
    Sale {
        order_id: raw.order_id,
        order_date,
        product: raw.product,
        customer: raw.customer,
        region: raw.region,
        amount: raw.amount,
        month: MonthBucket { year, month },
        year,
        quarter: (month - 1) / 3 + 1,
        weekday: order_date.weekday(),
        hour: order_date.hour(),
    }
}

/// Normalize raw rows into a dataset.
///
/// Rows whose date fails to parse are dropped and counted in
/// [`SalesDataset::dropped_rows`]; they never reach the aggregations.
pub fn normalize(rows: Vec<RawSale>, source: Option<PathBuf>) -> SalesDataset {
    let total = rows.len();
    let mut sales = Vec::with_capacity(total);
    let mut dropped_rows = 0;

    for raw in rows {
        match parse_order_date(&raw.order_date) {
            Some(ts) => sales.push(derive_sale(raw, ts)),
            None => {
                log::debug!(
                    "Dropping order {}: unparseable date '{}'",
                    raw.order_id,
                    raw.order_date
                );
                dropped_rows += 1;
            }
        }
    }

    if dropped_rows > 0 {
        log::warn!("Dropped {dropped_rows} of {total} rows with unparseable order dates");
    }

    SalesDataset {
        sales,
        dropped_rows,
        source,
    }
}
