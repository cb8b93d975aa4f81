/// Data layer: core types, loading, and the analytics pipeline.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read rows, resolve required columns → Vec<RawSale>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  parse day-first dates, derive calendar fields,
///   └───────────┘  drop unparseable rows → SalesDataset
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSpec → Vec<&Sale> (stable, AND of constraints)
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌───────────┐  ┌──────┐
///   │ aggregate  │  │ kpi  │  grouped series / rankings, scalar snapshot
///   └───────────┘  └──────┘
///        │              │
///        └──────┬───────┘
///               ▼
///          ┌────────┐
///          │ report │  every view for one filter, ready to render
///          └────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod kpi;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod report;
