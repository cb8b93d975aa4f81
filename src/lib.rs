//! Sales analytics core plus the configuration shared by the binaries.
//!
//! The `data` module is UI-free: it turns raw sales rows into a normalized
//! [`data::model::SalesDataset`], filters it and derives the aggregates and
//! KPIs that the dashboard and the JSON report render.

pub mod config;
pub mod data;
