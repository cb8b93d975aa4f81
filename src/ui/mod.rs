//! egui rendering of the dashboard. Everything here reads from
//! [`crate::state::AppState`]; the numbers come from `sales_panda::data`.

pub mod format;
pub mod panels;
pub mod plot;
pub mod tabs;
