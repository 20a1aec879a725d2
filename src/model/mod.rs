//! Database models and derived metric types.

mod metrics;
mod models;
mod table;

pub use metrics::*;
pub use models::*;
pub use table::Table;
