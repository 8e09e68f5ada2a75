//! Elasticsearch data-access adapters.
//!
//! - [`apm::transactions::get_transaction_avg_duration_by_country`] builds
//!   and runs the per-country page-load aggregation.
//! - [`index_fields::ElasticsearchIndexFieldAdapter`] lists the fields of a
//!   set of indices, enriched with the Beats/ECS field documentation.

pub mod apm;
pub mod elasticsearch;
pub mod index_fields;
pub mod logging;
pub mod query_dsl;
pub mod settings;
mod utils;

pub use elasticsearch::{Elasticsearch, ElasticsearchError, SearchClient};
pub use settings::{Settings, SettingsError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
