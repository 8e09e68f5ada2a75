//! Data access for the APM views.  Every search goes through
//! [`ApmEventClient`], which scopes the request to the indices holding the
//! requested processor events.

use serde::*;

mod event_client;
mod setup;
pub mod transactions;

pub use event_client::ApmEventClient;
pub use setup::{Setup, UiFilters, ENVIRONMENT_NOT_DEFINED};

pub const SERVICE_NAME: &str = "service.name";
pub const SERVICE_ENVIRONMENT: &str = "service.environment";
pub const TRANSACTION_NAME: &str = "transaction.name";
pub const TRANSACTION_TYPE: &str = "transaction.type";
pub const TRANSACTION_DURATION: &str = "transaction.duration.us";
pub const CLIENT_GEO_COUNTRY_ISO_CODE: &str = "client.geo.country_iso_code";
pub const PROCESSOR_EVENT: &str = "processor.event";
pub const TIMESTAMP: &str = "@timestamp";

pub const TRANSACTION_PAGE_LOAD: &str = "page-load";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorEvent {
    Transaction,
    Error,
    Metric,
    Span,
}

impl ProcessorEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessorEvent::Transaction => "transaction",
            ProcessorEvent::Error => "error",
            ProcessorEvent::Metric => "metric",
            ProcessorEvent::Span => "span",
        }
    }
}

/// Index pattern holding each kind of APM event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApmIndices {
    pub transaction: String,
    pub error: String,
    pub metric: String,
    pub span: String,
}

impl Default for ApmIndices {
    fn default() -> Self {
        ApmIndices {
            transaction: "apm-*-transaction*".into(),
            error: "apm-*-error*".into(),
            metric: "apm-*-metric*".into(),
            span: "apm-*-span*".into(),
        }
    }
}

impl ApmIndices {
    pub fn for_event(&self, event: ProcessorEvent) -> &str {
        match event {
            ProcessorEvent::Transaction => &self.transaction,
            ProcessorEvent::Error => &self.error,
            ProcessorEvent::Metric => &self.metric,
            ProcessorEvent::Span => &self.span,
        }
    }

    /// Comma-separated index list covering `events`, without duplicates
    pub fn resolve(&self, events: &[ProcessorEvent]) -> String {
        let mut indices: Vec<&str> = Vec::with_capacity(events.len());
        for event in events {
            let index = self.for_event(*event);
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
        indices.join(",")
    }
}
