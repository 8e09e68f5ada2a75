use crate::apm::{ApmEventClient, SERVICE_ENVIRONMENT};
use crate::query_dsl::{missing, term, terms};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::*;
use serde_json::Value;

/// Environment filter value selecting services that never set an environment
pub const ENVIRONMENT_NOT_DEFINED: &str = "ENVIRONMENT_NOT_DEFINED";

/// Filters picked in the UI, keyed by document field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiFilters {
    pub environment: Option<String>,
    pub terms: IndexMap<String, Vec<String>>,
}

impl UiFilters {
    pub fn ui_filters_es(&self) -> Vec<Value> {
        let mut filters = Vec::new();

        match self.environment.as_deref() {
            Some(ENVIRONMENT_NOT_DEFINED) => filters.push(missing(SERVICE_ENVIRONMENT)),
            Some(environment) if !environment.is_empty() => {
                filters.push(term(SERVICE_ENVIRONMENT, environment))
            }
            _ => {}
        }

        for (field, values) in &self.terms {
            if !values.is_empty() {
                filters.push(terms(field, values.iter().map(String::as_str)));
            }
        }

        filters
    }
}

/// Everything a query needs to know about the current request: the time
/// window (epoch milliseconds, inclusive), the extra filters chosen in the
/// UI, and the client to run searches with
#[derive(Clone)]
pub struct Setup {
    pub start: i64,
    pub end: i64,
    pub ui_filters_es: Vec<Value>,
    pub apm_event_client: ApmEventClient,
}

impl Setup {
    pub fn new(start: i64, end: i64, apm_event_client: ApmEventClient) -> Self {
        Setup {
            start,
            end,
            ui_filters_es: Vec::new(),
            apm_event_client,
        }
    }

    pub fn with_range(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        apm_event_client: ApmEventClient,
    ) -> Self {
        Setup::new(
            start.timestamp_millis(),
            end.timestamp_millis(),
            apm_event_client,
        )
    }

    pub fn with_ui_filters(mut self, ui_filters: &UiFilters) -> Self {
        self.ui_filters_es = ui_filters.ui_filters_es();
        self
    }
}
