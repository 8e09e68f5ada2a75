use crate::apm::{ApmIndices, ProcessorEvent, PROCESSOR_EVENT};
use crate::elasticsearch::{ElasticsearchError, SearchClient};
use crate::query_dsl::{push_filter, terms};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct ApmEventClient {
    client: Arc<dyn SearchClient>,
    indices: ApmIndices,
}

impl ApmEventClient {
    pub fn new(client: Arc<dyn SearchClient>, indices: ApmIndices) -> Self {
        ApmEventClient { client, indices }
    }

    pub fn indices(&self) -> &ApmIndices {
        &self.indices
    }

    /// Runs `body` against the indices holding `events`, restricted to
    /// documents of those event kinds
    pub fn search(
        &self,
        events: &[ProcessorEvent],
        mut body: Value,
    ) -> Result<Value, ElasticsearchError> {
        if events.is_empty() {
            return Err(ElasticsearchError(
                None,
                "at least one processor event is required".into(),
            ));
        }

        let index = self.indices.resolve(events);
        push_filter(
            &mut body,
            terms(PROCESSOR_EVENT, events.iter().map(|e| e.as_str())),
        );

        debug!(index = %index, "apm event search");
        self.client.search(&index, &body)
    }
}
