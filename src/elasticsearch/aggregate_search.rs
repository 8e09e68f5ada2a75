use crate::elasticsearch::ElasticsearchError;
use serde::de::DeserializeOwned;
use serde::*;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct Shards {
    pub total: Option<u64>,
    pub successful: Option<u64>,
    pub skipped: Option<u64>,
    pub failed: Option<u64>,
}

/// The parts of a `size: 0` search response we care about.  `aggregations` is
/// absent when no index matched the request
#[derive(Debug, Deserialize)]
#[serde(bound = "Aggs: DeserializeOwned")]
pub struct AggregateSearchResponse<Aggs> {
    #[serde(rename = "_shards")]
    pub shards: Option<Shards>,

    #[serde(default)]
    pub aggregations: Option<Aggs>,
}

impl<Aggs> AggregateSearchResponse<Aggs>
where
    Aggs: DeserializeOwned,
{
    pub fn from_value(response: Value) -> Result<Self, ElasticsearchError> {
        serde_json::from_value(response).map_err(|e| {
            ElasticsearchError(None, format!("invalid aggregate search response: {}", e))
        })
    }
}
