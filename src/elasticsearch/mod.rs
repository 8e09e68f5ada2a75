use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub mod aggregate_search;
pub mod aggregates;
pub mod field_caps;
pub mod search;

pub use aggregate_search::AggregateSearchResponse;
pub use field_caps::ElasticsearchFieldCapsRequest;
pub use search::ElasticsearchSearchRequest;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Failure talking to Elasticsearch.  The status is `None` when the cluster
/// never answered (connection refused, timeout, bad url, ...)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("elasticsearch error (status={0:?}): {1}")]
pub struct ElasticsearchError(pub Option<u16>, pub String);

impl ElasticsearchError {
    pub fn status(&self) -> Option<u16> {
        self.0
    }

    pub fn message(&self) -> &str {
        &self.1
    }
}

impl From<serde_json::Error> for ElasticsearchError {
    fn from(e: serde_json::Error) -> Self {
        ElasticsearchError(None, e.to_string())
    }
}

/// Anything that can run a `_search` against an index (or comma-separated
/// list of indices/patterns) and hand back the raw response body
pub trait SearchClient: Send + Sync {
    fn search(&self, index: &str, body: &Value) -> Result<Value, ElasticsearchError>;
}

#[derive(Debug, Clone)]
pub struct Elasticsearch {
    url: url::Url,
    index_name: String,
    timeout: Duration,
}

impl Elasticsearch {
    pub fn new(url: &str, index_name: &str) -> Result<Self, ElasticsearchError> {
        // everything below concatenates paths onto the url, so it has to end with a slash
        let url = if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{}/", url)
        };

        Ok(Elasticsearch {
            url: url::Url::parse(&url)
                .map_err(|e| ElasticsearchError(None, format!("malformed url `{}`: {}", url, e)))?,
            index_name: index_name.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn base_url(&self) -> String {
        format!("{}{}", self.url, self.index_name)
    }

    pub fn client(&self) -> ureq::Agent {
        ureq::AgentBuilder::new().timeout(self.timeout).build()
    }

    pub fn execute_request<F, R>(
        request: ureq::Request,
        body: Option<&Value>,
        response_parser: F,
    ) -> Result<R, ElasticsearchError>
    where
        F: FnOnce(u16, String) -> Result<R, ElasticsearchError>,
    {
        debug!(method = request.method(), url = request.url(), "elasticsearch request");

        let result = match body {
            Some(body) => request
                .set("content-type", "application/json")
                .send_string(&serde_json::to_string(body)?),
            None => request.call(),
        };

        match result {
            Ok(response) => {
                let status = response.status();
                let body = response
                    .into_string()
                    .map_err(|e| ElasticsearchError(Some(status), e.to_string()))?;
                response_parser(status, body)
            }

            // the server answered, but with a non-2xx status
            Err(ureq::Error::Status(status, response)) => Err(ElasticsearchError(
                Some(status),
                response
                    .into_string()
                    .unwrap_or_else(|e| format!("unreadable response body: {}", e)),
            )),

            Err(ureq::Error::Transport(transport)) => {
                Err(ElasticsearchError(None, transport.to_string()))
            }
        }
    }
}

impl SearchClient for Elasticsearch {
    fn search(&self, index: &str, body: &Value) -> Result<Value, ElasticsearchError> {
        ElasticsearchSearchRequest::new(self, index, body.clone()).execute()
    }
}
