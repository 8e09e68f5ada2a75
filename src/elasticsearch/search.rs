use crate::elasticsearch::{Elasticsearch, ElasticsearchError};
use serde_json::Value;

pub struct ElasticsearchSearchRequest {
    elasticsearch: Elasticsearch,
    index: String,
    body: Value,
}

impl ElasticsearchSearchRequest {
    pub fn new(elasticsearch: &Elasticsearch, index: &str, body: Value) -> Self {
        ElasticsearchSearchRequest {
            elasticsearch: elasticsearch.clone(),
            index: index.to_string(),
            body,
        }
    }

    pub fn url(&self) -> String {
        let index = if self.index.is_empty() {
            self.elasticsearch.index_name()
        } else {
            self.index.as_str()
        };

        format!("{}{}/_search", self.elasticsearch.url(), index)
    }

    pub fn execute(self) -> Result<Value, ElasticsearchError> {
        let url = self.url();
        Elasticsearch::execute_request(
            self.elasticsearch.client().post(&url),
            Some(&self.body),
            |status, body| match serde_json::from_str::<Value>(&body) {
                Ok(value) => Ok(value),
                Err(e) => Err(ElasticsearchError(Some(status), e.to_string())),
            },
        )
    }
}
