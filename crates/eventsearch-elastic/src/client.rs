//! Elasticsearch REST client.

use async_trait::async_trait;
use eventsearch_core::engine::SearchEngine;
use eventsearch_core::error::DomainError;
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, instrument};

/// `SearchEngine` backed by an Elasticsearch-compatible HTTP endpoint.
///
/// Transport failures, `503` and `429` map to `IndexUnavailable`, other `4xx` to
/// `BadRequest`, anything else to `Infrastructure`.
#[derive(Debug, Clone)]
pub struct ElasticsearchClient {
    client: Client,
    base_url: Url,
}

impl ElasticsearchClient {
    /// Creates a client for the engine at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if `base_url` is not a valid
    /// base URL.
    pub fn new(base_url: &str) -> Result<Self, DomainError> {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a client reusing an existing `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if `base_url` is not a valid
    /// base URL.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, DomainError> {
        let base_url = Url::parse(base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                DomainError::Infrastructure(format!("invalid search engine URL: {base_url}"))
            })?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn transport_error(err: reqwest::Error) -> DomainError {
    DomainError::IndexUnavailable(err.to_string())
}

fn error_reason(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    error
        .get("reason")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .map(str::to_owned)
}

async fn into_json(response: Response) -> Result<Value, DomainError> {
    let status = response.status();
    let text = response.text().await.map_err(transport_error)?;
    let body: Value = serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text));

    if status.is_success() {
        return Ok(body);
    }

    let reason = error_reason(&body).unwrap_or_else(|| status.to_string());
    Err(match status {
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::TOO_MANY_REQUESTS => {
            DomainError::IndexUnavailable(reason)
        }
        s if s.is_client_error() => DomainError::BadRequest(reason),
        s => DomainError::Infrastructure(format!("{s}: {reason}")),
    })
}

#[async_trait]
impl SearchEngine for ElasticsearchClient {
    async fn ping(&self) -> bool {
        match self.client.get(self.base_url.clone()).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "ping failed");
                false
            }
        }
    }

    #[instrument(skip(self))]
    async fn index_exists(&self, index: &str) -> Result<bool, DomainError> {
        let response = self
            .client
            .head(self.endpoint(&[index]))
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            _ => into_json(response).await.map(|_| false),
        }
    }

    #[instrument(skip(self, mapping))]
    async fn create_index(&self, index: &str, mapping: &Value) -> Result<(), DomainError> {
        let response = self
            .client
            .put(self.endpoint(&[index]))
            .json(mapping)
            .send()
            .await
            .map_err(transport_error)?;

        into_json(response).await.map(|_| ())
    }

    #[instrument(skip(self, document))]
    async fn upsert(&self, index: &str, id: &str, document: &Value) -> Result<Value, DomainError> {
        let response = self
            .client
            .put(self.endpoint(&[index, "_doc", id]))
            .json(document)
            .send()
            .await
            .map_err(transport_error)?;

        into_json(response).await
    }

    #[instrument(skip(self, body))]
    async fn search(&self, index: &str, body: &Value) -> Result<Vec<Value>, DomainError> {
        let response = self
            .client
            .post(self.endpoint(&[index, "_search"]))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let result = into_json(response).await?;
        match result.pointer("/hits/hits") {
            Some(Value::Array(hits)) => Ok(hits.clone()),
            _ => Err(DomainError::Infrastructure(
                "search response has no hits array".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_appends_segments_to_base_path() {
        let client = ElasticsearchClient::new("http://localhost:9200/es/").unwrap();

        let url = client.endpoint(&["events", "_doc", "1"]);

        assert_eq!(url.as_str(), "http://localhost:9200/es/events/_doc/1");
    }

    #[test]
    fn test_endpoint_escapes_document_ids() {
        let client = ElasticsearchClient::new("http://localhost:9200").unwrap();

        let url = client.endpoint(&["notes", "_doc", "a/b c"]);

        assert_eq!(url.as_str(), "http://localhost:9200/notes/_doc/a%2Fb%20c");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(
            ElasticsearchClient::new("not a url"),
            Err(DomainError::Infrastructure(_))
        ));
        assert!(ElasticsearchClient::new("mailto:ops@example.com").is_err());
    }

    #[test]
    fn test_error_reason_reads_elasticsearch_error_body() {
        let body = serde_json::json!({
            "error": { "type": "query_shard_exception", "reason": "failed to create query" },
            "status": 400
        });

        assert_eq!(error_reason(&body).as_deref(), Some("failed to create query"));
        assert_eq!(error_reason(&serde_json::json!({})), None);
    }
}
