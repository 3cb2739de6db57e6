//! Outbound text-generation client used for fire-and-forget place
//! enrichment. The pipeline discards its output, so the only contract here
//! is to never block longer than the configured timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use tripweaver_core::config::EnrichmentConfig;
use tripweaver_core::{TextEnricher, UpstreamError};

pub struct HttpTextEnricher {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    text: String,
}

impl HttpTextEnricher {
    pub fn new(config: &EnrichmentConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_string() })
    }
}

#[async_trait]
impl TextEnricher for HttpTextEnricher {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        let url = format!("{}/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest { prompt })
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| {
                warn!(
                    event_name = "enrichment.request_failed",
                    error = %error,
                    "text enrichment request failed"
                );
                classify(error)
            })?;

        let payload = response.json::<GenerateResponse>().await.map_err(|error| {
            warn!(
                event_name = "enrichment.decode_failed",
                error = %error,
                "text enrichment payload did not decode"
            );
            classify(error)
        })?;

        Ok(payload.text)
    }
}

fn classify(error: reqwest::Error) -> UpstreamError {
    if error.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Failed(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::GenerateResponse;

    #[test]
    fn response_payload_decodes() {
        let payload: GenerateResponse =
            serde_json::from_str(r#"{"text": "1. Gateway of India"}"#).expect("decodes");
        assert_eq!(payload.text, "1. Gateway of India");
    }
}
