//! Zero-shot classifier backed by an HTTP inference service
//!
//! Speaks the Hugging Face zero-shot-classification request/response shape,
//! so it works against the hosted inference API or a self-hosted
//! text-classification server.

use crate::classifier::{LabelScore, ZeroShotClassifier};
use crate::fallback::FallbackSettings;
use async_trait::async_trait;
use sellerlens_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ZeroShotRequest<'a> {
    inputs: &'a str,
    parameters: ZeroShotParameters<'a>,
}

#[derive(Debug, Serialize)]
struct ZeroShotParameters<'a> {
    candidate_labels: &'a [String],
    multi_label: bool,
}

#[derive(Debug, Deserialize)]
struct ZeroShotResponse {
    labels: Vec<String>,
    scores: Vec<f32>,
}

/// Production zero-shot adapter
pub struct HttpZeroShotClassifier {
    name: String,
    endpoint: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpZeroShotClassifier {
    pub fn new(endpoint: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            name: "zero-shot-http".to_string(),
            endpoint: endpoint.into(),
            token,
            client,
        })
    }

    /// Build from fallback settings; `None` when no endpoint is configured
    pub fn from_settings(settings: &FallbackSettings) -> Result<Option<Self>> {
        let Some(endpoint) = settings.endpoint.as_deref() else {
            return Ok(None);
        };

        let token = match settings.token_env.as_deref() {
            Some(var) => Some(std::env::var(var).map_err(|_| {
                Error::config(format!("fallback token variable {} is not set", var))
            })?),
            None => None,
        };

        let classifier = Self::new(endpoint, token, Duration::from_millis(settings.timeout_ms))?
            .with_name(settings.model.clone());
        Ok(Some(classifier))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Pair up labels and scores from a response body
fn parse_response(body: ZeroShotResponse) -> Result<Vec<LabelScore>> {
    if body.labels.len() != body.scores.len() {
        return Err(Error::classifier(format!(
            "zero-shot response has {} labels but {} scores",
            body.labels.len(),
            body.scores.len()
        )));
    }

    Ok(body
        .labels
        .into_iter()
        .zip(body.scores)
        .map(|(label, score)| LabelScore::new(label, score))
        .collect())
}

#[async_trait]
impl ZeroShotClassifier for HttpZeroShotClassifier {
    async fn score(&self, text: &str, labels: &[String]) -> Result<Vec<LabelScore>> {
        let request = ZeroShotRequest {
            inputs: text,
            parameters: ZeroShotParameters {
                candidate_labels: labels,
                multi_label: true,
            },
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::classifier(format!("zero-shot request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::classifier(format!(
                "zero-shot service returned {}: {}",
                status, body
            )));
        }

        let body: ZeroShotResponse = response
            .json()
            .await
            .map_err(|e| Error::classifier(format!("malformed zero-shot response: {}", e)))?;

        debug!(labels = body.labels.len(), "zero-shot response received");
        parse_response(body)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let labels = vec!["Late delivery".to_string(), "Overpriced".to_string()];
        let request = ZeroShotRequest {
            inputs: "took ages",
            parameters: ZeroShotParameters {
                candidate_labels: &labels,
                multi_label: true,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["inputs"], "took ages");
        assert_eq!(json["parameters"]["candidate_labels"][1], "Overpriced");
        assert_eq!(json["parameters"]["multi_label"], true);
    }

    #[test]
    fn test_parse_response() {
        let body: ZeroShotResponse = serde_json::from_str(
            r#"{"sequence": "took ages", "labels": ["Late delivery", "Overpriced"], "scores": [0.91, 0.12]}"#,
        )
        .unwrap();

        let scores = parse_response(body).unwrap();
        assert_eq!(scores[0], LabelScore::new("Late delivery", 0.91));
        assert_eq!(scores.len(), 2);
    }

    #[test]
    fn test_parse_response_length_mismatch() {
        let body = ZeroShotResponse {
            labels: vec!["Late delivery".to_string()],
            scores: vec![],
        };
        assert!(parse_response(body).is_err());
    }

    #[test]
    fn test_from_settings_without_endpoint() {
        let settings = FallbackSettings::default();
        assert!(HttpZeroShotClassifier::from_settings(&settings).unwrap().is_none());
    }

    #[test]
    fn test_from_settings_with_endpoint() {
        let settings = FallbackSettings {
            endpoint: Some("http://127.0.0.1:9/classify".to_string()),
            ..FallbackSettings::default()
        };

        let classifier = HttpZeroShotClassifier::from_settings(&settings)
            .unwrap()
            .unwrap();
        assert_eq!(classifier.endpoint(), "http://127.0.0.1:9/classify");
        assert_eq!(classifier.name(), "facebook/bart-large-mnli");
    }
}
