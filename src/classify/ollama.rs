//! Zero-shot classification through a local Ollama model

use super::{Classification, ClassifierError, ZeroShotClassifier};
use crate::config::ClassifierConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub struct OllamaClassifier {
    config: ClassifierConfig,
    client: Client,
}

impl OllamaClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self { config, client }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    format: String,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

/// Prompt asking for a JSON object with one confidence per label
pub fn build_prompt(document: &str, labels: &[String]) -> String {
    let candidates = labels
        .iter()
        .map(|l| format!("- {}", l))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Classify the text into the candidate categories.\n\
         Answer ONLY with a JSON object whose keys are the category names exactly as written \
         and whose values are confidences between 0 and 1.\n\n\
         Categories:\n{}\n\nText:\n{}\n",
        candidates, document
    )
}

/// Read per-label confidences from the model's JSON answer.
///
/// Accepts either `{"label": score, ...}` or `{"scores": {"label": score}}`.
/// Missing labels score 0; the scores are rescaled to sum to 1.
pub fn parse_scores(raw: &str, labels: &[String]) -> Result<Vec<f64>, ClassifierError> {
    let value: Value = serde_json::from_str(raw.trim())?;
    let object = match value {
        Value::Object(mut map) => match map.remove("scores") {
            Some(Value::Object(inner)) => inner,
            _ => map,
        },
        other => {
            return Err(ClassifierError::InvalidResponse(format!(
                "expected a JSON object, got: {}",
                other
            )))
        }
    };

    let scores: Vec<f64> = labels
        .iter()
        .map(|label| {
            object
                .iter()
                .find(|(key, _)| key.trim().eq_ignore_ascii_case(label.trim()))
                .and_then(|(_, v)| v.as_f64())
                .filter(|s| s.is_finite() && *s > 0.0)
                .unwrap_or(0.0)
        })
        .collect();

    let total: f64 = scores.iter().sum();
    if total <= 0.0 {
        return Err(ClassifierError::InvalidResponse(
            "no candidate label received a positive score".to_string(),
        ));
    }

    Ok(scores.iter().map(|s| s / total).collect())
}

#[async_trait]
impl ZeroShotClassifier for OllamaClassifier {
    async fn classify(
        &self,
        document: &str,
        labels: &[String],
    ) -> Result<Classification, ClassifierError> {
        if labels.is_empty() {
            return Err(ClassifierError::NoCandidateLabels);
        }

        let url = format!("{}/api/generate", self.config.url.trim_end_matches('/'));
        let request = OllamaRequest {
            model: self.config.model.clone(),
            prompt: build_prompt(document, labels),
            stream: false,
            format: "json".to_string(),
            options: OllamaOptions {
                temperature: self.config.temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClassifierError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(ClassifierError::InvalidResponse(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: OllamaResponse = response.json().await?;
        tracing::debug!(model = %self.config.model, "classification response: {}", body.response);

        let scores = parse_scores(&body.response, labels)?;
        Ok(Classification::from_scores(labels, &scores))
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
