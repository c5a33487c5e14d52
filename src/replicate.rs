use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_API_BASE: &str = "https://api.replicate.com";

#[derive(Debug, thiserror::Error)]
pub enum ReplicateError {
    #[error("Replicate error: {0}")]
    Provider(String),
    #[error("request to Replicate failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Thin handle around the Replicate predictions API. Read-only after
/// construction; shared across request handlers.
#[derive(Debug)]
pub struct ReplicateClient {
    http_client: Arc<reqwest::Client>,
    api_base: String,
    token: String,
}

impl ReplicateClient {
    pub fn new(http_client: Arc<reqwest::Client>, api_base: String, token: String) -> Self {
        Self {
            http_client,
            api_base,
            token,
        }
    }

    fn prediction_url(&self, model_ref: &str) -> String {
        format!(
            "{}/v1/models/{}/predictions",
            self.api_base.trim_end_matches('/'),
            model_ref
        )
    }

    /// Runs the model synchronously (`Prefer: wait`) and returns the raw
    /// output value of the prediction. The returned shape is provider
    /// controlled; callers pass it through the result extractor.
    pub async fn run(&self, model_ref: &str, input: &Value) -> Result<Value, ReplicateError> {
        let target_url = self.prediction_url(model_ref);
        info!("Sending job to Replicate: {}", model_ref);

        let response = self
            .http_client
            .post(&target_url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Prefer", "wait")
            .json(&json!({ "input": input }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ReplicateError::Provider(format!(
                "status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let prediction: Value = response.json().await?;
        debug!("Replicate raw prediction: {}", prediction);

        if let Some(err) = prediction.get("error") {
            if !err.is_null() {
                let message = err
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| err.to_string());
                return Err(ReplicateError::Provider(message));
            }
        }

        // The model result lives in `output`; hand back the whole prediction
        // when it is absent and let the extractor make sense of it.
        if let Some(output) = prediction.get("output") {
            if !output.is_null() {
                return Ok(output.clone());
            }
        }
        Ok(prediction)
    }
}
