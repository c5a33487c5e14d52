use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::extract::extract_result_url;
use crate::models::{EditResponse, HealthResponse};
use crate::payload::file_bytes_to_data_uri;
use crate::replicate::ReplicateClient;
use crate::request_id;
use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::HeaderValue,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{debug, info, warn};

// Browser dev servers allowed to call the relay.
const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    /// None when no credential was available at startup; every edit request
    /// then fails with the configuration error.
    pub replicate: Option<Arc<ReplicateClient>>,
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(ALLOWED_ORIGINS.iter().map(|origin| {
            origin
                .parse::<HeaderValue>()
                .expect("allowed origin is a valid header value")
        })))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/edit", post(edit_image))
        .layer(axum::middleware::from_fn(request_id::inject_request_id))
        .layer(cors)
        .with_state(state)
}

#[axum_macros::debug_handler]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[axum_macros::debug_handler]
pub async fn edit_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> axum::response::Response {
    let start = Instant::now();
    match run_edit(&state, multipart).await {
        Ok(url) => {
            let elapsed = start.elapsed().as_secs_f64();
            info!("Edit completed in {:.2}s: {}", elapsed, url);
            Json(EditResponse { url, elapsed }).into_response()
        }
        Err(e) => {
            warn!("Edit request failed: {}", e);
            e.into_response()
        }
    }
}

/// The whole pipeline: multipart read -> data URI -> provider call -> URL
/// extraction. One outbound call, no retries.
async fn run_edit(state: &AppState, mut multipart: Multipart) -> Result<String, RelayError> {
    let mut image: Option<(Vec<u8>, Option<String>)> = None;
    let mut prompt = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RelayError::Upload(format!("failed to read multipart form: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                let filename = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| RelayError::Upload(format!("failed to read image upload: {}", e)))?;
                image = Some((bytes.to_vec(), filename));
            }
            Some("prompt") => {
                prompt = field
                    .text()
                    .await
                    .map_err(|e| RelayError::Upload(format!("failed to read prompt field: {}", e)))?;
            }
            _ => {}
        }
    }

    let (file_bytes, filename) =
        image.ok_or_else(|| RelayError::Upload("missing 'image' field in form".to_string()))?;

    let Some(client) = &state.replicate else {
        return Err(RelayError::NotInitialized);
    };

    let data_uri = file_bytes_to_data_uri(&file_bytes, filename.as_deref());
    let prompt = if prompt.is_empty() {
        state.config.default_prompt.clone()
    } else {
        prompt
    };

    let input = json!({
        "prompt": prompt,
        "input_image": data_uri,
        "output_format": "jpg",
    });

    let output = client.run(&state.config.model_ref, &input).await?;
    debug!("Replicate raw output: {}", output);

    let result_url = extract_result_url(&output)?;
    info!("Extracted result URL: {}", result_url);
    Ok(result_url)
}
