//! HTTP handlers for the upload / train / predict lifecycle.
//!
//! Each handler is a stateless function over the shared [`AppState`];
//! there is no request sequencing beyond what the store contents imply.
//! Calling predict before train simply yields the typed "no model" error,
//! mapped to 404.

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use downwatch_core::{DownwatchError, DowntimeLabel, ModelStore, ServiceConfig};
use downwatch_model::trainer;
use downwatch_storage::DatasetSink;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// Shared state threaded through axum handlers via [`State`].
pub struct AppState {
    /// Service configuration.
    pub config: ServiceConfig,
    /// The single-slot model store.
    pub store: Arc<dyn ModelStore>,
    /// Where uploads are persisted and training reads from.
    pub dataset: DatasetSink,
}

/// Build the axum [`Router`] with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/health", get(health_handler))
        .route("/upload", post(upload_handler))
        .route("/train", post(train_handler))
        .route("/predict", post(predict_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Fixed-message response body for upload.
#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

/// Response body for a successful training run.
#[derive(Debug, Serialize)]
struct TrainResponse {
    message: String,
    metrics: MetricsBody,
}

/// The metrics pair exposed to clients.
#[derive(Debug, Serialize)]
struct MetricsBody {
    accuracy: f64,
    f1_score: f64,
}

/// `POST /predict` request body. Field names match the CSV columns.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(rename = "Temperature")]
    temperature: f64,
    #[serde(rename = "Run_Time")]
    run_time: f64,
}

/// `POST /predict` response body.
#[derive(Debug, Serialize)]
struct PredictResponse {
    #[serde(rename = "Downtime")]
    downtime: DowntimeLabel,
    #[serde(rename = "Confidence")]
    confidence: f64,
}

/// API error response body.
#[derive(Debug, Serialize)]
struct ApiError {
    error: ApiErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: String,
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Build a JSON error response.
fn api_error(status: StatusCode, error_type: &str, message: &str) -> Response {
    let body = ApiError {
        error: ApiErrorDetail {
            message: message.to_string(),
            error_type: error_type.to_string(),
        },
    };
    (status, Json(body)).into_response()
}

/// Map a typed core error to its HTTP representation.
fn error_response(err: &DownwatchError) -> Response {
    let (status, error_type) = match err {
        DownwatchError::DatasetNotFound => (StatusCode::NOT_FOUND, "dataset_not_found"),
        DownwatchError::ModelNotFound => (StatusCode::NOT_FOUND, "model_not_found"),
        DownwatchError::Dataset(_) => (StatusCode::UNPROCESSABLE_ENTITY, "dataset_error"),
        DownwatchError::Training(_) => (StatusCode::UNPROCESSABLE_ENTITY, "training_error"),
        DownwatchError::Config(_) => (StatusCode::BAD_REQUEST, "config_error"),
        DownwatchError::Storage(_)
        | DownwatchError::Serialization(_)
        | DownwatchError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };
    api_error(status, error_type, &err.to_string())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /upload` — persist a multipart CSV upload.
///
/// The field named `file` wins; otherwise the first field is taken. Bytes
/// are persisted verbatim — no content validation before training.
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    let mut payload: Option<Vec<u8>> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let is_file_field = field.name() == Some("file");
                let bytes = match field.bytes().await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        return api_error(
                            StatusCode::BAD_REQUEST,
                            "upload_error",
                            &format!("Failed to read multipart field: {}", e),
                        )
                    }
                };
                if is_file_field {
                    payload = Some(bytes.to_vec());
                    break;
                }
                if payload.is_none() {
                    payload = Some(bytes.to_vec());
                }
            }
            Ok(None) => break,
            Err(e) => {
                return api_error(
                    StatusCode::BAD_REQUEST,
                    "upload_error",
                    &format!("Malformed multipart body: {}", e),
                )
            }
        }
    }

    let Some(payload) = payload else {
        return api_error(
            StatusCode::BAD_REQUEST,
            "upload_error",
            "Multipart body contains no file field",
        );
    };

    if let Err(err) = state.dataset.save(&payload).await {
        warn!(error = %err, "Failed to persist upload");
        return error_response(&err);
    }

    info!(
        bytes = payload.len(),
        path = %state.dataset.path().display(),
        "Dataset uploaded"
    );
    Json(MessageResponse {
        message: "Data uploaded successfully.".to_string(),
    })
    .into_response()
}

/// `POST /train` — fit a model on the uploaded dataset and store it.
pub async fn train_handler(State(state): State<Arc<AppState>>) -> Response {
    let path = state.dataset.path().to_path_buf();
    let training = state.config.training;

    // The fit is CPU-bound; keep it off the async workers.
    let outcome =
        match tokio::task::spawn_blocking(move || trainer::train_from_csv(&path, &training)).await
        {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(err)) => {
                warn!(error = %err, "Training failed");
                return error_response(&err);
            }
            Err(e) => {
                return api_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    &format!("Training task failed: {}", e),
                )
            }
        };

    let accuracy = outcome.metrics.accuracy;
    let f1_score = outcome.metrics.f1;
    let version = outcome.artifact.version;

    if let Err(err) = state.store.put(outcome.artifact).await {
        warn!(error = %err, "Failed to store trained model");
        return error_response(&err);
    }

    info!(%version, accuracy, f1_score, "Model trained and stored");
    Json(TrainResponse {
        message: "Model trained successfully.".to_string(),
        metrics: MetricsBody { accuracy, f1_score },
    })
    .into_response()
}

/// `POST /predict` — classify a single observation with the stored model.
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Response {
    let artifact = match state.store.get().await {
        Ok(Some(artifact)) => artifact,
        Ok(None) => return error_response(&DownwatchError::ModelNotFound),
        Err(err) => {
            warn!(error = %err, "Model lookup failed");
            return error_response(&err);
        }
    };

    let prediction = artifact.predict(request.temperature, request.run_time);
    Json(PredictResponse {
        downtime: prediction.label,
        confidence: prediction.confidence,
    })
    .into_response()
}

/// `GET /health` — liveness plus whether a trained model is available.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Response {
    let model = state.store.get().await.ok().flatten();
    let body = serde_json::json!({
        "status": "healthy",
        "model": {
            "available": model.is_some(),
            "version": model.as_ref().map(|a| a.version.to_string()),
            "trained_at": model.as_ref().map(|a| a.trained_at.to_rfc3339()),
        },
    });
    (StatusCode::OK, Json(body)).into_response()
}
