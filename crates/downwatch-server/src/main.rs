//! Downwatch prediction server.
//!
//! A small HTTP service wrapping a single binary classifier: upload a CSV
//! of machine telemetry, train a logistic regression on it, and serve
//! downtime predictions with a confidence score. One model slot, persisted
//! to disk so predictions survive a restart.

use downwatch_core::{ModelStore, ServiceConfig};
use downwatch_server::api::{build_router, AppState};
use downwatch_server::config;
use downwatch_storage::{DatasetSink, FileModelStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging
    tracing_subscriber::fmt::init();

    let config = load_service_config()?;

    info!(
        listen_addr = %config.listen_addr,
        dataset_path = %config.dataset_path.display(),
        model_path = %config.model_path.display(),
        "Starting downwatch server"
    );

    let listen_addr = config.listen_addr.clone();
    let state = build_app_state(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!(%listen_addr, "Server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Load service configuration from a YAML file or fall back to defaults.
///
/// Checks (in order):
/// 1. First CLI argument as config path
/// 2. `DOWNWATCH_CONFIG` environment variable
/// 3. Default configuration
fn load_service_config() -> anyhow::Result<ServiceConfig> {
    let config_path: Option<PathBuf> = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DOWNWATCH_CONFIG").ok())
        .map(PathBuf::from);

    match config_path {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration from file");
            config::load_config(&path)
        }
        None => {
            info!("No config file specified, using defaults");
            Ok(ServiceConfig::default())
        }
    }
}

/// Build the shared [`AppState`] from the service configuration.
fn build_app_state(config: ServiceConfig) -> Arc<AppState> {
    let store = Arc::new(FileModelStore::new(config.model_path.clone())) as Arc<dyn ModelStore>;
    let dataset = DatasetSink::new(config.dataset_path.clone());
    Arc::new(AppState {
        config,
        store,
        dataset,
    })
}

/// Resolve when the process receives a shutdown signal.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    /// Build a test router with per-test file paths.
    fn test_app() -> axum::Router {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig {
            dataset_path: dir.path().join("uploaded_data.csv"),
            model_path: dir.path().join("model.json"),
            ..ServiceConfig::default()
        };
        // Leak the tempdir so the paths outlive the router under test.
        std::mem::forget(dir);
        build_router(build_app_state(config))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = test_app();
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["model"]["available"], false);
    }

    #[tokio::test]
    async fn test_predict_without_model_is_not_found() {
        let app = test_app();
        let req = Request::builder()
            .method("POST")
            .uri("/predict")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"Temperature": 80.0, "Run_Time": 120.0}"#))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_build_app_state_uses_configured_paths() {
        let config = ServiceConfig::default();
        let state = build_app_state(config.clone());
        assert_eq!(state.dataset.path(), config.dataset_path.as_path());
    }
}
