//! HTTP endpoint exposing the metadata artifact to the diagram front end.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::error::CliError;
use crate::settings::Settings;

#[derive(Clone)]
struct ServeState {
    artifact_path: Arc<PathBuf>,
}

/// Router with `GET /metadata.json` and permissive CORS.
pub fn router(artifact_path: PathBuf) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/metadata.json", get(metadata_json))
        .layer(cors)
        .with_state(ServeState {
            artifact_path: Arc::new(artifact_path),
        })
}

/// Serve the configured artifact on `127.0.0.1` until Ctrl-C.
pub async fn serve(settings: &Settings) -> Result<(), CliError> {
    if !settings.output_path.is_file() {
        return Err(CliError::MissingArtifact(
            settings.output_path.display().to_string(),
        ));
    }

    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, settings.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        event = "serve_started",
        addr = %addr,
        artifact = %settings.output_path.display()
    );
    println!("Serving http://{addr}/metadata.json (Ctrl+C to stop)");

    axum::serve(listener, router(settings.output_path.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!(event = "serve_stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(event = "signal_handler_failed", error = %err);
    }
}

async fn metadata_json(State(state): State<ServeState>) -> Response {
    match tokio::fs::read(state.artifact_path.as_ref()).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "application/json")], bytes).into_response(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => (
            StatusCode::NOT_FOUND,
            "metadata.json not found; run `generd init` first",
        )
            .into_response(),
        Err(err) => {
            tracing::error!(event = "artifact_read_failed", error = %err);
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to read metadata.json").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(path: PathBuf) -> State<ServeState> {
        State(ServeState {
            artifact_path: Arc::new(path),
        })
    }

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("generd-serve-{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn returns_artifact_verbatim_as_json() {
        let path = scratch_path();
        std::fs::write(&path, "[]\n").expect("write artifact");

        let response = metadata_json(state(path.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        assert_eq!(&body[..], b"[]\n");

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn missing_artifact_is_not_found() {
        let response = metadata_json(state(scratch_path())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn serve_refuses_to_start_without_artifact() {
        let settings = Settings {
            output_path: scratch_path(),
            port: 5000,
            log_filter: "info".to_string(),
        };
        let err = serve(&settings).await.unwrap_err();
        assert!(matches!(err, CliError::MissingArtifact(_)));
    }
}
