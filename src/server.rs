//! HTTP transport.
//!
//! A single axum fallback handler feeds every request to the
//! [`RequestDispatcher`].

use crate::config::ServerSettings;
use crate::dispatcher::RequestDispatcher;
use crate::request::MockRequest;
use crate::response::MockResponse;
use anyhow::Context;
use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
struct AppState {
    dispatcher: Arc<RequestDispatcher>,
    max_body_bytes: usize,
    read_timeout: Duration,
}

/// Build the axum router serving `dispatcher`.
#[allow(deprecated)]
pub fn router(dispatcher: Arc<RequestDispatcher>, settings: &ServerSettings) -> Router {
    let state = AppState {
        dispatcher,
        max_body_bytes: settings.max_body_bytes(),
        read_timeout: settings.read_timeout(),
    };

    Router::new()
        .fallback(handle)
        .with_state(state)
        .layer(TimeoutLayer::new(settings.write_timeout()))
        .layer(TraceLayer::new_for_http())
}

async fn handle(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let body = match read_body(body, &state).await {
        Ok(body) => body,
        Err(response) => return response.into_response(),
    };

    let request = MockRequest {
        method: parts.method.as_str().to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        body,
    };

    state.dispatcher.dispatch(&request).await.into_response()
}

async fn read_body(body: Body, state: &AppState) -> Result<axum::body::Bytes, MockResponse> {
    match tokio::time::timeout(state.read_timeout, to_bytes(body, state.max_body_bytes)).await {
        Ok(Ok(bytes)) => Ok(bytes),
        Ok(Err(e)) => Err(MockResponse::error(
            StatusCode::BAD_REQUEST,
            &format!("invalid request body: {e}"),
        )),
        Err(_) => Err(MockResponse::error(
            StatusCode::REQUEST_TIMEOUT,
            "timed out reading request body",
        )),
    }
}

/// Bind the configured address and serve until Ctrl-C or SIGTERM.
pub async fn serve(settings: &ServerSettings, dispatcher: RequestDispatcher) -> anyhow::Result<()> {
    let address = settings.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(address = %listener.local_addr()?, "Server listening");

    let app = router(Arc::new(dispatcher), settings);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server exited");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server");
}
