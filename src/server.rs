use crate::auth;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::logging::{Exchange, Outcome};
use crate::providers::Provider;
use crate::proxy;
use crate::translate::openai_types::ChatCompletionRequest;

use axum::body::{to_bytes, Body};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Process-wide, read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub client: reqwest::Client,
}

/// Every method and path lands in the same handler; the path only decides
/// which backend is used.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .fallback(handle_completion)
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The body is taken unbuffered so the credential check runs first and no
/// size limit applies to it.
async fn handle_completion(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let path = uri.path();
    let mut exchange = Exchange::start(path);

    let credential = match auth::extract_bearer(&headers) {
        Ok(c) => c,
        Err(e) => {
            warn!(path, "Rejected request without a bearer credential");
            // Drain so the client sees the 401 rather than a reset connection.
            let _ = to_bytes(body, usize::MAX).await;
            exchange.failed(&e).emit();
            return e.into_response();
        }
    };

    let provider = Provider::for_path(path, &state.config);
    exchange.set_provider(provider);

    let result = match read_request(body).await {
        Ok(req) => {
            info!(
                %provider,
                model = req.model.as_deref(),
                messages = req.messages.as_ref().map(Vec::len),
                "Forwarding request"
            );
            exchange.set_model(req.model.as_deref());
            proxy::forward(provider, &req, &credential, &state.config, &state.client).await
        }
        Err(e) => {
            warn!(%provider, error = %e, "Invalid request body");
            Err(e)
        }
    };

    match result {
        Ok(resp) => {
            exchange.finish(Outcome::Success, StatusCode::OK.as_u16()).emit();
            Json(resp).into_response()
        }
        Err(e) => {
            exchange.failed(&e).emit();
            e.into_response()
        }
    }
}

async fn read_request(body: Body) -> Result<ChatCompletionRequest, GatewayError> {
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|e| GatewayError::internal(format!("Failed to read request body: {e}")))?;
    Ok(serde_json::from_slice(&bytes)?)
}
