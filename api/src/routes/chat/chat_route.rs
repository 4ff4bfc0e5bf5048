//! POST /api/chat — runs one message through the guarded RAG pipeline.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use tracing::{error, warn};

use crate::{
    core::app_state::AppState,
    routes::chat::chat_request::{ChatFailure, ChatRequest, ChatResponse},
};

/// Handler: POST /api/chat
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/chat \
///   -H 'content-type: application/json' \
///   -d '{"message":"How do I report an unplowed road?"}'
/// ```
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Response {
    // Only a JSON object is a request; arrays and scalars are rejected by the extractor.
    let message = match body.map(|Json(obj)| ChatRequest::try_from(obj)) {
        Ok(Ok(req)) => req.message,
        Ok(Err(e)) => {
            warn!(error = %e, "invalid chat request");
            return failure(&state, None).await;
        }
        Err(rejection) => {
            warn!(status = %rejection.status(), error = %rejection.body_text(), "unreadable chat request");
            return failure(&state, None).await;
        }
    };

    // Run on its own task so a panic inside the pipeline surfaces as a JoinError.
    let orchestrator = state.orchestrator.clone();
    let query = message.clone();
    let task = tokio::spawn(async move { orchestrator.handle(&query).await });

    match task.await {
        Ok(result) => Json(ChatResponse::from(result)).into_response(),
        Err(e) => {
            error!(error = %e, "chat pipeline aborted");
            failure(&state, Some(message.as_str())).await
        }
    }
}

async fn failure(state: &AppState, query: Option<&str>) -> Response {
    let result = state.orchestrator.record_failure(query).await;
    let body = ChatFailure {
        response: result.response,
        error: true,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
