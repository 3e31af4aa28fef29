use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};

use super::AppState;
use crate::client::Endpoint;
use crate::error::ClientError;

/// 转发到 webhook, 上游状态码和 JSON 原样返回
async fn forward(state: &AppState, endpoint: Endpoint, body: Option<Value>) -> Response {
    match state.webhooks.forward(endpoint, body).await {
        Ok((status, payload)) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, Json(payload)).into_response()
        }
        Err(e @ ClientError::NotConfigured(_)) => {
            tracing::error!("Proxy {} rejected: {}", endpoint.env_name(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Error in {} proxy: {}", endpoint.env_name(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to proxy request" })),
            )
                .into_response()
        }
    }
}

pub async fn fetch_invoices(State(state): State<AppState>) -> Response {
    forward(&state, Endpoint::FetchInvoices, None).await
}

pub async fn fetch_emails(State(state): State<AppState>) -> Response {
    forward(&state, Endpoint::FetchEmails, None).await
}

/// 请求体不是合法 JSON 时同样回 JSON 错误
fn bad_body(rejection: JsonRejection) -> Response {
    tracing::warn!("Rejected proxy body: {}", rejection.body_text());
    (
        rejection.status(),
        Json(json!({ "error": rejection.body_text() })),
    )
        .into_response()
}

async fn forward_body(
    state: &AppState,
    endpoint: Endpoint,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(body)) => forward(state, endpoint, Some(body)).await,
        Err(rejection) => bad_body(rejection),
    }
}

pub async fn save_invoice(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    forward_body(&state, Endpoint::SaveInvoice, body).await
}

pub async fn send_email(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    forward_body(&state, Endpoint::SendEmail, body).await
}

pub async fn log_email(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    forward_body(&state, Endpoint::LogEmail, body).await
}

pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}
