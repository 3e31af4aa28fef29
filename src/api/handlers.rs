use axum::{
    extract::{Json, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ApiError;
use crate::models::{template_catalog, InvoiceData, InvoiceStyle, SavedInvoice};
use crate::service::{
    build_dashboard, filter_invoices, invoices_to_csv, load_history, load_saved_invoices,
    load_sent_emails, query_invoices, render, DashboardFilter, EmailDraft, InvoiceQuery, Page,
};

/// 编辑器当前状态
#[derive(Debug, Deserialize)]
pub struct InvoiceRequest {
    #[serde(default)]
    pub invoice: InvoiceData,
    #[serde(default)]
    pub style: InvoiceStyle,
}

/// 保存请求; overwrite 表示编号重复时仍然保存
#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub invoice: InvoiceData,
    #[serde(default)]
    pub style: InvoiceStyle,
    #[serde(default)]
    pub overwrite: bool,
}

/// 发送请求: 未给出的字段按已保存发票生成默认值
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub invoice_number: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub total: f64,
    pub to: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub pdf_url: Option<String>,
}

impl SendRequest {
    fn into_draft(self) -> EmailDraft {
        let saved = SavedInvoice {
            invoice_number: self.invoice_number,
            client_name: self.client_name,
            client_email: self.client_email,
            total: self.total,
            pdf_url: self.pdf_url,
            ..SavedInvoice::default()
        };
        let mut draft = EmailDraft::for_invoice(&saved);
        if let Some(to) = self.to {
            draft.to = to;
        }
        if let Some(subject) = self.subject {
            draft.subject = subject;
        }
        if let Some(message) = self.message {
            draft.message = message;
        }
        draft
    }
}

#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    #[serde(flatten)]
    pub page: Page<SavedInvoice>,
    pub summary: String,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn list_templates() -> Response {
    (StatusCode::OK, Json(template_catalog())).into_response()
}

/// HTML 预览
pub async fn render_preview(
    State(state): State<AppState>,
    Json(req): Json<InvoiceRequest>,
) -> Result<Html<String>, ApiError> {
    let view = render(&req.invoice, &req.style, &req.invoice.totals());
    let html = state
        .actions
        .exporter()
        .render_html(&view, &req.invoice.invoice_number)?;
    Ok(Html(html))
}

/// 下载文档
pub async fn export_document(
    State(state): State<AppState>,
    Json(req): Json<InvoiceRequest>,
) -> Result<Response, ApiError> {
    let (document, _notice) = state.actions.download(&req.invoice, &req.style)?;
    let disposition = format!("attachment; filename=\"{}\"", document.file_name);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format!("{}; charset=utf-8", document.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}

/// 保存发票
pub async fn save_invoice(
    State(state): State<AppState>,
    Json(req): Json<SaveRequest>,
) -> Result<Response, ApiError> {
    let overwrite = req.overwrite;
    let confirm = move |_: &str| overwrite;
    let notice = state.actions.save(&req.invoice, &req.style, &confirm).await?;
    Ok((StatusCode::OK, Json(notice)).into_response())
}

/// 发送邮件
pub async fn send_email(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<Response, ApiError> {
    let draft = req.into_draft();
    let notice = state.actions.send_email(&draft).await?;
    Ok((StatusCode::OK, Json(notice)).into_response())
}

/// 已保存发票列表
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<InvoiceQuery>,
) -> Response {
    let invoices = load_saved_invoices(state.backend.as_ref()).await;
    let page = query_invoices(&invoices, &query, state.config.page_size);
    let summary = page.summary();
    (StatusCode::OK, Json(InvoiceListResponse { page, summary })).into_response()
}

/// 过滤后的列表导出 CSV (不分页)
pub async fn export_invoices_csv(
    State(state): State<AppState>,
    Query(query): Query<InvoiceQuery>,
) -> Result<Response, ApiError> {
    let invoices = load_saved_invoices(state.backend.as_ref()).await;
    let rows = filter_invoices(&invoices, query.filter, query.q.as_deref().unwrap_or(""));
    let bytes = invoices_to_csv(&rows)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"invoices.csv\""),
        ],
        bytes,
    )
        .into_response())
}

/// 邮件发送日志
pub async fn list_emails(State(state): State<AppState>) -> Response {
    let emails = load_sent_emails(state.backend.as_ref()).await;
    (StatusCode::OK, Json(emails)).into_response()
}

pub async fn history(State(state): State<AppState>) -> Response {
    let history = load_history(state.backend.as_ref()).await;
    (StatusCode::OK, Json(history)).into_response()
}

/// 看板
pub async fn dashboard(
    State(state): State<AppState>,
    Query(filter): Query<DashboardFilter>,
) -> Response {
    let invoices = load_saved_invoices(state.backend.as_ref()).await;
    (StatusCode::OK, Json(build_dashboard(&invoices, &filter))).into_response()
}
