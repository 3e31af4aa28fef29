pub mod handlers;
pub mod proxy;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::client::{InvoiceBackend, WebhookClient};
use crate::config::AppConfig;
use crate::service::{HtmlExporter, InvoiceActions};

pub use handlers::health_check;

/// 共享状态
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// 代理端点直接转发用
    pub webhooks: Arc<WebhookClient>,
    /// 列表/看板/动作使用的存储
    pub backend: Arc<dyn InvoiceBackend>,
    pub actions: Arc<InvoiceActions>,
}

impl AppState {
    /// 生产配置: 存储即 webhook 客户端本身
    pub fn from_config(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let webhooks = Arc::new(WebhookClient::new(&config)?);
        let backend: Arc<dyn InvoiceBackend> = webhooks.clone();
        Self::assemble(config, webhooks, backend)
    }

    /// 替换存储实现, 代理端点仍按配置转发
    pub fn with_backend(
        config: AppConfig,
        backend: Arc<dyn InvoiceBackend>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let webhooks = Arc::new(WebhookClient::new(&config)?);
        Self::assemble(config, webhooks, backend)
    }

    fn assemble(
        config: AppConfig,
        webhooks: Arc<WebhookClient>,
        backend: Arc<dyn InvoiceBackend>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let exporter = HtmlExporter::new()?.with_logo(config.logo_url.clone());
        let actions = Arc::new(InvoiceActions::new(backend.clone(), exporter));

        Ok(Self {
            config: Arc::new(config),
            webhooks,
            backend,
            actions,
        })
    }
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    // webhook 代理
    let proxy_routes = Router::new()
        .route(
            "/api/fetch-invoices",
            get(proxy::fetch_invoices).fallback(proxy::method_not_allowed),
        )
        .route(
            "/api/fetch-emails",
            get(proxy::fetch_emails).fallback(proxy::method_not_allowed),
        )
        .route(
            "/api/save-invoice",
            post(proxy::save_invoice).fallback(proxy::method_not_allowed),
        )
        .route(
            "/api/send-email",
            post(proxy::send_email).fallback(proxy::method_not_allowed),
        )
        .route(
            "/api/log-email",
            post(proxy::log_email).fallback(proxy::method_not_allowed),
        );

    // 编辑器 / 列表 / 看板
    let app_routes = Router::new()
        .route("/api/templates", get(handlers::list_templates))
        .route("/api/render", post(handlers::render_preview))
        .route("/api/export", post(handlers::export_document))
        .route(
            "/api/invoices",
            get(handlers::list_invoices).post(handlers::save_invoice),
        )
        .route("/api/invoices/export.csv", get(handlers::export_invoices_csv))
        .route("/api/emails", get(handlers::list_emails).post(handlers::send_email))
        .route("/api/history", get(handlers::history))
        .route("/api/dashboard", get(handlers::dashboard));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(proxy_routes)
        .merge(app_routes)
        .with_state(state)
}
