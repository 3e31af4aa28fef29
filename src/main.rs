use invoice_desk::{api, AppConfig};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置, 配置文件有误时退回环境变量
    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), falling back to environment", e);
        AppConfig::from_env()
    });
    info!(
        "Starting server on {}:{} (page size {}, timeout {}s)",
        config.server.host, config.server.port, config.page_size, config.request_timeout_secs
    );

    let hooks = &config.webhooks;
    for (name, url) in [
        ("SAVE_INVOICE_URL", &hooks.save_invoice_url),
        ("FETCH_INVOICES_URL", &hooks.fetch_invoices_url),
        ("SEND_EMAIL_URL", &hooks.send_email_url),
        ("LOG_EMAIL_URL", &hooks.log_email_url),
        ("FETCH_EMAILS_URL", &hooks.fetch_emails_url),
    ] {
        if url.is_none() {
            tracing::warn!("{} not configured", name);
        }
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = api::AppState::from_config(config)?;

    // 构建路由
    let app = api::router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    // 启动服务器
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /api/fetch-invoices | /api/fetch-emails   - webhook proxy");
    info!("  POST /api/save-invoice | /api/send-email | /api/log-email - webhook proxy");
    info!("  POST /api/render | /api/export                 - preview / download");
    info!("  GET  /api/invoices | /api/emails | /api/dashboard");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
