use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub webhooks: WebhookConfig,
    /// 共享密钥, 仅透传给 save/send webhook
    #[serde(default, skip_serializing)]
    pub admin_password: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// 页眉 logo 图片地址 (URL 或 data URL)
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 远端表格存储的 webhook 地址, 未配置的端点返回 500
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub save_invoice_url: Option<String>,
    pub fetch_invoices_url: Option<String>,
    pub send_email_url: Option<String>,
    pub log_email_url: Option<String>,
    pub fetch_emails_url: Option<String>,
}

fn default_page_size() -> usize {
    10
}

fn default_timeout() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            webhooks: WebhookConfig::default(),
            admin_password: None,
            page_size: default_page_size(),
            request_timeout_secs: default_timeout(),
            logo_url: None,
        }
    }
}

impl AppConfig {
    /// 分层加载: 默认值 -> invoice-desk.toml (可选) -> INVOICE_DESK__* 环境变量 -> 部署用的扁平环境变量
    pub fn load() -> Result<Self, config::ConfigError> {
        let config: AppConfig = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("page_size", default_page_size() as i64)?
            .set_default("request_timeout_secs", default_timeout() as i64)?
            .add_source(config::File::with_name("invoice-desk").required(false))
            .add_source(
                config::Environment::with_prefix("INVOICE_DESK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config.with_env_overrides())
    }

    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        let hooks = &mut self.webhooks;
        override_from_env(&mut hooks.save_invoice_url, "SAVE_INVOICE_URL");
        override_from_env(&mut hooks.fetch_invoices_url, "FETCH_INVOICES_URL");
        override_from_env(&mut hooks.send_email_url, "SEND_EMAIL_URL");
        override_from_env(&mut hooks.log_email_url, "LOG_EMAIL_URL");
        override_from_env(&mut hooks.fetch_emails_url, "FETCH_EMAILS_URL");
        override_from_env(&mut self.admin_password, "ADMIN_PASSWORD");
        override_from_env(&mut self.logo_url, "LOGO_URL");

        if self.page_size == 0 {
            self.page_size = default_page_size();
        }
        self
    }
}

fn override_from_env(slot: &mut Option<String>, name: &str) {
    if let Ok(value) = std::env::var(name) {
        if !value.trim().is_empty() {
            *slot = Some(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_no_webhooks_and_ten_rows_per_page() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.page_size, 10);
        assert!(config.webhooks.save_invoice_url.is_none());
        assert!(config.admin_password.is_none());
    }

    #[test]
    fn admin_password_is_never_serialized() {
        let config = AppConfig {
            admin_password: Some("secret".to_string()),
            ..AppConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
