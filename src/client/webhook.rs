use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::{EmailLogEntry, InvoiceBackend, SaveInvoiceRecord, SendEmailRequest};
use crate::config::{AppConfig, WebhookConfig};
use crate::error::ClientError;

/// webhook 端点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    SaveInvoice,
    FetchInvoices,
    SendEmail,
    LogEmail,
    FetchEmails,
}

impl Endpoint {
    /// 环境变量名前缀, 错误信息里拼成 `<NAME>_URL`
    pub fn env_name(self) -> &'static str {
        match self {
            Endpoint::SaveInvoice => "SAVE_INVOICE",
            Endpoint::FetchInvoices => "FETCH_INVOICES",
            Endpoint::SendEmail => "SEND_EMAIL",
            Endpoint::LogEmail => "LOG_EMAIL",
            Endpoint::FetchEmails => "FETCH_EMAILS",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Endpoint::FetchInvoices | Endpoint::FetchEmails => Method::GET,
            _ => Method::POST,
        }
    }

    /// 需要注入共享密钥的端点
    pub fn carries_password(self) -> bool {
        matches!(self, Endpoint::SaveInvoice | Endpoint::SendEmail)
    }

    fn url(self, hooks: &WebhookConfig) -> Option<&str> {
        let url = match self {
            Endpoint::SaveInvoice => &hooks.save_invoice_url,
            Endpoint::FetchInvoices => &hooks.fetch_invoices_url,
            Endpoint::SendEmail => &hooks.send_email_url,
            Endpoint::LogEmail => &hooks.log_email_url,
            Endpoint::FetchEmails => &hooks.fetch_emails_url,
        };
        url.as_deref()
    }
}

/// 服务端密钥优先, 其次保留请求体里的 password
fn inject_password(body: &mut Value, admin_password: Option<&str>) {
    let Value::Object(map) = body else {
        return;
    };
    if let Some(secret) = admin_password {
        map.insert("password".to_string(), Value::String(secret.to_string()));
    }
}

/// 基于 reqwest 的 webhook 客户端
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: Client,
    hooks: WebhookConfig,
    admin_password: Option<String>,
}

impl WebhookClient {
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            hooks: config.webhooks.clone(),
            admin_password: config.admin_password.clone(),
        })
    }

    fn url(&self, endpoint: Endpoint) -> Result<&str, ClientError> {
        endpoint
            .url(&self.hooks)
            .ok_or(ClientError::NotConfigured(endpoint.env_name()))
    }

    async fn send(&self, endpoint: Endpoint, body: Option<Value>) -> Result<Response, ClientError> {
        let url = self.url(endpoint)?;
        let mut request = self.http.request(endpoint.method(), url);

        if let Some(mut body) = body {
            if endpoint.carries_password() {
                inject_password(&mut body, self.admin_password.as_deref());
            }
            request = request.json(&body);
        }

        tracing::debug!("{} {} -> {}", endpoint.method(), endpoint.env_name(), url);
        Ok(request.send().await?)
    }

    /// 代理转发: 原样返回上游状态码与 JSON
    pub async fn forward(&self, endpoint: Endpoint, body: Option<Value>) -> Result<(u16, Value), ClientError> {
        let response = self.send(endpoint, body).await?;
        let status = response.status().as_u16();
        let payload = response.json::<Value>().await?;
        Ok((status, payload))
    }

    async fn post<T: Serialize + ?Sized>(&self, endpoint: Endpoint, payload: &T) -> Result<(), ClientError> {
        let body = serde_json::to_value(payload)?;
        let response = self.send(endpoint, Some(body)).await?;
        ensure_success(response).await.map(|_| ())
    }

    async fn get_text(&self, endpoint: Endpoint) -> Result<String, ClientError> {
        let response = self.send(endpoint, None).await?;
        ensure_success(response).await
    }
}

/// 非 2xx 时带上响应文本报错, 成功时返回响应文本
async fn ensure_success(response: Response) -> Result<String, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(ClientError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl InvoiceBackend for WebhookClient {
    async fn fetch_invoices(&self) -> Result<String, ClientError> {
        self.get_text(Endpoint::FetchInvoices).await
    }

    async fn fetch_emails(&self) -> Result<String, ClientError> {
        self.get_text(Endpoint::FetchEmails).await
    }

    async fn save_invoice(&self, record: &SaveInvoiceRecord) -> Result<(), ClientError> {
        self.post(Endpoint::SaveInvoice, record).await
    }

    async fn send_email(&self, request: &SendEmailRequest) -> Result<(), ClientError> {
        self.post(Endpoint::SendEmail, request).await
    }

    async fn log_email(&self, entry: &EmailLogEntry) -> Result<(), ClientError> {
        self.post(Endpoint::LogEmail, entry).await
    }
}
