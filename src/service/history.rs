use serde::Serialize;

use crate::client::InvoiceBackend;
use crate::models::{decode_saved_invoices, decode_sent_emails, SavedInvoice, SentEmail};

/// 读取已保存发票; 任何失败都降级为空列表
pub async fn load_saved_invoices(backend: &dyn InvoiceBackend) -> Vec<SavedInvoice> {
    match backend.fetch_invoices().await {
        Ok(body) => decode_saved_invoices(&body),
        Err(e) => {
            tracing::warn!("Failed to fetch invoices: {}", e);
            Vec::new()
        }
    }
}

/// 读取邮件发送日志; 任何失败都降级为空列表
pub async fn load_sent_emails(backend: &dyn InvoiceBackend) -> Vec<SentEmail> {
    match backend.fetch_emails().await {
        Ok(body) => decode_sent_emails(&body),
        Err(e) => {
            tracing::warn!("Failed to fetch emails: {}", e);
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    pub invoices: Vec<SavedInvoice>,
    pub emails: Vec<SentEmail>,
}

/// 发票与邮件日志并发拉取
pub async fn load_history(backend: &dyn InvoiceBackend) -> History {
    let (invoices, emails) = futures::join!(load_saved_invoices(backend), load_sent_emails(backend));
    tracing::info!("History loaded: {} invoices, {} emails", invoices.len(), emails.len());
    History { invoices, emails }
}
