//! 远端存储协作方: 发票表格, 邮件发送与邮件日志

pub mod webhook;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::models::money::to_f64_rounded;
use crate::models::{InvoiceData, Totals};

pub use webhook::{Endpoint, WebhookClient};

/// 保存到表格的扁平记录, items 和 bankDetails 以 JSON 文本嵌套
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveInvoiceRecord {
    pub invoice_number: String,
    pub invoice_date: String,
    pub due_date: String,
    pub client_name: String,
    pub client_address: String,
    #[serde(rename = "clientVAT")]
    pub client_vat: String,
    pub ship_to_address: String,
    pub lpo_no: String,
    pub lpo_date: String,
    pub payment_terms: String,
    pub items: String,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total: f64,
    pub notes: String,
    pub bank_details: String,
    pub invoice_image: String,
}

impl SaveInvoiceRecord {
    pub fn from_invoice(
        invoice: &InvoiceData,
        totals: &Totals,
        invoice_image: String,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            invoice_number: invoice.invoice_number.clone(),
            invoice_date: invoice.invoice_date.clone(),
            due_date: invoice.due_date.clone(),
            client_name: invoice.bill_to.name.clone(),
            client_address: invoice.bill_to.address.join(", "),
            client_vat: invoice.bill_to.vat_number.clone(),
            ship_to_address: invoice.ship_to.address.join(", "),
            lpo_no: invoice.lpo_no.clone(),
            lpo_date: invoice.lpo_date.clone(),
            payment_terms: invoice.payment_terms.clone(),
            items: serde_json::to_string(&invoice.items)?,
            subtotal: to_f64_rounded(&totals.subtotal),
            tax_amount: to_f64_rounded(&totals.tax_amount),
            total: to_f64_rounded(&totals.total),
            notes: invoice.notes.clone(),
            bank_details: serde_json::to_string(&invoice.bank_details)?,
            invoice_image,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub invoice_number: String,
    pub to: String,
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
}

/// 邮件日志追加项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailLogEntry {
    pub invoice_number: String,
    pub client_email: String,
    pub subject: String,
    pub sent_at: String,
}

/// 远端存储接口
///
/// 读接口返回原始响应文本, 由调用方做宽松解码.
#[async_trait]
pub trait InvoiceBackend: Send + Sync {
    async fn fetch_invoices(&self) -> Result<String, ClientError>;

    async fn fetch_emails(&self) -> Result<String, ClientError>;

    async fn save_invoice(&self, record: &SaveInvoiceRecord) -> Result<(), ClientError>;

    async fn send_email(&self, request: &SendEmailRequest) -> Result<(), ClientError>;

    async fn log_email(&self, entry: &EmailLogEntry) -> Result<(), ClientError>;
}
