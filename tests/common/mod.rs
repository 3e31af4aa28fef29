#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use invoice_desk::client::{EmailLogEntry, InvoiceBackend, SaveInvoiceRecord, SendEmailRequest};
use invoice_desk::error::ClientError;

/// 内存存储, 记录所有调用
#[derive(Default)]
pub struct MemoryBackend {
    pub invoices_body: Mutex<String>,
    pub emails_body: Mutex<String>,
    pub calls: Mutex<Vec<&'static str>>,
    pub saved: Mutex<Vec<SaveInvoiceRecord>>,
    pub sent: Mutex<Vec<SendEmailRequest>>,
    pub logged: Mutex<Vec<EmailLogEntry>>,
    pub fail_save: bool,
    pub fail_send: bool,
    pub fail_log: bool,
    pub save_delay: Option<Duration>,
}

impl MemoryBackend {
    pub fn with_invoices(body: &str) -> Self {
        Self {
            invoices_body: Mutex::new(body.to_string()),
            emails_body: Mutex::new("[]".to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

fn upstream_error() -> ClientError {
    ClientError::Status {
        status: 500,
        body: "sheet unavailable".to_string(),
    }
}

#[async_trait]
impl InvoiceBackend for MemoryBackend {
    async fn fetch_invoices(&self) -> Result<String, ClientError> {
        self.record("fetch_invoices");
        Ok(self.invoices_body.lock().unwrap().clone())
    }

    async fn fetch_emails(&self) -> Result<String, ClientError> {
        self.record("fetch_emails");
        Ok(self.emails_body.lock().unwrap().clone())
    }

    async fn save_invoice(&self, record: &SaveInvoiceRecord) -> Result<(), ClientError> {
        self.record("save_invoice");
        if let Some(delay) = self.save_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_save {
            return Err(upstream_error());
        }
        self.saved.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn send_email(&self, request: &SendEmailRequest) -> Result<(), ClientError> {
        self.record("send_email");
        if self.fail_send {
            return Err(upstream_error());
        }
        self.sent.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn log_email(&self, entry: &EmailLogEntry) -> Result<(), ClientError> {
        self.record("log_email");
        if self.fail_log {
            return Err(upstream_error());
        }
        self.logged.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

pub const SAVED_INVOICES: &str = r#"[
    {"invoiceNumber": "INV-001", "clientName": "Acme Trading", "total": 105, "invoiceDate": "2026-01-10", "gmailStatus": "yes", "clientEmail": "ap@acme.test"},
    {"invoiceNumber": "INV-002", "clientName": "Blue Sea LLC", "total": "52.5", "invoiceDate": "2026-01-12", "gmailStatus": "no"},
    null,
    {"invoiceNumber": "INV-003", "clientName": "Acme Trading", "total": 210, "invoiceDate": "2026-02-01", "gmailstatus": "Sent"}
]"#;
