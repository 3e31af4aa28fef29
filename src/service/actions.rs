use chrono::{SecondsFormat, Utc};
use dashmap::DashSet;
use std::sync::Arc;

use crate::client::{EmailLogEntry, InvoiceBackend, SaveInvoiceRecord, SendEmailRequest};
use crate::error::{ActionError, ClientError, Notice};
use crate::models::money::money_f64;
use crate::models::{decode_saved_invoices, InvoiceData, InvoiceStyle, SavedInvoice};
use crate::service::export::{ExportedDocument, HtmlExporter};

/// 编号重复时询问是否仍然保存
pub trait ConfirmOverride: Send + Sync {
    fn confirm_override(&self, invoice_number: &str) -> bool;
}

impl<F> ConfirmOverride for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm_override(&self, invoice_number: &str) -> bool {
        self(invoice_number)
    }
}

fn normalize_number(number: &str) -> String {
    number.trim().to_lowercase()
}

/// 去首尾空白后忽略大小写比较发票号
pub fn is_duplicate_number(existing: &[SavedInvoice], candidate: &str) -> bool {
    let candidate = normalize_number(candidate);
    existing
        .iter()
        .any(|inv| normalize_number(&inv.invoice_number) == candidate)
}

/// 按发票号的进行中标记, drop 时释放; 不同发票互不阻塞
struct BusyGuard<'a> {
    in_flight: &'a DashSet<String>,
    key: String,
}

impl<'a> BusyGuard<'a> {
    fn acquire(in_flight: &'a DashSet<String>, invoice_number: &str, action: &'static str) -> Result<Self, ActionError> {
        let key = normalize_number(invoice_number);
        if !in_flight.insert(key.clone()) {
            return Err(ActionError::Busy(action));
        }
        Ok(Self { in_flight, key })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.key);
    }
}

/// 邮件草稿, 默认值取自已保存发票
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    pub invoice_number: String,
    pub to: String,
    pub subject: String,
    pub message: String,
    pub pdf_url: Option<String>,
}

impl EmailDraft {
    pub fn for_invoice(invoice: &SavedInvoice) -> Self {
        let client = if invoice.client_name.is_empty() {
            "Customer"
        } else {
            invoice.client_name.as_str()
        };

        Self {
            invoice_number: invoice.invoice_number.clone(),
            to: invoice.client_email.clone(),
            subject: format!("Invoice {}", invoice.invoice_number),
            message: format!(
                "Dear {},\n\nPlease find attached invoice {} for AED {}.\n\nBest regards,\nAl Zajed Technologies",
                client,
                invoice.invoice_number,
                money_f64(invoice.total)
            ),
            pdf_url: invoice.pdf_url.clone(),
        }
    }
}

/// 导出 / 保存 / 发送邮件
pub struct InvoiceActions {
    backend: Arc<dyn InvoiceBackend>,
    exporter: HtmlExporter,
    saving: DashSet<String>,
    sending: DashSet<String>,
}

impl InvoiceActions {
    pub fn new(backend: Arc<dyn InvoiceBackend>, exporter: HtmlExporter) -> Self {
        Self {
            backend,
            exporter,
            saving: DashSet::new(),
            sending: DashSet::new(),
        }
    }

    /// 该发票是否正在保存
    pub fn is_saving(&self, invoice_number: &str) -> bool {
        self.saving.contains(&normalize_number(invoice_number))
    }

    pub fn is_sending(&self, invoice_number: &str) -> bool {
        self.sending.contains(&normalize_number(invoice_number))
    }

    pub fn exporter(&self) -> &HtmlExporter {
        &self.exporter
    }

    /// 下载: 只渲染, 不访问远端
    pub fn download(&self, invoice: &InvoiceData, style: &InvoiceStyle) -> Result<(ExportedDocument, Notice), ActionError> {
        let document = self.exporter.export(invoice, style)?;
        Ok((document, Notice::success("Downloaded!", "Invoice document saved.")))
    }

    /// 重新拉取已保存发票检查编号; 拉取或解析失败只记日志, 视为不重复
    async fn duplicate_exists(&self, invoice_number: &str) -> bool {
        match self.backend.fetch_invoices().await {
            Ok(body) => is_duplicate_number(&decode_saved_invoices(&body), invoice_number),
            Err(e) => {
                tracing::warn!("Duplicate check fetch failed: {}", e);
                false
            }
        }
    }

    /// 保存发票
    ///
    /// 缺少客户名时本地拒绝, 不发请求. 编号重复且 `confirm` 拒绝时中止.
    pub async fn save(
        &self,
        invoice: &InvoiceData,
        style: &InvoiceStyle,
        confirm: &dyn ConfirmOverride,
    ) -> Result<Notice, ActionError> {
        if invoice.bill_to.name.trim().is_empty() {
            return Err(ActionError::MissingClient);
        }

        let _busy = BusyGuard::acquire(&self.saving, &invoice.invoice_number, "save")?;

        if self.duplicate_exists(&invoice.invoice_number).await
            && !confirm.confirm_override(&invoice.invoice_number)
        {
            tracing::info!("Save of {} cancelled: duplicate number", invoice.invoice_number);
            return Err(ActionError::DuplicateDeclined(invoice.invoice_number.clone()));
        }

        let document = self.exporter.export(invoice, style)?;
        let record = SaveInvoiceRecord::from_invoice(invoice, &invoice.totals(), document.data_url())
            .map_err(|e| ActionError::Save(ClientError::from(e)))?;

        tracing::info!(
            "Saving invoice {} for {} (total {})",
            record.invoice_number,
            record.client_name,
            record.total
        );
        self.backend.save_invoice(&record).await.map_err(|e| {
            tracing::error!("Save invoice error: {}", e);
            ActionError::Save(e)
        })?;

        Ok(Notice::success(
            "Saved to Google Sheets!",
            "Invoice saved, PDF generated & uploaded to Drive.",
        ))
    }

    /// 发送邮件; 成功后尽力写邮件日志, 日志失败不影响结果
    pub async fn send_email(&self, draft: &EmailDraft) -> Result<Notice, ActionError> {
        let to = draft.to.trim();
        if to.is_empty() {
            return Err(ActionError::Validation("Please enter recipient email.".to_string()));
        }

        let _busy = BusyGuard::acquire(&self.sending, &draft.invoice_number, "send")?;

        let request = SendEmailRequest {
            invoice_number: draft.invoice_number.clone(),
            to: to.to_string(),
            subject: draft.subject.clone(),
            message: draft.message.clone(),
            pdf_url: draft.pdf_url.clone(),
        };
        self.backend.send_email(&request).await.map_err(|e| {
            tracing::error!("Send email error: {}", e);
            ActionError::Send(e)
        })?;

        let entry = EmailLogEntry {
            invoice_number: request.invoice_number.clone(),
            client_email: request.to.clone(),
            subject: request.subject.clone(),
            sent_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        if let Err(e) = self.backend.log_email(&entry).await {
            tracing::error!("Failed to log email: {}", e);
        }

        tracing::info!("Invoice {} emailed to {}", request.invoice_number, request.to);
        Ok(Notice::success("Sent!", format!("Invoice emailed to {}.", request.to)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(number: &str) -> SavedInvoice {
        SavedInvoice {
            invoice_number: number.into(),
            ..SavedInvoice::default()
        }
    }

    #[test]
    fn duplicate_check_ignores_case_and_padding() {
        let existing = vec![saved("INV-001"), saved("INV-002")];
        assert!(is_duplicate_number(&existing, "inv-001 "));
        assert!(is_duplicate_number(&existing, "  INV-002"));
        assert!(!is_duplicate_number(&existing, "INV-0010"));
        assert!(!is_duplicate_number(&[], "INV-001"));
    }

    #[test]
    fn busy_guard_is_per_invoice_and_released_on_drop() {
        let in_flight = DashSet::new();
        {
            let _held = BusyGuard::acquire(&in_flight, "INV-1", "save").unwrap();
            assert!(matches!(
                BusyGuard::acquire(&in_flight, " inv-1", "save"),
                Err(ActionError::Busy("save"))
            ));
            let other = BusyGuard::acquire(&in_flight, "INV-2", "save");
            assert!(other.is_ok());
        }
        assert!(in_flight.is_empty());
        assert!(BusyGuard::acquire(&in_flight, "INV-1", "save").is_ok());
    }

    #[test]
    fn draft_defaults_greet_client() {
        let mut inv = saved("INV-9");
        inv.total = 105.5;
        inv.client_email = "ap@acme.test".into();
        let draft = EmailDraft::for_invoice(&inv);
        assert_eq!(draft.subject, "Invoice INV-9");
        assert_eq!(draft.to, "ap@acme.test");
        assert!(draft.message.starts_with("Dear Customer,\n\n"));
        assert!(draft.message.contains("invoice INV-9 for AED 105.50."));

        inv.client_name = "Acme".into();
        assert!(EmailDraft::for_invoice(&inv).message.starts_with("Dear Acme,"));
    }

    #[test]
    fn closures_can_confirm() {
        let always = |_: &str| true;
        assert!(always.confirm_override("X"));
    }
}
