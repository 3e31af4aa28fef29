use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::invoice::{BankDetails, InvoiceItem};

/// 已保存发票的扁平投影, 字段逐个宽松解码
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedInvoice {
    pub invoice_number: String,
    pub client_name: String,
    pub total: f64,
    pub date: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    pub client_email: String,
    pub email_status: String,
    pub client_address: String,
    #[serde(rename = "clientVAT")]
    pub client_vat: String,
    pub ship_to_address: String,
    pub due_date: String,
    pub lpo_no: String,
    pub lpo_date: String,
    pub payment_terms: String,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub notes: String,
    /// 明细, JSON 文本
    pub items: String,
    /// 银行信息, JSON 文本
    pub bank_details: String,
}

fn text(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn number(record: &Value, key: &str) -> f64 {
    match record.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// 状态字符串是否表示已发送 ("yes" / "sent" / "true", 忽略大小写和首尾空白)
pub fn is_email_sent(status: &str) -> bool {
    matches!(
        status.trim().to_ascii_lowercase().as_str(),
        "yes" | "sent" | "true"
    )
}

impl SavedInvoice {
    /// 从任意 JSON 记录解码; 缺失或类型不符的字段取默认值
    pub fn from_record(record: &Value) -> Self {
        let pdf_url = match record.get("imageUrl") {
            Some(Value::String(url)) if url.starts_with("http") => Some(url.clone()),
            _ => None,
        };

        Self {
            invoice_number: text(record, "invoiceNumber").unwrap_or_default(),
            client_name: text(record, "clientName").unwrap_or_default(),
            total: number(record, "total"),
            date: text(record, "invoiceDate").unwrap_or_default(),
            status: text(record, "status").unwrap_or_default(),
            pdf_url,
            client_email: text(record, "clientEmail")
                .or_else(|| text(record, "clientemail"))
                .unwrap_or_default(),
            email_status: text(record, "gmailStatus")
                .or_else(|| text(record, "gmailstatus"))
                .unwrap_or_else(|| "no".to_string()),
            client_address: text(record, "clientAddress").unwrap_or_default(),
            client_vat: text(record, "clientVAT").unwrap_or_default(),
            ship_to_address: text(record, "shipToAddress").unwrap_or_default(),
            due_date: text(record, "dueDate").unwrap_or_default(),
            lpo_no: text(record, "lpoNo").unwrap_or_default(),
            lpo_date: text(record, "lpoDate").unwrap_or_default(),
            payment_terms: text(record, "paymentTerms").unwrap_or_default(),
            subtotal: number(record, "subtotal"),
            tax_amount: number(record, "taxAmount"),
            notes: text(record, "notes").unwrap_or_default(),
            items: text(record, "items").unwrap_or_else(|| "[]".to_string()),
            bank_details: text(record, "bankDetails").unwrap_or_else(|| "{}".to_string()),
        }
    }

    pub fn is_sent(&self) -> bool {
        is_email_sent(&self.email_status)
    }

    /// 惰性解析明细文本, 失败返回空
    pub fn line_items(&self) -> Vec<InvoiceItem> {
        match serde_json::from_str::<Vec<InvoiceItem>>(&self.items) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Invoice {} has unreadable items: {}", self.invoice_number, e);
                Vec::new()
            }
        }
    }

    /// 惰性解析银行信息, 失败返回空记录
    pub fn bank(&self) -> BankDetails {
        serde_json::from_str(&self.bank_details).unwrap_or_else(|e| {
            tracing::warn!("Invoice {} has unreadable bank details: {}", self.invoice_number, e);
            BankDetails::default()
        })
    }
}

/// 已发送邮件日志条目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentEmail {
    pub invoice_number: String,
    pub client_email: String,
    pub subject: String,
    pub sent_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
}

impl SentEmail {
    pub fn from_record(record: &Value) -> Self {
        Self {
            invoice_number: text(record, "invoiceNumber").unwrap_or_default(),
            client_email: text(record, "clientEmail").unwrap_or_default(),
            subject: text(record, "subject").unwrap_or_default(),
            sent_at: text(record, "sentAt").unwrap_or_default(),
            pdf_url: text(record, "pdfUrl").filter(|u| !u.is_empty()),
        }
    }
}

fn preview(body: &str) -> String {
    body.chars().take(100).collect()
}

/// 解析 JSON 数组文本, 非数组或解析失败视为空
fn decode_array(body: &str, what: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(rows)) => rows,
        Ok(_) => {
            tracing::warn!("{} response is not an array: {}", what, preview(body));
            Vec::new()
        }
        Err(e) => {
            tracing::warn!("Failed to parse {} response ({}): {}", what, e, preview(body));
            Vec::new()
        }
    }
}

pub fn decode_saved_invoices(body: &str) -> Vec<SavedInvoice> {
    decode_array(body, "invoices")
        .iter()
        .filter(|row| !row.is_null())
        .map(SavedInvoice::from_record)
        .collect()
}

pub fn decode_sent_emails(body: &str) -> Vec<SentEmail> {
    decode_array(body, "emails")
        .iter()
        .filter(|row| !row.is_null())
        .map(SentEmail::from_record)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_classification() {
        for s in ["yes", "SENT", " True ", "Yes"] {
            assert!(is_email_sent(s), "{s}");
        }
        for s in ["", "no", "pending", "sent!", "1"] {
            assert!(!is_email_sent(s), "{s}");
        }
    }

    #[test]
    fn record_fields_fall_back_to_defaults() {
        let inv = SavedInvoice::from_record(&json!({ "invoiceNumber": "INV-1" }));
        assert_eq!(inv.invoice_number, "INV-1");
        assert_eq!(inv.total, 0.0);
        assert_eq!(inv.email_status, "no");
        assert_eq!(inv.items, "[]");
        assert_eq!(inv.bank_details, "{}");
        assert!(inv.pdf_url.is_none());
        assert!(!inv.is_sent());
    }

    #[test]
    fn record_accepts_loose_shapes() {
        let inv = SavedInvoice::from_record(&json!({
            "invoiceNumber": 42,
            "total": "105.50",
            "subtotal": "abc",
            "taxAmount": 5,
            "invoiceDate": "2024-02-01",
            "clientemail": "a@b.c",
            "gmailstatus": "Sent",
            "imageUrl": "data:image/png;base64,xx"
        }));
        assert_eq!(inv.invoice_number, "42");
        assert_eq!(inv.total, 105.5);
        assert_eq!(inv.subtotal, 0.0);
        assert_eq!(inv.tax_amount, 5.0);
        assert_eq!(inv.date, "2024-02-01");
        assert_eq!(inv.client_email, "a@b.c");
        assert!(inv.is_sent());
        assert!(inv.pdf_url.is_none());

        let inv = SavedInvoice::from_record(&json!({ "imageUrl": "https://x/y.png" }));
        assert_eq!(inv.pdf_url.as_deref(), Some("https://x/y.png"));
    }

    #[test]
    fn malformed_bodies_decode_to_empty() {
        assert!(decode_saved_invoices("<html>502</html>").is_empty());
        assert!(decode_saved_invoices("{\"a\":1}").is_empty());
        assert!(decode_sent_emails("").is_empty());
    }

    #[test]
    fn null_rows_are_skipped() {
        let rows = decode_saved_invoices(r#"[null, {"invoiceNumber":"A"}, null]"#);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].invoice_number, "A");
    }

    #[test]
    fn nested_payloads_fall_back_to_empty() {
        let mut inv = SavedInvoice::from_record(&json!({
            "items": "[{\"id\":\"1\",\"description\":\"Cable\",\"qty\":2,\"rate\":5,\"taxPercent\":5,\"amount\":10}]",
            "bankDetails": "{\"bankName\":\"RAK Bank\"}"
        }));
        assert_eq!(inv.line_items().len(), 1);
        assert_eq!(inv.line_items()[0].description, "Cable");
        assert_eq!(inv.bank().bank_name, "RAK Bank");

        inv.items = "not json".into();
        inv.bank_details = "[1,2".into();
        assert!(inv.line_items().is_empty());
        assert_eq!(inv.bank(), BankDetails::default());
    }

    #[test]
    fn sent_emails_decode_in_order() {
        let emails = decode_sent_emails(
            r#"[{"invoiceNumber":"A","clientEmail":"x@y","subject":"s","sentAt":"2024-01-01T00:00:00Z"},
                {"invoiceNumber":"B"}]"#,
        );
        assert_eq!(emails.len(), 2);
        assert_eq!(emails[0].client_email, "x@y");
        assert_eq!(emails[1].invoice_number, "B");
        assert!(emails[1].sent_at.is_empty());
    }
}
