use base64::{engine::general_purpose::STANDARD, Engine};
use tera::{Context, Tera};

use crate::error::ExportError;
use crate::models::money::money_f64;
use crate::models::{InvoiceData, InvoiceStyle, SavedInvoice};
use crate::service::render::{render, InvoiceView};

const TEMPLATE_NAME: &str = "invoice.html";
const TEMPLATE: &str = include_str!("../../templates/invoice.html.tera");

/// 导出的文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportedDocument {
    /// 内嵌到保存记录里的 data URL
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

/// 下载文件名: `Invoice_<编号>.html`, 编号中的 '/' 换成 '_'
pub fn export_file_name(invoice_number: &str) -> String {
    format!("Invoice_{}.html", invoice_number.replace('/', "_"))
}

/// 基于 tera 模板的 HTML 导出器
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    tera: Tera,
    logo_src: Option<String>,
}

impl HtmlExporter {
    pub fn new() -> Result<Self, ExportError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self {
            tera,
            logo_src: None,
        })
    }

    pub fn with_logo(mut self, logo_src: Option<String>) -> Self {
        self.logo_src = logo_src;
        self
    }

    pub fn render_html(&self, view: &InvoiceView, invoice_number: &str) -> Result<String, ExportError> {
        let mut context = Context::new();
        context.insert("view", view);
        context.insert("invoice_number", invoice_number);
        context.insert("logo_src", &self.logo_src);
        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }

    /// 渲染当前发票并打包为可下载文档
    pub fn export(&self, invoice: &InvoiceData, style: &InvoiceStyle) -> Result<ExportedDocument, ExportError> {
        let view = render(invoice, style, &invoice.totals());
        let html = self.render_html(&view, &invoice.invoice_number)?;
        tracing::debug!("Exported invoice {} ({} bytes)", invoice.invoice_number, html.len());

        Ok(ExportedDocument {
            file_name: export_file_name(&invoice.invoice_number),
            content_type: "text/html",
            bytes: html.into_bytes(),
        })
    }
}

/// 已保存发票列表导出为 CSV
pub fn invoices_to_csv(invoices: &[SavedInvoice]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "Invoice Number",
        "Client",
        "Date",
        "Due Date",
        "Subtotal",
        "Tax",
        "Total",
        "Email Status",
    ])?;

    for inv in invoices {
        writer.write_record(&[
            inv.invoice_number.clone(),
            inv.client_name.clone(),
            inv.date.clone(),
            inv.due_date.clone(),
            money_f64(inv.subtotal),
            money_f64(inv.tax_amount),
            money_f64(inv.total),
            if inv.is_sent() { "Sent" } else { "Not Sent" }.to_string(),
        ])?;
    }

    writer.flush().map_err(csv::Error::from)?;
    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))
}
