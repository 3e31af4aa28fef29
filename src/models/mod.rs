pub mod invoice;
pub mod money;
pub mod saved;
pub mod style;
pub mod totals;

pub use invoice::{
    BankDetails, BankField, BillToField, ClientInfo, CompanyField, CompanyInfo, InvoiceData,
    InvoiceField, InvoiceItem, ItemField, ShipToField, ShipToInfo, DEFAULT_VAT_PERCENT,
};
pub use saved::{decode_saved_invoices, decode_sent_emails, is_email_sent, SavedInvoice, SentEmail};
pub use style::{
    template_catalog, Decoration, HeaderLayout, InvoiceStyle, PaperSize, StyleField, TemplateEntry,
    TemplateName, TemplatePreset,
};
pub use totals::Totals;
