pub mod actions;
pub mod dashboard;
pub mod editor;
pub mod export;
pub mod history;
pub mod listing;
pub mod render;
pub mod words;

pub use actions::{is_duplicate_number, ConfirmOverride, EmailDraft, InvoiceActions};
pub use dashboard::{build_dashboard, Dashboard, DashboardFilter};
pub use editor::InvoiceEditor;
pub use export::{export_file_name, invoices_to_csv, ExportedDocument, HtmlExporter};
pub use history::{load_history, load_saved_invoices, load_sent_emails, History};
pub use listing::{
    filter_invoices, in_date_range, matches_search, paginate, query_invoices, InvoiceQuery, Page,
    StatusFilter,
};
pub use render::{render, HeaderView, InvoiceView};
pub use words::{amount_in_words, number_to_words};
