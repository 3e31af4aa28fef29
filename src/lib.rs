pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use error::{ActionError, ApiError, ClientError, Notice};
pub use service::{InvoiceActions, InvoiceEditor};
