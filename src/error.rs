use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// webhook 调用错误
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}_URL not configured")]
    NotConfigured(&'static str),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{status} {body}")]
    Status { status: u16, body: String },
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

/// 金额转大写错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordsError {
    #[error("amount is negative")]
    Negative,
    #[error("amount exceeds the Billion scale")]
    OutOfRange,
}

/// 导出错误
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// 保存/发送动作的错误, 都可以重试
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Please fill in client name before saving.")]
    MissingClient,
    #[error("{0}")]
    Validation(String),
    #[error("an invoice with number \"{0}\" already exists")]
    DuplicateDeclined(String),
    #[error("{0} already in progress")]
    Busy(&'static str),
    #[error("Failed to generate document. {0}")]
    Export(#[from] ExportError),
    #[error("Failed to save invoice. Save failed: {0}")]
    Save(#[source] ClientError),
    #[error("Failed to send email. Email send failed: {0}")]
    Send(#[source] ClientError),
}

/// 面向用户的提示 (标题 + 描述)
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub destructive: bool,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            destructive: false,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            destructive: true,
        }
    }
}

impl ActionError {
    pub fn notice(&self) -> Notice {
        match self {
            Self::MissingClient => Notice::error("Missing Info", self.to_string()),
            Self::Validation(msg) => Notice::error("Error", msg.clone()),
            Self::DuplicateDeclined(_) => Notice::error("Cancelled", self.to_string()),
            Self::Busy(_) => Notice::error("Busy", self.to_string()),
            Self::Export(_) | Self::Save(_) | Self::Send(_) => Notice::error("Error", self.to_string()),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::MissingClient | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateDeclined(_) => StatusCode::CONFLICT,
            Self::Busy(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Save(_) | Self::Send(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// HTTP 层错误
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Action(e) => {
                let notice = e.notice();
                (
                    e.status(),
                    Json(serde_json::json!({ "error": notice.description, "title": notice.title })),
                )
                    .into_response()
            }
            Self::Export(e) => {
                tracing::error!("Export failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": e.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
