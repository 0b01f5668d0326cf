use std::fmt;

use indexmap::IndexMap;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("load config: {0}")]
    LoadConfig(#[source] toml::de::Error),

    #[error("build request url: {0}")]
    BuildUrl(#[source] url::ParseError),

    #[error("send request: {0}")]
    SendRequest(#[source] reqwest::Error),

    #[error("parse response: {0}")]
    ParseResponse(#[source] reqwest::Error),

    #[error("parse error response: {0} {1}")]
    ParseErrorResponse(StatusCode, #[source] reqwest::Error),

    #[error("error response: {0} {1}")]
    ErrorResponse(StatusCode, ErrorResponse),

    #[error("unexpected api status: {0}")]
    UnexpectedApiStatus(StatusCode),

    #[error("rate limited until epoch second {reset}")]
    RateLimited { reset: u64 },

    #[error("user {user_id} is private")]
    PrivateUser { user_id: String },

    #[error("user {user_id} not found")]
    UserNotFound { user_id: String },

    #[error("fetch friends of {user_id}: status {status}")]
    FetchFailed { user_id: String, status: StatusCode },
}

impl ApiError {
    /// Status code of the api response this error was built from, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::ParseErrorResponse(status, _)
            | Self::ErrorResponse(status, _)
            | Self::UnexpectedApiStatus(status) => Some(*status),
            Self::RateLimited { .. } => Some(StatusCode::TOO_MANY_REQUESTS),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,

    #[serde(flatten)]
    pub data: IndexMap<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<i64>,

    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            match error.code {
                Some(code) => write!(f, "{} ({})", error.message, code)?,
                None => write!(f, "{}", error.message)?,
            }
        }
        if !self.data.is_empty() {
            write!(f, " {:?}", self.data)?;
        }
        Ok(())
    }
}
