use axum::{http::StatusCode, response::IntoResponse, Json};
use pagechat_core::Error;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidParams,
    InvalidUrl,
    FetchFailed,
    ParseFailed,
    NotFound,
}

impl ErrorCode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParams => "invalid_params",
            Self::InvalidUrl => "invalid_url",
            Self::FetchFailed => "fetch_failed",
            Self::ParseFailed => "parse_failed",
            Self::NotFound => "not_found",
        }
    }

    pub(crate) fn status(self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidParams | Self::InvalidUrl | Self::FetchFailed | Self::ParseFailed => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    pub(crate) fn retryable(self) -> bool {
        match self {
            Self::FetchFailed => true,
            Self::InvalidParams | Self::InvalidUrl | Self::ParseFailed | Self::NotFound => false,
        }
    }
}

/// `{ success: false, error, code, retryable }` with the code's HTTP status.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorReply {
    success: bool,
    error: String,
    code: &'static str,
    retryable: bool,
    #[serde(skip)]
    status: StatusCode,
}

impl ErrorReply {
    pub(crate) fn new(code: ErrorCode, message: impl ToString) -> Self {
        Self {
            success: false,
            error: message.to_string(),
            code: code.as_str(),
            retryable: code.retryable(),
            status: code.status(),
        }
    }

    /// User-facing message for a failed scrape.
    pub(crate) fn from_scrape_error(e: &Error) -> Self {
        match e {
            Error::InvalidUrl(_) => Self::new(ErrorCode::InvalidUrl, "Invalid URL format"),
            Error::Fetch(m) => Self::new(
                ErrorCode::FetchFailed,
                format!("Failed to scrape URL: {m}"),
            ),
            Error::Parse(m) => Self::new(
                ErrorCode::ParseFailed,
                format!("Error processing content: {m}"),
            ),
        }
    }
}

impl IntoResponse for ErrorReply {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrape_errors_map_to_user_messages_and_codes() {
        let r = ErrorReply::from_scrape_error(&Error::InvalidUrl("relative".to_string()));
        assert_eq!(r.error, "Invalid URL format");
        assert_eq!(r.code, "invalid_url");
        assert_eq!(r.status, StatusCode::BAD_REQUEST);

        let r = ErrorReply::from_scrape_error(&Error::Fetch("http status 503".to_string()));
        assert_eq!(r.error, "Failed to scrape URL: http status 503");
        assert!(r.retryable);

        let r = ErrorReply::from_scrape_error(&Error::Parse("markup too large".to_string()));
        assert_eq!(r.error, "Error processing content: markup too large");
        assert!(!r.retryable);
    }

    #[test]
    fn not_found_is_404() {
        let r = ErrorReply::new(ErrorCode::NotFound, "No data found for this URL");
        assert_eq!(r.status, StatusCode::NOT_FOUND);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["error"], "No data found for this URL");
        assert_eq!(v["code"], "not_found");
        assert!(v.get("status").is_none());
    }
}
