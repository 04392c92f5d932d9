use thiserror::Error;

/// Coarse classification of [`Error`], used at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required credential is missing.
    Configuration,
    /// Caller input is malformed or incomplete.
    Validation,
    /// A third-party service answered, but not with something usable.
    Upstream,
    /// The call never produced a decodable answer.
    Network,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Validation(String),

    #[error("Upstream error (status {status:?}): {}", .message.as_deref().unwrap_or("no message"))]
    Upstream {
        status: Option<u16>,
        message: Option<String>,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Upstream { .. } => ErrorKind::Upstream,
            Error::Http(_) | Error::Serialization(_) => ErrorKind::Network,
        }
    }

    /// Message to show a user. Transport and decode failures never leak
    /// their internals; they fall back to `default`.
    pub fn message_or(&self, default: &str) -> String {
        match self {
            Error::Configuration(msg) | Error::Validation(msg) => msg.clone(),
            Error::Upstream { message: Some(msg), .. } => msg.clone(),
            _ => default.to_string(),
        }
    }

    /// Like [`Error::message_or`], but transport and decode failures report
    /// their own text. Used where the failure reason is worth showing.
    pub fn detail_or(&self, default: &str) -> String {
        match self {
            Error::Http(_) | Error::Serialization(_) => self.to_string(),
            _ => self.message_or(default),
        }
    }

    /// HTTP status reported by the upstream service, if it answered at all.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    /// Builds an [`Error::Upstream`] from a non-2xx status and its raw body.
    ///
    /// Providers disagree on where they put the message, so this accepts
    /// `{"message": ".."}`, `{"error": {"message": ".."}}` and `{"error": ".."}`.
    pub fn from_upstream_body(status: u16, body: &serde_json::Value) -> Self {
        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| {
                body.get("error").and_then(|e| {
                    e.as_str()
                        .or_else(|| e.get("message").and_then(|m| m.as_str()))
                })
            })
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        Error::Upstream {
            status: Some(status),
            message,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_or_prefers_provider_message() {
        let err = Error::from_upstream_body(429, &json!({ "message": "rate limited" }));
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert_eq!(err.upstream_status(), Some(429));
        assert_eq!(err.message_or("fallback"), "rate limited");
    }

    #[test]
    fn test_nested_error_message() {
        let err = Error::from_upstream_body(400, &json!({ "error": { "message": "bad model" } }));
        assert_eq!(err.message_or("fallback"), "bad model");

        let err = Error::from_upstream_body(401, &json!({ "error": "unauthorized" }));
        assert_eq!(err.message_or("fallback"), "unauthorized");
    }

    #[test]
    fn test_message_or_falls_back() {
        let err = Error::from_upstream_body(500, &json!({ "message": 42 }));
        assert_eq!(err.message_or("fallback"), "fallback");

        let err = Error::from_upstream_body(500, &json!({ "message": "" }));
        assert_eq!(err.message_or("fallback"), "fallback");

        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = Error::from(parse);
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(err.message_or("fallback"), "fallback");
    }

    #[test]
    fn test_detail_or_reports_decode_failures() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = Error::from(parse);
        let detail = err.detail_or("fallback");
        assert!(detail.starts_with("Serialization error: "), "{}", detail);

        let err = Error::Upstream { status: Some(200), message: None };
        assert_eq!(err.detail_or("fallback"), "fallback");

        let err = Error::from_upstream_body(429, &json!({ "message": "rate limited" }));
        assert_eq!(err.detail_or("fallback"), "rate limited");
    }

    #[test]
    fn test_configuration_and_validation_keep_their_text() {
        let err = Error::Configuration("Missing NewsAPI key".to_string());
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.message_or("fallback"), "Missing NewsAPI key");
        assert_eq!(err.to_string(), "Missing NewsAPI key");

        let err = Error::Validation("Missing article text in request body".to_string());
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message_or("fallback"), "Missing article text in request body");
    }
}
