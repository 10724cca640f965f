use chrono::{DateTime, Utc};
use core::fmt::{Display, Formatter};
use thiserror::Error;

/// Failures produced while computing an activity report.
#[derive(Debug, Error)]
pub enum ActivityError {
    /// Bad user input, detected before any network activity.
    #[error("{0}")]
    Usage(String),

    /// The server answered with a non-success status, or with a quota document that could not be read.
    #[error("server error: {detail}")]
    ServerError { status: Option<u16>, detail: String },

    /// The body could not be parsed as the expected document or entity list.
    #[error("could not parse response from {resource}: {cause}")]
    ResponseFormat { resource: String, cause: FormatCause },

    /// A fetched entity lacks a field the report depends on.
    #[error("malformed entity: {0}")]
    MalformedEntity(String),

    /// No request quota remains for the current rate-limit period.
    #[error("request quota exhausted")]
    QuotaExhausted { reset_at: Option<DateTime<Utc>> },

    /// The request never produced a response (connection failure, expired deadline, ...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ActivityError {
    /// HTTP status attached to a server error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ServerError { status, .. } => *status,
            _ => None,
        }
    }
}

/// Why a response body could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatCause {
    /// The quota probe reported zero remaining requests, which explains the unusable body.
    QuotaExhausted,

    /// The body is genuinely malformed; carries the parser's message.
    Invalid(String),
}

impl Display for FormatCause {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::QuotaExhausted => write!(f, "request quota is exhausted"),
            Self::Invalid(detail) => write!(f, "{detail}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_status() {
        let err = ActivityError::ServerError {
            status: Some(503),
            detail: "HTTP 503 from /repos/o/r/commits".into(),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "server error: HTTP 503 from /repos/o/r/commits");
    }

    #[test]
    fn test_status_absent_for_other_variants() {
        assert_eq!(ActivityError::MalformedEntity("x".into()).status(), None);
    }

    #[test]
    fn test_format_error_mentions_quota() {
        let err = ActivityError::ResponseFormat {
            resource: "/repos/o/r/pulls".into(),
            cause: FormatCause::QuotaExhausted,
        };
        assert_eq!(
            err.to_string(),
            "could not parse response from /repos/o/r/pulls: request quota is exhausted"
        );
    }

    #[test]
    fn test_format_error_keeps_parser_message() {
        let err = ActivityError::ResponseFormat {
            resource: "/repos/o/r/pulls".into(),
            cause: FormatCause::Invalid("expected value at line 1 column 1".into()),
        };
        assert!(err.to_string().ends_with("expected value at line 1 column 1"));
    }
}
