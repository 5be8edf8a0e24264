//! Error types for the aptly client.
//!
//! Every fallible operation in this crate returns [`ApiError`]. The variants
//! fall into five groups: request construction, transport, server responses,
//! response decoding and caller-side validation.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("missing closing bracket at '{fragment}'")]
    #[diagnostic(
        code(aptctl_api::path::missing_closing_bracket),
        help("A placeholder must be closed before the next '/' or opening bracket")
    )]
    MissingClosingBracket { fragment: String },

    #[error("closing bracket without opening bracket at '{fragment}'")]
    #[diagnostic(code(aptctl_api::path::unmatched_closing_bracket))]
    UnmatchedClosingBracket { fragment: String },

    #[error("path parameter '{{{name}}}' not set")]
    #[diagnostic(
        code(aptctl_api::path::missing_param),
        help("Set a value for every placeholder used in the path template")
    )]
    MissingPathParam { name: String },

    #[error("Failed to serialize request body: {0}")]
    #[diagnostic(code(aptctl_api::serialize))]
    Serialization(#[source] serde_json::Error),

    #[error("Failed to open upload file '{path}': {source}")]
    #[diagnostic(
        code(aptctl_api::upload_file),
        help("Check that the file exists and is readable")
    )]
    UploadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(
        code(aptctl_api::network),
        help("Check your network connection and the server URL")
    )]
    Network(Box<ureq::Error>),

    #[error("Invalid request: {0}")]
    #[diagnostic(code(aptctl_api::request))]
    Request(#[from] ureq::http::Error),

    #[error("{message}")]
    #[diagnostic(code(aptctl_api::server))]
    Server { status: u16, message: String },

    #[error("unexpected status code {status}")]
    #[diagnostic(
        code(aptctl_api::unexpected_status),
        help("The server did not explain the failure; check its logs")
    )]
    UnexpectedStatus { status: u16 },

    #[error("Failed to decode response: {0}")]
    #[diagnostic(
        code(aptctl_api::decode),
        help("The server response did not have the expected shape")
    )]
    Decode(#[source] serde_json::Error),

    #[error("Invalid package key '{key}'")]
    #[diagnostic(
        code(aptctl_api::package_key),
        help("Package keys look like `P<arch> <name> <version> <hash>`")
    )]
    InvalidPackageKey { key: String },

    #[error("{0}")]
    #[diagnostic(code(aptctl_api::validation))]
    Validation(String),

    #[error("Error while {action}: {source}")]
    #[diagnostic(code(aptctl_api::io))]
    Io {
        action: String,
        source: std::io::Error,
    },
}

impl ApiError {
    /// HTTP status code of a failed server response, if this error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::UnexpectedStatus { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        Self::Network(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_error_messages() {
        let err = ApiError::MissingClosingBracket {
            fragment: "{path1/".into(),
        };
        assert_eq!(err.to_string(), "missing closing bracket at '{path1/'");

        let err = ApiError::MissingPathParam {
            name: "path".into(),
        };
        assert_eq!(err.to_string(), "path parameter '{path}' not set");

        let err = ApiError::UnmatchedClosingBracket {
            fragment: "name}".into(),
        };
        assert_eq!(
            err.to_string(),
            "closing bracket without opening bracket at 'name}'"
        );
    }

    #[test]
    fn test_server_error_display() {
        let err = ApiError::Server {
            status: 404,
            message: "local repo with name missing not found".into(),
        };
        assert_eq!(err.to_string(), "local repo with name missing not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_unexpected_status_display() {
        let err = ApiError::UnexpectedStatus {
            status: 502,
        };
        assert_eq!(err.to_string(), "unexpected status code 502");
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_validation_has_no_status() {
        let err = ApiError::Validation("withDeps requires a query".into());
        assert_eq!(err.to_string(), "withDeps requires a query");
        assert_eq!(err.status(), None);
    }
}
