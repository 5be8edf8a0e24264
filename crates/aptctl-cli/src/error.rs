use std::path::PathBuf;

use aptctl_api::ApiError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(aptctl::config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Failed to read config file '{path}'")]
    #[diagnostic(code(aptctl::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Aptly server URL is not set")]
    #[diagnostic(
        code(aptctl::config::missing_url),
        help("Pass --url, or set APTCTL_URL in the environment")
    )]
    MissingUrl,

    #[error("Basic auth username set but no password")]
    #[diagnostic(
        code(aptctl::config::missing_password),
        help("Define the APTCTL_BASIC_PASS environment variable or use --basic-pass")
    )]
    MissingPassword,

    #[error("Invalid proxy '{url}': {source}")]
    #[diagnostic(code(aptctl::config::invalid_proxy))]
    InvalidProxy {
        url: String,
        #[source]
        source: aptctl_api::ureq::Error,
    },
}

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Error while {action}")]
    #[diagnostic(code(aptctl::io))]
    Io {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no {kind} found in dir '{path}'")]
    #[diagnostic(code(aptctl::upload::empty))]
    NoUploadFiles { kind: &'static str, path: PathBuf },

    #[error("file '{path}' not a {kind}")]
    #[diagnostic(code(aptctl::upload::unsupported))]
    UnsupportedFile { kind: &'static str, path: PathBuf },

    #[error("file '{file}' referenced by '{referenced_by}' does not exist")]
    #[diagnostic(
        code(aptctl::upload::missing_reference),
        help("Place every file listed in the Files field next to the control file")
    )]
    MissingReference { file: String, referenced_by: String },

    #[error("failed files:\n{}", .0.join("\n"))]
    #[diagnostic(code(aptctl::repo::failed_files))]
    FailedFiles(Vec<String>),
}

pub type Result<T> = std::result::Result<T, CliError>;

pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            CliError::Io {
                action: context(),
                source: err,
            }
        })
    }
}
