//! Response and error normalization.
//!
//! Servers disagree on how they report failures: some versions omit the
//! `Content-Type` header on error responses, others send an empty body. The
//! normalizer therefore ignores the header, reads the whole body, and tries
//! to decode `{"error": "..."}` from the raw bytes. Only a present, non-empty
//! message is treated as a server explanation; anything else becomes
//! [`ApiError::UnexpectedStatus`].

use std::io::Read;

use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;
use ureq::{http, Body};

use crate::error::{ApiError, Result};

/// The error payload returned by the server on failed requests.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorPayload {
    /// The message, if the payload carries a non-empty one. Whitespace is
    /// passed through as the server sent it.
    pub fn message(self) -> Option<String> {
        self.error.filter(|message| !message.is_empty())
    }
}

/// A completed exchange whose body has been read to the end.
#[derive(Debug, Clone)]
pub struct Exchange {
    status: u16,
    body: Vec<u8>,
}

impl Exchange {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Drains `response` and releases it. This is the only place a response
    /// body is read.
    pub fn read(response: http::Response<Body>) -> Result<Self> {
        let status = response.status().as_u16();
        let mut body = Vec::new();
        response
            .into_body()
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|source| {
                ApiError::Io {
                    action: "reading response body".into(),
                    source,
                }
            })?;

        Ok(Self {
            status,
            body,
        })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn is_success(&self) -> bool {
        self.status < 400
    }

    /// Classifies the exchange, returning it unchanged on success.
    pub fn check(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let message = serde_json::from_slice::<ErrorPayload>(&self.body)
            .ok()
            .and_then(ErrorPayload::message);

        debug!(status = self.status, message = ?message, "server returned an error");

        Err(match message {
            Some(message) => {
                ApiError::Server {
                    status: self.status,
                    message,
                }
            }
            None => {
                ApiError::UnexpectedStatus {
                    status: self.status,
                }
            }
        })
    }

    /// Decodes a successful body as `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_slice(&self.check()?.body).map_err(ApiError::Decode)
    }
}
