//! Request descriptors and their materialization into wire requests.
//!
//! A [`Request`] records everything about one API call without touching the
//! network or the filesystem: method, path template, path and query
//! parameters, and either a JSON body or a set of files to upload.
//! [`Request::materialize`] turns it into a [`WireRequest`] ready for the
//! transport.

use std::{collections::BTreeMap, fmt, path::PathBuf};

use serde::Serialize;

use crate::{
    error::{ApiError, Result},
    multipart::MultipartBody,
    path,
    query::QueryParams,
};

pub const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transport-agnostic description of one API call.
#[derive(Debug)]
pub struct Request {
    method: Method,
    template: String,
    path_params: BTreeMap<String, String>,
    query: QueryParams,
    body: Option<std::result::Result<Vec<u8>, serde_json::Error>>,
    files: BTreeMap<String, PathBuf>,
}

impl Request {
    pub fn new(method: Method, template: impl Into<String>) -> Self {
        Self {
            method,
            template: template.into(),
            path_params: BTreeMap::new(),
            query: QueryParams::new(),
            body: None,
            files: BTreeMap::new(),
        }
    }

    pub fn get(template: impl Into<String>) -> Self {
        Self::new(Method::Get, template)
    }

    pub fn post(template: impl Into<String>) -> Self {
        Self::new(Method::Post, template)
    }

    pub fn put(template: impl Into<String>) -> Self {
        Self::new(Method::Put, template)
    }

    pub fn delete(template: impl Into<String>) -> Self {
        Self::new(Method::Delete, template)
    }

    /// Sets the raw, unescaped value of the `{name}` placeholder.
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Merges `params` into the query string. Values for keys already present
    /// are appended.
    pub fn query(mut self, params: QueryParams) -> Self {
        self.query.extend(params.iter());
        self
    }

    /// Appends a single query parameter.
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.append(key, value);
        self
    }

    /// Sets the JSON body. Serialization happens now, but a failure is only
    /// reported by [`Request::materialize`].
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.body = Some(serde_json::to_vec(body));
        self
    }

    /// Adds a file to upload under the form field `field`.
    pub fn file(mut self, field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.files.insert(field.into(), path.into());
        self
    }

    pub fn files<I, K, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<PathBuf>,
    {
        for (field, path) in files {
            self.files.insert(field.into(), path.into());
        }
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn query_params(&self) -> &QueryParams {
        &self.query
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn upload_files(&self) -> &BTreeMap<String, PathBuf> {
        &self.files
    }

    /// Resolves the path template against the path parameters.
    pub fn path(&self) -> Result<String> {
        path::resolve(&self.template, &self.path_params)
    }

    /// Builds the absolute URL, including the query string when any
    /// parameter is set. One trailing `/` is trimmed from `base_url`.
    pub fn url(&self, base_url: &str) -> Result<String> {
        let path = self.path()?;
        let base = base_url.strip_suffix('/').unwrap_or(base_url);

        if self.query.is_empty() {
            Ok(format!("{base}/{path}"))
        } else {
            Ok(format!("{base}/{path}?{}", self.query.encode()))
        }
    }

    /// Produces the wire request.
    ///
    /// A JSON body wins over files. With neither, the body is empty and the
    /// content type is an empty string; the header is still sent.
    pub fn materialize(self, base_url: &str) -> Result<WireRequest> {
        let url = self.url(base_url)?;

        let (content_type, body) = match self.body {
            Some(Ok(bytes)) => (CONTENT_TYPE_JSON.to_string(), WireBody::Json(bytes)),
            Some(Err(err)) => return Err(ApiError::Serialization(err)),
            None if !self.files.is_empty() => {
                let multipart = MultipartBody::from_files(&self.files)?;
                (multipart.content_type(), WireBody::Multipart(multipart))
            }
            None => (String::new(), WireBody::Empty),
        };

        Ok(WireRequest {
            method: self.method,
            url,
            content_type,
            body,
        })
    }
}

pub enum WireBody {
    Empty,
    Json(Vec<u8>),
    Multipart(MultipartBody),
}

impl fmt::Debug for WireBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireBody::Empty => f.write_str("Empty"),
            WireBody::Json(bytes) => write!(f, "Json({} bytes)", bytes.len()),
            WireBody::Multipart(body) => f.debug_tuple("Multipart").field(body).finish(),
        }
    }
}

/// A fully resolved request.
#[derive(Debug)]
pub struct WireRequest {
    pub method: Method,
    pub url: String,
    pub content_type: String,
    pub body: WireBody,
}
