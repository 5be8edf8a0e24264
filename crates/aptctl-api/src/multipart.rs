//! Streaming `multipart/form-data` bodies for file uploads.
//!
//! The body is a sequence of segments read one after another: the part
//! headers, the file contents, and the closing boundary. File contents are
//! read straight from disk while the request is sent. A file is opened when
//! its segment is first read and closed once the segment is exhausted, so at
//! most one upload file is open at a time.

use std::{
    collections::{BTreeMap, VecDeque},
    fs::{self, File},
    io::{self, Cursor, Read},
    path::{Path, PathBuf},
};

use rand::{distributions::Alphanumeric, Rng};
use tracing::trace;

use crate::error::{ApiError, Result};

const BOUNDARY_LEN: usize = 32;

enum Segment {
    Bytes(Cursor<Vec<u8>>),
    Pending(PathBuf),
    File(File),
}

impl Segment {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Segment::Pending(path) = self {
            let file = File::open(path.as_path()).map_err(|err| {
                io::Error::new(
                    err.kind(),
                    format!("failed to open {}: {err}", path.display()),
                )
            })?;
            trace!(path = %path.display(), "opened upload file");
            *self = Segment::File(file);
        }

        match self {
            Segment::Bytes(cursor) => cursor.read(buf),
            Segment::File(file) => file.read(buf),
            Segment::Pending(_) => Ok(0),
        }
    }
}

pub struct MultipartBody {
    boundary: String,
    segments: VecDeque<Segment>,
}

fn random_boundary() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOUNDARY_LEN)
        .map(char::from)
        .collect()
}

fn escape_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

impl MultipartBody {
    /// Builds a body with one part per entry of `files`, keyed by form-field
    /// name. Every path is checked up front, so a missing file fails here
    /// rather than halfway through a request. Files are opened lazily.
    pub fn from_files(files: &BTreeMap<String, PathBuf>) -> Result<Self> {
        Self::with_boundary(random_boundary(), files)
    }

    fn with_boundary(boundary: String, files: &BTreeMap<String, PathBuf>) -> Result<Self> {
        let mut segments = VecDeque::with_capacity(files.len() * 3 + 1);

        for (field, path) in files {
            fs::metadata(path).map_err(|source| {
                ApiError::UploadFile {
                    path: path.clone(),
                    source,
                }
            })?;

            let filename = file_name(path);
            trace!(field = %field, filename = %filename, "adding multipart part");

            let header = format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                escape_quotes(field),
                escape_quotes(&filename),
            );
            segments.push_back(Segment::Bytes(Cursor::new(header.into_bytes())));
            segments.push_back(Segment::Pending(path.clone()));
            segments.push_back(Segment::Bytes(Cursor::new(b"\r\n".to_vec())));
        }

        let trailer = format!("--{boundary}--\r\n");
        segments.push_back(Segment::Bytes(Cursor::new(trailer.into_bytes())));

        Ok(Self {
            boundary,
            segments,
        })
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// The `Content-Type` header value announcing this body's boundary.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }
}

impl Read for MultipartBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while let Some(segment) = self.segments.front_mut() {
            let n = segment.read(buf)?;
            if n > 0 {
                return Ok(n);
            }
            // exhausted; dropping closes any file handle
            self.segments.pop_front();
        }

        Ok(0)
    }
}

impl std::fmt::Debug for MultipartBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultipartBody")
            .field("boundary", &self.boundary)
            .field("remaining_segments", &self.segments.len())
            .finish()
    }
}
