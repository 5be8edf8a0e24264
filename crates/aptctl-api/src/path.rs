//! Path template resolution.
//!
//! Endpoint paths are written as templates such as `api/repos/{name}/packages`.
//! Resolution substitutes each `{name}` placeholder with its percent-escaped
//! value and drops a single leading `/`, since every path is joined onto a
//! base URL.

use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{ApiError, Result};

/// Bytes left untouched inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

/// Percent-escapes `value` so it can be embedded as one path segment.
///
/// `/` is always escaped, so a value never introduces extra segments.
///
/// # Examples
///
/// ```
/// use aptctl_api::path::escape_segment;
///
/// assert_eq!(escape_segment("a b/c"), "a%20b%2Fc");
/// assert_eq!(escape_segment("v1.0+dfsg~1"), "v1.0+dfsg~1");
/// ```
pub fn escape_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

#[derive(Debug, Clone, Copy)]
struct Placeholder {
    start: usize,
    end: usize,
}

/// Scans `template` for `{...}` placeholders, returning their byte spans.
fn scan(template: &str) -> Result<Vec<Placeholder>> {
    let mut placeholders = Vec::new();
    let mut open: Option<usize> = None;

    for (index, ch) in template.char_indices() {
        match (ch, open) {
            ('{', None) => open = Some(index),
            ('{', Some(start)) | ('/', Some(start)) => {
                return Err(ApiError::MissingClosingBracket {
                    fragment: template[start..=index].to_string(),
                });
            }
            ('}', Some(start)) => {
                placeholders.push(Placeholder {
                    start,
                    end: index,
                });
                open = None;
            }
            ('}', None) => {
                // the segment ending in the stray bracket
                let from = template[..index]
                    .rfind(|c| c == '/' || c == '}')
                    .map_or(0, |sep| sep + 1);
                return Err(ApiError::UnmatchedClosingBracket {
                    fragment: template[from..=index].to_string(),
                });
            }
            _ => {}
        }
    }

    if let Some(start) = open {
        return Err(ApiError::MissingClosingBracket {
            fragment: template[start..].to_string(),
        });
    }

    Ok(placeholders)
}

fn strip_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Resolves `template` against `params`.
///
/// Values are escaped with [`escape_segment`]; the template text itself is
/// copied verbatim.
///
/// # Errors
///
/// * [`ApiError::MissingClosingBracket`] for a placeholder interrupted by `{`
///   or `/`, or left open at the end of the template.
/// * [`ApiError::UnmatchedClosingBracket`] for a `}` without a matching `{`.
/// * [`ApiError::MissingPathParam`] when a placeholder has no value.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use aptctl_api::path::resolve;
///
/// let mut params = BTreeMap::new();
/// params.insert("name".to_string(), "my repo".to_string());
///
/// let path = resolve("/api/repos/{name}", &params).unwrap();
/// assert_eq!(path, "api/repos/my%20repo");
/// ```
pub fn resolve(template: &str, params: &BTreeMap<String, String>) -> Result<String> {
    let placeholders = scan(template)?;

    if placeholders.is_empty() {
        return Ok(strip_leading_slash(template).to_string());
    }

    let mut path = String::with_capacity(template.len());
    let mut cursor = 0;

    for Placeholder {
        start,
        end,
    } in placeholders
    {
        path.push_str(&template[cursor..start]);

        let name = &template[start + 1..end];
        let value = params
            .get(name)
            .ok_or_else(|| ApiError::MissingPathParam {
                name: name.to_string(),
            })?;
        path.push_str(&escape_segment(value));

        cursor = end + 1;
    }
    path.push_str(&template[cursor..]);

    Ok(strip_leading_slash(&path).to_string())
}
