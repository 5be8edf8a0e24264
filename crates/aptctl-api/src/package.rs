//! Package keys and package listings.
//!
//! The server identifies a package by a compact key such as
//! `Pamd64 hello 3.0.0-2 96e8a0deaf8fc95f`, optionally preceded by an opaque
//! prefix. Listing endpoints either return bare keys ("simple" mode) or full
//! package objects ("detailed" mode, `format=details`). Both are decoded into
//! [`Package`] so callers do not need to care which mode was used.

use std::{
    collections::BTreeMap,
    fmt,
    str::FromStr,
    sync::LazyLock,
};

use regex::Regex;
use serde::Deserialize;

use crate::{
    error::{ApiError, Result},
    query::QueryParams,
};

static PACKAGE_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*)P(\S+) (\S+) (\S+) (\S+)$").expect("unable to compile package key regex")
});

/// A parsed view over a package key. The original string is kept verbatim
/// so it can be sent back to the server unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageKey {
    key: String,
    prefix: String,
    architecture: String,
    name: String,
    version: String,
    files_hash: String,
}

impl PackageKey {
    /// Parses `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPackageKey`] when the key lacks the `P`
    /// marker or has fewer than four fields after it.
    ///
    /// # Examples
    ///
    /// ```
    /// use aptctl_api::PackageKey;
    ///
    /// let key = PackageKey::parse("xDPamd64 hello 3.0.0-2 96e8a0deaf8fc95f").unwrap();
    /// assert_eq!(key.prefix(), "xD");
    /// assert_eq!(key.name(), "hello");
    /// assert_eq!(key.as_str(), "xDPamd64 hello 3.0.0-2 96e8a0deaf8fc95f");
    /// ```
    pub fn parse(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let fields = PACKAGE_KEY_RE.captures(&key).map(|caps| {
            let field = |index| caps.get(index).map_or("", |m| m.as_str()).to_string();
            [field(1), field(2), field(3), field(4), field(5)]
        });

        let Some([prefix, architecture, name, version, files_hash]) = fields else {
            return Err(ApiError::InvalidPackageKey {
                key,
            });
        };

        Ok(Self {
            key,
            prefix,
            architecture,
            name,
            version,
            files_hash,
        })
    }

    /// The key exactly as received.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn architecture(&self) -> &str {
        &self.architecture
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn files_hash(&self) -> &str {
        &self.files_hash
    }

    /// Rebuilds the key from its fields, without the prefix.
    pub fn canonical(&self) -> String {
        format!(
            "P{} {} {} {}",
            self.architecture, self.name, self.version, self.files_hash
        )
    }

    pub fn into_string(self) -> String {
        self.key
    }
}

impl FromStr for PackageKey {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PackageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// A package as returned by listing and search endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Package {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "ShortKey", default)]
    pub short_key: Option<String>,
    #[serde(rename = "Architecture", default)]
    pub architecture: String,
    #[serde(rename = "Package", default)]
    pub package: String,
    #[serde(rename = "Version", default)]
    pub version: String,
    #[serde(rename = "FilesHash", default)]
    pub files_hash: String,
    #[serde(rename = "Source", default)]
    pub source: Option<String>,
    /// Remaining control fields, e.g. `Depends` or `Filename`.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Package {
    /// Looks up a control field that is not mapped to a struct field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.extra.get(name).and_then(|value| value.as_str())
    }
}

impl From<PackageKey> for Package {
    fn from(key: PackageKey) -> Self {
        Self {
            architecture: key.architecture,
            package: key.name,
            version: key.version,
            files_hash: key.files_hash,
            key: key.key,
            short_key: None,
            source: None,
            extra: BTreeMap::new(),
        }
    }
}

/// The two response shapes of package listing endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingMode {
    /// An array of package keys.
    #[default]
    Simple,
    /// An array of package objects.
    Detailed,
}

impl ListingMode {
    pub fn from_detailed(detailed: bool) -> Self {
        if detailed {
            Self::Detailed
        } else {
            Self::Simple
        }
    }

    /// Adds the query parameter that selects this mode.
    pub fn apply(self, query: &mut QueryParams) {
        if self == Self::Detailed {
            query.set("format", "details");
        }
    }

    /// Decodes a listing body.
    ///
    /// In simple mode every key is parsed; one malformed key fails the whole
    /// listing.
    pub fn decode(self, body: &[u8]) -> Result<Vec<Package>> {
        match self {
            Self::Simple => {
                let keys: Vec<String> = serde_json::from_slice(body).map_err(ApiError::Decode)?;
                keys.into_iter()
                    .map(|key| PackageKey::parse(key).map(Package::from))
                    .collect()
            }
            Self::Detailed => serde_json::from_slice(body).map_err(ApiError::Decode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        let key = PackageKey::parse("Pamd64 hello 3.0.0-2 96e8a0deaf8fc95f").unwrap();
        assert_eq!(key.prefix(), "");
        assert_eq!(key.architecture(), "amd64");
        assert_eq!(key.name(), "hello");
        assert_eq!(key.version(), "3.0.0-2");
        assert_eq!(key.files_hash(), "96e8a0deaf8fc95f");
        assert_eq!(key.canonical(), key.as_str());
    }

    #[test]
    fn test_parse_key_with_prefix() {
        let raw = "xDPamd64 hello 3.0.0-2 96e8a0deaf8fc95f";
        let key: PackageKey = raw.parse().unwrap();
        assert_eq!(key.prefix(), "xD");
        assert_eq!(key.architecture(), "amd64");
        assert_eq!(key.name(), "hello");
        assert_eq!(key.version(), "3.0.0-2");
        assert_eq!(key.files_hash(), "96e8a0deaf8fc95f");
        assert_eq!(key.as_str(), raw);
        assert_eq!(key.to_string(), raw);
        assert_eq!(key.canonical(), "Pamd64 hello 3.0.0-2 96e8a0deaf8fc95f");
    }

    #[test]
    fn test_prefix_is_longest_run() {
        let key = PackageKey::parse("PPall pkg 1:2.0 abcd").unwrap();
        assert_eq!(key.prefix(), "P");
        assert_eq!(key.architecture(), "all");
        assert_eq!(key.version(), "1:2.0");
    }

    #[test]
    fn test_invalid_keys() {
        for raw in [
            "96e8a0deaf8fc95f",
            "Pamd64 hello 3.0.0-2",
            "amd64 hello 3.0.0-2 96e8a0deaf8fc95f",
            "Pamd64 hello  3.0.0-2 96e8a0deaf8fc95f",
            "",
        ] {
            match PackageKey::parse(raw) {
                Err(ApiError::InvalidPackageKey {
                    key,
                }) => assert_eq!(key, raw),
                other => panic!("expected error for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_fields_need_single_spaces() {
        for raw in [
            "Pamd64\thello 3.0.0-2 96e8a0deaf8fc95f",
            "Pamd64 hello\t3.0.0-2 96e8a0deaf8fc95f",
            "Pamd64 hello 3.0.0-2\u{a0}96e8a0deaf8fc95f",
        ] {
            assert!(
                matches!(PackageKey::parse(raw), Err(ApiError::InvalidPackageKey { .. })),
                "{raw:?} should not parse"
            );
        }
    }

    #[test]
    fn test_package_from_key() {
        let key = PackageKey::parse("Psource hello 3.0.0-2 571d33f41765ddba").unwrap();
        let pkg = Package::from(key);
        assert_eq!(pkg.key, "Psource hello 3.0.0-2 571d33f41765ddba");
        assert_eq!(pkg.architecture, "source");
        assert_eq!(pkg.package, "hello");
        assert_eq!(pkg.short_key, None);
        assert!(pkg.extra.is_empty());
    }

    #[test]
    fn test_decode_simple_listing() {
        let body = br#"["Pamd64 nano 7.2-1+deb12u1 c5d2ac1639544e75", "Psource hello 3.0.0-2 571d33f41765ddba"]"#;
        let pkgs = ListingMode::Simple.decode(body).unwrap();
        assert_eq!(pkgs.len(), 2);
        assert_eq!(pkgs[0].package, "nano");
        assert_eq!(pkgs[0].version, "7.2-1+deb12u1");
        assert_eq!(pkgs[1].architecture, "source");
        assert_eq!(pkgs[1].files_hash, "571d33f41765ddba");
    }

    #[test]
    fn test_decode_simple_listing_rejects_bad_key() {
        let body = br#"["Pamd64 nano 7.2-1+deb12u1 c5d2ac1639544e75", "pkg2"]"#;
        let err = ListingMode::Simple.decode(body).unwrap_err();
        assert_eq!(err.to_string(), "Invalid package key 'pkg2'");
    }

    #[test]
    fn test_decode_detailed_listing() {
        let body = br#"[{
            "Architecture": "any",
            "Binary": "hello",
            "FilesHash": "571d33f41765ddba",
            "Format": "1.0",
            "Key": "Psource hello 3.0.0-2 571d33f41765ddba",
            "Package": "hello",
            "ShortKey": "Psource hello 3.0.0-2",
            "Version": "3.0.0-2"
        }]"#;
        let pkgs = ListingMode::Detailed.decode(body).unwrap();
        assert_eq!(pkgs.len(), 1);
        let pkg = &pkgs[0];
        assert_eq!(pkg.architecture, "any");
        assert_eq!(pkg.short_key.as_deref(), Some("Psource hello 3.0.0-2"));
        assert_eq!(pkg.field("Binary"), Some("hello"));
        assert_eq!(pkg.field("Format"), Some("1.0"));
        assert!(!pkg.extra.contains_key("Key"));
    }

    #[test]
    fn test_decode_wrong_shape() {
        assert!(matches!(
            ListingMode::Simple.decode(br#"[{"Key": "x"}]"#),
            Err(ApiError::Decode(_))
        ));
        assert!(matches!(
            ListingMode::Detailed.decode(br#"["Pamd64 a 1 b"]"#),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn test_listing_mode_query() {
        let mut query = QueryParams::new();
        ListingMode::Simple.apply(&mut query);
        assert!(query.is_empty());

        ListingMode::from_detailed(true).apply(&mut query);
        assert_eq!(query.encode(), "format=details");
    }
}
