//! Publishing endpoints (`api/publish`).
//!
//! A published repository is addressed by its prefix and distribution. The
//! prefix may contain `/`, so it is escaped into a single path segment with
//! [`escape_prefix`] before it goes into the URL.

use serde::{Deserialize, Serialize};

use crate::{client::Client, error::Result, query::QueryParams};

pub const SOURCE_LOCAL_REPO: &str = "local";
pub const SOURCE_SNAPSHOT: &str = "snapshot";

/// Encodes a publish prefix as one path segment.
///
/// `.` becomes `:.`. Otherwise every `_` is doubled and then every `/`
/// becomes `_`, in that order.
///
/// # Examples
///
/// ```
/// use aptctl_api::publish::escape_prefix;
///
/// assert_eq!(escape_prefix("."), ":.");
/// assert_eq!(escape_prefix("part/slug_slug"), "part_slug__slug");
/// ```
pub fn escape_prefix(prefix: &str) -> String {
    if prefix == "." {
        return ":.".to_string();
    }
    prefix.replace('_', "__").replace('/', "_")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SourceEntry {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub component: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// A source reference in publish requests. Without a component the server
/// picks one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SourceEntryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PublishedList {
    pub architectures: Vec<String>,
    pub distribution: String,
    pub label: String,
    pub origin: String,
    pub prefix: String,
    pub path: String,
    /// `local` or `snapshot`.
    pub source_kind: String,
    pub sources: Vec<SourceEntry>,
}

impl PublishedList {
    pub fn is_local(&self) -> bool {
        self.source_kind == SOURCE_LOCAL_REPO
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishDropOptions {
    pub force: bool,
    /// Leave unreferenced files in the pool.
    pub skip_cleanup: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishOptions {
    pub architectures: Vec<String>,
    pub distribution: Option<String>,
    pub component: Option<String>,
}

/// GPG signing settings for publish operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SigningOptions {
    pub skip: bool,
    /// Key ID; the server default key when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpg_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyring: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_keyring: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
    /// Passphrase file on the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passphrase_file: Option<String>,
}

impl SigningOptions {
    pub fn without_signing() -> Self {
        Self {
            skip: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublishUpdateOptions {
    /// Overwrite files in the pool without notice.
    pub force_overwrite: bool,
    pub signing: SigningOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_contents: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_bz2: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_cleanup: Option<bool>,
    /// New snapshots when switching a snapshot publish.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub snapshots: Vec<SourceEntryRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acquire_by_hash: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_dist: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PublishPayload<'a> {
    source_kind: &'static str,
    sources: Vec<SourceEntryRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distribution: Option<&'a str>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    architectures: &'a [String],
    signing: &'a SigningOptions,
}

impl<'a> PublishPayload<'a> {
    fn new(
        source_kind: &'static str,
        name: &str,
        options: &'a PublishOptions,
        signing: &'a SigningOptions,
    ) -> Self {
        Self {
            source_kind,
            sources: vec![SourceEntryRequest {
                component: options.component.clone(),
                name: name.to_string(),
            }],
            distribution: options.distribution.as_deref(),
            architectures: &options.architectures,
            signing,
        }
    }
}

/// Publishing operations, obtained from [`Client::publish`].
#[derive(Debug, Clone, Copy)]
pub struct Publish<'a> {
    client: &'a Client,
}

impl Client {
    pub fn publish(&self) -> Publish<'_> {
        Publish {
            client: self,
        }
    }
}

impl Publish<'_> {
    pub fn list(&self) -> Result<Vec<PublishedList>> {
        self.client.call_json(self.client.get("api/publish"))
    }

    pub fn show(&self, distribution: &str, prefix: &str) -> Result<PublishedList> {
        let request = self
            .client
            .get("api/publish/{prefix}/{distribution}")
            .path_param("prefix", escape_prefix(prefix))
            .path_param("distribution", distribution);
        self.client.call_json(request)
    }

    pub fn drop(&self, distribution: &str, prefix: &str, options: PublishDropOptions) -> Result<()> {
        let mut query = QueryParams::new();
        query
            .flag("force", options.force)
            .flag("skipCleanup", options.skip_cleanup);

        let request = self
            .client
            .delete("api/publish/{prefix}/{distribution}")
            .path_param("prefix", escape_prefix(prefix))
            .path_param("distribution", distribution)
            .query(query);
        self.client.call(request)
    }

    /// Publishes local repository `name` directly, without a snapshot.
    pub fn publish_repo(
        &self,
        name: &str,
        prefix: &str,
        options: &PublishOptions,
        signing: &SigningOptions,
    ) -> Result<PublishedList> {
        self.create(PublishPayload::new(SOURCE_LOCAL_REPO, name, options, signing), prefix)
    }

    pub fn publish_snapshot(
        &self,
        name: &str,
        prefix: &str,
        options: &PublishOptions,
        signing: &SigningOptions,
    ) -> Result<PublishedList> {
        self.create(PublishPayload::new(SOURCE_SNAPSHOT, name, options, signing), prefix)
    }

    fn create(&self, payload: PublishPayload<'_>, prefix: &str) -> Result<PublishedList> {
        let request = self
            .client
            .post("api/publish/{prefix}")
            .path_param("prefix", escape_prefix(prefix))
            .json(&payload);
        self.client.call_json(request)
    }

    /// Re-publishes a local repository, or switches a snapshot publish to the
    /// snapshots in `options.snapshots`.
    pub fn update_or_switch(
        &self,
        prefix: &str,
        distribution: &str,
        options: &PublishUpdateOptions,
    ) -> Result<PublishedList> {
        let request = self
            .client
            .put("api/publish/{prefix}/{distribution}")
            .path_param("prefix", escape_prefix(prefix))
            .path_param("distribution", escape_prefix(distribution))
            .json(options);
        self.client.call_json(request)
    }
}
