//! Snapshot endpoints (`api/snapshots`).

use serde::{Deserialize, Serialize};

use crate::{
    client::Client,
    error::{ApiError, Result},
    package::Package,
    query::QueryParams,
    repos::{ListPackagesOptions, LocalRepo},
};

/// An immutable list of packages taken from a repository, a mirror or other
/// snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Snapshot {
    pub name: String,
    pub created_at: String,
    pub source_kind: String,
    pub description: String,
    pub origin: String,
    pub not_automatic: String,
    pub but_automatic_upgrades: String,
    pub snapshots: Vec<Snapshot>,
    pub local_repos: Vec<LocalRepo>,
    pub packages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnapshotUpdateOptions {
    /// New snapshot name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Options for creating a snapshot from explicit package references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnapshotCreateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_snapshots: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub package_refs: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotMergeOptions {
    /// Keep only the latest version of each package across sources.
    pub latest: bool,
    /// Keep every version of each package.
    pub no_remove: bool,
}

impl SnapshotMergeOptions {
    fn to_query(self) -> Result<QueryParams> {
        if self.latest && self.no_remove {
            return Err(ApiError::Validation(
                "latest and no-remove merge modes are mutually exclusive".into(),
            ));
        }

        let mut params = QueryParams::new();
        params
            .flag("latest", self.latest)
            .flag("no-remove", self.no_remove);
        Ok(params)
    }
}

/// One side of a package difference between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DiffPackage {
    pub key: String,
    pub short_key: String,
    pub files_hash: String,
}

/// A package present in only one snapshot, or in different versions. A
/// missing side is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PackageDiff {
    pub left: Option<DiffPackage>,
    pub right: Option<DiffPackage>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateFromSourcePayload<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Serialize)]
struct CreateFromRefsPayload<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(flatten)]
    options: &'a SnapshotCreateOptions,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct MergePayload<'a> {
    sources: &'a [String],
}

/// Snapshot operations, obtained from [`Client::snapshots`].
#[derive(Debug, Clone, Copy)]
pub struct Snapshots<'a> {
    client: &'a Client,
}

impl Client {
    pub fn snapshots(&self) -> Snapshots<'_> {
        Snapshots {
            client: self,
        }
    }
}

impl Snapshots<'_> {
    pub fn list(&self) -> Result<Vec<Snapshot>> {
        self.client.call_json(self.client.get("api/snapshots"))
    }

    pub fn show(&self, name: &str) -> Result<Snapshot> {
        let request = self.client.get("api/snapshots/{name}").path_param("name", name);
        self.client.call_json(request)
    }

    pub fn packages(&self, name: &str, options: &ListPackagesOptions) -> Result<Vec<Package>> {
        let query = options.to_query()?;
        let request = self
            .client
            .get("api/snapshots/{name}/packages")
            .path_param("name", name)
            .query(query);
        self.client.call_listing(request, options.mode())
    }

    /// Deletes a snapshot. `force` drops it even when other snapshots were
    /// created from it.
    pub fn drop(&self, name: &str, force: bool) -> Result<()> {
        let mut query = QueryParams::new();
        query.flag("force", force);

        let request = self
            .client
            .delete("api/snapshots/{name}")
            .path_param("name", name)
            .query(query);
        self.client.call(request)
    }

    /// Snapshots the current contents of local repository `repo`.
    pub fn from_repo(&self, name: &str, repo: &str, description: Option<&str>) -> Result<Snapshot> {
        let request = self
            .client
            .post("api/repos/{name}/snapshots")
            .path_param("name", repo)
            .json(&CreateFromSourcePayload {
                name,
                description,
            });
        self.client.call_json(request)
    }

    /// Snapshots the current contents of mirror `mirror`.
    pub fn from_mirror(&self, name: &str, mirror: &str, description: Option<&str>) -> Result<Snapshot> {
        let request = self
            .client
            .post("api/mirrors/{name}/snapshots")
            .path_param("name", mirror)
            .json(&CreateFromSourcePayload {
                name,
                description,
            });
        self.client.call_json(request)
    }

    /// Creates a snapshot from source snapshots and package references.
    pub fn create_from_refs(&self, name: &str, options: &SnapshotCreateOptions) -> Result<Snapshot> {
        let request = self.client.post("api/snapshots").json(&CreateFromRefsPayload {
            name,
            options,
        });
        self.client.call_json(request)
    }

    pub fn diff(&self, left: &str, right: &str, only_matching: bool) -> Result<Vec<PackageDiff>> {
        let mut query = QueryParams::new();
        query.flag("onlyMatching", only_matching);

        let request = self
            .client
            .get("api/snapshots/{left}/diff/{right}")
            .path_param("left", left)
            .path_param("right", right)
            .query(query);
        self.client.call_json(request)
    }

    pub fn update(&self, name: &str, options: &SnapshotUpdateOptions) -> Result<Snapshot> {
        let request = self
            .client
            .put("api/snapshots/{name}")
            .path_param("name", name)
            .json(options);
        self.client.call_json(request)
    }

    /// Merges `sources` into a new snapshot `destination`.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiError::Validation`] before sending anything when
    /// `sources` is empty or both merge modes are requested.
    pub fn merge(
        &self,
        destination: &str,
        sources: &[String],
        options: SnapshotMergeOptions,
    ) -> Result<Snapshot> {
        let query = options.to_query()?;
        if sources.is_empty() {
            return Err(ApiError::Validation(
                "at least one source snapshot is required".into(),
            ));
        }

        let request = self
            .client
            .post("api/snapshots/{name}/merge")
            .path_param("name", destination)
            .query(query)
            .json(&MergePayload {
                sources,
            });
        self.client.call_json(request)
    }
}
