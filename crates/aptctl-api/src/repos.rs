//! Local repository endpoints (`api/repos`).

use serde::{Deserialize, Serialize};

use crate::{
    client::Client,
    error::{ApiError, Result},
    package::{ListingMode, Package},
    query::QueryParams,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LocalRepo {
    pub name: String,
    pub comment: String,
    pub default_distribution: String,
    pub default_component: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepoCreateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_distribution: Option<String>,
    /// Seed the repository with the contents of this snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_snapshot: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepoUpdateOptions {
    /// New repository name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_component: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_distribution: Option<String>,
}

/// Filters for package listings of repositories and snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPackagesOptions {
    /// Package query, e.g. `Name (~ hello)`.
    pub query: Option<String>,
    /// Also list dependencies of matching packages. Requires a query.
    pub with_deps: bool,
    /// Only list the newest version of each package.
    pub maximum_version: bool,
    /// Ask for full package objects instead of keys.
    pub detailed: bool,
}

impl ListPackagesOptions {
    pub fn mode(&self) -> ListingMode {
        ListingMode::from_detailed(self.detailed)
    }

    /// Builds the query parameters, rejecting `with_deps` without a query.
    pub fn to_query(&self) -> Result<QueryParams> {
        let query = self.query.as_deref().filter(|q| !q.is_empty());
        if query.is_none() && self.with_deps {
            return Err(ApiError::Validation("withDeps requires a query".into()));
        }

        let mut params = QueryParams::new();
        params
            .optional("q", query)
            .flag("withDeps", self.with_deps)
            .flag("maximumVersion", self.maximum_version);
        self.mode().apply(&mut params);

        Ok(params)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RepoAddResult {
    pub failed_files: Vec<String>,
    pub report: RepoAddReport,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RepoAddReport {
    pub warnings: Vec<String>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepoAddOptions {
    pub force_replace: bool,
    /// Keep the uploaded files after a successful import.
    pub no_remove: bool,
}

impl RepoAddOptions {
    fn to_query(self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .flag("noRemove", self.no_remove)
            .flag("forceReplace", self.force_replace);
        params
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepoIncludeOptions {
    pub force_replace: bool,
    pub no_remove_files: bool,
    pub accept_unsigned: bool,
    pub ignore_signature: bool,
}

impl RepoIncludeOptions {
    fn to_query(self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .flag("forceReplace", self.force_replace)
            .flag("noRemoveFiles", self.no_remove_files)
            .flag("acceptUnsigned", self.accept_unsigned)
            .flag("ignoreSignature", self.ignore_signature);
        params
    }
}

#[derive(Serialize)]
struct CreatePayload<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(flatten)]
    options: &'a RepoCreateOptions,
}

#[derive(Serialize)]
struct PackageRefsPayload<'a> {
    #[serde(rename = "PackageRefs")]
    package_refs: &'a [String],
}

/// Local repository operations, obtained from [`Client::repos`].
#[derive(Debug, Clone, Copy)]
pub struct Repos<'a> {
    client: &'a Client,
}

impl Client {
    pub fn repos(&self) -> Repos<'_> {
        Repos {
            client: self,
        }
    }
}

impl Repos<'_> {
    pub fn list(&self) -> Result<Vec<LocalRepo>> {
        self.client.call_json(self.client.get("api/repos"))
    }

    pub fn create(&self, name: &str, options: &RepoCreateOptions) -> Result<LocalRepo> {
        let request = self.client.post("api/repos").json(&CreatePayload {
            name,
            options,
        });
        self.client.call_json(request)
    }

    pub fn edit(&self, name: &str, options: &RepoUpdateOptions) -> Result<LocalRepo> {
        let request = self
            .client
            .put("api/repos/{name}")
            .path_param("name", name)
            .json(options);
        self.client.call_json(request)
    }

    pub fn show(&self, name: &str) -> Result<LocalRepo> {
        let request = self.client.get("api/repos/{name}").path_param("name", name);
        self.client.call_json(request)
    }

    /// Lists the packages in a repository. The options are validated before
    /// any request is made.
    pub fn list_packages(&self, name: &str, options: &ListPackagesOptions) -> Result<Vec<Package>> {
        let query = options.to_query()?;
        let request = self
            .client
            .get("api/repos/{name}/packages")
            .path_param("name", name)
            .query(query);
        self.client.call_listing(request, options.mode())
    }

    /// Removes a repository. `force` drops it even when snapshots reference it.
    pub fn drop(&self, name: &str, force: bool) -> Result<()> {
        let mut query = QueryParams::new();
        query.flag("force", force);

        let request = self
            .client
            .delete("api/repos/{name}")
            .path_param("name", name)
            .query(query);
        self.client.call(request)
    }

    /// Imports one uploaded file from `dir`.
    pub fn add_file(
        &self,
        name: &str,
        dir: &str,
        file: &str,
        options: RepoAddOptions,
    ) -> Result<RepoAddResult> {
        let request = self
            .client
            .post("api/repos/{name}/file/{dir}/{file}")
            .path_param("name", name)
            .path_param("dir", dir)
            .path_param("file", file)
            .query(options.to_query());
        self.client.call_json(request)
    }

    /// Imports every package file uploaded to `dir`.
    pub fn add_directory(&self, name: &str, dir: &str, options: RepoAddOptions) -> Result<RepoAddResult> {
        let request = self
            .client
            .post("api/repos/{name}/file/{dir}")
            .path_param("name", name)
            .path_param("dir", dir)
            .query(options.to_query());
        self.client.call_json(request)
    }

    /// Processes one uploaded `.changes` file from `dir`.
    pub fn include_file(
        &self,
        name: &str,
        dir: &str,
        file: &str,
        options: RepoIncludeOptions,
    ) -> Result<RepoAddResult> {
        let request = self
            .client
            .post("api/repos/{name}/include/{dir}/{file}")
            .path_param("name", name)
            .path_param("dir", dir)
            .path_param("file", file)
            .query(options.to_query());
        self.client.call_json(request)
    }

    /// Processes every `.changes` file uploaded to `dir`.
    pub fn include_directory(
        &self,
        name: &str,
        dir: &str,
        options: RepoIncludeOptions,
    ) -> Result<RepoAddResult> {
        let request = self
            .client
            .post("api/repos/{name}/include/{dir}")
            .path_param("name", name)
            .path_param("dir", dir)
            .query(options.to_query());
        self.client.call_json(request)
    }

    /// Adds packages already known to the server, identified by key.
    pub fn add_packages(&self, name: &str, package_refs: &[String]) -> Result<LocalRepo> {
        let request = self
            .client
            .post("api/repos/{name}/packages")
            .path_param("name", name)
            .json(&PackageRefsPayload {
                package_refs,
            });
        self.client.call_json(request)
    }

    /// Removes packages from a repository, identified by key.
    pub fn remove_packages(&self, name: &str, package_refs: &[String]) -> Result<LocalRepo> {
        let request = self
            .client
            .delete("api/repos/{name}/packages")
            .path_param("name", name)
            .json(&PackageRefsPayload {
                package_refs,
            });
        self.client.call_json(request)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_list_packages_query() {
        let options = ListPackagesOptions {
            query: Some("query".into()),
            with_deps: true,
            maximum_version: true,
            detailed: false,
        };
        assert_eq!(
            options.to_query().unwrap().encode(),
            "maximumVersion=1&q=query&withDeps=1"
        );
    }

    #[test]
    fn test_flags_are_independent() {
        let options = ListPackagesOptions {
            maximum_version: true,
            ..Default::default()
        };
        assert_eq!(options.to_query().unwrap().encode(), "maximumVersion=1");
    }

    #[test]
    fn test_detailed_query() {
        let options = ListPackagesOptions {
            detailed: true,
            ..Default::default()
        };
        assert_eq!(options.to_query().unwrap().encode(), "format=details");
        assert_eq!(options.mode(), ListingMode::Detailed);
    }

    #[test]
    fn test_with_deps_requires_query() {
        let options = ListPackagesOptions {
            with_deps: true,
            ..Default::default()
        };
        assert!(matches!(options.to_query(), Err(ApiError::Validation(_))));

        let options = ListPackagesOptions {
            query: Some(String::new()),
            with_deps: true,
            ..Default::default()
        };
        assert!(options.to_query().is_err());
    }

    #[test]
    fn test_create_payload() {
        let options = RepoCreateOptions {
            comment: Some("my comment".into()),
            from_snapshot: Some("snap".into()),
            ..Default::default()
        };
        let payload = serde_json::to_value(CreatePayload {
            name: "secondRepo",
            options: &options,
        })
        .unwrap();
        assert_eq!(
            payload,
            json!({"Name": "secondRepo", "Comment": "my comment", "FromSnapshot": "snap"})
        );
    }

    #[test]
    fn test_update_omits_absent_fields() {
        let options = RepoUpdateOptions {
            name: Some("edited".into()),
            comment: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({"Name": "edited", "Comment": ""})
        );
    }

    #[test]
    fn test_include_query() {
        let options = RepoIncludeOptions {
            no_remove_files: true,
            ignore_signature: true,
            ..Default::default()
        };
        assert_eq!(
            options.to_query().encode(),
            "ignoreSignature=1&noRemoveFiles=1"
        );
    }

    #[test]
    fn test_add_result_decodes_report() {
        let result: RepoAddResult = serde_json::from_value(json!({
            "FailedFiles": ["a.deb"],
            "Report": {"Warnings": ["w"], "Added": ["hello_1.0_amd64 added"], "Removed": []}
        }))
        .unwrap();
        assert_eq!(result.failed_files, vec!["a.deb"]);
        assert_eq!(result.report.added, vec!["hello_1.0_amd64 added"]);
    }
}
