//! Typed client for the aptly REST API.
//!
//! A [`Client`] turns [`Request`] descriptors into HTTP calls and normalizes
//! the responses: error bodies are decoded whatever their declared content
//! type, and package listings are returned as [`Package`] values whether the
//! server sent bare keys or full objects.
//!
//! ```no_run
//! use aptctl_api::{ClientConfig, ListPackagesOptions};
//!
//! let client = ClientConfig::new("http://localhost:8080")
//!     .basic_auth("admin", "secret")
//!     .build();
//!
//! for repo in client.repos().list()? {
//!     println!("{}", repo.name);
//! }
//!
//! let pkgs = client.repos().list_packages("testing", &ListPackagesOptions::default())?;
//! println!("{} packages", pkgs.len());
//! # Ok::<(), aptctl_api::ApiError>(())
//! ```

pub mod client;
pub mod error;
pub mod files;
pub mod multipart;
pub mod package;
pub mod packages;
pub mod path;
pub mod publish;
pub mod query;
pub mod repos;
pub mod request;
pub mod response;
pub mod snapshots;
pub mod status;

pub use client::{BasicAuth, Client, ClientConfig};
pub use error::{ApiError, Result};
pub use package::{ListingMode, Package, PackageKey};
pub use publish::{
    escape_prefix, PublishDropOptions, PublishOptions, PublishUpdateOptions, PublishedList,
    SigningOptions, SourceEntry, SourceEntryRequest,
};
pub use query::QueryParams;
pub use repos::{
    ListPackagesOptions, LocalRepo, RepoAddOptions, RepoAddReport, RepoAddResult,
    RepoCreateOptions, RepoIncludeOptions, RepoUpdateOptions,
};
pub use request::{Method, Request};
pub use response::Exchange;
pub use snapshots::{
    DiffPackage, PackageDiff, Snapshot, SnapshotCreateOptions, SnapshotMergeOptions,
    SnapshotUpdateOptions,
};
pub use status::{StorageUsage, Version};
pub use ureq::{self, Proxy};
