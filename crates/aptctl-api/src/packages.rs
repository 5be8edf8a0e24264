//! Package search across the whole package database (`api/packages`).

use crate::{
    client::Client,
    error::Result,
    package::{ListingMode, Package},
    query::QueryParams,
};

#[derive(Debug, Clone, Copy)]
pub struct Packages<'a> {
    client: &'a Client,
}

impl Client {
    pub fn packages(&self) -> Packages<'_> {
        Packages {
            client: self,
        }
    }
}

impl Packages<'_> {
    /// Searches every package known to the server. An empty query lists
    /// everything.
    pub fn search(&self, query: &str, detailed: bool) -> Result<Vec<Package>> {
        let mode = ListingMode::from_detailed(detailed);
        let mut params = QueryParams::new();
        params.optional("q", Some(query).filter(|q| !q.is_empty()));
        mode.apply(&mut params);

        let request = self.client.get("api/packages").query(params);
        self.client.call_listing(request, mode)
    }

    /// Fetches one package by its key.
    pub fn show(&self, key: &str) -> Result<Package> {
        let request = self.client.get("api/packages/{key}").path_param("key", key);
        self.client.call_json(request)
    }
}
