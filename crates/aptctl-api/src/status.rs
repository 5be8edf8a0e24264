use serde::Deserialize;

use crate::{client::Client, error::Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Version {
    pub version: String,
}

/// Disk usage of the server's storage root. `free` and `total` are in MiB.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StorageUsage {
    pub free: u64,
    pub total: u64,
    pub percent_full: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Status<'a> {
    client: &'a Client,
}

impl Client {
    pub fn status(&self) -> Status<'_> {
        Status {
            client: self,
        }
    }
}

impl Status<'_> {
    pub fn version(&self) -> Result<Version> {
        self.client.call_json(self.client.get("api/version"))
    }

    pub fn storage_usage(&self) -> Result<StorageUsage> {
        self.client.call_json(self.client.get("api/storage"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_storage_usage() {
        let usage: StorageUsage =
            serde_json::from_str(r#"{"Total":1000,"Free":455,"PercentFull":55.5}"#).unwrap();
        assert_eq!(usage.total, 1000);
        assert_eq!(usage.free, 455);
        assert_eq!(usage.percent_full, 55.5);
    }

    #[test]
    fn test_decode_version() {
        let version: Version = serde_json::from_str(r#"{"Version":"1.5.0"}"#).unwrap();
        assert_eq!(version.version, "1.5.0");
    }
}
