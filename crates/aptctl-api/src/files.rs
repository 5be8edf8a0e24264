//! Upload directory endpoints (`api/files`).

use std::path::Path;

use tracing::debug;

use crate::{client::Client, error::Result};

/// Upload directory operations, obtained from [`Client::files`].
#[derive(Debug, Clone, Copy)]
pub struct Files<'a> {
    client: &'a Client,
}

impl Client {
    pub fn files(&self) -> Files<'_> {
        Files {
            client: self,
        }
    }
}

impl Files<'_> {
    /// Lists the upload directories.
    pub fn list_dirs(&self) -> Result<Vec<String>> {
        self.client.call_json(self.client.get("api/files"))
    }

    pub fn list_files(&self, dir: &str) -> Result<Vec<String>> {
        let request = self.client.get("api/files/{dir}").path_param("dir", dir);
        self.client.call_json(request)
    }

    /// Uploads `paths` into `dir` in a single multipart request. Parts are
    /// named `file0`, `file1` and so on. Returns the stored file names as
    /// reported by the server.
    pub fn upload<P: AsRef<Path>>(&self, dir: &str, paths: &[P]) -> Result<Vec<String>> {
        debug!(dir, count = paths.len(), "uploading files");

        let request = self
            .client
            .post("api/files/{dir}")
            .path_param("dir", dir)
            .files(
                paths
                    .iter()
                    .map(AsRef::<Path>::as_ref)
                    .enumerate()
                    .map(|(index, path)| (format!("file{index}"), path)),
            );
        self.client.call_json(request)
    }

    pub fn delete_dir(&self, dir: &str) -> Result<()> {
        let request = self.client.delete("api/files/{dir}").path_param("dir", dir);
        self.client.call(request)
    }

    pub fn delete_file(&self, dir: &str, file: &str) -> Result<()> {
        let request = self
            .client
            .delete("api/files/{dir}/{file}")
            .path_param("dir", dir)
            .path_param("file", file);
        self.client.call(request)
    }
}
