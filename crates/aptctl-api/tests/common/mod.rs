#![allow(dead_code)]

use aptctl_api::Client;
use httpmock::MockServer;

pub fn client(server: &MockServer) -> Client {
    Client::new(server.base_url())
}

pub const SIMPLE_LISTING: &str =
    r#"["Pamd64 nano 7.2-1+deb12u1 c5d2ac1639544e75", "Psource hello 3.0.0-2 571d33f41765ddba"]"#;

pub const DETAILED_LISTING: &str = r#"[
  {
    "Architecture": "amd64",
    "Depends": "libc6 (>= 2.34)",
    "Filename": "hello_3.0.0-2_amd64.deb",
    "FilesHash": "96e8a0deaf8fc95f",
    "Key": "Pamd64 hello 3.0.0-2 96e8a0deaf8fc95f",
    "Package": "hello",
    "ShortKey": "Pamd64 hello 3.0.0-2",
    "Version": "3.0.0-2"
  },
  {
    "Architecture": "amd64",
    "FilesHash": "a3bd7d6dc3b1c7e5",
    "Key": "Pamd64 hello-dbgsym 3.0.0-2 a3bd7d6dc3b1c7e5",
    "Package": "hello-dbgsym",
    "ShortKey": "Pamd64 hello-dbgsym 3.0.0-2",
    "Source": "hello",
    "Version": "3.0.0-2"
  },
  {
    "Architecture": "any",
    "Binary": "hello",
    "FilesHash": "571d33f41765ddba",
    "Format": "1.0",
    "Key": "Psource hello 3.0.0-2 571d33f41765ddba",
    "Package": "hello",
    "ShortKey": "Psource hello 3.0.0-2",
    "Version": "3.0.0-2"
  }
]"#;
