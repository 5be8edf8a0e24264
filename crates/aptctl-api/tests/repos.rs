mod common;

use aptctl_api::{
    ApiError, ListPackagesOptions, RepoAddOptions, RepoCreateOptions, RepoIncludeOptions,
    RepoUpdateOptions,
};
use httpmock::prelude::*;
use serde_json::json;

#[test]
fn test_list() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/repos");
        then.status(200).json_body(json!([
            {"Name": "secondRepo", "Comment": "", "DefaultDistribution": "", "DefaultComponent": ""},
            {"Name": "testrepo", "Comment": "comment", "DefaultDistribution": "bookworm", "DefaultComponent": "main"}
        ]));
    });

    let repos = common::client(&server).repos().list().unwrap();
    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].name, "secondRepo");
    assert_eq!(repos[1].default_distribution, "bookworm");
    assert_eq!(repos[1].default_component, "main");
}

#[test]
fn test_create() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/repos")
            .json_body(json!({"Name": "testrepo", "Comment": "comment", "DefaultDistribution": "bookworm"}));
        then.status(201).json_body(json!({
            "Name": "testrepo", "Comment": "comment", "DefaultDistribution": "bookworm", "DefaultComponent": ""
        }));
    });

    let options = RepoCreateOptions {
        comment: Some("comment".into()),
        default_distribution: Some("bookworm".into()),
        ..Default::default()
    };
    let repo = common::client(&server)
        .repos()
        .create("testrepo", &options)
        .unwrap();
    assert_eq!(repo.name, "testrepo");
    mock.assert();
}

#[test]
fn test_edit_renames() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/repos/testrepo")
            .json_body(json!({"Name": "renamed"}));
        then.status(200).json_body(json!({"Name": "renamed"}));
    });

    let options = RepoUpdateOptions {
        name: Some("renamed".into()),
        ..Default::default()
    };
    let repo = common::client(&server)
        .repos()
        .edit("testrepo", &options)
        .unwrap();
    assert_eq!(repo.name, "renamed");
    mock.assert();
}

#[test]
fn test_show_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/repos/missing");
        then.status(404)
            .header("content-type", "application/json")
            .body(r#"{"error":"local repo with name missing not found"}"#);
    });

    let err = common::client(&server).repos().show("missing").unwrap_err();
    assert_eq!(err.to_string(), "local repo with name missing not found");
    assert_eq!(err.status(), Some(404));
}

#[test]
fn test_list_packages_simple() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/repos/testrepo/packages")
            .query_param("q", "hello")
            .query_param("maximumVersion", "1");
        then.status(200).body(common::SIMPLE_LISTING);
    });

    let options = ListPackagesOptions {
        query: Some("hello".into()),
        maximum_version: true,
        ..Default::default()
    };
    let pkgs = common::client(&server)
        .repos()
        .list_packages("testrepo", &options)
        .unwrap();

    assert_eq!(pkgs.len(), 2);
    assert_eq!(pkgs[0].key, "Pamd64 nano 7.2-1+deb12u1 c5d2ac1639544e75");
    assert_eq!(pkgs[0].package, "nano");
    assert_eq!(pkgs[1].architecture, "source");
    assert_eq!(pkgs[1].short_key, None);
    mock.assert();
}

#[test]
fn test_list_packages_detailed() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/repos/testrepo/packages")
            .query_param("format", "details");
        then.status(200)
            .header("content-type", "application/json")
            .body(common::DETAILED_LISTING);
    });

    let options = ListPackagesOptions {
        detailed: true,
        ..Default::default()
    };
    let pkgs = common::client(&server)
        .repos()
        .list_packages("testrepo", &options)
        .unwrap();

    assert_eq!(pkgs.len(), 3);
    assert_eq!(pkgs[0].field("Depends"), Some("libc6 (>= 2.34)"));
    assert_eq!(pkgs[1].source.as_deref(), Some("hello"));
    assert_eq!(pkgs[2].architecture, "any");
    assert_eq!(pkgs[2].short_key.as_deref(), Some("Psource hello 3.0.0-2"));
    mock.assert();
}

#[test]
fn test_list_packages_malformed_key() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/repos/testrepo/packages");
        then.status(200).body(r#"["Pamd64 nano 7.2-1+deb12u1 c5d2ac1639544e75", "garbage"]"#);
    });

    let err = common::client(&server)
        .repos()
        .list_packages("testrepo", &ListPackagesOptions::default())
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidPackageKey { ref key } if key == "garbage"));
}

#[test]
fn test_list_packages_with_deps_without_query() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET);
        then.status(200).body("[]");
    });

    let options = ListPackagesOptions {
        with_deps: true,
        ..Default::default()
    };
    let err = common::client(&server)
        .repos()
        .list_packages("testrepo", &options)
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    mock.assert_hits(0);
}

#[test]
fn test_drop_force() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE)
            .path("/api/repos/testrepo")
            .query_param("force", "1");
        then.status(200).body("{}");
    });

    common::client(&server)
        .repos()
        .drop("testrepo", true)
        .unwrap();
    mock.assert();
}

#[test]
fn test_add_directory() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/repos/testrepo/file/upload_abcdefgh")
            .query_param("forceReplace", "1");
        then.status(200).json_body(json!({
            "FailedFiles": [],
            "Report": {
                "Warnings": [],
                "Added": ["hello_3.0.0-2_amd64 added"],
                "Removed": []
            }
        }));
    });

    let options = RepoAddOptions {
        force_replace: true,
        ..Default::default()
    };
    let result = common::client(&server)
        .repos()
        .add_directory("testrepo", "upload_abcdefgh", options)
        .unwrap();
    assert!(result.failed_files.is_empty());
    assert_eq!(result.report.added, vec!["hello_3.0.0-2_amd64 added"]);
    mock.assert();
}

#[test]
fn test_add_file() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/repos/testrepo/file/upload_abcdefgh/hello_3.0.0-2_amd64.deb")
            .query_param("noRemove", "1");
        then.status(200).json_body(json!({"FailedFiles": ["hello_3.0.0-2_amd64.deb"]}));
    });

    let options = RepoAddOptions {
        no_remove: true,
        ..Default::default()
    };
    let result = common::client(&server)
        .repos()
        .add_file("testrepo", "upload_abcdefgh", "hello_3.0.0-2_amd64.deb", options)
        .unwrap();
    assert_eq!(result.failed_files, vec!["hello_3.0.0-2_amd64.deb"]);
    assert!(result.report.added.is_empty());
    mock.assert();
}

#[test]
fn test_include_directory() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/repos/testrepo/include/upload_abcdefgh")
            .query_param("acceptUnsigned", "1")
            .query_param("ignoreSignature", "1");
        then.status(200).json_body(json!({"FailedFiles": [], "Report": {}}));
    });

    let options = RepoIncludeOptions {
        accept_unsigned: true,
        ignore_signature: true,
        ..Default::default()
    };
    common::client(&server)
        .repos()
        .include_directory("testrepo", "upload_abcdefgh", options)
        .unwrap();
    mock.assert();
}

#[test]
fn test_include_file() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/repos/testrepo/include/upload_abcdefgh/hello_3.0.0-2_amd64.changes");
        then.status(200).json_body(json!({"FailedFiles": [], "Report": {}}));
    });

    common::client(&server)
        .repos()
        .include_file(
            "testrepo",
            "upload_abcdefgh",
            "hello_3.0.0-2_amd64.changes",
            RepoIncludeOptions::default(),
        )
        .unwrap();
    mock.assert();
}

#[test]
fn test_add_and_remove_packages_echo_keys() {
    let keys = vec!["xDPamd64 hello 3.0.0-2 96e8a0deaf8fc95f".to_string()];

    let server = MockServer::start();
    let add = server.mock(|when, then| {
        when.method(POST)
            .path("/api/repos/testrepo/packages")
            .json_body(json!({"PackageRefs": ["xDPamd64 hello 3.0.0-2 96e8a0deaf8fc95f"]}));
        then.status(200).json_body(json!({"Name": "testrepo"}));
    });
    let remove = server.mock(|when, then| {
        when.method(DELETE)
            .path("/api/repos/testrepo/packages")
            .json_body(json!({"PackageRefs": ["xDPamd64 hello 3.0.0-2 96e8a0deaf8fc95f"]}));
        then.status(200).json_body(json!({"Name": "testrepo"}));
    });

    let client = common::client(&server);
    client.repos().add_packages("testrepo", &keys).unwrap();
    client.repos().remove_packages("testrepo", &keys).unwrap();
    add.assert();
    remove.assert();
}
