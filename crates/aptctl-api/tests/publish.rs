mod common;

use aptctl_api::{
    PublishDropOptions, PublishOptions, PublishUpdateOptions, SigningOptions, SourceEntryRequest,
};
use httpmock::prelude::*;
use serde_json::json;

fn published(prefix: &str, kind: &str, name: &str) -> serde_json::Value {
    json!({
        "Architectures": ["amd64"],
        "Distribution": "bookworm",
        "Label": "",
        "Origin": "",
        "Prefix": prefix,
        "Path": format!("{prefix}/bookworm"),
        "SourceKind": kind,
        "Sources": [{"Component": "main", "Name": name}]
    })
}

#[test]
fn test_list() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/publish");
        then.status(200).json_body(json!([
            published("repo", "local", "testing"),
            published("snap", "snapshot", "testing")
        ]));
    });

    let list = common::client(&server).publish().list().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list[0].is_local());
    assert_eq!(list[0].path, "repo/bookworm");
    assert_eq!(list[1].source_kind, "snapshot");
    assert_eq!(list[1].sources[0].component, "main");
    assert_eq!(list[1].sources[0].name, "testing");
}

#[test]
fn test_show_escapes_prefix() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/publish/debian_stable__main/bookworm");
        then.status(200)
            .json_body(published("debian/stable_main", "local", "testing"));
    });

    let published = common::client(&server)
        .publish()
        .show("bookworm", "debian/stable_main")
        .unwrap();
    assert_eq!(published.prefix, "debian/stable_main");
    mock.assert();
}

#[test]
fn test_show_root_prefix() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/publish/:./bookworm");
        then.status(200).json_body(published(".", "local", "testing"));
    });

    common::client(&server)
        .publish()
        .show("bookworm", ".")
        .unwrap();
    mock.assert();
}

#[test]
fn test_drop() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE)
            .path("/api/publish/repo/bookworm")
            .query_param("force", "1")
            .query_param("skipCleanup", "1");
        then.status(200).body("{}");
    });

    let options = PublishDropOptions {
        force: true,
        skip_cleanup: true,
    };
    common::client(&server)
        .publish()
        .drop("bookworm", "repo", options)
        .unwrap();
    mock.assert();
}

#[test]
fn test_publish_repo() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/publish/repo").json_body(json!({
            "SourceKind": "local",
            "Sources": [{"Component": "main", "Name": "testing"}],
            "Distribution": "bookworm",
            "Signing": {"Skip": true}
        }));
        then.status(201).json_body(published("repo", "local", "testing"));
    });

    let options = PublishOptions {
        distribution: Some("bookworm".into()),
        component: Some("main".into()),
        ..Default::default()
    };
    let published = common::client(&server)
        .publish()
        .publish_repo("testing", "repo", &options, &SigningOptions::without_signing())
        .unwrap();
    assert!(published.is_local());
    mock.assert();
}

#[test]
fn test_publish_snapshot_with_signing() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/publish/snap").json_body(json!({
            "SourceKind": "snapshot",
            "Sources": [{"Name": "testing"}],
            "Architectures": ["amd64", "arm64"],
            "Signing": {
                "Skip": false,
                "GpgKey": "A0546A43624A8331",
                "PassphraseFile": "/etc/aptly/pass"
            }
        }));
        then.status(201).json_body(published("snap", "snapshot", "testing"));
    });

    let options = PublishOptions {
        architectures: vec!["amd64".into(), "arm64".into()],
        ..Default::default()
    };
    let signing = SigningOptions {
        gpg_key: Some("A0546A43624A8331".into()),
        passphrase_file: Some("/etc/aptly/pass".into()),
        ..Default::default()
    };
    common::client(&server)
        .publish()
        .publish_snapshot("testing", "snap", &options, &signing)
        .unwrap();
    mock.assert();
}

#[test]
fn test_switch_snapshot() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT).path("/api/publish/snap/bookworm").json_body(json!({
            "ForceOverwrite": true,
            "Signing": {"Skip": true},
            "Snapshots": [{"Component": "main", "Name": "testing2"}]
        }));
        then.status(200).json_body(published("snap", "snapshot", "testing2"));
    });

    let options = PublishUpdateOptions {
        force_overwrite: true,
        signing: SigningOptions::without_signing(),
        snapshots: vec![SourceEntryRequest {
            component: Some("main".into()),
            name: "testing2".into(),
        }],
        ..Default::default()
    };
    let published = common::client(&server)
        .publish()
        .update_or_switch("snap", "bookworm", &options)
        .unwrap();
    assert_eq!(published.sources[0].name, "testing2");
    mock.assert();
}

#[test]
fn test_update_escapes_distribution() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT).path("/api/publish/repo/stable__updates");
        then.status(200).json_body(published("repo", "local", "testing"));
    });

    common::client(&server)
        .publish()
        .update_or_switch("repo", "stable_updates", &PublishUpdateOptions::default())
        .unwrap();
    mock.assert();
}
