//! Integration tests for toolchain provisioning against a mock download server

use mobup_core::MobupError;
use mobup_core::lock::LockCoordinator;
use mobup_core::log::LogContext;
use mobup_testkit::hash_tree;
use mobup_toolchain::{Provisioner, Resource};
use mockito::Server;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

fn resource(name: &str, version: &str, url: String) -> Resource {
    Resource {
        name: name.to_string(),
        version: version.to_string(),
        os: String::new(),
        arch: String::new(),
        url,
    }
}

fn provisioner(home: &Path) -> Provisioner {
    Provisioner::new(home.join("toolchains"), LogContext::new("provision-test")).unwrap()
}

fn leftovers(toolchains: &Path) -> Vec<String> {
    fs::read_dir(toolchains)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|n| n.ends_with(".tmp"))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn test_provision_is_idempotent() {
    let archive = mobup_testkit::tar_gz(&[
        ("go/", ""),
        ("go/bin/go", "#!/bin/sh\n"),
        ("go/VERSION", "go1.12.4"),
        ("._go", "apple double"),
    ]);

    let mut server = Server::new();
    let mock = server
        .mock("GET", "/go1.12.4.linux-amd64.tar.gz")
        .with_status(200)
        .with_body(archive)
        .expect(1)
        .create();

    let home = TempDir::new().unwrap();
    let provisioner = provisioner(home.path());
    let go = resource(
        "go",
        "1.12.4",
        format!("{}/go1.12.4.linux-amd64.tar.gz", server.url()),
    );

    let first = provisioner.provision(&go).unwrap();
    assert_eq!(first.path, home.path().join("toolchains/go-1.12.4"));
    assert_eq!(
        fs::read_to_string(first.path.join("VERSION")).unwrap(),
        "go1.12.4"
    );
    let hash = hash_tree(&first.path);

    let second = provisioner.provision(&go).unwrap();
    assert_eq!(second, first);
    assert_eq!(hash_tree(&second.path), hash);

    mock.assert();
    assert!(leftovers(&home.path().join("toolchains")).is_empty());
}

#[test]
fn test_zip_with_several_top_level_entries_is_not_unwrapped() {
    let archive = mobup_testkit::zip(&[
        ("tools/", ""),
        ("tools/bin/sdkmanager", "#!/bin/sh\n"),
        ("NOTICE.txt", "notice"),
        ("__MACOSX/", ""),
        ("__MACOSX/._tools", ""),
    ]);

    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/sdk-tools.zip")
        .with_status(200)
        .with_body(archive)
        .create();

    let home = TempDir::new().unwrap();
    let sdk = resource("sdk", "4333796", format!("{}/sdk-tools.zip", server.url()));
    let installed = provisioner(home.path()).provision(&sdk).unwrap();

    assert!(installed.path.join("tools/bin/sdkmanager").is_file());
    assert!(installed.path.join("NOTICE.txt").is_file());
    assert!(!installed.path.join("__MACOSX").exists());
}

#[test]
fn test_tar_xz_archive() {
    let archive = mobup_testkit::tar_xz(&[("jdk8u212-b03/", ""), ("jdk8u212-b03/bin/java", "")]);

    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/jdk.tar.xz")
        .with_status(200)
        .with_body(archive)
        .create();

    let home = TempDir::new().unwrap();
    let jdk = resource("jdk", "8u212b03", format!("{}/jdk.tar.xz", server.url()));
    let installed = provisioner(home.path()).provision(&jdk).unwrap();
    assert!(installed.path.join("bin/java").is_file());
}

#[test]
fn test_failed_download_leaves_nothing_behind() {
    let mut server = Server::new();
    let _mock = server.mock("GET", "/ndk.zip").with_status(404).create();

    let home = TempDir::new().unwrap();
    let ndk = resource("ndk", "r19c", format!("{}/ndk.zip", server.url()));
    let err = provisioner(home.path()).provision(&ndk).unwrap_err();

    match err {
        MobupError::ProvisioningFailed { resource, .. } => assert_eq!(resource, "ndk-r19c"),
        other => panic!("unexpected error: {other}"),
    }
    let toolchains = home.path().join("toolchains");
    assert!(!toolchains.join("ndk-r19c").exists());
    assert!(leftovers(&toolchains).is_empty());
}

#[test]
fn test_empty_archive_is_rejected() {
    let archive = mobup_testkit::tar_gz(&[(".DS_Store", ""), ("__MACOSX/", "")]);

    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/empty.tar.gz")
        .with_status(200)
        .with_body(archive)
        .create();

    let home = TempDir::new().unwrap();
    let empty = resource("gomobile", "x", format!("{}/empty.tar.gz", server.url()));
    let err = provisioner(home.path()).provision(&empty).unwrap_err();

    assert!(err.to_string().contains("no files in resource"));
    assert!(!home.path().join("toolchains/gomobile-x").exists());
}

#[test]
fn test_unsupported_format() {
    let home = TempDir::new().unwrap();
    let dmg = resource("jdk", "8", "https://example.invalid/jdk.dmg".to_string());
    let err = provisioner(home.path()).provision(&dmg).unwrap_err();
    assert!(err.to_string().contains("unsupported archive format"));
}

#[test]
fn test_concurrent_provisioning_under_lock_downloads_once() {
    let archive = mobup_testkit::tar_gz(&[("go/", ""), ("go/VERSION", "go1.12.4")]);

    let mut server = Server::new();
    let mock = server
        .mock("GET", "/go.tar.gz")
        .with_status(200)
        .with_body(archive)
        .expect(1)
        .create();
    let url = format!("{}/go.tar.gz", server.url());

    let home = TempDir::new().unwrap();
    let home_path = Arc::new(home.path().to_path_buf());
    let barrier = Arc::new(Barrier::new(3));

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let home_path = Arc::clone(&home_path);
            let barrier = Arc::clone(&barrier);
            let go = resource("go", "1.12.4", url.clone());
            thread::spawn(move || {
                let log = LogContext::new("provision-test");
                let locks = LockCoordinator::new(home_path.as_path(), None, log.clone());
                barrier.wait();
                let guard = locks.lock_toolchains().unwrap();
                let installed = provisioner(&home_path).provision(&go).unwrap();
                guard.release().unwrap();
                installed
            })
        })
        .collect();

    for handle in handles {
        let installed = handle.join().unwrap();
        assert!(installed.path.join("VERSION").is_file());
    }
    mock.assert();
}
