#![cfg(unix)]
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the link pass, driven through the same setup
//! sequence the `link` command uses.

mod common;

use std::sync::Arc;

use common::{TestProject, TestProjectBuilder, tree_listing};
use serde_json::json;
use statics_merger::logging::{BufferedLog, Level, Logger};
use statics_merger::tasks::link::{LinkStats, symlink_statics};

fn fixture_project(static_map: serde_json::Value) -> TestProject {
    TestProjectBuilder::new()
        .with_manifest(&json!({
            "name": "acme/shop",
            "extra": {
                "magento-root-dir": "htdocs",
                "static-map": static_map,
            }
        }))
        .with_package(
            "acme/statics",
            "static",
            &[
                "assets/image1.jpg",
                "assets/image2.jpg",
                "assets/css/styles.css",
                "assets/fonts/font.woff",
                "favicon.ico",
            ],
        )
        .build()
}

// ---------------------------------------------------------------------------
// Tree layout
// ---------------------------------------------------------------------------

#[test]
fn links_rules_into_theme_tree() {
    let project = fixture_project(json!({
        "acme/statics": {
            "package/theme": [
                {"src": "assets/image1.jpg", "dest": "images/image1.jpg"},
                {"src": "assets/*", "dest": "root-assets"},
                {"src": "assets/css", "dest": "css"},
                {"src": "favicon*"}
            ]
        }
    }));
    let log = Arc::new(BufferedLog::new());
    let ctx = project.context(&log);

    let stats = symlink_statics(&ctx).unwrap().unwrap();

    assert_eq!(
        stats,
        LinkStats {
            linked: 5,
            skipped: 0,
            failed: 0
        }
    );
    assert!(log.errors().is_empty(), "{:?}", log.errors());
    insta::assert_snapshot!(tree_listing(&project.theme_web("htdocs", "Package/Theme")), @r"
    css -> ../../../../../../../vendor/acme/statics/assets/css/
    favicon.ico -> ../../../../../../../vendor/acme/statics/favicon.ico
    images/
    images/image1.jpg -> ../../../../../../../../vendor/acme/statics/assets/image1.jpg
    root-assets/
    root-assets/image1.jpg -> ../../../../../../../../vendor/acme/statics/assets/image1.jpg
    root-assets/image2.jpg -> ../../../../../../../../vendor/acme/statics/assets/image2.jpg
    ");
}

#[test]
fn linked_files_resolve_to_package_content() {
    let project = fixture_project(json!({
        "acme/statics": {"package/theme": [{"src": "assets", "dest": "assets"}]}
    }));
    let log = Arc::new(BufferedLog::new());
    symlink_statics(&project.context(&log)).unwrap();

    let web = project.theme_web("htdocs", "Package/Theme");
    assert_eq!(
        std::fs::read_to_string(web.join("assets/css/styles.css")).unwrap(),
        "assets/css/styles.css"
    );
}

// ---------------------------------------------------------------------------
// Testable properties
// ---------------------------------------------------------------------------

#[test]
fn second_run_produces_identical_tree() {
    let project = fixture_project(json!({
        "acme/statics": {
            "package/theme": [
                {"src": "assets/*", "dest": "img"},
                {"src": "assets/css", "dest": "css"}
            ]
        }
    }));
    let log = Arc::new(BufferedLog::new());
    let ctx = project.context(&log);
    let web = project.theme_web("htdocs", "Package/Theme");

    symlink_statics(&ctx).unwrap();
    let first = tree_listing(&web);
    symlink_statics(&ctx).unwrap();

    assert_eq!(tree_listing(&web), first);
    assert!(log.errors().is_empty());
}

#[test]
fn existing_real_file_is_never_overwritten() {
    let project = fixture_project(json!({
        "acme/statics": {
            "package/theme": [{"src": "assets/image1.jpg", "dest": "images/image1.jpg"}]
        }
    }));
    let user_file = project.write(
        "htdocs/app/design/frontend/Package/Theme/web/images/image1.jpg",
        "customised",
    );
    let log = Arc::new(BufferedLog::new());

    let stats = symlink_statics(&project.context(&log)).unwrap().unwrap();

    assert_eq!(stats.skipped, 1);
    assert_eq!(std::fs::read_to_string(&user_file).unwrap(), "customised");
    let errors = log.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Your static path: \""));
    assert!(errors[0].ends_with("images/image1.jpg\" is currently not a symlink, please remove first"));
}

#[test]
fn glob_links_files_but_not_directories() {
    let project = fixture_project(json!({
        "acme/statics": {"package/theme": [{"src": "assets/*"}]}
    }));
    let log = Arc::new(BufferedLog::new());

    symlink_statics(&project.context(&log)).unwrap();

    let web = project.theme_web("htdocs", "Package/Theme");
    assert!(web.join("assets/image1.jpg").is_symlink());
    assert!(web.join("assets/image2.jpg").is_symlink());
    assert!(!web.join("assets/css").exists());
    assert!(!web.join("assets/fonts").exists());
}

#[test]
fn one_package_feeds_independent_themes() {
    let project = fixture_project(json!({
        "acme/statics": {
            "package/theme": [{"src": "assets/image1.jpg", "dest": "images/one.jpg"}],
            "package/other": [{"src": "favicon.ico", "dest": "favicon.ico"}]
        }
    }));
    let log = Arc::new(BufferedLog::new());

    symlink_statics(&project.context(&log)).unwrap();

    insta::assert_snapshot!(tree_listing(&project.theme_web("htdocs", "Package/Theme")), @r"
    images/
    images/one.jpg -> ../../../../../../../../vendor/acme/statics/assets/image1.jpg
    ");
    insta::assert_snapshot!(tree_listing(&project.theme_web("htdocs", "Package/Other")), @"favicon.ico -> ../../../../../../../vendor/acme/statics/favicon.ico");
}

#[test]
fn missing_static_map_reports_once_and_changes_nothing() {
    let project = TestProjectBuilder::new()
        .with_manifest(&json!({"extra": {"magento-root-dir": "htdocs"}}))
        .with_package("acme/statics", "static", &["favicon.ico"])
        .build();
    let log = Arc::new(BufferedLog::new());

    assert!(symlink_statics(&project.context(&log)).unwrap().is_none());

    assert_eq!(
        log.messages_at_least(Level::Info),
        vec!["No static maps defined".to_string()]
    );
    assert!(!project.root_path().join("htdocs").exists());
}

#[test]
fn missing_magento_root_links_under_project_root() {
    let project = TestProjectBuilder::new()
        .with_manifest(&json!({
            "extra": {"static-map": {"acme/statics": {"package/theme": [{"src": "favicon.ico", "dest": "favicon.ico"}]}}}
        }))
        .with_package("acme/statics", "static", &["favicon.ico"])
        .build();
    let log = Arc::new(BufferedLog::new());

    symlink_statics(&project.context(&log)).unwrap();

    assert!(
        project
            .root_path()
            .join("app/design/frontend/Package/Theme/web/favicon.ico")
            .is_symlink()
    );
    assert!(log.messages_at_least(Level::Info).contains(
        &"Magento root dir not defined, assumed current working directory".to_string()
    ));
}

#[test]
fn dotted_magento_root_yields_resolvable_links() {
    for magento_root in ["./htdocs", "vendor/../htdocs", "htdocs/"] {
        let project = TestProjectBuilder::new()
            .with_manifest(&json!({
                "extra": {
                    "magento-root-dir": magento_root,
                    "static-map": {"acme/statics": {"package/theme": [{"src": "favicon.ico", "dest": "favicon.ico"}]}}
                }
            }))
            .with_package("acme/statics", "static", &["favicon.ico"])
            .build();
        let log = Arc::new(BufferedLog::new());
        let ctx = project.context(&log);

        let stats = symlink_statics(&ctx).unwrap().unwrap();

        let link = project.theme_web("htdocs", "Package/Theme").join("favicon.ico");
        assert_eq!(stats.linked, 1, "{magento_root}");
        assert_eq!(
            std::fs::read_link(&link).unwrap(),
            std::path::PathBuf::from("../../../../../../../vendor/acme/statics/favicon.ico"),
            "{magento_root}"
        );
        assert_eq!(std::fs::read_to_string(&link).unwrap(), "favicon.ico");

        statics_merger::tasks::cleanup::statics_cleanup(&ctx).unwrap();
        assert!(!link.is_symlink(), "{magento_root}");
    }
}

#[test]
fn rule_leaving_theme_directory_fails_manifest_load() {
    let project = TestProjectBuilder::new()
        .with_manifest(&json!({
            "extra": {
                "magento-root-dir": "htdocs",
                "static-map": {"acme/statics": {"package/theme": [{"src": "favicon.ico", "dest": "../escaped.ico"}]}}
            }
        }))
        .with_package("acme/statics", "static", &["favicon.ico"])
        .build();
    let log = Arc::new(Logger::new("link-test"));

    let err = statics_merger::commands::link::run(&project.global(), &log).unwrap_err();

    let chain = format!("{err:#}");
    assert!(chain.contains("loading root manifest"), "{chain}");
    assert!(chain.contains("dest \"../escaped.ico\" must not contain '..'"), "{chain}");
    let escaped = project
        .root_path()
        .join("htdocs/app/design/frontend/Package/Theme/escaped.ico");
    assert!(!escaped.is_symlink());
}

#[test]
fn non_static_packages_are_not_linked() {
    let project = TestProjectBuilder::new()
        .with_manifest(&json!({
            "extra": {
                "magento-root-dir": "htdocs",
                "static-map": {"acme/library": {"package/theme": [{"src": "a.css", "dest": "a.css"}]}}
            }
        }))
        .with_package("acme/library", "library", &["a.css"])
        .build();
    let log = Arc::new(BufferedLog::new());

    let stats = symlink_statics(&project.context(&log)).unwrap().unwrap();

    assert_eq!(stats, LinkStats::default());
    assert!(!project.theme_web("htdocs", "Package/Theme").exists());
}

#[test]
fn rule_errors_are_reported_in_order() {
    let project = fixture_project(json!({
        "acme/statics": {
            "package/theme": [
                {"src": "assets/image2.jpg"},
                {"src": "assets/missing", "dest": "missing"},
                {"src": "assets/image1.jpg", "dest": "image1.jpg"}
            ],
            "package/empty": []
        }
    }));
    let log = Arc::new(BufferedLog::new());

    let stats = symlink_statics(&project.context(&log)).unwrap().unwrap();

    assert_eq!(stats.linked, 1);
    assert_eq!(stats.skipped, 3);
    insta::assert_snapshot!(log.errors().join("\n"), @r#"
    acme/statics requires at least one file mapping, has none!
    Full path is required for: "assets/image2.jpg"
    The static package does not contain directory: "assets/missing"
    "#);
}

// ---------------------------------------------------------------------------
// Command entry point
// ---------------------------------------------------------------------------

#[test]
fn link_command_succeeds_and_records_task() {
    let project = fixture_project(json!({
        "acme/statics": {"package/theme": [{"src": "favicon*"}]}
    }));
    let log = Arc::new(Logger::new("link-test"));

    statics_merger::commands::link::run(&project.global(), &log).unwrap();

    assert_eq!(log.failure_count(), 0);
    assert_eq!(log.task_entries().len(), 1);
    assert!(
        project
            .theme_web("htdocs", "Package/Theme")
            .join("favicon.ico")
            .is_symlink()
    );
}

#[test]
fn link_command_fails_on_invalid_manifest() {
    let project = TestProjectBuilder::new()
        .with_manifest(&json!({"extra": {"static-map": {"acme/statics": "package/theme"}}}))
        .build();
    let log = Arc::new(Logger::new("link-test"));

    let err = statics_merger::commands::link::run(&project.global(), &log).unwrap_err();
    assert!(format!("{err:#}").contains("loading root manifest"));
}
