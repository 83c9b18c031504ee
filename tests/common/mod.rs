// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed Magento project and a fluent builder
// so each integration test can lay out a manifest, vendor packages and
// installed.json without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use statics_merger::cli::GlobalOpts;
use statics_merger::commands::CommandSetup;
use statics_merger::logging::{BufferedLog, Log};
use statics_merger::tasks::Context;

/// An isolated project backed by a [`tempfile::TempDir`].
pub struct TestProject {
    /// Temporary directory containing the project.
    pub root: tempfile::TempDir,
}

impl TestProject {
    /// Path to the project root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Global options pointing at this project.
    pub fn global(&self) -> GlobalOpts {
        GlobalOpts {
            root: Some(self.root.path().to_path_buf()),
            config: None,
        }
    }

    /// Run the command setup and build a task context reporting into `log`.
    pub fn context(&self, log: &Arc<BufferedLog>) -> Context {
        let setup = CommandSetup::init(&self.global(), &**log).expect("command setup");
        Context::new(
            Arc::new(setup.config),
            Arc::new(setup.packages),
            setup.project_root,
            Arc::clone(log) as Arc<dyn Log>,
        )
    }

    /// Theme `web` directory under `<magento_root>/app/design/frontend`.
    pub fn theme_web(&self, magento_root: &str, design_path: &str) -> PathBuf {
        self.root
            .path()
            .join(magento_root)
            .join("app/design/frontend")
            .join(design_path)
            .join("web")
    }

    /// Write a file relative to the project root.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write file");
        path
    }
}

/// Sorted listing of everything under `root`: directories end in `/`,
/// symlinks show their literal target.
pub fn tree_listing(root: &Path) -> String {
    let mut lines = Vec::new();
    for entry in walkdir::WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.expect("walk entry");
        let relative = entry
            .path()
            .strip_prefix(root)
            .expect("entry under root")
            .to_string_lossy()
            .into_owned();
        if entry.path_is_symlink() {
            let target = std::fs::read_link(entry.path()).expect("read link");
            lines.push(format!("{relative} -> {}", target.display()));
        } else if entry.file_type().is_dir() {
            lines.push(format!("{relative}/"));
        } else {
            lines.push(relative);
        }
    }
    lines.join("\n")
}

/// Fluent builder for [`TestProject`].
pub struct TestProjectBuilder {
    root: tempfile::TempDir,
    installed: Vec<serde_json::Value>,
}

impl TestProjectBuilder {
    /// Begin building an empty project.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
            installed: Vec::new(),
        }
    }

    /// Write `composer.json` with the given content.
    pub fn with_manifest(self, manifest: &serde_json::Value) -> Self {
        std::fs::write(
            self.root.path().join("composer.json"),
            serde_json::to_string_pretty(manifest).expect("serialize manifest"),
        )
        .expect("write composer.json");
        self
    }

    /// Install a package of `package_type` under `vendor/<name>`; each file
    /// contains its own relative path.
    pub fn with_package(mut self, name: &str, package_type: &str, files: &[&str]) -> Self {
        let package_root = self.root.path().join("vendor").join(name);
        std::fs::create_dir_all(&package_root).expect("create package dir");
        for file in files {
            let path = package_root.join(file);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("create package subdir");
            }
            std::fs::write(&path, file).expect("write package file");
        }
        self.installed.push(serde_json::json!({
            "name": name,
            "type": package_type,
            "install-path": format!("../{name}"),
        }));
        self
    }

    /// Create an empty directory inside an installed package.
    pub fn with_package_dir(self, name: &str, dir: &str) -> Self {
        std::fs::create_dir_all(self.root.path().join("vendor").join(name).join(dir))
            .expect("create package dir");
        self
    }

    /// Finish building: writes `vendor/composer/installed.json`.
    pub fn build(self) -> TestProject {
        let composer = self.root.path().join("vendor/composer");
        std::fs::create_dir_all(&composer).expect("create vendor/composer");
        std::fs::write(
            composer.join("installed.json"),
            serde_json::json!({ "packages": self.installed, "dev": true }).to_string(),
        )
        .expect("write installed.json");
        TestProject { root: self.root }
    }
}
