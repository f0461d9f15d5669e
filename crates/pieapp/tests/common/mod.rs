//! Common test infrastructure for application tests.

#![allow(dead_code)]

use piekit_config::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary app and user roots.
pub struct TestHost {
    dir: TempDir,
}

impl TestHost {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn app_root(&self) -> PathBuf {
        self.dir.path().join("app")
    }

    pub fn user_root(&self) -> PathBuf {
        self.dir.path().join("user")
    }

    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        config.app.version = "1.0.0".to_string();
        config.framework.version = "1.0.0".to_string();
        config.paths.app_root = self.app_root();
        config.paths.user_root = self.user_root();
        config
    }

    /// Writes a built-in package resolving to `entry`.
    pub fn package(&self, name: &str, entry: &str, application_version: &str) -> &Self {
        let dir = self.app_root().join("plugins").join(name);
        write(
            &dir.join("package.toml"),
            &format!(
                "version = \"1.0.0\"\npieapp_application_version = \"{}\"\nframework_version = \"1.0.0\"\n",
                application_version
            ),
        );
        write(&dir.join("plugin.toml"), &format!("entry = \"{}\"\n", entry));
        self
    }

    /// Writes every built-in package.
    pub fn builtin_packages(&self) -> &Self {
        for name in ["statusbar", "menubar", "converter", "metadata-editor"] {
            self.package(name, name, "1.0.0");
        }
        self
    }

    /// Writes a shared JSON config file.
    pub fn shared_config(&self, file: &str, contents: &str) -> &Self {
        write(&self.app_root().join("configs").join(file), contents);
        self
    }
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create dir");
    }
    fs::write(path, contents).expect("Failed to write file");
}
