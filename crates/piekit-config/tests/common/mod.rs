//! Common test infrastructure for configuration tests.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Temporary `config/` directory populated with TOML layers.
pub struct TestConfigDir {
    dir: TempDir,
}

impl TestConfigDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Writes `<name>.toml` with the given contents.
    pub fn layer(self, name: &str, contents: &str) -> Self {
        fs::write(self.dir.path().join(format!("{}.toml", name)), contents)
            .expect("Failed to write config layer");
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
