//! First-run bootstrap of the user root.

use crate::PathsConfig;
use piekit_core::PieResult;
use std::path::PathBuf;
use tracing::info;

/// Directories that make up a complete user root.
pub fn user_root_dirs(paths: &PathsConfig) -> Vec<PathBuf> {
    vec![
        paths.user_root.clone(),
        paths.user_configs_root(),
        paths.user_plugins_root(),
    ]
}

/// Returns true when the user root and all its folders exist.
pub fn check_user_root(paths: &PathsConfig) -> bool {
    user_root_dirs(paths).iter().all(|dir| dir.is_dir())
}

/// Creates whatever part of the user root is missing.
///
/// Returns the directories that were created.
pub fn restore_user_root(paths: &PathsConfig) -> PieResult<Vec<PathBuf>> {
    let mut created = Vec::new();
    for dir in user_root_dirs(paths) {
        if !dir.is_dir() {
            std::fs::create_dir_all(&dir)?;
            info!(path = %dir.display(), "Created user directory");
            created.push(dir);
        }
    }
    Ok(created)
}
