//! Plugin package discovery and version checks.
//!
//! A package is a directory under a plugin root holding a package manifest
//! (`package.toml`), a plugin module (`plugin.toml`) naming the catalog entry,
//! and optionally a globals file.

use crate::PluginCatalog;
use piekit_config::{Globals, PluginsConfig};
use piekit_core::{PieError, PieResult};
use piekit_plugin_api::{PackageVersions, PluginEntry, PluginPackage};
use semver::Version;
use serde::Deserialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Versions the host application declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostVersions {
    pub application: String,
    pub framework: String,
}

impl HostVersions {
    pub fn new(application: impl Into<String>, framework: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            framework: framework.into(),
        }
    }
}

/// Contents of `package.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    pub version: Option<String>,
    pub pieapp_application_version: Option<String>,
    pub framework_version: Option<String>,
}

/// Contents of `plugin.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginModule {
    pub entry: Option<String>,
}

/// A package whose manifest passed the checks and whose entry resolved.
#[derive(Clone)]
pub struct ResolvedPackage {
    pub package: PluginPackage,
    pub entry: PluginEntry,
}

impl fmt::Debug for ResolvedPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedPackage")
            .field("package", &self.package)
            .finish_non_exhaustive()
    }
}

fn parse_version(value: &str) -> PieResult<Version> {
    Version::parse(value.trim()).map_err(|e| PieError::InvalidVersion {
        value: value.to_string(),
        message: e.to_string(),
    })
}

fn required<'a>(package: &str, attribute: &'static str, value: Option<&'a String>) -> PieResult<&'a str> {
    match value.map(|v| v.trim()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(PieError::MissingAttribute {
            package: package.to_string(),
            attribute,
        }),
    }
}

/// Checks a package manifest against the host.
///
/// Application versions must share the major component; framework versions
/// must be identical.
pub fn check_versions(
    host: &HostVersions,
    package: &str,
    manifest: &PackageManifest,
) -> PieResult<PackageVersions> {
    let version = required(package, "version", manifest.version.as_ref())?;
    let application = required(
        package,
        "pieapp_application_version",
        manifest.pieapp_application_version.as_ref(),
    )?;
    let framework = required(package, "framework_version", manifest.framework_version.as_ref())?;

    parse_version(version)?;
    let host_application = parse_version(&host.application)?;
    let plugin_application = parse_version(application)?;
    let host_framework = parse_version(&host.framework)?;
    let plugin_framework = parse_version(framework)?;

    if host_application.major != plugin_application.major {
        return Err(PieError::IncompatibleVersion {
            package: package.to_string(),
            host: host_application.to_string(),
            plugin: plugin_application.to_string(),
        });
    }

    if host_framework != plugin_framework {
        return Err(PieError::FrameworkVersionMismatch {
            package: package.to_string(),
            host: host_framework.to_string(),
            plugin: plugin_framework.to_string(),
        });
    }

    Ok(PackageVersions {
        version: version.to_string(),
        application_version: application.to_string(),
        framework_version: framework.to_string(),
    })
}

/// Lists package directories under `root` in name order.
///
/// Hidden directories and the configured skip list are ignored.
pub fn package_dirs(root: &Path, layout: &PluginsConfig) -> PieResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(root).map_err(|e| {
        PieError::plugin_loading(format!("Failed to read plugin folder {}: {}", root.display(), e))
    })?;
    select_package_dirs(root, entries.map(|entry| entry.map(|e| e.path())), layout)
}

/// Keeps the visible, non-skipped directories among `entries`.
///
/// An unreadable entry fails the whole listing.
fn select_package_dirs<I>(root: &Path, entries: I, layout: &PluginsConfig) -> PieResult<Vec<PathBuf>>
where
    I: IntoIterator<Item = io::Result<PathBuf>>,
{
    let mut dirs = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            PieError::plugin_loading(format!("Failed to read an entry of {}: {}", root.display(), e))
        })?;
        let visible = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| !name.starts_with('.') && !layout.skip_dirs.iter().any(|s| s == name));
        if visible && path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn read_toml<T: for<'de> Deserialize<'de>>(path: &Path) -> PieResult<T> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        PieError::plugin_loading(format!("Failed to read {}: {}", path.display(), e))
    })?;
    toml::from_str(&text)
        .map_err(|e| PieError::plugin_loading(format!("Invalid {}: {}", path.display(), e)))
}

/// Loads one package: globals, manifest, version check, plugin module and entry.
pub fn load_package(
    dir: &Path,
    layout: &PluginsConfig,
    host: &HostVersions,
    catalog: &PluginCatalog,
    globals: &mut Globals,
) -> PieResult<ResolvedPackage> {
    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    info!(package = %name, "Reading package data");

    let globals_path = dir.join(&layout.globals_file);
    if globals_path.is_file() {
        globals.load_by_path(&globals_path)?;
    }

    let manifest: PackageManifest = read_toml(&dir.join(&layout.package_manifest))?;
    let versions = check_versions(host, &name, &manifest)?;

    let module: PluginModule = read_toml(&dir.join(&layout.plugin_module))?;
    let entry_name = required(&name, "entry", module.entry.as_ref())?;
    let entry = catalog.get(entry_name)?;
    debug!(package = %name, entry = %entry_name, "Package resolved");

    Ok(ResolvedPackage {
        package: PluginPackage {
            name,
            path: dir.to_path_buf(),
            versions,
        },
        entry,
    })
}
