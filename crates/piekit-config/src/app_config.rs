//! Application configuration structures.

use piekit_core::TelemetryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Placeholder expanded to `paths.app_root` inside manager arguments.
pub const APP_ROOT_TOKEN: &str = "{app_root}";

/// Placeholder expanded to `paths.user_root` inside manager arguments.
pub const USER_ROOT_TOKEN: &str = "{user_root}";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Framework metadata.
    #[serde(default)]
    pub framework: FrameworkConfig,

    /// Host directories.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Plugin package layout.
    #[serde(default)]
    pub plugins: PluginsConfig,

    /// Managers mounted at startup, in order.
    #[serde(default = "default_managers")]
    pub managers: Vec<ManagerConfig>,

    /// Logging configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppMetadata::default(),
            framework: FrameworkConfig::default(),
            paths: PathsConfig::default(),
            plugins: PluginsConfig::default(),
            managers: default_managers(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Returns the manager list with root placeholders expanded.
    #[must_use]
    pub fn resolved_managers(&self) -> Vec<ManagerConfig> {
        self.managers
            .iter()
            .map(|manager| ManagerConfig {
                import_string: manager.import_string.clone(),
                mount: manager.mount,
                args: manager
                    .args
                    .iter()
                    .map(|arg| PathConfig {
                        root: self.paths.expand(&arg.root),
                        section: arg.section.clone(),
                        pattern: arg.pattern.clone(),
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version checked against plugin packages.
    pub version: String,
    /// Environment (development, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "PieApp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Framework metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    /// Framework version; plugin packages must declare exactly this one.
    pub version: String,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
        }
    }
}

/// Host directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Application root holding built-in plugins and shared configs.
    pub app_root: PathBuf,
    /// Per-user root holding user plugins and configs.
    pub user_root: PathBuf,
    /// Built-in plugins folder under `app_root`.
    pub plugins_folder: String,
    /// User plugins folder under `user_root`.
    pub user_plugins_folder: String,
    /// Shared configs folder under `app_root`.
    pub configs_folder: String,
    /// User configs folder under `user_root`.
    pub user_configs_folder: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            app_root: PathBuf::from("pieapp"),
            user_root: default_user_root(),
            plugins_folder: "plugins".to_string(),
            user_plugins_folder: "plugins".to_string(),
            configs_folder: "configs".to_string(),
            user_configs_folder: "configs".to_string(),
        }
    }
}

impl PathsConfig {
    /// Built-in plugin root.
    #[must_use]
    pub fn builtin_plugins_root(&self) -> PathBuf {
        self.app_root.join(&self.plugins_folder)
    }

    /// User plugin root.
    #[must_use]
    pub fn user_plugins_root(&self) -> PathBuf {
        self.user_root.join(&self.user_plugins_folder)
    }

    /// Shared configs root.
    #[must_use]
    pub fn configs_root(&self) -> PathBuf {
        self.app_root.join(&self.configs_folder)
    }

    /// User configs root.
    #[must_use]
    pub fn user_configs_root(&self) -> PathBuf {
        self.user_root.join(&self.user_configs_folder)
    }

    /// Expands a leading `{app_root}` or `{user_root}` placeholder.
    #[must_use]
    pub fn expand(&self, path: &Path) -> PathBuf {
        let Some(text) = path.to_str() else {
            return path.to_path_buf();
        };

        for (token, root) in [(APP_ROOT_TOKEN, &self.app_root), (USER_ROOT_TOKEN, &self.user_root)] {
            if let Some(rest) = text.strip_prefix(token) {
                let rest = rest.trim_start_matches(['/', '\\']);
                return if rest.is_empty() {
                    root.clone()
                } else {
                    root.join(rest)
                };
            }
        }
        path.to_path_buf()
    }
}

fn default_user_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".crabs")
}

/// Plugin package layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    /// Package-level manifest declaring versions.
    pub package_manifest: String,
    /// Plugin module naming the entry point.
    pub plugin_module: String,
    /// Optional per-package globals file.
    pub globals_file: String,
    /// Directory names never treated as packages.
    pub skip_dirs: Vec<String>,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            package_manifest: "package.toml".to_string(),
            plugin_module: "plugin.toml".to_string(),
            globals_file: "globals.toml".to_string(),
            skip_dirs: vec!["__pycache__".to_string(), "target".to_string()],
        }
    }
}

/// One manager to mount at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Catalog key of the manager constructor, e.g. `piekit.managers.configs`.
    pub import_string: String,
    /// Whether to call the manager's mount hook.
    #[serde(default = "default_mount")]
    pub mount: bool,
    /// Arguments handed to the mount hook.
    #[serde(default)]
    pub args: Vec<PathConfig>,
}

impl ManagerConfig {
    /// Creates a config that mounts with no arguments.
    pub fn new(import_string: impl Into<String>) -> Self {
        Self {
            import_string: import_string.into(),
            mount: true,
            args: Vec::new(),
        }
    }

    /// Adds a mount argument.
    #[must_use]
    pub fn with_arg(mut self, arg: PathConfig) -> Self {
        self.args.push(arg);
        self
    }
}

fn default_mount() -> bool {
    true
}

/// A directory of files feeding one named section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathConfig {
    /// Directory to scan.
    pub root: PathBuf,
    /// Section the files are merged into.
    pub section: String,
    /// File name pattern (`*` wildcard).
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl PathConfig {
    pub fn new(root: impl Into<PathBuf>, section: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            section: section.into(),
            pattern: default_pattern(),
        }
    }
}

fn default_pattern() -> String {
    "*.json".to_string()
}

fn default_managers() -> Vec<ManagerConfig> {
    vec![
        ManagerConfig::new("piekit.managers.configs")
            .with_arg(PathConfig::new(format!("{}/configs", APP_ROOT_TOKEN), "shared"))
            .with_arg(PathConfig::new(format!("{}/configs", USER_ROOT_TOKEN), "user")),
        ManagerConfig::new("piekit.managers.plugins"),
    ]
}
