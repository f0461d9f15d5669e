//! Configuration validation module.
//!
//! Collects every problem in one pass so startup fails with the full list.

use crate::AppConfig;
use std::collections::HashSet;
use std::fmt;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// A version is not a semantic-version triple.
    InvalidVersion {
        name: String,
        value: String,
        message: String,
    },
    /// A required string value is empty.
    EmptyValue { name: String },
    /// A folder name contains a path separator.
    NestedFolder { name: String, value: String },
    /// A manager is listed twice.
    DuplicateManager { import_string: String },
    /// A manager argument has an empty section or pattern.
    InvalidManagerArg { import_string: String, message: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidVersion { name, value, message } => {
                write!(f, "Invalid version for {}: '{}' ({})", name, value, message)
            }
            Self::EmptyValue { name } => write!(f, "Value '{}' must not be empty", name),
            Self::NestedFolder { name, value } => {
                write!(f, "Folder '{}' must be a single directory name, got '{}'", name, value)
            }
            Self::DuplicateManager { import_string } => {
                write!(f, "Manager '{}' is listed more than once", import_string)
            }
            Self::InvalidManagerArg { import_string, message } => {
                write!(f, "Invalid argument for manager '{}': {}", import_string, message)
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_versions(config, &mut errors);
        Self::validate_paths(&config.paths, &mut errors);
        Self::validate_plugins(&config.plugins, &mut errors);
        Self::validate_managers(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_versions(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        for (name, value) in [
            ("app.version", &config.app.version),
            ("framework.version", &config.framework.version),
        ] {
            if let Err(e) = semver::Version::parse(value) {
                errors.push(ConfigValidationError::InvalidVersion {
                    name: name.to_string(),
                    value: value.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    fn validate_paths(config: &crate::PathsConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.app_root.as_os_str().is_empty() {
            errors.push(ConfigValidationError::EmptyValue {
                name: "paths.app_root".to_string(),
            });
        }
        if config.user_root.as_os_str().is_empty() {
            errors.push(ConfigValidationError::EmptyValue {
                name: "paths.user_root".to_string(),
            });
        }

        for (name, value) in [
            ("paths.plugins_folder", &config.plugins_folder),
            ("paths.user_plugins_folder", &config.user_plugins_folder),
            ("paths.configs_folder", &config.configs_folder),
            ("paths.user_configs_folder", &config.user_configs_folder),
        ] {
            Self::validate_folder(name, value, errors);
        }
    }

    fn validate_plugins(config: &crate::PluginsConfig, errors: &mut Vec<ConfigValidationError>) {
        for (name, value) in [
            ("plugins.package_manifest", &config.package_manifest),
            ("plugins.plugin_module", &config.plugin_module),
            ("plugins.globals_file", &config.globals_file),
        ] {
            Self::validate_folder(name, value, errors);
        }
    }

    fn validate_managers(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let mut seen = HashSet::new();
        for (index, manager) in config.managers.iter().enumerate() {
            if manager.import_string.trim().is_empty() {
                errors.push(ConfigValidationError::EmptyValue {
                    name: format!("managers[{}].import_string", index),
                });
                continue;
            }
            if !seen.insert(manager.import_string.as_str()) {
                errors.push(ConfigValidationError::DuplicateManager {
                    import_string: manager.import_string.clone(),
                });
            }
            for arg in &manager.args {
                if arg.section.trim().is_empty() {
                    errors.push(ConfigValidationError::InvalidManagerArg {
                        import_string: manager.import_string.clone(),
                        message: "section must not be empty".to_string(),
                    });
                }
                if arg.pattern.trim().is_empty() {
                    errors.push(ConfigValidationError::InvalidManagerArg {
                        import_string: manager.import_string.clone(),
                        message: "pattern must not be empty".to_string(),
                    });
                }
            }
        }
    }

    fn validate_folder(name: &str, value: &str, errors: &mut Vec<ConfigValidationError>) {
        if value.trim().is_empty() {
            errors.push(ConfigValidationError::EmptyValue {
                name: name.to_string(),
            });
        } else if value.contains(['/', '\\']) {
            errors.push(ConfigValidationError::NestedFolder {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }
}

/// Formats validation errors for display.
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, error));
    }
    output
}
