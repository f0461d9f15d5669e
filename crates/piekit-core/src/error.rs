//! Unified error types for the plugin and manager subsystems.

use serde::{Deserialize, Serialize};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for PieKit.
///
/// Every variant raised while bringing managers or plugins up is fatal to
/// application startup. Soft conditions (missing plugin roots, plugins that
/// decline to load, notification targets that are not registered) are logged
/// and never surface as errors.
#[derive(Error, Debug)]
pub enum PieError {
    // ============ Host Errors ============
    /// No main window instance was provided to the plugin manager.
    #[error("Can't find an initialized main window instance")]
    MissingHost,

    // ============ Package Errors ============
    /// A plugin package does not declare a required attribute.
    #[error("Plugin {package} must have `{attribute}` attribute")]
    MissingAttribute {
        package: String,
        attribute: &'static str,
    },

    /// A declared version is not a semantic-version triple.
    #[error("Invalid version `{value}`: {message}")]
    InvalidVersion { value: String, message: String },

    /// Host and plugin application major versions differ.
    #[error("Application version ({host}) is not compatible with plugin {package} version ({plugin})")]
    IncompatibleVersion {
        package: String,
        host: String,
        plugin: String,
    },

    /// Host and plugin framework versions are not identical.
    #[error("Framework version ({host}) is not compatible with plugin {package} version ({plugin})")]
    FrameworkVersionMismatch {
        package: String,
        host: String,
        plugin: String,
    },

    /// A package could not be read or resolved.
    #[error("Plugin loading error: {0}")]
    PluginLoading(String),

    // ============ Plugin Errors ============
    /// Plugin not found in the registry.
    #[error("Plugin not found: {0}")]
    PluginNotFound(String),

    /// Error raised by a plugin's own code.
    #[error("Plugin error: {plugin} - {message}")]
    Plugin { plugin: String, message: String },

    // ============ Manager Errors ============
    /// A manager dependency is not declared anywhere.
    #[error("Dependency not found: {0}")]
    DependencyNotFound(String),

    /// A manager is known but has not been mounted yet.
    #[error("Object is not mounted: {0}")]
    ObjectNotMounted(String),

    /// No manager is registered under the given import path.
    #[error("Manager not found: {0}")]
    ManagerNotFound(String),

    // ============ Infrastructure Errors ============
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(String),

    // ============ Internal Errors ============
    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PieError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingHost => "MISSING_HOST",
            Self::MissingAttribute { .. } => "MISSING_ATTRIBUTE",
            Self::InvalidVersion { .. } => "INVALID_VERSION",
            Self::IncompatibleVersion { .. } => "INCOMPATIBLE_VERSION",
            Self::FrameworkVersionMismatch { .. } => "FRAMEWORK_VERSION_MISMATCH",
            Self::PluginLoading(_) => "PLUGIN_LOADING_ERROR",
            Self::PluginNotFound(_) => "PLUGIN_NOT_FOUND",
            Self::Plugin { .. } => "PLUGIN_ERROR",
            Self::DependencyNotFound(_) => "DEPENDENCY_NOT_FOUND",
            Self::ObjectNotMounted(_) => "OBJECT_NOT_MOUNTED",
            Self::ManagerNotFound(_) => "MANAGER_NOT_FOUND",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Checks if this error must abort application startup.
    ///
    /// Only registry lookups may fail softly.
    #[must_use]
    pub const fn is_startup_fatal(&self) -> bool {
        !matches!(self, Self::PluginNotFound(_))
    }

    /// Checks if this error comes from plugin package version metadata.
    #[must_use]
    pub const fn is_version_error(&self) -> bool {
        matches!(
            self,
            Self::MissingAttribute { .. }
                | Self::InvalidVersion { .. }
                | Self::IncompatibleVersion { .. }
                | Self::FrameworkVersionMismatch { .. }
        )
    }

    /// Checks if this error comes from a manager dependency check.
    #[must_use]
    pub const fn is_dependency_error(&self) -> bool {
        matches!(self, Self::DependencyNotFound(_) | Self::ObjectNotMounted(_))
    }

    /// Creates a plugin error.
    #[must_use]
    pub fn plugin<N: Into<String>, M: Into<String>>(plugin: N, message: M) -> Self {
        Self::Plugin {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    /// Creates a plugin loading error.
    #[must_use]
    pub fn plugin_loading<T: Into<String>>(message: T) -> Self {
        Self::PluginLoading(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }
}

impl From<std::io::Error> for PieError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PieError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable report of a fatal error, shown by the error surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Messages of the source chain, outermost first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
    /// Formatted call stack, when backtraces are enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backtrace: Option<String>,
}

impl ErrorReport {
    /// Creates a new report from a `PieError`.
    #[must_use]
    pub fn from_error(error: &PieError) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            causes,
            backtrace: None,
        }
    }

    /// Attaches the call stack captured at the error surface.
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: &Backtrace) -> Self {
        if backtrace.status() == BacktraceStatus::Captured {
            self.backtrace = Some(backtrace.to_string());
        }
        self
    }

    /// Returns the report lines in display order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("[{}] {}", self.code, self.message)];
        lines.extend(self.causes.iter().map(|cause| format!("  caused by: {}", cause)));
        if let Some(backtrace) = &self.backtrace {
            lines.extend(backtrace.lines().map(|line| format!("  {}", line.trim_end())));
        }
        lines
    }
}

impl From<&PieError> for ErrorReport {
    fn from(error: &PieError) -> Self {
        Self::from_error(error)
    }
}
