//! Plugin signals and the emitter plugins fire them through.

use piekit_core::PieResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Weak;
use tracing::debug;

/// Prefix stripped from custom signal names to form event names.
pub const SIGNAL_PREFIX: &str = "sig_";

/// Event delivered to plugins when a related plugin shuts down.
pub const PLUGIN_SHUTDOWN_EVENT: &str = "plugin_shutdown";

/// Signal a plugin can emit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginSignal {
    /// The plugin is fully ready.
    Ready,
    /// A named custom signal, conventionally prefixed with `sig_`.
    Custom(String),
}

impl PluginSignal {
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Event name delivered to listeners, without the `sig_` prefix.
    pub fn event_name(&self) -> &str {
        match self {
            Self::Ready => "plugin_ready",
            Self::Custom(name) => name.strip_prefix(SIGNAL_PREFIX).unwrap_or(name),
        }
    }
}

impl fmt::Display for PluginSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "sig_plugin_ready"),
            Self::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Receiver of emitted signals.
pub trait SignalSink {
    /// Handles `signal` fired by the plugin named `source`.
    fn dispatch(&self, source: &str, signal: &PluginSignal) -> PieResult<()>;
}

/// Handle a plugin uses to fire its signals.
///
/// Holds the sink weakly; emitting after the sink is gone is a no-op.
#[derive(Clone)]
pub struct SignalEmitter {
    source: String,
    sink: Weak<dyn SignalSink>,
}

impl SignalEmitter {
    pub fn new(source: impl Into<String>, sink: Weak<dyn SignalSink>) -> Self {
        Self {
            source: source.into(),
            sink,
        }
    }

    /// Name of the plugin this emitter fires for.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn emit(&self, signal: &PluginSignal) -> PieResult<()> {
        match self.sink.upgrade() {
            Some(sink) => sink.dispatch(&self.source, signal),
            None => {
                debug!(plugin = %self.source, signal = %signal, "Signal sink dropped, ignoring signal");
                Ok(())
            }
        }
    }

    /// Fires `PluginSignal::Ready`.
    pub fn ready(&self) -> PieResult<()> {
        self.emit(&PluginSignal::Ready)
    }
}

impl fmt::Debug for SignalEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalEmitter")
            .field("source", &self.source)
            .field("attached", &(self.sink.strong_count() > 0))
            .finish()
    }
}
