//! Per-plugin readiness flags.

use std::collections::HashMap;

/// Name to readiness mapping. Unknown names are not available.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityTable {
    flags: HashMap<String, bool>,
}

impl AvailabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_available(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn mark_available(&mut self, name: &str) {
        self.flags.insert(name.to_string(), true);
    }

    /// Resets the flag; only shutdown does this.
    pub fn mark_unavailable(&mut self, name: &str) {
        if let Some(flag) = self.flags.get_mut(name) {
            *flag = false;
        }
    }

    /// Names currently available.
    pub fn available(&self) -> impl Iterator<Item = &str> {
        self.flags
            .iter()
            .filter(|(_, ready)| **ready)
            .map(|(name, _)| name.as_str())
    }
}
