//! JSON-backed configuration sections.

use crate::Manager;
use piekit_config::PathConfig;
use piekit_core::{PieError, PieResult};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::any::Any;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Section holding application-wide settings.
pub const SHARED_SECTION: &str = "shared";

/// Section holding per-user settings.
pub const USER_SECTION: &str = "user";

/// Manager named `configs`: merges JSON files into named sections.
#[derive(Debug, Default)]
pub struct ConfigManager {
    sections: BTreeMap<String, Map<String, Value>>,
}

impl ConfigManager {
    pub const NAME: &'static str = "configs";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.sections.get(section)?.get(key)
    }

    pub fn get_or(&self, section: &str, key: &str, default: Value) -> Value {
        self.get(section, key).cloned().unwrap_or(default)
    }

    /// Gets a value converted to `T`, or `None` if absent or mistyped.
    pub fn get_as<T: DeserializeOwned>(&self, section: &str, key: &str) -> Option<T> {
        self.get(section, key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn set(&mut self, section: &str, key: impl Into<String>, value: impl Into<Value>) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.into(), value.into());
    }

    pub fn delete(&mut self, section: &str, key: &str) -> Option<Value> {
        self.sections.get_mut(section)?.remove(key)
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Merges every matching file under `arg.root` into `arg.section`.
    ///
    /// Files are read in name order, so later files override earlier keys.
    /// Returns the number of files read.
    pub fn load_path(&mut self, arg: &PathConfig) -> PieResult<usize> {
        if !arg.root.is_dir() {
            warn!(path = %arg.root.display(), section = %arg.section, "Config folder not found, skipping");
            return Ok(0);
        }

        let entries = std::fs::read_dir(&arg.root)?.map(|entry| entry.map(|e| e.path()));
        let files = matching_files(entries, &arg.pattern)?;

        for path in &files {
            let values = read_object(path)?;
            debug!(path = %path.display(), section = %arg.section, keys = values.len(), "Config file loaded");
            self.sections
                .entry(arg.section.clone())
                .or_default()
                .extend(values);
        }
        Ok(files.len())
    }
}

fn read_object(path: &Path) -> PieResult<Map<String, Value>> {
    let text = std::fs::read_to_string(path)?;
    match serde_json::from_str(&text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(PieError::configuration(format!(
            "Config file {} must contain a JSON object",
            path.display()
        ))),
        Err(e) => Err(PieError::configuration(format!(
            "Invalid config file {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Files among `entries` whose name matches `pattern`, in name order.
///
/// An unreadable entry fails the whole listing.
fn matching_files<I>(entries: I, pattern: &str) -> PieResult<Vec<PathBuf>>
where
    I: IntoIterator<Item = std::io::Result<PathBuf>>,
{
    let mut files = Vec::new();
    for entry in entries {
        let path = entry?;
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| matches_pattern(pattern, n));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Matches a file name against a pattern where `*` is any run of characters
/// and `?` is any single character.
pub fn matches_pattern(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();

    let (mut p, mut n) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == name[n]) {
            p += 1;
            n += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, n));
            p += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            n = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}

impl Manager for ConfigManager {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn mount(&mut self, args: &[PathConfig]) -> PieResult<()> {
        for arg in args {
            let files = self.load_path(arg)?;
            info!(section = %arg.section, files, "Config section mounted");
        }
        Ok(())
    }

    fn unmount(&mut self) -> PieResult<()> {
        self.sections.clear();
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
