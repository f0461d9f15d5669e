//! Dependency graph between plugins.
//!
//! Two adjacency maps kept as mutual inverses: `dependents[b]` lists the
//! plugins that declared `b`, `dependencies[a]` lists what `a` declared.
//! Edges may point at plugins that never load; such edges are inert.

use std::collections::HashMap;
use std::fmt;

/// Category of a declared dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyKind {
    Requires,
    Optional,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requires => write!(f, "requires"),
            Self::Optional => write!(f, "optional"),
        }
    }
}

/// Plugin names split by dependency category, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edges {
    pub requires: Vec<String>,
    pub optional: Vec<String>,
}

impl Edges {
    fn push(&mut self, kind: DependencyKind, name: &str) {
        let list = match kind {
            DependencyKind::Requires => &mut self.requires,
            DependencyKind::Optional => &mut self.optional,
        };
        if !list.iter().any(|n| n == name) {
            list.push(name.to_string());
        }
    }

    /// Required names first, then optional ones.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.requires.iter().chain(&self.optional).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.requires.is_empty() && self.optional.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    dependents: HashMap<String, Edges>,
    dependencies: HashMap<String, Edges>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the declarations of `name`.
    ///
    /// Append-only; the exact same (dependent, dependency, kind) edge is
    /// stored once.
    pub fn register(&mut self, name: &str, requires: &[String], optional: &[String]) {
        for dependency in requires {
            self.add_edge(name, dependency, DependencyKind::Requires);
        }
        for dependency in optional {
            self.add_edge(name, dependency, DependencyKind::Optional);
        }
    }

    /// Records that `dependent` declared `dependency`.
    pub fn add_edge(&mut self, dependent: &str, dependency: &str, kind: DependencyKind) {
        self.dependencies
            .entry(dependent.to_string())
            .or_default()
            .push(kind, dependency);
        self.dependents
            .entry(dependency.to_string())
            .or_default()
            .push(kind, dependent);
    }

    /// Plugins that declared `name`.
    pub fn dependents_of(&self, name: &str) -> Edges {
        self.dependents.get(name).cloned().unwrap_or_default()
    }

    /// Plugins `name` declared.
    pub fn dependencies_of(&self, name: &str) -> Edges {
        self.dependencies.get(name).cloned().unwrap_or_default()
    }

    /// Returns the edge category between two plugins, if any.
    pub fn kind_of(&self, dependent: &str, dependency: &str) -> Option<DependencyKind> {
        let edges = self.dependencies.get(dependent)?;
        if edges.requires.iter().any(|n| n == dependency) {
            Some(DependencyKind::Requires)
        } else if edges.optional.iter().any(|n| n == dependency) {
            Some(DependencyKind::Optional)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn test_maps_are_inverse() {
        let mut graph = DependencyGraph::new();
        graph.register("metadata-editor", &names(&["converter"]), &names(&["statusbar"]));

        assert_eq!(graph.dependencies_of("metadata-editor").requires, names(&["converter"]));
        assert_eq!(graph.dependencies_of("metadata-editor").optional, names(&["statusbar"]));
        assert_eq!(graph.dependents_of("converter").requires, names(&["metadata-editor"]));
        assert_eq!(graph.dependents_of("statusbar").optional, names(&["metadata-editor"]));
        assert_eq!(graph.kind_of("metadata-editor", "converter"), Some(DependencyKind::Requires));
        assert_eq!(graph.kind_of("metadata-editor", "statusbar"), Some(DependencyKind::Optional));
        assert_eq!(graph.kind_of("converter", "metadata-editor"), None);
    }

    #[test]
    fn test_distinct_dependents_are_kept() {
        let mut graph = DependencyGraph::new();
        graph.register("a", &names(&["b"]), &[]);
        graph.register("c", &names(&["b"]), &[]);

        assert_eq!(graph.dependents_of("b").requires, names(&["a", "c"]));
    }

    #[test]
    fn test_same_edge_is_stored_once() {
        let mut graph = DependencyGraph::new();
        graph.register("a", &names(&["b"]), &[]);
        graph.register("a", &names(&["b"]), &[]);

        assert_eq!(graph.dependents_of("b").requires, names(&["a"]));
        assert_eq!(graph.dependencies_of("a").requires, names(&["b"]));
    }

    #[test]
    fn test_required_iterated_before_optional() {
        let mut graph = DependencyGraph::new();
        graph.register("x", &[], &names(&["b"]));
        graph.register("y", &names(&["b"]), &[]);

        let edges = graph.dependents_of("b");
        assert_eq!(edges.iter().collect::<Vec<_>>(), vec!["y", "x"]);
    }

    #[test]
    fn test_unknown_names_have_no_edges() {
        let graph = DependencyGraph::new();
        assert!(graph.dependents_of("ghost").is_empty());
        assert!(graph.dependencies_of("ghost").is_empty());
    }
}
