//! Package reference and global using entities.

use serde::{Deserialize, Serialize};

use crate::model::normalize_path;

/// A declared dependency of a project on a package id/version.
///
/// Identity is `(id, version, project_path)`, all compared
/// case-insensitively. The usage state (`is_used`, `usage_locations`,
/// `detected_namespaces`) is mutated by the analyzer and reset before every
/// run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageReference {
    pub id: String,
    pub version: String,
    pub project_path: String,
    /// Declared directly in the project, as opposed to pulled in
    /// transitively. Only direct references are removal candidates.
    #[serde(default)]
    pub is_direct: bool,
    /// Raw MSBuild condition string, if the reference is conditional.
    #[serde(default)]
    pub condition: Option<String>,
    /// The package is imported project-wide via a global using.
    #[serde(default)]
    pub has_global_using: bool,
    #[serde(default)]
    pub is_used: bool,
    #[serde(default)]
    pub usage_locations: Vec<String>,
    #[serde(default)]
    pub detected_namespaces: Vec<String>,
}

impl PackageReference {
    pub fn new(
        id: impl Into<String>,
        version: impl Into<String>,
        project_path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            project_path: project_path.into(),
            is_direct: true,
            ..Default::default()
        }
    }

    /// Clear the usage state. Idempotent; called by the analyzer at the
    /// start of every run.
    pub fn reset_usage_status(&mut self) {
        self.is_used = false;
        self.usage_locations.clear();
        self.detected_namespaces.clear();
    }

    /// Record usage evidence. The file is added once; the namespace is
    /// added once if non-blank.
    pub fn mark_as_used(&mut self, file: &str, namespace: Option<&str>) {
        self.is_used = true;
        if !self.usage_locations.iter().any(|f| f == file) {
            self.usage_locations.push(file.to_string());
        }
        if let Some(ns) = namespace {
            let ns = ns.trim();
            if !ns.is_empty()
                && !self
                    .detected_namespaces
                    .iter()
                    .any(|n| n.eq_ignore_ascii_case(ns))
            {
                self.detected_namespaces.push(ns.to_string());
            }
        }
    }
}

impl PartialEq for PackageReference {
    fn eq(&self, other: &Self) -> bool {
        self.id.eq_ignore_ascii_case(&other.id)
            && self.version.eq_ignore_ascii_case(&other.version)
            && normalize_path(&self.project_path) == normalize_path(&other.project_path)
    }
}

impl Eq for PackageReference {}

/// A project-wide implicit using declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalUsing {
    pub namespace: String,
    pub project_path: String,
    #[serde(default)]
    pub condition: Option<String>,
}

impl GlobalUsing {
    pub fn new(namespace: impl Into<String>, project_path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            project_path: project_path.into(),
            condition: None,
        }
    }

    /// Containment identity: case-insensitive namespace.
    pub fn matches_namespace(&self, namespace: &str) -> bool {
        self.namespace.eq_ignore_ascii_case(namespace)
    }
}
