//! Project entity and file-exclusion rules.

use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};

use crate::model::{normalize_path, GlobalUsing, PackageReference};

/// Generated-file suffixes that never count as usage evidence.
const GENERATED_SUFFIXES: &[&str] = &[".designer.cs", ".g.cs", ".g.i.cs"];

/// A project inside a solution.
///
/// Identity is the normalized project file path, compared case-insensitively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    pub path: String,
    pub name: String,
    /// Raw TargetFramework(s) value; `;`-separated when multi-targeting.
    pub target_framework: String,
    #[serde(default)]
    pub package_references: Vec<PackageReference>,
    #[serde(default)]
    pub global_usings: Vec<GlobalUsing>,
    /// Discovered source file paths, already filtered by extension.
    #[serde(default)]
    pub source_files: Vec<String>,
    /// User-supplied exclude globs, e.g. `**/Generated/**`.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl Project {
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        target_framework: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            target_framework: target_framework.into(),
            ..Default::default()
        }
    }

    pub fn normalized_path(&self) -> String {
        normalize_path(&self.path)
    }

    /// Target framework monikers: split on `;`, trimmed, empties dropped.
    pub fn target_frameworks(&self) -> Vec<String> {
        self.target_framework
            .split(';')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }

    /// Whether the project declares a global using for the namespace.
    pub fn has_global_using(&self, namespace: &str) -> bool {
        self.global_usings
            .iter()
            .any(|g| g.matches_namespace(namespace))
    }

    /// True for blank paths, exclude-glob matches, and generated-file
    /// suffixes. All checks are case-insensitive.
    pub fn should_exclude_file(&self, path: &str) -> bool {
        file_excluded(path, &self.exclude_patterns)
    }
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.normalized_path() == other.normalized_path()
    }
}

impl Eq for Project {}

/// Exclusion rule shared with the analyzer, which needs it without holding
/// a borrow of the whole project.
pub(crate) fn file_excluded(path: &str, exclude_patterns: &[String]) -> bool {
    if path.trim().is_empty() {
        return true;
    }

    let normalized = path.replace('\\', "/");
    let lower = normalized.to_lowercase();
    if GENERATED_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return true;
    }

    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    exclude_patterns.iter().any(|pattern| {
        Pattern::new(pattern)
            .map(|p| p.matches_with(&normalized, options))
            .unwrap_or(false)
    })
}
