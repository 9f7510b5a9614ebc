//! Solution entity: ordered projects plus central package management metadata.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{normalize_path, Project};

/// A loaded .NET solution.
///
/// Identity is the normalized solution file path, compared
/// case-insensitively. Projects keep their load order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Solution {
    pub path: String,
    pub name: String,
    pub projects: Vec<Project>,
    /// True when package versions are managed centrally
    /// (Directory.Packages.props).
    #[serde(default)]
    pub uses_central_package_management: bool,
    #[serde(default)]
    pub central_package_file: Option<String>,
    /// A virtual solution has no on-disk .sln file (single-project mode);
    /// validation skips its file-existence check.
    #[serde(default)]
    pub is_virtual: bool,
}

impl Solution {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = Path::new(&path)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            path,
            name,
            ..Default::default()
        }
    }

    pub fn normalized_path(&self) -> String {
        normalize_path(&self.path)
    }

    /// Add a project, skipping duplicates by path identity.
    pub fn add_project(&mut self, project: Project) {
        if !self.projects.iter().any(|p| *p == project) {
            self.projects.push(project);
        }
    }

    /// Remove a project by path. Returns whether anything was removed.
    pub fn remove_project(&mut self, project_path: &str) -> bool {
        let target = normalize_path(project_path);
        let before = self.projects.len();
        self.projects.retain(|p| p.normalized_path() != target);
        self.projects.len() != before
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.normalized_path() == other.normalized_path()
    }
}

impl Eq for Solution {}
