//! Shared test fakes for the collaborator traits.

use std::collections::{HashMap, HashSet};
use std::io;

use nusweep_core::model::GlobalUsing;
use nusweep_core::providers::{MetadataProvider, SourceProvider};

/// In-memory source provider. Paths can be marked unreadable to exercise
/// the recoverable read-failure path.
#[derive(Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
    unreadable: HashSet<String>,
    extra_paths: HashSet<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.unreadable.insert(path.to_string());
        self
    }

    /// Register a path (e.g. a directory) as existing without content.
    pub fn with_existing_path(mut self, path: &str) -> Self {
        self.extra_paths.insert(path.to_string());
        self
    }
}

impl SourceProvider for MemorySource {
    fn read_to_string(&self, path: &str) -> io::Result<String> {
        if self.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "marked unreadable",
            ));
        }
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn path_exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
            || self.unreadable.contains(path)
            || self.extra_paths.contains(path)
    }

    fn source_files(&self, project_dir: &str) -> Vec<String> {
        let mut files: Vec<String> = self
            .files
            .keys()
            .chain(self.unreadable.iter())
            .filter(|path| path.starts_with(project_dir))
            .cloned()
            .collect();
        files.sort();
        files
    }
}

/// Table-backed metadata provider.
#[derive(Default)]
pub struct TableMetadata {
    namespaces: HashMap<String, Vec<String>>,
    per_framework: HashMap<(String, String), Vec<String>>,
    globals: HashMap<String, Vec<GlobalUsing>>,
    dev_packages: HashSet<String>,
}

impl TableMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespaces returned for every target framework.
    pub fn with_package(mut self, package_id: &str, namespaces: &[&str]) -> Self {
        self.namespaces.insert(
            package_id.to_lowercase(),
            namespaces.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    /// Namespaces returned for one specific target framework only.
    pub fn with_framework_package(
        mut self,
        package_id: &str,
        framework: &str,
        namespaces: &[&str],
    ) -> Self {
        self.per_framework.insert(
            (package_id.to_lowercase(), framework.to_lowercase()),
            namespaces.iter().map(|s| s.to_string()).collect(),
        );
        self
    }
}

impl MetadataProvider for TableMetadata {
    fn package_namespaces(
        &self,
        package_id: &str,
        _version: &str,
        target_framework: &str,
    ) -> Vec<String> {
        let key = (package_id.to_lowercase(), target_framework.to_lowercase());
        if let Some(namespaces) = self.per_framework.get(&key) {
            return namespaces.clone();
        }
        self.namespaces
            .get(&package_id.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    fn global_usings(&self, project_path: &str) -> Vec<GlobalUsing> {
        self.globals.get(project_path).cloned().unwrap_or_default()
    }

    fn is_development_dependency(&self, package_id: &str) -> bool {
        self.dev_packages.contains(&package_id.to_lowercase())
    }
}
