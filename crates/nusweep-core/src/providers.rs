//! Collaborator contracts the core depends on.
//!
//! The core never touches the filesystem or the NuGet cache directly; file
//! access and namespace metadata come in through these traits so the engine
//! can be exercised against in-memory fakes.

use std::io;

use crate::model::GlobalUsing;

/// Supplies source file content and path existence checks.
///
/// Reads may fail; the core treats a failed read as recoverable (the file
/// contributes no evidence). Any retry policy belongs to the implementation.
pub trait SourceProvider: Send + Sync {
    fn read_to_string(&self, path: &str) -> io::Result<String>;

    fn path_exists(&self, path: &str) -> bool;

    /// Enumerate a project directory's source files, already filtered by
    /// extension. Called at model-build time; the analyzer works off the
    /// resulting list.
    fn source_files(&self, project_dir: &str) -> Vec<String>;
}

/// Supplies package namespace metadata and project-level global usings.
pub trait MetadataProvider: Send + Sync {
    /// The namespaces a package publishes for one target framework. An
    /// empty result means no metadata could be resolved; the analyzer logs
    /// a warning and leaves the reference unused.
    fn package_namespaces(
        &self,
        package_id: &str,
        version: &str,
        target_framework: &str,
    ) -> Vec<String>;

    /// Global using declarations found in the project file.
    fn global_usings(&self, project_path: &str) -> Vec<GlobalUsing>;

    /// Whether the package is a development-only dependency (analyzers,
    /// source generators, coverage collectors).
    fn is_development_dependency(&self, package_id: &str) -> bool;
}
