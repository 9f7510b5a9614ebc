//! Orchestration: solution → projects → package references.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use crate::ambient;
use crate::cancel::CancelToken;
use crate::error::{AnalysisError, ValidationResult};
use crate::model::{file_excluded, Project, Solution};
use crate::pattern::NamespacePattern;
use crate::providers::{MetadataProvider, SourceProvider};
use crate::scanner::{self, UsageMap};

/// Drives usage detection over a solution's package references.
///
/// State machine per reference, reset at the start of every run:
/// unanalyzed → namespaces resolved → used or unused. All per-run state
/// lives in the Solution/Project graph passed in, so two different
/// solutions can be analyzed concurrently; the same object graph must not
/// be analyzed twice at once (the state reset would race).
pub struct PackageUsageAnalyzer<'a> {
    source: &'a dyn SourceProvider,
    metadata: &'a dyn MetadataProvider,
}

impl<'a> PackageUsageAnalyzer<'a> {
    pub fn new(source: &'a dyn SourceProvider, metadata: &'a dyn MetadataProvider) -> Self {
        Self { source, metadata }
    }

    /// Analyze every project in the solution, mutating each package
    /// reference's usage state in place.
    pub fn analyze_package_usage(
        &self,
        solution: &mut Solution,
        cancel: &CancelToken,
    ) -> Result<(), AnalysisError> {
        for project in &mut solution.projects {
            cancel.check()?;
            self.analyze_project_package_usage(project, cancel)?;
        }
        Ok(())
    }

    /// Analyze one project's package references.
    pub fn analyze_project_package_usage(
        &self,
        project: &mut Project,
        cancel: &CancelToken,
    ) -> Result<(), AnalysisError> {
        cancel.check()?;
        log::debug!(
            "analyzing {} ({} references, {} source files)",
            project.name,
            project.package_references.len(),
            project.source_files.len()
        );

        let mut frameworks = project.target_frameworks();
        if frameworks.is_empty() {
            // Let the metadata provider decide what an unspecified TFM means.
            frameworks.push(String::new());
        }

        let files = project.source_files.clone();
        let exclude_patterns = project.exclude_patterns.clone();
        let exclude = move |path: &str| file_excluded(path, &exclude_patterns);
        let global_namespaces: Vec<String> = project
            .global_usings
            .iter()
            .map(|g| g.namespace.clone())
            .collect();

        // One read-error set for the whole project, shared across the
        // package loop so an unreadable file is logged once, not once per
        // package.
        let failed_reads = Mutex::new(HashSet::new());

        for package in &mut project.package_references {
            cancel.check()?;
            package.reset_usage_status();

            // Multi-targeting contract: union the namespaces across every
            // framework; a package is used if any framework's namespace is
            // referenced anywhere in the project.
            let mut namespaces: Vec<String> = Vec::new();
            let mut seen = HashSet::new();
            for framework in &frameworks {
                for namespace in
                    self.metadata
                        .package_namespaces(&package.id, &package.version, framework)
                {
                    if seen.insert(namespace.to_lowercase()) {
                        namespaces.push(namespace);
                    }
                }
            }
            if namespaces.is_empty() {
                log::warn!(
                    "no namespace metadata for {} {}; leaving it unused",
                    package.id,
                    package.version
                );
                continue;
            }

            let patterns: Vec<NamespacePattern> =
                namespaces.iter().map(|ns| NamespacePattern::new(ns)).collect();

            let mut usage = scanner::scan_files(
                &files,
                &patterns,
                &exclude,
                self.source,
                &failed_reads,
                cancel,
            )?;

            if !package.has_global_using {
                package.has_global_using = namespaces
                    .iter()
                    .any(|ns| global_namespaces.iter().any(|g| g.eq_ignore_ascii_case(ns)));
            }
            if package.has_global_using {
                let ambient_usage = ambient::resolve_global_usage(
                    &files,
                    &patterns,
                    &namespaces,
                    &exclude,
                    self.source,
                    &failed_reads,
                    cancel,
                )?;
                scanner::merge_usage(&mut usage, ambient_usage);
            }

            for (namespace, found_in) in &usage {
                for file in found_in {
                    package.mark_as_used(file, Some(namespace));
                }
            }
        }
        Ok(())
    }

    /// Targeted scan over an explicit file list, exposed for diagnostics
    /// and ad-hoc inspection.
    pub fn scan_source_files_for_usage(
        &self,
        files: &[String],
        namespaces: &[String],
        exclude_patterns: &[String],
        cancel: &CancelToken,
    ) -> Result<UsageMap, AnalysisError> {
        let patterns: Vec<NamespacePattern> =
            namespaces.iter().map(|ns| NamespacePattern::new(ns)).collect();
        let exclude_patterns = exclude_patterns.to_vec();
        let exclude = move |path: &str| file_excluded(path, &exclude_patterns);
        let failed_reads = Mutex::new(HashSet::new());
        scanner::scan_files(files, &patterns, &exclude, self.source, &failed_reads, cancel)
    }

    /// Pre-flight, non-mutating input check. Collects every violation;
    /// callers gate on the result explicitly, analysis never auto-validates.
    pub fn validate_inputs(&self, solution: Option<&Solution>) -> ValidationResult {
        let mut result = ValidationResult::default();
        let Some(solution) = solution else {
            result.add("no solution provided");
            return result;
        };

        if !solution.is_virtual && !self.source.path_exists(&solution.path) {
            result.add(format!("solution file not found: {}", solution.path));
        }

        for project in &solution.projects {
            if !self.source.path_exists(&project.path) {
                result.add(format!("project file not found: {}", project.path));
            }
            let directory = Path::new(&project.path)
                .parent()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default();
            if !directory.is_empty() && !self.source.path_exists(&directory) {
                result.add(format!("project directory not found: {directory}"));
            }
        }
        result
    }

    /// Pass-through to the metadata collaborator, so callers can inspect a
    /// package's namespaces without running a full scan.
    pub fn get_package_namespaces(
        &self,
        package_id: &str,
        version: &str,
        target_framework: &str,
    ) -> Vec<String> {
        self.metadata
            .package_namespaces(package_id, version, target_framework)
    }
}
