//! Namespace metadata heuristics.
//!
//! A full resolver would download each package and inspect its
//! `lib/<tfm>` assemblies; this implementation answers from a curated
//! table of well-known packages and falls back to treating the package id
//! as its root namespace, which holds for the large majority of NuGet
//! packages.

use std::collections::{HashMap, HashSet};

use nusweep_core::model::GlobalUsing;
use nusweep_core::providers::MetadataProvider;

/// Packages whose published namespaces differ from their id.
const KNOWN_NAMESPACES: &[(&str, &[&str])] = &[
    ("xunit", &["Xunit"]),
    ("xunit.core", &["Xunit"]),
    ("xunit.assert", &["Xunit"]),
    ("moq", &["Moq"]),
    ("nunit", &["NUnit.Framework"]),
    ("mstest.testframework", &["Microsoft.VisualStudio.TestTools.UnitTesting"]),
    ("dapper", &["Dapper"]),
    ("polly", &["Polly"]),
    ("mediatr", &["MediatR"]),
    ("automapper", &["AutoMapper"]),
    ("fluentvalidation", &["FluentValidation"]),
    ("fluentassertions", &["FluentAssertions"]),
    ("castle.core", &["Castle"]),
    ("entityframework", &["System.Data.Entity"]),
    ("serilog.aspnetcore", &["Serilog"]),
    ("serilog.sinks.console", &["Serilog"]),
    ("stackexchange.redis", &["StackExchange.Redis"]),
];

/// Id prefixes of build-time-only packages (analyzers, test hosts,
/// coverage collectors).
const DEV_PACKAGE_PREFIXES: &[&str] = &[
    "coverlet",
    "microsoft.net.test.sdk",
    "microsoft.sourcelink",
    "microsoft.codeanalysis.analyzers",
    "stylecop.analyzers",
    "sonaranalyzer",
    "roslynator",
    "xunit.runner.",
    "xunit.analyzers",
];

/// Table-and-heuristic metadata provider, fed by the project loader.
#[derive(Default)]
pub struct HeuristicMetadata {
    globals: HashMap<String, Vec<GlobalUsing>>,
    /// Ids declared with PrivateAssets=all, lowercase.
    private_assets: HashSet<String>,
}

impl HeuristicMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record global usings parsed out of a project file.
    pub fn register_global_usings(&mut self, project_path: &str, namespaces: &[String]) {
        let entry = self.globals.entry(project_path.to_string()).or_default();
        for namespace in namespaces {
            entry.push(GlobalUsing::new(namespace, project_path));
        }
    }

    /// Record a package declared with PrivateAssets=all.
    pub fn register_private_assets(&mut self, package_id: &str) {
        self.private_assets.insert(package_id.to_lowercase());
    }
}

impl MetadataProvider for HeuristicMetadata {
    fn package_namespaces(
        &self,
        package_id: &str,
        _version: &str,
        _target_framework: &str,
    ) -> Vec<String> {
        if package_id.trim().is_empty() {
            return Vec::new();
        }
        if let Some((_, namespaces)) = KNOWN_NAMESPACES
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(package_id))
        {
            return namespaces.iter().map(|s| s.to_string()).collect();
        }
        // Fallback: the id as root namespace, plus everything under it.
        vec![package_id.to_string(), format!("{package_id}.*")]
    }

    fn global_usings(&self, project_path: &str) -> Vec<GlobalUsing> {
        self.globals.get(project_path).cloned().unwrap_or_default()
    }

    fn is_development_dependency(&self, package_id: &str) -> bool {
        let id = package_id.to_lowercase();
        self.private_assets.contains(&id)
            || DEV_PACKAGE_PREFIXES.iter().any(|p| id.starts_with(p))
    }
}
