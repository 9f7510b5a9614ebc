//! Post-analysis reporting: classify references into subsets and render
//! them for the console or as JSON.
//!
//! The report only reads `PackageReference` usage state; it never mutates
//! the model.

use console::style;
use serde::Serialize;

use nusweep_core::model::{PackageReference, Solution};
use nusweep_core::providers::MetadataProvider;

#[derive(Debug, Clone, Serialize)]
pub struct PackageLine {
    pub id: String,
    pub version: String,
    pub condition: Option<String>,
    pub is_direct: bool,
    pub detected_namespaces: Vec<String>,
    pub usage_locations: Vec<String>,
}

impl PackageLine {
    fn from_reference(package: &PackageReference) -> Self {
        Self {
            id: package.id.clone(),
            version: package.version.clone(),
            condition: package.condition.clone(),
            is_direct: package.is_direct,
            detected_namespaces: package.detected_namespaces.clone(),
            usage_locations: package.usage_locations.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct ProjectReport {
    pub project: String,
    pub name: String,
    pub used: Vec<PackageLine>,
    /// Unconditional, direct, non-development references with no usage
    /// evidence: the removal candidates.
    pub unused: Vec<PackageLine>,
    /// Unused references guarded by an MSBuild condition; removal needs a
    /// human decision.
    pub unused_conditional: Vec<PackageLine>,
    /// Build-time-only dependencies; source usage is not expected.
    pub development: Vec<PackageLine>,
    /// Unused transitive references; not independently removable.
    pub transitive: Vec<PackageLine>,
}

#[derive(Debug, Default, Serialize)]
pub struct Totals {
    pub packages: usize,
    pub used: usize,
    pub unused: usize,
    pub unused_conditional: usize,
    pub development: usize,
    pub transitive: usize,
}

#[derive(Debug, Serialize)]
pub struct SolutionReport {
    pub solution: String,
    pub central_package_management: bool,
    pub projects: Vec<ProjectReport>,
    pub totals: Totals,
}

/// Classify every analyzed reference.
pub fn build_report(solution: &Solution, metadata: &dyn MetadataProvider) -> SolutionReport {
    let mut totals = Totals::default();
    let mut projects = Vec::new();

    for project in &solution.projects {
        let mut report = ProjectReport {
            project: project.path.clone(),
            name: project.name.clone(),
            ..Default::default()
        };

        for package in &project.package_references {
            totals.packages += 1;
            let line = PackageLine::from_reference(package);
            if package.is_used {
                totals.used += 1;
                report.used.push(line);
            } else if metadata.is_development_dependency(&package.id) {
                totals.development += 1;
                report.development.push(line);
            } else if !package.is_direct {
                totals.transitive += 1;
                report.transitive.push(line);
            } else if package.condition.is_some() {
                totals.unused_conditional += 1;
                report.unused_conditional.push(line);
            } else {
                totals.unused += 1;
                report.unused.push(line);
            }
        }
        projects.push(report);
    }

    SolutionReport {
        solution: solution.path.clone(),
        central_package_management: solution.uses_central_package_management,
        projects,
        totals,
    }
}

/// Render the report to stdout with console styling.
pub fn print_report(report: &SolutionReport, verbose: bool) {
    println!(
        "\n{}  {}",
        style("nusweep").bold(),
        style(&report.solution).bold()
    );
    if report.central_package_management {
        println!("  {}", style("central package management enabled").dim());
    }

    for project in &report.projects {
        println!("\n  {}", style(&project.name).bold());

        for line in &project.unused {
            println!(
                "    {} {} {}",
                style("✗").red().bold(),
                line.id,
                style(&line.version).dim()
            );
        }
        for line in &project.unused_conditional {
            println!(
                "    {} {} {}  {}",
                style("?").yellow().bold(),
                line.id,
                style(&line.version).dim(),
                style(line.condition.as_deref().unwrap_or_default()).yellow()
            );
        }
        for line in &project.transitive {
            println!(
                "    {} {} {}  {}",
                style("~").dim(),
                line.id,
                style(&line.version).dim(),
                style("(transitive)").dim()
            );
        }
        for line in &project.development {
            println!(
                "    {} {} {}  {}",
                style("·").dim(),
                line.id,
                style(&line.version).dim(),
                style("(development)").dim()
            );
        }
        if verbose {
            for line in &project.used {
                let first_location = line.usage_locations.first().cloned().unwrap_or_default();
                println!(
                    "    {} {} {}  {}",
                    style("✓").green(),
                    line.id,
                    style(&line.version).dim(),
                    style(&first_location).dim()
                );
            }
        } else if project.unused.is_empty()
            && project.unused_conditional.is_empty()
            && project.transitive.is_empty()
            && project.development.is_empty()
        {
            println!("    {}", style("all references used").green());
        }
    }

    println!(
        "\n  {:<14} {}",
        "Packages:",
        report.totals.packages
    );
    println!("  {:<14} {}", "Used:", report.totals.used);
    println!(
        "  {:<14} {}",
        "Unused:",
        style(report.totals.unused).red().bold()
    );
    if report.totals.unused_conditional > 0 {
        println!(
            "  {:<14} {}",
            "Conditional:",
            style(report.totals.unused_conditional).yellow()
        );
    }
    if report.totals.development > 0 {
        println!("  {:<14} {}", "Development:", report.totals.development);
    }
}
