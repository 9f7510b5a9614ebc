//! End-to-end analyzer behavior against in-memory collaborators.

mod common;

use common::{MemorySource, TableMetadata};
use nusweep_core::analyzer::PackageUsageAnalyzer;
use nusweep_core::cancel::CancelToken;
use nusweep_core::error::AnalysisError;
use nusweep_core::model::{GlobalUsing, PackageReference, Project, Solution};
use pretty_assertions::assert_eq;

fn project_with_files(files: &[&str]) -> Project {
    let mut project = Project::new("src/App/App.csproj", "App", "net8.0");
    project.source_files = files.iter().map(|f| f.to_string()).collect();
    project
}

#[test]
fn used_package_via_using_statement() {
    // Scenario A: explicit using statement plus a call site.
    let source = MemorySource::new().with_file(
        "src/App/Program.cs",
        "using Newtonsoft.Json;\nJsonConvert.SerializeObject(x);\n",
    );
    let metadata = TableMetadata::new().with_package("Newtonsoft.Json", &["Newtonsoft.Json"]);
    let analyzer = PackageUsageAnalyzer::new(&source, &metadata);

    let mut project = project_with_files(&["src/App/Program.cs"]);
    project
        .package_references
        .push(PackageReference::new("Newtonsoft.Json", "13.0.3", "src/App/App.csproj"));

    analyzer
        .analyze_project_package_usage(&mut project, &CancelToken::new())
        .unwrap();

    let package = &project.package_references[0];
    assert!(package.is_used);
    assert_eq!(package.usage_locations, vec!["src/App/Program.cs"]);
    assert_eq!(package.detected_namespaces, vec!["Newtonsoft.Json"]);
}

#[test]
fn unused_package_stays_unused() {
    // Scenario B: no matching text anywhere.
    let source = MemorySource::new().with_file(
        "src/App/Program.cs",
        "using System;\nConsole.WriteLine(\"hello\");\n",
    );
    let metadata = TableMetadata::new().with_package("Unused.Package", &["Unused.Package"]);
    let analyzer = PackageUsageAnalyzer::new(&source, &metadata);

    let mut project = project_with_files(&["src/App/Program.cs"]);
    project
        .package_references
        .push(PackageReference::new("Unused.Package", "1.0.0", "src/App/App.csproj"));

    analyzer
        .analyze_project_package_usage(&mut project, &CancelToken::new())
        .unwrap();

    let package = &project.package_references[0];
    assert!(!package.is_used);
    assert!(package.usage_locations.is_empty());
}

#[test]
fn global_using_package_detected_through_ambient_signatures() {
    // Scenario C: [Fact] and Assert. with no `using Xunit;`.
    let source = MemorySource::new().with_file(
        "src/App/Tests.cs",
        "public class Tests {\n    [Fact]\n    public void Works() { Assert.True(true); }\n}\n",
    );
    let metadata = TableMetadata::new().with_package("xunit", &["Xunit"]);
    let analyzer = PackageUsageAnalyzer::new(&source, &metadata);

    let mut project = project_with_files(&["src/App/Tests.cs"]);
    let mut package = PackageReference::new("xunit", "2.9.0", "src/App/App.csproj");
    package.has_global_using = true;
    project.package_references.push(package);

    analyzer
        .analyze_project_package_usage(&mut project, &CancelToken::new())
        .unwrap();

    let package = &project.package_references[0];
    assert!(package.is_used);
    assert_eq!(package.usage_locations, vec!["src/App/Tests.cs"]);
    assert_eq!(package.detected_namespaces, vec!["Xunit"]);
}

#[test]
fn global_using_flag_refreshed_from_project_usings() {
    // The flag starts false; the project's global usings establish it.
    let source = MemorySource::new().with_file(
        "src/App/Tests.cs",
        "[Fact]\npublic void Works() { Assert.True(true); }\n",
    );
    let metadata = TableMetadata::new().with_package("xunit", &["Xunit"]);
    let analyzer = PackageUsageAnalyzer::new(&source, &metadata);

    let mut project = project_with_files(&["src/App/Tests.cs"]);
    project
        .global_usings
        .push(GlobalUsing::new("Xunit", "src/App/App.csproj"));
    project
        .package_references
        .push(PackageReference::new("xunit", "2.9.0", "src/App/App.csproj"));

    analyzer
        .analyze_project_package_usage(&mut project, &CancelToken::new())
        .unwrap();

    let package = &project.package_references[0];
    assert!(package.has_global_using);
    assert!(package.is_used);
}

#[test]
fn conditional_reference_keeps_its_condition_when_unused() {
    // Scenario D.
    let source = MemorySource::new().with_file("src/App/Program.cs", "using System;\n");
    let metadata = TableMetadata::new().with_package("Debug.Only", &["Debug.Only"]);
    let analyzer = PackageUsageAnalyzer::new(&source, &metadata);

    let mut project = project_with_files(&["src/App/Program.cs"]);
    let mut package = PackageReference::new("Debug.Only", "1.0.0", "src/App/App.csproj");
    package.condition = Some("'$(Configuration)' == 'Debug'".to_string());
    project.package_references.push(package);

    analyzer
        .analyze_project_package_usage(&mut project, &CancelToken::new())
        .unwrap();

    let package = &project.package_references[0];
    assert!(!package.is_used);
    assert_eq!(
        package.condition.as_deref(),
        Some("'$(Configuration)' == 'Debug'")
    );
}

#[test]
fn excluded_file_contributes_no_evidence() {
    // Scenario E: matching content inside an excluded path.
    let source = MemorySource::new().with_file(
        "src/App/Generated/Client.cs",
        "using Newtonsoft.Json;\nJsonConvert.SerializeObject(x);\n",
    );
    let metadata = TableMetadata::new().with_package("Newtonsoft.Json", &["Newtonsoft.Json"]);
    let analyzer = PackageUsageAnalyzer::new(&source, &metadata);

    let mut project = project_with_files(&["src/App/Generated/Client.cs"]);
    project.exclude_patterns.push("**/Generated/**".to_string());
    project
        .package_references
        .push(PackageReference::new("Newtonsoft.Json", "13.0.3", "src/App/App.csproj"));

    analyzer
        .analyze_project_package_usage(&mut project, &CancelToken::new())
        .unwrap();

    let package = &project.package_references[0];
    assert!(!package.is_used);
    assert!(package.usage_locations.is_empty());
}

#[test]
fn multi_targeting_unions_namespaces_across_frameworks() {
    // Evidence for either framework's namespace marks the package used.
    let source = MemorySource::new().with_file(
        "src/App/Compat.cs",
        "using Legacy.Compat;\nLegacyShim.Run();\n",
    );
    let metadata = TableMetadata::new()
        .with_framework_package("Multi.Target", "net8.0", &["Modern.Api"])
        .with_framework_package("Multi.Target", "netstandard2.0", &["Legacy.Compat"]);
    let analyzer = PackageUsageAnalyzer::new(&source, &metadata);

    let mut project = Project::new("src/App/App.csproj", "App", "net8.0;netstandard2.0");
    project.source_files = vec!["src/App/Compat.cs".to_string()];
    project
        .package_references
        .push(PackageReference::new("Multi.Target", "2.0.0", "src/App/App.csproj"));

    analyzer
        .analyze_project_package_usage(&mut project, &CancelToken::new())
        .unwrap();

    let package = &project.package_references[0];
    assert!(package.is_used);
    assert_eq!(package.detected_namespaces, vec!["Legacy.Compat"]);
}

#[test]
fn missing_metadata_is_non_fatal() {
    let source = MemorySource::new()
        .with_file("src/App/Program.cs", "using Real.Package;\n");
    // Only one of the two packages has metadata.
    let metadata = TableMetadata::new().with_package("Real.Package", &["Real.Package"]);
    let analyzer = PackageUsageAnalyzer::new(&source, &metadata);

    let mut project = project_with_files(&["src/App/Program.cs"]);
    project
        .package_references
        .push(PackageReference::new("No.Metadata", "1.0.0", "src/App/App.csproj"));
    project
        .package_references
        .push(PackageReference::new("Real.Package", "1.0.0", "src/App/App.csproj"));

    analyzer
        .analyze_project_package_usage(&mut project, &CancelToken::new())
        .unwrap();

    assert!(!project.package_references[0].is_used);
    assert!(project.package_references[1].is_used);
}

#[test]
fn unreadable_file_does_not_abort_the_scan() {
    let source = MemorySource::new()
        .with_unreadable("src/App/Broken.cs")
        .with_file("src/App/Program.cs", "using Newtonsoft.Json;\n");
    let metadata = TableMetadata::new().with_package("Newtonsoft.Json", &["Newtonsoft.Json"]);
    let analyzer = PackageUsageAnalyzer::new(&source, &metadata);

    let mut project = project_with_files(&["src/App/Broken.cs", "src/App/Program.cs"]);
    project
        .package_references
        .push(PackageReference::new("Newtonsoft.Json", "13.0.3", "src/App/App.csproj"));

    analyzer
        .analyze_project_package_usage(&mut project, &CancelToken::new())
        .unwrap();

    let package = &project.package_references[0];
    assert!(package.is_used);
    assert_eq!(package.usage_locations, vec!["src/App/Program.cs"]);
}

#[test]
fn analysis_resets_previous_usage_state() {
    let source = MemorySource::new().with_file("src/App/Program.cs", "using System;\n");
    let metadata = TableMetadata::new().with_package("Stale.Package", &["Stale.Package"]);
    let analyzer = PackageUsageAnalyzer::new(&source, &metadata);

    let mut project = project_with_files(&["src/App/Program.cs"]);
    let mut package = PackageReference::new("Stale.Package", "1.0.0", "src/App/App.csproj");
    // Pretend an earlier run found usage that no longer exists.
    package.mark_as_used("src/App/Old.cs", Some("Stale.Package"));
    project.package_references.push(package);

    analyzer
        .analyze_project_package_usage(&mut project, &CancelToken::new())
        .unwrap();

    let package = &project.package_references[0];
    assert!(!package.is_used);
    assert!(package.usage_locations.is_empty());
    assert!(package.detected_namespaces.is_empty());
}

#[test]
fn cancellation_aborts_the_run() {
    let source = MemorySource::new().with_file("src/App/Program.cs", "using Newtonsoft.Json;\n");
    let metadata = TableMetadata::new().with_package("Newtonsoft.Json", &["Newtonsoft.Json"]);
    let analyzer = PackageUsageAnalyzer::new(&source, &metadata);

    let mut solution = Solution::new("App.sln");
    let mut project = project_with_files(&["src/App/Program.cs"]);
    project
        .package_references
        .push(PackageReference::new("Newtonsoft.Json", "13.0.3", "src/App/App.csproj"));
    solution.add_project(project);

    let cancel = CancelToken::new();
    cancel.cancel();
    let result = analyzer.analyze_package_usage(&mut solution, &cancel);
    assert!(matches!(result, Err(AnalysisError::Cancelled)));
    assert!(!solution.projects[0].package_references[0].is_used);
}

#[test]
fn solution_analysis_covers_every_project() {
    let source = MemorySource::new()
        .with_file("src/A/Program.cs", "using Pkg.A;\n")
        .with_file("src/B/Program.cs", "using System;\n");
    let metadata = TableMetadata::new()
        .with_package("Pkg.A", &["Pkg.A"])
        .with_package("Pkg.B", &["Pkg.B"]);
    let analyzer = PackageUsageAnalyzer::new(&source, &metadata);

    let mut solution = Solution::new("App.sln");
    let mut a = Project::new("src/A/A.csproj", "A", "net8.0");
    a.source_files = vec!["src/A/Program.cs".to_string()];
    a.package_references
        .push(PackageReference::new("Pkg.A", "1.0.0", "src/A/A.csproj"));
    let mut b = Project::new("src/B/B.csproj", "B", "net8.0");
    b.source_files = vec!["src/B/Program.cs".to_string()];
    b.package_references
        .push(PackageReference::new("Pkg.B", "1.0.0", "src/B/B.csproj"));
    solution.add_project(a);
    solution.add_project(b);

    analyzer
        .analyze_package_usage(&mut solution, &CancelToken::new())
        .unwrap();

    assert!(solution.projects[0].package_references[0].is_used);
    assert!(!solution.projects[1].package_references[0].is_used);
}

#[test]
fn get_package_namespaces_passes_through() {
    let source = MemorySource::new();
    let metadata = TableMetadata::new().with_package("Serilog", &["Serilog", "Serilog.Events"]);
    let analyzer = PackageUsageAnalyzer::new(&source, &metadata);

    assert_eq!(
        analyzer.get_package_namespaces("Serilog", "3.1.1", "net8.0"),
        vec!["Serilog", "Serilog.Events"]
    );
    assert!(analyzer
        .get_package_namespaces("Nope", "1.0.0", "net8.0")
        .is_empty());
}
