//! Project file (.csproj/.vbproj/.fsproj) and Directory.Packages.props
//! parsing.

use std::collections::HashMap;
use std::path::Path;

use super::{attr_value, element_headers, element_text};

/// A declared package reference, straight from the project XML.
#[derive(Debug, Clone, Default)]
pub struct PackageDeclaration {
    pub id: String,
    /// Empty when the version is managed centrally.
    pub version: String,
    pub condition: Option<String>,
    /// Raw PrivateAssets value; `all` marks a build-time-only dependency.
    pub private_assets: Option<String>,
}

/// Parsed project file data.
#[derive(Debug, Clone, Default)]
pub struct ProjectFile {
    pub name: String,
    /// Raw TargetFramework(s) value; `;`-separated when multi-targeting.
    pub target_frameworks: String,
    pub package_declarations: Vec<PackageDeclaration>,
    /// `<Using Include="..."/>` namespaces.
    pub global_usings: Vec<String>,
    /// `<ImplicitUsings>enable</ImplicitUsings>`
    pub implicit_usings: bool,
}

/// Parse a project file. Handles SDK-style projects; legacy projects yield
/// whatever subset of elements they share.
pub fn parse_project_file(content: &str, project_path: &str) -> ProjectFile {
    let name = Path::new(project_path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let target_frameworks = element_text(content, "TargetFramework")
        .or_else(|| element_text(content, "TargetFrameworks"))
        .unwrap_or_default();

    let implicit_usings = element_text(content, "ImplicitUsings")
        .map(|v| v.eq_ignore_ascii_case("enable") || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let mut global_usings = Vec::new();
    for header in element_headers(content, "Using") {
        if let Some(namespace) = attr_value(header, "Include") {
            if !global_usings.iter().any(|g: &String| g.eq_ignore_ascii_case(&namespace)) {
                global_usings.push(namespace);
            }
        }
    }

    ProjectFile {
        name,
        target_frameworks,
        package_declarations: parse_package_declarations(content),
        global_usings,
        implicit_usings,
    }
}

fn parse_package_declarations(content: &str) -> Vec<PackageDeclaration> {
    let mut declarations = Vec::new();

    let mut search_from = 0;
    while let Some(pos) = content[search_from..].find("<PackageReference") {
        let abs = search_from + pos;
        let rest = &content[abs..];
        let Some(header_end) = rest.find('>') else {
            break;
        };
        let header = &rest[..=header_end];

        let id = attr_value(header, "Include").unwrap_or_default();
        let mut version = attr_value(header, "Version")
            .or_else(|| attr_value(header, "VersionOverride"))
            .unwrap_or_default();

        // Version may be a child element instead of an attribute.
        if version.is_empty() && !header.ends_with("/>") {
            if let Some(close) = rest.find("</PackageReference>") {
                if let Some(v) = element_text(&rest[header_end..close], "Version") {
                    version = v;
                }
            }
        }

        if !id.is_empty() {
            declarations.push(PackageDeclaration {
                id,
                version,
                condition: attr_value(header, "Condition"),
                private_assets: attr_value(header, "PrivateAssets"),
            });
        }
        search_from = abs + "<PackageReference".len();
    }

    declarations
}

/// Parsed Directory.Packages.props data for central package management.
#[derive(Debug, Clone, Default)]
pub struct PackagesProps {
    pub managed_centrally: bool,
    /// Package id (lowercase) → centrally declared version.
    pub versions: HashMap<String, String>,
}

pub fn parse_packages_props(content: &str) -> PackagesProps {
    let managed_centrally = element_text(content, "ManagePackageVersionsCentrally")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let mut versions = HashMap::new();
    for header in element_headers(content, "PackageVersion") {
        if let (Some(id), Some(version)) =
            (attr_value(header, "Include"), attr_value(header, "Version"))
        {
            versions.insert(id.to_lowercase(), version);
        }
    }

    PackagesProps {
        managed_centrally,
        versions,
    }
}
