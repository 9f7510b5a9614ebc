//! Discovery: locate solution/project files, build the core model, and
//! provide filesystem-backed source access.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use walkdir::WalkDir;

use nusweep_core::model::{PackageReference, Project, Solution};
use nusweep_core::providers::{MetadataProvider, SourceProvider};

use crate::metadata::HeuristicMetadata;
use crate::msbuild::project::{parse_packages_props, parse_project_file, PackagesProps};
use crate::msbuild::solution::parse_solution;

/// Directory names never scanned for sources or projects.
const SKIP_DIRS: &[&str] = &[
    "bin",
    "obj",
    ".git",
    ".vs",
    ".idea",
    "node_modules",
    "packages",
    "TestResults",
];

const SOURCE_EXTENSIONS: &[&str] = &["cs", "vb", "fs"];

const PROJECT_EXTENSIONS: &[&str] = &["csproj", "vbproj", "fsproj"];

/// Filesystem-backed source provider.
pub struct FsSource;

impl SourceProvider for FsSource {
    fn read_to_string(&self, path: &str) -> std::io::Result<String> {
        fs::read_to_string(path)
    }

    fn path_exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn source_files(&self, project_dir: &str) -> Vec<String> {
        let mut files: Vec<String> = walk(Path::new(project_dir))
            .filter(|path| {
                path.extension()
                    .map(|e| e.to_string_lossy().to_lowercase())
                    .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext.as_str()))
            })
            .map(|path| path_string(&path))
            .collect();
        files.sort();
        files
    }
}

/// Build the solution model from a path argument: a .sln file, a project
/// file, or a directory containing either.
///
/// Global usings and PrivateAssets declarations found while parsing are
/// registered on the metadata provider, then read back through its
/// contract when populating each project.
pub fn load_solution(
    input: &Path,
    exclude_patterns: &[String],
    metadata: &mut HeuristicMetadata,
) -> Result<Solution> {
    if input.is_file() {
        let lower = input.to_string_lossy().to_lowercase();
        if lower.ends_with(".sln") {
            return load_from_sln(input, exclude_patterns, metadata);
        }
        if PROJECT_EXTENSIONS.iter().any(|ext| lower.ends_with(&format!(".{ext}"))) {
            return load_virtual(input.parent().unwrap_or(Path::new(".")), vec![input.to_path_buf()], exclude_patterns, metadata);
        }
        bail!("unsupported input file: {}", input.display());
    }

    if input.is_dir() {
        // Prefer a top-level solution file.
        if let Some(sln) = first_solution_file(input)? {
            return load_from_sln(&sln, exclude_patterns, metadata);
        }
        let projects = find_project_files(input);
        if projects.is_empty() {
            bail!("no solution or project files under {}", input.display());
        }
        return load_virtual(input, projects, exclude_patterns, metadata);
    }

    bail!("path not found: {}", input.display());
}

fn load_from_sln(
    sln_path: &Path,
    exclude_patterns: &[String],
    metadata: &mut HeuristicMetadata,
) -> Result<Solution> {
    let content = fs::read_to_string(sln_path)
        .with_context(|| format!("reading {}", sln_path.display()))?;
    let sln_dir = sln_path.parent().unwrap_or(Path::new("."));

    let mut solution = Solution::new(path_string(sln_path));
    apply_central_packages(&mut solution, sln_dir);

    let props = solution
        .central_package_file
        .as_deref()
        .and_then(|p| fs::read_to_string(p).ok())
        .map(|content| parse_packages_props(&content))
        .unwrap_or_default();

    for entry in parse_solution(&content) {
        let project_path = sln_dir.join(&entry.path);
        match load_project(&project_path, &props, exclude_patterns, metadata) {
            Ok(project) => solution.add_project(project),
            Err(err) => log::warn!("skipping project {}: {err:#}", entry.path),
        }
    }
    Ok(solution)
}

fn load_virtual(
    root: &Path,
    project_files: Vec<PathBuf>,
    exclude_patterns: &[String],
    metadata: &mut HeuristicMetadata,
) -> Result<Solution> {
    let mut solution = Solution::new(path_string(&root.join("virtual.sln")));
    solution.is_virtual = true;
    apply_central_packages(&mut solution, root);

    let props = solution
        .central_package_file
        .as_deref()
        .and_then(|p| fs::read_to_string(p).ok())
        .map(|content| parse_packages_props(&content))
        .unwrap_or_default();

    for path in project_files {
        match load_project(&path, &props, exclude_patterns, metadata) {
            Ok(project) => solution.add_project(project),
            Err(err) => log::warn!("skipping project {}: {err:#}", path.display()),
        }
    }
    Ok(solution)
}

fn apply_central_packages(solution: &mut Solution, dir: &Path) {
    let props_path = dir.join("Directory.Packages.props");
    if !props_path.is_file() {
        return;
    }
    if let Ok(content) = fs::read_to_string(&props_path) {
        if parse_packages_props(&content).managed_centrally {
            solution.uses_central_package_management = true;
            solution.central_package_file = Some(path_string(&props_path));
        }
    }
}

fn load_project(
    path: &Path,
    props: &PackagesProps,
    exclude_patterns: &[String],
    metadata: &mut HeuristicMetadata,
) -> Result<Project> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let path_str = path_string(path);
    let info = parse_project_file(&content, &path_str);

    let mut project = Project::new(&path_str, &info.name, &info.target_frameworks);
    project.exclude_patterns = exclude_patterns.to_vec();

    for declaration in &info.package_declarations {
        let version = if declaration.version.is_empty() {
            props
                .versions
                .get(&declaration.id.to_lowercase())
                .cloned()
                .unwrap_or_default()
        } else {
            declaration.version.clone()
        };

        let mut package = PackageReference::new(&declaration.id, version, &path_str);
        package.condition = declaration.condition.clone();
        if declaration
            .private_assets
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("all"))
        {
            metadata.register_private_assets(&declaration.id);
        }
        project.package_references.push(package);
    }

    metadata.register_global_usings(&path_str, &info.global_usings);
    project.global_usings = metadata.global_usings(&path_str);

    let project_dir = path.parent().unwrap_or(Path::new("."));
    project.source_files = FsSource.source_files(&path_string(project_dir));

    Ok(project)
}

/// First .sln file directly inside the directory, alphabetically.
fn first_solution_file(dir: &Path) -> Result<Option<PathBuf>> {
    let mut solutions: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.is_file() && p.to_string_lossy().to_lowercase().ends_with(".sln")
        })
        .collect();
    solutions.sort();
    Ok(solutions.into_iter().next())
}

fn find_project_files(root: &Path) -> Vec<PathBuf> {
    walk(root)
        .filter(|path| {
            path.extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .is_some_and(|ext| PROJECT_EXTENSIONS.contains(&ext.as_str()))
        })
        .collect()
}

fn walk(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            if SKIP_DIRS.iter().any(|skip| name.eq_ignore_ascii_case(skip)) {
                return false;
            }
            // Hidden directories, except the walk root itself.
            !(entry.depth() > 0 && entry.file_type().is_dir() && name.starts_with('.'))
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
