//! Domain model: solutions, projects, package references, global usings.

mod package;
mod project;
mod solution;

pub use package::{GlobalUsing, PackageReference};
pub use project::Project;
pub(crate) use project::file_excluded;
pub use solution::Solution;

/// Normalize a file path for identity comparison: forward slashes only,
/// case-insensitive.
pub(crate) fn normalize_path(path: &str) -> String {
    path.replace('\\', "/").to_lowercase()
}
