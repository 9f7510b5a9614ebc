//! .sln text format parsing.

use std::sync::LazyLock;

use regex::Regex;

/// A buildable project entry from a .sln file.
#[derive(Debug, Clone)]
pub struct SolutionEntry {
    pub name: String,
    /// Relative path, backslashes normalized to forward slashes.
    pub path: String,
}

/// Solution folders are virtual organising entries, not real projects.
const SOLUTION_FOLDER_GUID: &str = "2150E333-8FDC-42A3-9474-1A3956D46DE8";

/// Project file extensions the analyzer understands.
const PROJECT_EXTENSIONS: &[&str] = &[".csproj", ".vbproj", ".fsproj"];

static PROJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^Project\("\{([^}]+)\}"\)\s*=\s*"([^"]+)"\s*,\s*"([^"]+)"\s*,\s*"\{[^}]+\}""#,
    )
    .unwrap()
});

/// Parse .sln content into project entries, skipping solution folders and
/// non-project entries (websites, shared items).
pub fn parse_solution(content: &str) -> Vec<SolutionEntry> {
    let mut entries = Vec::new();

    for cap in PROJECT_RE.captures_iter(content) {
        let type_guid = cap[1].to_uppercase();
        if type_guid == SOLUTION_FOLDER_GUID {
            continue;
        }

        let path = cap[3].replace('\\', "/");
        let lower = path.to_lowercase();
        if !PROJECT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            continue;
        }

        entries.push(SolutionEntry {
            name: cap[2].to_string(),
            path,
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SLN: &str = r#"
Microsoft Visual Studio Solution File, Format Version 12.00
# Visual Studio Version 17
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "WebApp", "src\WebApp\WebApp.csproj", "{12345678-1234-1234-1234-123456789ABC}"
EndProject
Project("{F2A71F9B-5D33-465A-A702-920D77279786}") = "Tooling", "src\Tooling\Tooling.fsproj", "{11111111-2222-3333-4444-555555555555}"
EndProject
Project("{2150E333-8FDC-42A3-9474-1A3956D46DE8}") = "Solution Items", "Solution Items", "{AAAA1111-BBBB-CCCC-DDDD-EEEE22223333}"
EndProject
"#;

    #[test]
    fn parses_project_entries() {
        let entries = parse_solution(SAMPLE_SLN);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "WebApp");
        assert_eq!(entries[1].name, "Tooling");
    }

    #[test]
    fn skips_solution_folders() {
        let entries = parse_solution(SAMPLE_SLN);
        assert!(entries.iter().all(|e| e.name != "Solution Items"));
    }

    #[test]
    fn normalizes_backslashes() {
        let entries = parse_solution(SAMPLE_SLN);
        assert_eq!(entries[0].path, "src/WebApp/WebApp.csproj");
    }

    #[test]
    fn empty_solution() {
        assert!(parse_solution("# empty file\n").is_empty());
    }
}
