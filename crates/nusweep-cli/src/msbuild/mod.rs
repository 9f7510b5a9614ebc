//! Lightweight MSBuild file parsing: .sln, project files, packages props.
//!
//! Extracts only the elements the analyzer needs; no full XML library.

pub mod project;
pub mod solution;

/// Extract text content of a simple element like `<Tag>value</Tag>`.
pub(crate) fn element_text(content: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = content.find(&open)?;
    let after = start + open.len();
    let end = content[after..].find(&close)?;
    let text = content[after..after + end].trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Extract an attribute value from an element's raw text.
pub(crate) fn attr_value(element: &str, attr: &str) -> Option<String> {
    for quote in ['"', '\''] {
        let pattern = format!("{attr}={quote}");
        if let Some(start) = element.find(&pattern) {
            let after = start + pattern.len();
            if let Some(end) = element[after..].find(quote) {
                return Some(element[after..after + end].to_string());
            }
        }
    }
    None
}

/// Iterate over raw `<Tag .../>` or `<Tag ...>` element headers.
pub(crate) fn element_headers<'a>(content: &'a str, tag: &str) -> Vec<&'a str> {
    let pattern = format!("<{tag}");
    let mut headers = Vec::new();
    let mut search_from = 0;
    while let Some(pos) = content[search_from..].find(&pattern) {
        let abs = search_from + pos;
        let rest = &content[abs..];
        // The tag name must end here, not continue into a longer name.
        let boundary = rest.as_bytes().get(pattern.len());
        if !matches!(boundary, Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'/') | Some(b'>')) {
            search_from = abs + pattern.len();
            continue;
        }
        match rest.find('>') {
            Some(end) => headers.push(&rest[..=end]),
            None => break,
        }
        search_from = abs + pattern.len();
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_text_trims() {
        let xml = "<PropertyGroup><TargetFramework> net8.0 </TargetFramework></PropertyGroup>";
        assert_eq!(element_text(xml, "TargetFramework").as_deref(), Some("net8.0"));
        assert_eq!(element_text(xml, "RootNamespace"), None);
    }

    #[test]
    fn attr_value_supports_both_quotes() {
        assert_eq!(
            attr_value(r#"<PackageReference Include="Serilog" />"#, "Include").as_deref(),
            Some("Serilog")
        );
        assert_eq!(
            attr_value("<PackageReference Include='Serilog'/>", "Include").as_deref(),
            Some("Serilog")
        );
        assert_eq!(attr_value("<PackageReference />", "Include"), None);
    }

    #[test]
    fn element_headers_respect_tag_boundaries() {
        let xml = r#"<Using Include="Xunit"/><UsingTask Name="T"/><Using Include="Moq"/>"#;
        let headers = element_headers(xml, "Using");
        assert_eq!(headers.len(), 2);
        assert!(headers[0].contains("Xunit"));
        assert!(headers[1].contains("Moq"));
    }
}
