//! Ambient usage detection for globally-imported packages.
//!
//! When a package is imported through a global using, the absence of
//! explicit `using` statements is expected and uninformative. This resolver
//! re-runs the qualified-name pass (fully-qualified access is still valid
//! evidence) and consults a closed signature table for well-known
//! namespaces. Resolving an arbitrary unqualified identifier to its origin
//! namespace needs a compiler front end; the table is the auditable
//! approximation. Unrecognized identifiers are never flagged.

use std::collections::HashSet;
use std::sync::{LazyLock, Mutex};

use rayon::prelude::*;
use regex::Regex;

use crate::cancel::CancelToken;
use crate::error::AnalysisError;
use crate::pattern::NamespacePattern;
use crate::providers::SourceProvider;
use crate::scanner::{self, UsageMap};

/// How a signature is recognized in source text.
#[derive(Debug, Clone, Copy)]
enum Signature {
    /// Literal substring, e.g. `[Fact]`.
    Literal(&'static str),
    /// Bare capitalized identifier followed by `.`, `(` or `<`, e.g. `Mock`.
    Ident(&'static str),
}

use Signature::{Ident, Literal};

/// Namespace → signatures considered sufficient evidence of ambient use.
/// New ambient libraries are added here, never in the scan loop.
const AMBIENT_SIGNATURES: &[(&str, &[Signature])] = &[
    (
        "Xunit",
        &[
            Literal("[Fact]"),
            Literal("[Theory]"),
            Literal("[InlineData"),
            Literal("Assert."),
        ],
    ),
    ("Moq", &[Ident("Mock"), Ident("It")]),
    (
        "NUnit.Framework",
        &[
            Literal("[Test]"),
            Literal("[TestFixture]"),
            Literal("[TestCase"),
            Literal("[SetUp]"),
            Literal("Assert."),
        ],
    ),
    (
        "Microsoft.VisualStudio.TestTools.UnitTesting",
        &[
            Literal("[TestMethod]"),
            Literal("[TestClass]"),
            Literal("[DataRow"),
            Literal("Assert."),
        ],
    ),
    ("FluentAssertions", &[Literal(".Should()")]),
    ("Shouldly", &[Literal(".ShouldBe")]),
];

/// Capitalized identifier followed by `.`, `(` or `<`.
static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z][A-Za-z0-9_]*)\s*[.(<]").unwrap());

/// Evidence pass for packages imported via a global using.
///
/// Shares the read-failure dedupe set with the main scanner so a file that
/// fails in both passes is logged once.
pub fn resolve_global_usage(
    files: &[String],
    patterns: &[NamespacePattern],
    namespaces: &[String],
    exclude: &(dyn Fn(&str) -> bool + Sync),
    source: &dyn SourceProvider,
    failed_reads: &Mutex<HashSet<String>>,
    cancel: &CancelToken,
) -> Result<UsageMap, AnalysisError> {
    cancel.check()?;

    let maps: Vec<UsageMap> = files
        .par_iter()
        .filter(|file| !exclude(file))
        .map(|file| {
            if cancel.is_cancelled() {
                return UsageMap::new();
            }
            let content = match source.read_to_string(file) {
                Ok(content) => content,
                Err(err) => {
                    scanner::note_read_failure(file, &err, failed_reads);
                    return UsageMap::new();
                }
            };

            let mut map = UsageMap::new();
            for namespace in scanner::qualified_matches(&content, patterns) {
                map.entry(namespace).or_default().push(file.clone());
            }
            for namespace in namespaces {
                if content_has_ambient_usage(&content, namespace) {
                    map.entry(namespace.clone()).or_default().push(file.clone());
                }
            }
            map
        })
        .collect();
    cancel.check()?;

    let mut result = UsageMap::new();
    for map in maps {
        scanner::merge_usage(&mut result, map);
    }
    Ok(result)
}

/// Test one file's content against the signature table entry for
/// `namespace`. Namespaces without a table entry never match.
pub(crate) fn content_has_ambient_usage(content: &str, namespace: &str) -> bool {
    let Some((_, signatures)) = AMBIENT_SIGNATURES
        .iter()
        .find(|(ns, _)| ns.eq_ignore_ascii_case(namespace))
    else {
        return false;
    };

    signatures.iter().any(|signature| match signature {
        Literal(text) => content.contains(text),
        Ident(token) => IDENT_RE
            .captures_iter(content)
            .any(|cap| &cap[1] == *token),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xunit_attribute_signatures() {
        let content = "public class Tests {\n    [Fact]\n    public void Works() { }\n}\n";
        assert!(content_has_ambient_usage(content, "Xunit"));
        assert!(content_has_ambient_usage(content, "xunit"));
    }

    #[test]
    fn xunit_assert_signature() {
        let content = "Assert.True(true);\n";
        assert!(content_has_ambient_usage(content, "Xunit"));
    }

    #[test]
    fn moq_ident_requires_call_shape() {
        assert!(content_has_ambient_usage("var m = new Mock<IFoo>();", "Moq"));
        assert!(content_has_ambient_usage("It.IsAny<int>()", "Moq"));
        // A bare word is not evidence.
        assert!(!content_has_ambient_usage("// Mock data for the demo", "Moq"));
    }

    #[test]
    fn unknown_namespace_never_matches() {
        let content = "[Fact]\nAssert.True(true);\n";
        assert!(!content_has_ambient_usage(content, "Contoso.Widgets"));
    }

    #[test]
    fn fluent_assertions_signature() {
        assert!(content_has_ambient_usage(
            "result.Should().Be(42);",
            "FluentAssertions"
        ));
        assert!(!content_has_ambient_usage("result.Equals(42);", "FluentAssertions"));
    }
}
