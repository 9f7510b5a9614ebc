//! Lexical source scanning: using statements, aliases, qualified names.
//!
//! Three independent passes write into one evidence map. Tuning one
//! heuristic never touches file I/O or aggregation.

use std::collections::{HashMap, HashSet};
use std::sync::{LazyLock, Mutex};

use rayon::prelude::*;
use regex::Regex;

use crate::cancel::CancelToken;
use crate::error::AnalysisError;
use crate::pattern::NamespacePattern;
use crate::providers::SourceProvider;

/// Evidence map: namespace → files in which it was referenced.
pub type UsageMap = HashMap<String, Vec<String>>;

/// `using Name.Space;`, including `global using` and `using static` forms.
/// Alias declarations do not match (they have `=` before the `;`).
static USING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*(?:global\s+)?using\s+(?:static\s+)?([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\s*;",
    )
    .unwrap()
});

/// `using Alias = Name.Space;`
static ALIAS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*(?:global\s+)?using\s+([A-Za-z_][A-Za-z0-9_]*)\s*=\s*([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\s*;",
    )
    .unwrap()
});

/// Identifier chains followed by `.` or `(`, optionally preceded by `new`.
/// Catches `Newtonsoft.Json.JsonConvert.SerializeObject(...)` without a
/// using statement.
static QUALIFIED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:new\s+)?([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\s*[.(]")
        .unwrap()
});

/// Scan files for references to any of the namespace patterns.
///
/// Files are scanned in parallel; each worker returns its own map and the
/// results are merged on one aggregator, deduplicated by (namespace, file).
/// Unreadable files are logged once per path through `failed_reads` and
/// contribute no evidence.
pub fn scan_files(
    files: &[String],
    patterns: &[NamespacePattern],
    exclude: &(dyn Fn(&str) -> bool + Sync),
    source: &dyn SourceProvider,
    failed_reads: &Mutex<HashSet<String>>,
    cancel: &CancelToken,
) -> Result<UsageMap, AnalysisError> {
    cancel.check()?;
    if patterns.is_empty() {
        return Ok(UsageMap::new());
    }

    let maps: Vec<UsageMap> = files
        .par_iter()
        .filter(|file| !exclude(file))
        .map(|file| {
            if cancel.is_cancelled() {
                return UsageMap::new();
            }
            match source.read_to_string(file) {
                Ok(content) => {
                    let mut map = UsageMap::new();
                    for namespace in scan_content(&content, patterns) {
                        map.entry(namespace).or_default().push(file.clone());
                    }
                    map
                }
                Err(err) => {
                    note_read_failure(file, &err, failed_reads);
                    UsageMap::new()
                }
            }
        })
        .collect();
    cancel.check()?;

    let mut result = UsageMap::new();
    for map in maps {
        merge_usage(&mut result, map);
    }
    Ok(result)
}

/// Merge evidence into `target`, deduplicating (namespace, file) pairs.
pub fn merge_usage(target: &mut UsageMap, incoming: UsageMap) {
    for (namespace, files) in incoming {
        let entry = target.entry(namespace).or_default();
        for file in files {
            if !entry.contains(&file) {
                entry.push(file);
            }
        }
    }
}

/// Log a read failure once per file path; later failures for the same path
/// are silent.
pub(crate) fn note_read_failure(
    file: &str,
    err: &std::io::Error,
    failed_reads: &Mutex<HashSet<String>>,
) {
    let mut seen = failed_reads
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if seen.insert(file.to_string()) {
        log::warn!("skipping unreadable source file {file}: {err}");
    }
}

/// Run all three lexical passes over one file's content. Returns the
/// matched namespaces, deduplicated.
fn scan_content(content: &str, patterns: &[NamespacePattern]) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();

    // Pass 1: explicit using statements.
    for cap in USING_RE.captures_iter(content) {
        let namespace = &cap[1];
        if patterns.iter().any(|p| p.matches(namespace)) {
            push_unique(&mut found, namespace);
        }
    }

    // Pass 2: alias table, consumed by the qualified pass below.
    let aliases: HashMap<String, String> = ALIAS_RE
        .captures_iter(content)
        .map(|cap| (cap[1].to_string(), cap[2].to_string()))
        .collect();

    // Pass 3: qualified identifier chains, with alias substitution on the
    // first segment.
    qualified_pass(content, patterns, &aliases, &mut found);

    found
}

/// The qualified-name pass alone, without alias context. Reused by the
/// global-using resolver, where fully-qualified access remains valid
/// evidence.
pub(crate) fn qualified_matches(content: &str, patterns: &[NamespacePattern]) -> Vec<String> {
    let mut found = Vec::new();
    qualified_pass(content, patterns, &HashMap::new(), &mut found);
    found
}

fn qualified_pass(
    content: &str,
    patterns: &[NamespacePattern],
    aliases: &HashMap<String, String>,
    found: &mut Vec<String>,
) {
    for cap in QUALIFIED_RE.captures_iter(content) {
        let chain = &cap[1];
        test_chain(chain, patterns, found);

        if aliases.is_empty() {
            continue;
        }
        match chain.split_once('.') {
            Some((first, rest)) => {
                if let Some(real) = aliases.get(first) {
                    test_chain(&format!("{real}.{rest}"), patterns, found);
                }
            }
            None => {
                if let Some(real) = aliases.get(chain) {
                    test_chain(real, patterns, found);
                }
            }
        }
    }
}

/// Test every progressive dotted prefix of the chain (`A`, `A.B`, `A.B.C`)
/// against all patterns.
fn test_chain(chain: &str, patterns: &[NamespacePattern], found: &mut Vec<String>) {
    for prefix in dotted_prefixes(chain) {
        if patterns.iter().any(|p| p.matches(prefix)) {
            push_unique(found, prefix);
        }
    }
}

fn dotted_prefixes(chain: &str) -> Vec<&str> {
    let mut prefixes: Vec<&str> = chain
        .char_indices()
        .filter(|&(_, c)| c == '.')
        .map(|(i, _)| &chain[..i])
        .collect();
    prefixes.push(chain);
    prefixes
}

fn push_unique(found: &mut Vec<String>, namespace: &str) {
    if !found.iter().any(|n| n.eq_ignore_ascii_case(namespace)) {
        found.push(namespace.to_string());
    }
}
