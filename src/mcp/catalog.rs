//! Parser for `docker mcp catalog show` output.
//!
//! Docker has shipped two unrelated text layouts for this command.
//!
//! Legacy, one server per line:
//!
//! ```text
//! brave-search: Brave search engine integration
//! postgres: Read-only PostgreSQL access
//! ```
//!
//! Current, ANSI-colored blocks where a 2-space indent starts a server and a
//! 4-space (or deeper) indent continues its description:
//!
//! ```text
//! MCP Server Catalog
//! 112 servers available
//! ──────────────────────
//!   brave-search
//!     Brave search engine integration
//!     with web and local results
//! ```
//!
//! Both are accepted without knowing which one a given Docker version emits.
//! The output is undocumented, so the parser is best-effort: lines it does not
//! recognize are skipped, never reported as errors.

use regex::Regex;
use std::sync::LazyLock;

static ANSI_ESCAPE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").ok());

static LEGACY_LINE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^([a-zA-Z0-9_-]+):\s*(.+)$").ok());

static COUNT_LINE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^(total:?\s*)?\d+\s+(mcp\s+)?(servers?|entries|items)\b").ok()
});

/// One server listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Catalog name
    pub name: String,
    /// One-line description; wrapped lines joined with single spaces
    pub description: String,
}

/// Removes ANSI color sequences.
#[must_use]
pub fn strip_ansi(line: &str) -> String {
    match ANSI_ESCAPE.as_ref() {
        Some(re) => re.replace_all(line, "").into_owned(),
        None => line.to_string(),
    }
}

fn leading_spaces(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ').count()
}

fn is_separator(trimmed: &str) -> bool {
    trimmed.chars().all(|c| matches!(c, '-' | '─' | '=' | '━'))
}

fn is_title(trimmed: &str) -> bool {
    let lower = trimmed.to_lowercase();
    lower.trim_end_matches(':').ends_with("catalog") && !LEGACY_LINE.as_ref().is_some_and(|re| re.is_match(trimmed))
}

fn is_count(trimmed: &str) -> bool {
    COUNT_LINE.as_ref().is_some_and(|re| re.is_match(trimmed))
}

/// Parses catalog text in either layout.
#[must_use]
pub fn parse_catalog(output: &str) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();
    let mut current: Option<CatalogEntry> = None;

    for raw in output.lines() {
        let stripped = strip_ansi(raw);
        let trimmed = stripped.trim();
        // Indentation is measured before color codes are removed: Docker puts
        // the escape sequences after the leading spaces.
        let indent = leading_spaces(raw);

        if trimmed.is_empty() || is_separator(trimmed) {
            continue;
        }
        // Title and count summary are header lines; indented lines are entries.
        if indent == 0 && (is_title(trimmed) || is_count(trimmed)) {
            continue;
        }

        if let Some(caps) = LEGACY_LINE.as_ref().and_then(|re| re.captures(&stripped)) {
            entries.extend(current.take());
            entries.push(CatalogEntry {
                name: caps[1].to_string(),
                description: caps[2].trim().to_string(),
            });
            continue;
        }

        match indent {
            2 => {
                entries.extend(current.take());
                let name = trimmed.split_whitespace().next().unwrap_or(trimmed).trim_end_matches(':');
                current = Some(CatalogEntry {
                    name: name.to_string(),
                    description: String::new(),
                });
            }
            n if n >= 4 => {
                if let Some(entry) = current.as_mut() {
                    if !entry.description.is_empty() {
                        entry.description.push(' ');
                    }
                    entry.description.push_str(trimmed);
                }
            }
            _ => {}
        }
    }

    entries.extend(current);
    entries
}

/// Finds `name`, or failing that `alias`, among parsed entries.
#[must_use]
pub fn find_entry<'a>(entries: &'a [CatalogEntry], name: &str, alias: Option<&str>) -> Option<&'a CatalogEntry> {
    entries
        .iter()
        .find(|e| e.name == name)
        .or_else(|| alias.and_then(|a| entries.iter().find(|e| e.name == a)))
}
