//! Input discovery: brace expansion, globbing, exclusions and junk filtering.

use crate::constants::{JUNK_FILE_NAMES, MAX_BRACE_EXPANSIONS};
use crate::error::{CompressionError, Result};
use glob::{glob_with, MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const NEGATION_PREFIX: char = '!';

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Expands shell-style brace groups into every alternative.
///
/// `img/*.{jpg,png}` yields `img/*.jpg` and `img/*.png`. Groups nest, and
/// a group without a top-level comma (`{jpg}`) is kept literally. A
/// backslash escapes the following character. Fails once the expansion
/// would exceed [`MAX_BRACE_EXPANSIONS`] patterns.
pub fn expand_braces(pattern: &str) -> Result<Vec<String>> {
    let mut expanded = Vec::new();
    expand_into(pattern, pattern, &mut expanded)?;
    Ok(expanded)
}

fn expand_into(source: &str, pattern: &str, out: &mut Vec<String>) -> Result<()> {
    match find_brace_group(pattern) {
        Some((open, close, alternatives)) => {
            let prefix = &pattern[..open];
            let suffix = &pattern[close + 1..];
            for alt in alternatives {
                expand_into(source, &format!("{}{}{}", prefix, alt, suffix), out)?;
            }
        }
        None => {
            if out.len() >= MAX_BRACE_EXPANSIONS {
                return Err(CompressionError::InvalidPattern(
                    source.to_string(),
                    format!("expands to more than {} patterns", MAX_BRACE_EXPANSIONS),
                ));
            }
            out.push(pattern.to_string());
        }
    }
    Ok(())
}

/// Locates the first brace group that has at least one top-level comma.
/// Returns the byte offsets of its braces and its alternatives.
fn find_brace_group(pattern: &str) -> Option<(usize, usize, Vec<&str>)> {
    let bytes = pattern.as_bytes();
    let mut start = 0;

    while start < bytes.len() {
        let open = next_unescaped(bytes, start, b'{')?;

        let mut depth = 0usize;
        let mut commas = Vec::new();
        let mut close = None;
        let mut i = open;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 1,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i);
                        break;
                    }
                }
                b',' if depth == 1 => commas.push(i),
                _ => {}
            }
            i += 1;
        }

        match close {
            Some(close) if !commas.is_empty() => {
                let mut alternatives = Vec::with_capacity(commas.len() + 1);
                let mut from = open + 1;
                for comma in commas {
                    alternatives.push(&pattern[from..comma]);
                    from = comma + 1;
                }
                alternatives.push(&pattern[from..close]);
                return Some((open, close, alternatives));
            }
            // Unbalanced: nothing further can be a group.
            None => return None,
            // Literal group: keep scanning after its opening brace.
            Some(_) => start = open + 1,
        }
    }

    None
}

fn next_unescaped(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == needle => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Returns true for OS and editor droppings that never count as input.
pub fn is_junk_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    JUNK_FILE_NAMES.contains(&name)
        || name.starts_with("._")
        || name.ends_with('~')
        || (name.starts_with('.') && name.ends_with(".swp"))
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Resolves a list of patterns into a sorted, de-duplicated list of files.
///
/// Patterns beginning with `!` exclude whatever they match (or anything
/// beneath a directory they match). A pattern naming an existing
/// directory contributes every non-hidden file below it.
pub fn collect_input_files(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut includes = Vec::new();
    let mut excludes = Vec::new();

    for raw in patterns {
        match raw.strip_prefix(NEGATION_PREFIX) {
            Some(negated) => {
                for expanded in expand_braces(negated)? {
                    let pattern = Pattern::new(&expanded).map_err(|e| {
                        CompressionError::InvalidPattern(expanded.clone(), e.to_string())
                    })?;
                    excludes.push(pattern);
                }
            }
            None => includes.extend(expand_braces(raw)?),
        }
    }

    let mut files = BTreeSet::new();

    for pattern in &includes {
        let literal = Path::new(pattern);
        if literal.is_dir() {
            for entry in WalkDir::new(literal).into_iter().filter_entry(|e| !is_hidden(e)) {
                let entry = entry?;
                if entry.file_type().is_file() {
                    files.insert(entry.into_path());
                }
            }
            continue;
        }

        let paths = glob_with(pattern, MATCH_OPTIONS)
            .map_err(|e| CompressionError::InvalidPattern(pattern.clone(), e.to_string()))?;
        for path in paths.flatten() {
            if path.is_file() {
                files.insert(path);
            }
        }
    }

    Ok(files
        .into_iter()
        .filter(|path| !is_junk_file(path))
        .filter(|path| !is_excluded(path, &excludes))
        .collect())
}

fn is_excluded(path: &Path, excludes: &[Pattern]) -> bool {
    excludes.iter().any(|pattern| {
        path.ancestors()
            .any(|candidate| pattern.matches_path_with(candidate, MATCH_OPTIONS))
    })
}
