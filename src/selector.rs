//! Input file selection
//!
//! Picks dump files out of a directory listing by configured name pattern
//! followed by a `_YYYY-MM-DD` date stamp. Name patterns are regular
//! expressions, so `shop|audit` or `db_.*` select several dump families.

use crate::error::{CleanerError, Result};
use ahash::RandomState;
use hashbrown::HashSet;
use regex::Regex;
use std::path::Path;
use walkdir::WalkDir;

/// Compiled selection patterns
#[derive(Debug, Clone)]
pub struct FileSelector {
    patterns: Vec<Regex>,
    dedup: bool,
}

impl FileSelector {
    /// Compile one matcher per configured name pattern.
    ///
    /// Each pattern is anchored at the start of the name and matched lazily.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let patterns = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let source = format!(r"(?U)^(?:{})_[0-9]{{4}}-[0-9]{{2}}-[0-9]{{2}}", name);
                Regex::new(&source).map_err(|source| CleanerError::InvalidPattern {
                    pattern: name.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            patterns,
            dedup: false,
        })
    }

    /// Select each entry at most once, even if several patterns match it
    pub fn with_dedup(mut self, dedup: bool) -> Self {
        self.dedup = dedup;
        self
    }

    /// Filter entry names, preserving their order.
    ///
    /// Without dedup an entry appears once per pattern it matches.
    pub fn select<I, S>(&self, entries: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<String, RandomState> = HashSet::with_hasher(RandomState::new());
        let mut selected = Vec::new();

        for entry in entries {
            let entry = entry.as_ref();
            for re in &self.patterns {
                if !re.is_match(entry) {
                    continue;
                }
                if self.dedup && !seen.insert(entry.to_string()) {
                    continue;
                }
                selected.push(entry.to_string());
            }
        }

        selected
    }
}

/// List non-directory entry names directly inside `dir`, sorted by name.
///
/// Symlinks are listed without being resolved, so a dangling link is selected
/// and then fails on open like any other unreadable input.
pub fn list_dir(dir: &Path) -> Result<Vec<String>> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    let mut names = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| CleanerError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        match entry.file_name().to_str() {
            Some(name) => names.push(name.to_string()),
            None => log::warn!("Skipping non UTF-8 file name {:?}", entry.file_name()),
        }
    }

    Ok(names)
}
