//! YAML front-matter extraction and caching.
//!
//! A note's front-matter is the fenced block between a leading `---` line
//! and the next `---`/`...` line. Parsed blocks are cached per path and
//! invalidated by file mtime, so repeated arbitration of the same note
//! doesn't re-read or re-parse. Missing files, unreadable files, and
//! malformed YAML all degrade to "no front-matter" — the unowned case —
//! rather than erroring.

use dashmap::DashMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Front-matter fields the daemon cares about. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Frontmatter {
    /// Declaring user of the note. Absent or empty means unowned.
    #[serde(default)]
    pub owner: Option<String>,
}

/// Pull the raw front-matter block out of note text, without parsing.
///
/// Requires the `---` fence to be the very first line; returns the lines
/// between it and the closing fence. An unterminated fence yields `None`.
fn extract_block(content: &str) -> Option<String> {
    let mut lines = content.lines();
    if lines.next()?.trim_end() != "---" {
        return None;
    }
    let mut block = String::new();
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return Some(block);
        }
        block.push_str(line);
        block.push('\n');
    }
    None
}

/// Parse the front-matter of note text. `None` when absent or malformed.
pub fn parse_frontmatter(content: &str) -> Option<Frontmatter> {
    let block = extract_block(content)?;
    match serde_yaml::from_str::<Frontmatter>(&block) {
        Ok(fm) => Some(fm),
        Err(e) => {
            eprintln!("[Frontmatter] Malformed YAML block ignored: {e}");
            None
        }
    }
}

/// Per-path front-matter cache keyed by file mtime.
///
/// `get` returns the cached parse while the file's mtime is unchanged and
/// re-reads otherwise. Every failure mode (missing file, unreadable
/// metadata, no front-matter) is `None` — callers treat that as unowned.
#[derive(Debug, Default)]
pub struct FrontmatterCache {
    entries: DashMap<PathBuf, (SystemTime, Option<Frontmatter>)>,
}

impl FrontmatterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<Frontmatter> {
        let mtime = std::fs::metadata(path).and_then(|m| m.modified()).ok()?;

        if let Some(entry) = self.entries.get(path) {
            let (cached_mtime, cached) = entry.value();
            if *cached_mtime == mtime {
                return cached.clone();
            }
        }

        let parsed = match std::fs::read_to_string(path) {
            Ok(content) => parse_frontmatter(&content),
            Err(e) => {
                eprintln!("[Frontmatter] Could not read {}: {e}", path.display());
                None
            }
        };
        self.entries.insert(path.to_path_buf(), (mtime, parsed.clone()));
        parsed
    }

    /// Drop a single cached entry (e.g. after the file moved).
    pub fn invalidate(&self, path: &Path) {
        self.entries.remove(path);
    }
}
