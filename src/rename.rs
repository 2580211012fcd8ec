//! Rename policy: decide whether a note's file name needs slugification,
//! and carry out the decided rename.
//!
//! The decision core is pure — check validity first, only then compute a
//! slug — which makes the policy idempotent: a name that is already a
//! valid slug never produces a rename, and re-running the policy on its
//! own output is a fixed point.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::notice::NoticeSink;
use crate::slug::{is_valid_slug, slugify};

/// Structural identity of a file: where it lives, what it's called, and
/// its extension. Directory and extension are preserved verbatim across
/// renames; only the base name is ever rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct FileIdentity {
    /// Parent directory, `""` for vault-root files. Always `/`-separated.
    pub directory: String,
    /// Base name without directory or extension.
    pub base_name: String,
    /// Extension including its leading dot, `""` when absent.
    pub extension: String,
}

impl FileIdentity {
    /// Split a path into (directory, base name, extension).
    ///
    /// Dotfiles like `.gitignore` are treated as a base name with no
    /// extension; `note.tar.gz` splits as base `note.tar`, ext `.gz`.
    pub fn from_path(path: &Path) -> Self {
        let directory = path
            .parent()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (base_name, extension) = match file_name.rfind('.') {
            Some(idx) if idx > 0 => (file_name[..idx].to_string(), file_name[idx..].to_string()),
            _ => (file_name, String::new()),
        };

        Self {
            directory,
            base_name,
            extension,
        }
    }

    /// Rebuild the full path for this identity with a replacement base name.
    fn path_with_base(&self, base: &str) -> String {
        if self.directory.is_empty() {
            format!("{base}{}", self.extension)
        } else {
            format!("{}/{base}{}", self.directory, self.extension)
        }
    }
}

/// Outcome of the rename policy for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum RenameDecision {
    /// Name is already a valid slug (or missing) — leave it alone.
    #[serde(rename = "no-rename")]
    NoRenameNeeded,
    /// Name must change; carries the complete target path.
    #[serde(rename = "rename-to")]
    RenameTo { new_path: String },
}

/// Decide whether `identity` needs a slug rename.
///
/// Empty base names are a silent no-op, not an error — transient events
/// for half-created files must not produce noise. Validity is checked
/// before any slug is computed, so already-valid names short-circuit
/// regardless of directory or extension.
pub fn decide_rename(identity: &FileIdentity) -> RenameDecision {
    if identity.base_name.is_empty() {
        return RenameDecision::NoRenameNeeded;
    }
    if is_valid_slug(&identity.base_name) {
        return RenameDecision::NoRenameNeeded;
    }
    let slug = slugify(&identity.base_name);
    RenameDecision::RenameTo {
        new_path: identity.path_with_base(&slug),
    }
}

/// Execute a rename decision against the filesystem.
///
/// Returns the new path when a move actually happened. Failures are
/// surfaced as notices, never propagated — one bad file must not take
/// down the event loop. An empty slug target (name had no representable
/// characters) is refused here rather than silently creating an
/// extensionless dotfile.
pub fn apply_decision(
    current_path: &Path,
    decision: &RenameDecision,
    notices: &dyn NoticeSink,
) -> Option<PathBuf> {
    let RenameDecision::RenameTo { new_path } = decision else {
        return None;
    };

    let target = PathBuf::from(new_path);
    if target == current_path {
        return None;
    }

    // An all-disallowed source name slugifies to "", which would leave the
    // target as a bare extension like ".md". Refuse instead of creating a
    // dotfile the policy would then treat as extensionless.
    let source_slug = slugify(&FileIdentity::from_path(current_path).base_name);
    if source_slug.is_empty() {
        notices.show(&format!(
            "Cannot slugify '{}': name has no representable characters",
            current_path.display()
        ));
        return None;
    }

    match std::fs::rename(current_path, &target) {
        Ok(()) => {
            notices.show("File name slugified");
            Some(target)
        }
        Err(e) => {
            notices.show(&format!("Failed to rename file: {e}"));
            None
        }
    }
}
