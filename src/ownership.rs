//! Ownership-based view-mode arbitration.
//!
//! Notes can declare an `owner` in their front-matter. A note owned by
//! someone other than the local user is presented read-only; everything
//! else (unowned, or owned by the local user) stays editable. The daemon
//! realizes view mode as the file's on-disk readonly flag.
//!
//! Arbitration is deliberately soft: every failure — missing file, stale
//! metadata, permission errors — leaves the note in its prior mode and is
//! logged, never propagated.

use serde::Serialize;
use std::path::Path;

use crate::state::AppState;

/// Delay before arbitrating after a view-change event, so the host's own
/// navigation/write has settled before we read metadata and flip modes.
pub(crate) const ARBITRATION_DELAY_MS: u64 = 200;

/// A note's presentation state. Exactly one of two modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// The default: no ownership metadata, or owned by the local user.
    #[default]
    Editable,
    ReadOnly,
}

/// Outcome of arbitration: the mode the note should be in, and whether
/// that differs from what was observed (callers skip redundant writes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewModeDecision {
    pub target: ViewMode,
    pub changed: bool,
}

/// Core arbitration rule.
///
/// A present, non-empty owner that isn't the current user forces
/// `ReadOnly`; every other combination is `Editable`.
pub fn decide_view_mode(
    owner: Option<&str>,
    current_user: &str,
    observed: ViewMode,
) -> ViewModeDecision {
    let target = match owner {
        Some(o) if !o.is_empty() && o != current_user => ViewMode::ReadOnly,
        _ => ViewMode::Editable,
    };
    ViewModeDecision {
        target,
        changed: observed != target,
    }
}

/// Read a note's current view mode from its readonly flag.
pub fn observed_mode(path: &Path) -> Result<ViewMode, String> {
    let meta = std::fs::metadata(path)
        .map_err(|e| format!("Failed to read metadata for {}: {e}", path.display()))?;
    if meta.permissions().readonly() {
        Ok(ViewMode::ReadOnly)
    } else {
        Ok(ViewMode::Editable)
    }
}

/// Apply a view mode by toggling the readonly flag.
pub fn apply_mode(path: &Path, mode: ViewMode) -> Result<(), String> {
    let meta = std::fs::metadata(path)
        .map_err(|e| format!("Failed to read metadata for {}: {e}", path.display()))?;
    let mut perms = meta.permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(mode == ViewMode::ReadOnly);
    std::fs::set_permissions(path, perms)
        .map_err(|e| format!("Failed to set view mode on {}: {e}", path.display()))
}

/// Arbitrate one note now: read front-matter through the cache, decide,
/// and apply the target mode if it differs from the observed one.
///
/// Returns the decision actually taken, or `None` when the note was not
/// arbitratable (vanished mid-event). Errors applying the mode are logged
/// and the prior mode stands.
pub fn arbitrate_now(state: &AppState, path: &Path) -> Option<ViewModeDecision> {
    // A note that disappeared between the event and the deferred run is
    // not an error — the deferral contract requires a safe no-op.
    let observed = match observed_mode(path) {
        Ok(mode) => mode,
        Err(_) => return None,
    };

    let frontmatter = state.frontmatter.get(path);
    let owner = frontmatter.as_ref().and_then(|fm| fm.owner.as_deref());
    let decision = decide_view_mode(owner, state.current_user(), observed);

    if decision.changed {
        if decision.target == ViewMode::ReadOnly {
            // owner is necessarily present when the target is ReadOnly
            let owner = owner.unwrap_or_default();
            state
                .notices
                .show(&format!("Document owned by '{owner}' - opened in Reading View"));
        }
        if let Err(e) = apply_mode(path, decision.target) {
            eprintln!("[Ownership] {e}");
            return Some(ViewModeDecision {
                target: decision.target,
                changed: false,
            });
        }
    }

    Some(decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;

    #[test]
    fn test_unowned_is_editable() {
        let d = decide_view_mode(None, "alice", ViewMode::Editable);
        assert_eq!(d.target, ViewMode::Editable);
        assert!(!d.changed);
    }

    #[test]
    fn test_empty_owner_is_editable() {
        let d = decide_view_mode(Some(""), "alice", ViewMode::Editable);
        assert_eq!(d.target, ViewMode::Editable);
        assert!(!d.changed);
    }

    #[test]
    fn test_own_note_is_editable() {
        let d = decide_view_mode(Some("alice"), "alice", ViewMode::Editable);
        assert_eq!(d.target, ViewMode::Editable);
        assert!(!d.changed);
    }

    #[test]
    fn test_foreign_owner_forces_readonly() {
        let d = decide_view_mode(Some("alice"), "bob", ViewMode::Editable);
        assert_eq!(d.target, ViewMode::ReadOnly);
        assert!(d.changed);
    }

    #[test]
    fn test_no_change_when_already_in_target_mode() {
        let d = decide_view_mode(Some("alice"), "bob", ViewMode::ReadOnly);
        assert_eq!(d.target, ViewMode::ReadOnly);
        assert!(!d.changed);
    }

    #[test]
    fn test_owner_removal_restores_editable() {
        let d = decide_view_mode(None, "bob", ViewMode::ReadOnly);
        assert_eq!(d.target, ViewMode::Editable);
        assert!(d.changed);
    }

    #[test]
    fn test_apply_and_observe_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("note.md");
        std::fs::write(&path, "x").expect("write");

        assert_eq!(observed_mode(&path).expect("observe"), ViewMode::Editable);
        apply_mode(&path, ViewMode::ReadOnly).expect("apply");
        assert_eq!(observed_mode(&path).expect("observe"), ViewMode::ReadOnly);
        apply_mode(&path, ViewMode::Editable).expect("apply");
        assert_eq!(observed_mode(&path).expect("observe"), ViewMode::Editable);
    }

    #[test]
    fn test_arbitrate_foreign_note_goes_readonly_with_notice() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("note.md");
        std::fs::write(&path, "---\nowner: somebody-else\n---\nbody\n").expect("write");

        let state = AppState::for_tests("bob");
        let decision = arbitrate_now(&state, &path).expect("decision");
        assert_eq!(decision.target, ViewMode::ReadOnly);
        assert!(decision.changed);
        assert_eq!(observed_mode(&path).expect("observe"), ViewMode::ReadOnly);

        let messages = state.test_notices();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("owned by 'somebody-else'"));
        assert!(messages[0].contains("Reading View"));
    }

    #[test]
    fn test_arbitrate_own_note_stays_editable_silently() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("note.md");
        std::fs::write(&path, "---\nowner: bob\n---\nbody\n").expect("write");

        let state = AppState::for_tests("bob");
        let decision = arbitrate_now(&state, &path).expect("decision");
        assert_eq!(decision.target, ViewMode::Editable);
        assert!(!decision.changed);
        assert!(state.test_notices().is_empty());
    }

    #[test]
    fn test_arbitrate_missing_file_is_safe_noop() {
        let state = AppState::for_tests("bob");
        assert!(arbitrate_now(&state, Path::new("/nonexistent/gone.md")).is_none());
        assert!(state.test_notices().is_empty());
    }

    #[test]
    fn test_arbitrate_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("note.md");
        std::fs::write(&path, "---\nowner: somebody-else\n---\n").expect("write");

        let state = AppState::for_tests("bob");
        let first = arbitrate_now(&state, &path).expect("decision");
        assert!(first.changed);
        let second = arbitrate_now(&state, &path).expect("decision");
        assert!(!second.changed, "second pass must observe the target mode");
        // Only the first transition notifies.
        assert_eq!(state.test_notices().len(), 1);
    }
}
