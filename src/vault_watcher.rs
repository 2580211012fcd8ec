//! Debounced vault watcher and the one-shot vault scan.
//!
//! Every debounced event on a note file runs the same pipeline the host
//! plugin ran on rename and modify notifications: the rename policy first,
//! then deferred ownership arbitration for the file the note ended up at.

use notify::RecursiveMode;
use notify_debouncer_mini::{DebouncedEventKind, new_debouncer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::ownership;
use crate::rename::{FileIdentity, apply_decision, decide_rename};
use crate::state::AppState;

/// Debounce interval — editors write notes in bursts (swap file, content,
/// metadata), and we want one decision per burst.
const DEBOUNCE_MS: u64 = 300;

/// Note extensions the pipeline applies to. Everything else in the vault
/// (attachments, images) is left alone.
pub(crate) fn is_note_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md") | Some("markdown")
    )
}

/// Run the rename policy for one note and return the path it lives at
/// afterwards. The cache entry for a moved note is dropped so arbitration
/// reads fresh metadata at the new path.
pub(crate) fn normalize_note(state: &AppState, path: &Path) -> PathBuf {
    let identity = FileIdentity::from_path(path);
    let decision = decide_rename(&identity);
    match apply_decision(path, &decision, state.notices.as_ref()) {
        Some(new_path) => {
            state.frontmatter.invalidate(path);
            state.log(
                "info",
                "rename",
                format!("{} -> {}", path.display(), new_path.display()),
            );
            new_path
        }
        None => path.to_path_buf(),
    }
}

/// Handle one debounced vault event: normalize the name, then schedule
/// the deferred view-mode arbitration.
fn handle_vault_event(state: &Arc<AppState>, rt: &tokio::runtime::Handle, path: &Path) {
    if !is_note_path(path) {
        return;
    }
    let settled = normalize_note(state, path);
    if settled.exists() {
        let state = state.clone();
        rt.spawn(async move {
            tokio::time::sleep(Duration::from_millis(ownership::ARBITRATION_DELAY_MS)).await;
            ownership::arbitrate_now(&state, &settled);
        });
    }
}

/// Start watching a vault directory.
///
/// At most one watcher exists per process; a second start is a no-op.
/// Must be called from within a tokio runtime (arbitration tasks are
/// spawned onto it). When `echo_listing` is set, the refreshed explorer
/// listing is printed after each event batch.
pub fn start_watching(
    state: Arc<AppState>,
    vault: &Path,
    echo_listing: bool,
) -> Result<(), String> {
    let mut slot = state.vault_watcher.lock();
    if slot.is_some() {
        return Ok(());
    }

    if !vault.is_dir() {
        return Err(format!("Vault path is not a directory: {}", vault.display()));
    }

    let rt = tokio::runtime::Handle::current();
    let vault_owned = vault.to_path_buf();
    let callback_state = state.clone();

    let mut debouncer = new_debouncer(
        Duration::from_millis(DEBOUNCE_MS),
        move |events: Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>| {
            let Ok(events) = events else { return };

            let mut touched = false;
            for event in &events {
                if !matches!(event.kind, DebouncedEventKind::Any) {
                    continue;
                }
                handle_vault_event(&callback_state, &rt, &event.path);
                touched = true;
            }

            if touched && echo_listing {
                match crate::explorer::render_listing(&vault_owned) {
                    Ok(listing) => println!("{listing}"),
                    Err(e) => eprintln!("[Watcher] {e}"),
                }
            }
        },
    )
    .map_err(|e| format!("Failed to create vault watcher: {e}"))?;

    debouncer
        .watcher()
        .watch(vault, RecursiveMode::Recursive)
        .map_err(|e| format!("Failed to watch {}: {e}", vault.display()))?;

    state.log("info", "watcher", format!("watching {}", vault.display()));
    *slot = Some(debouncer);
    Ok(())
}

/// Stop the vault watcher. Dropping the debouncer stops it.
pub fn stop_watching(state: &AppState) {
    if state.vault_watcher.lock().take().is_some() {
        state.log("info", "watcher", "stopped");
    }
}

/// Result of a one-shot vault scan.
#[derive(Debug, Default, PartialEq)]
pub struct ScanSummary {
    pub notes_seen: usize,
    pub renamed: usize,
    pub read_only: usize,
}

/// Walk the vault once, applying the rename policy and immediate
/// ownership arbitration to every note. Hidden entries are skipped.
pub fn scan_vault(state: &AppState, vault: &Path) -> Result<ScanSummary, String> {
    let mut summary = ScanSummary::default();
    scan_dir(state, vault, &mut summary)?;
    state.log(
        "info",
        "scan",
        format!(
            "{} notes, {} renamed, {} read-only",
            summary.notes_seen, summary.renamed, summary.read_only
        ),
    );
    Ok(summary)
}

fn scan_dir(state: &AppState, dir: &Path, summary: &mut ScanSummary) -> Result<(), String> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read {}: {e}", dir.display()))?
        .filter_map(|e| e.ok())
        .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            scan_dir(state, &path, summary)?;
            continue;
        }
        if !is_note_path(&path) {
            continue;
        }

        summary.notes_seen += 1;
        let settled = normalize_note(state, &path);
        if settled != path {
            summary.renamed += 1;
        }
        if let Some(decision) = ownership::arbitrate_now(state, &settled)
            && decision.target == ownership::ViewMode::ReadOnly
        {
            summary.read_only += 1;
        }
    }
    Ok(())
}
