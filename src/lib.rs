//! notewarden — vault companion that normalizes note filenames and
//! guards owned notes.
//!
//! Three concerns, all driven by vault file events:
//! - slug normalization of note names (rename policy),
//! - ownership-based view-mode arbitration from front-matter,
//! - a colorized explorer listing.

pub mod app_logger;
pub mod config;
pub mod explorer;
pub mod frontmatter;
pub mod identity;
pub mod notice;
pub mod ownership;
pub mod rename;
pub mod slug;
pub mod state;
pub mod vault_watcher;

use std::path::Path;
use std::sync::Arc;

use crate::notice::StderrNotices;
use crate::state::AppState;

const USAGE: &str = "Usage: notewarden <command> [args]

Commands:
  scan <vault>              Normalize every note name and apply ownership guards once
  watch <vault>             Watch the vault and run the pipeline on changes
  list <vault>              Print the colorized explorer listing
  config get <key>          Print a settings value
  config set <key> <value>  Update and persist a settings value
";

fn new_state() -> Arc<AppState> {
    Arc::new(AppState::new(
        config::load_settings(),
        Arc::new(StderrNotices),
    ))
}

fn cmd_scan(vault: &Path) -> Result<(), String> {
    let state = new_state();
    let summary = vault_watcher::scan_vault(&state, vault)?;
    println!(
        "Scanned {} notes: {} renamed, {} read-only",
        summary.notes_seen, summary.renamed, summary.read_only
    );
    Ok(())
}

async fn cmd_watch(vault: &Path) -> Result<(), String> {
    let state = new_state();
    eprintln!(
        "[Watcher] Watching {} as user \"{}\"",
        vault.display(),
        state.current_user()
    );
    vault_watcher::start_watching(state.clone(), vault, true)?;

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to wait for shutdown signal: {e}"))?;

    vault_watcher::stop_watching(&state);
    eprintln!("[Watcher] Shut down");
    Ok(())
}

fn cmd_list(vault: &Path) -> Result<(), String> {
    let listing = explorer::render_listing(vault)?;
    print!("{listing}");
    Ok(())
}

fn cmd_config(args: &[String]) -> Result<(), String> {
    match args {
        [action, key] if action == "get" => {
            let settings = config::load_settings();
            match key.as_str() {
                "finalizer" => {
                    println!("{}", settings.finalizer);
                    Ok(())
                }
                other => Err(format!("Unknown settings key: {other}")),
            }
        }
        [action, key, value] if action == "set" => {
            let mut settings = config::load_settings();
            match key.as_str() {
                "finalizer" => settings.finalizer = value.clone(),
                other => return Err(format!("Unknown settings key: {other}")),
            }
            config::save_settings(&settings)
        }
        _ => Err(USAGE.to_string()),
    }
}

/// Binary entry point. Returns an error string suitable for stderr.
pub fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.split_first() {
        Some((cmd, rest)) => match (cmd.as_str(), rest) {
            ("scan", [vault]) => cmd_scan(Path::new(vault)),
            ("list", [vault]) => cmd_list(Path::new(vault)),
            ("watch", [vault]) => {
                let rt = tokio::runtime::Runtime::new()
                    .map_err(|e| format!("Failed to start runtime: {e}"))?;
                rt.block_on(cmd_watch(Path::new(vault)))
            }
            ("config", rest) => cmd_config(rest),
            _ => Err(USAGE.to_string()),
        },
        None => Err(USAGE.to_string()),
    }
}
