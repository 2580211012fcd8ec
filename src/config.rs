//! Settings persistence.
//!
//! One flat JSON object in the platform config directory. Loads merge
//! over defaults (missing fields keep their default), every edit is
//! saved immediately, and saves are atomic (temp file + rename) with
//! owner-only permissions on Unix.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::PathBuf;

pub(crate) const SETTINGS_FILE: &str = "settings.json";

/// Config directory using the platform-appropriate location.
///
/// - macOS: `~/Library/Application Support/notewarden/`
/// - Linux: `~/.config/notewarden/` (or `$XDG_CONFIG_HOME`)
/// - Windows: `%APPDATA%/notewarden/`
///
/// Falls back to `~/.notewarden/` if the platform dir is unavailable.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("notewarden"))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".notewarden")
        })
}

/// Durable plugin settings. A single flat object; new fields must carry
/// serde defaults so old settings files keep loading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// User-supplied finalizer expression. Stored and editable but
    /// deliberately not consumed by the slug pipeline — reserved for a
    /// future post-processing step.
    #[serde(default = "default_finalizer")]
    pub finalizer: String,
}

fn default_finalizer() -> String {
    "default".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            finalizer: default_finalizer(),
        }
    }
}

/// Load a JSON config file, returning Default if missing or corrupt.
/// Logs when the file exists but cannot be read or parsed, so corrupt
/// files are visible instead of silently resetting state.
pub(crate) fn load_json_config<T: DeserializeOwned + Default>(filename: &str) -> T {
    let path = config_dir().join(filename);
    if !path.exists() {
        return T::default();
    }
    let content = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("[Config] Could not read {}: {e}", path.display());
            return T::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("[Config] Corrupt file {}: {e}. Using defaults.", path.display());
            T::default()
        }
    }
}

/// Save a JSON config file atomically (temp file + rename).
/// Sets 0600 permissions on Unix before the rename lands.
pub(crate) fn save_json_config<T: Serialize>(filename: &str, config: &T) -> Result<(), String> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config directory: {e}"))?;

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {e}"))?;

    let target = dir.join(filename);
    let temp = dir.join(format!("{}.tmp.{}", filename, std::process::id()));

    std::fs::write(&temp, &json).map_err(|e| format!("Failed to write temp config: {e}"))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&temp, perms)
            .map_err(|e| format!("Failed to set config permissions: {e}"))?;
    }

    // Atomic rename: either the old file or the new file exists, never partial
    std::fs::rename(&temp, &target).map_err(|e| {
        let _ = std::fs::remove_file(&temp);
        format!("Failed to commit config: {e}")
    })?;

    Ok(())
}

/// Load settings, merged over defaults.
pub fn load_settings() -> Settings {
    load_json_config(SETTINGS_FILE)
}

/// Persist settings. Called on every edit, no batching.
pub fn save_settings(settings: &Settings) -> Result<(), String> {
    save_json_config(SETTINGS_FILE, settings)
}
