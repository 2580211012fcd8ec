//! Local acting-user resolution.
//!
//! The username is probed once from the operating environment and cached
//! for the process lifetime — ownership arbitration compares against a
//! stable identity, not whatever the environment reports mid-run.

use std::sync::OnceLock;

/// Sentinel identity when the environment lookup yields nothing usable.
pub const UNKNOWN_USER: &str = "unknown";

/// Resolve the local username, cached on first call.
///
/// `whoami` itself doesn't fail, but container and CI environments can
/// report an empty or placeholder name; those fall back to the sentinel
/// so ownership checks stay well-defined.
pub fn current_username() -> &'static str {
    static USERNAME: OnceLock<String> = OnceLock::new();
    USERNAME.get_or_init(|| {
        let name = whoami::username();
        if name.trim().is_empty() {
            eprintln!("[Identity] Could not resolve local username, using \"{UNKNOWN_USER}\"");
            UNKNOWN_USER.to_string()
        } else {
            name
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_is_nonempty_and_stable() {
        let first = current_username();
        assert!(!first.is_empty());
        assert_eq!(current_username(), first);
    }
}
