//! Vault explorer listing with per-segment filename coloring.
//!
//! Multi-segment names (`plan.q3.draft.md`) are split on `.` and each
//! segment gets a color class by position; separators stay default. The
//! split is cosmetic only — it never feeds back into rename decisions.

use std::path::Path;

use crate::ownership::{ViewMode, observed_mode};

/// Color class assigned to a rendered span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentColor {
    Default,
    AccentA,
    AccentB,
    AccentC,
}

/// One piece of a displayed filename.
#[derive(Debug, Clone, PartialEq)]
pub struct ColoredSpan {
    pub text: String,
    pub color: SegmentColor,
}

fn span(text: &str, color: SegmentColor) -> ColoredSpan {
    ColoredSpan {
        text: text.to_string(),
        color,
    }
}

/// Positional color rule: segment 0 → accent-A, 1 → default,
/// 2 → accent-B, 3+ → accent-C.
fn color_for_position(index: usize) -> SegmentColor {
    match index {
        0 => SegmentColor::AccentA,
        1 => SegmentColor::Default,
        2 => SegmentColor::AccentB,
        _ => SegmentColor::AccentC,
    }
}

/// Split a displayed name into colored spans.
///
/// Names without a `.` are left as a single default span — single-segment
/// names get no colorization at all.
pub fn colorize_name(name: &str) -> Vec<ColoredSpan> {
    if !name.contains('.') {
        return vec![span(name, SegmentColor::Default)];
    }

    let mut spans = Vec::new();
    for (i, segment) in name.split('.').enumerate() {
        if i > 0 {
            spans.push(span(".", SegmentColor::Default));
        }
        spans.push(span(segment, color_for_position(i)));
    }
    spans
}

fn ansi_code(color: SegmentColor) -> &'static str {
    match color {
        SegmentColor::Default => "",
        SegmentColor::AccentA => "\x1b[36m",
        SegmentColor::AccentB => "\x1b[33m",
        SegmentColor::AccentC => "\x1b[35m",
    }
}

/// Render spans as an ANSI-colored terminal string.
pub fn render_spans(spans: &[ColoredSpan]) -> String {
    let mut out = String::new();
    for s in spans {
        let code = ansi_code(s.color);
        if code.is_empty() {
            out.push_str(&s.text);
        } else {
            out.push_str(code);
            out.push_str(&s.text);
            out.push_str("\x1b[0m");
        }
    }
    out
}

/// Render the vault tree as an indented, colorized listing.
///
/// Entries are sorted by name, hidden entries are skipped, directories
/// recurse, and read-only notes carry a `[read-only]` marker.
pub fn render_listing(vault: &Path) -> Result<String, String> {
    let mut out = String::new();
    render_dir(vault, 0, &mut out)?;
    Ok(out)
}

fn render_dir(dir: &Path, depth: usize, out: &mut String) -> Result<(), String> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read {}: {e}", dir.display()))?
        .filter_map(|e| e.ok())
        .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        let indent = "  ".repeat(depth);

        if path.is_dir() {
            out.push_str(&format!("{indent}{name}/\n"));
            render_dir(&path, depth + 1, out)?;
        } else {
            let rendered = render_spans(&colorize_name(&name));
            let marker = match observed_mode(&path) {
                Ok(ViewMode::ReadOnly) => " [read-only]",
                _ => "",
            };
            out.push_str(&format!("{indent}{rendered}{marker}\n"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_segment_is_plain() {
        let spans = colorize_name("README");
        assert_eq!(spans, vec![span("README", SegmentColor::Default)]);
    }

    #[test]
    fn test_two_segments() {
        let spans = colorize_name("note.md");
        assert_eq!(
            spans,
            vec![
                span("note", SegmentColor::AccentA),
                span(".", SegmentColor::Default),
                span("md", SegmentColor::Default),
            ]
        );
    }

    #[test]
    fn test_positional_colors_deep_name() {
        let spans = colorize_name("plan.q3.draft.v2.md");
        let colors: Vec<SegmentColor> = spans
            .iter()
            .filter(|s| s.text != ".")
            .map(|s| s.color)
            .collect();
        assert_eq!(
            colors,
            vec![
                SegmentColor::AccentA,
                SegmentColor::Default,
                SegmentColor::AccentB,
                SegmentColor::AccentC,
                SegmentColor::AccentC,
            ]
        );
        // Separators stay default
        assert!(
            spans
                .iter()
                .filter(|s| s.text == ".")
                .all(|s| s.color == SegmentColor::Default)
        );
    }

    #[test]
    fn test_render_spans_wraps_accents_only() {
        let rendered = render_spans(&colorize_name("note.md"));
        assert_eq!(rendered, "\x1b[36mnote\x1b[0m.md");
    }

    #[test]
    fn test_listing_marks_readonly_and_skips_hidden() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("sub")).expect("mkdir");
        std::fs::write(dir.path().join("sub/inner.md"), "x").expect("write");
        std::fs::write(dir.path().join("guarded.md"), "x").expect("write");
        std::fs::write(dir.path().join(".hidden.md"), "x").expect("write");
        crate::ownership::apply_mode(&dir.path().join("guarded.md"), ViewMode::ReadOnly)
            .expect("apply");

        let listing = render_listing(dir.path()).expect("listing");
        assert!(listing.contains("guarded"));
        assert!(listing.contains("[read-only]"));
        assert!(listing.contains("sub/"));
        assert!(listing.contains("  \x1b[36minner\x1b[0m.md"));
        assert!(!listing.contains("hidden"));

        // Restore so the tempdir can be cleaned up on all platforms.
        crate::ownership::apply_mode(&dir.path().join("guarded.md"), ViewMode::Editable)
            .expect("restore");
    }
}
