//! Shared utility functions

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Fit `s` into `max_width` display columns, ending in `…` when cut.
///
/// Widths are measured in terminal columns, so emoji and CJK count double.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    // Leave one column for the ellipsis
    let target = max_width - 1;
    let mut width = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > target {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorter_than_max_is_unchanged() {
        assert_eq!(truncate_to_width("LM317", 10), "LM317");
        assert_eq!(truncate_to_width("LM317", 5), "LM317");
    }

    #[test]
    fn test_cut_ends_with_ellipsis() {
        assert_eq!(truncate_to_width("Place input capacitor", 8), "Place i…");
    }

    #[test]
    fn test_wide_chars_count_double() {
        // "🔴" is two columns wide
        assert_eq!(truncate_to_width("🔴 Essential", 4), "🔴 …");
        assert_eq!(truncate_to_width("日本語", 4), "日…");
    }

    #[test]
    fn test_zero_width() {
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
