//! Terminal display width helpers.
//!
//! Zone content may carry color escapes (the input echo) or double-width
//! fill glyphs, so padding has to measure what the terminal will show, not
//! byte or char counts.

/// Display width of `text` with ANSI escapes stripped first.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    unicode_width::UnicodeWidthStr::width(String::from_utf8_lossy(&clean).as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_do_not_count_toward_width() {
        assert_eq!(display_width("plain"), 5);
        assert_eq!(display_width("\x1b[32mplain\x1b[0m"), 5);
    }

    #[test]
    fn wide_glyphs_count_double() {
        assert_eq!(display_width("中"), 2);
    }
}
