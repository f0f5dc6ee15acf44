use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// First `max_chars` characters of `s`, with no ellipsis.
pub fn preview(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{value:5.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate_unicode("abcdef", 4), "abc\u{2026}");
        assert_eq!(truncate_unicode("abc", 4), "abc");
    }

    #[test]
    fn preview_is_char_bounded() {
        assert_eq!(preview("héllo world", 5), "héllo");
        assert_eq!(preview("short", 200), "short");
        assert_eq!(preview("", 3), "");
    }

    #[test]
    fn percent_is_padded() {
        assert_eq!(format_percent(7.3), "  7.3%");
        assert_eq!(format_percent(100.0), "100.0%");
    }
}
