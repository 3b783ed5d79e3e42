//! Caption and prompt formatting helpers.

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Strip markdown decoration the AI tends to emit despite being asked not to.
///
/// Captions go out in Telegram HTML mode, so stray `*`/`_`/`#`/backticks
/// would show up literally.
pub fn strip_markdown(text: &str) -> String {
    text.replace("**", "")
        .replace('*', "")
        .replace('`', "")
        .replace('_', "")
        .replace('#', "")
}

/// `$123.45`, or `N/A` when the provider omitted the field.
pub fn format_money(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("${v:.2}"),
        None => "N/A".to_string(),
    }
}

/// Bare two-decimal ratio, or `N/A`.
pub fn format_ratio(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}"),
        None => "N/A".to_string(),
    }
}

/// Integer count with thousands separators, or `N/A`.
pub fn format_count(v: Option<u64>) -> String {
    match v {
        Some(v) => group_thousands(v),
        None => "N/A".to_string(),
    }
}

/// Humanized market cap: `$2.95T`, `$184.20B`, `$55.10M`, plain dollars below
/// a million.
pub fn format_market_cap(v: Option<f64>) -> String {
    const TRILLION: f64 = 1_000_000_000_000.0;
    const BILLION: f64 = 1_000_000_000.0;
    const MILLION: f64 = 1_000_000.0;

    let Some(v) = v else {
        return "N/A".to_string();
    };
    if v >= TRILLION {
        return format!("${:.2}T", v / TRILLION);
    }
    if v >= BILLION {
        return format!("${:.2}B", v / BILLION);
    }
    if v >= MILLION {
        return format!("${:.2}M", v / MILLION);
    }
    format!("${v:.0}")
}

fn group_thousands(v: u64) -> String {
    let digits = v.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Truncate to at most `max` characters, appending `...` when cut.
///
/// Counts chars, not bytes, so multi-byte text never splits mid-character.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html() {
        let s = r#"<a href="x&y">"#;
        assert_eq!(escape_html(s), "&lt;a href=&quot;x&amp;y&quot;&gt;");
    }

    #[test]
    fn strips_markdown_decoration() {
        let s = "**Bold** and *em* with `code`, head_er # end";
        assert_eq!(strip_markdown(s), "Bold and em with code, header  end");
    }

    #[test]
    fn formats_optional_money() {
        assert_eq!(format_money(Some(189.456)), "$189.46");
        assert_eq!(format_money(None), "N/A");
    }

    #[test]
    fn humanizes_market_cap() {
        assert_eq!(format_market_cap(Some(2.95e12)), "$2.95T");
        assert_eq!(format_market_cap(Some(184.2e9)), "$184.20B");
        assert_eq!(format_market_cap(Some(55.1e6)), "$55.10M");
        assert_eq!(format_market_cap(Some(950_000.0)), "$950000");
        assert_eq!(format_market_cap(None), "N/A");
    }

    #[test]
    fn groups_thousands_in_counts() {
        assert_eq!(format_count(Some(999)), "999");
        assert_eq!(format_count(Some(1_000)), "1,000");
        assert_eq!(format_count(Some(48_211_904)), "48,211,904");
        assert_eq!(format_count(None), "N/A");
    }

    #[test]
    fn truncates_by_chars_not_bytes() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdefghij", 8), "abcde...");
        // Multi-byte: must not panic or split a char.
        let s = "📊".repeat(10);
        let out = truncate_chars(&s, 6);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 6);
    }
}
