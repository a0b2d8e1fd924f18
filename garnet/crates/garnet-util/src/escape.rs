//! Host string quoting.
//!
//! Renders a string the way `String#inspect` does: wrapped in double quotes,
//! with quotes, backslashes, interpolation openers and non-printable
//! characters escaped. Printable non-ASCII characters are kept as-is.

use std::fmt::Write;

/// Quote `text` using the runtime's string-inspect convention.
///
/// # Examples
///
/// ```
/// use garnet_util::escape::quote;
///
/// assert_eq!(quote("foo bar"), "\"foo bar\"");
/// assert_eq!(quote("a\"b"), "\"a\\\"b\"");
/// assert_eq!(quote("#{x}"), "\"\\#{x}\"");
/// ```
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '#' => {
                if matches!(chars.peek(), Some('{' | '$' | '@')) {
                    out.push('\\');
                }
                out.push('#');
            }
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{0C}' => out.push_str("\\f"),
            '\u{0B}' => out.push_str("\\v"),
            '\u{08}' => out.push_str("\\b"),
            '\u{07}' => out.push_str("\\a"),
            '\u{1B}' => out.push_str("\\e"),
            c if c.is_control() => {
                // writing into a String cannot fail
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain() {
        assert_eq!(quote("hello"), "\"hello\"");
        assert_eq!(quote(""), "\"\"");
    }

    #[test]
    fn test_named_escapes() {
        assert_eq!(quote("a\nb\tc"), "\"a\\nb\\tc\"");
        assert_eq!(quote("\u{1B}[0m"), "\"\\e[0m\"");
        assert_eq!(quote("\u{07}\u{08}"), "\"\\a\\b\"");
    }

    #[test]
    fn test_control_characters_use_unicode_escape() {
        assert_eq!(quote("\u{01}"), "\"\\u0001\"");
        assert_eq!(quote("\u{7F}"), "\"\\u007F\"");
    }

    #[test]
    fn test_hash_only_escaped_before_interpolation() {
        assert_eq!(quote("#a"), "\"#a\"");
        assert_eq!(quote("#$x #@y"), "\"\\#$x \\#@y\"");
        assert_eq!(quote("#"), "\"#\"");
    }

    #[test]
    fn test_non_ascii_kept() {
        assert_eq!(quote("été"), "\"été\"");
        assert_eq!(quote("🦀"), "\"🦀\"");
    }
}
