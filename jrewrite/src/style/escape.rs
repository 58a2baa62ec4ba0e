//! Quoting and escaping for string and character literals.

use std::fmt::Write as _;

/// Escapes one character for use inside a literal delimited by `quote`.
fn push_escaped(out: &mut String, c: char, quote: char) {
    match c {
        '\u{8}' => out.push_str("\\b"),
        '\t' => out.push_str("\\t"),
        '\n' => out.push_str("\\n"),
        '\u{c}' => out.push_str("\\f"),
        '\r' => out.push_str("\\r"),
        '\\' => out.push_str("\\\\"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c if c.is_control() => {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{unit:04x}");
            }
        }
        c => out.push(c),
    }
}

/// Escapes `text` for a double-quoted string literal, without the quotes.
#[must_use]
pub fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        push_escaped(&mut out, c, '"');
    }
    out
}

/// `text` as a double-quoted string literal.
#[must_use]
pub fn quote_string(text: &str) -> String {
    format!("\"{}\"", escape_string(text))
}

/// `c` as a single-quoted character literal. NUL becomes `'\0'`.
#[must_use]
pub fn quote_char(c: char) -> String {
    if c == '\0' {
        return "'\\0'".to_owned();
    }
    let mut out = String::from("'");
    push_escaped(&mut out, c, '\'');
    out.push('\'');
    out
}

/// `text` as a text block. Only backslashes and triple quotes need escaping.
#[must_use]
pub fn quote_text_block(text: &str) -> String {
    let body = text.replace('\\', "\\\\").replace("\"\"\"", "\\\"\"\"");
    format!("\"\"\"\n{body}\"\"\"")
}

/// Resolves the escapes of a literal body back to text.
///
/// Unknown escapes are kept as written.
#[must_use]
pub fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('b') => out.push('\u{8}'),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('f') => out.push('\u{c}'),
            Some('r') => out.push('\r'),
            Some('s') => out.push(' '),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('\n') => {}
            Some('u') => {
                while chars.peek() == Some(&'u') {
                    chars.next();
                }
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(d @ '0'..='7') => {
                let mut value = d.to_digit(8).unwrap_or(0);
                let max_digits = if d <= '3' { 2 } else { 1 };
                for _ in 0..max_digits {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(next) => {
                            value = value * 8 + next;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or('\0'));
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_string() {
        assert_eq!(quote_string("a\"b\n"), "\"a\\\"b\\n\"");
        assert_eq!(quote_string("it's"), "\"it's\"");
        assert_eq!(quote_string("\u{1}"), "\"\\u0001\"");
    }

    #[test]
    fn test_quote_char() {
        assert_eq!(quote_char('\''), "'\\''");
        assert_eq!(quote_char('"'), "'\"'");
        assert_eq!(quote_char('\0'), "'\\0'");
        assert_eq!(quote_char('x'), "'x'");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("a\\tb"), "a\tb");
        assert_eq!(unescape("\\u0041\\101"), "AA");
        assert_eq!(unescape("\\0"), "\0");
        assert_eq!(unescape("\\q"), "\\q");
    }

    #[test]
    fn test_text_block() {
        assert_eq!(quote_text_block("x\n"), "\"\"\"\nx\n\"\"\"");
    }
}
