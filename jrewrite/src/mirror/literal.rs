//! Literal token decoding.

use crate::style::unescape;
use crate::tree::{LiteralValue, TreeKind};

/// Decodes a literal token of grammar kind `kind` into its literal kind and
/// value. The value is `None` when the token does not decode.
pub(super) fn decode(kind: &str, text: &str) -> (TreeKind, Option<LiteralValue>) {
    match kind {
        "true" => (TreeKind::BooleanLiteral, Some(LiteralValue::Boolean(true))),
        "false" => (TreeKind::BooleanLiteral, Some(LiteralValue::Boolean(false))),
        "null_literal" => (TreeKind::NullLiteral, None),
        "character_literal" => {
            let value = strip_delimiters(text, "'")
                .and_then(|body| unescape(body).chars().next())
                .map(LiteralValue::Char);
            (TreeKind::CharLiteral, value)
        }
        "string_literal" => {
            let value =
                strip_delimiters(text, "\"").map(|body| LiteralValue::String(unescape(body)));
            (TreeKind::StringLiteral, value)
        }
        "text_block" => (
            TreeKind::TextBlock,
            text_block_content(text).map(LiteralValue::String),
        ),
        "decimal_floating_point_literal" | "hex_floating_point_literal" => decode_float(text),
        _ => decode_integer(text),
    }
}

fn strip_delimiters<'a>(text: &'a str, delimiter: &str) -> Option<&'a str> {
    text.strip_prefix(delimiter)?.strip_suffix(delimiter)
}

#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
fn decode_integer(text: &str) -> (TreeKind, Option<LiteralValue>) {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let (digits, long) = match cleaned.strip_suffix(|c: char| matches!(c, 'l' | 'L')) {
        Some(digits) => (digits, true),
        None => (cleaned.as_str(), false),
    };
    let (radix, body) = if let Some(rest) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, rest)
    } else if let Some(rest) = digits
        .strip_prefix("0b")
        .or_else(|| digits.strip_prefix("0B"))
    {
        (2, rest)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };
    let value = u64::from_str_radix(body, radix).ok();
    if long {
        (TreeKind::LongLiteral, value.map(|v| LiteralValue::Long(v as i64)))
    } else {
        // Hex, octal and binary int literals may use the sign bit.
        let value = value
            .and_then(|v| u32::try_from(v).ok())
            .map(|v| LiteralValue::Int(v as i32));
        (TreeKind::IntLiteral, value)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn decode_float(text: &str) -> (TreeKind, Option<LiteralValue>) {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let (body, kind) = match cleaned.chars().last() {
        Some('f' | 'F') => (&cleaned[..cleaned.len() - 1], TreeKind::FloatLiteral),
        Some('d' | 'D') => (&cleaned[..cleaned.len() - 1], TreeKind::DoubleLiteral),
        _ => (cleaned.as_str(), TreeKind::DoubleLiteral),
    };
    let hex = body.starts_with("0x") || body.starts_with("0X");
    let value = match kind {
        TreeKind::FloatLiteral if hex => hex_float(body).map(|v| LiteralValue::Float(v as f32)),
        TreeKind::FloatLiteral => body.parse::<f32>().ok().map(LiteralValue::Float),
        _ if hex => hex_float(body).map(LiteralValue::Double),
        _ => body.parse::<f64>().ok().map(LiteralValue::Double),
    };
    (kind, value)
}

/// Value of a hexadecimal floating-point literal such as `0x1.8p1`.
fn hex_float(body: &str) -> Option<f64> {
    let body = body.get(2..)?;
    let (mantissa, exponent) = body.split_once(['p', 'P'])?;
    let exponent: i32 = exponent.parse().ok()?;
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let mut value = 0f64;
    for digit in whole.chars() {
        value = value * 16.0 + f64::from(digit.to_digit(16)?);
    }
    let mut scale = 1.0 / 16.0;
    for digit in fraction.chars() {
        value += f64::from(digit.to_digit(16)?) * scale;
        scale /= 16.0;
    }
    Some(value * 2f64.powi(exponent))
}

/// Content of a text block: the opening line is dropped, the common
/// indentation and trailing spaces are stripped and escapes are resolved.
fn text_block_content(text: &str) -> Option<String> {
    let inner = strip_delimiters(text, "\"\"\"")?;
    let (_, rest) = inner.split_once('\n')?;
    let lines: Vec<&str> = rest.split('\n').collect();
    let last = lines.len() - 1;
    let closing_on_own_line = lines[last].trim().is_empty();

    let indent = lines
        .iter()
        .enumerate()
        .filter(|(i, line)| !line.trim().is_empty() || (*i == last && closing_on_own_line))
        .map(|(_, line)| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i == last && closing_on_own_line {
            break;
        }
        let stripped = line.get(indent..).unwrap_or("").trim_end();
        out.push_str(stripped);
        if i != last {
            out.push('\n');
        }
    }
    Some(unescape(&out))
}
