//! Text utilities: escaping, entity decoding, JSX whitespace and JS literals

use crate::constants::{HTML_ENTITIES, UNITLESS_STYLES};

/// Escape text content. Only `&` and `<` can change how markup parses.
pub fn escape_content(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape a double-quoted attribute value
pub fn escape_attribute(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Inverse of [`escape_content`] and [`escape_attribute`]. Any other
/// reference is left untouched.
pub fn unescape_minimal(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        result.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let (decoded, len) = if rest.starts_with("&amp;") {
            ('&', 5)
        } else if rest.starts_with("&lt;") {
            ('<', 4)
        } else if rest.starts_with("&quot;") {
            ('"', 6)
        } else {
            ('&', 1)
        };
        result.push(decoded);
        rest = &rest[len..];
    }
    result.push_str(rest);
    result
}

/// Decode HTML character references in JSX text and attribute strings
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        result.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match rest.find(';').and_then(|end| decode_reference(&rest[1..end]).map(|c| (c, end))) {
            Some((c, end)) => {
                result.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                result.push('&');
                rest = &rest[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = name.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }
    HTML_ENTITIES.get(name).copied()
}

/// Apply JSX whitespace rules to a text child.
///
/// - Text on a single line is kept as written
/// - Lines are trimmed where they meet a line break
/// - Lines that end up empty are dropped and the rest joined by one space
pub fn trim_jsx_text(text: &str) -> String {
    if !text.contains('\n') {
        return text.to_string();
    }
    let lines: Vec<&str> = text.lines().collect();
    let last = lines.len().saturating_sub(1);
    let mut parts = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let mut line = *line;
        if index > 0 {
            line = line.trim_start();
        }
        if index < last {
            line = line.trim_end();
        }
        if !line.is_empty() {
            parts.push(line);
        }
    }
    // `lines()` drops a trailing line break, which still ends the last line
    if text.ends_with('\n') {
        if let Some(last_part) = parts.last_mut() {
            *last_part = last_part.trim_end();
        }
        parts.retain(|p| !p.is_empty());
    }
    parts.join(" ")
}

/// Quote a string as a JavaScript string literal
pub fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Convert event name from JSX format (`onClick`) to DOM format (`click`)
pub fn to_event_name(name: &str) -> Option<String> {
    let event = name.strip_prefix("on")?;
    let first = event.chars().next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    Some(event.to_ascii_lowercase())
}

/// Convert camelCase to kebab-case. Custom properties pass through.
pub fn camel_to_kebab(s: &str) -> String {
    if s.starts_with("--") {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                result.push('-');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Render a numeric style value, adding `px` where CSS expects a length
pub fn style_number(property: &str, value: f64) -> String {
    if value == 0.0 || property.starts_with("--") || UNITLESS_STYLES.contains(property) {
        format_number(value)
    } else {
        format!("{}px", format_number(value))
    }
}

/// Format a number the way JavaScript stringifies it for common values
pub fn format_number(value: f64) -> String {
    if !value.is_finite() || value.fract() != 0.0 {
        return format!("{value}");
    }
    if value.abs() < 9.007e15 {
        // Exact as an integer, and `-0` prints as `0`
        format!("{}", value as i64)
    } else if value.abs() < 1e21 {
        format!("{value:.0}")
    } else {
        format!("{value:e}").replacen('e', "e+", 1)
    }
}
