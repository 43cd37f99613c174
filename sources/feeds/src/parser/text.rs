//! Text cleanup for scanned element content

use regex::{Captures, Regex};
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]{1,6}|#[0-9]{1,7}|amp|lt|gt|quot|apos|nbsp);").unwrap()
});

/// Remove every `<...>` tag
pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Decode the XML entities plus `&nbsp;` and numeric references, in one pass
///
/// `&amp;lt;` decodes to `&lt;`, not `<`. Unknown entities are left as is.
pub fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => numeric_reference(name),
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn numeric_reference(name: &str) -> Option<char> {
    let digits = name.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}

/// Strip tags, decode entities and trim
///
/// Only raw markup is removed. Escaped markup (`&lt;dialog&gt;`) is text and
/// survives as `<dialog>`.
pub fn clean_text(raw: &str) -> String {
    decode_entities(&strip_tags(raw)).trim().to_string()
}

/// Clean element content that carries an escaped HTML body
///
/// RSS descriptions usually escape their markup, so tags are stripped again
/// after decoding.
pub fn clean_markup(raw: &str) -> String {
    strip_tags(&clean_text(raw)).trim().to_string()
}

/// Keep at most `max` characters
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
