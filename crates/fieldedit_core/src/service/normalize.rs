//! Normalization of raw values captured from an editable container.
//!
//! # Responsibility
//! - Undo the transport encoding and the container's rendering artifacts.
//! - Derive tag tokens from the container's HTML.
//!
//! # Invariants
//! - Every step is total: malformed input degrades to a best-effort string,
//!   never to an error that would discard the edit.
//! - Text without encoding or editor artifacts passes through unchanged.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use unicode_normalization::UnicodeNormalization;

/// Markup an empty contenteditable leaves behind.
pub const EMPTY_CONTAINER_MARKERS: [&str; 2] = ["<br>", "<div><br></div>"];

static IMG_SRC_RES: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r#"(?i)<img[^>]*\ssrc="([^">]+)"[^>]*>"#).expect("valid img src regex"),
        Regex::new(r#"(?i)<img[^>]*\ssrc='([^'>]+)'[^>]*>"#).expect("valid img src regex"),
        Regex::new(r#"(?i)<img[^>]*\ssrc=([^"'\s>][^\s>]*)[^>]*>"#).expect("valid img src regex"),
    ]
});
static REMOTE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(https?|ftp)://").expect("valid remote url regex"));
static LINE_BREAK_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>|</?div[^>]*>").expect("valid line break regex"));
static HTML_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>").expect("valid html tag regex"));
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid entity regex")
});

/// Runs decode, NFC, empty-container collapse, NUL stripping and media
/// un-escaping, in that order.
pub fn normalize_field_value(raw: &str) -> String {
    let decoded = percent_decode(raw);
    let composed = nfc(&decoded);
    let collapsed = collapse_empty_container(composed);
    let without_nul = strip_nul(&collapsed);
    unescape_media_refs(&without_nul)
}

/// Percent-decodes `raw`; invalid UTF-8 becomes U+FFFD.
pub fn percent_decode(raw: &str) -> String {
    let bytes = urlencoding::decode_binary(raw.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Unicode canonical composition.
pub fn nfc(text: &str) -> String {
    text.nfc().collect()
}

/// Replaces empty-editor markup with the empty string.
pub fn collapse_empty_container(text: String) -> String {
    let single_line: String = text.chars().filter(|ch| !matches!(ch, '\n' | '\r')).collect();
    if EMPTY_CONTAINER_MARKERS.contains(&single_line.trim()) {
        String::new()
    } else {
        text
    }
}

pub fn strip_nul(text: &str) -> String {
    text.replace('\0', "")
}

/// Restores canonical filenames in local `<img src=...>` references.
///
/// The container reports `src` values URL-escaped; remote URLs are left as is.
pub fn unescape_media_refs(text: &str) -> String {
    let mut current = text.to_string();
    for re in IMG_SRC_RES.iter() {
        current = re
            .replace_all(&current, |caps: &Captures<'_>| {
                let tag = &caps[0];
                let fname = &caps[1];
                if REMOTE_URL_RE.is_match(fname) {
                    return tag.to_string();
                }
                tag.replace(fname, &percent_decode(fname))
            })
            .into_owned();
    }
    current
}

/// Collapses container HTML to one line of plain text.
pub fn html_to_text_line(html: &str) -> String {
    let spaced = LINE_BREAK_TAG_RE.replace_all(html, " ");
    let stripped = HTML_TAG_RE.replace_all(&spaced, "");
    let decoded = decode_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits a tag-list value into raw tokens.
pub fn tag_tokens(value: &str) -> Vec<String> {
    nfc(&html_to_text_line(value))
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let body = &caps[1];
            let decoded = match body {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => numeric_entity(body),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn numeric_entity(body: &str) -> Option<char> {
    let digits = body.strip_prefix('#')?;
    let code = match digits.strip_prefix(&['x', 'X'][..]) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}

#[cfg(test)]
mod tests {
    use super::{
        collapse_empty_container, html_to_text_line, normalize_field_value, percent_decode,
        tag_tokens, unescape_media_refs,
    };

    #[test]
    fn percent_decode_is_lossy_not_failing() {
        assert_eq!(percent_decode("a%20b%23c"), "a b#c");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%FF"), "\u{FFFD}");
        assert_eq!(percent_decode("a+b"), "a+b");
    }

    #[test]
    fn nfc_composes_decomposed_accents() {
        assert_eq!(normalize_field_value("e%CC%81"), "\u{e9}");
    }

    #[test]
    fn empty_container_markers_collapse() {
        assert_eq!(collapse_empty_container("<br>".to_string()), "");
        assert_eq!(collapse_empty_container("<div><br></div>".to_string()), "");
        assert_eq!(collapse_empty_container("<div>\n<br>\n</div>".to_string()), "");
        assert_eq!(
            collapse_empty_container("x<br>".to_string()),
            "x<br>".to_string()
        );
    }

    #[test]
    fn nul_characters_are_removed() {
        assert_eq!(normalize_field_value("a%00b"), "ab");
    }

    #[test]
    fn local_img_sources_are_unescaped() {
        assert_eq!(
            unescape_media_refs(r#"<img src="my%20cat.jpg">"#),
            r#"<img src="my cat.jpg">"#
        );
        assert_eq!(
            unescape_media_refs("<IMG class=x src='a%2Bb.png' alt=y>"),
            "<IMG class=x src='a+b.png' alt=y>"
        );
        assert_eq!(
            unescape_media_refs("<img src=dog%20run.gif>"),
            "<img src=dog run.gif>"
        );
    }

    #[test]
    fn remote_img_sources_are_untouched() {
        let html = r#"<img src="https://example.com/a%20b.png">"#;
        assert_eq!(unescape_media_refs(html), html);
    }

    #[test]
    fn html_to_text_line_strips_markup() {
        assert_eq!(
            html_to_text_line("<div>alpha</div><div>beta&nbsp;&amp;<br>gamma</div>\n"),
            "alpha beta & gamma"
        );
        assert_eq!(html_to_text_line("&#65;&#x42;&unknown;"), "AB&unknown;");
    }

    #[test]
    fn tag_tokens_split_on_any_whitespace() {
        assert_eq!(tag_tokens("alpha  beta\tgamma"), vec!["alpha", "beta", "gamma"]);
        assert!(tag_tokens("<br>").is_empty());
    }
}
