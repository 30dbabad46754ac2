//! Detectors for sub-syntax that must not pass through an editable surface.
//!
//! Each detector recognizes one directive family on the pre-render text.
//! Detectors never fail: unterminated or malformed input simply does not
//! match, except where the opener alone is enough to reject.

use once_cell::sync::Lazy;
use regex::Regex;

static CLOZE_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?si)\{\{c\d+::.*?\}\}").expect("valid cloze regex"));
static CLOZE_RENDERED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<span class="?cloze"#).expect("valid cloze span regex"));
static LATEX_BLOCK_RES: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"(?si)\[latex\](.+?)\[/latex\]").expect("valid latex regex"),
        Regex::new(r"(?si)\[\$\](.+?)\[/\$\]").expect("valid latex expression regex"),
        Regex::new(r"(?si)\[\$\$\](.+?)\[/\$\$\]").expect("valid latex math regex"),
    ]
});
static MATHJAX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\\[\[(].*?\\[\])]").expect("valid mathjax regex"));

const MEDIA_MARKER_OPENER: &str = "[sound:";

/// Directive families that block in-place editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveFamily {
    Cloze,
    Media,
    Typeset,
}

impl DirectiveFamily {
    /// Stable id used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cloze => "cloze",
            Self::Media => "media",
            Self::Typeset => "typeset",
        }
    }
}

/// One independent check over a field's text.
pub trait DirectiveDetector: Sync {
    /// Family reported when `detect` matches.
    fn family(&self) -> DirectiveFamily;
    /// Returns whether `text` contains this family's directive.
    fn detect(&self, text: &str) -> bool;
}

/// `{{cN::answer[::hint]}}` markers, plus spans the cloze filter already
/// produced when it ran ahead of the edit filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClozeDetector;

impl DirectiveDetector for ClozeDetector {
    fn family(&self) -> DirectiveFamily {
        DirectiveFamily::Cloze
    }

    fn detect(&self, text: &str) -> bool {
        CLOZE_MARKER_RE.is_match(text) || CLOZE_RENDERED_RE.is_match(text)
    }
}

/// `[sound:file.mp3]` media embeds. The opener alone rejects the text.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaDetector;

impl DirectiveDetector for MediaDetector {
    fn family(&self) -> DirectiveFamily {
        DirectiveFamily::Media
    }

    fn detect(&self, text: &str) -> bool {
        text.contains(MEDIA_MARKER_OPENER)
    }
}

/// `[latex]`, `[$]`, `[$$]` blocks and `\(..\)` / `\[..\]` inline math.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypesetDetector;

impl DirectiveDetector for TypesetDetector {
    fn family(&self) -> DirectiveFamily {
        DirectiveFamily::Typeset
    }

    fn detect(&self, text: &str) -> bool {
        MATHJAX_RE.is_match(text) || LATEX_BLOCK_RES.iter().any(|re| re.is_match(text))
    }
}
