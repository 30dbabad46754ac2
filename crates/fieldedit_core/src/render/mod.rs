//! Render-stage integration for the `edit` field filter.
//!
//! # Responsibility
//! - Turn a classifier decision into a `RenderDirective`.
//! - Emit editable container markup with its commit/focus triggers.
//!
//! # Invariants
//! - Filters other than `edit` and ineligible text return the input unchanged.
//! - The Backspace guard is attached only when the directive carries
//!   `suppress_backspace_propagation`.
//! - Field names and record ids are escaped for the attribute and script
//!   contexts they are emitted into.

use crate::classify::{classify, Eligibility};
use crate::config::EditConfig;
use crate::model::edit::RenderDirective;
use crate::model::record::RecordId;
use log::debug;

/// Filter name claimed by this module.
pub const EDIT_FILTER: &str = "edit";
/// Message prefix emitted on focus loss.
pub const SAVE_COMMAND_PREFIX: &str = "ankisave#";
/// Message emitted on focus gain.
pub const SPEED_FOCUS_COMMAND: &str = "ankisave!speedfocus#";

const BACKSPACE_KEY_CODE: u32 = 8;

/// Per-render information supplied by the templating engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext {
    /// Record being rendered; `None` for previews without a record.
    pub record_id: Option<RecordId>,
}

impl RenderContext {
    pub fn for_record(record_id: RecordId) -> Self {
        Self {
            record_id: Some(record_id),
        }
    }

    pub fn preview() -> Self {
        Self { record_id: None }
    }
}

/// Decides how one field should be emitted.
pub fn directive_for(
    text: &str,
    field_name: &str,
    ctx: &RenderContext,
    config: &EditConfig,
) -> RenderDirective {
    match classify(text) {
        Eligibility::Editable => RenderDirective::Editable {
            field_name: field_name.to_string(),
            record_id: ctx.record_id,
            tag: config.tag,
            suppress_backspace_propagation: config.tag.suppresses_backspace(),
        },
        Eligibility::Blocked(family) => {
            debug!(
                "event=render_field module=render status=plain reason={} field_len={}",
                family.as_str(),
                text.len()
            );
            RenderDirective::Plain
        }
    }
}

/// Field filter hook invoked by the templating engine for every field.
pub fn field_filter(
    text: &str,
    field_name: &str,
    filter_name: &str,
    ctx: &RenderContext,
    config: &EditConfig,
) -> String {
    if filter_name != EDIT_FILTER {
        return text.to_string();
    }
    let directive = directive_for(text, field_name, ctx, config);
    render_with_directive(text, &directive)
}

/// Emits `text` according to `directive`.
pub fn render_with_directive(text: &str, directive: &RenderDirective) -> String {
    let RenderDirective::Editable {
        field_name,
        record_id,
        tag,
        suppress_backspace_propagation,
    } = directive
    else {
        return text.to_string();
    };

    let tag = tag.as_str();
    let record_attr = record_id.map(|id| id.to_string()).unwrap_or_default();
    let selector = format!(
        "[contenteditable=true][data-field='{}']",
        escape_js_string(field_name)
    );

    let mut out = format!(
        r#"<{tag} contenteditable="true" data-field="{}" data-nid="{}">{text}</{tag}>"#,
        escape_attribute(field_name),
        record_attr,
    );
    out.push_str("<script>");
    // The value is percent-encoded so `normalize_field_value` can decode it.
    out.push_str(&format!(
        r##"
            $("{selector}").blur(function() {{
                pycmd("{SAVE_COMMAND_PREFIX}" + $(this).data("field") + "#" + $(this).data("nid") + "#" + encodeURIComponent($(this).html()));
            }});
        "##
    ));
    if *suppress_backspace_propagation {
        out.push_str(&format!(
            r#"
            $("{selector}").keydown(function(evt) {{
                if (evt.keyCode == {BACKSPACE_KEY_CODE}) {{
                    evt.stopPropagation();
                }}
            }});
        "#
        ));
    }
    out.push_str(&format!(
        r#"
            $("{selector}").focus(function() {{
                pycmd("{SPEED_FOCUS_COMMAND}");
            }});
        "#
    ));
    out.push_str("</script>");
    out
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

// Selector text ends up inside a double-quoted JS string literal that wraps a
// single-quoted attribute selector.
fn escape_js_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\\\\\"),
            '\'' => escaped.push_str("\\\\'"),
            '"' => escaped.push_str("\\\""),
            '<' => escaped.push_str("\\u003c"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}
