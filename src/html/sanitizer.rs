//! Allow-list HTML sanitization
//!
//! Markup arrives from arbitrary web pages and is injected live into the
//! reader, so anything not explicitly allowed is dropped:
//! - Executable and embedding elements are removed together with their content
//! - Every attribute outside a small allow-list is stripped, including all
//!   `on*` event handlers and inline `style`
//! - `href`/`src` values using a script-capable scheme are stripped
//! - `target="_blank"` links get `rel="noopener noreferrer"`
//! - Comments are removed
//!
//! The output never contains anything that was not already in the input.

use lol_html::{doc_comments, element, rewrite_str, RewriteStrSettings};

use super::HtmlError;

/// Elements removed together with all of their descendants
pub const REMOVED_ELEMENTS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "link", "meta", "base", "svg", "form",
    "input", "button", "math", "textarea", "select", "noscript", "template", "frame",
    "frameset", "applet", "noembed", "noframes", "xmp", "plaintext", "title",
];

/// Attributes kept on surviving elements
pub const ALLOWED_ATTRIBUTES: &[&str] = &[
    "href",
    "src",
    "alt",
    "title",
    "class",
    "id",
    "rel",
    "target",
    "aria-label",
    "role",
    "width",
    "height",
];

/// URL schemes that are never allowed in `href` or `src`
pub const BLOCKED_URL_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:"];

const URL_ATTRIBUTES: &[&str] = &["href", "src"];

const REQUIRED_BLANK_REL: &[&str] = &["noopener", "noreferrer"];

/// Sanitize untrusted HTML for live injection
pub fn sanitize_html(html: &str) -> Result<String, HtmlError> {
    let output = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("*", |el| {
                let tag = el.tag_name().to_ascii_lowercase();
                if REMOVED_ELEMENTS.contains(&tag.as_str()) {
                    el.remove();
                    return Ok(());
                }

                let names: Vec<String> = el.attributes().iter().map(|a| a.name()).collect();
                for name in names {
                    if !ALLOWED_ATTRIBUTES.contains(&name.to_ascii_lowercase().as_str()) {
                        el.remove_attribute(&name);
                    }
                }

                for attr in URL_ATTRIBUTES {
                    if let Some(value) = el.get_attribute(attr) {
                        if is_blocked_url(&value) {
                            el.remove_attribute(attr);
                        }
                    }
                }

                let opens_blank = el
                    .get_attribute("target")
                    .is_some_and(|t| t.trim().eq_ignore_ascii_case("_blank"));
                if tag == "a" && opens_blank {
                    let rel = merge_rel(el.get_attribute("rel").as_deref());
                    el.set_attribute("rel", &rel)?;
                }
                Ok(())
            })],
            document_content_handlers: vec![doc_comments!(|comment| {
                comment.remove();
                Ok(())
            })],
            strict: false,
            ..RewriteStrSettings::default()
        },
    )?;

    Ok(output)
}

/// Whether a URL attribute value uses a blocked scheme
///
/// The value is decoded the way a browser decodes attribute values, which
/// includes references without a trailing `;` (`javascript&#58alert(1)`).
/// Browsers ignore whitespace and control characters inside a scheme, so
/// those are dropped before comparing. A scheme that still contains `&`
/// after decoding is treated as blocked.
pub fn is_blocked_url(value: &str) -> bool {
    let decoded = htmlize::unescape_attribute(value);
    let compact: String = decoded
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .flat_map(char::to_lowercase)
        .collect();

    if let Some((scheme, _)) = compact.split_once(':') {
        if scheme.contains('&') {
            return true;
        }
    }
    BLOCKED_URL_SCHEMES
        .iter()
        .any(|scheme| compact.starts_with(scheme))
}

/// Add `noopener` and `noreferrer` to an existing `rel` value
fn merge_rel(existing: Option<&str>) -> String {
    let mut tokens: Vec<&str> = existing
        .map(|rel| rel.split_whitespace().collect())
        .unwrap_or_default();
    for required in REQUIRED_BLANK_REL {
        if !tokens.iter().any(|t| t.eq_ignore_ascii_case(required)) {
            tokens.push(required);
        }
    }
    tokens.join(" ")
}
