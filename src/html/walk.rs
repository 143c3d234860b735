//! Text node traversal shared by flattening and annotation
//!
//! The flattened text of a document is the entity-decoded content of every
//! rendered text node, concatenated in document order. Character references
//! are decoded the way a browser decodes them in text, including legacy
//! references without a trailing `;`. Text that the browser
//! never renders as markup (`<title>`, raw-text and script data) is skipped.
//! Flattening and annotation walk the markup through this one function, so
//! char offsets computed by one are valid for the other.

use lol_html::html_content::{ContentType, TextType};
use lol_html::{doc_text, rewrite_str, RewriteStrSettings};

use super::HtmlError;

/// Visit each rendered text node, optionally replacing it
///
/// `visit` receives the node's decoded text. Returning `Some(html)` replaces
/// the node with that markup; `None` leaves the original bytes untouched.
pub(crate) fn rewrite_text_nodes<F>(html: &str, mut visit: F) -> Result<String, HtmlError>
where
    F: FnMut(&str) -> Option<String>,
{
    // lol_html may split one text node across several chunks
    let mut pending = String::new();
    let mut chunks_in_node = 0usize;

    let output = rewrite_str(
        html,
        RewriteStrSettings {
            document_content_handlers: vec![doc_text!(|chunk| {
                if !matches!(chunk.text_type(), TextType::Data) {
                    return Ok(());
                }

                pending.push_str(chunk.as_str());
                chunks_in_node += 1;
                if !chunk.last_in_text_node() {
                    chunk.remove();
                    return Ok(());
                }

                let raw = std::mem::take(&mut pending);
                let was_split = chunks_in_node > 1;
                chunks_in_node = 0;

                let decoded = htmlize::unescape(raw.as_str());
                match visit(&*decoded) {
                    Some(rendered) => chunk.replace(&rendered, ContentType::Html),
                    None if was_split => chunk.replace(&raw, ContentType::Html),
                    None => {}
                }
                Ok(())
            })],
            strict: false,
            ..RewriteStrSettings::default()
        },
    )?;

    Ok(output)
}

/// Flattened text content of `html`
pub fn flatten_text(html: &str) -> Result<String, HtmlError> {
    let mut text = String::new();
    rewrite_text_nodes(html, |node| {
        text.push_str(node);
        None
    })?;
    Ok(text)
}
