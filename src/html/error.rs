//! HTML processing errors

use thiserror::Error;

/// Errors raised while rewriting markup
#[derive(Debug, Error)]
pub enum HtmlError {
    #[error("HTML rewrite failed: {0}")]
    RewriteError(String),
}

impl From<lol_html::errors::RewritingError> for HtmlError {
    fn from(e: lol_html::errors::RewritingError) -> Self {
        HtmlError::RewriteError(e.to_string())
    }
}
