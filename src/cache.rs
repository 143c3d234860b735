//! Rendered document cache with LRU eviction
//!
//! Rendering is a pure function of the document input, the selection and the
//! options, so results are keyed by a SHA-256 digest of those inputs. Nothing
//! needs invalidating: a changed input simply hashes to a different key.
//!
//! # Thread Safety
//!
//! The LRU sits behind a `parking_lot::Mutex`. The lock is never held while
//! rendering; two concurrent misses for the same key both render and the
//! later insert wins, which is harmless because both results are identical.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::render::{render_document, DocumentInput, RenderOptions, RenderedDocument};
use crate::topics::SelectionState;

/// Default number of rendered documents to keep
pub const DEFAULT_CAPACITY: usize = 256;

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
}

/// Input-hash keyed cache of rendered documents
pub struct RenderCache {
    entries: Mutex<LruCache<String, Arc<RenderedDocument>>>,
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RenderCache {
    /// Create a cache holding up to `capacity` documents (0 means default)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or(NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Return the cached rendering for these inputs, rendering on a miss
    pub fn get_or_render(
        &self,
        input: &DocumentInput,
        selection: &SelectionState,
        options: &RenderOptions,
    ) -> Arc<RenderedDocument> {
        let key = match cache_key(input, selection, options) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!("Failed to derive render cache key: {}", e);
                return Arc::new(render_document(input, selection, options));
            }
        };

        if let Some(hit) = self.entries.lock().get(&key) {
            tracing::debug!(key = %key, "Render cache hit");
            return Arc::clone(hit);
        }

        let rendered = Arc::new(render_document(input, selection, options));
        self.entries.lock().put(key, Arc::clone(&rendered));
        rendered
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock();
        CacheStats {
            entries: entries.len(),
            capacity: entries.cap().get(),
        }
    }
}

/// Hex SHA-256 digest identifying a render request
pub fn cache_key(
    input: &DocumentInput,
    selection: &SelectionState,
    options: &RenderOptions,
) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(&(input, selection, options))?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> DocumentInput {
        DocumentInput {
            raw_html: "<p>One. Two.</p>".to_string(),
            sentences: vec!["One.".to_string(), "Two.".to_string()],
            ..DocumentInput::default()
        }
    }

    #[test]
    fn test_cache_creation() {
        let cache = RenderCache::new(10);
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats { entries: 0, capacity: 10 });
    }

    #[test]
    fn test_zero_capacity_uses_default() {
        let cache = RenderCache::new(0);
        assert_eq!(cache.stats().capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_hit_returns_same_rendering() {
        let cache = RenderCache::new(4);
        let options = RenderOptions::default();
        let first = cache.get_or_render(&input(), &SelectionState::default(), &options);
        let second = cache.get_or_render(&input(), &SelectionState::default(), &options);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_selection_change_is_a_new_key() {
        let cache = RenderCache::new(4);
        let options = RenderOptions::default();
        let selection = SelectionState {
            hovered: Some("A".to_string()),
            ..SelectionState::default()
        };
        cache.get_or_render(&input(), &SelectionState::default(), &options);
        cache.get_or_render(&input(), &selection, &options);

        assert_eq!(cache.len(), 2);
        assert_ne!(
            cache_key(&input(), &SelectionState::default(), &options).unwrap(),
            cache_key(&input(), &selection, &options).unwrap()
        );
    }

    #[test]
    fn test_eviction() {
        let cache = RenderCache::new(1);
        let options = RenderOptions::default();
        let mut other = input();
        other.document_index = 1;

        cache.get_or_render(&input(), &SelectionState::default(), &options);
        cache.get_or_render(&other, &SelectionState::default(), &options);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_key_is_stable_hex() {
        let options = RenderOptions::default();
        let a = cache_key(&input(), &SelectionState::default(), &options).unwrap();
        let b = cache_key(&input(), &SelectionState::default(), &options).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
