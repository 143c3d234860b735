//! Application state management

use std::sync::Arc;

use crate::cache::RenderCache;
use crate::config::Config;
use crate::render::RenderOptions;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    render_options: RenderOptions,
    render_cache: RenderCache,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Self {
        let render_cache = RenderCache::new(config.render.cache_size);
        let render_options = config.render_options();
        Self {
            inner: Arc::new(AppStateInner {
                config,
                render_options,
                render_cache,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the render options
    pub fn render_options(&self) -> &RenderOptions {
        &self.inner.render_options
    }

    /// Get the render cache
    pub fn render_cache(&self) -> &RenderCache {
        &self.inner.render_cache
    }
}
