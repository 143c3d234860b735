//! Configuration management for Sentence Lens Server

use serde::Deserialize;
use std::env;
use std::str::FromStr;

use crate::cache::DEFAULT_CAPACITY;
use crate::render::RenderOptions;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests with more markup than this are rejected
    pub max_html_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub cache_size: usize,
    pub class_prefix: String,
    pub min_coverage: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                max_html_bytes: 5 * 1024 * 1024,
            },
            render: RenderConfig {
                cache_size: DEFAULT_CAPACITY,
                class_prefix: "sl".to_string(),
                min_coverage: 0.5,
            },
        }
    }
}

impl Config {
    /// Read configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port),
                max_html_bytes: parse_var("MAX_HTML_BYTES", defaults.server.max_html_bytes),
            },
            render: RenderConfig {
                cache_size: parse_var("RENDER_CACHE_SIZE", defaults.render.cache_size),
                class_prefix: env::var("MARKER_CLASS_PREFIX")
                    .ok()
                    .filter(|prefix| is_valid_class_prefix(prefix))
                    .unwrap_or(defaults.render.class_prefix),
                min_coverage: Some(parse_var(
                    "MIN_ALIGNMENT_COVERAGE",
                    defaults.render.min_coverage,
                ))
                .filter(|coverage| coverage.is_finite())
                .map_or(defaults.render.min_coverage, |coverage| coverage.clamp(0.0, 1.0)),
            },
        }
    }

    /// Render options derived from this configuration
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            class_prefix: self.render.class_prefix.clone(),
            min_coverage: self.render.min_coverage,
        }
    }
}

fn parse_var<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {}={:?}, using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Class prefixes end up in `class` and `id` attributes; keep them plain
fn is_valid_class_prefix(prefix: &str) -> bool {
    let valid = !prefix.is_empty()
        && prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        tracing::warn!("Invalid MARKER_CLASS_PREFIX={:?}, using default", prefix);
    }
    valid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.render.cache_size, DEFAULT_CAPACITY);
        assert_eq!(config.render_options(), RenderOptions::default());
    }

    #[test]
    fn test_class_prefix_validation() {
        assert!(is_valid_class_prefix("sl"));
        assert!(is_valid_class_prefix("reader_v2-x"));
        assert!(!is_valid_class_prefix(""));
        assert!(!is_valid_class_prefix("a\" onclick=\"x"));
    }

    #[test]
    fn test_parse_var_falls_back() {
        assert_eq!(parse_var("SENTENCE_LENS_TEST_UNSET_VAR", 7u16), 7);
    }
}
