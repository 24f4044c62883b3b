//! Runtime configuration and defaults.

use std::path::PathBuf;
use std::time::Duration;

pub const SCRYFALL_API_BASE: &str = "https://api.scryfall.com";

/// Scryfall asks clients to keep 50-100 ms between API requests
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Paper format for generated sheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
}

impl PaperSize {
    /// (width, height) in millimetres
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::Letter => (215.9, 279.4),
        }
    }
}

/// Returns the default image cache directory: ~/.cache/mtg_print/images on Linux
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mtg_print")
        .join("images")
}

pub fn default_user_agent() -> String {
    format!("mtg_print/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone)]
pub struct Config {
    pub cache_dir: PathBuf,
    pub api_base: String,
    pub user_agent: String,
    /// Minimum pause between two Scryfall API requests
    pub request_delay: Duration,
    pub timeout: Duration,
    pub paper: PaperSize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            api_base: SCRYFALL_API_BASE.to_string(),
            user_agent: default_user_agent(),
            request_delay: DEFAULT_REQUEST_DELAY,
            timeout: DEFAULT_TIMEOUT,
            paper: PaperSize::default(),
        }
    }
}

impl Config {
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_paper(mut self, paper: PaperSize) -> Self {
        self.paper = paper;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base, "https://api.scryfall.com");
        assert_eq!(config.request_delay, Duration::from_millis(100));
        assert_eq!(config.paper, PaperSize::A4);
        assert!(config.cache_dir.ends_with("mtg_print/images"));
        assert!(config.user_agent.starts_with("mtg_print/"));
    }

    #[test]
    fn test_api_base_trailing_slash_stripped() {
        let config = Config::default().with_api_base("http://127.0.0.1:8080/");
        assert_eq!(config.api_base, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_paper_dimensions() {
        assert_eq!(PaperSize::A4.dimensions_mm(), (210.0, 297.0));
        assert_eq!(PaperSize::Letter.dimensions_mm(), (215.9, 279.4));
    }
}
