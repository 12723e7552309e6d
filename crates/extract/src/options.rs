// ABOUTME: Configuration for the readout pipeline: the Options struct and the ReaderBuilder.
// ABOUTME: ReaderBuilder provides a fluent API for constructing Reader instances with custom settings.

use std::collections::HashMap;
use std::time::Duration;

use crate::reader::Reader;

/// Base URL handed to the extractor when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://example.com";

/// User-Agent sent by fetch mode. Many sites serve a stripped page to unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// Extractor character threshold, matching Readability.js.
pub const DEFAULT_CHAR_THRESHOLD: usize = 500;

/// Configuration options for the Reader.
#[derive(Debug, Clone)]
pub struct Options {
    /// Base URL used to resolve relative links inside the document.
    pub base_url: String,
    /// Maximum number of elements the extractor will parse. 0 means no limit.
    pub max_elements: usize,
    pub char_threshold: usize,
    pub keep_classes: bool,
    /// Run the noise filter over `textContent` after extraction.
    pub clean_text: bool,
    /// Results whose text is shorter than this (in chars) are discarded.
    pub min_text_length: usize,
    pub timeout: Duration,
    pub user_agent: String,
    pub allow_private_networks: bool,
    pub headers: HashMap<String, String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_elements: 0,
            char_threshold: DEFAULT_CHAR_THRESHOLD,
            keep_classes: false,
            clean_text: false,
            min_text_length: 0,
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allow_private_networks: false,
            headers: HashMap::new(),
        }
    }
}

/// Builder for constructing Reader instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ReaderBuilder {
    opts: Options,
}

impl ReaderBuilder {
    /// Create a new ReaderBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the base URL used for relative link resolution.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.opts.base_url = base_url.into();
        self
    }

    pub fn max_elements(mut self, max_elements: usize) -> Self {
        self.opts.max_elements = max_elements;
        self
    }

    pub fn char_threshold(mut self, char_threshold: usize) -> Self {
        self.opts.char_threshold = char_threshold;
        self
    }

    pub fn keep_classes(mut self, keep: bool) -> Self {
        self.opts.keep_classes = keep;
        self
    }

    /// Enable or disable noise filtering of the extracted text.
    pub fn clean_text(mut self, clean: bool) -> Self {
        self.opts.clean_text = clean;
        self
    }

    /// Discard articles with less text than this many characters.
    pub fn min_text_length(mut self, min: usize) -> Self {
        self.opts.min_text_length = min;
        self
    }

    /// Set the fetch timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header used by fetch mode.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Allow or disallow fetches from private networks.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    /// Add a custom header to fetch requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Build the Reader with the configured options.
    pub fn build(self) -> Reader {
        Reader::new(self.opts)
    }
}

impl Default for ReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
