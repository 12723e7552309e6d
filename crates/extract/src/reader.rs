// ABOUTME: Reader drives the extraction: builds the document and runs the readability heuristic.
// ABOUTME: Maps "no content" to None and applies the optional noise filter and length floor.

use dom_query::Document;
use dom_smoothie::{Config, Readability, ReadabilityError};
use log::debug;

use crate::article::ArticleRecord;
use crate::clean::clean_text;
use crate::error::ExtractError;
use crate::options::{Options, ReaderBuilder};
use crate::resource::{self, FetchOptions};

/// Titles shorter than this may be replaced by the page's only `<h1>`.
const SHORT_TITLE_CHARS: usize = 15;

/// Text of the document's `<h1>` when there is exactly one, whitespace-collapsed.
fn sole_heading_text(html: &str) -> Option<String> {
    let doc = Document::from(html);
    let headings = doc.select("h1");
    if headings.length() != 1 {
        return None;
    }
    let text = headings.text().split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Extracts readable articles from HTML documents.
#[derive(Debug, Clone)]
pub struct Reader {
    opts: Options,
}

impl Default for Reader {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Reader {
    /// Create a new ReaderBuilder.
    pub fn builder() -> ReaderBuilder {
        ReaderBuilder::new()
    }

    pub fn new(opts: Options) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    fn config(&self) -> Config {
        Config {
            max_elements_to_parse: self.opts.max_elements,
            char_threshold: self.opts.char_threshold,
            keep_classes: self.opts.keep_classes,
            ..Default::default()
        }
    }

    /// Extract the article from `html`, resolving links against the configured base URL.
    ///
    /// Returns `Ok(None)` when the document has no article-like content.
    pub fn parse_html(&self, html: &str) -> Result<Option<ArticleRecord>, ExtractError> {
        self.parse_html_with_base(html, &self.opts.base_url)
    }

    /// Fetch `url` and extract its article, using the final URL as the base URL.
    pub fn parse_url(&self, url: &str) -> Result<Option<ArticleRecord>, ExtractError> {
        let fetch_opts = FetchOptions {
            headers: self.opts.headers.clone(),
            user_agent: self.opts.user_agent.clone(),
            timeout: self.opts.timeout,
            allow_private_networks: self.opts.allow_private_networks,
        };
        let fetched = resource::fetch(url, &fetch_opts)?;
        let html = fetched.text();
        self.parse_html_with_base(&html, &fetched.final_url)
    }

    fn parse_html_with_base(
        &self,
        html: &str,
        base_url: &str,
    ) -> Result<Option<ArticleRecord>, ExtractError> {
        url::Url::parse(base_url).map_err(|e| {
            ExtractError::invalid_url(
                base_url,
                "ParseDocument",
                Some(anyhow::anyhow!("invalid base URL: {}", e)),
            )
        })?;

        debug!("parsing {} chars of HTML against {}", html.len(), base_url);
        let mut readability =
            Readability::new(html, Some(base_url), Some(self.config())).map_err(|e| {
                ExtractError::extract(base_url, "ParseDocument", Some(anyhow::Error::new(e)))
            })?;

        let article = match readability.parse() {
            Ok(article) => article,
            Err(ReadabilityError::GrabFailed) => {
                debug!("no article content found");
                return Ok(None);
            }
            Err(e) => {
                return Err(ExtractError::extract(
                    base_url,
                    "ExtractArticle",
                    Some(anyhow::Error::new(e)),
                ))
            }
        };

        let mut record = ArticleRecord::from(article);
        if record.is_blank() {
            debug!("extracted article has no text");
            return Ok(None);
        }

        let title_chars = record.title.as_deref().map_or(0, |t| t.trim().chars().count());
        if title_chars < SHORT_TITLE_CHARS {
            if let Some(heading) = sole_heading_text(html) {
                debug!("using sole <h1> {:?} as title", heading);
                record.title = Some(heading);
            }
        }

        if self.opts.clean_text {
            let cleaned = clean_text(record.text());
            record.set_text_content(cleaned);
            if record.is_blank() {
                debug!("noise filter removed all article text");
                return Ok(None);
            }
        }

        if record.text_chars() < self.opts.min_text_length {
            debug!(
                "article text has {} chars, below minimum {}",
                record.text_chars(),
                self.opts.min_text_length
            );
            return Ok(None);
        }

        debug!(
            "extracted article {:?} ({} chars)",
            record.title.as_deref().unwrap_or_default(),
            record.text_chars()
        );
        Ok(Some(record))
    }
}
