// ABOUTME: ArticleRecord struct holding the readable article extracted from a document.
// ABOUTME: Serializes with the Readability.js key names and always emits the full key set.

use serde::{Deserialize, Serialize};

/// The article extracted from a document.
///
/// Every field is serialized, absent values as `null`, so the key set of a
/// successful result never varies between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub title: Option<String>,
    pub byline: Option<String>,
    pub dir: Option<String>,
    pub lang: Option<String>,
    /// Cleaned article HTML.
    pub content: Option<String>,
    /// Article text with markup stripped.
    pub text_content: Option<String>,
    /// Character count of `text_content`.
    pub length: Option<usize>,
    pub excerpt: Option<String>,
    pub site_name: Option<String>,
    pub published_time: Option<String>,
}

/// JSON keys of a serialized record, in output order.
pub const ARTICLE_KEYS: [&str; 10] = [
    "title",
    "byline",
    "dir",
    "lang",
    "content",
    "textContent",
    "length",
    "excerpt",
    "siteName",
    "publishedTime",
];

impl From<dom_smoothie::Article> for ArticleRecord {
    fn from(article: dom_smoothie::Article) -> Self {
        let content: String = article.content.into();
        let text_content: String = article.text_content.into();

        ArticleRecord {
            title: Some(article.title),
            byline: article.byline,
            dir: article.dir,
            lang: article.lang,
            content: Some(content),
            text_content: Some(text_content),
            length: Some(article.length),
            excerpt: article.excerpt,
            site_name: article.site_name,
            published_time: article.published_time,
        }
    }
}

impl ArticleRecord {
    /// The plain text of the article, or "" when absent.
    pub fn text(&self) -> &str {
        self.text_content.as_deref().unwrap_or_default()
    }

    /// Number of characters in the trimmed article text.
    pub fn text_chars(&self) -> usize {
        self.text().trim().chars().count()
    }

    /// Returns true if the article carries no readable text.
    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }

    /// Replace the plain text and recompute `length` to match it.
    pub fn set_text_content(&mut self, text: String) {
        self.length = Some(text.chars().count());
        self.text_content = Some(text);
    }
}
