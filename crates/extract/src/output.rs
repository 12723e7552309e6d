// ABOUTME: Output stage: serializes the extracted article (or null) as JSON.
// ABOUTME: Writes one JSON value followed by a newline; compact unless pretty output is requested.

use std::io::Write;

use crate::article::ArticleRecord;
use crate::error::ExtractError;

/// JSON layout of the written value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStyle {
    #[default]
    Compact,
    Pretty,
}

/// Serialize the article to JSON text. `None` becomes the literal `null`.
pub fn to_json(article: Option<&ArticleRecord>, style: OutputStyle) -> Result<String, ExtractError> {
    let json = match style {
        OutputStyle::Compact => serde_json::to_string(&article),
        OutputStyle::Pretty => serde_json::to_string_pretty(&article),
    };
    json.map_err(|e| ExtractError::output("SerializeArticle", Some(anyhow::Error::new(e))))
}

/// Write the article as JSON plus a trailing newline, then flush.
pub fn write_article<W: Write>(
    mut writer: W,
    article: Option<&ArticleRecord>,
    style: OutputStyle,
) -> Result<(), ExtractError> {
    let json = to_json(article, style)?;
    writeln!(writer, "{}", json)
        .and_then(|_| writer.flush())
        .map_err(|e| ExtractError::output("WriteOutput", Some(anyhow::Error::new(e))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::ARTICLE_KEYS;
    use pretty_assertions::assert_eq;

    fn sample() -> ArticleRecord {
        let mut record = ArticleRecord {
            title: Some("Title".to_string()),
            content: Some("<div><p>Body text</p></div>".to_string()),
            excerpt: Some("Body text".to_string()),
            ..Default::default()
        };
        record.set_text_content("Body text".to_string());
        record
    }

    #[test]
    fn none_writes_null_line() {
        let mut buf = Vec::new();
        write_article(&mut buf, None, OutputStyle::Compact).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "null\n");
    }

    #[test]
    fn compact_output_is_single_line() {
        let mut buf = Vec::new();
        write_article(&mut buf, Some(&sample()), OutputStyle::Compact).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.ends_with('\n'));
        assert_eq!(text.matches('\n').count(), 1);
        assert!(text.starts_with(r#"{"title":"Title","#));
    }

    #[test]
    fn pretty_output_keeps_key_set() {
        let json = to_json(Some(&sample()), OutputStyle::Pretty).unwrap();
        assert!(json.contains("\n  \"textContent\": \"Body text\""));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), ARTICLE_KEYS.len());
        assert_eq!(obj["length"], 9);
    }

    #[test]
    fn output_round_trips() {
        let record = sample();
        let json = to_json(Some(&record), OutputStyle::Compact).unwrap();
        let back: ArticleRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn write_failure_is_output_error() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = write_article(Closed, None, OutputStyle::Compact).unwrap_err();
        assert!(err.is_output());
    }
}
