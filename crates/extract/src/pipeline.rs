// ABOUTME: The stdin-to-stdout pipeline: read input, extract the article, write JSON.
// ABOUTME: Generic over reader and writer so the binary and tests share one code path.

use std::io::{Read, Write};

use log::debug;

use crate::article::ArticleRecord;
use crate::error::ExtractError;
use crate::input::read_input;
use crate::output::{write_article, OutputStyle};
use crate::reader::Reader;

/// Run the full pipeline once. Returns the article that was written, if any.
///
/// Nothing is written when an earlier stage fails.
pub fn run<R: Read, W: Write>(
    input: R,
    output: W,
    reader: &Reader,
    style: OutputStyle,
) -> Result<Option<ArticleRecord>, ExtractError> {
    let html = read_input(input)?;
    let article = reader.parse_html(&html)?;
    write_article(output, article.as_ref(), style)?;
    debug!("wrote {}", if article.is_some() { "article" } else { "null" });
    Ok(article)
}

/// Fetch `url`, extract the article and write it as JSON.
pub fn run_url<W: Write>(
    url: &str,
    output: W,
    reader: &Reader,
    style: OutputStyle,
) -> Result<Option<ArticleRecord>, ExtractError> {
    let article = reader.parse_url(url)?;
    write_article(output, article.as_ref(), style)?;
    Ok(article)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn empty_input_writes_null() {
        let mut out = Vec::new();
        let article =
            run(Cursor::new(""), &mut out, &Reader::default(), OutputStyle::Compact).unwrap();
        assert_eq!(article, None);
        assert_eq!(String::from_utf8(out).unwrap(), "null\n");
    }

    #[test]
    fn invalid_base_url_writes_nothing() {
        let reader = Reader::builder().base_url("::nope::").build();
        let mut out = Vec::new();
        let err = run(
            Cursor::new("<html><body><p>x</p></body></html>"),
            &mut out,
            &reader,
            OutputStyle::Compact,
        )
        .unwrap_err();
        assert!(err.is_invalid_url());
        assert!(out.is_empty());
    }
}
