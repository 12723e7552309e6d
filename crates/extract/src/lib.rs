// ABOUTME: Library entry point for readout, a readable-article extractor.
// ABOUTME: Re-exports the public API: Reader, ReaderBuilder, ArticleRecord, ExtractError, and the pipeline.

//! readout - extract the readable article from an HTML document as JSON.
//!
//! The document is parsed and scored by `dom_smoothie`, a port of Mozilla's
//! Readability. This crate supplies the plumbing around it: input decoding,
//! optional fetching, noise cleaning and JSON output.
//!
//! # Example
//!
//! ```no_run
//! use readout_extract::{OutputStyle, Reader};
//!
//! fn main() -> Result<(), readout_extract::ExtractError> {
//!     let reader = Reader::builder().build();
//!     readout_extract::run(std::io::stdin(), std::io::stdout(), &reader, OutputStyle::Compact)?;
//!     Ok(())
//! }
//! ```

pub mod article;
pub mod clean;
pub mod error;
pub mod input;
pub mod options;
pub mod output;
pub mod pipeline;
pub mod reader;
pub mod resource;

pub use crate::article::{ArticleRecord, ARTICLE_KEYS};
pub use crate::clean::clean_text;
pub use crate::error::{ErrorCode, ExtractError};
pub use crate::input::read_input;
pub use crate::options::{Options, ReaderBuilder, DEFAULT_BASE_URL};
pub use crate::output::{to_json, write_article, OutputStyle};
pub use crate::pipeline::{run, run_url};
pub use crate::reader::Reader;
