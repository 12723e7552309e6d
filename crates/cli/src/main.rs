// ABOUTME: CLI for extracting the readable article from HTML on stdin and printing it as JSON.
// ABOUTME: With no arguments reads stdin; --url fetches the page instead.

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use readout_extract::{OutputStyle, Reader, DEFAULT_BASE_URL};

/// Extract the readable article from an HTML document and print it as JSON.
///
/// Prints `null` when the document has no article-like content.
#[derive(Parser, Debug)]
#[command(name = "readout")]
#[command(about = "Extract the readable article from HTML on stdin and print JSON", long_about = None)]
struct Args {
    /// Base URL used to resolve relative links in the document
    #[arg(long, env = "READOUT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Fetch the document from this URL instead of reading stdin
    #[arg(long)]
    url: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// Drop recommendation/related/short noise lines from textContent
    #[arg(long, default_value_t = false)]
    clean: bool,

    /// Print null when textContent has fewer characters than this
    #[arg(long, default_value_t = 0)]
    min_text_length: usize,

    /// Abort when the document has more elements than this (0 = no limit)
    #[arg(long, default_value_t = 0)]
    max_elements: usize,

    /// Minimum characters an article must have before the extractor stops relaxing its rules
    #[arg(long, default_value_t = 500)]
    char_threshold: usize,

    /// Keep class attributes in the extracted content
    #[arg(long, default_value_t = false)]
    keep_classes: bool,

    /// User-Agent for --url requests
    #[arg(long)]
    user_agent: Option<String>,

    /// Timeout in seconds for --url requests
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Allow --url to reach private/local networks
    #[arg(long, default_value_t = false)]
    allow_private_networks: bool,
}

impl Args {
    fn reader(&self) -> Reader {
        let mut builder = Reader::builder()
            .base_url(self.base_url.as_str())
            .clean_text(self.clean)
            .min_text_length(self.min_text_length)
            .max_elements(self.max_elements)
            .char_threshold(self.char_threshold)
            .keep_classes(self.keep_classes)
            .timeout(Duration::from_secs(self.timeout))
            .allow_private_networks(self.allow_private_networks);
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.as_str());
        }
        builder.build()
    }

    fn run(self) -> Result<()> {
        let reader = self.reader();
        let style = if self.pretty {
            OutputStyle::Pretty
        } else {
            OutputStyle::Compact
        };
        let stdout = io::stdout().lock();

        let article = match &self.url {
            Some(url) => readout_extract::run_url(url, stdout, &reader, style)
                .with_context(|| format!("failed to extract article from `{}`", url))?,
            None => readout_extract::run(io::stdin().lock(), stdout, &reader, style)
                .context("failed to extract article from stdin")?,
        };

        log::info!(
            "done: {}",
            if article.is_some() { "article" } else { "null" }
        );
        Ok(())
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = Args::parse().run() {
        eprintln!("error: {}", e);
        if let Some(cause) = e.chain().nth(1) {
            eprintln!("  caused by: {}", cause);
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
