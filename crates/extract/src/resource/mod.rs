// ABOUTME: Resource module for fetching HTML documents over HTTP in fetch mode.
// ABOUTME: Handles SSRF protection, content-length limits, and charset decoding.

use std::collections::HashMap;
use std::net::{IpAddr, ToSocketAddrs};
use std::time::Duration;

use ipnet::{Ipv4Net, Ipv6Net};
use log::{debug, info, warn};
use once_cell::sync::Lazy;

use crate::error::ExtractError;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Options for fetching a resource.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub headers: HashMap<String, String>,
    pub user_agent: String,
    pub timeout: Duration,
    pub allow_private_networks: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            user_agent: crate::options::DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            allow_private_networks: false,
        }
    }
}

/// Result of a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResult {
    /// Decode the body to text, using the Content-Type charset or detection.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

static PRIVATE_V4: Lazy<Vec<Ipv4Net>> = Lazy::new(|| {
    [
        // RFC1918
        "10.0.0.0/8",
        "172.16.0.0/12",
        "192.168.0.0/16",
        // Loopback
        "127.0.0.0/8",
        // Link-local
        "169.254.0.0/16",
    ]
    .iter()
    .filter_map(|net| net.parse().ok())
    .collect()
});

static PRIVATE_V6: Lazy<Vec<Ipv6Net>> = Lazy::new(|| {
    // Unique local, link-local
    ["fc00::/7", "fe80::/10"]
        .iter()
        .filter_map(|net| net.parse().ok())
        .collect()
});

/// Check if an IP address is in a private/reserved range.
fn is_private_ip(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(ip) => PRIVATE_V4.iter().any(|net| net.contains(ip)),
        IpAddr::V6(ip) => ip.is_loopback() || PRIVATE_V6.iter().any(|net| net.contains(ip)),
    }
}

/// Refuse `url` if its host is, or resolves to, a private address.
fn check_host(url: &url::Url, requested: &str, what: &str) -> Result<(), ExtractError> {
    let Some(host) = url.host_str() else {
        return Ok(());
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');

    let blocked = || {
        warn!("refusing {} to private address: {}", what, url);
        ExtractError::ssrf(
            requested,
            "Fetch",
            Some(anyhow::anyhow!("{} to private IP address is not allowed", what)),
        )
    };

    if let Ok(ip) = host.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            return Err(blocked());
        }
        return Ok(());
    }

    let port = url.port_or_known_default().unwrap_or(80);
    let addrs = (host, port).to_socket_addrs().map_err(|e| {
        ExtractError::fetch(
            requested,
            "Fetch",
            Some(anyhow::anyhow!("DNS lookup failed: {}", e)),
        )
    })?;

    for socket_addr in addrs {
        if is_private_ip(&socket_addr.ip()) {
            return Err(blocked());
        }
    }
    Ok(())
}

/// Returns true if a declared Content-Length is over the limit.
fn exceeds_content_limit(len: u64) -> bool {
    len > MAX_CONTENT_LENGTH as u64
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some((key, value)) = trimmed.split_once('=') {
            if key.trim() == "charset" {
                let charset = value.trim().trim_matches('"').trim_matches('\'');
                return Some(charset.to_string());
            }
        }
    }
    None
}

/// Fetch a document from the given URL with a blocking client.
pub fn fetch(url: &str, opts: &FetchOptions) -> Result<FetchResult, ExtractError> {
    if url.is_empty() {
        return Err(ExtractError::invalid_url(url, "Fetch", None));
    }

    let parsed_url = url::Url::parse(url).map_err(|e| {
        ExtractError::invalid_url(url, "Fetch", Some(anyhow::anyhow!("invalid URL: {}", e)))
    })?;

    let scheme = parsed_url.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ExtractError::invalid_url(
            url,
            "Fetch",
            Some(anyhow::anyhow!("scheme must be http or https")),
        ));
    }

    if !opts.allow_private_networks {
        check_host(&parsed_url, url, "request")?;
    }

    let client = reqwest::blocking::Client::builder()
        .user_agent(opts.user_agent.as_str())
        .timeout(opts.timeout)
        .build()
        .map_err(|e| {
            ExtractError::fetch(url, "Fetch", Some(anyhow::anyhow!("client setup failed: {}", e)))
        })?;

    let mut request = client.get(parsed_url.as_str());
    for (key, value) in &opts.headers {
        request = request.header(key, value);
    }

    debug!("GET {}", url);
    let response = request.send().map_err(|e| {
        ExtractError::fetch(url, "Fetch", Some(anyhow::anyhow!("request failed: {}", e)))
    })?;

    if !opts.allow_private_networks {
        check_host(response.url(), url, "redirect")?;
    }

    if let Some(len) = response.content_length() {
        if exceeds_content_limit(len) {
            return Err(ExtractError::fetch(
                url,
                "Fetch",
                Some(anyhow::anyhow!("content too large")),
            ));
        }
    }

    let status = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response.bytes().map_err(|e| {
        ExtractError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("failed to read body: {}", e)),
        )
    })?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(ExtractError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    if status != 200 {
        return Err(ExtractError::fetch(
            url,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status)),
        ));
    }

    info!("fetched {} ({} bytes, status {})", final_url, body.len(), status);

    Ok(FetchResult {
        status,
        url: url.to_string(),
        final_url,
        content_type,
        body: body.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;

    fn local_opts() -> FetchOptions {
        FetchOptions {
            allow_private_networks: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_fetch_ok_utf8() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/test");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body("<p>hello</p>");
        });

        let result = fetch(&server.url("/test"), &local_opts());
        mock.assert();

        let result = result.expect("fetch should succeed");
        assert_eq!(result.status, 200);
        assert_eq!(result.text(), "<p>hello</p>");
        assert_eq!(
            result.content_type.as_deref(),
            Some("text/html; charset=utf-8")
        );
    }

    #[test]
    fn test_fetch_sends_user_agent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/ua")
                .header("user-agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64)");
            then.status(200).body("ok");
        });

        let result = fetch(&server.url("/ua"), &local_opts());
        mock.assert();
        assert!(result.is_ok());
    }

    #[test]
    fn test_fetch_sends_custom_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/h").header("x-test", "yes");
            then.status(200).body("ok");
        });

        let mut opts = local_opts();
        opts.headers.insert("x-test".to_string(), "yes".to_string());
        let result = fetch(&server.url("/h"), &opts);
        mock.assert();
        assert!(result.is_ok());
    }

    #[test]
    fn test_fetch_non_200_rejected() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/notfound");
            then.status(404).body("not found");
        });

        let result = fetch(&server.url("/notfound"), &local_opts());
        mock.assert();

        let err = result.expect_err("should fail on 404");
        assert!(err.is_fetch());
        assert!(err.to_string().contains("HTTP status 404"));
    }

    #[test]
    fn test_private_ip_block() {
        let server = MockServer::start();
        let opts = FetchOptions::default();

        let url = format!("http://127.0.0.1:{}/test", server.port());
        let err = fetch(&url, &opts).expect_err("should fail on private IP");
        assert!(err.is_ssrf());
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = fetch("file:///etc/passwd", &local_opts()).unwrap_err();
        assert!(err.is_invalid_url());
    }

    #[test]
    fn test_rejects_unparsable_url() {
        assert!(fetch("not a url", &local_opts()).unwrap_err().is_invalid_url());
        assert!(fetch("", &local_opts()).unwrap_err().is_invalid_url());
    }

    #[test]
    fn test_max_content_length_constant() {
        assert_eq!(MAX_CONTENT_LENGTH, 10 * 1024 * 1024);
    }

    #[test]
    fn test_content_limit_compares_full_width() {
        assert!(!exceeds_content_limit(MAX_CONTENT_LENGTH as u64));
        assert!(exceeds_content_limit(MAX_CONTENT_LENGTH as u64 + 1));
        // Wraps to a small value if truncated to 32 bits.
        assert!(exceeds_content_limit((1u64 << 32) + 1));
    }

    #[test]
    fn test_decode_iso_8859_1_with_charset() {
        let iso_bytes: &[u8] = &[0x63, 0x61, 0x66, 0xe9];
        let decoded = decode_body(iso_bytes, Some("text/html; charset=iso-8859-1"));
        assert_eq!(decoded, "café");
    }

    #[test]
    fn test_decode_body_with_utf8_charset() {
        let decoded = decode_body("hello world".as_bytes(), Some("text/plain; charset=utf-8"));
        assert_eq!(decoded, "hello world");
    }

    #[test]
    fn test_is_private_ip_v4() {
        assert!(is_private_ip(&"10.0.0.1".parse().unwrap()));
        assert!(is_private_ip(&"172.16.0.1".parse().unwrap()));
        assert!(is_private_ip(&"172.31.255.255".parse().unwrap()));
        assert!(is_private_ip(&"192.168.1.1".parse().unwrap()));
        assert!(is_private_ip(&"127.0.0.1".parse().unwrap()));
        assert!(is_private_ip(&"169.254.0.1".parse().unwrap()));

        assert!(!is_private_ip(&"8.8.8.8".parse().unwrap()));
        assert!(!is_private_ip(&"172.32.0.1".parse().unwrap()));
    }

    #[test]
    fn test_is_private_ip_v6() {
        assert!(is_private_ip(&"::1".parse().unwrap()));
        assert!(is_private_ip(&"fd00::1".parse().unwrap()));
        assert!(is_private_ip(&"fe80::1".parse().unwrap()));
        assert!(!is_private_ip(&"2001:4860:4860::8888".parse().unwrap()));
    }

    #[test]
    fn test_extract_charset() {
        assert_eq!(
            extract_charset("text/html; charset=utf-8"),
            Some("utf-8".to_string())
        );
        assert_eq!(
            extract_charset("text/html; charset=\"ISO-8859-1\""),
            Some("iso-8859-1".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
    }

    #[test]
    fn test_extract_charset_with_spaces_around_equals() {
        assert_eq!(
            extract_charset("text/html; charset = utf-8"),
            Some("utf-8".to_string())
        );
        assert_eq!(
            extract_charset("text/html;charset= 'Shift_JIS'"),
            Some("shift_jis".to_string())
        );
        assert_eq!(extract_charset("text/html; boundary=x"), None);
    }
}
