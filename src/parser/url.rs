//! HTTP URL validation for typed input.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

/// Absolute `http`/`https` URL shape accepted at the prompt.
///
/// Optional `www.` prefix, a host ending in a dot-separated top-level label of
/// 1-6 alphanumeric or parenthesis characters, then an optional path, query
/// and fragment tail.
#[allow(clippy::expect_used)]
static HTTP_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://(?:www\.)?[-a-zA-Z0-9@:%._\+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b(?:[-a-zA-Z0-9()@:%_\+.~#?&/=]*)$",
    )
    .expect("HTTP URL regex is valid") // Static pattern, safe to panic
});

/// Returns true if `candidate` is a syntactically valid absolute HTTP(S) URL.
///
/// This is a pure check: no network access happens and malformed input never
/// produces an error, only `false`.
///
/// # Examples
///
/// ```
/// use interactive_downloader::parser::is_valid_http_url;
///
/// assert!(is_valid_http_url("https://example.com/a/b.txt"));
/// assert!(!is_valid_http_url("ftp://x.com"));
/// assert!(!is_valid_http_url("not a url"));
/// ```
#[must_use]
pub fn is_valid_http_url(candidate: &str) -> bool {
    let valid = HTTP_URL_PATTERN.is_match(candidate);
    trace!(candidate, valid, "validated URL candidate");
    valid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_https_url_with_path() {
        assert!(is_valid_http_url("https://example.com/a/b.txt"));
    }

    #[test]
    fn test_accepts_http_url_without_path() {
        assert!(is_valid_http_url("http://example.com"));
        assert!(is_valid_http_url("http://example.com/"));
    }

    #[test]
    fn test_accepts_www_prefix_query_and_fragment() {
        assert!(is_valid_http_url(
            "https://www.example.org/docs/file.pdf?version=2&lang=en#page=3"
        ));
    }

    #[test]
    fn test_accepts_ip_host_with_port() {
        assert!(is_valid_http_url("http://127.0.0.1:8080/file.bin"));
    }

    #[test]
    fn test_rejects_empty_string() {
        assert!(!is_valid_http_url(""));
    }

    #[test]
    fn test_rejects_non_http_schemes() {
        assert!(!is_valid_http_url("ftp://x.com"));
        assert!(!is_valid_http_url("file:///etc/passwd"));
        assert!(!is_valid_http_url("mailto:someone@example.com"));
    }

    #[test]
    fn test_rejects_relative_paths() {
        assert!(!is_valid_http_url("/downloads/file.zip"));
        assert!(!is_valid_http_url("example.com/file.zip"));
    }

    #[test]
    fn test_rejects_plain_words() {
        assert!(!is_valid_http_url("not a url"));
        assert!(!is_valid_http_url("hello"));
        assert!(!is_valid_http_url("exit"));
    }

    #[test]
    fn test_rejects_malformed_hosts() {
        // No dot-separated top-level label
        assert!(!is_valid_http_url("http://localhost/file"));
        // Top-level label longer than six characters
        assert!(!is_valid_http_url("https://example.toolongtld"));
        assert!(!is_valid_http_url("https://"));
        assert!(!is_valid_http_url("https://exa mple.com"));
    }

    #[test]
    fn test_rejects_whitespace_in_tail() {
        assert!(!is_valid_http_url("https://example.com/a file.txt"));
    }
}
