//! Log-safe rendering of push endpoint URLs.
//!
//! Push endpoints are capability URLs: the full path is enough to send
//! messages to a browser, so log lines carry a compacted form instead.

/// Compact an endpoint URL for logging: scheme + host, then the last eight
/// characters of the path as a correlation hint.
///
/// Falls back to a plain char-boundary-safe prefix when the input does not
/// look like a URL.
pub fn compact_endpoint(endpoint: &str) -> String {
    if let Some(scheme_end) = endpoint.find("://") {
        let after_scheme = &endpoint[scheme_end + 3..];
        let host_end = after_scheme.find('/').unwrap_or(after_scheme.len());
        let host = &after_scheme[..host_end];
        let path = &after_scheme[host_end..];
        let tail = safe_suffix(path, 8);
        if tail.is_empty() {
            return format!("{}://{host}", &endpoint[..scheme_end]);
        }
        return format!("{}://{host}/…{tail}", &endpoint[..scheme_end]);
    }
    safe_prefix(endpoint, 24).to_string()
}

/// Longest prefix of `s` that is at most `max_bytes` and ends on a char
/// boundary.
fn safe_prefix(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Longest suffix of `s` that is at most `max_bytes` and starts on a char
/// boundary.
fn safe_suffix(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut start = s.len() - max_bytes;
    while start < s.len() && !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compacts_host_and_tail() {
        let compacted =
            compact_endpoint("https://fcm.googleapis.com/fcm/send/dKz9abcdEFGH123456789");
        assert!(compacted.starts_with("https://fcm.googleapis.com/…"));
        assert!(compacted.ends_with("23456789"));
        assert!(!compacted.contains("dKz9abcd"), "full token must not appear");
    }

    #[test]
    fn host_only_endpoint() {
        assert_eq!(
            compact_endpoint("https://push.example.com"),
            "https://push.example.com"
        );
    }

    #[test]
    fn non_url_falls_back_to_prefix() {
        assert_eq!(compact_endpoint("garbage"), "garbage");
        let long = "x".repeat(100);
        assert_eq!(compact_endpoint(&long).len(), 24);
    }

    #[test]
    fn multibyte_input_does_not_panic() {
        let compacted = compact_endpoint("https://push.example.com/ábcdéfghíjk");
        assert!(compacted.starts_with("https://push.example.com/…"));
        let _ = compact_endpoint("ábcdéfghíjklmnópqrstúvwxyzábcdéf");
    }
}
