//! Domain and path matching (RFC 6265bis §5.1.3, §5.1.4).
//!
//! Pure predicates shared by the parser (attribute validation) and the jar
//! (retrieval scoping).

use std::net::IpAddr;

/// Whether `host` is an IPv4 or IPv6 literal. Bracketed IPv6 (`[::1]`) is accepted.
pub fn is_ip_literal(host: &str) -> bool {
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    bare.parse::<IpAddr>().is_ok()
}

/// Check if `request_host` domain-matches `cookie_domain`.
///
/// True on exact (case-insensitive) equality, or when `cookie_domain` is a
/// dot-separated suffix of `request_host`. IP literals only match exactly.
pub fn domain_match(cookie_domain: &str, request_host: &str) -> bool {
    if cookie_domain.eq_ignore_ascii_case(request_host) {
        return true;
    }

    if cookie_domain.is_empty() || is_ip_literal(request_host) {
        return false;
    }

    if request_host.len() <= cookie_domain.len() {
        return false;
    }

    // Byte-wise so a non-ASCII host never splits inside a character.
    let host = request_host.as_bytes();
    let split = host.len() - cookie_domain.len();
    host[split..].eq_ignore_ascii_case(cookie_domain.as_bytes()) && host[split - 1] == b'.'
}

/// Check if `request_path` path-matches `cookie_path`.
pub fn path_match(cookie_path: &str, request_path: &str) -> bool {
    if cookie_path == request_path {
        return true;
    }

    match request_path.strip_prefix(cookie_path) {
        Some(rest) => cookie_path.ends_with('/') || rest.starts_with('/'),
        None => false,
    }
}

/// The default-path of a request path: everything up to, not including,
/// the right-most `/`, or `/` when there is nothing before it.
pub fn default_path(request_path: &str) -> &str {
    if !request_path.starts_with('/') {
        return "/";
    }

    match request_path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &request_path[..idx],
    }
}
