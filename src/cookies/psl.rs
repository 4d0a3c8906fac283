//! Public Suffix List (PSL) oracle for cookie domain security and same-site checks.
//!
//! Prevents supercookie attacks by rejecting cookies set on public
//! suffixes like `.com`, `.co.uk`, etc., and derives the registrable
//! domain ("site") used to decide whether two URLs are same-site.
//!
//! Uses Mozilla's Public Suffix List via the `psl` crate.

use crate::cookies::matcher::{domain_match, is_ip_literal};
use psl::{List, Psl};

/// Check if a domain is a public suffix (e.g., "com", "co.uk").
/// Returns true if the domain itself is a public suffix.
pub fn is_public_suffix(domain: &str) -> bool {
    let domain_lower = domain.trim_end_matches('.').to_lowercase();
    if domain_lower.is_empty() || is_ip_literal(&domain_lower) {
        return false;
    }
    let domain_bytes = domain_lower.as_bytes();

    match List.suffix(domain_bytes) {
        Some(suffix) => suffix.as_bytes() == domain_bytes,
        None => false,
    }
}

/// Get the registrable domain (eTLD+1) for a domain.
/// For "sub.example.com", returns "example.com".
/// For "example.com", returns "example.com".
/// For "com" (public suffix) or an IP literal, returns None.
pub fn registrable_domain(domain: &str) -> Option<String> {
    let domain_lower = domain.trim_end_matches('.').to_lowercase();
    if is_ip_literal(&domain_lower) {
        return None;
    }
    psl::domain(domain_lower.as_bytes())
        .and_then(|d| std::str::from_utf8(d.as_bytes()).ok())
        .map(|s| s.to_string())
}

/// The site of a host: its registrable domain, or the lower-cased host
/// itself when it has none (IP literals, bare public suffixes, `localhost`).
pub fn site_for_host(host: &str) -> String {
    registrable_domain(host).unwrap_or_else(|| host.trim_end_matches('.').to_lowercase())
}

/// Whether two hosts belong to the same site.
pub fn is_same_site(a: &str, b: &str) -> bool {
    site_for_host(a) == site_for_host(b)
}

/// Check if a cookie domain is valid for a given URL.
/// The cookie domain must domain-match the URL's host and
/// must not be a public suffix.
pub fn is_valid_cookie_domain(cookie_domain: &str, url_host: &str) -> bool {
    let cookie_domain = cookie_domain.strip_prefix('.').unwrap_or(cookie_domain);
    let cookie_domain_lower = cookie_domain.to_lowercase();

    if is_public_suffix(&cookie_domain_lower) {
        return false;
    }

    domain_match(&cookie_domain_lower, url_host)
}
