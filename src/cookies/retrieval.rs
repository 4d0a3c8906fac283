//! Calling conditions that decide which stored cookies apply to a request.
//!
//! Built fresh for every outgoing hop and dropped right after the jar
//! lookup. The two constructors are disjoint: HTTP requests take
//! every flag from the caller (usually a [`RequestChain`]), while non-HTTP
//! consumers are always treated as same-site and secure.
//!
//! [`RequestChain`]: crate::urlrequest::chain::RequestChain

use http::Method;
use url::Url;

#[derive(Debug, Clone)]
pub struct CookieRetrieval {
    is_http: bool,
    url: Url,
    is_same_site: bool,
    is_secure: bool,
    is_request_method_safe: bool,
}

impl CookieRetrieval {
    pub fn for_http_request(url: Url, is_same_site: bool, is_secure: bool, is_safe: bool) -> Self {
        Self {
            is_http: true,
            url,
            is_same_site,
            is_secure,
            is_request_method_safe: is_safe,
        }
    }

    /// Same as [`for_http_request`](Self::for_http_request), with method safety
    /// taken from `method`.
    pub fn for_method(method: &Method, url: Url, is_same_site: bool, is_secure: bool) -> Self {
        Self::for_http_request(url, is_same_site, is_secure, method.is_safe())
    }

    pub fn for_non_http(url: Url) -> Self {
        Self {
            is_http: false,
            url,
            is_same_site: true,
            is_secure: true,
            is_request_method_safe: false,
        }
    }

    pub fn is_http(&self) -> bool {
        self.is_http
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn is_same_site(&self) -> bool {
        self.is_same_site
    }

    pub fn is_secure(&self) -> bool {
        self.is_secure
    }

    pub fn is_request_method_safe(&self) -> bool {
        self.is_request_method_safe
    }
}
