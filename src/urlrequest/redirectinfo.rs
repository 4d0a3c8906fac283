//! Redirect transformation rules.
//!
//! Based on Chromium's `net::RedirectInfo` and `net::RedirectUtil`: given a
//! redirect response, decide the next method, URL and body, and which request
//! headers must not follow the redirect.

use crate::base::neterror::NetError;
use crate::http::requestbody::RequestBody;
use crate::http::transport::HttpRequestInfo;
use http::header::{
    HeaderName, AUTHORIZATION, CONTENT_ENCODING, CONTENT_LANGUAGE, CONTENT_LENGTH,
    CONTENT_LOCATION, CONTENT_TYPE, COOKIE,
};
use http::{Method, StatusCode};
use url::Url;

/// Headers describing a request body. They go away together with the body.
const BODY_HEADERS: [HeaderName; 5] = [
    CONTENT_TYPE,
    CONTENT_LENGTH,
    CONTENT_ENCODING,
    CONTENT_LANGUAGE,
    CONTENT_LOCATION,
];

/// Headers carrying credentials. Removed when a redirect changes host.
pub(crate) const CREDENTIAL_HEADERS: [HeaderName; 2] = [AUTHORIZATION, COOKIE];

/// What the next hop of a redirect looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectInfo {
    pub status: StatusCode,
    pub new_method: Method,
    pub new_url: Url,
    /// The method was rewritten to GET, so the body is not resent.
    pub drop_body: bool,
    /// The target host differs from the current one.
    pub strip_credentials: bool,
}

impl RedirectInfo {
    /// Compute the next hop for a `status` response with `location`, received
    /// for a `method` request to `current_url`.
    ///
    /// Fails with [`NetError::InvalidRedirect`] when `location` does not
    /// resolve to a URL and with [`NetError::UnsafeRedirect`] when it resolves
    /// to a scheme other than http or https.
    pub fn compute(
        status: StatusCode,
        method: &Method,
        current_url: &Url,
        location: &str,
    ) -> Result<Self, NetError> {
        let new_url = current_url
            .join(location.trim())
            .map_err(|_| NetError::InvalidRedirect)?;
        if !matches!(new_url.scheme(), "http" | "https") {
            return Err(NetError::UnsafeRedirect);
        }

        let new_method = redirect_method(status, method);
        let drop_body = new_method != *method;
        let strip_credentials = new_url.host_str() != current_url.host_str();

        Ok(Self {
            status,
            new_method,
            new_url,
            drop_body,
            strip_credentials,
        })
    }

    /// Rewrite `request` in place for the next hop.
    pub fn apply(&self, request: &mut HttpRequestInfo) {
        request.method = self.new_method.clone();
        request.url = self.new_url.clone();
        if self.drop_body {
            request.body = RequestBody::Empty;
            for name in BODY_HEADERS.iter() {
                request.headers.remove(name);
            }
        }
        if self.strip_credentials {
            for name in CREDENTIAL_HEADERS.iter() {
                request.headers.remove(name);
            }
        }
    }
}

/// Method for the request that follows a redirect.
///
/// 303 turns everything but GET and HEAD into GET; 301 and 302 only rewrite
/// POST; 307 and 308 never change the method. HEAD always stays HEAD.
pub fn redirect_method(status: StatusCode, method: &Method) -> Method {
    if *method == Method::HEAD {
        return Method::HEAD;
    }
    let to_get = if status == StatusCode::SEE_OTHER {
        *method != Method::GET
    } else if status == StatusCode::MOVED_PERMANENTLY || status == StatusCode::FOUND {
        *method == Method::POST
    } else {
        false
    };
    if to_get {
        Method::GET
    } else {
        method.clone()
    }
}
