//! HTTP Response with body access.

use crate::base::neterror::NetError;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, LOCATION, SET_COOKIE};
use http::{HeaderMap, StatusCode};
use url::Url;

/// Status codes the redirect loop follows.
pub const REDIRECT_STATUSES: [StatusCode; 5] = [
    StatusCode::MOVED_PERMANENTLY,
    StatusCode::FOUND,
    StatusCode::SEE_OTHER,
    StatusCode::TEMPORARY_REDIRECT,
    StatusCode::PERMANENT_REDIRECT,
];

/// HTTP Response as returned by a transport and handed back to the caller.
///
/// Headers are multi-valued: every `Set-Cookie` occurrence is kept as its
/// own entry.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    url: Option<Url>,
}

impl HttpResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            url: None,
        }
    }

    /// Append a header value. Invalid names or values are ignored.
    pub fn with_header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: TryInto<HeaderName>,
        V: TryInto<HeaderValue>,
    {
        if let (Ok(k), Ok(v)) = (key.try_into(), value.try_into()) {
            self.headers.append(k, v);
        }
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body<B: Into<Bytes>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get a reference to the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// URL of the hop that produced this response, once the request loop has seen it.
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub(crate) fn set_url(&mut self, url: Url) {
        self.url = Some(url);
    }

    /// Whether the status is one the redirect loop follows.
    pub fn is_redirect(&self) -> bool {
        REDIRECT_STATUSES.contains(&self.status)
    }

    /// The `Location` header, if present and valid UTF-8.
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    /// Every `Set-Cookie` value, in the order received.
    pub fn set_cookie_lines(&self) -> impl Iterator<Item = &str> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
    }

    /// Convenience method to consume body as text.
    pub fn text(&self) -> Result<String, NetError> {
        String::from_utf8(self.body.to_vec()).map_err(|_| NetError::ContentDecodingFailed)
    }

    /// Convenience method to consume body as JSON.
    #[cfg(feature = "json")]
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, NetError> {
        serde_json::from_slice(&self.body).map_err(|_| NetError::ContentDecodingFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_cookie_values_stay_separate() {
        let resp = HttpResponse::new(StatusCode::OK)
            .with_header(SET_COOKIE, "a=1")
            .with_header(SET_COOKIE, "b=2; Path=/");
        let lines: Vec<&str> = resp.set_cookie_lines().collect();
        assert_eq!(lines, vec!["a=1", "b=2; Path=/"]);
    }

    #[test]
    fn test_redirect_statuses() {
        for code in [301u16, 302, 303, 307, 308] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(HttpResponse::new(status).is_redirect());
        }
        assert!(!HttpResponse::new(StatusCode::NOT_MODIFIED).is_redirect());
        assert!(!HttpResponse::new(StatusCode::OK).is_redirect());
    }

    #[test]
    fn test_location_and_text() {
        let resp = HttpResponse::new(StatusCode::FOUND)
            .with_header(LOCATION, "/next")
            .with_body("moved");
        assert_eq!(resp.location(), Some("/next"));
        assert_eq!(resp.text().unwrap(), "moved");
    }

    #[test]
    fn test_invalid_header_ignored() {
        let resp = HttpResponse::new(StatusCode::OK).with_header("bad header", "x");
        assert!(resp.headers().is_empty());
    }
}
