//! The transport seam.
//!
//! The redirect loop never talks to sockets. It hands one fully prepared
//! request at a time to a [`Transport`] and waits for the response, so any
//! HTTP stack (hyper, reqwest, an in-process mock) can sit underneath.

use crate::base::neterror::NetError;
use crate::http::requestbody::RequestBody;
use crate::http::response::HttpResponse;
use http::{HeaderMap, Method};
use futures::future::BoxFuture;
use std::{future::Future, sync::Arc};
use url::Url;

/// One request as handed to the transport.
/// Mirrors Chromium's `net::HttpRequestInfo`.
#[derive(Debug, Clone)]
pub struct HttpRequestInfo {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: RequestBody,
}

impl HttpRequestInfo {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
        }
    }

    /// Value of a header as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Alias for the `Future` type returned by a transport.
pub type Sending = BoxFuture<'static, Result<HttpResponse, NetError>>;

/// Sends a single HTTP request. Implementations must be thread-safe.
///
/// # Design Notes
///
/// - Each call is one exchange: no redirect following, no cookie handling.
/// - Cancellation and timeouts belong to the implementation; report them as
///   [`NetError::Aborted`] / [`NetError::TimedOut`].
/// - Returns boxed futures for trait object compatibility.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequestInfo) -> Sending;
}

/// Blanket implementation for Arc-wrapped transports.
impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: HttpRequestInfo) -> Sending {
        (**self).send(request)
    }
}

/// Adapts an async closure into a [`Transport`].
///
/// # Example
///
/// ```rust
/// use cookienet::http::response::HttpResponse;
/// use cookienet::http::transport::{transport_fn, HttpRequestInfo};
/// use http::StatusCode;
///
/// let transport = transport_fn(|_req: HttpRequestInfo| async move {
///     Ok(HttpResponse::new(StatusCode::OK).with_body("hello"))
/// });
/// # let _ = transport;
/// ```
pub struct FnTransport<F> {
    f: F,
}

pub fn transport_fn<F, Fut>(f: F) -> FnTransport<F>
where
    F: Fn(HttpRequestInfo) -> Fut + Send + Sync,
    Fut: Future<Output = Result<HttpResponse, NetError>> + Send + 'static,
{
    FnTransport { f }
}

impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn(HttpRequestInfo) -> Fut + Send + Sync,
    Fut: Future<Output = Result<HttpResponse, NetError>> + Send + 'static,
{
    fn send(&self, request: HttpRequestInfo) -> Sending {
        Box::pin((self.f)(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[tokio::test]
    async fn test_fn_transport_sends() {
        let transport = transport_fn(|req: HttpRequestInfo| async move {
            Ok(HttpResponse::new(StatusCode::OK).with_body(req.url.path().to_string()))
        });
        let req = HttpRequestInfo::new(Method::GET, Url::parse("http://a.test/x").unwrap());
        let resp = transport.send(req).await.unwrap();
        assert_eq!(resp.body().as_ref(), b"/x");
    }

    #[tokio::test]
    async fn test_arc_transport_forwards_errors() {
        let transport: Arc<dyn Transport> = Arc::new(transport_fn(|_req: HttpRequestInfo| {
            std::future::ready(Err(NetError::ConnectionRefused))
        }));
        let req = HttpRequestInfo::new(Method::GET, Url::parse("http://a.test/").unwrap());
        let err = transport.send(req).await.unwrap_err();
        assert_eq!(err, NetError::ConnectionRefused);
    }
}
