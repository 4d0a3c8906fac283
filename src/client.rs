//! HTTP Client with builder pattern.
//!
//! Provides a high-level, ergonomic API over [`URLRequestHttpJob`]: pick a
//! transport once, then issue requests that follow redirects and keep cookies.
//!
//! # Example
//!
//! ```rust
//! use cookienet::client::Client;
//! use cookienet::http::response::HttpResponse;
//! use cookienet::http::transport::{transport_fn, HttpRequestInfo};
//! use http::StatusCode;
//!
//! # async fn run() -> Result<(), cookienet::base::neterror::RequestError> {
//! let client = Client::builder(transport_fn(|_req: HttpRequestInfo| async move {
//!     Ok(HttpResponse::new(StatusCode::OK).with_body("hello"))
//! }))
//! .max_redirects(5)
//! .build();
//!
//! let resp = client.get("https://example.com").send().await?;
//! assert_eq!(resp.status(), StatusCode::OK);
//! # Ok(())
//! # }
//! ```

use crate::base::neterror::{NetError, RequestError};
use crate::cookies::monster::{CookieMonster, CookieStoreConfig};
use crate::http::requestbody::RequestBody;
use crate::http::response::HttpResponse;
use crate::http::transport::{HttpRequestInfo, Transport};
use crate::urlrequest::context::{RequestOptions, URLRequestContext, URLRequestContextConfig};
use crate::urlrequest::cookiesource::CookieSource;
use crate::urlrequest::job::URLRequestHttpJob;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use std::sync::Arc;
use url::Url;

/// HTTP Client for making requests.
///
/// Cheap to clone; clones share the transport and the default cookie source.
/// Use [`Client::builder()`] to configure and create a client.
#[derive(Clone, Debug)]
pub struct Client {
    context: URLRequestContext,
    base_url: Option<Url>,
    default_headers: HeaderMap,
    cookies: Option<CookieSource>,
}

impl Client {
    /// Create a new client with default settings.
    pub fn new<T: Transport + 'static>(transport: T) -> Self {
        Self::builder(transport).build()
    }

    /// Create a new client builder.
    pub fn builder<T: Transport + 'static>(transport: T) -> ClientBuilder {
        ClientBuilder::new(Arc::new(transport))
    }

    pub fn context(&self) -> &URLRequestContext {
        &self.context
    }

    /// Start building a GET request.
    pub fn get<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    /// Start building a POST request.
    pub fn post<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    /// Start building a PUT request.
    pub fn put<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::PUT, url)
    }

    /// Start building a DELETE request.
    pub fn delete<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::DELETE, url)
    }

    /// Start building a HEAD request.
    pub fn head<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::HEAD, url)
    }

    /// Start building a PATCH request.
    pub fn patch<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::PATCH, url)
    }

    /// Start building a request with custom method.
    pub fn request<U: AsRef<str>>(&self, method: Method, url: U) -> RequestBuilder {
        RequestBuilder {
            client: self.clone(),
            method,
            url: url.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
            max_redirects: None,
            cookies: None,
        }
    }

    fn resolve_url(&self, url: &str) -> Result<Url, NetError> {
        let url = match &self.base_url {
            Some(base) => base.join(url),
            None => Url::parse(url),
        }
        .map_err(|_| NetError::InvalidUrl)?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(NetError::DisallowedUrlScheme);
        }
        Ok(url)
    }
}

/// Builder for creating a [`Client`].
pub struct ClientBuilder {
    transport: Arc<dyn Transport>,
    config: URLRequestContextConfig,
    base_url: Option<Url>,
    default_headers: HeaderMap,
    cookies: Option<CookieSource>,
}

impl ClientBuilder {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config: URLRequestContextConfig::default(),
            base_url: None,
            default_headers: HeaderMap::new(),
            cookies: None,
        }
    }

    /// Base URL relative request URLs are resolved against.
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Redirects followed per request unless the request says otherwise.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config.max_redirects = max;
        self
    }

    /// Limits for the jars the client creates itself.
    pub fn cookie_store_config(mut self, config: CookieStoreConfig) -> Self {
        self.config.cookie_store = config;
        self
    }

    /// Cookie source for requests that do not set their own.
    ///
    /// Without one, requests skip cookie handling and redirect following.
    /// [`CookieSource::Ephemeral`] gives each request a fresh jar instead.
    pub fn cookies(mut self, source: CookieSource) -> Self {
        self.cookies = Some(source);
        self
    }

    /// Share one jar between every request of the client.
    pub fn cookie_store(self, store: Arc<CookieMonster>) -> Self {
        self.cookies(CookieSource::Jar(store))
    }

    /// Header sent with every request.
    pub fn default_header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: TryInto<HeaderName>,
        V: TryInto<HeaderValue>,
    {
        if let (Ok(k), Ok(v)) = (key.try_into(), value.try_into()) {
            self.default_headers.insert(k, v);
        }
        self
    }

    /// Build the client.
    pub fn build(self) -> Client {
        Client {
            context: URLRequestContext::with_config(self.transport, self.config),
            base_url: self.base_url,
            default_headers: self.default_headers,
            cookies: self.cookies,
        }
    }
}

/// Builder for a single request.
#[derive(Debug)]
pub struct RequestBuilder {
    client: Client,
    method: Method,
    url: String,
    headers: HeaderMap,
    body: RequestBody,
    max_redirects: Option<usize>,
    cookies: Option<CookieSource>,
}

impl RequestBuilder {
    /// Add a header, replacing any default header of the same name.
    pub fn header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: TryInto<HeaderName>,
        V: TryInto<HeaderValue>,
    {
        if let (Ok(k), Ok(v)) = (key.try_into(), value.try_into()) {
            self.headers.insert(k, v);
        }
        self
    }

    /// Set request body.
    pub fn body<B: Into<RequestBody>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    /// Set JSON body.
    #[cfg(feature = "json")]
    pub fn json<T: serde::Serialize>(mut self, json: &T) -> Self {
        if let Ok(bytes) = serde_json::to_vec(json) {
            self.body = RequestBody::from(bytes);
            self.headers.insert(
                http::header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }
        self
    }

    /// Override the client's redirect limit for this request.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = Some(max);
        self
    }

    /// Override the client's cookie source for this request.
    pub fn cookies(mut self, source: CookieSource) -> Self {
        self.cookies = Some(source);
        self
    }

    /// Send the request.
    pub async fn send(self) -> Result<HttpResponse, RequestError> {
        let RequestBuilder {
            client,
            method,
            url,
            headers,
            body,
            max_redirects,
            cookies,
        } = self;

        let url = client.resolve_url(&url)?;

        let mut merged = client.default_headers.clone();
        for (name, value) in headers.iter() {
            merged.insert(name.clone(), value.clone());
        }

        let options = RequestOptions {
            headers: merged,
            body,
            max_redirects,
        };

        let config = client.context.config();
        let jar = cookies
            .as_ref()
            .or(client.cookies.as_ref())
            .and_then(|source| source.resolve(&method, &url, &options, &config.cookie_store));

        let redirect_limit = options.max_redirects.unwrap_or(config.max_redirects);
        let request = HttpRequestInfo {
            method,
            url,
            headers: options.headers,
            body: options.body,
        };

        let mut job = URLRequestHttpJob::new(&client.context, request);
        job.set_cookie_store(jar);
        job.set_redirect_limit(redirect_limit);
        job.start().await
    }
}
