//! URL Request Context - shared configuration for logical requests.
//!
//! Based on Chromium's net::URLRequestContext: bundles the transport every
//! hop goes through with the limits applied to redirects and cookie jars.

use crate::cookies::monster::CookieStoreConfig;
use crate::http::requestbody::RequestBody;
use crate::http::transport::Transport;
use http::HeaderMap;
use std::fmt;
use std::sync::Arc;

/// Chromium's redirect limit.
pub const DEFAULT_MAX_REDIRECTS: usize = 20;

/// Configuration options for URLRequestContext.
#[derive(Debug, Clone)]
pub struct URLRequestContextConfig {
    /// Redirects followed per logical request before giving up.
    pub max_redirects: usize,

    /// Limits for jars the context creates (static cookie maps, defaults).
    pub cookie_store: CookieStoreConfig,
}

impl Default for URLRequestContextConfig {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            cookie_store: CookieStoreConfig::default(),
        }
    }
}

/// Parameters of one logical request, as seen by cookie source factories.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: HeaderMap,
    pub body: RequestBody,
    /// Overrides [`URLRequestContextConfig::max_redirects`] when set.
    pub max_redirects: Option<usize>,
}

/// Transport plus configuration, shared by every request of a client.
#[derive(Clone)]
pub struct URLRequestContext {
    transport: Arc<dyn Transport>,
    config: URLRequestContextConfig,
}

impl URLRequestContext {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_config(transport, URLRequestContextConfig::default())
    }

    pub fn with_config(transport: Arc<dyn Transport>, config: URLRequestContextConfig) -> Self {
        Self { transport, config }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn config(&self) -> &URLRequestContextConfig {
        &self.config
    }

    pub fn max_redirects(&self) -> usize {
        self.config.max_redirects
    }
}

impl fmt::Debug for URLRequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("URLRequestContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
