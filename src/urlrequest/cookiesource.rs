//! Where a logical request gets its cookie jar from.
//!
//! The caller picks one [`CookieSource`] per request. It is resolved once,
//! before the first hop, into the jar used for the whole redirect loop.

use crate::cookies::canonical_cookie::{validate_name, validate_value, CanonicalCookie};
use crate::cookies::error::CookieRejection;
use crate::cookies::matcher::domain_match;
use crate::cookies::monster::{CookieMonster, CookieStoreConfig};
use crate::urlrequest::context::RequestOptions;
use http::Method;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::debug;
use url::Url;

/// Builds a jar from the parameters of the request about to start.
pub type CookieFactory =
    Arc<dyn Fn(&Method, &Url, &RequestOptions) -> Arc<CookieMonster> + Send + Sync>;

/// One entry of a static cookie source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticCookie {
    /// Sent to the origin host as a host-only `Path=/` cookie.
    Pair(String, String),
    /// A ready-made cookie keeping its own attributes. An empty domain
    /// stands for the origin host.
    Cookie(CanonicalCookie),
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for StaticCookie {
    fn from((name, value): (K, V)) -> Self {
        StaticCookie::Pair(name.into(), value.into())
    }
}

impl From<CanonicalCookie> for StaticCookie {
    fn from(cookie: CanonicalCookie) -> Self {
        StaticCookie::Cookie(cookie)
    }
}

/// Cookie handling for one logical request.
///
/// A request without any source behaves like [`CookieSource::None`].
#[derive(Clone, Default)]
pub enum CookieSource {
    /// No cookie handling at all: one transport call, redirects returned as is.
    #[default]
    None,
    /// A fresh, empty jar private to each request.
    Ephemeral,
    /// Cookies sent to the request's origin host, in order.
    /// Cookies set by responses live in a jar private to the request.
    Static(Vec<StaticCookie>),
    /// A jar read and written by the request, possibly shared with others.
    Jar(Arc<CookieMonster>),
    /// Called once per request to pick the jar.
    Factory(CookieFactory),
}

impl CookieSource {
    /// Static cookies from any list of name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        CookieSource::Static(
            pairs
                .into_iter()
                .map(|(k, v)| StaticCookie::Pair(k.into(), v.into()))
                .collect(),
        )
    }

    /// Static cookies from pairs, ready-made cookies, or a mix of both.
    pub fn from_static<I, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<StaticCookie>,
    {
        CookieSource::Static(entries.into_iter().map(Into::into).collect())
    }

    pub fn ephemeral() -> Self {
        CookieSource::Ephemeral
    }

    pub fn jar(jar: Arc<CookieMonster>) -> Self {
        CookieSource::Jar(jar)
    }

    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(&Method, &Url, &RequestOptions) -> Arc<CookieMonster> + Send + Sync + 'static,
    {
        CookieSource::Factory(Arc::new(f))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, CookieSource::None)
    }

    /// The jar for a request, or `None` when cookies are disabled.
    pub fn resolve(
        &self,
        method: &Method,
        url: &Url,
        options: &RequestOptions,
        config: &CookieStoreConfig,
    ) -> Option<Arc<CookieMonster>> {
        match self {
            CookieSource::None => None,
            CookieSource::Ephemeral => Some(Arc::new(CookieMonster::with_config(config.clone()))),
            CookieSource::Static(entries) => Some(Arc::new(seed_jar(entries, url, config))),
            CookieSource::Jar(jar) => Some(Arc::clone(jar)),
            CookieSource::Factory(factory) => Some(factory(method, url, options)),
        }
    }
}

/// A fresh jar seeded with every valid entry. Invalid entries are skipped.
fn seed_jar(entries: &[StaticCookie], url: &Url, config: &CookieStoreConfig) -> CookieMonster {
    let jar = CookieMonster::with_config(config.clone());
    let Some(host) = url.host_str() else {
        return jar;
    };
    let now = OffsetDateTime::now_utc();
    for entry in entries {
        let cookie = match entry {
            StaticCookie::Pair(name, value) => CanonicalCookie::new(
                name.clone(),
                value.clone(),
                host.to_string(),
                "/".to_string(),
                now,
                None,
            ),
            StaticCookie::Cookie(cookie) if cookie.domain.is_empty() => {
                let mut cookie = cookie.clone();
                cookie.domain = host.to_string();
                cookie.host_only = true;
                cookie
            }
            StaticCookie::Cookie(cookie) => cookie.clone(),
        };
        let name = cookie.name.clone();
        if let Err(reason) = store_static(&jar, cookie, host) {
            debug!(name = %name, url = %url, reason = %reason, "skipping static cookie");
        }
    }
    jar
}

fn store_static(jar: &CookieMonster, cookie: CanonicalCookie, host: &str) -> Result<(), CookieRejection> {
    validate_name(&cookie.name)?;
    validate_value(&cookie.value)?;
    let reaches_host = if cookie.host_only {
        cookie.domain.eq_ignore_ascii_case(host)
    } else {
        domain_match(&cookie.domain, host)
    };
    if !reaches_host {
        return Err(CookieRejection::DomainMismatch);
    }
    jar.set_canonical_cookie(cookie, true)
}

impl From<Arc<CookieMonster>> for CookieSource {
    fn from(jar: Arc<CookieMonster>) -> Self {
        CookieSource::Jar(jar)
    }
}

impl From<HashMap<String, String>> for CookieSource {
    fn from(map: HashMap<String, String>) -> Self {
        CookieSource::from_pairs(map)
    }
}

impl From<BTreeMap<String, String>> for CookieSource {
    fn from(map: BTreeMap<String, String>) -> Self {
        CookieSource::from_pairs(map)
    }
}

impl fmt::Debug for CookieSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CookieSource::None => f.write_str("None"),
            CookieSource::Ephemeral => f.write_str("Ephemeral"),
            CookieSource::Static(entries) => f.debug_tuple("Static").field(&entries.len()).finish(),
            CookieSource::Jar(jar) => f.debug_tuple("Jar").field(jar).finish(),
            CookieSource::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}
