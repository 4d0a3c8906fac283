//! The cookie-aware redirect loop.
//!
//! A [`URLRequestHttpJob`] runs one logical request: it attaches the jar's
//! cookies to each hop, stores every `Set-Cookie` the transport returns and
//! follows redirects until a final response, an error, or the redirect limit.

use crate::base::neterror::{NetError, RequestError};
use crate::cookies::monster::CookieMonster;
use crate::cookies::retrieval::CookieRetrieval;
use crate::http::response::HttpResponse;
use crate::http::transport::{HttpRequestInfo, Transport};
use crate::urlrequest::chain::RequestChain;
use crate::urlrequest::context::URLRequestContext;
use crate::urlrequest::redirectinfo::{RedirectInfo, CREDENTIAL_HEADERS};
use http::header::COOKIE;
use http::{HeaderMap, HeaderValue};
use std::sync::Arc;
use tracing::{debug, trace};
use url::Url;

pub struct URLRequestHttpJob {
    transport: Arc<dyn Transport>,
    request: HttpRequestInfo,
    cookie_store: Option<Arc<CookieMonster>>,
    chain: RequestChain,
    redirect_limit: usize,
    /// The caller's `Authorization` and `Cookie` headers, sent again whenever
    /// a hop lands back on the original host.
    credentials: HeaderMap,
}

impl URLRequestHttpJob {
    pub fn new(context: &URLRequestContext, request: HttpRequestInfo) -> Self {
        Self {
            transport: Arc::clone(context.transport()),
            request,
            cookie_store: None,
            chain: RequestChain::new(),
            redirect_limit: context.max_redirects(),
            credentials: HeaderMap::new(),
        }
    }

    /// Jar used for every hop. Without one the job makes a single transport
    /// call and hands back whatever it returns, redirects included.
    pub fn set_cookie_store(&mut self, cookie_store: Option<Arc<CookieMonster>>) {
        self.cookie_store = cookie_store;
    }

    pub fn set_redirect_limit(&mut self, limit: usize) {
        self.redirect_limit = limit;
    }

    /// Every URL visited so far, starting with the original one.
    pub fn url_chain(&self) -> &[Url] {
        self.chain.urls()
    }

    pub fn chain(&self) -> &RequestChain {
        &self.chain
    }

    /// The request as it will be (or was last) sent, minus jar cookies.
    pub fn request(&self) -> &HttpRequestInfo {
        &self.request
    }

    pub async fn start(&mut self) -> Result<HttpResponse, RequestError> {
        self.chain.start(self.request.url.clone());
        self.credentials = CREDENTIAL_HEADERS
            .iter()
            .filter_map(|name| {
                let value = self.request.headers.get(name)?;
                Some((name.clone(), value.clone()))
            })
            .collect();

        let Some(jar) = self.cookie_store.clone() else {
            let url = self.request.url.clone();
            let mut response = self.transport.send(self.request.clone()).await?;
            response.set_url(url);
            return Ok(response);
        };

        let mut redirects = 0;
        loop {
            let hop = self.prepare_hop(&jar);
            let url = hop.url.clone();

            let mut response = self.transport.send(hop).await?;
            response.set_url(url.clone());

            for line in response.set_cookie_lines() {
                if let Err(reason) = jar.parse_and_save_cookie(&url, line) {
                    debug!(url = %url, reason = %reason, "rejected Set-Cookie");
                }
            }

            if !response.is_redirect() {
                return Ok(response);
            }

            let Some(location) = response.location().map(str::to_owned) else {
                debug!(status = %response.status(), url = %url, "redirect without Location");
                return Err(redirect_error(NetError::InvalidRedirect, response));
            };

            if redirects >= self.redirect_limit {
                debug!(limit = self.redirect_limit, url = %url, "redirect limit reached");
                return Err(redirect_error(NetError::TooManyRedirects, response));
            }

            let info = match RedirectInfo::compute(
                response.status(),
                &self.request.method,
                &url,
                &location,
            ) {
                Ok(info) => info,
                Err(reason) => return Err(redirect_error(reason, response)),
            };

            debug!(
                status = %info.status,
                from = %url,
                to = %info.new_url,
                method = %info.new_method,
                "following redirect"
            );
            if info.strip_credentials {
                debug!(from = %url, to = %info.new_url, "cross-host redirect, stripping credentials");
            }

            info.apply(&mut self.request);
            let origin_host = self.chain.origin().and_then(Url::host_str);
            if info.strip_credentials && info.new_url.host_str() == origin_host {
                trace!(url = %info.new_url, "back on the original host, restoring credentials");
                for (name, value) in self.credentials.iter() {
                    self.request.headers.insert(name.clone(), value.clone());
                }
            }
            self.chain.next(info.new_url);
            redirects += 1;
        }
    }

    /// The request for the current hop: the caller's request plus the jar's
    /// cookies, appended after any caller-supplied `Cookie` header.
    fn prepare_hop(&self, jar: &CookieMonster) -> HttpRequestInfo {
        let mut hop = self.request.clone();
        let retrieval = CookieRetrieval::for_method(
            &hop.method,
            hop.url.clone(),
            self.chain.is_same_site(),
            self.chain.is_secure(),
        );

        let Some(jar_cookies) = jar.cookie_header(&retrieval) else {
            return hop;
        };
        trace!(url = %hop.url, len = jar_cookies.len(), "attaching cookies");

        let value = match hop.headers.get(COOKIE).and_then(|v| v.to_str().ok()) {
            Some(caller) if !caller.trim().is_empty() => format!("{caller}; {jar_cookies}"),
            _ => jar_cookies,
        };
        match HeaderValue::from_str(&value) {
            Ok(value) => {
                hop.headers.insert(COOKIE, value);
            }
            Err(_) => debug!(url = %hop.url, "Cookie header is not a valid header value"),
        }
        hop
    }
}

fn redirect_error(reason: NetError, response: HttpResponse) -> RequestError {
    RequestError::Redirect {
        reason,
        response: Box::new(response),
    }
}
