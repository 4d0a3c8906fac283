//! Redirect chain with same-site tracking.
//!
//! One [`RequestChain`] lives for one logical request. It remembers every URL
//! visited and whether the chain is still same-site with its origin. A single
//! cross-site hop taints the rest of the chain, even if a later hop comes back
//! to the origin's site.

use crate::cookies::canonical_cookie::is_secure_scheme;
use crate::cookies::psl::site_for_host;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, Default)]
enum State {
    #[default]
    Unvisited,
    Active {
        origin_site: String,
        same_site: bool,
    },
}

/// Ordered, append-only list of the URLs of one logical request.
#[derive(Debug, Clone, Default)]
pub struct RequestChain {
    urls: Vec<Url>,
    state: State,
}

fn site_of(url: &Url) -> String {
    site_for_host(url.host_str().unwrap_or_default())
}

impl RequestChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin the chain at `origin`. Starting an active chain again resets it.
    pub fn start(&mut self, origin: Url) {
        let origin_site = site_of(&origin);
        debug!(url = %origin, site = %origin_site, "request chain started");
        self.urls.clear();
        self.urls.push(origin);
        self.state = State::Active {
            origin_site,
            same_site: true,
        };
    }

    /// Record a redirect hop to `url`.
    ///
    /// Calling this on an unvisited chain starts it at `url` instead.
    pub fn next(&mut self, url: Url) {
        match &mut self.state {
            State::Unvisited => {
                debug!(url = %url, "next() on an unvisited chain, starting it");
                self.start(url);
            }
            State::Active {
                origin_site,
                same_site,
            } => {
                let site = site_of(&url);
                let was_same_site = *same_site;
                *same_site = *same_site && site == *origin_site;
                if was_same_site && !*same_site {
                    debug!(url = %url, site = %site, origin = %origin_site, "chain became cross-site");
                }
                self.urls.push(url);
            }
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self.state, State::Active { .. })
    }

    /// Whether every hop so far shares the origin's registrable domain.
    /// An unvisited chain has no cross-site hop and reports `true`.
    pub fn is_same_site(&self) -> bool {
        match &self.state {
            State::Unvisited => true,
            State::Active { same_site, .. } => *same_site,
        }
    }

    /// Whether the current URL uses a secure scheme.
    pub fn is_secure(&self) -> bool {
        self.current()
            .map(|url| is_secure_scheme(url.scheme()))
            .unwrap_or(false)
    }

    /// The URL the chain started at.
    pub fn origin(&self) -> Option<&Url> {
        self.urls.first()
    }

    /// The latest URL of the chain.
    pub fn current(&self) -> Option<&Url> {
        self.urls.last()
    }

    pub fn urls(&self) -> &[Url] {
        &self.urls
    }

    /// Number of redirects followed so far.
    pub fn redirect_count(&self) -> usize {
        self.urls.len().saturating_sub(1)
    }
}
