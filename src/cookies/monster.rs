use crate::cookies::canonical_cookie::{is_secure_scheme, CanonicalCookie, SameSite};
use crate::cookies::error::CookieRejection;
use crate::cookies::matcher::{domain_match, path_match};
use crate::cookies::psl::site_for_host;
use crate::cookies::retrieval::CookieRetrieval;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use time::OffsetDateTime;
use url::Url;

/// Maximum cookies per registrable domain (Chromium default).
const MAX_COOKIES_PER_DOMAIN: usize = 50;

/// Maximum total cookies (Current Chromenet limit: 3000).
/// Chromium uses 3300, but we use a slightly lower limit to keep memory usage predictable.
const MAX_COOKIES_TOTAL: usize = 3000;

/// Limits applied by the jar and by [`CanonicalCookie::create`].
#[derive(Debug, Clone)]
pub struct CookieStoreConfig {
    pub max_cookies_per_domain: usize,
    pub max_cookies_total: usize,
    /// Combined byte length of name and value.
    pub max_name_value_size: usize,
    pub max_attribute_value_size: usize,
}

impl Default for CookieStoreConfig {
    fn default() -> Self {
        Self {
            max_cookies_per_domain: MAX_COOKIES_PER_DOMAIN,
            max_cookies_total: MAX_COOKIES_TOTAL,
            max_name_value_size: 4096,
            max_attribute_value_size: 1024,
        }
    }
}

/// A stored cookie plus its insertion sequence, the final ordering tie-break.
#[derive(Debug, Clone)]
struct Slot {
    seq: u64,
    cookie: CanonicalCookie,
}

#[derive(Debug, Default)]
struct Store {
    // Map<RegistrableDomain, List<Cookie>>
    cookies: HashMap<String, Vec<Slot>>,
    next_seq: u64,
}

impl Store {
    fn total(&self) -> usize {
        self.cookies.values().map(Vec::len).sum()
    }
}

/// The main entry point for cookie management.
/// Modeled after Chromium's `net::CookieMonster`.
///
/// One mutex guards the whole store: overwrite and eviction decisions
/// always see a consistent snapshot. The lock is never held across an await.
pub struct CookieMonster {
    store: Mutex<Store>,
    config: CookieStoreConfig,
}

impl Default for CookieMonster {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CookieMonster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieMonster")
            .field("cookies", &self.total_cookie_count())
            .field("config", &self.config)
            .finish()
    }
}

impl CookieMonster {
    pub fn new() -> Self {
        Self::with_config(CookieStoreConfig::default())
    }

    pub fn with_config(config: CookieStoreConfig) -> Self {
        Self {
            store: Mutex::new(Store::default()),
            config,
        }
    }

    pub fn config(&self) -> &CookieStoreConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a cookie received over HTTP. `source_secure` tells whether the
    /// response that carried it came over a secure channel.
    ///
    /// A cookie whose expiry has passed deletes its slot instead of filling it.
    pub fn set_canonical_cookie(
        &self,
        cookie: CanonicalCookie,
        source_secure: bool,
    ) -> Result<(), CookieRejection> {
        self.set_cookie_internal(cookie, source_secure, true)
    }

    /// Store a cookie on behalf of a non-HTTP API. Such callers can neither
    /// create nor replace `HttpOnly` cookies.
    pub fn set_cookie_from_non_http(&self, cookie: CanonicalCookie) -> Result<(), CookieRejection> {
        self.set_cookie_internal(cookie, true, false)
    }

    fn set_cookie_internal(
        &self,
        mut cookie: CanonicalCookie,
        source_secure: bool,
        is_http: bool,
    ) -> Result<(), CookieRejection> {
        if cookie.same_site == SameSite::NoRestriction && !cookie.secure {
            return Err(CookieRejection::NoneRequiresSecure);
        }
        if cookie.http_only && !is_http {
            return Err(CookieRejection::HttpOnlyFromNonHttp);
        }

        let now = OffsetDateTime::now_utc();
        let key = site_for_host(&cookie.domain);
        let mut guard = self.lock();
        let store = &mut *guard;
        let bucket = store.cookies.entry(key.clone()).or_default();

        let mut seq = None;
        if let Some(pos) = bucket.iter().position(|s| s.cookie.is_equivalent(&cookie)) {
            let existing = &bucket[pos].cookie;
            if existing.secure && !cookie.secure && !source_secure {
                return Err(CookieRejection::OverwriteSecure);
            }
            if existing.http_only && !is_http {
                return Err(CookieRejection::HttpOnlyFromNonHttp);
            }
            let old = bucket.remove(pos);
            cookie.creation_time = old.cookie.creation_time;
            seq = Some(old.seq);
        }

        if cookie.is_expired(now) {
            tracing::debug!(name = %cookie.name, domain = %cookie.domain, "cookie deleted by past expiry");
            if bucket.is_empty() {
                store.cookies.remove(&key);
            }
            return Ok(());
        }

        let seq = seq.unwrap_or_else(|| {
            let next = store.next_seq;
            store.next_seq += 1;
            next
        });
        bucket.push(Slot { seq, cookie });

        self.enforce_domain_limit(store, &key, seq, now);
        self.enforce_global_limit(store, seq, now);
        Ok(())
    }

    /// Evict from one registrable domain: expired cookies first, then
    /// least recently accessed. `keep` is never evicted.
    fn enforce_domain_limit(&self, store: &mut Store, key: &str, keep: u64, now: OffsetDateTime) {
        let Some(bucket) = store.cookies.get_mut(key) else {
            return;
        };
        if bucket.len() <= self.config.max_cookies_per_domain {
            return;
        }

        bucket.retain(|s| !s.cookie.is_expired(now));
        while bucket.len() > self.config.max_cookies_per_domain {
            let Some(idx) = least_recently_used(bucket.iter().enumerate(), keep) else {
                break;
            };
            let evicted = bucket.remove(idx);
            tracing::debug!(name = %evicted.cookie.name, domain = %key, "evicted cookie over per-domain limit");
        }
    }

    /// Enforce the global cookie limit by evicting the least recently
    /// accessed cookies across all domains.
    fn enforce_global_limit(&self, store: &mut Store, keep: u64, now: OffsetDateTime) {
        if store.total() <= self.config.max_cookies_total {
            return;
        }

        for bucket in store.cookies.values_mut() {
            bucket.retain(|s| !s.cookie.is_expired(now));
        }

        while store.total() > self.config.max_cookies_total {
            let mut oldest: Option<(String, usize, OffsetDateTime, u64)> = None;
            for (domain, bucket) in store.cookies.iter() {
                for (idx, slot) in bucket.iter().enumerate() {
                    if slot.seq == keep {
                        continue;
                    }
                    let candidate = (slot.cookie.last_access_time, slot.seq);
                    let older = oldest
                        .as_ref()
                        .map_or(true, |(_, _, time, seq)| candidate < (*time, *seq));
                    if older {
                        oldest = Some((domain.clone(), idx, candidate.0, candidate.1));
                    }
                }
            }

            let Some((domain, idx, _, _)) = oldest else {
                break;
            };
            if let Some(bucket) = store.cookies.get_mut(&domain) {
                let evicted = bucket.remove(idx);
                tracing::debug!(name = %evicted.cookie.name, domain = %domain, "evicted cookie over global limit");
            }
        }

        store.cookies.retain(|_, bucket| !bucket.is_empty());
    }

    /// Retrieve the cookies that apply to `retrieval`, in `Cookie` header order:
    /// longer paths first, then earlier creation time.
    ///
    /// Every returned cookie has its last access time refreshed.
    pub fn get_cookies(&self, retrieval: &CookieRetrieval) -> Vec<CanonicalCookie> {
        let url = retrieval.url();
        let Some(host) = url.host_str() else {
            return Vec::new();
        };
        let host = host.to_lowercase();
        let now = OffsetDateTime::now_utc();

        let mut guard = self.lock();
        let Some(bucket) = guard.cookies.get_mut(&site_for_host(&host)) else {
            return Vec::new();
        };
        bucket.retain(|s| !s.cookie.is_expired(now));

        let mut result: Vec<(u64, CanonicalCookie)> = Vec::new();
        for slot in bucket.iter_mut() {
            if !Self::is_included(&slot.cookie, &host, url.path(), retrieval) {
                continue;
            }
            slot.cookie.last_access_time = now;
            result.push((slot.seq, slot.cookie.clone()));
        }
        drop(guard);

        result.sort_by(|(seq_a, a), (seq_b, b)| {
            b.path
                .len()
                .cmp(&a.path.len())
                .then_with(|| a.creation_time.cmp(&b.creation_time))
                .then_with(|| seq_a.cmp(seq_b))
        });

        result.into_iter().map(|(_, c)| c).collect()
    }

    fn is_included(
        cookie: &CanonicalCookie,
        host: &str,
        path: &str,
        retrieval: &CookieRetrieval,
    ) -> bool {
        let domain_ok = if cookie.host_only {
            cookie.domain.eq_ignore_ascii_case(host)
        } else {
            domain_match(&cookie.domain, host)
        };
        if !domain_ok || !path_match(&cookie.path, path) {
            return false;
        }

        if cookie.secure && !retrieval.is_secure() {
            return false;
        }

        if cookie.http_only && !retrieval.is_http() {
            return false;
        }

        // Outside a browser there is no top-level navigation, so a safe
        // method is the only way for Lax cookies to cross sites.
        match cookie.same_site {
            SameSite::Strict => retrieval.is_same_site(),
            SameSite::Lax => retrieval.is_same_site() || retrieval.is_request_method_safe(),
            SameSite::NoRestriction => true,
        }
    }

    /// Cookies for a same-site, safe HTTP request to `url`.
    pub fn get_cookies_for_url(&self, url: &Url) -> Vec<CanonicalCookie> {
        let retrieval = CookieRetrieval::for_http_request(
            url.clone(),
            true,
            is_secure_scheme(url.scheme()),
            true,
        );
        self.get_cookies(&retrieval)
    }

    /// Retrieve and serialize in one step. `None` means no header is sent.
    pub fn cookie_header(&self, retrieval: &CookieRetrieval) -> Option<String> {
        Self::serialize_cookie_header(&self.get_cookies(retrieval))
    }

    /// Format cookies as "name=value; name2=value2", preserving their order.
    pub fn serialize_cookie_header(cookies: &[CanonicalCookie]) -> Option<String> {
        if cookies.is_empty() {
            return None;
        }
        Some(
            cookies
                .iter()
                .map(|c| format!("{}={}", c.name, c.value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Parse a `Set-Cookie` line received from `url` and store the result.
    pub fn parse_and_save_cookie(&self, url: &Url, cookie_line: &str) -> Result<(), CookieRejection> {
        let cookie = CanonicalCookie::create(
            url,
            cookie_line,
            OffsetDateTime::now_utc(),
            &self.config,
        )?;
        self.set_canonical_cookie(cookie, is_secure_scheme(url.scheme()))
    }

    /// Remove every cookie matching `predicate`. Returns how many were removed.
    pub fn evict<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&CanonicalCookie) -> bool,
    {
        let mut guard = self.lock();
        let before = guard.total();
        for bucket in guard.cookies.values_mut() {
            bucket.retain(|s| !predicate(&s.cookie));
        }
        guard.cookies.retain(|_, bucket| !bucket.is_empty());
        before - guard.total()
    }

    /// Drop every cookie whose expiry has passed.
    pub fn purge_expired(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        self.evict(|c| c.is_expired(now))
    }

    /// Get total cookie count.
    pub fn total_cookie_count(&self) -> usize {
        self.lock().total()
    }

    /// Clear all cookies.
    pub fn clear(&self) {
        self.lock().cookies.clear();
    }

    /// Snapshot of every stored cookie, in insertion order.
    pub fn all(&self) -> Vec<CanonicalCookie> {
        let guard = self.lock();
        let mut slots: Vec<&Slot> = guard.cookies.values().flatten().collect();
        slots.sort_by_key(|s| s.seq);
        slots.into_iter().map(|s| s.cookie.clone()).collect()
    }

    /// Export cookies to Netscape cookie format.
    ///
    /// The Netscape format is widely used by curl, wget, and other tools.
    /// Each line has the format:
    /// `domain\tinclude_subdomains\tpath\tsecure\texpiry\tname\tvalue`
    /// HttpOnly cookies get curl's `#HttpOnly_` domain prefix.
    pub fn export_netscape(&self, domain_filter: Option<&str>) -> String {
        let mut lines = vec![
            "# Netscape HTTP Cookie File".to_string(),
            "# https://curl.se/docs/http-cookies.html".to_string(),
            "# This file was generated by cookienet".to_string(),
            String::new(),
        ];

        for cookie in self.all() {
            if let Some(filter) = domain_filter {
                if !domain_match(&cookie.domain, filter) && !domain_match(filter, &cookie.domain) {
                    continue;
                }
            }

            let include_subdomains = if cookie.host_only { "FALSE" } else { "TRUE" };
            let secure = if cookie.secure { "TRUE" } else { "FALSE" };
            let expiry = cookie
                .expiration_time
                .map(|t| t.unix_timestamp())
                .unwrap_or(0);

            // Domain should start with . for non-host-only cookies
            let domain = if cookie.host_only {
                cookie.domain.clone()
            } else {
                format!(".{}", cookie.domain)
            };
            let prefix = if cookie.http_only { "#HttpOnly_" } else { "" };

            lines.push(format!(
                "{}{}\t{}\t{}\t{}\t{}\t{}\t{}",
                prefix, domain, include_subdomains, cookie.path, secure, expiry, cookie.name, cookie.value
            ));
        }

        lines.join("\n")
    }

    /// Import cookies from Netscape format file content.
    /// Returns the number of cookies stored.
    pub fn import_netscape(&self, content: &str) -> usize {
        let now = OffsetDateTime::now_utc();
        let mut count = 0;

        for line in content.lines() {
            let line = line.trim();
            let (line, http_only) = match line.strip_prefix("#HttpOnly_") {
                Some(rest) => (rest, true),
                None => (line, false),
            };

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() < 7 {
                continue;
            }

            let expiry: i64 = parts[4].parse().unwrap_or(0);
            let expiration_time = if expiry > 0 {
                OffsetDateTime::from_unix_timestamp(expiry).ok()
            } else {
                None
            };

            let cookie = CanonicalCookie::new(
                parts[5].to_string(),
                parts[6].to_string(),
                parts[0].trim_start_matches('.').to_string(),
                parts[2].to_string(),
                now,
                expiration_time,
            )
            .with_host_only(parts[1].eq_ignore_ascii_case("FALSE"))
            .with_secure(parts[3].eq_ignore_ascii_case("TRUE"))
            .with_http_only(http_only);

            if cookie.is_expired(now) {
                continue;
            }

            match self.set_canonical_cookie(cookie, true) {
                Ok(()) => count += 1,
                Err(reason) => tracing::debug!(%reason, "skipped netscape cookie line"),
            }
        }

        count
    }
}

/// Index of the least recently accessed slot, skipping `keep`.
fn least_recently_used<'a>(
    slots: impl Iterator<Item = (usize, &'a Slot)>,
    keep: u64,
) -> Option<usize> {
    slots
        .filter(|(_, s)| s.seq != keep)
        .min_by_key(|(_, s)| (s.cookie.last_access_time, s.seq))
        .map(|(i, _)| i)
}
