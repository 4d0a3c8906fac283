use crate::cookies::error::CookieRejection;
use crate::cookies::matcher::default_path;
use crate::cookies::monster::CookieStoreConfig;
use crate::cookies::psl::{is_public_suffix, is_valid_cookie_domain};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::{Duration, OffsetDateTime};
use url::Url;

/// Upper bound on cookie lifetime (RFC 6265bis §5.6 steps 2-3).
const MAX_COOKIE_AGE: Duration = Duration::days(400);

/// Represents a cookie.
/// Modeled after Chromium's `net::CanonicalCookie`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub creation_time: OffsetDateTime,
    pub expiration_time: Option<OffsetDateTime>,
    pub last_access_time: OffsetDateTime,
    pub secure: bool,
    pub http_only: bool,
    pub host_only: bool,
    pub same_site: SameSite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SameSite {
    NoRestriction,
    #[default]
    Lax,
    Strict,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::NoRestriction => "None",
            SameSite::Lax => "Lax",
            SameSite::Strict => "Strict",
        }
    }
}

impl From<cookie::SameSite> for SameSite {
    fn from(value: cookie::SameSite) -> Self {
        match value {
            cookie::SameSite::Strict => SameSite::Strict,
            cookie::SameSite::Lax => SameSite::Lax,
            cookie::SameSite::None => SameSite::NoRestriction,
        }
    }
}

impl From<SameSite> for cookie::SameSite {
    fn from(value: SameSite) -> Self {
        match value {
            SameSite::Strict => cookie::SameSite::Strict,
            SameSite::Lax => cookie::SameSite::Lax,
            SameSite::NoRestriction => cookie::SameSite::None,
        }
    }
}

impl CanonicalCookie {
    /// Programmatic constructor: a host-only, `SameSite=Lax` session cookie
    /// unless the `with_*` methods say otherwise.
    pub fn new(
        name: String,
        value: String,
        domain: String,
        path: String,
        creation_time: OffsetDateTime,
        expiration_time: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            name,
            value,
            domain: domain.to_lowercase(),
            path,
            creation_time,
            expiration_time,
            last_access_time: creation_time,
            secure: false,
            http_only: false,
            host_only: true,
            same_site: SameSite::Lax,
        }
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_host_only(mut self, host_only: bool) -> Self {
        self.host_only = host_only;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Parse a `Set-Cookie` header value received in response to `url`.
    ///
    /// Pure: the result still has to be handed to a jar to be stored.
    /// Mirrors `net::CanonicalCookie::Create`.
    pub fn create(
        url: &Url,
        cookie_line: &str,
        now: OffsetDateTime,
        config: &CookieStoreConfig,
    ) -> Result<Self, CookieRejection> {
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or(CookieRejection::NoHost)?
            .to_lowercase();

        let parsed = cookie::Cookie::parse(cookie_line).map_err(|e| match e {
            cookie::ParseError::EmptyName | cookie::ParseError::MissingPair => {
                CookieRejection::EmptyName
            }
            _ => CookieRejection::Malformed,
        })?;

        let name = parsed.name();
        let value = parsed.value();
        validate_name(name)?;
        validate_value(value)?;
        if name.len() + value.len() > config.max_name_value_size {
            return Err(CookieRejection::TooLarge);
        }
        check_attribute_sizes(cookie_line, config.max_attribute_value_size)?;

        // Max-Age wins over Expires; zero or negative Max-Age is parsed as zero.
        let expiration_time = match parsed.max_age() {
            Some(max_age) if max_age <= Duration::ZERO => Some(OffsetDateTime::UNIX_EPOCH),
            Some(max_age) => Some(cap_expiry(now, now.checked_add(max_age))),
            None => parsed
                .expires()
                .and_then(|e| e.datetime())
                .map(|e| cap_expiry(now, Some(e))),
        };

        let (domain, host_only) = match parsed.domain() {
            Some(d) if !d.trim_start_matches('.').is_empty() => {
                let d = d.trim_start_matches('.').to_lowercase();
                if d == host {
                    // A public suffix is only acceptable as the exact host, and then host-only.
                    let host_only = is_public_suffix(&d);
                    (d, host_only)
                } else if is_valid_cookie_domain(&d, &host) {
                    (d, false)
                } else if is_public_suffix(&d) {
                    return Err(CookieRejection::PublicSuffix);
                } else {
                    return Err(CookieRejection::DomainMismatch);
                }
            }
            _ => (host.clone(), true),
        };

        let path = match parsed.path() {
            Some(p) if p.starts_with('/') => p.to_string(),
            _ => default_path(url.path()).to_string(),
        };

        let secure = parsed.secure().unwrap_or(false);
        let same_site = parsed.same_site().map(SameSite::from).unwrap_or_default();
        if same_site == SameSite::NoRestriction && !secure {
            return Err(CookieRejection::NoneRequiresSecure);
        }

        let cookie = CanonicalCookie {
            name: name.to_string(),
            value: value.to_string(),
            domain,
            path,
            creation_time: now,
            expiration_time,
            last_access_time: now,
            secure,
            http_only: parsed.http_only().unwrap_or(false),
            host_only,
            same_site,
        };

        cookie.validate_prefix(is_secure_scheme(url.scheme()))?;
        Ok(cookie)
    }

    pub fn is_expired(&self, current_time: OffsetDateTime) -> bool {
        match self.expiration_time {
            Some(expiry) => expiry <= current_time,
            None => false,
        }
    }

    /// Session cookies live only as long as the jar that holds them.
    pub fn is_persistent(&self) -> bool {
        self.expiration_time.is_some()
    }

    /// Whether this cookie occupies the same slot as `other`.
    pub fn is_equivalent(&self, other: &CanonicalCookie) -> bool {
        self.name == other.name && self.domain == other.domain && self.path == other.path
    }

    /// Validate __Secure- and __Host- cookie prefixes per RFC 6265bis.
    /// - __Secure- cookies MUST have the Secure attribute
    /// - __Host- cookies MUST have Secure, Path="/", and no Domain attribute
    pub fn validate_prefix(&self, secure_origin: bool) -> Result<(), CookieRejection> {
        if self.name.starts_with("__Secure-") && (!self.secure || !secure_origin) {
            return Err(CookieRejection::InvalidPrefix);
        }

        if self.name.starts_with("__Host-")
            && (!self.secure || self.path != "/" || !self.host_only || !secure_origin)
        {
            return Err(CookieRejection::InvalidPrefix);
        }

        Ok(())
    }
}

/// Serializes as a `Set-Cookie` header value.
impl fmt::Display for CanonicalCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = cookie::Cookie::build((self.name.clone(), self.value.clone()))
            .path(self.path.clone())
            .secure(self.secure)
            .http_only(self.http_only)
            .same_site(self.same_site.into());
        if !self.host_only {
            builder = builder.domain(self.domain.clone());
        }
        if let Some(expiry) = self.expiration_time {
            builder = builder.expires(expiry);
        }
        write!(f, "{}", builder.build())
    }
}

pub(crate) fn is_secure_scheme(scheme: &str) -> bool {
    scheme.eq_ignore_ascii_case("https") || scheme.eq_ignore_ascii_case("wss")
}

/// Names may not be empty, hold control characters, or contain `=`/`;`.
pub(crate) fn validate_name(name: &str) -> Result<(), CookieRejection> {
    if name.is_empty() {
        return Err(CookieRejection::EmptyName);
    }
    if name.chars().any(|c| c.is_ascii_control() || c == '=' || c == ';') {
        return Err(CookieRejection::InvalidName);
    }
    Ok(())
}

/// Values may not hold control characters other than horizontal tab, nor `;`.
pub(crate) fn validate_value(value: &str) -> Result<(), CookieRejection> {
    if value
        .chars()
        .any(|c| (c.is_ascii_control() && c != '\t') || c == ';')
    {
        return Err(CookieRejection::InvalidValue);
    }
    Ok(())
}

fn check_attribute_sizes(cookie_line: &str, limit: usize) -> Result<(), CookieRejection> {
    for attr in cookie_line.split(';').skip(1) {
        let value = attr.split_once('=').map(|(_, v)| v.trim()).unwrap_or("");
        if value.len() > limit {
            return Err(CookieRejection::TooLarge);
        }
    }
    Ok(())
}

fn cap_expiry(now: OffsetDateTime, expiry: Option<OffsetDateTime>) -> OffsetDateTime {
    let limit = now + MAX_COOKIE_AGE;
    match expiry {
        Some(e) if e < limit => e,
        _ => limit,
    }
}
