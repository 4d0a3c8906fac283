//! Cookie persistence - save and load cookies to/from disk.
//!
//! Provides JSON-based persistence for CookieMonster. Session cookies are
//! written too: whoever owns the file decides how long the jar lives.

use crate::cookies::canonical_cookie::{CanonicalCookie, SameSite};
use crate::cookies::monster::CookieMonster;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use time::OffsetDateTime;

/// Serializable representation of a cookie for persistence.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct PersistentCookie {
    name: String,
    value: String,
    domain: String,
    path: String,
    secure: bool,
    http_only: bool,
    host_only: bool,
    #[serde(default)]
    same_site: SameSite,
    creation_unix_secs: i64,
    expires_unix_secs: Option<i64>,
}

/// Save cookies from a CookieMonster to a file.
///
/// # Example
/// ```ignore
/// persistence::save_cookies(&monster, Path::new("/path/to/cookies.json"))?;
/// ```
pub fn save_cookies(monster: &CookieMonster, path: &Path) -> io::Result<()> {
    let all_cookies: Vec<PersistentCookie> = monster
        .all()
        .into_iter()
        .map(|cookie| PersistentCookie {
            expires_unix_secs: cookie.expiration_time.map(|t| t.unix_timestamp()),
            creation_unix_secs: cookie.creation_time.unix_timestamp(),
            name: cookie.name,
            value: cookie.value,
            domain: cookie.domain,
            path: cookie.path,
            secure: cookie.secure,
            http_only: cookie.http_only,
            host_only: cookie.host_only,
            same_site: cookie.same_site,
        })
        .collect();

    let json = serde_json::to_string_pretty(&all_cookies)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    fs::write(path, json)
}

/// Load cookies from a file into a new CookieMonster.
///
/// Expired entries and entries the jar refuses are skipped.
pub fn load_cookies(path: &Path) -> io::Result<CookieMonster> {
    let monster = CookieMonster::new();
    load_cookies_into(&monster, path)?;
    Ok(monster)
}

/// Load cookies from a file into an existing jar. Returns how many were stored.
pub fn load_cookies_into(monster: &CookieMonster, path: &Path) -> io::Result<usize> {
    let json = fs::read_to_string(path)?;
    let persistent_cookies: Vec<PersistentCookie> =
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let now = OffsetDateTime::now_utc();
    let mut stored = 0;

    for pc in persistent_cookies {
        let expiration_time = pc
            .expires_unix_secs
            .and_then(|s| OffsetDateTime::from_unix_timestamp(s).ok());
        if expiration_time.is_some_and(|e| e <= now) {
            continue;
        }
        let creation_time = OffsetDateTime::from_unix_timestamp(pc.creation_unix_secs)
            .unwrap_or(now);

        let cookie = CanonicalCookie::new(
            pc.name,
            pc.value,
            pc.domain,
            pc.path,
            creation_time,
            expiration_time,
        )
        .with_secure(pc.secure)
        .with_http_only(pc.http_only)
        .with_host_only(pc.host_only)
        .with_same_site(pc.same_site);

        match monster.set_canonical_cookie(cookie, true) {
            Ok(()) => stored += 1,
            Err(reason) => tracing::debug!(%reason, "skipped persisted cookie"),
        }
    }

    Ok(stored)
}
