//! Cookie parsing, matching and storage.
//!
//! This module provides a complete cookie management system including:
//!
//! - **Parsing**: `Set-Cookie` lines into validated cookies ([`CanonicalCookie::create`](canonical_cookie::CanonicalCookie::create))
//! - **Matching**: RFC 6265bis domain and path predicates ([`matcher`])
//! - **Storage**: In-memory cookie jar with eviction ([`CookieMonster`](monster::CookieMonster))
//! - **Retrieval**: SameSite/Secure/HttpOnly gating per request ([`CookieRetrieval`](retrieval::CookieRetrieval))
//! - **Persistence**: JSON save/load and Netscape import/export
//!
//! # Architecture
//!
//! This implementation mirrors Chromium's cookie storage architecture:
//!
//! | Chromium (C++) | cookienet (Rust) | Responsibility |
//! |----------------|------------------|----------------|
//! | `net::CookieMonster` | [`CookieMonster`](monster::CookieMonster) | Cookie jar with LRU eviction |
//! | `net::CanonicalCookie` | [`CanonicalCookie`](canonical_cookie::CanonicalCookie) | Single cookie representation |
//! | `net::CookieOptions` | [`CookieRetrieval`](retrieval::CookieRetrieval) | Context of a cookie access |
//! | `net::CookieInclusionStatus` | [`CookieRejection`](error::CookieRejection) | Why a cookie was refused |
//!
//! # Example
//!
//! ```rust
//! use cookienet::cookies::monster::CookieMonster;
//! use cookienet::cookies::retrieval::CookieRetrieval;
//! use url::Url;
//!
//! let jar = CookieMonster::new();
//! let url = Url::parse("https://example.com/").unwrap();
//! jar.parse_and_save_cookie(&url, "id=42; Path=/; Secure").unwrap();
//!
//! let retrieval = CookieRetrieval::for_http_request(url, true, true, true);
//! assert_eq!(jar.cookie_header(&retrieval).as_deref(), Some("id=42"));
//! ```

pub mod canonical_cookie;
pub mod error;
pub mod matcher;
pub mod monster;
pub mod persistence;
pub mod psl;
pub mod retrieval;
