//! # cookienet
//!
//! Browser-grade cookie handling for non-browser HTTP clients.
//!
//! `cookienet` sits between an application and any HTTP transport. It parses
//! `Set-Cookie` headers (RFC 6265bis), stores cookies with correct
//! domain/path scoping, builds the `Cookie` header for each outgoing request
//! and follows redirects while tracking whether the chain is still same-site,
//! so `SameSite` and `Secure` are enforced the way Chromium enforces them.
//!
//! ## Features
//!
//! - **Cookie Jar**: per-site storage with LRU eviction, secure-overwrite protection
//! - **Public Suffix List**: supercookie rejection and registrable-domain sites
//! - **SameSite**: Strict/Lax/None gating driven by the redirect chain
//! - **Redirects**: 301/302/303/307/308 method and body rules, credential stripping
//! - **Pluggable transport**: anything implementing [`http::transport::Transport`]
//! - **Persistence**: JSON and Netscape cookie files
//!
//! ## Quick Start
//!
//! ```rust
//! use cookienet::client::Client;
//! use cookienet::cookies::monster::CookieMonster;
//! use cookienet::http::response::HttpResponse;
//! use cookienet::http::transport::{transport_fn, HttpRequestInfo};
//! use http::header::SET_COOKIE;
//! use http::StatusCode;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let jar = Arc::new(CookieMonster::new());
//!     let client = Client::builder(transport_fn(|_req: HttpRequestInfo| async move {
//!         Ok(HttpResponse::new(StatusCode::OK).with_header(SET_COOKIE, "session=abc; Path=/"))
//!     }))
//!     .cookie_store(Arc::clone(&jar))
//!     .build();
//!
//!     let response = client.get("https://example.com/").send().await.unwrap();
//!     println!("Status: {}", response.status());
//!     assert_eq!(jar.total_cookie_count(), 1);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions
//! - [`cookies`] - Cookie parsing, matching, storage and persistence
//! - [`http`] - Request/response shapes and the transport trait
//! - [`urlrequest`] - Redirect chain, redirect rules and the request loop
//! - [`client`] - Builder API on top of [`urlrequest`]

pub mod base;
pub mod client;
pub mod cookies;
pub mod http;
pub mod urlrequest;

pub use base::neterror::{NetError, RequestError};
pub use client::{Client, ClientBuilder, RequestBuilder};
pub use cookies::monster::CookieMonster;
pub use urlrequest::cookiesource::CookieSource;
