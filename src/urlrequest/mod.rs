//! Logical requests: redirect chain tracking, redirect rules, cookie sources
//! and the request loop that ties them to a transport.

pub mod chain;
pub mod context;
pub mod cookiesource;
pub mod job;
pub mod redirectinfo;

pub use chain::RequestChain;
pub use context::{RequestOptions, URLRequestContext, URLRequestContextConfig};
pub use cookiesource::{CookieSource, StaticCookie};
pub use job::URLRequestHttpJob;
pub use redirectinfo::RedirectInfo;
