//! Reasons a cookie is refused by the parser or the jar.
//!
//! Modeled after the exclusion reasons of Chromium's `net::CookieInclusionStatus`.
//! None of these ever reach the caller of a request: the redirect loop logs
//! them and moves on.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CookieRejection {
    #[error("malformed cookie line")]
    Malformed,
    #[error("cookie name is empty")]
    EmptyName,
    #[error("cookie name contains forbidden characters")]
    InvalidName,
    #[error("cookie value contains forbidden characters")]
    InvalidValue,
    #[error("cookie name, value or attribute exceeds the size limit")]
    TooLarge,
    #[error("request URL has no host")]
    NoHost,
    #[error("Domain attribute does not match the request host")]
    DomainMismatch,
    #[error("Domain attribute is a public suffix")]
    PublicSuffix,
    #[error("SameSite=None requires the Secure attribute")]
    NoneRequiresSecure,
    #[error("cookie prefix requirements not met")]
    InvalidPrefix,
    #[error("insecure cookie may not overwrite a secure cookie")]
    OverwriteSecure,
    #[error("non-HTTP API may not set or overwrite an HttpOnly cookie")]
    HttpOnlyFromNonHttp,
}
