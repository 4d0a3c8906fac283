use crate::http::response::HttpResponse;
use thiserror::Error;

/// Network error codes, numbered as in Chromium's `net_error_list.h`.
///
/// Transports report their failures with these codes; the redirect loop
/// propagates them untouched.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum NetError {
    // Generic Errors
    #[error("Operation aborted")]
    Aborted,
    #[error("Operation timed out")]
    TimedOut,

    // Connection Errors
    #[error("Connection closed (TCP FIN)")]
    ConnectionClosed,
    #[error("Connection reset (TCP RST)")]
    ConnectionReset,
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection aborted")]
    ConnectionAborted,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Internet disconnected")]
    InternetDisconnected,
    #[error("SSL protocol error")]
    SslProtocolError,
    #[error("Connection timed out")]
    ConnectionTimedOut,

    // HTTP Errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Disallowed URL scheme")]
    DisallowedUrlScheme,
    #[error("Unknown URL scheme")]
    UnknownUrlScheme,
    #[error("Invalid redirect")]
    InvalidRedirect,
    #[error("Too many redirects")]
    TooManyRedirects,
    #[error("Unsafe redirect")]
    UnsafeRedirect,
    #[error("Invalid response")]
    InvalidResponse,
    #[error("Empty response")]
    EmptyResponse,
    #[error("Content decoding failed")]
    ContentDecodingFailed,
    #[error("Invalid HTTP response")]
    InvalidHttpResponse,

    #[error("Unknown error: {0}")]
    Unknown(i32),
}

impl NetError {
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::Aborted => -3,
            NetError::TimedOut => -7,

            NetError::ConnectionClosed => -100,
            NetError::ConnectionReset => -101,
            NetError::ConnectionRefused => -102,
            NetError::ConnectionAborted => -103,
            NetError::ConnectionFailed => -104,
            NetError::NameNotResolved => -105,
            NetError::InternetDisconnected => -106,
            NetError::SslProtocolError => -107,
            NetError::ConnectionTimedOut => -118,

            NetError::InvalidUrl => -300,
            NetError::DisallowedUrlScheme => -301,
            NetError::UnknownUrlScheme => -302,
            NetError::InvalidRedirect => -303,
            NetError::TooManyRedirects => -310,
            NetError::UnsafeRedirect => -311,
            NetError::InvalidResponse => -320,
            NetError::EmptyResponse => -324,
            NetError::ContentDecodingFailed => -330,
            NetError::InvalidHttpResponse => -370,
            NetError::Unknown(code) => *code,
        }
    }

    /// Whether this error ends a redirect chain (as opposed to a transport failure).
    pub fn is_redirect_error(&self) -> bool {
        matches!(
            self,
            NetError::InvalidRedirect | NetError::TooManyRedirects | NetError::UnsafeRedirect
        )
    }
}

impl From<i32> for NetError {
    fn from(code: i32) -> Self {
        match code {
            -3 => NetError::Aborted,
            -7 => NetError::TimedOut,

            -100 => NetError::ConnectionClosed,
            -101 => NetError::ConnectionReset,
            -102 => NetError::ConnectionRefused,
            -103 => NetError::ConnectionAborted,
            -104 => NetError::ConnectionFailed,
            -105 => NetError::NameNotResolved,
            -106 => NetError::InternetDisconnected,
            -107 => NetError::SslProtocolError,
            -118 => NetError::ConnectionTimedOut,

            -300 => NetError::InvalidUrl,
            -301 => NetError::DisallowedUrlScheme,
            -302 => NetError::UnknownUrlScheme,
            -303 => NetError::InvalidRedirect,
            -310 => NetError::TooManyRedirects,
            -311 => NetError::UnsafeRedirect,
            -320 => NetError::InvalidResponse,
            -324 => NetError::EmptyResponse,
            -330 => NetError::ContentDecodingFailed,
            -370 => NetError::InvalidHttpResponse,
            _ => NetError::Unknown(code),
        }
    }
}

/// Failure of one logical request.
///
/// Redirect failures keep the last response that was received so callers
/// can still inspect its status and headers.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("redirect failed: {reason}")]
    Redirect {
        reason: NetError,
        response: Box<HttpResponse>,
    },
    #[error(transparent)]
    Net(#[from] NetError),
}

impl RequestError {
    pub fn net_error(&self) -> NetError {
        match self {
            RequestError::Redirect { reason, .. } => *reason,
            RequestError::Net(e) => *e,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, RequestError::Redirect { .. })
    }

    /// The last response received before the failure, if any.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            RequestError::Redirect { response, .. } => Some(&**response),
            RequestError::Net(_) => None,
        }
    }

    pub fn into_response(self) -> Option<HttpResponse> {
        match self {
            RequestError::Redirect { response, .. } => Some(*response),
            RequestError::Net(_) => None,
        }
    }
}
