//! Request body for POST/PUT operations.

use bytes::Bytes;

/// Request body for HTTP methods that send data.
///
/// Cloning is cheap (`Bytes` is reference counted), so 307/308 redirects
/// replay the same body without copying it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    /// No body (GET, HEAD, DELETE).
    #[default]
    Empty,
    /// Body with raw bytes.
    Bytes(Bytes),
}

impl From<String> for RequestBody {
    fn from(s: String) -> Self {
        RequestBody::Bytes(Bytes::from(s))
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(v: Vec<u8>) -> Self {
        RequestBody::Bytes(Bytes::from(v))
    }
}

impl From<&'static str> for RequestBody {
    fn from(s: &'static str) -> Self {
        RequestBody::Bytes(Bytes::from_static(s.as_bytes()))
    }
}

impl From<Bytes> for RequestBody {
    fn from(b: Bytes) -> Self {
        RequestBody::Bytes(b)
    }
}

impl RequestBody {
    /// Check if the body is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the length of the body in bytes.
    pub fn len(&self) -> usize {
        match self {
            RequestBody::Empty => 0,
            RequestBody::Bytes(b) => b.len(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            RequestBody::Empty => &[],
            RequestBody::Bytes(b) => b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body() {
        let body = RequestBody::default();
        assert!(body.is_empty());
        assert_eq!(body.as_bytes(), b"");
    }

    #[test]
    fn test_zero_length_bytes_is_empty() {
        assert!(RequestBody::Bytes(Bytes::new()).is_empty());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(RequestBody::from("test").len(), 4);
        assert_eq!(RequestBody::from("hello world".to_string()).len(), 11);
        assert_eq!(RequestBody::from(vec![1u8, 2, 3, 4]).as_bytes(), &[1, 2, 3, 4]);
        assert_eq!(RequestBody::from(Bytes::from_static(b"raw")).len(), 3);
    }
}
