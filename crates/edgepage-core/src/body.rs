use std::fmt;
use std::str::Utf8Error;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Buffered HTTP body. Pages are rendered to completion before a response is produced, so the
/// body is always a single contiguous buffer.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Body {
    bytes: Bytes,
}

impl Body {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_bytes<B>(bytes: B) -> Self
    where
        B: Into<Bytes>,
    {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn text<S>(text: S) -> Self
    where
        S: Into<String>,
    {
        Self::from_bytes(text.into().into_bytes())
    }

    pub fn json<T>(value: &T) -> Result<Self, serde_json::Error>
    where
        T: Serialize,
    {
        serde_json::to_vec(value).map(Self::from_bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(self.as_bytes())
    }

    pub fn to_json<T>(&self) -> Result<T, serde_json::Error>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(self.as_bytes())
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body").field("len", &self.bytes.len()).finish()
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        Body::from_bytes(value)
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Body::from_bytes(value)
    }
}

impl From<&[u8]> for Body {
    fn from(value: &[u8]) -> Self {
        Body::from_bytes(Bytes::copy_from_slice(value))
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Body::text(value)
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Body::text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_body_is_empty() {
        let body = Body::default();
        assert!(body.is_empty());
        assert_eq!(body.len(), 0);
        assert_eq!(body, Body::empty());
    }

    #[test]
    fn text_body_exposes_str() {
        let body = Body::text("<p>hi</p>");
        assert_eq!(body.as_str().expect("utf8"), "<p>hi</p>");
        assert_eq!(body.len(), 9);
    }

    #[test]
    fn as_str_rejects_invalid_utf8() {
        let body = Body::from(vec![0xffu8, 0xfe]);
        assert!(body.as_str().is_err());
    }

    #[test]
    fn json_round_trips_through_serde() {
        let body = Body::json(&serde_json::json!({ "page": "home" })).expect("json");
        let value: serde_json::Value = body.to_json().expect("parse");
        assert_eq!(value["page"], "home");
    }

    #[test]
    fn debug_reports_length_only() {
        let body = Body::from("payload");
        let debug = format!("{:?}", body);
        assert!(debug.contains("len: 7"));
        assert!(!debug.contains("payload"));
    }

    #[test]
    fn from_slice_copies_bytes() {
        let raw = [1u8, 2, 3];
        let body = Body::from(&raw[..]);
        assert_eq!(body.into_bytes(), Bytes::from_static(&[1, 2, 3]));
    }
}
