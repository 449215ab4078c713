//! Attribute payload encoding.
//!
//! Node attributes are a JSON object stored as a binary blob. The compressed
//! variant wraps the same JSON bytes in a size-prefixed LZ4 block. A store
//! must keep one codec for its whole lifetime: blobs written by one variant
//! do not decode with the other.

use serde_json::{Map, Value};

use crate::errors::GraphError;

/// A single attribute value: null, bool, number, string, sequence or mapping.
pub type AttrValue = Value;

/// Attribute mapping attached to a node.
pub type Attributes = Map<String, AttrValue>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AttributeCodec {
    #[default]
    Json,
    Lz4Json,
}

impl AttributeCodec {
    pub fn new(compression: bool) -> Self {
        if compression {
            AttributeCodec::Lz4Json
        } else {
            AttributeCodec::Json
        }
    }

    pub fn is_compressed(self) -> bool {
        matches!(self, AttributeCodec::Lz4Json)
    }

    pub fn encode(self, attributes: &Attributes) -> Result<Vec<u8>, GraphError> {
        let bytes = serde_json::to_vec(attributes).map_err(|e| GraphError::codec(e.to_string()))?;
        match self {
            AttributeCodec::Json => Ok(bytes),
            AttributeCodec::Lz4Json => lz4::block::compress(&bytes, None, true)
                .map_err(|e| GraphError::codec(format!("compress: {e}"))),
        }
    }

    pub fn decode(self, payload: &[u8]) -> Result<Attributes, GraphError> {
        let bytes = match self {
            AttributeCodec::Json => std::borrow::Cow::Borrowed(payload),
            AttributeCodec::Lz4Json => std::borrow::Cow::Owned(
                lz4::block::decompress(payload, None)
                    .map_err(|e| GraphError::codec(format!("decompress: {e}")))?,
            ),
        };
        serde_json::from_slice(&bytes).map_err(|e| GraphError::codec(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn nested() -> Attributes {
        let value = json!({
            "name": "alpha",
            "weight": 2.5,
            "count": -7,
            "flag": true,
            "missing": null,
            "tags": ["x", 1, false, null],
            "meta": { "inner": { "depth": 3 }, "list": [[1, 2], []] }
        });
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_json_codec_roundtrip_nested() {
        let attrs = nested();
        let payload = AttributeCodec::Json.encode(&attrs).expect("encode");
        assert_eq!(AttributeCodec::Json.decode(&payload).expect("decode"), attrs);
    }

    #[test]
    fn test_compressed_codec_matches_plain() {
        let attrs = nested();
        let payload = AttributeCodec::Lz4Json.encode(&attrs).expect("encode");
        let plain = AttributeCodec::Json
            .decode(&AttributeCodec::Json.encode(&attrs).expect("encode"))
            .expect("decode");
        assert_eq!(AttributeCodec::Lz4Json.decode(&payload).expect("decode"), plain);
    }

    #[test]
    fn test_mismatched_codec_is_codec_error() {
        let payload = AttributeCodec::Lz4Json.encode(&nested()).expect("encode");
        let err = AttributeCodec::Json.decode(&payload).expect_err("mismatch");
        assert!(matches!(err, GraphError::CodecError(_)));
    }

    #[test]
    fn test_corrupt_payload_is_codec_error() {
        let err = AttributeCodec::Lz4Json
            .decode(&[0xff, 0x00, 0x01])
            .expect_err("corrupt");
        assert!(matches!(err, GraphError::CodecError(_)));
    }
}
