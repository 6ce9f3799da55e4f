//! Default serializer: tagged JSON via `serde_json`.

use common::Value;

use super::{Serializer, SerializerError};

/// Encodes a [`Value`] as JSON, keeping variant tags so that timestamps,
/// integers and floats survive the round trip with their types intact.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, value: &Value) -> Result<Vec<u8>, SerializerError> {
        if let Some(reason) = value.find_unsupported() {
            return Err(SerializerError::Unsupported(reason));
        }
        serde_json::to_vec(value).map_err(|e| SerializerError::Encode(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value, SerializerError> {
        serde_json::from_slice(bytes).map_err(|e| SerializerError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::value::MAX_DEPTH;

    fn sample() -> Value {
        let now = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        Value::record([
            ("some", Value::from("data")),
            ("now", Value::from(now)),
            ("count", Value::from(42)),
            ("ratio", Value::from(0.25)),
            (
                "nested",
                Value::record([("list", Value::Sequence(vec![Value::Null, true.into()]))]),
            ),
        ])
    }

    #[test]
    fn round_trip_preserves_types() {
        let value = sample();
        let bytes = JsonSerializer.serialize(&value).unwrap();
        assert_eq!(JsonSerializer.deserialize(&bytes).unwrap(), value);
    }

    #[test]
    fn timestamp_keeps_nanoseconds() {
        let t = Utc.timestamp_opt(1, 999_999_999).unwrap();
        let bytes = JsonSerializer.serialize(&Value::from(t)).unwrap();
        assert_eq!(JsonSerializer.deserialize(&bytes).unwrap(), Value::Timestamp(t));
    }

    #[test]
    fn integer_and_float_stay_distinct() {
        let bytes = JsonSerializer.serialize(&Value::Float(2.0)).unwrap();
        assert_eq!(JsonSerializer.deserialize(&bytes).unwrap(), Value::Float(2.0));
        let bytes = JsonSerializer.serialize(&Value::Integer(2)).unwrap();
        assert_eq!(JsonSerializer.deserialize(&bytes).unwrap(), Value::Integer(2));
    }

    #[test]
    fn rejects_non_finite_float() {
        let value = Value::record([("bad", f64::NAN)]);
        assert!(matches!(
            JsonSerializer.serialize(&value),
            Err(SerializerError::Unsupported(_))
        ));
    }

    #[test]
    fn deepest_accepted_value_decodes() {
        let deepest = (0..MAX_DEPTH).fold(Value::from("leaf"), |v, _| Value::Sequence(vec![v]));
        let bytes = JsonSerializer.serialize(&deepest).unwrap();
        assert_eq!(JsonSerializer.deserialize(&bytes).unwrap(), deepest);

        let too_deep = Value::Sequence(vec![deepest]);
        assert!(matches!(
            JsonSerializer.serialize(&too_deep),
            Err(SerializerError::Unsupported(_))
        ));
    }

    #[test]
    fn rejects_garbage_bytes() {
        assert!(matches!(
            JsonSerializer.deserialize(b"\x00\x01garbage"),
            Err(SerializerError::Decode(_))
        ));
        assert!(JsonSerializer.deserialize(br#"{"Unknown":1}"#).is_err());
    }
}
