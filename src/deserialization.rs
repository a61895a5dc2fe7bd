use super::error::RecordError;
use super::open_record::OpenRecord;
use super::open_value::{Number, Value};
use super::types::*;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use smol_str::SmolStr;
use std::fmt;

// ─── Deserialize for Value ──────────────────────────────────────────────────

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any structured value")
    }

    #[inline]
    fn visit_bool<E>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    #[inline]
    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(Number::I64(v)))
    }

    #[inline]
    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        // Keep small unsigned values in the signed representation, like the
        // JSON conversion does.
        Ok(match i64::try_from(v) {
            Ok(i) => Value::Number(Number::I64(i)),
            Err(_) => Value::Number(Number::U64(v)),
        })
    }

    fn visit_i128<E>(self, v: i128) -> Result<Value, E> {
        Ok(if let Ok(i) = i64::try_from(v) {
            Value::Number(Number::I64(i))
        } else if let Ok(u) = u64::try_from(v) {
            Value::Number(Number::U64(u))
        } else {
            Value::Number(Number::F64(v as f64))
        })
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Value, E> {
        match u64::try_from(v) {
            Ok(u) => self.visit_u64(u),
            Err(_) => Ok(Value::Number(Number::F64(v as f64))),
        }
    }

    #[inline]
    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(Number::F64(v)))
    }

    #[inline]
    fn visit_str<E>(self, s: &str) -> Result<Value, E> {
        Ok(Value::Str(SmolStr::from(s)))
    }

    #[inline]
    fn visit_string<E>(self, s: String) -> Result<Value, E> {
        Ok(Value::Str(SmolStr::from(s)))
    }

    fn visit_bytes<E>(self, bytes: &[u8]) -> Result<Value, E> {
        Ok(Value::Array(
            bytes
                .iter()
                .map(|b| Value::Number(Number::I64(*b as i64)))
                .collect(),
        ))
    }

    #[inline]
    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    #[inline]
    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = FastMap::with_capacity_and_hasher(
            access.size_hint().unwrap_or(0),
            Default::default(),
        );
        while let Some(key) = access.next_key::<Value>()? {
            // Non-string keys (e.g. CBOR integers) are kept by their text form.
            let key = match key {
                Value::Str(s) => s,
                other => SmolStr::from(other.inspect()),
            };
            let value: Value = access.next_value()?;
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

// ─── Deserialize for OpenRecord ─────────────────────────────────────────────

/// Accepts a map, including the older `{"table": {...}}` shape.
impl<'de> Deserialize<'de> for OpenRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(map) => Ok(OpenRecord::load(map)),
            other => Err(de::Error::custom(format!(
                "expected a map of fields, got {}",
                other.inspect()
            ))),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════
// Load patterns
// ════════════════════════════════════════════════════════════════════════

impl OpenRecord {
    /// Structured-data load. Every pair goes through [`OpenRecord::set`].
    pub fn load(map: FastMap<FieldName, Value>) -> Self {
        let map = unwrap_legacy(map);
        let mut record = Self::with_capacity(map.len());
        record.update_to_values(map);
        record
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, RecordError> {
        match Value::from(value) {
            Value::Object(map) => Ok(Self::load(map)),
            _ => Err(RecordError::NotAnObject),
        }
    }

    pub fn from_cbor(data: &[u8]) -> Result<Self, RecordError> {
        let cbor_val: cbor4ii::core::Value =
            cbor4ii::serde::from_slice(data).map_err(|e| RecordError::CborError(e.to_string()))?;
        match Value::from(cbor_val) {
            Value::Object(map) => Ok(Self::load(map)),
            _ => Err(RecordError::NotAnObject),
        }
    }
}

/// The older shape nests the whole payload under a single `table` key.
/// Unwrap it when that key is the only one and holds a mapping.
pub(crate) fn unwrap_legacy(map: FastMap<FieldName, Value>) -> FastMap<FieldName, Value> {
    if map.len() == 1 {
        if let Some((key, value)) = map.get_index(0) {
            if key == LEGACY_TABLE_KEY {
                if let Some(inner) = value.to_mapping() {
                    tracing::debug!(fields = inner.len(), "unwrapping legacy `table` payload");
                    return inner;
                }
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_legacy_single_table_key() {
        let inner = crate::open_obj!({ "name" => "X" });
        let mut map = FastMap::default();
        map.insert(SmolStr::from("table"), inner.clone());

        let unwrapped = unwrap_legacy(map);
        assert_eq!(Value::Object(unwrapped), inner);
    }

    #[test]
    fn test_unwrap_legacy_ignores_table_next_to_other_keys() {
        let mut map = FastMap::default();
        map.insert(SmolStr::from("table"), crate::open_obj!({ "name" => "X" }));
        map.insert(SmolStr::from("other"), Value::from(1i64));

        let kept = unwrap_legacy(map.clone());
        assert_eq!(kept, map);
    }

    #[test]
    fn test_unwrap_legacy_ignores_scalar_table() {
        let mut map = FastMap::default();
        map.insert(SmolStr::from("table"), Value::from("kitchen"));

        let kept = unwrap_legacy(map);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.get("table"), Some(&Value::from("kitchen")));
    }

    #[test]
    fn test_deserialize_integer_keys_use_text_form() {
        let value: Value = cbor4ii::serde::from_slice(&[0xa1, 0x01, 0x02]).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.get("1"), Some(&Value::from(2i64)));
    }

    #[test]
    fn test_deserialize_u128_picks_narrowest_number() {
        use serde::de::IntoDeserializer;
        use serde::de::value::Error as ValueError;

        let small = Value::deserialize(IntoDeserializer::<ValueError>::into_deserializer(5u128)).unwrap();
        assert!(small.eql(&Value::from(5i64)));

        let wide = u64::MAX as u128;
        let wide = Value::deserialize(IntoDeserializer::<ValueError>::into_deserializer(wide)).unwrap();
        assert!(wide.eql(&Value::from(u64::MAX)));

        let huge = Value::deserialize(IntoDeserializer::<ValueError>::into_deserializer(u128::MAX)).unwrap();
        assert!(matches!(huge, Value::Number(Number::F64(_))));
    }

    #[test]
    fn test_deserialize_rejects_non_map_record() {
        let err = serde_json::from_str::<OpenRecord>("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("expected a map of fields"));
    }
}
