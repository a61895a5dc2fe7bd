use super::error::RecordError;
use super::open_record::OpenRecord;
use super::open_value::{Number, RecordRef, Value};
use super::types::*;
use crate::open_record::guard::{RecursionGuard, SERIALIZE_IDS};
use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};

// ─── Serialize for Value ────────────────────────────────────────────────────

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match n {
                Number::I64(i) => serializer.serialize_i64(*i),
                Number::U64(u) => serializer.serialize_u64(*u),
                Number::F64(f) => serializer.serialize_f64(*f),
            },
            Value::Str(s) => serializer.serialize_str(s.as_str()),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k.as_str(), v)?;
                }
                m.end()
            }
            Value::Record(r) => r.serialize(serializer),
        }
    }
}

impl Serialize for RecordRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let record = self
            .try_borrow()
            .map_err(|_| S::Error::custom("record is mutably borrowed"))?;
        record.serialize(serializer)
    }
}

// ─── Serialize for OpenRecord ───────────────────────────────────────────────

/// A flat map of the fields in insertion order. No type marker is written.
impl Serialize for OpenRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Some(_guard) = RecursionGuard::enter(&SERIALIZE_IDS, self.record_id()) else {
            return Err(S::Error::custom("cannot serialize a record that contains itself"));
        };
        let mut m = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            m.serialize_entry(k.as_str(), v)?;
        }
        m.end()
    }
}

// ════════════════════════════════════════════════════════════════════════
// Dump patterns
// ════════════════════════════════════════════════════════════════════════

impl OpenRecord {
    /// Structured-data dump: the field table as a plain ordered map.
    #[inline]
    pub fn dump(&self) -> FastMap<FieldName, Value> {
        self.to_h()
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, RecordError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Encode the record as a CBOR map.
    pub fn to_cbor(&self) -> Result<Vec<u8>, RecordError> {
        let mut buf = Vec::new();
        cbor4ii::serde::to_writer(&mut buf, self)
            .map_err(|e| RecordError::CborError(e.to_string()))?;
        Ok(buf)
    }
}
