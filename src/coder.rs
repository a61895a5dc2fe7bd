use super::error::RecordError;
use super::open_record::OpenRecord;
use super::open_value::Value;
use super::types::*;
use crate::deserialization::unwrap_legacy;
use smol_str::SmolStr;

// ─── Coder Trait ────────────────────────────────────────────────────────────

/// Map-like view a tagged serialization framework hands to a record.
///
/// The record writes its fields through [`Coder::insert`] when encoding and
/// reads them back from [`Coder::map`] when decoding.
pub trait Coder {
    /// Entries currently held by the coder, in insertion order.
    fn map(&self) -> &FastMap<SmolStr, Value>;

    /// Store `value` under `key`, replacing an earlier entry with that key.
    fn insert(&mut self, key: &str, value: Value);
}

// ─── MapCoder ───────────────────────────────────────────────────────────────

/// In-memory coder. Can be carried as CBOR or JSON bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapCoder {
    map: FastMap<SmolStr, Value>,
}

impl MapCoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: FastMap<SmolStr, Value>) -> Self {
        Self { map }
    }

    pub fn into_map(self) -> FastMap<SmolStr, Value> {
        self.map
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, RecordError> {
        let mut buf = Vec::new();
        cbor4ii::serde::to_writer(&mut buf, &Value::Object(self.map.clone()))
            .map_err(|e| RecordError::CborError(e.to_string()))?;
        Ok(buf)
    }

    pub fn from_cbor(data: &[u8]) -> Result<Self, RecordError> {
        let cbor_val: cbor4ii::core::Value =
            cbor4ii::serde::from_slice(data).map_err(|e| RecordError::CborError(e.to_string()))?;
        match Value::from(cbor_val) {
            Value::Object(map) => Ok(Self { map }),
            _ => Err(RecordError::NotAnObject),
        }
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(&Value::Object(self.map.clone()))?)
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => Ok(Self { map }),
            _ => Err(RecordError::NotAnObject),
        }
    }
}

impl Coder for MapCoder {
    #[inline]
    fn map(&self) -> &FastMap<SmolStr, Value> {
        &self.map
    }

    #[inline]
    fn insert(&mut self, key: &str, value: Value) {
        self.map.insert(SmolStr::new(key), value);
    }
}

// ════════════════════════════════════════════════════════════════════════
// Tagged adapter
// ════════════════════════════════════════════════════════════════════════

impl OpenRecord {
    /// Write every field into `coder` under its name, in field order.
    ///
    /// A record whose only field is `table` would be read back as the older
    /// nested shape, so a `legacy_support!` entry is appended to tell the two
    /// apart.
    pub fn encode_with<C: Coder + ?Sized>(&self, coder: &mut C) {
        for (name, value) in self.iter() {
            coder.insert(name.as_str(), value.clone());
        }
        if self.len() == 1 && self.contains_field(LEGACY_TABLE_KEY) {
            tracing::debug!("single `table` field, appending legacy marker");
            coder.insert(LEGACY_SUPPORT_MARKER, Value::Bool(true));
        }
    }

    /// Build a record from a coder's entries, unwrapping the older
    /// `{"table": {...}}` shape.
    pub fn init_with<C: Coder + ?Sized>(coder: &C) -> Self {
        let mut record = Self::new();
        record.apply_coder(coder);
        record
    }

    /// Apply a coder's entries to this record through the normal write path.
    pub fn apply_coder<C: Coder + ?Sized>(&mut self, coder: &C) {
        self.update_to_values(unwrap_legacy(coder.map().clone()));
    }
}
