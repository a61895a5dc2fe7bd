use super::error::RecordError;
use super::open_record::OpenRecord;
use super::open_value::Value;
use indexmap::IndexMap;
use rustc_hash::FxHasher;
use smol_str::SmolStr;
use std::hash::BuildHasherDefault;

// ─── Maps & Keys ────────────────────────────────────────────────────────────

/// Insertion-ordered map with the Fx hasher. Iteration order is write order.
pub type FastMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Canonical key form of a field. `"name"`, `String::from("name")` and
/// `Value::Str("name")` all normalize to the same `FieldName`.
pub type FieldName = SmolStr;

// ─── Reserved Names ─────────────────────────────────────────────────────────

/// Type name used as the prefix of rendered records.
pub const RECORD_TYPE_NAME: &str = "OpenRecord";

/// Single top-level key of the older nested serialization shape.
pub const LEGACY_TABLE_KEY: &str = "table";

/// Synthetic entry appended by `encode_with` when the only field is `table`.
pub const LEGACY_SUPPORT_MARKER: &str = "legacy_support!";

/// Rendered in place of a record that is already being rendered.
pub const RECURSION_MARKER: &str = " ...";

// ─── Key Normalization ──────────────────────────────────────────────────────

/// Anything that may name a field. Text-like inputs always normalize; dynamic
/// values only when they hold a string.
pub trait ToFieldName {
    fn to_field_name(&self) -> Result<FieldName, RecordError>;
}

impl ToFieldName for str {
    #[inline]
    fn to_field_name(&self) -> Result<FieldName, RecordError> {
        Ok(SmolStr::new(self))
    }
}

impl ToFieldName for String {
    #[inline]
    fn to_field_name(&self) -> Result<FieldName, RecordError> {
        Ok(SmolStr::new(self))
    }
}

impl ToFieldName for SmolStr {
    #[inline]
    fn to_field_name(&self) -> Result<FieldName, RecordError> {
        Ok(self.clone())
    }
}

impl ToFieldName for Value {
    fn to_field_name(&self) -> Result<FieldName, RecordError> {
        match self {
            Value::Str(s) => Ok(s.clone()),
            other => Err(RecordError::InvalidKey(other.inspect())),
        }
    }
}

impl<T: ToFieldName + ?Sized> ToFieldName for &T {
    #[inline]
    fn to_field_name(&self) -> Result<FieldName, RecordError> {
        (**self).to_field_name()
    }
}

// ─── Iterator ───────────────────────────────────────────────────────────────

/// Lazy walk over a record's `(name, value)` pairs in insertion order.
/// `Copy`, so it can be restarted by keeping an unadvanced copy around.
#[derive(Debug, Clone, Copy)]
pub struct FieldIter<'a> {
    pub record: &'a OpenRecord,
    pub pos: usize,
}

impl<'a> Iterator for FieldIter<'a> {
    type Item = (&'a FieldName, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.record.fields.get_index(self.pos)?;
        self.pos += 1;
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.record.fields.len().saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for FieldIter<'a> {}
