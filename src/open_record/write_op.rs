use super::record::OpenRecord;
use crate::error::RecordError;
use crate::open_value::Value;
use crate::types::*;
use smol_str::SmolStr;
use std::ops::IndexMut;

impl OpenRecord {
    // ════════════════════════════════════════════════════════════════════════
    // Writes
    // ════════════════════════════════════════════════════════════════════════

    /// Write a field. A new name is appended to the field order; an existing
    /// one is overwritten in place. Returns the stored value.
    pub fn set(&mut self, name: impl Into<FieldName>, value: impl Into<Value>) -> &Value {
        let (idx, _) = self.fields.insert_full(name.into(), value.into());
        &self.fields[idx]
    }

    /// `set` with a dynamic key. Fails if the key does not name a field.
    pub fn try_set<N: ToFieldName + ?Sized>(
        &mut self,
        name: &N,
        value: impl Into<Value>,
    ) -> Result<&Value, RecordError> {
        let name = name.to_field_name()?;
        Ok(self.set(name, value))
    }

    /// Accessor-style call: `name=` with exactly one argument writes the
    /// field, `name` with no arguments reads it.
    pub fn call_accessor(
        &mut self,
        method: &str,
        mut args: Vec<Value>,
    ) -> Result<Option<Value>, RecordError> {
        if let Some(name) = method.strip_suffix('=') {
            if args.len() != 1 {
                return Err(RecordError::ArityMismatch {
                    given: args.len(),
                    expected: 1,
                });
            }
            let value = args.pop().unwrap_or_default();
            return Ok(Some(self.set(name, value).clone()));
        }
        if !args.is_empty() {
            return Err(RecordError::ArityMismatch {
                given: args.len(),
                expected: 0,
            });
        }
        Ok(self.get(method).cloned())
    }

    // ════════════════════════════════════════════════════════════════════════
    // Deletion
    // ════════════════════════════════════════════════════════════════════════

    /// Remove a field and return its last value. The remaining fields keep
    /// their order; writing the name again appends it at the end.
    pub fn delete_field(&mut self, name: impl AsRef<str>) -> Result<Value, RecordError> {
        let name = name.as_ref();
        match self.fields.shift_remove(name) {
            Some(value) => Ok(value),
            None => Err(RecordError::NoSuchField {
                record: self.inspect(),
                field: name.to_string(),
            }),
        }
    }

    /// Like [`OpenRecord::delete_field`], but an absent field yields
    /// `fallback()` instead of an error.
    pub fn delete_field_or_else<F>(&mut self, name: impl AsRef<str>, fallback: F) -> Value
    where
        F: FnOnce() -> Value,
    {
        let name = name.as_ref();
        match self.fields.shift_remove(name) {
            Some(value) => value,
            None => {
                tracing::trace!(field = name, "delete_field on absent field, using fallback");
                fallback()
            }
        }
    }
}

/// `record["name"] = value` registers the field like [`OpenRecord::set`].
impl<Q: AsRef<str> + ?Sized> IndexMut<&Q> for OpenRecord {
    fn index_mut(&mut self, name: &Q) -> &mut Value {
        self.fields
            .entry(SmolStr::new(name.as_ref()))
            .or_insert(Value::Null)
    }
}
