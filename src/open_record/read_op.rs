use super::record::OpenRecord;
use crate::error::RecordError;
use crate::open_value::Value;
use crate::types::*;
use std::hash::Hash;
use std::ops::Index;

const ABSENT: &Value = &Value::Null;

impl OpenRecord {
    // ════════════════════════════════════════════════════════════════════════
    // Field access
    // ════════════════════════════════════════════════════════════════════════

    /// Current value of a field. `None` if the field is absent.
    #[inline]
    pub fn get(&self, name: impl AsRef<str>) -> Option<&Value> {
        self.fields.get(name.as_ref())
    }

    #[inline]
    pub fn get_mut(&mut self, name: impl AsRef<str>) -> Option<&mut Value> {
        self.fields.get_mut(name.as_ref())
    }

    /// `get` with a dynamic key, e.g. a `Value::Str` coming from a payload.
    pub fn try_get<N: ToFieldName + ?Sized>(&self, name: &N) -> Result<Option<&Value>, RecordError> {
        let name = name.to_field_name()?;
        Ok(self.fields.get(&name))
    }

    #[inline]
    pub fn contains_field(&self, name: impl AsRef<str>) -> bool {
        self.fields.contains_key(name.as_ref())
    }

    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &FieldName> + '_ {
        self.fields.keys()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Dig
    // ════════════════════════════════════════════════════════════════════════

    /// Follow `path` through nested values.
    ///
    /// The first segment names a field of this record and must be a string.
    /// Later segments descend into records (string keys), objects (string
    /// keys) and arrays (integer indexes, negative from the end). Reaching an
    /// absent field or a value that cannot be descended into yields `None`.
    pub fn dig(&self, path: &[Value]) -> Result<Option<Value>, RecordError> {
        let Some((name, rest)) = path.split_first() else {
            return Ok(None);
        };
        let name = name.to_field_name()?;
        let Some(value) = self.fields.get(&name) else {
            return Ok(None);
        };
        if rest.is_empty() {
            return Ok(Some(value.clone()));
        }
        dig_value(value, rest)
    }

    /// [`OpenRecord::dig`] for all-string paths.
    pub fn dig_str(&self, path: &[&str]) -> Option<Value> {
        let path: Vec<Value> = path.iter().map(|s| Value::from(*s)).collect();
        // String segments always normalize.
        self.dig(&path).ok().flatten()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Enumeration
    // ════════════════════════════════════════════════════════════════════════

    /// Fresh copy of the field table, in insertion order.
    pub fn to_h(&self) -> FastMap<FieldName, Value> {
        self.fields.clone()
    }

    /// Map every pair through `transform`. The returned pairs populate the
    /// output; a key produced twice keeps its first position and last value.
    pub fn to_h_with<K, V, F>(&self, mut transform: F) -> FastMap<K, V>
    where
        K: Hash + Eq,
        F: FnMut(&FieldName, &Value) -> (K, V),
    {
        let mut out = FastMap::with_capacity_and_hasher(self.fields.len(), Default::default());
        for (k, v) in &self.fields {
            let (key, value) = transform(k, v);
            out.insert(key, value);
        }
        out
    }

    /// Call `f` once per pair in insertion order.
    pub fn each_pair<F>(&self, mut f: F) -> &Self
    where
        F: FnMut(&FieldName, &Value),
    {
        for (k, v) in self.iter() {
            f(k, v);
        }
        self
    }

    /// Lazy, restartable walk over the pairs in insertion order.
    #[inline]
    pub fn iter(&self) -> FieldIter<'_> {
        FieldIter {
            record: self,
            pos: 0,
        }
    }
}

fn dig_value(value: &Value, path: &[Value]) -> Result<Option<Value>, RecordError> {
    match value {
        Value::Record(r) => match r.try_borrow() {
            Ok(nested) => nested.dig(path),
            Err(_) => Ok(None),
        },
        Value::Object(map) => {
            let Some((key, rest)) = path.split_first() else {
                return Ok(None);
            };
            let Some(key) = key.as_str() else {
                return Ok(None);
            };
            match map.get(key) {
                Some(next) if rest.is_empty() => Ok(Some(next.clone())),
                Some(next) => dig_value(next, rest),
                None => Ok(None),
            }
        }
        Value::Array(items) => {
            let Some((index, rest)) = path.split_first() else {
                return Ok(None);
            };
            let index = match index {
                Value::Number(n) => n.as_i64(),
                _ => None,
            }
            .ok_or_else(|| RecordError::InvalidKey(index.inspect()))?;
            let Some(next) = array_slot(items, index) else {
                return Ok(None);
            };
            if rest.is_empty() {
                Ok(Some(next.clone()))
            } else {
                dig_value(next, rest)
            }
        }
        _ => Ok(None),
    }
}

fn array_slot(items: &[Value], index: i64) -> Option<&Value> {
    let len = items.len() as i64;
    let pos = if index < 0 { len + index } else { index };
    if pos < 0 {
        return None;
    }
    items.get(pos as usize)
}

// ─── Index ──────────────────────────────────────────────────────────────────

/// `record["name"]` yields `Value::Null` for absent fields. Use
/// [`OpenRecord::get`] to tell an absent field from a null one.
impl<Q: AsRef<str> + ?Sized> Index<&Q> for OpenRecord {
    type Output = Value;

    fn index(&self, name: &Q) -> &Value {
        self.get(name.as_ref()).unwrap_or(ABSENT)
    }
}

impl<'a> IntoIterator for &'a OpenRecord {
    type Item = (&'a FieldName, &'a Value);
    type IntoIter = FieldIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
