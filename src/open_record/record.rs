use crate::error::RecordError;
use crate::open_value::Value;
use crate::types::*;

// ─── Record ─────────────────────────────────────────────────────────────────
/// A record whose fields are added at runtime.
///
/// Fields are kept in first-write order. Reading a field that was never
/// written (or was deleted) yields `None`, which is distinct from a field
/// holding [`Value::Null`].
///
/// `Clone` copies the field table. Values are shared shallowly: a
/// [`Value::Record`] in the copy points at the same record as the original.
#[derive(Clone, Default)]
pub struct OpenRecord {
    pub(crate) fields: FastMap<FieldName, Value>,
}

impl OpenRecord {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: FastMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Build a record from any ordered source. Every pair goes through
    /// [`OpenRecord::set`] in source order, so later duplicates win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<FieldName>,
        V: Into<Value>,
    {
        let pairs = pairs.into_iter();
        let mut record = Self::with_capacity(pairs.size_hint().0);
        record.update_to_values(pairs);
        record
    }

    /// Copy the fields of another record, in its order.
    pub fn from_record(other: &OpenRecord) -> Self {
        Self::from_pairs(other.iter().map(|(k, v)| (k.clone(), v.clone())))
    }

    /// Build a record from a mapping value. Records are copied like
    /// [`OpenRecord::from_record`].
    pub fn try_from_value(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(map) => Ok(Self::from_pairs(map)),
            Value::Record(r) => {
                let source = r.try_borrow().map_err(|_| RecordError::NotAnObject)?;
                Ok(Self::from_record(&source))
            }
            _ => Err(RecordError::NotAnObject),
        }
    }

    /// Apply every pair through the normal write path.
    pub fn update_to_values<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<FieldName>,
        V: Into<Value>,
    {
        for (k, v) in pairs {
            self.set(k, v);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Identity used by the recursion guards. Matches `RecordRef::id` for a
    /// record reached through a handle.
    #[inline]
    pub(crate) fn record_id(&self) -> usize {
        self as *const OpenRecord as usize
    }
}

impl<K: Into<FieldName>, V: Into<Value>> FromIterator<(K, V)> for OpenRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<K: Into<FieldName>> From<FastMap<K, Value>> for OpenRecord {
    fn from(map: FastMap<K, Value>) -> Self {
        Self::from_pairs(map)
    }
}

impl TryFrom<Value> for OpenRecord {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::try_from_value(value)
    }
}
