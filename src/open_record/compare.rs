use super::guard::{COMPARE_PAIRS, HASH_IDS, RecursionGuard};
use super::record::OpenRecord;
use crate::open_value::{Number, RecordRef, Value};
use crate::types::FastMap;
use smol_str::SmolStr;
use std::hash::{Hash, Hasher};
use xxhash_rust::xxh64::Xxh64;

/// Digest of a record reached again while it is being hashed.
const RECURSIVE_DIGEST: u64 = 0x6f70_656e_7265_6321;

// ─── Number ─────────────────────────────────────────────────────────────────

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Number::F64(a), Number::F64(b)) => a == b,
            (a, b) => match (a.as_integral(), b.as_integral()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }
}

impl Number {
    /// Strict equality: same representation and same value.
    pub fn eql(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Number::I64(a), Number::I64(b)) => a == b,
            (Number::U64(a), Number::U64(b)) => a == b,
            (Number::F64(a), Number::F64(b)) => a == b,
            _ => false,
        }
    }
}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Integral values hash alike whatever their representation, to match `==`.
        match self.as_integral() {
            Some(i) => {
                0u8.hash(state);
                i.hash(state);
            }
            None => {
                1u8.hash(state);
                self.as_f64().to_bits().hash(state);
            }
        }
    }
}

// ─── RecordRef ──────────────────────────────────────────────────────────────

impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (self.try_borrow(), other.try_borrow()) {
            (Ok(a), Ok(b)) => *a == *b,
            _ => false,
        }
    }
}

impl Hash for RecordRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.try_borrow() {
            Ok(record) => state.write_u64(record.fingerprint()),
            Err(_) => state.write_u64(RECURSIVE_DIGEST),
        }
    }
}

// ─── Value ──────────────────────────────────────────────────────────────────

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Strict equality: like `==`, but numbers must share a representation.
    pub fn eql(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.eql(b),
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.eql(y))
            }
            (Value::Object(a), Value::Object(b)) => maps_eql(a, b),
            (Value::Record(a), Value::Record(b)) => {
                if a.ptr_eq(b) {
                    return true;
                }
                match (a.try_borrow(), b.try_borrow()) {
                    (Ok(x), Ok(y)) => x.eql(&y),
                    _ => false,
                }
            }
            (a, b) => a == b,
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Number(n) => n.hash(state),
            Value::Str(s) => s.hash(state),
            Value::Array(items) => items.hash(state),
            Value::Object(map) => state.write_u64(unordered_digest(map.iter())),
            Value::Record(r) => r.hash(state),
        }
    }
}

// ─── OpenRecord ─────────────────────────────────────────────────────────────

/// Records are equal when their field tables hold the same pairs, in any order.
impl PartialEq for OpenRecord {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.fields.len() != other.fields.len() {
            return false;
        }
        // A pair compared again further down the structure is assumed equal;
        // the outer comparison decides.
        let Some(_guard) =
            RecursionGuard::enter(&COMPARE_PAIRS, (self.record_id(), other.record_id()))
        else {
            return true;
        };
        self.fields == other.fields
    }
}

impl Hash for OpenRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.fingerprint());
    }
}

impl OpenRecord {
    /// Strict equality: like `==`, but numbers must share a representation.
    pub fn eql(&self, other: &OpenRecord) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        let Some(_guard) =
            RecursionGuard::enter(&COMPARE_PAIRS, (self.record_id(), other.record_id()))
        else {
            return true;
        };
        maps_eql(&self.fields, &other.fields)
    }

    /// Order-independent xxh64 digest of the field table. Equal records have
    /// equal fingerprints.
    pub fn fingerprint(&self) -> u64 {
        let Some(_guard) = RecursionGuard::enter(&HASH_IDS, self.record_id()) else {
            return RECURSIVE_DIGEST;
        };
        unordered_digest(self.fields.iter())
    }
}

fn maps_eql(a: &FastMap<SmolStr, Value>, b: &FastMap<SmolStr, Value>) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|(k, v)| b.get(k).is_some_and(|other| v.eql(other)))
}

/// Sum of per-entry digests, so insertion order does not matter.
fn unordered_digest<'a, I>(entries: I) -> u64
where
    I: ExactSizeIterator<Item = (&'a SmolStr, &'a Value)>,
{
    let mut acc = entries.len() as u64;
    for (k, v) in entries {
        let mut h = Xxh64::new(0);
        k.hash(&mut h);
        v.hash(&mut h);
        acc = acc.wrapping_add(h.finish());
    }
    acc
}
