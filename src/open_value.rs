use crate::error::RecordError;
use crate::open_record::OpenRecord;
use crate::types::FastMap;
use smol_str::SmolStr;
use std::cell::{BorrowError, BorrowMutError, Ref, RefCell, RefMut};
use std::rc::Rc;

// ─── Number ─────────────────────────────────────────────────────────────────

/// Numbers keep the representation they were written with. `==` compares
/// across representations (`1 == 1.0`), [`Number::eql`] does not.
#[derive(Clone, Copy)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl std::fmt::Debug for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::I64(i) => write!(f, "I64({})", i),
            Number::U64(u) => write!(f, "U64({})", u),
            Number::F64(v) => write!(f, "F64({})", v),
        }
    }
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::I64(i) => i as f64,
            Number::U64(u) => u as f64,
            Number::F64(f) => f,
        }
    }

    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::I64(i) => Some(i),
            Number::U64(u) => i64::try_from(u).ok(),
            Number::F64(f) => {
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    Some(f as i64)
                } else {
                    None
                }
            }
        }
    }

    pub fn as_u64(self) -> Option<u64> {
        match self {
            Number::U64(u) => Some(u),
            Number::I64(i) => u64::try_from(i).ok(),
            Number::F64(f) => {
                if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 {
                    Some(f as u64)
                } else {
                    None
                }
            }
        }
    }

    /// Exact integral value, if the number has one. Integral floats count.
    pub(crate) fn as_integral(self) -> Option<i128> {
        match self {
            Number::I64(i) => Some(i as i128),
            Number::U64(u) => Some(u as i128),
            Number::F64(f) => {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < i128::MAX as f64 {
                    Some(f as i128)
                } else {
                    None
                }
            }
        }
    }
}

// ─── RecordRef ──────────────────────────────────────────────────────────────

/// Shared handle to a record stored inside a [`Value`]. Cloning the handle
/// shares the record; a record may hold a handle to itself.
#[derive(Clone, Default)]
pub struct RecordRef(Rc<RefCell<OpenRecord>>);

impl RecordRef {
    pub fn new(record: OpenRecord) -> Self {
        Self(Rc::new(RefCell::new(record)))
    }

    /// Panics if the record is mutably borrowed.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, OpenRecord> {
        self.0.borrow()
    }

    /// Panics if the record is already borrowed.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, OpenRecord> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn try_borrow(&self) -> Result<Ref<'_, OpenRecord>, BorrowError> {
        self.0.try_borrow()
    }

    #[inline]
    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, OpenRecord>, BorrowMutError> {
        self.0.try_borrow_mut()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &RecordRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared record; equals `record_id` of the borrowed record.
    #[inline]
    pub(crate) fn id(&self) -> usize {
        self.0.as_ptr() as usize
    }
}

// ─── Value ──────────────────────────────────────────────────────────────────

/// Anything a field can hold.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    Str(SmolStr),
    Array(Vec<Value>),
    Object(FastMap<SmolStr, Value>),
    Record(RecordRef),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&FastMap<SmolStr, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordRef> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Field-like view of mapping values: objects as they are, records via
    /// `to_h`. `None` for everything else.
    pub(crate) fn to_mapping(&self) -> Option<FastMap<SmolStr, Value>> {
        match self {
            Value::Object(map) => Some(map.clone()),
            Value::Record(r) => r.try_borrow().ok().map(|rec| rec.to_h()),
            _ => None,
        }
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(Number::F64(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::I64(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(Number::I64(n as i64))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(Number::U64(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(Number::U64(n as u64))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(SmolStr::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(SmolStr::from(s))
    }
}

impl From<SmolStr> for Value {
    fn from(s: SmolStr) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<FastMap<SmolStr, Value>> for Value {
    fn from(map: FastMap<SmolStr, Value>) -> Self {
        Value::Object(map)
    }
}

impl From<RecordRef> for Value {
    fn from(r: RecordRef) -> Self {
        Value::Record(r)
    }
}

impl From<OpenRecord> for Value {
    fn from(record: OpenRecord) -> Self {
        Value::Record(RecordRef::new(record))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ─── From<cbor4ii::core::Value> ─────────────────────────────────────────────

impl From<cbor4ii::core::Value> for Value {
    fn from(v: cbor4ii::core::Value) -> Self {
        match v {
            cbor4ii::core::Value::Null => Value::Null,
            cbor4ii::core::Value::Bool(b) => Value::Bool(b),
            cbor4ii::core::Value::Integer(i) => {
                if let Ok(val) = i64::try_from(i) {
                    Value::Number(Number::I64(val))
                } else if let Ok(val) = u64::try_from(i) {
                    Value::Number(Number::U64(val))
                } else {
                    Value::Number(Number::F64(i as f64))
                }
            }
            cbor4ii::core::Value::Float(f) => Value::Number(Number::F64(f)),
            cbor4ii::core::Value::Text(s) => Value::Str(SmolStr::from(s)),
            cbor4ii::core::Value::Bytes(bytes) => Value::Array(
                bytes
                    .into_iter()
                    .map(|b| Value::Number(Number::U64(b as u64)))
                    .collect(),
            ),
            cbor4ii::core::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            cbor4ii::core::Value::Map(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| {
                        let key = match k {
                            cbor4ii::core::Value::Text(s) => SmolStr::from(s),
                            cbor4ii::core::Value::Integer(i) => SmolStr::from(i.to_string()),
                            other => SmolStr::from(format!("{:?}", other)),
                        };
                        (key, Value::from(v))
                    })
                    .collect(),
            ),
            cbor4ii::core::Value::Tag(_, inner) => Value::from(*inner),
            _ => Value::Null,
        }
    }
}

// ─── From/TryInto serde_json::Value ─────────────────────────────────────────

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Number(Number::I64(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Number(Number::U64(u))
                } else {
                    Value::Number(Number::F64(n.as_f64().unwrap_or(0.0)))
                }
            }
            serde_json::Value::String(s) => Value::Str(SmolStr::from(s)),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (SmolStr::from(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Fails for self-referencing records and non-finite floats.
impl TryFrom<&Value> for serde_json::Value {
    type Error = RecordError;

    fn try_from(val: &Value) -> Result<Self, Self::Error> {
        Ok(serde_json::to_value(val)?)
    }
}

#[macro_export]
macro_rules! open_obj {
    // Object entry point
    ({ $($key:expr => $val:tt),* $(,)? }) => {{
        let mut map = $crate::types::FastMap::default();
        $(
            map.insert(
                ::smol_str::SmolStr::new($key),
                $crate::open_value::Value::from($crate::open_obj!(@value $val))
            );
        )*
        $crate::open_value::Value::Object(map)
    }};

    // Nested objects
    (@value { $($inner:tt)* }) => {
        $crate::open_obj!({ $($inner)* })
    };

    // Literals or ready-made values
    (@value $val:expr) => {
        $val
    };
}
