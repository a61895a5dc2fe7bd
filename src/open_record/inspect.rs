use super::guard::{INSPECT_IDS, RecursionGuard};
use super::record::OpenRecord;
use crate::open_value::{Number, RecordRef, Value};
use crate::types::{RECORD_TYPE_NAME, RECURSION_MARKER};
use std::fmt::{self, Write};

// ─── Rendering ──────────────────────────────────────────────────────────────
//
//   #<OpenRecord name="Rowdy", owner=nil, tags=["a", "b"]>
//   #<OpenRecord>                      empty record
//   #<OpenRecord ...>                  record already being rendered

impl OpenRecord {
    /// Render as `#<OpenRecord key=value, ...>` in field order.
    pub fn inspect(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = write_record(&mut out, self);
        out
    }
}

impl Value {
    pub fn inspect(&self) -> String {
        let mut out = String::new();
        let _ = write_value(&mut out, self);
        out
    }
}

pub(crate) fn write_record<W: Write>(out: &mut W, record: &OpenRecord) -> fmt::Result {
    out.write_str("#<")?;
    out.write_str(RECORD_TYPE_NAME)?;
    match RecursionGuard::enter(&INSPECT_IDS, record.record_id()) {
        None => {
            tracing::trace!(id = record.record_id(), "recursive record in render");
            out.write_str(RECURSION_MARKER)?;
        }
        Some(_guard) => {
            for (i, (name, value)) in record.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                write!(out, " {}=", name)?;
                write_value(out, value)?;
            }
        }
    }
    out.write_char('>')
}

pub(crate) fn write_value<W: Write>(out: &mut W, value: &Value) -> fmt::Result {
    match value {
        Value::Null => out.write_str("nil"),
        Value::Bool(b) => write!(out, "{}", b),
        Value::Number(n) => write_number(out, *n),
        Value::Str(s) => write!(out, "{:?}", s.as_str()),
        Value::Array(items) => {
            out.write_char('[')?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                write_value(out, item)?;
            }
            out.write_char(']')
        }
        Value::Object(map) => {
            out.write_char('{')?;
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                write!(out, "{:?} => ", k.as_str())?;
                write_value(out, v)?;
            }
            out.write_char('}')
        }
        Value::Record(r) => write_record_ref(out, r),
    }
}

fn write_record_ref<W: Write>(out: &mut W, r: &RecordRef) -> fmt::Result {
    match r.try_borrow() {
        Ok(record) => write_record(out, &record),
        // Mutably borrowed means a write to this record is in progress on
        // this thread, i.e. we are nested inside it.
        Err(_) => {
            out.write_str("#<")?;
            out.write_str(RECORD_TYPE_NAME)?;
            out.write_str(RECURSION_MARKER)?;
            out.write_char('>')
        }
    }
}

fn write_number<W: Write>(out: &mut W, n: Number) -> fmt::Result {
    match n {
        Number::I64(i) => write!(out, "{}", i),
        Number::U64(u) => write!(out, "{}", u),
        Number::F64(f) if f.is_nan() => out.write_str("NaN"),
        Number::F64(f) if f.is_infinite() => {
            out.write_str(if f > 0.0 { "Infinity" } else { "-Infinity" })
        }
        Number::F64(f) => write!(out, "{:?}", f),
    }
}

// ─── Display / Debug ────────────────────────────────────────────────────────

impl fmt::Display for OpenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_record(f, self)
    }
}

impl fmt::Debug for OpenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_record(f, self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self)
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_record_ref(f, self)
    }
}
