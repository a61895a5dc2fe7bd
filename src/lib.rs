//! Records with fields added at runtime.
//!
//! An [`OpenRecord`] is an insertion-ordered table from field name to
//! [`Value`]. Fields are written with [`OpenRecord::set`] (or
//! `record["name"] = value`), read with [`OpenRecord::get`], and removed with
//! [`OpenRecord::delete_field`]. Records compare and hash by content and
//! render as `#<OpenRecord name="Rowdy", age=3>`.
//!
//! ```
//! use open_record::{OpenRecord, Value};
//!
//! let mut pet = OpenRecord::from_pairs([("name", "Rowdy")]);
//! pet["owner"] = Value::from("John Smith");
//! pet.set("owner", Value::Null);
//!
//! assert_eq!(pet.get("owner"), Some(&Value::Null));
//! assert_eq!(pet.get("address"), None);
//! assert_eq!(pet.to_string(), r#"#<OpenRecord name="Rowdy", owner=nil>"#);
//! ```

pub mod coder;
pub mod deserialization;
pub mod error;
pub mod open_record;
pub mod open_value;
pub mod serialization;
pub mod types;

pub use coder::{Coder, MapCoder};
pub use error::RecordError;
pub use open_record::OpenRecord;
pub use open_value::{Number, RecordRef, Value};
pub use types::{FastMap, FieldIter, FieldName, ToFieldName};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Whether fields live in an explicit table rather than generated accessors.
/// Always true; the harnesses print it in their banner.
#[inline]
pub fn is_optimized() -> bool {
    true
}
