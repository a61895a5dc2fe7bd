mod compare;
pub(crate) mod guard;
mod inspect;
mod read_op;
pub mod record;
mod write_op;

pub use record::OpenRecord;
