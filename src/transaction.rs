//! Transaction records: the immutable user actions sealed into blocks

pub mod record;
pub mod types;

pub use record::*;
pub use types::*;
