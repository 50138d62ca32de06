pub mod document;
pub mod error;
pub mod field;
pub mod gaps;
pub mod io;
pub mod migrations;
pub mod paths;
pub mod role;
pub mod store;

pub use document::Document;
pub use error::{ErrorKind, Result, StoreError};
pub use field::{Field, FieldPath, Record};
pub use role::Role;
pub use store::{FieldChange, Snapshot, Store, Update};
