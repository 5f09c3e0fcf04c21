pub mod coerce;
pub mod error;
pub mod field;
pub mod key;
pub mod leaf;
pub mod loader;
pub mod logger;
pub mod schema;
pub mod visit;

// Re-export main types
pub use error::{SchemaError, TraversalError, Validity, VisitError, append, ensure};
pub use field::{FieldDef, FieldMut, FieldRef, Record, Shape};
pub use key::derive_key;
pub use leaf::{Leaf, LeafKind, Slot};
pub use loader::{Loader, load, load_with, must_load};
pub use logger::{Logger, log_with_prefix};
pub use schema::{LeafSchema, schema};
pub use visit::{Inspector, Visitor, inspect, visit};

// Re-export derive macro
pub use env_configs_macros::Record;

// Arbitrary-precision leaf type
pub use num_bigint::BigInt;
