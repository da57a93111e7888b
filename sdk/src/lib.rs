//! pullwire
//!
//! Runtime support for pullwire-generated message types.
//!
//! Generated structs implement [`Wire`], a pull-based field enumeration
//! protocol: fields are encoded, decoded, and reset one at a time through
//! dispatchers keyed by field tag. Repeated and map fields are enumerated by
//! an explicit element index — the caller asks for 0, 1, 2, … until the
//! dispatcher answers [`WireError::NoField`] with a watermark equal to the
//! element count discovered so far.
//!
//! # Contract
//!
//! - The registry singleton emitted into generated code performs exactly one
//!   initialization, guarded by `OnceLock` + `Once`; first use from any
//!   thread is race-free.
//! - Map enumeration state lives in an explicit [`MapCursor`] owned by the
//!   driver of one pass. A cursor is never shared across instances or
//!   threads and is not reentrant: only one encode pass over a given map
//!   field may be active at a time.
//! - Within one enumeration pass, element indices must arrive in
//!   non-decreasing order starting at 0. Index 0 restarts a map pass; any
//!   other index continues from the cursor position.
//! - There is no cancellation: a failed decode leaves containers partially
//!   grown, and callers own whole-message recovery.

pub mod args;
pub mod bb;
pub mod codec;
pub mod cursor;
pub mod error;
pub mod registry;

pub use args::{FieldArgs, Wire};
pub use bb::{ByteBuffer, WriteBuffer};
pub use cursor::MapCursor;
pub use error::WireError;
pub use registry::Registry;

pub use pullwire_schema as schema;

/// Dump a registry's resolved schema model as pretty-printed JSON.
pub fn schema_json(registry: &Registry) -> String {
    serde_json::to_string_pretty(registry.tree()).unwrap()
}
