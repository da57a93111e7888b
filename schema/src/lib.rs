//! pullwire-schema
//!
//! This crate implements the front half of the pullwire pipeline:
//!  1) A tokenizer + parser for `.pw` schema files,
//!  2) Reference resolution (qualified struct paths, duplicate/identity
//!     checks, recursive-nesting rejection),
//!  3) The `SchemaTree` / `StructNode` / `FieldNode` descriptor model consumed
//!     by the code generator and, at runtime, by the registry when it parses
//!     the schema text embedded in generated code.

pub mod error;
pub mod parser;
pub mod resolve;
pub mod tokenizer;
pub mod types;
pub mod utils;

pub use error::SchemaError;
pub use parser::parse_schema;
pub use resolve::resolve_schema;
pub use tokenizer::tokenize_schema;
pub use types::{Cardinality, FieldKind, FieldNode, SchemaTree, StructNode, SCOPE_SEP};

/// Tokenize, parse, and resolve a textual schema in one step.
/// Returns `Err(SchemaError)` if any stage fails.
pub fn compile_schema(text: &str) -> Result<SchemaTree, SchemaError> {
    let tokens = tokenize_schema(text)?;
    let mut tree = parse_schema(&tokens)?;
    resolve_schema(&mut tree)?;
    Ok(tree)
}
