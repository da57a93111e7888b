use pullwire_schema::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Cycle in schema graph: struct {0} reached twice during generation")]
    SchemaCycle(String),

    #[error("Unresolved struct reference {0}")]
    UnresolvedType(String),

    #[error("Field {field} of {owner} cannot key a map")]
    BadMapKey { owner: String, field: String },
}
