use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Parse error at line {line}, column {column}: {msg}")]
    Parse {
        msg:    String,
        line:   usize,
        column: usize,
    },

    #[error("Resolve error: {0}")]
    Resolve(String),
}
