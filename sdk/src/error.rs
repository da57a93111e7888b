use thiserror::Error;

/// Errors and signals of the pull enumeration protocol.
///
/// `NoField` is not a failure: it is the termination signal of an
/// enumeration pass, carrying the element count discovered so far. Every
/// other variant aborts the call that produced it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("unknown field tag {0}")]
    UnknownTag(u32),

    #[error("no field at index {watermark}")]
    NoField { watermark: u32 },

    #[error("input truncated while reading {0}")]
    Truncated(&'static str),

    #[error("malformed {0} on the wire")]
    Malformed(&'static str),

    #[error("string value is not valid utf-8")]
    InvalidUtf8,

    #[error("field tag {0} requires an element index")]
    MissingIndex(u32),

    #[error("field tag {0} requires a map cursor")]
    MissingCursor(u32),

    #[error("field tag {0} requires a struct descriptor")]
    MissingDescriptor(u32),

    #[error("struct {0} is not defined by the registry schema")]
    UnknownStruct(String),

    #[error("args built for {built} were used for {used}")]
    Direction {
        built: &'static str,
        used:  &'static str,
    },
}
