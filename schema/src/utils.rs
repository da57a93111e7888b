use crate::error::SchemaError;

pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap()
}

pub fn error(msg: &str, line: usize, column: usize) -> SchemaError {
    SchemaError::Parse {
        msg: msg.to_string(),
        line,
        column,
    }
}
