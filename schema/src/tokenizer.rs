use lazy_static::lazy_static;
use regex::Regex;

use crate::error::SchemaError;
use crate::utils::{error, quote};

lazy_static! {
    pub static ref TOKEN_REGEX: Regex = Regex::new(
        r"(0[xX][0-9a-fA-F]+|\b\d+\b|[:=;{}]|\[\]|\[[A-Za-z_][A-Za-z0-9_]*\]|\b[A-Za-z_][A-Za-z0-9_]*\b|//.*|\s+)"
    )
    .unwrap();
    pub static ref SKIP_RX: Regex = Regex::new(r"^(//.*|\s+)$").unwrap();
}

#[derive(Debug, PartialEq)]
pub struct Token {
    pub text:   String,
    pub line:   usize,
    pub column: usize,
}

/// Split schema text into tokens, tracking line/column positions. Comments
/// and whitespace are dropped; a trailing empty EOF token is appended.
pub fn tokenize_schema(text: &str) -> Result<Vec<Token>, SchemaError> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut column = 1;
    let mut cursor = 0;

    for mat in TOKEN_REGEX.find_iter(text) {
        if mat.start() > cursor {
            let gap = &text[cursor..mat.start()];
            return Err(error(&format!("Syntax error: {}", quote(gap)), line, column));
        }

        let part = mat.as_str();
        if !SKIP_RX.is_match(part) {
            tokens.push(Token {
                text: part.to_string(),
                line,
                column,
            });
        }

        let newlines = part.matches('\n').count();
        if newlines > 0 {
            line += newlines;
            let tail = part.rsplit('\n').next().unwrap_or("");
            column = tail.len() + 1;
        } else {
            column += part.len();
        }

        cursor = mat.end();
    }

    if cursor != text.len() {
        let gap = &text[cursor..];
        return Err(error(&format!("Syntax error: {}", quote(gap)), line, column));
    }

    tokens.push(Token {
        text: String::new(),
        line,
        column,
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        tokenize_schema(input)
            .expect("tokenize_schema failed")
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn tokenize_field_line() {
        assert_eq!(
            texts("book: Phone[id] = 6;"),
            vec!["book", ":", "Phone", "[id]", "=", "6", ";", ""]
        );
    }

    #[test]
    fn tokenize_skips_comments() {
        assert_eq!(
            texts("// header\nstruct A = 0x01 { }"),
            vec!["struct", "A", "=", "0x01", "{", "}", ""]
        );
    }

    #[test]
    fn tokenize_tracks_positions() {
        let tokens = tokenize_schema("a\n  bb").expect("tokenize_schema failed");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
    }

    #[test]
    fn tokenize_rejects_stray_bytes() {
        assert!(tokenize_schema("a ? b").is_err());
    }
}
