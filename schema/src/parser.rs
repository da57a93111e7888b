use lazy_static::lazy_static;
use regex::Regex;

use crate::error::SchemaError;
use crate::tokenizer::Token;
use crate::types::{Cardinality, FieldKind, FieldNode, SchemaTree, StructNode};
use crate::utils::{error, quote};

lazy_static! {
    static ref IDENTIFIER:     Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref COLON:          Regex = Regex::new(r"^:$").unwrap();
    static ref EQUALS:         Regex = Regex::new(r"^=$").unwrap();
    static ref SEMICOLON:      Regex = Regex::new(r"^;$").unwrap();
    static ref INTEGER:        Regex = Regex::new(r"^(0[xX][0-9a-fA-F]+|\d+)$").unwrap();
    static ref LEFT_BRACE:     Regex = Regex::new(r"^\{$").unwrap();
    static ref RIGHT_BRACE:    Regex = Regex::new(r"^\}$").unwrap();
    static ref ARRAY_TOKEN:    Regex = Regex::new(r"^\[\]$").unwrap();
    static ref MAP_TOKEN:      Regex = Regex::new(r"^\[[A-Za-z_][A-Za-z0-9_]*\]$").unwrap();
    static ref STRUCT_KEYWORD: Regex = Regex::new(r"^struct$").unwrap();
    static ref EOF:            Regex = Regex::new(r"^$").unwrap();
}

fn current_token<'a>(tokens: &'a [Token], index: usize) -> &'a Token {
    tokens.get(index).expect("token stream ends with EOF")
}

fn eat(tokens: &[Token], index: &mut usize, test: &Regex) -> bool {
    if test.is_match(&current_token(tokens, *index).text) {
        *index += 1;
        true
    } else {
        false
    }
}

fn expect(
    tokens: &[Token],
    index: &mut usize,
    test: &Regex,
    expected: &str,
) -> Result<(), SchemaError> {
    if !eat(tokens, index, test) {
        let tok = current_token(tokens, *index);
        return Err(error(
            &format!("Expected {} but found {}", expected, quote(&tok.text)),
            tok.line,
            tok.column,
        ));
    }
    Ok(())
}

fn parse_int(tok: &Token) -> Result<u32, SchemaError> {
    let parsed = if let Some(hex) = tok.text.strip_prefix("0x").or_else(|| tok.text.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else {
        tok.text.parse::<u32>()
    };
    parsed.map_err(|_| {
        error(
            &format!("Invalid integer {}", quote(&tok.text)),
            tok.line,
            tok.column,
        )
    })
}

fn field_kind(name: &str) -> FieldKind {
    match name {
        "bool" => FieldKind::Bool,
        "int32" => FieldKind::Int32,
        "int64" => FieldKind::Int64,
        "float" => FieldKind::Float,
        "string" => FieldKind::Str,
        other => FieldKind::Struct(other.to_string()),
    }
}

/// Parse a token stream into an unresolved `SchemaTree`. Struct references
/// still hold raw source names; run `resolve_schema` before using the tree.
pub fn parse_schema(tokens: &[Token]) -> Result<SchemaTree, SchemaError> {
    let mut roots = Vec::new();
    let mut index = 0;

    while index < tokens.len() && !eat(tokens, &mut index, &EOF) {
        expect(tokens, &mut index, &STRUCT_KEYWORD, "\"struct\"")?;
        let root = parse_struct(tokens, &mut index, true, 0, 0)?;
        roots.push(root);
    }

    Ok(SchemaTree { roots })
}

fn parse_struct(
    tokens: &[Token],
    index: &mut usize,
    top_level: bool,
    parent_tag: u32,
    ordinal: usize,
) -> Result<StructNode, SchemaError> {
    let name_tok = current_token(tokens, *index);
    let (name, line, column) = (name_tok.text.clone(), name_tok.line, name_tok.column);
    expect(tokens, index, &IDENTIFIER, "identifier")?;

    // Top-level structs carry a declared dispatch tag; nested ones derive a
    // hierarchical id from their parent.
    let tag = if top_level {
        expect(tokens, index, &EQUALS, "\"=\"")?;
        let tag_tok = current_token(tokens, *index);
        expect(tokens, index, &INTEGER, "integer")?;
        parse_int(tag_tok)?
    } else {
        (parent_tag << 8) | (ordinal as u32 + 1)
    };

    expect(tokens, index, &LEFT_BRACE, "\"{\"")?;

    let mut fields = Vec::new();
    let mut children: Vec<StructNode> = Vec::new();
    while !eat(tokens, index, &RIGHT_BRACE) {
        if eat(tokens, index, &STRUCT_KEYWORD) {
            let child = parse_struct(tokens, index, false, tag, children.len())?;
            children.push(child);
        } else {
            fields.push(parse_field(tokens, index)?);
        }
    }

    Ok(StructNode {
        name,
        line,
        column,
        tag,
        top_level,
        fields,
        children,
    })
}

fn parse_field(tokens: &[Token], index: &mut usize) -> Result<FieldNode, SchemaError> {
    let name_tok = current_token(tokens, *index);
    let (name, line, column) = (name_tok.text.clone(), name_tok.line, name_tok.column);
    expect(tokens, index, &IDENTIFIER, "identifier")?;
    expect(tokens, index, &COLON, "\":\"")?;

    let type_tok = current_token(tokens, *index);
    let type_name = type_tok.text.clone();
    expect(tokens, index, &IDENTIFIER, "identifier")?;

    let card = if eat(tokens, index, &ARRAY_TOKEN) {
        Cardinality::Indexed
    } else if MAP_TOKEN.is_match(&current_token(tokens, *index).text) {
        let key_tok = current_token(tokens, *index);
        let key = key_tok.text[1..key_tok.text.len() - 1].to_string();
        *index += 1;
        Cardinality::Map { key }
    } else {
        Cardinality::Scalar
    };

    expect(tokens, index, &EQUALS, "\"=\"")?;
    let tag_tok = current_token(tokens, *index);
    expect(tokens, index, &INTEGER, "integer")?;
    let tag = parse_int(tag_tok)?;
    expect(tokens, index, &SEMICOLON, "\";\"")?;

    Ok(FieldNode {
        name,
        line,
        column,
        tag,
        kind: field_kind(&type_name),
        card,
    })
}
