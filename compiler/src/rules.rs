//! Per-field codegen rules: the pure mapping from (field kind × cardinality)
//! to an encode case, a decode case, and a reset statement.

use pullwire_schema::{Cardinality, FieldKind, FieldNode, SchemaTree};

use crate::error::CodegenError;
use crate::ir::Stmt;
use crate::naming::{field_ident, type_ident};

/// Rust type backing a field value, before cardinality wrapping.
pub fn base_type(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Bool => "bool".to_string(),
        FieldKind::Int32 => "i32".to_string(),
        FieldKind::Int64 => "i64".to_string(),
        FieldKind::Float => "f32".to_string(),
        FieldKind::Str => "String".to_string(),
        FieldKind::Struct(path) => type_ident(path),
    }
}

/// Zero value for a field kind, used by reset statements and `Vec` growth.
pub fn zero_expr(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Bool => "false".to_string(),
        FieldKind::Int32 | FieldKind::Int64 => "0".to_string(),
        FieldKind::Float => "0.0".to_string(),
        FieldKind::Str => "String::new()".to_string(),
        FieldKind::Struct(path) => format!("{}::default()", type_ident(path)),
    }
}

/// Full Rust type of the struct member backing a field.
pub fn slot_type(tree: &SchemaTree, field: &FieldNode) -> Result<String, CodegenError> {
    let base = base_type(&field.kind);
    Ok(match &field.card {
        Cardinality::Scalar => base,
        Cardinality::Indexed => format!("Vec<{}>", base),
        Cardinality::Map { .. } => {
            let key = map_key(tree, field)?;
            format!("BTreeMap<{}, {}>", key.rust_type, base)
        }
    })
}

struct MapKey {
    rust_type: &'static str,
    /// Key expression evaluated on a freshly decoded `entry`.
    entry_expr: String,
}

fn map_key(tree: &SchemaTree, field: &FieldNode) -> Result<MapKey, CodegenError> {
    let bad_key = || CodegenError::BadMapKey {
        owner: field.kind.struct_path().unwrap_or("?").to_string(),
        field: field.name.clone(),
    };

    let (path, key) = match (&field.kind, &field.card) {
        (FieldKind::Struct(path), Cardinality::Map { key }) => (path, key),
        _ => return Err(bad_key()),
    };
    let target = tree
        .lookup(path)
        .ok_or_else(|| CodegenError::UnresolvedType(path.clone()))?;
    let key_field = target.field_by_name(key).ok_or_else(|| bad_key())?;
    if !matches!(key_field.card, Cardinality::Scalar) {
        return Err(bad_key());
    }

    let ident = field_ident(&key_field.name);
    Ok(match key_field.kind {
        FieldKind::Int32 => MapKey {
            rust_type:  "i32",
            entry_expr: format!("entry.{}", ident),
        },
        FieldKind::Int64 => MapKey {
            rust_type:  "i64",
            entry_expr: format!("entry.{}", ident),
        },
        FieldKind::Str => MapKey {
            rust_type:  "String",
            entry_expr: format!("entry.{}.clone()", ident),
        },
        _ => return Err(bad_key()),
    })
}

fn write_expr(kind: &FieldKind, place: &str) -> String {
    match kind {
        FieldKind::Bool => format!("args.write_bool({place})"),
        FieldKind::Int32 => format!("args.write_int32({place})"),
        FieldKind::Int64 => format!("args.write_int64({place})"),
        FieldKind::Float => format!("args.write_float({place})"),
        FieldKind::Str => format!("args.write_string(&{place})"),
        FieldKind::Struct(_) => format!("args.encode_nested(&{place})"),
    }
}

fn read_expr(kind: &FieldKind, place: &str) -> String {
    match kind {
        FieldKind::Bool => format!("args.read_bool(&mut {place})"),
        FieldKind::Int32 => format!("args.read_int32(&mut {place})"),
        FieldKind::Int64 => format!("args.read_int64(&mut {place})"),
        FieldKind::Float => format!("args.read_float(&mut {place})"),
        FieldKind::Str => format!("args.read_string(&mut {place})"),
        FieldKind::Struct(_) => format!("args.decode_nested(&mut {place})"),
    }
}

/// Encode case for one field, keyed by its tag.
pub fn encode_arm(tree: &SchemaTree, field: &FieldNode) -> Result<Stmt, CodegenError> {
    let ident = field_ident(&field.name);
    let tag = field.tag;
    Ok(match &field.card {
        Cardinality::Scalar => Stmt::line(format!(
            "{tag} => {},",
            write_expr(&field.kind, &format!("self.{ident}"))
        )),
        Cardinality::Indexed => Stmt::block(
            format!("{tag} => {{"),
            vec![
                Stmt::line("let idx = args.require_idx()? as usize;"),
                Stmt::block(
                    format!("if idx >= self.{ident}.len() {{"),
                    vec![Stmt::line(
                        "return Err(WireError::NoField { watermark: idx as u32 });",
                    )],
                    "}",
                ),
                Stmt::line(write_expr(&field.kind, &format!("self.{ident}[idx]"))),
            ],
            "}",
        ),
        Cardinality::Map { .. } => {
            map_key(tree, field)?;
            Stmt::block(
                format!("{tag} => {{"),
                vec![
                    Stmt::line("let idx = args.require_idx()?;"),
                    Stmt::block(
                        "if idx == 0 {",
                        vec![Stmt::line("args.cursor()?.rewind();")],
                        "}",
                    ),
                    Stmt::line("let pos = args.cursor()?.pos();"),
                    Stmt::block(
                        format!("match self.{ident}.values().nth(pos) {{"),
                        vec![
                            Stmt::line("None => Err(WireError::NoField { watermark: idx }),"),
                            Stmt::block(
                                "Some(entry) => {",
                                vec![
                                    Stmt::line("let written = args.encode_nested(entry)?;"),
                                    Stmt::line("args.cursor()?.advance();"),
                                    Stmt::line("Ok(written)"),
                                ],
                                "}",
                            ),
                        ],
                        "}",
                    ),
                ],
                "}",
            )
        }
    })
}

/// Decode case for one field, keyed by its tag.
pub fn decode_arm(tree: &SchemaTree, field: &FieldNode) -> Result<Stmt, CodegenError> {
    let ident = field_ident(&field.name);
    let tag = field.tag;
    Ok(match &field.card {
        Cardinality::Scalar => Stmt::line(format!(
            "{tag} => {},",
            read_expr(&field.kind, &format!("self.{ident}"))
        )),
        Cardinality::Indexed => Stmt::block(
            format!("{tag} => {{"),
            vec![
                Stmt::line("let idx = args.require_idx()? as usize;"),
                Stmt::block(
                    "if args.len == 0 {",
                    vec![Stmt::line("return Ok(0);")],
                    "}",
                ),
                Stmt::block(
                    format!("if self.{ident}.len() <= idx {{"),
                    vec![Stmt::line(format!(
                        "self.{ident}.resize(idx + 1, {});",
                        zero_expr(&field.kind)
                    ))],
                    "}",
                ),
                Stmt::line(read_expr(&field.kind, &format!("self.{ident}[idx]"))),
            ],
            "}",
        ),
        Cardinality::Map { .. } => {
            let key = map_key(tree, field)?;
            Stmt::block(
                format!("{tag} => {{"),
                vec![
                    Stmt::line("args.require_idx()?;"),
                    Stmt::block(
                        "if args.len == 0 {",
                        vec![Stmt::line("return Ok(0);")],
                        "}",
                    ),
                    Stmt::line(format!(
                        "let mut entry = {};",
                        zero_expr(&field.kind)
                    )),
                    Stmt::line("let consumed = args.decode_nested(&mut entry)?;"),
                    Stmt::line(format!(
                        "self.{ident}.insert({}, entry);",
                        key.entry_expr
                    )),
                    Stmt::line("Ok(consumed)"),
                ],
                "}",
            )
        }
    })
}

/// Reset statement for one field.
pub fn reset_stmt(field: &FieldNode) -> Stmt {
    let ident = field_ident(&field.name);
    match (&field.kind, &field.card) {
        (_, Cardinality::Indexed) | (_, Cardinality::Map { .. }) => {
            Stmt::line(format!("self.{ident}.clear();"))
        }
        (FieldKind::Str, Cardinality::Scalar) => Stmt::line(format!("self.{ident}.clear();")),
        (FieldKind::Struct(_), Cardinality::Scalar) => {
            Stmt::line(format!("self.{ident}.reset();"))
        }
        (kind, Cardinality::Scalar) => {
            Stmt::line(format!("self.{ident} = {};", zero_expr(kind)))
        }
    }
}
