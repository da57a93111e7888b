//! Global assembly: concatenates every top-level unit in schema order, emits
//! the registry singleton with its one-time registration pass, and embeds the
//! schema source as an escaped literal so generated code is self-contained.

use pullwire_schema::{compile_schema, Cardinality, SchemaTree, StructNode};

use crate::error::CodegenError;
use crate::ir::{render, Stmt};
use crate::walker::Session;

/// Options for one generation run.
#[derive(Debug, Clone)]
pub struct GenOptions {
    /// Optional enclosing module wrapped around all generated items.
    pub module: Option<String>,
    /// Path of the runtime crate in generated `use` statements.
    pub runtime_crate: String,
}

impl Default for GenOptions {
    fn default() -> GenOptions {
        GenOptions {
            module: None,
            runtime_crate: "pullwire".to_string(),
        }
    }
}

/// Compile schema text straight to generated Rust source.
pub fn generate_from_text(text: &str, opts: &GenOptions) -> Result<String, CodegenError> {
    let tree = compile_schema(text)?;
    generate(&tree, text, opts)
}

/// Generate one compilation unit for a resolved schema tree. `source` is the
/// schema text embedded into the output for runtime self-description. Any
/// traversal failure aborts the whole unit; no partial output is produced.
pub fn generate(
    tree: &SchemaTree,
    source: &str,
    opts: &GenOptions,
) -> Result<String, CodegenError> {
    let mut session = Session::new();
    let mut items: Vec<Stmt> = Vec::new();
    for root in &tree.roots {
        items.extend(session.walk(tree, root)?);
    }
    items.extend(emit_registry(&session, source));

    let mut unit: Vec<Stmt> = Vec::new();
    unit.push(Stmt::line("// @generated by pullwire-compiler. Do not edit."));
    unit.push(Stmt::Blank);
    match &opts.module {
        Some(module) => {
            let mut body = emit_uses(tree, opts);
            body.extend(items);
            unit.push(Stmt::block(format!("pub mod {} {{", module), body, "}"));
        }
        None => {
            unit.extend(emit_uses(tree, opts));
            unit.extend(items);
        }
    }
    Ok(render(&unit))
}

fn emit_uses(tree: &SchemaTree, opts: &GenOptions) -> Vec<Stmt> {
    let mut uses = Vec::new();
    if uses_maps(tree) {
        uses.push(Stmt::line("use std::collections::BTreeMap;"));
    }
    uses.push(Stmt::line("use std::sync::{Once, OnceLock};"));
    uses.push(Stmt::Blank);
    uses.push(Stmt::line(format!(
        "use {}::schema::StructNode;",
        opts.runtime_crate
    )));
    uses.push(Stmt::line(format!(
        "use {}::{{FieldArgs, Registry, Wire, WireError}};",
        opts.runtime_crate
    )));
    uses.push(Stmt::Blank);
    uses
}

fn uses_maps(tree: &SchemaTree) -> bool {
    fn visit(st: &StructNode) -> bool {
        st.fields
            .iter()
            .any(|f| matches!(f.card, Cardinality::Map { .. }))
            || st.children.iter().any(visit)
    }
    tree.roots.iter().any(visit)
}

fn emit_registry(session: &Session, source: &str) -> Vec<Stmt> {
    let binds: Vec<Stmt> = session
        .registrations()
        .iter()
        .map(|entry| Stmt::line(format!("{}::register(reg);", entry.ident)))
        .collect();
    vec![
        Stmt::line(format!(
            "const SCHEMA_TEXT: &str = \"{}\";",
            escape_schema(source)
        )),
        Stmt::Blank,
        Stmt::block(
            "pub fn registry() -> &'static Registry {",
            vec![
                Stmt::line("static REGISTRY: OnceLock<Registry> = OnceLock::new();"),
                Stmt::line("static BIND: Once = Once::new();"),
                Stmt::block(
                    "let reg = REGISTRY.get_or_init(|| {",
                    vec![Stmt::line(
                        "Registry::from_text(SCHEMA_TEXT).expect(\"embedded schema text parses\")",
                    )],
                    "});",
                ),
                Stmt::block("BIND.call_once(|| {", binds, "});"),
                Stmt::line("reg"),
            ],
            "}",
        ),
    ]
}

/// Escape schema text into a Rust string literal: `\xNN` per ASCII char,
/// `\u{NN}` beyond.
pub fn escape_schema(source: &str) -> String {
    let mut out = String::new();
    for ch in source.chars() {
        if ch.is_ascii() {
            out.push_str(&format!("\\x{:02x}", ch as u32));
        } else {
            out.push_str(&format!("\\u{{{:x}}}", ch as u32));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_schema_bytes() {
        assert_eq!(escape_schema("ab\n"), "\\x61\\x62\\x0a");
        assert_eq!(escape_schema("π"), "\\u{3c0}");
    }
}
