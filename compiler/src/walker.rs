//! Post-order tree walker producing one generated unit per struct.

use std::collections::HashSet;

use pullwire_schema::{utils::quote, SchemaTree, StructNode, SCOPE_SEP};

use crate::error::CodegenError;
use crate::ir::Stmt;
use crate::naming::{descriptor_static, type_ident};
use crate::rules;

/// One top-level registration: binds a generated type to its schema
/// descriptor when the registry singleton is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationEntry {
    pub qualified: String,
    pub ident:     String,
}

/// Mutable traversal state for one generation session: the visited/defined
/// sets and the registration list. Created at session start, discarded with
/// the session — never ambient state across compilations.
#[derive(Default)]
pub struct Session {
    visited:       HashSet<String>,
    defined:       HashSet<String>,
    registrations: Vec<RegistrationEntry>,
}

/// Case tables and reset statements collected for one struct.
struct Unit {
    encode_arms: Vec<Stmt>,
    decode_arms: Vec<Stmt>,
    reset_stmts: Vec<Stmt>,
}

impl Session {
    pub fn new() -> Session {
        Session::default()
    }

    pub fn registrations(&self) -> &[RegistrationEntry] {
        &self.registrations
    }

    /// Walk one top-level struct. Returns the generated items for the struct
    /// and all of its descendants, children first.
    pub fn walk(&mut self, tree: &SchemaTree, st: &StructNode) -> Result<Vec<Stmt>, CodegenError> {
        self.walk_struct(tree, st, None)
    }

    fn walk_struct(
        &mut self,
        tree: &SchemaTree,
        st: &StructNode,
        parent: Option<&str>,
    ) -> Result<Vec<Stmt>, CodegenError> {
        let qualified = match parent {
            Some(parent) => format!("{}{}{}", parent, SCOPE_SEP, st.name),
            None => st.name.clone(),
        };
        if self.defined.contains(&qualified) || !self.visited.insert(qualified.clone()) {
            return Err(CodegenError::SchemaCycle(quote(&qualified)));
        }

        let mut items = Vec::new();
        for child in &st.children {
            items.extend(self.walk_struct(tree, child, Some(&qualified))?);
        }

        let ident = type_ident(&qualified);
        let mut unit = Unit {
            encode_arms: Vec::new(),
            decode_arms: Vec::new(),
            reset_stmts: Vec::new(),
        };
        st.for_each_field(|field| {
            unit.encode_arms.push(rules::encode_arm(tree, field)?);
            unit.decode_arms.push(rules::decode_arm(tree, field)?);
            unit.reset_stmts.push(rules::reset_stmt(field));
            Ok::<(), CodegenError>(())
        })?;

        items.extend(emit_struct_def(tree, st, &ident)?);
        if st.top_level {
            items.extend(emit_identity(st, &qualified, &ident));
            self.registrations.push(RegistrationEntry {
                qualified: qualified.clone(),
                ident:     ident.clone(),
            });
        }
        items.extend(emit_wire_impl(&ident, unit));

        self.defined.insert(qualified);
        Ok(items)
    }
}

fn emit_struct_def(
    tree: &SchemaTree,
    st: &StructNode,
    ident: &str,
) -> Result<Vec<Stmt>, CodegenError> {
    let mut fields = Vec::new();
    st.for_each_field(|field| {
        fields.push(Stmt::line(format!(
            "pub {}: {},",
            crate::naming::field_ident(&field.name),
            rules::slot_type(tree, field)?
        )));
        Ok::<(), CodegenError>(())
    })?;
    Ok(vec![
        Stmt::line("#[derive(Debug, Clone, Default, PartialEq)]"),
        Stmt::block(format!("pub struct {} {{", ident), fields, "}"),
        Stmt::Blank,
    ])
}

/// Identity statements emitted for top-level structs only: tag and name
/// accessors, the cached descriptor accessor, and the registration routine.
fn emit_identity(st: &StructNode, qualified: &str, ident: &str) -> Vec<Stmt> {
    let stat = descriptor_static(ident);
    vec![
        Stmt::line(format!(
            "static {}: OnceLock<&'static StructNode> = OnceLock::new();",
            stat
        )),
        Stmt::Blank,
        Stmt::block(
            format!("impl {} {{", ident),
            vec![
                Stmt::line(format!("pub fn tag() -> u32 {{ {:#x} }}", st.tag)),
                Stmt::Blank,
                Stmt::line(format!(
                    "pub fn name() -> &'static str {{ {} }}",
                    quote(qualified)
                )),
                Stmt::Blank,
                Stmt::block(
                    "pub fn descriptor() -> &'static StructNode {",
                    vec![
                        Stmt::line("registry();"),
                        Stmt::line(format!(
                            "{}.get().copied().expect(\"descriptor bound during registry construction\")",
                            stat
                        )),
                    ],
                    "}",
                ),
                Stmt::Blank,
                Stmt::block(
                    "fn register(reg: &'static Registry) {",
                    vec![
                        Stmt::line(format!(
                            "let st = reg.lookup({}).expect(\"embedded schema defines {}\");",
                            quote(qualified),
                            qualified
                        )),
                        Stmt::line(format!("let _ = {}.set(st);", stat)),
                    ],
                    "}",
                ),
            ],
            "}",
        ),
        Stmt::Blank,
    ]
}

fn emit_wire_impl(ident: &str, unit: Unit) -> Vec<Stmt> {
    let Unit {
        mut encode_arms,
        mut decode_arms,
        reset_stmts,
    } = unit;
    encode_arms.push(Stmt::line("tag => Err(WireError::UnknownTag(tag)),"));
    decode_arms.push(Stmt::line("tag => Err(WireError::UnknownTag(tag)),"));

    vec![
        Stmt::block(
            format!("impl Wire for {} {{", ident),
            vec![
                Stmt::block(
                    "fn encode_field(&self, args: &mut FieldArgs<'_, '_>) -> Result<usize, WireError> {",
                    vec![Stmt::block("match args.tag {", encode_arms, "}")],
                    "}",
                ),
                Stmt::Blank,
                Stmt::block(
                    "fn decode_field(&mut self, args: &mut FieldArgs<'_, '_>) -> Result<usize, WireError> {",
                    vec![Stmt::block("match args.tag {", decode_arms, "}")],
                    "}",
                ),
                Stmt::Blank,
                Stmt::block("fn reset(&mut self) {", reset_stmts, "}"),
            ],
            "}",
        ),
        Stmt::Blank,
    ]
}
