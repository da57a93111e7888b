use std::collections::HashMap;

use crate::error::SchemaError;
use crate::types::{Cardinality, FieldKind, SchemaTree, StructNode, SCOPE_SEP};
use crate::utils::quote;

/// Primitive type names, reserved as struct names.
pub const NATIVE_TYPES: [&str; 5] = ["bool", "int32", "int64", "float", "string"];

/// Scope path -> (local struct name -> qualified path). The empty scope holds
/// the top-level structs.
type ScopeIndex = HashMap<String, HashMap<String, String>>;

/// Rewrite raw struct references into qualified paths and run the identity
/// checks: duplicate/reserved type names, duplicate dispatch tags, map-key
/// shape, and recursive scalar nesting. Returns `Ok(())` when the tree is
/// ready for code generation.
pub fn resolve_schema(tree: &mut SchemaTree) -> Result<(), SchemaError> {
    let snapshot = tree.clone();
    let scopes = index_scopes(&snapshot)?;
    check_root_tags(&snapshot)?;

    let mut chain = Vec::new();
    for root in &mut tree.roots {
        resolve_struct(root, &mut chain, &scopes, &snapshot)?;
    }

    let mut names: Vec<String> = scopes
        .values()
        .flat_map(|entries| entries.values().cloned())
        .collect();
    names.sort();
    let mut state = HashMap::new();
    for qualified in &names {
        check_recursion(qualified, tree, &mut state)?;
    }

    Ok(())
}

fn index_scopes(tree: &SchemaTree) -> Result<ScopeIndex, SchemaError> {
    fn visit(
        node: &StructNode,
        scope: &str,
        qualified: &str,
        scopes: &mut ScopeIndex,
    ) -> Result<(), SchemaError> {
        if NATIVE_TYPES.contains(&node.name.as_str()) {
            return Err(SchemaError::Resolve(format!(
                "The type name {} is reserved",
                quote(&node.name)
            )));
        }
        let entries = scopes.entry(scope.to_string()).or_default();
        if entries
            .insert(node.name.clone(), qualified.to_string())
            .is_some()
        {
            return Err(SchemaError::Resolve(format!(
                "The type {} is defined twice",
                quote(qualified)
            )));
        }
        for child in &node.children {
            let child_qualified = format!("{}{}{}", qualified, SCOPE_SEP, child.name);
            visit(child, qualified, &child_qualified, scopes)?;
        }
        Ok(())
    }

    let mut scopes = ScopeIndex::new();
    scopes.entry(String::new()).or_default();
    for root in &tree.roots {
        visit(root, "", &root.name, &mut scopes)?;
    }
    Ok(scopes)
}

fn check_root_tags(tree: &SchemaTree) -> Result<(), SchemaError> {
    let mut seen = Vec::new();
    for root in &tree.roots {
        if seen.contains(&root.tag) {
            return Err(SchemaError::Resolve(format!(
                "The dispatch tag {:#x} of {} is used twice",
                root.tag,
                quote(&root.name)
            )));
        }
        seen.push(root.tag);
    }
    Ok(())
}

fn resolve_struct(
    node: &mut StructNode,
    chain: &mut Vec<String>,
    scopes: &ScopeIndex,
    snapshot: &SchemaTree,
) -> Result<(), SchemaError> {
    let qualified = match chain.last() {
        Some(parent) => format!("{}{}{}", parent, SCOPE_SEP, node.name),
        None => node.name.clone(),
    };

    let mut tags = Vec::new();
    let mut names = Vec::new();
    for field in &node.fields {
        if tags.contains(&field.tag) {
            return Err(SchemaError::Resolve(format!(
                "The tag for field {} is used twice in {}",
                quote(&field.name),
                quote(&qualified)
            )));
        }
        if names.contains(&field.name) {
            return Err(SchemaError::Resolve(format!(
                "The field {} is defined twice in {}",
                quote(&field.name),
                quote(&qualified)
            )));
        }
        tags.push(field.tag);
        names.push(field.name.clone());
    }

    for field in &mut node.fields {
        if let FieldKind::Struct(raw) = &field.kind {
            let target =
                resolve_name(raw, &qualified, chain, scopes).ok_or_else(|| {
                    SchemaError::Resolve(format!(
                        "The type {} is not defined for field {}",
                        quote(raw),
                        quote(&field.name)
                    ))
                })?;
            if let Cardinality::Map { key } = &field.card {
                check_map_key(snapshot, &target, key, &field.name)?;
            }
            field.kind = FieldKind::Struct(target);
        } else if let Cardinality::Map { .. } = field.card {
            return Err(SchemaError::Resolve(format!(
                "The field {} cannot be keyed: only struct references form maps",
                quote(&field.name)
            )));
        }
    }

    chain.push(qualified);
    for child in &mut node.children {
        resolve_struct(child, chain, scopes, snapshot)?;
    }
    chain.pop();
    Ok(())
}

/// Lexical search: own children first, then the enclosing chain from the
/// inside out, then the top level.
fn resolve_name(
    raw: &str,
    qualified: &str,
    chain: &[String],
    scopes: &ScopeIndex,
) -> Option<String> {
    if let Some(found) = scopes.get(qualified).and_then(|m| m.get(raw)) {
        return Some(found.clone());
    }
    for scope in chain.iter().rev() {
        if let Some(found) = scopes.get(scope.as_str()).and_then(|m| m.get(raw)) {
            return Some(found.clone());
        }
    }
    scopes.get("").and_then(|m| m.get(raw)).cloned()
}

fn check_map_key(
    snapshot: &SchemaTree,
    target: &str,
    key: &str,
    field_name: &str,
) -> Result<(), SchemaError> {
    let node = snapshot.lookup(target).ok_or_else(|| {
        SchemaError::Resolve(format!("The type {} is not defined", quote(target)))
    })?;
    let key_field = node.field_by_name(key).ok_or_else(|| {
        SchemaError::Resolve(format!(
            "The map key {} for field {} is not a field of {}",
            quote(key),
            quote(field_name),
            quote(target)
        ))
    })?;
    let scalar = matches!(key_field.card, Cardinality::Scalar);
    let keyable = matches!(
        key_field.kind,
        FieldKind::Int32 | FieldKind::Int64 | FieldKind::Str
    );
    if !scalar || !keyable {
        return Err(SchemaError::Resolve(format!(
            "The map key {} for field {} must be a scalar int32, int64, or string field of {}",
            quote(key),
            quote(field_name),
            quote(target)
        )));
    }
    Ok(())
}

/// Structs must not contain themselves through a chain of scalar struct
/// fields; repeated and map fields break the chain.
fn check_recursion(
    qualified: &str,
    tree: &SchemaTree,
    state: &mut HashMap<String, u8>,
) -> Result<(), SchemaError> {
    let node = match tree.lookup(qualified) {
        Some(node) => node,
        None => return Ok(()),
    };
    match state.get(qualified) {
        Some(1) => {
            return Err(SchemaError::Resolve(format!(
                "Recursive nesting of {} is not allowed",
                quote(qualified)
            )))
        }
        Some(2) => return Ok(()),
        _ => {}
    }
    state.insert(qualified.to_string(), 1);
    for field in &node.fields {
        if let (FieldKind::Struct(path), Cardinality::Scalar) = (&field.kind, &field.card) {
            check_recursion(path, tree, state)?;
        }
    }
    state.insert(qualified.to_string(), 2);
    Ok(())
}
