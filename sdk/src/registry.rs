use pullwire_schema::{compile_schema, SchemaError, SchemaTree, StructNode};

/// Binding between generated message types and their parsed schema
/// descriptors.
///
/// Generated code embeds its schema source as an escaped literal and
/// constructs one `Registry` from it inside a `OnceLock` singleton, then runs
/// every top-level registration routine exactly once, so descriptor accessors
/// never observe an unbound state. Tests may construct as many independent
/// registries as they like.
#[derive(Debug)]
pub struct Registry {
    tree: SchemaTree,
    text: String,
}

impl Registry {
    /// Parse and resolve schema text into a registry.
    pub fn from_text(text: &str) -> Result<Registry, SchemaError> {
        let tree = compile_schema(text)?;
        Ok(Registry {
            tree,
            text: text.to_string(),
        })
    }

    pub fn tree(&self) -> &SchemaTree {
        &self.tree
    }

    /// The schema source this registry was built from.
    pub fn schema_text(&self) -> &str {
        &self.text
    }

    /// Resolve a struct descriptor by dotted qualified name.
    pub fn lookup(&self, qualified: &str) -> Option<&StructNode> {
        self.tree.lookup(qualified)
    }
}
