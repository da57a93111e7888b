use pullwire_compiler::{generate, generate_from_text, CodegenError, GenOptions};
use pullwire_schema::{SchemaTree, StructNode};

const ADDRESS_BOOK: &str = r#"
struct Person = 0x01 {
    struct Phone {
        id: int32 = 1;
        number: string = 2;
    }
    name: string = 1;
    age: int32 = 2;
    nicknames: string[] = 3;
    home: Phone = 4;
    book: Phone[id] = 5;
}

struct Ping = 0x02 {
    seq: int64 = 1;
}
"#;

fn gen(text: &str) -> String {
    generate_from_text(text, &GenOptions::default()).expect("generate_from_text failed")
}

#[test]
fn children_precede_parents() {
    let code = gen(ADDRESS_BOOK);
    let phone = code.find("pub struct PersonPhone {").expect("PersonPhone missing");
    let person = code.find("pub struct Person {").expect("Person missing");
    let ping = code.find("pub struct Ping {").expect("Ping missing");
    assert!(phone < person, "nested struct must be emitted before parent");
    assert!(person < ping, "top-level order follows schema order");
    // Each struct is generated exactly once.
    assert_eq!(code.matches("impl Wire for PersonPhone {").count(), 1);
    assert_eq!(code.matches("impl Wire for Person {").count(), 1);
}

#[test]
fn scalar_case_tables() {
    let code = gen(ADDRESS_BOOK);
    assert!(code.contains("1 => args.write_string(&self.name),"));
    assert!(code.contains("2 => args.write_int32(self.age),"));
    assert!(code.contains("2 => args.read_int32(&mut self.age),"));
    assert!(code.contains("4 => args.encode_nested(&self.home),"));
    assert!(code.contains("tag => Err(WireError::UnknownTag(tag)),"));
}

#[test]
fn indexed_cases_check_bounds_and_growth() {
    let code = gen(ADDRESS_BOOK);
    assert!(code.contains("if idx >= self.nicknames.len() {"));
    assert!(code.contains("return Err(WireError::NoField { watermark: idx as u32 });"));
    assert!(code.contains("self.nicknames.resize(idx + 1, String::new());"));
}

#[test]
fn map_cases_use_the_cursor_and_key_field() {
    let code = gen(ADDRESS_BOOK);
    assert!(code.contains("args.cursor()?.rewind();"));
    assert!(code.contains("match self.book.values().nth(pos) {"));
    assert!(code.contains("let mut entry = PersonPhone::default();"));
    assert!(code.contains("self.book.insert(entry.id, entry);"));
    assert!(code.contains("BTreeMap<i32, PersonPhone>"));
}

#[test]
fn reset_follows_declaration_order() {
    let code = gen(ADDRESS_BOOK);
    let impl_start = code.find("impl Wire for Person {").expect("Person impl missing");
    let tail = &code[impl_start..];
    let name = tail.find("self.name.clear();").expect("name reset missing");
    let age = tail.find("self.age = 0;").expect("age reset missing");
    let home = tail.find("self.home.reset();").expect("home reset missing");
    let book = tail.find("self.book.clear();").expect("book reset missing");
    assert!(name < age && age < home && home < book);
}

#[test]
fn identity_is_emitted_for_top_level_only() {
    let code = gen(ADDRESS_BOOK);
    assert!(code.contains("pub fn tag() -> u32 { 0x1 }"));
    assert!(code.contains("pub fn name() -> &'static str { \"Person\" }"));
    assert!(code.contains("static PERSON_DESCRIPTOR: OnceLock<&'static StructNode>"));
    // Nested structs carry no identity statements.
    assert!(!code.contains("PERSON_PHONE_DESCRIPTOR"));
    assert!(!code.contains("impl PersonPhone {"));
}

#[test]
fn registry_runs_registrations_in_discovery_order() {
    let code = gen(ADDRESS_BOOK);
    let person = code.find("Person::register(reg);").expect("Person registration");
    let ping = code.find("Ping::register(reg);").expect("Ping registration");
    assert!(person < ping);
    assert!(code.contains("pub fn registry() -> &'static Registry {"));
    assert!(code.contains("Registry::from_text(SCHEMA_TEXT)"));
}

#[test]
fn schema_text_is_embedded_escaped() {
    let code = gen(ADDRESS_BOOK);
    assert!(code.contains("const SCHEMA_TEXT: &str = \""));
    // "struct" => \x73\x74\x72\x75\x63\x74
    assert!(code.contains("\\x73\\x74\\x72\\x75\\x63\\x74"));
    // The raw schema text itself is not embedded unescaped.
    assert!(!code.contains("struct Person = 0x01"));
}

#[test]
fn module_option_wraps_everything() {
    let opts = GenOptions {
        module: Some("wire".to_string()),
        ..GenOptions::default()
    };
    let code = generate_from_text(ADDRESS_BOOK, &opts).expect("generate_from_text failed");
    assert!(code.contains("pub mod wire {"));
    let header = code.find("// @generated").expect("header missing");
    let module = code.find("pub mod wire {").expect("module missing");
    assert!(header < module);
}

#[test]
fn plain_schemas_skip_the_map_import() {
    let code = gen("struct Ping = 1 { seq: int64 = 1; }");
    assert!(!code.contains("BTreeMap"));
    assert!(code.contains("use std::sync::{Once, OnceLock};"));
}

#[test]
fn duplicate_definition_aborts_with_no_output() {
    // Two roots with the same qualified name reach the walker twice; the
    // whole unit is rejected.
    let node = StructNode {
        name: "Twice".to_string(),
        line: 1,
        column: 1,
        tag: 1,
        top_level: true,
        fields: Vec::new(),
        children: Vec::new(),
    };
    let tree = SchemaTree {
        roots: vec![node.clone(), node],
    };
    let result = generate(&tree, "", &GenOptions::default());
    assert!(matches!(result, Err(CodegenError::SchemaCycle(_))));
}

#[test]
fn keyword_field_names_are_escaped() {
    let code = gen("struct A = 1 { type: int32 = 1; }");
    assert!(code.contains("pub type_: i32,"));
    assert!(code.contains("1 => args.write_int32(self.type_),"));
}
