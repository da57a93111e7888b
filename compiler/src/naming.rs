use pullwire_schema::SCOPE_SEP;

/// Converts a string to PascalCase. Underscore-separated words are joined
/// with their first letters uppercased; fully-uppercase words are folded to
/// a single leading capital; anything else keeps its tail casing.
pub fn to_pascal_case(s: &str) -> String {
    if s.contains('_') {
        s.split('_')
            .filter(|word| !word.is_empty())
            .map(capitalize)
            .collect()
    } else if s == s.to_uppercase() {
        capitalize(&s.to_lowercase())
    } else {
        capitalize(s)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().to_string() + chars.as_str(),
    }
}

/// Converts a string to snake_case without splitting acronyms, so that
/// "sessionID" becomes "session_id".
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut snake = String::new();
    for i in 0..chars.len() {
        let c = chars[i];
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                if !prev.is_uppercase() || (i + 1 < chars.len() && chars[i + 1].is_lowercase()) {
                    snake.push('_');
                }
            }
            snake.extend(c.to_lowercase());
        } else {
            snake.push(c);
        }
    }
    snake
}

/// Escapes Rust reserved keywords by suffixing with an underscore.
pub fn escape_rust_keyword(s: &str) -> String {
    let keywords = [
        "as", "async", "await", "break", "const", "continue", "crate", "dyn",
        "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
        "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
        "self", "Self", "static", "struct", "super", "trait", "true", "type",
        "unsafe", "use", "where", "while",
    ];
    if keywords.contains(&s) {
        format!("{}_", s)
    } else {
        s.to_string()
    }
}

/// Rust field identifier for a schema field name.
pub fn field_ident(name: &str) -> String {
    escape_rust_keyword(&to_snake_case(name))
}

/// Rust type identifier for a qualified struct path: the PascalCase segments
/// concatenated, so `"Person.Phone"` becomes `PersonPhone`.
pub fn type_ident(qualified: &str) -> String {
    qualified.split(SCOPE_SEP).map(to_pascal_case).collect()
}

/// Name of the cached-descriptor static for a generated type.
pub fn descriptor_static(type_ident: &str) -> String {
    format!("{}_DESCRIPTOR", to_snake_case(type_ident).to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal_case() {
        assert_eq!(to_pascal_case("phone_book"), "PhoneBook");
        assert_eq!(to_pascal_case("SIGNAL"), "Signal");
        assert_eq!(to_pascal_case("person"), "Person");
        assert_eq!(to_pascal_case("alreadyCased"), "AlreadyCased");
    }

    #[test]
    fn snake_case_keeps_acronyms() {
        assert_eq!(to_snake_case("sessionID"), "session_id");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("name"), "name");
    }

    #[test]
    fn keyword_escape() {
        assert_eq!(escape_rust_keyword("type"), "type_");
        assert_eq!(escape_rust_keyword("title"), "title");
    }

    #[test]
    fn qualified_type_ident() {
        assert_eq!(type_ident("Person"), "Person");
        assert_eq!(type_ident("Person.Phone"), "PersonPhone");
        assert_eq!(type_ident("a.b_c"), "ABC");
    }

    #[test]
    fn descriptor_static_name() {
        assert_eq!(descriptor_static("PersonPhone"), "PERSON_PHONE_DESCRIPTOR");
    }
}
