//! Structured statement tree for emitted code.
//!
//! Generated units are assembled as statement lists and rendered in a single
//! pass; brace nesting and indentation are properties of the tree rather than
//! of format strings.

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A single line, emitted at the current indent.
    Line(String),
    /// An empty separator line.
    Blank,
    /// A `head` line, an indented body, and a `tail` line.
    Block {
        head: String,
        body: Vec<Stmt>,
        tail: String,
    },
}

impl Stmt {
    pub fn line(text: impl Into<String>) -> Stmt {
        Stmt::Line(text.into())
    }

    pub fn block(head: impl Into<String>, body: Vec<Stmt>, tail: impl Into<String>) -> Stmt {
        Stmt::Block {
            head: head.into(),
            body,
            tail: tail.into(),
        }
    }
}

const INDENT: &str = "    ";

pub fn render(stmts: &[Stmt]) -> String {
    let mut out = String::new();
    for stmt in stmts {
        render_stmt(stmt, 0, &mut out);
    }
    out
}

fn render_stmt(stmt: &Stmt, depth: usize, out: &mut String) {
    match stmt {
        Stmt::Blank => out.push('\n'),
        Stmt::Line(text) => {
            push_indent(depth, out);
            out.push_str(text);
            out.push('\n');
        }
        Stmt::Block { head, body, tail } => {
            push_indent(depth, out);
            out.push_str(head);
            out.push('\n');
            for stmt in body {
                render_stmt(stmt, depth + 1, out);
            }
            push_indent(depth, out);
            out.push_str(tail);
            out.push('\n');
        }
    }
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
