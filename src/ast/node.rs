use std::fmt;
use std::rc::Rc;

use crate::errors::SprigError;
use crate::span::Source;
use crate::strutils;

use super::Operator;

/// The value carried by a literal node. String escapes were already decoded
/// by the lexer, so `Str` holds the final text.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

/// An identifier occurrence with its own location, kept separate from
/// `Node` so declarations and parameters can point at just the name.
#[derive(Clone, Debug, PartialEq)]
pub struct Ident {
    pub name: String,
    pub src: Source,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assign {
    pub target: Ident,
    pub value: Node,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Decl {
    pub is_const: bool,
    pub name: Ident,
    /// Set when the declaration was written `var x := ...`, asking the
    /// editor not to surface the inferred value inline.
    pub suppress_hint: bool,
    pub value: Node,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    pub op: Operator,
    pub args: Vec<Node>,
}

/// A function literal. Shared behind `Rc` because the annotator holds on to
/// it twice, once in the closure value and once in the deferred work queue.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDisplay {
    pub params: Vec<Ident>,
    pub body: Node,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// No-op statement. Carries the text when it came from a comment.
    Pass(Option<String>),
    Block(Vec<Node>),
    Literal(LiteralValue),
    Name(String),
    Assign(Box<Assign>),
    Decl(Box<Decl>),
    Operation(Box<Operation>),
    /// A top-level expression whose value the annotator should surface.
    Show(Box<Node>),
    FunctionDisplay(Rc<FunctionDisplay>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub src: Source,
}

/// The result of parsing one source file. Parsing never fails; recoverable
/// errors accumulate here alongside whatever statements survived.
#[derive(Clone, Debug, PartialEq)]
pub struct File {
    pub src: Source,
    pub stmts: Vec<Node>,
    pub errors: Vec<SprigError>,
}

impl Node {
    pub fn new(kind: NodeKind, src: Source) -> Node {
        Node { kind, src }
    }
}

impl NodeKind {
    pub fn desc(&self) -> &'static str {
        match self {
            NodeKind::Pass(..) => "pass",
            NodeKind::Block(..) => "block",
            NodeKind::Literal(..) => "literal",
            NodeKind::Name(..) => "name",
            NodeKind::Assign(..) => "assign",
            NodeKind::Decl(..) => "declaration",
            NodeKind::Operation(..) => "operation",
            NodeKind::Show(..) => "show",
            NodeKind::FunctionDisplay(..) => "function",
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Null => write!(f, "null"),
            LiteralValue::Bool(b) => write!(f, "{}", b),
            LiteralValue::Number(n) => write!(f, "{}", n),
            LiteralValue::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Pass(None) => write!(f, "(pass)"),
            NodeKind::Pass(Some(text)) => write!(f, "(pass {:?})", text),
            NodeKind::Block(stmts) => {
                if stmts.is_empty() {
                    write!(f, "(block)")
                } else {
                    write!(
                        f,
                        "(block\n{})",
                        strutils::indent_lines_iter(stmts, 2)
                    )
                }
            }
            NodeKind::Literal(value) => write!(f, "{}", value),
            NodeKind::Name(name) => write!(f, "{}", name),
            NodeKind::Assign(a) => write!(f, "(assign {} {})", a.target, a.value),
            NodeKind::Decl(d) => write!(
                f,
                "({} {} {})",
                if d.is_const { "const" } else { "var" },
                d.name,
                d.value
            ),
            NodeKind::Operation(o) => {
                if o.args.is_empty() {
                    write!(f, "({})", o.op)
                } else {
                    write!(
                        f,
                        "({}\n{})",
                        o.op,
                        strutils::indent_lines_iter(&o.args, 2)
                    )
                }
            }
            NodeKind::Show(inner) => write!(f, "(show {})", inner),
            NodeKind::FunctionDisplay(fd) => {
                let params = fd.params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
                write!(
                    f,
                    "(function ({})\n{})",
                    params.join(" "),
                    strutils::indent_lines(&fd.body, 2)
                )
            }
        }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FILE {}", self.src.filepath)?;
        writeln!(f, "  STATEMENTS")?;
        if !self.stmts.is_empty() {
            writeln!(f, "{}", strutils::indent_lines_iter(&self.stmts, 4))?;
        }
        writeln!(f, "  ERRORS")?;
        for err in &self.errors {
            writeln!(f, "    {}", err)?;
        }
        Ok(())
    }
}
