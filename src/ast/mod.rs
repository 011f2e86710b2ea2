mod node;
mod op;
mod token;

pub use node::{Assign, Decl, File, FunctionDisplay, Ident, LiteralValue, Node, NodeKind, Operation};
pub use op::Operator;
pub use token::{Token, TokenKind};
