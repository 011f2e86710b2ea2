mod lexer;
mod parser;

pub use lexer::lex;
pub use parser::parse;
