#[macro_use]
extern crate lazy_static;

#[macro_use]
pub mod macros;

pub mod annotate;
pub mod ast;
pub mod errors;
pub mod parse;
pub mod pathlib;
pub mod span;
pub mod strutils;
pub mod value;

pub use annotate::{annotate, FileAnnotation};
pub use parse::{lex, parse};
pub use value::StaticValue;
