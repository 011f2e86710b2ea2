use std::fmt;

use colored::*;

use crate::span::Source;

pub type SprigResult<T = ()> = Result<T, SprigError>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SprigErrorKind {
    Parse,
    Name,
    Eval,
}

impl fmt::Display for SprigErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SprigErrorKind::Parse => "parse error",
                SprigErrorKind::Name => "name error",
                SprigErrorKind::Eval => "eval error",
            }
        )
    }
}

/// A recoverable diagnostic. The lexer never produces these (bad input
/// becomes error tokens); the parser records them on the `File`, and the
/// annotator records them on the `FileAnnotation`.
#[derive(Clone, Debug, PartialEq)]
pub struct SprigError {
    pub msg: String,
    pub src: Source,
    pub kind: SprigErrorKind,
}

impl SprigError {
    pub fn new(msg: String, src: Source, kind: SprigErrorKind) -> SprigError {
        SprigError { msg, src, kind }
    }
}

impl fmt::Display for SprigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {}", self.kind, self.msg, self.src)
    }
}

/// Render a diagnostic against the (in-memory) source text it was produced
/// from: the error message, the offending line, and a caret underline.
pub fn render(err: &SprigError, source: &str) -> String {
    let kind = format!("{}:", err.kind);
    let mut out = format!("{} {}\n", kind.bold().red(), err.msg.bold());

    let span = err.src.span;
    let arrow = "-->".bold();
    out += &format!(" {} {}:{}\n", arrow, err.src.filepath, span);

    if let Some(line) = source.lines().nth(span.start.lineno) {
        let lineno_str = (span.start.lineno + 1).to_string();
        let pipe = "|".bold();
        let spacing = " ".repeat(lineno_str.len());
        let indent = " ".repeat(span.start.col);
        let width = if span.lines() == 1 {
            (span.end.col.max(span.start.col + 1)) - span.start.col
        } else {
            line.chars().count().max(span.start.col + 1) - span.start.col
        };
        let indicator = "^".repeat(width).bold().red();
        out += &format!("{} {}\n", spacing, pipe);
        out += &format!("{} {} {}\n", lineno_str.bold(), pipe, line);
        out += &format!("{} {} {}{}\n", spacing, pipe, indent, indicator);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{Pos, Span};

    #[test]
    fn render_includes_line_and_caret() {
        colored::control::set_override(false);
        let src = Source::new(
            "t.sprig".into(),
            Span {
                start: Pos {
                    lineno: 0,
                    col: 4,
                    offset: 4,
                },
                end: Pos {
                    lineno: 0,
                    col: 7,
                    offset: 7,
                },
            },
        );
        let err = SprigError::new(str!("Variable foo not found"), src, SprigErrorKind::Name);
        let report = render(&err, "1 + foo\n");
        assert!(report.contains("name error:"));
        assert!(report.contains("1 + foo"));
        assert!(report.contains("    ^^^"));
    }
}
