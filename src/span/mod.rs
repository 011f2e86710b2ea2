use std::fmt;

use serde::Serialize;

use crate::pathlib::FilePath;

/// A position in a source file. `lineno` and `col` are zero-indexed;
/// `offset` is the absolute character offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Pos {
    pub lineno: usize,
    pub col: usize,
    pub offset: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Source {
    pub filepath: FilePath,
    pub span: Span,
}

impl Pos {
    pub fn new() -> Pos {
        Pos {
            lineno: 0,
            col: 0,
            offset: 0,
        }
    }

    fn lt(&self, lineno: usize, col: usize) -> bool {
        self.lineno < lineno || (self.lineno == lineno && self.col < col)
    }

    fn le(&self, lineno: usize, col: usize) -> bool {
        self.lineno < lineno || (self.lineno == lineno && self.col <= col)
    }
}

impl Span {
    pub fn new() -> Span {
        Span {
            start: Pos::new(),
            end: Pos::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn lines(&self) -> usize {
        (self.end.lineno - self.start.lineno) + 1
    }

    /// Create a new span with the start of this one and end of another one
    pub fn extend_to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }

    /// Containment with an exclusive end, used for hover-style queries.
    pub fn contains(&self, lineno: usize, col: usize) -> bool {
        self.start.le(lineno, col) && !self.end.le(lineno, col)
    }

    /// Containment with an inclusive end, used when matching a cursor
    /// against a go-to-definition target.
    pub fn contains_inclusive(&self, lineno: usize, col: usize) -> bool {
        self.start.le(lineno, col) && (Pos { lineno, col, offset: 0 }).le(self.end.lineno, self.end.col)
    }
}

impl Source {
    pub fn new(filepath: FilePath, span: Span) -> Source {
        Source { filepath, span }
    }

    /// The sentinel location attached to builtin variables. It has no
    /// navigable definition target.
    pub fn builtin() -> Source {
        Source {
            filepath: FilePath::new(),
            span: Span::new(),
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.filepath.is_empty()
    }

    pub fn extend_to(&self, other: &Source) -> Source {
        Source {
            filepath: self.filepath.clone(),
            span: self.span.extend_to(&other.span),
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.lineno + 1, self.col + 1)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.filepath, self.span)
    }
}

impl From<Pos> for Span {
    fn from(p: Pos) -> Span {
        Span { start: p, end: p }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(sl: usize, sc: usize, el: usize, ec: usize) -> Span {
        Span {
            start: Pos {
                lineno: sl,
                col: sc,
                offset: 0,
            },
            end: Pos {
                lineno: el,
                col: ec,
                offset: 0,
            },
        }
    }

    #[test]
    fn contains_is_end_exclusive() {
        let s = span(0, 2, 0, 5);
        assert!(s.contains(0, 2));
        assert!(s.contains(0, 4));
        assert!(!s.contains(0, 5));
        assert!(!s.contains(0, 1));
    }

    #[test]
    fn contains_inclusive_includes_end() {
        let s = span(1, 0, 1, 3);
        assert!(s.contains_inclusive(1, 3));
        assert!(!s.contains_inclusive(1, 4));
    }

    #[test]
    fn builtin_source_is_marked() {
        assert!(Source::builtin().is_builtin());
        assert!(!Source::new("a.sprig".into(), Span::new()).is_builtin());
    }
}
