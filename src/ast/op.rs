use std::fmt;

/// The closed set of operations an `Operation` node can carry. Everything
/// the parser desugars (calls, displays, subscripts, `if`) funnels through
/// this enum, so the annotator dispatches on one tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Operator {
    FunctionCall,
    ListDisplay,
    MapDisplay,
    Subscript,
    Or,
    And,
    If,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Coalesce,
}

impl Operator {
    pub fn tag(&self) -> &'static str {
        use Operator::*;
        match self {
            FunctionCall => "FUNCTION-CALL",
            ListDisplay => "LIST-DISPLAY",
            MapDisplay => "MAP-DISPLAY",
            Subscript => "SUBSCRIPT",
            Or => "or",
            And => "and",
            If => "if",
            Eq => "==",
            NotEq => "!=",
            Lt => "<",
            LtEq => "<=",
            Gt => ">",
            GtEq => ">=",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Pow => "**",
            Coalesce => "??",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
