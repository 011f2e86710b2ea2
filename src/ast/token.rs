use std::fmt;
use std::mem;

use crate::span::Span;

/// All token kinds of the language. Literal, identifier, comment, and
/// error-token payloads live inside their variant.
///
/// Every reserved word lexes to its own kind even though the grammar only
/// uses a handful of them; the rest exist so they cannot be used as
/// identifiers.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // values
    Number(f64),
    Str(String),
    Identifier(String),
    Comment(String),

    // error tokens; the lexer is total, so bad input lands here
    BadStringLiteral(String),
    Unrecognized(String),

    // structure
    NewLine,
    EOF,

    // single character symbols
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftCurly,
    RightCurly,
    Colon,
    Semi,
    Comma,
    Dot,
    Minus,
    Plus,
    Slash,
    Percent,
    Asterisk,
    Hash,
    At,
    Pipe,
    Ampersand,
    Caret,
    Tilde,
    Question,
    Exclamation,
    Equals,
    Lt,
    Gt,

    // two character symbols
    DoubleSlash,
    Pow,
    NotEq,
    EqEq,
    Shl,
    LtEq,
    Shr,
    GtEq,
    Coalesce,
    FatArrow,

    // keywords
    And,
    Class,
    Const,
    Def,
    Do,
    Elif,
    Else,
    False,
    For,
    Function,
    If,
    Nil,
    Null,
    Or,
    Return,
    Super,
    This,
    True,
    Var,
    While,
    As,
    Assert,
    Async,
    Await,
    Break,
    Continue,
    Del,
    Except,
    Final,
    Finally,
    From,
    Global,
    Import,
    In,
    Is,
    Lambda,
    Not,
    Pass,
    Raise,
    Static,
    Then,
    Trait,
    Try,
    With,
    Yield,
}

impl TokenKind {
    /// Classify an identifier-shaped lexeme against the reserved-word table.
    pub fn keyword(id: &str) -> Option<TokenKind> {
        Some(match id {
            "and" => TokenKind::And,
            "class" => TokenKind::Class,
            "const" => TokenKind::Const,
            "def" => TokenKind::Def,
            "do" => TokenKind::Do,
            "elif" => TokenKind::Elif,
            "else" => TokenKind::Else,
            "false" => TokenKind::False,
            "for" => TokenKind::For,
            "function" => TokenKind::Function,
            "if" => TokenKind::If,
            "nil" => TokenKind::Nil,
            "null" => TokenKind::Null,
            "or" => TokenKind::Or,
            "return" => TokenKind::Return,
            "super" => TokenKind::Super,
            "this" => TokenKind::This,
            "true" => TokenKind::True,
            "var" => TokenKind::Var,
            "while" => TokenKind::While,
            "as" => TokenKind::As,
            "assert" => TokenKind::Assert,
            "async" => TokenKind::Async,
            "await" => TokenKind::Await,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "del" => TokenKind::Del,
            "except" => TokenKind::Except,
            "final" => TokenKind::Final,
            "finally" => TokenKind::Finally,
            "from" => TokenKind::From,
            "global" => TokenKind::Global,
            "import" => TokenKind::Import,
            "in" => TokenKind::In,
            "is" => TokenKind::Is,
            "lambda" => TokenKind::Lambda,
            "not" => TokenKind::Not,
            "pass" => TokenKind::Pass,
            "raise" => TokenKind::Raise,
            "static" => TokenKind::Static,
            "then" => TokenKind::Then,
            "trait" => TokenKind::Trait,
            "try" => TokenKind::Try,
            "with" => TokenKind::With,
            "yield" => TokenKind::Yield,
            _ => return None,
        })
    }

    /// Two-character symbol lookup (maximal munch, checked before the
    /// one-character table).
    pub fn symbol2(a: char, b: char) -> Option<TokenKind> {
        Some(match (a, b) {
            ('/', '/') => TokenKind::DoubleSlash,
            ('*', '*') => TokenKind::Pow,
            ('!', '=') => TokenKind::NotEq,
            ('=', '=') => TokenKind::EqEq,
            ('<', '<') => TokenKind::Shl,
            ('<', '=') => TokenKind::LtEq,
            ('>', '>') => TokenKind::Shr,
            ('>', '=') => TokenKind::GtEq,
            ('?', '?') => TokenKind::Coalesce,
            ('=', '>') => TokenKind::FatArrow,
            _ => return None,
        })
    }

    pub fn symbol1(c: char) -> Option<TokenKind> {
        Some(match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftCurly,
            '}' => TokenKind::RightCurly,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semi,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '-' => TokenKind::Minus,
            '+' => TokenKind::Plus,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '*' => TokenKind::Asterisk,
            '#' => TokenKind::Hash,
            '@' => TokenKind::At,
            '|' => TokenKind::Pipe,
            '&' => TokenKind::Ampersand,
            '^' => TokenKind::Caret,
            '~' => TokenKind::Tilde,
            '?' => TokenKind::Question,
            '!' => TokenKind::Exclamation,
            '=' => TokenKind::Equals,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            _ => return None,
        })
    }

    /// Compares variants, ignoring any payload.
    pub fn similar_to(&self, other: &TokenKind) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            TokenKind::BadStringLiteral(_) | TokenKind::Unrecognized(_)
        )
    }

    pub fn desc(&self) -> &'static str {
        use TokenKind::*;
        match self {
            Number(_) => "a number",
            Str(_) => "a string",
            Identifier(_) => "an identifier",
            Comment(_) => "a comment",
            BadStringLiteral(_) => "a malformed string literal",
            Unrecognized(_) => "an unrecognized token",
            NewLine => "a new line",
            EOF => "end of file",
            LeftParen => "`(`",
            RightParen => "`)`",
            LeftBracket => "`[`",
            RightBracket => "`]`",
            LeftCurly => "`{`",
            RightCurly => "`}`",
            Colon => "`:`",
            Semi => "`;`",
            Comma => "`,`",
            Dot => "`.`",
            Minus => "`-`",
            Plus => "`+`",
            Slash => "`/`",
            Percent => "`%`",
            Asterisk => "`*`",
            Hash => "`#`",
            At => "`@`",
            Pipe => "`|`",
            Ampersand => "`&`",
            Caret => "`^`",
            Tilde => "`~`",
            Question => "`?`",
            Exclamation => "`!`",
            Equals => "`=`",
            Lt => "`<`",
            Gt => "`>`",
            DoubleSlash => "`//`",
            Pow => "`**`",
            NotEq => "`!=`",
            EqEq => "`==`",
            Shl => "`<<`",
            LtEq => "`<=`",
            Shr => "`>>`",
            GtEq => "`>=`",
            Coalesce => "`??`",
            FatArrow => "`=>`",
            And => "`and`",
            Class => "`class`",
            Const => "`const`",
            Def => "`def`",
            Do => "`do`",
            Elif => "`elif`",
            Else => "`else`",
            False => "`false`",
            For => "`for`",
            Function => "`function`",
            If => "`if`",
            Nil => "`nil`",
            Null => "`null`",
            Or => "`or`",
            Return => "`return`",
            Super => "`super`",
            This => "`this`",
            True => "`true`",
            Var => "`var`",
            While => "`while`",
            As => "`as`",
            Assert => "`assert`",
            Async => "`async`",
            Await => "`await`",
            Break => "`break`",
            Continue => "`continue`",
            Del => "`del`",
            Except => "`except`",
            Final => "`final`",
            Finally => "`finally`",
            From => "`from`",
            Global => "`global`",
            Import => "`import`",
            In => "`in`",
            Is => "`is`",
            Lambda => "`lambda`",
            Not => "`not`",
            Pass => "`pass`",
            Raise => "`raise`",
            Static => "`static`",
            Then => "`then`",
            Trait => "`trait`",
            Try => "`try`",
            With => "`with`",
            Yield => "`yield`",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Str(s) => write!(f, "{:?}", s),
            TokenKind::Identifier(s) => write!(f, "{}", s),
            TokenKind::Comment(s) => write!(f, "{}", s),
            TokenKind::BadStringLiteral(s) => write!(f, "{}", s),
            TokenKind::Unrecognized(s) => write!(f, "{}", s),
            _ => write!(f, "{}", self.desc().trim_matches('`')),
        }
    }
}

/// A single lexeme along with the span it was taken from.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Token {
        Token { kind, span }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}
