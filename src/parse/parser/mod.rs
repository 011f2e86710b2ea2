mod atoms;
mod ops;

use crate::ast::{Decl, File, Ident, Node, NodeKind, Operation, Operator, Token, TokenKind};
use crate::errors::{SprigError, SprigErrorKind, SprigResult};
use crate::parse::lexer::lex;
use crate::pathlib::FilePath;
use crate::span::{Source, Span};

/// Parse a source string into a `File`. Parsing never fails: when a
/// statement cannot be parsed, the error is recorded on the file and the
/// parser skips ahead to the next line.
pub fn parse<P: Into<FilePath>>(filepath: P, src: &str) -> File {
    let mut parser = Parser {
        tokens: lex(src),
        pos: 0,
        filepath: filepath.into(),
        errors: vec![],
    };
    parser.parse_file()
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    filepath: FilePath,
    errors: Vec<SprigError>,
}

impl Parser {
    fn parse_file(&mut self) -> File {
        debug!("parser.file {}", self.filepath);
        let file_span = self.tokens[0]
            .span
            .extend_to(&self.tokens[self.tokens.len() - 1].span);

        let mut stmts = vec![];
        while !self.is_eof() {
            match self.parse_statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    self.skip_past_newline();
                }
            }
        }

        File {
            src: self.src(file_span),
            stmts,
            errors: std::mem::take(&mut self.errors),
        }
    }

    fn parse_statement(&mut self) -> SprigResult<Node> {
        match self.peek_kind() {
            TokenKind::Semi | TokenKind::NewLine => {
                let span = self.cur().span;
                self.expect_statement_delimiter()?;
                Ok(Node::new(NodeKind::Pass(None), self.src(span)))
            }
            TokenKind::Var | TokenKind::Const => self.parse_declaration(),
            TokenKind::If => self.parse_if(),
            TokenKind::LeftCurly => self.parse_block(),
            TokenKind::Hash => {
                // evaluated for effect, but its value is not surfaced
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_statement_delimiter()?;
                Ok(expr)
            }
            TokenKind::Comment(text) => {
                let span = self.advance().span;
                self.expect_statement_delimiter()?;
                Ok(Node::new(NodeKind::Pass(Some(text)), self.src(span)))
            }
            _ => {
                let start = self.cur().span;
                let expr = self.parse_expression()?;
                let end = self.tokens[self.pos - 1].span;
                self.expect_statement_delimiter()?;
                Ok(Node::new(
                    NodeKind::Show(Box::new(expr)),
                    self.src(start.extend_to(&end)),
                ))
            }
        }
    }

    fn parse_declaration(&mut self) -> SprigResult<Node> {
        let start = self.cur().span;
        let is_const = self.consume(&TokenKind::Const);
        if !is_const {
            self.expect(&TokenKind::Var)?;
        }
        let name = self.expect_identifier()?;
        let suppress_hint = self.consume(&TokenKind::Colon);
        self.expect(&TokenKind::Equals)?;
        let value = self.parse_expression()?;
        self.expect_statement_delimiter()?;
        let src = self.src(start.extend_to(&value.src.span));
        Ok(Node::new(
            NodeKind::Decl(Box::new(Decl {
                is_const,
                name,
                suppress_hint,
                value,
            })),
            src,
        ))
    }

    fn parse_block(&mut self) -> SprigResult<Node> {
        let start = self.expect(&TokenKind::LeftCurly)?.span;
        let mut stmts = vec![];
        self.skip_newlines();
        while !self.is_eof() && !self.at(&TokenKind::RightCurly) {
            match self.parse_statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    self.skip_past_newline();
                }
            }
            self.skip_newlines();
        }
        let end = self.expect(&TokenKind::RightCurly)?.span;
        Ok(Node::new(
            NodeKind::Block(stmts),
            self.src(start.extend_to(&end)),
        ))
    }

    /// An `if` statement becomes an `IF` operation over the condition, the
    /// block, and the else branch. A missing else branch becomes a null
    /// literal located at the block.
    fn parse_if(&mut self) -> SprigResult<Node> {
        let start = self.expect(&TokenKind::If)?.span;
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        let other = if self.consume(&TokenKind::Else) {
            if self.at(&TokenKind::If) {
                self.parse_if()?
            } else {
                self.parse_block()?
            }
        } else {
            Node::new(
                NodeKind::Literal(crate::ast::LiteralValue::Null),
                body.src.clone(),
            )
        };
        let span = start.extend_to(&other.src.span);
        Ok(self.operation(Operator::If, vec![condition, body, other], span))
    }

    fn expect_statement_delimiter(&mut self) -> SprigResult {
        if !self.at(&TokenKind::RightCurly) && !self.consume(&TokenKind::NewLine) {
            self.expect(&TokenKind::Semi)?;
        }
        Ok(())
    }

    fn skip_newlines(&mut self) {
        while self.consume(&TokenKind::NewLine) {}
    }

    fn skip_past_newline(&mut self) {
        while !self.is_eof() && !self.at(&TokenKind::NewLine) {
            self.pos += 1;
        }
        self.consume(&TokenKind::NewLine);
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len() || self.cur().kind == TokenKind::EOF
    }

    fn cur(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.cur().kind.clone()
    }

    fn at(&self, kind: &TokenKind) -> bool {
        self.cur().kind.similar_to(kind)
    }

    fn at_identifier(&self) -> bool {
        matches!(self.cur().kind, TokenKind::Identifier(_))
    }

    fn advance(&mut self) -> Token {
        let tok = self.cur().clone();
        self.pos += 1;
        tok
    }

    fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn expect(&mut self, kind: &TokenKind) -> SprigResult<Token> {
        if self.at(kind) {
            return Ok(self.advance());
        }
        let tok = self.cur();
        Err(self.parse_error(
            format!("Expected {} but got {}", kind.desc(), tok.kind.desc()),
            tok.span,
        ))
    }

    fn expect_identifier(&mut self) -> SprigResult<Ident> {
        if let TokenKind::Identifier(name) = self.peek_kind() {
            let span = self.advance().span;
            return Ok(Ident {
                name,
                src: self.src(span),
            });
        }
        let tok = self.cur();
        Err(self.parse_error(
            format!("Expected an identifier but got {}", tok.kind.desc()),
            tok.span,
        ))
    }

    fn parse_error(&self, msg: String, span: Span) -> SprigError {
        SprigError::new(msg, self.src(span), SprigErrorKind::Parse)
    }

    fn src(&self, span: Span) -> Source {
        Source::new(self.filepath.clone(), span)
    }

    fn operation(&self, op: Operator, args: Vec<Node>, span: Span) -> Node {
        Node::new(
            NodeKind::Operation(Box::new(Operation { op, args })),
            self.src(span),
        )
    }
}
