use std::rc::Rc;

use crate::ast::{FunctionDisplay, LiteralValue, Node, NodeKind, Operator, TokenKind};
use crate::errors::SprigResult;

use super::ops::PREC_UNARY_MINUS;
use super::Parser;

impl Parser {
    pub(super) fn parse_prefix(&mut self) -> SprigResult<Node> {
        let start = self.cur().span;
        match self.peek_kind() {
            TokenKind::Identifier(name) => {
                let span = self.advance().span;
                let ident = crate::ast::Ident {
                    name,
                    src: self.src(span),
                };
                if self.consume(&TokenKind::FatArrow) {
                    // single parameter lambda: `x => body`
                    self.skip_newlines();
                    let body = self.parse_expression()?;
                    let src = self.src(start.extend_to(&body.src.span));
                    Ok(Node::new(
                        NodeKind::FunctionDisplay(Rc::new(FunctionDisplay {
                            params: vec![ident],
                            body,
                        })),
                        src,
                    ))
                } else if self.consume(&TokenKind::Equals) {
                    let value = self.parse_expression()?;
                    let src = self.src(start.extend_to(&value.src.span));
                    Ok(Node::new(
                        NodeKind::Assign(Box::new(crate::ast::Assign {
                            target: ident,
                            value,
                        })),
                        src,
                    ))
                } else {
                    Ok(Node::new(NodeKind::Name(ident.name), ident.src))
                }
            }
            TokenKind::Str(value) => {
                let span = self.advance().span;
                Ok(Node::new(
                    NodeKind::Literal(LiteralValue::Str(value)),
                    self.src(span),
                ))
            }
            TokenKind::Number(value) => {
                let span = self.advance().span;
                Ok(Node::new(
                    NodeKind::Literal(LiteralValue::Number(value)),
                    self.src(span),
                ))
            }
            TokenKind::Null => {
                let span = self.advance().span;
                Ok(Node::new(NodeKind::Literal(LiteralValue::Null), self.src(span)))
            }
            TokenKind::True => {
                let span = self.advance().span;
                Ok(Node::new(
                    NodeKind::Literal(LiteralValue::Bool(true)),
                    self.src(span),
                ))
            }
            TokenKind::False => {
                let span = self.advance().span;
                Ok(Node::new(
                    NodeKind::Literal(LiteralValue::Bool(false)),
                    self.src(span),
                ))
            }
            TokenKind::If => {
                // ternary form: `if cond then a else b`
                self.advance();
                let condition = self.parse_expression()?;
                self.expect(&TokenKind::Then)?;
                let lhs = self.parse_expression()?;
                self.expect(&TokenKind::Else)?;
                let rhs = self.parse_expression()?;
                let span = start.extend_to(&rhs.src.span);
                Ok(self.operation(Operator::If, vec![condition, lhs, rhs], span))
            }
            TokenKind::Do => {
                self.advance();
                self.parse_block()
            }
            TokenKind::Plus | TokenKind::Minus => {
                let op = if self.at(&TokenKind::Plus) {
                    Operator::Add
                } else {
                    Operator::Sub
                };
                self.advance();
                let arg = self.parse_prec(PREC_UNARY_MINUS)?;
                let span = start.extend_to(&arg.src.span);
                Ok(self.operation(op, vec![arg], span))
            }
            TokenKind::LeftBracket => {
                self.advance();
                let elements = self.parse_args_body(&TokenKind::RightBracket)?;
                let end = self.expect(&TokenKind::RightBracket)?.span;
                Ok(self.operation(Operator::ListDisplay, elements, start.extend_to(&end)))
            }
            TokenKind::LeftCurly => self.parse_map_display(),
            TokenKind::LeftParen => self.parse_lambda_or_group(),
            kind => {
                let span = self.cur().span;
                Err(self.parse_error(
                    format!("Expected expression but got {}", kind.desc()),
                    span,
                ))
            }
        }
    }

    /// Comma-separated expressions up to (but not consuming) `close`.
    /// Newlines between elements are insignificant and a trailing comma is
    /// allowed.
    pub(super) fn parse_args_body(&mut self, close: &TokenKind) -> SprigResult<Vec<Node>> {
        let mut args = vec![];
        self.skip_newlines();
        while !self.is_eof() && !self.at(close) {
            self.skip_newlines();
            if self.at(close) {
                break;
            }
            args.push(self.parse_expression()?);
            self.skip_newlines();
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }
        Ok(args)
    }

    /// `{ k1: v1, k2: v2 }`. The args of the resulting operation alternate
    /// key, value, so the length is always a multiple of two.
    fn parse_map_display(&mut self) -> SprigResult<Node> {
        let start = self.expect(&TokenKind::LeftCurly)?.span;
        let mut values = vec![];
        self.skip_newlines();
        while !self.is_eof() && !self.at(&TokenKind::RightCurly) {
            self.skip_newlines();
            if self.at(&TokenKind::RightCurly) {
                break;
            }
            values.push(self.parse_expression()?);
            self.skip_newlines();
            self.expect(&TokenKind::Colon)?;
            self.skip_newlines();
            values.push(self.parse_expression()?);
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(&TokenKind::RightCurly)?.span;
        Ok(self.operation(Operator::MapDisplay, values, start.extend_to(&end)))
    }

    /// Disambiguate `(a, b) => ...` from a parenthesized expression by
    /// scanning ahead for `)` followed by `=>`.
    fn parse_lambda_or_group(&mut self) -> SprigResult<Node> {
        let start = self.expect(&TokenKind::LeftParen)?.span;
        let saved = self.pos;
        while self.consume_identifier() || self.consume(&TokenKind::Comma) {}
        let at_lambda = self.consume(&TokenKind::RightParen) && self.at(&TokenKind::FatArrow);
        self.pos = saved;

        if at_lambda {
            let mut params = vec![];
            while !self.is_eof() && !self.at(&TokenKind::RightParen) {
                params.push(self.expect_identifier()?);
                if !self.consume(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RightParen)?;
            self.expect(&TokenKind::FatArrow)?;
            self.skip_newlines();
            let body = if self.at(&TokenKind::LeftCurly) {
                self.parse_block()?
            } else {
                self.parse_expression()?
            };
            let src = self.src(start.extend_to(&body.src.span));
            Ok(Node::new(
                NodeKind::FunctionDisplay(Rc::new(FunctionDisplay { params, body })),
                src,
            ))
        } else {
            let inner = self.parse_expression()?;
            self.expect(&TokenKind::RightParen)?;
            Ok(inner)
        }
    }

    fn consume_identifier(&mut self) -> bool {
        if self.at_identifier() {
            self.pos += 1;
            return true;
        }
        false
    }
}
