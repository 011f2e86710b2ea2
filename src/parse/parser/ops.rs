use crate::ast::{Node, Operator, TokenKind};
use crate::errors::SprigResult;

use super::Parser;

pub(super) const PREC_UNARY_MINUS: usize = 12;

/// Binding power of a token in infix position. Tokens absent from this
/// table (precedence `None`) end the expression. Some of these tokens are
/// reserved at their eventual precedence but have no operator yet; reaching
/// one in infix position is a parse error.
fn precedence(kind: &TokenKind) -> Option<usize> {
    use TokenKind::*;
    Some(match kind {
        Coalesce => 1,
        Or => 2,
        And => 3,
        // 4 is reserved for unary `not`
        EqEq | NotEq | Lt | Gt | LtEq | GtEq | In | Not | Is | As | Exclamation => 5,
        Shl | Shr => 6,
        Ampersand => 7,
        Caret => 8,
        Pipe => 9,
        Plus | Minus => 10,
        Asterisk | Slash | DoubleSlash | Percent => 11,
        // 12 is reserved for unary `-` and `+`
        Pow => 13,
        Dot | LeftParen | LeftBracket => 14,
        _ => return None,
    })
}

fn binop(kind: &TokenKind) -> Option<Operator> {
    use TokenKind::*;
    Some(match kind {
        Plus => Operator::Add,
        Minus => Operator::Sub,
        Asterisk => Operator::Mul,
        Slash => Operator::Div,
        Pow => Operator::Pow,
        And => Operator::And,
        Or => Operator::Or,
        EqEq => Operator::Eq,
        NotEq => Operator::NotEq,
        Lt => Operator::Lt,
        LtEq => Operator::LtEq,
        Gt => Operator::Gt,
        GtEq => Operator::GtEq,
        Coalesce => Operator::Coalesce,
        _ => return None,
    })
}

impl Parser {
    pub(super) fn parse_expression(&mut self) -> SprigResult<Node> {
        self.parse_prec(1)
    }

    /// Precedence climbing: parse a prefix expression, then fold in infix
    /// operators that bind at least as tightly as `prec`.
    pub(super) fn parse_prec(&mut self, prec: usize) -> SprigResult<Node> {
        let start = self.cur().span;
        let mut expr = self.parse_prefix()?;
        while prec <= precedence(&self.cur().kind).unwrap_or(0) {
            expr = self.parse_infix(expr, start)?;
        }
        Ok(expr)
    }

    fn parse_infix(&mut self, lhs: Node, start: crate::span::Span) -> SprigResult<Node> {
        let kind = self.peek_kind();
        let prec = match precedence(&kind) {
            Some(p) => p,
            None => {
                let span = self.cur().span;
                return Err(self.parse_error(
                    format!("Expected infix expression token but found {}", kind.desc()),
                    span,
                ));
            }
        };

        match kind {
            TokenKind::LeftParen => {
                self.advance();
                let mut args = vec![lhs];
                args.extend(self.parse_args_body(&TokenKind::RightParen)?);
                let end = self.expect(&TokenKind::RightParen)?.span;
                Ok(self.operation(Operator::FunctionCall, args, start.extend_to(&end)))
            }
            TokenKind::LeftBracket => {
                self.advance();
                self.skip_newlines();
                let index = self.parse_expression()?;
                let end = self.expect(&TokenKind::RightBracket)?.span;
                Ok(self.operation(Operator::Subscript, vec![lhs, index], start.extend_to(&end)))
            }
            _ => {
                if let Some(op) = binop(&kind) {
                    self.advance();
                    self.skip_newlines();
                    let rhs = if op == Operator::Pow {
                        // right-associative
                        self.parse_prec(prec)?
                    } else {
                        self.parse_prec(prec + 1)?
                    };
                    let span = start.extend_to(&rhs.src.span);
                    Ok(self.operation(op, vec![lhs, rhs], span))
                } else {
                    let span = self.cur().span;
                    Err(self.parse_error(
                        format!("Expected infix expression token but found {}", kind.desc()),
                        span,
                    ))
                }
            }
        }
    }
}
