use crate::ast::{Token, TokenKind};
use crate::span::{Pos, Span};

/// Tokenize a source string. Lexing is total: malformed input becomes
/// `BadStringLiteral` or `Unrecognized` tokens rather than an error. The
/// token stream always ends with `NewLine` (inserted if the file does not
/// end in one) followed by `EOF`, unless the input is all whitespace, in
/// which case it is just `EOF`.
pub fn lex(src: &str) -> Vec<Token> {
    Lexer::new(src).tokenize()
}

struct Lexer {
    src: Vec<char>,
    pos: Pos,
    tokens: Vec<Token>,
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

impl Lexer {
    fn new(src: &str) -> Lexer {
        Lexer {
            src: src.chars().collect(),
            pos: Pos::new(),
            tokens: vec![],
        }
    }

    fn is_eof(&self) -> bool {
        self.pos.offset >= self.src.len()
    }

    fn first(&self) -> char {
        self.char_at(self.pos.offset)
    }

    fn second(&self) -> char {
        self.char_at(self.pos.offset + 1)
    }

    fn char_at(&self, index: usize) -> char {
        self.src.get(index).copied().unwrap_or('\0')
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.char_at(self.pos.offset + i) == c)
    }

    fn bump(&mut self) {
        if self.first() == '\n' {
            self.pos.lineno += 1;
            self.pos.col = 0;
        } else {
            self.pos.col += 1;
        }
        self.pos.offset += 1;
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn text_from(&self, start: usize) -> String {
        self.src[start..self.pos.offset].iter().collect()
    }

    fn push(&mut self, kind: TokenKind, start: Pos) {
        self.tokens.push(Token::new(
            kind,
            Span {
                start,
                end: self.pos,
            },
        ));
    }

    fn tokenize(mut self) -> Vec<Token> {
        loop {
            while !self.is_eof() && matches!(self.first(), ' ' | '\t' | '\r') {
                self.bump();
            }

            let start = self.pos;

            if self.is_eof() {
                // if the file does not end in a newline, insert one
                if matches!(self.tokens.last(), Some(t) if t.kind != TokenKind::NewLine) {
                    self.push(TokenKind::NewLine, start);
                }
                self.push(TokenKind::EOF, start);
                return self.tokens;
            }

            if self.starts_with("//") {
                while !self.is_eof() && self.first() != '\n' {
                    self.bump();
                }
                let text = self.text_from(start.offset);
                self.push(TokenKind::Comment(text), start);
                continue;
            }

            if self.first() == '\n' {
                self.bump();
                self.push(TokenKind::NewLine, start);
                continue;
            }

            if self.first() == 'r' && matches!(self.second(), '"' | '\'') {
                self.raw_string(start);
                continue;
            }

            if matches!(self.first(), '"' | '\'') {
                self.string(start);
                continue;
            }

            if is_ident_start(self.first()) {
                while !self.is_eof() && is_ident_char(self.first()) {
                    self.bump();
                }
                let text = self.text_from(start.offset);
                let kind =
                    TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier(text));
                self.push(kind, start);
                continue;
            }

            if self.first().is_ascii_digit() {
                self.number(start);
                continue;
            }

            if let Some(kind) = TokenKind::symbol2(self.first(), self.second()) {
                self.bump_n(2);
                self.push(kind, start);
                continue;
            }

            if let Some(kind) = TokenKind::symbol1(self.first()) {
                self.bump();
                self.push(kind, start);
                continue;
            }

            while !self.is_eof() && !matches!(self.first(), ' ' | '\t' | '\r' | '\n') {
                self.bump();
            }
            let text = self.text_from(start.offset);
            self.push(TokenKind::Unrecognized(text), start);
        }
    }

    /// Raw string literals: `r"..."`, `r'...'`, and their triple-quoted
    /// multiline forms. No escape processing; the body is taken verbatim.
    fn raw_string(&mut self, start: Pos) {
        let quote = if self.starts_with("r\"\"\"") {
            "\"\"\""
        } else if self.starts_with("r'''") {
            "'''"
        } else if self.second() == '"' {
            "\""
        } else {
            "'"
        };
        self.bump_n(1 + quote.len());
        let body_start = self.pos.offset;
        while !self.is_eof() && !self.starts_with(quote) {
            self.bump();
        }
        let body = self.text_from(body_start);
        if !self.is_eof() {
            self.bump_n(quote.len());
        }
        self.push(TokenKind::Str(body), start);
    }

    /// Quoted string literals. The body is decoded with JSON string rules;
    /// single-quoted literals are normalized to a double-quoted candidate
    /// first. Anything the decoder rejects becomes a `BadStringLiteral`
    /// token. The decode is attempted even when the scan hit end of input,
    /// so a literal whose text happens to form a valid JSON string (an
    /// escaped closing quote at the very end of the file) still lexes as a
    /// string.
    fn string(&mut self, start: Pos) {
        let quote = self.first();
        self.bump();
        let mut terminated = false;
        while !self.is_eof() {
            if self.first() == quote {
                terminated = true;
                break;
            }
            if self.first() == '\\' && self.second() == quote {
                self.bump();
            }
            self.bump();
        }
        if terminated {
            self.bump();
        }
        let raw = self.text_from(start.offset);
        let candidate = if quote == '"' {
            raw
        } else {
            let body_end = if terminated {
                self.pos.offset - 1
            } else {
                self.pos.offset
            };
            let body: String = self.src[start.offset + 1..body_end].iter().collect();
            format!("\"{}\"", body.replace('"', "\\\""))
        };
        match serde_json::from_str::<String>(&candidate) {
            Ok(value) => self.push(TokenKind::Str(value), start),
            Err(_) => self.push(TokenKind::BadStringLiteral(candidate), start),
        }
    }

    fn number(&mut self, start: Pos) {
        let radix = if self.starts_with("0x") {
            16
        } else if self.starts_with("0o") {
            8
        } else if self.starts_with("0b") {
            2
        } else {
            10
        };

        if radix != 10 {
            self.bump_n(2);
            let digits_start = self.pos.offset;
            while !self.is_eof() && self.first().is_digit(radix) {
                self.bump();
            }
            let digits = self.text_from(digits_start);
            let value = u64::from_str_radix(&digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
            self.push(TokenKind::Number(value), start);
            return;
        }

        while !self.is_eof() && self.first().is_ascii_digit() {
            self.bump();
        }
        if self.first() == '.' {
            self.bump();
            while !self.is_eof() && self.first().is_ascii_digit() {
                self.bump();
            }
        }
        if matches!(self.first(), 'e' | 'E') {
            self.bump();
            if matches!(self.first(), '+' | '-') {
                self.bump();
            }
            while !self.is_eof() && self.first().is_ascii_digit() {
                self.bump();
            }
        }
        let text = self.text_from(start.offset);
        let value = text.parse::<f64>().unwrap_or(f64::NAN);
        self.push(TokenKind::Number(value), start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::EOF]);
        assert_eq!(kinds("  \t \r "), vec![TokenKind::EOF]);
    }

    #[test]
    fn newline_inserted_before_eof() {
        assert_eq!(
            kinds("x"),
            vec![
                TokenKind::Identifier(str!("x")),
                TokenKind::NewLine,
                TokenKind::EOF
            ]
        );
        // already newline-terminated, nothing extra
        assert_eq!(
            kinds("x\n"),
            vec![
                TokenKind::Identifier(str!("x")),
                TokenKind::NewLine,
                TokenKind::EOF
            ]
        );
    }

    #[test]
    fn spans_cover_the_lexeme() {
        let tokens = lex("var abc = 12");
        assert_eq!(tokens[1].span.start.col, 4);
        assert_eq!(tokens[1].span.end.col, 7);
        assert_eq!(tokens[1].span.start.offset, 4);
        assert_eq!(tokens[1].span.end.offset, 7);
        assert_eq!(tokens[3].span.start.col, 10);
        assert_eq!(tokens[3].span.end.col, 12);
    }

    #[test]
    fn token_spans_tile_the_source() {
        let src = "var x = 1  +2\n// note\n'a'  \n";
        let chars: Vec<char> = src.chars().collect();
        let mut rebuilt = String::new();
        let mut offset = 0;
        for tok in lex(src) {
            assert!(tok.span.start.offset >= offset);
            // gaps between tokens hold only horizontal whitespace
            for c in &chars[offset..tok.span.start.offset] {
                assert!(matches!(c, ' ' | '\t' | '\r'));
                rebuilt.push(*c);
            }
            rebuilt.extend(chars[tok.span.start.offset..tok.span.end.offset].iter());
            offset = tok.span.end.offset;
        }
        assert_eq!(rebuilt, src);
    }

    #[test]
    fn line_and_column_tracking() {
        let tokens = lex("a\n  b\n");
        assert_eq!(tokens[0].span.start.lineno, 0);
        assert_eq!(tokens[2].span.start.lineno, 1);
        assert_eq!(tokens[2].span.start.col, 2);
        assert_eq!(tokens[2].span.start.offset, 4);
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("var x const if lambda foo_9\n"),
            vec![
                TokenKind::Var,
                TokenKind::Identifier(str!("x")),
                TokenKind::Const,
                TokenKind::If,
                TokenKind::Lambda,
                TokenKind::Identifier(str!("foo_9")),
                TokenKind::NewLine,
                TokenKind::EOF
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            kinds("12 3.5 1e3 2.5e-1 0x1A 0o17 0b101\n"),
            vec![
                TokenKind::Number(12.0),
                TokenKind::Number(3.5),
                TokenKind::Number(1000.0),
                TokenKind::Number(0.25),
                TokenKind::Number(26.0),
                TokenKind::Number(15.0),
                TokenKind::Number(5.0),
                TokenKind::NewLine,
                TokenKind::EOF
            ]
        );
    }

    #[test]
    fn number_with_empty_radix_digits_is_nan() {
        let tokens = lex("0x\n");
        match tokens[0].kind {
            TokenKind::Number(n) => assert!(n.is_nan()),
            ref k => panic!("expected a number, got {:?}", k),
        }
    }

    #[test]
    fn string_escapes_are_decoded() {
        assert_eq!(
            kinds(r#""a\nb" 'it''s'"#)[..2],
            [
                TokenKind::Str(str!("a\nb")),
                TokenKind::Str(str!("it")),
            ]
        );
    }

    #[test]
    fn single_quoted_strings_may_hold_double_quotes() {
        assert_eq!(kinds(r#"'say "hi"'"#)[0], TokenKind::Str(str!("say \"hi\"")));
    }

    #[test]
    fn raw_strings_take_the_body_verbatim() {
        assert_eq!(kinds(r#"r"a\nb""#)[0], TokenKind::Str(str!("a\\nb")));
        assert_eq!(kinds("r'''two\nlines'''")[0], TokenKind::Str(str!("two\nlines")));
    }

    #[test]
    fn unterminated_string_is_a_single_error_token() {
        let tokens = lex("\"never ends\n");
        assert_eq!(
            tokens[0].kind,
            TokenKind::BadStringLiteral(str!("\"never ends\n"))
        );
        // the error token swallows everything to the end of input
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, TokenKind::NewLine);
        assert_eq!(tokens[2].kind, TokenKind::EOF);
    }

    #[test]
    fn escaped_backslash_before_closing_quote_at_end_of_input() {
        // the scanner reads the final `\"` as an escaped quote and runs off
        // the end, but the raw text is a complete JSON string
        let tokens = lex("\"a\\\\\"");
        assert_eq!(tokens[0].kind, TokenKind::Str(str!("a\\")));
        assert_eq!(tokens[1].kind, TokenKind::NewLine);
        assert_eq!(tokens[2].kind, TokenKind::EOF);
    }

    #[test]
    fn comments_keep_their_text() {
        assert_eq!(
            kinds("// note\n")[0],
            TokenKind::Comment(str!("// note"))
        );
    }

    #[test]
    fn two_character_symbols_win_over_one() {
        assert_eq!(
            kinds("== = => ?? ** *\n"),
            vec![
                TokenKind::EqEq,
                TokenKind::Equals,
                TokenKind::FatArrow,
                TokenKind::Coalesce,
                TokenKind::Pow,
                TokenKind::Asterisk,
                TokenKind::NewLine,
                TokenKind::EOF
            ]
        );
    }

    #[test]
    fn unrecognized_runs_to_whitespace() {
        assert_eq!(
            kinds("$$$ x\n")[0],
            TokenKind::Unrecognized(str!("$$$"))
        );
    }
}
