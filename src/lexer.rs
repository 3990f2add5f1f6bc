// ABOUTME: Hand-written lexer turning source text into positioned tokens

use crate::error::SyntaxError;
use crate::token::{keyword_kind, Literal, Span, Token, TokenKind};
use std::rc::Rc;

/// Tokenizes a source string. The returned sequence always ends with an
/// `Eof` token carrying the final position.
pub fn tokenize(source: &str, file: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(source, file).run()
}

struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: u32,
    col: u32,
    file: Rc<str>,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str, file: &str) -> Self {
        Lexer {
            src: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            file: Rc::from(file),
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, SyntaxError> {
        while let Some(c) = self.peek() {
            let span = self.span();
            match c {
                _ if c.is_whitespace() => {
                    self.advance();
                }
                '/' if self.peek_at(1) == Some('/') => self.skip_line_comment(),
                '/' if self.peek_at(1) == Some('*') => self.skip_block_comment(),
                '\'' | '"' => self.string(span)?,
                _ if c.is_ascii_digit() => self.number(span),
                _ if c.is_ascii_alphabetic() || c == '_' => self.ident(span),
                _ => self.operator(span)?,
            }
        }
        let span = self.span();
        self.push(TokenKind::Eof, String::new(), None, span);
        Ok(self.tokens)
    }

    // ------------------------------------------------------------------
    // Character plumbing
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.src.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            col: self.col,
        }
    }

    fn push(&mut self, kind: TokenKind, lexeme: String, literal: Option<Literal>, span: Span) {
        self.tokens.push(Token {
            kind,
            lexeme,
            literal,
            line: span.line,
            col: span.col,
            file: self.file.clone(),
        });
    }

    // ------------------------------------------------------------------
    // Lexeme scanners
    // ------------------------------------------------------------------

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Block comments do not nest; an unterminated one runs to end of input.
    fn skip_block_comment(&mut self) {
        self.advance();
        self.advance();
        while let Some(c) = self.advance() {
            if c == '*' && self.peek() == Some('/') {
                self.advance();
                return;
            }
        }
    }

    fn string(&mut self, span: Span) -> Result<(), SyntaxError> {
        let quote = self.advance().expect("string start");
        let mut lexeme = String::from(quote);
        let mut decoded = String::new();
        loop {
            match self.advance() {
                None => {
                    return Err(SyntaxError::incomplete(
                        "unterminated string",
                        &self.file,
                        span,
                    ));
                }
                Some(c) if c == quote => {
                    lexeme.push(c);
                    break;
                }
                Some('\\') => {
                    lexeme.push('\\');
                    let escaped = self.advance().ok_or_else(|| {
                        SyntaxError::incomplete("unterminated string", &self.file, span)
                    })?;
                    lexeme.push(escaped);
                    decoded.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        // \\, \", \' and any unrecognized escape pass through
                        other => other,
                    });
                }
                Some(c) => {
                    lexeme.push(c);
                    decoded.push(c);
                }
            }
        }
        self.push(TokenKind::Str, lexeme, Some(Literal::Str(decoded)), span);
        Ok(())
    }

    fn number(&mut self, span: Span) {
        let mut lexeme = String::new();
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            lexeme.push(c);
            self.advance();
        }
        // A fractional part requires a digit after the dot; otherwise the
        // dot belongs to a property access.
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            lexeme.push('.');
            self.advance();
            while let Some(c) = self.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                lexeme.push(c);
                self.advance();
            }
        }
        let value: f64 = lexeme.parse().expect("digits parse as f64");
        self.push(TokenKind::Number, lexeme, Some(Literal::Number(value)), span);
    }

    fn ident(&mut self, span: Span) {
        let mut lexeme = String::new();
        while let Some(c) = self.peek() {
            if !(c.is_ascii_alphanumeric() || c == '_') {
                break;
            }
            lexeme.push(c);
            self.advance();
        }
        match keyword_kind(&lexeme) {
            Some(kind) => {
                let literal = match kind {
                    TokenKind::True => Some(Literal::Bool(true)),
                    TokenKind::False => Some(Literal::Bool(false)),
                    TokenKind::Null => Some(Literal::Null),
                    _ => None,
                };
                self.push(kind, lexeme, literal, span);
            }
            None => self.push(TokenKind::Ident, lexeme, None, span),
        }
    }

    fn operator(&mut self, span: Span) -> Result<(), SyntaxError> {
        let c = self.advance().expect("operator start");
        // Two-character operators are matched greedily.
        let two = |lexer: &Lexer, second: char| lexer.peek() == Some(second);
        let (kind, lexeme) = match c {
            '=' if two(self, '=') => (TokenKind::EqEq, "=="),
            '!' if two(self, '=') => (TokenKind::BangEq, "!="),
            '<' if two(self, '=') => (TokenKind::LtEq, "<="),
            '>' if two(self, '=') => (TokenKind::GtEq, ">="),
            '&' if two(self, '&') => (TokenKind::AmpAmp, "&&"),
            '|' if two(self, '|') => (TokenKind::PipePipe, "||"),
            '*' if two(self, '*') => (TokenKind::StarStar, "**"),
            '(' => (TokenKind::LParen, "("),
            ')' => (TokenKind::RParen, ")"),
            '{' => (TokenKind::LBrace, "{"),
            '}' => (TokenKind::RBrace, "}"),
            '[' => (TokenKind::LBracket, "["),
            ']' => (TokenKind::RBracket, "]"),
            ',' => (TokenKind::Comma, ","),
            ';' => (TokenKind::Semi, ";"),
            ':' => (TokenKind::Colon, ":"),
            '.' => (TokenKind::Dot, "."),
            '?' => (TokenKind::Question, "?"),
            '~' => (TokenKind::Tilde, "~"),
            '+' => (TokenKind::Plus, "+"),
            '-' => (TokenKind::Minus, "-"),
            '*' => (TokenKind::Star, "*"),
            '/' => (TokenKind::Slash, "/"),
            '%' => (TokenKind::Percent, "%"),
            '<' => (TokenKind::Lt, "<"),
            '>' => (TokenKind::Gt, ">"),
            '=' => (TokenKind::Eq, "="),
            '!' => (TokenKind::Bang, "!"),
            _ => {
                return Err(SyntaxError::new(
                    format!("unexpected character '{}'", c),
                    &self.file,
                    span,
                ));
            }
        };
        if lexeme.len() == 2 {
            self.advance();
        }
        self.push(kind, lexeme.to_string(), None, span);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source, "test")
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("let x = fun"),
            vec![
                TokenKind::Let,
                TokenKind::Ident,
                TokenKind::Eq,
                TokenKind::Fun,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_two_char_operators_are_greedy() {
        assert_eq!(
            kinds("== != <= >= && || ** = < *"),
            vec![
                TokenKind::EqEq,
                TokenKind::BangEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::AmpAmp,
                TokenKind::PipePipe,
                TokenKind::StarStar,
                TokenKind::Eq,
                TokenKind::Lt,
                TokenKind::Star,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_number_literals_are_predecoded() {
        let tokens = tokenize("42 3.25", "test").unwrap();
        assert_eq!(tokens[0].literal, Some(Literal::Number(42.0)));
        assert_eq!(tokens[1].literal, Some(Literal::Number(3.25)));
    }

    #[test]
    fn test_number_dot_without_digits_is_property_access() {
        assert_eq!(
            kinds("1.foo"),
            vec![
                TokenKind::Number,
                TokenKind::Dot,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        let tokens = tokenize(r#""a\n\t\\\"b\q""#, "test").unwrap();
        assert_eq!(
            tokens[0].literal,
            Some(Literal::Str("a\n\t\\\"bq".to_string()))
        );
    }

    #[test]
    fn test_single_and_double_quotes() {
        let tokens = tokenize("'hi' \"there\"", "test").unwrap();
        assert_eq!(tokens[0].literal, Some(Literal::Str("hi".to_string())));
        assert_eq!(tokens[1].literal, Some(Literal::Str("there".to_string())));
    }

    #[test]
    fn test_unterminated_string_reports_opening_quote() {
        let err = tokenize("let s = \"oops", "test").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.col, 9);
        assert!(err.incomplete);
    }

    #[test]
    fn test_comments_produce_no_tokens() {
        assert_eq!(
            kinds("1 // line\n/* block\nstill */ 2"),
            vec![TokenKind::Number, TokenKind::Number, TokenKind::Eof]
        );
    }

    #[test]
    fn test_positions_are_one_based() {
        let tokens = tokenize("a\n  bb", "test").unwrap();
        assert_eq!((tokens[0].line, tokens[0].col), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].col), (2, 3));
    }

    #[test]
    fn test_unknown_character_errors() {
        let err = tokenize("let @ = 1", "test").unwrap_err();
        assert!(err.message.contains('@'));
        assert_eq!(err.col, 5);
    }

    #[test]
    fn test_keyword_literals_carry_payload() {
        let tokens = tokenize("true false null", "test").unwrap();
        assert_eq!(tokens[0].literal, Some(Literal::Bool(true)));
        assert_eq!(tokens[1].literal, Some(Literal::Bool(false)));
        assert_eq!(tokens[2].literal, Some(Literal::Null));
    }
}
