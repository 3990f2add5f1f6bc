// ABOUTME: Recursive descent parser with precedence climbing for expressions

use crate::ast::{BinaryOp, BindKind, Expr, FunctionDef, LogicalOp, Program, Stmt, UnaryOp};
use crate::error::SyntaxError;
use crate::token::{Literal, Span, Token, TokenKind};
use std::rc::Rc;

/// Parses a token sequence (as produced by the lexer) into a program.
pub fn parse(tokens: Vec<Token>) -> Result<Program, SyntaxError> {
    Parser::new(tokens).program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|t| t.kind),
            Some(TokenKind::Eof)
        ));
        Parser { tokens, pos: 0 }
    }

    fn program(mut self) -> Result<Program, SyntaxError> {
        let file = self.peek().file.clone();
        let mut body = Vec::new();
        while !self.check(TokenKind::Eof) {
            body.push(self.declaration()?);
        }
        Ok(Program { body, file })
    }

    // ------------------------------------------------------------------
    // Token plumbing
    // ------------------------------------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if !matches!(token.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, SyntaxError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!("expected {}", what)))
        }
    }

    fn error_here(&self, message: String) -> SyntaxError {
        let token = self.peek();
        let message = if token.kind == TokenKind::Eof {
            format!("{}, found end of input", message)
        } else {
            format!("{}, found '{}'", message, token.lexeme)
        };
        if token.kind == TokenKind::Eof {
            SyntaxError::incomplete(message, &token.file, token.span())
        } else {
            SyntaxError::new(message, &token.file, token.span())
        }
    }

    // ------------------------------------------------------------------
    // Declarations and statements
    // ------------------------------------------------------------------

    fn declaration(&mut self) -> Result<Stmt, SyntaxError> {
        match self.peek().kind {
            // An anonymous `fun` at statement position is an expression.
            TokenKind::Fun if self.peek_at(1).kind == TokenKind::Ident => self.function_decl(),
            TokenKind::Let | TokenKind::Const => self.var_decl(),
            TokenKind::Class => self.class_decl(),
            TokenKind::Import => self.import_stmt(),
            _ => self.statement(),
        }
    }

    fn var_decl(&mut self) -> Result<Stmt, SyntaxError> {
        let kw = self.advance();
        let kind = match kw.kind {
            TokenKind::Const => BindKind::Const,
            _ => BindKind::Let,
        };
        let name = self.expect(TokenKind::Ident, "a variable name")?;
        let init = if self.matches(TokenKind::Eq) {
            Some(self.expression()?)
        } else {
            None
        };
        self.matches(TokenKind::Semi);
        let span = name.span();
        Ok(Stmt::VarDecl {
            kind,
            name: name.lexeme,
            init,
            span,
        })
    }

    fn function_decl(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance();
        let name = self.expect(TokenKind::Ident, "a function name")?;
        let name_span = name.span();
        let decl = self.function_rest(Some(name.lexeme), name_span)?;
        Ok(Stmt::Function { decl })
    }

    /// Parses `(params) { body }` after the name (or lack of one).
    fn function_rest(
        &mut self,
        name: Option<String>,
        span: Span,
    ) -> Result<Rc<FunctionDef>, SyntaxError> {
        let file = self.peek().file.clone();
        self.expect(TokenKind::LParen, "'(' before parameters")?;
        let params = self.parameters()?;
        self.expect(TokenKind::LBrace, "'{' before function body")?;
        let body = self.block_body()?;
        Ok(Rc::new(FunctionDef {
            name,
            params,
            body,
            span,
            file,
        }))
    }

    fn parameters(&mut self) -> Result<Vec<String>, SyntaxError> {
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let param = self.expect(TokenKind::Ident, "a parameter name")?;
                params.push(param.lexeme);
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')' after parameters")?;
        Ok(params)
    }

    fn class_decl(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance();
        let name = self.expect(TokenKind::Ident, "a class name")?;
        self.expect(TokenKind::LBrace, "'{' before class body")?;
        let mut methods = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            let method = self.expect(TokenKind::Ident, "a method name")?;
            let method_span = method.span();
            methods.push(self.function_rest(Some(method.lexeme), method_span)?);
        }
        self.expect(TokenKind::RBrace, "'}' after class body")?;
        let span = name.span();
        Ok(Stmt::Class {
            name: name.lexeme,
            methods,
            span,
        })
    }

    fn import_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        let kw = self.advance();
        // `import X from "path"` — `from` is contextual, not a keyword.
        if self.check(TokenKind::Ident) {
            let local = self.advance();
            let from = self.expect(TokenKind::Ident, "'from'")?;
            if from.lexeme != "from" {
                return Err(SyntaxError::new(
                    format!("expected 'from', found '{}'", from.lexeme),
                    &from.file,
                    from.span(),
                ));
            }
            let path = self.string_literal("a module path")?;
            self.matches(TokenKind::Semi);
            return Ok(Stmt::Import {
                local: Some(local.lexeme),
                path,
                span: kw.span(),
            });
        }
        let path = self.string_literal("a module path")?;
        self.matches(TokenKind::Semi);
        Ok(Stmt::Import {
            local: None,
            path,
            span: kw.span(),
        })
    }

    fn string_literal(&mut self, what: &str) -> Result<String, SyntaxError> {
        let token = self.expect(TokenKind::Str, what)?;
        match token.literal {
            Some(Literal::Str(s)) => Ok(s),
            _ => unreachable!("string token without payload"),
        }
    }

    fn statement(&mut self) -> Result<Stmt, SyntaxError> {
        match self.peek().kind {
            TokenKind::LBrace => {
                self.advance();
                Ok(Stmt::Block {
                    body: self.block_body()?,
                })
            }
            TokenKind::If => self.if_stmt(),
            TokenKind::While => self.while_stmt(),
            TokenKind::For => self.for_stmt(),
            TokenKind::Return => {
                let kw = self.advance();
                let value = if self.end_of_statement() {
                    None
                } else {
                    Some(self.expression()?)
                };
                self.matches(TokenKind::Semi);
                Ok(Stmt::Return {
                    value,
                    span: kw.span(),
                })
            }
            TokenKind::Break => {
                let kw = self.advance();
                self.matches(TokenKind::Semi);
                Ok(Stmt::Break { span: kw.span() })
            }
            TokenKind::Continue => {
                let kw = self.advance();
                self.matches(TokenKind::Semi);
                Ok(Stmt::Continue { span: kw.span() })
            }
            TokenKind::Try => self.try_stmt(),
            TokenKind::Throw => {
                let kw = self.advance();
                let value = self.expression()?;
                self.matches(TokenKind::Semi);
                Ok(Stmt::Throw {
                    value,
                    span: kw.span(),
                })
            }
            _ => {
                let expr = self.expression()?;
                self.matches(TokenKind::Semi);
                Ok(Stmt::Expr { expr })
            }
        }
    }

    /// True when no expression can follow (used by `return`).
    fn end_of_statement(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Semi | TokenKind::RBrace | TokenKind::Eof
        )
    }

    /// Statements up to the closing brace; the opening brace is consumed.
    fn block_body(&mut self) -> Result<Vec<Stmt>, SyntaxError> {
        let mut body = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            body.push(self.declaration()?);
        }
        self.expect(TokenKind::RBrace, "'}' after block")?;
        Ok(body)
    }

    fn if_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance();
        self.expect(TokenKind::LParen, "'(' after 'if'")?;
        let test = self.expression()?;
        self.expect(TokenKind::RParen, "')' after condition")?;
        let then = Box::new(self.statement()?);
        let alt = if self.matches(TokenKind::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Stmt::If { test, then, alt })
    }

    fn while_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance();
        self.expect(TokenKind::LParen, "'(' after 'while'")?;
        let test = self.expression()?;
        self.expect(TokenKind::RParen, "')' after condition")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While { test, body })
    }

    fn for_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance();
        self.expect(TokenKind::LParen, "'(' after 'for'")?;

        let init = if self.matches(TokenKind::Semi) {
            None
        } else if matches!(self.peek().kind, TokenKind::Let | TokenKind::Const) {
            // var_decl consumes the separating semicolon itself
            Some(Box::new(self.var_decl()?))
        } else {
            let expr = self.expression()?;
            self.expect(TokenKind::Semi, "';' after for-initializer")?;
            Some(Box::new(Stmt::Expr { expr }))
        };

        let test = if self.check(TokenKind::Semi) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenKind::Semi, "';' after for-condition")?;

        let update = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenKind::RParen, "')' after for-clauses")?;

        let body = Box::new(self.statement()?);
        Ok(Stmt::For {
            init,
            test,
            update,
            body,
        })
    }

    fn try_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        self.advance();
        self.expect(TokenKind::LBrace, "'{' after 'try'")?;
        let body = self.block_body()?;
        let mut param = None;
        let mut handler = None;
        if self.matches(TokenKind::Catch) {
            // The catch parameter is optional: `catch { }` discards the value.
            if self.matches(TokenKind::LParen) {
                let name = self.expect(TokenKind::Ident, "a catch parameter")?;
                self.expect(TokenKind::RParen, "')' after catch parameter")?;
                param = Some(name.lexeme);
            }
            self.expect(TokenKind::LBrace, "'{' after 'catch'")?;
            handler = Some(self.block_body()?);
        }
        Ok(Stmt::Try {
            body,
            param,
            handler,
        })
    }

    // ------------------------------------------------------------------
    // Expressions, lowest precedence first
    // ------------------------------------------------------------------

    fn expression(&mut self) -> Result<Expr, SyntaxError> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr, SyntaxError> {
        let expr = self.logical_or()?;
        if self.check(TokenKind::Eq) {
            let eq = self.advance();
            if !matches!(
                expr,
                Expr::Ident { .. } | Expr::Property { .. } | Expr::Index { .. }
            ) {
                return Err(SyntaxError::new(
                    "invalid assignment target",
                    &eq.file,
                    eq.span(),
                ));
            }
            let value = self.assignment()?;
            return Ok(Expr::Assign {
                target: Box::new(expr),
                value: Box::new(value),
                span: eq.span(),
            });
        }
        Ok(expr)
    }

    fn logical_or(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.logical_and()?;
        while self.matches(TokenKind::PipePipe) {
            let right = self.logical_and()?;
            expr = Expr::Logical {
                op: LogicalOp::Or,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn logical_and(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.equality()?;
        while self.matches(TokenKind::AmpAmp) {
            let right = self.equality()?;
            expr = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.comparison()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::BangEq => BinaryOp::NotEq,
                _ => break,
            };
            let token = self.advance();
            let right = self.comparison()?;
            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
                span: token.span(),
            };
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.additive()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::GtEq,
                _ => break,
            };
            let token = self.advance();
            let right = self.additive()?;
            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
                span: token.span(),
            };
        }
        Ok(expr)
    }

    fn additive(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let token = self.advance();
            let right = self.multiplicative()?;
            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
                span: token.span(),
            };
        }
        Ok(expr)
    }

    fn multiplicative(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.power()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => break,
            };
            let token = self.advance();
            let right = self.power()?;
            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
                span: token.span(),
            };
        }
        Ok(expr)
    }

    /// `**` is right-associative: `2 ** 3 ** 2` is `2 ** (3 ** 2)`.
    fn power(&mut self) -> Result<Expr, SyntaxError> {
        let base = self.unary()?;
        if self.check(TokenKind::StarStar) {
            let token = self.advance();
            let exponent = self.power()?;
            return Ok(Expr::Binary {
                op: BinaryOp::Pow,
                left: Box::new(base),
                right: Box::new(exponent),
                span: token.span(),
            });
        }
        Ok(base)
    }

    fn unary(&mut self) -> Result<Expr, SyntaxError> {
        match self.peek().kind {
            TokenKind::Bang => {
                let token = self.advance();
                let operand = self.unary()?;
                Ok(Expr::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                    span: token.span(),
                })
            }
            TokenKind::Minus => {
                let token = self.advance();
                let operand = self.unary()?;
                Ok(Expr::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                    span: token.span(),
                })
            }
            TokenKind::New => {
                let token = self.advance();
                // `new P(42)` parses the whole call, then the arguments are
                // lifted out of it; `new P` constructs with no arguments.
                let operand = self.unary()?;
                let (callee, args) = match operand {
                    Expr::Call { callee, args, .. } => (callee, args),
                    other => (Box::new(other), Vec::new()),
                };
                Ok(Expr::New {
                    callee,
                    args,
                    span: token.span(),
                })
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.primary()?;
        loop {
            match self.peek().kind {
                TokenKind::LParen => {
                    let token = self.advance();
                    let args = self.arguments()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        span: token.span(),
                    };
                }
                TokenKind::Dot => {
                    let token = self.advance();
                    let name = self.expect(TokenKind::Ident, "a property name")?;
                    expr = Expr::Property {
                        object: Box::new(expr),
                        name: name.lexeme,
                        span: token.span(),
                    };
                }
                TokenKind::LBracket => {
                    let token = self.advance();
                    let index = self.expression()?;
                    self.expect(TokenKind::RBracket, "']' after index")?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                        span: token.span(),
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, SyntaxError> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.expression()?);
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')' after arguments")?;
        Ok(args)
    }

    fn primary(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number | TokenKind::Str | TokenKind::True | TokenKind::False
            | TokenKind::Null => {
                self.advance();
                Ok(Expr::Literal {
                    value: token.literal.expect("literal token carries payload"),
                })
            }
            TokenKind::This => {
                self.advance();
                Ok(Expr::This { span: token.span() })
            }
            TokenKind::Ident => {
                self.advance();
                let span = token.span();
                Ok(Expr::Ident {
                    name: token.lexeme,
                    span,
                })
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.expression()?;
                self.expect(TokenKind::RParen, "')' after expression")?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                while !self.check(TokenKind::RBracket) {
                    elements.push(self.expression()?);
                    if !self.matches(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RBracket, "']' after array elements")?;
                Ok(Expr::Array { elements })
            }
            TokenKind::LBrace => {
                self.advance();
                let mut props = Vec::new();
                while !self.check(TokenKind::RBrace) {
                    let key = match self.peek().kind {
                        TokenKind::Ident => self.advance().lexeme,
                        TokenKind::Str => self.string_literal("a property key")?,
                        _ => return Err(self.error_here("expected a property key".into())),
                    };
                    self.expect(TokenKind::Colon, "':' after property key")?;
                    props.push((key, self.expression()?));
                    if !self.matches(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RBrace, "'}' after object literal")?;
                Ok(Expr::Object { props })
            }
            TokenKind::Fun => {
                self.advance();
                let name = if self.check(TokenKind::Ident) {
                    Some(self.advance().lexeme)
                } else {
                    None
                };
                let decl = self.function_rest(name, token.span())?;
                Ok(Expr::Function { decl })
            }
            _ => Err(self.error_here("expected an expression".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_source(source: &str) -> Result<Program, SyntaxError> {
        parse(tokenize(source, "test").unwrap())
    }

    fn first_stmt(source: &str) -> Stmt {
        parse_source(source).unwrap().body.remove(0)
    }

    #[test]
    fn test_power_is_right_associative() {
        let stmt = first_stmt("2 ** 3 ** 2;");
        let Stmt::Expr { expr: Expr::Binary { op, right, .. } } = stmt else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinaryOp::Pow);
        assert!(matches!(
            *right,
            Expr::Binary { op: BinaryOp::Pow, .. }
        ));
    }

    #[test]
    fn test_precedence_mul_over_add() {
        let stmt = first_stmt("1 + 2 * 3;");
        let Stmt::Expr { expr: Expr::Binary { op, right, .. } } = stmt else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_invalid_assignment_target() {
        let err = parse_source("1 + 2 = 3;").unwrap_err();
        assert!(err.message.contains("invalid assignment target"));
    }

    #[test]
    fn test_semicolons_are_optional() {
        let program = parse_source("let a = 1\nlet b = 2").unwrap();
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn test_new_lifts_call_arguments() {
        let stmt = first_stmt("new P(1, 2);");
        let Stmt::Expr { expr: Expr::New { callee, args, .. } } = stmt else {
            panic!("expected new expression");
        };
        assert!(matches!(*callee, Expr::Ident { ref name, .. } if name == "P"));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_new_without_call() {
        let stmt = first_stmt("new P;");
        let Stmt::Expr { expr: Expr::New { args, .. } } = stmt else {
            panic!("expected new expression");
        };
        assert!(args.is_empty());
    }

    #[test]
    fn test_import_forms() {
        let program = parse_source("import \"./a.aur\"; import x from \"./b.aur\";").unwrap();
        assert!(
            matches!(&program.body[0], Stmt::Import { local: None, path, .. } if path == "./a.aur")
        );
        assert!(matches!(
            &program.body[1],
            Stmt::Import { local: Some(l), path, .. } if l == "x" && path == "./b.aur"
        ));
    }

    #[test]
    fn test_from_is_contextual_not_reserved() {
        // `from` stays usable as an ordinary identifier
        let program = parse_source("let from = 1; from = 2;").unwrap();
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn test_class_with_methods() {
        let stmt = first_stmt("class P { constructor(x) { this.x = x; } get() { return this.x; } }");
        let Stmt::Class { name, methods, .. } = stmt else {
            panic!("expected class declaration");
        };
        assert_eq!(name, "P");
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].name.as_deref(), Some("constructor"));
        assert_eq!(methods[1].name.as_deref(), Some("get"));
    }

    #[test]
    fn test_catch_parameter_is_optional() {
        assert!(matches!(
            first_stmt("try { x; } catch { y; }"),
            Stmt::Try { param: None, handler: Some(_), .. }
        ));
        assert!(matches!(
            first_stmt("try { x; } catch (e) { y; }"),
            Stmt::Try { param: Some(_), .. }
        ));
    }

    #[test]
    fn test_for_clauses_may_be_empty() {
        assert!(matches!(
            first_stmt("for (;;) { break; }"),
            Stmt::For { init: None, test: None, update: None, .. }
        ));
    }

    #[test]
    fn test_object_literal_keys() {
        let stmt = first_stmt("x = {a: 1, \"b c\": 2};");
        let Stmt::Expr { expr: Expr::Assign { value, .. } } = stmt else {
            panic!("expected assignment");
        };
        let Expr::Object { props } = *value else {
            panic!("expected object literal");
        };
        assert_eq!(props[0].0, "a");
        assert_eq!(props[1].0, "b c");
    }

    #[test]
    fn test_block_at_statement_position_is_not_object() {
        assert!(matches!(first_stmt("{ let a = 1; }"), Stmt::Block { .. }));
    }

    #[test]
    fn test_anonymous_fun_statement_is_expression() {
        assert!(matches!(
            first_stmt("fun (x) { return x; };"),
            Stmt::Expr { expr: Expr::Function { .. } }
        ));
    }

    #[test]
    fn test_unexpected_eof_is_incomplete() {
        let err = parse_source("if (x) {").unwrap_err();
        assert!(err.incomplete);
    }

    #[test]
    fn test_error_reports_position() {
        let err = parse_source("let = 1;").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.col, 5);
    }
}
