//! Token stream → statement list (spec.md §4.2).
//!
//! Recursive descent with one-token lookahead. Binary operators climb a
//! fixed precedence ladder (equality → comparison → addition →
//! multiplication → unary → primary), each level left-associative by
//! looping while the current token matches that level's operator set.
//! Assignment sits above equality and is right-associative instead.
//!
//! On an unexpected token the parser reports the error via `diagnostics`
//! and enters panic mode, discarding tokens until a statement boundary so
//! parsing can resume with the next declaration. This is what lets a
//! single program report more than one syntax error.

use crate::ast::{Expr, Stmt};
use crate::diagnostics::Diagnostics;
use crate::token::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    /// Parses the whole token stream into a statement list. Errors are
    /// reported through `diagnostics`; a statement that fails to parse is
    /// skipped via `synchronize` and parsing resumes with the next
    /// declaration, so the returned `Vec` may be incomplete when
    /// `diagnostics.had_error()` is true.
    pub fn parse(mut self, diagnostics: &mut Diagnostics) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            match self.declaration(diagnostics) {
                Some(stmt) => statements.push(stmt),
                None => self.synchronize(),
            }
        }
        statements
    }

    // --- declarations / statements ---

    fn declaration(&mut self, diagnostics: &mut Diagnostics) -> Option<Stmt> {
        let result = if self.match_kind(&[TokenKind::Var]) {
            self.var_declaration(diagnostics)
        } else {
            self.statement(diagnostics)
        };
        result.ok()
    }

    fn var_declaration(&mut self, diagnostics: &mut Diagnostics) -> Result<Stmt, ()> {
        let name = self.consume(TokenKind::Identifier, "Expect variable name.", diagnostics)?;

        let initializer = if self.match_kind(&[TokenKind::Equal]) {
            Some(self.expression(diagnostics)?)
        } else {
            None
        };

        self.consume(
            TokenKind::Semicolon,
            "Expect ';' after variable declaration.",
            diagnostics,
        )?;
        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self, diagnostics: &mut Diagnostics) -> Result<Stmt, ()> {
        if self.match_kind(&[TokenKind::Print]) {
            return self.print_statement(diagnostics);
        }
        if self.match_kind(&[TokenKind::LeftBrace]) {
            return Ok(Stmt::Block(self.block(diagnostics)?));
        }
        self.expression_statement(diagnostics)
    }

    fn print_statement(&mut self, diagnostics: &mut Diagnostics) -> Result<Stmt, ()> {
        let value = self.expression(diagnostics)?;
        self.consume(TokenKind::Semicolon, "Expect ';' after value.", diagnostics)?;
        Ok(Stmt::Print(value))
    }

    fn expression_statement(&mut self, diagnostics: &mut Diagnostics) -> Result<Stmt, ()> {
        let expr = self.expression(diagnostics)?;
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.", diagnostics)?;
        Ok(Stmt::Expression(expr))
    }

    fn block(&mut self, diagnostics: &mut Diagnostics) -> Result<Vec<Stmt>, ()> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            match self.declaration(diagnostics) {
                Some(stmt) => statements.push(stmt),
                None => self.synchronize(),
            }
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after block.", diagnostics)?;
        Ok(statements)
    }

    // --- expressions, lowest to highest precedence ---

    fn expression(&mut self, diagnostics: &mut Diagnostics) -> Result<Expr, ()> {
        self.assignment(diagnostics)
    }

    /// Right-associative: parses the left side as an ordinary expression,
    /// then reinterprets it as an assignment target if `=` follows. A
    /// non-identifier target is reported but does not abort the parse; the
    /// already-built left expression is returned as-is.
    fn assignment(&mut self, diagnostics: &mut Diagnostics) -> Result<Expr, ()> {
        let expr = self.equality(diagnostics)?;

        if self.match_kind(&[TokenKind::Equal]) {
            let equals = self.previous().clone();
            let value = self.assignment(diagnostics)?;

            if let Expr::Variable(name) = expr {
                return Ok(Expr::Assign {
                    name,
                    value: Box::new(value),
                });
            }

            diagnostics.error_at(&equals, "Invalid assignment target.");
        }

        Ok(expr)
    }

    fn equality(&mut self, diagnostics: &mut Diagnostics) -> Result<Expr, ()> {
        self.left_assoc_binary(
            diagnostics,
            &[TokenKind::BangEqual, TokenKind::EqualEqual],
            Self::comparison,
        )
    }

    fn comparison(&mut self, diagnostics: &mut Diagnostics) -> Result<Expr, ()> {
        self.left_assoc_binary(
            diagnostics,
            &[
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
            ],
            Self::addition,
        )
    }

    fn addition(&mut self, diagnostics: &mut Diagnostics) -> Result<Expr, ()> {
        self.left_assoc_binary(
            diagnostics,
            &[TokenKind::Minus, TokenKind::Plus],
            Self::multiplication,
        )
    }

    fn multiplication(&mut self, diagnostics: &mut Diagnostics) -> Result<Expr, ()> {
        self.left_assoc_binary(
            diagnostics,
            &[TokenKind::Slash, TokenKind::Star],
            Self::unary,
        )
    }

    /// Shared precedence-climbing loop: parse one higher-precedence operand,
    /// then repeatedly consume an operator from `kinds` and a fresh
    /// higher-precedence right operand, folding left-associatively.
    fn left_assoc_binary(
        &mut self,
        diagnostics: &mut Diagnostics,
        kinds: &[TokenKind],
        mut operand: impl FnMut(&mut Self, &mut Diagnostics) -> Result<Expr, ()>,
    ) -> Result<Expr, ()> {
        let mut expr = operand(self, diagnostics)?;
        while self.match_kind(kinds) {
            let op = self.previous().clone();
            let right = operand(self, diagnostics)?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn unary(&mut self, diagnostics: &mut Diagnostics) -> Result<Expr, ()> {
        if self.match_kind(&[TokenKind::Bang, TokenKind::Minus]) {
            let op = self.previous().clone();
            let right = self.unary(diagnostics)?;
            return Ok(Expr::Unary {
                op,
                right: Box::new(right),
            });
        }
        self.primary(diagnostics)
    }

    fn primary(&mut self, diagnostics: &mut Diagnostics) -> Result<Expr, ()> {
        if self.match_kind(&[TokenKind::False]) {
            return Ok(Expr::Literal(crate::value::Value::Boolean(false)));
        }
        if self.match_kind(&[TokenKind::True]) {
            return Ok(Expr::Literal(crate::value::Value::Boolean(true)));
        }
        if self.match_kind(&[TokenKind::Nil]) {
            return Ok(Expr::Literal(crate::value::Value::Nil));
        }
        if self.match_kind(&[TokenKind::Number, TokenKind::String]) {
            return Ok(Expr::Literal(self.previous().literal.clone()));
        }
        if self.match_kind(&[TokenKind::Identifier]) {
            return Ok(Expr::Variable(self.previous().clone()));
        }
        if self.match_kind(&[TokenKind::LeftParen]) {
            let expr = self.expression(diagnostics)?;
            self.consume(TokenKind::RightParen, "Expect ')' after expression.", diagnostics)?;
            return Ok(Expr::Grouping(Box::new(expr)));
        }

        let token = self.peek().clone();
        diagnostics.error_at(&token, "Expect expression.");
        Err(())
    }

    // --- token stream primitives ---

    fn match_kind(&mut self, kinds: &[TokenKind]) -> bool {
        for kind in kinds {
            if self.check(*kind) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn consume(
        &mut self,
        kind: TokenKind,
        message: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<Token, ()> {
        if self.check(kind) {
            return Ok(self.advance().clone());
        }
        let token = self.peek().clone();
        diagnostics.error_at(&token, message);
        Err(())
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    /// Discards tokens until the previously consumed token was `;` or the
    /// next token begins a new statement, so parsing can resume cleanly
    /// after a syntax error.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }

            match self.peek().kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;
    use crate::value::Value;

    fn parse(src: &str) -> (Vec<Stmt>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new(src).scan_tokens(&mut diagnostics);
        let statements = Parser::new(tokens).parse(&mut diagnostics);
        (statements, diagnostics)
    }

    #[test]
    fn var_declaration_with_initializer() {
        let (stmts, diagnostics) = parse("var a = 1;");
        assert!(!diagnostics.had_error());
        assert!(matches!(stmts[0], Stmt::Var { .. }));
    }

    #[test]
    fn binary_precedence_groups_multiplication_tighter() {
        let (stmts, diagnostics) = parse("1 + 2 * 3;");
        assert!(!diagnostics.had_error());
        match &stmts[0] {
            Stmt::Expression(Expr::Binary { left, right, .. }) => {
                assert!(matches!(**left, Expr::Literal(Value::Number(n)) if n == 1.0));
                assert!(matches!(**right, Expr::Binary { .. }));
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        let (stmts, diagnostics) = parse("a = b = 3;");
        assert!(!diagnostics.had_error());
        match &stmts[0] {
            Stmt::Expression(Expr::Assign { name, value }) => {
                assert_eq!(name.lexeme, "a");
                assert!(matches!(**value, Expr::Assign { .. }));
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn invalid_assignment_target_reports_error_but_keeps_parsing() {
        let (stmts, diagnostics) = parse("1 = 2;");
        assert!(diagnostics.had_error());
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn missing_expression_is_a_parse_error() {
        let (_, diagnostics) = parse("1 + ;");
        assert!(diagnostics.had_error());
    }

    #[test]
    fn multiple_errors_are_all_reported() {
        let (_, diagnostics) = parse("var ; var ;");
        assert!(diagnostics.had_error());
    }

    #[test]
    fn block_nests_statements() {
        let (stmts, diagnostics) = parse("{ var a = 1; print a; }");
        assert!(!diagnostics.had_error());
        match &stmts[0] {
            Stmt::Block(inner) => assert_eq!(inner.len(), 2),
            other => panic!("unexpected statement: {:?}", other),
        }
    }
}
