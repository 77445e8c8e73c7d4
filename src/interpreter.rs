//! AST evaluator (spec.md §4.4).
//!
//! Holds the "current environment" pointer, initialized to a fresh global
//! scope. Runs statements in source order and halts the whole program on
//! the first runtime error. Unlike lexical/syntactic errors, at most one
//! runtime error is ever reported per `interpret` call.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Expr, Stmt};
use crate::diagnostics::{Diagnostics, RuntimeError};
use crate::environment::Environment;
use crate::token::TokenKind;
use crate::value::Value;

pub struct Interpreter {
    environment: Rc<RefCell<Environment>>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            environment: Environment::new_global(),
        }
    }

    /// Executes `statements` in order, reporting the first runtime error (if
    /// any) through `diagnostics` and aborting the remainder of this call.
    pub fn interpret(&mut self, statements: &[Stmt], diagnostics: &mut Diagnostics) {
        for statement in statements {
            if let Err(err) = self.execute(statement) {
                diagnostics.runtime_error(&err);
                return;
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                println!("{}", value);
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.borrow_mut().define(name.lexeme.clone(), value);
                Ok(())
            }
            Stmt::Block(statements) => self.execute_block(statements),
        }
    }

    /// Installs a new environment enclosed by the current one, executes
    /// `statements`, then restores the saved environment on *every* exit
    /// path: normal completion or the `?` short-circuit on error.
    fn execute_block(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        let previous = self.environment.clone();
        self.environment = Environment::new_enclosed(previous.clone());

        let result = (|| {
            for statement in statements {
                self.execute(statement)?;
            }
            Ok(())
        })();

        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Variable(name) => self.environment.borrow().get(name),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.environment.borrow_mut().assign(name, value.clone())?;
                Ok(value)
            }
            Expr::Unary { op, right } => {
                let right = self.evaluate(right)?;
                match op.kind {
                    TokenKind::Minus => Ok(Value::Number(-expect_number(op, &right)?)),
                    TokenKind::Bang => Ok(Value::Boolean(!right.is_truthy())),
                    _ => unreachable!("scanner/parser only produce ! and - as unary operators"),
                }
            }
            Expr::Binary { left, op, right } => self.evaluate_binary(left, op, right),
        }
    }

    fn evaluate_binary(
        &mut self,
        left: &Expr,
        op: &crate::token::Token,
        right: &Expr,
    ) -> Result<Value, RuntimeError> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        match op.kind {
            TokenKind::Minus => {
                Ok(Value::Number(expect_number(op, &left)? - expect_number(op, &right)?))
            }
            TokenKind::Slash => {
                Ok(Value::Number(expect_number(op, &left)? / expect_number(op, &right)?))
            }
            TokenKind::Star => {
                Ok(Value::Number(expect_number(op, &left)? * expect_number(op, &right)?))
            }
            TokenKind::Greater => {
                Ok(Value::Boolean(expect_number(op, &left)? > expect_number(op, &right)?))
            }
            TokenKind::GreaterEqual => {
                Ok(Value::Boolean(expect_number(op, &left)? >= expect_number(op, &right)?))
            }
            TokenKind::Less => {
                Ok(Value::Boolean(expect_number(op, &left)? < expect_number(op, &right)?))
            }
            TokenKind::LessEqual => {
                Ok(Value::Boolean(expect_number(op, &left)? <= expect_number(op, &right)?))
            }
            TokenKind::Plus => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
                _ => Err(RuntimeError::new(
                    op.clone(),
                    "Operands must be two numbers or two strings.",
                )),
            },
            TokenKind::EqualEqual => Ok(Value::Boolean(left == right)),
            TokenKind::BangEqual => Ok(Value::Boolean(left != right)),
            _ => unreachable!("scanner/parser only produce binary operators handled above"),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn expect_number(op: &crate::token::Token, value: &Value) -> Result<f64, RuntimeError> {
    match value {
        Value::Number(n) => Ok(*n),
        _ => Err(RuntimeError::new(op.clone(), "Operands must be numbers.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::parser::Parser;
    use crate::scanner::Scanner;

    fn run(src: &str) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new(src).scan_tokens(&mut diagnostics);
        let statements = Parser::new(tokens).parse(&mut diagnostics);
        assert!(!diagnostics.had_error(), "program failed to parse: {}", src);
        Interpreter::new().interpret(&statements, &mut diagnostics);
        diagnostics
    }

    #[test]
    fn arithmetic_and_grouping() {
        let diagnostics = run("print (1 + 2) * 3;");
        assert!(!diagnostics.had_runtime_error());
    }

    #[test]
    fn string_plus_number_is_a_runtime_error() {
        let diagnostics = run("print \"a\" + 1;");
        assert!(diagnostics.had_runtime_error());
    }

    #[test]
    fn block_shadowing_restores_outer_binding() {
        let diagnostics = run(
            "var a = \"first\"; { var a = \"second\"; } print a;",
        );
        assert!(!diagnostics.had_runtime_error());
    }

    #[test]
    fn assignment_in_nested_block_mutates_outer_scope() {
        let diagnostics = run("var a = \"outer\"; { a = \"modified\"; } print a;");
        assert!(!diagnostics.had_runtime_error());
    }

    #[test]
    fn uninitialized_var_is_nil() {
        let diagnostics = run("var x; print x;");
        assert!(!diagnostics.had_runtime_error());
    }

    #[test]
    fn nan_is_not_equal_to_itself() {
        let diagnostics = run("print (0 / 0) == (0 / 0);");
        assert!(!diagnostics.had_runtime_error());
    }

    #[test]
    fn environment_restored_after_error_in_block() {
        let mut diagnostics = Diagnostics::new();
        let src = "var a = 1; { var a = 2; print \"x\" + 1; }";
        let tokens = Scanner::new(src).scan_tokens(&mut diagnostics);
        let statements = Parser::new(tokens).parse(&mut diagnostics);
        let mut interpreter = Interpreter::new();
        interpreter.interpret(&statements, &mut diagnostics);
        assert!(diagnostics.had_runtime_error());
        // The outer environment must be exactly as it was before the block ran.
        assert_eq!(
            interpreter
                .environment
                .borrow()
                .get(&crate::token::Token::new(
                    TokenKind::Identifier,
                    "a",
                    Value::Nil,
                    1
                ))
                .unwrap(),
            Value::Number(1.0)
        );
    }
}
