//! Tree-walking evaluation of parsed statements.

use std::collections::HashMap;
use std::io::{self, Write};

use tracing::{debug, trace};

use crate::parser::{BinaryOperator, Expression, Statement};
use crate::value::Value;

pub type Bindings = HashMap<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),
    #[error("cannot apply '{operator}' to {left} and {right}")]
    TypeMismatch {
        operator: BinaryOperator,
        left: &'static str,
        right: &'static str,
    },
    #[error("failed to write output")]
    Io(#[from] io::Error),
}

/// Runs statements against one binding table, writing printed values to `out`.
#[derive(Debug)]
pub struct Interpreter<W> {
    bindings: Bindings,
    out: W,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Self {
            bindings: Bindings::new(),
            out,
        }
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn into_output(self) -> W {
        self.out
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn interpret(&mut self, statements: &[Statement]) -> Result<(), RuntimeError> {
        for statement in statements {
            self.execute(statement)?;
        }
        self.out.flush()?;
        debug!(bindings = self.bindings.len(), "Interpreted program");
        Ok(())
    }

    fn execute(&mut self, statement: &Statement) -> Result<(), RuntimeError> {
        trace!(?statement, "Executing statement");

        match statement {
            Statement::VariableDeclaration { name, value, .. } => {
                let value = self.evaluate(value)?;
                self.bindings.insert(name.clone(), value);
            }
            Statement::Print { value } => {
                let value = self.evaluate(value)?;
                writeln!(self.out, "{value}")?;
            }
        }
        Ok(())
    }

    /// Evaluates left to right. The left spine of a chain is walked in a loop
    /// so stack use does not grow with the number of terms.
    pub fn evaluate(&self, expression: &Expression) -> Result<Value, RuntimeError> {
        let mut pending = vec![];
        let mut leftmost = expression;
        while let Expression::Binary {
            operator,
            left,
            right,
        } = leftmost
        {
            pending.push((*operator, &**right));
            leftmost = &**left;
        }

        let mut value = self.evaluate_operand(leftmost)?;
        for (operator, right) in pending.into_iter().rev() {
            let right = self.evaluate_operand(right)?;
            value = apply_binary(operator, value, right)?;
        }
        Ok(value)
    }

    fn evaluate_operand(&self, expression: &Expression) -> Result<Value, RuntimeError> {
        match expression {
            Expression::Number(n) => Ok(Value::Number(*n)),
            Expression::String(s) => Ok(Value::Text(s.clone())),
            Expression::Variable(name) => self
                .bindings
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone())),
            Expression::Binary { .. } => self.evaluate(expression),
        }
    }
}

fn apply_binary(operator: BinaryOperator, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (operator, left, right) {
        (BinaryOperator::Add, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (BinaryOperator::Add, Value::Text(mut a), Value::Text(b)) => {
            a.push_str(&b);
            Ok(Value::Text(a))
        }
        (BinaryOperator::Subtract, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
        (operator, left, right) => Err(RuntimeError::TypeMismatch {
            operator,
            left: left.type_name(),
            right: right.type_name(),
        }),
    }
}
