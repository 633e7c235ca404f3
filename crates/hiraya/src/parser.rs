use std::fmt;
use std::iter::Peekable;
use std::vec::IntoIter;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::tokenizer::{Token, TokenKind};

/// Longest `+`/`-` chain accepted in one expression. Expression trees are
/// left-deep, so this also bounds their depth.
pub const MAX_EXPRESSION_TERMS: usize = 1024;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Statement {
    VariableDeclaration {
        name: String,
        declared_type: DataType,
        value: Expression,
    },
    Print {
        value: Expression,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Expression {
    Number(f64),
    String(String),
    Variable(String),
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
}

impl BinaryOperator {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(BinaryOperator::Add),
            "-" => Some(BinaryOperator::Subtract),
            _ => None,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Add => f.write_str("+"),
            BinaryOperator::Subtract => f.write_str("-"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DataType {
    Teksto,
    Bilang,
}

impl DataType {
    fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "teksto" => Some(DataType::Teksto),
            "bilang" => Some(DataType::Bilang),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Teksto => f.write_str("teksto"),
            DataType::Bilang => f.write_str("bilang"),
        }
    }
}

/// The offending token's text, or "end of input" once the tokens run out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Found(pub Option<String>);

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(text) => f.write_str(text),
            None => f.write_str("end of input"),
        }
    }
}

impl From<Option<&Token>> for Found {
    fn from(token: Option<&Token>) -> Self {
        Found(token.map(|t| t.text.clone()))
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token: {0}")]
    UnexpectedToken(Found),
    #[error("expected variable name, found: {0}")]
    ExpectedVariableName(Found),
    #[error("expected '->', found: {0}")]
    ExpectedArrow(Found),
    #[error("expected valid data type (teksto or bilang), found: {0}")]
    ExpectedDataType(Found),
    #[error("expected '=', found: {0}")]
    ExpectedEquals(Found),
    #[error("expression has more than {} terms", MAX_EXPRESSION_TERMS)]
    ExpressionTooLong,
    /// Only reachable with hand-built tokens; the tokenizer emits digit runs.
    #[error("invalid number literal: {0}")]
    InvalidNumber(String),
}

#[tracing::instrument(level = "trace", skip_all)]
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Statement>, ParseError> {
    let mut parser = Parser {
        tokens: tokens.into_iter().peekable(),
    };

    let mut statements = vec![];
    while parser.tokens.peek().is_some() {
        statements.push(parser.parse_statement()?);
    }

    debug!(count = statements.len(), "Parsed statements");
    Ok(statements)
}

struct Parser {
    tokens: Peekable<IntoIter<Token>>,
}

impl Parser {
    fn peek(&mut self) -> Option<&Token> {
        self.tokens.peek()
    }

    fn found(&mut self) -> Found {
        Found::from(self.peek())
    }

    /// Consumes the next token if `predicate` accepts it.
    fn next_if(&mut self, predicate: impl FnOnce(&Token) -> bool) -> Option<Token> {
        self.tokens.next_if(predicate)
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        trace!(next = ?self.peek(), "Parsing statement");

        let statement = if self.next_if(|t| t.is_keyword("bagay")).is_some() {
            self.parse_declaration()?
        } else if self.next_if(|t| t.is_keyword("ipakita")).is_some() {
            Statement::Print {
                value: self.parse_expression()?,
            }
        } else {
            return Err(ParseError::UnexpectedToken(self.found()));
        };

        if self.next_if(|t| t.is_operator(";")).is_none() {
            warn!("Semicolon not found at the end of the statement");
        }

        Ok(statement)
    }

    fn parse_declaration(&mut self) -> Result<Statement, ParseError> {
        let name = match self.next_if(|t| t.kind == TokenKind::Identifier) {
            Some(token) => token.text,
            None => return Err(ParseError::ExpectedVariableName(self.found())),
        };

        if self.next_if(|t| t.is_operator("->")).is_none() {
            return Err(ParseError::ExpectedArrow(self.found()));
        }

        let declared_type = match self.peek() {
            Some(token) if token.kind == TokenKind::Keyword => DataType::from_keyword(&token.text),
            _ => None,
        };
        let Some(declared_type) = declared_type else {
            return Err(ParseError::ExpectedDataType(self.found()));
        };
        self.tokens.next();

        if self.next_if(|t| t.is_operator("=")).is_none() {
            return Err(ParseError::ExpectedEquals(self.found()));
        }

        let value = self.parse_expression()?;
        Ok(Statement::VariableDeclaration {
            name,
            declared_type,
            value,
        })
    }

    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_primary()?;
        let mut terms = 1;

        loop {
            let operator = match self.peek() {
                Some(token) if token.kind == TokenKind::Operator => {
                    BinaryOperator::from_symbol(&token.text)
                }
                _ => None,
            };
            let Some(operator) = operator else {
                break;
            };
            self.tokens.next();

            terms += 1;
            if terms > MAX_EXPRESSION_TERMS {
                return Err(ParseError::ExpressionTooLong);
            }
            let right = self.parse_primary()?;
            left = Expression::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let Some(token) = self.peek() else {
            return Err(ParseError::UnexpectedToken(Found(None)));
        };

        let expression = match token.kind {
            TokenKind::Number => match token.text.parse::<f64>() {
                Ok(value) => Expression::Number(value),
                Err(_) => return Err(ParseError::InvalidNumber(token.text.clone())),
            },
            TokenKind::String => Expression::String(token.text.clone()),
            TokenKind::Identifier => Expression::Variable(token.text.clone()),
            TokenKind::Keyword | TokenKind::Operator | TokenKind::Unknown => {
                return Err(ParseError::UnexpectedToken(Found(Some(token.text.clone()))));
            }
        };
        self.tokens.next();

        Ok(expression)
    }
}
