//! Hiraya: a tokenizer, recursive-descent parser and tree-walking interpreter
//! for a small declaration-and-print scripting language.
//!
//! ```text
//! bagay pangalan -> teksto = "Hello, " + "World";
//! ipakita pangalan;
//! ```

pub mod interpreter;
pub mod parser;
pub mod tokenizer;
pub mod value;

use std::io::Write;
use std::path::Path;

use tracing::trace;

pub use interpreter::{Bindings, Interpreter, RuntimeError};
pub use parser::{ParseError, Statement};
pub use tokenizer::Token;
pub use value::Value;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read source {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// A parsed program together with the tokens it was parsed from.
#[derive(Clone, Debug)]
pub struct Program {
    pub tokens: Vec<Token>,
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn parse(source: &str) -> Result<Self, Error> {
        let tokens = tokenizer::tokenize(source);
        let statements = parser::parse(tokens.clone())?;
        Ok(Self { tokens, statements })
    }

    /// Runs the program in a fresh interpreter writing printed values to `out`.
    pub fn run<W: Write>(&self, out: W) -> Result<Interpreter<W>, Error> {
        let mut interpreter = Interpreter::new(out);
        interpreter.interpret(&self.statements)?;
        Ok(interpreter)
    }
}

pub fn read_source(source_path: &Path) -> Result<String, Error> {
    let source = std::fs::read_to_string(source_path).map_err(|source| Error::Read {
        path: source_path.display().to_string(),
        source,
    })?;
    trace!(source_len = source.len(), path = %source_path.display(), "Read input file");
    Ok(source)
}

/// Tokenizes, parses and runs `source`, writing printed values to `out`.
/// Returns the interpreter so callers can inspect its final bindings.
pub fn run_source<W: Write>(source: &str, out: W) -> Result<Interpreter<W>, Error> {
    Program::parse(source)?.run(out)
}

pub fn run_file<W: Write>(source_path: &Path, out: W) -> Result<Interpreter<W>, Error> {
    run_source(&read_source(source_path)?, out)
}
