//=====================================================
// File: lib.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Glint library root
// Objective: Expose the node model, tokenizer, parser, builtin registry and
//            evaluator, plus a one-call helper for running source text
//=====================================================

pub mod ast;
pub mod builtins;
pub mod config;
pub mod interpreter;
pub mod parser;
pub mod tokenizer;

use thiserror::Error;

use crate::ast::Node;
use crate::interpreter::{Interpreter, RuntimeError};
use crate::parser::{ParseError, Parser};
use crate::tokenizer::{TokenizeError, Tokenizer};

/// Any failure between source text and evaluated results.
#[derive(Debug, Error)]
pub enum GlintError {
    #[error("{0}")]
    Tokenize(#[from] TokenizeError),
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Runtime(#[from] RuntimeError),
}

pub fn parse_source(source: &str) -> Result<Vec<Node>, GlintError> {
    let tokens = Tokenizer::new(source).tokenize()?;
    Ok(Parser::new(tokens).parse()?)
}

//Function: run_source
//Purpose: Tokenize, parse and evaluate source with the given interpreter
//Inputs: interpreter, source text
//Returns: One value per top-level statement
pub fn run_source(interpreter: &mut Interpreter, source: &str) -> Result<Vec<Node>, GlintError> {
    let program = parse_source(source)?;
    Ok(interpreter.evaluate(&program)?)
}
