//==============================================
// File: tests/util.rs
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Shared runtime helpers for Glint integration tests
// Objective: Run source text with captured stdout and scripted stdin
//==============================================

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::rc::Rc;

use glint::ast::Node;
use glint::interpreter::Interpreter;
use glint::{GlintError, run_source};

//==============================================
// Section 1.0 - Captured Output
//==============================================

#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

//==============================================
// Section 2.0 - Runners
//==============================================

pub struct Run {
    pub results: Result<Vec<Node>, GlintError>,
    pub output: String,
}

pub fn run_with_input(source: &str, stdin: &str) -> Run {
    let buffer = SharedBuffer::default();
    let mut interpreter = Interpreter::new()
        .with_output(buffer.clone())
        .with_input(Cursor::new(stdin.as_bytes().to_vec()))
        .with_seed(7);
    let results = run_source(&mut interpreter, source);
    Run {
        results,
        output: buffer.contents(),
    }
}

pub fn run(source: &str) -> Run {
    run_with_input(source, "")
}

/// Results of a program that must succeed.
pub fn eval_ok(source: &str) -> Vec<Node> {
    run(source)
        .results
        .unwrap_or_else(|err| panic!("evaluation failed: {err}\nsource:\n{source}"))
}

/// Rendering of the last top-level result.
pub fn eval_last(source: &str) -> String {
    eval_ok(source)
        .last()
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Rendered error of a program that must fail.
pub fn eval_err(source: &str) -> String {
    match run(source).results {
        Ok(values) => panic!("expected failure, got {values:?}\nsource:\n{source}"),
        Err(err) => err.to_string(),
    }
}

/// Captured stdout of a program that must succeed.
pub fn run_glint_source(source: &str) -> String {
    let run = run(source);
    if let Err(err) = run.results {
        panic!("evaluation failed: {err}\nsource:\n{source}");
    }
    run.output
}

//==============================================
// End of file
//==============================================
