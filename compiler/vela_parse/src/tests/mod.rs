//! Parser test suite.
//!
//! Tests lex real source through `vela_lexer` and assert structural tree
//! shapes, in dependency order: terms, types, patterns, definitions and
//! templates, then entry-point and invariant checks.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

mod defns;
mod entries;
mod terms;
mod types;

use vela_ir::ast::{Pat, Source, Stat, Term, Type};
use vela_ir::{Dialect, Input, Name, StringInterner};

use crate::{ParseError, Parser};

/// Everything a test needs from one parse.
#[derive(Debug)]
pub(crate) struct Parsed<T> {
    pub tree: T,
    pub interner: StringInterner,
    pub warnings: Vec<vela_diagnostic::Diagnostic>,
}

fn run<T>(
    source: &str,
    dialect: &Dialect,
    parse: impl FnOnce(&mut Parser<'_>) -> Result<T, ParseError>,
) -> Result<Parsed<T>, ParseError> {
    let interner = StringInterner::new();
    let input = Input::new(source);
    let tokens = vela_lexer::lex(source, dialect, &interner);
    let mut parser = Parser::new(&input, &tokens, dialect, &interner);
    let tree = parse(&mut parser)?;
    let warnings = parser.take_warnings();
    drop(parser);
    Ok(Parsed {
        tree,
        interner,
        warnings,
    })
}

pub(crate) fn term(source: &str) -> Parsed<Term> {
    term_with(source, &Dialect::modern())
}

pub(crate) fn term_with(source: &str, dialect: &Dialect) -> Parsed<Term> {
    run(source, dialect, |p| p.parse_term()).expect("term should parse")
}

pub(crate) fn term_err(source: &str) -> ParseError {
    term_err_with(source, &Dialect::modern())
}

pub(crate) fn term_err_with(source: &str, dialect: &Dialect) -> ParseError {
    run(source, dialect, |p| p.parse_term()).expect_err("term should not parse")
}

pub(crate) fn typ(source: &str) -> Parsed<Type> {
    typ_with(source, &Dialect::modern())
}

pub(crate) fn typ_with(source: &str, dialect: &Dialect) -> Parsed<Type> {
    run(source, dialect, |p| p.parse_type()).expect("type should parse")
}

pub(crate) fn typ_err(source: &str) -> ParseError {
    run(source, &Dialect::modern(), |p| p.parse_type()).expect_err("type should not parse")
}

pub(crate) fn run_type_err_classic(source: &str) -> ParseError {
    run(source, &Dialect::classic(), |p| p.parse_type()).expect_err("type should not parse")
}

pub(crate) fn pat(source: &str) -> Parsed<Pat> {
    pat_with(source, &Dialect::modern())
}

pub(crate) fn pat_with(source: &str, dialect: &Dialect) -> Parsed<Pat> {
    run(source, dialect, |p| p.parse_pat()).expect("pattern should parse")
}

pub(crate) fn pat_err(source: &str) -> ParseError {
    run(source, &Dialect::modern(), |p| p.parse_pat()).expect_err("pattern should not parse")
}

pub(crate) fn source(text: &str) -> Parsed<Source> {
    source_with(text, &Dialect::modern())
}

pub(crate) fn source_with(text: &str, dialect: &Dialect) -> Parsed<Source> {
    run(text, dialect, |p| p.parse_source()).expect("source should parse")
}

pub(crate) fn source_err_with(text: &str, dialect: &Dialect) -> ParseError {
    run(text, dialect, |p| p.parse_source()).expect_err("source should not parse")
}

pub(crate) fn stat(text: &str) -> Parsed<Stat> {
    run(text, &Dialect::modern(), |p| p.parse_stat()).expect("stat should parse")
}

impl<T> Parsed<T> {
    /// Resolve an interned name.
    pub(crate) fn text(&self, name: Name) -> String {
        self.interner.lookup(name)
    }
}
