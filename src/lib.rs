//! A parser for the Swift 2.1 source language.
//!
//! The crate turns UTF-8 text into a typed AST following Swift's published
//! grammar summary: a character [`lexer`] with backtracking checkpoints
//! underneath a recursive-descent [`parser`] built from a small combinator
//! set. Parsing is a pure function of the input; no precedence resolution
//! or semantic analysis happens here.
//!
//! ```
//! let module = rapids::parse_module("let x: Int = 1").unwrap();
//! assert_eq!(module.statements.len(), 1);
//! ```

pub mod lexer;
pub mod parser;

use log::debug;

pub use parser::{ast, ParseError, ParseResult};

use parser::ast::{
    Declaration, Expression, FunctionCall, Module, PostfixExpression, PrimaryExpression,
    SelfExpression, SuperclassExpression,
};
use parser::Parse;

/// Parse a whole source file. Trailing non-whitespace is an error.
pub fn parse_module(input: &str) -> ParseResult<Module> {
    debug!("parsing module ({} bytes)", input.len());
    parser::run(input, Module::parse)
}

/// Parse a single expression spanning the whole input.
pub fn parse_expression(input: &str) -> ParseResult<Expression> {
    parser::run(input, Expression::parse)
}

/// Parse a single declaration spanning the whole input.
pub fn parse_declaration(input: &str) -> ParseResult<Declaration> {
    parser::run(input, Declaration::parse)
}

/// Parse a postfix chain that culminates in a function call.
pub fn parse_function_call(input: &str) -> ParseResult<FunctionCall> {
    parser::run(input, |cursor| {
        match PostfixExpression::parse(cursor)? {
            PostfixExpression::FunctionCall(call) => Ok(call),
            _ => Err(ParseError::expected("function call", cursor)),
        }
    })
}

/// Parse a postfix chain that culminates in `.init`.
pub fn parse_initializer_expression(input: &str) -> ParseResult<PostfixExpression> {
    parser::run(input, |cursor| {
        let expression = PostfixExpression::parse(cursor)?;
        match expression {
            PostfixExpression::Initializer(_)
            | PostfixExpression::Primary(PrimaryExpression::SelfExpression(
                SelfExpression::Initializer,
            ))
            | PostfixExpression::Primary(PrimaryExpression::Superclass(
                SuperclassExpression::Initializer,
            )) => Ok(expression),
            _ => Err(ParseError::expected("initializer expression", cursor)),
        }
    })
}
