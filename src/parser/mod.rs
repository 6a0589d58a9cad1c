//! Recursive-descent parser over the lexical scanners.
//!
//! Each AST node implements [`Parse`]; productions compose through the small
//! combinator set in [`combinators`]. Failure is a value: a [`ParseError`]
//! carrying the furthest relevant position and a short expectation phrase.

use std::{error::Error, fmt::Display};

use colored::Colorize;

pub mod ast;
pub mod combinators;

use crate::lexer::{skip_trivia, Cursor, Position};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParseError {
    pub message: String,
    pub position: Option<Position>,
}

pub type ParseResult<T> = Result<T, ParseError>;

impl ParseError {
    pub fn expected(what: &str, cursor: &Cursor) -> ParseError {
        let mut error = if cursor.is_at_end() {
            ParseError::eof(what)
        } else {
            ParseError {
                message: format!("expected {what}"),
                position: None,
            }
        };
        error.position = Some(cursor.position());
        error
    }

    pub fn eof(item: &str) -> ParseError {
        ParseError {
            message: format!("hit end of input while parsing {item}"),
            position: None,
        }
    }

    /// Of two failures, keep the one that got further into the input.
    pub fn further(self, other: ParseError) -> ParseError {
        let own = self.position.map(|p| p.offset);
        let theirs = other.position.map(|p| p.offset);
        if theirs > own {
            other
        } else {
            self
        }
    }

    /// Render the error with a source excerpt and a caret run underneath the
    /// offending position.
    pub fn render(&self, source: &str) -> String {
        let Some(Position { line, col, .. }) = self.position else {
            return self.to_string();
        };

        let lines = source.lines().collect::<Vec<_>>();
        let line_str = lines.get(line - 1).copied().unwrap_or("");
        let prev_line = if line > 1 { lines[line - 2] } else { "" };

        let margin = format!("{line}").len();
        let margin_fill = " ".repeat(margin);
        let padding_fill = " ".repeat(col.saturating_sub(1));
        let caret = "^".red();

        format!(
            "{self}\n{margin_fill} |{prev_line}\n{line} |{line_str}\n{margin_fill} |{padding_fill}{caret}"
        )
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(Position { line, col, .. }) => {
                write!(f, "<stdin>:{line}:{col}: {}", self.message)
            }
            None => write!(f, "<stdin>: {}", self.message),
        }
    }
}

impl Error for ParseError {}

/// Trait for parsing an AST node from the cursor.
pub trait Parse: Sized {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self>;
}

/// Run `parser` against the whole input: leading and trailing trivia are
/// skipped, and anything left over afterwards is a trailing-input error.
pub fn run<T>(input: &str, parser: impl FnOnce(&mut Cursor) -> ParseResult<T>) -> ParseResult<T> {
    let mut cursor = Cursor::new(input);
    let value = parser(&mut cursor)?;

    skip_trivia(&mut cursor)?;
    if !cursor.is_at_end() {
        return Err(ParseError::expected("end of input", &cursor));
    }

    Ok(value)
}
