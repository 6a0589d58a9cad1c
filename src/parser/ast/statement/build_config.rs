//! Compiler-control statements: `#if`/`#elseif`/`#else`/`#endif` over a
//! small boolean condition language, and `#line` controls.

use crate::lexer::{
    decimal_digits, identifier, keyword, operator, peek_word, punct, static_string_literal, Cursor,
};
use crate::parser::{
    combinators::{chain_left1, look_ahead, many, optional},
    Parse, ParseError, ParseResult,
};

use super::{statement_list, Statement};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BuildConfigurationStatement {
    pub condition: BuildConfiguration,
    pub body: Vec<Statement>,
    pub else_if_clauses: Vec<BuildConfigurationElseIf>,
    pub else_body: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BuildConfigurationElseIf {
    pub condition: BuildConfiguration,
    pub body: Vec<Statement>,
}

/// The condition language of `#if`: identifiers, booleans, `os(...)`,
/// `arch(...)`, `!`, `&&` and `||`, with `&&` binding tighter.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BuildConfiguration {
    Identifier(String),
    Boolean(bool),
    Os(String),
    Arch(String),
    Not(Box<BuildConfiguration>),
    And(Box<BuildConfiguration>, Box<BuildConfiguration>),
    Or(Box<BuildConfiguration>, Box<BuildConfiguration>),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LineControl {
    /// A bare `#line`, resetting the numbering.
    Bare,
    Line { line: u64, file: String },
}

impl Parse for BuildConfigurationStatement {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        keyword(cursor, "#if")?;
        let condition = BuildConfiguration::parse(cursor)?;
        let body = branch_body(cursor)?;

        let else_if_clauses = many(cursor, |cursor| {
            keyword(cursor, "#elseif")?;
            let condition = BuildConfiguration::parse(cursor)?;
            let body = branch_body(cursor)?;
            Ok(BuildConfigurationElseIf { condition, body })
        });

        let else_body = optional(cursor, |cursor| {
            keyword(cursor, "#else")?;
            branch_body(cursor)
        });

        keyword(cursor, "#endif")?;

        Ok(BuildConfigurationStatement {
            condition,
            body,
            else_if_clauses,
            else_body,
        })
    }
}

/// Statements up to the next compiler-control delimiter.
fn branch_body(cursor: &mut Cursor) -> ParseResult<Vec<Statement>> {
    statement_list(cursor, |cursor| {
        look_ahead(cursor, |cursor| keyword(cursor, "#elseif")).is_ok()
            || look_ahead(cursor, |cursor| keyword(cursor, "#else")).is_ok()
            || look_ahead(cursor, |cursor| keyword(cursor, "#endif")).is_ok()
    })
}

impl Parse for BuildConfiguration {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        or_configuration(cursor)
    }
}

fn or_configuration(cursor: &mut Cursor) -> ParseResult<BuildConfiguration> {
    chain_left1(cursor, and_configuration, |cursor| {
        exact_operator(cursor, "||")?;
        Ok(|left: BuildConfiguration, right: BuildConfiguration| {
            BuildConfiguration::Or(Box::new(left), Box::new(right))
        })
    })
}

fn and_configuration(cursor: &mut Cursor) -> ParseResult<BuildConfiguration> {
    chain_left1(cursor, unary_configuration, |cursor| {
        exact_operator(cursor, "&&")?;
        Ok(|left: BuildConfiguration, right: BuildConfiguration| {
            BuildConfiguration::And(Box::new(left), Box::new(right))
        })
    })
}

fn exact_operator(cursor: &mut Cursor, symbol: &str) -> ParseResult<()> {
    let checkpoint = cursor.save();
    if operator(cursor)? != symbol {
        cursor.restore(checkpoint);
        return Err(ParseError::expected(&format!("'{symbol}'"), cursor));
    }
    Ok(())
}

fn unary_configuration(cursor: &mut Cursor) -> ParseResult<BuildConfiguration> {
    if exact_operator(cursor, "!").is_ok() {
        let inner = unary_configuration(cursor)?;
        return Ok(BuildConfiguration::Not(Box::new(inner)));
    }

    if punct(cursor, "(").is_ok() {
        let inner = or_configuration(cursor)?;
        punct(cursor, ")")?;
        return Ok(inner);
    }

    match peek_word(cursor).as_deref() {
        Some("true") => {
            keyword(cursor, "true")?;
            Ok(BuildConfiguration::Boolean(true))
        }
        Some("false") => {
            keyword(cursor, "false")?;
            Ok(BuildConfiguration::Boolean(false))
        }
        _ => {
            let name = identifier(cursor)?;
            if name == "os" && punct(cursor, "(").is_ok() {
                let platform = identifier(cursor)?;
                punct(cursor, ")")?;
                Ok(BuildConfiguration::Os(platform))
            } else if name == "arch" && punct(cursor, "(").is_ok() {
                let architecture = identifier(cursor)?;
                punct(cursor, ")")?;
                Ok(BuildConfiguration::Arch(architecture))
            } else {
                Ok(BuildConfiguration::Identifier(name))
            }
        }
    }
}

impl Parse for LineControl {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        keyword(cursor, "#line")?;

        let Some(digits) = optional(cursor, decimal_digits) else {
            return Ok(LineControl::Bare);
        };

        let line: u64 = digits.parse().map_err(|_| ParseError {
            message: format!("line number '{digits}' out of range"),
            position: Some(cursor.position()),
        })?;
        if line == 0 {
            return Err(ParseError {
                message: "line number must be greater than zero".to_string(),
                position: Some(cursor.position()),
            });
        }

        let file = static_string_literal(cursor)?;
        Ok(LineControl::Line { line, file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_build_config(input: &str) -> ParseResult<BuildConfigurationStatement> {
        crate::parser::run(input, BuildConfigurationStatement::parse)
    }

    #[test]
    fn test_parse_if_else_endif() {
        let statement =
            parse_build_config("#if os(OSX) && !DEBUG\nlet x = 1\n#else\nlet x = 2\n#endif")
                .unwrap();

        assert_eq!(
            statement.condition,
            BuildConfiguration::And(
                Box::new(BuildConfiguration::Os("OSX".to_string())),
                Box::new(BuildConfiguration::Not(Box::new(
                    BuildConfiguration::Identifier("DEBUG".to_string())
                ))),
            )
        );
        assert_eq!(statement.body.len(), 1);
        assert!(statement.else_if_clauses.is_empty());
        assert_eq!(statement.else_body.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let statement = parse_build_config("#if a || b && c\n#endif").unwrap();

        let BuildConfiguration::Or(left, right) = statement.condition else {
            panic!("expected an or at the top");
        };
        assert_eq!(*left, BuildConfiguration::Identifier("a".to_string()));
        assert!(matches!(*right, BuildConfiguration::And(_, _)));
    }

    #[test]
    fn test_elseif_chain() {
        let statement =
            parse_build_config("#if a\n#elseif b\nf()\n#elseif c\n#else\n#endif").unwrap();
        assert_eq!(statement.else_if_clauses.len(), 2);
        assert_eq!(statement.else_if_clauses[0].body.len(), 1);
        assert!(statement.else_body.is_some());
    }

    #[test]
    fn test_parse_line_control() {
        assert_eq!(
            crate::parser::run("#line", LineControl::parse).unwrap(),
            LineControl::Bare
        );
        assert_eq!(
            crate::parser::run("#line 3 \"main.swift\"", LineControl::parse).unwrap(),
            LineControl::Line { line: 3, file: "main.swift".to_string() }
        );
    }

    #[test]
    fn test_line_control_rejects_zero() {
        assert!(crate::parser::run("#line 0 \"main.swift\"", LineControl::parse).is_err());
    }
}
