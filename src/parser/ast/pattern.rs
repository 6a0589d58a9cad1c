//! The pattern grammar used by bindings, `for`-`in`, `switch` cases, catch
//! clauses and condition clauses.

use crate::lexer::{identifier, is_operator_char, keyword, punct, Cursor};
use crate::parser::{
    combinators::{attempt, first_of, optional, sep_by},
    Parse, ParseError, ParseResult,
};

use super::expression::Expression;
use super::type_name::{TypeAnnotation, TypeIdentifier, TypeIdentifierComponent, TypeName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BindingKind {
    Let,
    Var,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Pattern {
    Wildcard {
        type_annotation: Option<TypeAnnotation>,
    },
    Identifier {
        name: String,
        type_annotation: Option<TypeAnnotation>,
    },
    /// `name?`, sugar for matching a present optional.
    Optional {
        name: String,
    },
    Tuple {
        patterns: Vec<Pattern>,
        type_annotation: Option<TypeAnnotation>,
    },
    ValueBinding {
        kind: BindingKind,
        pattern: Box<Pattern>,
    },
    Is(TypeName),
    As {
        pattern: Box<Pattern>,
        type_name: TypeName,
    },
    /// `.name`, `Enum.name` or `.name(payload patterns)`.
    EnumCase {
        type_identifier: Option<TypeIdentifier>,
        name: String,
        tuple: Option<Vec<Pattern>>,
    },
    /// Fallback: any expression, covering literal and comparison cases.
    Expression(Box<Expression>),
}

impl Parse for Pattern {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let mut pattern = base_pattern(cursor)?;

        // `as` casts are suffixes on an already parsed pattern.
        while let Ok(type_name) = attempt(cursor, |cursor| {
            keyword(cursor, "as")?;
            TypeName::parse(cursor)
        }) {
            pattern = Pattern::As {
                pattern: Box::new(pattern),
                type_name,
            };
        }

        Ok(pattern)
    }
}

fn base_pattern(cursor: &mut Cursor) -> ParseResult<Pattern> {
    first_of(
        cursor,
        "pattern",
        &[
            wildcard_pattern,
            value_binding_pattern,
            is_pattern,
            optional_pattern,
            enum_case_pattern,
            identifier_pattern,
            tuple_pattern,
            |cursor| {
                Expression::parse(cursor).map(|expression| Pattern::Expression(Box::new(expression)))
            },
        ],
    )
}

fn wildcard_pattern(cursor: &mut Cursor) -> ParseResult<Pattern> {
    keyword(cursor, "_")?;
    let type_annotation = optional(cursor, TypeAnnotation::parse);
    Ok(Pattern::Wildcard { type_annotation })
}

fn value_binding_pattern(cursor: &mut Cursor) -> ParseResult<Pattern> {
    let kind = if keyword(cursor, "let").is_ok() {
        BindingKind::Let
    } else {
        keyword(cursor, "var")?;
        BindingKind::Var
    };

    let pattern = Pattern::parse(cursor)?;
    Ok(Pattern::ValueBinding {
        kind,
        pattern: Box::new(pattern),
    })
}

fn is_pattern(cursor: &mut Cursor) -> ParseResult<Pattern> {
    keyword(cursor, "is")?;
    TypeName::parse(cursor).map(Pattern::Is)
}

/// `name?`, where the `?` must be a lone token, not the head of `??`.
fn optional_pattern(cursor: &mut Cursor) -> ParseResult<Pattern> {
    let name = identifier(cursor)?;
    punct(cursor, "?")?;
    if cursor.peek().is_some_and(is_operator_char) {
        return Err(ParseError::expected("optional pattern", cursor));
    }
    Ok(Pattern::Optional { name })
}

/// `.name`, `Enum.name`, either with an optional payload tuple of nested
/// patterns. The qualified form requires at least one dot; a bare
/// identifier stays an identifier pattern.
fn enum_case_pattern(cursor: &mut Cursor) -> ParseResult<Pattern> {
    let (type_identifier, name) = if punct(cursor, ".").is_ok() {
        (None, identifier(cursor)?)
    } else {
        let mut names = vec![identifier(cursor)?];
        punct(cursor, ".")?;
        names.push(identifier(cursor)?);
        while let Ok(next) = attempt(cursor, |cursor| {
            punct(cursor, ".")?;
            identifier(cursor)
        }) {
            names.push(next);
        }

        let name = names.pop().unwrap_or_default();
        let components = names
            .into_iter()
            .map(|name| TypeIdentifierComponent { name, generic_arguments: None })
            .collect();
        (Some(TypeIdentifier { components }), name)
    };

    let tuple = optional(cursor, |cursor| {
        punct(cursor, "(")?;
        let patterns = sep_by(cursor, Pattern::parse, ",");
        punct(cursor, ")")?;
        Ok(patterns)
    });

    Ok(Pattern::EnumCase { type_identifier, name, tuple })
}

fn identifier_pattern(cursor: &mut Cursor) -> ParseResult<Pattern> {
    let name = identifier(cursor)?;
    let type_annotation = optional(cursor, TypeAnnotation::parse);
    Ok(Pattern::Identifier { name, type_annotation })
}

fn tuple_pattern(cursor: &mut Cursor) -> ParseResult<Pattern> {
    punct(cursor, "(")?;
    let patterns = sep_by(cursor, Pattern::parse, ",");
    punct(cursor, ")")?;
    let type_annotation = optional(cursor, TypeAnnotation::parse);
    Ok(Pattern::Tuple { patterns, type_annotation })
}
