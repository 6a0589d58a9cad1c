use crate::lexer::{keyword, numeric_literal, punct, string_literal, Cursor};
use crate::parser::{
    combinators::{attempt, first_of, optional, with_trailing_closures},
    Parse, ParseResult,
};

use super::Expression;

/// A literal expression. Numeric literals keep their exact textual form so
/// that radix, digit separators and a leading `-` survive into the tree.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Literal {
    Numeric(String),
    String(StringLiteral),
    Boolean(bool),
    Nil,
    Array(Vec<Expression>),
    Dictionary(Vec<DictionaryEntry>),
    File,
    Line,
    Column,
    Function,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StringLiteral {
    Static(String),
    Interpolated(Vec<InterpolationItem>),
}

/// One piece of an interpolated string, in source order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum InterpolationItem {
    Text(String),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DictionaryEntry {
    pub key: Expression,
    pub value: Expression,
}

impl Parse for Literal {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        first_of(
            cursor,
            "literal",
            &[
                |cursor| numeric_literal(cursor).map(Literal::Numeric),
                |cursor| string_literal(cursor).map(Literal::String),
                |cursor| keyword(cursor, "true").map(|_| Literal::Boolean(true)),
                |cursor| keyword(cursor, "false").map(|_| Literal::Boolean(false)),
                |cursor| keyword(cursor, "nil").map(|_| Literal::Nil),
                |cursor| keyword(cursor, "__FILE__").map(|_| Literal::File),
                |cursor| keyword(cursor, "__LINE__").map(|_| Literal::Line),
                |cursor| keyword(cursor, "__COLUMN__").map(|_| Literal::Column),
                |cursor| keyword(cursor, "__FUNCTION__").map(|_| Literal::Function),
                collection_literal,
            ],
        )
    }
}

/// `[a, b]`, `[k: v]`, `[]` and `[:]`. Both collection literals start with
/// `[`; the first `:` decides which one it is.
fn collection_literal(cursor: &mut Cursor) -> ParseResult<Literal> {
    punct(cursor, "[")?;
    with_trailing_closures(cursor, collection_literal_body)
}

fn collection_literal_body(cursor: &mut Cursor) -> ParseResult<Literal> {
    if punct(cursor, "]").is_ok() {
        return Ok(Literal::Array(vec![]));
    }
    if attempt(cursor, |cursor| {
        punct(cursor, ":")?;
        punct(cursor, "]")
    })
    .is_ok()
    {
        return Ok(Literal::Dictionary(vec![]));
    }

    let first = Expression::parse(cursor)?;

    if punct(cursor, ":").is_ok() {
        let value = Expression::parse(cursor)?;
        let mut entries = vec![DictionaryEntry { key: first, value }];
        while let Ok(entry) = attempt(cursor, |cursor| {
            punct(cursor, ",")?;
            let key = Expression::parse(cursor)?;
            punct(cursor, ":")?;
            let value = Expression::parse(cursor)?;
            Ok(DictionaryEntry { key, value })
        }) {
            entries.push(entry);
        }
        optional(cursor, |cursor| punct(cursor, ","));
        punct(cursor, "]")?;
        return Ok(Literal::Dictionary(entries));
    }

    let mut elements = vec![first];
    while let Ok(element) = attempt(cursor, |cursor| {
        punct(cursor, ",")?;
        Expression::parse(cursor)
    }) {
        elements.push(element);
    }
    optional(cursor, |cursor| punct(cursor, ","));
    punct(cursor, "]")?;
    Ok(Literal::Array(elements))
}
