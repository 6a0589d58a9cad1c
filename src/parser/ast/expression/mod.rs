//! Expressions, layered exactly as the grammar stacks them: an optional try
//! operator, a prefix expression, and a flat, source-ordered list of binary
//! tails. Operator precedence is intentionally not resolved here; Swift
//! applies its precedence table in a later pass.

mod closure;
mod literal;
mod postfix;
mod prefix;
mod primary;

pub use self::closure::*;
pub use self::literal::*;
pub use self::postfix::*;
pub use self::prefix::*;
pub use self::primary::*;

use crate::lexer::{assignment_operator, keyword, operator, punct, Cursor};
use crate::parser::{
    combinators::{first_of, many},
    Parse, ParseError, ParseResult,
};

use super::type_name::TypeName;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Expression {
    pub try_operator: Option<TryOperator>,
    pub prefix: PrefixExpression,
    pub binaries: Vec<BinaryExpression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TryOperator {
    Try,
    TryOptional,
    TryForced,
}

/// One tail of a binary expression. The tails stay in source order; nesting
/// by precedence is deferred.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BinaryExpression {
    Binary {
        operator: String,
        rhs: PrefixExpression,
    },
    Assignment {
        try_operator: Option<TryOperator>,
        rhs: PrefixExpression,
    },
    /// `? then : rhs`; the middle expression carries its own try marker.
    Conditional {
        then: Box<Expression>,
        rhs: PrefixExpression,
    },
    Is(TypeName),
    As(TypeName),
    AsOptional(TypeName),
    AsForced(TypeName),
}

impl Parse for Expression {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let try_operator = try_operator(cursor);
        let prefix = PrefixExpression::parse(cursor)?;
        let binaries = many(cursor, BinaryExpression::parse);
        Ok(Expression { try_operator, prefix, binaries })
    }
}

/// `try`, `try?` or `try!`; the marker character must follow immediately.
pub(crate) fn try_operator(cursor: &mut Cursor) -> Option<TryOperator> {
    if keyword(cursor, "try").is_err() {
        return None;
    }
    if cursor.next_if(|c| c == '?').is_some() {
        Some(TryOperator::TryOptional)
    } else if cursor.next_if(|c| c == '!').is_some() {
        Some(TryOperator::TryForced)
    } else {
        Some(TryOperator::Try)
    }
}

impl Parse for BinaryExpression {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        first_of(
            cursor,
            "binary expression",
            &[conditional, assignment, type_cast, ordinary],
        )
    }
}

fn conditional(cursor: &mut Cursor) -> ParseResult<BinaryExpression> {
    if operator(cursor)? != "?" {
        return Err(ParseError::expected("'?'", cursor));
    }
    let then = Expression::parse(cursor)?;
    punct(cursor, ":")?;
    let rhs = PrefixExpression::parse(cursor)?;
    Ok(BinaryExpression::Conditional { then: Box::new(then), rhs })
}

fn assignment(cursor: &mut Cursor) -> ParseResult<BinaryExpression> {
    assignment_operator(cursor)?;
    let try_operator = try_operator(cursor);
    let rhs = PrefixExpression::parse(cursor)?;
    Ok(BinaryExpression::Assignment { try_operator, rhs })
}

fn type_cast(cursor: &mut Cursor) -> ParseResult<BinaryExpression> {
    if keyword(cursor, "is").is_ok() {
        return TypeName::parse(cursor).map(BinaryExpression::Is);
    }

    keyword(cursor, "as")?;
    if cursor.next_if(|c| c == '?').is_some() {
        TypeName::parse(cursor).map(BinaryExpression::AsOptional)
    } else if cursor.next_if(|c| c == '!').is_some() {
        TypeName::parse(cursor).map(BinaryExpression::AsForced)
    } else {
        TypeName::parse(cursor).map(BinaryExpression::As)
    }
}

fn ordinary(cursor: &mut Cursor) -> ParseResult<BinaryExpression> {
    let operator = operator(cursor)?;
    let rhs = PrefixExpression::parse(cursor)?;
    Ok(BinaryExpression::Binary { operator, rhs })
}
