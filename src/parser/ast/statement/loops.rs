use crate::lexer::{keyword, punct, skip_trivia, Cursor};
use crate::parser::{
    combinators::{attempt, optional, sep_by1, without_trailing_closures},
    Parse, ParseResult,
};

use super::super::declaration::Declaration;
use super::super::expression::Expression;
use super::super::pattern::Pattern;
use super::branch::ConditionClause;
use super::{code_block, where_clause, Statement};

/// The C-style `for init?; condition?; increment? { }`, with or without
/// parentheses around the header.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ForStatement {
    pub initializer: Option<ForInit>,
    pub condition: Option<Expression>,
    pub increment: Option<Expression>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ForInit {
    Declaration(Box<Declaration>),
    ExpressionList(Vec<Expression>),
}

/// `for case? pattern in expression where? { }`
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ForInStatement {
    pub case_marker: bool,
    pub pattern: Pattern,
    pub expression: Expression,
    pub where_clause: Option<Expression>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WhileStatement {
    pub condition: ConditionClause,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RepeatWhileStatement {
    pub body: Vec<Statement>,
    pub condition: Expression,
}

impl Parse for ForInStatement {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        keyword(cursor, "for")?;
        let case_marker = keyword(cursor, "case").is_ok();
        let pattern = Pattern::parse(cursor)?;
        keyword(cursor, "in")?;
        let (expression, where_clause) = without_trailing_closures(cursor, |cursor| {
            let expression = Expression::parse(cursor)?;
            let where_clause = optional(cursor, where_clause);
            Ok((expression, where_clause))
        })?;
        let body = code_block(cursor)?;

        Ok(ForInStatement {
            case_marker,
            pattern,
            expression,
            where_clause,
            body,
        })
    }
}

impl Parse for ForStatement {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        keyword(cursor, "for")?;

        if let Ok(statement) = attempt(cursor, |cursor| {
            punct(cursor, "(")?;
            let header = for_header(cursor)?;
            punct(cursor, ")")?;
            let body = code_block(cursor)?;
            Ok(build_for(header, body))
        }) {
            return Ok(statement);
        }

        let header = without_trailing_closures(cursor, for_header)?;
        let body = code_block(cursor)?;
        Ok(build_for(header, body))
    }
}

type ForHeader = (Option<ForInit>, Option<Expression>, Option<Expression>);

fn for_header(cursor: &mut Cursor) -> ParseResult<ForHeader> {
    let initializer = optional(cursor, ForInit::parse);
    punct(cursor, ";")?;
    let condition = header_expression(cursor);
    punct(cursor, ";")?;
    let increment = header_expression(cursor);
    Ok((initializer, condition, increment))
}

/// An optional header slot. A `{` here is the loop body, not a closure
/// expression.
fn header_expression(cursor: &mut Cursor) -> Option<Expression> {
    skip_trivia(cursor).ok()?;
    if cursor.peek() == Some('{') {
        return None;
    }
    optional(cursor, Expression::parse)
}

fn build_for(header: ForHeader, body: Vec<Statement>) -> ForStatement {
    let (initializer, condition, increment) = header;
    ForStatement { initializer, condition, increment, body }
}

impl Parse for ForInit {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        // Only variable bindings may open a for header; other declarations
        // cannot appear here.
        let binding = attempt(cursor, |cursor| match Declaration::parse(cursor)? {
            declaration @ (Declaration::Variable(_) | Declaration::Constant(_)) => Ok(declaration),
            _ => Err(crate::parser::ParseError::expected("variable declaration", cursor)),
        });
        if let Ok(declaration) = binding {
            return Ok(ForInit::Declaration(Box::new(declaration)));
        }

        let expressions = sep_by1(cursor, Expression::parse, ",")?;
        Ok(ForInit::ExpressionList(expressions))
    }
}

impl Parse for WhileStatement {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        keyword(cursor, "while")?;
        let condition = ConditionClause::parse(cursor)?;
        let body = code_block(cursor)?;
        Ok(WhileStatement { condition, body })
    }
}

impl Parse for RepeatWhileStatement {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        keyword(cursor, "repeat")?;
        let body = code_block(cursor)?;
        keyword(cursor, "while")?;
        let condition = Expression::parse(cursor)?;
        Ok(RepeatWhileStatement { body, condition })
    }
}
