use crate::lexer::{keyword, peek_word, punct, Cursor};
use crate::parser::{
    combinators::{many, optional, sep_by1, without_trailing_closures},
    Parse, ParseResult,
};

use super::super::expression::Expression;
use super::super::pattern::Pattern;
use super::{statement_list, where_clause, Statement};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SwitchStatement {
    pub expression: Expression,
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SwitchCase {
    Case {
        items: Vec<CaseItem>,
        statements: Vec<Statement>,
    },
    Default(Vec<Statement>),
}

/// One pattern of a case label, with its optional guard.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CaseItem {
    pub pattern: Pattern,
    pub where_clause: Option<Expression>,
}

impl Parse for SwitchStatement {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        keyword(cursor, "switch")?;
        let expression = without_trailing_closures(cursor, Expression::parse)?;
        punct(cursor, "{")?;
        let cases = many(cursor, SwitchCase::parse);
        punct(cursor, "}")?;
        Ok(SwitchStatement { expression, cases })
    }
}

impl Parse for SwitchCase {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        if keyword(cursor, "default").is_ok() {
            punct(cursor, ":")?;
            return case_body(cursor).map(SwitchCase::Default);
        }

        keyword(cursor, "case")?;
        let items = sep_by1(cursor, CaseItem::parse, ",")?;
        punct(cursor, ":")?;
        let statements = case_body(cursor)?;
        Ok(SwitchCase::Case { items, statements })
    }
}

impl Parse for CaseItem {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let pattern = Pattern::parse(cursor)?;
        let where_clause = optional(cursor, where_clause);
        Ok(CaseItem { pattern, where_clause })
    }
}

/// Statements up to the next `case`, `default` or the closing brace.
fn case_body(cursor: &mut Cursor) -> ParseResult<Vec<Statement>> {
    statement_list(cursor, |cursor| {
        cursor.peek() == Some('}')
            || matches!(peek_word(cursor).as_deref(), Some("case" | "default"))
    })
}
