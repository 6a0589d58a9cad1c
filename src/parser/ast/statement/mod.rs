//! Statements and the shared statement-sequence plumbing (code blocks,
//! where clauses, the statement dispatch itself).

mod branch;
mod build_config;
mod loops;
mod switch_statement;

pub use self::branch::*;
pub use self::build_config::*;
pub use self::loops::*;
pub use self::switch_statement::*;

use crate::lexer::{identifier, keyword, peek_word, punct, skip_trivia, Cursor};
use crate::parser::{
    combinators::{attempt, look_ahead, many, optional, without_trailing_closures},
    Parse, ParseError, ParseResult,
};

use super::declaration::Declaration;
use super::expression::Expression;
use super::pattern::Pattern;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Statement {
    Expression(Expression),
    Declaration(Declaration),
    For(ForStatement),
    ForIn(ForInStatement),
    While(WhileStatement),
    RepeatWhile(RepeatWhileStatement),
    If(IfStatement),
    Guard(GuardStatement),
    Switch(SwitchStatement),
    Break(Option<String>),
    Continue(Option<String>),
    Fallthrough,
    Return(Option<Expression>),
    Throw(Expression),
    Defer(Vec<Statement>),
    Do(DoStatement),
    Labeled(LabeledStatement),
    BuildConfiguration(Box<BuildConfigurationStatement>),
    LineControl(LineControl),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DoStatement {
    pub body: Vec<Statement>,
    pub catch_clauses: Vec<CatchClause>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CatchClause {
    pub pattern: Option<Pattern>,
    pub where_clause: Option<Expression>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LabeledStatement {
    pub label: String,
    pub statement: Box<Statement>,
}

impl Parse for Statement {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        skip_trivia(cursor)?;

        if cursor.peek() == Some('#') {
            if look_ahead(cursor, |cursor| keyword(cursor, "#if")).is_ok() {
                return BuildConfigurationStatement::parse(cursor)
                    .map(|statement| Statement::BuildConfiguration(Box::new(statement)));
            }
            if look_ahead(cursor, |cursor| keyword(cursor, "#line")).is_ok() {
                return LineControl::parse(cursor).map(Statement::LineControl);
            }
            return Err(ParseError::expected("statement", cursor));
        }

        match peek_word(cursor).as_deref() {
            Some("for") => for_statement(cursor),
            Some("while") => WhileStatement::parse(cursor).map(Statement::While),
            Some("repeat") => RepeatWhileStatement::parse(cursor).map(Statement::RepeatWhile),
            Some("if") => IfStatement::parse(cursor).map(Statement::If),
            Some("guard") => GuardStatement::parse(cursor).map(Statement::Guard),
            Some("switch") => SwitchStatement::parse(cursor).map(Statement::Switch),
            Some("break") => {
                keyword(cursor, "break")?;
                Ok(Statement::Break(optional(cursor, identifier)))
            }
            Some("continue") => {
                keyword(cursor, "continue")?;
                Ok(Statement::Continue(optional(cursor, identifier)))
            }
            Some("fallthrough") => {
                keyword(cursor, "fallthrough")?;
                Ok(Statement::Fallthrough)
            }
            Some("return") => {
                keyword(cursor, "return")?;
                Ok(Statement::Return(optional(cursor, Expression::parse)))
            }
            Some("throw") => {
                keyword(cursor, "throw")?;
                Expression::parse(cursor).map(Statement::Throw)
            }
            Some("defer") => {
                keyword(cursor, "defer")?;
                code_block(cursor).map(Statement::Defer)
            }
            Some("do") => DoStatement::parse(cursor).map(Statement::Do),
            _ => {
                let declaration_error = match attempt(cursor, Declaration::parse) {
                    Ok(declaration) => return Ok(Statement::Declaration(declaration)),
                    Err(error) => error,
                };
                let label_error = match attempt(cursor, labeled_statement) {
                    Ok(statement) => return Ok(statement),
                    Err(error) => error,
                };
                match attempt(cursor, Expression::parse) {
                    Ok(expression) => Ok(Statement::Expression(expression)),
                    Err(error) => Err(declaration_error.further(label_error).further(error)),
                }
            }
        }
    }
}

fn for_statement(cursor: &mut Cursor) -> ParseResult<Statement> {
    if let Ok(statement) = attempt(cursor, ForInStatement::parse) {
        return Ok(Statement::ForIn(statement));
    }
    ForStatement::parse(cursor).map(Statement::For)
}

fn labeled_statement(cursor: &mut Cursor) -> ParseResult<Statement> {
    let label = identifier(cursor)?;
    punct(cursor, ":")?;
    let statement = Statement::parse(cursor)?;
    Ok(Statement::Labeled(LabeledStatement {
        label,
        statement: Box::new(statement),
    }))
}

impl Parse for DoStatement {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        keyword(cursor, "do")?;
        let body = code_block(cursor)?;
        let catch_clauses = many(cursor, CatchClause::parse);
        Ok(DoStatement { body, catch_clauses })
    }
}

impl Parse for CatchClause {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        keyword(cursor, "catch")?;
        skip_trivia(cursor)?;

        // A bare `catch {` has no pattern; the brace is the body, so the
        // pattern and guard must not take it as a trailing closure.
        let (pattern, where_clause) = without_trailing_closures(cursor, |cursor| {
            let pattern = if cursor.peek() == Some('{') {
                None
            } else {
                Some(Pattern::parse(cursor)?)
            };
            let where_clause = optional(cursor, where_clause);
            Ok((pattern, where_clause))
        })?;
        let body = code_block(cursor)?;

        Ok(CatchClause { pattern, where_clause, body })
    }
}

/// `where expression`, shared by conditions, case items, loops and catches.
pub(crate) fn where_clause(cursor: &mut Cursor) -> ParseResult<Expression> {
    keyword(cursor, "where")?;
    Expression::parse(cursor)
}

/// Statements separated by optional semicolons, up to (but excluding)
/// whatever `terminated` recognizes. A malformed statement fails the whole
/// list so the error points into it instead of at the terminator.
pub(crate) fn statement_list(
    cursor: &mut Cursor,
    terminated: impl Fn(&mut Cursor) -> bool,
) -> ParseResult<Vec<Statement>> {
    let mut statements = vec![];
    loop {
        skip_trivia(cursor)?;
        if cursor.is_at_end() || terminated(cursor) {
            return Ok(statements);
        }
        statements.push(Statement::parse(cursor)?);
        optional(cursor, |cursor| punct(cursor, ";"));
    }
}

/// The remainder of a `{ ... }` block whose opening brace is already
/// consumed.
pub(crate) fn block_body(cursor: &mut Cursor) -> ParseResult<Vec<Statement>> {
    let statements = statement_list(cursor, |cursor| cursor.peek() == Some('}'))?;
    punct(cursor, "}")?;
    Ok(statements)
}

pub(crate) fn code_block(cursor: &mut Cursor) -> ParseResult<Vec<Statement>> {
    punct(cursor, "{")?;
    block_body(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_statement(input: &str) -> ParseResult<Statement> {
        crate::parser::run(input, Statement::parse)
    }

    #[test]
    fn test_parse_expression_statement() {
        assert!(matches!(
            parse_statement("f(x)").unwrap(),
            Statement::Expression(_)
        ));
    }

    #[test]
    fn test_parse_transfer_statements() {
        assert_eq!(parse_statement("break").unwrap(), Statement::Break(None));
        assert_eq!(
            parse_statement("continue outer").unwrap(),
            Statement::Continue(Some("outer".to_string()))
        );
        assert_eq!(parse_statement("fallthrough").unwrap(), Statement::Fallthrough);
    }

    #[test]
    fn test_parse_return_with_and_without_value() {
        assert_eq!(parse_statement("return").unwrap(), Statement::Return(None));
        assert!(matches!(
            parse_statement("return x").unwrap(),
            Statement::Return(Some(_))
        ));
    }

    #[test]
    fn test_parse_defer() {
        let Statement::Defer(body) = parse_statement("defer { close() }").unwrap() else {
            panic!("expected a defer statement");
        };
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn test_parse_do_with_catch_clauses() {
        let Statement::Do(statement) =
            parse_statement("do { try f() } catch is IOError { } catch { }").unwrap()
        else {
            panic!("expected a do statement");
        };
        assert_eq!(statement.body.len(), 1);
        assert_eq!(statement.catch_clauses.len(), 2);
        assert!(statement.catch_clauses[0].pattern.is_some());
        assert!(statement.catch_clauses[1].pattern.is_none());
    }

    #[test]
    fn test_parse_labeled_statement() {
        let Statement::Labeled(labeled) = parse_statement("outer: while x { }").unwrap() else {
            panic!("expected a labeled statement");
        };
        assert_eq!(labeled.label, "outer");
        assert!(matches!(*labeled.statement, Statement::While(_)));
    }

    #[test]
    fn test_statement_list_consumes_semicolons() {
        let statements = crate::parser::run("a(); b(); c()", |cursor| {
            statement_list(cursor, |_| false)
        })
        .unwrap();
        assert_eq!(statements.len(), 3);
    }
}
