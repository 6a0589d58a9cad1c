//! `if` and `guard`, together with the condition-clause grammar they share
//! with `while`: optional bindings, case conditions and `#available`.

use crate::lexer::{
    assignment_operator, decimal_digits, identifier, keyword, peek_word, punct, Cursor,
};
use crate::parser::{
    combinators::{attempt, look_ahead, optional, sep_by1, without_trailing_closures},
    Parse, ParseError, ParseResult,
};

use super::super::expression::Expression;
use super::super::pattern::{BindingKind, Pattern};
use super::{code_block, where_clause, Statement};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IfStatement {
    pub condition: ConditionClause,
    pub body: Vec<Statement>,
    pub else_branch: Option<ElseBranch>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ElseBranch {
    Block(Vec<Statement>),
    ElseIf(Box<IfStatement>),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GuardStatement {
    pub condition: ConditionClause,
    pub body: Vec<Statement>,
}

/// An optional leading boolean expression followed by the condition list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConditionClause {
    pub expression: Option<Expression>,
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Condition {
    Availability(Vec<AvailabilityArgument>),
    Case(CaseCondition),
    OptionalBinding(OptionalBindingCondition),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AvailabilityArgument {
    Platform { name: String, version: String },
    Star,
}

/// `case pattern = initializer where?`
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CaseCondition {
    pub pattern: Pattern,
    pub initializer: Expression,
    pub where_clause: Option<Expression>,
}

/// `let head, continuation, ... where?`. Continuations bind greedily to
/// the head: `let x = y, z = w` is one condition with one continuation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OptionalBindingCondition {
    pub head: OptionalBindingHead,
    pub continuation: Vec<OptionalBindingContinuation>,
    pub where_clause: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OptionalBindingHead {
    pub kind: BindingKind,
    pub pattern: Pattern,
    pub initializer: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OptionalBindingContinuation {
    Binding { pattern: Pattern, initializer: Expression },
    Head(OptionalBindingHead),
}

impl Parse for IfStatement {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        keyword(cursor, "if")?;
        let condition = ConditionClause::parse(cursor)?;
        let body = code_block(cursor)?;

        let else_branch = optional(cursor, |cursor| {
            keyword(cursor, "else")?;
            if peek_word(cursor).as_deref() == Some("if") {
                IfStatement::parse(cursor).map(|nested| ElseBranch::ElseIf(Box::new(nested)))
            } else {
                code_block(cursor).map(ElseBranch::Block)
            }
        });

        Ok(IfStatement { condition, body, else_branch })
    }
}

impl Parse for GuardStatement {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        keyword(cursor, "guard")?;
        let condition = ConditionClause::parse(cursor)?;
        keyword(cursor, "else")?;
        let body = code_block(cursor)?;
        Ok(GuardStatement { condition, body })
    }
}

impl Parse for ConditionClause {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        // The `{` after the clause is the statement body, never a trailing
        // closure of a condition expression.
        without_trailing_closures(cursor, Self::parse_inner)
    }
}

impl ConditionClause {
    fn parse_inner(cursor: &mut Cursor) -> ParseResult<Self> {
        if condition_ahead(cursor) {
            let conditions = sep_by1(cursor, Condition::parse, ",")?;
            return Ok(ConditionClause { expression: None, conditions });
        }

        let expression = Expression::parse(cursor)?;
        let conditions = if attempt(cursor, |cursor| punct(cursor, ",")).is_ok() {
            sep_by1(cursor, Condition::parse, ",")?
        } else {
            vec![]
        };

        Ok(ConditionClause { expression: Some(expression), conditions })
    }
}

fn condition_ahead(cursor: &mut Cursor) -> bool {
    if look_ahead(cursor, |cursor| keyword(cursor, "#available")).is_ok() {
        return true;
    }
    matches!(peek_word(cursor).as_deref(), Some("let" | "var" | "case"))
}

impl Parse for Condition {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        if look_ahead(cursor, |cursor| keyword(cursor, "#available")).is_ok() {
            return availability_condition(cursor).map(Condition::Availability);
        }
        match peek_word(cursor).as_deref() {
            Some("case") => CaseCondition::parse(cursor).map(Condition::Case),
            Some("let" | "var") => {
                OptionalBindingCondition::parse(cursor).map(Condition::OptionalBinding)
            }
            _ => Err(ParseError::expected("condition", cursor)),
        }
    }
}

fn availability_condition(cursor: &mut Cursor) -> ParseResult<Vec<AvailabilityArgument>> {
    keyword(cursor, "#available")?;
    punct(cursor, "(")?;
    let arguments = sep_by1(cursor, availability_argument, ",")?;
    punct(cursor, ")")?;
    Ok(arguments)
}

fn availability_argument(cursor: &mut Cursor) -> ParseResult<AvailabilityArgument> {
    if punct(cursor, "*").is_ok() {
        return Ok(AvailabilityArgument::Star);
    }

    let name = identifier(cursor)?;
    let mut version = decimal_digits(cursor)?;
    for _ in 0..2 {
        let Ok(component) = attempt(cursor, |cursor| {
            punct(cursor, ".")?;
            decimal_digits(cursor)
        }) else {
            break;
        };
        version.push('.');
        version.push_str(&component);
    }

    Ok(AvailabilityArgument::Platform { name, version })
}

impl Parse for CaseCondition {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        keyword(cursor, "case")?;
        let pattern = Pattern::parse(cursor)?;
        assignment_operator(cursor)?;
        let initializer = Expression::parse(cursor)?;
        let where_clause = optional(cursor, where_clause);
        Ok(CaseCondition { pattern, initializer, where_clause })
    }
}

impl Parse for OptionalBindingCondition {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let head = OptionalBindingHead::parse(cursor)?;

        let mut continuation = vec![];
        while let Ok(item) = attempt(cursor, |cursor| {
            punct(cursor, ",")?;
            continuation_item(cursor)
        }) {
            continuation.push(item);
        }

        let where_clause = optional(cursor, where_clause);
        Ok(OptionalBindingCondition { head, continuation, where_clause })
    }
}

impl Parse for OptionalBindingHead {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let kind = if keyword(cursor, "let").is_ok() {
            BindingKind::Let
        } else {
            keyword(cursor, "var")?;
            BindingKind::Var
        };

        let pattern = Pattern::parse(cursor)?;
        assignment_operator(cursor)?;
        let initializer = Expression::parse(cursor)?;
        Ok(OptionalBindingHead { kind, pattern, initializer })
    }
}

fn continuation_item(cursor: &mut Cursor) -> ParseResult<OptionalBindingContinuation> {
    if matches!(peek_word(cursor).as_deref(), Some("let" | "var")) {
        return OptionalBindingHead::parse(cursor).map(OptionalBindingContinuation::Head);
    }

    let pattern = Pattern::parse(cursor)?;
    assignment_operator(cursor)?;
    let initializer = Expression::parse(cursor)?;
    Ok(OptionalBindingContinuation::Binding { pattern, initializer })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_if(input: &str) -> ParseResult<IfStatement> {
        crate::parser::run(input, IfStatement::parse)
    }

    #[test]
    fn test_parse_plain_boolean_condition() {
        let statement = parse_if("if ready { go() }").unwrap();
        assert!(statement.condition.expression.is_some());
        assert!(statement.condition.conditions.is_empty());
        assert_eq!(statement.body.len(), 1);
        assert_eq!(statement.else_branch, None);
    }

    #[test]
    fn test_parse_optional_binding_with_continuation_and_where() {
        let statement = parse_if("if let x = y, z = w where x > 0 { }").unwrap();

        assert_eq!(statement.condition.expression, None);
        assert_eq!(statement.condition.conditions.len(), 1);
        let Condition::OptionalBinding(binding) = &statement.condition.conditions[0] else {
            panic!("expected an optional binding");
        };
        assert_eq!(binding.head.kind, BindingKind::Let);
        assert_eq!(binding.continuation.len(), 1);
        assert!(matches!(
            binding.continuation[0],
            OptionalBindingContinuation::Binding { .. }
        ));
        assert!(binding.where_clause.is_some());
    }

    #[test]
    fn test_parse_else_if_chain() {
        let statement = parse_if("if a { } else if b { } else { }").unwrap();

        let Some(ElseBranch::ElseIf(nested)) = statement.else_branch else {
            panic!("expected an else-if branch");
        };
        assert!(matches!(nested.else_branch, Some(ElseBranch::Block(_))));
    }

    #[test]
    fn test_parse_availability_condition() {
        let statement = parse_if("if #available(iOS 9.0, OSX 10.10.3, *) { }").unwrap();

        let Condition::Availability(arguments) = &statement.condition.conditions[0] else {
            panic!("expected an availability condition");
        };
        assert_eq!(arguments.len(), 3);
        assert_eq!(
            arguments[0],
            AvailabilityArgument::Platform { name: "iOS".to_string(), version: "9.0".to_string() }
        );
        assert_eq!(
            arguments[1],
            AvailabilityArgument::Platform {
                name: "OSX".to_string(),
                version: "10.10.3".to_string(),
            }
        );
        assert_eq!(arguments[2], AvailabilityArgument::Star);
    }

    #[test]
    fn test_parse_case_condition() {
        let statement = parse_if("if case .some(let x) = value { }").unwrap();
        assert!(matches!(statement.condition.conditions[0], Condition::Case(_)));
    }

    #[test]
    fn test_parse_guard() {
        let statement =
            crate::parser::run("guard let x = y else { return }", GuardStatement::parse).unwrap();
        assert_eq!(statement.condition.conditions.len(), 1);
        assert_eq!(statement.body.len(), 1);
    }

    #[test]
    fn test_leading_expression_then_condition_list() {
        let statement = parse_if("if ready, let x = y { }").unwrap();
        assert!(statement.condition.expression.is_some());
        assert_eq!(statement.condition.conditions.len(), 1);
    }
}
