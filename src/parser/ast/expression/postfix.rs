use crate::lexer::{decimal_digits, identifier, keyword, operator, punct, skip_trivia, Cursor};
use crate::parser::{
    combinators::{attempt, look_ahead, optional, sep_by, sep_by1, with_trailing_closures},
    Parse, ParseError, ParseResult,
};

use super::super::generics::generic_argument_clause;
use super::super::type_name::TypeName;
use super::closure::Closure;
use super::primary::{ExpressionElement, PrimaryExpression};
use super::Expression;

/// A left-associative spine of suffixes over a primary expression.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PostfixExpression {
    Primary(PrimaryExpression),
    PostfixOperator {
        expression: Box<PostfixExpression>,
        operator: String,
    },
    ExplicitMember {
        expression: Box<PostfixExpression>,
        member: Member,
    },
    FunctionCall(FunctionCall),
    Subscript {
        expression: Box<PostfixExpression>,
        arguments: Vec<Expression>,
    },
    ForcedValue(Box<PostfixExpression>),
    OptionalChaining(Box<PostfixExpression>),
    /// `expr.self`
    PostfixSelf(Box<PostfixExpression>),
    /// `expr.dynamicType`
    DynamicType(Box<PostfixExpression>),
    /// `expr.init`
    Initializer(Box<PostfixExpression>),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Member {
    /// `.0`, `.1`, ... tuple access.
    Index(String),
    Named {
        name: String,
        generic_arguments: Option<Vec<TypeName>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FunctionCall {
    pub expression: Box<PostfixExpression>,
    pub arguments: Vec<ExpressionElement>,
    pub trailing_closure: Option<Box<Closure>>,
}

impl Parse for PostfixExpression {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let mut expression = PrimaryExpression::parse(cursor).map(PostfixExpression::Primary)?;

        loop {
            if let Ok(op) = attempt(cursor, suffix_operator) {
                expression = match op.as_str() {
                    "!" => PostfixExpression::ForcedValue(Box::new(expression)),
                    "?" => PostfixExpression::OptionalChaining(Box::new(expression)),
                    _ => PostfixExpression::PostfixOperator {
                        expression: Box::new(expression),
                        operator: op,
                    },
                };
            } else if let Ok(suffix) = attempt(cursor, dot_suffix) {
                expression = match suffix {
                    DotSuffix::DynamicType => PostfixExpression::DynamicType(Box::new(expression)),
                    DotSuffix::Initializer => PostfixExpression::Initializer(Box::new(expression)),
                    DotSuffix::PostfixSelf => PostfixExpression::PostfixSelf(Box::new(expression)),
                    DotSuffix::Member(member) => PostfixExpression::ExplicitMember {
                        expression: Box::new(expression),
                        member,
                    },
                };
            } else if let Ok((arguments, trailing_closure)) = attempt(cursor, call_suffix) {
                expression = PostfixExpression::FunctionCall(FunctionCall {
                    expression: Box::new(expression),
                    arguments,
                    trailing_closure,
                });
            } else if let Ok(arguments) = attempt(cursor, subscript_suffix) {
                expression = PostfixExpression::Subscript {
                    expression: Box::new(expression),
                    arguments,
                };
            } else {
                return Ok(expression);
            }
        }
    }
}

/// A postfix operator is only such when no operand follows; otherwise the
/// binary-expression layer owns it.
fn suffix_operator(cursor: &mut Cursor) -> ParseResult<String> {
    let op = operator(cursor)?;
    if operand_ahead(cursor) {
        return Err(ParseError::expected("postfix operator", cursor));
    }
    Ok(op)
}

/// Whether a primary expression starts here. A `{` does not count: in suffix
/// position it is a code block or trailing closure, never an operand.
fn operand_ahead(cursor: &mut Cursor) -> bool {
    if skip_trivia(cursor).is_err() {
        return false;
    }
    if cursor.peek() == Some('{') {
        return false;
    }
    look_ahead(cursor, PrimaryExpression::parse).is_ok()
}

enum DotSuffix {
    DynamicType,
    Initializer,
    PostfixSelf,
    Member(Member),
}

fn dot_suffix(cursor: &mut Cursor) -> ParseResult<DotSuffix> {
    punct(cursor, ".")?;

    if keyword(cursor, "dynamicType").is_ok() {
        return Ok(DotSuffix::DynamicType);
    }
    if keyword(cursor, "init").is_ok() {
        return Ok(DotSuffix::Initializer);
    }
    if keyword(cursor, "self").is_ok() {
        return Ok(DotSuffix::PostfixSelf);
    }
    if let Ok(digits) = decimal_digits(cursor) {
        return Ok(DotSuffix::Member(Member::Index(digits)));
    }

    let name = identifier(cursor)?;
    let generic_arguments = optional(cursor, generic_argument_clause);
    Ok(DotSuffix::Member(Member::Named { name, generic_arguments }))
}

type CallSuffix = (Vec<ExpressionElement>, Option<Box<Closure>>);

fn call_suffix(cursor: &mut Cursor) -> ParseResult<CallSuffix> {
    punct(cursor, "(")?;
    let arguments = with_trailing_closures(cursor, |cursor| {
        let arguments = sep_by(cursor, ExpressionElement::parse, ",");
        punct(cursor, ")")?;
        Ok(arguments)
    })?;

    let trailing_closure = if cursor.trailing_closures_allowed() {
        optional(cursor, Closure::parse).map(Box::new)
    } else {
        None
    };
    Ok((arguments, trailing_closure))
}

fn subscript_suffix(cursor: &mut Cursor) -> ParseResult<Vec<Expression>> {
    punct(cursor, "[")?;
    with_trailing_closures(cursor, |cursor| {
        let arguments = sep_by1(cursor, Expression::parse, ",")?;
        punct(cursor, "]")?;
        Ok(arguments)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_postfix(input: &str) -> ParseResult<PostfixExpression> {
        crate::parser::run(input, PostfixExpression::parse)
    }

    #[test]
    fn test_calls_nest_left_associatively() {
        let PostfixExpression::FunctionCall(outer) = parse_postfix("f(a)(b)").unwrap() else {
            panic!("expected a call");
        };
        assert!(matches!(*outer.expression, PostfixExpression::FunctionCall(_)));
    }

    #[test]
    fn test_members_nest_left_associatively() {
        let PostfixExpression::ExplicitMember { expression, member } =
            parse_postfix("a.b.c").unwrap()
        else {
            panic!("expected a member access");
        };
        assert!(matches!(member, Member::Named { ref name, .. } if name == "c"));
        assert!(matches!(*expression, PostfixExpression::ExplicitMember { .. }));
    }

    #[test]
    fn test_tuple_index_member() {
        let PostfixExpression::ExplicitMember { member, .. } = parse_postfix("pair.0").unwrap()
        else {
            panic!("expected a member access");
        };
        assert_eq!(member, Member::Index("0".to_string()));
    }

    #[test]
    fn test_forced_value_and_optional_chaining() {
        assert!(matches!(
            parse_postfix("x!").unwrap(),
            PostfixExpression::ForcedValue(_)
        ));
        assert!(matches!(
            parse_postfix("x?").unwrap(),
            PostfixExpression::OptionalChaining(_)
        ));
    }

    #[test]
    fn test_dot_keyword_suffixes() {
        assert!(matches!(
            parse_postfix("x.dynamicType").unwrap(),
            PostfixExpression::DynamicType(_)
        ));
        assert!(matches!(
            parse_postfix("Int.self").unwrap(),
            PostfixExpression::PostfixSelf(_)
        ));
        assert!(matches!(
            parse_postfix("Point.init").unwrap(),
            PostfixExpression::Initializer(_)
        ));
    }

    #[test]
    fn test_call_with_labels_and_trailing_closure() {
        let PostfixExpression::FunctionCall(call) =
            parse_postfix("map(over: xs) { a, b in a }").unwrap()
        else {
            panic!("expected a call");
        };
        assert_eq!(call.arguments.len(), 1);
        assert_eq!(call.arguments[0].label, Some("over".to_string()));
        assert!(call.trailing_closure.is_some());
    }

    #[test]
    fn test_subscript_suffix() {
        let PostfixExpression::Subscript { arguments, .. } =
            parse_postfix("grid[1, 2]").unwrap()
        else {
            panic!("expected a subscript");
        };
        assert_eq!(arguments.len(), 2);
    }

    #[test]
    fn test_postfix_operator_only_without_operand() {
        assert!(matches!(
            parse_postfix("i++").unwrap(),
            PostfixExpression::PostfixOperator { .. }
        ));
    }
}
