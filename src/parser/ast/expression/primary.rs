use crate::lexer::{identifier, keyword, peek_word, punct, skip_trivia, Cursor};
use crate::parser::{
    combinators::{attempt, optional, sep_by, sep_by1, with_trailing_closures},
    Parse, ParseError, ParseResult,
};

use super::super::generics::generic_argument_clause;
use super::super::type_name::TypeName;
use super::closure::Closure;
use super::literal::Literal;
use super::Expression;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PrimaryExpression {
    Identifier {
        name: String,
        generic_arguments: Option<Vec<TypeName>>,
    },
    Literal(Literal),
    SelfExpression(SelfExpression),
    Superclass(SuperclassExpression),
    Closure(Box<Closure>),
    /// `(a, b: c, ...)`, which also covers plain parenthesized expressions.
    Parenthesized(Vec<ExpressionElement>),
    /// `.name`, with the base type left to inference.
    ImplicitMember(String),
    Wildcard,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SelfExpression {
    Plain,
    Member(String),
    Subscript(Vec<Expression>),
    Initializer,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SuperclassExpression {
    Member(String),
    Subscript(Vec<Expression>),
    Initializer,
}

/// An optionally labeled element of a parenthesized expression or call
/// argument list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExpressionElement {
    pub label: Option<String>,
    pub expression: Expression,
}

impl Parse for PrimaryExpression {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        skip_trivia(cursor)?;

        match cursor.peek() {
            Some('"') => return Literal::parse(cursor).map(PrimaryExpression::Literal),
            Some(c) if c.is_ascii_digit() => {
                return Literal::parse(cursor).map(PrimaryExpression::Literal)
            }
            Some('-') if cursor.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) => {
                return Literal::parse(cursor).map(PrimaryExpression::Literal)
            }
            Some('[') => return Literal::parse(cursor).map(PrimaryExpression::Literal),
            Some('{') => {
                return Closure::parse(cursor)
                    .map(|closure| PrimaryExpression::Closure(Box::new(closure)))
            }
            Some('(') => return parenthesized(cursor),
            Some('.') => {
                punct(cursor, ".")?;
                return identifier(cursor).map(PrimaryExpression::ImplicitMember);
            }
            _ => {}
        }

        match peek_word(cursor).as_deref() {
            Some("self") => self_expression(cursor),
            Some("super") => superclass_expression(cursor),
            Some("true" | "false" | "nil" | "__FILE__" | "__LINE__" | "__COLUMN__" | "__FUNCTION__") => {
                Literal::parse(cursor).map(PrimaryExpression::Literal)
            }
            Some("_") => {
                keyword(cursor, "_")?;
                Ok(PrimaryExpression::Wildcard)
            }
            _ => {
                let name = identifier(cursor)?;
                let generic_arguments = optional(cursor, generic_argument_clause);
                Ok(PrimaryExpression::Identifier { name, generic_arguments })
            }
        }
    }
}

fn parenthesized(cursor: &mut Cursor) -> ParseResult<PrimaryExpression> {
    punct(cursor, "(")?;
    with_trailing_closures(cursor, |cursor| {
        let elements = sep_by(cursor, ExpressionElement::parse, ",");
        punct(cursor, ")")?;
        Ok(PrimaryExpression::Parenthesized(elements))
    })
}

impl Parse for ExpressionElement {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let labeled = attempt(cursor, |cursor| {
            let label = identifier(cursor)?;
            punct(cursor, ":")?;
            let expression = Expression::parse(cursor)?;
            Ok(ExpressionElement { label: Some(label), expression })
        });
        if let Ok(element) = labeled {
            return Ok(element);
        }

        let expression = Expression::parse(cursor)?;
        Ok(ExpressionElement { label: None, expression })
    }
}

fn self_expression(cursor: &mut Cursor) -> ParseResult<PrimaryExpression> {
    keyword(cursor, "self")?;

    if attempt(cursor, |cursor| {
        punct(cursor, ".")?;
        keyword(cursor, "init")
    })
    .is_ok()
    {
        return Ok(PrimaryExpression::SelfExpression(SelfExpression::Initializer));
    }

    if let Ok(member) = attempt(cursor, |cursor| {
        punct(cursor, ".")?;
        identifier(cursor)
    }) {
        return Ok(PrimaryExpression::SelfExpression(SelfExpression::Member(member)));
    }

    if let Ok(arguments) = attempt(cursor, subscript_arguments) {
        return Ok(PrimaryExpression::SelfExpression(SelfExpression::Subscript(arguments)));
    }

    Ok(PrimaryExpression::SelfExpression(SelfExpression::Plain))
}

fn superclass_expression(cursor: &mut Cursor) -> ParseResult<PrimaryExpression> {
    keyword(cursor, "super")?;

    if attempt(cursor, |cursor| {
        punct(cursor, ".")?;
        keyword(cursor, "init")
    })
    .is_ok()
    {
        return Ok(PrimaryExpression::Superclass(SuperclassExpression::Initializer));
    }

    if let Ok(member) = attempt(cursor, |cursor| {
        punct(cursor, ".")?;
        identifier(cursor)
    }) {
        return Ok(PrimaryExpression::Superclass(SuperclassExpression::Member(member)));
    }

    if let Ok(arguments) = attempt(cursor, subscript_arguments) {
        return Ok(PrimaryExpression::Superclass(SuperclassExpression::Subscript(arguments)));
    }

    Err(ParseError::expected(
        "member, subscript, or initializer after 'super'",
        cursor,
    ))
}

fn subscript_arguments(cursor: &mut Cursor) -> ParseResult<Vec<Expression>> {
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

    fn parse_primary(input: &str) -> ParseResult<PrimaryExpression> {
        crate::parser::run(input, PrimaryExpression::parse)
    }

    #[test]
    fn test_parse_identifier_primary() {
        assert_eq!(
            parse_primary("foo").unwrap(),
            PrimaryExpression::Identifier { name: "foo".to_string(), generic_arguments: None }
        );
    }

    #[test]
    fn test_parse_identifier_with_generic_arguments() {
        let PrimaryExpression::Identifier { generic_arguments, .. } =
            parse_primary("min<Int>").unwrap()
        else {
            panic!("expected an identifier");
        };
        assert_eq!(generic_arguments.map(|args| args.len()), Some(1));
    }

    #[test]
    fn test_parse_self_family() {
        assert_eq!(
            parse_primary("self").unwrap(),
            PrimaryExpression::SelfExpression(SelfExpression::Plain)
        );
        assert_eq!(
            parse_primary("self.count").unwrap(),
            PrimaryExpression::SelfExpression(SelfExpression::Member("count".to_string()))
        );
        assert_eq!(
            parse_primary("self.init").unwrap(),
            PrimaryExpression::SelfExpression(SelfExpression::Initializer)
        );
    }

    #[test]
    fn test_super_requires_a_suffix() {
        assert!(parse_primary("super").is_err());
        assert_eq!(
            parse_primary("super.init").unwrap(),
            PrimaryExpression::Superclass(SuperclassExpression::Initializer)
        );
    }

    #[test]
    fn test_parse_implicit_member() {
        assert_eq!(
            parse_primary(".red").unwrap(),
            PrimaryExpression::ImplicitMember("red".to_string())
        );
    }

    #[test]
    fn test_parse_wildcard() {
        assert_eq!(parse_primary("_").unwrap(), PrimaryExpression::Wildcard);
    }

    #[test]
    fn test_parse_labeled_parenthesized_elements() {
        let PrimaryExpression::Parenthesized(elements) = parse_primary("(1, y: 2)").unwrap()
        else {
            panic!("expected a parenthesized expression");
        };
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].label, None);
        assert_eq!(elements[1].label, Some("y".to_string()));
    }
}
