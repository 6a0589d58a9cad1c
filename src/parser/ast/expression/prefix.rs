use crate::lexer::{identifier, operator, Cursor};
use crate::parser::{
    combinators::{attempt, optional},
    Parse, ParseError, ParseResult,
};

use super::postfix::PostfixExpression;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PrefixExpression {
    Standard {
        operator: Option<String>,
        postfix: PostfixExpression,
    },
    /// `&name`, passing a variable in-out.
    InOut {
        name: String,
    },
}

impl Parse for PrefixExpression {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let in_out = attempt(cursor, |cursor| {
            if operator(cursor)? != "&" {
                return Err(ParseError::expected("'&'", cursor));
            }
            identifier(cursor).map(|name| PrefixExpression::InOut { name })
        });
        if let Ok(expression) = in_out {
            return Ok(expression);
        }

        let operator = optional(cursor, operator);
        let postfix = PostfixExpression::parse(cursor)?;
        Ok(PrefixExpression::Standard { operator, postfix })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_prefix(input: &str) -> ParseResult<PrefixExpression> {
        crate::parser::run(input, PrefixExpression::parse)
    }

    #[test]
    fn test_parse_plain_postfix() {
        let PrefixExpression::Standard { operator, .. } = parse_prefix("x").unwrap() else {
            panic!("expected a standard prefix expression");
        };
        assert_eq!(operator, None);
    }

    #[test]
    fn test_parse_prefix_operator() {
        let PrefixExpression::Standard { operator, .. } = parse_prefix("-x").unwrap() else {
            panic!("expected a standard prefix expression");
        };
        assert_eq!(operator, Some("-".to_string()));
    }

    #[test]
    fn test_parse_in_out() {
        assert_eq!(
            parse_prefix("&buffer").unwrap(),
            PrefixExpression::InOut { name: "buffer".to_string() }
        );
    }

    #[test]
    fn test_double_ampersand_is_an_ordinary_prefix_operator() {
        let PrefixExpression::Standard { operator, .. } = parse_prefix("&&x").unwrap() else {
            panic!("expected a standard prefix expression");
        };
        assert_eq!(operator, Some("&&".to_string()));
    }
}
