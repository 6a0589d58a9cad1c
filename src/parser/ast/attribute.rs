use crate::lexer::{punct, word, Cursor};
use crate::parser::{combinators::many, Parse, ParseError, ParseResult};

/// An `@name` annotation with an optional parenthesized argument clause. The
/// argument is kept as its exact surface text; only bracket nesting is
/// checked.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Attribute {
    pub name: String,
    pub argument: Option<String>,
}

impl Parse for Attribute {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        punct(cursor, "@")?;
        let name = word(cursor)?;

        let argument = if punct(cursor, "(").is_ok() {
            let tokens = balanced_tokens(cursor)?;
            punct(cursor, ")")?;
            Some(tokens)
        } else {
            None
        };

        Ok(Attribute { name, argument })
    }
}

pub(crate) fn attributes(cursor: &mut Cursor) -> Vec<Attribute> {
    many(cursor, Attribute::parse)
}

/// Consume raw text up to the `)` closing the argument clause, requiring
/// `()`, `[]` and `{}` to nest properly along the way.
fn balanced_tokens(cursor: &mut Cursor) -> ParseResult<String> {
    let mut text = String::new();
    let mut stack: Vec<char> = vec![];

    loop {
        match cursor.peek() {
            None => {
                return Err(ParseError {
                    message: "unterminated attribute argument clause".to_string(),
                    position: Some(cursor.position()),
                })
            }
            Some(')') if stack.is_empty() => return Ok(text),
            Some(c) => {
                match c {
                    '(' => stack.push(')'),
                    '[' => stack.push(']'),
                    '{' => stack.push('}'),
                    ')' | ']' | '}' => {
                        if stack.pop() != Some(c) {
                            return Err(ParseError {
                                message: format!("mismatched '{c}' in attribute argument clause"),
                                position: Some(cursor.position()),
                            });
                        }
                    }
                    _ => {}
                }
                text.push(c);
                cursor.next();
            }
        }
    }
}
