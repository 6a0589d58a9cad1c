use crate::lexer::{identifier, keyword, punct, Cursor};
use crate::parser::{
    combinators::{attempt, optional, sep_by1},
    Parse, ParseResult,
};

use super::super::declaration::{parameter_clause, Parameter};
use super::super::statement::{block_body, Statement};
use super::super::type_name::FunctionResult;
use super::Expression;

/// `{ [captures] params -> Result in statements }` with every part of the
/// signature optional.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Closure {
    pub signature: Option<ClosureSignature>,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClosureSignature {
    pub capture_list: Option<Vec<Capture>>,
    pub parameters: ClosureParameters,
    pub result: Option<FunctionResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ClosureParameters {
    /// A full parameter clause: `(x: Int, y: Int)`.
    Clause(Vec<Parameter>),
    /// Bare names: `x, y`.
    Identifiers(Vec<String>),
    /// A capture list alone still forms a signature.
    Omitted,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Capture {
    pub specifier: Option<CaptureSpecifier>,
    pub expression: Expression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CaptureSpecifier {
    Weak,
    Unowned,
    UnownedSafe,
    UnownedUnsafe,
}

impl Parse for Closure {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        punct(cursor, "{")?;
        let signature = optional(cursor, ClosureSignature::parse);
        let statements = block_body(cursor)?;
        Ok(Closure { signature, statements })
    }
}

impl Parse for ClosureSignature {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let capture_list = optional(cursor, capture_list);

        let parameters = if let Ok(clause) = attempt(cursor, parameter_clause) {
            ClosureParameters::Clause(clause)
        } else if let Ok(names) = attempt(cursor, |cursor| sep_by1(cursor, identifier, ",")) {
            ClosureParameters::Identifiers(names)
        } else {
            ClosureParameters::Omitted
        };

        let result = optional(cursor, FunctionResult::parse);

        // Only the `in` makes this a signature; without it the attempt
        // backs everything out and the body is parsed as statements.
        keyword(cursor, "in")?;

        Ok(ClosureSignature { capture_list, parameters, result })
    }
}

fn capture_list(cursor: &mut Cursor) -> ParseResult<Vec<Capture>> {
    punct(cursor, "[")?;
    let captures = sep_by1(cursor, Capture::parse, ",")?;
    punct(cursor, "]")?;
    Ok(captures)
}

impl Parse for Capture {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let specifier = capture_specifier(cursor);
        let expression = Expression::parse(cursor)?;
        Ok(Capture { specifier, expression })
    }
}

fn capture_specifier(cursor: &mut Cursor) -> Option<CaptureSpecifier> {
    if keyword(cursor, "weak").is_ok() {
        return Some(CaptureSpecifier::Weak);
    }
    if keyword(cursor, "unowned").is_err() {
        return None;
    }

    let qualified = attempt(cursor, |cursor| {
        punct(cursor, "(")?;
        let specifier = if keyword(cursor, "safe").is_ok() {
            CaptureSpecifier::UnownedSafe
        } else {
            keyword(cursor, "unsafe")?;
            CaptureSpecifier::UnownedUnsafe
        };
        punct(cursor, ")")?;
        Ok(specifier)
    });

    Some(qualified.unwrap_or(CaptureSpecifier::Unowned))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_closure(input: &str) -> ParseResult<Closure> {
        crate::parser::run(input, Closure::parse)
    }

    #[test]
    fn test_parse_bare_closure() {
        let closure = parse_closure("{ x + 1 }").unwrap();
        assert_eq!(closure.signature, None);
        assert_eq!(closure.statements.len(), 1);
    }

    #[test]
    fn test_parse_identifier_list_signature() {
        let closure = parse_closure("{ a, b in a }").unwrap();
        let signature = closure.signature.unwrap();
        assert_eq!(
            signature.parameters,
            ClosureParameters::Identifiers(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(signature.capture_list, None);
    }

    #[test]
    fn test_parse_full_signature() {
        let closure = parse_closure("{ [weak self] (x: Int) -> Int in x }").unwrap();
        let signature = closure.signature.unwrap();

        let captures = signature.capture_list.unwrap();
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].specifier, Some(CaptureSpecifier::Weak));

        let ClosureParameters::Clause(parameters) = &signature.parameters else {
            panic!("expected a parameter clause");
        };
        assert_eq!(parameters.len(), 1);
        assert!(signature.result.is_some());
    }

    #[test]
    fn test_parse_unowned_capture_specifiers() {
        let closure = parse_closure("{ [unowned(unsafe) self] in self }").unwrap();
        let captures = closure.signature.unwrap().capture_list.unwrap();
        assert_eq!(captures[0].specifier, Some(CaptureSpecifier::UnownedUnsafe));
    }

    #[test]
    fn test_capture_list_alone_still_needs_in() {
        let closure = parse_closure("{ [weak self] in f() }").unwrap();
        let signature = closure.signature.unwrap();
        assert_eq!(signature.parameters, ClosureParameters::Omitted);
    }
}
