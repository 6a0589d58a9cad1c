//! Generic parameter clauses (declaration side) and generic argument
//! clauses (use side). Both live behind `<`, which doubles as an operator
//! character, so callers always enter through a speculative attempt.

use crate::lexer::{identifier, keyword, operator, punct, Cursor};
use crate::parser::{
    combinators::{optional, sep_by1},
    Parse, ParseError, ParseResult,
};

use super::type_name::{TypeIdentifier, TypeName};

/// `<T, U: Constraint where U.Element == T>`
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GenericParameterClause {
    pub parameters: Vec<GenericParameter>,
    pub requirements: Vec<Requirement>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GenericParameter {
    pub name: String,
    pub constraint: Option<TypeName>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Requirement {
    Conformance {
        subject: TypeIdentifier,
        constraint: TypeName,
    },
    SameType {
        subject: TypeIdentifier,
        other: TypeName,
    },
}

impl Parse for GenericParameterClause {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        punct(cursor, "<")?;
        let parameters = sep_by1(cursor, GenericParameter::parse, ",")?;

        let requirements = if keyword(cursor, "where").is_ok() {
            sep_by1(cursor, Requirement::parse, ",")?
        } else {
            vec![]
        };

        punct(cursor, ">")?;
        Ok(GenericParameterClause { parameters, requirements })
    }
}

impl Parse for GenericParameter {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let name = identifier(cursor)?;
        let constraint = optional(cursor, |cursor| {
            punct(cursor, ":")?;
            TypeName::parse(cursor)
        });
        Ok(GenericParameter { name, constraint })
    }
}

impl Parse for Requirement {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let subject = TypeIdentifier::parse(cursor)?;

        if punct(cursor, ":").is_ok() {
            let constraint = TypeName::parse(cursor)?;
            return Ok(Requirement::Conformance { subject, constraint });
        }

        let start = cursor.save();
        if operator(cursor)? != "==" {
            let error = ParseError::expected("':' or '==' in generic requirement", cursor);
            cursor.restore(start);
            return Err(error);
        }
        let other = TypeName::parse(cursor)?;
        Ok(Requirement::SameType { subject, other })
    }
}

/// `<Type, ...>` after an identifier. Only accepted when the whole clause
/// parses; the surrounding attempt falls back to treating `<` as an
/// operator.
pub(crate) fn generic_argument_clause(cursor: &mut Cursor) -> ParseResult<Vec<TypeName>> {
    punct(cursor, "<")?;
    let arguments = sep_by1(cursor, TypeName::parse, ",")?;
    punct(cursor, ">")?;
    Ok(arguments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_parameter() {
        let clause = crate::parser::run("<T>", GenericParameterClause::parse).unwrap();
        assert_eq!(clause.parameters.len(), 1);
        assert_eq!(clause.parameters[0].name, "T");
        assert_eq!(clause.parameters[0].constraint, None);
        assert!(clause.requirements.is_empty());
    }

    #[test]
    fn test_parse_constrained_parameters_with_requirements() {
        let clause = crate::parser::run(
            "<T: Comparable, U where T == U, U: Hashable>",
            GenericParameterClause::parse,
        )
        .unwrap();

        assert_eq!(clause.parameters.len(), 2);
        assert!(clause.parameters[0].constraint.is_some());
        assert_eq!(clause.requirements.len(), 2);
        assert!(matches!(clause.requirements[0], Requirement::SameType { .. }));
        assert!(matches!(clause.requirements[1], Requirement::Conformance { .. }));
    }

    #[test]
    fn test_argument_clause_requires_closing_angle() {
        let mut cursor = Cursor::new("<Int, String");
        assert!(generic_argument_clause(&mut cursor).is_err());
    }
}
