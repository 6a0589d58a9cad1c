use crate::lexer::{
    assignment_operator, identifier, keyword, operator, punct, Cursor,
};
use crate::parser::{
    combinators::{attempt, many1, optional, sep_by},
    Parse, ParseResult,
};

use super::super::attribute::Attribute;
use super::super::expression::Expression;
use super::super::generics::GenericParameterClause;
use super::super::pattern::BindingKind;
use super::super::statement::{code_block, Statement};
use super::super::type_name::{throws_kind, FunctionResult, ThrowsKind, TypeAnnotation};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FunctionDeclaration {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<String>,
    pub name: FunctionName,
    pub generic_parameters: Option<GenericParameterClause>,
    /// Curried functions carry one clause per argument group.
    pub parameter_clauses: Vec<Vec<Parameter>>,
    pub throws: Option<ThrowsKind>,
    pub result: Option<FunctionResult>,
    pub body: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FunctionName {
    Identifier(String),
    Operator(String),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Parameter {
    pub inout: bool,
    pub binding: Option<BindingKind>,
    pub external_name: Option<String>,
    pub local_name: String,
    pub type_annotation: Option<TypeAnnotation>,
    pub variadic: bool,
    pub default_value: Option<Expression>,
}

impl FunctionDeclaration {
    pub(crate) fn parse_tail(
        cursor: &mut Cursor,
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
    ) -> ParseResult<Self> {
        keyword(cursor, "func")?;

        let name = match identifier(cursor) {
            Ok(name) => FunctionName::Identifier(name),
            Err(_) => FunctionName::Operator(operator(cursor)?),
        };

        let generic_parameters = optional(cursor, GenericParameterClause::parse);
        let parameter_clauses = many1(cursor, parameter_clause)?;
        let throws = throws_kind(cursor);
        let result = optional(cursor, FunctionResult::parse);
        let body = optional(cursor, code_block);

        Ok(FunctionDeclaration {
            attributes,
            modifiers,
            name,
            generic_parameters,
            parameter_clauses,
            throws,
            result,
            body,
        })
    }
}

pub(crate) fn parameter_clause(cursor: &mut Cursor) -> ParseResult<Vec<Parameter>> {
    punct(cursor, "(")?;
    let parameters = sep_by(cursor, Parameter::parse, ",");
    punct(cursor, ")")?;
    Ok(parameters)
}

impl Parse for Parameter {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let inout = keyword(cursor, "inout").is_ok();
        let binding = if keyword(cursor, "let").is_ok() {
            Some(BindingKind::Let)
        } else if keyword(cursor, "var").is_ok() {
            Some(BindingKind::Var)
        } else {
            None
        };

        let first = parameter_name(cursor)?;
        let (external_name, local_name) = match attempt(cursor, parameter_name) {
            Ok(second) => (Some(first), second),
            Err(_) => (None, first),
        };

        let type_annotation = optional(cursor, TypeAnnotation::parse);
        let variadic = punct(cursor, "...").is_ok();
        let default_value = optional(cursor, |cursor| {
            assignment_operator(cursor)?;
            Expression::parse(cursor)
        });

        Ok(Parameter {
            inout,
            binding,
            external_name,
            local_name,
            type_annotation,
            variadic,
            default_value,
        })
    }
}

/// A parameter name is an identifier or `_`.
fn parameter_name(cursor: &mut Cursor) -> ParseResult<String> {
    if keyword(cursor, "_").is_ok() {
        return Ok("_".to_string());
    }
    identifier(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{Declaration, Statement, TypeName};

    fn parse_function(input: &str) -> FunctionDeclaration {
        let Declaration::Function(function) =
            crate::parser::run(input, Declaration::parse).unwrap()
        else {
            panic!("expected a function declaration");
        };
        function
    }

    #[test]
    fn test_parse_generic_throwing_function() {
        let function = parse_function("func f<T>(a: T, b: Int = 2) throws -> T { return a }");

        assert_eq!(function.name, FunctionName::Identifier("f".to_string()));
        let generics = function.generic_parameters.unwrap();
        assert_eq!(generics.parameters.len(), 1);
        assert_eq!(generics.parameters[0].name, "T");

        assert_eq!(function.parameter_clauses.len(), 1);
        let parameters = &function.parameter_clauses[0];
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters[0].local_name, "a");
        assert_eq!(parameters[0].default_value, None);
        assert_eq!(parameters[1].local_name, "b");
        assert!(parameters[1].default_value.is_some());

        assert_eq!(function.throws, Some(ThrowsKind::Throws));
        assert!(matches!(
            function.result.as_ref().map(|r| &r.type_name),
            Some(TypeName::Identifier(_))
        ));

        let body = function.body.unwrap();
        assert_eq!(body.len(), 1);
        assert!(matches!(body[0], Statement::Return(Some(_))));
    }

    #[test]
    fn test_parse_operator_function() {
        let function = parse_function("func +(lhs: Vector, rhs: Vector) -> Vector { }");
        assert_eq!(function.name, FunctionName::Operator("+".to_string()));
    }

    #[test]
    fn test_parse_curried_function() {
        let function = parse_function("func adder(a: Int)(b: Int) -> Int { return a + b }");
        assert_eq!(function.parameter_clauses.len(), 2);
    }

    #[test]
    fn test_parse_external_and_local_names() {
        let function = parse_function("func move(from start: Point, to end: Point) { }");
        let parameters = &function.parameter_clauses[0];
        assert_eq!(parameters[0].external_name, Some("from".to_string()));
        assert_eq!(parameters[0].local_name, "start");
    }

    #[test]
    fn test_parse_variadic_and_inout_parameters() {
        let function = parse_function("func sum(inout total: Int, values: Int...) { }");
        let parameters = &function.parameter_clauses[0];
        assert!(parameters[0].inout);
        assert!(parameters[1].variadic);
    }

    #[test]
    fn test_function_without_body() {
        let function = parse_function("func f()");
        assert_eq!(function.body, None);
    }
}
