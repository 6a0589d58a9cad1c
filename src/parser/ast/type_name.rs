//! The type grammar: type identifiers with generic arguments, tuples,
//! collection shorthands, function types, optional suffixes, metatypes and
//! protocol compositions.

use crate::lexer::{identifier, keyword, punct, Cursor};
use crate::parser::{
    combinators::{attempt, chain_right1, first_of, optional, sep_by},
    Parse, ParseResult,
};

use super::attribute::{attributes, Attribute};
use super::generics::generic_argument_clause;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TypeName {
    Identifier(TypeIdentifier),
    Tuple(TupleType),
    Array(Box<TypeName>),
    Dictionary {
        key: Box<TypeName>,
        value: Box<TypeName>,
    },
    Function {
        argument: Box<TypeName>,
        throws: Option<ThrowsKind>,
        result: Box<TypeName>,
    },
    Optional(Box<TypeName>),
    ImplicitlyUnwrapped(Box<TypeName>),
    Metatype {
        base: Box<TypeName>,
        kind: MetatypeKind,
    },
    ProtocolComposition(Vec<TypeIdentifier>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MetatypeKind {
    Type,
    Protocol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ThrowsKind {
    Throws,
    Rethrows,
}

/// A dotted path of components, each with optional generic arguments
/// (`Swift.Dictionary<String, Int>`).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TypeIdentifier {
    pub components: Vec<TypeIdentifierComponent>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TypeIdentifierComponent {
    pub name: String,
    pub generic_arguments: Option<Vec<TypeName>>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TupleType {
    pub elements: Vec<TupleTypeElement>,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TupleTypeElement {
    Anonymous {
        attributes: Vec<Attribute>,
        inout: bool,
        type_name: TypeName,
    },
    Named {
        inout: bool,
        name: String,
        type_annotation: TypeAnnotation,
    },
}

/// `: attributes? Type`, the annotation form shared by patterns, parameters
/// and tuple elements.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TypeAnnotation {
    pub attributes: Vec<Attribute>,
    pub type_name: TypeName,
}

/// `-> attributes? Type`, the result clause of functions, subscripts and
/// closures.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FunctionResult {
    pub attributes: Vec<Attribute>,
    pub type_name: TypeName,
}

impl Parse for TypeName {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        // `A throws -> B -> C` associates to the right.
        chain_right1(cursor, suffixed_type, |cursor| {
            let throws = throws_kind(cursor);
            punct(cursor, "->")?;
            Ok(move |argument: TypeName, result: TypeName| TypeName::Function {
                argument: Box::new(argument),
                throws,
                result: Box::new(result),
            })
        })
    }
}

pub(crate) fn throws_kind(cursor: &mut Cursor) -> Option<ThrowsKind> {
    if keyword(cursor, "throws").is_ok() {
        Some(ThrowsKind::Throws)
    } else if keyword(cursor, "rethrows").is_ok() {
        Some(ThrowsKind::Rethrows)
    } else {
        None
    }
}

/// A primary type wrapped by any number of `?`, `!`, `.Type` and
/// `.Protocol` suffixes, innermost first.
fn suffixed_type(cursor: &mut Cursor) -> ParseResult<TypeName> {
    let mut type_name = primary_type(cursor)?;

    loop {
        if punct(cursor, "?").is_ok() {
            type_name = TypeName::Optional(Box::new(type_name));
        } else if punct(cursor, "!").is_ok() {
            type_name = TypeName::ImplicitlyUnwrapped(Box::new(type_name));
        } else if attempt(cursor, |cursor| {
            punct(cursor, ".")?;
            keyword(cursor, "Type")
        })
        .is_ok()
        {
            type_name = TypeName::Metatype {
                base: Box::new(type_name),
                kind: MetatypeKind::Type,
            };
        } else if attempt(cursor, |cursor| {
            punct(cursor, ".")?;
            keyword(cursor, "Protocol")
        })
        .is_ok()
        {
            type_name = TypeName::Metatype {
                base: Box::new(type_name),
                kind: MetatypeKind::Protocol,
            };
        } else {
            return Ok(type_name);
        }
    }
}

fn primary_type(cursor: &mut Cursor) -> ParseResult<TypeName> {
    first_of(
        cursor,
        "type",
        &[
            collection_type,
            |cursor| TupleType::parse(cursor).map(TypeName::Tuple),
            protocol_composition,
            |cursor| TypeIdentifier::parse(cursor).map(TypeName::Identifier),
        ],
    )
}

/// `[Element]` or `[Key: Value]`; both start with `[`, so the dictionary is
/// recognized by the `:` after the first type.
fn collection_type(cursor: &mut Cursor) -> ParseResult<TypeName> {
    punct(cursor, "[")?;
    let first = TypeName::parse(cursor)?;

    let result = if punct(cursor, ":").is_ok() {
        let value = TypeName::parse(cursor)?;
        TypeName::Dictionary {
            key: Box::new(first),
            value: Box::new(value),
        }
    } else {
        TypeName::Array(Box::new(first))
    };

    punct(cursor, "]")?;
    Ok(result)
}

fn protocol_composition(cursor: &mut Cursor) -> ParseResult<TypeName> {
    keyword(cursor, "protocol")?;
    punct(cursor, "<")?;
    let protocols = sep_by(cursor, TypeIdentifier::parse, ",");
    punct(cursor, ">")?;
    Ok(TypeName::ProtocolComposition(protocols))
}

impl Parse for TypeIdentifier {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let mut components = vec![TypeIdentifierComponent::parse(cursor)?];

        // A trailing `.Type`/`.Protocol` must stay unconsumed for the
        // metatype suffix; the component parse rejects those reserved words,
        // so the attempt backs the dot out again.
        while let Ok(component) = attempt(cursor, |cursor| {
            punct(cursor, ".")?;
            TypeIdentifierComponent::parse(cursor)
        }) {
            components.push(component);
        }

        Ok(TypeIdentifier { components })
    }
}

impl Parse for TypeIdentifierComponent {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let name = identifier(cursor)?;
        let generic_arguments = optional(cursor, generic_argument_clause);
        Ok(TypeIdentifierComponent { name, generic_arguments })
    }
}

impl Parse for TupleType {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        punct(cursor, "(")?;
        let elements = sep_by(cursor, TupleTypeElement::parse, ",");
        let variadic = punct(cursor, "...").is_ok();
        punct(cursor, ")")?;
        Ok(TupleType { elements, variadic })
    }
}

impl Parse for TupleTypeElement {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let named = attempt(cursor, |cursor| {
            let inout = keyword(cursor, "inout").is_ok();
            let name = identifier(cursor)?;
            let type_annotation = TypeAnnotation::parse(cursor)?;
            Ok(TupleTypeElement::Named { inout, name, type_annotation })
        });
        if let Ok(element) = named {
            return Ok(element);
        }

        let attributes = attributes(cursor);
        let inout = keyword(cursor, "inout").is_ok();
        let type_name = TypeName::parse(cursor)?;
        Ok(TupleTypeElement::Anonymous { attributes, inout, type_name })
    }
}

impl Parse for TypeAnnotation {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        punct(cursor, ":")?;
        let attributes = attributes(cursor);
        let type_name = TypeName::parse(cursor)?;
        Ok(TypeAnnotation { attributes, type_name })
    }
}

impl Parse for FunctionResult {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        punct(cursor, "->")?;
        let attributes = attributes(cursor);
        let type_name = TypeName::parse(cursor)?;
        Ok(FunctionResult { attributes, type_name })
    }
}

impl TypeIdentifier {
    /// Convenience for tests and for building expected trees by hand.
    pub fn simple(name: &str) -> TypeIdentifier {
        TypeIdentifier {
            components: vec![TypeIdentifierComponent {
                name: name.to_string(),
                generic_arguments: None,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_type(input: &str) -> ParseResult<TypeName> {
        crate::parser::run(input, TypeName::parse)
    }

    fn simple(name: &str) -> TypeName {
        TypeName::Identifier(TypeIdentifier::simple(name))
    }

    #[test]
    fn test_parse_simple_identifier_type() {
        assert_eq!(parse_type("Int").unwrap(), simple("Int"));
    }

    #[test]
    fn test_parse_dotted_identifier_with_generics() {
        let result = parse_type("Swift.Dictionary<String, Int>").unwrap();

        let TypeName::Identifier(TypeIdentifier { components }) = result else {
            panic!("expected a type identifier");
        };
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].name, "Swift");
        assert_eq!(components[0].generic_arguments, None);
        assert_eq!(components[1].name, "Dictionary");
        assert_eq!(
            components[1].generic_arguments,
            Some(vec![simple("String"), simple("Int")])
        );
    }

    #[test]
    fn test_parse_nested_generic_arguments() {
        let result = parse_type("Array<Array<Int>>").unwrap();

        let TypeName::Identifier(TypeIdentifier { components }) = result else {
            panic!("expected a type identifier");
        };
        let inner = components[0].generic_arguments.as_ref().unwrap();
        assert!(matches!(inner[0], TypeName::Identifier(_)));
    }

    #[test]
    fn test_parse_collection_shorthands() {
        assert_eq!(parse_type("[Int]").unwrap(), TypeName::Array(Box::new(simple("Int"))));
        assert_eq!(
            parse_type("[String: Int]").unwrap(),
            TypeName::Dictionary {
                key: Box::new(simple("String")),
                value: Box::new(simple("Int")),
            }
        );
    }

    #[test]
    fn test_function_types_associate_to_the_right() {
        let result = parse_type("A -> B -> C").unwrap();

        let TypeName::Function { argument, result, .. } = result else {
            panic!("expected a function type");
        };
        assert_eq!(*argument, simple("A"));
        assert!(matches!(*result, TypeName::Function { .. }));
    }

    #[test]
    fn test_function_type_throws_marker() {
        let result = parse_type("A throws -> B").unwrap();
        let TypeName::Function { throws, .. } = result else {
            panic!("expected a function type");
        };
        assert_eq!(throws, Some(ThrowsKind::Throws));
    }

    #[test]
    fn test_optional_suffixes_wrap_inside_out() {
        assert_eq!(
            parse_type("T??!").unwrap(),
            TypeName::ImplicitlyUnwrapped(Box::new(TypeName::Optional(Box::new(
                TypeName::Optional(Box::new(simple("T")))
            ))))
        );
    }

    #[test]
    fn test_metatype_suffixes() {
        assert_eq!(
            parse_type("Int.Type").unwrap(),
            TypeName::Metatype {
                base: Box::new(simple("Int")),
                kind: MetatypeKind::Type,
            }
        );
        assert_eq!(
            parse_type("P.Protocol").unwrap(),
            TypeName::Metatype {
                base: Box::new(simple("P")),
                kind: MetatypeKind::Protocol,
            }
        );
    }

    #[test]
    fn test_protocol_composition() {
        let result = parse_type("protocol<A, B>").unwrap();
        let TypeName::ProtocolComposition(protocols) = result else {
            panic!("expected a protocol composition");
        };
        assert_eq!(protocols.len(), 2);
    }

    #[test]
    fn test_tuple_type_elements() {
        let result = parse_type("(Int, label: String)").unwrap();

        let TypeName::Tuple(TupleType { elements, variadic }) = result else {
            panic!("expected a tuple type");
        };
        assert!(!variadic);
        assert!(matches!(elements[0], TupleTypeElement::Anonymous { .. }));
        assert!(
            matches!(&elements[1], TupleTypeElement::Named { name, .. } if name == "label")
        );
    }

    #[test]
    fn test_tuple_type_trailing_ellipsis() {
        let TypeName::Tuple(tuple) = parse_type("(Int...)").unwrap() else {
            panic!("expected a tuple type");
        };
        assert!(tuple.variadic);
        assert_eq!(tuple.elements.len(), 1);
    }

    #[test]
    fn test_empty_tuple_type() {
        let TypeName::Tuple(tuple) = parse_type("()").unwrap() else {
            panic!("expected a tuple type");
        };
        assert!(tuple.elements.is_empty());
    }
}
