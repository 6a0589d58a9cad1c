//! Nominal type declarations: structs, classes, enums (both styles),
//! protocols and extensions.

use crate::lexer::{
    assignment_operator, identifier, keyword, peek_word, punct, skip_trivia,
    static_string_literal, numeric_literal, Cursor,
};
use crate::parser::{
    combinators::{attempt, optional, sep_by1},
    Parse, ParseError, ParseResult,
};

use super::super::attribute::{attributes, Attribute};
use super::super::generics::GenericParameterClause;
use super::super::type_name::{
    FunctionResult, TupleType, TypeAnnotation, TypeIdentifier, TypeName,
};
use super::{
    declaration_list, declaration_modifiers, parameter_clause, required_type_annotation,
    Declaration, FunctionDeclaration, GetterSetterKeywordBlock, InitializerDeclaration, Parameter,
};

/// `: class?, T1, T2, ...` after a nominal type name.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TypeInheritanceClause {
    pub class_requirement: bool,
    pub types: Vec<TypeIdentifier>,
}

impl Parse for TypeInheritanceClause {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        punct(cursor, ":")?;
        let class_requirement = keyword(cursor, "class").is_ok();

        let types = if class_requirement {
            if punct(cursor, ",").is_ok() {
                sep_by1(cursor, TypeIdentifier::parse, ",")?
            } else {
                vec![]
            }
        } else {
            sep_by1(cursor, TypeIdentifier::parse, ",")?
        };

        Ok(TypeInheritanceClause { class_requirement, types })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StructDeclaration {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<String>,
    pub name: String,
    pub generic_parameters: Option<GenericParameterClause>,
    pub inheritance: Option<TypeInheritanceClause>,
    pub declarations: Vec<Declaration>,
}

impl StructDeclaration {
    pub(crate) fn parse_tail(
        cursor: &mut Cursor,
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
    ) -> ParseResult<Self> {
        keyword(cursor, "struct")?;
        let name = identifier(cursor)?;
        let generic_parameters = optional(cursor, GenericParameterClause::parse);
        let inheritance = optional(cursor, TypeInheritanceClause::parse);
        let declarations = declaration_list(cursor)?;

        Ok(StructDeclaration {
            attributes,
            modifiers,
            name,
            generic_parameters,
            inheritance,
            declarations,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClassDeclaration {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<String>,
    pub name: String,
    pub generic_parameters: Option<GenericParameterClause>,
    pub inheritance: Option<TypeInheritanceClause>,
    pub declarations: Vec<Declaration>,
}

impl ClassDeclaration {
    pub(crate) fn parse_tail(
        cursor: &mut Cursor,
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
    ) -> ParseResult<Self> {
        keyword(cursor, "class")?;
        let name = identifier(cursor)?;
        let generic_parameters = optional(cursor, GenericParameterClause::parse);
        let inheritance = optional(cursor, TypeInheritanceClause::parse);
        let declarations = declaration_list(cursor)?;

        Ok(ClassDeclaration {
            attributes,
            modifiers,
            name,
            generic_parameters,
            inheritance,
            declarations,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExtensionDeclaration {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<String>,
    pub type_identifier: TypeIdentifier,
    pub inheritance: Option<TypeInheritanceClause>,
    pub declarations: Vec<Declaration>,
}

impl ExtensionDeclaration {
    pub(crate) fn parse_tail(
        cursor: &mut Cursor,
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
    ) -> ParseResult<Self> {
        keyword(cursor, "extension")?;
        let type_identifier = TypeIdentifier::parse(cursor)?;
        let inheritance = optional(cursor, TypeInheritanceClause::parse);
        let declarations = declaration_list(cursor)?;

        Ok(ExtensionDeclaration {
            attributes,
            modifiers,
            type_identifier,
            inheritance,
            declarations,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EnumDeclaration {
    Union(UnionStyleEnum),
    RawValue(RawValueEnum),
}

/// Cases carry optional tuple payloads; the whole enum may be `indirect`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UnionStyleEnum {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<String>,
    pub indirect: bool,
    pub name: String,
    pub generic_parameters: Option<GenericParameterClause>,
    pub inheritance: Option<TypeInheritanceClause>,
    pub members: Vec<UnionStyleEnumMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum UnionStyleEnumMember {
    Case {
        attributes: Vec<Attribute>,
        indirect: bool,
        cases: Vec<UnionStyleEnumCase>,
    },
    Declaration(Box<Declaration>),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UnionStyleEnumCase {
    pub name: String,
    pub tuple_type: Option<TupleType>,
}

/// Cases optionally assign literals of the inherited raw type.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RawValueEnum {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<String>,
    pub name: String,
    pub generic_parameters: Option<GenericParameterClause>,
    pub inheritance: TypeInheritanceClause,
    pub members: Vec<RawValueEnumMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RawValueEnumMember {
    Case {
        attributes: Vec<Attribute>,
        cases: Vec<RawValueEnumCase>,
    },
    Declaration(Box<Declaration>),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RawValueEnumCase {
    pub name: String,
    pub raw_value: Option<RawValueLiteral>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RawValueLiteral {
    Numeric(String),
    String(String),
    Boolean(bool),
}

impl EnumDeclaration {
    pub(crate) fn parse_tail(
        cursor: &mut Cursor,
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
    ) -> ParseResult<Self> {
        let union = attempt(cursor, |cursor| {
            UnionStyleEnum::parse_tail(cursor, attributes.clone(), modifiers.clone())
        });
        match union {
            Ok(declaration) => Ok(EnumDeclaration::Union(declaration)),
            Err(union_error) => {
                RawValueEnum::parse_tail(cursor, attributes, modifiers)
                    .map(EnumDeclaration::RawValue)
                    .map_err(|raw_error| union_error.further(raw_error))
            }
        }
    }
}

impl UnionStyleEnum {
    fn parse_tail(
        cursor: &mut Cursor,
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
    ) -> ParseResult<Self> {
        let indirect = keyword(cursor, "indirect").is_ok();
        keyword(cursor, "enum")?;
        let name = identifier(cursor)?;
        let generic_parameters = optional(cursor, GenericParameterClause::parse);
        let inheritance = optional(cursor, TypeInheritanceClause::parse);

        punct(cursor, "{")?;
        let mut members = vec![];
        loop {
            skip_trivia(cursor)?;
            if cursor.is_at_end() || cursor.peek() == Some('}') {
                break;
            }
            members.push(UnionStyleEnumMember::parse(cursor)?);
            optional(cursor, |cursor| punct(cursor, ";"));
        }
        punct(cursor, "}")?;

        Ok(UnionStyleEnum {
            attributes,
            modifiers,
            indirect,
            name,
            generic_parameters,
            inheritance,
            members,
        })
    }
}

impl Parse for UnionStyleEnumMember {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let case_clause = attempt(cursor, |cursor| {
            let attributes = attributes(cursor);
            let indirect = keyword(cursor, "indirect").is_ok();
            keyword(cursor, "case")?;
            let cases = sep_by1(cursor, union_style_case, ",")?;
            Ok(UnionStyleEnumMember::Case { attributes, indirect, cases })
        });
        if let Ok(member) = case_clause {
            return Ok(member);
        }

        Declaration::parse(cursor)
            .map(|declaration| UnionStyleEnumMember::Declaration(Box::new(declaration)))
    }
}

fn union_style_case(cursor: &mut Cursor) -> ParseResult<UnionStyleEnumCase> {
    let name = identifier(cursor)?;
    let tuple_type = optional(cursor, TupleType::parse);
    Ok(UnionStyleEnumCase { name, tuple_type })
}

impl RawValueEnum {
    fn parse_tail(
        cursor: &mut Cursor,
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
    ) -> ParseResult<Self> {
        keyword(cursor, "enum")?;
        let name = identifier(cursor)?;
        let generic_parameters = optional(cursor, GenericParameterClause::parse);
        let inheritance = TypeInheritanceClause::parse(cursor)?;

        punct(cursor, "{")?;
        let mut members = vec![];
        loop {
            skip_trivia(cursor)?;
            if cursor.is_at_end() || cursor.peek() == Some('}') {
                break;
            }
            members.push(RawValueEnumMember::parse(cursor)?);
            optional(cursor, |cursor| punct(cursor, ";"));
        }
        punct(cursor, "}")?;

        Ok(RawValueEnum {
            attributes,
            modifiers,
            name,
            generic_parameters,
            inheritance,
            members,
        })
    }
}

impl Parse for RawValueEnumMember {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let case_clause = attempt(cursor, |cursor| {
            let attributes = attributes(cursor);
            keyword(cursor, "case")?;
            let cases = sep_by1(cursor, raw_value_case, ",")?;
            Ok(RawValueEnumMember::Case { attributes, cases })
        });
        if let Ok(member) = case_clause {
            return Ok(member);
        }

        Declaration::parse(cursor)
            .map(|declaration| RawValueEnumMember::Declaration(Box::new(declaration)))
    }
}

fn raw_value_case(cursor: &mut Cursor) -> ParseResult<RawValueEnumCase> {
    let name = identifier(cursor)?;
    let raw_value = optional(cursor, |cursor| {
        assignment_operator(cursor)?;
        raw_value_literal(cursor)
    });
    Ok(RawValueEnumCase { name, raw_value })
}

fn raw_value_literal(cursor: &mut Cursor) -> ParseResult<RawValueLiteral> {
    if let Ok(numeric) = attempt(cursor, numeric_literal) {
        return Ok(RawValueLiteral::Numeric(numeric));
    }
    if let Ok(text) = attempt(cursor, static_string_literal) {
        return Ok(RawValueLiteral::String(text));
    }
    if keyword(cursor, "true").is_ok() {
        return Ok(RawValueLiteral::Boolean(true));
    }
    if keyword(cursor, "false").is_ok() {
        return Ok(RawValueLiteral::Boolean(false));
    }
    Err(ParseError::expected("raw-value literal", cursor))
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProtocolDeclaration {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<String>,
    pub name: String,
    pub inheritance: Option<TypeInheritanceClause>,
    pub members: Vec<ProtocolMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProtocolMember {
    Property(ProtocolProperty),
    Method(FunctionDeclaration),
    Initializer(InitializerDeclaration),
    Subscript(ProtocolSubscript),
    AssociatedType(AssociatedType),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProtocolProperty {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<String>,
    pub name: String,
    pub type_annotation: TypeAnnotation,
    pub accessors: GetterSetterKeywordBlock,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProtocolSubscript {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub result: FunctionResult,
    pub accessors: GetterSetterKeywordBlock,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssociatedType {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<String>,
    pub name: String,
    pub inheritance: Option<TypeInheritanceClause>,
    pub assignment: Option<TypeName>,
}

impl ProtocolDeclaration {
    pub(crate) fn parse_tail(
        cursor: &mut Cursor,
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
    ) -> ParseResult<Self> {
        keyword(cursor, "protocol")?;
        let name = identifier(cursor)?;
        let inheritance = optional(cursor, TypeInheritanceClause::parse);

        punct(cursor, "{")?;
        let mut members = vec![];
        loop {
            skip_trivia(cursor)?;
            if cursor.is_at_end() || cursor.peek() == Some('}') {
                break;
            }
            members.push(ProtocolMember::parse(cursor)?);
            optional(cursor, |cursor| punct(cursor, ";"));
        }
        punct(cursor, "}")?;

        Ok(ProtocolDeclaration { attributes, modifiers, name, inheritance, members })
    }
}

impl Parse for ProtocolMember {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let attributes = attributes(cursor);
        let modifiers = declaration_modifiers(cursor);

        match peek_word(cursor).as_deref() {
            Some("var") => {
                keyword(cursor, "var")?;
                let name = identifier(cursor)?;
                let type_annotation = required_type_annotation(cursor)?;
                let accessors = GetterSetterKeywordBlock::parse(cursor)?;
                Ok(ProtocolMember::Property(ProtocolProperty {
                    attributes,
                    modifiers,
                    name,
                    type_annotation,
                    accessors,
                }))
            }
            Some("func") => FunctionDeclaration::parse_tail(cursor, attributes, modifiers)
                .map(ProtocolMember::Method),
            Some("init") => InitializerDeclaration::parse_tail(cursor, attributes, modifiers)
                .map(ProtocolMember::Initializer),
            Some("subscript") => {
                keyword(cursor, "subscript")?;
                let parameters = parameter_clause(cursor)?;
                let result = FunctionResult::parse(cursor)?;
                let accessors = GetterSetterKeywordBlock::parse(cursor)?;
                Ok(ProtocolMember::Subscript(ProtocolSubscript {
                    attributes,
                    modifiers,
                    parameters,
                    result,
                    accessors,
                }))
            }
            Some("typealias") => {
                keyword(cursor, "typealias")?;
                let name = identifier(cursor)?;
                let inheritance = optional(cursor, TypeInheritanceClause::parse);
                let assignment = optional(cursor, |cursor| {
                    assignment_operator(cursor)?;
                    TypeName::parse(cursor)
                });
                Ok(ProtocolMember::AssociatedType(AssociatedType {
                    attributes,
                    modifiers,
                    name,
                    inheritance,
                    assignment,
                }))
            }
            _ => Err(ParseError::expected("protocol member", cursor)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_declaration(input: &str) -> Declaration {
        crate::parser::run(input, Declaration::parse).unwrap()
    }

    #[test]
    fn test_parse_struct_with_members() {
        let Declaration::Struct(declaration) =
            parse_declaration("struct Point { var x = 0.0\n var y = 0.0 }")
        else {
            panic!("expected a struct declaration");
        };
        assert_eq!(declaration.name, "Point");
        assert_eq!(declaration.declarations.len(), 2);
    }

    #[test]
    fn test_parse_class_with_inheritance() {
        let Declaration::Class(declaration) =
            parse_declaration("class Square: Shape, Drawable { }")
        else {
            panic!("expected a class declaration");
        };
        let inheritance = declaration.inheritance.unwrap();
        assert!(!inheritance.class_requirement);
        assert_eq!(inheritance.types.len(), 2);
    }

    #[test]
    fn test_parse_union_style_enum() {
        let Declaration::Enum(EnumDeclaration::Union(declaration)) = parse_declaration(
            "indirect enum Tree { case leaf\n case node(Tree, Tree) }",
        ) else {
            panic!("expected a union-style enum");
        };
        assert!(declaration.indirect);

        let UnionStyleEnumMember::Case { cases, .. } = &declaration.members[1] else {
            panic!("expected a case member");
        };
        assert_eq!(cases[0].name, "node");
        assert_eq!(cases[0].tuple_type.as_ref().map(|t| t.elements.len()), Some(2));
    }

    #[test]
    fn test_parse_raw_value_enum() {
        let Declaration::Enum(EnumDeclaration::RawValue(declaration)) =
            parse_declaration("enum Planet: Int { case mercury = 1, venus, earth }")
        else {
            panic!("expected a raw-value enum");
        };

        let RawValueEnumMember::Case { cases, .. } = &declaration.members[0] else {
            panic!("expected a case member");
        };
        assert_eq!(cases.len(), 3);
        assert_eq!(
            cases[0].raw_value,
            Some(RawValueLiteral::Numeric("1".to_string()))
        );
        assert_eq!(cases[1].raw_value, None);
    }

    #[test]
    fn test_parse_protocol_members() {
        let Declaration::Protocol(declaration) = parse_declaration(
            "protocol Container { typealias Item\n var count: Int { get }\n func append(item: Item)\n subscript(i: Int) -> Item { get set } }",
        ) else {
            panic!("expected a protocol declaration");
        };

        assert_eq!(declaration.members.len(), 4);
        assert!(matches!(declaration.members[0], ProtocolMember::AssociatedType(_)));
        assert!(matches!(declaration.members[1], ProtocolMember::Property(_)));
        assert!(matches!(declaration.members[2], ProtocolMember::Method(_)));
        assert!(matches!(declaration.members[3], ProtocolMember::Subscript(_)));
    }

    #[test]
    fn test_parse_class_bound_protocol() {
        let Declaration::Protocol(declaration) =
            parse_declaration("protocol Delegate: class { func done() }")
        else {
            panic!("expected a protocol declaration");
        };
        assert!(declaration.inheritance.unwrap().class_requirement);
    }

    #[test]
    fn test_parse_extension() {
        let Declaration::Extension(declaration) =
            parse_declaration("extension Int: Summable { func total() -> Int { return self } }")
        else {
            panic!("expected an extension declaration");
        };
        assert_eq!(declaration.type_identifier.components[0].name, "Int");
        assert_eq!(declaration.declarations.len(), 1);
    }
}
