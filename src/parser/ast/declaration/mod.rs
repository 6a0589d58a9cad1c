//! Declarations. After attributes and modifiers, the next keyword decides
//! the production; operator declarations are recognized first because their
//! `prefix`/`postfix`/`infix` heads double as modifiers.

mod function;
mod members;
mod type_decls;
mod variable;

pub use self::function::*;
pub use self::members::*;
pub use self::type_decls::*;
pub use self::variable::*;

pub(crate) use self::function::parameter_clause;

use crate::lexer::{
    assignment_operator, identifier, keyword, operator, peek_word, punct, skip_trivia, word,
    Cursor,
};
use crate::parser::{
    combinators::{attempt, first_of, look_ahead, not_followed_by, optional, sep_by1},
    Parse, ParseError, ParseResult,
};

use super::attribute::{attributes, Attribute};
use super::expression::Expression;
use super::pattern::Pattern;
use super::type_name::{TypeName, TypeAnnotation};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Declaration {
    Import(ImportDeclaration),
    Constant(ConstantDeclaration),
    Variable(VariableDeclaration),
    TypeAlias(TypeAliasDeclaration),
    Function(FunctionDeclaration),
    Enum(EnumDeclaration),
    Struct(StructDeclaration),
    Class(ClassDeclaration),
    Protocol(ProtocolDeclaration),
    Initializer(InitializerDeclaration),
    Deinitializer(DeinitializerDeclaration),
    Extension(ExtensionDeclaration),
    Subscript(SubscriptDeclaration),
    Operator(OperatorDeclaration),
}

impl Parse for Declaration {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        skip_trivia(cursor)?;

        // `prefix`/`postfix`/`infix` double as modifiers; commit to an
        // operator declaration only when `operator` follows, and let errors
        // inside its body surface instead of backtracking them away.
        if matches!(peek_word(cursor).as_deref(), Some("prefix" | "postfix" | "infix"))
            && look_ahead(cursor, |cursor| {
                word(cursor)?;
                keyword(cursor, "operator")
            })
            .is_ok()
        {
            return OperatorDeclaration::parse(cursor).map(Declaration::Operator);
        }

        let attributes = attributes(cursor);
        let modifiers = declaration_modifiers(cursor);

        match peek_word(cursor).as_deref() {
            Some("import") => {
                ImportDeclaration::parse_tail(cursor, attributes).map(Declaration::Import)
            }
            Some("let") => ConstantDeclaration::parse_tail(cursor, attributes, modifiers)
                .map(Declaration::Constant),
            Some("var") => VariableDeclaration::parse_tail(cursor, attributes, modifiers)
                .map(Declaration::Variable),
            Some("typealias") => TypeAliasDeclaration::parse_tail(cursor, attributes, modifiers)
                .map(Declaration::TypeAlias),
            Some("func") => FunctionDeclaration::parse_tail(cursor, attributes, modifiers)
                .map(Declaration::Function),
            Some("enum" | "indirect") => {
                EnumDeclaration::parse_tail(cursor, attributes, modifiers).map(Declaration::Enum)
            }
            Some("struct") => StructDeclaration::parse_tail(cursor, attributes, modifiers)
                .map(Declaration::Struct),
            Some("class") => ClassDeclaration::parse_tail(cursor, attributes, modifiers)
                .map(Declaration::Class),
            Some("protocol") => ProtocolDeclaration::parse_tail(cursor, attributes, modifiers)
                .map(Declaration::Protocol),
            Some("init") => InitializerDeclaration::parse_tail(cursor, attributes, modifiers)
                .map(Declaration::Initializer),
            Some("deinit") => DeinitializerDeclaration::parse_tail(cursor, attributes, modifiers)
                .map(Declaration::Deinitializer),
            Some("extension") => ExtensionDeclaration::parse_tail(cursor, attributes, modifiers)
                .map(Declaration::Extension),
            Some("subscript") => SubscriptDeclaration::parse_tail(cursor, attributes, modifiers)
                .map(Declaration::Subscript),
            _ => Err(ParseError::expected("declaration", cursor)),
        }
    }
}

/// Greedily collect declaration modifiers. `class` counts only when no type
/// name follows, so `class C` stays a class declaration while `class func`
/// picks it up as a modifier.
pub(crate) fn declaration_modifiers(cursor: &mut Cursor) -> Vec<String> {
    let mut modifiers = vec![];

    loop {
        let Some(word) = peek_word(cursor) else {
            return modifiers;
        };

        let modifier = match word.as_str() {
            "class" => {
                let as_modifier = attempt(cursor, |cursor| {
                    keyword(cursor, "class")?;
                    not_followed_by(cursor, identifier, "type name")
                });
                if as_modifier.is_err() {
                    return modifiers;
                }
                "class".to_string()
            }
            "static" | "final" | "lazy" | "dynamic" | "optional" | "required" | "override"
            | "convenience" | "mutating" | "nonmutating" | "prefix" | "postfix" | "infix"
            | "weak" => {
                let _ = keyword(cursor, &word);
                word
            }
            "unowned" => {
                let _ = keyword(cursor, "unowned");
                let qualifier = attempt(cursor, |cursor| {
                    punct(cursor, "(")?;
                    let safety = if keyword(cursor, "safe").is_ok() {
                        "safe"
                    } else {
                        keyword(cursor, "unsafe")?;
                        "unsafe"
                    };
                    punct(cursor, ")")?;
                    Ok(safety)
                });
                match qualifier {
                    Ok(safety) => format!("unowned({safety})"),
                    Err(_) => "unowned".to_string(),
                }
            }
            "public" | "internal" | "private" => {
                let _ = keyword(cursor, &word);
                let setter_only = attempt(cursor, |cursor| {
                    punct(cursor, "(")?;
                    keyword(cursor, "set")?;
                    punct(cursor, ")")
                });
                if setter_only.is_ok() {
                    format!("{word}(set)")
                } else {
                    word
                }
            }
            _ => return modifiers,
        };

        modifiers.push(modifier);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImportDeclaration {
    pub attributes: Vec<Attribute>,
    /// `typealias`, `struct`, `class`, `enum`, `protocol`, `var` or `func`.
    pub kind: Option<String>,
    pub path: Vec<String>,
}

impl ImportDeclaration {
    pub(crate) fn parse_tail(
        cursor: &mut Cursor,
        attributes: Vec<Attribute>,
    ) -> ParseResult<Self> {
        keyword(cursor, "import")?;

        let kind = match peek_word(cursor).as_deref() {
            Some(kind @ ("typealias" | "struct" | "class" | "enum" | "protocol" | "var" | "func")) => {
                let kind = kind.to_string();
                keyword(cursor, &kind)?;
                Some(kind)
            }
            _ => None,
        };

        let path = sep_by1(cursor, import_path_component, ".")?;
        Ok(ImportDeclaration { attributes, kind, path })
    }
}

/// Import paths may name operators as well as modules and members.
fn import_path_component(cursor: &mut Cursor) -> ParseResult<String> {
    first_of(cursor, "import path component", &[identifier, operator])
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConstantDeclaration {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<String>,
    pub initializers: Vec<PatternInitializer>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PatternInitializer {
    pub pattern: Pattern,
    pub initializer: Option<Expression>,
}

impl ConstantDeclaration {
    pub(crate) fn parse_tail(
        cursor: &mut Cursor,
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
    ) -> ParseResult<Self> {
        keyword(cursor, "let")?;
        let initializers = sep_by1(cursor, PatternInitializer::parse, ",")?;
        Ok(ConstantDeclaration { attributes, modifiers, initializers })
    }
}

impl Parse for PatternInitializer {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let pattern = Pattern::parse(cursor)?;
        let initializer = optional(cursor, |cursor| {
            assignment_operator(cursor)?;
            Expression::parse(cursor)
        });
        Ok(PatternInitializer { pattern, initializer })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TypeAliasDeclaration {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<String>,
    pub name: String,
    pub type_name: TypeName,
}

impl TypeAliasDeclaration {
    pub(crate) fn parse_tail(
        cursor: &mut Cursor,
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
    ) -> ParseResult<Self> {
        keyword(cursor, "typealias")?;
        let name = identifier(cursor)?;
        assignment_operator(cursor)?;
        let type_name = TypeName::parse(cursor)?;
        Ok(TypeAliasDeclaration { attributes, modifiers, name, type_name })
    }
}

/// `{ declaration* }`, the body form shared by structs, classes, extensions
/// and protocols.
pub(crate) fn declaration_list(cursor: &mut Cursor) -> ParseResult<Vec<Declaration>> {
    punct(cursor, "{")?;
    let mut declarations = vec![];
    loop {
        skip_trivia(cursor)?;
        if cursor.is_at_end() || cursor.peek() == Some('}') {
            break;
        }
        declarations.push(Declaration::parse(cursor)?);
        optional(cursor, |cursor| punct(cursor, ";"));
    }
    punct(cursor, "}")?;
    Ok(declarations)
}

/// A type annotation that must be present, for the declaration forms that
/// require one.
pub(crate) fn required_type_annotation(cursor: &mut Cursor) -> ParseResult<TypeAnnotation> {
    TypeAnnotation::parse(cursor)
        .map_err(|error| error.further(ParseError::expected("type annotation", cursor)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Pattern;

    fn parse_declaration(input: &str) -> ParseResult<Declaration> {
        crate::parser::run(input, Declaration::parse)
    }

    #[test]
    fn test_parse_constant_with_annotation_and_initializer() {
        let Declaration::Constant(constant) = parse_declaration("let x: Int = 1").unwrap() else {
            panic!("expected a constant declaration");
        };

        assert_eq!(constant.initializers.len(), 1);
        let initializer = &constant.initializers[0];
        let Pattern::Identifier { ref name, ref type_annotation } = initializer.pattern else {
            panic!("expected an identifier pattern");
        };
        assert_eq!(name, "x");
        assert!(type_annotation.is_some());
        assert!(initializer.initializer.is_some());
    }

    #[test]
    fn test_parse_constant_with_multiple_initializers() {
        let Declaration::Constant(constant) = parse_declaration("let a = 1, b = 2").unwrap()
        else {
            panic!("expected a constant declaration");
        };
        assert_eq!(constant.initializers.len(), 2);
    }

    #[test]
    fn test_parse_import_variants() {
        let Declaration::Import(import) = parse_declaration("import Foundation").unwrap() else {
            panic!("expected an import declaration");
        };
        assert_eq!(import.kind, None);
        assert_eq!(import.path, vec!["Foundation"]);

        let Declaration::Import(import) =
            parse_declaration("import func Darwin.sqrt").unwrap()
        else {
            panic!("expected an import declaration");
        };
        assert_eq!(import.kind, Some("func".to_string()));
        assert_eq!(import.path, vec!["Darwin", "sqrt"]);
    }

    #[test]
    fn test_parse_typealias() {
        let Declaration::TypeAlias(alias) =
            parse_declaration("typealias Distance = Double").unwrap()
        else {
            panic!("expected a typealias declaration");
        };
        assert_eq!(alias.name, "Distance");
    }

    #[test]
    fn test_modifiers_stack_in_order() {
        let Declaration::Function(function) =
            parse_declaration("public static func f() { }").unwrap()
        else {
            panic!("expected a function declaration");
        };
        assert_eq!(function.modifiers, vec!["public", "static"]);
    }

    #[test]
    fn test_class_modifier_versus_class_declaration() {
        let Declaration::Function(function) = parse_declaration("class func f() { }").unwrap()
        else {
            panic!("expected a function declaration");
        };
        assert_eq!(function.modifiers, vec!["class"]);

        assert!(matches!(
            parse_declaration("class C { }").unwrap(),
            Declaration::Class(_)
        ));
    }

    #[test]
    fn test_parse_attributed_declaration() {
        let Declaration::Constant(constant) =
            parse_declaration("@available(*, deprecated) let x = 1").unwrap()
        else {
            panic!("expected a constant declaration");
        };
        assert_eq!(constant.attributes.len(), 1);
        assert_eq!(constant.attributes[0].name, "available");
    }
}
