//! Member-style declarations: initializers, deinitializers, subscripts and
//! operator declarations, plus the keyword accessor blocks protocols and
//! subscripts use.

use crate::lexer::{decimal_digits, keyword, operator, peek_word, punct, Cursor};
use crate::parser::{
    combinators::{attempt, optional},
    Parse, ParseError, ParseResult,
};

use super::super::attribute::{attributes, Attribute};
use super::super::generics::GenericParameterClause;
use super::super::statement::{code_block, Statement};
use super::super::type_name::{throws_kind, FunctionResult, ThrowsKind};
use super::variable::{accessor_keyword_ahead, GetterSetterBlock};
use super::{parameter_clause, Parameter};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InitializerDeclaration {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<String>,
    pub kind: InitializerKind,
    pub generic_parameters: Option<GenericParameterClause>,
    pub parameters: Vec<Parameter>,
    pub throws: Option<ThrowsKind>,
    /// Protocol requirements carry no body.
    pub body: Option<Vec<Statement>>,
}

/// `init`, `init?` or `init!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum InitializerKind {
    Standard,
    Failable,
    ImplicitlyUnwrapped,
}

impl InitializerDeclaration {
    pub(crate) fn parse_tail(
        cursor: &mut Cursor,
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
    ) -> ParseResult<Self> {
        keyword(cursor, "init")?;
        let kind = if cursor.next_if(|c| c == '?').is_some() {
            InitializerKind::Failable
        } else if cursor.next_if(|c| c == '!').is_some() {
            InitializerKind::ImplicitlyUnwrapped
        } else {
            InitializerKind::Standard
        };

        let generic_parameters = optional(cursor, GenericParameterClause::parse);
        let parameters = parameter_clause(cursor)?;
        let throws = throws_kind(cursor);
        let body = optional(cursor, code_block);

        Ok(InitializerDeclaration {
            attributes,
            modifiers,
            kind,
            generic_parameters,
            parameters,
            throws,
            body,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeinitializerDeclaration {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<String>,
    pub body: Vec<Statement>,
}

impl DeinitializerDeclaration {
    pub(crate) fn parse_tail(
        cursor: &mut Cursor,
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
    ) -> ParseResult<Self> {
        keyword(cursor, "deinit")?;
        let body = code_block(cursor)?;
        Ok(DeinitializerDeclaration { attributes, modifiers, body })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubscriptDeclaration {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub result: FunctionResult,
    pub body: SubscriptBody,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SubscriptBody {
    /// A bare code block reads as the getter.
    CodeBlock(Vec<Statement>),
    GetterSetter(GetterSetterBlock),
    Keyword(GetterSetterKeywordBlock),
}

impl SubscriptDeclaration {
    pub(crate) fn parse_tail(
        cursor: &mut Cursor,
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
    ) -> ParseResult<Self> {
        keyword(cursor, "subscript")?;
        let parameters = parameter_clause(cursor)?;
        let result = FunctionResult::parse(cursor)?;

        let body = if matches!(accessor_keyword_ahead(cursor).as_deref(), Some("get" | "set")) {
            match attempt(cursor, GetterSetterBlock::parse) {
                Ok(block) => SubscriptBody::GetterSetter(block),
                Err(_) => SubscriptBody::Keyword(GetterSetterKeywordBlock::parse(cursor)?),
            }
        } else {
            SubscriptBody::CodeBlock(code_block(cursor)?)
        };

        Ok(SubscriptDeclaration { attributes, modifiers, parameters, result, body })
    }
}

/// `{ get set? }` or `{ set get }` with only accessor keywords inside, the
/// form protocol requirements use.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetterSetterKeywordBlock {
    pub getter: AccessorKeywordClause,
    pub setter: Option<AccessorKeywordClause>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AccessorKeywordClause {
    pub attributes: Vec<Attribute>,
}

impl Parse for GetterSetterKeywordBlock {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        punct(cursor, "{")?;

        let first_attributes = attributes(cursor);
        let block = if keyword(cursor, "set").is_ok() {
            let setter = AccessorKeywordClause { attributes: first_attributes };
            let getter_attributes = attributes(cursor);
            keyword(cursor, "get")?;
            GetterSetterKeywordBlock {
                getter: AccessorKeywordClause { attributes: getter_attributes },
                setter: Some(setter),
            }
        } else {
            keyword(cursor, "get")?;
            let getter = AccessorKeywordClause { attributes: first_attributes };
            let setter = optional(cursor, |cursor| {
                let attributes = attributes(cursor);
                keyword(cursor, "set")?;
                Ok(AccessorKeywordClause { attributes })
            });
            GetterSetterKeywordBlock { getter, setter }
        };

        punct(cursor, "}")?;
        Ok(block)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OperatorDeclaration {
    Prefix {
        name: String,
    },
    Postfix {
        name: String,
    },
    Infix {
        name: String,
        precedence: Option<u8>,
        associativity: Option<Associativity>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Associativity {
    Left,
    Right,
    None,
}

impl Parse for OperatorDeclaration {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        if keyword(cursor, "prefix").is_ok() {
            keyword(cursor, "operator")?;
            let name = operator(cursor)?;
            punct(cursor, "{")?;
            punct(cursor, "}")?;
            return Ok(OperatorDeclaration::Prefix { name });
        }

        if keyword(cursor, "postfix").is_ok() {
            keyword(cursor, "operator")?;
            let name = operator(cursor)?;
            punct(cursor, "{")?;
            punct(cursor, "}")?;
            return Ok(OperatorDeclaration::Postfix { name });
        }

        keyword(cursor, "infix")?;
        keyword(cursor, "operator")?;
        let name = operator(cursor)?;
        punct(cursor, "{")?;

        let precedence = if peek_word(cursor).as_deref() == Some("precedence") {
            keyword(cursor, "precedence")?;
            Some(precedence_level(cursor)?)
        } else {
            None
        };

        let associativity = if peek_word(cursor).as_deref() == Some("associativity") {
            keyword(cursor, "associativity")?;
            Some(associativity_value(cursor)?)
        } else {
            None
        };

        punct(cursor, "}")?;
        Ok(OperatorDeclaration::Infix { name, precedence, associativity })
    }
}

/// Precedence levels live in 0...255; anything else is rejected outright.
fn precedence_level(cursor: &mut Cursor) -> ParseResult<u8> {
    let digits = decimal_digits(cursor)?;
    match digits.parse::<u16>() {
        Ok(level) if level <= 255 => Ok(level as u8),
        _ => Err(ParseError {
            message: format!("precedence level '{digits}' must be between 0 and 255"),
            position: Some(cursor.position()),
        }),
    }
}

fn associativity_value(cursor: &mut Cursor) -> ParseResult<Associativity> {
    if keyword(cursor, "left").is_ok() {
        return Ok(Associativity::Left);
    }
    if keyword(cursor, "right").is_ok() {
        return Ok(Associativity::Right);
    }
    keyword(cursor, "none")?;
    Ok(Associativity::None)
}
