//! `var` declarations in their four shapes: pattern-initializer lists,
//! read-only computed variables, computed variables with explicit accessors,
//! and stored variables with observers.

use crate::lexer::{assignment_operator, identifier, keyword, punct, skip_trivia, word, Cursor};
use crate::parser::{
    combinators::{attempt, look_ahead, not_followed_by, optional, sep_by1},
    Parse, ParseError, ParseResult,
};

use super::super::attribute::{attributes, Attribute};
use super::super::expression::Expression;
use super::super::statement::{code_block, Statement};
use super::super::type_name::TypeAnnotation;
use super::PatternInitializer;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum VariableDeclaration {
    PatternInitializers {
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
        initializers: Vec<PatternInitializer>,
    },
    /// `var name: Type { statements }`, a read-only computed variable.
    Computed {
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
        name: String,
        type_annotation: TypeAnnotation,
        body: Vec<Statement>,
    },
    /// `var name: Type { get {...} set {...} }`
    GetterSetter {
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
        name: String,
        type_annotation: TypeAnnotation,
        block: GetterSetterBlock,
    },
    /// `var name(: Type)?(= initializer)? { willSet {...} didSet {...} }`
    Observed {
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
        name: String,
        type_annotation: Option<TypeAnnotation>,
        initializer: Option<Expression>,
        observers: WillSetDidSetBlock,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetterSetterBlock {
    pub getter: GetterClause,
    pub setter: Option<SetterClause>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetterClause {
    pub attributes: Vec<Attribute>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SetterClause {
    pub attributes: Vec<Attribute>,
    /// The parenthesized name for the incoming value, when given.
    pub name: Option<String>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WillSetDidSetBlock {
    pub will_set: Option<ObserverClause>,
    pub did_set: Option<ObserverClause>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ObserverClause {
    pub attributes: Vec<Attribute>,
    pub name: Option<String>,
    pub body: Vec<Statement>,
}

impl VariableDeclaration {
    pub(crate) fn parse_tail(
        cursor: &mut Cursor,
        attributes: Vec<Attribute>,
        modifiers: Vec<String>,
    ) -> ParseResult<Self> {
        keyword(cursor, "var")?;

        // Shape 1: a plain pattern-initializer list, recognizable by the
        // absence of a block afterwards.
        let initializers = attempt(cursor, |cursor| {
            let initializers = sep_by1(cursor, PatternInitializer::parse, ",")?;
            not_followed_by(cursor, |cursor| punct(cursor, "{"), "accessor block")?;
            Ok(initializers)
        });
        if let Ok(initializers) = initializers {
            return Ok(VariableDeclaration::PatternInitializers {
                attributes,
                modifiers,
                initializers,
            });
        }

        let name = identifier(cursor)?;
        let type_annotation = optional(cursor, TypeAnnotation::parse);
        let initializer = optional(cursor, |cursor| {
            assignment_operator(cursor)?;
            Expression::parse(cursor)
        });

        match accessor_keyword_ahead(cursor).as_deref() {
            Some("willSet" | "didSet") => {
                let observers = WillSetDidSetBlock::parse(cursor)?;
                Ok(VariableDeclaration::Observed {
                    attributes,
                    modifiers,
                    name,
                    type_annotation,
                    initializer,
                    observers,
                })
            }
            Some("get" | "set") if initializer.is_none() => {
                let type_annotation = type_annotation
                    .ok_or_else(|| ParseError::expected("type annotation", cursor))?;
                let block = GetterSetterBlock::parse(cursor)?;
                Ok(VariableDeclaration::GetterSetter {
                    attributes,
                    modifiers,
                    name,
                    type_annotation,
                    block,
                })
            }
            Some(_) if initializer.is_none() => {
                let type_annotation = type_annotation
                    .ok_or_else(|| ParseError::expected("type annotation", cursor))?;
                let body = code_block(cursor)?;
                Ok(VariableDeclaration::Computed {
                    attributes,
                    modifiers,
                    name,
                    type_annotation,
                    body,
                })
            }
            _ => Err(ParseError::expected("accessor block", cursor)),
        }
    }
}

/// Peek past the `{` (and any accessor attributes) at the word that opens
/// the block, which decides between the computed and observed shapes.
pub(crate) fn accessor_keyword_ahead(cursor: &mut Cursor) -> Option<String> {
    look_ahead(cursor, |cursor| {
        punct(cursor, "{")?;
        let _ = attributes(cursor);
        word(cursor)
    })
    .ok()
}

impl Parse for GetterSetterBlock {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        punct(cursor, "{")?;

        let block = if setter_ahead(cursor) {
            let setter = SetterClause::parse(cursor)?;
            let getter = GetterClause::parse(cursor)?;
            GetterSetterBlock { getter, setter: Some(setter) }
        } else {
            let getter = GetterClause::parse(cursor)?;
            let setter = optional(cursor, SetterClause::parse);
            GetterSetterBlock { getter, setter }
        };

        punct(cursor, "}")?;
        Ok(block)
    }
}

fn setter_ahead(cursor: &mut Cursor) -> bool {
    look_ahead(cursor, |cursor| {
        let _ = attributes(cursor);
        keyword(cursor, "set")
    })
    .is_ok()
}

impl Parse for GetterClause {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let attributes = attributes(cursor);
        keyword(cursor, "get")?;
        let body = code_block(cursor)?;
        Ok(GetterClause { attributes, body })
    }
}

impl Parse for SetterClause {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        let attributes = attributes(cursor);
        keyword(cursor, "set")?;
        let name = optional(cursor, setter_name);
        let body = code_block(cursor)?;
        Ok(SetterClause { attributes, name, body })
    }
}

fn setter_name(cursor: &mut Cursor) -> ParseResult<String> {
    punct(cursor, "(")?;
    let name = identifier(cursor)?;
    punct(cursor, ")")?;
    Ok(name)
}

impl Parse for WillSetDidSetBlock {
    fn parse(cursor: &mut Cursor) -> ParseResult<Self> {
        punct(cursor, "{")?;

        let mut will_set = None;
        let mut did_set = None;
        loop {
            skip_trivia(cursor)?;
            if cursor.peek() == Some('}') {
                break;
            }

            let attributes = attributes(cursor);
            if keyword(cursor, "willSet").is_ok() {
                let name = optional(cursor, setter_name);
                let body = code_block(cursor)?;
                will_set = Some(ObserverClause { attributes, name, body });
            } else {
                keyword(cursor, "didSet")?;
                let name = optional(cursor, setter_name);
                let body = code_block(cursor)?;
                did_set = Some(ObserverClause { attributes, name, body });
            }
        }

        punct(cursor, "}")?;
        if will_set.is_none() && did_set.is_none() {
            return Err(ParseError::expected("willSet or didSet clause", cursor));
        }
        Ok(WillSetDidSetBlock { will_set, did_set })
    }
}
