//! The combinator kernel: a handful of control-flow helpers over the cursor.
//!
//! All speculation funnels through [`attempt`], which restores the cursor on
//! failure so the next alternative sees the original position. Alternation
//! via [`first_of`] keeps whichever failure reached furthest into the input,
//! so the error surfacing at the top level points at the most relevant spot.

use crate::lexer::{punct, Cursor};

use super::{ParseError, ParseResult};

/// Run `parser` speculatively: on failure the cursor is restored to where it
/// was before the call.
pub fn attempt<T>(
    cursor: &mut Cursor,
    parser: impl FnOnce(&mut Cursor) -> ParseResult<T>,
) -> ParseResult<T> {
    let checkpoint = cursor.save();
    match parser(cursor) {
        Ok(value) => Ok(value),
        Err(error) => {
            cursor.restore(checkpoint);
            Err(error)
        }
    }
}

/// Try `parser`; `None` (with the cursor untouched) if it fails.
pub fn optional<T>(
    cursor: &mut Cursor,
    parser: impl FnOnce(&mut Cursor) -> ParseResult<T>,
) -> Option<T> {
    attempt(cursor, parser).ok()
}

/// Greedily apply `parser` as often as it succeeds.
pub fn many<T>(
    cursor: &mut Cursor,
    mut parser: impl FnMut(&mut Cursor) -> ParseResult<T>,
) -> Vec<T> {
    let mut items = vec![];
    while let Ok(item) = attempt(cursor, &mut parser) {
        items.push(item);
    }
    items
}

/// Like [`many`], but the first application must succeed.
pub fn many1<T>(
    cursor: &mut Cursor,
    mut parser: impl FnMut(&mut Cursor) -> ParseResult<T>,
) -> ParseResult<Vec<T>> {
    let first = parser(cursor)?;
    let mut items = vec![first];
    while let Ok(item) = attempt(cursor, &mut parser) {
        items.push(item);
    }
    Ok(items)
}

/// One or more `parser` results separated by the punctuation `separator`.
/// A separator without a following item is left unconsumed.
pub fn sep_by1<T>(
    cursor: &mut Cursor,
    mut parser: impl FnMut(&mut Cursor) -> ParseResult<T>,
    separator: &str,
) -> ParseResult<Vec<T>> {
    let mut items = vec![parser(cursor)?];
    loop {
        let checkpoint = cursor.save();
        if punct(cursor, separator).is_err() {
            break;
        }
        match attempt(cursor, &mut parser) {
            Ok(item) => items.push(item),
            Err(_) => {
                cursor.restore(checkpoint);
                break;
            }
        }
    }
    Ok(items)
}

/// Zero or more `parser` results separated by `separator`.
pub fn sep_by<T>(
    cursor: &mut Cursor,
    parser: impl FnMut(&mut Cursor) -> ParseResult<T>,
    separator: &str,
) -> Vec<T> {
    attempt(cursor, |cursor| sep_by1(cursor, parser, separator)).unwrap_or_default()
}

/// One or more operands joined left-associatively: `a op b op c` becomes
/// `(a op b) op c`. The operator parser yields the combining function.
pub fn chain_left1<T, C>(
    cursor: &mut Cursor,
    mut operand: impl FnMut(&mut Cursor) -> ParseResult<T>,
    mut operator: impl FnMut(&mut Cursor) -> ParseResult<C>,
) -> ParseResult<T>
where
    C: FnOnce(T, T) -> T,
{
    let mut left = operand(cursor)?;
    while let Ok(combine) = attempt(cursor, &mut operator) {
        let right = operand(cursor)?;
        left = combine(left, right);
    }
    Ok(left)
}

/// Like [`chain_left1`], but right-associative: `a op b op c` becomes
/// `a op (b op c)`.
pub fn chain_right1<T, C>(
    cursor: &mut Cursor,
    mut operand: impl FnMut(&mut Cursor) -> ParseResult<T>,
    mut operator: impl FnMut(&mut Cursor) -> ParseResult<C>,
) -> ParseResult<T>
where
    C: FnOnce(T, T) -> T,
{
    let mut operands = vec![operand(cursor)?];
    let mut combines = vec![];
    while let Ok(combine) = attempt(cursor, &mut operator) {
        combines.push(combine);
        operands.push(operand(cursor)?);
    }

    let Some(mut result) = operands.pop() else {
        return Err(ParseError::expected("operand", cursor));
    };
    while let (Some(combine), Some(left)) = (combines.pop(), operands.pop()) {
        result = combine(left, result);
    }
    Ok(result)
}

/// Run `parser` and restore the cursor regardless of the outcome.
pub fn look_ahead<T>(
    cursor: &mut Cursor,
    parser: impl FnOnce(&mut Cursor) -> ParseResult<T>,
) -> ParseResult<T> {
    let checkpoint = cursor.save();
    let result = parser(cursor);
    cursor.restore(checkpoint);
    result
}

/// Succeed (consuming nothing) exactly when `parser` fails here.
pub fn not_followed_by<T>(
    cursor: &mut Cursor,
    parser: impl FnOnce(&mut Cursor) -> ParseResult<T>,
    what: &str,
) -> ParseResult<()> {
    match look_ahead(cursor, parser) {
        Ok(_) => Err(ParseError {
            message: format!("unexpected {what}"),
            position: Some(cursor.position()),
        }),
        Err(_) => Ok(()),
    }
}

/// Parse with trailing closures suppressed: used for the expressions in
/// statement headers, whose `{` belongs to the statement body.
pub fn without_trailing_closures<T>(
    cursor: &mut Cursor,
    parser: impl FnOnce(&mut Cursor) -> ParseResult<T>,
) -> ParseResult<T> {
    let previous = cursor.set_trailing_closures(false);
    let result = parser(cursor);
    cursor.set_trailing_closures(previous);
    result
}

/// Parse with trailing closures re-enabled: inside parentheses and brackets
/// a `{` is unambiguous again.
pub fn with_trailing_closures<T>(
    cursor: &mut Cursor,
    parser: impl FnOnce(&mut Cursor) -> ParseResult<T>,
) -> ParseResult<T> {
    let previous = cursor.set_trailing_closures(true);
    let result = parser(cursor);
    cursor.set_trailing_closures(previous);
    result
}

/// Left-biased alternation over non-capturing parsers. Every alternative is
/// run speculatively; the error kept is the one that consumed the most input
/// before failing, falling back to `what` when none of them got anywhere.
pub fn first_of<T>(
    cursor: &mut Cursor,
    what: &str,
    alternatives: &[fn(&mut Cursor) -> ParseResult<T>],
) -> ParseResult<T> {
    let start = cursor.position().offset;
    let mut furthest: Option<ParseError> = None;

    for alternative in alternatives {
        match attempt(cursor, alternative) {
            Ok(value) => return Ok(value),
            Err(error) => {
                furthest = Some(match furthest {
                    Some(kept) => kept.further(error),
                    None => error,
                });
            }
        }
    }

    match furthest {
        Some(error) if error.position.is_some_and(|p| p.offset > start) => Err(error),
        _ => Err(ParseError::expected(what, cursor)),
    }
}
