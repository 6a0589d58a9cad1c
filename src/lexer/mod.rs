//! Character-level scanners for Swift 2.1 source text.
//!
//! Every scanner skips leading whitespace and comments, then either consumes
//! a complete token and returns its payload or restores the cursor to where
//! it started and fails. Backtracking across whole productions is layered on
//! top of this in the parser's combinators.

mod cursor;
mod keywords;

pub use cursor::*;
pub use keywords::*;

use crate::parser::{
    ast::{InterpolationItem, StringLiteral},
    Parse, ParseError, ParseResult,
};

pub(crate) fn is_identifier_head(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Head characters of custom operators, per the Swift grammar: a handful of
/// ASCII symbols plus a collection of symbol and dingbat ranges.
pub(crate) fn is_operator_head(c: char) -> bool {
    matches!(
        c,
        '=' | '/'
            | '-'
            | '+'
            | '!'
            | '*'
            | '%'
            | '<'
            | '>'
            | '&'
            | '|'
            | '^'
            | '~'
            | '?'
            | '\u{00A1}'..='\u{00A7}'
            | '\u{00A9}'
            | '\u{00AB}'
            | '\u{00AC}'
            | '\u{00AE}'
            | '\u{00B0}'..='\u{00B1}'
            | '\u{00B6}'
            | '\u{00BB}'
            | '\u{00BF}'
            | '\u{00D7}'
            | '\u{00F7}'
            | '\u{2016}'..='\u{2017}'
            | '\u{2020}'..='\u{2027}'
            | '\u{2030}'..='\u{203E}'
            | '\u{2041}'..='\u{2053}'
            | '\u{2055}'..='\u{205E}'
            | '\u{2190}'..='\u{23FF}'
            | '\u{2500}'..='\u{2775}'
            | '\u{2794}'..='\u{2BFF}'
            | '\u{2E00}'..='\u{2E7F}'
            | '\u{3001}'..='\u{3003}'
            | '\u{3008}'..='\u{3030}'
    )
}

/// Tail characters add the combining-mark ranges to the head set.
pub(crate) fn is_operator_char(c: char) -> bool {
    is_operator_head(c)
        || matches!(
            c,
            '\u{0300}'..='\u{036F}'
                | '\u{1DC0}'..='\u{1DFF}'
                | '\u{20D0}'..='\u{20FF}'
                | '\u{FE00}'..='\u{FE0F}'
                | '\u{FE20}'..='\u{FE2F}'
                | '\u{E0100}'..='\u{E01FF}'
        )
}

/// Skip whitespace, line comments and (arbitrarily nested) block comments.
///
/// Fails only on an unterminated block comment.
pub fn skip_trivia(cursor: &mut Cursor) -> ParseResult<()> {
    loop {
        while cursor.next_if(|c| c.is_whitespace()).is_some() {}

        if cursor.peek() != Some('/') {
            return Ok(());
        }

        match cursor.peek_ahead(1) {
            Some('/') => {
                while cursor.next_if(|c| c != '\n').is_some() {}
            }
            Some('*') => {
                cursor.next();
                cursor.next();
                let mut depth = 1usize;
                loop {
                    match cursor.next() {
                        None => {
                            return Err(ParseError {
                                message: "unterminated block comment".to_string(),
                                position: Some(cursor.position()),
                            })
                        }
                        Some('/') if cursor.peek() == Some('*') => {
                            cursor.next();
                            depth += 1;
                        }
                        Some('*') if cursor.peek() == Some('/') => {
                            cursor.next();
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        Some(_) => {}
                    }
                }
            }
            _ => return Ok(()),
        }
    }
}

/// Scan an identifier-shaped word without the reserved-word check.
pub(crate) fn word(cursor: &mut Cursor) -> ParseResult<String> {
    let start = cursor.save();
    skip_trivia(cursor)?;

    let Some(first) = cursor.next_if(is_identifier_head) else {
        let error = ParseError::expected("identifier", cursor);
        cursor.restore(start);
        return Err(error);
    };

    let mut name = String::from(first);
    while let Some(c) = cursor.next_if(is_identifier_char) {
        name.push(c);
    }

    Ok(name)
}

/// Peek at the next identifier-shaped word without consuming anything.
pub(crate) fn peek_word(cursor: &mut Cursor) -> Option<String> {
    let start = cursor.save();
    let result = word(cursor).ok();
    cursor.restore(start);
    result
}

/// Scan an identifier, rejecting every reserved word.
pub fn identifier(cursor: &mut Cursor) -> ParseResult<String> {
    let start = cursor.save();
    let name = word(cursor)?;

    if is_reserved(&name) {
        let error = ParseError {
            message: format!("'{name}' is a reserved word"),
            position: Some(cursor.position()),
        };
        cursor.restore(start);
        return Err(error);
    }

    Ok(name)
}

/// Match the exact keyword `kw` at a word boundary.
///
/// Also used for the compiler-control words (`#if`, `#available`, ...); the
/// boundary check keeps `#if` from matching a prefix of `#ifdef`-style input.
pub fn keyword(cursor: &mut Cursor, kw: &str) -> ParseResult<()> {
    let start = cursor.save();
    skip_trivia(cursor)?;

    for expected in kw.chars() {
        if cursor.next_if(|c| c == expected).is_none() {
            let error = ParseError::expected(&format!("'{kw}'"), cursor);
            cursor.restore(start);
            return Err(error);
        }
    }

    let boundary_sensitive = kw.chars().last().is_some_and(is_identifier_char);
    if boundary_sensitive && cursor.peek().is_some_and(is_identifier_char) {
        let error = ParseError::expected(&format!("'{kw}'"), cursor);
        cursor.restore(start);
        return Err(error);
    }

    Ok(())
}

/// Match the exact punctuation sequence `symbol`.
pub fn punct(cursor: &mut Cursor, symbol: &str) -> ParseResult<()> {
    let start = cursor.save();
    skip_trivia(cursor)?;

    for expected in symbol.chars() {
        if cursor.next_if(|c| c == expected).is_none() {
            let error = ParseError::expected(&format!("'{symbol}'"), cursor);
            cursor.restore(start);
            return Err(error);
        }
    }

    Ok(())
}

/// Scan an operator: a maximal run of operator characters, or a
/// backtick-quoted character sequence.
pub fn operator(cursor: &mut Cursor) -> ParseResult<String> {
    let start = cursor.save();
    skip_trivia(cursor)?;

    if cursor.next_if(|c| c == '`').is_some() {
        let mut name = String::new();
        while let Some(c) = cursor.next_if(|c| c != '`' && c != '\n') {
            name.push(c);
        }
        if name.is_empty() || cursor.next_if(|c| c == '`').is_none() {
            let error = ParseError::expected("backtick-quoted operator", cursor);
            cursor.restore(start);
            return Err(error);
        }
        return Ok(name);
    }

    let Some(first) = cursor.next_if(is_operator_head) else {
        let error = ParseError::expected("operator", cursor);
        cursor.restore(start);
        return Err(error);
    };

    let mut name = String::from(first);
    while let Some(c) = cursor.next_if(is_operator_char) {
        name.push(c);
    }

    Ok(name)
}

/// Match a standalone `=`: one that is not the head of a longer operator
/// such as `==` or `=>`.
pub fn assignment_operator(cursor: &mut Cursor) -> ParseResult<()> {
    let start = cursor.save();
    skip_trivia(cursor)?;

    if cursor.next_if(|c| c == '=').is_none() || cursor.peek().is_some_and(is_operator_char) {
        let error = ParseError::expected("'='", cursor);
        cursor.restore(start);
        return Err(error);
    }

    Ok(())
}

/// Scan a plain run of decimal digits.
pub fn decimal_digits(cursor: &mut Cursor) -> ParseResult<String> {
    let start = cursor.save();
    skip_trivia(cursor)?;

    let mut digits = String::new();
    while let Some(c) = cursor.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }

    if digits.is_empty() {
        let error = ParseError::expected("decimal digits", cursor);
        cursor.restore(start);
        return Err(error);
    }

    Ok(digits)
}

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// Scan a numeric literal and return its exact textual form: one of the four
/// integer radices (with `_` separators), decimal floats with fraction and
/// exponent, or hexadecimal floats with a mandatory binary exponent. A
/// leading `-` is recorded verbatim.
pub fn numeric_literal(cursor: &mut Cursor) -> ParseResult<String> {
    let start = cursor.save();
    skip_trivia(cursor)?;

    let mut text = String::new();
    if cursor.peek() == Some('-') && cursor.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) {
        cursor.next();
        text.push('-');
    }

    match (cursor.peek(), cursor.peek_ahead(1)) {
        (Some('0'), Some('b')) => {
            cursor.next();
            cursor.next();
            text.push_str("0b");
            scan_digit_run(cursor, &mut text, start, |c| matches!(c, '0' | '1' | '_'), "binary digit")?;
        }
        (Some('0'), Some('o')) => {
            cursor.next();
            cursor.next();
            text.push_str("0o");
            scan_digit_run(cursor, &mut text, start, |c| matches!(c, '0'..='7' | '_'), "octal digit")?;
        }
        (Some('0'), Some('x')) => {
            cursor.next();
            cursor.next();
            text.push_str("0x");
            scan_digit_run(cursor, &mut text, start, |c| is_hex_digit(c) || c == '_', "hexadecimal digit")?;
            scan_hex_float_suffix(cursor, &mut text);
        }
        _ => {
            scan_digit_run(cursor, &mut text, start, |c| c.is_ascii_digit() || c == '_', "decimal digit")?;
            if cursor.peek() == Some('.') && cursor.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) {
                cursor.next();
                text.push('.');
                while let Some(c) = cursor.next_if(|c| c.is_ascii_digit() || c == '_') {
                    text.push(c);
                }
            }
            scan_exponent(cursor, &mut text, |c| matches!(c, 'e' | 'E'));
        }
    }

    Ok(text)
}

fn scan_digit_run(
    cursor: &mut Cursor,
    text: &mut String,
    start: Checkpoint,
    accept: impl Fn(char) -> bool,
    what: &str,
) -> ParseResult<()> {
    let mut any = false;
    while let Some(c) = cursor.next_if(&accept) {
        text.push(c);
        any = true;
    }
    if !any {
        let error = ParseError::expected(what, cursor);
        cursor.restore(start);
        return Err(error);
    }
    Ok(())
}

/// Optional `.hex+` fraction followed by a mandatory `p`/`P` exponent. If
/// the exponent is missing, the whole suffix is rolled back: a plain
/// hexadecimal integer followed by a member access must still parse.
fn scan_hex_float_suffix(cursor: &mut Cursor, text: &mut String) {
    let mark = cursor.save();
    let mut suffix = String::new();

    if cursor.peek() == Some('.') && cursor.peek_ahead(1).is_some_and(is_hex_digit) {
        cursor.next();
        suffix.push('.');
        while let Some(c) = cursor.next_if(|c| is_hex_digit(c) || c == '_') {
            suffix.push(c);
        }
    }

    let exponent_mark = cursor.save();
    let mut exponent = String::new();
    if let Some(p) = cursor.next_if(|c| matches!(c, 'p' | 'P')) {
        exponent.push(p);
        if let Some(sign) = cursor.next_if(|c| matches!(c, '+' | '-')) {
            exponent.push(sign);
        }
        let mut any = false;
        while let Some(c) = cursor.next_if(|c| c.is_ascii_digit()) {
            exponent.push(c);
            any = true;
        }
        if !any {
            cursor.restore(exponent_mark);
            exponent.clear();
        }
    }

    if exponent.is_empty() {
        cursor.restore(mark);
    } else {
        text.push_str(&suffix);
        text.push_str(&exponent);
    }
}

fn scan_exponent(cursor: &mut Cursor, text: &mut String, marker: impl Fn(char) -> bool) {
    let mark = cursor.save();
    let mut exponent = String::new();

    if let Some(e) = cursor.next_if(&marker) {
        exponent.push(e);
        if let Some(sign) = cursor.next_if(|c| matches!(c, '+' | '-')) {
            exponent.push(sign);
        }
        let mut any = false;
        while let Some(c) = cursor.next_if(|c| c.is_ascii_digit() || c == '_') {
            exponent.push(c);
            any = true;
        }
        if any {
            text.push_str(&exponent);
            return;
        }
    }

    cursor.restore(mark);
}

/// Scan a string literal. Escape sequences are resolved into the text
/// chunks; each `\(...)` interpolation recursively parses a full embedded
/// expression, so the result alternates text chunks and expressions in
/// source order.
pub fn string_literal(cursor: &mut Cursor) -> ParseResult<StringLiteral> {
    let start = cursor.save();
    skip_trivia(cursor)?;

    if cursor.next_if(|c| c == '"').is_none() {
        let error = ParseError::expected("string literal", cursor);
        cursor.restore(start);
        return Err(error);
    }

    let mut items: Vec<InterpolationItem> = vec![];
    let mut text = String::new();
    let mut interpolated = false;

    loop {
        match cursor.next() {
            None => {
                let error = ParseError {
                    message: "unterminated string literal".to_string(),
                    position: Some(cursor.position()),
                };
                cursor.restore(start);
                return Err(error);
            }
            Some('"') => break,
            Some('\\') => match cursor.next() {
                Some('(') => {
                    interpolated = true;
                    if !text.is_empty() {
                        items.push(InterpolationItem::Text(std::mem::take(&mut text)));
                    }
                    let expression = match crate::parser::combinators::with_trailing_closures(
                        cursor,
                        crate::parser::ast::Expression::parse,
                    ) {
                        Ok(expression) => expression,
                        Err(error) => {
                            cursor.restore(start);
                            return Err(error);
                        }
                    };
                    if let Err(error) = punct(cursor, ")") {
                        cursor.restore(start);
                        return Err(error);
                    }
                    items.push(InterpolationItem::Expression(expression));
                }
                Some('0') => text.push('\0'),
                Some('\\') => text.push('\\'),
                Some('t') => text.push('\t'),
                Some('n') => text.push('\n'),
                Some('r') => text.push('\r'),
                Some('"') => text.push('"'),
                Some('\'') => text.push('\''),
                Some('u') => match scan_unicode_escape(cursor) {
                    Ok(c) => text.push(c),
                    Err(error) => {
                        cursor.restore(start);
                        return Err(error);
                    }
                },
                _ => {
                    let error = ParseError {
                        message: "invalid escape sequence in string literal".to_string(),
                        position: Some(cursor.position()),
                    };
                    cursor.restore(start);
                    return Err(error);
                }
            },
            Some(c) => text.push(c),
        }
    }

    if interpolated {
        if !text.is_empty() {
            items.push(InterpolationItem::Text(text));
        }
        Ok(StringLiteral::Interpolated(items))
    } else {
        Ok(StringLiteral::Static(text))
    }
}

/// `\u` followed by one to eight hex digits naming a Unicode scalar.
fn scan_unicode_escape(cursor: &mut Cursor) -> ParseResult<char> {
    let mut value: u32 = 0;
    let mut count = 0;

    while count < 8 {
        let Some(digit) = cursor.next_if(is_hex_digit) else {
            break;
        };
        value = value * 16 + digit.to_digit(16).unwrap_or(0);
        count += 1;
    }

    if count == 0 {
        return Err(ParseError {
            message: "expected hexadecimal digit in unicode escape".to_string(),
            position: Some(cursor.position()),
        });
    }

    char::from_u32(value).ok_or_else(|| ParseError {
        message: format!("invalid unicode scalar U+{value:X} in escape sequence"),
        position: Some(cursor.position()),
    })
}

/// Scan a string literal and require it to be free of interpolations.
pub fn static_string_literal(cursor: &mut Cursor) -> ParseResult<String> {
    let start = cursor.save();
    match string_literal(cursor)? {
        StringLiteral::Static(text) => Ok(text),
        StringLiteral::Interpolated(_) => {
            let error = ParseError::expected("string literal without interpolation", cursor);
            cursor.restore(start);
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_trivia_handles_nested_block_comments() {
        let mut cursor = Cursor::new("/* outer /* inner */ still outer */x");
        skip_trivia(&mut cursor).unwrap();
        assert_eq!(cursor.peek(), Some('x'));
    }

    #[test]
    fn test_skip_trivia_fails_on_unterminated_block_comment() {
        let mut cursor = Cursor::new("/* /* closed */ left open");
        assert!(skip_trivia(&mut cursor).is_err());
    }

    #[test]
    fn test_skip_trivia_consumes_line_comments() {
        let mut cursor = Cursor::new("  // a comment\n  next");
        skip_trivia(&mut cursor).unwrap();
        assert_eq!(cursor.peek(), Some('n'));
    }

    #[test]
    fn test_identifier_rejects_reserved_words() {
        for reserved in ["let", "func", "willSet", "Self", "_"] {
            let mut cursor = Cursor::new(reserved);
            assert!(identifier(&mut cursor).is_err(), "{reserved} should be rejected");
            assert_eq!(cursor.position().offset, 0);
        }
    }

    #[test]
    fn test_identifier_accepts_unicode_letters() {
        let mut cursor = Cursor::new("größe2");
        assert_eq!(identifier(&mut cursor).unwrap(), "größe2");
    }

    #[test]
    fn test_keyword_requires_word_boundary() {
        let mut cursor = Cursor::new("iffy");
        assert!(keyword(&mut cursor, "if").is_err());
        assert_eq!(cursor.position().offset, 0);

        let mut cursor = Cursor::new("if(");
        assert!(keyword(&mut cursor, "if").is_ok());
    }

    #[test]
    fn test_operator_takes_maximal_run() {
        let mut cursor = Cursor::new("==>x");
        assert_eq!(operator(&mut cursor).unwrap(), "==>");
        assert_eq!(cursor.peek(), Some('x'));
    }

    #[test]
    fn test_operator_accepts_unicode_symbols() {
        let mut cursor = Cursor::new("±");
        assert_eq!(operator(&mut cursor).unwrap(), "±");
    }

    #[test]
    fn test_assignment_operator_is_a_standalone_equals() {
        let mut cursor = Cursor::new("= x");
        assert!(assignment_operator(&mut cursor).is_ok());

        let mut cursor = Cursor::new("== x");
        assert!(assignment_operator(&mut cursor).is_err());
        assert_eq!(cursor.position().offset, 0);
    }

    #[test]
    fn test_numeric_literal_radices_and_separators() {
        for literal in ["0b1010_1010", "0o7_55", "0xFF_EC", "1_000_000", "-42"] {
            let mut cursor = Cursor::new(literal);
            assert_eq!(numeric_literal(&mut cursor).unwrap(), literal);
            assert!(cursor.is_at_end());
        }
    }

    #[test]
    fn test_numeric_literal_floats() {
        for literal in ["1.25", "2.5e-3", "1e9", "0x1.8p3", "0xAp-2"] {
            let mut cursor = Cursor::new(literal);
            assert_eq!(numeric_literal(&mut cursor).unwrap(), literal);
            assert!(cursor.is_at_end(), "{literal} not fully consumed");
        }
    }

    #[test]
    fn test_numeric_literal_leaves_member_access_alone() {
        let mut cursor = Cursor::new("1.foo");
        assert_eq!(numeric_literal(&mut cursor).unwrap(), "1");
        assert_eq!(cursor.peek(), Some('.'));

        // A hex fraction without an exponent is not a float.
        let mut cursor = Cursor::new("0x1.8");
        assert_eq!(numeric_literal(&mut cursor).unwrap(), "0x1");
        assert_eq!(cursor.peek(), Some('.'));
    }

    #[test]
    fn test_numeric_literal_rejects_empty_digit_runs() {
        let mut cursor = Cursor::new("0b");
        assert!(numeric_literal(&mut cursor).is_err());
        assert_eq!(cursor.position().offset, 0);
    }

    #[test]
    fn test_string_literal_resolves_escapes() {
        let mut cursor = Cursor::new(r#""a\tb\n\u48i""#);
        let literal = string_literal(&mut cursor).unwrap();
        assert_eq!(literal, StringLiteral::Static("a\tb\nHi".to_string()));
    }

    #[test]
    fn test_string_literal_unterminated_fails() {
        let mut cursor = Cursor::new("\"no end");
        assert!(string_literal(&mut cursor).is_err());
        assert_eq!(cursor.position().offset, 0);
    }

    #[test]
    fn test_string_literal_interpolation_preserves_order() {
        let mut cursor = Cursor::new(r#""a\(x)b\(y)""#);
        let StringLiteral::Interpolated(items) = string_literal(&mut cursor).unwrap() else {
            panic!("expected an interpolated literal");
        };

        assert_eq!(items.len(), 4);
        assert_eq!(items[0], InterpolationItem::Text("a".to_string()));
        assert!(matches!(items[1], InterpolationItem::Expression(_)));
        assert_eq!(items[2], InterpolationItem::Text("b".to_string()));
        assert!(matches!(items[3], InterpolationItem::Expression(_)));
    }
}
