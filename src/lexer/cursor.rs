/// A position inside the source text, tracked in characters.
///
/// `line` and `col` are 1-based, `offset` counts code points from the start
/// of the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

/// An opaque, O(1) checkpoint into a [`Cursor`].
///
/// Restoring a checkpoint rewinds the cursor to the exact state it had when
/// the checkpoint was taken. Checkpoints stay valid for the lifetime of the
/// cursor they were taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    index: usize,
    line: usize,
    col: usize,
}

/// Struct for iterating over the characters of the source text.
///
/// The cursor never mutates the underlying input; it carries the current
/// index, the line/column bookkeeping derived from it, and the
/// trailing-closure mode bit.
#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    index: usize,
    line: usize,
    col: usize,
    allow_trailing_closure: bool,
}

impl Cursor {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            index: 0,
            line: 1,
            col: 1,
            allow_trailing_closure: true,
        }
    }

    /// Peek at the next character (if present).
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    /// Peek `n` characters past the next one.
    pub fn peek_ahead(&self, n: usize) -> Option<char> {
        self.chars.get(self.index + n).copied()
    }

    /// Consume and return the next character (if present).
    pub fn next(&mut self) -> Option<char> {
        let item = self.chars.get(self.index).copied();
        if let Some(c) = item {
            self.index += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        item
    }

    /// Consume the next character only if it satisfies `func`.
    pub fn next_if(&mut self, func: impl FnOnce(char) -> bool) -> Option<char> {
        match self.peek() {
            Some(c) if func(c) => self.next(),
            _ => None,
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.chars.len()
    }

    pub fn save(&self) -> Checkpoint {
        Checkpoint {
            index: self.index,
            line: self.line,
            col: self.col,
        }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.index = checkpoint.index;
        self.line = checkpoint.line;
        self.col = checkpoint.col;
    }

    pub fn position(&self) -> Position {
        Position {
            offset: self.index,
            line: self.line,
            col: self.col,
        }
    }

    /// Whether a `{` after a call may be consumed as a trailing closure.
    /// Statement headers (conditions, for headers, switch scrutinees)
    /// suppress this so their body block is not swallowed; parentheses and
    /// brackets re-enable it.
    pub(crate) fn trailing_closures_allowed(&self) -> bool {
        self.allow_trailing_closure
    }

    /// Set the trailing-closure mode, returning the previous value so the
    /// caller can restore it.
    pub(crate) fn set_trailing_closures(&mut self, allowed: bool) -> bool {
        std::mem::replace(&mut self.allow_trailing_closure, allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_tracks_lines_and_columns() {
        let mut cursor = Cursor::new("ab\nc");

        assert_eq!(cursor.next(), Some('a'));
        assert_eq!(cursor.next(), Some('b'));
        assert_eq!(cursor.position().col, 3);
        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!(cursor.position().line, 2);
        assert_eq!(cursor.position().col, 1);
        assert_eq!(cursor.next(), Some('c'));
        assert_eq!(cursor.next(), None);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_restore_of_fresh_checkpoint_is_a_noop() {
        let mut cursor = Cursor::new("swift");
        cursor.next();

        let before = cursor.position();
        let checkpoint = cursor.save();
        cursor.restore(checkpoint);

        assert_eq!(cursor.position(), before);
        assert_eq!(cursor.peek(), Some('w'));
    }

    #[test]
    fn test_restore_rewinds_consumed_input() {
        let mut cursor = Cursor::new("x\ny");
        let checkpoint = cursor.save();

        cursor.next();
        cursor.next();
        cursor.next();
        assert!(cursor.is_at_end());

        cursor.restore(checkpoint);
        assert_eq!(cursor.peek(), Some('x'));
        assert_eq!(cursor.position(), Position { offset: 0, line: 1, col: 1 });
    }

    #[test]
    fn test_next_if_does_not_consume_on_mismatch() {
        let mut cursor = Cursor::new("=");

        assert_eq!(cursor.next_if(|c| c == '+'), None);
        assert_eq!(cursor.next_if(|c| c == '='), Some('='));
        assert_eq!(cursor.next_if(|c| c == '='), None);
    }
}
