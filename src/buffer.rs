use inlinable_string::{InlinableString, StringExt};
use std::fmt;

use crate::eval::is_op;
use crate::CalcError;

// Digits are always accepted; an operator only when it would not follow another operator
pub fn is_valid_char(ch: char, buffer: &str) -> bool {
    match ch {
        '0'..='9' => true,
        c if is_op(c) => !buffer.chars().next_back().map_or(false, is_op),
        _ => false
    }
}

/// The not-yet-evaluated expression, with a redo history of characters removed by undo.
///
/// Redo history survives ordinary appends and is only dropped by `reset`.
#[derive(Debug, Clone)]
pub struct InputBuffer {
    expr: InlinableString,
    // most recently undone character last
    redo: Vec<char>
}

impl InputBuffer {
    pub fn new() -> Self {
        InputBuffer {
            expr: InlinableString::new(),
            redo: Vec::new()
        }
    }

    pub fn as_str(&self) -> &str { self.expr.as_ref() }
    pub fn is_empty(&self) -> bool { self.as_str().is_empty() }
    pub fn redo_len(&self) -> usize { self.redo.len() }

    pub fn accepts(&self, ch: char) -> bool {
        is_valid_char(ch, self.as_str())
    }

    pub fn append(&mut self, ch: char) -> Result<(), CalcError> {
        if !self.accepts(ch) {
            return Err(CalcError::InvalidCharacter(ch))
        }
        self.expr.push(ch);
        Ok(())
    }

    pub fn undo(&mut self) {
        if let Some(ch) = self.expr.pop() {
            self.redo.push(ch);
        }
    }

    // Re-appends without validation, so a redo after fresh input can produce doubled operators
    pub fn redo(&mut self) {
        if let Some(ch) = self.redo.pop() {
            self.expr.push(ch);
        }
    }

    pub fn reset(&mut self) {
        self.expr.clear();
        self.redo.clear();
    }
}

impl Default for InputBuffer {
    fn default() -> Self { InputBuffer::new() }
}

impl fmt::Display for InputBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::{is_valid_char, InputBuffer};
    use crate::CalcError;

    fn filled(text: &str) -> InputBuffer {
        let mut buf = InputBuffer::new();
        for ch in text.chars() {
            buf.append(ch).unwrap();
        }
        buf
    }

    #[test]
    fn char_validation() {
        let test_cases = [
            ('7', "", true),
            ('0', "1+", true),
            ('+', "", true),
            ('-', "12", true),
            ('*', "12+", false),
            ('/', "3/", false),
            ('u', "", false),
            ('=', "1", false),
            (' ', "1", false),
            ('٣', "", false)
        ];
        for (ch, buffer, expected) in test_cases.iter() {
            assert_eq!(is_valid_char(*ch, buffer), *expected, "{:?} after {:?}", ch, buffer);
        }
    }

    #[test]
    fn append_rejects_consecutive_operators() {
        let mut buf = filled("1+");
        assert_eq!(buf.append('+'), Err(CalcError::InvalidCharacter('+')));
        assert_eq!(buf.as_str(), "1+");
        assert_eq!(buf.append('x'), Err(CalcError::InvalidCharacter('x')));
        assert_eq!(buf.as_str(), "1+");
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut buf = filled("12+3");
        buf.undo();
        assert_eq!(buf.as_str(), "12+");
        buf.redo();
        assert_eq!(buf.as_str(), "12+3");
        assert_eq!(buf.redo_len(), 0);
    }

    #[test]
    fn redo_restores_in_order() {
        let mut buf = filled("123");
        buf.undo();
        buf.undo();
        buf.undo();
        assert!(buf.is_empty());
        // nothing left to undo
        buf.undo();
        assert_eq!(buf.redo_len(), 3);
        buf.redo();
        buf.redo();
        buf.redo();
        buf.redo();
        assert_eq!(buf.to_string(), "123");
    }

    #[test]
    fn redo_survives_append() {
        let mut buf = filled("12");
        buf.undo();
        buf.append('+').unwrap();
        buf.redo();
        assert_eq!(buf.as_str(), "1+2");
    }

    #[test]
    fn reset_is_idempotent() {
        let mut buf = filled("4*5");
        buf.undo();
        buf.reset();
        assert!(buf.is_empty());
        assert_eq!(buf.redo_len(), 0);
        buf.reset();
        assert!(buf.is_empty());
        assert_eq!(buf.as_str(), "");
        assert_eq!(buf.redo_len(), 0);
    }
}
