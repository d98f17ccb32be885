use log::trace;

use crate::error::{ErrorKind, ParseError};

/// Scan position over one source string.
///
/// `position` counts characters and only ever moves forward; the slice in
/// `rest` is always the text still ahead of it.
#[derive(Debug, Clone)]
pub struct Cursor<'de> {
    whole: &'de str,
    rest: &'de str,
    position: usize,
}

impl<'de> Cursor<'de> {
    pub fn new(input: &'de str) -> Self {
        Cursor {
            whole: input,
            rest: input,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Byte offset of the cursor into the source.
    pub fn byte(&self) -> usize {
        self.whole.len() - self.rest.len()
    }

    /// Source text between byte offset `start` and the cursor.
    pub fn since(&self, start: usize) -> &'de str {
        &self.whole[start..self.byte()]
    }

    /// `None` at end of input.
    pub fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    pub fn peek_is(&self, check: impl FnOnce(char) -> bool) -> bool {
        self.peek().is_some_and(check)
    }

    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.rest = &self.rest[c.len_utf8()..];
        self.position += 1;
        Some(c)
    }

    /// Advances past every leading character matching `check` and returns
    /// the consumed run.
    pub fn advance_while(&mut self, check: impl Fn(char) -> bool) -> &'de str {
        let end = self.rest.find(|c| !check(c)).unwrap_or(self.rest.len());
        let run = &self.rest[..end];
        self.rest = &self.rest[end..];
        self.position += run.chars().count();
        run
    }

    pub fn skip_whitespace(&mut self) {
        self.advance_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
    }

    pub fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        if self.peek() == Some(expected) {
            self.advance();
            Ok(())
        } else {
            trace!(
                "expected {expected:?} at {}, found {:?}",
                self.position,
                self.peek()
            );
            Err(ParseError::new(
                ErrorKind::UnexpectedCharacter(expected),
                self.position,
            ))
        }
    }
}
