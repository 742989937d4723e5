//! Template tokenizer
//!
//! Recognises, left to right and without overlap:
//! - `getValue(doc['path'])` with optional trailing member/index suffixes (legacy call form)
//! - `wrap['path']`, `doc['path']` (optionally `.value`) and `error['path']`; adjacent
//!   `[...]` indexes after the path are consumed and ignored
//! - single-quoted string literals
//!
//! Anything else is dropped. Quotes around paths may be single or double.

use std::borrow::Cow;

use super::types::{Marker, ScanOutput, Token};

/// Scan a template into tokens
pub fn scan(template: &str) -> ScanOutput {
    let source = strip_function_definitions(template);
    let mut cursor = Cursor::new(&source);
    let mut output = ScanOutput::default();

    while let Some(c) = cursor.peek() {
        if is_ident_char(c) {
            let start = cursor.pos;
            if is_ident_start(c) {
                if let Some((marker, path)) = reference(&mut cursor) {
                    output.tokens.push(Token::field(marker, path));
                    output.had_any_match = true;
                    continue;
                }
                cursor.pos = start;
            }
            // Unrecognised identifiers are skipped whole so `mydoc[...]` never reads as `doc[...]`
            cursor.eat_while(is_ident_char);
            continue;
        }

        if c == '\'' {
            if let Some(text) = string_literal(&mut cursor) {
                output.tokens.push(Token::Literal { text });
                output.had_any_match = true;
                continue;
            }
        }

        cursor.bump();
    }

    output
}

/// Remove `Type name(params) { body }` definitions left over from legacy templates
pub fn strip_function_definitions(template: &str) -> Cow<'_, str> {
    let mut cursor = Cursor::new(template);
    let mut stripped = String::new();
    let mut copied_up_to = 0;
    let mut changed = false;

    while let Some(c) = cursor.peek() {
        if is_ident_start(c) {
            let start = cursor.pos;
            if let Some(end) = function_definition_end(&mut cursor) {
                stripped.push_str(&template[copied_up_to..start]);
                copied_up_to = end;
                changed = true;
                continue;
            }
            cursor.pos = start;
            cursor.eat_while(is_ident_char);
            continue;
        }

        if is_quote(c) {
            cursor.skip_quoted();
            continue;
        }

        cursor.bump();
    }

    if !changed {
        return Cow::Borrowed(template);
    }

    stripped.push_str(&template[copied_up_to..]);
    Cow::Owned(stripped)
}

/// Parse a string that consists of exactly one field reference
pub(crate) fn parse_reference(source: &str) -> Option<(Marker, &str)> {
    let mut cursor = Cursor::new(source);
    let found = reference(&mut cursor)?;
    cursor.at_end().then_some(found)
}

fn reference<'a>(cursor: &mut Cursor<'a>) -> Option<(Marker, &'a str)> {
    let ident = cursor.eat_ident()?;

    if let Some(marker) = Marker::from_keyword(ident) {
        if cursor.peek_past_whitespace() == Some('[') {
            let path = bracket_path(cursor)?;
            cursor.eat_index_suffixes();
            if marker == Marker::Doc {
                cursor.eat_value_suffix();
            }
            return Some((marker, path));
        }
    }

    legacy_call(cursor)
}

/// `ident(doc['path'])` plus suffixes; the identifier is already consumed
fn legacy_call<'a>(cursor: &mut Cursor<'a>) -> Option<(Marker, &'a str)> {
    cursor.skip_whitespace();
    if !cursor.eat('(') {
        return None;
    }
    cursor.skip_whitespace();
    if cursor.eat_ident()? != Marker::Doc.keyword() {
        return None;
    }
    let path = bracket_path(cursor)?;
    cursor.eat_value_suffix();
    cursor.skip_whitespace();
    if !cursor.eat(')') {
        return None;
    }
    cursor.eat_member_suffixes();
    Some((Marker::Doc, path))
}

/// `['path']` or `["path"]`, whitespace tolerated inside the brackets
fn bracket_path<'a>(cursor: &mut Cursor<'a>) -> Option<&'a str> {
    cursor.skip_whitespace();
    if !cursor.eat('[') {
        return None;
    }
    cursor.skip_whitespace();
    let quote = cursor.peek().filter(|c| is_quote(*c) && *c != '`')?;
    cursor.bump();

    let start = cursor.pos;
    let len = cursor.rest().find(quote)?;
    let path = &cursor.src[start..start + len];
    cursor.pos = start + len + quote.len_utf8();

    cursor.skip_whitespace();
    if !cursor.eat(']') {
        return None;
    }
    Some(path)
}

fn string_literal(cursor: &mut Cursor<'_>) -> Option<String> {
    let start = cursor.pos;
    cursor.eat('\'');
    let mut text = String::new();

    loop {
        match cursor.bump() {
            None => {
                cursor.pos = start;
                return None;
            }
            Some('\'') => return Some(text),
            Some('\\') => match cursor.peek() {
                Some('n') => {
                    cursor.bump();
                    text.push('\n');
                }
                Some(escaped @ ('\'' | '\\')) => {
                    cursor.bump();
                    text.push(escaped);
                }
                _ => text.push('\\'),
            },
            Some(c) => text.push(c),
        }
    }
}

/// Byte offset just past a `Type name(params) { body }` definition at the cursor
fn function_definition_end(cursor: &mut Cursor<'_>) -> Option<usize> {
    cursor.eat_ident()?;
    if !cursor.skip_whitespace() {
        return None;
    }
    cursor.eat_ident()?;
    cursor.skip_whitespace();
    if !cursor.eat('(') {
        return None;
    }
    let close = cursor.rest().find(')')?;
    cursor.pos += close + 1;
    cursor.skip_whitespace();
    if cursor.peek() != Some('{') {
        return None;
    }

    let mut depth = 0usize;
    while let Some(c) = cursor.peek() {
        match c {
            '{' => {
                depth += 1;
                cursor.bump();
            }
            '}' => {
                depth -= 1;
                cursor.bump();
                if depth == 0 {
                    return Some(cursor.pos);
                }
            }
            c if is_quote(c) => cursor.skip_quoted(),
            _ => {
                cursor.bump();
            }
        }
    }

    None
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '"' | '`')
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_past_whitespace(&self) -> Option<char> {
        self.rest().trim_start().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Returns true if anything was consumed
    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> bool {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.pos > start
    }

    fn skip_whitespace(&mut self) -> bool {
        self.eat_while(char::is_whitespace)
    }

    fn eat_ident(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if !self.peek().is_some_and(is_ident_start) {
            return None;
        }
        self.eat_while(is_ident_char);
        Some(&self.src[start..self.pos])
    }

    fn eat_value_suffix(&mut self) {
        const SUFFIX: &str = ".value";
        let rest = self.rest();
        if rest.starts_with(SUFFIX)
            && !rest[SUFFIX.len()..]
                .chars()
                .next()
                .is_some_and(is_ident_char)
        {
            self.pos += SUFFIX.len();
        }
    }

    /// Adjacent `[...]` runs after a reference; only the first index names the field
    fn eat_index_suffixes(&mut self) {
        while self.peek() == Some('[') {
            match self.rest().find(']') {
                Some(close) => self.pos += close + 1,
                None => return,
            }
        }
    }

    /// `.name`, `.name(...)` and `[...]` chains, no nesting
    fn eat_member_suffixes(&mut self) {
        loop {
            let start = self.pos;
            if self.eat('.') {
                if self.eat_ident().is_none() {
                    self.pos = start;
                    return;
                }
                if self.peek() == Some('(') {
                    match self.rest().find(')') {
                        Some(close) => self.pos += close + 1,
                        None => return,
                    }
                }
            } else if self.peek() == Some('[') {
                match self.rest().find(']') {
                    Some(close) => self.pos += close + 1,
                    None => return,
                }
            } else {
                return;
            }
        }
    }

    /// Skip a quoted run starting at the cursor, honouring backslash escapes.
    /// An unterminated quote only skips the quote character itself.
    fn skip_quoted(&mut self) {
        let start = self.pos;
        let Some(quote) = self.bump() else {
            return;
        };
        while let Some(c) = self.bump() {
            if c == '\\' {
                self.bump();
            } else if c == quote {
                return;
            }
        }
        self.pos = start + quote.len_utf8();
    }
}
