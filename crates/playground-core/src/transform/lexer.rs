//! JavaScript tokens, scanned on demand for the parser.
//!
//! A `/` is always scanned as an operator and a `}` always as a
//! punctuator; the parser rescans them as a regular expression or a
//! template continuation when the grammar says so.

use super::SyntaxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TokenKind {
    /// Identifier or keyword
    Name,
    /// `#name` inside a class body
    PrivateName,
    Number,
    String,
    /// A whole template, or the tail after its last substitution
    Template,
    /// Template text up to and including a `${`
    TemplateHead,
    Regex,
    Punct,
    Eof,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    /// A line terminator separates this token from the previous one
    pub newline_before: bool,
}

/// Multi-character punctuators, longest first
const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "<<", ">>", "**",
];

const SINGLE_PUNCTUATORS: &str = "{}()[];,<>+-*/%&|^!~?:=.@";

#[derive(Clone)]
pub(super) struct Lexer<'a> {
    pub src: &'a str,
    pub pos: usize,
}

impl<'a> Lexer<'a> {
    pub(super) fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub(super) fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    pub(super) fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + ahead).copied()
    }

    pub(super) fn current_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError::at(self.src, offset, message)
    }

    /// Skip whitespace and comments. Returns whether a line break was crossed.
    pub(super) fn skip_trivia(&mut self) -> Result<bool, SyntaxError> {
        let mut newline = false;
        if self.pos == 0 && self.src.starts_with("#!") {
            self.skip_line();
        }
        loop {
            match self.peek() {
                Some(b'/') if self.peek_at(1) == Some(b'/') => self.skip_line(),
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let start = self.pos;
                    let end = self.src[start + 2..]
                        .find("*/")
                        .map(|i| start + 2 + i + 2)
                        .ok_or_else(|| self.error_at(start, "Unterminated comment"))?;
                    newline |= self.src[start..end].contains(is_line_terminator);
                    self.pos = end;
                }
                Some(_) => {
                    let Some(c) = self.current_char() else {
                        return Ok(newline);
                    };
                    if is_line_terminator(c) {
                        newline = true;
                    } else if !(c.is_whitespace() || c == '\u{feff}') {
                        return Ok(newline);
                    }
                    self.pos += c.len_utf8();
                }
                None => return Ok(newline),
            }
        }
    }

    fn skip_line(&mut self) {
        self.pos = self.src[self.pos..]
            .find('\n')
            .map(|i| self.pos + i)
            .unwrap_or(self.src.len());
    }

    pub(super) fn next_token(&mut self) -> Result<Token, SyntaxError> {
        let newline_before = self.skip_trivia()?;
        let start = self.pos;
        let Some(c) = self.current_char() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                start,
                end: start,
                newline_before,
            });
        };

        let kind = match c {
            '\'' | '"' => {
                self.string()?;
                TokenKind::String
            }
            '`' => {
                self.pos += 1;
                self.template_chars(start)?
            }
            '0'..='9' => {
                self.number();
                TokenKind::Number
            }
            '.' if matches!(self.peek_at(1), Some(b'0'..=b'9')) => {
                self.number();
                TokenKind::Number
            }
            '#' => {
                self.pos += 1;
                if !self.current_char().is_some_and(is_identifier_start) {
                    return Err(self.error_at(start, "Unexpected character '#'"));
                }
                self.read_identifier();
                TokenKind::PrivateName
            }
            c if is_identifier_start(c) => {
                self.read_identifier();
                TokenKind::Name
            }
            c => {
                self.punctuator(c)?;
                TokenKind::Punct
            }
        };

        Ok(Token {
            kind,
            start,
            end: self.pos,
            newline_before,
        })
    }

    fn punctuator(&mut self, c: char) -> Result<(), SyntaxError> {
        let rest = &self.src[self.pos..];
        for p in PUNCTUATORS {
            if rest.starts_with(p) {
                // `a?.5:b` is a conditional, not an optional chain
                if *p == "?." && rest.as_bytes().get(2).is_some_and(u8::is_ascii_digit) {
                    break;
                }
                self.pos += p.len();
                return Ok(());
            }
        }
        if SINGLE_PUNCTUATORS.contains(c) {
            self.pos += 1;
            return Ok(());
        }
        Err(self.error_at(self.pos, format!("Unexpected character '{}'", c)))
    }

    pub(super) fn read_identifier(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.current_char() {
            if is_identifier_part(c) {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        &self.src[start..self.pos]
    }

    fn string(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        let quote = self.src.as_bytes()[start];
        self.pos += 1;
        loop {
            match self.peek() {
                None | Some(b'\n') | Some(b'\r') => {
                    return Err(self.error_at(start, "Unterminated string constant"));
                }
                Some(b'\\') => {
                    self.pos += 1;
                    if self.peek() == Some(b'\r') && self.peek_at(1) == Some(b'\n') {
                        self.pos += 2;
                    } else if let Some(c) = self.current_char() {
                        self.pos += c.len_utf8();
                    }
                }
                Some(c) if c == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => {
                    if let Some(c) = self.current_char() {
                        self.pos += c.len_utf8();
                    }
                }
            }
        }
    }

    /// Template characters up to the closing backtick or the next `${`.
    /// `open` is the backtick that started the whole template.
    fn template_chars(&mut self, open: usize) -> Result<TokenKind, SyntaxError> {
        loop {
            match self.peek() {
                None => return Err(self.error_at(open, "Unterminated template literal")),
                Some(b'\\') => {
                    self.pos += 1;
                    if let Some(c) = self.current_char() {
                        self.pos += c.len_utf8();
                    }
                }
                Some(b'`') => {
                    self.pos += 1;
                    return Ok(TokenKind::Template);
                }
                Some(b'$') if self.peek_at(1) == Some(b'{') => {
                    self.pos += 2;
                    return Ok(TokenKind::TemplateHead);
                }
                Some(_) => {
                    if let Some(c) = self.current_char() {
                        self.pos += c.len_utf8();
                    }
                }
            }
        }
    }

    /// Continue a template at the `}` that closes a substitution.
    pub(super) fn rescan_template(&mut self, brace: Token, open: usize) -> Result<Token, SyntaxError> {
        self.pos = brace.start + 1;
        let kind = self.template_chars(open)?;
        Ok(Token {
            kind,
            start: brace.start,
            end: self.pos,
            newline_before: brace.newline_before,
        })
    }

    /// Read a regular expression literal starting at a `/` or `/=` token.
    pub(super) fn rescan_regex(&mut self, slash: Token) -> Result<Token, SyntaxError> {
        let start = slash.start;
        self.pos = start + 1;
        let mut in_class = false;
        loop {
            match self.peek() {
                None | Some(b'\n') | Some(b'\r') => {
                    return Err(self.error_at(start, "Unterminated regular expression"));
                }
                Some(b'\\') => {
                    self.pos += 1;
                    if let Some(c) = self.current_char() {
                        self.pos += c.len_utf8();
                    }
                }
                Some(b'[') => {
                    in_class = true;
                    self.pos += 1;
                }
                Some(b']') => {
                    in_class = false;
                    self.pos += 1;
                }
                Some(b'/') if !in_class => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {
                    if let Some(c) = self.current_char() {
                        self.pos += c.len_utf8();
                    }
                }
            }
        }
        // flags
        self.read_identifier();
        Ok(Token {
            kind: TokenKind::Regex,
            start,
            end: self.pos,
            newline_before: slash.newline_before,
        })
    }

    fn number(&mut self) {
        let radix_prefixed = self.peek() == Some(b'0')
            && matches!(self.peek_at(1), Some(b'x' | b'X' | b'b' | b'B' | b'o' | b'O'));
        while let Some(c) = self.peek() {
            if !(c.is_ascii_alphanumeric() || c == b'.' || c == b'_') {
                break;
            }
            self.pos += 1;
            if !radix_prefixed && matches!(c, b'e' | b'E') && matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
        }
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

pub(super) fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

pub(super) fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

pub(super) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if is_identifier_start(c)) && chars.all(is_identifier_part)
}
