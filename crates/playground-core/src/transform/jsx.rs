//! JSX elements to `React.createElement` calls.
//!
//! Tags and text are scanned character by character; expressions inside
//! `{}` go back through the parser, so nested JSX and comments in them are
//! handled like any other code.

use super::lexer::is_identifier;
use super::parser::{ParseResult, Parser};
use super::SyntaxError;

enum Prop {
    Named { key: String, value: String },
    Spread(String),
}

/// Contents of a `{}` container
struct Container {
    spread: bool,
    /// Rewritten expression, ending at its last token
    text: String,
}

impl<'a> Parser<'a> {
    /// The `<` token under the cursor starts an element in expression position.
    pub(super) fn jsx_expression(&mut self) -> ParseResult<()> {
        let start = self.cur.start;
        let call = self.jsx_element(start)?;
        self.push_edit(start, self.lexer.pos, call);
        self.resume()
    }

    /// Parse one element starting at the `<` at `start` and return the
    /// equivalent call.
    fn jsx_element(&mut self, start: usize) -> ParseResult<String> {
        self.lexer.pos = start + 1;

        if self.lexer.peek() == Some(b'>') {
            self.lexer.pos += 1;
            let children = self.jsx_children(start, "")?;
            return Ok(create_element("React.Fragment", &[], &children));
        }

        let name = self.jsx_name()?;
        let mut props = Vec::new();
        loop {
            self.lexer.skip_trivia()?;
            match self.lexer.peek() {
                None => {
                    return Err(self.error_at(start, format!("Unterminated JSX element <{}>", name)));
                }
                Some(b'/') => {
                    self.lexer.pos += 1;
                    self.lexer.skip_trivia()?;
                    if self.lexer.peek() != Some(b'>') {
                        return Err(self.error_at(
                            self.lexer.pos,
                            "Expected '>' after '/' in self-closing tag",
                        ));
                    }
                    self.lexer.pos += 1;
                    return Ok(create_element(&element_type(name), &props, &[]));
                }
                Some(b'>') => {
                    self.lexer.pos += 1;
                    let children = self.jsx_children(start, name)?;
                    return Ok(create_element(&element_type(name), &props, &children));
                }
                Some(b'{') => {
                    let open = self.lexer.pos;
                    match self.jsx_container(open)? {
                        Some(Container { spread: true, text }) => props.push(Prop::Spread(text)),
                        _ => return Err(self.error_at(open, "Expected '...' in JSX spread attribute")),
                    }
                }
                Some(c) if c.is_ascii_alphabetic() || c == b'_' || c == b'$' => {
                    let key = self.jsx_attribute_name();
                    self.lexer.skip_trivia()?;
                    let value = if self.lexer.peek() == Some(b'=') {
                        self.lexer.pos += 1;
                        self.lexer.skip_trivia()?;
                        self.jsx_attribute_value()?
                    } else {
                        "true".to_string()
                    };
                    props.push(Prop::Named { key, value });
                }
                Some(_) => return Err(self.jsx_unexpected()),
            }
        }
    }

    fn jsx_attribute_value(&mut self) -> ParseResult<String> {
        let start = self.lexer.pos;
        match self.lexer.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                let value_start = start + 1;
                let end = self.src[value_start..]
                    .find(quote as char)
                    .map(|i| value_start + i)
                    .ok_or_else(|| self.error_at(start, "Unterminated string constant"))?;
                self.lexer.pos = end + 1;
                Ok(string_literal(&decode_entities(&self.src[value_start..end])))
            }
            Some(b'{') => match self.jsx_container(start)? {
                None => Err(self.error_at(
                    start,
                    "JSX attributes must only be assigned a non-empty expression",
                )),
                Some(Container { spread: true, .. }) => {
                    Err(self.error_at(start + 1, "Unexpected token '...'"))
                }
                Some(Container { text, .. }) => Ok(text),
            },
            Some(b'<') => self.jsx_element(start),
            _ => Err(self.error_at(start, "Expected a JSX attribute value")),
        }
    }

    /// Parse `{ ... }` whose brace is at `open`, leaving the cursor after
    /// the closing brace. `None` when the braces hold nothing but comments.
    fn jsx_container(&mut self, open: usize) -> ParseResult<Option<Container>> {
        self.lexer.pos = open + 1;
        self.resume()?;
        if self.is_punct("}") {
            self.lexer.pos = self.cur.end;
            return Ok(None);
        }

        let spread = self.is_punct("...");
        if spread {
            self.bump()?;
        }
        let first = self.cur.start;
        if spread {
            self.parse_assignment(false)?;
        } else {
            self.parse_expression(false)?;
        }
        if !self.is_punct("}") {
            return Err(self.close_error(open, "}"));
        }
        // stop at the last token so a trailing line comment stays behind
        let text = self.render(first, self.prev_end);
        self.lexer.pos = self.cur.end;
        Ok(Some(Container { spread, text }))
    }

    /// Parse children up to and including the closing tag for `name`
    /// (empty for fragments).
    fn jsx_children(&mut self, open: usize, name: &str) -> ParseResult<Vec<String>> {
        let mut children = Vec::new();
        loop {
            match self.lexer.peek() {
                None => {
                    return Err(self.error_at(
                        open,
                        format!("Unterminated JSX contents for <{}>", name),
                    ));
                }
                Some(b'<') => {
                    let tag_start = self.lexer.pos;
                    self.lexer.pos += 1;
                    self.lexer.skip_trivia()?;
                    if self.lexer.peek() != Some(b'/') {
                        children.push(self.jsx_element(tag_start)?);
                        continue;
                    }
                    self.lexer.pos += 1;
                    self.lexer.skip_trivia()?;
                    let closing = if self.lexer.peek() == Some(b'>') { "" } else { self.jsx_name()? };
                    self.lexer.skip_trivia()?;
                    if self.lexer.peek() != Some(b'>') || closing != name {
                        return Err(self.error_at(
                            tag_start,
                            format!("Expected corresponding JSX closing tag for <{}>", name),
                        ));
                    }
                    self.lexer.pos += 1;
                    return Ok(children);
                }
                Some(b'{') => {
                    let open = self.lexer.pos;
                    match self.jsx_container(open)? {
                        Some(Container { spread: true, text }) => children.push(format!("...{}", text)),
                        Some(Container { text, .. }) => children.push(text),
                        None => {}
                    }
                }
                Some(c @ (b'>' | b'}')) => {
                    let escaped = if c == b'>' { "&gt;" } else { "&rbrace;" };
                    return Err(self.error_at(
                        self.lexer.pos,
                        format!(
                            "Unexpected token '{}'. Did you mean `{{'{}'}}` or `{}`?",
                            c as char, c as char, escaped
                        ),
                    ));
                }
                Some(_) => {
                    let start = self.lexer.pos;
                    let end = self.src[start..]
                        .find(['<', '{', '>', '}'])
                        .map(|i| start + i)
                        .unwrap_or(self.src.len());
                    self.lexer.pos = end;
                    if let Some(text) = clean_text(&self.src[start..end]) {
                        children.push(string_literal(&decode_entities(&text)));
                    }
                }
            }
        }
    }

    /// Element name: identifier, member expression or namespaced/dashed name.
    fn jsx_name(&mut self) -> ParseResult<&'a str> {
        let start = self.lexer.pos;
        match self.lexer.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == b'_' || c == b'$' => {}
            _ => return Err(self.jsx_unexpected()),
        }
        while let Some(c) = self.lexer.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, b'_' | b'$' | b'-' | b'.' | b':') {
                self.lexer.pos += 1;
            } else {
                break;
            }
        }
        Ok(&self.src[start..self.lexer.pos])
    }

    fn jsx_attribute_name(&mut self) -> String {
        let start = self.lexer.pos;
        while let Some(c) = self.lexer.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, b'_' | b'$' | b'-' | b':') {
                self.lexer.pos += 1;
            } else {
                break;
            }
        }
        self.src[start..self.lexer.pos].to_string()
    }

    fn jsx_unexpected(&self) -> SyntaxError {
        match self.lexer.current_char() {
            Some(c) => self.error_at(self.lexer.pos, format!("Unexpected token '{}'", c)),
            None => self.error_at(self.lexer.pos, "Unexpected end of input"),
        }
    }
}

fn element_type(name: &str) -> String {
    let intrinsic = name.starts_with(|c: char| c.is_ascii_lowercase())
        || name.contains('-')
        || name.contains(':');
    if intrinsic {
        string_literal(name)
    } else {
        name.to_string()
    }
}

fn create_element(element_type: &str, props: &[Prop], children: &[String]) -> String {
    let mut call = format!("React.createElement({}, {}", element_type, props_object(props));
    for child in children {
        call.push_str(", ");
        call.push_str(child);
    }
    call.push(')');
    call
}

fn props_object(props: &[Prop]) -> String {
    if props.is_empty() {
        return "null".to_string();
    }
    let entries: Vec<String> = props
        .iter()
        .map(|prop| match prop {
            Prop::Named { key, value } if is_identifier(key) => format!("{}: {}", key, value),
            Prop::Named { key, value } => format!("{}: {}", string_literal(key), value),
            Prop::Spread(expr) => format!("...{}", expr),
        })
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// JSON string syntax is valid JavaScript string syntax.
fn string_literal(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// React's whitespace rules for JSX text: lines are trimmed, blank lines
/// dropped and line breaks between the rest collapse to single spaces.
pub(super) fn clean_text(raw: &str) -> Option<String> {
    let lines: Vec<&str> = raw.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect();
    let last_non_empty = lines
        .iter()
        .rposition(|l| l.chars().any(|c| c != ' ' && c != '\t'))
        .unwrap_or(0);

    let mut text = String::new();
    for (i, line) in lines.iter().enumerate() {
        let mut trimmed = line.replace('\t', " ");
        if i != 0 {
            trimmed = trimmed.trim_start_matches(' ').to_string();
        }
        if i != lines.len() - 1 {
            trimmed = trimmed.trim_end_matches(' ').to_string();
        }
        if !trimmed.is_empty() {
            if i != last_non_empty {
                trimmed.push(' ');
            }
            text.push_str(&trimmed);
        }
    }
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

pub(super) fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = name.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "lbrace" => Some('{'),
        "rbrace" => Some('}'),
        "copy" => Some('©'),
        "hellip" => Some('…'),
        "mdash" => Some('—'),
        "ndash" => Some('–'),
        "times" => Some('×'),
        "rarr" => Some('→'),
        "larr" => Some('←'),
        _ => None,
    }
}
