//! Recursive-descent parser for JavaScript modules with JSX.
//!
//! The parser checks the source against the statement and expression
//! grammar and records edits for the two constructs the preview cannot run
//! as written: JSX elements and `react` imports. Everything else is copied
//! to the output byte for byte, comments and line breaks included.
//!
//! Arrow parameters and destructuring targets are parsed as expressions
//! first and reinterpreted once the following `=>` or `=` shows what they
//! were.

use super::lexer::{Lexer, Token, TokenKind};
use super::SyntaxError;

pub(super) type ParseResult<T> = Result<T, SyntaxError>;

/// Words that can never name a binding in module code
const RESERVED: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=", ">>>=", "&=", "|=", "^=", "&&=",
    "||=", "??=",
];

pub(super) fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

/// A span of the source replaced in the output
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

/// What an expression turned out to be, as far as assignment targets and
/// arrow parameters are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Identifier,
    /// Property access: assignable, but not a binding
    Member,
    /// Object or array literal; `pattern_only` marks a `{ a = 1 }` that is
    /// only legal once the literal is read as a destructuring pattern
    Literal { pattern_only: Option<usize> },
    /// Parenthesized list directly followed by `=>`
    ArrowParams { valid: bool, is_async: bool },
    /// Assignment; `binding` when its target could also be a parameter
    Assign { binding: bool },
    Other,
}

impl Shape {
    fn is_binding(self) -> bool {
        matches!(
            self,
            Shape::Identifier | Shape::Literal { .. } | Shape::Assign { binding: true }
        )
    }

    fn is_simple_target(self) -> bool {
        matches!(self, Shape::Identifier | Shape::Member)
    }

    fn pattern_only(self) -> Option<usize> {
        match self {
            Shape::Literal { pattern_only } => pattern_only,
            _ => None,
        }
    }
}

/// Function nesting state that decides how `return`, `await` and `yield` parse
#[derive(Debug, Clone, Copy, Default)]
struct Context {
    in_function: bool,
    is_async: bool,
    is_generator: bool,
}

pub(super) struct Parser<'a> {
    pub(super) src: &'a str,
    pub(super) lexer: Lexer<'a>,
    pub(super) cur: Token,
    /// End of the last consumed token
    pub(super) prev_end: usize,
    context: Context,
    edits: Vec<Edit>,
}

impl<'a> Parser<'a> {
    pub(super) fn new(src: &'a str) -> ParseResult<Self> {
        let mut lexer = Lexer::new(src);
        let cur = lexer.next_token()?;
        Ok(Self {
            src,
            lexer,
            cur,
            prev_end: 0,
            context: Context::default(),
            edits: Vec::new(),
        })
    }

    /// Parse a whole module and return it with all edits applied.
    pub(super) fn module(mut self) -> ParseResult<String> {
        while self.cur.kind != TokenKind::Eof {
            self.statement_list_item(true)?;
        }
        Ok(self.render(0, self.src.len()))
    }

    // ─── Tokens ──────────────────────────────────────────────

    pub(super) fn bump(&mut self) -> ParseResult<()> {
        self.prev_end = self.cur.end;
        self.cur = self.lexer.next_token()?;
        Ok(())
    }

    /// Continue token scanning at the lexer position, after the JSX scanner
    /// has consumed everything up to it.
    pub(super) fn resume(&mut self) -> ParseResult<()> {
        self.prev_end = self.lexer.pos;
        self.cur = self.lexer.next_token()?;
        Ok(())
    }

    fn peek_token(&self) -> ParseResult<Token> {
        self.lexer.clone().next_token()
    }

    fn text(&self, token: Token) -> &'a str {
        &self.src[token.start..token.end]
    }

    pub(super) fn is_punct(&self, p: &str) -> bool {
        self.cur.kind == TokenKind::Punct && self.text(self.cur) == p
    }

    fn is_name(&self, word: &str) -> bool {
        self.cur.kind == TokenKind::Name && self.text(self.cur) == word
    }

    fn is_identifier(&self) -> bool {
        self.cur.kind == TokenKind::Name && !is_reserved(self.text(self.cur))
    }

    fn eat_punct(&mut self, p: &str) -> ParseResult<bool> {
        if self.is_punct(p) {
            self.bump()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn expect_punct(&mut self, p: &str) -> ParseResult<()> {
        if self.eat_punct(p)? {
            return Ok(());
        }
        Err(self.unexpected())
    }

    fn expect_name(&mut self, word: &str) -> ParseResult<()> {
        if self.is_name(word) {
            return self.bump();
        }
        Err(self.unexpected())
    }

    /// Automatic semicolon insertion: a `;`, or a `}`, end of input or line
    /// break that lets the statement end without one.
    fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.eat_punct(";")? {
            return Ok(());
        }
        if self.is_punct("}") || self.cur.kind == TokenKind::Eof || self.cur.newline_before {
            return Ok(());
        }
        Err(self.unexpected())
    }

    /// Consume the bracket closing the one opened at `open`.
    fn close(&mut self, open: usize, closing: &str) -> ParseResult<()> {
        if self.eat_punct(closing)? {
            return Ok(());
        }
        Err(self.close_error(open, closing))
    }

    pub(super) fn close_error(&self, open: usize, closing: &str) -> SyntaxError {
        let opening = &self.src[open..open + 1];
        if self.cur.kind == TokenKind::Eof {
            return self.error_at(
                open,
                format!("Unexpected end of input: '{}' is never closed", opening),
            );
        }
        let opened = SyntaxError::at(self.src, open, "");
        self.error_at(
            self.cur.start,
            format!(
                "Unexpected token '{}'; expected '{}' to close '{}' at {}:{}",
                self.text(self.cur),
                closing,
                opening,
                opened.line,
                opened.column
            ),
        )
    }

    // ─── Errors ──────────────────────────────────────────────

    pub(super) fn error_at(&self, offset: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError::at(self.src, offset, message)
    }

    pub(super) fn unexpected(&self) -> SyntaxError {
        let text = self.text(self.cur);
        let message = match self.cur.kind {
            TokenKind::Eof => "Unexpected end of input".to_string(),
            TokenKind::Number => "Unexpected number".to_string(),
            TokenKind::String => "Unexpected string".to_string(),
            TokenKind::Template | TokenKind::TemplateHead => "Unexpected template string".to_string(),
            TokenKind::Name if !is_reserved(text) => format!("Unexpected identifier '{}'", text),
            _ => format!("Unexpected token '{}'", text),
        };
        self.error_at(self.cur.start, message)
    }

    /// Reject a literal that only makes sense as a destructuring pattern.
    fn settle(&self, shape: Shape) -> ParseResult<()> {
        match shape.pattern_only() {
            Some(offset) => Err(self.error_at(offset, "Invalid shorthand property initializer")),
            None => Ok(()),
        }
    }

    // ─── Edits ───────────────────────────────────────────────

    /// Replace `start..end`, superseding edits nested inside it.
    pub(super) fn push_edit(&mut self, start: usize, end: usize, text: String) {
        while self.edits.last().is_some_and(|e| e.start >= start) {
            self.edits.pop();
        }
        self.edits.push(Edit { start, end, text });
    }

    /// Source text of `start..end` with the edits inside it applied.
    pub(super) fn render(&self, start: usize, end: usize) -> String {
        let mut out = String::with_capacity(end - start);
        let mut at = start;
        for edit in self.edits.iter().filter(|e| e.start >= start && e.end <= end) {
            out.push_str(&self.src[at..edit.start]);
            out.push_str(&edit.text);
            at = edit.end;
        }
        out.push_str(&self.src[at..end]);
        out
    }

    // ─── Statements ──────────────────────────────────────────

    fn statement_list_item(&mut self, top_level: bool) -> ParseResult<()> {
        if self.is_name("import") {
            let next = self.peek_token()?;
            let is_expression = next.kind == TokenKind::Punct && matches!(self.text(next), "(" | ".");
            if !is_expression {
                if !top_level {
                    return Err(self.error_at(
                        self.cur.start,
                        "Import declarations may only appear at the top level of a module",
                    ));
                }
                return self.import_declaration();
            }
        }
        if self.is_name("export") {
            if !top_level {
                return Err(self.error_at(
                    self.cur.start,
                    "Export declarations may only appear at the top level of a module",
                ));
            }
            return self.export_declaration();
        }
        self.statement()
    }

    fn statement(&mut self) -> ParseResult<()> {
        if self.cur.kind == TokenKind::Punct {
            match self.text(self.cur) {
                "{" => return self.block(),
                ";" => return self.bump(),
                _ => {}
            }
        }
        if self.cur.kind == TokenKind::Name {
            match self.text(self.cur) {
                "var" | "const" => {
                    self.variable_declaration(false)?;
                    return self.consume_semicolon();
                }
                "let" if self.let_starts_declaration()? => {
                    self.variable_declaration(false)?;
                    return self.consume_semicolon();
                }
                "function" => return self.function(false, true),
                "async" if self.async_function_follows()? => {
                    self.bump()?;
                    return self.function(true, true);
                }
                "class" => return self.class(true),
                "if" => return self.if_statement(),
                "for" => return self.for_statement(),
                "while" => {
                    self.bump()?;
                    self.paren_expression()?;
                    return self.statement();
                }
                "do" => {
                    self.bump()?;
                    self.statement()?;
                    self.expect_name("while")?;
                    self.paren_expression()?;
                    self.eat_punct(";")?;
                    return Ok(());
                }
                "return" => return self.return_statement(),
                "break" | "continue" => {
                    self.bump()?;
                    if self.is_identifier() && !self.cur.newline_before {
                        self.bump()?;
                    }
                    return self.consume_semicolon();
                }
                "throw" => {
                    self.bump()?;
                    if self.cur.newline_before {
                        return Err(self.error_at(self.cur.start, "Illegal newline after throw"));
                    }
                    self.parse_expression(false)?;
                    return self.consume_semicolon();
                }
                "try" => return self.try_statement(),
                "switch" => return self.switch_statement(),
                "debugger" => {
                    self.bump()?;
                    return self.consume_semicolon();
                }
                "with" => {
                    return Err(self.error_at(
                        self.cur.start,
                        "Strict mode code may not include a with statement",
                    ));
                }
                "import" => {
                    let next = self.peek_token()?;
                    if !(next.kind == TokenKind::Punct && matches!(self.text(next), "(" | ".")) {
                        return Err(self.error_at(
                            self.cur.start,
                            "Import declarations may only appear at the top level of a module",
                        ));
                    }
                }
                word if !is_reserved(word) => {
                    let next = self.peek_token()?;
                    if next.kind == TokenKind::Punct && self.text(next) == ":" {
                        self.bump()?;
                        self.bump()?;
                        return self.statement();
                    }
                }
                _ => {}
            }
        }

        self.parse_expression(false)?;
        self.consume_semicolon()
    }

    fn let_starts_declaration(&self) -> ParseResult<bool> {
        let next = self.peek_token()?;
        Ok(match next.kind {
            TokenKind::Name => true,
            TokenKind::Punct => matches!(self.text(next), "[" | "{"),
            _ => false,
        })
    }

    fn async_function_follows(&self) -> ParseResult<bool> {
        let next = self.peek_token()?;
        Ok(next.kind == TokenKind::Name && self.text(next) == "function" && !next.newline_before)
    }

    fn block(&mut self) -> ParseResult<()> {
        let open = self.cur.start;
        self.expect_punct("{")?;
        while !self.is_punct("}") && self.cur.kind != TokenKind::Eof {
            self.statement_list_item(false)?;
        }
        self.close(open, "}")
    }

    fn paren_expression(&mut self) -> ParseResult<()> {
        let open = self.cur.start;
        self.expect_punct("(")?;
        self.parse_expression(false)?;
        self.close(open, ")")
    }

    /// `var`, `let` or `const` bindings. Inside a `for` head the initializer
    /// may be missing and `in` is left for the loop.
    fn variable_declaration(&mut self, in_for_head: bool) -> ParseResult<()> {
        let is_const = self.is_name("const");
        self.bump()?;
        loop {
            let target = self.cur.start;
            let simple = self.is_identifier();
            self.binding_target()?;
            if self.eat_punct("=")? {
                self.parse_assignment(in_for_head)?;
            } else if !in_for_head && (is_const || !simple) {
                let message = if is_const {
                    "Missing initializer in const declaration"
                } else {
                    "Missing initializer in destructuring declaration"
                };
                return Err(self.error_at(target, message));
            }
            if !self.eat_punct(",")? {
                return Ok(());
            }
        }
    }

    fn if_statement(&mut self) -> ParseResult<()> {
        self.bump()?;
        self.paren_expression()?;
        self.statement()?;
        if self.is_name("else") {
            self.bump()?;
            self.statement()?;
        }
        Ok(())
    }

    fn for_statement(&mut self) -> ParseResult<()> {
        self.bump()?;
        let is_await = self.is_name("await");
        if is_await {
            self.bump()?;
        }
        let open = self.cur.start;
        self.expect_punct("(")?;

        if !self.is_punct(";") {
            let declaration = self.is_name("var")
                || self.is_name("const")
                || (self.is_name("let") && self.let_starts_declaration()?);
            if declaration {
                self.variable_declaration(true)?;
            } else {
                self.parse_expression(true)?;
            }
            if self.is_name("of") || self.is_name("in") {
                let of = self.is_name("of");
                self.bump()?;
                if of {
                    self.parse_assignment(false)?;
                } else {
                    self.parse_expression(false)?;
                }
                self.close(open, ")")?;
                return self.statement();
            }
        }
        if is_await {
            return Err(self.unexpected());
        }

        self.expect_punct(";")?;
        if !self.is_punct(";") {
            self.parse_expression(false)?;
        }
        self.expect_punct(";")?;
        if !self.is_punct(")") {
            self.parse_expression(false)?;
        }
        self.close(open, ")")?;
        self.statement()
    }

    fn return_statement(&mut self) -> ParseResult<()> {
        if !self.context.in_function {
            return Err(self.error_at(self.cur.start, "Illegal return statement"));
        }
        self.bump()?;
        let ends = self.is_punct(";")
            || self.is_punct("}")
            || self.cur.kind == TokenKind::Eof
            || self.cur.newline_before;
        if !ends {
            self.parse_expression(false)?;
        }
        self.consume_semicolon()
    }

    fn try_statement(&mut self) -> ParseResult<()> {
        let start = self.cur.start;
        self.bump()?;
        self.block()?;
        let mut handled = false;
        if self.is_name("catch") {
            handled = true;
            self.bump()?;
            if self.is_punct("(") {
                let open = self.cur.start;
                self.bump()?;
                self.binding_target()?;
                self.close(open, ")")?;
            }
            self.block()?;
        }
        if self.is_name("finally") {
            handled = true;
            self.bump()?;
            self.block()?;
        }
        if !handled {
            return Err(self.error_at(start, "Missing catch or finally after try"));
        }
        Ok(())
    }

    fn switch_statement(&mut self) -> ParseResult<()> {
        self.bump()?;
        self.paren_expression()?;
        let open = self.cur.start;
        self.expect_punct("{")?;
        let mut in_clause = false;
        while !self.is_punct("}") && self.cur.kind != TokenKind::Eof {
            if self.is_name("case") {
                self.bump()?;
                self.parse_expression(false)?;
                self.expect_punct(":")?;
                in_clause = true;
            } else if self.is_name("default") {
                self.bump()?;
                self.expect_punct(":")?;
                in_clause = true;
            } else if in_clause {
                self.statement_list_item(false)?;
            } else {
                return Err(self.unexpected());
            }
        }
        self.close(open, "}")
    }

    // ─── Modules ─────────────────────────────────────────────

    /// `import ... from 'react'` becomes bindings against the global; any
    /// other module is unavailable in the preview.
    fn import_declaration(&mut self) -> ParseResult<()> {
        let start = self.cur.start;
        self.bump()?;

        let mut bindings = ReactBindings::default();
        if self.cur.kind != TokenKind::String {
            if self.is_identifier() {
                bindings.default_name = Some(self.text(self.cur));
                self.bump()?;
                if self.eat_punct(",")? && !(self.is_punct("{") || self.is_punct("*")) {
                    return Err(self.unexpected());
                }
            }
            if self.eat_punct("*")? {
                self.expect_name("as")?;
                bindings.namespace = Some(self.binding_identifier()?);
            } else if self.is_punct("{") {
                let open = self.cur.start;
                self.bump()?;
                while !self.is_punct("}") {
                    if !matches!(self.cur.kind, TokenKind::Name | TokenKind::String) {
                        return Err(self.close_error(open, "}"));
                    }
                    let imported = self.text(self.cur);
                    let string_name = self.cur.kind == TokenKind::String;
                    self.bump()?;
                    let local = if self.is_name("as") {
                        self.bump()?;
                        self.binding_identifier()?
                    } else if string_name || is_reserved(imported) {
                        return Err(self.unexpected());
                    } else {
                        imported
                    };
                    bindings.named.push((imported, local));
                    if !self.eat_punct(",")? {
                        break;
                    }
                }
                self.close(open, "}")?;
            }
            self.expect_name("from")?;
        }

        let specifier = self.module_specifier()?;
        if specifier != "react" {
            return Err(self.error_at(
                self.cur.start,
                format!(
                    "Cannot import '{}': only 'react' is available in the preview",
                    specifier
                ),
            ));
        }
        self.bump()?;
        self.consume_semicolon()?;

        // keep line numbers stable for runtime diagnostics
        let end = self.prev_end;
        let mut rewritten = bindings.statements();
        let newlines = self.src[start..end].matches('\n').count();
        rewritten.extend(std::iter::repeat('\n').take(newlines));
        self.push_edit(start, end, rewritten);
        Ok(())
    }

    /// The string under the cursor, unquoted. Does not consume it.
    fn module_specifier(&self) -> ParseResult<&'a str> {
        if self.cur.kind != TokenKind::String {
            return Err(self.unexpected());
        }
        let text = self.text(self.cur);
        Ok(&text[1..text.len() - 1])
    }

    fn export_declaration(&mut self) -> ParseResult<()> {
        self.bump()?;
        if self.is_name("default") {
            self.bump()?;
            if self.is_name("function") {
                return self.function(false, false);
            }
            if self.is_name("async") && self.async_function_follows()? {
                self.bump()?;
                return self.function(true, false);
            }
            if self.is_name("class") {
                return self.class(false);
            }
            self.parse_assignment(false)?;
            return self.consume_semicolon();
        }

        if self.is_punct("*") || self.is_punct("{") {
            if self.eat_punct("*")? {
                if self.is_name("as") {
                    self.bump()?;
                    self.export_name()?;
                }
                self.expect_name("from")?;
            } else {
                let open = self.cur.start;
                self.bump()?;
                while !self.is_punct("}") {
                    self.export_name()?;
                    if self.is_name("as") {
                        self.bump()?;
                        self.export_name()?;
                    }
                    if !self.eat_punct(",")? {
                        break;
                    }
                }
                self.close(open, "}")?;
                if !self.is_name("from") {
                    return self.consume_semicolon();
                }
                self.bump()?;
            }
            let specifier = self.module_specifier()?;
            return Err(self.error_at(
                self.cur.start,
                format!("Cannot re-export from '{}' in the preview", specifier),
            ));
        }

        match self.cur.kind {
            TokenKind::Name => match self.text(self.cur) {
                "var" | "const" | "let" => {
                    self.variable_declaration(false)?;
                    self.consume_semicolon()
                }
                "function" => self.function(false, true),
                "async" if self.async_function_follows()? => {
                    self.bump()?;
                    self.function(true, true)
                }
                "class" => self.class(true),
                _ => Err(self.unexpected()),
            },
            _ => Err(self.unexpected()),
        }
    }

    fn export_name(&mut self) -> ParseResult<()> {
        if matches!(self.cur.kind, TokenKind::Name | TokenKind::String) {
            return self.bump();
        }
        Err(self.unexpected())
    }

    // ─── Bindings ────────────────────────────────────────────

    fn binding_identifier(&mut self) -> ParseResult<&'a str> {
        if !self.is_identifier() {
            return Err(self.unexpected());
        }
        let name = self.text(self.cur);
        self.bump()?;
        Ok(name)
    }

    /// Identifier, array pattern or object pattern.
    fn binding_target(&mut self) -> ParseResult<()> {
        if self.is_punct("[") {
            return self.array_pattern();
        }
        if self.is_punct("{") {
            return self.object_pattern();
        }
        self.binding_identifier().map(|_| ())
    }

    /// Binding target with an optional default value.
    fn binding_element(&mut self) -> ParseResult<()> {
        self.binding_target()?;
        if self.eat_punct("=")? {
            self.parse_assignment(false)?;
        }
        Ok(())
    }

    fn array_pattern(&mut self) -> ParseResult<()> {
        let open = self.cur.start;
        self.bump()?;
        while !self.is_punct("]") {
            if self.eat_punct(",")? {
                continue;
            }
            if self.eat_punct("...")? {
                self.binding_target()?;
                break;
            }
            self.binding_element()?;
            if !self.eat_punct(",")? {
                break;
            }
        }
        self.close(open, "]")
    }

    fn object_pattern(&mut self) -> ParseResult<()> {
        let open = self.cur.start;
        self.bump()?;
        while !self.is_punct("}") {
            if self.eat_punct("...")? {
                self.binding_identifier()?;
                break;
            }
            let shorthand = self.is_identifier();
            self.property_key()?;
            if self.eat_punct(":")? {
                self.binding_element()?;
            } else if !shorthand {
                return Err(self.unexpected());
            } else if self.eat_punct("=")? {
                self.parse_assignment(false)?;
            }
            if !self.eat_punct(",")? {
                break;
            }
        }
        self.close(open, "}")
    }

    fn formal_parameters(&mut self) -> ParseResult<()> {
        let open = self.cur.start;
        self.expect_punct("(")?;
        while !self.is_punct(")") {
            if self.eat_punct("...")? {
                self.binding_target()?;
                break;
            }
            self.binding_element()?;
            if !self.eat_punct(",")? {
                break;
            }
        }
        self.close(open, ")")
    }

    // ─── Functions and classes ───────────────────────────────

    /// `function` keyword under the cursor; `async` already consumed.
    fn function(&mut self, is_async: bool, require_name: bool) -> ParseResult<()> {
        self.bump()?;
        let is_generator = self.eat_punct("*")?;
        if self.cur.kind == TokenKind::Name {
            self.binding_identifier()?;
        } else if require_name {
            return Err(self.unexpected());
        }
        self.function_rest(is_async, is_generator)
    }

    /// Parameters and body.
    fn function_rest(&mut self, is_async: bool, is_generator: bool) -> ParseResult<()> {
        let saved = std::mem::replace(
            &mut self.context,
            Context {
                in_function: true,
                is_async,
                is_generator,
            },
        );
        let result = self.formal_parameters().and_then(|()| self.function_body());
        self.context = saved;
        result
    }

    fn function_body(&mut self) -> ParseResult<()> {
        if !self.is_punct("{") {
            return Err(self.unexpected());
        }
        self.block()
    }

    fn arrow_body(&mut self, is_async: bool, no_in: bool) -> ParseResult<()> {
        let saved = std::mem::replace(
            &mut self.context,
            Context {
                in_function: true,
                is_async,
                is_generator: false,
            },
        );
        let result = if self.is_punct("{") {
            self.block()
        } else {
            self.parse_assignment(no_in)
        };
        self.context = saved;
        result
    }

    /// `class` keyword under the cursor.
    fn class(&mut self, require_name: bool) -> ParseResult<()> {
        self.bump()?;
        if self.is_identifier() {
            self.bump()?;
        } else if require_name {
            return Err(self.unexpected());
        }
        if self.is_name("extends") {
            self.bump()?;
            let heritage = self.left_hand_side()?;
            self.settle(heritage)?;
        }
        let open = self.cur.start;
        self.expect_punct("{")?;
        while !self.is_punct("}") && self.cur.kind != TokenKind::Eof {
            if self.eat_punct(";")? {
                continue;
            }
            self.class_member()?;
        }
        self.close(open, "}")
    }

    fn class_member(&mut self) -> ParseResult<()> {
        const KEY_END: &[&str] = &["(", "=", ";", "}"];

        if self.is_name("static") {
            let next = self.peek_token()?;
            if next.kind == TokenKind::Punct && self.text(next) == "{" {
                self.bump()?;
                let saved = std::mem::replace(
                    &mut self.context,
                    Context {
                        in_function: true,
                        ..Context::default()
                    },
                );
                let result = self.block();
                self.context = saved;
                return result;
            }
            if !self.modifier_is_key(KEY_END)? {
                self.bump()?;
            }
        }
        let (is_async, is_generator, accessor) = self.method_modifiers(KEY_END)?;
        self.property_key()?;

        if self.is_punct("(") {
            return self.function_rest(is_async, is_generator);
        }
        if is_async || is_generator || accessor {
            return Err(self.unexpected());
        }
        if self.eat_punct("=")? {
            let saved = std::mem::replace(
                &mut self.context,
                Context {
                    in_function: true,
                    ..Context::default()
                },
            );
            let result = self.parse_assignment(false);
            self.context = saved;
            result?;
        }
        self.consume_semicolon()
    }

    /// `async`, `*`, `get` and `set` in front of a method name.
    fn method_modifiers(&mut self, key_end: &[&str]) -> ParseResult<(bool, bool, bool)> {
        let mut is_async = false;
        if self.is_name("async") && !self.modifier_is_key(key_end)? {
            if self.peek_token()?.newline_before {
                return Err(self.unexpected());
            }
            self.bump()?;
            is_async = true;
        }
        let is_generator = self.eat_punct("*")?;
        let mut accessor = false;
        let accessor_word = self.is_name("get") || self.is_name("set");
        if !is_async && !is_generator && accessor_word && !self.modifier_is_key(key_end)? {
            self.bump()?;
            accessor = true;
        }
        Ok((is_async, is_generator, accessor))
    }

    /// A modifier word followed by one of `key_end` is itself the key.
    fn modifier_is_key(&self, key_end: &[&str]) -> ParseResult<bool> {
        let next = self.peek_token()?;
        Ok(match next.kind {
            TokenKind::Eof => true,
            TokenKind::Punct => key_end.contains(&self.text(next)),
            _ => false,
        })
    }

    /// Property name in a literal, pattern or class body.
    fn property_key(&mut self) -> ParseResult<()> {
        match self.cur.kind {
            TokenKind::Name | TokenKind::String | TokenKind::Number | TokenKind::PrivateName => {
                self.bump()
            }
            TokenKind::Punct if self.is_punct("[") => {
                let open = self.cur.start;
                self.bump()?;
                self.parse_assignment(false)?;
                self.close(open, "]")
            }
            _ => Err(self.unexpected()),
        }
    }

    // ─── Expressions ─────────────────────────────────────────

    /// Comma expression. With `no_in`, a bare `in` ends it (`for` heads).
    pub(super) fn parse_expression(&mut self, no_in: bool) -> ParseResult<()> {
        self.parse_assignment(no_in)?;
        while self.eat_punct(",")? {
            self.parse_assignment(no_in)?;
        }
        Ok(())
    }

    pub(super) fn parse_assignment(&mut self, no_in: bool) -> ParseResult<()> {
        let shape = self.assignment_cover(no_in)?;
        self.settle(shape)
    }

    /// Assignment expression whose literal may still turn out to be a pattern.
    fn assignment_cover(&mut self, no_in: bool) -> ParseResult<Shape> {
        if self.is_name("yield") && self.context.is_generator {
            return self.yield_expression(no_in);
        }

        let start = self.cur.start;
        let shape = self.conditional(no_in)?;

        if self.is_punct("=>") {
            let (valid, is_async) = match shape {
                Shape::Identifier => (true, false),
                Shape::ArrowParams { valid, is_async } => (valid, is_async),
                _ => return Err(self.unexpected()),
            };
            if self.cur.newline_before {
                return Err(self.unexpected());
            }
            if !valid {
                return Err(self.error_at(start, "Malformed arrow function parameter list"));
            }
            self.bump()?;
            self.arrow_body(is_async, no_in)?;
            return Ok(Shape::Other);
        }

        if self.cur.kind == TokenKind::Punct && ASSIGNMENT_OPERATORS.contains(&self.text(self.cur)) {
            let plain = self.is_punct("=");
            let valid = shape.is_simple_target() || (plain && matches!(shape, Shape::Literal { .. }));
            if !valid {
                return Err(self.error_at(start, "Invalid left-hand side in assignment"));
            }
            self.bump()?;
            let value = self.assignment_cover(no_in)?;
            self.settle(value)?;
            return Ok(Shape::Assign {
                binding: matches!(shape, Shape::Identifier | Shape::Literal { .. }),
            });
        }

        Ok(shape)
    }

    fn yield_expression(&mut self, no_in: bool) -> ParseResult<Shape> {
        self.bump()?;
        if self.cur.newline_before {
            return Ok(Shape::Other);
        }
        let delegate = self.eat_punct("*")?;
        let ends = self.cur.kind == TokenKind::Eof
            || (self.cur.kind == TokenKind::Punct
                && matches!(self.text(self.cur), ")" | "]" | "}" | "," | ";" | ":"));
        if delegate || !ends {
            self.parse_assignment(no_in)?;
        }
        Ok(Shape::Other)
    }

    fn conditional(&mut self, no_in: bool) -> ParseResult<Shape> {
        let test = self.binary(1, no_in)?;
        if !self.is_punct("?") {
            return Ok(test);
        }
        self.settle(test)?;
        self.bump()?;
        self.parse_assignment(false)?;
        self.expect_punct(":")?;
        self.parse_assignment(no_in)?;
        Ok(Shape::Other)
    }

    fn binary_precedence(&self, no_in: bool) -> Option<u8> {
        let text = self.text(self.cur);
        match self.cur.kind {
            TokenKind::Punct => match text {
                "??" => Some(1),
                "||" => Some(2),
                "&&" => Some(3),
                "|" => Some(4),
                "^" => Some(5),
                "&" => Some(6),
                "==" | "!=" | "===" | "!==" => Some(7),
                "<" | ">" | "<=" | ">=" => Some(8),
                "<<" | ">>" | ">>>" => Some(9),
                "+" | "-" => Some(10),
                "*" | "/" | "%" => Some(11),
                "**" => Some(12),
                _ => None,
            },
            TokenKind::Name => match text {
                "instanceof" => Some(8),
                "in" if !no_in => Some(8),
                _ => None,
            },
            _ => None,
        }
    }

    /// Precedence climbing; `**` is right-associative.
    fn binary(&mut self, min: u8, no_in: bool) -> ParseResult<Shape> {
        let mut left = self.unary()?;
        while let Some(precedence) = self.binary_precedence(no_in) {
            if precedence < min {
                break;
            }
            self.settle(left)?;
            let right_min = if self.is_punct("**") {
                precedence
            } else {
                precedence + 1
            };
            self.bump()?;
            let right = self.binary(right_min, no_in)?;
            self.settle(right)?;
            left = Shape::Other;
        }
        Ok(left)
    }

    fn unary(&mut self) -> ParseResult<Shape> {
        let text = self.text(self.cur);
        match self.cur.kind {
            TokenKind::Punct if matches!(text, "!" | "~" | "+" | "-") => {
                self.bump()?;
                let operand = self.unary()?;
                self.settle(operand)?;
                Ok(Shape::Other)
            }
            TokenKind::Punct if matches!(text, "++" | "--") => {
                self.bump()?;
                let start = self.cur.start;
                let operand = self.unary()?;
                if !operand.is_simple_target() {
                    return Err(self.error_at(
                        start,
                        "Invalid left-hand side expression in prefix operation",
                    ));
                }
                Ok(Shape::Other)
            }
            TokenKind::Name if matches!(text, "typeof" | "void" | "delete") => {
                self.bump()?;
                let operand = self.unary()?;
                self.settle(operand)?;
                Ok(Shape::Other)
            }
            TokenKind::Name if text == "await" => {
                if self.context.in_function && !self.context.is_async {
                    return Err(self.error_at(
                        self.cur.start,
                        "await is only valid in async functions and the top level bodies of modules",
                    ));
                }
                self.bump()?;
                let operand = self.unary()?;
                self.settle(operand)?;
                Ok(Shape::Other)
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> ParseResult<Shape> {
        let start = self.cur.start;
        let operand = self.left_hand_side()?;
        if (self.is_punct("++") || self.is_punct("--")) && !self.cur.newline_before {
            if !operand.is_simple_target() {
                return Err(self.error_at(
                    start,
                    "Invalid left-hand side expression in postfix operation",
                ));
            }
            self.bump()?;
            return Ok(Shape::Other);
        }
        Ok(operand)
    }

    /// Member accesses, calls, optional chains and tagged templates.
    fn left_hand_side(&mut self) -> ParseResult<Shape> {
        let mut shape = if self.is_name("new") {
            self.new_expression()?
        } else {
            self.primary()?
        };
        loop {
            match self.cur.kind {
                TokenKind::Punct => match self.text(self.cur) {
                    "." => {
                        self.settle(shape)?;
                        self.bump()?;
                        self.member_name()?;
                        shape = Shape::Member;
                    }
                    "?." => {
                        self.settle(shape)?;
                        self.bump()?;
                        if self.is_punct("(") {
                            self.arguments()?;
                        } else if self.is_punct("[") {
                            self.computed_member()?;
                        } else {
                            self.member_name()?;
                        }
                        shape = Shape::Other;
                    }
                    "[" => {
                        self.settle(shape)?;
                        self.computed_member()?;
                        shape = Shape::Member;
                    }
                    "(" => {
                        self.settle(shape)?;
                        self.arguments()?;
                        shape = Shape::Other;
                    }
                    _ => return Ok(shape),
                },
                TokenKind::Template | TokenKind::TemplateHead => {
                    self.settle(shape)?;
                    self.template()?;
                    shape = Shape::Other;
                }
                _ => return Ok(shape),
            }
        }
    }

    fn new_expression(&mut self) -> ParseResult<Shape> {
        self.bump()?;
        if self.eat_punct(".")? {
            self.expect_name("target")?;
            return Ok(Shape::Other);
        }
        let callee = if self.is_name("new") {
            self.new_expression()?
        } else {
            self.primary()?
        };
        self.settle(callee)?;
        loop {
            if self.eat_punct(".")? {
                self.member_name()?;
            } else if self.is_punct("[") {
                self.computed_member()?;
            } else if matches!(self.cur.kind, TokenKind::Template | TokenKind::TemplateHead) {
                self.template()?;
            } else {
                break;
            }
        }
        if self.is_punct("(") {
            self.arguments()?;
        }
        Ok(Shape::Other)
    }

    fn member_name(&mut self) -> ParseResult<()> {
        if matches!(self.cur.kind, TokenKind::Name | TokenKind::PrivateName) {
            return self.bump();
        }
        Err(self.unexpected())
    }

    fn computed_member(&mut self) -> ParseResult<()> {
        let open = self.cur.start;
        self.bump()?;
        self.parse_expression(false)?;
        self.close(open, "]")
    }

    /// Call arguments. Returns whether they would also be valid arrow
    /// parameters, and the first pattern-only initializer among them.
    fn arguments(&mut self) -> ParseResult<(bool, Option<usize>)> {
        let open = self.cur.start;
        self.expect_punct("(")?;
        let mut params = true;
        let mut pattern_only = None;
        while !self.is_punct(")") {
            let spread = self.eat_punct("...")?;
            let shape = self.assignment_cover(false)?;
            pattern_only = pattern_only.or(shape.pattern_only());
            params &= if spread {
                matches!(shape, Shape::Identifier | Shape::Literal { .. })
            } else {
                shape.is_binding()
            };
            if !self.eat_punct(",")? {
                break;
            }
        }
        self.close(open, ")")?;
        Ok((params, pattern_only))
    }

    fn primary(&mut self) -> ParseResult<Shape> {
        match self.cur.kind {
            TokenKind::Name => self.primary_word(),
            TokenKind::Number | TokenKind::String => {
                self.bump()?;
                Ok(Shape::Other)
            }
            TokenKind::Template | TokenKind::TemplateHead => {
                self.template()?;
                Ok(Shape::Other)
            }
            TokenKind::Punct => match self.text(self.cur) {
                "(" => self.parenthesized(),
                "[" => self.array_literal(),
                "{" => self.object_literal(),
                "<" => {
                    self.jsx_expression()?;
                    Ok(Shape::Other)
                }
                "/" | "/=" => {
                    self.cur = self.lexer.rescan_regex(self.cur)?;
                    self.bump()?;
                    Ok(Shape::Other)
                }
                _ => Err(self.unexpected()),
            },
            TokenKind::PrivateName => {
                // `#field in object`
                let next = self.peek_token()?;
                if next.kind == TokenKind::Name && self.text(next) == "in" {
                    self.bump()?;
                    return Ok(Shape::Other);
                }
                Err(self.unexpected())
            }
            TokenKind::Regex | TokenKind::Eof => Err(self.unexpected()),
        }
    }

    fn primary_word(&mut self) -> ParseResult<Shape> {
        match self.text(self.cur) {
            "function" => {
                self.function(false, false)?;
                Ok(Shape::Other)
            }
            "class" => {
                self.class(false)?;
                Ok(Shape::Other)
            }
            "this" | "null" | "true" | "false" | "super" => {
                self.bump()?;
                Ok(Shape::Other)
            }
            "import" => {
                self.bump()?;
                if self.is_punct("(") {
                    self.arguments()?;
                } else if self.eat_punct(".")? {
                    self.expect_name("meta")?;
                } else {
                    return Err(self.unexpected());
                }
                Ok(Shape::Other)
            }
            "async" => self.async_primary(),
            word if is_reserved(word) => Err(self.unexpected()),
            _ => {
                self.bump()?;
                Ok(Shape::Identifier)
            }
        }
    }

    /// `async` as an async function, an async arrow head or a plain name.
    fn async_primary(&mut self) -> ParseResult<Shape> {
        let next = self.peek_token()?;
        if next.newline_before {
            self.bump()?;
            return Ok(Shape::Identifier);
        }
        let next_text = self.text(next);
        match next.kind {
            TokenKind::Name if next_text == "function" => {
                self.bump()?;
                self.function(true, false)?;
                Ok(Shape::Other)
            }
            TokenKind::Name if !is_reserved(next_text) => {
                self.bump()?;
                self.bump()?;
                if !self.is_punct("=>") || self.cur.newline_before {
                    return Err(self.unexpected());
                }
                Ok(Shape::ArrowParams {
                    valid: true,
                    is_async: true,
                })
            }
            TokenKind::Punct if next_text == "(" => {
                self.bump()?;
                let (params, pattern_only) = self.arguments()?;
                if self.is_punct("=>") && !self.cur.newline_before {
                    return Ok(Shape::ArrowParams {
                        valid: params,
                        is_async: true,
                    });
                }
                if let Some(offset) = pattern_only {
                    return Err(self.error_at(offset, "Invalid shorthand property initializer"));
                }
                Ok(Shape::Other)
            }
            _ => {
                self.bump()?;
                Ok(Shape::Identifier)
            }
        }
    }

    /// Parenthesized expression or arrow parameter list.
    fn parenthesized(&mut self) -> ParseResult<Shape> {
        let open = self.cur.start;
        self.bump()?;
        let mut valid = true;
        // first construct only legal as arrow parameters: offset and message
        let mut arrow_only: Option<(usize, &'static str)> = None;
        let mut shapes = Vec::new();

        if self.is_punct(")") {
            arrow_only = Some((self.cur.start, "Unexpected token ')'"));
        }
        while !self.is_punct(")") {
            if self.is_punct("...") {
                arrow_only.get_or_insert((self.cur.start, "Unexpected token '...'"));
                self.bump()?;
                self.binding_target()?;
                break;
            }
            let shape = self.assignment_cover(false)?;
            if let Some(offset) = shape.pattern_only() {
                arrow_only.get_or_insert((offset, "Invalid shorthand property initializer"));
            }
            valid &= shape.is_binding();
            shapes.push(shape);
            if !self.eat_punct(",")? {
                break;
            }
            if self.is_punct(")") {
                arrow_only.get_or_insert((self.cur.start, "Unexpected token ')'"));
            }
        }
        self.close(open, ")")?;

        if self.is_punct("=>") && !self.cur.newline_before {
            return Ok(Shape::ArrowParams {
                valid,
                is_async: false,
            });
        }
        if let Some((offset, message)) = arrow_only {
            return Err(self.error_at(offset, message));
        }
        match shapes.as_slice() {
            [single] if single.is_simple_target() => Ok(*single),
            _ => Ok(Shape::Other),
        }
    }

    fn array_literal(&mut self) -> ParseResult<Shape> {
        let open = self.cur.start;
        self.bump()?;
        let mut pattern_only = None;
        while !self.is_punct("]") {
            if self.eat_punct(",")? {
                continue;
            }
            self.eat_punct("...")?;
            let shape = self.assignment_cover(false)?;
            pattern_only = pattern_only.or(shape.pattern_only());
            if !self.eat_punct(",")? {
                break;
            }
        }
        self.close(open, "]")?;
        Ok(Shape::Literal { pattern_only })
    }

    fn object_literal(&mut self) -> ParseResult<Shape> {
        const KEY_END: &[&str] = &["(", ":", ",", "}", "="];

        let open = self.cur.start;
        self.bump()?;
        let mut pattern_only = None;
        while !self.is_punct("}") {
            if self.eat_punct("...")? {
                let shape = self.assignment_cover(false)?;
                pattern_only = pattern_only.or(shape.pattern_only());
            } else {
                let (is_async, is_generator, accessor) = self.method_modifiers(KEY_END)?;
                let shorthand = self.is_identifier();
                let key = self.cur.start;
                self.property_key()?;
                if self.is_punct("(") {
                    self.function_rest(is_async, is_generator)?;
                } else if is_async || is_generator || accessor {
                    return Err(self.unexpected());
                } else if self.eat_punct(":")? {
                    let shape = self.assignment_cover(false)?;
                    pattern_only = pattern_only.or(shape.pattern_only());
                } else if !shorthand {
                    return Err(self.unexpected());
                } else if self.is_punct("=") {
                    pattern_only = pattern_only.or(Some(key));
                    self.bump()?;
                    self.parse_assignment(false)?;
                }
            }
            if !self.eat_punct(",")? {
                break;
            }
        }
        self.close(open, "}")?;
        Ok(Shape::Literal { pattern_only })
    }

    fn template(&mut self) -> ParseResult<()> {
        let open = self.cur.start;
        loop {
            if self.cur.kind == TokenKind::Template {
                return self.bump();
            }
            self.bump()?;
            self.parse_expression(false)?;
            if !self.is_punct("}") {
                if self.cur.kind == TokenKind::Eof {
                    return Err(self.error_at(open, "Unterminated template literal"));
                }
                return Err(self.unexpected());
            }
            self.cur = self.lexer.rescan_template(self.cur, open)?;
        }
    }
}

/// Local names bound by an import from `react`
#[derive(Default)]
struct ReactBindings<'a> {
    default_name: Option<&'a str>,
    namespace: Option<&'a str>,
    named: Vec<(&'a str, &'a str)>,
}

impl ReactBindings<'_> {
    /// Declarations that bind each local name against the global `React`.
    fn statements(&self) -> String {
        let mut statements = Vec::new();
        for name in self.default_name.iter().chain(self.namespace.iter()) {
            if *name != "React" {
                statements.push(format!("const {} = React;", name));
            }
        }
        let mut fields = Vec::new();
        for &(imported, local) in &self.named {
            if imported == "default" {
                statements.push(format!("const {} = React;", local));
            } else if imported == local {
                fields.push(imported.to_string());
            } else {
                fields.push(format!("{}: {}", imported, local));
            }
        }
        if !fields.is_empty() {
            statements.push(format!("const {{ {} }} = React;", fields.join(", ")));
        }
        statements.join(" ")
    }
}
