//! Code transform: AI-authored component source to an executable ES module.
//!
//! The transform is a pure text-to-text pass: JSX is rewritten into
//! `React.createElement` calls and `react` imports are bound to the global
//! `React` that every preview document loads. The whole module is parsed
//! first, so a syntax error is reported before any of it runs.

mod jsx;
mod lexer;
mod parser;
#[cfg(test)]
mod tests;

use thiserror::Error;

/// Prepended to every module. Kept on one line so runtime error positions
/// still match the markup the user sees.
const MODULE_PRELUDE: &str = "const React = globalThis.React; ";

/// A malformed construct in the markup source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("SyntaxError: {message} ({line}:{column})")]
pub struct SyntaxError {
    pub message: String,
    /// 1-based
    pub line: usize,
    /// 1-based, in characters
    pub column: usize,
}

impl SyntaxError {
    pub(crate) fn at(src: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(src.len());
        let before = &src[..floor_char_boundary(src, offset)];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

/// Output of a successful transform, ready to be loaded by the sandbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedModule {
    /// ES module source; the component is its default export
    pub code: String,
    /// Stylesheet text, safe to inline in a `<style>` element
    pub style: String,
}

/// Transform a markup/style pair into a loadable module.
pub fn transform(markup: &str, style: &str) -> Result<TransformedModule, SyntaxError> {
    let body = parser::Parser::new(markup)?.module()?;
    Ok(TransformedModule {
        code: format!("{}{}", MODULE_PRELUDE, body),
        style: neutralize_style_end(style),
    })
}

/// Break up `</style` so stylesheet text cannot close its element early.
fn neutralize_style_end(style: &str) -> String {
    let lower = style.to_ascii_lowercase();
    if !lower.contains("</style") {
        return style.to_string();
    }
    let mut out = String::with_capacity(style.len() + 8);
    let mut last = 0;
    for (idx, _) in lower.match_indices("</style") {
        out.push_str(&style[last..idx]);
        out.push_str("<\\/");
        last = idx + 2;
    }
    out.push_str(&style[last..]);
    out
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
