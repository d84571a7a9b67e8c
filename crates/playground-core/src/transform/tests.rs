use super::*;
use super::jsx::{clean_text, decode_entities};

fn body(markup: &str) -> String {
    let module = transform(markup, "").unwrap();
    module.code.strip_prefix(MODULE_PRELUDE).unwrap().to_string()
}

fn error(markup: &str) -> SyntaxError {
    transform(markup, "").unwrap_err()
}

// ─── Plain code ──────────────────────────────────────────

#[test]
fn test_plain_code_passes_through() {
    let src = "export default function C() {\n  const n = a < b ? 1 : 2;\n  return n;\n}\n";
    assert_eq!(body(src), src);
}

#[test]
fn test_prelude_binds_global_react() {
    let module = transform("export default function C(){ return null }", "").unwrap();
    assert!(module.code.starts_with("const React = globalThis.React; export default"));
    assert!(!module.code[..MODULE_PRELUDE.len()].contains('\n'));
}

#[test]
fn test_empty_markup_transforms_to_prelude_only() {
    let module = transform("", "").unwrap();
    assert_eq!(module.code, MODULE_PRELUDE);
}

#[test]
fn test_strings_comments_and_regex_untouched() {
    let src = r#"const s = "<div>"; // <span>
/* <p> */ const r = /<b>/g; const t = `<i>${x}</i>`;"#;
    assert_eq!(body(src), src);
}

#[test]
fn test_comparison_is_not_jsx() {
    let src = "for (let i = 0; i<n; i++) { if (a <b) {} }";
    assert_eq!(body(src), src);
}

#[test]
fn test_regex_after_if_condition() {
    let src = "if (x) /a}/.test(s);\nwhile (y) /[)]/g.exec(t);";
    assert_eq!(body(src), src);
}

#[test]
fn test_division_after_parenthesized_expression() {
    let src = "const n = (a + b) / 2 / c;\nconst m = arr[0] /2;";
    assert_eq!(body(src), src);
}

#[test]
fn test_modern_syntax_passes_through() {
    let src = r#"const items = [{ id: 1, tags: ['a'] }, ...rest];
const pick = ({ id, name = 'x', ...others }, [first, , third] = []) => ({ id, first });
const load = async (url) => { const res = await fetch(url); return res?.json?.() ?? null; };
class Store extends Base {
  static count = 0;
  #items = [];
  get size() { return this.#items.length; }
  async *stream() { for await (const x of this.#items) yield x; }
  static { Store.count++; }
}
function* ids() { let i = 0; while (true) yield i++; }
outer: for (const [k, v] of Object.entries(obj)) { if (!v) continue outer; }
switch (mode) { case 'a': case 'b': break; default: x = `t${y ? `n${z}` : ''}`; }
({ a, b = 2 } = obj);
export default function App() { let n = 0; n **= 2; n ??= 1; return typeof n === 'number' && !(n in obj); }
"#;
    assert_eq!(body(src), src);
}

#[test]
fn test_asi_across_lines() {
    let src = "const a = 1\nconst b = a\n++c\nexport default function C() {\n  return\n}\n";
    assert_eq!(body(src), src);
}

// ─── JSX ─────────────────────────────────────────────────

#[test]
fn test_simple_element() {
    assert_eq!(
        body("const e = <div className=\"p-4\">Hi</div>;"),
        "const e = React.createElement(\"div\", {className: \"p-4\"}, \"Hi\");"
    );
}

#[test]
fn test_self_closing_without_props() {
    assert_eq!(body("x = <br />"), "x = React.createElement(\"br\", null)");
}

#[test]
fn test_component_and_member_types() {
    assert_eq!(
        body("x = <Card><UI.Title /></Card>"),
        "x = React.createElement(Card, null, React.createElement(UI.Title, null))"
    );
}

#[test]
fn test_fragment() {
    assert_eq!(
        body("x = <><a/><b/></>"),
        "x = React.createElement(React.Fragment, null, React.createElement(\"a\", null), React.createElement(\"b\", null))"
    );
}

#[test]
fn test_expression_attributes_and_children() {
    assert_eq!(
        body("x = <button onClick={() => setN(n + 1)} disabled>{n}</button>"),
        "x = React.createElement(\"button\", {onClick: () => setN(n + 1), disabled: true}, n)"
    );
}

#[test]
fn test_dashed_attribute_is_quoted() {
    assert_eq!(
        body("x = <div aria-label=\"close\" data-id={id} />"),
        "x = React.createElement(\"div\", {\"aria-label\": \"close\", \"data-id\": id})"
    );
}

#[test]
fn test_spread_attribute() {
    assert_eq!(
        body("x = <Item key={k} {...props} />"),
        "x = React.createElement(Item, {key: k, ...props})"
    );
}

#[test]
fn test_nested_jsx_inside_expression() {
    assert_eq!(
        body("x = <ul>{items.map(i => <li key={i}>{i}</li>)}</ul>"),
        "x = React.createElement(\"ul\", null, items.map(i => React.createElement(\"li\", {key: i}, i)))"
    );
}

#[test]
fn test_conditional_jsx() {
    assert_eq!(
        body("x = ok ? <b/> : <i/>"),
        "x = ok ? React.createElement(\"b\", null) : React.createElement(\"i\", null)"
    );
}

#[test]
fn test_jsx_inside_template_substitution() {
    assert_eq!(
        body("t = `${<b/>}`"),
        "t = `${React.createElement(\"b\", null)}`"
    );
}

#[test]
fn test_return_parenthesized_multiline() {
    let src = "export default function C() {\n  return (\n    <div>\n      Hello\n      world\n    </div>\n  );\n}";
    let out = body(src);
    assert!(out.contains("React.createElement(\"div\", null, \"Hello world\")"));
    assert!(out.starts_with("export default function C()"));
}

#[test]
fn test_text_keeps_inline_spaces() {
    assert_eq!(
        body("x = <p>Hello {name}!</p>"),
        "x = React.createElement(\"p\", null, \"Hello \", name, \"!\")"
    );
}

#[test]
fn test_trailing_line_comment_in_child_stays_behind() {
    assert_eq!(
        body("x = <p>{name // who\n}</p>"),
        "x = React.createElement(\"p\", null, name)"
    );
}

#[test]
fn test_trailing_line_comment_in_attribute_and_spread() {
    let out = body("x = <p title={t // hint\n} {...rest // more\n} />");
    assert_eq!(out, "x = React.createElement(\"p\", {title: t, ...rest})");
}

#[test]
fn test_inner_line_comment_keeps_its_newline() {
    assert_eq!(
        body("x = <p>{a // first\n + b}</p>"),
        "x = React.createElement(\"p\", null, a // first\n + b)"
    );
}

#[test]
fn test_spread_child() {
    assert_eq!(
        body("x = <ul>{...items}</ul>"),
        "x = React.createElement(\"ul\", null, ...items)"
    );
}

#[test]
fn test_element_as_attribute_value() {
    assert_eq!(
        body("x = <Tip icon=<b/> />"),
        "x = React.createElement(Tip, {icon: React.createElement(\"b\", null)})"
    );
}

#[test]
fn test_comment_only_child_dropped() {
    assert_eq!(
        body("x = <div>{/* todo */}</div>"),
        "x = React.createElement(\"div\", null)"
    );
}

#[test]
fn test_text_quotes_are_escaped() {
    assert_eq!(
        body("x = <p>Don't \"quote\"</p>"),
        "x = React.createElement(\"p\", null, \"Don't \\\"quote\\\"\")"
    );
}

#[test]
fn test_entities_decoded() {
    assert_eq!(
        body("x = <p title=\"a &amp; b\">1 &lt; 2</p>"),
        "x = React.createElement(\"p\", {title: \"a & b\"}, \"1 < 2\")"
    );
}

#[test]
fn test_comment_inside_tag() {
    assert_eq!(
        body("x = <div /* note */ id=\"a\" />"),
        "x = React.createElement(\"div\", {id: \"a\"})"
    );
}

#[test]
fn test_unicode_text() {
    assert_eq!(
        body("x = <p>héllo → 世界</p>"),
        "x = React.createElement(\"p\", null, \"héllo → 世界\")"
    );
}

// ─── Imports ─────────────────────────────────────────────

#[test]
fn test_default_react_import_dropped() {
    assert_eq!(body("import React from 'react';\nx = 1;"), "\nx = 1;");
}

#[test]
fn test_named_react_imports_bound() {
    assert_eq!(
        body("import React, { useState, useEffect as useFx } from \"react\";"),
        "const { useState, useEffect: useFx } = React;"
    );
}

#[test]
fn test_namespace_import() {
    assert_eq!(body("import * as R from 'react';"), "const R = React;");
}

#[test]
fn test_multiline_import_keeps_line_count() {
    let out = body("import {\n  useState,\n} from 'react';\nx = 1;");
    assert_eq!(out, "const { useState } = React;\n\n\nx = 1;");
}

#[test]
fn test_dynamic_import_untouched() {
    assert_eq!(body("const m = import('./x.js');"), "const m = import('./x.js');");
}

#[test]
fn test_foreign_import_rejected() {
    let err = error("import { motion } from 'framer-motion';\n");
    assert!(err.message.contains("framer-motion"));
    assert_eq!(err.line, 1);
    assert_eq!(err.column, 24);
}

// ─── Syntax errors ───────────────────────────────────────

#[test]
fn test_mismatched_closing_tag() {
    let err = error("x = <div>\n  <span>hi</div>\n</div>");
    assert!(err.message.contains("<span>"), "{}", err.message);
    assert_eq!(err.line, 2);
}

#[test]
fn test_unterminated_element() {
    let err = error("x = <div>hello");
    assert!(err.message.starts_with("Unterminated JSX contents"));
    assert_eq!((err.line, err.column), (1, 5));
}

#[test]
fn test_unclosed_brace() {
    let err = error("function C() {\n  return 1;\n");
    assert!(err.message.contains("'{' is never closed"));
    assert_eq!((err.line, err.column), (1, 14));
}

#[test]
fn test_mismatched_bracket() {
    let err = error("f(a, [b)");
    assert!(err.message.contains("expected ']'"), "{}", err.message);
    assert_eq!(err.column, 8);
}

#[test]
fn test_stray_closing_bracket() {
    let err = error("x = 1; }");
    assert_eq!(err.message, "Unexpected token '}'");
}

#[test]
fn test_unterminated_string() {
    let err = error("const s = 'abc\n';");
    assert_eq!(err.message, "Unterminated string constant");
    assert_eq!((err.line, err.column), (1, 11));
}

#[test]
fn test_unterminated_template() {
    let err = error("const s = `abc");
    assert_eq!(err.message, "Unterminated template literal");
}

#[test]
fn test_unterminated_comment() {
    let err = error("/* never ends");
    assert_eq!(err.message, "Unterminated comment");
}

#[test]
fn test_empty_attribute_expression() {
    let err = error("x = <div id={} />");
    assert!(err.message.contains("non-empty expression"));
}

#[test]
fn test_greater_than_in_text() {
    let err = error("x = <p>a > b</p>");
    assert!(err.message.starts_with("Unexpected token '>'"));
}

#[test]
fn test_incomplete_binary_expression() {
    let err = error("export default function C() { return 1 +; }");
    assert_eq!(err.message, "Unexpected token ';'");
    assert_eq!((err.line, err.column), (1, 41));
}

#[test]
fn test_missing_binding_name() {
    let err = error("const = 5;");
    assert_eq!(err.message, "Unexpected token '='");
    assert_eq!(err.column, 7);
}

#[test]
fn test_const_without_initializer() {
    let err = error("const total;");
    assert_eq!(err.message, "Missing initializer in const declaration");
}

#[test]
fn test_missing_comma_between_arguments() {
    let err = error("f(a b)");
    assert!(err.message.contains("expected ')'"), "{}", err.message);
    assert_eq!(err.column, 5);
}

#[test]
fn test_two_expressions_on_one_line() {
    let err = error("let a = 1 2;");
    assert_eq!(err.message, "Unexpected number");
}

#[test]
fn test_invalid_assignment_target() {
    let err = error("1 = 2;");
    assert_eq!(err.message, "Invalid left-hand side in assignment");
    let err = error("a + b = c;");
    assert_eq!(err.message, "Invalid left-hand side in assignment");
}

#[test]
fn test_shorthand_initializer_outside_pattern() {
    let err = error("x = ({ a = 1 });");
    assert_eq!(err.message, "Invalid shorthand property initializer");
    assert_eq!(err.column, 8);
}

#[test]
fn test_empty_parens_need_arrow() {
    let err = error("x = ();");
    assert_eq!(err.message, "Unexpected token ')'");
}

#[test]
fn test_await_outside_async_function() {
    let err = error("function load() { await fetch(u); }");
    assert!(err.message.starts_with("await is only valid in async functions"));
    assert!(transform("const data = await fetch(u);", "").is_ok());
}

#[test]
fn test_return_outside_function() {
    assert_eq!(error("return 1;").message, "Illegal return statement");
}

#[test]
fn test_nested_import_rejected() {
    let err = error("function f() {\n  import { useState } from 'react';\n}");
    assert!(err.message.contains("top level"));
    assert_eq!((err.line, err.column), (2, 3));
}

#[test]
fn test_reexport_rejected() {
    let err = error("export { motion } from 'framer-motion';");
    assert!(err.message.contains("framer-motion"));
}

#[test]
fn test_syntax_error_inside_jsx_expression() {
    let err = error("x = <p>{a +}</p>");
    assert_eq!(err.message, "Unexpected token '}'");
    assert_eq!(err.column, 12);
}

#[test]
fn test_unclosed_jsx_expression() {
    let err = error("x = <p>{a");
    assert!(err.message.contains("'{' is never closed"), "{}", err.message);
    assert_eq!(err.column, 8);
}

#[test]
fn test_error_display_includes_position() {
    let err = error("x = <div>");
    assert_eq!(err.to_string(), format!("SyntaxError: {} (1:5)", err.message));
}

#[test]
fn test_typical_generated_component() {
    let src = r#"import React, { useState } from 'react';

export default function Counter() {
  const [count, setCount] = useState(0);
  return (
    <div className="flex items-center gap-2 p-4">
      <button
        className="rounded bg-red-500 px-4 py-2 text-white"
        onClick={() => setCount(count + 1)}
      >
        Clicked {count} times
      </button>
      {count > 3 && <span className="text-sm">That's a lot!</span>}
    </div>
  );
}
"#;
    let out = body(src);
    assert!(out.starts_with("const { useState } = React;\n\nexport default function Counter()"));
    assert!(out.contains("React.createElement(\"button\", {className: \"rounded bg-red-500 px-4 py-2 text-white\", onClick: () => setCount(count + 1)}, \"Clicked \", count, \" times\")"));
    assert!(out.contains("count > 3 && React.createElement(\"span\", {className: \"text-sm\"}, \"That's a lot!\")"));
    assert!(!out.contains('<'));
}

// ─── Helpers ─────────────────────────────────────────────

#[test]
fn test_clean_text_rules() {
    assert_eq!(clean_text("\n    \n"), None);
    assert_eq!(clean_text("  a  "), Some("  a  ".to_string()));
    assert_eq!(clean_text("\n  first\n  second  \n"), Some("first second".to_string()));
}

#[test]
fn test_decode_entities() {
    assert_eq!(decode_entities("&#65;&#x42;&nbsp;"), "AB\u{a0}");
    assert_eq!(decode_entities("AT&T &unknown;"), "AT&T &unknown;");
}

#[test]
fn test_style_end_tag_neutralized() {
    let module = transform("", ".a{} </STYLE><script>alert(1)</script>").unwrap();
    assert!(!module.style.to_ascii_lowercase().contains("</style"));
    assert!(module.style.contains("<\\/STYLE>"));
}

#[test]
fn test_style_passes_through() {
    let module = transform("", ".btn { color: red; }").unwrap();
    assert_eq!(module.style, ".btn { color: red; }");
}
