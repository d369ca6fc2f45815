//! Reading and writing string and template literal text.
//!
//! Values come from the parser: SWC has already decoded escapes into
//! `Str::value` and `TplElement::cooked`. Only the opposite direction,
//! turning a value back into literal source, lives here.

use swc_ecma_ast::{Str, TplElement};

/// Value of a string literal.
///
/// Lone surrogates, which a Rust string cannot hold, become U+FFFD.
pub fn string_value(s: &Str) -> String {
    s.value.to_string_lossy().into_owned()
}

/// Cooked value of one template chunk, its raw text when it has none.
pub fn template_value(quasi: &TplElement) -> String {
    match &quasi.cooked {
        Some(cooked) => cooked.to_string_lossy().into_owned(),
        None => quasi.raw.to_string(),
    }
}

/// Render `value` as a double-quoted string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Escape `value` so it reads back unchanged as template literal text.
pub fn escape_template(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '`' => out.push_str("\\`"),
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '$' if chars.get(i + 1) == Some(&'{') => out.push_str("\\$"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_snapshot;
    use swc_ecma_ast::{Expr, Lit, ModuleItem, Stmt};

    fn expr(source: &str) -> Expr {
        let snapshot = parse_snapshot(source, "literal.ts").unwrap();
        let ModuleItem::Stmt(Stmt::Expr(stmt)) = &snapshot.module.body[0] else {
            panic!("expected an expression statement");
        };
        (*stmt.expr).clone()
    }

    fn string(source: &str) -> String {
        match expr(source) {
            Expr::Lit(Lit::Str(s)) => string_value(&s),
            other => panic!("expected a string literal, got {other:?}"),
        }
    }

    fn template(source: &str) -> String {
        match expr(source) {
            Expr::Tpl(tpl) => template_value(&tpl.quasis[0]),
            other => panic!("expected a template literal, got {other:?}"),
        }
    }

    #[test]
    fn values_come_back_decoded() {
        assert_eq!(string(r#""bg-blue-800""#), "bg-blue-800");
        assert_eq!(string(r"'a\nb'"), "a\nb");
        assert_eq!(string(r#""\x41B\u{43}""#), "ABC");
        assert_eq!(string(r#""😀""#), "\u{1F600}");
        assert_eq!(template(r"`a\`b\${c}`"), "a`b${c}");
        assert_eq!(template("`line\\\ncontinued`"), "linecontinued");
    }

    #[test]
    fn quoted_values_read_back_unchanged() {
        for value in ["plain", "with \"quotes\"", "back\\slash", "multi\nline", "sep\u{2028}"] {
            assert_eq!(string(&quote(value)), value);
        }
    }

    #[test]
    fn escaped_template_text_reads_back_unchanged() {
        assert_eq!(escape_template("a`b"), "a\\`b");
        assert_eq!(escape_template("${x}"), "\\${x}");
        assert_eq!(escape_template("$5"), "$5");
        for value in ["a`b\\c${d}", "cr\rlf", "$5 and ${"] {
            assert_eq!(template(&format!("`{}`", escape_template(value))), value);
        }
    }
}
