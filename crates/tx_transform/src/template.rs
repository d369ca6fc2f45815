//! Simplification of class-list template literals.
//!
//! A template literal is read as a space-separated list of classes. A class
//! is whatever sits between whitespace: a run of static text, an embedded
//! expression, or text and expressions glued together as in `btn-${size}`.
//! The simplifier rewrites the list into the most compact equivalent:
//!
//! - blank static text disappears and the rest is trimmed
//! - literal expressions are inlined as text
//! - nested templates are spliced into the enclosing one
//! - `test && value` and `test ? value : ""` (or `" "`) standing alone become
//!   conditional segments that carry their own separating spaces
//! - a template with nothing dynamic left becomes a string literal
//!
//! A glued class keeps its exact value. Literals and nested templates inside
//! it are inlined, nothing else changes.
//!
//! Only templates in class position are touched: the top-level template of
//! the snippet, and templates standing alone as a class or as a conditional
//! value. A template passed to some other call is left alone.

use std::collections::HashSet;

use swc_common::{Span, Spanned};
use tx_ast::{BinaryOp, Expr, Lit, ModuleItem, Stmt, TransformOptions, Tpl};
use tx_parser::literal::{escape_template, quote, string_value, template_value};
use tx_rewrite::{FixedPointRewriter, Pass, RewriteError, Rule, Target};

/// Simplify `code`, a module whose top-level expression statements are
/// template literals.
pub fn simplify_template(code: &str, options: &TransformOptions) -> Result<String, RewriteError> {
    let rewritten = FixedPointRewriter::new(TemplateSimplifier::default())
        .with_file_name(options.file_name.clone())
        .with_max_passes(options.max_passes)
        .run(code)?;
    Ok(rewritten.code)
}

/// [`Rule`] that simplifies class-position template literals.
#[derive(Debug, Default)]
pub struct TemplateSimplifier {
    class_templates: HashSet<(u32, u32)>,
}

impl Rule for TemplateSimplifier {
    type Error = RewriteError;
    type Selected<'a> = &'a Tpl;

    fn seed(&mut self, pass: &Pass<'_>) -> Result<(), RewriteError> {
        self.class_templates.clear();
        for item in &pass.snapshot().module.body {
            if let ModuleItem::Stmt(Stmt::Expr(stmt)) = item {
                collect_class_templates(&stmt.expr, &mut self.class_templates);
            }
        }
        Ok(())
    }

    fn select<'a>(&self, _pass: &Pass<'_>, target: Target<'a>) -> Option<&'a Tpl> {
        match target {
            Target::Template(tpl) if self.class_templates.contains(&span_key(tpl.span)) => Some(tpl),
            _ => None,
        }
    }

    fn rewrite(&self, pass: &Pass<'_>, tpl: &Tpl) -> Result<Option<String>, RewriteError> {
        Ok(Some(render(&parts(pass, tpl))))
    }
}

fn span_key(span: Span) -> (u32, u32) {
    (span.lo.0, span.hi.0)
}

fn collect_class_templates(expr: &Expr, out: &mut HashSet<(u32, u32)>) {
    let Expr::Tpl(tpl) = strip_parens(expr) else {
        return;
    };
    out.insert(span_key(tpl.span));

    for class in classes(tpl) {
        let [Piece::Expr(element)] = class.as_slice() else {
            continue;
        };
        match strip_parens(element) {
            Expr::Tpl(_) => collect_class_templates(element, out),
            Expr::Bin(bin) if bin.op == BinaryOp::LogicalAnd => {
                collect_class_templates(unpad(&bin.right), out)
            }
            Expr::Cond(cond) if is_blank_string(&cond.alt) => {
                collect_class_templates(unpad(&cond.cons), out)
            }
            _ => {}
        }
    }
}

/// Part of one class: cooked static text or an embedded expression.
#[derive(Debug, Clone)]
enum Piece<'a> {
    Text(String),
    Expr(&'a Expr),
}

/// Split a template into classes at the whitespace in its static text.
///
/// Text and expressions with no whitespace between them form one class,
/// and so do two expressions with nothing between them.
fn classes(tpl: &Tpl) -> Vec<Vec<Piece<'_>>> {
    let mut classes = Vec::new();
    let mut current = Vec::new();

    for (i, quasi) in tpl.quasis.iter().enumerate() {
        let cooked = template_value(quasi);
        for (j, word) in cooked.split(char::is_whitespace).enumerate() {
            // Every whitespace character ends the class in progress.
            if j > 0 && !current.is_empty() {
                classes.push(std::mem::take(&mut current));
            }
            if !word.is_empty() {
                current.push(Piece::Text(word.to_string()));
            }
        }
        if let Some(expr) = tpl.exprs.get(i) {
            current.push(Piece::Expr(&**expr));
        }
    }
    if !current.is_empty() {
        classes.push(current);
    }
    classes
}

/// One element of a class list.
#[derive(Debug, Clone, PartialEq)]
enum Part {
    /// Static text, cooked.
    Text(String),
    /// Template source, inserted as is.
    Splice(String),
    /// Source of an embedded expression.
    Embed(String),
    /// Contributes `value` when `test` is truthy.
    Conditional { test: String, value: Branch },
}

/// The value of a conditional segment.
#[derive(Debug, Clone, PartialEq)]
enum Branch {
    Text(String),
    /// Source of an expression, ready to be an operand of `+`.
    Expr(String),
}

fn parts(pass: &Pass<'_>, tpl: &Tpl) -> Vec<Part> {
    classes(tpl)
        .iter()
        .filter_map(|class| match class.as_slice() {
            [Piece::Text(text)] => Some(Part::Text(text.clone())),
            [Piece::Expr(expr)] => classify(pass, expr),
            glued => glue(pass, glued),
        })
        .collect()
}

fn classify(pass: &Pass<'_>, expr: &Expr) -> Option<Part> {
    let part = match strip_parens(expr) {
        Expr::Lit(lit) => match literal_text(lit) {
            Some(text) => return non_blank(&text).map(Part::Text),
            None => Part::Embed(pass.text(expr.span()).to_string()),
        },
        Expr::Tpl(inner) if inner.exprs.is_empty() => {
            return non_blank(&static_template_text(inner)).map(Part::Text);
        }
        Expr::Tpl(inner) => Part::Splice(template_body(pass, inner).to_string()),
        Expr::Bin(bin) if bin.op == BinaryOp::LogicalAnd => conditional(pass, &bin.left, &bin.right),
        Expr::Cond(cond) if is_blank_string(&cond.alt) => conditional(pass, &cond.test, &cond.cons),
        _ => Part::Embed(pass.text(expr.span()).to_string()),
    };
    Some(part)
}

/// A class made of several pieces, rendered to exactly the same value.
fn glue(pass: &Pass<'_>, pieces: &[Piece<'_>]) -> Option<Part> {
    let mut plain = Some(String::new());
    let mut source = String::new();

    for piece in pieces {
        let expr = match piece {
            Piece::Text(text) => {
                append_text(&mut plain, &mut source, text);
                continue;
            }
            Piece::Expr(expr) => strip_parens(expr),
        };
        let text = match expr {
            Expr::Lit(lit) => literal_text(lit),
            Expr::Tpl(inner) if inner.exprs.is_empty() => Some(static_template_text(inner)),
            _ => None,
        };
        if let Some(text) = text {
            append_text(&mut plain, &mut source, &text);
            continue;
        }

        plain = None;
        let spliced = match expr {
            Expr::Tpl(inner) => template_body(pass, inner).to_string(),
            _ => format!("${{{}}}", pass.text(expr.span())),
        };
        source.push_str(&spliced);
    }

    match plain {
        Some(plain) => non_blank(&plain).map(Part::Text),
        None => Some(Part::Splice(source)),
    }
}

fn append_text(plain: &mut Option<String>, source: &mut String, text: &str) {
    source.push_str(&escape_template(text));
    if let Some(plain) = plain {
        plain.push_str(text);
    }
}

fn conditional(pass: &Pass<'_>, test: &Expr, value: &Expr) -> Part {
    let test_text = pass.text(test.span());
    let test = if matches!(
        test,
        Expr::Cond(_) | Expr::Assign(_) | Expr::Seq(_) | Expr::Arrow(_) | Expr::Yield(_)
    ) {
        format!("({test_text})")
    } else {
        test_text.to_string()
    };

    let value = unpad(value);
    let branch = match strip_parens(value) {
        Expr::Lit(lit) => literal_text(lit).map(|text| Branch::Text(text.trim().to_string())),
        Expr::Tpl(inner) if inner.exprs.is_empty() => {
            Some(Branch::Text(static_template_text(inner).trim().to_string()))
        }
        _ => None,
    }
    .unwrap_or_else(|| Branch::Expr(operand_text(pass, value)));

    Part::Conditional { test, value: branch }
}

fn render(parts: &[Part]) -> String {
    let mut plain = String::new();
    let mut source = String::new();
    let mut is_static = true;
    let mut after_conditional = false;

    for (i, part) in parts.iter().enumerate() {
        let first = i == 0;
        let separated = !(first || after_conditional);
        let separator = if separated { " " } else { "" };

        match part {
            Part::Text(text) => {
                plain.push_str(separator);
                plain.push_str(text);
                source.push_str(separator);
                source.push_str(&escape_template(text));
                after_conditional = false;
            }
            Part::Splice(body) => {
                is_static = false;
                source.push_str(separator);
                source.push_str(body);
                after_conditional = false;
            }
            Part::Embed(expr) => {
                is_static = false;
                source.push_str(separator);
                source.push_str("${");
                source.push_str(expr);
                source.push('}');
                after_conditional = false;
            }
            Part::Conditional { test, value } => {
                is_static = false;
                // In a trailing run of conditionals each one brings its own
                // leading space; elsewhere the trailing space separates it
                // from whatever follows.
                let trailing_run = parts[i + 1..]
                    .iter()
                    .all(|p| matches!(p, Part::Conditional { .. }));
                let (lead, trail) = if trailing_run {
                    (!first, false)
                } else {
                    (separated, true)
                };
                source.push_str(&render_conditional(test, value, lead, trail));
                after_conditional = true;
            }
        }
    }

    if is_static {
        quote(&plain)
    } else {
        format!("`{source}`")
    }
}

fn render_conditional(test: &str, value: &Branch, lead: bool, trail: bool) -> String {
    let consequent = match value {
        Branch::Text(text) => {
            let lead = if lead { " " } else { "" };
            let trail = if trail { " " } else { "" };
            quote(&format!("{lead}{text}{trail}"))
        }
        Branch::Expr(expr) => {
            let mut consequent = String::new();
            if lead {
                consequent.push_str("\" \" + ");
            }
            consequent.push_str(expr);
            if trail {
                consequent.push_str(" + \" \"");
            }
            consequent
        }
    };
    let alternate = if lead && trail { "\" \"" } else { "\"\"" };
    format!("${{{test} ? {consequent} : {alternate}}}")
}

fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

pub(crate) fn strip_parens(mut expr: &Expr) -> &Expr {
    while let Expr::Paren(paren) = expr {
        expr = &*paren.expr;
    }
    expr
}

/// Remove the `" " + … + " "` padding a previous pass wrapped around a
/// conditional value.
fn unpad(expr: &Expr) -> &Expr {
    let mut expr = strip_parens(expr);
    if let Expr::Bin(bin) = expr {
        if bin.op == BinaryOp::Add && is_string(&bin.right, &[" "]) {
            expr = &*bin.left;
        }
    }
    if let Expr::Bin(bin) = expr {
        if bin.op == BinaryOp::Add && is_string(&bin.left, &[" "]) {
            expr = &*bin.right;
        }
    }
    expr
}

/// Source of `expr`, parenthesized unless it can stand as an operand of `+`.
fn operand_text(pass: &Pass<'_>, expr: &Expr) -> String {
    let text = pass.text(expr.span());
    let primary = matches!(
        expr,
        Expr::Ident(_)
            | Expr::Lit(_)
            | Expr::Tpl(_)
            | Expr::TaggedTpl(_)
            | Expr::Call(_)
            | Expr::Member(_)
            | Expr::SuperProp(_)
            | Expr::Paren(_)
            | Expr::Array(_)
            | Expr::Object(_)
            | Expr::This(_)
            | Expr::OptChain(_)
            | Expr::TsNonNull(_)
    );
    if primary {
        text.to_string()
    } else {
        format!("({text})")
    }
}

fn is_string(expr: &Expr, values: &[&str]) -> bool {
    match strip_parens(expr) {
        Expr::Lit(Lit::Str(s)) => values.contains(&string_value(s).as_str()),
        _ => false,
    }
}

fn is_blank_string(expr: &Expr) -> bool {
    is_string(expr, &["", " "])
}

/// Text a literal contributes when converted to a string.
///
/// Numbers follow JavaScript's number-to-string conversion.
pub(crate) fn literal_text(lit: &Lit) -> Option<String> {
    match lit {
        Lit::Str(s) => Some(string_value(s)),
        Lit::Bool(b) => Some(b.value.to_string()),
        Lit::Null(_) => Some("null".to_string()),
        Lit::Num(num) => Some(ryu_js::Buffer::new().format(num.value).to_string()),
        Lit::BigInt(big) => Some(big.value.to_string()),
        _ => None,
    }
}

/// Cooked text of a template literal without expressions.
pub(crate) fn static_template_text(tpl: &Tpl) -> String {
    tpl.quasis.first().map(template_value).unwrap_or_default()
}

/// Source between the backticks.
fn template_body<'a>(pass: &Pass<'a>, tpl: &Tpl) -> &'a str {
    let text = pass.text(tpl.span);
    text.get(1..text.len().saturating_sub(1)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simplify(code: &str) -> String {
        simplify_template(code, &TransformOptions::default()).unwrap()
    }

    #[test]
    fn literal_elements_fold_into_a_string() {
        assert_eq!(simplify(r#"`${"a"} ${"b"}`"#), r#""a b""#);
        assert_eq!(simplify(r#"`${"a"} ${1} ${true} ${null}`"#), r#""a 1 true null""#);
        assert_eq!(simplify("`  a   ${\"\"}  b  `"), r#""a b""#);
        assert_eq!(simplify("``"), r#""""#);
    }

    #[test]
    fn numbers_print_as_javascript_does() {
        assert_eq!(simplify(r#"`${"a"} ${1.50} ${.5}`"#), r#""a 1.5 0.5""#);
        assert_eq!(simplify("`${0x10} ${1e21} ${1_000} ${10n}`"), r#""16 1e+21 1000 10""#);
    }

    #[test]
    fn glued_text_and_expressions_stay_one_class() {
        assert_eq!(simplify(r#"`${"btn"} ${`btn-${size}`}`"#), r#"`btn btn-${size}`"#);
        assert_eq!(simplify("`px-${n}`"), "`px-${n}`");
        assert_eq!(simplify("`${a}${b} c`"), "`${a}${b} c`");
        assert_eq!(simplify(r#"`w-${"full"} ${x}`"#), "`w-full ${x}`");
        assert_eq!(simplify(r#"`w-${1.5}`"#), r#""w-1.5""#);
        assert_eq!(simplify(r#"`a-${`${b}-c`}`"#), "`a-${b}-c`");
    }

    #[test]
    fn glued_conditionals_keep_their_value() {
        assert_eq!(
            simplify(r#"`${c && `btn-${size}`}`"#),
            r#"`${c ? `btn-${size}` : ""}`"#
        );
        assert_eq!(
            simplify(r#"`${"btn"} ${c && `btn-${size}`}`"#),
            r#"`btn${c ? " " + `btn-${size}` : ""}`"#
        );
        assert_eq!(simplify(r#"`btn${c ? "-on" : ""}`"#), r#"`btn${c ? "-on" : ""}`"#);
    }

    #[test]
    fn conditional_padding_depends_on_position() {
        assert_eq!(
            simplify(r#"`${"a"} ${c && "x"} ${"b"}`"#),
            r#"`a${c ? " x " : " "}b`"#
        );
        assert_eq!(
            simplify(r#"`${c && "x"} ${"a"} ${"b"}`"#),
            r#"`${c ? "x " : ""}a b`"#
        );
        assert_eq!(
            simplify(r#"`${"a"} ${"b"} ${c && "x"}`"#),
            r#"`a b${c ? " x" : ""}`"#
        );
        assert_eq!(simplify(r#"`${c && "x"}`"#), r#"`${c ? "x" : ""}`"#);
    }

    #[test]
    fn blank_alternates_become_conditionals() {
        assert_eq!(
            simplify(r#"`${c ? "x" : ""} ${"b"}`"#),
            r#"`${c ? "x " : ""}b`"#
        );
        assert_eq!(
            simplify(r#"`${"a"} ${c ? "x" : "y"}`"#),
            r#"`a ${c ? "x" : "y"}`"#
        );
    }

    #[test]
    fn adjacent_conditionals_share_one_space() {
        assert_eq!(
            simplify(r#"`${"p"} ${a && "x"} ${b && "y"} ${"q"}`"#),
            r#"`p${a ? " x " : " "}${b ? "y " : ""}q`"#
        );
        assert_eq!(
            simplify(r#"`${"p"} ${a && "x"} ${b && "y"}`"#),
            r#"`p${a ? " x" : ""}${b ? " y" : ""}`"#
        );
    }

    #[test]
    fn dynamic_values_are_padded_by_concatenation() {
        assert_eq!(
            simplify(r#"`${"a"} ${c && x} ${"b"}`"#),
            r#"`a${c ? " " + x + " " : " "}b`"#
        );
        assert_eq!(
            simplify(r#"`${"a"} ${c && x.y ? p : q}`"#),
            r#"`a ${c && x.y ? p : q}`"#
        );
        assert_eq!(
            simplify(r#"`${"a"} ${c && (p || q)}`"#),
            r#"`a${c ? " " + (p || q) : ""}`"#
        );
    }

    #[test]
    fn nested_templates_are_spliced() {
        assert_eq!(simplify(r#"`${"a"} ${`${b} c`}`"#), r#"`a ${b} c`"#);
        assert_eq!(
            simplify(r#"`${"a"} ${"b"} ${`${c ? "x" : ""}`}`"#),
            r#"`a b${c ? " x" : ""}`"#
        );
    }

    #[test]
    fn other_expressions_are_embedded() {
        assert_eq!(simplify(r#"`${"a"} ${x()} ${y}`"#), r#"`a ${x()} ${y}`"#);
        assert_eq!(simplify(r#"`${"a"} ${f(`x-${y}`)}`"#), r#"`a ${f(`x-${y}`)}`"#);
        assert_eq!(simplify(r#"`${"a"} ${css`x  y`}`"#), r#"`a ${css`x  y`}`"#);
        assert_eq!(simplify(r#"`${"a"} ${p || "x"}`"#), r#"`a ${p || "x"}`"#);
    }

    #[test]
    fn text_is_escaped_for_its_literal_kind() {
        assert_eq!(simplify(r#"`${"say \"hi\""}`"#), r#""say \"hi\"""#);
        assert_eq!(simplify(r#"`${"a`b"} ${x}`"#), r#"`a\`b ${x}`"#);
    }

    #[test]
    fn output_is_a_fixed_point() {
        for code in [
            r#"`${"a"} ${c && "x"} ${"b"}`"#,
            r#"`${"a"} ${c && x} ${d && y}`"#,
            r#"`${c && `${x} y`} ${"b"}`"#,
            r#"`${"btn"} ${c && `btn-${size}`}`"#,
            "`btn btn-${size}`",
        ] {
            let once = simplify(code);
            assert_eq!(simplify(&once), once, "not stable for {code}");
        }
    }
}
