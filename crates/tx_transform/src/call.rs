//! Compilation of `tx(...)` and `tm(...)` calls.

use swc_common::Spanned;
use tx_ast::{CallExpr, Expr, ExprOrSpread, Lit, TransformOptions};
use tx_parser::literal::{quote, string_value};
use tx_rewrite::Pass;

use crate::error::TransformError;
use crate::template::{simplify_template, static_template_text, strip_parens};

/// `tx(a, b, ...)` becomes the simplified form of `` `${a} ${b} ...` ``.
pub(crate) fn rewrite_tx(
    pass: &Pass<'_>,
    call: &CallExpr,
    options: &TransformOptions,
) -> Result<String, TransformError> {
    let elements: Vec<String> = call
        .args
        .iter()
        .map(|arg| {
            let text = pass.text(arg.expr.span());
            if arg.spread.is_some() {
                format!("${{[...{text}].join(\" \")}}")
            } else {
                format!("${{{text}}}")
            }
        })
        .collect();
    let snippet = format!("`{}`", elements.join(" "));
    Ok(simplify_template(&snippet, options)?)
}

/// `tm("hover:", "a b")` becomes `"hover:a hover:b"`.
///
/// Both arguments must be static by the time the call is rewritten; nested
/// `tx` and `tm` calls have already been compiled to string literals then.
pub(crate) fn rewrite_tm(call: &CallExpr) -> Result<String, TransformError> {
    let [modifier, value] = call.args.as_slice() else {
        return Err(TransformError::TmArity);
    };
    let modifier = static_string(modifier).ok_or(TransformError::TmModifier)?;
    let value = static_string(value).ok_or(TransformError::TmValue)?;

    let prefixed: Vec<String> = value
        .split(' ')
        .map(|token| format!("{modifier}{token}"))
        .collect();
    Ok(quote(&prefixed.join(" ")))
}

fn static_string(arg: &ExprOrSpread) -> Option<String> {
    if arg.spread.is_some() {
        return None;
    }
    match strip_parens(&arg.expr) {
        Expr::Lit(Lit::Str(s)) => Some(string_value(s)),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => Some(static_template_text(tpl)),
        _ => None,
    }
}
