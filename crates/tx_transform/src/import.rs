//! Imports of the helper module.
//!
//! `tx` and `tm` disappear from the import once their calls are compiled;
//! every other specifier survives and the import is pointed at the
//! configured module name.

use tx_ast::{ImportDecl, ImportSpecifier, ModuleExportName, TransformOptions, TxFunc};
use tx_parser::literal::{quote, string_value};
use tx_rewrite::Pass;

/// Whether `decl` imports values from the helper module.
pub(crate) fn is_helper_import(decl: &ImportDecl, options: &TransformOptions) -> bool {
    !decl.type_only && options.is_helper_module(&string_value(&decl.src))
}

/// Local names bound to compile-time helpers by `decl`.
pub(crate) fn bindings(decl: &ImportDecl) -> Vec<(String, TxFunc)> {
    decl.specifiers.iter().filter_map(compiled_helper)
        .collect()
}

fn compiled_helper(specifier: &ImportSpecifier) -> Option<(String, TxFunc)> {
    let ImportSpecifier::Named(named) = specifier else {
        return None;
    };
    if named.is_type_only {
        return None;
    }
    let imported = match &named.imported {
        Some(ModuleExportName::Ident(ident)) => ident.sym.to_string(),
        Some(ModuleExportName::Str(s)) => string_value(s),
        None => named.local.sym.to_string(),
    };
    let func = TxFunc::from_export(&imported).filter(|func| func.is_compile_time())?;
    Some((named.local.sym.to_string(), func))
}

/// The import with compiled helpers removed, `None` when nothing is left.
pub(crate) fn rewrite_import(pass: &Pass<'_>, decl: &ImportDecl, module_name: &str) -> Option<String> {
    let mut default = None;
    let mut namespace = None;
    let mut named = Vec::new();

    for specifier in &decl.specifiers {
        match specifier {
            ImportSpecifier::Default(s) => default = Some(pass.text(s.span)),
            ImportSpecifier::Namespace(s) => namespace = Some(pass.text(s.span)),
            ImportSpecifier::Named(s) => {
                if compiled_helper(specifier).is_none() {
                    named.push(pass.text(s.span));
                }
            }
        }
    }

    let mut clause: Vec<String> = default.into_iter().chain(namespace).map(str::to_string).collect();
    if !named.is_empty() {
        clause.push(format!("{{ {} }}", named.join(", ")));
    }
    if clause.is_empty() {
        return None;
    }
    Some(format!("import {} from {};", clause.join(", "), quote(module_name)))
}
