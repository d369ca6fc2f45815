use std::collections::HashMap;

use tracing::{debug, debug_span};
use tx_ast::{CallExpr, Callee, Expr, ImportDecl, ModuleDecl, ModuleItem, TransformOptions, TxFunc};
use tx_rewrite::{FixedPointRewriter, Pass, Rule, SourceMap, Target};

use crate::call::{rewrite_tm, rewrite_tx};
use crate::error::TransformError;
use crate::import::{bindings, is_helper_import, rewrite_import};

/// Result of [`transform`].
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub code: String,
    /// Maps `code` back to the input.
    pub map: SourceMap,
}

/// Compile every `tx`/`tm` call in `source` and rewrite the helper import.
pub fn transform(source: &str, options: &TransformOptions) -> Result<TransformOutput, TransformError> {
    let _span = debug_span!("transform", file = options.file_name.as_deref().unwrap_or("")).entered();

    let rewritten = FixedPointRewriter::new(Transformer::new(options))
        .with_file_name(options.file_name.clone())
        .with_max_passes(options.max_passes)
        .run(source)?;

    debug!(passes = rewritten.passes, "transform finished");
    Ok(TransformOutput {
        code: rewritten.code,
        map: rewritten.map,
    })
}

/// A node [`Transformer`] rewrites.
#[derive(Debug, Clone, Copy)]
pub enum HelperNode<'a> {
    /// An import of the helper module, on the first pass.
    Import(&'a ImportDecl),
    Tx(&'a CallExpr),
    Tm(&'a CallExpr),
}

/// [`Rule`] for helper imports and helper calls.
///
/// The local names bound by helper imports are recorded on the first pass
/// and stay valid for the whole run, after the import itself has been
/// rewritten.
pub struct Transformer<'o> {
    options: &'o TransformOptions,
    aliases: HashMap<String, TxFunc>,
}

impl<'o> Transformer<'o> {
    pub fn new(options: &'o TransformOptions) -> Self {
        Self {
            options,
            aliases: HashMap::new(),
        }
    }

    fn helper(&self, call: &CallExpr) -> Option<TxFunc> {
        let Callee::Expr(callee) = &call.callee else {
            return None;
        };
        match &**callee {
            Expr::Ident(ident) => self.aliases.get(&*ident.sym).copied(),
            _ => None,
        }
    }
}

impl Rule for Transformer<'_> {
    type Error = TransformError;
    type Selected<'a> = HelperNode<'a>;

    fn seed(&mut self, pass: &Pass<'_>) -> Result<(), TransformError> {
        if !pass.is_first() {
            return Ok(());
        }
        for item in &pass.snapshot().module.body {
            let ModuleItem::ModuleDecl(ModuleDecl::Import(decl)) = item else {
                continue;
            };
            if !is_helper_import(decl, self.options) {
                continue;
            }
            for (local, func) in bindings(decl) {
                debug!(%local, %func, "helper binding");
                self.aliases.insert(local, func);
            }
        }
        Ok(())
    }

    fn select<'a>(&self, pass: &Pass<'_>, target: Target<'a>) -> Option<HelperNode<'a>> {
        match target {
            Target::Import(decl) if pass.is_first() && is_helper_import(decl, self.options) => {
                Some(HelperNode::Import(decl))
            }
            Target::Call(call) => match self.helper(call)? {
                TxFunc::Tx => Some(HelperNode::Tx(call)),
                TxFunc::Tm => Some(HelperNode::Tm(call)),
                TxFunc::Tv => None,
            },
            _ => None,
        }
    }

    fn rewrite(&self, pass: &Pass<'_>, node: HelperNode<'_>) -> Result<Option<String>, TransformError> {
        match node {
            HelperNode::Import(decl) => Ok(rewrite_import(pass, decl, self.options.module_name())),
            HelperNode::Tx(call) => rewrite_tx(pass, call, self.options).map(Some),
            HelperNode::Tm(call) => rewrite_tm(call).map(Some),
        }
    }
}
