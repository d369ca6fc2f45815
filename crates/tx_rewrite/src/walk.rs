//! Pre-order walk over the nodes a rule can target.

use swc_common::Span;
use swc_ecma_visit::{Visit, VisitWith};
use tx_ast::{CallExpr, ImportDecl, TaggedTpl, Tpl};

/// A node kind the rewriter can select.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Import(&'a ImportDecl),
    Call(&'a CallExpr),
    /// An untagged template literal.
    Template(&'a Tpl),
}

impl Target<'_> {
    pub fn span(&self) -> Span {
        match self {
            Target::Import(node) => node.span,
            Target::Call(node) => node.span,
            Target::Template(node) => node.span,
        }
    }

    pub(crate) fn visit_children_with<V: Visit>(&self, visitor: &mut V) {
        match self {
            Target::Import(node) => node.visit_children_with(visitor),
            Target::Call(node) => node.visit_children_with(visitor),
            Target::Template(node) => node.visit_children_with(visitor),
        }
    }
}

/// What the walker does after visiting a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Walk {
    Descend,
    Skip,
    Stop,
}

/// Calls `on_target` for every [`Target`] in pre-order.
pub(crate) struct TargetWalker<F> {
    on_target: F,
    stopped: bool,
}

impl<F> TargetWalker<F>
where
    F: FnMut(Target<'_>) -> Walk,
{
    pub(crate) fn new(on_target: F) -> Self {
        Self {
            on_target,
            stopped: false,
        }
    }

    fn enter(&mut self, target: Target<'_>) -> bool {
        if self.stopped {
            return false;
        }
        match (self.on_target)(target) {
            Walk::Descend => true,
            Walk::Skip => false,
            Walk::Stop => {
                self.stopped = true;
                false
            }
        }
    }
}

impl<F> Visit for TargetWalker<F>
where
    F: FnMut(Target<'_>) -> Walk,
{
    fn visit_import_decl(&mut self, node: &ImportDecl) {
        if self.enter(Target::Import(node)) {
            node.visit_children_with(self);
        }
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        if self.enter(Target::Call(node)) {
            node.visit_children_with(self);
        }
    }

    fn visit_tpl(&mut self, node: &Tpl) {
        if self.enter(Target::Template(node)) {
            node.visit_children_with(self);
        }
    }

    // The template of a tagged template is handed to the tag at runtime, so
    // only its embedded expressions are walked.
    fn visit_tagged_tpl(&mut self, node: &TaggedTpl) {
        if self.stopped {
            return;
        }
        node.tag.visit_with(self);
        for expr in &node.tpl.exprs {
            expr.visit_with(self);
        }
    }
}
