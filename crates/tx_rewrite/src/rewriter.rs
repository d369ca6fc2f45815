//! The fixed-point driver.
//!
//! A pass parses the current text, walks it, and asks the [`Rule`] which
//! nodes to rewrite and into what. Passes repeat until one makes no edit.
//!
//! A target that still contains a live nested target (one that itself
//! contains a live target, or whose replacement differs from its text) is
//! deferred to a later pass, and the walk descends into it instead. Inner
//! targets are therefore always rewritten before the targets enclosing them,
//! whatever the nesting depth.

use std::ops::Range;

use swc_common::Span;
use swc_ecma_visit::VisitWith;
use tracing::{debug, trace};
use tx_ast::DEFAULT_MAX_PASSES;
use tx_parser::{parse_snapshot, Snapshot};

use crate::edit::{Edit, EditBuffer};
use crate::error::RewriteError;
use crate::source_map::{compose, SourceMap};
use crate::walk::{Target, TargetWalker, Walk};

/// Node selection and replacement for one kind of rewrite.
pub trait Rule {
    type Error: From<RewriteError>;

    /// What the rule picked out of a [`Target`], handed back to
    /// [`Rule::rewrite`].
    type Selected<'a>;

    /// Called at the start of every pass, before the walk.
    fn seed(&mut self, _pass: &Pass<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `None` when the rule has nothing to do with `target`.
    fn select<'a>(&self, pass: &Pass<'_>, target: Target<'a>) -> Option<Self::Selected<'a>>;

    /// Replacement text for a selected target, `None` to delete it.
    fn rewrite(&self, pass: &Pass<'_>, selected: Self::Selected<'_>) -> Result<Option<String>, Self::Error>;
}

/// One pass over one snapshot.
pub struct Pass<'a> {
    index: usize,
    snapshot: &'a Snapshot,
}

impl<'a> Pass<'a> {
    pub fn new(index: usize, snapshot: &'a Snapshot) -> Self {
        Self { index, snapshot }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    /// Current text of a node.
    pub fn text(&self, span: Span) -> &'a str {
        self.snapshot.slice(span)
    }

    pub fn range(&self, span: Span) -> Range<usize> {
        self.snapshot.range(span)
    }
}

/// Output of a completed rewrite.
#[derive(Debug, Clone)]
pub struct Rewritten {
    pub code: String,
    pub map: SourceMap,
    /// Passes run, including the final one that made no edit.
    pub passes: usize,
}

enum Resolution {
    Deferred,
    Unchanged,
    Rewrite(Edit),
}

/// Runs a [`Rule`] to a fixed point.
pub struct FixedPointRewriter<R> {
    rule: R,
    file_name: Option<String>,
    max_passes: usize,
}

impl<R: Rule> FixedPointRewriter<R> {
    pub fn new(rule: R) -> Self {
        Self {
            rule,
            file_name: None,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    /// File name used for parsing (JSX detection) and the map's metadata.
    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = file_name;
        self
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn run(mut self, source: &str) -> Result<Rewritten, R::Error> {
        let parse_name = self.file_name.clone().unwrap_or_default();
        let mut text = source.to_string();
        let mut records = Vec::new();

        loop {
            let index = records.len();
            if index >= self.max_passes {
                return Err(RewriteError::PassLimit {
                    passes: self.max_passes,
                }
                .into());
            }

            let snapshot = parse_snapshot(&text, &parse_name).map_err(RewriteError::from)?;
            let pass = Pass::new(index, &snapshot);
            self.rule.seed(&pass)?;
            let edits = self.collect_edits(&pass)?;
            debug!(pass = index, edits = edits.len(), "rewrite pass");

            let mut buffer = EditBuffer::new(snapshot.text());
            for edit in edits {
                buffer.push(edit);
            }
            let changed = buffer.has_changed();
            let (output, record) = buffer.finish(index);
            records.push(record);
            text = output;

            if !changed {
                break;
            }
        }

        Ok(Rewritten {
            map: compose(&records, self.file_name.as_deref()),
            code: text,
            passes: records.len(),
        })
    }

    fn collect_edits(&self, pass: &Pass<'_>) -> Result<Vec<Edit>, R::Error> {
        let mut edits = Vec::new();
        let mut failure = None;

        {
            let mut walker = TargetWalker::new(|target: Target<'_>| {
                let Some(selected) = self.rule.select(pass, target) else {
                    return Walk::Descend;
                };
                match self.resolve(pass, target, selected) {
                    Ok(Resolution::Deferred) => {
                        trace!(range = ?pass.range(target.span()), "deferred, nested target pending");
                        Walk::Descend
                    }
                    Ok(Resolution::Unchanged) => Walk::Skip,
                    Ok(Resolution::Rewrite(edit)) => {
                        trace!(range = ?edit.range, replacement = edit.text(), "rewrite");
                        edits.push(edit);
                        Walk::Skip
                    }
                    Err(err) => {
                        failure = Some(err);
                        Walk::Stop
                    }
                }
            });
            pass.snapshot().module.visit_with(&mut walker);
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(edits),
        }
    }

    fn resolve(
        &self,
        pass: &Pass<'_>,
        target: Target<'_>,
        selected: R::Selected<'_>,
    ) -> Result<Resolution, R::Error> {
        if self.has_live_target(pass, target)? {
            return Ok(Resolution::Deferred);
        }

        let replacement = self.rule.rewrite(pass, selected)?;
        let span = target.span();
        if replacement.as_deref().unwrap_or_default() == pass.text(span) {
            return Ok(Resolution::Unchanged);
        }

        let range = pass.range(span);
        Ok(Resolution::Rewrite(match replacement {
            Some(text) => Edit::replace(range, text),
            None => Edit::delete(range),
        }))
    }

    /// Whether any target strictly inside `target` is live.
    fn has_live_target(&self, pass: &Pass<'_>, target: Target<'_>) -> Result<bool, R::Error> {
        let outer = target.span();
        let mut live = Ok(false);

        {
            let mut walker = TargetWalker::new(|nested: Target<'_>| {
                let span = nested.span();
                if span.lo == outer.lo && span.hi == outer.hi {
                    return Walk::Descend;
                }
                let Some(selected) = self.rule.select(pass, nested) else {
                    return Walk::Descend;
                };
                match self.is_live(pass, nested, selected) {
                    Ok(false) => Walk::Skip,
                    Ok(true) => {
                        live = Ok(true);
                        Walk::Stop
                    }
                    Err(err) => {
                        live = Err(err);
                        Walk::Stop
                    }
                }
            });
            target.visit_children_with(&mut walker);
        }

        live
    }

    // Nested targets are checked innermost first, so a rule is never asked to
    // rewrite a node whose own children are still pending.
    fn is_live(&self, pass: &Pass<'_>, target: Target<'_>, selected: R::Selected<'_>) -> Result<bool, R::Error> {
        if self.has_live_target(pass, target)? {
            return Ok(true);
        }
        let replacement = self.rule.rewrite(pass, selected)?;
        Ok(replacement.as_deref().unwrap_or_default() != pass.text(target.span()))
    }
}
