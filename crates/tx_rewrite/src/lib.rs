//! Fixed-point AST rewriting over source text.
//!
//! A [`Rule`] picks target nodes and produces replacement text. The
//! [`FixedPointRewriter`] applies it pass after pass, re-parsing the edited
//! text each time, until a pass changes nothing:
//!
//! 1. parse the current text ([`tx_parser::parse_snapshot`])
//! 2. walk it pre-order and collect edits, deferring any target that still
//!    encloses a pending target
//! 3. apply the edits ([`EditBuffer`]) and keep the pass's [`PassRecord`]
//!
//! The records are composed into one [`SourceMap`] against the original
//! text.

pub mod edit;
pub mod error;
pub mod rewriter;
pub mod source_map;
mod walk;

pub use edit::{Edit, EditBuffer, LineCol, PassRecord, Run, RunKind};
pub use error::RewriteError;
pub use rewriter::{FixedPointRewriter, Pass, Rewritten, Rule};
pub use source_map::{original_position, SourceMap};
pub use walk::Target;
