//! Shared vocabulary for the tx expander.
//!
//! Re-exports the standard SWC AST and adds:
//! - the helper operations a source file can import (`tx`, `tm`, `tv`)
//! - the options accepted by a transform invocation

pub use swc_ecma_ast::*;

use serde::{Deserialize, Serialize};

/// Module id the helper operations are imported from unless the caller
/// configures another one.
pub const DEFAULT_MODULE_NAME: &str = "@mkx419/tx";

/// Upper bound on rewrite passes for one invocation.
pub const DEFAULT_MAX_PASSES: usize = 100;

/// Helper operations exported by the helper module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxFunc {
    /// `tx(...values)`: space-joins its arguments at compile time.
    Tx,
    /// `tm(modifier, value)`: prefixes every token of `value` with `modifier`.
    Tm,
    /// `tv(config)`: runtime lookup, never rewritten.
    Tv,
}

impl TxFunc {
    /// Resolve an exported name to an operation.
    pub fn from_export(name: &str) -> Option<Self> {
        match name {
            "tx" => Some(TxFunc::Tx),
            "tm" => Some(TxFunc::Tm),
            "tv" => Some(TxFunc::Tv),
            _ => None,
        }
    }

    /// Whether calls to this operation are compiled away.
    pub fn is_compile_time(self) -> bool {
        !matches!(self, TxFunc::Tv)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TxFunc::Tx => "tx",
            TxFunc::Tm => "tm",
            TxFunc::Tv => "tv",
        }
    }
}

impl std::fmt::Display for TxFunc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for one transform invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformOptions {
    /// Name of the file being transformed, recorded in the source map.
    pub file_name: Option<String>,
    /// Module the surviving `tv` import should point at.
    /// Imports from this name are recognized in addition to
    /// [`DEFAULT_MODULE_NAME`].
    pub module_name: Option<String>,
    /// Rewrite passes allowed before the transform gives up.
    pub max_passes: usize,
}

impl TransformOptions {
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_module_name(mut self, module_name: impl Into<String>) -> Self {
        self.module_name = Some(module_name.into());
        self
    }

    /// The module name imports are rewritten to.
    pub fn module_name(&self) -> &str {
        self.module_name.as_deref().unwrap_or(DEFAULT_MODULE_NAME)
    }

    /// Whether `source` names the helper module.
    pub fn is_helper_module(&self, source: &str) -> bool {
        source == DEFAULT_MODULE_NAME || source == self.module_name()
    }
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            file_name: None,
            module_name: None,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}
