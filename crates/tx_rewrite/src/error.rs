use thiserror::Error;
use tx_parser::ParseError;

/// Failures of the fixed-point rewriter itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("no fixed point reached after {passes} rewrite passes")]
    PassLimit { passes: usize },
}
