use thiserror::Error;
use tx_rewrite::RewriteError;

/// Why a source file could not be transformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("The number of arguments of 'tm' must be 2.")]
    TmArity,

    #[error("The first argument to 'tm' must be string literal.")]
    TmModifier,

    #[error("The second argument of 'tm' must be string literal, 'tm' or static 'tx'.")]
    TmValue,

    #[error(transparent)]
    Rewrite(#[from] RewriteError),
}
