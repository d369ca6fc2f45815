//! Compile-time expansion of the `tx` and `tm` class-name helpers.
//!
//! [`transform`] rewrites a JavaScript or TypeScript module:
//!
//! - `tx(a, b, ...)` calls become string or template literals
//! - `tm(modifier, value)` calls become string literals
//! - the helper import loses its compiled names and points at the
//!   configured module
//!
//! Every rewrite runs to a fixed point, so nested helper calls compile
//! inside out.

mod call;
pub mod error;
mod import;
pub mod template;
pub mod transform;

pub use error::TransformError;
pub use template::{simplify_template, TemplateSimplifier};
pub use transform::{transform, TransformOutput, Transformer};
