//! Parser boundary for the tx expander.
//!
//! Wraps the standard SWC parser. Each call produces a [`Snapshot`]: the
//! module plus the text it was parsed from, so node spans can be turned back
//! into byte ranges of that text. The rewriter re-parses after every pass,
//! so a snapshot never outlives the text it describes.
//!
//! [`literal`] holds the string-literal helpers shared by the rewrite rules.

pub mod literal;
pub mod parse;

pub use parse::{is_jsx_file, parse_snapshot, ParseError, Snapshot};
