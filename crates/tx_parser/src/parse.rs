use std::ops::Range;

use swc_common::{sync::Lrc, BytePos, FileName, SourceMap, Span, Spanned};
use swc_ecma_ast::{EsVersion, Module};
use swc_ecma_parser::{Syntax, TsSyntax};
use thiserror::Error;

/// A syntax error reported by SWC.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse {file}: {message} (at byte {offset})")]
pub struct ParseError {
    pub file: String,
    pub message: String,
    /// Byte offset of the error in the text that was parsed.
    pub offset: usize,
}

/// One parsed text snapshot.
///
/// Spans in `module` only make sense against the text this snapshot was
/// built from; use [`Snapshot::range`] and [`Snapshot::slice`] to read them.
pub struct Snapshot {
    pub module: Module,
    pub source_map: Lrc<SourceMap>,
    text: String,
    start_pos: BytePos,
}

impl Snapshot {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte range of `span` within [`Snapshot::text`].
    pub fn range(&self, span: Span) -> Range<usize> {
        let start = span.lo.0.saturating_sub(self.start_pos.0) as usize;
        let end = span.hi.0.saturating_sub(self.start_pos.0) as usize;
        start.min(self.text.len())..end.min(self.text.len())
    }

    /// Source text covered by `span`.
    pub fn slice(&self, span: Span) -> &str {
        &self.text[self.range(span)]
    }
}

/// Whether `filename` should be parsed with JSX enabled.
pub fn is_jsx_file(filename: &str) -> bool {
    filename.ends_with(".tsx") || filename.ends_with(".jsx")
}

/// Parse a JavaScript/TypeScript module.
///
/// Everything is parsed as TypeScript, which accepts plain JavaScript too.
/// JSX is enabled for `.tsx`/`.jsx` file names.
pub fn parse_snapshot(source: &str, filename: &str) -> Result<Snapshot, ParseError> {
    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        source.to_string(),
    );
    let start_pos = source_file.start_pos;

    let ts_syntax = Syntax::Typescript(TsSyntax {
        tsx: is_jsx_file(filename),
        decorators: true,
        ..Default::default()
    });

    let module = swc_ecma_parser::parse_file_as_module(
        &source_file,
        ts_syntax,
        EsVersion::latest(),
        None,
        &mut vec![],
    )
    .map_err(|e| ParseError {
        file: filename.to_string(),
        message: e.kind().msg().into_owned(),
        offset: e.span().lo.0.saturating_sub(start_pos.0) as usize,
    })?;

    Ok(Snapshot {
        module,
        source_map,
        text: source.to_string(),
        start_pos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_ecma_ast::{Expr, ModuleItem, Stmt};

    #[test]
    fn ranges_are_relative_to_the_snapshot() {
        let snapshot = parse_snapshot("let a = 1;\ntx(\"a\", b);", "tx.ts").unwrap();
        let ModuleItem::Stmt(Stmt::Expr(stmt)) = &snapshot.module.body[1] else {
            panic!("expected an expression statement");
        };
        let Expr::Call(call) = &*stmt.expr else {
            panic!("expected a call");
        };
        assert_eq!(snapshot.range(call.span), 11..21);
        assert_eq!(snapshot.slice(call.span), "tx(\"a\", b)");
    }

    #[test]
    fn jsx_follows_the_file_extension() {
        assert!(parse_snapshot("const a = <div />;", "a.tsx").is_ok());
        assert!(parse_snapshot("const a = <div />;", "a.ts").is_err());
    }

    #[test]
    fn syntax_errors_carry_the_file_name() {
        let err = parse_snapshot("tx(\"a\",", "broken.ts").err().unwrap();
        assert_eq!(err.file, "broken.ts");
        assert!(err.to_string().starts_with("failed to parse broken.ts"));
        // The offset is relative to the parsed text, not the source map.
        assert!(err.offset <= "tx(\"a\",".len());
    }
}
