//! Source maps for multi-pass rewrites.
//!
//! Every pass leaves a [`PassRecord`]. [`compose`] turns each record into an
//! `swc_sourcemap` map from the pass output to its input and chains them,
//! oldest first, with [`SourceMap::adjust_mappings`]. The result maps the
//! final output to the original file.
//!
//! Unedited runs become range tokens, so a lookup anywhere inside one lands
//! on the matching original column. A replacement is one token at its start.

pub use swc_sourcemap::SourceMap;
use swc_sourcemap::SourceMapBuilder;

use crate::edit::{LineCol, PassRecord, RunKind};

/// Chain pass records (oldest first) into one map against the original.
///
/// `file` is `file_name`; the single source is `file_name`, or `""` without
/// one.
pub fn compose(records: &[PassRecord], file_name: Option<&str>) -> SourceMap {
    let source = file_name.unwrap_or_default();
    let mut records = records.iter();
    let mut composed = match records.next() {
        Some(first) => pass_map(first, source),
        None => pass_map(&PassRecord::default(), source),
    };

    for record in records {
        let mut aligned = align(&composed, record, source);
        aligned.adjust_mappings(&pass_map(record, source));
        composed = aligned;
    }

    composed.set_file(file_name.map(str::to_string));
    composed
}

/// Original position of a generated one, looked up on the same line.
pub fn original_position(map: &SourceMap, at: LineCol) -> Option<LineCol> {
    let token = map.lookup_token(at.line, at.column)?;
    (token.get_dst_line() == at.line).then(|| LineCol::new(token.get_src_line(), token.get_src_col()))
}

/// One pass as a map from its output to its input.
fn pass_map(record: &PassRecord, source: &str) -> SourceMap {
    let mut builder = SourceMapBuilder::new(None);
    let src = builder.add_source(source.to_string().into());
    for run in &record.runs {
        if run.kind == RunKind::Deleted {
            continue;
        }
        builder.add_raw(
            run.generated.line,
            run.generated.column,
            run.original.start.line,
            run.original.start.column,
            Some(src),
            None,
            run.kind == RunKind::Unedited,
        );
    }
    builder.into_sourcemap()
}

/// Line `composed` up with the runs of `record`, the pass that consumed
/// its output.
///
/// `adjust_mappings` shifts every older token by the offset of the newer
/// token covering it. Range tokens are therefore split wherever a run
/// starts, and tokens inside replaced or deleted text are dropped, so that
/// each remaining token sits in exactly one run.
fn align(composed: &SourceMap, record: &PassRecord, source: &str) -> SourceMap {
    let mut builder = SourceMapBuilder::new(None);
    let src = builder.add_source(source.to_string().into());
    let mut push = |at: LineCol, original: LineCol, is_range: bool| {
        let is_range = match record.run_at(at) {
            None => is_range,
            Some(run) => match run.kind {
                RunKind::Unedited => is_range,
                RunKind::Replaced if run.original.start == at => false,
                RunKind::Replaced | RunKind::Deleted => return,
            },
        };
        builder.add_raw(
            at.line,
            at.column,
            original.line,
            original.column,
            Some(src),
            None,
            is_range,
        );
    };

    let starts: Vec<LineCol> = record.runs.iter().map(|run| run.original.start).collect();
    let tokens: Vec<_> = composed.tokens().collect();

    for (i, token) in tokens.iter().enumerate() {
        let at = LineCol::new(token.get_dst_line(), token.get_dst_col());
        let original = LineCol::new(token.get_src_line(), token.get_src_col());
        push(at, original, token.is_range());
        if !token.is_range() {
            continue;
        }

        let end = tokens
            .get(i + 1)
            .map(|next| LineCol::new(next.get_dst_line(), next.get_dst_col()))
            .filter(|next| next.line == at.line)
            .unwrap_or(LineCol::new(at.line, u32::MAX));
        let first = starts.partition_point(|start| *start <= at);
        for split in starts[first..].iter().take_while(|start| **start < end) {
            let column = original.column + (split.column - at.column);
            push(*split, LineCol::new(original.line, column), true);
        }
    }

    builder.into_sourcemap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::{Edit, EditBuffer};

    fn pass(text: &str, index: usize, edits: Vec<Edit>) -> (String, PassRecord) {
        let mut buffer = EditBuffer::new(text);
        for edit in edits {
            buffer.push(edit);
        }
        buffer.finish(index)
    }

    fn lookup(map: &SourceMap, line: u32, column: u32) -> Option<(u32, u32)> {
        original_position(map, LineCol::new(line, column)).map(|at| (at.line, at.column))
    }

    #[test]
    fn unedited_text_maps_column_for_column() {
        let (_, record) = pass("let a = f(x);\nlet b;", 0, vec![Edit::replace(8..12, "1")]);
        let map = compose(&[record], Some("a.ts"));
        assert_eq!(lookup(&map, 0, 4), Some((0, 4)));
        assert_eq!(lookup(&map, 0, 8), Some((0, 8)));
        assert_eq!(lookup(&map, 0, 9), Some((0, 12)));
        assert_eq!(lookup(&map, 1, 5), Some((1, 5)));
    }

    #[test]
    fn later_passes_see_through_earlier_ones() {
        // Pass 0 shortens the start of the line, pass 1 rewrites what follows.
        let (text, first) = pass("xxxxxx(a) + g(b);", 0, vec![Edit::replace(0..9, "a")]);
        assert_eq!(text, "a + g(b);");
        let (text, second) = pass(&text, 1, vec![Edit::replace(4..8, "b")]);
        assert_eq!(text, "a + b;");

        let map = compose(&[first, second], None);
        assert_eq!(lookup(&map, 0, 0), Some((0, 0)));
        assert_eq!(lookup(&map, 0, 2), Some((0, 10)));
        assert_eq!(lookup(&map, 0, 4), Some((0, 12)));
        assert_eq!(lookup(&map, 0, 5), Some((0, 16)));
    }

    #[test]
    fn deleted_text_leaves_no_tokens_behind() {
        let (text, first) = pass("a;erase(x, y);b;", 0, vec![Edit::replace(8..12, "z")]);
        assert_eq!(text, "a;erase(z);b;");
        let (text, second) = pass(&text, 1, vec![Edit::delete(2..10)]);
        assert_eq!(text, "a;;b;");

        let map = compose(&[first, second], None);
        assert_eq!(lookup(&map, 0, 1), Some((0, 1)));
        assert_eq!(lookup(&map, 0, 2), Some((0, 13)));
        assert_eq!(lookup(&map, 0, 4), Some((0, 15)));
        // No token of the erased call survives in the output.
        assert!(map.tokens().all(|token| token.get_dst_col() <= 4));
    }

    #[test]
    fn lookups_stay_on_their_line() {
        let (_, record) = pass("x\n\ny", 0, Vec::new());
        let map = compose(&[record], None);
        assert_eq!(lookup(&map, 1, 0), None);
        assert_eq!(lookup(&map, 2, 0), Some((2, 0)));
    }

    #[test]
    fn the_map_names_the_file() {
        let (_, record) = pass("x;", 0, Vec::new());
        let named = compose(std::slice::from_ref(&record), Some("tx.ts"));
        assert_eq!(named.get_file().map(|file| &**file), Some("tx.ts"));
        assert_eq!(named.get_source(0).map(|source| &**source), Some("tx.ts"));

        let anonymous = compose(&[record], None);
        assert_eq!(anonymous.get_file(), None);
        assert_eq!(anonymous.get_source(0).map(|source| &**source), Some(""));
        assert_eq!(anonymous.get_source_count(), 1);
    }

    #[test]
    fn the_map_is_written_as_v3_json() {
        let (_, record) = pass("let a;\nlet b;", 0, Vec::new());
        let map = compose(&[record], Some("a.ts"));
        let mut json = Vec::new();
        map.to_writer(&mut json).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["version"], 3);
        assert_eq!(value["file"], "a.ts");
        assert_eq!(value["sources"], serde_json::json!(["a.ts"]));
        assert_eq!(value["mappings"], "AAAA;AACA");
        assert_eq!(SourceMap::from_slice(&json).unwrap().get_token_count(), 2);
    }
}
