//! Pending text edits for one pass.

use std::ops::Range;

/// A position in a text: 0-based line, 0-based UTF-16 column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl LineCol {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Move past `text`.
    fn advance(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += c.len_utf16() as u32;
            }
        }
    }
}

/// Replace or delete a byte range of the pass input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    /// `None` deletes the range.
    pub replacement: Option<String>,
}

impl Edit {
    pub fn replace(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: Some(replacement.into()),
        }
    }

    pub fn delete(range: Range<usize>) -> Self {
        Self {
            range,
            replacement: None,
        }
    }

    /// Text written in place of the range.
    pub fn text(&self) -> &str {
        self.replacement.as_deref().unwrap_or_default()
    }
}

/// How a stretch of the pass input reached the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    /// Copied through; columns advance together on both sides.
    Unedited,
    Replaced,
    Deleted,
}

/// A stretch of the pass input and where it landed in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub kind: RunKind,
    /// Output position of the first unit written for the run. A deleted run
    /// writes nothing; this is where it would have started.
    pub generated: LineCol,
    /// The run in the pass input. Unedited runs never span lines.
    pub original: Range<LineCol>,
}

impl Run {
    pub fn contains(&self, at: LineCol) -> bool {
        self.original.contains(&at)
    }
}

/// What one pass did to its input, run by run in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassRecord {
    pub index: usize,
    pub runs: Vec<Run>,
}

impl PassRecord {
    /// The run covering input position `at`.
    pub fn run_at(&self, at: LineCol) -> Option<&Run> {
        let i = self.runs.partition_point(|run| run.original.start <= at);
        self.runs[..i].last().filter(|run| run.contains(at))
    }
}

/// Collects the edits of one pass and materializes the edited text together
/// with the pass's [`PassRecord`].
///
/// Edits must not overlap; target selection guarantees it.
pub struct EditBuffer<'a> {
    original: &'a str,
    edits: Vec<Edit>,
}

impl<'a> EditBuffer<'a> {
    pub fn new(original: &'a str) -> Self {
        Self {
            original,
            edits: Vec::new(),
        }
    }

    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    pub fn has_changed(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Apply every edit.
    ///
    /// Text copied through unchanged gets one run per line piece, every edit
    /// gets one run for its whole range.
    pub fn finish(mut self, index: usize) -> (String, PassRecord) {
        self.edits.sort_by_key(|edit| edit.range.start);
        debug_assert!(
            self.edits
                .windows(2)
                .all(|pair| pair[0].range.end <= pair[1].range.start),
            "overlapping edits: {:?}",
            self.edits
        );

        let mut writer = Writer {
            output: String::with_capacity(self.original.len()),
            generated: LineCol::default(),
            original: LineCol::default(),
            runs: Vec::new(),
        };

        let mut cursor = 0;
        for edit in &self.edits {
            writer.copy(&self.original[cursor..edit.range.start]);
            writer.edit(&self.original[edit.range.clone()], edit.text());
            cursor = edit.range.end;
        }
        writer.copy(&self.original[cursor..]);

        let record = PassRecord {
            index,
            runs: writer.runs,
        };
        (writer.output, record)
    }
}

struct Writer {
    output: String,
    generated: LineCol,
    original: LineCol,
    runs: Vec<Run>,
}

impl Writer {
    /// Copy unchanged text, one run per non-empty line piece.
    fn copy(&mut self, text: &str) {
        for (i, piece) in text.split('\n').enumerate() {
            if i > 0 {
                self.output.push('\n');
                self.generated.advance("\n");
                self.original.advance("\n");
            }
            if piece.is_empty() {
                continue;
            }
            let start = self.original;
            let generated = self.generated;
            self.output.push_str(piece);
            self.generated.advance(piece);
            self.original.advance(piece);
            self.runs.push(Run {
                kind: RunKind::Unedited,
                generated,
                original: start..self.original,
            });
        }
    }

    fn edit(&mut self, removed: &str, replacement: &str) {
        let start = self.original;
        let generated = self.generated;
        self.original.advance(removed);
        self.output.push_str(replacement);
        self.generated.advance(replacement);
        let kind = if replacement.is_empty() {
            RunKind::Deleted
        } else {
            RunKind::Replaced
        };
        self.runs.push(Run {
            kind,
            generated,
            original: start..self.original,
        });
    }
}
