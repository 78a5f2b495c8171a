// diffseek/src/diff_line.rs
//! Line-level diff record: what happened to one line, and the text it carries.
//!
//! Serialized with the `same` / `old` / `new` vocabulary the review UI speaks:
//! `{ "type": "old", "line": "let x = 1;" }`.

use serde::Serialize;
use std::{fmt, io::{self, Write}};

/// What the engine decided about a single line.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiffKind {
    /// Present in both inputs.
    #[serde(rename = "same")]
    Unchanged,
    /// Present only in the original.
    #[serde(rename = "old")]
    Removed,
    /// Present only in the modified text.
    #[serde(rename = "new")]
    Added,
}

impl DiffKind {
    /// Single-char gutter used by `render_diff`.
    pub fn prefix(self) -> char {
        match self {
            DiffKind::Unchanged => ' ',
            DiffKind::Removed   => '-',
            DiffKind::Added     => '+',
        }
    }

    /// Does a line of this kind belong to the original file?
    pub fn in_original(self) -> bool {
        matches!(self, DiffKind::Unchanged | DiffKind::Removed)
    }

    /// Does a line of this kind belong to the modified file?
    pub fn in_modified(self) -> bool {
        matches!(self, DiffKind::Unchanged | DiffKind::Added)
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiffKind::Unchanged => "same",
            DiffKind::Removed   => "old",
            DiffKind::Added     => "new",
        };
        f.write_str(s)
    }
}

/// One emitted record. `text` borrows from the caller's input with trailing
/// whitespace already stripped.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiffLine<'a> {
    #[serde(rename = "type")]
    pub kind: DiffKind,
    #[serde(rename = "line")]
    pub text: &'a str,
}

impl<'a> DiffLine<'a> {
    pub fn unchanged(text: &'a str) -> Self {
        Self { kind: DiffKind::Unchanged, text }
    }

    pub fn removed(text: &'a str) -> Self {
        Self { kind: DiffKind::Removed, text }
    }

    pub fn added(text: &'a str) -> Self {
        Self { kind: DiffKind::Added, text }
    }
}

impl fmt::Display for DiffLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.text)
    }
}

/* ============================== Summary ============================== */

/// Per-kind counts for a finished (or partially consumed) diff.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub unchanged: usize,
    pub removed: usize,
    pub added: usize,
}

impl DiffStats {
    pub fn record(&mut self, kind: DiffKind) {
        match kind {
            DiffKind::Unchanged => self.unchanged += 1,
            DiffKind::Removed   => self.removed += 1,
            DiffKind::Added     => self.added += 1,
        }
    }

    pub fn is_identical(&self) -> bool {
        self.removed == 0 && self.added == 0
    }

    /// Line count of the original side.
    pub fn original_len(&self) -> usize {
        self.unchanged + self.removed
    }

    /// Line count of the modified side.
    pub fn modified_len(&self) -> usize {
        self.unchanged + self.added
    }
}

impl<'a> FromIterator<DiffLine<'a>> for DiffStats {
    fn from_iter<I: IntoIterator<Item = DiffLine<'a>>>(iter: I) -> Self {
        let mut stats = DiffStats::default();
        for line in iter {
            stats.record(line.kind);
        }
        stats
    }
}

/* ============================ Reconstruction ============================ */

/// Rebuild the (normalized) original file: `Unchanged` + `Removed` in order.
pub fn original_lines<'a, I>(lines: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = DiffLine<'a>>,
{
    lines.into_iter().filter(|l| l.kind.in_original()).map(|l| l.text).collect()
}

/// Rebuild the (normalized) modified file: `Unchanged` + `Added` in order.
pub fn modified_lines<'a, I>(lines: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = DiffLine<'a>>,
{
    lines.into_iter().filter(|l| l.kind.in_modified()).map(|l| l.text).collect()
}

/// Write each record as `<prefix><text>\n`. Returns the per-kind counts.
pub fn render_diff<'a, I, W>(lines: I, out: &mut W) -> io::Result<DiffStats>
where
    I: IntoIterator<Item = DiffLine<'a>>,
    W: Write,
{
    let mut stats = DiffStats::default();
    for line in lines {
        writeln!(out, "{line}")?;
        stats.record(line.kind);
    }
    Ok(stats)
}

/* ================================== Tests ================================== */
