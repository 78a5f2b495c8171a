// diffseek/src/markers.rs
//! Deleted-line markers for the review UI, built from a finished diff.
//!
//! The engine only emits records; whoever renders the diff walks the
//! `Removed` runs here and decides where to draw them.

use serde::Serialize;

use crate::diff_line::{DiffKind, DiffLine};

/// One contiguous block of removed lines, anchored in the modified file.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DeletionMarker {
    /// 0-based line in the modified file the block sits above.
    pub anchor_line: usize,
    pub removed: Vec<String>,
}

/// Group each maximal run of `Removed` records into a marker.
/// `anchor_line` counts the `Unchanged` + `Added` records seen before the run.
pub fn deletion_markers<'a, I>(lines: I) -> Vec<DeletionMarker>
where
    I: IntoIterator<Item = DiffLine<'a>>,
{
    let mut out: Vec<DeletionMarker> = Vec::new();
    let mut modified_line = 0usize;
    let mut in_run = false;

    for line in lines {
        match line.kind {
            DiffKind::Removed => {
                if in_run {
                    if let Some(last) = out.last_mut() {
                        last.removed.push(line.text.to_string());
                    }
                } else {
                    out.push(DeletionMarker {
                        anchor_line: modified_line,
                        removed: vec![line.text.to_string()],
                    });
                    in_run = true;
                }
            }
            DiffKind::Unchanged | DiffKind::Added => {
                modified_line += 1;
                in_run = false;
            }
        }
    }
    out
}

/* ================================== Tests ================================== */
