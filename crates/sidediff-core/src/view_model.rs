use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::char_diff::diff_chars;
use crate::domain::{CharDiffResult, CharDiffSegment, DiffOp, DiffResult};
use crate::line_diff::diff_lines;

/// Modified pairs at least this similar (equal bytes over the longer side)
/// get grapheme-level inline highlights; below it whole-line emphasis
/// suffices.
const SIMILARITY_THRESHOLD: f64 = 0.5;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum LineKind {
    #[default]
    Blank,
    Context,
    Removed,
    Added,
}

/// One side of a display row. `line_no` is 1-based; a `Blank` side carries 0
/// and renders no line at this row.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideInfo {
    pub kind: LineKind,
    pub line_no: u32,
}

/// A single row of the two-pane display.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ViewLine {
    pub left: SideInfo,
    pub right: SideInfo,
}

/// Half-open byte range to emphasize inside one source line. Both endpoints
/// fall on grapheme-cluster boundaries of that line.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineHighlight {
    pub row: usize,
    pub start: usize,
    pub end: usize,
    pub is_left: bool,
}

/// Row span and 1-based source line ranges of one hunk's changes; a renderer
/// draws the band linking the panes from this. A `*_start` of 0 means no
/// change on that side.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub top: usize,
    pub bottom: usize,
    pub left_start: u32,
    pub left_end: u32,
    pub right_start: u32,
    pub right_end: u32,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub old_lines: Vec<String>,
    pub new_lines: Vec<String>,
    pub lines: Vec<ViewLine>,
    pub highlights: Vec<InlineHighlight>,
    pub connectors: Vec<Connector>,
}

/// Per-pane change counters (the `-N` / `+N` a renderer shows in its gutter).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DiffStats {
    pub removed: usize,
    pub added: usize,
}

impl ViewModel {
    /// Source text for one side of a row; empty for `Blank` sides.
    pub fn line_content(&self, side: &SideInfo, is_left: bool) -> &str {
        if side.kind == LineKind::Blank || side.line_no == 0 {
            return "";
        }
        let lines = if is_left {
            &self.old_lines
        } else {
            &self.new_lines
        };
        lines
            .get(side.line_no as usize - 1)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn stats(&self) -> DiffStats {
        DiffStats {
            removed: self
                .lines
                .iter()
                .filter(|line| line.left.kind == LineKind::Removed)
                .count(),
            added: self
                .lines
                .iter()
                .filter(|line| line.right.kind == LineKind::Added)
                .count(),
        }
    }
}

/// Assemble the paired two-pane model for `old_text` vs `new_text`.
///
/// Rows align the equal prefix/suffix pairwise, pair each hunk's deletes with
/// its inserts positionally into modified rows, and fill the shorter side
/// with blanks. Modified rows similar enough per [`SIMILARITY_THRESHOLD`]
/// carry inline highlights; every hunk contributes one connector band.
pub fn create_view_model(old_text: &str, new_text: &str, context_lines: usize) -> ViewModel {
    let DiffResult {
        old_lines,
        new_lines,
        hunks,
    } = diff_lines(old_text, new_text, context_lines);
    let mut vm = ViewModel {
        old_lines,
        new_lines,
        lines: Vec::new(),
        highlights: Vec::new(),
        connectors: Vec::new(),
    };

    if hunks.is_empty() {
        let max_lines = vm.old_lines.len().max(vm.new_lines.len());
        for ix in 0..max_lines {
            let mut row = ViewLine::default();
            if ix < vm.old_lines.len() {
                row.left = SideInfo {
                    kind: LineKind::Context,
                    line_no: (ix + 1) as u32,
                };
            }
            if ix < vm.new_lines.len() {
                row.right = SideInfo {
                    kind: LineKind::Context,
                    line_no: (ix + 1) as u32,
                };
            }
            vm.lines.push(row);
        }
        return vm;
    }

    let mut old_pos = 0usize;
    let mut new_pos = 0usize;
    for hunk in &hunks {
        // The run before the hunk is equal line-for-line, so both cursors
        // cross it together. A one-sided hunk reports no start on its empty
        // side (count 0); the populated side measures the run, and the run
        // has the same length on both sides.
        let advance = if hunk.old_count > 0 {
            hunk.old_start.saturating_sub(old_pos)
        } else {
            hunk.new_start.saturating_sub(new_pos)
        };
        for _ in 0..advance {
            vm.lines.push(context_row(old_pos, new_pos));
            old_pos += 1;
            new_pos += 1;
        }

        let connector_top = vm.lines.len();
        let mut left_start = 0u32;
        let mut left_end = 0u32;
        let mut right_start = 0u32;
        let mut right_end = 0u32;

        let mut delete_indices = Vec::new();
        let mut insert_indices = Vec::new();
        for line in &hunk.lines {
            match (line.op, line.old_index, line.new_index) {
                (DiffOp::Delete, Some(old_index), _) => delete_indices.push(old_index),
                (DiffOp::Insert, _, Some(new_index)) => insert_indices.push(new_index),
                _ => {}
            }
        }
        // Pairing is positional in hunk order, never content-sensitive: the
        // i-th delete pairs with the i-th insert.
        let pair_count = delete_indices.len().min(insert_indices.len());
        let paired_inserts: FxHashSet<usize> =
            insert_indices[..pair_count].iter().copied().collect();

        let mut del_i = 0usize;
        for line in &hunk.lines {
            match line.op {
                DiffOp::Equal => {
                    let (Some(old_index), Some(new_index)) = (line.old_index, line.new_index)
                    else {
                        continue;
                    };
                    vm.lines.push(ViewLine {
                        left: SideInfo {
                            kind: LineKind::Context,
                            line_no: (old_index + 1) as u32,
                        },
                        right: SideInfo {
                            kind: LineKind::Context,
                            line_no: (new_index + 1) as u32,
                        },
                    });
                    old_pos = old_index + 1;
                    new_pos = new_index + 1;
                }
                DiffOp::Delete => {
                    let Some(old_index) = line.old_index else { continue };
                    let line_no = (old_index + 1) as u32;
                    if left_start == 0 {
                        left_start = line_no;
                    }
                    left_end = line_no;
                    if del_i < insert_indices.len() {
                        let partner_no = (insert_indices[del_i] + 1) as u32;
                        vm.lines.push(ViewLine {
                            left: SideInfo {
                                kind: LineKind::Removed,
                                line_no,
                            },
                            right: SideInfo {
                                kind: LineKind::Added,
                                line_no: partner_no,
                            },
                        });
                        if right_start == 0 {
                            right_start = partner_no;
                        }
                        right_end = partner_no;
                        del_i += 1;
                    } else {
                        vm.lines.push(ViewLine {
                            left: SideInfo {
                                kind: LineKind::Removed,
                                line_no,
                            },
                            right: SideInfo::default(),
                        });
                    }
                    old_pos = old_index + 1;
                }
                DiffOp::Insert => {
                    let Some(new_index) = line.new_index else { continue };
                    if paired_inserts.contains(&new_index) {
                        // Already emitted by its partner delete.
                        continue;
                    }
                    let line_no = (new_index + 1) as u32;
                    if right_start == 0 {
                        right_start = line_no;
                    }
                    right_end = line_no;
                    vm.lines.push(ViewLine {
                        left: SideInfo::default(),
                        right: SideInfo {
                            kind: LineKind::Added,
                            line_no,
                        },
                    });
                    new_pos = new_index + 1;
                }
            }
        }

        // A mixed block of unpaired deletes and inserts can emit out of
        // display order; keys are new-side numbers where one exists.
        vm.lines[connector_top..].sort_unstable_by_key(display_key);

        for row_ix in connector_top..vm.lines.len() {
            let ViewLine { left, right } = vm.lines[row_ix];
            if left.kind != LineKind::Removed || right.kind != LineKind::Added {
                continue;
            }
            let old_line = &vm.old_lines[left.line_no as usize - 1];
            let new_line = &vm.new_lines[right.line_no as usize - 1];
            let char_diff = diff_chars(old_line, new_line);
            if similarity(&char_diff) < SIMILARITY_THRESHOLD {
                continue;
            }
            push_side_highlights(
                &mut vm.highlights,
                &char_diff.old_segments,
                row_ix,
                DiffOp::Delete,
                true,
            );
            push_side_highlights(
                &mut vm.highlights,
                &char_diff.new_segments,
                row_ix,
                DiffOp::Insert,
                false,
            );
        }

        if vm.lines.len() > connector_top {
            vm.connectors.push(Connector {
                top: connector_top,
                bottom: vm.lines.len() - 1,
                left_start,
                left_end,
                right_start,
                right_end,
            });
        }
    }

    // Any asymmetric tail was absorbed into the last hunk, so whatever
    // remains is equal line-for-line on both sides.
    while old_pos < vm.old_lines.len() && new_pos < vm.new_lines.len() {
        vm.lines.push(context_row(old_pos, new_pos));
        old_pos += 1;
        new_pos += 1;
    }

    trace!(
        rows = vm.lines.len(),
        highlights = vm.highlights.len(),
        connectors = vm.connectors.len(),
        "assembled view model"
    );
    vm
}

fn context_row(old_pos: usize, new_pos: usize) -> ViewLine {
    ViewLine {
        left: SideInfo {
            kind: LineKind::Context,
            line_no: (old_pos + 1) as u32,
        },
        right: SideInfo {
            kind: LineKind::Context,
            line_no: (new_pos + 1) as u32,
        },
    }
}

/// Rows display in new-side order where a new-side line exists, falling back
/// to the old-side number for delete-only rows.
fn display_key(row: &ViewLine) -> u32 {
    if row.right.kind != LineKind::Blank {
        row.right.line_no
    } else {
        row.left.line_no
    }
}

/// Fraction of the longer side (in bytes) preserved as `Equal` in the
/// character diff; 1.0 when both sides are empty.
fn similarity(diff: &CharDiffResult) -> f64 {
    let mut equal_bytes = 0usize;
    let mut old_bytes = 0usize;
    for segment in &diff.old_segments {
        old_bytes += segment.text.len();
        if segment.op == DiffOp::Equal {
            equal_bytes += segment.text.len();
        }
    }
    let new_bytes: usize = diff.new_segments.iter().map(|s| s.text.len()).sum();
    let longest = old_bytes.max(new_bytes);
    if longest == 0 {
        return 1.0;
    }
    equal_bytes as f64 / longest as f64
}

/// Segments partition their line, so a segment's byte range is the running
/// total of the segment lengths before it.
fn push_side_highlights(
    highlights: &mut Vec<InlineHighlight>,
    segments: &[CharDiffSegment],
    row: usize,
    changed_op: DiffOp,
    is_left: bool,
) {
    let mut byte_pos = 0usize;
    for segment in segments {
        let segment_end = byte_pos + segment.text.len();
        if segment.op == changed_op {
            highlights.push(InlineHighlight {
                row,
                start: byte_pos,
                end: segment_end,
                is_left,
            });
        }
        byte_pos = segment_end;
    }
}
