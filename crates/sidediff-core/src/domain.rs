use serde::{Deserialize, Serialize};

/// Edit operation relating the old sequence to the new one.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum DiffOp {
    Equal,
    Delete,
    Insert,
}

/// One entry of the materialized edit script. The side an operation does not
/// touch carries no index; consumers branch on `op`, not on index presence.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffLine {
    pub op: DiffOp,
    pub old_index: Option<usize>,
    pub new_index: Option<usize>,
}

/// A contiguous block of changes together with its surrounding context lines.
///
/// `old_start`/`old_count` span every old-side line in `lines`, and likewise
/// for the new side. A hunk holding no line of a side reports 0/0 for it;
/// `start` is meaningless when `count == 0`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffHunk {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<DiffLine>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    pub old_lines: Vec<String>,
    pub new_lines: Vec<String>,
    pub hunks: Vec<DiffHunk>,
}

/// A run of adjacent grapheme clusters sharing one op.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CharDiffSegment {
    pub op: DiffOp,
    pub text: String,
}

/// Per-side segment lists of a character-level diff.
///
/// `old_segments` holds `Equal` and `Delete` runs, `new_segments` holds
/// `Equal` and `Insert` runs; each side concatenates back to its input
/// byte-for-byte.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharDiffResult {
    pub old_segments: Vec<CharDiffSegment>,
    pub new_segments: Vec<CharDiffSegment>,
}
