use std::ops::Range;

use tracing::trace;

use crate::domain::{DiffHunk, DiffLine, DiffOp, DiffResult};
use crate::myers;
use crate::text::{FNV_OFFSET_BASIS, hash_bytes, split_lines};

/// Context width of the stock API.
pub const DEFAULT_CONTEXT: usize = 3;

/// Line-level diff of two texts: split, hash, run the edit-script engine,
/// then group the changes into context-carrying hunks.
pub fn diff_lines(old_text: &str, new_text: &str, context_lines: usize) -> DiffResult {
    diff_line_vecs(split_lines(old_text), split_lines(new_text), context_lines)
}

/// [`diff_lines`] for already-split texts; the vectors move into the result.
pub fn diff_line_vecs(
    old_lines: Vec<String>,
    new_lines: Vec<String>,
    context_lines: usize,
) -> DiffResult {
    let hunks = {
        let old_keyed = keyed(&old_lines);
        let new_keyed = keyed(&new_lines);
        let script = myers::edit_script(&old_keyed, &new_keyed, |a, b| a.0 == b.0 && a.1 == b.1);
        let all_lines = materialize(&script);
        let ranges = find_change_ranges(&all_lines);
        let merged = merge_ranges(&ranges, context_lines);
        build_hunks(&all_lines, &merged, context_lines)
    };
    trace!(
        old_lines = old_lines.len(),
        new_lines = new_lines.len(),
        hunks = hunks.len(),
        "computed line diff"
    );
    DiffResult {
        old_lines,
        new_lines,
        hunks,
    }
}

fn keyed(lines: &[String]) -> Vec<(u64, &str)> {
    let mut keyed = Vec::with_capacity(lines.len());
    for line in lines {
        keyed.push((hash_bytes(line.as_bytes(), FNV_OFFSET_BASIS), line.as_str()));
    }
    keyed
}

/// Walk the script with one cursor per side, assigning indices to the sides
/// each operation touches.
fn materialize(script: &[DiffOp]) -> Vec<DiffLine> {
    let mut lines = Vec::with_capacity(script.len());
    let mut old_index = 0usize;
    let mut new_index = 0usize;
    for &op in script {
        let line = match op {
            DiffOp::Equal => {
                let line = DiffLine {
                    op,
                    old_index: Some(old_index),
                    new_index: Some(new_index),
                };
                old_index += 1;
                new_index += 1;
                line
            }
            DiffOp::Delete => {
                let line = DiffLine {
                    op,
                    old_index: Some(old_index),
                    new_index: None,
                };
                old_index += 1;
                line
            }
            DiffOp::Insert => {
                let line = DiffLine {
                    op,
                    old_index: None,
                    new_index: Some(new_index),
                };
                new_index += 1;
                line
            }
        };
        lines.push(line);
    }
    lines
}

/// Maximal half-open runs of non-`Equal` lines.
fn find_change_ranges(lines: &[DiffLine]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut ix = 0usize;
    while ix < lines.len() {
        while ix < lines.len() && lines[ix].op == DiffOp::Equal {
            ix += 1;
        }
        if ix >= lines.len() {
            break;
        }
        let start = ix;
        while ix < lines.len() && lines[ix].op != DiffOp::Equal {
            ix += 1;
        }
        ranges.push(start..ix);
    }
    ranges
}

/// Merge consecutive ranges whose gap is at most `2 * context_lines`; closer
/// changes would otherwise duplicate context between their hunks.
fn merge_ranges(ranges: &[Range<usize>], context_lines: usize) -> Vec<Range<usize>> {
    let Some(first) = ranges.first() else {
        return Vec::new();
    };
    let gap_threshold = 2 * context_lines;
    let mut merged = Vec::new();
    let mut current = first.clone();
    for next in &ranges[1..] {
        if next.start <= current.end + gap_threshold {
            current.end = next.end;
        } else {
            merged.push(current);
            current = next.clone();
        }
    }
    merged.push(current);
    merged
}

fn build_hunks(
    all_lines: &[DiffLine],
    merged_ranges: &[Range<usize>],
    context_lines: usize,
) -> Vec<DiffHunk> {
    let mut hunks = Vec::with_capacity(merged_ranges.len());
    for range in merged_ranges {
        let hunk_start = range.start.saturating_sub(context_lines);
        let hunk_end = (range.end + context_lines).min(all_lines.len());
        let lines = all_lines[hunk_start..hunk_end].to_vec();

        let mut old_span: Option<Range<usize>> = None;
        let mut new_span: Option<Range<usize>> = None;
        for line in &lines {
            if let Some(old_index) = line.old_index {
                old_span = Some(match old_span {
                    Some(span) => span.start..old_index + 1,
                    None => old_index..old_index + 1,
                });
            }
            if let Some(new_index) = line.new_index {
                new_span = Some(match new_span {
                    Some(span) => span.start..new_index + 1,
                    None => new_index..new_index + 1,
                });
            }
        }
        let (old_start, old_count) = span_bounds(old_span);
        let (new_start, new_count) = span_bounds(new_span);
        hunks.push(DiffHunk {
            old_start,
            old_count,
            new_start,
            new_count,
            lines,
        });
    }
    hunks
}

fn span_bounds(span: Option<Range<usize>>) -> (usize, usize) {
    match span {
        Some(span) => (span.start, span.end - span.start),
        None => (0, 0),
    }
}
