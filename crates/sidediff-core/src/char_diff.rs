use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

use crate::domain::{CharDiffResult, CharDiffSegment, DiffOp};
use crate::myers;

/// Character-level diff of two strings at grapheme-cluster granularity.
///
/// Runs the same edit-script engine as the line diff, over UAX #29 clusters,
/// and folds the script into per-side segment lists. Adjacent segments never
/// share an op, and each side's segments concatenate back to its input.
pub fn diff_chars(old: &str, new: &str) -> CharDiffResult {
    let old_graphemes: Vec<&str> = old.graphemes(true).collect();
    let new_graphemes: Vec<&str> = new.graphemes(true).collect();
    let script = myers::edit_script(&old_graphemes, &new_graphemes, |a, b| a == b);

    let mut result = CharDiffResult::default();
    let mut old_ix = 0usize;
    let mut new_ix = 0usize;
    for op in script {
        match op {
            DiffOp::Equal => {
                append_segment(&mut result.old_segments, DiffOp::Equal, old_graphemes[old_ix]);
                append_segment(&mut result.new_segments, DiffOp::Equal, new_graphemes[new_ix]);
                old_ix += 1;
                new_ix += 1;
            }
            DiffOp::Delete => {
                append_segment(&mut result.old_segments, DiffOp::Delete, old_graphemes[old_ix]);
                old_ix += 1;
            }
            DiffOp::Insert => {
                append_segment(&mut result.new_segments, DiffOp::Insert, new_graphemes[new_ix]);
                new_ix += 1;
            }
        }
    }
    trace!(
        old_segments = result.old_segments.len(),
        new_segments = result.new_segments.len(),
        "computed char diff"
    );
    result
}

fn append_segment(segments: &mut Vec<CharDiffSegment>, op: DiffOp, text: &str) {
    if let Some(last) = segments.last_mut()
        && last.op == op
    {
        last.text.push_str(text);
        return;
    }
    segments.push(CharDiffSegment {
        op,
        text: text.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(segments: &[CharDiffSegment]) -> Vec<(DiffOp, &str)> {
        segments.iter().map(|s| (s.op, s.text.as_str())).collect()
    }

    #[test]
    fn adjacent_segments_coalesce_per_op() {
        let result = diff_chars("abcd", "xyzd");
        assert_eq!(
            ops(&result.old_segments),
            vec![(DiffOp::Delete, "abc"), (DiffOp::Equal, "d")]
        );
        assert_eq!(
            ops(&result.new_segments),
            vec![(DiffOp::Insert, "xyz"), (DiffOp::Equal, "d")]
        );
    }

    #[test]
    fn unchanged_side_is_a_single_equal_segment() {
        let result = diff_chars("ac", "abc");
        assert_eq!(ops(&result.old_segments), vec![(DiffOp::Equal, "ac")]);
        assert_eq!(
            ops(&result.new_segments),
            vec![
                (DiffOp::Equal, "a"),
                (DiffOp::Insert, "b"),
                (DiffOp::Equal, "c")
            ]
        );
    }

    #[test]
    fn emoji_stay_whole_clusters() {
        let result = diff_chars("a😀b", "a😎b");
        assert_eq!(
            ops(&result.old_segments),
            vec![
                (DiffOp::Equal, "a"),
                (DiffOp::Delete, "😀"),
                (DiffOp::Equal, "b")
            ]
        );
        assert_eq!(
            ops(&result.new_segments),
            vec![
                (DiffOp::Equal, "a"),
                (DiffOp::Insert, "😎"),
                (DiffOp::Equal, "b")
            ]
        );
    }

    #[test]
    fn skin_tone_modifier_is_not_split() {
        let result = diff_chars("👋🏻", "👋🏿");
        assert_eq!(ops(&result.old_segments), vec![(DiffOp::Delete, "👋🏻")]);
        assert_eq!(ops(&result.new_segments), vec![(DiffOp::Insert, "👋🏿")]);
    }
}
