pub mod char_diff;
pub mod domain;
pub mod line_diff;
mod myers;
pub mod text;
pub mod view_model;

pub use char_diff::diff_chars;
pub use domain::{CharDiffResult, CharDiffSegment, DiffHunk, DiffLine, DiffOp, DiffResult};
pub use line_diff::{DEFAULT_CONTEXT, diff_line_vecs, diff_lines};
pub use text::{FNV_OFFSET_BASIS, hash_bytes, split_lines};
pub use view_model::{
    Connector, DiffStats, InlineHighlight, LineKind, SideInfo, ViewLine, ViewModel,
    create_view_model,
};
