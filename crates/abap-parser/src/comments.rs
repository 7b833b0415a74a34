//! Comment block removal.
//!
//! A comment line is one whose first non-blank character is `*` or `"`. Runs of
//! [`MIN_BLOCK_LINES`] or more consecutive comment lines are dropped entirely;
//! shorter runs are kept verbatim since they tend to be annotations next to the
//! code they describe. Nothing else is touched.

/// Characters that open a full-line comment once leading whitespace is skipped.
pub const COMMENT_MARKERS: [char; 2] = ['*', '"'];

/// Shortest run of comment lines treated as a removable block.
pub const MIN_BLOCK_LINES: usize = 3;

/// True when the line, after leading whitespace, starts with a comment marker.
pub fn is_comment_line(line: &str) -> bool {
    line.trim_start().starts_with(COMMENT_MARKERS)
}

/// Remove comment blocks of [`MIN_BLOCK_LINES`]+ consecutive comment lines.
///
/// Line terminators of surviving lines are preserved byte for byte. A removed
/// block is always bounded by non-comment lines (or the input edges), so no new
/// block can form after removal and the operation is idempotent.
pub fn strip_comments(source: &str) -> String {
    let lines: Vec<&str> = source.split_inclusive('\n').collect();
    let mut out = String::with_capacity(source.len());

    let mut i = 0;
    while i < lines.len() {
        if !is_comment_line(lines[i]) {
            out.push_str(lines[i]);
            i += 1;
            continue;
        }

        let run_start = i;
        while i < lines.len() && is_comment_line(lines[i]) {
            i += 1;
        }
        if i - run_start < MIN_BLOCK_LINES {
            for line in &lines[run_start..i] {
                out.push_str(line);
            }
        }
    }

    out
}
