//! Period-terminated statement scanner.
//!
//! Splits ABAP source into statements, ignoring periods inside `'...'`,
//! `` `...` `` and `|...|` literals. Full-line comments and trailing `"`
//! comments are removed from the statement code; line breaks become single
//! spaces. One linear pass, no backtracking.

use crate::comments::is_comment_line;

/// One statement of source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Byte offset of the first code character in the source.
    pub start: usize,
    /// Byte offset just past the terminating period, or end of input.
    pub end: usize,
    /// Code with comments removed, lines joined by a space, trimmed.
    /// The terminating period is not included.
    pub code: String,
}

impl Statement {
    /// First word, ASCII upper-cased (`METHODS`, `CLASS-DATA`, `SELECT`, ...).
    ///
    /// Keywords are ASCII, so non-ASCII letters are left as they are and the
    /// result keeps the byte length of the word.
    pub fn keyword(&self) -> String {
        self.code
            .split(|c: char| c.is_whitespace() || c == ':' || c == '(')
            .find(|w| !w.is_empty())
            .unwrap_or("")
            .to_ascii_uppercase()
    }

    /// The statement exactly as it appears in the source, comments included.
    pub fn raw<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Split `source` into statements.
pub fn split_statements(source: &str) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut code = String::new();
    let mut start: Option<usize> = None;
    let mut offset = 0;

    for line in source.split_inclusive('\n') {
        let line_offset = offset;
        offset += line.len();

        if is_comment_line(line) {
            continue;
        }

        let mut literal: Option<char> = None;
        for (idx, c) in line.char_indices() {
            if let Some(delim) = literal {
                code.push(c);
                if c == delim {
                    literal = None;
                }
                continue;
            }
            match c {
                '\'' | '`' | '|' => {
                    literal = Some(c);
                    start.get_or_insert(line_offset + idx);
                    code.push(c);
                }
                '"' => break,
                '.' => {
                    let stmt_start = start.take().unwrap_or(line_offset + idx);
                    let trimmed = code.trim();
                    if !trimmed.is_empty() {
                        statements.push(Statement {
                            start: stmt_start,
                            end: line_offset + idx + 1,
                            code: trimmed.to_string(),
                        });
                    }
                    code.clear();
                }
                c if c.is_whitespace() => {
                    if !code.is_empty() && !code.ends_with(' ') {
                        code.push(' ');
                    }
                }
                c => {
                    start.get_or_insert(line_offset + idx);
                    code.push(c);
                }
            }
        }

        if !code.is_empty() && !code.ends_with(' ') {
            code.push(' ');
        }
    }

    let trimmed = code.trim();
    if let Some(stmt_start) = start
        && !trimmed.is_empty()
    {
        statements.push(Statement {
            start: stmt_start,
            end: source.len(),
            code: trimmed.to_string(),
        });
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_statements() {
        let src = "DATA lv_a TYPE i.\nlv_a = 1.\n";
        let stmts = split_statements(src);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].code, "DATA lv_a TYPE i");
        assert_eq!(stmts[0].keyword(), "DATA");
        assert_eq!(stmts[0].raw(src), "DATA lv_a TYPE i.");
        assert_eq!(stmts[1].code, "lv_a = 1");
    }

    #[test]
    fn test_multiline_statement_is_joined() {
        let src = "METHODS run\n    IMPORTING\n      iv_x TYPE i.\n";
        let stmts = split_statements(src);
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].code, "METHODS run IMPORTING iv_x TYPE i");
        assert_eq!(stmts[0].raw(src), "METHODS run\n    IMPORTING\n      iv_x TYPE i.");
    }

    #[test]
    fn test_period_inside_literals_does_not_split() {
        let src = "lv_a = 'a. b'.\nlv_b = |x.y|.\nlv_c = `1.5`.\n";
        let stmts = split_statements(src);
        assert_eq!(stmts.len(), 3);
        assert_eq!(stmts[0].code, "lv_a = 'a. b'");
        assert_eq!(stmts[1].code, "lv_b = |x.y|");
        assert_eq!(stmts[2].code, "lv_c = `1.5`");
    }

    #[test]
    fn test_comments_are_removed() {
        let src = "* header. with period\nlv_a = 1. \" trailing. comment\nSELECT *\n* inner line.\n  FROM mara.\n";
        let stmts = split_statements(src);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].code, "lv_a = 1");
        assert_eq!(stmts[1].code, "SELECT * FROM mara");
        assert_eq!(stmts[1].keyword(), "SELECT");
    }

    #[test]
    fn test_keyword_with_colon_and_dash() {
        let stmts = split_statements("CLASS-METHODS: a, b.\nDATA(lo) = NEW zcl_x( ).");
        assert_eq!(stmts[0].keyword(), "CLASS-METHODS");
        assert_eq!(stmts[1].keyword(), "DATA");
    }

    #[test]
    fn test_keyword_keeps_non_ascii_letters() {
        let stmts = split_statements("interface\u{17F} zif_x.");
        assert_eq!(stmts[0].keyword(), "INTERFACE\u{17F}");
        assert_eq!(stmts[0].keyword().len(), "interface\u{17F}".len());
    }

    #[test]
    fn test_unterminated_tail() {
        let src = "x = 1.\ny = 2";
        let stmts = split_statements(src);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[1].code, "y = 2");
        assert_eq!(stmts[1].end, src.len());
    }

    #[test]
    fn test_empty_input() {
        assert!(split_statements("").is_empty());
        assert!(split_statements("* only\n* comments\n").is_empty());
    }
}
