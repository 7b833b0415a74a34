//! Pattern-based extraction engine for ABAP source text.
//!
//! There is no grammar or AST here. Structure is recovered by scanning for
//! paired start/end markers (`CLASS ... DEFINITION` / `ENDCLASS.`,
//! `METHOD x.` / `ENDMETHOD.`) and dependencies by targeted sub-patterns inside
//! a method body. All regexes run on the `regex` crate's linear-time engine, so
//! pathological input cannot trigger catastrophic backtracking.
//!
//! Flow: raw text → [`comments::strip_comments`] → [`structure`] slices →
//! [`deps`] / [`sql`] facts per method → [`report::build_report`].

pub mod comments;
pub mod deps;
pub mod outline;
pub mod report;
pub mod sql;
pub mod statements;
pub mod structure;
pub mod unit;
