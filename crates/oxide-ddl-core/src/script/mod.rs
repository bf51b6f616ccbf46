//! Terminator-aware script splitting.
//!
//! A script is a sequence of statements separated by a terminator, `;` by
//! default. Routine bodies contain semicolons of their own, so scripts switch
//! to another terminator with `SET TERM <new> <current>` around them:
//!
//! ```text
//! SET TERM $$ ;
//! CREATE PROCEDURE P AS BEGIN X = 1; END$$
//! SET TERM ; $$
//! ```
//!
//! [`split_statements`] walks the [`Segments`] of a script and splits every
//! body with the terminator in effect for it. Directives only steer the
//! split and never show up in the output.
//!
//! ```rust
//! use oxide_ddl_core::script::split_statements;
//!
//! let statements = split_statements("A;B; ;C");
//! assert_eq!(statements, vec!["A", "B", "C"]);
//! ```

mod segment;

pub use segment::{Segment, Segments};

/// The statement terminator in effect at the start of every script.
pub const DEFAULT_TERMINATOR: &str = ";";

/// Splits a script into its executable statements, in source order.
///
/// Each statement is trimmed; empty pieces are dropped. A script without any
/// directive is split on `;` alone. A leading byte order mark is skipped, and
/// a malformed directive left inside a body is dropped.
#[must_use]
pub fn split_statements(script: &str) -> Vec<&str> {
    let script = strip_bom(script);
    Segments::new(script).fold(Vec::new(), |mut statements, segment| {
        if let Segment::Body { text, terminator } = segment {
            statements.extend(split_body(text, terminator));
        }
        statements
    })
}

/// Removes a leading UTF-8 byte order mark.
#[must_use]
pub fn strip_bom(script: &str) -> &str {
    script.strip_prefix('\u{feff}').unwrap_or(script)
}

/// Splits one body on `terminator`, trimming and dropping empty pieces and
/// stray directives.
fn split_body<'a>(text: &'a str, terminator: &'a str) -> impl Iterator<Item = &'a str> {
    text.split(terminator)
        .map(str::trim)
        .filter(|piece| !piece.is_empty() && !is_directive(piece))
}

/// Returns true if `statement` is a terminator directive.
///
/// [`Segments`] consumes well-formed directives; this catches one that did
/// not close with the terminator in effect (or names no terminator) and so
/// was left in a body.
#[must_use]
pub fn is_directive(statement: &str) -> bool {
    let mut words = statement.split_whitespace();
    matches!(
        (words.next(), words.next()),
        (Some(set), Some(term)) if set.eq_ignore_ascii_case("SET") && term.eq_ignore_ascii_case("TERM")
    )
}
