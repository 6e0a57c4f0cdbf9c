//! Docstring stripping
//!
//!     Once a docstring has been found, its literal is cut out of the form's raw text so it
//!     is not shown twice. This is surgery on the original text, not re-serialization:
//!     only the literal and the whitespace it leaves dangling are touched.
//!
//!     Cleanup after the cut, in order:
//!     - a `:doc` key left without its value is removed, and so is a metadata or attribute
//!       map that ends up empty (`^{:doc "..."}`, `{:doc "..."}`)
//!     - whitespace left before a closing delimiter is removed: `(ns foo\n  "doc")` becomes
//!       `(ns foo)`
//!     - a line left blank is removed
//!     - two runs of spaces meeting on the same line collapse to the first one
//!
//!     The literal is found by value: a docstring read from `"a\nb"` matches that literal
//!     even though its text holds a real newline. A docstring that does not occur in the
//!     text leaves it unchanged.

use crate::sidenote::reading::{unescape, Token};
use logos::Logos;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static DANGLING_DOC_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r":doc\s*$").unwrap());

static OPEN_MAP_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(#?\^)?\{\s*$").unwrap());

static CLOSE_MAP_HEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\}").unwrap());

/// Remove the first string literal of `raw` that reads as `docstring`.
///
/// `None`, or a docstring with no such literal in `raw`, returns `raw` unchanged.
pub fn strip_docstring(docstring: Option<&str>, raw: &str) -> String {
    let Some(docstring) = docstring else {
        return raw.to_string();
    };
    let Some(literal) = find_literal(raw, docstring) else {
        return raw.to_string();
    };

    let before = &raw[..literal.start];
    let after = &raw[literal.end..];
    let (before, after) = drop_empty_doc_map(before, after);
    join_cut(before, after)
}

/// Byte range of the literal for `docstring`.
///
/// Literals are matched by value, so escapes such as `\n` or `\u0041` are found as
/// written. Strings inside comments are skipped.
fn find_literal(raw: &str, docstring: &str) -> Option<Range<usize>> {
    let mut lexer = Token::lexer(raw);
    while let Some(token) = lexer.next() {
        if token != Ok(Token::Str) {
            continue;
        }
        let span = lexer.span();
        let body = &raw[span.start + 1..span.end - 1];
        if unescape(body, 0).is_ok_and(|value| value == docstring) {
            return Some(span);
        }
    }
    None
}

fn drop_empty_doc_map<'r>(before: &'r str, after: &'r str) -> (&'r str, &'r str) {
    let Some(key) = DANGLING_DOC_KEY.find(before) else {
        return (before, after);
    };
    let before = &before[..key.start()];

    match (OPEN_MAP_TAIL.find(before), CLOSE_MAP_HEAD.find(after)) {
        (Some(open), Some(close)) => (&before[..open.start()], &after[close.end()..]),
        _ => (before, after),
    }
}

fn join_cut(before: &str, after: &str) -> String {
    let before_trimmed = before.trim_end_matches([' ', '\t']);
    let after_trimmed = after.trim_start_matches([' ', '\t']);

    // Closing delimiter right after the cut: pull it back onto the previous content,
    // unless that line ends in a comment which would swallow it.
    if after.trim_start().starts_with([')', ']', '}']) {
        let content = before.trim_end();
        let last_line = content.rsplit('\n').next().unwrap_or(content);
        if !last_line.contains(';') {
            return format!("{}{}", content, after.trim_start());
        }
        return format!("{}{}", before_trimmed, after_trimmed);
    }

    let line_blank_before = before_trimmed.is_empty() || before_trimmed.ends_with('\n');
    let line_blank_after = after_trimmed.is_empty() || after_trimmed.starts_with('\n');

    if line_blank_before && line_blank_after {
        // The literal sat alone on its line: remove the line
        let without_line = before_trimmed
            .strip_suffix('\n')
            .unwrap_or(before_trimmed);
        return format!("{}{}", without_line, after_trimmed);
    }

    if line_blank_after {
        // The literal ended its line: drop the whitespace that preceded it
        return format!("{}{}", before_trimmed, after_trimmed);
    }

    // Content follows on the same line: keep one side's whitespace
    format!("{}{}", before, after_trimmed)
}
