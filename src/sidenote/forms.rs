//! Forms
//!
//!     A form is one top-level element of a source file together with the lines it
//!     occupies: either a line comment or a code datum. Forms are what the
//!     [arranger](crate::sidenote::arranging) walks to build sections.
//!
//!     Forms are produced by the [`FormStream`], which drives a [`CommentAwareTokenizer`].
//!     The tokenizer is the only place where comments survive reading: everywhere else the
//!     reader treats them as whitespace.
//!
//! Line Spans
//!
//!     Both `start_line` and `end_line` are 1-based and inclusive. A comment always sits on
//!     a single line. Two forms are adjacent when no line separates them, that is when
//!     `first.end_line + 1 == second.start_line`.

pub mod stream;
pub mod tokenizer;

pub use stream::{collect_forms, forms, FormStream};
pub use tokenizer::CommentAwareTokenizer;

use crate::sidenote::reading::Datum;
use once_cell::sync::Lazy;
use regex::Regex;

/// `; note`, but not `;; prose`
static SINGLE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^;(\s|$)").unwrap());

static LEADING_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^;+\s?").unwrap());

/// A line comment, marker included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The literal comment text, marker included
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The comment text without its leading semicolons and the space after them
    pub fn content(&self) -> String {
        strip_marker(&self.text)
    }

    /// Check if this is a single-semicolon comment.
    ///
    /// Single-semicolon comments are margin notes for the code, not documentation.
    pub fn is_single_marker(&self) -> bool {
        SINGLE_MARKER.is_match(&self.text)
    }
}

/// Remove the leading comment marker (one or more `;` and one following space)
pub fn strip_marker(text: &str) -> String {
    LEADING_MARKER.replace(text, "").into_owned()
}

/// A top-level element
#[derive(Debug, Clone, PartialEq)]
pub enum Form {
    Comment(Comment),
    Code(Datum),
}

/// A form and the lines it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedForm {
    pub form: Form,
    pub start_line: usize,
    pub end_line: usize,
}

impl LocatedForm {
    pub fn is_comment(&self) -> bool {
        matches!(self.form, Form::Comment(_))
    }

    pub fn is_code(&self) -> bool {
        matches!(self.form, Form::Code(_))
    }

    /// The datum of a code form
    pub fn datum(&self) -> Option<&Datum> {
        match &self.form {
            Form::Code(datum) => Some(datum),
            Form::Comment(_) => None,
        }
    }
}

/// Check if a span ending at `end_line` is directly followed by one starting at `start_line`
pub fn adjacent(end_line: usize, start_line: usize) -> bool {
    end_line + 1 == start_line
}
