//! Comment-aware tokenizer
//!
//! Wraps a [`Reader`] so that top-level line comments come back as forms instead of being
//! skipped. The capturing comment handler is installed through a [`CommentHook`] when the
//! tokenizer is created and the previous handler is put back when it is dropped, whatever
//! way the caller leaves.

use super::{Comment, Form, LocatedForm};
use crate::sidenote::reading::{capture_comment, CommentHook, DatumKind, Reader, SyntaxError};
use tracing::debug;

/// Reads one located form per call
pub struct CommentAwareTokenizer<'a> {
    reader: Reader<'a>,
    _hook: CommentHook,
}

impl<'a> CommentAwareTokenizer<'a> {
    /// Install the capturing comment handler and start reading `source`.
    ///
    /// Blocks while another tokenizer is alive, see
    /// [`read_table`](crate::sidenote::reading::read_table).
    pub fn new(source: &'a str) -> Self {
        let hook = CommentHook::install(capture_comment);
        let reader = Reader::new(source);
        debug!(bytes = source.len(), "comment-aware tokenizer ready");
        CommentAwareTokenizer {
            reader,
            _hook: hook,
        }
    }

    /// Skip whitespace and commas up to the next token
    pub fn skip_separators(&mut self) {
        self.reader.skip_whitespace();
    }

    pub fn current_line(&self) -> usize {
        self.reader.current_line()
    }

    /// Read the next form.
    ///
    /// The start line of a code form is the cursor line before reading, so separators
    /// should be skipped first. Code forms end on the cursor line after reading. Comments
    /// sit on the line of their own token and end where they start, because the comment
    /// token stops before the newline.
    pub fn next_form(&mut self) -> Result<Option<LocatedForm>, SyntaxError> {
        let start_line = self.reader.current_line();
        let Some(datum) = self.reader.read_one()? else {
            return Ok(None);
        };

        let located = match datum.kind {
            // A discarded form may sit between the cursor and the comment
            DatumKind::Comment(text) => {
                let line = self.reader.line_of(datum.span.start);
                LocatedForm {
                    form: Form::Comment(Comment::new(text)),
                    start_line: line,
                    end_line: line,
                }
            }
            _ => LocatedForm {
                form: Form::Code(datum),
                start_line,
                end_line: self.reader.current_line(),
            },
        };

        Ok(Some(located))
    }
}
