//! Form stream
//!
//! A lazy, finite, non-restartable sequence of located forms. Each element is read exactly
//! once from the underlying tokenizer. The stream stops for good at end of input or after
//! the first syntax error.

use super::tokenizer::CommentAwareTokenizer;
use super::LocatedForm;
use crate::sidenote::reading::SyntaxError;
use std::iter::FusedIterator;
use tracing::{debug, trace};

/// Iterator over the top-level forms of a source text
pub struct FormStream<'a> {
    tokenizer: CommentAwareTokenizer<'a>,
    finished: bool,
}

impl<'a> FormStream<'a> {
    pub fn new(source: &'a str) -> Self {
        FormStream {
            tokenizer: CommentAwareTokenizer::new(source),
            finished: false,
        }
    }
}

impl Iterator for FormStream<'_> {
    type Item = Result<LocatedForm, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.tokenizer.skip_separators();
        match self.tokenizer.next_form() {
            Ok(Some(form)) => {
                trace!(
                    start = form.start_line,
                    end = form.end_line,
                    comment = form.is_comment(),
                    "read form"
                );
                Some(Ok(form))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                debug!(line = err.line, "form stream stopped: {}", err.message);
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for FormStream<'_> {}

/// Stream the forms of `source`.
///
/// The stream holds the process-wide comment hook until it is dropped. Other threads
/// wait for it; on the same thread, starting another stream or parse, or calling
/// [`ReadTable::settled`](crate::sidenote::reading::ReadTable::settled), panics.
pub fn forms(source: &str) -> FormStream<'_> {
    FormStream::new(source)
}

/// Read every form of `source`.
///
/// The tokenizer, and with it the installed comment handler, is released before this
/// returns, on success and on error alike.
pub fn collect_forms(source: &str) -> Result<Vec<LocatedForm>, SyntaxError> {
    forms(source).collect()
}
