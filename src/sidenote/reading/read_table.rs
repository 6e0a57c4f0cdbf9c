//! Process-wide reader configuration
//!
//!     The read table decides what the reader does with syntax that is not data by itself.
//!     Today that is only line comments: the default handler discards them like whitespace,
//!     while [`capture_comment`] turns them into [`DatumKind::Comment`] values so that prose
//!     can be kept in order with the code around it.
//!
//!     The table is a single global slot. Readers take a copy when they are created, so a
//!     handler swap never affects a reader that is already running.
//!
//! Scoped Installation
//!
//!     Handlers are swapped through [`CommentHook`], a guard that puts the previous handler
//!     back when it is dropped. That happens on every exit path, including errors and
//!     unwinding panics. The guard also holds a process-wide lock for its whole lifetime,
//!     so two installers never interleave: a second `install` blocks until the first guard
//!     is gone.
//!
//!     The lock is not reentrant. Installing a second hook, or asking for
//!     [`ReadTable::settled`], on a thread that still holds a guard would wait on itself
//!     forever, so both panic instead.
//!
//!     Readers built with [`Reader::new`](super::reader::Reader::new) while a hook is live
//!     will see the installed handler. Code that must not depend on that, like indexing
//!     other files, builds its reader with an explicit table.

use super::datum::{Datum, DatumKind};
use once_cell::sync::Lazy;
use std::cell::Cell;
use std::ops::Range;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};
use tracing::trace;

/// Decides what a top-level line comment becomes.
///
/// Receives the comment text (marker included, newline excluded) and its byte span.
/// `None` means the comment is skipped like whitespace.
pub type CommentHandler = fn(&str, Range<usize>) -> Option<Datum>;

/// The default handler: comments are whitespace
pub fn discard_comment(_text: &str, _span: Range<usize>) -> Option<Datum> {
    None
}

/// Keep comments as data, marker and all
pub fn capture_comment(text: &str, span: Range<usize>) -> Option<Datum> {
    Some(Datum::new(DatumKind::Comment(text.to_string()), span))
}

/// Reader configuration
#[derive(Debug, Clone, Copy)]
pub struct ReadTable {
    pub comment: CommentHandler,
}

impl ReadTable {
    /// A copy of the process-wide table as it is right now
    pub fn current() -> Self {
        *TABLE.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// A copy of the process-wide table taken while no hook is installed.
    ///
    /// Blocks until any live [`CommentHook`] is dropped.
    ///
    /// # Panics
    ///
    /// If the calling thread holds a [`CommentHook`] itself.
    pub fn settled() -> Self {
        assert_not_held("ReadTable::settled");
        let _exclusive = INSTALL.lock().unwrap_or_else(PoisonError::into_inner);
        Self::current()
    }

    /// Apply the comment handler
    pub fn read_comment(&self, text: &str, span: Range<usize>) -> Option<Datum> {
        (self.comment)(text, span)
    }
}

impl Default for ReadTable {
    fn default() -> Self {
        Self {
            comment: discard_comment,
        }
    }
}

static TABLE: Lazy<RwLock<ReadTable>> = Lazy::new(|| RwLock::new(ReadTable::default()));

static INSTALL: Mutex<()> = Mutex::new(());

thread_local! {
    static HELD: Cell<bool> = const { Cell::new(false) };
}

fn assert_not_held(caller: &str) {
    assert!(
        !HELD.with(Cell::get),
        "{} called while this thread holds a CommentHook",
        caller
    );
}

/// Guard for a temporarily installed comment handler.
///
/// The previous handler is restored when the guard is dropped.
pub struct CommentHook {
    previous: CommentHandler,
    _exclusive: MutexGuard<'static, ()>,
}

impl CommentHook {
    /// Install `handler` as the process-wide comment handler.
    ///
    /// Blocks while another thread holds a hook.
    ///
    /// # Panics
    ///
    /// If the calling thread already holds a hook.
    pub fn install(handler: CommentHandler) -> Self {
        assert_not_held("CommentHook::install");
        let exclusive = INSTALL.lock().unwrap_or_else(PoisonError::into_inner);
        HELD.with(|held| held.set(true));
        let previous = {
            let mut table = TABLE.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut table.comment, handler)
        };
        trace!("comment handler installed");
        CommentHook {
            previous,
            _exclusive: exclusive,
        }
    }
}

impl Drop for CommentHook {
    fn drop(&mut self) {
        let mut table = TABLE.write().unwrap_or_else(PoisonError::into_inner);
        table.comment = self.previous;
        HELD.with(|held| held.set(false));
        trace!("comment handler restored");
    }
}
