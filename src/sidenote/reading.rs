//! Reading
//!
//! This module turns clojure source text into [`Datum`] values, one top-level expression
//! at a time, with line tracking.
//!
//! Structure:
//!     1. [`token`]: logos tokenization of the surface syntax
//!     2. [`reader`]: assembles tokens into data and expands reader macros
//!     3. [`read_table`]: the process-wide, swappable reader configuration (comment handling)
//!
//! The reader does not evaluate anything and knows nothing about namespaces. Docstring and
//! namespace semantics live in [docstrings](crate::sidenote::docstrings).

pub mod datum;
pub mod error;
pub mod read_table;
pub mod reader;
pub mod token;

pub use datum::{split_symbol, Datum, DatumKind};
pub use error::SyntaxError;
pub use read_table::{capture_comment, discard_comment, CommentHandler, CommentHook, ReadTable};
pub use reader::{unescape, Reader};
pub use token::Token;
