//! # sidenote
//!
//! Splits Clojure, ClojureScript and EDN sources into literate sections: prose from
//! top-level comments, and code blocks with their docstrings lifted out.
//!
//! ## Testing
//!
//! For test helpers (fluent section assertions, snapshot rendering, sample files), see
//! the [testing module](sidenote::testing).

pub mod sidenote;

pub use sidenote::arranging::{Section, SectionKind};
pub use sidenote::config::{ConfigLoader, SidenoteConfig};
pub use sidenote::docstrings::{DocLookup, LookupError, SourceIndex};
pub use sidenote::loader::{ParseError, SourceLoader};
pub use sidenote::reading::SyntaxError;
pub use sidenote::{parse, parse_file, parse_with};
