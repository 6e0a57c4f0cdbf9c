//! Docstrings
//!
//!     Code sections show their docstring next to the code rather than inside it. For each
//!     code form this module works out the docstring, removes its literal from the raw text
//!     and keeps track of the namespace the following forms belong to.
//!
//!     1. [`extract`]: dispatch on the form's leading symbol
//!     2. [`lookup`]: docstring resolution for named definitions
//!     3. [`strip`]: removal of the docstring literal from raw text
//!
//!     Only `ns` and `defmethod` docstrings are read off the form directly. Definitions go
//!     through a [`DocLookup`], so that a docstring given as metadata or as an attribute
//!     map is found as well.

pub mod extract;
pub mod lookup;
pub mod strip;

pub use extract::{extract, DefinitionKind, Extraction};
pub use lookup::{DocLookup, LookupError, SourceIndex};
pub use strip::strip_docstring;
