//! Literate section extraction for Clojure sources
//!
//!     A source file is split into an ordered list of sections, each either a block of
//!     prose taken from line comments or a block of code with its docstring pulled out.
//!     Rendered side by side, the prose explains the code next to it.
//!
//! Structure
//!
//!     The processing is done in a few steps, leaves first:
//!
//!         1. [lines]: the raw text, indexed by line, for slicing forms back out
//!         2. [reading]: the clojure reader (tokens, data, read table)
//!         3. [forms]: top-level comments and code with their line spans
//!         4. [docstrings]: per-form docstring extraction, lookup and stripping
//!         5. [arranging]: the adjacency rules that turn forms into sections
//!
//!     [transforms] wires these together into pipelines and [loader] runs them on strings
//!     and files. [config] holds the knobs, loaded from an embedded default TOML.
//!
//! Comments
//!
//!     Only top-level `;` comments become prose. Comments nested inside a form are part of
//!     that form's raw text. Single-semicolon comments (`; note`) are margin notes and are
//!     left out. Consecutive comment lines form one section.

pub mod arranging;
pub mod config;
pub mod docstrings;
pub mod forms;
pub mod lines;
pub mod loader;
pub mod reading;
pub mod testing;
pub mod transforms;

use self::arranging::Section;
use self::config::SidenoteConfig;
use self::docstrings::DocLookup;
use self::loader::{ParseError, SourceLoader};
use std::path::Path;

/// Split source text into sections with the default configuration.
///
/// The text's own definitions are indexed first, so docstrings given as metadata or as
/// attribute maps are found.
pub fn parse(source: &str) -> Result<Vec<Section>, ParseError> {
    SourceLoader::from_string(source).parse()
}

/// Read a file and split it into sections with the default configuration
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Section>, ParseError> {
    SourceLoader::from_path(path)?.parse()
}

/// Split source text into sections, resolving docstrings through `lookup`
pub fn parse_with(
    source: &str,
    config: &SidenoteConfig,
    lookup: &mut dyn DocLookup,
) -> Result<Vec<Section>, ParseError> {
    SourceLoader::from_string(source).parse_with_lookup(config, lookup)
}
