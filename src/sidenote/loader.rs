//! Source loading utilities
//!
//! This module provides `SourceLoader`, which loads source text from files or strings
//! and runs transforms on it. Both the library entry points and the tests go through it.
//!
//! # Example
//!
//! ```rust,ignore
//! use sidenote::sidenote::loader::SourceLoader;
//!
//! // From file
//! let sections = SourceLoader::from_path("src/my/app.clj")?.parse()?;
//!
//! // From string
//! let sections = SourceLoader::from_string(";; hello\n(defn f [] 1)\n").parse()?;
//!
//! // Custom transform
//! let batch = loader.with(&READ_FORMS)?;
//! ```

use crate::sidenote::arranging::{arrange, Section};
use crate::sidenote::config::SidenoteConfig;
use crate::sidenote::docstrings::DocLookup;
use crate::sidenote::reading::SyntaxError;
use crate::sidenote::transforms::stages::FormBatch;
use crate::sidenote::transforms::standard::{sections_with, READ_FORMS, STRING_TO_SECTIONS};
use crate::sidenote::transforms::{Transform, TransformError};
use std::fs;
use std::path::Path;

/// Error that can occur when parsing a source into sections
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// IO error when reading a file
    Io(String),
    /// The source is not well-formed
    Syntax(SyntaxError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Io(msg) => write!(f, "IO error: {}", msg),
            ParseError::Syntax(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::Io(err.to_string())
    }
}

impl From<SyntaxError> for ParseError {
    fn from(err: SyntaxError) -> Self {
        ParseError::Syntax(err)
    }
}

impl From<TransformError> for ParseError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::Syntax(err) => ParseError::Syntax(err),
        }
    }
}

/// Source loader with transform shortcuts
pub struct SourceLoader {
    source: String,
}

impl SourceLoader {
    /// Load from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let source = fs::read_to_string(path)?;
        Ok(SourceLoader { source })
    }

    /// Load from a string
    pub fn from_string<S: Into<String>>(source: S) -> Self {
        SourceLoader {
            source: source.into(),
        }
    }

    /// Run a custom transform on the source
    pub fn with<O: 'static>(&self, transform: &Transform<String, O>) -> Result<O, ParseError> {
        Ok(transform.run(self.source.clone())?)
    }

    /// Split the source into sections with the default configuration
    pub fn parse(&self) -> Result<Vec<Section>, ParseError> {
        self.with(&STRING_TO_SECTIONS)
    }

    /// Split the source into sections with an explicit configuration
    pub fn parse_with_config(&self, config: &SidenoteConfig) -> Result<Vec<Section>, ParseError> {
        self.with(&sections_with(config.clone()))
    }

    /// Split the source into sections, resolving docstrings through `lookup` only.
    ///
    /// Unlike [`parse`](Self::parse), the source's own definitions are not indexed
    /// first; `lookup` decides what is known.
    pub fn parse_with_lookup(
        &self,
        config: &SidenoteConfig,
        lookup: &mut dyn DocLookup,
    ) -> Result<Vec<Section>, ParseError> {
        let FormBatch { lines, forms } = self.forms()?;
        Ok(arrange(forms, &lines, lookup, &config.arrange))
    }

    /// Read the top-level forms without arranging them
    pub fn forms(&self) -> Result<FormBatch, ParseError> {
        self.with(&READ_FORMS)
    }

    /// Get the raw source string
    pub fn source(&self) -> String {
        self.source.clone()
    }

    pub fn source_ref(&self) -> &str {
        &self.source
    }
}
