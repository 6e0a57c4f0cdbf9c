//! Testing utilities for section assertions
//!
//!     Section lists are easy to get almost right: one stray newline in a merged raw text
//!     or a docstring joined with the wrong separator still gives a plausible result. Tests
//!     should therefore check whole sections, kind, raw text and docstring together, rather
//!     than counting them.
//!
//!     Two tools are provided:
//!
//!         1. [`assert_sections`]: a fluent API over a section list
//!         2. [`render_sections`]: a stable text rendering for `insta` snapshots
//!
//!     Sample sources used across tests live under `tests/samples/` and are found with
//!     [`sample_path`].
//!
//! Usage Example
//!
//!     ```rust,ignore
//!     use sidenote::sidenote::testing::assert_sections;
//!
//!     let sections = sidenote::parse(";; hello\n(defn f [] 1)\n").unwrap();
//!     assert_sections(&sections)
//!         .len(2)
//!         .comment(0, "hello")
//!         .section(1, |s| s.is_code().raw_contains("defn").docstring(""));
//!     ```

use crate::sidenote::arranging::{Section, SectionKind};
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Create an assertion builder for a section list
pub fn assert_sections(sections: &[Section]) -> SectionsAssertion<'_> {
    SectionsAssertion { sections }
}

pub struct SectionsAssertion<'a> {
    sections: &'a [Section],
}

impl<'a> SectionsAssertion<'a> {
    /// Assert the number of sections
    pub fn len(self, expected: usize) -> Self {
        assert_eq!(
            self.sections.len(),
            expected,
            "expected {} sections, got {}:\n{}",
            expected,
            self.sections.len(),
            render_sections(self.sections)
        );
        self
    }

    /// Run assertions against one section
    pub fn section<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(SectionAssertion<'a>) -> SectionAssertion<'a>,
    {
        let section = self.sections.get(index).unwrap_or_else(|| {
            panic!(
                "no section at index {} ({} sections)",
                index,
                self.sections.len()
            )
        });
        assertion(SectionAssertion {
            section,
            context: format!("section[{}]", index),
        });
        self
    }

    /// Assert a comment section's text
    pub fn comment(self, index: usize, raw: &str) -> Self {
        self.section(index, |s| s.is_comment().raw(raw))
    }

    /// Assert a code section's raw text and docstring
    pub fn code(self, index: usize, raw: &str, docstring: &str) -> Self {
        self.section(index, |s| s.is_code().raw(raw).docstring(docstring))
    }

    /// Assert the kinds of all sections, in order
    pub fn kinds(self, expected: &[SectionKind]) -> Self {
        let actual: Vec<SectionKind> = self.sections.iter().map(|s| s.kind).collect();
        assert_eq!(actual, expected, "section kinds differ");
        self
    }

    /// Assert that no section's raw text contains `needle`
    pub fn none_contains(self, needle: &str) -> Self {
        if let Some((index, _)) = self
            .sections
            .iter()
            .enumerate()
            .find(|(_, s)| s.raw.contains(needle))
        {
            panic!("section[{}] contains {:?}", index, needle);
        }
        self
    }
}

pub struct SectionAssertion<'a> {
    section: &'a Section,
    context: String,
}

impl SectionAssertion<'_> {
    pub fn is_comment(self) -> Self {
        assert!(
            self.section.is_comment(),
            "{}: expected a comment section, got {:?}",
            self.context,
            self.section
        );
        self
    }

    pub fn is_code(self) -> Self {
        assert!(
            self.section.is_code(),
            "{}: expected a code section, got {:?}",
            self.context,
            self.section
        );
        self
    }

    pub fn raw(self, expected: &str) -> Self {
        assert_eq!(self.section.raw, expected, "{}: raw text", self.context);
        self
    }

    pub fn raw_contains(self, needle: &str) -> Self {
        assert!(
            self.section.raw.contains(needle),
            "{}: raw text {:?} does not contain {:?}",
            self.context,
            self.section.raw,
            needle
        );
        self
    }

    pub fn docstring(self, expected: &str) -> Self {
        assert_eq!(
            self.section.docstring.as_deref(),
            Some(expected),
            "{}: docstring",
            self.context
        );
        self
    }

    pub fn docstring_contains(self, needle: &str) -> Self {
        assert!(
            self.section.docstring().contains(needle),
            "{}: docstring {:?} does not contain {:?}",
            self.context,
            self.section.docstring,
            needle
        );
        self
    }
}

/// Render sections as plain text, one header line per section followed by its raw text.
///
/// ```text
/// -- comment
/// hello
/// -- code "Doubles x."
/// (defn f [x] (* 2 x))
/// ```
///
/// Code headers carry the docstring in debug quoting, omitted when empty.
pub fn render_sections(sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        match section.kind {
            SectionKind::Comment => out.push_str("-- comment\n"),
            SectionKind::Code if section.docstring().is_empty() => out.push_str("-- code\n"),
            SectionKind::Code => {
                let _ = writeln!(out, "-- code {:?}", section.docstring());
            }
        }
        out.push_str(&section.raw);
        out.push('\n');
    }
    out
}

/// Path of a sample source under `tests/samples/`
pub fn sample_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("samples")
        .join(name)
}
