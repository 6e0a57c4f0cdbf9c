//! Section arrangement
//!
//!     The arranger walks the located forms of a file once, front to back, and groups them
//!     into [`Section`]s: runs of prose comments and runs of code. It looks at two items
//!     at a time, the current one and the next one, and applies the first rule that fits:
//!
//!     1. a single-semicolon comment is a margin note and is dropped
//!     2. two comments on adjacent lines merge into one comment
//!     3. two code forms on adjacent lines merge into one code block, raw texts joined by
//!        a newline and docstrings by a blank line
//!     4. a comment directly followed by code is folded into that code's docstring and
//!        emitted right away, when [`ArrangeConfig::attach_adjacent_comments`] is set
//!     5. any other comment is emitted
//!     6. any other code is emitted
//!
//!     A merged item becomes the new current item and is compared against the form after
//!     it, so runs of any length collapse into one section. Nothing is revisited.
//!
//! Adjacency
//!
//!     Two items are adjacent when the second starts on the line after the first ends.
//!     Forms sharing a line are not adjacent: `(def x 1) ;; note` gives a code section and
//!     a comment section, and the code section's raw text is the whole line.

use crate::sidenote::config::ArrangeConfig;
use crate::sidenote::docstrings::{extract, DocLookup};
use crate::sidenote::forms::{adjacent, Form, LocatedForm};
use crate::sidenote::lines::SourceLines;
use crate::sidenote::reading::Datum;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// What a section holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Comment,
    Code,
}

/// One block of a literate rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    /// Comment sections: the prose with comment markers removed.
    /// Code sections: the source lines with the docstring literal removed.
    pub raw: String,
    /// Always present on code sections, empty when there is no docstring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
}

impl Section {
    pub fn comment(raw: impl Into<String>) -> Self {
        Section {
            kind: SectionKind::Comment,
            raw: raw.into(),
            docstring: None,
        }
    }

    pub fn code(raw: impl Into<String>, docstring: impl Into<String>) -> Self {
        Section {
            kind: SectionKind::Code,
            raw: raw.into(),
            docstring: Some(docstring.into()),
        }
    }

    pub fn is_comment(&self) -> bool {
        self.kind == SectionKind::Comment
    }

    pub fn is_code(&self) -> bool {
        self.kind == SectionKind::Code
    }

    /// The docstring of a code section, `""` for comments
    pub fn docstring(&self) -> &str {
        self.docstring.as_deref().unwrap_or_default()
    }
}

/// A form, or a run of forms that has already been merged
#[derive(Debug)]
enum Item {
    Comment {
        content: String,
        single_marker: bool,
        start: usize,
        end: usize,
    },
    Code {
        datum: Datum,
        start: usize,
        end: usize,
    },
    /// Code whose docstring has been extracted
    Extracted {
        raw: String,
        docstring: String,
        start: usize,
        end: usize,
    },
}

impl Item {
    fn from_form(located: LocatedForm) -> Self {
        let LocatedForm {
            form,
            start_line,
            end_line,
        } = located;
        match form {
            Form::Comment(comment) => Item::Comment {
                content: comment.content(),
                single_marker: comment.is_single_marker(),
                start: start_line,
                end: end_line,
            },
            Form::Code(datum) => Item::Code {
                datum,
                start: start_line,
                end: end_line,
            },
        }
    }

    /// First and last line
    fn span(&self) -> (usize, usize) {
        match self {
            Item::Comment { start, end, .. }
            | Item::Code { start, end, .. }
            | Item::Extracted { start, end, .. } => (*start, *end),
        }
    }

    fn is_comment(&self) -> bool {
        matches!(self, Item::Comment { .. })
    }

    fn is_code(&self) -> bool {
        !self.is_comment()
    }

    fn is_single_marker(&self) -> bool {
        matches!(
            self,
            Item::Comment {
                single_marker: true,
                ..
            }
        )
    }

    fn precedes(&self, next: &Item) -> bool {
        adjacent(self.span().1, next.span().0)
    }
}

/// Builds sections from located forms
pub struct Arranger<'a> {
    lines: &'a SourceLines,
    lookup: &'a mut dyn DocLookup,
    attach_adjacent_comments: bool,
    namespace: Option<String>,
    sections: Vec<Section>,
}

impl<'a> Arranger<'a> {
    pub fn new(
        lines: &'a SourceLines,
        lookup: &'a mut dyn DocLookup,
        config: &ArrangeConfig,
    ) -> Self {
        Arranger {
            lines,
            lookup,
            attach_adjacent_comments: config.attach_adjacent_comments,
            namespace: None,
            sections: Vec::new(),
        }
    }

    /// Start in a known namespace instead of none
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Consume the forms and return the sections in source order
    pub fn arrange(mut self, forms: impl IntoIterator<Item = LocatedForm>) -> Vec<Section> {
        let mut queue = forms.into_iter().map(Item::from_form).fuse();
        let mut current = queue.next();

        while let Some(item) = current {
            let next = queue.next();
            current = self.step(item, next).or_else(|| queue.next());
        }

        debug!(
            sections = self.sections.len(),
            namespace = ?self.namespace,
            "arranged sections"
        );
        self.sections
    }

    /// Apply the first matching rule. Returns the item to continue from: the merged item
    /// when `next` was absorbed, `next` itself when it is still pending, `None` when both
    /// items are done.
    fn step(&mut self, current: Item, next: Option<Item>) -> Option<Item> {
        if current.is_single_marker() {
            trace!(line = current.span().0, "dropping margin comment");
            return next;
        }

        let Some(following) = next else {
            self.emit(current);
            return None;
        };

        if !current.precedes(&following) {
            self.emit(current);
            return Some(following);
        }

        match (current, following) {
            (
                Item::Comment {
                    content: first,
                    start,
                    ..
                },
                Item::Comment {
                    content: second,
                    end,
                    ..
                },
            ) => Some(Item::Comment {
                content: format!("{}\n{}", first, second),
                single_marker: false,
                start,
                end,
            }),
            (current, following) if current.is_code() && following.is_code() => {
                let (raw_a, doc_a, start, _) = self.extracted(current);
                let (raw_b, doc_b, _, end) = self.extracted(following);
                Some(Item::Extracted {
                    raw: format!("{}\n{}", raw_a, raw_b),
                    docstring: format!("{}\n\n{}", doc_a, doc_b),
                    start,
                    end,
                })
            }
            (Item::Comment { content, .. }, following) if self.attach_adjacent_comments => {
                let (raw, doc, start, _) = self.extracted(following);
                let docstring = if doc.is_empty() {
                    content
                } else {
                    format!("{}\n{}", doc, content)
                };
                trace!(line = start, "comment attached to code");
                self.sections.push(Section::code(raw, docstring));
                None
            }
            (current, following) => {
                self.emit(current);
                Some(following)
            }
        }
    }

    fn emit(&mut self, item: Item) {
        let section = match item {
            Item::Comment { content, .. } => Section::comment(content),
            code => {
                let (raw, docstring, _, _) = self.extracted(code);
                Section::code(raw, docstring)
            }
        };
        self.sections.push(section);
    }

    /// Raw text, docstring and line span of a code item, extracting it if needed
    fn extracted(&mut self, item: Item) -> (String, String, usize, usize) {
        match item {
            Item::Code { datum, start, end } => {
                let raw = self.lines.slice(start, end);
                let extraction =
                    extract(&datum, &raw, self.namespace.as_deref(), &mut *self.lookup);
                if extraction.namespace != self.namespace {
                    debug!(
                        namespace = ?extraction.namespace,
                        line = start,
                        "namespace context changed"
                    );
                }
                self.namespace = extraction.namespace;
                (
                    extraction.raw,
                    extraction.docstring.unwrap_or_default(),
                    start,
                    end,
                )
            }
            Item::Extracted {
                raw,
                docstring,
                start,
                end,
            } => (raw, docstring, start, end),
            Item::Comment {
                content,
                start,
                end,
                ..
            } => (content, String::new(), start, end),
        }
    }
}

/// Arrange `forms` into sections
pub fn arrange(
    forms: impl IntoIterator<Item = LocatedForm>,
    lines: &SourceLines,
    lookup: &mut dyn DocLookup,
    config: &ArrangeConfig,
) -> Vec<Section> {
    Arranger::new(lines, lookup, config).arrange(forms)
}
