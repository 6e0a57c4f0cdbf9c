//! Parsed data produced by the reader
//!
//!     A [`Datum`] is what the reader hands back for one expression: its kind, the byte span
//!     it was read from, and any metadata attached with `^`. Reader macros are expanded the
//!     way the host reader does it, so `'x` reads as `(quote x)` and `@x` as
//!     `(clojure.core/deref x)`.
//!
//!     Only the shape matters downstream. Numbers keep their source text, strings are
//!     unescaped, and nothing is evaluated.

use std::ops::Range;

/// The kind of a datum
#[derive(Debug, Clone, PartialEq)]
pub enum DatumKind {
    /// A captured line comment, marker included. Only produced when the read table's
    /// comment handler asks for it.
    Comment(String),
    Nil,
    Bool(bool),
    Number(String),
    /// Unescaped string contents
    Str(String),
    Char(String),
    Keyword(String),
    Symbol(String),
    /// Regex source, as written between the quotes
    Regex(String),
    /// `##Inf`, `##-Inf`, `##NaN`
    SymbolicValue(String),
    List(Vec<Datum>),
    Vector(Vec<Datum>),
    /// Map entries, flattened as key, value, key, value
    Map(Vec<Datum>),
    Set(Vec<Datum>),
    /// `#(...)` anonymous function body
    AnonFn(Vec<Datum>),
    /// `#?(...)` and `#?@(...)`
    Conditional { splicing: bool, forms: Vec<Datum> },
    /// `#tag form`
    Tagged { tag: String, form: Box<Datum> },
}

/// One read expression with its source span and metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Datum {
    pub kind: DatumKind,
    /// Byte range in the source the datum was read from
    pub span: Range<usize>,
    /// Metadata forms attached with `^`, outermost first
    pub meta: Vec<Datum>,
}

impl Datum {
    pub fn new(kind: DatumKind, span: Range<usize>) -> Self {
        Self {
            kind,
            span,
            meta: Vec::new(),
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, DatumKind::Comment(_))
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match &self.kind {
            DatumKind::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            DatumKind::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Items of a list, `None` for anything else
    pub fn as_list(&self) -> Option<&[Datum]> {
        match &self.kind {
            DatumKind::List(items) => Some(items),
            _ => None,
        }
    }

    /// The leading symbol of a list, with any namespace qualifier removed.
    ///
    /// `(clojure.core/defn f [])` and `(defn f [])` both give `defn`.
    pub fn head_symbol(&self) -> Option<&str> {
        let head = self.as_list()?.first()?.as_symbol()?;
        Some(unqualified(head))
    }

    /// Look up a keyword in this datum's metadata and return it if it is a string.
    ///
    /// The outermost metadata wins, matching how `^{:doc "a"} ^{:doc "b"} x` merges.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.meta.iter().find_map(|meta| meta.map_str(key))
    }

    /// Look up a keyword in a map literal and return its value if it is a string.
    pub fn map_str(&self, key: &str) -> Option<&str> {
        let DatumKind::Map(entries) = &self.kind else {
            return None;
        };
        entries.chunks(2).find_map(|pair| match pair {
            [k, v] if matches!(&k.kind, DatumKind::Keyword(name) if name == key) => v.as_str(),
            _ => None,
        })
    }
}

/// Split a symbol into its namespace qualifier and name.
///
/// The lone `/` symbol (division) has no qualifier.
pub fn split_symbol(symbol: &str) -> (Option<&str>, &str) {
    match symbol.split_once('/') {
        Some((ns, name)) if !ns.is_empty() && !name.is_empty() => (Some(ns), name),
        _ => (None, symbol),
    }
}

fn unqualified(symbol: &str) -> &str {
    split_symbol(symbol).1
}
