//! Docstring lookup
//!
//!     Definitions do not always carry their docstring in a position we can read off the
//!     form: `def` takes it as metadata, `defn` accepts an attribute map, and a file may
//!     document a var that another file defines. The extractor therefore asks a
//!     [`DocLookup`] for the docstring of `namespace/name` instead of digging through the
//!     form itself.
//!
//!     [`SourceIndex`] is the lookup used by the loader. It is built from source text: the
//!     file being parsed is indexed up front, and other namespaces are loaded on
//!     [`require`](DocLookup::require) from the configured source roots, `a.b-c` mapping to
//!     `a/b_c.clj` (or `.cljc`, `.cljs`).
//!
//!     Lookup errors never reach the caller of `parse`: the extractor turns them into "no
//!     docstring".

use crate::sidenote::config::LookupConfig;
use crate::sidenote::reading::{split_symbol, Datum, DatumKind, ReadTable, Reader, SyntaxError};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Namespace used when a form is read before any `ns` declaration
pub const DEFAULT_NAMESPACE: &str = "user";

/// Source extensions tried when requiring a namespace, in order
pub const DEFAULT_EXTENSIONS: &[&str] = &["clj", "cljc", "cljs"];

/// Errors from resolving a docstring
#[derive(Debug, Clone, PartialEq)]
pub enum LookupError {
    /// No source for the namespace could be found
    NamespaceNotFound(String),
    /// The namespace is loaded but does not define the name
    UnresolvedSymbol { namespace: String, name: String },
    /// A namespace source exists but could not be read
    Io { path: PathBuf, message: String },
    /// A namespace source could not be read as data
    Syntax { path: PathBuf, error: SyntaxError },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NamespaceNotFound(ns) => write!(f, "Namespace not found: {}", ns),
            LookupError::UnresolvedSymbol { namespace, name } => {
                write!(f, "Unable to resolve {}/{}", namespace, name)
            }
            LookupError::Io { path, message } => {
                write!(f, "Failed to read {}: {}", path.display(), message)
            }
            LookupError::Syntax { path, error } => write!(f, "{} in {}", error, path.display()),
        }
    }
}

impl std::error::Error for LookupError {}

/// Resolves docstrings of named definitions
pub trait DocLookup {
    /// Namespace assumed when neither the symbol nor the context names one
    fn default_namespace(&self) -> &str;

    /// Check if a namespace's definitions are available
    fn is_loaded(&self, namespace: &str) -> bool;

    /// Make a namespace's definitions available
    fn require(&mut self, namespace: &str) -> Result<(), LookupError>;

    /// The docstring of `namespace/name`, `None` when the definition has none
    fn lookup_doc(&self, namespace: &str, name: &str) -> Result<Option<String>, LookupError>;
}

/// Heads whose second element names a var
const DEFINING_HEADS: &[&str] = &[
    "def",
    "defn",
    "defn-",
    "defmacro",
    "defonce",
    "definline",
    "defmulti",
    "defprotocol",
    "definterface",
    "defrecord",
    "deftype",
    "defstruct",
];

/// Heads that take a docstring right after the name
const POSITIONAL_DOC_HEADS: &[&str] = &[
    "defn",
    "defn-",
    "defmacro",
    "definline",
    "defmulti",
    "defprotocol",
    "definterface",
];

/// A docstring index over source text
#[derive(Debug, Clone)]
pub struct SourceIndex {
    default_namespace: String,
    source_paths: Vec<PathBuf>,
    extensions: Vec<String>,
    namespaces: HashMap<String, HashMap<String, Option<String>>>,
    missing: HashSet<String>,
}

impl SourceIndex {
    pub fn new() -> Self {
        SourceIndex {
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            source_paths: Vec::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            namespaces: HashMap::new(),
            missing: HashSet::new(),
        }
    }

    pub fn from_config(config: &LookupConfig) -> Self {
        let mut index = Self::new()
            .with_default_namespace(&config.default_namespace)
            .with_source_paths(config.source_paths.iter().map(PathBuf::from));
        if !config.extensions.is_empty() {
            index.extensions = config.extensions.clone();
        }
        index
    }

    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = namespace.into();
        self
    }

    pub fn with_source_path(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_paths.push(root.into());
        self
    }

    pub fn with_source_paths(mut self, roots: impl IntoIterator<Item = PathBuf>) -> Self {
        self.source_paths.extend(roots);
        self
    }

    /// Record the definitions in `data`, starting in the default namespace
    pub fn index_forms<'d>(&mut self, data: impl IntoIterator<Item = &'d Datum>) {
        let initial = self.default_namespace.clone();
        self.index_data(&initial, data);
    }

    /// Read `source` and record its definitions, starting in the default namespace
    pub fn index_source(&mut self, source: &str) -> Result<(), SyntaxError> {
        let initial = self.default_namespace.clone();
        let data = read_all(source)?;
        self.index_data(&initial, &data);
        Ok(())
    }

    /// Number of namespaces with indexed definitions
    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }

    /// Files that could hold `namespace`, in the order they are tried
    pub fn candidate_paths(&self, namespace: &str) -> Vec<PathBuf> {
        let stem = namespace_path(namespace);
        let stem = &stem;
        self.source_paths
            .iter()
            .flat_map(|root| {
                self.extensions
                    .iter()
                    .map(move |ext| root.join(&stem).with_extension(ext))
            })
            .collect()
    }

    fn index_data<'d>(&mut self, initial: &str, data: impl IntoIterator<Item = &'d Datum>) {
        let mut current = initial.to_string();
        for datum in data {
            let Some(items) = datum.as_list() else {
                continue;
            };
            match datum.head_symbol() {
                Some("ns") => {
                    if let Some(ns) = items.get(1).and_then(Datum::as_symbol) {
                        current = ns.to_string();
                        self.namespaces.entry(current.clone()).or_default();
                    }
                }
                Some("in-ns") => {
                    if let Some(ns) = items.get(1).and_then(quoted_symbol) {
                        current = ns.to_string();
                        self.namespaces.entry(current.clone()).or_default();
                    }
                }
                Some(head) if DEFINING_HEADS.contains(&head) => {
                    self.index_definition(&current, head, items);
                }
                _ => {}
            }
        }
    }

    fn index_definition(&mut self, namespace: &str, head: &str, items: &[Datum]) {
        let Some(name_datum) = items.get(1) else {
            return;
        };
        let Some(symbol) = name_datum.as_symbol() else {
            return;
        };
        let name = split_symbol(symbol).1;
        let doc = definition_docstring(head, name_datum, items);

        let vars = self.namespaces.entry(namespace.to_string()).or_default();
        vars.insert(name.to_string(), doc);

        if head == "defprotocol" {
            for (method, doc) in protocol_methods(items) {
                vars.insert(method, doc);
            }
        }
    }
}

impl Default for SourceIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl DocLookup for SourceIndex {
    fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    fn is_loaded(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    fn require(&mut self, namespace: &str) -> Result<(), LookupError> {
        if self.is_loaded(namespace) {
            return Ok(());
        }
        if self.missing.contains(namespace) {
            return Err(LookupError::NamespaceNotFound(namespace.to_string()));
        }

        let Some(path) = self.candidate_paths(namespace).into_iter().find(|p| p.is_file()) else {
            debug!(namespace, "no source found for namespace");
            self.missing.insert(namespace.to_string());
            return Err(LookupError::NamespaceNotFound(namespace.to_string()));
        };

        debug!(namespace, path = %path.display(), "requiring namespace");
        let data = load_namespace(&path)?;
        self.index_data(namespace, &data);
        self.namespaces.entry(namespace.to_string()).or_default();
        Ok(())
    }

    fn lookup_doc(&self, namespace: &str, name: &str) -> Result<Option<String>, LookupError> {
        let vars = self
            .namespaces
            .get(namespace)
            .ok_or_else(|| LookupError::NamespaceNotFound(namespace.to_string()))?;
        vars.get(name)
            .cloned()
            .ok_or_else(|| LookupError::UnresolvedSymbol {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }
}

/// `a.b-c` becomes `a/b_c`
pub fn namespace_path(namespace: &str) -> PathBuf {
    namespace
        .split('.')
        .map(|segment| segment.replace('-', "_"))
        .collect()
}

fn load_namespace(path: &Path) -> Result<Vec<Datum>, LookupError> {
    let source = fs::read_to_string(path).map_err(|e| LookupError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    read_all(&source).map_err(|error| LookupError::Syntax {
        path: path.to_path_buf(),
        error,
    })
}

/// Read every datum of `source`, comments discarded whatever the global table says
fn read_all(source: &str) -> Result<Vec<Datum>, SyntaxError> {
    let mut reader = Reader::with_table(source, ReadTable::default());
    let mut data = Vec::new();
    while let Some(datum) = reader.read_one()? {
        data.push(datum);
    }
    Ok(data)
}

fn definition_docstring(head: &str, name: &Datum, items: &[Datum]) -> Option<String> {
    let positional = match head {
        "def" if items.len() == 4 => items[2].as_str(),
        _ if POSITIONAL_DOC_HEADS.contains(&head) => items.get(2).and_then(Datum::as_str),
        _ => None,
    };
    let attr_map = match head {
        "defn" | "defn-" | "defmacro" | "defmulti" => {
            items.get(2).and_then(|attrs| attrs.map_str(":doc"))
        }
        _ => None,
    };

    positional
        .or(attr_map)
        .or_else(|| name.meta_str(":doc"))
        .map(str::to_string)
}

/// Method signatures of a `defprotocol`: `(name [args]+ "doc"?)`
fn protocol_methods(items: &[Datum]) -> Vec<(String, Option<String>)> {
    items
        .iter()
        .skip(2)
        .filter_map(|item| {
            let signature = item.as_list()?;
            let name = signature.first()?.as_symbol()?;
            let doc = signature.last().and_then(Datum::as_str).map(str::to_string);
            Some((name.to_string(), doc))
        })
        .collect()
}

/// `'foo` reads as `(quote foo)`
fn quoted_symbol(datum: &Datum) -> Option<&str> {
    match &datum.kind {
        DatumKind::List(items) if datum.head_symbol() == Some("quote") => {
            items.get(1)?.as_symbol()
        }
        DatumKind::Symbol(name) => Some(name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn indexed(source: &str) -> SourceIndex {
        let mut index = SourceIndex::new();
        index.index_source(source).unwrap();
        index
    }

    #[test]
    fn test_positional_docstrings() {
        let index = indexed(
            "(ns my.app)\n(defn f \"Doubles.\" [x] (* 2 x))\n(defmacro m \"Macro.\" [] nil)\n",
        );
        assert!(index.is_loaded("my.app"));
        assert_eq!(
            index.lookup_doc("my.app", "f").unwrap(),
            Some("Doubles.".to_string())
        );
        assert_eq!(
            index.lookup_doc("my.app", "m").unwrap(),
            Some("Macro.".to_string())
        );
    }

    #[test]
    fn test_def_docstring_needs_a_value() {
        let index = indexed("(def a \"doc\" 1)\n(def b \"just a string\")\n");
        assert_eq!(index.lookup_doc("user", "a").unwrap(), Some("doc".to_string()));
        assert_eq!(index.lookup_doc("user", "b").unwrap(), None);
    }

    #[test]
    fn test_metadata_and_attr_map_docstrings() {
        let index = indexed(concat!(
            "(def ^{:doc \"Meta.\"} a 1)\n",
            "(defn b {:doc \"Attrs.\"} [] 2)\n",
            "(defrecord ^{:doc \"Rec.\"} R [])\n",
        ));
        assert_eq!(index.lookup_doc("user", "a").unwrap(), Some("Meta.".to_string()));
        assert_eq!(index.lookup_doc("user", "b").unwrap(), Some("Attrs.".to_string()));
        assert_eq!(index.lookup_doc("user", "R").unwrap(), Some("Rec.".to_string()));
    }

    #[test]
    fn test_protocol_methods_are_indexed() {
        let index = indexed("(defprotocol Shape \"Shapes.\" (area [s] \"Area of s.\") (name [s]))");
        assert_eq!(index.lookup_doc("user", "Shape").unwrap(), Some("Shapes.".to_string()));
        assert_eq!(index.lookup_doc("user", "area").unwrap(), Some("Area of s.".to_string()));
        assert_eq!(index.lookup_doc("user", "name").unwrap(), None);
    }

    #[test]
    fn test_in_ns_switches_namespace() {
        let index = indexed("(in-ns 'other)\n(defn g \"G.\" [] 1)\n");
        assert_eq!(index.lookup_doc("other", "g").unwrap(), Some("G.".to_string()));
        assert!(!index.is_loaded("user"));
    }

    #[test]
    fn test_lookup_errors() {
        let index = indexed("(ns a)\n(defn f [] 1)\n");
        assert_eq!(
            index.lookup_doc("b", "f"),
            Err(LookupError::NamespaceNotFound("b".to_string()))
        );
        assert_eq!(
            index.lookup_doc("a", "g"),
            Err(LookupError::UnresolvedSymbol {
                namespace: "a".to_string(),
                name: "g".to_string()
            })
        );
        assert_eq!(index.lookup_doc("a", "f"), Ok(None));
    }

    #[test]
    fn test_namespace_path() {
        assert_eq!(namespace_path("my.cool-lib.core"), PathBuf::from("my/cool_lib/core"));
    }

    #[test]
    fn test_require_from_source_path() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("my").join("util_fns");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("text.cljc"),
            "(ns my.util-fns.text)\n(defn shout \"Upper-cases s.\" [s] s)\n",
        )
        .unwrap();

        let mut index = SourceIndex::new().with_source_path(root.path());
        assert!(!index.is_loaded("my.util-fns.text"));
        index.require("my.util-fns.text").unwrap();
        assert!(index.is_loaded("my.util-fns.text"));
        assert_eq!(
            index.lookup_doc("my.util-fns.text", "shout").unwrap(),
            Some("Upper-cases s.".to_string())
        );
    }

    #[test]
    fn test_require_missing_namespace() {
        let root = tempfile::tempdir().unwrap();
        let mut index = SourceIndex::new().with_source_path(root.path());
        assert_eq!(
            index.require("nowhere"),
            Err(LookupError::NamespaceNotFound("nowhere".to_string()))
        );
        assert_eq!(
            index.require("nowhere"),
            Err(LookupError::NamespaceNotFound("nowhere".to_string()))
        );
    }

    #[test]
    fn test_require_reports_syntax_errors() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("broken.clj"), "(ns broken\n").unwrap();
        let mut index = SourceIndex::new().with_source_path(root.path());
        assert!(matches!(
            index.require("broken"),
            Err(LookupError::Syntax { .. })
        ));
    }
}
