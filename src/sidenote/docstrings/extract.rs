//! Docstring extraction per form kind

use super::lookup::DocLookup;
use super::strip::strip_docstring;
use crate::sidenote::reading::{split_symbol, Datum};
use tracing::debug;

/// How a code form carries its docstring, keyed by its leading symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    /// `ns`: positional docstring, declares the namespace
    Namespace,
    /// `def`, `defn` and friends: resolved through the lookup
    Definition,
    /// `defprotocol`, `definterface`: resolved through the lookup
    Protocol,
    /// `defmulti`: resolved through the lookup
    MultiMethod,
    /// `defmethod`: positional docstring after the dispatch value
    MethodImpl,
    Other,
}

impl DefinitionKind {
    pub fn classify(datum: &Datum) -> Self {
        match datum.head_symbol() {
            Some("ns") => DefinitionKind::Namespace,
            Some(
                "def" | "defn" | "defn-" | "defmacro" | "defonce" | "definline" | "defrecord"
                | "deftype" | "defstruct",
            ) => DefinitionKind::Definition,
            Some("defprotocol" | "definterface") => DefinitionKind::Protocol,
            Some("defmulti") => DefinitionKind::MultiMethod,
            Some("defmethod") => DefinitionKind::MethodImpl,
            _ => DefinitionKind::Other,
        }
    }

    fn resolves_through_lookup(self) -> bool {
        matches!(
            self,
            DefinitionKind::Definition | DefinitionKind::Protocol | DefinitionKind::MultiMethod
        )
    }
}

/// What extraction found for one code form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub docstring: Option<String>,
    /// The form's raw text with the docstring literal removed
    pub raw: String,
    /// The namespace context after this form
    pub namespace: Option<String>,
}

/// Find the docstring of `datum`, strip it from `raw` and update the namespace context.
///
/// Lookup failures are logged and treated as "no docstring".
pub fn extract(
    datum: &Datum,
    raw: &str,
    namespace: Option<&str>,
    lookup: &mut dyn DocLookup,
) -> Extraction {
    let kind = DefinitionKind::classify(datum);
    let items = datum.as_list().unwrap_or_default();

    let (docstring, namespace) = match kind {
        DefinitionKind::Namespace => namespace_docstring(items, namespace),
        DefinitionKind::MethodImpl => (
            items.get(4).and_then(Datum::as_str).map(str::to_string),
            namespace.map(str::to_string),
        ),
        kind if kind.resolves_through_lookup() => resolve_docstring(items, namespace, lookup),
        _ => (None, namespace.map(str::to_string)),
    };

    Extraction {
        raw: strip_docstring(docstring.as_deref(), raw),
        docstring,
        namespace,
    }
}

fn namespace_docstring(
    items: &[Datum],
    namespace: Option<&str>,
) -> (Option<String>, Option<String>) {
    let Some(name) = items.get(1).filter(|item| item.as_symbol().is_some()) else {
        return (None, namespace.map(str::to_string));
    };
    let declared = name.as_symbol().map(str::to_string);
    let docstring = items
        .get(2)
        .and_then(Datum::as_str)
        .or_else(|| name.meta_str(":doc"))
        .map(str::to_string);

    if declared.as_deref() != namespace {
        debug!(namespace = ?declared, "namespace declared");
    }
    (docstring, declared)
}

fn resolve_docstring(
    items: &[Datum],
    namespace: Option<&str>,
    lookup: &mut dyn DocLookup,
) -> (Option<String>, Option<String>) {
    let unchanged = namespace.map(str::to_string);
    let Some(symbol) = items.get(1).and_then(Datum::as_symbol) else {
        return (None, unchanged);
    };

    let (qualifier, name) = split_symbol(symbol);
    let target = qualifier
        .or(namespace)
        .unwrap_or_else(|| lookup.default_namespace())
        .to_string();

    if !lookup.is_loaded(&target) {
        if let Err(err) = lookup.require(&target) {
            debug!(namespace = %target, "require failed: {}", err);
        }
    }

    match lookup.lookup_doc(&target, name) {
        Ok(docstring) => {
            let namespace = unchanged.or(Some(target));
            (docstring, namespace)
        }
        Err(err) => {
            debug!(namespace = %target, name, "lookup failed: {}", err);
            (None, unchanged)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sidenote::docstrings::lookup::{LookupError, SourceIndex};
    use crate::sidenote::reading::{ReadTable, Reader};
    use rstest::rstest;

    fn read(source: &str) -> Datum {
        Reader::with_table(source, ReadTable::default())
            .read_one()
            .unwrap()
            .unwrap()
    }

    fn extract_in(index: &mut SourceIndex, source: &str, namespace: Option<&str>) -> Extraction {
        extract(&read(source), source, namespace, index)
    }

    #[rstest(
        source,
        expected,
        case("(ns a)", DefinitionKind::Namespace),
        case("(clojure.core/ns a)", DefinitionKind::Namespace),
        case("(defn f [] 1)", DefinitionKind::Definition),
        case("(defonce x 1)", DefinitionKind::Definition),
        case("(defrecord R [])", DefinitionKind::Definition),
        case("(definterface I)", DefinitionKind::Protocol),
        case("(defmulti area :shape)", DefinitionKind::MultiMethod),
        case("(defmethod area :sq [s] 1)", DefinitionKind::MethodImpl),
        case("(println 1)", DefinitionKind::Other),
        case("[defn f]", DefinitionKind::Other),
        case(":defn", DefinitionKind::Other)
    )]
    fn test_classify(source: &str, expected: DefinitionKind) {
        assert_eq!(DefinitionKind::classify(&read(source)), expected);
    }

    #[test]
    fn test_namespace_docstring() {
        let mut index = SourceIndex::new();
        let source = "(ns foo\n  \"My docs\")";
        let extraction = extract_in(&mut index, source, None);
        assert_eq!(extraction.docstring.as_deref(), Some("My docs"));
        assert_eq!(extraction.raw, "(ns foo)");
        assert_eq!(extraction.namespace.as_deref(), Some("foo"));
    }

    #[test]
    fn test_namespace_without_docstring_still_switches() {
        let mut index = SourceIndex::new();
        let extraction = extract_in(&mut index, "(ns bar (:require [x]))", Some("foo"));
        assert_eq!(extraction.docstring, None);
        assert_eq!(extraction.raw, "(ns bar (:require [x]))");
        assert_eq!(extraction.namespace.as_deref(), Some("bar"));
    }

    #[test]
    fn test_definition_resolved_in_context() {
        let mut index = SourceIndex::new();
        index
            .index_source("(ns app)\n(defn f\n  \"Doubles x.\"\n  [x]\n  (* 2 x))")
            .unwrap();
        let source = "(defn f\n  \"Doubles x.\"\n  [x]\n  (* 2 x))";
        let extraction = extract_in(&mut index, source, Some("app"));
        assert_eq!(extraction.docstring.as_deref(), Some("Doubles x."));
        assert_eq!(extraction.raw, "(defn f\n  [x]\n  (* 2 x))");
        assert_eq!(extraction.namespace.as_deref(), Some("app"));
    }

    #[test]
    fn test_definition_without_context_adopts_resolved_namespace() {
        let mut index = SourceIndex::new();
        index.index_source("(def ^{:doc \"Answer.\"} answer 42)").unwrap();
        let extraction = extract_in(&mut index, "(def ^{:doc \"Answer.\"} answer 42)", None);
        assert_eq!(extraction.docstring.as_deref(), Some("Answer."));
        assert_eq!(extraction.raw, "(def answer 42)");
        assert_eq!(extraction.namespace.as_deref(), Some("user"));
    }

    #[test]
    fn test_qualified_name_targets_its_namespace() {
        let mut index = SourceIndex::new();
        index.index_source("(ns other)\n(defn g \"G.\" [] 1)").unwrap();
        let extraction = extract_in(&mut index, "(defn other/g \"G.\" [] 1)", Some("app"));
        assert_eq!(extraction.docstring.as_deref(), Some("G."));
        assert_eq!(extraction.namespace.as_deref(), Some("app"));
    }

    #[test]
    fn test_unresolved_definition_has_no_docstring() {
        let mut index = SourceIndex::new();
        let source = "(defn f \"Not indexed.\" [] 1)";
        let extraction = extract_in(&mut index, source, None);
        assert_eq!(extraction.docstring, None);
        assert_eq!(extraction.raw, source);
        assert_eq!(extraction.namespace, None);
    }

    #[test]
    fn test_defmethod_docstring_position() {
        let mut index = SourceIndex::new();
        let source = "(defmethod area :square [s] \"Area of a square.\" (* s s))";
        let extraction = extract_in(&mut index, source, Some("shapes"));
        assert_eq!(extraction.docstring.as_deref(), Some("Area of a square."));
        assert_eq!(extraction.raw, "(defmethod area :square [s] (* s s))");
        assert_eq!(extraction.namespace.as_deref(), Some("shapes"));
    }

    #[test]
    fn test_other_forms_are_untouched() {
        let mut index = SourceIndex::new();
        let source = "(println \"hello\")";
        let extraction = extract_in(&mut index, source, Some("app"));
        assert_eq!(extraction.docstring, None);
        assert_eq!(extraction.raw, source);
        assert_eq!(extraction.namespace.as_deref(), Some("app"));
    }

    struct FailingLookup {
        required: Vec<String>,
    }

    impl DocLookup for FailingLookup {
        fn default_namespace(&self) -> &str {
            "user"
        }

        fn is_loaded(&self, _namespace: &str) -> bool {
            false
        }

        fn require(&mut self, namespace: &str) -> Result<(), LookupError> {
            self.required.push(namespace.to_string());
            Err(LookupError::NamespaceNotFound(namespace.to_string()))
        }

        fn lookup_doc(&self, namespace: &str, _name: &str) -> Result<Option<String>, LookupError> {
            Err(LookupError::NamespaceNotFound(namespace.to_string()))
        }
    }

    #[test]
    fn test_lookup_failures_become_none() {
        let mut lookup = FailingLookup { required: Vec::new() };
        let source = "(defn f \"Doc.\" [] 1)";
        let extraction = extract(&read(source), source, None, &mut lookup);
        assert_eq!(extraction.docstring, None);
        assert_eq!(extraction.raw, source);
        assert_eq!(extraction.namespace, None);
        assert_eq!(lookup.required, vec!["user".to_string()]);
    }
}
