//! Section snapshots of the sample sources under `tests/samples/`

use sidenote::sidenote::testing::{assert_sections, render_sections, sample_path};
use sidenote::{parse_file, ParseError, SourceLoader};

#[test]
fn greet_sample() {
    let sections = parse_file(sample_path("greet.clj")).unwrap();
    insta::assert_snapshot!(render_sections(&sections), @r#"
-- comment
# Greeting utilities
Small helpers for saying hello.
-- code "Functions for greeting people."
(ns demo.greet
  (:require [clojure.string :as str]))
-- code "Default salutation."
(def salutation "Hello")
-- comment
Build a greeting for `name`.
-- code "Returns a greeting for name.\n\nUpper-cased greeting."
(defn greet
  [name]
  (str salutation ", " name "!"))
(defn shout
  [name]
  ;; inner comments stay in the code
  (str/upper-case (greet name)))
-- code "\n\nSays goodbye in English."
(defmulti farewell :lang)
(defmethod farewell :en [_] "Bye")
"#);
}

#[test]
fn greet_sample_strips_every_docstring() {
    let sections = parse_file(sample_path("greet.clj")).unwrap();
    assert_sections(&sections)
        .none_contains("\"Functions for greeting people.\"")
        .none_contains("\"Default salutation.\"")
        .none_contains("\"Returns a greeting for name.\"")
        .none_contains("\"Upper-cased greeting.\"")
        .none_contains("keep this one short");
}

#[test]
fn margin_notes_sample() {
    let sections = parse_file(sample_path("margin_notes.clj")).unwrap();
    insta::assert_snapshot!(render_sections(&sections), @r#"
-- comment
Real prose.
Continues here.
-- code
(def a 1) ; inline margin
-- code
(def b 2)
"#);
}

#[test]
fn sections_serialize_to_json() {
    let sections = SourceLoader::from_path(sample_path("margin_notes.clj"))
        .unwrap()
        .parse()
        .unwrap();
    let json = serde_json::to_value(&sections).unwrap();
    assert_eq!(json[0]["kind"], "comment");
    assert_eq!(json[0]["raw"], "Real prose.\nContinues here.");
    assert!(json[0].get("docstring").is_none());
    assert_eq!(json[1]["kind"], "code");
    assert_eq!(json[1]["docstring"], "");
}

#[test]
fn missing_file_is_an_io_error() {
    let result = parse_file(sample_path("does_not_exist.clj"));
    assert!(matches!(result, Err(ParseError::Io(_))));
}
