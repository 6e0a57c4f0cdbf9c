//! Property-based tests for section arrangement and docstring stripping
//!
//! Sources are generated line by line from four kinds of pieces:
//! - prose comments (`;; pNx`), which must always surface in a comment section
//! - margin notes (`; mNx`), visible only when merged into a preceding prose run
//! - code forms (`(def vN N)`), each of which must land in exactly one section
//! - blank lines, which break adjacency

use proptest::prelude::*;
use sidenote::parse;
use sidenote::sidenote::docstrings::strip_docstring;

#[derive(Debug, Clone, Copy)]
enum Piece {
    Prose,
    Margin,
    Code,
    Blank,
}

fn piece_strategy() -> impl Strategy<Value = Piece> {
    prop_oneof![
        Just(Piece::Prose),
        Just(Piece::Margin),
        Just(Piece::Code),
        Just(Piece::Blank),
    ]
}

fn render_piece(index: usize, piece: Piece) -> String {
    match piece {
        Piece::Prose => format!(";; p{}x", index),
        Piece::Margin => format!("; m{}x", index),
        Piece::Code => format!("(def v{} {})", index, index),
        Piece::Blank => String::new(),
    }
}

fn build_source(pieces: &[Piece]) -> String {
    let mut source = pieces
        .iter()
        .enumerate()
        .map(|(i, piece)| render_piece(i, *piece))
        .collect::<Vec<_>>()
        .join("\n");
    source.push('\n');
    source
}

/// Docstring text that survives quoting unchanged
fn docstring_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9 .,]{0,30}"
}

proptest! {
    #[test]
    fn absent_literal_leaves_text_unchanged(
        raw in "[a-z()\\[\\] \n]{0,40}",
        docstring in docstring_strategy(),
    ) {
        prop_assert_eq!(strip_docstring(Some(&docstring), &raw), raw.clone());
        prop_assert_eq!(strip_docstring(None, &raw), raw);
    }

    #[test]
    fn docstring_line_is_removed_once(docstring in docstring_strategy()) {
        let raw = format!("(defn f\n  \"{}\"\n  [] 1)", docstring);
        let stripped = strip_docstring(Some(&docstring), &raw);
        prop_assert_eq!(&stripped, "(defn f\n  [] 1)");
        prop_assert_eq!(strip_docstring(Some(&docstring), &stripped), stripped.clone());
    }

    #[test]
    fn no_form_is_lost(pieces in prop::collection::vec(piece_strategy(), 0..24)) {
        let source = build_source(&pieces);
        let sections = parse(&source).unwrap();

        for (i, piece) in pieces.iter().enumerate() {
            match piece {
                Piece::Code => {
                    let code = render_piece(i, *piece);
                    let found: usize = sections
                        .iter()
                        .filter(|s| s.is_code())
                        .map(|s| s.raw.matches(code.as_str()).count())
                        .sum();
                    prop_assert_eq!(found, 1, "{} in {:?}", code, sections);
                }
                Piece::Prose => {
                    let word = format!("p{}x", i);
                    prop_assert!(
                        sections.iter().any(|s| s.is_comment() && s.raw.contains(&word)),
                        "{} missing from {:?}",
                        word,
                        sections
                    );
                }
                Piece::Margin | Piece::Blank => {}
            }
        }

        for section in &sections {
            prop_assert!(!section.raw.is_empty());
            if section.is_code() {
                // merged undocumented forms still join their empty docstrings
                prop_assert!(section.docstring().trim().is_empty());
            }
        }
    }

    #[test]
    fn margin_notes_show_only_inside_prose_runs(
        pieces in prop::collection::vec(piece_strategy(), 0..24),
    ) {
        let source = build_source(&pieces);
        let sections = parse(&source).unwrap();

        let mut run_has_prose = false;
        for (i, piece) in pieces.iter().enumerate() {
            match piece {
                Piece::Prose => run_has_prose = true,
                Piece::Code | Piece::Blank => run_has_prose = false,
                Piece::Margin => {
                    let word = format!("m{}x", i);
                    let visible = sections.iter().any(|s| s.raw.contains(&word));
                    prop_assert_eq!(visible, run_has_prose, "{} in {:?}", word, sections);
                }
            }
        }
    }
}
