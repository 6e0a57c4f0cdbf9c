//! Token definitions for the reader
//!
//! Tokens are produced by the logos derive macro. They are deliberately flat: every
//! reader macro prefix (`'`, `#_`, `^`, ...) is its own token and the [reader](super::reader)
//! decides how it combines with the datum that follows.
//!
//! Whitespace and comments are real tokens here. Whether a comment is discarded or turned
//! into a datum is a reader decision, see [`ReadTable`](super::read_table::ReadTable).
use logos::Logos;

/// All tokens of the clojure surface syntax
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    // Commas are whitespace
    #[regex(r"[ \t\r\n,]+")]
    Whitespace,

    // Line comment, up to but not including the newline
    #[regex(r";[^\n]*")]
    Comment,

    #[regex(r"#![^\n]*")]
    Shebang,

    // Delimiters
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("#{")]
    OpenSet,
    #[token("#(")]
    OpenFn,

    // Dispatch macros
    #[token("#_")]
    Discard,
    #[token("#'")]
    VarQuote,
    #[token("#?")]
    Conditional,
    #[token("#?@")]
    ConditionalSplicing,
    #[token("#=")]
    Eval,
    #[regex(r"#::?[^\s,()\[\]{}\x22;]*")]
    NamespacedMap,
    #[regex(r"#[a-zA-Z][^\s,()\[\]{}\x22;]*")]
    Tag,
    #[regex(r"##[a-zA-Z\-]+")]
    SymbolicValue,

    // Quoting
    #[token("'")]
    Quote,
    #[token("`")]
    SyntaxQuote,
    #[token("~")]
    Unquote,
    #[token("~@")]
    UnquoteSplicing,
    #[token("@")]
    Deref,
    #[token("^")]
    #[token("#^")]
    Meta,

    // Literals
    #[regex(r#""([^"\\]|\\(.|\n))*""#)]
    Str,
    #[regex(r#"#"([^"\\]|\\(.|\n))*""#)]
    Regex,
    #[regex(r"\\([a-zA-Z0-9]+|[^a-zA-Z0-9\s])")]
    Char,

    // Symbols, keywords, numbers, nil and booleans
    #[regex(r"[^\s,()\[\]{}\x22;'`~@^\\#][^\s,()\[\]{}\x22;`~@^\\]*")]
    Atom,
}

impl Token {
    /// Check if this token closes a collection
    pub fn is_closing(&self) -> bool {
        matches!(
            self,
            Token::CloseParen | Token::CloseBracket | Token::CloseBrace
        )
    }

    /// Check if this token never produces a datum by itself
    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace | Token::Comment | Token::Shebang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        Token::lexer(source)
            .filter_map(|result| result.ok())
            .collect()
    }

    #[test]
    fn test_simple_list() {
        assert_eq!(
            kinds("(def x 1)"),
            vec![
                Token::OpenParen,
                Token::Atom,
                Token::Whitespace,
                Token::Atom,
                Token::Whitespace,
                Token::Atom,
                Token::CloseParen
            ]
        );
    }

    #[test]
    fn test_comment_stops_before_newline() {
        let mut lexer = Token::lexer(";; hello\n1");
        assert_eq!(lexer.next(), Some(Ok(Token::Comment)));
        assert_eq!(lexer.slice(), ";; hello");
        assert_eq!(lexer.next(), Some(Ok(Token::Whitespace)));
        assert_eq!(lexer.next(), Some(Ok(Token::Atom)));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_commas_are_whitespace() {
        assert_eq!(
            kinds("[1, 2]"),
            vec![
                Token::OpenBracket,
                Token::Atom,
                Token::Whitespace,
                Token::Atom,
                Token::CloseBracket
            ]
        );
    }

    #[test]
    fn test_strings_span_lines_and_escapes() {
        let mut lexer = Token::lexer("\"a \\\"quoted\\\"\nline\"");
        assert_eq!(lexer.next(), Some(Ok(Token::Str)));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let mut lexer = Token::lexer("\"open");
        assert_eq!(lexer.next(), Some(Err(())));
    }

    #[test]
    fn test_dispatch_macros() {
        assert_eq!(
            kinds("#{} #(%) #_x #'v #?(:clj 1) #?@(:clj [1]) #inst #\"re\" ##Inf #:ns{}"),
            vec![
                Token::OpenSet,
                Token::CloseBrace,
                Token::Whitespace,
                Token::OpenFn,
                Token::Atom,
                Token::CloseParen,
                Token::Whitespace,
                Token::Discard,
                Token::Atom,
                Token::Whitespace,
                Token::VarQuote,
                Token::Atom,
                Token::Whitespace,
                Token::Conditional,
                Token::OpenParen,
                Token::Atom,
                Token::Whitespace,
                Token::Atom,
                Token::CloseParen,
                Token::Whitespace,
                Token::ConditionalSplicing,
                Token::OpenParen,
                Token::Atom,
                Token::Whitespace,
                Token::OpenBracket,
                Token::Atom,
                Token::CloseBracket,
                Token::CloseParen,
                Token::Whitespace,
                Token::Tag,
                Token::Whitespace,
                Token::Regex,
                Token::Whitespace,
                Token::SymbolicValue,
                Token::Whitespace,
                Token::NamespacedMap,
                Token::OpenBrace,
                Token::CloseBrace
            ]
        );
    }

    #[test]
    fn test_quoting_and_meta() {
        assert_eq!(
            kinds("'a `b ~c ~@d @e ^f #^g"),
            vec![
                Token::Quote,
                Token::Atom,
                Token::Whitespace,
                Token::SyntaxQuote,
                Token::Atom,
                Token::Whitespace,
                Token::Unquote,
                Token::Atom,
                Token::Whitespace,
                Token::UnquoteSplicing,
                Token::Atom,
                Token::Whitespace,
                Token::Deref,
                Token::Atom,
                Token::Whitespace,
                Token::Meta,
                Token::Atom,
                Token::Whitespace,
                Token::Meta,
                Token::Atom
            ]
        );
    }

    #[test]
    fn test_characters() {
        assert_eq!(
            kinds(r"\a \newline \( \u00e9"),
            vec![
                Token::Char,
                Token::Whitespace,
                Token::Char,
                Token::Whitespace,
                Token::Char,
                Token::Whitespace,
                Token::Char
            ]
        );
    }

    #[test]
    fn test_symbols_keep_inner_quotes_and_hashes() {
        let mut lexer = Token::lexer("foo' bar# ::kw");
        assert_eq!(lexer.next(), Some(Ok(Token::Atom)));
        assert_eq!(lexer.slice(), "foo'");
        lexer.next();
        assert_eq!(lexer.next(), Some(Ok(Token::Atom)));
        assert_eq!(lexer.slice(), "bar#");
        lexer.next();
        assert_eq!(lexer.next(), Some(Ok(Token::Atom)));
        assert_eq!(lexer.slice(), "::kw");
    }
}
