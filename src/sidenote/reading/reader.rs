//! Expression reader
//!
//!     Reads clojure source one top-level datum at a time, tracking the line the cursor is
//!     on. Tokens come from the logos lexer in [`token`](super::token); the reader only
//!     assembles them into [`Datum`] trees and expands reader macros.
//!
//!     The cursor sits at the end of the last consumed token. Consumed whitespace moves it,
//!     peeking does not, so `current_line` right after `read_one` is the line the datum
//!     ended on.
//!
//! Comments
//!
//!     Comments met while reading *inside* a collection are always skipped. A comment met
//!     at the top level goes through the [`ReadTable`] comment handler, which may turn it
//!     into a datum of its own.

use super::datum::{Datum, DatumKind};
use super::error::SyntaxError;
use super::read_table::ReadTable;
use super::token::Token;
use logos::Logos;
use std::ops::Range;

type Lexed = (Result<Token, ()>, Range<usize>);

/// A reader over one source text
pub struct Reader<'a> {
    source: &'a str,
    lexer: logos::Lexer<'a, Token>,
    /// `Some(None)` once the lexer is exhausted
    peeked: Option<Option<Lexed>>,
    offset: usize,
    line_starts: Vec<usize>,
    table: ReadTable,
}

impl<'a> Reader<'a> {
    /// Create a reader using the process-wide read table as it is now
    pub fn new(source: &'a str) -> Self {
        Self::with_table(source, ReadTable::current())
    }

    /// Create a reader with an explicit read table
    pub fn with_table(source: &'a str, table: ReadTable) -> Self {
        let mut line_starts = vec![0];
        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Reader {
            source,
            lexer: Token::lexer(source),
            peeked: None,
            offset: 0,
            line_starts,
            table,
        }
    }

    /// The 1-based line the cursor is on
    pub fn current_line(&self) -> usize {
        self.line_of(self.offset)
    }

    /// The 1-based line containing a byte offset
    pub fn line_of(&self, byte: usize) -> usize {
        match self.line_starts.binary_search(&byte) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        }
    }

    /// Check if there is nothing left to lex
    pub fn at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Consume whitespace, commas and shebang lines, leaving the cursor on the next
    /// meaningful token.
    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(Ok(Token::Whitespace | Token::Shebang))) {
            self.bump();
        }
    }

    /// Read the next top-level datum.
    ///
    /// Returns `Ok(None)` once only whitespace and discarded comments remain.
    pub fn read_one(&mut self) -> Result<Option<Datum>, SyntaxError> {
        loop {
            let Some((result, span)) = self.bump() else {
                return Ok(None);
            };
            let token = self.token_or_error(result, &span)?;
            match token {
                Token::Whitespace | Token::Shebang => continue,
                Token::Comment => {
                    let text = self.comment_text(&span);
                    if let Some(datum) = self.table.read_comment(text, span) {
                        return Ok(Some(datum));
                    }
                }
                token if token.is_closing() => return Err(self.unmatched(&span)),
                token => {
                    if let Some(datum) = self.read_from(token, span)? {
                        return Ok(Some(datum));
                    }
                }
            }
        }
    }

    fn peek(&mut self) -> Option<Result<Token, ()>> {
        if self.peeked.is_none() {
            let next = self.lexer.next().map(|result| (result, self.lexer.span()));
            self.peeked = Some(next);
        }
        self.peeked
            .as_ref()
            .and_then(|lexed| lexed.as_ref())
            .map(|(result, _)| *result)
    }

    fn bump(&mut self) -> Option<Lexed> {
        self.peek();
        let next = self.peeked.take().flatten();
        if let Some((_, span)) = &next {
            self.offset = span.end;
        }
        next
    }

    fn slice(&self, span: &Range<usize>) -> &'a str {
        &self.source[span.clone()]
    }

    fn comment_text(&self, span: &Range<usize>) -> &'a str {
        let text = self.slice(span);
        text.strip_suffix('\r').unwrap_or(text)
    }

    fn token_or_error(
        &self,
        result: Result<Token, ()>,
        span: &Range<usize>,
    ) -> Result<Token, SyntaxError> {
        result.map_err(|_| {
            let text = self.slice(span);
            let line = self.line_of(span.start);
            if text.starts_with('"') || text.starts_with("#\"") {
                SyntaxError::new(line, "EOF while reading string")
            } else {
                SyntaxError::new(line, format!("Unreadable input: {:?}", text))
            }
        })
    }

    fn unmatched(&self, span: &Range<usize>) -> SyntaxError {
        SyntaxError::new(
            self.line_of(span.start),
            format!("Unmatched delimiter: {}", self.slice(span)),
        )
    }

    /// Read what `token` starts. `None` when it produced nothing (`#_`).
    fn read_from(
        &mut self,
        token: Token,
        span: Range<usize>,
    ) -> Result<Option<Datum>, SyntaxError> {
        let start = span.start;
        let line = self.line_of(start);
        let text = self.slice(&span);

        let kind = match token {
            Token::OpenParen => {
                let (items, end) = self.read_seq(Token::CloseParen, line)?;
                return Ok(Some(Datum::new(DatumKind::List(items), start..end)));
            }
            Token::OpenBracket => {
                let (items, end) = self.read_seq(Token::CloseBracket, line)?;
                return Ok(Some(Datum::new(DatumKind::Vector(items), start..end)));
            }
            Token::OpenBrace => {
                let (items, end) = self.read_seq(Token::CloseBrace, line)?;
                if items.len() % 2 != 0 {
                    return Err(SyntaxError::new(
                        line,
                        "Map literal must contain an even number of forms",
                    ));
                }
                return Ok(Some(Datum::new(DatumKind::Map(items), start..end)));
            }
            Token::OpenSet => {
                let (items, end) = self.read_seq(Token::CloseBrace, line)?;
                return Ok(Some(Datum::new(DatumKind::Set(items), start..end)));
            }
            Token::OpenFn => {
                let (items, end) = self.read_seq(Token::CloseParen, line)?;
                return Ok(Some(Datum::new(DatumKind::AnonFn(items), start..end)));
            }
            Token::Discard => {
                self.read_datum(line)?;
                return Ok(None);
            }
            Token::Quote => return self.wrap("quote", start, line).map(Some),
            Token::SyntaxQuote => return self.wrap("syntax-quote", start, line).map(Some),
            Token::Unquote => return self.wrap("clojure.core/unquote", start, line).map(Some),
            Token::UnquoteSplicing => {
                return self
                    .wrap("clojure.core/unquote-splicing", start, line)
                    .map(Some)
            }
            Token::Deref => return self.wrap("clojure.core/deref", start, line).map(Some),
            Token::VarQuote => return self.wrap("var", start, line).map(Some),
            Token::Meta => {
                let meta = normalize_meta(self.read_datum(line)?);
                let mut target = self.read_datum(line)?;
                target.meta.insert(0, meta);
                return Ok(Some(target));
            }
            Token::Conditional | Token::ConditionalSplicing => {
                let body = self.read_datum(line)?;
                let end = body.span.end;
                let DatumKind::List(forms) = body.kind else {
                    return Err(SyntaxError::new(line, "read-cond body must be a list"));
                };
                let splicing = token == Token::ConditionalSplicing;
                return Ok(Some(Datum::new(
                    DatumKind::Conditional { splicing, forms },
                    start..end,
                )));
            }
            Token::NamespacedMap => {
                let mut map = self.read_datum(line)?;
                if !matches!(map.kind, DatumKind::Map(_)) {
                    return Err(SyntaxError::new(
                        line,
                        "Namespaced map must specify a map",
                    ));
                }
                map.span.start = start;
                return Ok(Some(map));
            }
            Token::Eval | Token::Tag => {
                let tag = text.trim_start_matches('#').to_string();
                let form = self.read_datum(line)?;
                let end = form.span.end;
                return Ok(Some(Datum::new(
                    DatumKind::Tagged {
                        tag,
                        form: Box::new(form),
                    },
                    start..end,
                )));
            }
            Token::Str => DatumKind::Str(unescape(&text[1..text.len() - 1], line)?),
            Token::Regex => DatumKind::Regex(text[2..text.len() - 1].to_string()),
            Token::Char => DatumKind::Char(text[1..].to_string()),
            Token::SymbolicValue => DatumKind::SymbolicValue(text[2..].to_string()),
            Token::Atom => classify_atom(text),
            Token::Whitespace | Token::Comment | Token::Shebang => {
                return Ok(None);
            }
            Token::CloseParen | Token::CloseBracket | Token::CloseBrace => {
                return Err(self.unmatched(&span));
            }
        };

        Ok(Some(Datum::new(kind, span)))
    }

    /// Read items up to `close`. Returns the items and the end offset of the delimiter.
    fn read_seq(
        &mut self,
        close: Token,
        open_line: usize,
    ) -> Result<(Vec<Datum>, usize), SyntaxError> {
        let mut items = Vec::new();
        loop {
            let Some((result, span)) = self.bump() else {
                return Err(SyntaxError::new(
                    open_line,
                    "EOF while reading, collection opened here",
                ));
            };
            let token = self.token_or_error(result, &span)?;
            match token {
                token if token == close => return Ok((items, span.end)),
                token if token.is_closing() => return Err(self.unmatched(&span)),
                token if token.is_trivia() => continue,
                token => {
                    if let Some(datum) = self.read_from(token, span)? {
                        items.push(datum);
                    }
                }
            }
        }
    }

    /// Read the datum a prefix applies to, skipping trivia and discarded forms.
    fn read_datum(&mut self, owner_line: usize) -> Result<Datum, SyntaxError> {
        loop {
            let Some((result, span)) = self.bump() else {
                return Err(SyntaxError::new(owner_line, "EOF while reading"));
            };
            let token = self.token_or_error(result, &span)?;
            match token {
                token if token.is_trivia() => continue,
                token if token.is_closing() => return Err(self.unmatched(&span)),
                token => {
                    if let Some(datum) = self.read_from(token, span)? {
                        return Ok(datum);
                    }
                }
            }
        }
    }

    fn wrap(&mut self, symbol: &str, start: usize, line: usize) -> Result<Datum, SyntaxError> {
        let form = self.read_datum(line)?;
        let end = form.span.end;
        let head = Datum::new(DatumKind::Symbol(symbol.to_string()), start..start);
        Ok(Datum::new(DatumKind::List(vec![head, form]), start..end))
    }
}

/// `^:kw` means `^{:kw true}` and `^Type` means `^{:tag Type}`
fn normalize_meta(meta: Datum) -> Datum {
    let span = meta.span.clone();
    if matches!(meta.kind, DatumKind::Keyword(_)) {
        let flag = Datum::new(DatumKind::Bool(true), span.clone());
        Datum::new(DatumKind::Map(vec![meta, flag]), span)
    } else if matches!(meta.kind, DatumKind::Symbol(_) | DatumKind::Str(_)) {
        let key = Datum::new(DatumKind::Keyword(":tag".to_string()), span.clone());
        Datum::new(DatumKind::Map(vec![key, meta]), span)
    } else {
        meta
    }
}

fn classify_atom(text: &str) -> DatumKind {
    match text {
        "nil" => DatumKind::Nil,
        "true" => DatumKind::Bool(true),
        "false" => DatumKind::Bool(false),
        _ if text.starts_with(':') => DatumKind::Keyword(text.to_string()),
        _ if looks_numeric(text) => DatumKind::Number(text.to_string()),
        _ => DatumKind::Symbol(text.to_string()),
    }
}

fn looks_numeric(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('+') | Some('-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Decode the body of a string literal, reporting errors at `line`
pub fn unescape(body: &str, line: usize) -> Result<String, SyntaxError> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('u') => {
                let hex: String = (0..4).filter_map(|_| chars.next()).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| {
                        SyntaxError::new(line, format!("Invalid unicode escape: \\u{}", hex))
                    })?;
                out.push(decoded);
            }
            Some(d) if d.is_digit(8) => {
                let mut octal = d.to_string();
                while octal.len() < 3 {
                    match chars.peek() {
                        Some(next) if next.is_digit(8) => {
                            octal.push(*next);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                let decoded = u32::from_str_radix(&octal, 8)
                    .ok()
                    .filter(|value| *value <= 0o377)
                    .and_then(char::from_u32)
                    .ok_or_else(|| {
                        SyntaxError::new(line, format!("Octal escape out of range: \\{}", octal))
                    })?;
                out.push(decoded);
            }
            Some(other) => {
                return Err(SyntaxError::new(
                    line,
                    format!("Unsupported escape character: \\{}", other),
                ))
            }
            None => return Err(SyntaxError::new(line, "EOF while reading string")),
        }
    }

    Ok(out)
}
