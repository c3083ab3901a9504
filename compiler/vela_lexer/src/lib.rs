//! Lexer for Vela using logos with string interning.
//!
//! Produces a trivia-preserving [`vela_ir::TokenList`]: whitespace,
//! comments, and line ends survive as tokens so the parser can trim node
//! origins over them. The list always begins with `Bof` and ends with
//! `Eof`.
//!
//! # Modal lexing
//!
//! Interpolated strings (`s"a $x ${y + 1} b"`) and XML literals cannot be
//! described by a single token grammar, so the main entry point drives
//! logos through a mode stack: normal token scanning, interpolation text
//! scanning, and splice bodies (which recursively use normal scanning with
//! brace tracking).
//!
//! # Dialects
//!
//! Keywords that only exist in some editions (`given`, `enum`, `export`,
//! `forSome`) are produced as identifiers when the dialect does not enable
//! them. Numeric literals keep their (cleaned) text: decoding and range
//! diagnosis belong to the parser.

mod escape;
mod number;
mod raw_token;
mod xml;

#[cfg(test)]
mod tests;

use logos::Logos;

use escape::{unescape_char, unescape_string};
use raw_token::RawToken;
use vela_ir::{Dialect, Name, Span, StringInterner, Token, TokenKind, TokenList};

/// Lex source code into a [`TokenList`].
pub fn lex(source: &str, dialect: &Dialect, interner: &StringInterner) -> TokenList {
    Lexer::new(source, dialect, interner).run()
}

/// Lexing mode for the driver loop.
#[derive(Debug)]
pub(crate) enum Mode {
    /// Inside an interpolated string body.
    Interp { triple: bool },
    /// Inside a `${ ... }` splice of an interpolated string.
    InterpSplice { depth: u32 },
    /// Inside an XML literal's markup text.
    Xml {
        tag_depth: u32,
        in_tag: Option<XmlTagKind>,
    },
    /// Inside a `{ ... }` splice of an XML literal.
    XmlSplice { depth: u32 },
}

/// Which kind of tag the XML scanner is currently inside.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum XmlTagKind {
    Open,
    Close,
}

pub(crate) struct Lexer<'a> {
    pub(crate) source: &'a str,
    dialect: &'a Dialect,
    interner: &'a StringInterner,
    lx: logos::Lexer<'a, RawToken>,
    out: TokenList,
    pub(crate) modes: Vec<Mode>,
    /// Kind of the last non-trivia token emitted, for XML eligibility.
    last_significant: Option<TokenKind>,
    /// Whether the last emitted token (trivia included) was a line end or
    /// the beginning of file.
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str, dialect: &'a Dialect, interner: &'a StringInterner) -> Self {
        Lexer {
            source,
            dialect,
            interner,
            lx: RawToken::lexer(source),
            out: TokenList::with_capacity(source.len() / 4 + 2),
            modes: Vec::new(),
            last_significant: None,
            at_line_start: true,
        }
    }

    fn run(mut self) -> TokenList {
        self.emit(TokenKind::Bof, Span::point(0));

        loop {
            match self.modes.last() {
                Some(Mode::Interp { triple }) => {
                    let triple = *triple;
                    self.scan_interp_parts(triple);
                    continue;
                }
                Some(Mode::Xml { .. }) => {
                    self.scan_xml_parts();
                    continue;
                }
                _ => {}
            }

            if self.dialect.allow_xml_literals && self.at_xml_start() {
                self.enter_xml();
                continue;
            }

            let Some(result) = self.lx.next() else {
                break;
            };
            let span = span_of(self.lx.span());
            match result {
                Ok(raw) => self.dispatch(raw, span),
                Err(()) => self.emit(TokenKind::Error, span),
            }
        }

        let eof = u32::try_from(self.source.len()).unwrap_or(u32::MAX);
        self.emit(TokenKind::Eof, Span::point(eof));
        self.out
    }

    pub(crate) fn emit(&mut self, kind: TokenKind, span: Span) {
        self.at_line_start = matches!(
            kind,
            TokenKind::Newline | TokenKind::BlankLine | TokenKind::Bof
        );
        if !kind.is_trivia() {
            self.last_significant = Some(kind.clone());
        }
        self.out.push(Token::new(kind, span));
    }

    pub(crate) fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Byte position where the next raw token would start.
    pub(crate) fn pos(&self) -> u32 {
        self.lx.span().end as u32
    }

    /// Unconsumed input.
    pub(crate) fn remainder(&self) -> &'a str {
        self.lx.remainder()
    }

    /// Consume `n` bytes of the remainder by hand.
    pub(crate) fn bump(&mut self, n: usize) {
        self.lx.bump(n);
    }

    fn dispatch(&mut self, raw: RawToken, span: Span) {
        match raw {
            RawToken::Whitespace => self.emit(TokenKind::Whitespace, span),
            RawToken::Newlines => {
                let breaks = self.source[span.to_range()]
                    .bytes()
                    .filter(|&b| b == b'\n')
                    .count();
                if breaks >= 2 {
                    self.emit(TokenKind::BlankLine, span);
                } else {
                    self.emit(TokenKind::Newline, span);
                }
            }
            RawToken::LineComment => self.emit(TokenKind::LineComment, span),
            RawToken::BlockComment => self.emit(TokenKind::BlockComment, span),

            RawToken::Ident => self.dispatch_ident(span),
            RawToken::QuotedIdent => {
                let slice = &self.source[span.to_range()];
                let name = self.intern(&slice[1..slice.len() - 1]);
                self.emit(TokenKind::QuotedIdent(name), span);
            }
            RawToken::OpIdent => self.dispatch_op(span),

            RawToken::Int | RawToken::HexInt | RawToken::FloatingPoint => {
                let slice = &self.source[span.to_range()];
                let kind = number::numeric_token_kind(raw, slice, self.interner);
                self.emit(kind, span);
            }
            RawToken::Char => {
                let slice = &self.source[span.to_range()];
                let c = unescape_char(&slice[1..slice.len() - 1]);
                self.emit(TokenKind::CharLit(c), span);
            }
            RawToken::Symbol => self.dispatch_symbol(span),
            RawToken::Quote => self.emit(TokenKind::MacroQuote, span),
            RawToken::String => {
                let slice = &self.source[span.to_range()];
                let content = unescape_string(&slice[1..slice.len() - 1]);
                let name = self.intern(&content);
                self.emit(TokenKind::StringLit(name), span);
            }
            RawToken::TripleString => {
                let slice = &self.source[span.to_range()];
                // Raw body: no escape processing inside triple quotes.
                let name = self.intern(&slice[3..slice.len() - 3]);
                self.emit(TokenKind::StringLit(name), span);
            }

            RawToken::LParen => self.emit(TokenKind::LParen, span),
            RawToken::RParen => self.emit(TokenKind::RParen, span),
            RawToken::LBracket => self.emit(TokenKind::LBracket, span),
            RawToken::RBracket => self.emit(TokenKind::RBracket, span),
            RawToken::LBrace => {
                if let Some(Mode::InterpSplice { depth } | Mode::XmlSplice { depth }) =
                    self.modes.last_mut()
                {
                    *depth += 1;
                }
                self.emit(TokenKind::LBrace, span);
            }
            RawToken::RBrace => self.dispatch_rbrace(span),
            RawToken::Comma => self.emit(TokenKind::Comma, span),
            RawToken::Semicolon => self.emit(TokenKind::Semicolon, span),
            RawToken::Dot => self.emit(TokenKind::Dot, span),

            _ => self.dispatch_keyword(raw, span),
        }
    }

    fn dispatch_keyword(&mut self, raw: RawToken, span: Span) {
        let gated_off = |lexer: &Self, text: &str| {
            let name = lexer.interner.intern(text);
            TokenKind::Ident(name)
        };
        let kind = match raw {
            RawToken::Abstract => TokenKind::KwAbstract,
            RawToken::Case => TokenKind::KwCase,
            RawToken::Catch => TokenKind::KwCatch,
            RawToken::Class => TokenKind::KwClass,
            RawToken::Def => TokenKind::KwDef,
            RawToken::Do => TokenKind::KwDo,
            RawToken::Else => TokenKind::KwElse,
            RawToken::Enum if self.dialect.allow_enums => TokenKind::KwEnum,
            RawToken::Enum => gated_off(self, "enum"),
            RawToken::Export if self.dialect.allow_export_clauses => TokenKind::KwExport,
            RawToken::Export => gated_off(self, "export"),
            RawToken::Extends => TokenKind::KwExtends,
            RawToken::False => TokenKind::KwFalse,
            RawToken::Final => TokenKind::KwFinal,
            RawToken::Finally => TokenKind::KwFinally,
            RawToken::For => TokenKind::KwFor,
            RawToken::ForSome if self.dialect.allow_existential_types => TokenKind::KwForSome,
            RawToken::ForSome => gated_off(self, "forSome"),
            RawToken::Given if self.dialect.allow_given_using => TokenKind::KwGiven,
            RawToken::Given => gated_off(self, "given"),
            RawToken::If => TokenKind::KwIf,
            RawToken::Implicit => TokenKind::KwImplicit,
            RawToken::Import => TokenKind::KwImport,
            RawToken::Lazy => TokenKind::KwLazy,
            RawToken::Match => TokenKind::KwMatch,
            RawToken::New => TokenKind::KwNew,
            RawToken::Null => TokenKind::KwNull,
            RawToken::Object => TokenKind::KwObject,
            RawToken::Override => TokenKind::KwOverride,
            RawToken::Package => TokenKind::KwPackage,
            RawToken::Private => TokenKind::KwPrivate,
            RawToken::Protected => TokenKind::KwProtected,
            RawToken::Return => TokenKind::KwReturn,
            RawToken::Sealed => TokenKind::KwSealed,
            RawToken::Super => TokenKind::KwSuper,
            RawToken::This => TokenKind::KwThis,
            RawToken::Throw => TokenKind::KwThrow,
            RawToken::Trait => TokenKind::KwTrait,
            RawToken::True => TokenKind::KwTrue,
            RawToken::Try => TokenKind::KwTry,
            RawToken::Type => TokenKind::KwType,
            RawToken::Val => TokenKind::KwVal,
            RawToken::Var => TokenKind::KwVar,
            RawToken::While => TokenKind::KwWhile,
            RawToken::With => TokenKind::KwWith,
            RawToken::Yield => TokenKind::KwYield,
            _ => TokenKind::Error,
        };
        self.emit(kind, span);
    }

    fn dispatch_ident(&mut self, span: Span) {
        let slice = &self.source[span.to_range()];

        // `_` alone is its own token.
        if slice == "_" {
            self.emit(TokenKind::Underscore, span);
            return;
        }

        // `$`-escapes: unquotes under quasiquote dialects, macro splices
        // otherwise.
        if let Some(rest) = slice.strip_prefix('$') {
            if self.dialect.allow_unquotes {
                self.emit(TokenKind::Unquote, Span::new(span.start, span.start + 1));
                if !rest.is_empty() {
                    let name = self.intern(rest);
                    self.emit(
                        TokenKind::Ident(name),
                        Span::new(span.start + 1, span.end),
                    );
                }
                return;
            }
            if slice == "$" && self.dialect.allow_macro_quotes && self.remainder().starts_with('{')
            {
                self.emit(TokenKind::MacroSplice, span);
                return;
            }
        }

        // An identifier immediately followed by a quote begins an
        // interpolated string.
        if self.remainder().starts_with('"') && !slice.contains(|c: char| !ident_char(c)) {
            let name = self.intern(slice);
            self.emit(TokenKind::InterpId(name), span);
            self.enter_interp();
            return;
        }

        let name = self.intern(slice);
        self.emit(TokenKind::Ident(name), span);
    }

    fn dispatch_op(&mut self, span: Span) {
        let slice = &self.source[span.to_range()];
        let kind = match slice {
            "=" => TokenKind::Eq,
            ":" => TokenKind::Colon,
            "=>" => TokenKind::FatArrow,
            "?=>" => TokenKind::CtxArrow,
            "=>>" => TokenKind::TypeLambdaArrow,
            "<-" => TokenKind::LeftArrow,
            "<:" => TokenKind::Subtype,
            ">:" => TokenKind::Supertype,
            "<%" if self.dialect.allow_view_bounds => TokenKind::ViewBound,
            "#" => TokenKind::Hash,
            "@" => TokenKind::At,
            _ => TokenKind::Ident(self.intern(slice)),
        };
        self.emit(kind, span);
    }

    fn dispatch_symbol(&mut self, span: Span) {
        let slice = &self.source[span.to_range()];
        if self.dialect.allow_symbol_literals {
            let name = self.intern(&slice[1..]);
            self.emit(TokenKind::SymbolLit(name), span);
        } else {
            // Under macro dialects `'x` quotes the identifier `x`.
            self.emit(TokenKind::MacroQuote, Span::new(span.start, span.start + 1));
            let name = self.intern(&slice[1..]);
            self.emit(TokenKind::Ident(name), Span::new(span.start + 1, span.end));
        }
    }

    fn dispatch_rbrace(&mut self, span: Span) {
        match self.modes.last_mut() {
            Some(Mode::InterpSplice { depth }) => {
                if *depth == 0 {
                    self.modes.pop();
                    self.emit(TokenKind::InterpSpliceEnd, span);
                } else {
                    *depth -= 1;
                    self.emit(TokenKind::RBrace, span);
                }
            }
            Some(Mode::XmlSplice { depth }) => {
                if *depth == 0 {
                    self.modes.pop();
                    self.emit(TokenKind::XmlSpliceEnd, span);
                } else {
                    *depth -= 1;
                    self.emit(TokenKind::RBrace, span);
                }
            }
            _ => self.emit(TokenKind::RBrace, span),
        }
    }

    // --- Interpolated strings ---

    fn enter_interp(&mut self) {
        let start = self.pos();
        let triple = self.remainder().starts_with("\"\"\"");
        let quote_len = if triple { 3 } else { 1 };
        self.bump(quote_len);
        self.emit(TokenKind::InterpStart, Span::new(start, start + quote_len as u32));
        self.modes.push(Mode::Interp { triple });
    }

    /// Scan interpolation text up to the next splice or the closing quote.
    ///
    /// Always emits an `InterpPart` (possibly empty) so the parser can rely
    /// on `parts.len() == args.len() + 1`.
    fn scan_interp_parts(&mut self, triple: bool) {
        let start = self.pos();
        let rem = self.remainder();
        let bytes = rem.as_bytes();
        let mut text = String::new();
        let mut i = 0usize;

        loop {
            if i >= bytes.len() || (!triple && bytes[i] == b'\n') {
                // Unterminated interpolation.
                self.flush_interp_part(&text, start, i);
                self.bump(i);
                let here = self.pos();
                self.emit(TokenKind::Error, Span::point(here));
                self.modes.pop();
                return;
            }
            if bytes[i] == b'"' {
                if !triple {
                    self.flush_interp_part(&text, start, i);
                    self.bump(i + 1);
                    self.emit(TokenKind::InterpEnd, Span::new(start + i as u32, start + i as u32 + 1));
                    self.modes.pop();
                    return;
                }
                if rem[i..].starts_with("\"\"\"") {
                    let mut end = i + 3;
                    while end < bytes.len() && bytes[end] == b'"' {
                        end += 1;
                    }
                    // Extra quotes belong to the text, keep all but three.
                    text.push_str(&rem[i..end - 3]);
                    self.flush_interp_part(&text, start, end - 3);
                    self.bump(end);
                    self.emit(
                        TokenKind::InterpEnd,
                        Span::new(start + (end - 3) as u32, start + end as u32),
                    );
                    self.modes.pop();
                    return;
                }
                text.push('"');
                i += 1;
                continue;
            }
            if bytes[i] == b'$' {
                if i + 1 < bytes.len() && bytes[i + 1] == b'$' {
                    text.push('$');
                    i += 2;
                    continue;
                }
                let after = &rem[i + 1..];
                if after.starts_with('{') {
                    self.flush_interp_part(&text, start, i);
                    self.bump(i + 2);
                    self.emit(
                        TokenKind::InterpSpliceStart,
                        Span::new(start + i as u32, start + i as u32 + 2),
                    );
                    self.modes.push(Mode::InterpSplice { depth: 0 });
                    return;
                }
                let ident_len = after
                    .find(|c: char| !ident_char(c))
                    .unwrap_or(after.len());
                if ident_len > 0 && after.starts_with(|c: char| ident_start_char(c)) {
                    self.flush_interp_part(&text, start, i);
                    self.bump(i + 1);
                    let dollar = start + i as u32;
                    self.emit(TokenKind::InterpSpliceStart, Span::new(dollar, dollar + 1));
                    let name = self.intern(&after[..ident_len]);
                    self.bump(ident_len);
                    self.emit(
                        TokenKind::Ident(name),
                        Span::new(dollar + 1, dollar + 1 + ident_len as u32),
                    );
                    let here = self.pos();
                    self.emit(TokenKind::InterpSpliceEnd, Span::point(here));
                    // Stay in interpolation mode: the next call scans the
                    // following part.
                    return;
                }
                // A lone `$` with no escape: literal text.
                text.push('$');
                i += 1;
                continue;
            }
            // Escape sequences are kept raw in parts; interpolator
            // semantics decide their meaning downstream.
            if bytes[i] == b'\\' && !triple && i + 1 < bytes.len() {
                text.push_str(&rem[i..i + 2]);
                i += 2;
                continue;
            }
            let c = rem[i..].chars().next().unwrap_or('\u{FFFD}');
            text.push(c);
            i += c.len_utf8();
        }
    }

    fn flush_interp_part(&mut self, text: &str, start: u32, end_offset: usize) {
        let name = self.intern(text);
        self.emit(
            TokenKind::InterpPart(name),
            Span::new(start, start + end_offset as u32),
        );
    }

    // --- XML literals ---

    /// Whether the upcoming input begins an XML literal: `<` followed by a
    /// letter, at a position where an expression may begin.
    fn at_xml_start(&self) -> bool {
        if matches!(self.modes.last(), Some(Mode::Interp { .. } | Mode::Xml { .. })) {
            return false;
        }
        let rem = self.remainder();
        let mut chars = rem.chars();
        if chars.next() != Some('<') {
            return false;
        }
        if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return false;
        }
        self.at_line_start || xml_allowed_after(self.last_significant.as_ref())
    }
}

fn span_of(range: std::ops::Range<usize>) -> Span {
    Span::new(range.start as u32, range.end as u32)
}

pub(crate) fn ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

pub(crate) fn ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Token kinds after which a `<` can begin an XML literal.
fn xml_allowed_after(kind: Option<&TokenKind>) -> bool {
    match kind {
        None => true,
        Some(kind) => matches!(
            kind,
            TokenKind::LParen
                | TokenKind::LBrace
                | TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::Eq
                | TokenKind::FatArrow
                | TokenKind::LeftArrow
                | TokenKind::KwIf
                | TokenKind::KwElse
                | TokenKind::KwWhile
                | TokenKind::KwDo
                | TokenKind::KwYield
                | TokenKind::KwReturn
                | TokenKind::KwCase
                | TokenKind::KwThrow
        ),
    }
}
