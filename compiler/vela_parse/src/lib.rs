//! Recursive descent parser for Vela.
//!
//! Consumes the trivia-preserving token stream produced by the lexer and
//! builds `vela_ir::ast` trees annotated with trimmed origins.
//!
//! # Entry points
//!
//! One per tree family (`parse_source`, `parse_term`, `parse_type`, ...).
//! Every entry point accepts `Bof`, runs its production, accepts `Eof`,
//! and returns the origin-annotated tree. Errors abort the entry point;
//! warnings (deprecations) accumulate on the parser and are surfaced via
//! [`Parser::take_warnings`] or forwarded with
//! [`Parser::drain_warnings_into`].
//!
//! # Speculation
//!
//! Disambiguation uses explicit cursor forks (`fork`/`restore`) wrapped in
//! [`Parser::try_parse`] and [`Parser::look_ahead`]. Speculative paths
//! must not emit diagnostics; they are short, predicate-like subparses.

mod classifier;
mod cursor;
mod error;
mod grammar;
mod infix;

#[cfg(test)]
mod tests;

pub use cursor::{Cursor, CursorSnapshot};
pub use error::ParseError;
pub use grammar::{Location, PatMode, TemplateOwner};

use tracing::trace;

use vela_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode};
use vela_ir::ast::{
    Case, Ctor, Enumerator, Ident, Importee, Importer, Init, Mod, MultiSource, Origin, Pat,
    SelfType, Source, Stat, Template, Term, TermKind, TermParam, Type, TypeParam,
};
use vela_ir::{Dialect, Input, Name, Span, StringInterner, TokenKind, TokenList};

/// Parser state.
///
/// Distinct parsers share no state and may run concurrently on distinct
/// inputs.
pub struct Parser<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) dialect: &'a Dialect,
    pub(crate) interner: &'a StringInterner,
    pub(crate) input: &'a Input,
    pub(crate) soft: classifier::SoftKeywords,
    /// Deprecation and other non-fatal diagnostics.
    warnings: Vec<Diagnostic>,
    /// Macro quote nesting (`'{ ... }`).
    pub(crate) quote_depth: u32,
    /// Quoted-pattern nesting (quotes inside pattern position).
    pub(crate) quoted_pattern_depth: u32,
    /// Bare-condition nesting: `then`/`do` close the condition instead of
    /// acting as identifiers.
    pub(crate) condition_depth: u32,
}

impl<'a> Parser<'a> {
    /// Create a parser over a lexed input.
    pub fn new(
        input: &'a Input,
        tokens: &'a TokenList,
        dialect: &'a Dialect,
        interner: &'a StringInterner,
    ) -> Self {
        Parser {
            cursor: Cursor::new(tokens, input, dialect),
            dialect,
            interner,
            input,
            soft: classifier::SoftKeywords::new(interner),
            warnings: Vec::new(),
            quote_depth: 0,
            quoted_pattern_depth: 0,
            condition_depth: 0,
        }
    }

    // --- Entry points ---

    /// Parse a whole compilation unit.
    pub fn parse_source(&mut self) -> Result<Source, ParseError> {
        trace!("parse_source");
        self.entry(|p| p.source())
    }

    /// Parse interactive input: multiple sources delimited by `@` between
    /// them.
    pub fn parse_repl_input(&mut self) -> Result<MultiSource, ParseError> {
        trace!("parse_repl_input");
        self.entry(|p| p.repl_sources())
    }

    /// Parse a single statement (template or block level).
    pub fn parse_stat(&mut self) -> Result<Stat, ParseError> {
        self.entry(|p| p.single_stat())
    }

    /// Parse a term.
    pub fn parse_term(&mut self) -> Result<Term, ParseError> {
        self.entry(|p| p.expr(Location::NoStat, false))
    }

    /// Parse a type.
    pub fn parse_type(&mut self) -> Result<Type, ParseError> {
        self.entry(|p| p.typ())
    }

    /// Parse a pattern.
    pub fn parse_pat(&mut self) -> Result<Pat, ParseError> {
        self.entry(|p| p.pattern(PatMode::SeqOk))
    }

    /// Parse one `case` clause.
    pub fn parse_case(&mut self) -> Result<Case, ParseError> {
        self.entry(|p| {
            p.accept(&TokenKind::KwCase)?;
            p.case_clause()
        })
    }

    /// Parse a secondary constructor.
    pub fn parse_ctor(&mut self) -> Result<Ctor, ParseError> {
        self.entry(|p| p.secondary_ctor(Vec::new()))
    }

    /// Parse a constructor invocation.
    pub fn parse_init(&mut self) -> Result<Init, ParseError> {
        self.entry(|p| p.init_clause(true))
    }

    /// Parse a self-type annotation.
    pub fn parse_self(&mut self) -> Result<SelfType, ParseError> {
        self.entry(|p| p.self_type())
    }

    /// Parse a template (inheritance clause plus body).
    pub fn parse_template(&mut self) -> Result<Template, ParseError> {
        self.entry(|p| p.template(TemplateOwner::Class))
    }

    /// Parse a single modifier.
    pub fn parse_mod(&mut self) -> Result<Mod, ParseError> {
        self.entry(|p| p.single_modifier())
    }

    /// Parse one for-comprehension enumerator.
    pub fn parse_enumerator(&mut self) -> Result<Enumerator, ParseError> {
        self.entry(|p| p.enumerator(true))
    }

    /// Parse one importer clause.
    pub fn parse_importer(&mut self) -> Result<Importer, ParseError> {
        self.entry(|p| p.importer())
    }

    /// Parse one importee.
    pub fn parse_importee(&mut self) -> Result<Importee, ParseError> {
        self.entry(|p| p.importee())
    }

    /// Parse a term parameter.
    pub fn parse_term_param(&mut self) -> Result<TermParam, ParseError> {
        self.entry(|p| p.term_param(true))
    }

    /// Parse a type parameter.
    pub fn parse_type_param(&mut self) -> Result<TypeParam, ParseError> {
        self.entry(|p| p.type_param(true))
    }

    /// Parse a quasiquote term fragment.
    pub fn parse_unquote_term(&mut self) -> Result<Term, ParseError> {
        self.require_unquotes()?;
        self.entry(|p| p.expr(Location::NoStat, false))
    }

    /// Parse a quasiquote pattern fragment.
    pub fn parse_unquote_pat(&mut self) -> Result<Pat, ParseError> {
        self.require_unquotes()?;
        self.entry(|p| p.pattern(PatMode::SeqOk))
    }

    fn require_unquotes(&self) -> Result<(), ParseError> {
        if self.dialect.allow_unquotes {
            Ok(())
        } else {
            Err(ParseError::dialect_forbidden(
                self.dialect.name,
                "unquoting",
                self.cursor.current_span(),
            ))
        }
    }

    fn entry<T>(
        &mut self,
        production: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.cursor.accept(&TokenKind::Bof)?;
        let result = production(self)?;
        self.cursor.skip_newlines();
        self.cursor.accept(&TokenKind::Eof)?;
        Ok(result)
    }

    // --- Warnings ---

    pub(crate) fn warn(&mut self, diagnostic: Diagnostic) {
        self.warnings.push(diagnostic);
    }

    /// Warnings collected so far.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Take ownership of the collected warnings.
    pub fn take_warnings(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.warnings)
    }

    /// Forward collected warnings to a diagnostic sink.
    pub fn drain_warnings_into(&mut self, sink: &mut dyn DiagnosticSink) {
        for warning in self.warnings.drain(..) {
            sink.report(warning);
        }
    }

    // --- Position tracking ---

    /// Token index where the node about to be parsed starts.
    #[inline]
    pub(crate) fn note_pos(&self) -> u32 {
        self.cursor.pos() as u32
    }

    /// Token index of the last consumed token.
    #[inline]
    pub(crate) fn last_pos(&self) -> u32 {
        self.cursor.prev_pos() as u32
    }

    /// Origin for the token range `[start, end]` (inclusive), trimming
    /// trivia at both ends.
    ///
    /// An empty range yields `[start, start)`; a range holding a single
    /// trivia token yields `[start, start + 1)`.
    pub(crate) fn origin(&self, start: usize, end: usize) -> Origin {
        let tokens = self.cursor.tokens();
        let last = tokens.len() - 1;
        let start = start.min(last);
        if end < start {
            let at = tokens[start].span.start;
            return Origin::new(start as u32, start as u32, Span::point(at));
        }
        let end = end.min(last);
        let s = tokens.next_non_trivia(start);
        let e = tokens.prev_non_trivia(end);
        if e < s || s > end {
            if start == end && tokens[start].kind.is_trivia() {
                return Origin::new(start as u32, start as u32 + 1, tokens[start].span);
            }
            let at = tokens[start].span.start;
            return Origin::new(start as u32, start as u32, Span::point(at));
        }
        Origin::new(
            s as u32,
            e as u32 + 1,
            Span::new(tokens[s].span.start, tokens[e].span.end),
        )
    }

    /// Origin from a noted start to the last consumed token.
    #[inline]
    pub(crate) fn origin_from(&self, start: u32) -> Origin {
        self.origin(start as usize, self.last_pos() as usize)
    }

    /// Point origin at the current token, for synthesized nodes.
    pub(crate) fn origin_here(&self) -> Origin {
        let at = self.cursor.pos() as u32;
        Origin::new(at, at, Span::point(self.cursor.current_span().start))
    }

    // --- Cursor delegation ---

    #[inline]
    pub(crate) fn current_kind(&self) -> &TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    pub(crate) fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    pub(crate) fn advance(&mut self) {
        self.cursor.advance();
    }

    #[inline]
    pub(crate) fn accept(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        self.cursor.accept(kind).map(|_| ())
    }

    #[inline]
    pub(crate) fn accept_opt(&mut self, kind: &TokenKind) -> bool {
        self.cursor.accept_opt(kind)
    }

    #[inline]
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        self.cursor.peek_kind()
    }

    // --- Speculation ---

    /// Try a parse; on error restore the cursor and return `None`.
    ///
    /// Speculative paths must not emit diagnostics, so the warning count
    /// is restored along with the cursor.
    pub(crate) fn try_parse<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Option<T> {
        let snapshot = self.cursor.fork();
        let warning_mark = self.warnings.len();
        match f(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.cursor.restore(snapshot);
                self.warnings.truncate(warning_mark);
                None
            }
        }
    }

    /// Evaluate a predicate-like parse and restore unconditionally.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let snapshot = self.cursor.fork();
        let warning_mark = self.warnings.len();
        let result = f(self);
        self.cursor.restore(snapshot);
        self.warnings.truncate(warning_mark);
        result
    }

    // --- Identifier helpers ---

    /// Read any identifier (plain, symbolic, or backquoted).
    pub(crate) fn ident(&mut self) -> Result<Ident, ParseError> {
        let start = self.note_pos();
        match *self.current_kind() {
            TokenKind::Ident(name) | TokenKind::QuotedIdent(name) => {
                self.advance();
                Ok(Ident::new(name, self.origin_from(start)))
            }
            _ => Err(self.make_ident_error()),
        }
    }

    #[cold]
    #[inline(never)]
    fn make_ident_error(&self) -> ParseError {
        ParseError::new(
            ErrorCode::E1004,
            format!(
                "`identifier` expected but `{}` found",
                self.current_kind().display_name()
            ),
            self.current_span(),
        )
    }

    /// Read a plain (non-backquoted) identifier name.
    pub(crate) fn ident_name(&mut self) -> Result<Name, ParseError> {
        match *self.current_kind() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.make_ident_error()),
        }
    }

    /// Collapse an operand list to a single term, wrapping multiples into
    /// a tuple spanning the given token range.
    pub(crate) fn make_term_operand(&self, mut terms: Vec<Term>, start: u32, end: u32) -> Term {
        if terms.len() == 1 {
            terms.remove(0)
        } else {
            let origin = self.origin(start as usize, end as usize);
            Term::new(TermKind::Tuple { args: terms }, origin)
        }
    }

    // --- Literal decoding ---

    /// Decode an integer literal with range checking.
    pub(crate) fn decode_int(
        &self,
        name: Name,
        negated: bool,
        span: Span,
    ) -> Result<i32, ParseError> {
        let value = self.decode_integer_magnitude(name, span)?;
        let limit = if negated { 1u64 << 31 } else { (1u64 << 31) - 1 };
        if value > limit {
            return Err(out_of_range_error("integer", span));
        }
        let signed = if negated {
            (value as i64).wrapping_neg()
        } else {
            value as i64
        };
        Ok(signed as i32)
    }

    /// Decode a long literal with range checking.
    pub(crate) fn decode_long(
        &self,
        name: Name,
        negated: bool,
        span: Span,
    ) -> Result<i64, ParseError> {
        let value = self.decode_integer_magnitude(name, span)?;
        let limit = if negated { 1u64 << 63 } else { (1u64 << 63) - 1 };
        if value > limit {
            return Err(out_of_range_error("long", span));
        }
        Ok(if negated {
            (value as i64).wrapping_neg()
        } else {
            value as i64
        })
    }

    fn decode_integer_magnitude(&self, name: Name, span: Span) -> Result<u64, ParseError> {
        self.interner.with_str(name, |text| {
            let (digits, radix) = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
            {
                Some(hex) => (hex, 16),
                None => (text, 10),
            };
            u64::from_str_radix(digits, radix).map_err(|_| out_of_range_error("integer", span))
        })
    }

    /// Validate a float literal's range (value kept as text in the tree).
    pub(crate) fn check_float_range(&self, name: Name, span: Span) -> Result<(), ParseError> {
        self.interner.with_str(name, |text| {
            match text.parse::<f32>() {
                Ok(value) if value.is_finite() => Ok(()),
                _ => Err(out_of_range_error("float", span)),
            }
        })
    }

    /// Validate a double literal's range (value kept as text in the tree).
    pub(crate) fn check_double_range(&self, name: Name, span: Span) -> Result<(), ParseError> {
        self.interner.with_str(name, |text| {
            match text.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(()),
                _ => Err(out_of_range_error("double", span)),
            }
        })
    }
}

#[cold]
fn out_of_range_error(what: &str, span: Span) -> ParseError {
    ParseError::new(
        ErrorCode::E1060,
        format!("{what} literal out of range"),
        span,
    )
}
