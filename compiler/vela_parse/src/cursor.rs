//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, lookahead, consumption, and the
//! speculative fork/restore machinery. The stream is trivia-preserving;
//! the cursor presents a "visible" view where horizontal trivia is always
//! skipped and line ends are visible only where the enclosing region makes
//! newlines significant (statement sequences), never inside parentheses or
//! brackets.
//!
//! # Virtual indentation tokens
//!
//! Under `allow_significant_indentation`, `observe_indented` and
//! `observe_outdented` synthesize `Indent`/`Outdent` tokens on demand.
//! These shadow the real token at the cursor position; `advance` over a
//! virtual token clears it without moving past real input (except for
//! `Indent`, which also commits the move onto the first token of the
//! block). The pending virtual token and the region stack are both part
//! of a fork snapshot, so indentation observed inside an abandoned branch
//! vanishes with the branch.

use vela_diagnostic::ErrorCode;
use vela_ir::{Dialect, Input, Span, Token, TokenKind, TokenList};

use crate::error::ParseError;

/// A nesting region, controlling newline visibility and indentation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Region {
    /// Inside `(...)` or `[...]`: newlines are invisible.
    Paren,
    /// Inside `{...}`: newlines separate statements.
    Brace,
    /// An indentation block with its column width.
    Indented { width: u32 },
}

/// Snapshot of cursor state for speculative parsing.
///
/// Cloning the region stack makes a fork O(depth), which the nesting
/// contract allows.
#[derive(Clone, Debug)]
pub struct CursorSnapshot {
    pos: usize,
    prev_pos: usize,
    pending: Option<Token>,
    regions: Vec<Region>,
}

/// Cursor for navigating tokens.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    input: &'a Input,
    dialect: &'a Dialect,
    /// Index of the current visible token (shadowed when `pending` is
    /// set).
    pos: usize,
    /// Index of the previously consumed visible token.
    prev_pos: usize,
    /// Pending virtual `Indent`/`Outdent` shadowing `pos`.
    pending: Option<Token>,
    regions: Vec<Region>,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor positioned at the `Bof` token.
    pub fn new(tokens: &'a TokenList, input: &'a Input, dialect: &'a Dialect) -> Self {
        debug_assert!(
            matches!(tokens.get(0).map(|t| &t.kind), Some(TokenKind::Bof)),
            "token stream must begin with Bof"
        );
        Cursor {
            tokens,
            input,
            dialect,
            pos: 0,
            prev_pos: 0,
            pending: None,
            regions: Vec::new(),
        }
    }

    /// The underlying token list.
    #[inline]
    pub fn tokens(&self) -> &'a TokenList {
        self.tokens
    }

    /// Number of tokens in the stream.
    #[inline]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Index of the current visible token.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Index of the previously consumed visible token.
    #[inline]
    pub fn prev_pos(&self) -> usize {
        self.prev_pos
    }

    /// The current token (virtual token if one is pending).
    #[inline]
    pub fn current(&self) -> &Token {
        match &self.pending {
            Some(virtual_token) => virtual_token,
            None => &self.tokens[self.pos],
        }
    }

    /// The current token's kind.
    #[inline]
    pub fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    /// The current token's span.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// The previously consumed token.
    #[inline]
    pub fn previous(&self) -> &Token {
        &self.tokens[self.prev_pos]
    }

    /// The previous token's span.
    #[inline]
    pub fn previous_span(&self) -> Span {
        self.previous().span
    }

    /// Whether the cursor is at `Eof`.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Check the current token against a kind.
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Whether newlines are visible at the current nesting level.
    pub fn newlines_significant(&self) -> bool {
        !matches!(self.regions.last(), Some(Region::Paren))
    }

    /// Enter a nesting region.
    pub(crate) fn push_region(&mut self, region: Region) {
        self.regions.push(region);
    }

    /// Leave the innermost region.
    pub(crate) fn pop_region(&mut self) {
        self.regions.pop();
    }

    /// Width of the innermost indentation region, or 0 outside one.
    pub(crate) fn indentation_width(&self) -> u32 {
        self.regions
            .iter()
            .rev()
            .find_map(|r| match r {
                Region::Indented { width } => Some(*width),
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Advance to the next visible token, returning the consumed one.
    ///
    /// Consuming a virtual `Indent`/`Outdent` clears it without moving
    /// past real input; the shadowed token becomes current, and that is
    /// what gets returned.
    pub fn advance(&mut self) -> &Token {
        if self.pending.take().is_some() {
            return self.current();
        }
        let consumed = self.pos;
        self.prev_pos = consumed;
        self.pos = self.next_visible(self.pos + 1);
        &self.tokens[consumed]
    }

    /// Find the next visible index at or after `from`.
    fn next_visible(&self, from: usize) -> usize {
        let last = self.tokens.len() - 1;
        let mut i = from.min(last);
        loop {
            if i >= last {
                return last;
            }
            let kind = &self.tokens[i].kind;
            if kind.is_horizontal_trivia() || matches!(kind, TokenKind::Bof) {
                i += 1;
                continue;
            }
            if kind.is_line_end() && !self.newlines_significant() {
                i += 1;
                continue;
            }
            return i;
        }
    }

    /// Skip visible line-end tokens.
    pub fn skip_newlines(&mut self) {
        while self.current_kind().is_line_end() {
            self.advance();
        }
    }

    /// Skip a single `Newline` (not a blank-line run) when the next
    /// visible token matches `kind`. Used before `{` and `(` where the
    /// grammar allows the delimiter on a continuation line.
    pub fn newline_opt_when_followed_by(&mut self, kind: &TokenKind) {
        if matches!(self.current_kind(), TokenKind::Newline) && self.peek_past_newline() == kind {
            self.advance();
        }
    }

    /// Skip a single `Newline` when the token after it satisfies the
    /// predicate. Used after infix operators so a chain can continue on
    /// the next line.
    pub fn newline_opt_when_following(&mut self, pred: impl Fn(&TokenKind) -> bool) {
        if matches!(self.current_kind(), TokenKind::Newline) && pred(self.peek_past_newline()) {
            self.advance();
        }
    }

    /// Kind of the first significant token after the current line end.
    pub fn peek_past_newline(&self) -> &TokenKind {
        let mut i = self.pos + 1;
        let last = self.tokens.len() - 1;
        while i < last && self.tokens[i].kind.is_trivia() {
            i += 1;
        }
        &self.tokens[i.min(last)].kind
    }

    /// Index of the first significant token after the current one,
    /// ignoring newline visibility.
    pub fn peek_index(&self) -> usize {
        let mut i = self.pos + 1;
        let last = self.tokens.len() - 1;
        while i < last && self.tokens[i].kind.is_trivia() {
            i += 1;
        }
        i.min(last)
    }

    /// Kind of the next significant token (one-token lookahead over
    /// trivia, including line ends).
    pub fn peek_kind(&self) -> &TokenKind {
        &self.tokens[self.peek_index()].kind
    }

    /// Kind of the `n`th significant token ahead (n = 1 is `peek_kind`).
    pub fn peek_nth_kind(&self, n: usize) -> &TokenKind {
        let last = self.tokens.len() - 1;
        let mut i = self.pos;
        for _ in 0..n {
            i += 1;
            while i < last && self.tokens[i].kind.is_trivia() {
                i += 1;
            }
            if i >= last {
                return &self.tokens[last].kind;
            }
        }
        &self.tokens[i].kind
    }

    /// Accept a token of the given kind, failing with "`X` expected but
    /// `Y` found" otherwise.
    pub fn accept(&mut self, kind: &TokenKind) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.make_accept_error(kind))
        }
    }

    /// Build the error for a failed `accept` call.
    ///
    /// Separated as `#[cold]` so the `format!` allocation does not weigh
    /// down the hot path.
    #[cold]
    #[inline(never)]
    fn make_accept_error(&self, kind: &TokenKind) -> ParseError {
        ParseError::new(
            ErrorCode::E1001,
            format!(
                "`{}` expected but `{}` found",
                kind.display_name(),
                self.current_kind().display_name()
            ),
            self.current_span(),
        )
    }

    /// Advance only if the current token matches; report whether it did.
    pub fn accept_opt(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Create a snapshot of the cursor state.
    pub fn fork(&self) -> CursorSnapshot {
        CursorSnapshot {
            pos: self.pos,
            prev_pos: self.prev_pos,
            pending: self.pending.clone(),
            regions: self.regions.clone(),
        }
    }

    /// Restore a snapshot taken with `fork`.
    pub fn restore(&mut self, snapshot: CursorSnapshot) {
        self.pos = snapshot.pos;
        self.prev_pos = snapshot.prev_pos;
        self.pending = snapshot.pending;
        self.regions = snapshot.regions;
    }

    /// Evaluate `body` with the cursor advanced by one visible token, then
    /// restore unconditionally.
    pub fn ahead<T>(&mut self, body: impl FnOnce(&mut Self) -> T) -> T {
        let snapshot = self.fork();
        self.advance();
        let result = body(self);
        self.restore(snapshot);
        result
    }

    // --- Indentation ---

    /// Column (0-based) of the current token in its source line.
    pub fn current_indentation(&self) -> u32 {
        self.input.column_of(self.current_span().start)
    }

    /// Synthesize an `Indent` if the logical position begins a strictly
    /// more-indented block.
    ///
    /// Only meaningful when the cursor rests on a line end; moves onto the
    /// first token of the block with a pending virtual `Indent` shadowing
    /// it. Returns whether an indent was observed.
    pub fn observe_indented(&mut self) -> bool {
        if !self.dialect.allow_significant_indentation || self.pending.is_some() {
            return false;
        }
        if !self.current_kind().is_line_end() {
            return false;
        }
        let next = self.peek_index();
        if matches!(self.tokens[next].kind, TokenKind::Eof) {
            return false;
        }
        let col = self.input.column_of(self.tokens[next].span.start);
        if col <= self.indentation_width() {
            return false;
        }
        self.pos = next;
        self.regions.push(Region::Indented { width: col });
        self.pending = Some(Token::new(
            TokenKind::Indent,
            Span::point(self.tokens[next].span.start),
        ));
        true
    }

    /// Synthesize an `Outdent` if the line after the current separator is
    /// dedented below the innermost indentation region (or the input
    /// ends). The cursor does not move; consuming the `Outdent` leaves it
    /// on the separator for the enclosing statement sequence.
    pub fn observe_outdented(&mut self) -> bool {
        if !self.dialect.allow_significant_indentation || self.pending.is_some() {
            return false;
        }
        let Some(Region::Indented { width }) = self.regions.last().copied() else {
            return false;
        };
        if self.is_at_end() {
            self.regions.pop();
            self.pending = Some(Token::new(
                TokenKind::Outdent,
                Span::point(self.current_span().start),
            ));
            return true;
        }
        if !self.current_kind().is_line_end() {
            return false;
        }
        let next = self.peek_index();
        let col = self.input.column_of(self.tokens[next].span.start);
        if col >= width && !matches!(self.tokens[next].kind, TokenKind::Eof) {
            return false;
        }
        self.regions.pop();
        self.pending = Some(Token::new(
            TokenKind::Outdent,
            Span::point(self.current_span().start),
        ));
        true
    }

    /// Whether the current token is a virtual `Indent`.
    pub fn at_indent(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Indent)
    }

    /// Whether the current token is a virtual `Outdent`.
    pub fn at_outdent(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Outdent)
    }

    /// Whether a line end (or the end of input) occurs in the trivia
    /// directly after the token at `idx`, before the next significant
    /// token.
    pub fn has_line_break_after(&self, idx: usize) -> bool {
        let last = self.tokens.len() - 1;
        let mut i = idx + 1;
        while i <= last {
            let kind = &self.tokens[i].kind;
            if kind.is_line_end() {
                return true;
            }
            if kind.is_horizontal_trivia() {
                i += 1;
                continue;
            }
            return matches!(kind, TokenKind::Eof);
        }
        true
    }

    /// Whether a line break separates the previous token from the current
    /// one (regardless of newline visibility).
    pub fn line_break_before(&self) -> bool {
        let mut i = self.prev_pos + 1;
        while i < self.pos {
            if self.tokens[i].kind.is_line_end() {
                return true;
            }
            i += 1;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ir::{Dialect, Input, StringInterner};

    fn ident_text(interner: &StringInterner, kind: &TokenKind) -> String {
        match kind {
            TokenKind::Ident(name) => interner.lookup(*name),
            other => panic!("expected identifier, got {other:?}"),
        }
    }

    #[test]
    fn navigation_and_accept() {
        let interner = StringInterner::new();
        let dialect = Dialect::modern();
        let input = Input::new("val x = 42");
        let tokens = vela_lexer::lex(input.text(), &dialect, &interner);
        let mut cursor = Cursor::new(&tokens, &input, &dialect);

        assert!(cursor.check(&TokenKind::Bof));
        cursor.accept(&TokenKind::Bof).unwrap();
        assert!(cursor.check(&TokenKind::KwVal));
        cursor.advance();
        assert_eq!(ident_text(&interner, cursor.current_kind()), "x");
        cursor.advance();
        assert!(cursor.check(&TokenKind::Eq));
        let err = cursor.accept(&TokenKind::Colon).unwrap_err();
        assert!(err.message().contains("`:` expected but `=` found"));
    }

    #[test]
    fn fork_restore_roundtrip() {
        let interner = StringInterner::new();
        let dialect = Dialect::modern();
        let input = Input::new("a b c");
        let tokens = vela_lexer::lex(input.text(), &dialect, &interner);
        let mut cursor = Cursor::new(&tokens, &input, &dialect);
        cursor.advance(); // past Bof

        let snapshot = cursor.fork();
        cursor.advance();
        cursor.advance();
        assert_eq!(ident_text(&interner, cursor.current_kind()), "c");
        cursor.restore(snapshot);
        assert_eq!(ident_text(&interner, cursor.current_kind()), "a");
    }

    #[test]
    fn ahead_restores_unconditionally() {
        let interner = StringInterner::new();
        let dialect = Dialect::modern();
        let input = Input::new("a b");
        let tokens = vela_lexer::lex(input.text(), &dialect, &interner);
        let mut cursor = Cursor::new(&tokens, &input, &dialect);
        cursor.advance();

        let next_is_b = cursor.ahead(|c| ident_text(&interner, c.current_kind()) == "b");
        assert!(next_is_b);
        assert_eq!(ident_text(&interner, cursor.current_kind()), "a");
    }

    #[test]
    fn newlines_invisible_inside_paren_region() {
        let interner = StringInterner::new();
        let dialect = Dialect::modern();
        let input = Input::new("(a\nb)");
        let tokens = vela_lexer::lex(input.text(), &dialect, &interner);
        let mut cursor = Cursor::new(&tokens, &input, &dialect);
        cursor.advance(); // Bof
        cursor.advance(); // (
        cursor.push_region(Region::Paren);
        cursor.advance(); // a; the newline is skipped
        assert_eq!(ident_text(&interner, cursor.current_kind()), "b");
        cursor.pop_region();
    }

    #[test]
    fn observe_indented_and_outdented() {
        let interner = StringInterner::new();
        let dialect = Dialect::modern();
        let input = Input::new("a\n  b\nc");
        let tokens = vela_lexer::lex(input.text(), &dialect, &interner);
        let mut cursor = Cursor::new(&tokens, &input, &dialect);
        cursor.advance(); // Bof
        cursor.advance(); // a; current is the newline

        assert!(cursor.observe_indented());
        assert!(cursor.at_indent());
        cursor.advance();
        assert_eq!(ident_text(&interner, cursor.current_kind()), "b");
        cursor.advance(); // current is the dedenting newline

        assert!(cursor.observe_outdented());
        assert!(cursor.at_outdent());
        cursor.advance();
        cursor.advance(); // separator newline
        assert_eq!(ident_text(&interner, cursor.current_kind()), "c");
    }

    #[test]
    fn fork_captures_indentation_state() {
        let interner = StringInterner::new();
        let dialect = Dialect::modern();
        let input = Input::new("a\n  b");
        let tokens = vela_lexer::lex(input.text(), &dialect, &interner);
        let mut cursor = Cursor::new(&tokens, &input, &dialect);
        cursor.advance();
        cursor.advance(); // at the newline

        let snapshot = cursor.fork();
        assert!(cursor.observe_indented());
        assert!(cursor.at_indent());
        cursor.restore(snapshot);
        // The virtual token synthesized in the abandoned branch is gone.
        assert!(!cursor.at_indent());
        assert!(cursor.current_kind().is_line_end());
    }

    #[test]
    fn indentation_disabled_without_the_dialect_flag() {
        let interner = StringInterner::new();
        let dialect = Dialect::classic();
        let input = Input::new("a\n  b");
        let tokens = vela_lexer::lex(input.text(), &dialect, &interner);
        let mut cursor = Cursor::new(&tokens, &input, &dialect);
        cursor.advance();
        cursor.advance();
        assert!(!cursor.observe_indented());
    }
}
