//! Primary expressions.
//!
//! Literals (with numeric decoding and range checks), paths,
//! interpolated strings, XML literals, macro quote/splice, blocks and
//! partial functions, and the postfix suffix chain (selection, type
//! application, argument lists, eta-expansion).

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{Ident, Lit, Pat, PatKind, StatKind, Term, TermKind};
use vela_ir::TokenKind;

use crate::error::ParseError;
use crate::grammar::{Location, PatMode};
use crate::Parser;

impl Parser<'_> {
    /// Simple expressions and their postfix suffixes.
    pub(crate) fn simple_expr(&mut self, allow_repeated: bool) -> Result<Term, ParseError> {
        let start = self.note_pos();
        let t = match self.current_kind().clone() {
            kind if kind.is_literal() => {
                let lit = self.literal(false)?;
                Term::new(TermKind::Lit(lit), self.origin_from(start))
            }
            TokenKind::InterpId(_) => self.interpolate_term(start)?,
            TokenKind::XmlStart => self.xml_term(start)?,
            TokenKind::Ident(_)
            | TokenKind::QuotedIdent(_)
            | TokenKind::KwThis
            | TokenKind::KwSuper => self.stable_ref()?,
            TokenKind::Underscore => {
                self.advance();
                Term::new(TermKind::Placeholder, self.origin_from(start))
            }
            TokenKind::LParen => {
                let mut args = self.in_parens(|p| {
                    p.comma_series(&TokenKind::RParen, |p| p.expr(Location::NoStat, false))
                })?;
                let origin = self.origin_from(start);
                match args.len() {
                    0 => Term::new(TermKind::Lit(Lit::Unit), origin),
                    1 => args.remove(0),
                    _ => Term::new(TermKind::Tuple { args }, origin),
                }
            }
            TokenKind::LBrace => self.block_literal(start)?,
            TokenKind::KwNew => self.new_expr(start)?,
            TokenKind::MacroQuote => self.quote_expr(start)?,
            TokenKind::MacroSplice => self.splice_expr(start)?,
            TokenKind::Unquote => {
                let quasi = self.unquote()?;
                Term::new(TermKind::Quasi(quasi), self.origin_from(start))
            }
            other => {
                return Err(ParseError::new(
                    ErrorCode::E1002,
                    format!(
                        "illegal start of simple expression: `{}`",
                        other.display_name()
                    ),
                    self.current_span(),
                ))
            }
        };
        self.simple_expr_rest(t, start, allow_repeated)
    }

    /// Postfix suffixes: `.name`, `[targs]`, argument lists, `f _`.
    fn simple_expr_rest(
        &mut self,
        mut t: Term,
        start: u32,
        allow_repeated: bool,
    ) -> Result<Term, ParseError> {
        let _ = allow_repeated;
        loop {
            if self.dialect.allow_significant_indentation {
                self.cursor.newline_opt_when_followed_by(&TokenKind::LBrace);
            }
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let name = self.ident()?;
                    t = Term::new(
                        TermKind::Select {
                            qual: Box::new(t),
                            name,
                        },
                        self.origin_from(start),
                    );
                }
                TokenKind::LBracket => {
                    let targs = self.type_args()?;
                    t = Term::new(
                        TermKind::ApplyType {
                            fun: Box::new(t),
                            targs,
                        },
                        self.origin_from(start),
                    );
                }
                TokenKind::LParen | TokenKind::LBrace => {
                    let (args, using) = self.argument_exprs()?;
                    let kind = if using {
                        TermKind::ApplyUsing {
                            fun: Box::new(t),
                            args,
                        }
                    } else {
                        TermKind::Apply {
                            fun: Box::new(t),
                            args,
                        }
                    };
                    t = Term::new(kind, self.origin_from(start));
                }
                TokenKind::Underscore => {
                    self.advance();
                    t = Term::new(
                        TermKind::Eta { expr: Box::new(t) },
                        self.origin_from(start),
                    );
                    return Ok(t);
                }
                _ => return Ok(t),
            }
        }
    }

    /// One argument list: `(a, b = c, xs: _*)` or `{ block }`, with an
    /// optional leading `using`.
    pub(crate) fn argument_exprs(&mut self) -> Result<(Vec<Term>, bool), ParseError> {
        if self.check(&TokenKind::LBrace) {
            let start = self.note_pos();
            return Ok((vec![self.block_literal(start)?], false));
        }
        let mut using = false;
        let args = self.in_parens(|p| {
            if p.dialect.allow_given_using
                && p.at_soft_kw(p.soft.using)
                && !matches!(p.peek_kind(), TokenKind::Colon | TokenKind::Comma)
            {
                p.advance();
                using = true;
            }
            p.comma_series(&TokenKind::RParen, |p| p.expr(Location::NoStat, true))
        })?;
        Ok((args, using))
    }

    /// `{ ... }`: a partial function when the body starts with `case`, a
    /// block otherwise.
    pub(crate) fn block_literal(&mut self, start: u32) -> Result<Term, ParseError> {
        self.accept(&TokenKind::LBrace)?;
        self.cursor.push_region(crate::cursor::Region::Brace);
        self.cursor.skip_newlines();
        let result = if self.check(&TokenKind::KwCase)
            && !matches!(
                self.peek_kind(),
                TokenKind::KwClass | TokenKind::KwObject
            ) {
            let cases = self.case_clauses()?;
            Ok(Term::new(
                TermKind::PartialFunction { cases },
                self.origin_from(start),
            ))
        } else {
            let stats = self.block_stats(false)?;
            Ok(Term::new(
                TermKind::Block { stats },
                self.origin_from(start),
            ))
        };
        self.cursor.pop_region();
        let term = result?;
        self.cursor.skip_newlines();
        self.accept(&TokenKind::RBrace)?;
        // Reattach the closing brace to the node span.
        let mut term = term;
        term.origin = self.origin_from(start);
        Ok(term)
    }

    /// A partial function literal in braces or as an indented `case`
    /// block (the right-hand side of a `match` operator).
    pub(crate) fn partial_function_literal(&mut self) -> Result<Term, ParseError> {
        let start = self.note_pos();
        if self.check(&TokenKind::LBrace) {
            let t = self.block_literal(start)?;
            return match t.kind {
                TermKind::PartialFunction { .. } => Ok(t),
                _ => Err(ParseError::new(
                    ErrorCode::E1041,
                    "match statement requires cases",
                    t.origin.span,
                )),
            };
        }
        self.cursor.newline_opt_when_followed_by(&TokenKind::LBrace);
        if self.check(&TokenKind::LBrace) {
            return self.partial_function_literal();
        }
        self.cursor.observe_indented();
        if self.cursor.at_indent() {
            self.advance();
            let cases = self.case_clauses()?;
            if self.cursor.at_outdent() {
                self.advance();
            }
            return Ok(Term::new(
                TermKind::PartialFunction { cases },
                self.origin_from(start),
            ));
        }
        Err(ParseError::new(
            ErrorCode::E1041,
            "match statement requires cases",
            self.current_span(),
        ))
    }

    // --- Literals ---

    /// Decode the current literal token. `negated` folds a preceding `-`
    /// into numeric literals.
    pub(crate) fn literal(&mut self, negated: bool) -> Result<Lit, ParseError> {
        let span = self.current_span();
        let lit = match self.current_kind().clone() {
            TokenKind::IntLit(name) => Lit::Int(self.decode_int(name, negated, span)?),
            TokenKind::LongLit(name) => Lit::Long(self.decode_long(name, negated, span)?),
            TokenKind::FloatLit(name) => {
                self.check_float_range(name, span)?;
                Lit::Float(self.signed_literal_text(name, negated))
            }
            TokenKind::DoubleLit(name) => {
                self.check_double_range(name, span)?;
                Lit::Double(self.signed_literal_text(name, negated))
            }
            TokenKind::CharLit(c) => Lit::Char(c),
            TokenKind::StringLit(name) => Lit::String(name),
            TokenKind::SymbolLit(name) => Lit::Symbol(name),
            TokenKind::KwTrue => Lit::Bool(true),
            TokenKind::KwFalse => Lit::Bool(false),
            TokenKind::KwNull => Lit::Null,
            other => {
                return Err(ParseError::new(
                    ErrorCode::E1002,
                    format!("`literal` expected but `{}` found", other.display_name()),
                    span,
                ))
            }
        };
        self.advance();
        Ok(lit)
    }

    fn signed_literal_text(&self, name: vela_ir::Name, negated: bool) -> vela_ir::Name {
        if !negated {
            return name;
        }
        self.interner
            .with_str(name, |text| self.interner.intern(&format!("-{text}")))
    }

    // --- Interpolation ---

    /// Interpolated string in term position.
    pub(crate) fn interpolate_term(&mut self, start: u32) -> Result<Term, ParseError> {
        let (prefix, parts, args) = self.interpolate_parts(|p| p.splice_arg_term())?;
        Ok(Term::new(
            TermKind::Interpolate {
                prefix,
                parts,
                args,
            },
            self.origin_from(start),
        ))
    }

    /// Interpolated string in pattern position.
    pub(crate) fn interpolate_pat(&mut self, start: u32) -> Result<Pat, ParseError> {
        let (prefix, parts, args) = self.interpolate_parts(|p| p.splice_arg_pat())?;
        Ok(Pat::new(
            PatKind::Interpolate {
                prefix,
                parts,
                args,
            },
            self.origin_from(start),
        ))
    }

    /// Shared interpolation machinery: `InterpId InterpStart (Part
    /// (Splice Part)*)? InterpEnd`, with the argument parser supplied by
    /// the caller.
    fn interpolate_parts<A>(
        &mut self,
        mut parse_arg: impl FnMut(&mut Self) -> Result<A, ParseError>,
    ) -> Result<(Ident, Vec<Lit>, Vec<A>), ParseError> {
        let prefix = match *self.current_kind() {
            TokenKind::InterpId(name) => {
                let at = self.cursor.pos() as u32;
                let origin = self.origin(at as usize, at as usize);
                self.advance();
                Ident::new(name, origin)
            }
            _ => {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    "`interpolator` expected",
                    self.current_span(),
                ))
            }
        };
        self.accept(&TokenKind::InterpStart)?;
        let mut parts = Vec::new();
        let mut args = Vec::new();
        loop {
            match self.current_kind().clone() {
                TokenKind::InterpPart(name) => {
                    parts.push(Lit::String(name));
                    self.advance();
                }
                TokenKind::InterpSpliceStart => {
                    self.advance();
                    args.push(parse_arg(self)?);
                    self.accept(&TokenKind::InterpSpliceEnd)?;
                }
                TokenKind::InterpEnd => {
                    self.advance();
                    break;
                }
                other => {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        format!(
                            "`interpolation part` expected but `{}` found",
                            other.display_name()
                        ),
                        self.current_span(),
                    ))
                }
            }
        }
        Ok((prefix, parts, args))
    }

    /// One spliced term: a bare name or a block of statements.
    fn splice_arg_term(&mut self) -> Result<Term, ParseError> {
        let start = self.note_pos();
        if matches!(self.current_kind(), TokenKind::Ident(_))
            && matches!(self.peek_kind(), TokenKind::InterpSpliceEnd)
        {
            let name = self.ident()?;
            return Ok(Term::new(TermKind::Name(name.name), name.origin));
        }
        if matches!(self.current_kind(), TokenKind::KwThis) {
            self.advance();
            return Ok(Term::new(
                TermKind::This { qual: None },
                self.origin_from(start),
            ));
        }
        let mut stats = self.block_stats(false)?;
        let origin = self.origin_from(start);
        if stats.len() == 1 && matches!(stats[0].kind, StatKind::Term(_)) {
            if let StatKind::Term(term) = stats.remove(0).kind {
                return Ok(*term);
            }
        }
        Ok(Term::new(TermKind::Block { stats }, origin))
    }

    /// One spliced pattern: a bare binder name or a full pattern.
    fn splice_arg_pat(&mut self) -> Result<Pat, ParseError> {
        let start = self.note_pos();
        if let TokenKind::Ident(name) = *self.current_kind() {
            if matches!(self.peek_kind(), TokenKind::InterpSpliceEnd) {
                self.advance();
                return Ok(Pat::new(PatKind::Var { name }, self.origin_from(start)));
            }
        }
        self.pattern(PatMode::NoSeq)
    }

    // --- XML ---

    /// XML literal in term position.
    pub(crate) fn xml_term(&mut self, start: u32) -> Result<Term, ParseError> {
        let (parts, args) = self.xml_parts(|p| {
            let start = p.note_pos();
            let stats = p.block_stats(false)?;
            let origin = p.origin_from(start);
            Ok(Term::new(TermKind::Block { stats }, origin))
        })?;
        Ok(Term::new(
            TermKind::Xml { parts, args },
            self.origin_from(start),
        ))
    }

    /// XML literal in pattern position.
    pub(crate) fn xml_pat(&mut self, start: u32) -> Result<Pat, ParseError> {
        let (parts, args) = self.xml_parts(|p| p.pattern(PatMode::XmlSeqOk))?;
        Ok(Pat::new(
            PatKind::Xml { parts, args },
            self.origin_from(start),
        ))
    }

    fn xml_parts<A>(
        &mut self,
        mut parse_arg: impl FnMut(&mut Self) -> Result<A, ParseError>,
    ) -> Result<(Vec<Lit>, Vec<A>), ParseError> {
        self.accept(&TokenKind::XmlStart)?;
        let mut parts = Vec::new();
        let mut args = Vec::new();
        loop {
            match self.current_kind().clone() {
                TokenKind::XmlPart(name) => {
                    parts.push(Lit::String(name));
                    self.advance();
                }
                TokenKind::XmlSpliceStart => {
                    self.advance();
                    args.push(parse_arg(self)?);
                    self.accept(&TokenKind::XmlSpliceEnd)?;
                }
                TokenKind::XmlEnd => {
                    self.advance();
                    break;
                }
                other => {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        format!("`XML part` expected but `{}` found", other.display_name()),
                        self.current_span(),
                    ))
                }
            }
        }
        Ok((parts, args))
    }

    // --- Macro quote / splice ---

    /// `'{ block }`, `'[ type ]`, or `'ident`.
    fn quote_expr(&mut self, start: u32) -> Result<Term, ParseError> {
        self.require_dialect(self.dialect.allow_macro_quotes, "macro quotes")?;
        self.accept(&TokenKind::MacroQuote)?;
        if self.check(&TokenKind::LBrace) {
            self.quote_depth += 1;
            let body = self.block_literal(start);
            self.quote_depth -= 1;
            return Ok(Term::new(
                TermKind::QuotedExpr {
                    body: Box::new(body?),
                },
                self.origin_from(start),
            ));
        }
        if self.check(&TokenKind::LBracket) {
            let tpe = self.in_brackets(|p| p.typ())?;
            return Ok(Term::new(
                TermKind::QuotedType { tpe: Box::new(tpe) },
                self.origin_from(start),
            ));
        }
        let name = self.ident()?;
        let body = Term::new(TermKind::Name(name.name), name.origin);
        Ok(Term::new(
            TermKind::QuotedExpr {
                body: Box::new(body),
            },
            self.origin_from(start),
        ))
    }

    /// `${ block }`.
    fn splice_expr(&mut self, start: u32) -> Result<Term, ParseError> {
        self.require_dialect(self.dialect.allow_macro_quotes, "macro splices")?;
        self.accept(&TokenKind::MacroSplice)?;
        let body = self.block_literal(self.note_pos())?;
        Ok(Term::new(
            TermKind::SplicedExpr {
                body: Box::new(body),
            },
            self.origin_from(start),
        ))
    }

    /// `new Init`, `new Init with ... { ... }`, `new { ... }`.
    fn new_expr(&mut self, start: u32) -> Result<Term, ParseError> {
        self.accept(&TokenKind::KwNew)?;
        if self.check(&TokenKind::LBrace) {
            let templ = self.template_body_only()?;
            return Ok(Term::new(
                TermKind::NewAnonymous { templ },
                self.origin_from(start),
            ));
        }
        let init = self.init_clause(true)?;
        if matches!(self.current_kind(), TokenKind::KwWith | TokenKind::LBrace) {
            let templ = self.anonymous_template_rest(init)?;
            return Ok(Term::new(
                TermKind::NewAnonymous { templ },
                self.origin_from(start),
            ));
        }
        Ok(Term::new(TermKind::New { init }, self.origin_from(start)))
    }
}
