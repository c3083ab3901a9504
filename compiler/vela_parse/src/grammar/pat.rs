//! Pattern parsing.
//!
//! Levels: `pattern` (alternation) → `pattern1` (ascription) → `pattern2`
//! (`@`-binding) → `pattern3` (infix via the shared engine) →
//! `simple_pattern`. All levels thread an explicit [`PatMode`] carrying
//! the sequence context.

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{Case, Ident, Lit, Origin, Pat, PatKind, StatKind, Term, TermKind, Type, TypeKind};
use vela_ir::{Name, TokenKind};

use crate::classifier::{is_pat_intro, is_symbolic_char};
use crate::error::ParseError;
use crate::grammar::PatMode;
use crate::infix::{PatInfixContext, UnfinishedInfix};
use crate::Parser;

impl Parser<'_> {
    /// Full pattern: alternation with `|`.
    pub(crate) fn pattern(&mut self, mode: PatMode) -> Result<Pat, ParseError> {
        let start = self.note_pos();
        let mut lhs = self.pattern1(mode)?;
        while self.at_soft_kw(self.soft.pipe) {
            self.advance();
            let rhs = self.pattern1(mode)?;
            lhs = Pat::new(
                PatKind::Alternative {
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                self.origin_from(start),
            );
        }
        Ok(lhs)
    }

    /// Optional type ascription.
    fn pattern1(&mut self, mode: PatMode) -> Result<Pat, ParseError> {
        let start = self.note_pos();
        let p = self.pattern2(mode)?;
        if self.check(&TokenKind::Colon) {
            self.advance();
            let tpe = self.pattern_typ()?;
            return Ok(Pat::new(
                PatKind::Typed {
                    lhs: Box::new(p),
                    rhs: Box::new(tpe),
                },
                self.origin_from(start),
            ));
        }
        Ok(p)
    }

    /// Optional `@`-binding.
    fn pattern2(&mut self, mode: PatMode) -> Result<Pat, ParseError> {
        let start = self.note_pos();
        if self.check(&TokenKind::At) {
            // `@` cannot begin a pattern.
            return Err(ParseError::new(
                ErrorCode::E1005,
                "`pattern` expected but `@` found",
                self.current_span(),
            ));
        }

        if matches!(self.peek_kind(), TokenKind::At) {
            if let TokenKind::Ident(name) = *self.current_kind() {
                if self.bindable_name(name) {
                    let lhs_start = self.note_pos();
                    self.advance();
                    let lhs = Pat::new(PatKind::Var { name }, self.origin_from(lhs_start));
                    self.accept(&TokenKind::At)?;
                    let rhs = self.pattern3(mode)?;
                    return Ok(Pat::new(
                        PatKind::Bind {
                            lhs: Box::new(lhs),
                            rhs: Box::new(rhs),
                        },
                        self.origin_from(start),
                    ));
                }
            }
            if self.check(&TokenKind::Underscore) {
                self.advance();
                let lhs = Pat::new(PatKind::Wildcard, self.origin_from(start));
                self.accept(&TokenKind::At)?;
                let rhs = self.pattern3(mode)?;
                return Ok(Pat::new(
                    PatKind::Bind {
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                    },
                    self.origin_from(start),
                ));
            }
        }
        self.pattern3(mode)
    }

    /// A name usable as a binder before `@`: lower-case always, any case
    /// under the dialect flag.
    fn bindable_name(&self, name: Name) -> bool {
        self.interner.with_str(name, |text| {
            let Some(first) = text.chars().next() else {
                return false;
            };
            if is_symbolic_char(first) {
                return false;
            }
            first.is_lowercase()
                || first == '_'
                || self.dialect.allow_upper_case_pattern_var_binding
        })
    }

    /// Infix patterns via the shared engine.
    fn pattern3(&mut self, mode: PatMode) -> Result<Pat, ParseError> {
        let ctx = PatInfixContext;
        let mut stack: Vec<UnfinishedInfix<Pat>> = Vec::new();
        let base = 0;
        let chain_start = self.note_pos();
        let mut lhs_start = chain_start;
        let mut lhs = self.simple_pattern(mode)?;

        loop {
            // `_ *` at the end of a sequence context is the sequence
            // wildcard, not an infix operator.
            if matches!(lhs.kind, PatKind::Wildcard) && self.at_soft_kw(self.soft.star) {
                return self.seq_wildcard(mode, lhs_start, &stack, lhs);
            }

            let Some(op) = self.pattern_op() else { break };
            let lhs_end = self.last_pos();
            self.advance();
            self.cursor.newline_opt_when_following(is_pat_intro);

            lhs = self.reduce_stack(&ctx, &mut stack, base, lhs, lhs_end, Some(&op))?;
            stack.push(UnfinishedInfix {
                lhs_start,
                lhs,
                lhs_end,
                op,
                targs: Vec::new(),
            });
            lhs_start = self.note_pos();
            lhs = self.simple_pattern(mode)?;
        }

        let rhs_end = self.last_pos();
        self.reduce_stack(&ctx, &mut stack, base, lhs, rhs_end, None)
    }

    /// Current token as a pattern infix operator: any identifier except
    /// `|` (alternation) and `*` (handled as the sequence wildcard),
    /// followed by a pattern.
    fn pattern_op(&self) -> Option<Ident> {
        let TokenKind::Ident(name) = *self.current_kind() else {
            return None;
        };
        if name == self.soft.pipe || name == self.soft.star {
            return None;
        }
        if !is_pat_intro(self.peek_kind()) {
            return None;
        }
        let at = self.cursor.pos() as u32;
        Some(Ident::new(name, Origin::new(at, at + 1, self.current_span())))
    }

    fn seq_wildcard(
        &mut self,
        mode: PatMode,
        lhs_start: u32,
        stack: &[UnfinishedInfix<Pat>],
        _wildcard: Pat,
    ) -> Result<Pat, ParseError> {
        let star_span = self.current_span();
        let closer_follows = matches!(
            self.peek_kind(),
            TokenKind::RParen | TokenKind::RBrace | TokenKind::Eof
        );
        if !mode.seq_ok() || !stack.is_empty() {
            return Err(ParseError::new(
                ErrorCode::E1043,
                "bad use of _* (sequence pattern must be last)",
                star_span,
            ));
        }
        if !closer_follows {
            return Err(ParseError::new(
                ErrorCode::E1043,
                "bad brace or paren after _*",
                star_span,
            ));
        }
        self.advance();
        Ok(Pat::new(PatKind::SeqWildcard, self.origin_from(lhs_start)))
    }

    /// Simple patterns: wildcards, literals, extractors, stable
    /// references, variables, tuples, interpolations, XML, unquotes.
    pub(crate) fn simple_pattern(&mut self, mode: PatMode) -> Result<Pat, ParseError> {
        let start = self.note_pos();
        match self.current_kind().clone() {
            TokenKind::Underscore => {
                self.advance();
                Ok(Pat::new(PatKind::Wildcard, self.origin_from(start)))
            }
            TokenKind::LParen => {
                let mut args = self.in_parens(|p| {
                    p.comma_series(&TokenKind::RParen, |p| p.pattern(PatMode::NoSeq))
                })?;
                let origin = self.origin_from(start);
                match args.len() {
                    0 => Ok(Pat::new(PatKind::Lit(Lit::Unit), origin)),
                    1 => Ok(args.remove(0)),
                    _ => Ok(Pat::new(PatKind::Tuple { args }, origin)),
                }
            }
            TokenKind::InterpId(_) => self.interpolate_pat(start),
            TokenKind::XmlStart => self.xml_pat(start),
            TokenKind::Unquote => {
                let quasi = self.unquote()?;
                Ok(Pat::new(PatKind::Quasi(quasi), self.origin_from(start)))
            }
            TokenKind::MacroQuote => {
                self.require_dialect(self.dialect.allow_macro_quotes, "quoted patterns")?;
                self.quoted_pattern_depth += 1;
                let body = self.simple_expr(false);
                self.quoted_pattern_depth -= 1;
                Ok(Pat::new(
                    PatKind::Macro {
                        body: Box::new(body?),
                    },
                    self.origin_from(start),
                ))
            }
            TokenKind::Ident(name) if self.negated_literal_ahead(name) => {
                self.advance();
                let lit = self.literal(true)?;
                Ok(Pat::new(PatKind::Lit(lit), self.origin_from(start)))
            }
            kind if kind.is_literal() => {
                let lit = self.literal(false)?;
                Ok(Pat::new(PatKind::Lit(lit), self.origin_from(start)))
            }
            TokenKind::Ident(_) | TokenKind::QuotedIdent(_) | TokenKind::KwThis => {
                self.extractor_or_ref(start)
            }
            other => Err(ParseError::new(
                ErrorCode::E1005,
                format!("`pattern` expected but `{}` found", other.display_name()),
                self.current_span(),
            )),
        }
    }

    pub(crate) fn negated_literal_ahead(&self, name: Name) -> bool {
        name == self.soft.minus
            && matches!(
                self.peek_kind(),
                TokenKind::IntLit(_)
                    | TokenKind::LongLit(_)
                    | TokenKind::FloatLit(_)
                    | TokenKind::DoubleLit(_)
            )
    }

    /// Extractors, stable references, and pattern variables, all starting
    /// from a path.
    fn extractor_or_ref(&mut self, start: u32) -> Result<Pat, ParseError> {
        let plain_var = matches!(self.current_kind(), TokenKind::Ident(name)
            if self.is_variable_name(*name))
            && !matches!(
                self.peek_kind(),
                TokenKind::Dot | TokenKind::LParen | TokenKind::LBracket
            );
        if plain_var {
            let TokenKind::Ident(name) = *self.current_kind() else {
                unreachable!("checked above");
            };
            self.advance();
            return Ok(Pat::new(PatKind::Var { name }, self.origin_from(start)));
        }

        let path = self.stable_ref()?;
        let targs = if self.check(&TokenKind::LBracket) {
            self.type_args()?
        } else {
            Vec::new()
        };
        if self.check(&TokenKind::LParen) {
            let args = self.in_parens(|p| {
                p.comma_series(&TokenKind::RParen, |p| p.pattern(PatMode::SeqOk))
            })?;
            return Ok(Pat::new(
                PatKind::Extract {
                    fun: Box::new(path),
                    targs,
                    args,
                },
                self.origin_from(start),
            ));
        }
        if !targs.is_empty() {
            return Err(ParseError::new(
                ErrorCode::E1005,
                "`(` expected but type arguments found in pattern",
                self.current_span(),
            ));
        }
        Ok(Pat::new(
            PatKind::Ref {
                path: Box::new(path),
            },
            self.origin_from(start),
        ))
    }

    /// Variable-vs-name rule for a plain identifier in pattern position.
    fn is_variable_name(&self, name: Name) -> bool {
        self.interner.with_str(name, |text| {
            match text.chars().next() {
                Some(c) if c.is_lowercase() || c == '_' => true,
                _ => false,
            }
        })
    }

    /// Ascribed pattern types: arrows stay with the enclosing case, so
    /// only infix types are admitted; lower-case names become type
    /// variables.
    fn pattern_typ(&mut self) -> Result<Type, ParseError> {
        let t = self.infix_type()?;
        Ok(self.close_pattern_type(t))
    }

    fn close_pattern_type(&self, t: Type) -> Type {
        let Type { kind, origin } = t;
        let kind = match kind {
            TypeKind::Name(name) if self.is_variable_name(name) => TypeKind::Var { name },
            TypeKind::Apply { tpe, args } => TypeKind::Apply {
                tpe,
                args: args
                    .into_iter()
                    .map(|a| self.close_pattern_type(a))
                    .collect(),
            },
            TypeKind::Tuple { args } => TypeKind::Tuple {
                args: args
                    .into_iter()
                    .map(|a| self.close_pattern_type(a))
                    .collect(),
            },
            other => other,
        };
        Type::new(kind, origin)
    }

    // --- Case clauses ---

    /// One `pat if guard => body` clause (after `case` is consumed).
    pub(crate) fn case_clause(&mut self) -> Result<Case, ParseError> {
        let start = self.note_pos();
        let pat = self.pattern(PatMode::NoSeq)?;
        let cond = self.guard()?;
        self.accept(&TokenKind::FatArrow)?;
        let body = self.case_body()?;
        Ok(Case {
            pat,
            cond,
            body,
            origin: self.origin_from(start),
        })
    }

    /// Optional `if cond` guard.
    pub(crate) fn guard(&mut self) -> Result<Option<Term>, ParseError> {
        if self.accept_opt(&TokenKind::KwIf) {
            let cond = self.postfix_expr(false)?;
            Ok(Some(cond))
        } else {
            Ok(None)
        }
    }

    /// A case body: block statements up to the next case or the end of
    /// the enclosing sequence, collapsed to the bare term when singular.
    fn case_body(&mut self) -> Result<Term, ParseError> {
        let start = self.note_pos();
        self.cursor.skip_newlines();
        self.cursor.observe_indented();
        let indented = self.cursor.at_indent();
        if indented {
            self.advance();
        }
        let mut stats = self.block_stats(true)?;
        if indented && self.cursor.at_outdent() {
            self.advance();
        }
        let origin = self.origin_from(start);
        if stats.len() == 1 && matches!(stats[0].kind, StatKind::Term(_)) {
            if let StatKind::Term(term) = stats.remove(0).kind {
                return Ok(*term);
            }
        }
        Ok(Term::new(TermKind::Block { stats }, origin))
    }

    /// `case ... => ...` clauses inside braces or an indented block.
    pub(crate) fn case_clauses(&mut self) -> Result<Vec<Case>, ParseError> {
        let mut cases = Vec::new();
        self.cursor.skip_newlines();
        while self.check(&TokenKind::KwCase) {
            self.advance();
            cases.push(self.case_clause()?);
            self.cursor.skip_newlines();
        }
        if cases.is_empty() {
            return Err(ParseError::new(
                ErrorCode::E1041,
                "match statement requires cases",
                self.current_span(),
            ));
        }
        Ok(cases)
    }
}
