//! Expression parsing.
//!
//! - `mod.rs`: entry point (`expr`), assignment/ascription/lambda layer,
//!   and the postfix/infix chain driving the shared engine
//! - `primary.rs`: simple expressions, literals, interpolation, XML,
//!   quote/splice, blocks
//! - `control.rs`: `if`/`while`/`for`/`try`/`do`/`throw`/`return`

mod control;
mod primary;

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{ClauseMode, Ident, Lit, Mod, ModKind, Origin, Quasi, Term, TermKind, TermParam};
use vela_ir::{Name, TokenKind};

use crate::classifier::{is_expr_intro, is_symbolic_char};
use crate::error::ParseError;
use crate::grammar::Location;
use crate::infix::{TermInfixContext, UnfinishedInfix};
use crate::Parser;

impl Parser<'_> {
    /// Parse an expression at the given statement location.
    ///
    /// `allow_repeated` permits the `x: _*` vararg splice, which is only
    /// legal directly inside argument lists.
    pub(crate) fn expr(
        &mut self,
        location: Location,
        allow_repeated: bool,
    ) -> Result<Term, ParseError> {
        let start = self.note_pos();
        match self.current_kind() {
            TokenKind::KwIf => self.if_expr(start),
            TokenKind::KwWhile => self.while_expr(start),
            TokenKind::KwFor => self.for_expr(start),
            TokenKind::KwTry => self.try_expr(start),
            TokenKind::KwThrow => self.throw_expr(start),
            TokenKind::KwReturn => self.return_expr(start),
            TokenKind::KwDo => self.do_expr(start),
            TokenKind::KwImplicit => self.implicit_lambda(start, location),
            _ => self.expr_rest(start, location, allow_repeated),
        }
    }

    /// The assignment / ascription / lambda layer over the postfix chain.
    fn expr_rest(
        &mut self,
        start: u32,
        location: Location,
        allow_repeated: bool,
    ) -> Result<Term, ParseError> {
        // A parenthesized head that is provably a parameter clause (the
        // closing paren is followed by an arrow) parses as a lambda
        // directly; this resolves `()`, `(x)`, `(x: T)`, `(using x: T)`,
        // and tuples-of-params.
        if self.check(&TokenKind::LParen) && self.lambda_params_ahead() {
            return self.paren_lambda(start, location);
        }

        let mut t = self.postfix_expr(allow_repeated)?;

        if !self.dialect.allow_match_as_operator {
            while self.check(&TokenKind::KwMatch) {
                t = self.match_clause(t, start)?;
            }
        }

        if self.check(&TokenKind::Eq) && self.assignable(&t) {
            self.advance();
            let rhs = self.expr(Location::NoStat, false)?;
            return Ok(Term::new(
                TermKind::Assign {
                    lhs: Box::new(t),
                    rhs: Box::new(rhs),
                },
                self.origin_from(start),
            ));
        }

        if self.check(&TokenKind::Colon) {
            t = self.ascription(t, start, location, allow_repeated)?;
        }

        if matches!(self.current_kind(), TokenKind::FatArrow | TokenKind::CtxArrow) {
            return self.lambda_from(t, start, location);
        }

        Ok(t)
    }

    fn assignable(&self, t: &Term) -> bool {
        matches!(
            t.kind,
            TermKind::Name(_)
                | TermKind::Select { .. }
                | TermKind::Apply { .. }
                | TermKind::ApplyUsing { .. }
        )
    }

    /// `t: @annots`, `t: _*`, or `t: T`.
    fn ascription(
        &mut self,
        t: Term,
        start: u32,
        location: Location,
        allow_repeated: bool,
    ) -> Result<Term, ParseError> {
        self.accept(&TokenKind::Colon)?;
        if self.check(&TokenKind::At) {
            let annots = self.annotations(true)?;
            return Ok(Term::new(
                TermKind::Annotate {
                    expr: Box::new(t),
                    annots,
                },
                self.origin_from(start),
            ));
        }
        if self.check(&TokenKind::Underscore) && self.star_follows_underscore() {
            if !allow_repeated {
                return Err(ParseError::new(
                    ErrorCode::E1043,
                    "repeated argument not allowed here",
                    self.current_span(),
                ));
            }
            self.advance();
            self.advance();
            return Ok(Term::new(
                TermKind::Repeated { expr: Box::new(t) },
                self.origin_from(start),
            ));
        }
        // At statement level the arrow after `x: T` belongs to a lambda,
        // so only infix types are admitted there; a full function type
        // ascription needs expression position.
        let tpe = if location == Location::NoStat {
            self.typ()?
        } else {
            self.infix_type()?
        };
        Ok(Term::new(
            TermKind::Ascribe {
                expr: Box::new(t),
                tpe: Box::new(tpe),
            },
            self.origin_from(start),
        ))
    }

    fn star_follows_underscore(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Ident(name) if *name == self.soft.star)
    }

    // --- Lambdas ---

    /// Whether a parenthesized parameter clause followed by an arrow
    /// begins here. Pure lookahead; the cursor is restored.
    fn lambda_params_ahead(&mut self) -> bool {
        self.look_ahead(|p| p.lambda_param_clause().is_ok())
    }

    fn paren_lambda(&mut self, start: u32, location: Location) -> Result<Term, ParseError> {
        let (params, _mode) = self.lambda_param_clause()?;
        let contextual = self.check(&TokenKind::CtxArrow);
        if contextual {
            self.require_dialect(
                self.dialect.allow_context_function_types,
                "context function literals",
            )?;
        }
        self.advance();
        let body = self.lambda_body(location)?;
        let kind = if contextual {
            TermKind::ContextFunction {
                params,
                body: Box::new(body),
            }
        } else {
            TermKind::Function {
                params,
                body: Box::new(body),
            }
        };
        Ok(Term::new(kind, self.origin_from(start)))
    }

    /// Parse `(param, ...)` and require an arrow after the close paren.
    fn lambda_param_clause(&mut self) -> Result<(Vec<TermParam>, ClauseMode), ParseError> {
        let mut mode = ClauseMode::Plain;
        let params = self.in_parens(|p| {
            if p.dialect.allow_given_using && p.at_soft_kw(p.soft.using) {
                p.advance();
                mode = ClauseMode::Using;
            } else if p.check(&TokenKind::KwImplicit) {
                p.advance();
                mode = ClauseMode::Implicit;
            }
            p.comma_series(&TokenKind::RParen, |p| p.lambda_param(mode))
        })?;
        if !matches!(
            self.current_kind(),
            TokenKind::FatArrow | TokenKind::CtxArrow
        ) {
            return Err(ParseError::new(
                ErrorCode::E1001,
                format!(
                    "`=>` expected but `{}` found",
                    self.current_kind().display_name()
                ),
                self.current_span(),
            ));
        }
        Ok((params, mode))
    }

    fn lambda_param(&mut self, mode: ClauseMode) -> Result<TermParam, ParseError> {
        let start = self.note_pos();
        let mut mods = Vec::new();
        match mode {
            ClauseMode::Using => mods.push(Mod::new(ModKind::Using, self.origin_here())),
            ClauseMode::Implicit => mods.push(Mod::new(ModKind::Implicit, self.origin_here())),
            ClauseMode::Plain => {}
        }
        let name = if self.accept_opt(&TokenKind::Underscore) {
            None
        } else {
            Some(self.ident()?)
        };
        let decltpe = if self.accept_opt(&TokenKind::Colon) {
            Some(self.param_type()?)
        } else {
            None
        };
        Ok(TermParam {
            mods,
            name,
            decltpe,
            default: None,
            origin: self.origin_from(start),
        })
    }

    /// Build a lambda whose parameters came from an already-parsed term.
    fn lambda_from(&mut self, t: Term, start: u32, location: Location) -> Result<Term, ParseError> {
        let contextual = self.check(&TokenKind::CtxArrow);
        if contextual {
            self.require_dialect(
                self.dialect.allow_context_function_types,
                "context function literals",
            )?;
        }
        self.advance();
        let params = self.convert_to_params(t)?;
        let body = self.lambda_body(location)?;
        let kind = if contextual {
            TermKind::ContextFunction {
                params,
                body: Box::new(body),
            }
        } else {
            TermKind::Function {
                params,
                body: Box::new(body),
            }
        };
        Ok(Term::new(kind, self.origin_from(start)))
    }

    /// A lambda body at block/template level extends to the end of the
    /// enclosing statement sequence.
    fn lambda_body(&mut self, location: Location) -> Result<Term, ParseError> {
        match location {
            Location::BlockStat | Location::TemplateStat => {
                let start = self.note_pos();
                self.cursor.observe_indented();
                if self.cursor.at_indent() {
                    return self.indented_block(start);
                }
                self.cursor.skip_newlines();
                let mut stats = self.block_stats(false)?;
                let origin = self.origin_from(start);
                if stats.len() == 1 {
                    if let vela_ir::ast::StatKind::Term(term) = &stats[0].kind {
                        let term = (**term).clone();
                        let _ = stats.pop();
                        return Ok(term);
                    }
                }
                Ok(Term::new(TermKind::Block { stats }, origin))
            }
            _ => self.indentable_expr(),
        }
    }

    /// Rewrite a term into a formal parameter list.
    pub(crate) fn convert_to_params(&self, t: Term) -> Result<Vec<TermParam>, ParseError> {
        match t.kind {
            TermKind::Lit(Lit::Unit) => Ok(Vec::new()),
            TermKind::Tuple { args } => args
                .into_iter()
                .map(|arg| self.convert_to_param(arg))
                .collect(),
            _ => Ok(vec![self.convert_to_param(t)?]),
        }
    }

    fn convert_to_param(&self, t: Term) -> Result<TermParam, ParseError> {
        let origin = t.origin;
        match t.kind {
            TermKind::Name(name) => Ok(TermParam {
                mods: Vec::new(),
                name: Some(Ident::new(name, origin)),
                decltpe: None,
                default: None,
                origin,
            }),
            TermKind::Placeholder => Ok(TermParam {
                mods: Vec::new(),
                name: None,
                decltpe: None,
                default: None,
                origin,
            }),
            TermKind::Ascribe { expr, tpe } => {
                let mut param = self.convert_to_param(*expr)?;
                param.decltpe = Some(*tpe);
                param.origin = origin;
                Ok(param)
            }
            _ => Err(ParseError::new(
                ErrorCode::E1042,
                "not a legal formal parameter",
                origin.span,
            )),
        }
    }

    /// `implicit x => body`.
    fn implicit_lambda(&mut self, start: u32, location: Location) -> Result<Term, ParseError> {
        self.accept(&TokenKind::KwImplicit)?;
        let param_start = self.note_pos();
        let name = self.ident()?;
        let decltpe = if self.accept_opt(&TokenKind::Colon) {
            Some(self.param_type()?)
        } else {
            None
        };
        let param = TermParam {
            mods: vec![Mod::new(ModKind::Implicit, self.origin(start as usize, start as usize))],
            name: Some(name),
            decltpe,
            default: None,
            origin: self.origin_from(param_start),
        };
        self.accept(&TokenKind::FatArrow)?;
        let body = self.lambda_body(location)?;
        Ok(Term::new(
            TermKind::Function {
                params: vec![param],
                body: Box::new(body),
            },
            self.origin_from(start),
        ))
    }

    // --- Postfix / infix chain ---

    /// Postfix expression: one prefix expression, then an operator chain
    /// reduced through the shared engine.
    pub(crate) fn postfix_expr(&mut self, allow_repeated: bool) -> Result<Term, ParseError> {
        let ctx = TermInfixContext;
        let mut stack: Vec<UnfinishedInfix<Vec<Term>>> = Vec::new();
        let chain_start = self.note_pos();
        let mut lhs_start = chain_start;
        let mut lhs: Vec<Term> = vec![self.prefix_expr(allow_repeated)?];

        loop {
            if self.at_leading_infix() {
                self.advance();
            }

            if self.check(&TokenKind::KwMatch) && self.dialect.allow_match_as_operator {
                let lhs_end = self.last_pos();
                let at = self.cursor.pos() as u32;
                let op = Ident::new(
                    self.soft.match_op,
                    Origin::new(at, at + 1, self.current_span()),
                );
                self.advance();
                lhs = vec![self.make_term_operand(lhs, lhs_start, lhs_end)];
                let reduced =
                    self.reduce_stack(&ctx, &mut stack, 0, lhs, lhs_end, Some(&op))?;
                stack.push(UnfinishedInfix {
                    lhs_start,
                    lhs: reduced,
                    lhs_end,
                    op,
                    targs: Vec::new(),
                });
                lhs_start = self.note_pos();
                let pf = self.partial_function_literal()?;
                lhs = vec![pf];
                continue;
            }

            let Some(op) = self.term_op() else { break };
            let lhs_end = self.last_pos();
            self.advance();

            let targs = if self.check(&TokenKind::LBracket) {
                self.type_args()?
            } else {
                Vec::new()
            };

            self.cursor.newline_opt_when_following(is_expr_intro);

            if !is_expr_intro(self.current_kind()) {
                // Chain terminates as a postfix application: `t op`.
                if !targs.is_empty() {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        "type application is not allowed in postfix position",
                        self.current_span(),
                    ));
                }
                let reduced = self.reduce_stack(&ctx, &mut stack, 0, lhs, lhs_end, None)?;
                let operand = self.make_term_operand(reduced, chain_start, lhs_end);
                let origin = self.origin_from(chain_start);
                lhs = vec![Term::new(
                    TermKind::ApplyPostfix {
                        operand: Box::new(operand),
                        op,
                    },
                    origin,
                )];
                lhs_start = chain_start;
                continue;
            }

            let reduced = self.reduce_stack(&ctx, &mut stack, 0, lhs, lhs_end, Some(&op))?;
            stack.push(UnfinishedInfix {
                lhs_start,
                lhs: reduced,
                lhs_end,
                op,
                targs,
            });
            lhs_start = self.note_pos();
            lhs = self.argument_exprs_or_prefix_expr(allow_repeated)?;
        }

        let rhs_end = self.last_pos();
        let reduced = self.reduce_stack(&ctx, &mut stack, 0, lhs, rhs_end, None)?;
        Ok(self.make_term_operand(reduced, chain_start, rhs_end))
    }

    /// Current token as a term infix operator. `then` closes a bare
    /// condition rather than acting as an operator.
    fn term_op(&self) -> Option<Ident> {
        let TokenKind::Ident(name) = *self.current_kind() else {
            return None;
        };
        if self.condition_depth > 0 && name == self.soft.then {
            return None;
        }
        let at = self.cursor.pos() as u32;
        Some(Ident::new(name, Origin::new(at, at + 1, self.current_span())))
    }

    /// A symbolic operator opening a continuation line under significant
    /// indentation.
    fn at_leading_infix(&self) -> bool {
        if !self.dialect.allow_significant_indentation
            || !matches!(self.current_kind(), TokenKind::Newline)
        {
            return false;
        }
        let TokenKind::Ident(name) = self.cursor.peek_kind() else {
            return false;
        };
        if !self
            .interner
            .with_str(*name, |s| s.starts_with(is_symbolic_char))
        {
            return false;
        }
        is_expr_intro(self.cursor.peek_nth_kind(2))
    }

    /// Right-hand side of an infix operator: an argument list when `{` or
    /// `(` follows, a single prefix expression otherwise.
    fn argument_exprs_or_prefix_expr(
        &mut self,
        allow_repeated: bool,
    ) -> Result<Vec<Term>, ParseError> {
        match self.current_kind() {
            TokenKind::LBrace => {
                let start = self.note_pos();
                Ok(vec![self.block_literal(start)?])
            }
            TokenKind::LParen => {
                let (args, using) = self.argument_exprs()?;
                if using {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        "`using` argument lists are not allowed in infix position",
                        self.current_span(),
                    ));
                }
                Ok(args)
            }
            _ => Ok(vec![self.prefix_expr(allow_repeated)?]),
        }
    }

    /// Prefix expression: `-`, `+`, `~`, `!` applications, with numeric
    /// literal negation folded into the literal.
    pub(crate) fn prefix_expr(&mut self, allow_repeated: bool) -> Result<Term, ParseError> {
        let start = self.note_pos();
        if let TokenKind::Ident(name) = *self.current_kind() {
            if self.is_unary_op(name) && is_expr_intro(self.peek_kind()) {
                if self.negated_literal_ahead(name) {
                    self.advance();
                    let lit = self.literal(true)?;
                    return Ok(Term::new(TermKind::Lit(lit), self.origin_from(start)));
                }
                let at = self.cursor.pos() as u32;
                let op = Ident::new(name, Origin::new(at, at + 1, self.current_span()));
                self.advance();
                let arg = self.simple_expr(allow_repeated)?;
                return Ok(Term::new(
                    TermKind::ApplyUnary {
                        op,
                        arg: Box::new(arg),
                    },
                    self.origin_from(start),
                ));
            }
        }
        self.simple_expr(allow_repeated)
    }

    fn is_unary_op(&self, name: Name) -> bool {
        name == self.soft.minus
            || name == self.soft.plus
            || name == self.soft.tilde
            || name == self.soft.bang
    }

    // --- Paths ---

    /// Stable reference: `a.b.c`, `this.x`, `C.super[M].x`.
    pub(crate) fn stable_ref(&mut self) -> Result<Term, ParseError> {
        let start = self.note_pos();
        let mut t = if matches!(self.current_kind(), TokenKind::KwThis | TokenKind::KwSuper)
            || (matches!(self.current_kind(), TokenKind::Ident(_))
                && matches!(self.peek_kind(), TokenKind::Dot)
                && matches!(
                    self.cursor.peek_nth_kind(2),
                    TokenKind::KwThis | TokenKind::KwSuper
                ))
        {
            let head = self.this_or_super_ref()?;
            if matches!(head.kind, TermKind::Super { .. }) {
                // `super` must select a member.
                self.accept(&TokenKind::Dot)?;
                let name = self.ident()?;
                Term::new(
                    TermKind::Select {
                        qual: Box::new(head),
                        name,
                    },
                    self.origin_from(start),
                )
            } else {
                head
            }
        } else {
            let name = self.ident()?;
            Term::new(TermKind::Name(name.name), name.origin)
        };

        while self.check(&TokenKind::Dot)
            && matches!(
                self.peek_kind(),
                TokenKind::Ident(_) | TokenKind::QuotedIdent(_)
            )
        {
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
        Ok(t)
    }

    /// `[qual.]this` or `[qual.]super[mix]`.
    pub(crate) fn this_or_super_ref(&mut self) -> Result<Term, ParseError> {
        let start = self.note_pos();
        let qual = if let TokenKind::Ident(name) = *self.current_kind() {
            self.advance();
            self.accept(&TokenKind::Dot)?;
            Some(name)
        } else {
            None
        };
        if self.accept_opt(&TokenKind::KwThis) {
            return Ok(Term::new(
                TermKind::This { qual },
                self.origin_from(start),
            ));
        }
        self.accept(&TokenKind::KwSuper)?;
        let super_qual = if self.check(&TokenKind::LBracket) {
            Some(self.in_brackets(|p| p.ident_name())?)
        } else {
            None
        };
        Ok(Term::new(
            TermKind::Super {
                this_qual: qual,
                super_qual,
            },
            self.origin_from(start),
        ))
    }

    // --- Quasiquote unquotes ---

    /// `$name` or `${ expr }` under a quasiquote dialect.
    pub(crate) fn unquote(&mut self) -> Result<Quasi, ParseError> {
        self.accept(&TokenKind::Unquote)?;
        if self.check(&TokenKind::LBrace) {
            let start = self.note_pos();
            let body = self.block_literal(start)?;
            return Ok(Quasi::new(body));
        }
        let name = self.ident()?;
        let term = Term::new(TermKind::Name(name.name), name.origin);
        Ok(Quasi::new(term))
    }

    /// An expression that may be an indented block.
    pub(crate) fn indentable_expr(&mut self) -> Result<Term, ParseError> {
        let start = self.note_pos();
        self.cursor.observe_indented();
        if self.cursor.at_indent() {
            return self.indented_block(start);
        }
        self.expr(Location::NoStat, false)
    }

    /// Consume a pending `Indent`, the block statements, and the matching
    /// `Outdent`.
    pub(crate) fn indented_block(&mut self, start: u32) -> Result<Term, ParseError> {
        self.advance();
        let stats = self.block_stats(false)?;
        if self.cursor.at_outdent() {
            self.advance();
        }
        Ok(Term::new(
            TermKind::Block { stats },
            self.origin_from(start),
        ))
    }
}
