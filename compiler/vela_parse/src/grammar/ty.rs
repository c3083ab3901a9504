//! Type parsing.
//!
//! `typ()` dispatches on the current token. Parenthesized heads resolve
//! incrementally into tuple, function, or dependent function types;
//! bracketed heads introduce type lambdas and polymorphic function types;
//! everything else flows through the infix chain with the same precedence
//! and associativity rules as terms.

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{Ident, Origin, TermParam, Type, TypeBounds, TypeCase, TypeKind};
use vela_ir::TokenKind;

use crate::classifier::is_type_intro;
use crate::error::ParseError;
use crate::infix::{is_right_assoc, precedence};
use crate::Parser;

/// One element of a parenthesized type head.
enum ParenTypeElem {
    Plain(Type),
    Typed(TermParam),
}

impl Parser<'_> {
    /// Parse a type.
    pub(crate) fn typ(&mut self) -> Result<Type, ParseError> {
        let start = self.note_pos();
        if self.check(&TokenKind::LBracket) && self.dialect.allow_type_lambdas {
            return self.type_lambda(start);
        }
        let head = if self.check(&TokenKind::LParen) {
            match self.paren_type_head(start)? {
                ParenHead::Done(t) => return Ok(t),
                ParenHead::Continue(t) => self.infix_type_rest(t, start, 0)?,
            }
        } else {
            self.infix_type()?
        };
        self.typ_suffix(head, start)
    }

    fn typ_suffix(&mut self, head: Type, start: u32) -> Result<Type, ParseError> {
        if self.accept_opt(&TokenKind::FatArrow) {
            let res = self.typ()?;
            return Ok(Type::new(
                TypeKind::Function {
                    params: vec![head],
                    res: Box::new(res),
                },
                self.origin_from(start),
            ));
        }
        if self.check(&TokenKind::CtxArrow) {
            self.require_dialect(
                self.dialect.allow_context_function_types,
                "context function types",
            )?;
            self.advance();
            let res = self.typ()?;
            return Ok(Type::new(
                TypeKind::ContextFunction {
                    params: vec![head],
                    res: Box::new(res),
                },
                self.origin_from(start),
            ));
        }
        if self.check(&TokenKind::KwForSome) {
            self.advance();
            let stats = self.in_braces(|p| p.refine_stats())?;
            return Ok(Type::new(
                TypeKind::Existential {
                    tpe: Box::new(head),
                    stats,
                },
                self.origin_from(start),
            ));
        }
        if self.check(&TokenKind::KwMatch) && self.dialect.allow_type_lambdas {
            return self.match_type_suffix(head, start);
        }
        Ok(head)
    }

    /// `[X] =>> T` or `[X] => T`.
    fn type_lambda(&mut self, start: u32) -> Result<Type, ParseError> {
        let tparams = self.type_param_clause()?;
        if self.accept_opt(&TokenKind::TypeLambdaArrow) {
            let body = self.typ()?;
            return Ok(Type::new(
                TypeKind::Lambda {
                    tparams,
                    body: Box::new(body),
                },
                self.origin_from(start),
            ));
        }
        self.require_dialect(
            self.dialect.allow_polymorphic_function_types,
            "polymorphic function types",
        )?;
        self.accept(&TokenKind::FatArrow)?;
        let res = self.typ()?;
        if !matches!(
            res.kind,
            TypeKind::Function { .. } | TypeKind::ContextFunction { .. } | TypeKind::PolyFunction { .. }
        ) {
            return Err(ParseError::new(
                ErrorCode::E1003,
                "polymorphic function type must have a function type as its result",
                res.origin.span,
            ));
        }
        Ok(Type::new(
            TypeKind::PolyFunction {
                tparams,
                res: Box::new(res),
            },
            self.origin_from(start),
        ))
    }

    /// Parse a parenthesized type head, resolving function vs dependent
    /// function vs tuple incrementally.
    fn paren_type_head(&mut self, start: u32) -> Result<ParenHead, ParseError> {
        let elems = self.in_parens(|p| {
            p.comma_series(&TokenKind::RParen, |p| p.paren_type_elem())
        })?;

        let typed_count = elems
            .iter()
            .filter(|e| matches!(e, ParenTypeElem::Typed(_)))
            .count();

        let arrow = if self.check(&TokenKind::FatArrow) {
            Some(false)
        } else if self.check(&TokenKind::CtxArrow) {
            Some(true)
        } else {
            None
        };

        match arrow {
            Some(contextual) => {
                if contextual {
                    self.require_dialect(
                        self.dialect.allow_context_function_types,
                        "context function types",
                    )?;
                }
                self.advance();
                let res = self.typ()?;
                let origin = self.origin_from(start);
                if typed_count == 0 {
                    let params = elems
                        .into_iter()
                        .map(|e| match e {
                            ParenTypeElem::Plain(t) => t,
                            ParenTypeElem::Typed(_) => unreachable!("typed_count == 0"),
                        })
                        .collect();
                    let kind = if contextual {
                        TypeKind::ContextFunction {
                            params,
                            res: Box::new(res),
                        }
                    } else {
                        TypeKind::Function {
                            params,
                            res: Box::new(res),
                        }
                    };
                    Ok(ParenHead::Done(Type::new(kind, origin)))
                } else if typed_count == elems.len() {
                    self.require_dialect(
                        self.dialect.allow_dependent_function_types,
                        "dependent function types",
                    )?;
                    let params = elems
                        .into_iter()
                        .map(|e| match e {
                            ParenTypeElem::Typed(p) => p,
                            ParenTypeElem::Plain(_) => unreachable!("all typed"),
                        })
                        .collect();
                    Ok(ParenHead::Done(Type::new(
                        TypeKind::DependentFunction {
                            params,
                            res: Box::new(res),
                        },
                        origin,
                    )))
                } else {
                    Err(self.mixed_function_syntax_error())
                }
            }
            None => {
                if typed_count > 0 {
                    return Err(self.mixed_function_syntax_error());
                }
                let mut types: Vec<Type> = elems
                    .into_iter()
                    .map(|e| match e {
                        ParenTypeElem::Plain(t) => t,
                        ParenTypeElem::Typed(_) => unreachable!("typed_count == 0"),
                    })
                    .collect();
                let origin = self.origin_from(start);
                let head = if types.len() == 1 {
                    types.remove(0)
                } else {
                    Type::new(TypeKind::Tuple { args: types }, origin)
                };
                let head = self.simple_type_rest(head, start)?;
                Ok(ParenHead::Continue(head))
            }
        }
    }

    #[cold]
    fn mixed_function_syntax_error(&self) -> ParseError {
        ParseError::new(
            ErrorCode::E1040,
            "can't mix function type and dependent function type syntaxes",
            self.current_span(),
        )
    }

    fn paren_type_elem(&mut self) -> Result<ParenTypeElem, ParseError> {
        // `name: T` is a typed parameter; anything else is a plain type.
        if matches!(self.current_kind(), TokenKind::Ident(_))
            && matches!(self.peek_kind(), TokenKind::Colon)
        {
            let start = self.note_pos();
            let name = self.ident()?;
            self.accept(&TokenKind::Colon)?;
            let tpe = self.param_type()?;
            return Ok(ParenTypeElem::Typed(TermParam {
                mods: Vec::new(),
                name: Some(name),
                decltpe: Some(tpe),
                default: None,
                origin: self.origin_from(start),
            }));
        }
        Ok(ParenTypeElem::Plain(self.param_type()?))
    }

    /// Infix type chain: `A op B op C` with term precedence rules.
    pub(crate) fn infix_type(&mut self) -> Result<Type, ParseError> {
        let start = self.note_pos();
        let lhs = self.refined_type()?;
        self.infix_type_rest(lhs, start, 0)
    }

    /// Continue an infix chain whose left-hand side is already parsed.
    fn infix_type_rest(
        &mut self,
        mut lhs: Type,
        lhs_start: u32,
        min_prec: u8,
    ) -> Result<Type, ParseError> {
        while let Some((op, prec, right)) = self.peek_type_op() {
            if prec < min_prec {
                break;
            }
            self.advance();
            let rhs_start = self.note_pos();
            let mut rhs = self.refined_type()?;
            loop {
                match self.peek_type_op() {
                    Some((_, p2, r2)) if p2 == prec && r2 != right => {
                        return Err(ParseError::new(
                            ErrorCode::E1061,
                            "left- and right-associative operators with same precedence may not be mixed",
                            self.current_span(),
                        ));
                    }
                    Some((_, p2, _)) if p2 > prec => {
                        rhs = self.infix_type_rest(rhs, rhs_start, prec + 1)?;
                    }
                    Some((_, p2, r2)) if p2 == prec && r2 && right => {
                        rhs = self.infix_type_rest(rhs, rhs_start, prec)?;
                    }
                    _ => break,
                }
            }
            lhs = Type::new(
                TypeKind::ApplyInfix {
                    lhs: Box::new(lhs),
                    op,
                    rhs: Box::new(rhs),
                },
                self.origin_from(lhs_start),
            );
        }
        Ok(lhs)
    }

    /// Current token as an infix type operator: an identifier followed by
    /// something that can begin a type.
    fn peek_type_op(&self) -> Option<(Ident, u8, bool)> {
        let TokenKind::Ident(name) = *self.current_kind() else {
            return None;
        };
        if !is_type_intro(self.peek_kind()) {
            return None;
        }
        let (prec, right) = self
            .interner
            .with_str(name, |text| (precedence(text), is_right_assoc(text)));
        let at = self.cursor.pos() as u32;
        let op = Ident::new(
            name,
            Origin::new(at, at + 1, self.current_span()),
        );
        Some((op, prec, right))
    }

    /// Compound type: `A with B { decls }`.
    fn refined_type(&mut self) -> Result<Type, ParseError> {
        let start = self.note_pos();
        let mut t = if self.check(&TokenKind::LBrace) {
            // Bare structural refinement.
            let stats = self.in_braces(|p| p.refine_stats())?;
            Type::new(
                TypeKind::Refine { tpe: None, stats },
                self.origin_from(start),
            )
        } else {
            self.annot_type()?
        };
        loop {
            if self.check(&TokenKind::KwWith)
                && !matches!(self.peek_kind(), TokenKind::LBrace | TokenKind::Indent)
            {
                self.advance();
                let rhs = self.annot_type()?;
                t = Type::new(
                    TypeKind::With {
                        lhs: Box::new(t),
                        rhs: Box::new(rhs),
                    },
                    self.origin_from(start),
                );
            } else if self.check(&TokenKind::LBrace) {
                let stats = self.in_braces(|p| p.refine_stats())?;
                t = Type::new(
                    TypeKind::Refine {
                        tpe: Some(Box::new(t)),
                        stats,
                    },
                    self.origin_from(start),
                );
            } else {
                break;
            }
        }
        Ok(t)
    }

    /// Simple type with annotations: `T @annot`.
    fn annot_type(&mut self) -> Result<Type, ParseError> {
        let start = self.note_pos();
        let t = self.simple_type()?;
        if self.check(&TokenKind::At) {
            let annots = self.annotations(true)?;
            return Ok(Type::new(
                TypeKind::Annotate {
                    tpe: Box::new(t),
                    annots,
                },
                self.origin_from(start),
            ));
        }
        Ok(t)
    }

    /// Simple types: paths, projections, applications, wildcards,
    /// literals, tuples, unquotes.
    pub(crate) fn simple_type(&mut self) -> Result<Type, ParseError> {
        let start = self.note_pos();
        let t = match self.current_kind().clone() {
            TokenKind::LParen => {
                let mut types =
                    self.in_parens(|p| p.comma_series(&TokenKind::RParen, |p| p.typ()))?;
                let origin = self.origin_from(start);
                if types.len() == 1 {
                    types.remove(0)
                } else {
                    Type::new(TypeKind::Tuple { args: types }, origin)
                }
            }
            TokenKind::Underscore => {
                self.advance();
                let bounds = self.type_bounds()?;
                Type::new(TypeKind::Wildcard { bounds }, self.origin_from(start))
            }
            TokenKind::Ident(name)
                if self.dialect.allow_question_mark_type_wildcard && name == self.soft.question =>
            {
                self.advance();
                let bounds = self.type_bounds()?;
                Type::new(TypeKind::Wildcard { bounds }, self.origin_from(start))
            }
            TokenKind::Unquote => {
                let quasi = self.unquote()?;
                Type::new(TypeKind::Quasi(quasi), self.origin_from(start))
            }
            kind if kind.is_literal() && self.dialect.allow_literal_types => {
                let lit = self.literal(false)?;
                Type::new(TypeKind::Literal(lit), self.origin_from(start))
            }
            TokenKind::Ident(name) if self.literal_type_negation(name) => {
                self.advance();
                let lit = self.literal(true)?;
                Type::new(TypeKind::Literal(lit), self.origin_from(start))
            }
            TokenKind::Ident(_) | TokenKind::QuotedIdent(_) | TokenKind::KwThis
            | TokenKind::KwSuper => self.path_type()?,
            other => {
                return Err(ParseError::new(
                    ErrorCode::E1003,
                    format!("`type` expected but `{}` found", other.display_name()),
                    self.current_span(),
                ))
            }
        };
        self.simple_type_rest(t, start)
    }

    fn literal_type_negation(&self, name: vela_ir::Name) -> bool {
        self.dialect.allow_literal_types
            && name == self.soft.minus
            && matches!(
                self.peek_kind(),
                TokenKind::IntLit(_)
                    | TokenKind::LongLit(_)
                    | TokenKind::FloatLit(_)
                    | TokenKind::DoubleLit(_)
            )
    }

    /// Projections and applications after a simple type.
    fn simple_type_rest(&mut self, mut t: Type, start: u32) -> Result<Type, ParseError> {
        loop {
            if self.check(&TokenKind::Hash) {
                self.advance();
                let name = self.ident()?;
                t = Type::new(
                    TypeKind::Project {
                        qual: Box::new(t),
                        name,
                    },
                    self.origin_from(start),
                );
            } else if self.check(&TokenKind::LBracket) {
                let args = self.type_args()?;
                t = Type::new(
                    TypeKind::Apply {
                        tpe: Box::new(t),
                        args,
                    },
                    self.origin_from(start),
                );
            } else {
                return Ok(t);
            }
        }
    }

    /// Stable-path types: `a.b.C`, `a.b.type`, `this.T`, `super[M].T`.
    fn path_type(&mut self) -> Result<Type, ParseError> {
        let start = self.note_pos();

        if matches!(self.current_kind(), TokenKind::KwThis | TokenKind::KwSuper)
            || (matches!(self.current_kind(), TokenKind::Ident(_))
                && matches!(self.peek_kind(), TokenKind::Dot)
                && self.this_or_super_after_dot())
        {
            let qual = self.this_or_super_ref()?;
            if self.accept_opt(&TokenKind::Dot) {
                if self.accept_opt(&TokenKind::KwType) {
                    return Ok(Type::new(
                        TypeKind::Singleton {
                            reference: Box::new(qual),
                        },
                        self.origin_from(start),
                    ));
                }
                return self.path_type_segments(Some(qual), start);
            }
            return Ok(Type::new(
                TypeKind::Singleton {
                    reference: Box::new(qual),
                },
                self.origin_from(start),
            ));
        }

        self.path_type_segments(None, start)
    }

    fn this_or_super_after_dot(&self) -> bool {
        // `C.this...` / `C.super...`: only worth the committed parse when
        // the token after the dot really is `this`/`super`.
        matches!(
            self.cursor.peek_nth_kind(2),
            TokenKind::KwThis | TokenKind::KwSuper
        )
    }

    fn path_type_segments(
        &mut self,
        qual: Option<vela_ir::ast::Term>,
        start: u32,
    ) -> Result<Type, ParseError> {
        let mut qual = qual;
        let mut pending = self.ident()?;
        loop {
            if self.check(&TokenKind::Dot) {
                match self.peek_kind() {
                    TokenKind::KwType => {
                        self.advance();
                        self.advance();
                        let reference = self.fold_path_segment(qual, pending, start);
                        return Ok(Type::new(
                            TypeKind::Singleton {
                                reference: Box::new(reference),
                            },
                            self.origin_from(start),
                        ));
                    }
                    TokenKind::Ident(_) | TokenKind::QuotedIdent(_) => {
                        self.advance();
                        qual = Some(self.fold_path_segment(qual, pending, start));
                        pending = self.ident()?;
                    }
                    _ => break,
                }
            } else {
                break;
            }
        }
        let origin = self.origin_from(start);
        let kind = match qual {
            Some(qual) => TypeKind::Select {
                qual: Box::new(qual),
                name: pending,
            },
            None => TypeKind::Name(pending.name),
        };
        Ok(Type::new(kind, origin))
    }

    fn fold_path_segment(
        &self,
        qual: Option<vela_ir::ast::Term>,
        name: Ident,
        start: u32,
    ) -> vela_ir::ast::Term {
        use vela_ir::ast::{Term, TermKind};
        match qual {
            None => Term::new(TermKind::Name(name.name), name.origin),
            Some(qual) => {
                let origin = self.origin(start as usize, name.origin.token_end as usize - 1);
                Term::new(
                    TermKind::Select {
                        qual: Box::new(qual),
                        name,
                    },
                    origin,
                )
            }
        }
    }

    /// Type argument clause `[T, U]`.
    pub(crate) fn type_args(&mut self) -> Result<Vec<Type>, ParseError> {
        self.in_brackets(|p| p.comma_series(&TokenKind::RBracket, |p| p.typ()))
    }

    /// Parameter-position type: `=> T` by-name, `T*` repeated.
    pub(crate) fn param_type(&mut self) -> Result<Type, ParseError> {
        let start = self.note_pos();
        if self.accept_opt(&TokenKind::FatArrow) {
            let t = self.typ()?;
            return Ok(Type::new(
                TypeKind::ByName { tpe: Box::new(t) },
                self.origin_from(start),
            ));
        }
        let t = self.typ()?;
        if self.at_soft_kw(self.soft.star) {
            self.advance();
            return Ok(Type::new(
                TypeKind::Repeated { tpe: Box::new(t) },
                self.origin_from(start),
            ));
        }
        Ok(t)
    }

    /// `>: lo <: hi` bounds, both optional, in that order.
    pub(crate) fn type_bounds(&mut self) -> Result<TypeBounds, ParseError> {
        let mut bounds = TypeBounds::none();
        if self.accept_opt(&TokenKind::Supertype) {
            bounds.lo = Some(Box::new(self.typ()?));
        }
        if self.accept_opt(&TokenKind::Subtype) {
            bounds.hi = Some(Box::new(self.typ()?));
        }
        Ok(bounds)
    }

    /// `T match { case P => Q ... }`.
    fn match_type_suffix(&mut self, head: Type, start: u32) -> Result<Type, ParseError> {
        self.accept(&TokenKind::KwMatch)?;
        self.cursor.newline_opt_when_followed_by(&TokenKind::LBrace);
        let cases = self.in_braces(|p| {
            let mut cases = Vec::new();
            while p.check(&TokenKind::KwCase) {
                let case_start = p.note_pos();
                p.advance();
                let pat = p.infix_type()?;
                p.accept(&TokenKind::FatArrow)?;
                let body = p.typ()?;
                cases.push(TypeCase {
                    pat,
                    body,
                    origin: p.origin_from(case_start),
                });
                p.cursor.skip_newlines();
            }
            Ok(cases)
        })?;
        if cases.is_empty() {
            return Err(ParseError::new(
                ErrorCode::E1041,
                "match statement requires cases",
                self.current_span(),
            ));
        }
        Ok(Type::new(
            TypeKind::Match {
                tpe: Box::new(head),
                cases,
            },
            self.origin_from(start),
        ))
    }

    /// Hard error when the active dialect does not allow a construct.
    pub(crate) fn require_dialect(
        &self,
        allowed: bool,
        construct: &str,
    ) -> Result<(), ParseError> {
        if allowed {
            Ok(())
        } else {
            Err(ParseError::dialect_forbidden(
                self.dialect.name,
                construct,
                self.current_span(),
            ))
        }
    }
}

enum ParenHead {
    /// A complete function/dependent function type.
    Done(Type),
    /// A tuple or parenthesized head; the infix chain continues.
    Continue(Type),
}
