//! Definitions, declarations, modifiers, imports and exports.

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::ast::{
    Annotation, ClauseMode, Ctor, Decl, DeclKind, Defn, DefnKind, Export, Ident, Import, Importee,
    ImporteeKind, Importer, Init, Mod, ModKind, MultiSource, Origin, ParamClause, Pat, PatKind,
    PrimaryCtor, Source, Stat, StatKind, Term, TermKind, TermParam, Type, TypeKind, TypeParam,
};
use vela_ir::{Name, TokenKind};

use crate::error::ParseError;
use crate::grammar::{Location, PatMode, TemplateOwner};
use crate::Parser;

/// Where a statement appears, for dispatch differences.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum StatCtx {
    Top,
    Template(TemplateOwner),
    Block,
}

impl Parser<'_> {
    // --- Sources ---

    pub(crate) fn source(&mut self) -> Result<Source, ParseError> {
        let start = self.note_pos();
        self.skip_stat_seps();
        let stats = self.top_stat_seq()?;
        Ok(Source {
            stats,
            origin: self.origin_from(start),
        })
    }

    /// Interactive input: sources delimited by an `@` standing alone on a
    /// line.
    pub(crate) fn repl_sources(&mut self) -> Result<MultiSource, ParseError> {
        let mut sources = Vec::new();
        loop {
            let start = self.note_pos();
            let mut stats = Vec::new();
            self.skip_stat_seps();
            while !self.cursor.is_at_end() && !self.at_repl_delimiter() {
                stats.push(self.statement(StatCtx::Top)?);
                if self.cursor.is_at_end() || self.at_repl_delimiter() {
                    break;
                }
                self.accept_stat_sep()?;
                if self.at_repl_delimiter() {
                    break;
                }
            }
            sources.push(Source {
                stats,
                origin: self.origin_from(start),
            });
            if self.at_repl_delimiter() {
                self.advance();
                self.skip_stat_seps();
                continue;
            }
            break;
        }
        Ok(MultiSource { sources })
    }

    fn at_repl_delimiter(&self) -> bool {
        self.check(&TokenKind::At) && self.cursor.has_line_break_after(self.cursor.pos())
    }

    fn top_stat_seq(&mut self) -> Result<Vec<Stat>, ParseError> {
        let mut stats = Vec::new();
        self.skip_stat_seps();
        while !self.cursor.is_at_end() && !self.check(&TokenKind::RBrace) {
            stats.push(self.statement(StatCtx::Top)?);
            if self.cursor.is_at_end() || self.check(&TokenKind::RBrace) {
                break;
            }
            self.accept_stat_sep()?;
            if self.cursor.is_at_end() {
                break;
            }
        }
        Ok(stats)
    }

    /// One statement for the `parse_stat` entry point.
    pub(crate) fn single_stat(&mut self) -> Result<Stat, ParseError> {
        self.skip_stat_seps();
        self.statement(StatCtx::Template(TemplateOwner::Class))
    }

    /// Statement dispatch shared by top level, templates, and blocks.
    pub(crate) fn statement(&mut self, ctx: StatCtx) -> Result<Stat, ParseError> {
        let start = self.note_pos();
        match self.current_kind() {
            TokenKind::KwPackage if ctx == StatCtx::Top => self.package_stat(start),
            TokenKind::KwImport => self.import_stmt(start),
            TokenKind::KwExport => self.export_stmt(start),
            _ if self.at_end_marker() => self.end_marker(start),
            _ if self.at_defn_intro() => self.def_stat(ctx, start),
            _ => {
                let location = match ctx {
                    StatCtx::Top | StatCtx::Template(_) => Location::TemplateStat,
                    StatCtx::Block => Location::BlockStat,
                };
                let term = self.expr(location, false)?;
                let origin = self.origin_from(start);
                Ok(Stat::new(StatKind::Term(Box::new(term)), origin))
            }
        }
    }

    fn package_stat(&mut self, start: u32) -> Result<Stat, ParseError> {
        self.accept(&TokenKind::KwPackage)?;
        if self.check(&TokenKind::KwObject) {
            self.advance();
            let name = self.ident()?;
            let templ = self.template_opt(TemplateOwner::Object)?;
            return Ok(Stat::new(
                StatKind::PkgObject {
                    mods: Vec::new(),
                    name,
                    templ,
                },
                self.origin_from(start),
            ));
        }
        let reference = self.stable_ref()?;
        self.cursor.newline_opt_when_followed_by(&TokenKind::LBrace);
        let stats = if self.check(&TokenKind::LBrace) {
            self.in_braces(|p| p.top_stat_seq())?
        } else {
            self.skip_stat_seps();
            self.top_stat_seq()?
        };
        Ok(Stat::new(
            StatKind::Pkg {
                reference: Box::new(reference),
                stats,
            },
            self.origin_from(start),
        ))
    }

    // --- Block statements ---

    pub(crate) fn block_stats(&mut self, in_case: bool) -> Result<Vec<Stat>, ParseError> {
        let mut stats = Vec::new();
        self.skip_stat_seps();
        loop {
            self.cursor.observe_outdented();
            if self.at_block_seq_end(in_case) {
                break;
            }
            stats.push(self.statement(StatCtx::Block)?);
            self.cursor.observe_outdented();
            if self.at_block_seq_end(in_case) {
                break;
            }
            self.accept_stat_sep()?;
        }
        Ok(stats)
    }

    fn at_block_seq_end(&self, in_case: bool) -> bool {
        match self.current_kind() {
            TokenKind::RBrace | TokenKind::Eof | TokenKind::Outdent | TokenKind::RParen => true,
            TokenKind::KwCase if in_case => {
                !matches!(self.peek_kind(), TokenKind::KwClass | TokenKind::KwObject)
            }
            TokenKind::InterpSpliceEnd | TokenKind::XmlSpliceEnd => true,
            _ => false,
        }
    }

    // --- End markers ---

    /// `end name` / `end if` as a statement of its own line.
    pub(crate) fn at_end_marker(&self) -> bool {
        if !self.dialect.allow_end_markers || !self.at_soft_kw(self.soft.end) {
            return false;
        }
        let marked = matches!(
            self.peek_kind(),
            TokenKind::Ident(_)
                | TokenKind::KwIf
                | TokenKind::KwWhile
                | TokenKind::KwFor
                | TokenKind::KwMatch
                | TokenKind::KwTry
                | TokenKind::KwNew
                | TokenKind::KwThis
                | TokenKind::KwVal
                | TokenKind::KwGiven
        );
        marked
            && (self.cursor.has_line_break_after(self.cursor.peek_index())
                || matches!(
                    self.cursor.peek_nth_kind(2),
                    TokenKind::Eof | TokenKind::RBrace | TokenKind::Semicolon
                ))
    }

    fn end_marker(&mut self, start: u32) -> Result<Stat, ParseError> {
        self.advance();
        let name = match self.current_kind().clone() {
            TokenKind::Ident(name) => name,
            kind if kind.is_keyword() => self.interner.intern(kind.display_name()),
            other => {
                return Err(ParseError::new(
                    ErrorCode::E1062,
                    format!("`identifier` expected but `{}` found", other.display_name()),
                    self.current_span(),
                ))
            }
        };
        self.advance();
        Ok(Stat::new(
            StatKind::EndMarker { name },
            self.origin_from(start),
        ))
    }

    // --- Annotations and modifiers ---

    /// `@init` annotations. `allow_args` permits argument lists (false
    /// only where an expression would be ambiguous).
    pub(crate) fn annotations(&mut self, allow_args: bool) -> Result<Vec<Annotation>, ParseError> {
        let mut annots = Vec::new();
        while self.check(&TokenKind::At) {
            let start = self.note_pos();
            self.advance();
            let init = self.annotation_init(allow_args)?;
            annots.push(Annotation {
                init,
                origin: self.origin_from(start),
            });
            self.cursor.skip_newlines();
        }
        Ok(annots)
    }

    fn annotation_init(&mut self, allow_args: bool) -> Result<Init, ParseError> {
        let start = self.note_pos();
        let tpe = self.simple_type()?;
        let mut argss = Vec::new();
        while allow_args && self.check(&TokenKind::LParen) {
            let (args, _) = self.argument_exprs()?;
            argss.push(args);
        }
        Ok(Init {
            tpe,
            argss,
            origin: self.origin_from(start),
        })
    }

    /// Collect annotations and modifier keywords, rejecting repeats and
    /// illegal combinations.
    pub(crate) fn modifiers(&mut self, local: bool) -> Result<Vec<Mod>, ParseError> {
        let mut mods: Vec<Mod> = Vec::new();
        loop {
            let start = self.note_pos();
            let kind = match self.current_kind() {
                TokenKind::At => {
                    for annot in self.annotations(true)? {
                        let origin = annot.origin;
                        mods.push(Mod::new(ModKind::Annot(annot), origin));
                    }
                    continue;
                }
                TokenKind::KwAbstract => Some(ModKind::Abstract),
                TokenKind::KwFinal => Some(ModKind::Final),
                TokenKind::KwSealed => Some(ModKind::Sealed),
                TokenKind::KwImplicit => Some(ModKind::Implicit),
                TokenKind::KwLazy => Some(ModKind::Lazy),
                TokenKind::KwOverride if !local => Some(ModKind::Override),
                TokenKind::KwPrivate if !local => None, // handled below
                TokenKind::KwProtected if !local => None,
                TokenKind::KwCase
                    if matches!(
                        self.peek_kind(),
                        TokenKind::KwClass | TokenKind::KwObject
                    ) =>
                {
                    Some(ModKind::Case)
                }
                _ if self.at_soft_modifier() => {
                    let kind = self.soft_modifier_kind();
                    self.advance();
                    let modifier = Mod::new(kind, self.origin_from(start));
                    self.push_modifier(&mut mods, modifier)?;
                    continue;
                }
                _ => break,
            };
            match kind {
                Some(kind) => {
                    self.advance();
                    let modifier = Mod::new(kind, self.origin_from(start));
                    self.push_modifier(&mut mods, modifier)?;
                }
                None => {
                    let is_private = self.check(&TokenKind::KwPrivate);
                    self.advance();
                    let within = self.access_qualifier()?;
                    let kind = if is_private {
                        ModKind::Private { within }
                    } else {
                        ModKind::Protected { within }
                    };
                    let modifier = Mod::new(kind, self.origin_from(start));
                    self.push_modifier(&mut mods, modifier)?;
                }
            }
            self.cursor.skip_newlines();
        }
        self.validate_modifier_combinations(&mods)?;
        Ok(mods)
    }

    fn soft_modifier_kind(&self) -> ModKind {
        if self.at_soft_kw(self.soft.inline) {
            ModKind::Inline
        } else if self.at_soft_kw(self.soft.open) {
            ModKind::Open
        } else if self.at_soft_kw(self.soft.opaque) {
            ModKind::Opaque
        } else if self.at_soft_kw(self.soft.transparent) {
            ModKind::Transparent
        } else {
            ModKind::Infix
        }
    }

    fn push_modifier(&self, mods: &mut Vec<Mod>, modifier: Mod) -> Result<(), ParseError> {
        if mods
            .iter()
            .any(|m| m.kind.same_kind(&modifier.kind) && !matches!(m.kind, ModKind::Annot(_)))
        {
            return Err(ParseError::new(
                ErrorCode::E1020,
                format!("repeated modifier `{}`", modifier.kind.display_name()),
                modifier.origin.span,
            ));
        }
        mods.push(modifier);
        Ok(())
    }

    /// The fixed table of illegal modifier pairs.
    fn validate_modifier_combinations(&self, mods: &[Mod]) -> Result<(), ParseError> {
        const ILLEGAL: &[(&str, &str)] = &[
            ("final", "abstract"),
            ("final", "sealed"),
            ("open", "sealed"),
            ("open", "final"),
            ("private", "protected"),
            ("case", "implicit"),
            ("override", "abstract"),
            ("lazy", "abstract"),
        ];
        for (a, b) in ILLEGAL {
            let has = |name: &str| {
                mods.iter().any(|m| {
                    !matches!(m.kind, ModKind::Annot(_)) && m.kind.display_name() == name
                })
            };
            if has(a) && has(b) {
                let span = mods.last().map(|m| m.origin.span).unwrap_or_default();
                return Err(ParseError::new(
                    ErrorCode::E1021,
                    format!("illegal combination of modifiers: `{a}` and `{b}`"),
                    span,
                ));
            }
        }
        Ok(())
    }

    /// `[qual]` after `private`/`protected`.
    fn access_qualifier(&mut self) -> Result<Option<Name>, ParseError> {
        if !self.check(&TokenKind::LBracket) {
            return Ok(None);
        }
        let name = self.in_brackets(|p| match p.current_kind().clone() {
            TokenKind::Ident(name) => {
                p.advance();
                Ok(name)
            }
            TokenKind::KwThis => {
                p.advance();
                Ok(p.interner.intern("this"))
            }
            other => Err(ParseError::new(
                ErrorCode::E1024,
                format!("`identifier` expected but `{}` found", other.display_name()),
                p.current_span(),
            )),
        })?;
        Ok(Some(name))
    }

    /// One modifier for the `parse_mod` entry point.
    pub(crate) fn single_modifier(&mut self) -> Result<Mod, ParseError> {
        let mut mods = self.modifiers(false)?;
        match mods.len() {
            1 => Ok(mods.remove(0)),
            0 => Err(ParseError::new(
                ErrorCode::E1022,
                format!(
                    "`modifier` expected but `{}` found",
                    self.current_kind().display_name()
                ),
                self.current_span(),
            )),
            _ => Err(ParseError::new(
                ErrorCode::E1022,
                "exactly one modifier expected",
                mods[1].origin.span,
            )),
        }
    }

    // --- Definition dispatch ---

    /// A definition statement: annotations, modifiers, then the def
    /// keyword dispatch.
    pub(crate) fn def_stat(&mut self, ctx: StatCtx, start: u32) -> Result<Stat, ParseError> {
        let mods = self.modifiers(ctx == StatCtx::Block)?;
        self.def_or_dcl(ctx, mods, start)
    }

    pub(crate) fn def_or_dcl(
        &mut self,
        ctx: StatCtx,
        mods: Vec<Mod>,
        start: u32,
    ) -> Result<Stat, ParseError> {
        match self.current_kind() {
            TokenKind::KwVal | TokenKind::KwVar => self.pat_def_or_dcl(mods, start),
            TokenKind::KwDef => {
                if matches!(self.peek_kind(), TokenKind::KwThis) {
                    if let StatCtx::Template(owner) = ctx {
                        if owner.allows_secondary_ctor() {
                            let ctor = self.secondary_ctor(mods)?;
                            let origin = self.origin_from(start);
                            return Ok(Stat::new(StatKind::Ctor(ctor), origin));
                        }
                    }
                    return Err(ParseError::new(
                        ErrorCode::E1063,
                        "secondary constructors are only allowed in class and enum bodies",
                        self.current_span(),
                    ));
                }
                self.fun_def_or_dcl(mods, start)
            }
            TokenKind::KwType => self.type_def_or_dcl(mods, start),
            TokenKind::KwClass | TokenKind::KwTrait | TokenKind::KwObject | TokenKind::KwEnum => {
                self.tmpl_def(mods, start)
            }
            TokenKind::KwCase
                if matches!(self.peek_kind(), TokenKind::KwClass | TokenKind::KwObject) =>
            {
                // `case` was not folded into mods when no other modifier
                // preceded it.
                let mut mods = mods;
                let case_start = self.note_pos();
                self.advance();
                mods.push(Mod::new(ModKind::Case, self.origin_from(case_start)));
                self.tmpl_def(mods, start)
            }
            TokenKind::KwCase => {
                if let StatCtx::Template(owner) = ctx {
                    if owner.allows_enum_cases() {
                        return self.enum_case_def(mods, start);
                    }
                }
                Err(ParseError::new(
                    ErrorCode::E1001,
                    "`case` is only allowed inside an enum body",
                    self.current_span(),
                ))
            }
            TokenKind::KwGiven => self.given_decl(mods, start),
            _ if self.dialect.allow_extension_methods && self.at_soft_kw(self.soft.extension) => {
                self.extension_group(mods, start)
            }
            other => Err(ParseError::new(
                ErrorCode::E1001,
                format!(
                    "`start of definition` expected but `{}` found",
                    other.display_name()
                ),
                self.current_span(),
            )),
        }
    }

    // --- val / var ---

    fn pat_def_or_dcl(&mut self, mods: Vec<Mod>, start: u32) -> Result<Stat, ParseError> {
        let is_var = self.check(&TokenKind::KwVar);
        self.advance();
        self.reject_misplaced_mods(&mods, is_var)?;

        let mut pats = vec![self.val_pattern()?];
        while self.accept_opt(&TokenKind::Comma) {
            pats.push(self.val_pattern()?);
        }
        let decltpe = if self.accept_opt(&TokenKind::Colon) {
            Some(self.typ()?)
        } else {
            None
        };

        if self.accept_opt(&TokenKind::Eq) {
            let rhs = self.indentable_expr()?;
            let origin = self.origin_from(start);
            let kind = if is_var {
                let rhs = match rhs.kind {
                    TermKind::Placeholder if decltpe.is_some() => None,
                    _ => Some(Box::new(rhs)),
                };
                DefnKind::Var {
                    mods,
                    pats,
                    decltpe,
                    rhs,
                }
            } else {
                DefnKind::Val {
                    mods,
                    pats,
                    decltpe,
                    rhs: Box::new(rhs),
                }
            };
            return Ok(Stat::new(StatKind::Defn(Defn::new(kind, origin)), origin));
        }

        let Some(decltpe) = decltpe else {
            return Err(ParseError::new(
                ErrorCode::E1001,
                format!(
                    "`:` expected but `{}` found",
                    self.current_kind().display_name()
                ),
                self.current_span(),
            ));
        };
        let origin = self.origin_from(start);
        let kind = if is_var {
            DeclKind::Var {
                mods,
                pats,
                decltpe: Box::new(decltpe),
            }
        } else {
            DeclKind::Val {
                mods,
                pats,
                decltpe: Box::new(decltpe),
            }
        };
        Ok(Stat::new(StatKind::Decl(Decl::new(kind, origin)), origin))
    }

    fn reject_misplaced_mods(&self, mods: &[Mod], is_var: bool) -> Result<(), ParseError> {
        for m in mods {
            match &m.kind {
                ModKind::Lazy if is_var => {
                    return Err(ParseError::new(
                        ErrorCode::E1022,
                        "lazy not allowed here. Only vals can be lazy",
                        m.origin.span,
                    ))
                }
                ModKind::Sealed => {
                    return Err(ParseError::new(
                        ErrorCode::E1022,
                        "`sealed` modifier can be used only for classes and traits",
                        m.origin.span,
                    ))
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// A pattern on the left of `val`/`var`; a bare name becomes a
    /// binder.
    fn val_pattern(&mut self) -> Result<Pat, ParseError> {
        let pat = self.pattern2_for_val()?;
        Ok(match pat.kind {
            PatKind::Ref { path } => match path.kind {
                TermKind::Name(name) => Pat::new(PatKind::Var { name }, pat.origin),
                kind => Pat::new(
                    PatKind::Ref {
                        path: Box::new(Term::new(kind, path.origin)),
                    },
                    pat.origin,
                ),
            },
            kind => Pat::new(kind, pat.origin),
        })
    }

    fn pattern2_for_val(&mut self) -> Result<Pat, ParseError> {
        self.pattern(PatMode::NoSeq)
    }

    // --- def ---

    fn fun_def_or_dcl(&mut self, mods: Vec<Mod>, start: u32) -> Result<Stat, ParseError> {
        self.accept(&TokenKind::KwDef)?;
        for m in &mods {
            if matches!(m.kind, ModKind::Lazy) {
                return Err(ParseError::new(
                    ErrorCode::E1022,
                    "lazy not allowed here. Only vals can be lazy",
                    m.origin.span,
                ));
            }
        }
        let name = self.ident()?;
        let tparams = if self.check(&TokenKind::LBracket) {
            self.type_param_clause()?
        } else {
            Vec::new()
        };
        let paramss = self.term_param_clauses(false)?;
        let decltpe = if self.accept_opt(&TokenKind::Colon) {
            Some(self.typ()?)
        } else {
            None
        };

        if self.accept_opt(&TokenKind::Eq) {
            let body = self.indentable_expr()?;
            let origin = self.origin_from(start);
            return Ok(Stat::new(
                StatKind::Defn(Defn::new(
                    DefnKind::Def {
                        mods,
                        name,
                        tparams,
                        paramss,
                        decltpe,
                        body: Box::new(body),
                    },
                    origin,
                )),
                origin,
            ));
        }

        // Procedure syntax: a body with no `=` and no result type.
        if decltpe.is_none() && self.procedure_body_ahead() {
            self.procedure_syntax_notice(name.origin.span)?;
            let body = self.block_literal(self.note_pos())?;
            let origin = self.origin_from(start);
            let unit = self.synthesized_unit_type();
            return Ok(Stat::new(
                StatKind::Defn(Defn::new(
                    DefnKind::Def {
                        mods,
                        name,
                        tparams,
                        paramss,
                        decltpe: Some(unit),
                        body: Box::new(body),
                    },
                    origin,
                )),
                origin,
            ));
        }

        let decltpe = match decltpe {
            Some(tpe) => tpe,
            None => {
                // Procedure-style declaration `def f`.
                self.procedure_syntax_notice(name.origin.span)?;
                self.synthesized_unit_type()
            }
        };
        let origin = self.origin_from(start);
        Ok(Stat::new(
            StatKind::Decl(Decl::new(
                DeclKind::Def {
                    mods,
                    name,
                    tparams,
                    paramss,
                    decltpe: Box::new(decltpe),
                },
                origin,
            )),
            origin,
        ))
    }

    fn procedure_body_ahead(&self) -> bool {
        if self.check(&TokenKind::LBrace) {
            return true;
        }
        matches!(self.current_kind(), TokenKind::Newline)
            && matches!(self.cursor.peek_past_newline(), TokenKind::LBrace)
    }

    /// Deprecation warning for procedure syntax, or a hard error when the
    /// dialect has dropped it.
    fn procedure_syntax_notice(&mut self, span: vela_ir::Span) -> Result<(), ParseError> {
        if self.dialect.allow_procedure_syntax {
            self.warn(Diagnostic::warning(
                ErrorCode::E1050,
                span,
                "procedure syntax is deprecated: add `: Unit =` to explicitly declare the result type",
            ));
            Ok(())
        } else {
            Err(ParseError::new(
                ErrorCode::E1050,
                "procedure syntax is not supported: add `: Unit =` to explicitly declare the result type",
                span,
            ))
        }
    }

    fn synthesized_unit_type(&self) -> Type {
        Type::new(TypeKind::Name(self.interner.intern("Unit")), Origin::NONE)
    }

    // --- type ---

    fn type_def_or_dcl(&mut self, mods: Vec<Mod>, start: u32) -> Result<Stat, ParseError> {
        self.accept(&TokenKind::KwType)?;
        self.cursor.skip_newlines();
        let name = self.ident()?;
        let tparams = if self.check(&TokenKind::LBracket) {
            self.type_param_clause()?
        } else {
            Vec::new()
        };
        let bounds = self.type_bounds()?;

        if self.accept_opt(&TokenKind::Eq) {
            let body = self.typ()?;
            let origin = self.origin_from(start);
            return Ok(Stat::new(
                StatKind::Defn(Defn::new(
                    DefnKind::Type {
                        mods,
                        name,
                        tparams,
                        bounds,
                        body: Box::new(body),
                    },
                    origin,
                )),
                origin,
            ));
        }
        let origin = self.origin_from(start);
        Ok(Stat::new(
            StatKind::Decl(Decl::new(
                DeclKind::Type {
                    mods,
                    name,
                    tparams,
                    bounds,
                },
                origin,
            )),
            origin,
        ))
    }

    // --- class / trait / object / enum ---

    pub(crate) fn tmpl_def(&mut self, mods: Vec<Mod>, start: u32) -> Result<Stat, ParseError> {
        let is_case = mods.iter().any(|m| matches!(m.kind, ModKind::Case));
        match self.current_kind() {
            TokenKind::KwClass => {
                self.advance();
                let owner = if is_case {
                    TemplateOwner::CaseClass
                } else {
                    TemplateOwner::Class
                };
                let name = self.ident()?;
                let tparams = if self.check(&TokenKind::LBracket) {
                    self.type_param_clause()?
                } else {
                    Vec::new()
                };
                let ctor = self.primary_ctor()?;
                let templ = self.template_opt(owner)?;
                let origin = self.origin_from(start);
                Ok(Stat::new(
                    StatKind::Defn(Defn::new(
                        DefnKind::Class {
                            mods,
                            name,
                            tparams,
                            ctor,
                            templ,
                        },
                        origin,
                    )),
                    origin,
                ))
            }
            TokenKind::KwTrait => {
                self.advance();
                let name = self.ident()?;
                let tparams = if self.check(&TokenKind::LBracket) {
                    self.type_param_clause()?
                } else {
                    Vec::new()
                };
                let ctor = if self.check(&TokenKind::LParen) {
                    self.require_dialect(self.dialect.allow_trait_parameters, "trait parameters")?;
                    self.primary_ctor()?
                } else {
                    PrimaryCtor::default()
                };
                let templ = self.template_opt(TemplateOwner::Trait)?;
                let origin = self.origin_from(start);
                Ok(Stat::new(
                    StatKind::Defn(Defn::new(
                        DefnKind::Trait {
                            mods,
                            name,
                            tparams,
                            ctor,
                            templ,
                        },
                        origin,
                    )),
                    origin,
                ))
            }
            TokenKind::KwObject => {
                self.advance();
                let name = self.ident()?;
                let templ = self.template_opt(TemplateOwner::Object)?;
                let origin = self.origin_from(start);
                Ok(Stat::new(
                    StatKind::Defn(Defn::new(DefnKind::Object { mods, name, templ }, origin)),
                    origin,
                ))
            }
            TokenKind::KwEnum => {
                self.require_dialect(self.dialect.allow_enums, "enum definitions")?;
                self.advance();
                let name = self.ident()?;
                let tparams = if self.check(&TokenKind::LBracket) {
                    self.type_param_clause()?
                } else {
                    Vec::new()
                };
                let ctor = self.primary_ctor()?;
                let templ = self.template_opt(TemplateOwner::Enum)?;
                let origin = self.origin_from(start);
                Ok(Stat::new(
                    StatKind::Defn(Defn::new(
                        DefnKind::Enum {
                            mods,
                            name,
                            tparams,
                            ctor,
                            templ,
                        },
                        origin,
                    )),
                    origin,
                ))
            }
            other => Err(ParseError::new(
                ErrorCode::E1001,
                format!(
                    "`class`, `trait`, `object`, or `enum` expected but `{}` found",
                    other.display_name()
                ),
                self.current_span(),
            )),
        }
    }

    /// Primary constructor: access modifiers plus parameter clauses.
    fn primary_ctor(&mut self) -> Result<PrimaryCtor, ParseError> {
        let start = self.note_pos();
        let mut mods = Vec::new();
        if matches!(
            self.current_kind(),
            TokenKind::KwPrivate | TokenKind::KwProtected
        ) && matches!(self.peek_kind(), TokenKind::LParen | TokenKind::LBracket)
        {
            let is_private = self.check(&TokenKind::KwPrivate);
            let mod_start = self.note_pos();
            self.advance();
            let within = self.access_qualifier()?;
            let kind = if is_private {
                ModKind::Private { within }
            } else {
                ModKind::Protected { within }
            };
            mods.push(Mod::new(kind, self.origin_from(mod_start)));
        }
        let paramss = self.term_param_clauses(true)?;
        Ok(PrimaryCtor {
            mods,
            paramss,
            origin: self.origin_from(start),
        })
    }

    // --- enum cases ---

    fn enum_case_def(&mut self, mods: Vec<Mod>, start: u32) -> Result<Stat, ParseError> {
        self.accept(&TokenKind::KwCase)?;
        let name = self.ident()?;

        if self.check(&TokenKind::Comma) {
            let mut names = vec![name];
            while self.accept_opt(&TokenKind::Comma) {
                names.push(self.ident()?);
            }
            let origin = self.origin_from(start);
            return Ok(Stat::new(
                StatKind::Defn(Defn::new(DefnKind::RepeatedEnumCase { mods, names }, origin)),
                origin,
            ));
        }

        let tparams = if self.check(&TokenKind::LBracket) {
            self.type_param_clause()?
        } else {
            Vec::new()
        };
        let ctor = self.primary_ctor()?;
        let mut inits = Vec::new();
        if self.accept_opt(&TokenKind::KwExtends) {
            inits.push(self.init_clause(true)?);
            while self.accept_opt(&TokenKind::KwWith) || self.accept_opt(&TokenKind::Comma) {
                inits.push(self.init_clause(true)?);
            }
        }
        let origin = self.origin_from(start);
        Ok(Stat::new(
            StatKind::Defn(Defn::new(
                DefnKind::EnumCase {
                    mods,
                    name,
                    tparams,
                    ctor,
                    inits,
                },
                origin,
            )),
            origin,
        ))
    }

    // --- given ---

    fn given_decl(&mut self, mods: Vec<Mod>, start: u32) -> Result<Stat, ParseError> {
        self.require_dialect(self.dialect.allow_given_using, "given definitions")?;
        self.accept(&TokenKind::KwGiven)?;

        // Speculation: `[name] [tparams] [using clauses] : type`.
        let sig = self.try_parse(|p| p.given_signature());
        if let Some((name, tparams, paramss)) = sig {
            let decltpe = self.typ()?;
            if self.check(&TokenKind::KwWith) {
                let templ = self.given_template(decltpe)?;
                let origin = self.origin_from(start);
                return Ok(Stat::new(
                    StatKind::Defn(Defn::new(
                        DefnKind::Given {
                            mods,
                            name,
                            tparams,
                            paramss,
                            templ,
                        },
                        origin,
                    )),
                    origin,
                ));
            }
            if self.accept_opt(&TokenKind::Eq) {
                let body = self.indentable_expr()?;
                let origin = self.origin_from(start);
                return Ok(Stat::new(
                    StatKind::Defn(Defn::new(
                        DefnKind::GivenAlias {
                            mods,
                            name,
                            tparams,
                            paramss,
                            decltpe: Box::new(decltpe),
                            body: Box::new(body),
                        },
                        origin,
                    )),
                    origin,
                ));
            }
            // Abstract given: must be named.
            let Some(name) = name else {
                return Err(ParseError::new(
                    ErrorCode::E1044,
                    "anonymous given cannot be abstract",
                    self.current_span(),
                ));
            };
            let origin = self.origin_from(start);
            return Ok(Stat::new(
                StatKind::Decl(Decl::new(
                    DeclKind::Given {
                        mods,
                        name,
                        tparams,
                        paramss,
                        decltpe: Box::new(decltpe),
                    },
                    origin,
                )),
                origin,
            ));
        }

        // Anonymous structural or alias form.
        let init = self.init_clause(true)?;
        if self.check(&TokenKind::KwWith) {
            let templ = self.given_template_from(init)?;
            let origin = self.origin_from(start);
            return Ok(Stat::new(
                StatKind::Defn(Defn::new(
                    DefnKind::Given {
                        mods,
                        name: None,
                        tparams: Vec::new(),
                        paramss: Vec::new(),
                        templ,
                    },
                    origin,
                )),
                origin,
            ));
        }
        if self.accept_opt(&TokenKind::Eq) {
            let body = self.indentable_expr()?;
            let origin = self.origin_from(start);
            return Ok(Stat::new(
                StatKind::Defn(Defn::new(
                    DefnKind::GivenAlias {
                        mods,
                        name: None,
                        tparams: Vec::new(),
                        paramss: Vec::new(),
                        decltpe: Box::new(init.tpe),
                        body: Box::new(body),
                    },
                    origin,
                )),
                origin,
            ));
        }
        Err(ParseError::new(
            ErrorCode::E1044,
            "anonymous given cannot be abstract",
            self.current_span(),
        ))
    }

    /// The committed prefix of a named given: fails (restoring the
    /// cursor) when no `:` follows the signature.
    fn given_signature(
        &mut self,
    ) -> Result<(Option<Ident>, Vec<TypeParam>, Vec<ParamClause>), ParseError> {
        let name = if matches!(self.current_kind(), TokenKind::Ident(_))
            && matches!(
                self.peek_kind(),
                TokenKind::Colon | TokenKind::LBracket | TokenKind::LParen
            ) {
            Some(self.ident()?)
        } else {
            None
        };
        let tparams = if self.check(&TokenKind::LBracket) {
            self.type_param_clause()?
        } else {
            Vec::new()
        };
        let mut paramss = Vec::new();
        while self.check(&TokenKind::LParen) {
            paramss.push(self.using_param_clause()?);
        }
        self.accept(&TokenKind::Colon)?;
        Ok((name, tparams, paramss))
    }

    fn using_param_clause(&mut self) -> Result<ParamClause, ParseError> {
        let start = self.note_pos();
        let mut mode = ClauseMode::Plain;
        let params = self.in_parens(|p| {
            if p.at_soft_kw(p.soft.using) {
                p.advance();
                mode = ClauseMode::Using;
            }
            p.comma_series(&TokenKind::RParen, |p| p.using_term_param())
        })?;
        if mode != ClauseMode::Using {
            return Err(ParseError::new(
                ErrorCode::E1001,
                "`using` expected in given parameter clause",
                self.current_span(),
            ));
        }
        Ok(ParamClause {
            mode,
            params,
            origin: self.origin_from(start),
        })
    }

    // --- extension groups ---

    fn extension_group(&mut self, mods: Vec<Mod>, start: u32) -> Result<Stat, ParseError> {
        self.advance();
        let tparams = if self.check(&TokenKind::LBracket) {
            self.type_param_clause()?
        } else {
            Vec::new()
        };
        let paramss = self.term_param_clauses(false)?;
        if paramss.is_empty() {
            return Err(ParseError::new(
                ErrorCode::E1001,
                "`(` expected: an extension group requires a parameter clause",
                self.current_span(),
            ));
        }
        self.cursor.newline_opt_when_followed_by(&TokenKind::LBrace);
        let body = if self.check(&TokenKind::LBrace) {
            self.in_braces(|p| p.extension_stats())?
        } else {
            self.cursor.observe_indented();
            if self.cursor.at_indent() {
                self.advance();
                let stats = self.extension_stats()?;
                if self.cursor.at_outdent() {
                    self.advance();
                }
                stats
            } else {
                let stat_start = self.note_pos();
                let member_mods = self.modifiers(false)?;
                vec![self.def_or_dcl(StatCtx::Block, member_mods, stat_start)?]
            }
        };
        let origin = self.origin_from(start);
        Ok(Stat::new(
            StatKind::Defn(Defn::new(
                DefnKind::ExtensionGroup {
                    mods,
                    tparams,
                    paramss,
                    body,
                },
                origin,
            )),
            origin,
        ))
    }

    fn extension_stats(&mut self) -> Result<Vec<Stat>, ParseError> {
        let mut stats = Vec::new();
        self.skip_stat_seps();
        loop {
            self.cursor.observe_outdented();
            if self.at_block_seq_end(false) {
                break;
            }
            let start = self.note_pos();
            let mods = self.modifiers(false)?;
            stats.push(self.def_or_dcl(StatCtx::Block, mods, start)?);
            self.cursor.observe_outdented();
            if self.at_block_seq_end(false) {
                break;
            }
            self.accept_stat_sep()?;
        }
        Ok(stats)
    }

    // --- secondary constructors ---

    /// `def this(params) = { this(...); stats }`.
    pub(crate) fn secondary_ctor(&mut self, mods: Vec<Mod>) -> Result<Ctor, ParseError> {
        let start = self.note_pos();
        self.accept(&TokenKind::KwDef)?;
        self.accept(&TokenKind::KwThis)?;
        let paramss = self.term_param_clauses(false)?;
        if paramss.is_empty() {
            return Err(ParseError::new(
                ErrorCode::E1063,
                "`(` expected: a secondary constructor requires a parameter clause",
                self.current_span(),
            ));
        }
        self.accept(&TokenKind::Eq)?;
        self.cursor.skip_newlines();

        if self.check(&TokenKind::LBrace) {
            let (init, stats) = self.in_braces(|p| {
                let init = p.ctor_delegate_call()?;
                let mut stats = Vec::new();
                p.skip_stat_seps();
                while !p.check(&TokenKind::RBrace) && !p.cursor.is_at_end() {
                    stats.push(p.statement(StatCtx::Block)?);
                    if p.check(&TokenKind::RBrace) || p.cursor.is_at_end() {
                        break;
                    }
                    p.accept_stat_sep()?;
                }
                Ok((init, stats))
            })?;
            return Ok(Ctor {
                mods,
                paramss,
                init,
                stats,
                origin: self.origin_from(start),
            });
        }

        let init = self.ctor_delegate_call()?;
        Ok(Ctor {
            mods,
            paramss,
            init,
            stats: Vec::new(),
            origin: self.origin_from(start),
        })
    }

    /// The mandatory `this(...)` delegate call.
    fn ctor_delegate_call(&mut self) -> Result<Init, ParseError> {
        let start = self.note_pos();
        if !self.check(&TokenKind::KwThis) {
            return Err(ParseError::new(
                ErrorCode::E1063,
                format!(
                    "`this` expected but `{}` found: a secondary constructor must begin with a call to another constructor",
                    self.current_kind().display_name()
                ),
                self.current_span(),
            ));
        }
        let this_start = self.note_pos();
        self.advance();
        let this_term = Term::new(TermKind::This { qual: None }, self.origin_from(this_start));
        let tpe = Type::new(
            TypeKind::Singleton {
                reference: Box::new(this_term),
            },
            self.origin_from(this_start),
        );
        let mut argss = Vec::new();
        if !self.check(&TokenKind::LParen) {
            return Err(ParseError::new(
                ErrorCode::E1063,
                format!(
                    "`(` expected but `{}` found",
                    self.current_kind().display_name()
                ),
                self.current_span(),
            ));
        }
        while self.check(&TokenKind::LParen) {
            let (args, _) = self.argument_exprs()?;
            argss.push(args);
        }
        Ok(Init {
            tpe,
            argss,
            origin: self.origin_from(start),
        })
    }

    // --- parameters ---

    /// Zero or more term parameter clauses.
    pub(crate) fn term_param_clauses(
        &mut self,
        owner_allows_val_params: bool,
    ) -> Result<Vec<ParamClause>, ParseError> {
        let mut clauses = Vec::new();
        while self.check(&TokenKind::LParen) {
            let start = self.note_pos();
            let mut mode = ClauseMode::Plain;
            let params = self.in_parens(|p| {
                if p.check(&TokenKind::KwImplicit) {
                    p.advance();
                    mode = ClauseMode::Implicit;
                } else if p.dialect.allow_given_using
                    && p.at_soft_kw(p.soft.using)
                    && !matches!(p.peek_kind(), TokenKind::Colon | TokenKind::Comma)
                {
                    p.advance();
                    mode = ClauseMode::Using;
                }
                p.comma_series(&TokenKind::RParen, |p| {
                    if mode == ClauseMode::Using {
                        p.using_term_param()
                    } else {
                        p.term_param(owner_allows_val_params)
                    }
                })
            })?;
            clauses.push(ParamClause {
                mode,
                params,
                origin: self.origin_from(start),
            });
        }
        Ok(clauses)
    }

    /// One term parameter.
    pub(crate) fn term_param(&mut self, allow_val_params: bool) -> Result<TermParam, ParseError> {
        let start = self.note_pos();
        let mut mods: Vec<Mod> = Vec::new();
        for annot in self.annotations(true)? {
            let origin = annot.origin;
            mods.push(Mod::new(ModKind::Annot(annot), origin));
        }
        loop {
            let mod_start = self.note_pos();
            let kind = match self.current_kind() {
                TokenKind::KwPrivate | TokenKind::KwProtected if allow_val_params => {
                    let is_private = self.check(&TokenKind::KwPrivate);
                    self.advance();
                    let within = self.access_qualifier()?;
                    if is_private {
                        ModKind::Private { within }
                    } else {
                        ModKind::Protected { within }
                    }
                }
                TokenKind::KwFinal if allow_val_params => {
                    self.advance();
                    ModKind::Final
                }
                TokenKind::KwOverride if allow_val_params => {
                    self.advance();
                    ModKind::Override
                }
                TokenKind::KwImplicit => {
                    self.advance();
                    ModKind::Implicit
                }
                _ if self.dialect.allow_inline_modifier && self.at_soft_kw(self.soft.inline) => {
                    self.advance();
                    ModKind::Inline
                }
                _ => break,
            };
            mods.push(Mod::new(kind, self.origin_from(mod_start)));
        }
        if allow_val_params {
            if self.check(&TokenKind::KwVal) {
                let mod_start = self.note_pos();
                self.advance();
                mods.push(Mod::new(ModKind::ValParam, self.origin_from(mod_start)));
            } else if self.check(&TokenKind::KwVar) {
                let mod_start = self.note_pos();
                self.advance();
                mods.push(Mod::new(ModKind::VarParam, self.origin_from(mod_start)));
            }
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
        let default = if self.accept_opt(&TokenKind::Eq) {
            Some(self.expr(Location::NoStat, false)?)
        } else {
            None
        };
        Ok(TermParam {
            mods,
            name,
            decltpe,
            default,
            origin: self.origin_from(start),
        })
    }

    /// A `using`-clause parameter: named (`x: T`) or an anonymous bare
    /// type (`Ord[Int]`).
    fn using_term_param(&mut self) -> Result<TermParam, ParseError> {
        let named = matches!(self.current_kind(), TokenKind::Underscore)
            || (matches!(
                self.current_kind(),
                TokenKind::Ident(_) | TokenKind::QuotedIdent(_)
            ) && matches!(self.peek_kind(), TokenKind::Colon));
        if named {
            return self.term_param(false);
        }
        let start = self.note_pos();
        let tpe = self.param_type()?;
        Ok(TermParam {
            mods: Vec::new(),
            name: None,
            decltpe: Some(tpe),
            default: None,
            origin: self.origin_from(start),
        })
    }

    /// `[T, +U <: B : Ord]` type parameter clause.
    pub(crate) fn type_param_clause(&mut self) -> Result<Vec<TypeParam>, ParseError> {
        self.in_brackets(|p| p.comma_series(&TokenKind::RBracket, |p| p.type_param(true)))
    }

    /// One type parameter with variance, higher-kinded shape, and bounds.
    pub(crate) fn type_param(&mut self, allow_variance: bool) -> Result<TypeParam, ParseError> {
        let start = self.note_pos();
        let mut mods: Vec<Mod> = Vec::new();
        for annot in self.annotations(false)? {
            let origin = annot.origin;
            mods.push(Mod::new(ModKind::Annot(annot), origin));
        }
        if allow_variance {
            if self.at_soft_kw(self.soft.plus) {
                let mod_start = self.note_pos();
                self.advance();
                mods.push(Mod::new(ModKind::Covariant, self.origin_from(mod_start)));
            } else if self.at_soft_kw(self.soft.minus) {
                let mod_start = self.note_pos();
                self.advance();
                mods.push(Mod::new(
                    ModKind::Contravariant,
                    self.origin_from(mod_start),
                ));
            }
        }
        let name = if self.accept_opt(&TokenKind::Underscore) {
            None
        } else {
            Some(self.ident()?)
        };
        let tparams = if self.check(&TokenKind::LBracket) {
            self.type_param_clause()?
        } else {
            Vec::new()
        };
        let bounds = self.type_bounds()?;
        let mut vbounds = Vec::new();
        while self.check(&TokenKind::ViewBound) {
            self.require_dialect(self.dialect.allow_view_bounds, "view bounds")?;
            self.advance();
            vbounds.push(self.typ()?);
        }
        let mut cbounds = Vec::new();
        while self.accept_opt(&TokenKind::Colon) {
            cbounds.push(self.typ()?);
        }
        Ok(TypeParam {
            mods,
            name,
            tparams,
            bounds,
            vbounds,
            cbounds,
            origin: self.origin_from(start),
        })
    }

    // --- import / export ---

    fn import_stmt(&mut self, start: u32) -> Result<Stat, ParseError> {
        self.accept(&TokenKind::KwImport)?;
        let mut importers = vec![self.importer()?];
        while self.accept_opt(&TokenKind::Comma) {
            importers.push(self.importer()?);
        }
        let origin = self.origin_from(start);
        Ok(Stat::new(StatKind::Import(Import { importers }), origin))
    }

    fn export_stmt(&mut self, start: u32) -> Result<Stat, ParseError> {
        self.require_dialect(self.dialect.allow_export_clauses, "export clauses")?;
        self.accept(&TokenKind::KwExport)?;
        let mut importers = vec![self.importer()?];
        while self.accept_opt(&TokenKind::Comma) {
            importers.push(self.importer()?);
        }
        let origin = self.origin_from(start);
        Ok(Stat::new(StatKind::Export(Export { importers }), origin))
    }

    /// `ref.name`, `ref._`, `ref.{a, b => c}`, `ref.given`.
    pub(crate) fn importer(&mut self) -> Result<Importer, ParseError> {
        let start = self.note_pos();
        let first = self.ident()?;
        let mut reference = Term::new(TermKind::Name(first.name), first.origin);
        let mut importees: Option<Vec<Importee>> = None;
        let mut final_name: Option<Ident> = None;

        while self.check(&TokenKind::Dot) {
            match self.peek_kind().clone() {
                TokenKind::Ident(_) | TokenKind::QuotedIdent(_) => {
                    self.advance();
                    let name = self.ident()?;
                    if self.check(&TokenKind::Dot) {
                        reference = Term::new(
                            TermKind::Select {
                                qual: Box::new(reference),
                                name,
                            },
                            self.origin_from(start),
                        );
                    } else {
                        final_name = Some(name);
                        break;
                    }
                }
                TokenKind::Underscore => {
                    self.advance();
                    let importee_start = self.note_pos();
                    self.advance();
                    importees = Some(vec![Importee {
                        kind: ImporteeKind::Wildcard,
                        origin: self.origin_from(importee_start),
                    }]);
                    break;
                }
                TokenKind::KwGiven => {
                    self.advance();
                    importees = Some(vec![self.given_importee()?]);
                    break;
                }
                TokenKind::LBrace => {
                    self.advance();
                    let list = self.in_braces(|p| {
                        p.comma_series(&TokenKind::RBrace, |p| p.importee())
                    })?;
                    importees = Some(list);
                    break;
                }
                other => {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        format!(
                            "`importee` expected but `{}` found",
                            other.display_name()
                        ),
                        self.current_span(),
                    ))
                }
            }
        }

        let importees = match (importees, final_name) {
            (Some(importees), _) => importees,
            (None, Some(name)) => {
                // The last segment also folds into the star wildcard under
                // dialects that spell it `*`.
                if name.name == self.soft.star {
                    vec![Importee {
                        kind: ImporteeKind::Wildcard,
                        origin: name.origin,
                    }]
                } else {
                    vec![Importee {
                        kind: ImporteeKind::Name { name: name.name },
                        origin: name.origin,
                    }]
                }
            }
            (None, None) => {
                // A bare `import a`: the single segment is the importee of
                // the empty reference.
                let origin = reference.origin;
                let TermKind::Name(name) = reference.kind else {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        "`.` expected in import clause",
                        self.current_span(),
                    ));
                };
                return Ok(Importer {
                    reference: Term::new(TermKind::Name(name), origin),
                    importees: Vec::new(),
                    origin: self.origin_from(start),
                });
            }
        };

        Ok(Importer {
            reference,
            importees,
            origin: self.origin_from(start),
        })
    }

    /// One importee inside braces.
    pub(crate) fn importee(&mut self) -> Result<Importee, ParseError> {
        let start = self.note_pos();
        match self.current_kind().clone() {
            TokenKind::Underscore => {
                self.advance();
                Ok(Importee {
                    kind: ImporteeKind::Wildcard,
                    origin: self.origin_from(start),
                })
            }
            TokenKind::KwGiven => {
                self.advance();
                let importee = self.given_importee_body(start)?;
                Ok(importee)
            }
            TokenKind::Ident(name) if name == self.soft.star => {
                self.advance();
                Ok(Importee {
                    kind: ImporteeKind::Wildcard,
                    origin: self.origin_from(start),
                })
            }
            TokenKind::Ident(_) | TokenKind::QuotedIdent(_) => {
                let name = self.ident()?;
                let renamed = if self.accept_opt(&TokenKind::FatArrow) {
                    true
                } else if self.dialect.allow_given_using && self.at_soft_kw(self.soft.as_) {
                    self.advance();
                    true
                } else {
                    false
                };
                if renamed {
                    if self.accept_opt(&TokenKind::Underscore) {
                        return Ok(Importee {
                            kind: ImporteeKind::Unimport { name: name.name },
                            origin: self.origin_from(start),
                        });
                    }
                    let rename = self.ident()?;
                    return Ok(Importee {
                        kind: ImporteeKind::Rename {
                            name: name.name,
                            rename: rename.name,
                        },
                        origin: self.origin_from(start),
                    });
                }
                Ok(Importee {
                    kind: ImporteeKind::Name { name: name.name },
                    origin: self.origin_from(start),
                })
            }
            other => Err(ParseError::new(
                ErrorCode::E1001,
                format!("`importee` expected but `{}` found", other.display_name()),
                self.current_span(),
            )),
        }
    }

    fn given_importee(&mut self) -> Result<Importee, ParseError> {
        let start = self.note_pos();
        self.accept(&TokenKind::KwGiven)?;
        self.given_importee_body(start)
    }

    fn given_importee_body(&mut self, start: u32) -> Result<Importee, ParseError> {
        if crate::classifier::is_type_intro(self.current_kind())
            && !matches!(self.current_kind(), TokenKind::Underscore)
        {
            let tpe = self.typ()?;
            return Ok(Importee {
                kind: ImporteeKind::Given { tpe },
                origin: self.origin_from(start),
            });
        }
        Ok(Importee {
            kind: ImporteeKind::GivenAll,
            origin: self.origin_from(start),
        })
    }
}
