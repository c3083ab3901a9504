//! Templates: inheritance clauses, bodies, self types, refinements.
//!
//! The self-type annotation is resolved by bounded speculation: inside a
//! freshly opened body, the parser forks, tries the `name: T =>` prefix,
//! and commits only when the arrow is actually there.

use vela_diagnostic::ErrorCode;
use vela_ir::ast::{Init, SelfType, Stat, StatKind, Template, Type};
use vela_ir::TokenKind;

use crate::cursor::Region;
use crate::error::ParseError;
use crate::grammar::defn::StatCtx;
use crate::grammar::TemplateOwner;
use crate::Parser;

impl Parser<'_> {
    /// The optional template after a definition header: `extends`
    /// clause, `derives` clause, and body.
    pub(crate) fn template_opt(&mut self, owner: TemplateOwner) -> Result<Template, ParseError> {
        let start = self.note_pos();
        let mut inits = Vec::new();

        if self.accept_opt(&TokenKind::KwExtends) {
            self.cursor.skip_newlines();
            inits.push(self.init_clause(true)?);
            loop {
                if self.check(&TokenKind::KwWith)
                    && !matches!(self.peek_kind(), TokenKind::LBrace | TokenKind::Indent)
                    && !self.with_body_ahead()
                {
                    self.advance();
                    inits.push(self.init_clause(true)?);
                } else if self.dialect.allow_trailing_commas && self.check(&TokenKind::Comma) {
                    self.advance();
                    self.cursor.skip_newlines();
                    inits.push(self.init_clause(true)?);
                } else {
                    break;
                }
            }
        }

        let derives = self.derives_clause()?;
        let (self_type, stats, has_body) = self.template_body_opt(owner)?;
        let origin = if has_body || !inits.is_empty() {
            self.origin_from(start)
        } else {
            self.origin_here()
        };
        Ok(Template {
            inits,
            self_type,
            stats,
            derives,
            origin,
        })
    }

    /// A template for the `parse_template` entry: inits without the
    /// `extends` keyword, then a body.
    pub(crate) fn template(&mut self, owner: TemplateOwner) -> Result<Template, ParseError> {
        let start = self.note_pos();
        let mut inits = Vec::new();
        if crate::classifier::is_type_intro(self.current_kind())
            && !self.check(&TokenKind::LBrace)
        {
            inits.push(self.init_clause(true)?);
            while self.check(&TokenKind::KwWith)
                && !matches!(self.peek_kind(), TokenKind::LBrace | TokenKind::Indent)
                && !self.with_body_ahead()
            {
                self.advance();
                inits.push(self.init_clause(true)?);
            }
        }
        let derives = self.derives_clause()?;
        let (self_type, stats, _) = self.template_body_opt(owner)?;
        Ok(Template {
            inits,
            self_type,
            stats,
            derives,
            origin: self.origin_from(start),
        })
    }

    /// Whether the `with` ahead introduces a template body rather than a
    /// further parent (`given T with { ... }`).
    fn with_body_ahead(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::LBrace)
            || self.cursor.has_line_break_after(self.cursor.peek_index())
    }

    fn derives_clause(&mut self) -> Result<Vec<Type>, ParseError> {
        if !self.dialect.allow_derives_clauses || !self.at_soft_kw(self.soft.derives) {
            return Ok(Vec::new());
        }
        self.advance();
        let mut derives = vec![self.infix_type()?];
        while self.accept_opt(&TokenKind::Comma) {
            self.cursor.skip_newlines();
            derives.push(self.infix_type()?);
        }
        Ok(derives)
    }

    /// The optional template body: braces, or a colon-EOL indented block
    /// under significant indentation.
    fn template_body_opt(
        &mut self,
        owner: TemplateOwner,
    ) -> Result<(Option<SelfType>, Vec<Stat>, bool), ParseError> {
        self.cursor.newline_opt_when_followed_by(&TokenKind::LBrace);
        if self.check(&TokenKind::LBrace) {
            let (self_type, stats) = self.braced_template_body(owner)?;
            return Ok((self_type, stats, true));
        }
        if self.dialect.allow_significant_indentation
            && self.check(&TokenKind::Colon)
            && self.cursor.has_line_break_after(self.cursor.pos())
        {
            self.advance();
            if !self.cursor.observe_indented() {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    "`indented definitions` expected after `:`",
                    self.current_span(),
                ));
            }
            self.advance();
            let self_type = self.self_type_opt();
            let stats = self.template_stat_seq(owner)?;
            if self.cursor.at_outdent() {
                self.advance();
            }
            return Ok((self_type, stats, true));
        }
        Ok((None, Vec::new(), false))
    }

    fn braced_template_body(
        &mut self,
        owner: TemplateOwner,
    ) -> Result<(Option<SelfType>, Vec<Stat>), ParseError> {
        self.accept(&TokenKind::LBrace)?;
        self.cursor.push_region(Region::Brace);
        self.cursor.skip_newlines();
        let self_type = self.self_type_opt();
        let result = self.template_stat_seq(owner);
        self.cursor.pop_region();
        let stats = result?;
        self.cursor.skip_newlines();
        self.accept(&TokenKind::RBrace)?;
        Ok((self_type, stats))
    }

    /// A template body with no parents, for `new { ... }`.
    pub(crate) fn template_body_only(&mut self) -> Result<Template, ParseError> {
        let start = self.note_pos();
        let (self_type, stats) = self.braced_template_body(TemplateOwner::Class)?;
        Ok(Template {
            inits: Vec::new(),
            self_type,
            stats,
            derives: Vec::new(),
            origin: self.origin_from(start),
        })
    }

    /// Continue an anonymous template after its first parent, for
    /// `new Parent with Parent { ... }`.
    pub(crate) fn anonymous_template_rest(&mut self, first: Init) -> Result<Template, ParseError> {
        let start = first.origin.token_start;
        let mut inits = vec![first];
        while self.check(&TokenKind::KwWith)
            && !matches!(self.peek_kind(), TokenKind::LBrace | TokenKind::Indent)
        {
            self.advance();
            inits.push(self.init_clause(true)?);
        }
        self.accept_opt(&TokenKind::KwWith);
        self.cursor.newline_opt_when_followed_by(&TokenKind::LBrace);
        let (self_type, stats) = if self.check(&TokenKind::LBrace) {
            self.braced_template_body(TemplateOwner::Class)?
        } else {
            (None, Vec::new())
        };
        Ok(Template {
            inits,
            self_type,
            stats,
            derives: Vec::new(),
            origin: self.origin(start as usize, self.last_pos() as usize),
        })
    }

    /// The structural body of a `given ... : T with { ... }`.
    pub(crate) fn given_template(&mut self, decltpe: Type) -> Result<Template, ParseError> {
        let init = Init {
            origin: decltpe.origin,
            tpe: decltpe,
            argss: Vec::new(),
        };
        self.given_template_from(init)
    }

    /// The structural body of an anonymous `given T with { ... }`.
    pub(crate) fn given_template_from(&mut self, init: Init) -> Result<Template, ParseError> {
        let start = init.origin.token_start;
        self.accept(&TokenKind::KwWith)?;
        self.cursor.newline_opt_when_followed_by(&TokenKind::LBrace);
        let (self_type, stats) = if self.check(&TokenKind::LBrace) {
            self.braced_template_body(TemplateOwner::Class)?
        } else if self.dialect.allow_significant_indentation {
            if !self.cursor.observe_indented() {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    "`{` expected after `with` in given definition",
                    self.current_span(),
                ));
            }
            self.advance();
            let stats = self.template_stat_seq(TemplateOwner::Class)?;
            if self.cursor.at_outdent() {
                self.advance();
            }
            (None, stats)
        } else {
            return Err(ParseError::new(
                ErrorCode::E1001,
                "`{` expected after `with` in given definition",
                self.current_span(),
            ));
        };
        Ok(Template {
            inits: vec![init],
            self_type,
            stats,
            derives: Vec::new(),
            origin: self.origin(start as usize, self.last_pos() as usize),
        })
    }

    /// Speculative self-type: commit only when the `=>` is actually
    /// there.
    fn self_type_opt(&mut self) -> Option<SelfType> {
        if !matches!(
            self.current_kind(),
            TokenKind::Ident(_) | TokenKind::KwThis | TokenKind::Underscore
        ) {
            return None;
        }
        self.try_parse(|p| {
            let self_type = p.self_type()?;
            p.cursor.skip_newlines();
            Ok(self_type)
        })
    }

    /// `name: T =>` / `this: T =>` / `_: T =>` (the arrow is consumed
    /// when present).
    pub(crate) fn self_type(&mut self) -> Result<SelfType, ParseError> {
        let start = self.note_pos();
        let name = match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Some(name)
            }
            TokenKind::KwThis | TokenKind::Underscore => {
                self.advance();
                None
            }
            other => {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    format!(
                        "`self type` expected but `{}` found",
                        other.display_name()
                    ),
                    self.current_span(),
                ))
            }
        };
        let decltpe = if self.accept_opt(&TokenKind::Colon) {
            Some(self.infix_type()?)
        } else {
            None
        };
        self.accept(&TokenKind::FatArrow)?;
        Ok(SelfType {
            name,
            decltpe,
            origin: self.origin_from(start),
        })
    }

    /// Statement sequence of a template body.
    fn template_stat_seq(&mut self, owner: TemplateOwner) -> Result<Vec<Stat>, ParseError> {
        let mut stats = Vec::new();
        self.skip_stat_seps();
        loop {
            self.cursor.observe_outdented();
            if self.at_template_seq_end() {
                break;
            }
            stats.push(self.statement(StatCtx::Template(owner))?);
            self.cursor.observe_outdented();
            if self.at_template_seq_end() {
                break;
            }
            self.accept_stat_sep()?;
        }
        Ok(stats)
    }

    fn at_template_seq_end(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::RBrace | TokenKind::Eof | TokenKind::Outdent
        )
    }

    /// Refinement statements: declarations and type aliases only.
    pub(crate) fn refine_stats(&mut self) -> Result<Vec<Stat>, ParseError> {
        let mut stats = Vec::new();
        self.skip_stat_seps();
        loop {
            if self.at_template_seq_end() {
                break;
            }
            let start = self.note_pos();
            let stat = match self.current_kind() {
                TokenKind::KwVal | TokenKind::KwVar | TokenKind::KwDef | TokenKind::KwType => {
                    self.def_or_dcl(StatCtx::Block, Vec::new(), start)?
                }
                other => {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        format!(
                            "`declaration` expected but `{}` found",
                            other.display_name()
                        ),
                        self.current_span(),
                    ))
                }
            };
            match &stat.kind {
                StatKind::Decl(_) => {}
                StatKind::Defn(defn)
                    if matches!(defn.kind, vela_ir::ast::DefnKind::Type { .. }) => {}
                _ => {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        "refinement must be a declaration or a type alias",
                        stat.origin.span,
                    ))
                }
            }
            stats.push(stat);
            if self.at_template_seq_end() {
                break;
            }
            self.accept_stat_sep()?;
        }
        Ok(stats)
    }

    /// A constructor invocation: annotated simple type plus argument
    /// lists.
    pub(crate) fn init_clause(&mut self, allow_argss: bool) -> Result<Init, ParseError> {
        let start = self.note_pos();
        let tpe = self.simple_type()?;
        let mut argss = Vec::new();
        while allow_argss && self.check(&TokenKind::LParen) {
            let (args, _) = self.argument_exprs()?;
            argss.push(args);
        }
        Ok(Init {
            tpe,
            argss,
            origin: self.origin_from(start),
        })
    }
}
