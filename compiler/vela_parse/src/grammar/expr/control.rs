//! Control-flow expressions.
//!
//! Each form supports both the parenthesized classic shape and the
//! keyword-delimited shape used under significant indentation
//! (`if cond then e`, `while cond do e`).

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::ast::{Case, Enumerator, EnumeratorKind, Term, TermKind};
use vela_ir::TokenKind;

use crate::cursor::Region;
use crate::error::ParseError;
use crate::grammar::{Location, PatMode};
use crate::Parser;

impl Parser<'_> {
    /// `if (cond) t [else e]` / `if cond then t [else e]`.
    pub(crate) fn if_expr(&mut self, start: u32) -> Result<Term, ParseError> {
        self.accept(&TokenKind::KwIf)?;
        let cond = self.condition()?;
        let then_branch = self.indentable_expr()?;
        let else_branch = if self.else_ahead() {
            self.cursor.skip_newlines();
            self.accept_opt(&TokenKind::Semicolon);
            self.accept(&TokenKind::KwElse)?;
            Some(Box::new(self.indentable_expr()?))
        } else {
            None
        };
        Ok(Term::new(
            TermKind::If {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch,
            },
            self.origin_from(start),
        ))
    }

    fn else_ahead(&self) -> bool {
        if self.check(&TokenKind::KwElse) {
            return true;
        }
        if matches!(
            self.current_kind(),
            TokenKind::Newline | TokenKind::Semicolon
        ) {
            return matches!(self.cursor.peek_past_newline(), TokenKind::KwElse)
                || matches!(self.peek_kind(), TokenKind::KwElse);
        }
        false
    }

    /// A control-form condition: parenthesized, or bare followed by the
    /// closing soft keyword (`then`/`do`), which the caller consumes.
    fn condition(&mut self) -> Result<Term, ParseError> {
        if self.check(&TokenKind::LParen) {
            let cond = self.in_parens(|p| p.expr(Location::NoStat, false))?;
            // The `then` keyword is optional after a parenthesized
            // condition under significant indentation.
            if self.dialect.allow_significant_indentation && self.at_soft_kw(self.soft.then) {
                self.advance();
            }
            self.cursor.skip_newlines();
            return Ok(cond);
        }
        self.require_dialect(
            self.dialect.allow_significant_indentation,
            "conditions without parentheses",
        )?;
        self.condition_depth += 1;
        let cond = self.expr(Location::NoStat, false);
        self.condition_depth -= 1;
        let cond = cond?;
        self.cursor.skip_newlines();
        if self.at_soft_kw(self.soft.then) || self.check(&TokenKind::KwDo) {
            self.advance();
        }
        Ok(cond)
    }

    /// `while (cond) body` / `while cond do body`.
    pub(crate) fn while_expr(&mut self, start: u32) -> Result<Term, ParseError> {
        self.accept(&TokenKind::KwWhile)?;
        let cond = self.condition()?;
        let body = self.indentable_expr()?;
        Ok(Term::new(
            TermKind::While {
                cond: Box::new(cond),
                body: Box::new(body),
            },
            self.origin_from(start),
        ))
    }

    /// `do body while (cond)`.
    pub(crate) fn do_expr(&mut self, start: u32) -> Result<Term, ParseError> {
        self.require_dialect(self.dialect.allow_do_while, "do-while loops")?;
        self.accept(&TokenKind::KwDo)?;
        let body = self.expr(Location::NoStat, false)?;
        self.cursor.skip_newlines();
        self.accept_opt(&TokenKind::Semicolon);
        self.accept(&TokenKind::KwWhile)?;
        let cond = self.in_parens(|p| p.expr(Location::NoStat, false))?;
        Ok(Term::new(
            TermKind::Do {
                body: Box::new(body),
                cond: Box::new(cond),
            },
            self.origin_from(start),
        ))
    }

    /// `throw expr`.
    pub(crate) fn throw_expr(&mut self, start: u32) -> Result<Term, ParseError> {
        self.accept(&TokenKind::KwThrow)?;
        let expr = self.expr(Location::NoStat, false)?;
        Ok(Term::new(
            TermKind::Throw {
                expr: Box::new(expr),
            },
            self.origin_from(start),
        ))
    }

    /// `return [expr]`.
    pub(crate) fn return_expr(&mut self, start: u32) -> Result<Term, ParseError> {
        self.accept(&TokenKind::KwReturn)?;
        let expr = if crate::classifier::is_expr_intro(self.current_kind()) {
            Some(Box::new(self.expr(Location::NoStat, false)?))
        } else {
            None
        };
        Ok(Term::new(TermKind::Return { expr }, self.origin_from(start)))
    }

    /// `try expr [catch handler] [finally expr]`.
    pub(crate) fn try_expr(&mut self, start: u32) -> Result<Term, ParseError> {
        self.accept(&TokenKind::KwTry)?;
        let body = self.indentable_expr()?;

        let mut cases: Option<Vec<Case>> = None;
        let mut handler: Option<Term> = None;
        self.cursor.newline_opt_when_followed_by(&TokenKind::KwCatch);
        if self.accept_opt(&TokenKind::KwCatch) {
            self.cursor.newline_opt_when_followed_by(&TokenKind::LBrace);
            if self.check(&TokenKind::LBrace) {
                let t = self.block_literal(self.note_pos())?;
                match t.kind {
                    TermKind::PartialFunction { cases: c } => cases = Some(c),
                    _ => handler = Some(t),
                }
            } else if self.check(&TokenKind::KwCase) {
                // Single-case catch: `catch case e => ...`.
                self.advance();
                cases = Some(vec![self.case_clause()?]);
            } else {
                self.require_dialect(
                    self.dialect.allow_try_with_any_expr,
                    "non-case catch handlers",
                )?;
                handler = Some(self.expr(Location::NoStat, false)?);
            }
        }

        self.cursor.newline_opt_when_followed_by(&TokenKind::KwFinally);
        let finally_branch = if self.accept_opt(&TokenKind::KwFinally) {
            Some(Box::new(self.indentable_expr()?))
        } else {
            None
        };

        let origin = self.origin_from(start);
        let kind = match (cases, handler) {
            (Some(cases), None) => TermKind::Try {
                expr: Box::new(body),
                cases,
                finally_branch,
            },
            (None, Some(handler)) => TermKind::TryWithHandler {
                expr: Box::new(body),
                handler: Box::new(handler),
                finally_branch,
            },
            (None, None) => TermKind::Try {
                expr: Box::new(body),
                cases: Vec::new(),
                finally_branch,
            },
            (Some(_), Some(_)) => unreachable!("catch parses one handler shape"),
        };
        Ok(Term::new(kind, origin))
    }

    /// Classic `expr match { cases }` suffix.
    pub(crate) fn match_clause(&mut self, lhs: Term, start: u32) -> Result<Term, ParseError> {
        self.accept(&TokenKind::KwMatch)?;
        let pf = self.partial_function_literal()?;
        let TermKind::PartialFunction { cases } = pf.kind else {
            return Err(ParseError::new(
                ErrorCode::E1041,
                "match statement requires cases",
                pf.origin.span,
            ));
        };
        Ok(Term::new(
            TermKind::Match {
                expr: Box::new(lhs),
                cases,
            },
            self.origin_from(start),
        ))
    }

    // --- for comprehensions ---

    /// `for (enums) [yield] body`, `for { enums } [yield] body`, or the
    /// braceless form under significant indentation.
    pub(crate) fn for_expr(&mut self, start: u32) -> Result<Term, ParseError> {
        self.accept(&TokenKind::KwFor)?;
        let enums = if self.check(&TokenKind::LParen) {
            self.in_parens(|p| p.enumerators())?
        } else if self.check(&TokenKind::LBrace) {
            self.in_braces(|p| p.enumerators())?
        } else {
            self.require_dialect(
                self.dialect.allow_significant_indentation,
                "for comprehensions without delimiters",
            )?;
            self.cursor.push_region(Region::Brace);
            let enums = self.enumerators()?;
            self.cursor.pop_region();
            enums
        };
        self.cursor.skip_newlines();

        if self.accept_opt(&TokenKind::KwYield) {
            let body = self.indentable_expr()?;
            return Ok(Term::new(
                TermKind::ForYield {
                    enums,
                    body: Box::new(body),
                },
                self.origin_from(start),
            ));
        }
        if self.check(&TokenKind::KwDo) && self.dialect.allow_significant_indentation {
            self.advance();
        }
        let body = self.indentable_expr()?;
        Ok(Term::new(
            TermKind::For {
                enums,
                body: Box::new(body),
            },
            self.origin_from(start),
        ))
    }

    fn enumerators(&mut self) -> Result<Vec<Enumerator>, ParseError> {
        let mut enums = Vec::new();
        self.cursor.skip_newlines();
        enums.push(self.enumerator(true)?);
        loop {
            if self.at_stat_sep() {
                self.advance();
                self.cursor.skip_newlines();
            }
            if matches!(
                self.current_kind(),
                TokenKind::RParen | TokenKind::RBrace | TokenKind::Eof
            ) || self.check(&TokenKind::KwYield)
                || self.check(&TokenKind::KwDo)
            {
                break;
            }
            enums.push(self.enumerator(false)?);
        }
        Ok(enums)
    }

    /// One enumerator. The first must be a generator.
    pub(crate) fn enumerator(&mut self, first: bool) -> Result<Enumerator, ParseError> {
        let start = self.note_pos();
        if self.check(&TokenKind::KwIf) {
            if first {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    "`<-` expected but `if` found: a for comprehension must start with a generator",
                    self.current_span(),
                ));
            }
            self.advance();
            let cond = self.postfix_expr(false)?;
            return Ok(Enumerator {
                kind: EnumeratorKind::Guard { cond },
                origin: self.origin_from(start),
            });
        }

        // Deprecated `val pat = rhs` binding.
        let deprecated_val = self.accept_opt(&TokenKind::KwVal);
        if deprecated_val {
            self.warn(Diagnostic::warning(
                ErrorCode::E1051,
                self.cursor.previous_span(),
                "`val` keyword in for comprehension is deprecated",
            ));
        }

        self.accept_opt(&TokenKind::KwCase);
        let pat = self.pattern1_for_enumerator()?;
        if self.accept_opt(&TokenKind::LeftArrow) {
            if deprecated_val {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    "`=` expected but `<-` found",
                    self.cursor.previous_span(),
                ));
            }
            let rhs = self.expr(Location::NoStat, false)?;
            return Ok(Enumerator {
                kind: EnumeratorKind::Generator { pat, rhs },
                origin: self.origin_from(start),
            });
        }
        if first {
            return Err(ParseError::new(
                ErrorCode::E1001,
                format!(
                    "`<-` expected but `{}` found",
                    self.current_kind().display_name()
                ),
                self.current_span(),
            ));
        }
        self.accept(&TokenKind::Eq)?;
        let rhs = self.expr(Location::NoStat, false)?;
        Ok(Enumerator {
            kind: EnumeratorKind::Val { pat, rhs },
            origin: self.origin_from(start),
        })
    }

    fn pattern1_for_enumerator(&mut self) -> Result<vela_ir::ast::Pat, ParseError> {
        self.pattern(PatMode::NoSeq)
    }
}
