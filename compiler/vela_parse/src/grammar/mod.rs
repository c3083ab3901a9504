//! Grammar modules.
//!
//! Each module extends [`Parser`] with methods for one grammar family:
//!
//! - [`ty`]: type expressions
//! - [`pat`]: patterns (three sequence modes)
//! - [`expr`]: expressions, control forms, interpolation, quote/splice
//! - [`defn`]: definitions, declarations, imports/exports, modifiers
//! - [`template`]: class/trait/object bodies and inheritance clauses
//!
//! Context sensitivity is explicit: expression productions thread a
//! [`Location`], pattern productions a [`PatMode`], and template
//! productions a [`TemplateOwner`]. No production consults hidden state
//! beyond the cursor, the dialect, and the quote-nesting counters.

pub(crate) mod defn;
mod expr;
mod pat;
mod template;
mod ty;

use vela_diagnostic::ErrorCode;
use vela_ir::TokenKind;

use crate::cursor::Region;
use crate::error::ParseError;
use crate::Parser;

/// Statement position of the expression being parsed, used to
/// disambiguate lambdas, self-types, repeated arguments, and ascription
/// scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Location {
    NoStat,
    BlockStat,
    TemplateStat,
    PostfixStat,
}

/// Sequence context for pattern parsing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PatMode {
    /// `_*` is legal as the final element.
    SeqOk,
    /// No sequence wildcard.
    NoSeq,
    /// Sequence wildcard and XML literal patterns are legal.
    XmlSeqOk,
}

impl PatMode {
    pub(crate) fn seq_ok(self) -> bool {
        matches!(self, PatMode::SeqOk | PatMode::XmlSeqOk)
    }
}

/// What kind of definition owns the template being parsed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TemplateOwner {
    Class,
    CaseClass,
    Trait,
    Enum,
    Object,
}

impl TemplateOwner {
    pub(crate) fn allows_secondary_ctor(self) -> bool {
        matches!(
            self,
            TemplateOwner::Class | TemplateOwner::CaseClass | TemplateOwner::Enum
        )
    }

    pub(crate) fn allows_enum_cases(self) -> bool {
        matches!(self, TemplateOwner::Enum)
    }
}

impl Parser<'_> {
    /// Run `body` between `(` and `)` with newlines invisible.
    pub(crate) fn in_parens<T>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.accept(&TokenKind::LParen)?;
        self.cursor.push_region(Region::Paren);
        self.cursor.skip_newlines();
        let result = body(self);
        self.cursor.pop_region();
        let value = result?;
        self.accept(&TokenKind::RParen)?;
        Ok(value)
    }

    /// Run `body` between `[` and `]` with newlines invisible.
    pub(crate) fn in_brackets<T>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.accept(&TokenKind::LBracket)?;
        self.cursor.push_region(Region::Paren);
        self.cursor.skip_newlines();
        let result = body(self);
        self.cursor.pop_region();
        let value = result?;
        self.accept(&TokenKind::RBracket)?;
        Ok(value)
    }

    /// Run `body` between `{` and `}` with newlines significant.
    pub(crate) fn in_braces<T>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.accept(&TokenKind::LBrace)?;
        self.cursor.push_region(Region::Brace);
        self.cursor.skip_newlines();
        let result = body(self);
        self.cursor.pop_region();
        let value = result?;
        self.cursor.skip_newlines();
        self.accept(&TokenKind::RBrace)?;
        Ok(value)
    }

    /// Comma-separated items until the terminator. Honors trailing commas
    /// when the dialect allows them.
    pub(crate) fn comma_series<T>(
        &mut self,
        terminator: &TokenKind,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = Vec::new();
        self.cursor.skip_newlines();
        if self.check(terminator) {
            return Ok(items);
        }
        loop {
            items.push(item(self)?);
            self.cursor.skip_newlines();
            if !self.accept_opt(&TokenKind::Comma) {
                break;
            }
            self.cursor.skip_newlines();
            if self.check(terminator) {
                if self.dialect.allow_trailing_commas {
                    break;
                }
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    format!(
                        "unexpected trailing `,` before `{}`",
                        terminator.display_name()
                    ),
                    self.cursor.previous_span(),
                ));
            }
        }
        Ok(items)
    }

    /// Whether the current token separates statements.
    pub(crate) fn at_stat_sep(&self) -> bool {
        crate::classifier::is_stat_sep(self.current_kind())
    }

    /// Accept one statement separator (and any following line ends). A
    /// dedent below the innermost indentation region also separates; the
    /// synthesized `Outdent` is left for the caller to observe.
    pub(crate) fn accept_stat_sep(&mut self) -> Result<(), ParseError> {
        if self.cursor.observe_outdented() {
            return Ok(());
        }
        if !self.at_stat_sep() {
            return Err(ParseError::new(
                ErrorCode::E1001,
                format!(
                    "`;` or newline expected but `{}` found",
                    self.current_kind().display_name()
                ),
                self.current_span(),
            ));
        }
        self.advance();
        self.skip_stat_seps();
        Ok(())
    }

    /// Skip separators without running past a dedent.
    pub(crate) fn skip_stat_seps(&mut self) {
        while !self.cursor.observe_outdented() && self.at_stat_sep() {
            self.advance();
        }
    }

}
