//! Token classifiers.
//!
//! Boolean predicates over tokens: intro sets for expressions and
//! definitions, modifier detection, statement separators, and soft
//! keywords. Soft keywords are ordinary identifiers that only act as
//! keywords in context; they are matched by pre-interned `Name` so the
//! checks stay integer compares.

use vela_ir::{Name, StringInterner, TokenKind};

use crate::Parser;

/// Pre-interned soft keyword and operator names.
#[derive(Clone, Debug)]
pub(crate) struct SoftKeywords {
    pub using: Name,
    pub then: Name,
    pub derives: Name,
    pub extension: Name,
    pub inline: Name,
    pub opaque: Name,
    pub open: Name,
    pub transparent: Name,
    pub infix: Name,
    pub end: Name,
    pub as_: Name,
    pub star: Name,
    pub question: Name,
    pub minus: Name,
    pub plus: Name,
    pub tilde: Name,
    pub bang: Name,
    pub pipe: Name,
    pub amp: Name,
    pub match_op: Name,
}

impl SoftKeywords {
    pub fn new(interner: &StringInterner) -> Self {
        SoftKeywords {
            using: interner.intern("using"),
            then: interner.intern("then"),
            derives: interner.intern("derives"),
            extension: interner.intern("extension"),
            inline: interner.intern("inline"),
            opaque: interner.intern("opaque"),
            open: interner.intern("open"),
            transparent: interner.intern("transparent"),
            infix: interner.intern("infix"),
            end: interner.intern("end"),
            as_: interner.intern("as"),
            star: interner.intern("*"),
            question: interner.intern("?"),
            minus: interner.intern("-"),
            plus: interner.intern("+"),
            tilde: interner.intern("~"),
            bang: interner.intern("!"),
            pipe: interner.intern("|"),
            amp: interner.intern("&"),
            match_op: interner.intern("match"),
        }
    }
}

/// Whether a token can begin an expression.
pub(crate) fn is_expr_intro(kind: &TokenKind) -> bool {
    kind.is_literal()
        || matches!(
            kind,
            TokenKind::Ident(_)
                | TokenKind::QuotedIdent(_)
                | TokenKind::InterpId(_)
                | TokenKind::XmlStart
                | TokenKind::KwIf
                | TokenKind::KwWhile
                | TokenKind::KwFor
                | TokenKind::KwTry
                | TokenKind::KwThrow
                | TokenKind::KwReturn
                | TokenKind::KwDo
                | TokenKind::KwNew
                | TokenKind::KwThis
                | TokenKind::KwSuper
                | TokenKind::KwImplicit
                | TokenKind::LParen
                | TokenKind::LBrace
                | TokenKind::Underscore
                | TokenKind::MacroQuote
                | TokenKind::MacroSplice
                | TokenKind::Unquote
                | TokenKind::Indent
        )
}

/// Whether a token can begin a type.
pub(crate) fn is_type_intro(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident(_)
            | TokenKind::QuotedIdent(_)
            | TokenKind::KwThis
            | TokenKind::KwSuper
            | TokenKind::LParen
            | TokenKind::LBrace
            | TokenKind::LBracket
            | TokenKind::Underscore
            | TokenKind::Unquote
    ) || kind.is_literal()
}

/// Whether a token can begin a pattern.
pub(crate) fn is_pat_intro(kind: &TokenKind) -> bool {
    kind.is_literal()
        || matches!(
            kind,
            TokenKind::Ident(_)
                | TokenKind::QuotedIdent(_)
                | TokenKind::InterpId(_)
                | TokenKind::XmlStart
                | TokenKind::LParen
                | TokenKind::Underscore
                | TokenKind::MacroQuote
                | TokenKind::Unquote
        )
}

/// Whether a token is a hard modifier keyword.
pub(crate) fn is_hard_modifier(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::KwAbstract
            | TokenKind::KwFinal
            | TokenKind::KwSealed
            | TokenKind::KwImplicit
            | TokenKind::KwLazy
            | TokenKind::KwOverride
            | TokenKind::KwPrivate
            | TokenKind::KwProtected
            | TokenKind::KwCase
    )
}

/// Whether a token begins a definition or declaration.
pub(crate) fn is_defn_intro(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::KwVal
            | TokenKind::KwVar
            | TokenKind::KwDef
            | TokenKind::KwType
            | TokenKind::KwClass
            | TokenKind::KwTrait
            | TokenKind::KwObject
            | TokenKind::KwEnum
            | TokenKind::KwGiven
            | TokenKind::KwCase
            | TokenKind::At
    ) || is_hard_modifier(kind)
}

/// Whether a token is a statement separator.
pub(crate) fn is_stat_sep(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Semicolon | TokenKind::Newline | TokenKind::BlankLine
    )
}

/// First character of an operator identifier: symbolic, not
/// letter-initial.
pub(crate) fn is_symbolic_char(c: char) -> bool {
    matches!(
        c,
        '!' | '#' | '%' | '&' | '*' | '+' | '-' | '/' | ':' | '<' | '=' | '>' | '?' | '@'
            | '\\' | '^' | '|' | '~'
    )
}

impl Parser<'_> {
    /// Current token is the given soft keyword identifier.
    pub(crate) fn at_soft_kw(&self, kw: Name) -> bool {
        matches!(self.cursor.current_kind(), TokenKind::Ident(name) if *name == kw)
    }

    /// Current token is an identifier with symbolic first character.
    pub(crate) fn at_operator_ident(&self) -> bool {
        match self.cursor.current_kind() {
            TokenKind::Ident(name) => self
                .interner
                .with_str(*name, |s| s.starts_with(is_symbolic_char)),
            _ => false,
        }
    }

    /// Current token is an enabled soft modifier (`inline`, `open`, ...)
    /// in modifier position: followed by another modifier or a definition
    /// keyword.
    pub(crate) fn at_soft_modifier(&self) -> bool {
        let enabled = (self.dialect.allow_inline_modifier && self.at_soft_kw(self.soft.inline))
            || (self.dialect.allow_open_modifier && self.at_soft_kw(self.soft.open))
            || (self.dialect.allow_opaque_types && self.at_soft_kw(self.soft.opaque))
            || (self.dialect.allow_transparent_modifier
                && self.at_soft_kw(self.soft.transparent))
            || (self.dialect.allow_infix_modifier && self.at_soft_kw(self.soft.infix));
        if !enabled {
            return false;
        }
        let next = self.cursor.peek_kind();
        is_defn_intro(next) || is_hard_modifier(next) || matches!(next, TokenKind::Ident(_))
    }

    /// Current token begins a definition, counting enabled soft intros
    /// (`extension`, soft modifiers).
    pub(crate) fn at_defn_intro(&self) -> bool {
        is_defn_intro(self.cursor.current_kind())
            || (self.dialect.allow_extension_methods
                && self.at_soft_kw(self.soft.extension)
                && matches!(
                    self.cursor.peek_kind(),
                    TokenKind::LParen | TokenKind::LBracket
                ))
            || self.at_soft_modifier()
    }

    /// Resolve an identifier token's text.
    pub(crate) fn name_text(&self, name: Name) -> String {
        self.interner.lookup(name)
    }
}
