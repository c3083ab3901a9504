//! Syntax tree node library.
//!
//! One struct per tree family, each `{ kind, origin }` with the kind as a
//! tagged variant enum. Nodes are produced bottom-up by the parser and
//! never mutated after construction.
//!
//! Every family's kind enum carries a `Quasi` variant; those are only
//! produced under dialects with `allow_unquotes` set.

mod member;
mod pat;
mod stat;
mod term;
mod ty;

pub use member::{
    Annotation, ClauseMode, Init, Mod, ModKind, ParamClause, SelfType, Template, TermParam,
    TypeParam,
};
pub use pat::{Pat, PatKind};
pub use stat::{
    Ctor, Decl, DeclKind, Defn, DefnKind, Export, Import, Importee, ImporteeKind, Importer,
    MultiSource, PrimaryCtor, Source, Stat, StatKind,
};
pub use term::{Case, Enumerator, EnumeratorKind, Term, TermKind};
pub use ty::{Type, TypeBounds, TypeCase, TypeKind};

use std::fmt;

use crate::{Name, Span};

/// Source origin of a tree node.
///
/// Records the trimmed token range `[token_start, token_end)` (trivia
/// skipped at both ends) and the byte span it covers. An empty range has
/// `token_start == token_end` and a zero-length span.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Origin {
    pub token_start: u32,
    pub token_end: u32,
    pub span: Span,
}

impl Origin {
    /// Origin for synthesized nodes with no source counterpart.
    pub const NONE: Origin = Origin {
        token_start: 0,
        token_end: 0,
        span: Span::DUMMY,
    };

    #[inline]
    pub fn new(token_start: u32, token_end: u32, span: Span) -> Self {
        Origin {
            token_start,
            token_end,
            span,
        }
    }

    /// Whether this origin covers no tokens.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.token_start == self.token_end
    }

    /// Whether another origin's token range lies within this one.
    #[inline]
    pub fn encloses(&self, other: &Origin) -> bool {
        self.token_start <= other.token_start && other.token_end <= self.token_end
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tok[{}..{}) @ {}",
            self.token_start, self.token_end, self.span
        )
    }
}

/// A named leaf with its own origin, used wherever a sub-tree position for
/// a bare name matters (selectors, infix operators, definition names).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Ident {
    pub name: Name,
    pub origin: Origin,
}

impl Ident {
    pub fn new(name: Name, origin: Origin) -> Self {
        Ident { name, origin }
    }

    /// A synthesized name with no source position.
    pub fn synthetic(name: Name) -> Self {
        Ident {
            name,
            origin: Origin::NONE,
        }
    }
}

/// Literal values.
///
/// Float and double literals keep their raw text: the parser validates the
/// range but downstream consumers decide the rounding semantics.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Lit {
    Unit,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(Name),
    Double(Name),
    Char(char),
    String(Name),
    Symbol(Name),
    Null,
}

/// An unquote escape inside a quasiquoted tree: `$name` or `${ expr }`.
///
/// The body is always a term; the family of the `Quasi` variant it sits in
/// determines what the unquoted value must expand to.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Quasi {
    pub body: Box<Term>,
}

impl Quasi {
    pub fn new(body: Term) -> Self {
        Quasi {
            body: Box::new(body),
        }
    }
}
