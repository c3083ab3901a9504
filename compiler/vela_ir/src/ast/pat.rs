//! Pattern nodes.

use std::fmt;

use crate::Name;

use super::{Ident, Lit, Origin, Quasi, Term, Type};

/// A pattern with its origin.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Pat {
    pub kind: PatKind,
    pub origin: Origin,
}

impl Pat {
    #[inline]
    pub fn new(kind: PatKind, origin: Origin) -> Self {
        Pat { kind, origin }
    }
}

impl fmt::Debug for Pat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)
    }
}

/// Pattern variants.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum PatKind {
    /// `_`
    Wildcard,
    /// `_*`, only legal as the last element of a sequence context.
    SeqWildcard,
    /// A binder introduced by the pattern (lower-case name, or any name
    /// before `@` under the upper-case-binding dialect flag).
    Var { name: Name },
    Lit(Lit),
    /// A stable reference: backquoted name or a path selection.
    Ref { path: Box<Term> },
    /// `name @ pat`
    Bind { lhs: Box<Pat>, rhs: Box<Pat> },
    /// `p | q`
    Alternative { lhs: Box<Pat>, rhs: Box<Pat> },
    /// `(a, b, ...)`
    Tuple { args: Vec<Pat> },
    /// `Ctor(p, ...)`, the function being a path with optional type args.
    Extract {
        fun: Box<Term>,
        targs: Vec<Type>,
        args: Vec<Pat>,
    },
    /// `p op (q, ...)`
    ExtractInfix {
        lhs: Box<Pat>,
        op: Ident,
        args: Vec<Pat>,
    },
    /// `p: T`
    Typed { lhs: Box<Pat>, rhs: Box<Type> },
    /// `id"parts${pats}..."` in pattern position.
    Interpolate {
        prefix: Ident,
        parts: Vec<Lit>,
        args: Vec<Pat>,
    },
    /// XML literal pattern with embedded pattern splices.
    Xml { parts: Vec<Lit>, args: Vec<Pat> },
    /// Quoted pattern: `'{ ... }` / `'[ ... ]` in pattern position.
    Macro { body: Box<Term> },
    Quasi(Quasi),
}
