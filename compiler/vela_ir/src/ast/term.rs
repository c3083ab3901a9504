//! Term (expression) nodes.

use std::fmt;

use crate::Name;

use super::{
    Annotation, Ident, Init, Lit, Origin, Pat, Quasi, Stat, Template, TermParam, Type, TypeParam,
};

/// A term with its origin.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Term {
    pub kind: TermKind,
    pub origin: Origin,
}

impl Term {
    #[inline]
    pub fn new(kind: TermKind, origin: Origin) -> Self {
        Term { kind, origin }
    }

    /// Whether this term is syntactically a path: a name, `this`/`super`,
    /// or a chain of selections over a path.
    pub fn is_path(&self) -> bool {
        match &self.kind {
            TermKind::Name(_) | TermKind::This { .. } | TermKind::Super { .. } => true,
            TermKind::Select { qual, .. } => qual.is_path(),
            _ => false,
        }
    }

    /// Whether this term can be the qualifier of a stable reference.
    pub fn is_stable_ref(&self) -> bool {
        match &self.kind {
            TermKind::Name(_) => true,
            TermKind::Select { qual, .. } => qual.is_path(),
            _ => false,
        }
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)
    }
}

/// Term variants.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TermKind {
    Lit(Lit),
    /// A reference by name (alphanumeric, symbolic, or backquoted).
    Name(Name),
    /// `qual.name`
    Select { qual: Box<Term>, name: Ident },
    /// `this` or `qual.this`
    This { qual: Option<Name> },
    /// `super`, `qual.super`, `super[mix]`, `qual.super[mix]`
    Super {
        this_qual: Option<Name>,
        super_qual: Option<Name>,
    },
    /// `fun(args)`
    Apply { fun: Box<Term>, args: Vec<Term> },
    /// `fun(using args)`
    ApplyUsing { fun: Box<Term>, args: Vec<Term> },
    /// `fun[targs]`
    ApplyType { fun: Box<Term>, targs: Vec<Type> },
    /// `lhs op[targs] (args)`
    ApplyInfix {
        lhs: Box<Term>,
        op: Ident,
        targs: Vec<Type>,
        args: Vec<Term>,
    },
    /// `op arg` for prefix `-`, `+`, `~`, `!`
    ApplyUnary { op: Ident, arg: Box<Term> },
    /// `expr op` with no operand following
    ApplyPostfix { operand: Box<Term>, op: Ident },
    /// `lhs = rhs`
    Assign { lhs: Box<Term>, rhs: Box<Term> },
    /// `return` / `return expr`
    Return { expr: Option<Box<Term>> },
    /// `throw expr`
    Throw { expr: Box<Term> },
    /// `expr: tpe`
    Ascribe { expr: Box<Term>, tpe: Box<Type> },
    /// `expr: @annot ...`
    Annotate {
        expr: Box<Term>,
        annots: Vec<Annotation>,
    },
    /// `(a, b, ...)`
    Tuple { args: Vec<Term> },
    /// `{ stats }` or an indented block
    Block { stats: Vec<Stat> },
    /// `if cond then t else e` / `if (cond) t else e`
    If {
        cond: Box<Term>,
        then_branch: Box<Term>,
        else_branch: Option<Box<Term>>,
    },
    /// `expr match { cases }`
    Match { expr: Box<Term>, cases: Vec<Case> },
    /// `try expr catch { cases } finally f`
    Try {
        expr: Box<Term>,
        cases: Vec<Case>,
        finally_branch: Option<Box<Term>>,
    },
    /// `try expr catch handler finally f` where the handler is a term
    TryWithHandler {
        expr: Box<Term>,
        handler: Box<Term>,
        finally_branch: Option<Box<Term>>,
    },
    /// `(params) => body`
    Function {
        params: Vec<TermParam>,
        body: Box<Term>,
    },
    /// `(params) ?=> body`
    ContextFunction {
        params: Vec<TermParam>,
        body: Box<Term>,
    },
    /// `[tparams] => body`
    PolyFunction {
        tparams: Vec<TypeParam>,
        body: Box<Term>,
    },
    /// `{ case ... }` in expression position
    PartialFunction { cases: Vec<Case> },
    /// `while (cond) body` / `while cond do body`
    While { cond: Box<Term>, body: Box<Term> },
    /// `do body while (cond)`
    Do { body: Box<Term>, cond: Box<Term> },
    /// `for (enums) body` / `for { enums } body`
    For {
        enums: Vec<Enumerator>,
        body: Box<Term>,
    },
    /// `for (enums) yield body`
    ForYield {
        enums: Vec<Enumerator>,
        body: Box<Term>,
    },
    /// `new Init`
    New { init: Init },
    /// `new { .. }` / `new Parent with Parent { .. }`
    NewAnonymous { templ: Template },
    /// `_` in expression position
    Placeholder,
    /// `f _`
    Eta { expr: Box<Term> },
    /// `expr*` / `expr: _*` vararg splice at argument position
    Repeated { expr: Box<Term> },
    /// `id"parts${args}..."`
    Interpolate {
        prefix: Ident,
        parts: Vec<Lit>,
        args: Vec<Term>,
    },
    /// XML literal with embedded splices.
    Xml { parts: Vec<Lit>, args: Vec<Term> },
    /// `'{ body }`
    QuotedExpr { body: Box<Term> },
    /// `'[ tpe ]`
    QuotedType { tpe: Box<Type> },
    /// `${ body }`
    SplicedExpr { body: Box<Term> },
    Quasi(Quasi),
}

/// One `case pat if cond => body` arm.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Case {
    pub pat: Pat,
    pub cond: Option<Term>,
    pub body: Term,
    pub origin: Origin,
}

/// One element of a `for` comprehension header.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Enumerator {
    pub kind: EnumeratorKind,
    pub origin: Origin,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum EnumeratorKind {
    /// `pat <- rhs`
    Generator { pat: Pat, rhs: Term },
    /// `if cond`
    Guard { cond: Term },
    /// `pat = rhs`
    Val { pat: Pat, rhs: Term },
    Quasi(Quasi),
}
