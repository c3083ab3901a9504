//! Statement-level nodes: definitions, declarations, imports, packagings.

use std::fmt;

use crate::Name;

use super::{
    Ident, Init, Mod, Origin, ParamClause, Pat, Quasi, Template, Term, Type, TypeBounds, TypeParam,
};

/// A statement with its origin.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Stat {
    pub kind: StatKind,
    pub origin: Origin,
}

impl Stat {
    #[inline]
    pub fn new(kind: StatKind, origin: Origin) -> Self {
        Stat { kind, origin }
    }
}

impl fmt::Debug for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)
    }
}

/// Statement variants.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum StatKind {
    Term(Box<Term>),
    Defn(Defn),
    Decl(Decl),
    Import(Import),
    Export(Export),
    /// `package a.b` followed by the rest of the unit, or
    /// `package a.b { stats }`.
    Pkg {
        reference: Box<Term>,
        stats: Vec<Stat>,
    },
    /// `package object name { .. }`
    PkgObject {
        mods: Vec<Mod>,
        name: Ident,
        templ: Template,
    },
    /// A secondary constructor inside a template body.
    Ctor(Ctor),
    /// `end name` / `end if` under significant indentation.
    EndMarker { name: Name },
    Quasi(Quasi),
}

/// A definition with a body.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Defn {
    pub kind: DefnKind,
    pub origin: Origin,
}

impl Defn {
    #[inline]
    pub fn new(kind: DefnKind, origin: Origin) -> Self {
        Defn { kind, origin }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum DefnKind {
    Val {
        mods: Vec<Mod>,
        pats: Vec<Pat>,
        decltpe: Option<Type>,
        rhs: Box<Term>,
    },
    Var {
        mods: Vec<Mod>,
        pats: Vec<Pat>,
        decltpe: Option<Type>,
        /// `None` encodes the uninitialized form `var x: T = _`.
        rhs: Option<Box<Term>>,
    },
    Def {
        mods: Vec<Mod>,
        name: Ident,
        tparams: Vec<TypeParam>,
        paramss: Vec<ParamClause>,
        decltpe: Option<Type>,
        body: Box<Term>,
    },
    Type {
        mods: Vec<Mod>,
        name: Ident,
        tparams: Vec<TypeParam>,
        bounds: TypeBounds,
        body: Box<Type>,
    },
    Class {
        mods: Vec<Mod>,
        name: Ident,
        tparams: Vec<TypeParam>,
        ctor: PrimaryCtor,
        templ: Template,
    },
    Trait {
        mods: Vec<Mod>,
        name: Ident,
        tparams: Vec<TypeParam>,
        ctor: PrimaryCtor,
        templ: Template,
    },
    Object {
        mods: Vec<Mod>,
        name: Ident,
        templ: Template,
    },
    Enum {
        mods: Vec<Mod>,
        name: Ident,
        tparams: Vec<TypeParam>,
        ctor: PrimaryCtor,
        templ: Template,
    },
    EnumCase {
        mods: Vec<Mod>,
        name: Ident,
        tparams: Vec<TypeParam>,
        ctor: PrimaryCtor,
        inits: Vec<Init>,
    },
    /// `case A, B, C` inside an enum body.
    RepeatedEnumCase { mods: Vec<Mod>, names: Vec<Ident> },
    /// `given name: T with { stats }` (structural instance).
    Given {
        mods: Vec<Mod>,
        name: Option<Ident>,
        tparams: Vec<TypeParam>,
        paramss: Vec<ParamClause>,
        templ: Template,
    },
    /// `given name: T = body` (alias instance).
    GivenAlias {
        mods: Vec<Mod>,
        name: Option<Ident>,
        tparams: Vec<TypeParam>,
        paramss: Vec<ParamClause>,
        decltpe: Box<Type>,
        body: Box<Term>,
    },
    /// `extension [Ts](x: T) def f...` / `extension (x: T) { defs }`
    ExtensionGroup {
        mods: Vec<Mod>,
        tparams: Vec<TypeParam>,
        paramss: Vec<ParamClause>,
        body: Vec<Stat>,
    },
    Quasi(Quasi),
}

/// A declaration (no body).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Decl {
    pub kind: DeclKind,
    pub origin: Origin,
}

impl Decl {
    #[inline]
    pub fn new(kind: DeclKind, origin: Origin) -> Self {
        Decl { kind, origin }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclKind {
    Val {
        mods: Vec<Mod>,
        pats: Vec<Pat>,
        decltpe: Box<Type>,
    },
    Var {
        mods: Vec<Mod>,
        pats: Vec<Pat>,
        decltpe: Box<Type>,
    },
    Def {
        mods: Vec<Mod>,
        name: Ident,
        tparams: Vec<TypeParam>,
        paramss: Vec<ParamClause>,
        decltpe: Box<Type>,
    },
    Type {
        mods: Vec<Mod>,
        name: Ident,
        tparams: Vec<TypeParam>,
        bounds: TypeBounds,
    },
    /// An abstract given; must be named.
    Given {
        mods: Vec<Mod>,
        name: Ident,
        tparams: Vec<TypeParam>,
        paramss: Vec<ParamClause>,
        decltpe: Box<Type>,
    },
    Quasi(Quasi),
}

/// The primary constructor of a class/trait/enum.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct PrimaryCtor {
    pub mods: Vec<Mod>,
    pub paramss: Vec<ParamClause>,
    pub origin: Origin,
}

/// A secondary constructor: `def this(params) = { this(...); stats }`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Ctor {
    pub mods: Vec<Mod>,
    pub paramss: Vec<ParamClause>,
    /// The mandatory leading delegate call `this(...)`.
    pub init: Init,
    pub stats: Vec<Stat>,
    pub origin: Origin,
}

/// `import importer, importer`
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Import {
    pub importers: Vec<Importer>,
}

/// `export importer, importer`
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Export {
    pub importers: Vec<Importer>,
}

/// `ref.{ importees }` / `ref.name`
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Importer {
    pub reference: Term,
    pub importees: Vec<Importee>,
    pub origin: Origin,
}

/// One selected item of an importer.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Importee {
    pub kind: ImporteeKind,
    pub origin: Origin,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ImporteeKind {
    /// `_` / `*`
    Wildcard,
    /// `given`
    GivenAll,
    /// `given T`
    Given { tpe: Type },
    Name { name: Name },
    /// `a => b` / `a as b`
    Rename { name: Name, rename: Name },
    /// `a => _` / `a as _`
    Unimport { name: Name },
    Quasi(Quasi),
}

/// A parsed compilation unit.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Source {
    pub stats: Vec<Stat>,
    pub origin: Origin,
}

/// Multiple sources from one interactive input, delimited by `@`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MultiSource {
    pub sources: Vec<Source>,
}
