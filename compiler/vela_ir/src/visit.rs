//! Tree traversal.
//!
//! A visitor with default `walk_*` implementations covering every family.
//! Override the `visit_*` hooks you care about and call the corresponding
//! `walk_*` to continue into children.

use crate::ast::{
    Annotation, Case, Ctor, Decl, DeclKind, Defn, DefnKind, Enumerator, EnumeratorKind, Importer,
    Init, Mod, ModKind, ParamClause, Pat, PatKind, PrimaryCtor, SelfType, Source, Stat, StatKind,
    Template, Term, TermKind, TermParam, Type, TypeBounds, TypeCase, TypeKind, TypeParam,
};

pub trait Visitor: Sized {
    fn visit_source(&mut self, source: &Source) {
        walk_source(self, source);
    }
    fn visit_stat(&mut self, stat: &Stat) {
        walk_stat(self, stat);
    }
    fn visit_term(&mut self, term: &Term) {
        walk_term(self, term);
    }
    fn visit_type(&mut self, tpe: &Type) {
        walk_type(self, tpe);
    }
    fn visit_pat(&mut self, pat: &Pat) {
        walk_pat(self, pat);
    }
    fn visit_case(&mut self, case: &Case) {
        walk_case(self, case);
    }
    fn visit_enumerator(&mut self, enumerator: &Enumerator) {
        walk_enumerator(self, enumerator);
    }
    fn visit_mod(&mut self, modifier: &Mod) {
        walk_mod(self, modifier);
    }
    fn visit_init(&mut self, init: &Init) {
        walk_init(self, init);
    }
    fn visit_template(&mut self, templ: &Template) {
        walk_template(self, templ);
    }
    fn visit_self_type(&mut self, _self_type: &SelfType) {}
    fn visit_term_param(&mut self, param: &TermParam) {
        walk_term_param(self, param);
    }
    fn visit_type_param(&mut self, param: &TypeParam) {
        walk_type_param(self, param);
    }
    fn visit_defn(&mut self, defn: &Defn) {
        walk_defn(self, defn);
    }
    fn visit_decl(&mut self, decl: &Decl) {
        walk_decl(self, decl);
    }
    fn visit_ctor(&mut self, ctor: &Ctor) {
        walk_ctor(self, ctor);
    }
    fn visit_importer(&mut self, importer: &Importer) {
        walk_importer(self, importer);
    }
}

pub fn walk_source<V: Visitor>(v: &mut V, source: &Source) {
    for stat in &source.stats {
        v.visit_stat(stat);
    }
}

pub fn walk_stat<V: Visitor>(v: &mut V, stat: &Stat) {
    match &stat.kind {
        StatKind::Term(term) => v.visit_term(term),
        StatKind::Defn(defn) => v.visit_defn(defn),
        StatKind::Decl(decl) => v.visit_decl(decl),
        StatKind::Import(import) => {
            for importer in &import.importers {
                v.visit_importer(importer);
            }
        }
        StatKind::Export(export) => {
            for importer in &export.importers {
                v.visit_importer(importer);
            }
        }
        StatKind::Pkg { reference, stats } => {
            v.visit_term(reference);
            for stat in stats {
                v.visit_stat(stat);
            }
        }
        StatKind::PkgObject { mods, templ, .. } => {
            for m in mods {
                v.visit_mod(m);
            }
            v.visit_template(templ);
        }
        StatKind::Ctor(ctor) => v.visit_ctor(ctor),
        StatKind::EndMarker { .. } => {}
        StatKind::Quasi(quasi) => v.visit_term(&quasi.body),
    }
}

pub fn walk_term<V: Visitor>(v: &mut V, term: &Term) {
    match &term.kind {
        TermKind::Lit(_)
        | TermKind::Name(_)
        | TermKind::This { .. }
        | TermKind::Super { .. }
        | TermKind::Placeholder => {}
        TermKind::Select { qual, .. } => v.visit_term(qual),
        TermKind::Apply { fun, args } | TermKind::ApplyUsing { fun, args } => {
            v.visit_term(fun);
            for arg in args {
                v.visit_term(arg);
            }
        }
        TermKind::ApplyType { fun, targs } => {
            v.visit_term(fun);
            for targ in targs {
                v.visit_type(targ);
            }
        }
        TermKind::ApplyInfix {
            lhs, targs, args, ..
        } => {
            v.visit_term(lhs);
            for targ in targs {
                v.visit_type(targ);
            }
            for arg in args {
                v.visit_term(arg);
            }
        }
        TermKind::ApplyUnary { arg, .. } => v.visit_term(arg),
        TermKind::ApplyPostfix { operand, .. } => v.visit_term(operand),
        TermKind::Assign { lhs, rhs } => {
            v.visit_term(lhs);
            v.visit_term(rhs);
        }
        TermKind::Return { expr } => {
            if let Some(expr) = expr {
                v.visit_term(expr);
            }
        }
        TermKind::Throw { expr } | TermKind::Eta { expr } | TermKind::Repeated { expr } => {
            v.visit_term(expr);
        }
        TermKind::Ascribe { expr, tpe } => {
            v.visit_term(expr);
            v.visit_type(tpe);
        }
        TermKind::Annotate { expr, annots } => {
            v.visit_term(expr);
            for annot in annots {
                walk_annotation(v, annot);
            }
        }
        TermKind::Tuple { args } => {
            for arg in args {
                v.visit_term(arg);
            }
        }
        TermKind::Block { stats } => {
            for stat in stats {
                v.visit_stat(stat);
            }
        }
        TermKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            v.visit_term(cond);
            v.visit_term(then_branch);
            if let Some(e) = else_branch {
                v.visit_term(e);
            }
        }
        TermKind::Match { expr, cases } => {
            v.visit_term(expr);
            for case in cases {
                v.visit_case(case);
            }
        }
        TermKind::Try {
            expr,
            cases,
            finally_branch,
        } => {
            v.visit_term(expr);
            for case in cases {
                v.visit_case(case);
            }
            if let Some(f) = finally_branch {
                v.visit_term(f);
            }
        }
        TermKind::TryWithHandler {
            expr,
            handler,
            finally_branch,
        } => {
            v.visit_term(expr);
            v.visit_term(handler);
            if let Some(f) = finally_branch {
                v.visit_term(f);
            }
        }
        TermKind::Function { params, body } | TermKind::ContextFunction { params, body } => {
            for param in params {
                v.visit_term_param(param);
            }
            v.visit_term(body);
        }
        TermKind::PolyFunction { tparams, body } => {
            for tparam in tparams {
                v.visit_type_param(tparam);
            }
            v.visit_term(body);
        }
        TermKind::PartialFunction { cases } => {
            for case in cases {
                v.visit_case(case);
            }
        }
        TermKind::While { cond, body } => {
            v.visit_term(cond);
            v.visit_term(body);
        }
        TermKind::Do { body, cond } => {
            v.visit_term(body);
            v.visit_term(cond);
        }
        TermKind::For { enums, body } | TermKind::ForYield { enums, body } => {
            for e in enums {
                v.visit_enumerator(e);
            }
            v.visit_term(body);
        }
        TermKind::New { init } => v.visit_init(init),
        TermKind::NewAnonymous { templ } => v.visit_template(templ),
        TermKind::Interpolate { args, .. } => {
            for arg in args {
                v.visit_term(arg);
            }
        }
        TermKind::Xml { args, .. } => {
            for arg in args {
                v.visit_term(arg);
            }
        }
        TermKind::QuotedExpr { body } | TermKind::SplicedExpr { body } => v.visit_term(body),
        TermKind::QuotedType { tpe } => v.visit_type(tpe),
        TermKind::Quasi(quasi) => v.visit_term(&quasi.body),
    }
}

pub fn walk_type<V: Visitor>(v: &mut V, tpe: &Type) {
    match &tpe.kind {
        TypeKind::Name(_) | TypeKind::Literal(_) | TypeKind::Var { .. } => {}
        TypeKind::Select { qual, .. } => v.visit_term(qual),
        TypeKind::Project { qual, .. } => v.visit_type(qual),
        TypeKind::Singleton { reference } => v.visit_term(reference),
        TypeKind::Apply { tpe, args } => {
            v.visit_type(tpe);
            for arg in args {
                v.visit_type(arg);
            }
        }
        TypeKind::ApplyInfix { lhs, rhs, .. } | TypeKind::With { lhs, rhs } => {
            v.visit_type(lhs);
            v.visit_type(rhs);
        }
        TypeKind::Function { params, res } | TypeKind::ContextFunction { params, res } => {
            for param in params {
                v.visit_type(param);
            }
            v.visit_type(res);
        }
        TypeKind::DependentFunction { params, res } => {
            for param in params {
                v.visit_term_param(param);
            }
            v.visit_type(res);
        }
        TypeKind::PolyFunction { tparams, res } => {
            for tparam in tparams {
                v.visit_type_param(tparam);
            }
            v.visit_type(res);
        }
        TypeKind::Lambda { tparams, body } => {
            for tparam in tparams {
                v.visit_type_param(tparam);
            }
            v.visit_type(body);
        }
        TypeKind::Tuple { args } => {
            for arg in args {
                v.visit_type(arg);
            }
        }
        TypeKind::Refine { tpe, stats } => {
            if let Some(tpe) = tpe {
                v.visit_type(tpe);
            }
            for stat in stats {
                v.visit_stat(stat);
            }
        }
        TypeKind::Existential { tpe, stats } => {
            v.visit_type(tpe);
            for stat in stats {
                v.visit_stat(stat);
            }
        }
        TypeKind::Match { tpe, cases } => {
            v.visit_type(tpe);
            for case in cases {
                walk_type_case(v, case);
            }
        }
        TypeKind::Annotate { tpe, annots } => {
            v.visit_type(tpe);
            for annot in annots {
                walk_annotation(v, annot);
            }
        }
        TypeKind::Wildcard { bounds } => walk_type_bounds(v, bounds),
        TypeKind::Repeated { tpe } | TypeKind::ByName { tpe } => v.visit_type(tpe),
        TypeKind::Quasi(quasi) => v.visit_term(&quasi.body),
    }
}

pub fn walk_pat<V: Visitor>(v: &mut V, pat: &Pat) {
    match &pat.kind {
        PatKind::Wildcard | PatKind::SeqWildcard | PatKind::Var { .. } | PatKind::Lit(_) => {}
        PatKind::Ref { path } => v.visit_term(path),
        PatKind::Bind { lhs, rhs } | PatKind::Alternative { lhs, rhs } => {
            v.visit_pat(lhs);
            v.visit_pat(rhs);
        }
        PatKind::Tuple { args } => {
            for arg in args {
                v.visit_pat(arg);
            }
        }
        PatKind::Extract { fun, targs, args } => {
            v.visit_term(fun);
            for targ in targs {
                v.visit_type(targ);
            }
            for arg in args {
                v.visit_pat(arg);
            }
        }
        PatKind::ExtractInfix { lhs, args, .. } => {
            v.visit_pat(lhs);
            for arg in args {
                v.visit_pat(arg);
            }
        }
        PatKind::Typed { lhs, rhs } => {
            v.visit_pat(lhs);
            v.visit_type(rhs);
        }
        PatKind::Interpolate { args, .. } => {
            for arg in args {
                v.visit_pat(arg);
            }
        }
        PatKind::Xml { args, .. } => {
            for arg in args {
                v.visit_pat(arg);
            }
        }
        PatKind::Macro { body } => v.visit_term(body),
        PatKind::Quasi(quasi) => v.visit_term(&quasi.body),
    }
}

pub fn walk_case<V: Visitor>(v: &mut V, case: &Case) {
    v.visit_pat(&case.pat);
    if let Some(cond) = &case.cond {
        v.visit_term(cond);
    }
    v.visit_term(&case.body);
}

pub fn walk_enumerator<V: Visitor>(v: &mut V, enumerator: &Enumerator) {
    match &enumerator.kind {
        EnumeratorKind::Generator { pat, rhs } | EnumeratorKind::Val { pat, rhs } => {
            v.visit_pat(pat);
            v.visit_term(rhs);
        }
        EnumeratorKind::Guard { cond } => v.visit_term(cond),
        EnumeratorKind::Quasi(quasi) => v.visit_term(&quasi.body),
    }
}

pub fn walk_mod<V: Visitor>(v: &mut V, modifier: &Mod) {
    if let ModKind::Annot(annot) = &modifier.kind {
        walk_annotation(v, annot);
    }
}

pub fn walk_annotation<V: Visitor>(v: &mut V, annot: &Annotation) {
    v.visit_init(&annot.init);
}

pub fn walk_init<V: Visitor>(v: &mut V, init: &Init) {
    v.visit_type(&init.tpe);
    for args in &init.argss {
        for arg in args {
            v.visit_term(arg);
        }
    }
}

pub fn walk_template<V: Visitor>(v: &mut V, templ: &Template) {
    for init in &templ.inits {
        v.visit_init(init);
    }
    if let Some(self_type) = &templ.self_type {
        v.visit_self_type(self_type);
    }
    for stat in &templ.stats {
        v.visit_stat(stat);
    }
    for derive in &templ.derives {
        v.visit_type(derive);
    }
}

pub fn walk_term_param<V: Visitor>(v: &mut V, param: &TermParam) {
    for m in &param.mods {
        v.visit_mod(m);
    }
    if let Some(tpe) = &param.decltpe {
        v.visit_type(tpe);
    }
    if let Some(default) = &param.default {
        v.visit_term(default);
    }
}

pub fn walk_type_param<V: Visitor>(v: &mut V, param: &TypeParam) {
    for m in &param.mods {
        v.visit_mod(m);
    }
    for tparam in &param.tparams {
        v.visit_type_param(tparam);
    }
    walk_type_bounds(v, &param.bounds);
    for vbound in &param.vbounds {
        v.visit_type(vbound);
    }
    for cbound in &param.cbounds {
        v.visit_type(cbound);
    }
}

pub fn walk_type_bounds<V: Visitor>(v: &mut V, bounds: &TypeBounds) {
    if let Some(lo) = &bounds.lo {
        v.visit_type(lo);
    }
    if let Some(hi) = &bounds.hi {
        v.visit_type(hi);
    }
}

pub fn walk_type_case<V: Visitor>(v: &mut V, case: &TypeCase) {
    v.visit_type(&case.pat);
    v.visit_type(&case.body);
}

fn walk_param_clause<V: Visitor>(v: &mut V, clause: &ParamClause) {
    for param in &clause.params {
        v.visit_term_param(param);
    }
}

pub fn walk_defn<V: Visitor>(v: &mut V, defn: &Defn) {
    match &defn.kind {
        DefnKind::Val {
            mods,
            pats,
            decltpe,
            rhs,
        } => {
            for m in mods {
                v.visit_mod(m);
            }
            for pat in pats {
                v.visit_pat(pat);
            }
            if let Some(tpe) = decltpe {
                v.visit_type(tpe);
            }
            v.visit_term(rhs);
        }
        DefnKind::Var {
            mods,
            pats,
            decltpe,
            rhs,
        } => {
            for m in mods {
                v.visit_mod(m);
            }
            for pat in pats {
                v.visit_pat(pat);
            }
            if let Some(tpe) = decltpe {
                v.visit_type(tpe);
            }
            if let Some(rhs) = rhs {
                v.visit_term(rhs);
            }
        }
        DefnKind::Def {
            mods,
            tparams,
            paramss,
            decltpe,
            body,
            ..
        } => {
            for m in mods {
                v.visit_mod(m);
            }
            for tparam in tparams {
                v.visit_type_param(tparam);
            }
            for clause in paramss {
                walk_param_clause(v, clause);
            }
            if let Some(tpe) = decltpe {
                v.visit_type(tpe);
            }
            v.visit_term(body);
        }
        DefnKind::Type {
            mods,
            tparams,
            bounds,
            body,
            ..
        } => {
            for m in mods {
                v.visit_mod(m);
            }
            for tparam in tparams {
                v.visit_type_param(tparam);
            }
            walk_type_bounds(v, bounds);
            v.visit_type(body);
        }
        DefnKind::Class {
            mods,
            tparams,
            ctor,
            templ,
            ..
        }
        | DefnKind::Trait {
            mods,
            tparams,
            ctor,
            templ,
            ..
        }
        | DefnKind::Enum {
            mods,
            tparams,
            ctor,
            templ,
            ..
        } => {
            for m in mods {
                v.visit_mod(m);
            }
            for tparam in tparams {
                v.visit_type_param(tparam);
            }
            walk_primary_ctor(v, ctor);
            v.visit_template(templ);
        }
        DefnKind::Object { mods, templ, .. } => {
            for m in mods {
                v.visit_mod(m);
            }
            v.visit_template(templ);
        }
        DefnKind::EnumCase {
            mods,
            tparams,
            ctor,
            inits,
            ..
        } => {
            for m in mods {
                v.visit_mod(m);
            }
            for tparam in tparams {
                v.visit_type_param(tparam);
            }
            walk_primary_ctor(v, ctor);
            for init in inits {
                v.visit_init(init);
            }
        }
        DefnKind::RepeatedEnumCase { mods, .. } => {
            for m in mods {
                v.visit_mod(m);
            }
        }
        DefnKind::Given {
            mods,
            tparams,
            paramss,
            templ,
            ..
        } => {
            for m in mods {
                v.visit_mod(m);
            }
            for tparam in tparams {
                v.visit_type_param(tparam);
            }
            for clause in paramss {
                walk_param_clause(v, clause);
            }
            v.visit_template(templ);
        }
        DefnKind::GivenAlias {
            mods,
            tparams,
            paramss,
            decltpe,
            body,
            ..
        } => {
            for m in mods {
                v.visit_mod(m);
            }
            for tparam in tparams {
                v.visit_type_param(tparam);
            }
            for clause in paramss {
                walk_param_clause(v, clause);
            }
            v.visit_type(decltpe);
            v.visit_term(body);
        }
        DefnKind::ExtensionGroup {
            mods,
            tparams,
            paramss,
            body,
        } => {
            for m in mods {
                v.visit_mod(m);
            }
            for tparam in tparams {
                v.visit_type_param(tparam);
            }
            for clause in paramss {
                walk_param_clause(v, clause);
            }
            for stat in body {
                v.visit_stat(stat);
            }
        }
        DefnKind::Quasi(quasi) => v.visit_term(&quasi.body),
    }
}

pub fn walk_primary_ctor<V: Visitor>(v: &mut V, ctor: &PrimaryCtor) {
    for m in &ctor.mods {
        v.visit_mod(m);
    }
    for clause in &ctor.paramss {
        walk_param_clause(v, clause);
    }
}

pub fn walk_decl<V: Visitor>(v: &mut V, decl: &Decl) {
    match &decl.kind {
        DeclKind::Val { mods, pats, decltpe } | DeclKind::Var { mods, pats, decltpe } => {
            for m in mods {
                v.visit_mod(m);
            }
            for pat in pats {
                v.visit_pat(pat);
            }
            v.visit_type(decltpe);
        }
        DeclKind::Def {
            mods,
            tparams,
            paramss,
            decltpe,
            ..
        } => {
            for m in mods {
                v.visit_mod(m);
            }
            for tparam in tparams {
                v.visit_type_param(tparam);
            }
            for clause in paramss {
                walk_param_clause(v, clause);
            }
            v.visit_type(decltpe);
        }
        DeclKind::Type {
            mods,
            tparams,
            bounds,
            ..
        } => {
            for m in mods {
                v.visit_mod(m);
            }
            for tparam in tparams {
                v.visit_type_param(tparam);
            }
            walk_type_bounds(v, bounds);
        }
        DeclKind::Given {
            mods,
            tparams,
            paramss,
            decltpe,
            ..
        } => {
            for m in mods {
                v.visit_mod(m);
            }
            for tparam in tparams {
                v.visit_type_param(tparam);
            }
            for clause in paramss {
                walk_param_clause(v, clause);
            }
            v.visit_type(decltpe);
        }
        DeclKind::Quasi(quasi) => v.visit_term(&quasi.body),
    }
}

pub fn walk_ctor<V: Visitor>(v: &mut V, ctor: &Ctor) {
    for m in &ctor.mods {
        v.visit_mod(m);
    }
    for clause in &ctor.paramss {
        walk_param_clause(v, clause);
    }
    v.visit_init(&ctor.init);
    for stat in &ctor.stats {
        v.visit_stat(stat);
    }
}

pub fn walk_importer<V: Visitor>(v: &mut V, importer: &Importer) {
    v.visit_term(&importer.reference);
    for importee in &importer.importees {
        if let crate::ast::ImporteeKind::Given { tpe } = &importee.kind {
            v.visit_type(tpe);
        }
    }
}
