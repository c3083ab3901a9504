//! Definition, template, and import/export tests.

use vela_ir::ast::{
    DeclKind, DefnKind, ImporteeKind, Lit, ModKind, PatKind, StatKind, TermKind, TypeKind,
};
use vela_ir::Dialect;

use super::{source, source_err_with, source_with};

fn single_defn(parsed: &super::Parsed<vela_ir::ast::Source>) -> &DefnKind {
    match &parsed.tree.stats[0].kind {
        StatKind::Defn(defn) => &defn.kind,
        other => panic!("expected definition, got {other:?}"),
    }
}

#[test]
fn val_definition() {
    let parsed = source("val answer = 42");
    let DefnKind::Val { pats, rhs, .. } = single_defn(&parsed) else {
        panic!("expected val");
    };
    assert!(matches!(pats[0].kind, PatKind::Var { .. }));
    assert!(matches!(rhs.kind, TermKind::Lit(Lit::Int(42))));
}

#[test]
fn val_with_destructuring_pattern() {
    let parsed = source("val Pair(a, b) = p");
    let DefnKind::Val { pats, .. } = single_defn(&parsed) else {
        panic!("expected val");
    };
    assert!(matches!(pats[0].kind, PatKind::Extract { .. }));
}

#[test]
fn var_definition_and_uninitialized_form() {
    let parsed = source("var count: Int = _");
    let DefnKind::Var { rhs, decltpe, .. } = single_defn(&parsed) else {
        panic!("expected var");
    };
    assert!(decltpe.is_some());
    assert!(rhs.is_none());
}

#[test]
fn val_declaration() {
    let parsed = source("val name: String");
    let StatKind::Decl(decl) = &parsed.tree.stats[0].kind else {
        panic!("expected declaration, got {:?}", parsed.tree.stats[0]);
    };
    assert!(matches!(decl.kind, DeclKind::Val { .. }));
}

#[test]
fn def_definition() {
    let parsed = source("def add(a: Int, b: Int): Int = a + b");
    let DefnKind::Def {
        paramss, decltpe, body, ..
    } = single_defn(&parsed)
    else {
        panic!("expected def");
    };
    assert_eq!(paramss[0].params.len(), 2);
    assert!(decltpe.is_some());
    assert!(matches!(body.kind, TermKind::ApplyInfix { .. }));
}

#[test]
fn def_with_default_argument() {
    let parsed = source("def pad(width: Int = 4): Int = width");
    let DefnKind::Def { paramss, .. } = single_defn(&parsed) else {
        panic!("expected def");
    };
    assert!(paramss[0].params[0].default.is_some());
}

#[test]
fn procedure_syntax_warns_in_classic() {
    let parsed = source_with("def run { go() }", &Dialect::classic());
    assert_eq!(parsed.warnings.len(), 1);
    assert!(parsed.warnings[0].message.contains("procedure syntax"));
    let DefnKind::Def { decltpe, .. } = single_defn(&parsed) else {
        panic!("expected def");
    };
    let tpe = decltpe.as_ref().expect("synthesized result type");
    let TypeKind::Name(name) = tpe.kind else {
        panic!("expected Unit name, got {tpe:?}");
    };
    assert_eq!(parsed.text(name), "Unit");
}

#[test]
fn procedure_syntax_is_an_error_in_modern() {
    let err = source_err_with("def run { go() }", &Dialect::modern());
    assert!(err.message().contains("procedure syntax"));
}

#[test]
fn type_alias_and_declaration() {
    let alias = source("type Result = Entry");
    assert!(matches!(single_defn(&alias), DefnKind::Type { .. }));

    let decl = source("type Repr <: Entry");
    let StatKind::Decl(decl) = &decl.tree.stats[0].kind else {
        panic!("expected declaration");
    };
    let DeclKind::Type { bounds, .. } = &decl.kind else {
        panic!("expected type declaration");
    };
    assert!(bounds.hi.is_some());
}

#[test]
fn class_with_bounded_type_param_and_parents() {
    let parsed = source("class C[T <: Ord[T]](x: T) extends B with M { def f = x }");
    let DefnKind::Class {
        tparams,
        ctor,
        templ,
        ..
    } = single_defn(&parsed)
    else {
        panic!("expected class");
    };
    assert_eq!(tparams.len(), 1);
    let hi = tparams[0].bounds.hi.as_ref().expect("upper bound");
    assert!(matches!(hi.kind, TypeKind::Apply { .. }));

    assert_eq!(ctor.paramss.len(), 1);
    let param = &ctor.paramss[0].params[0];
    assert!(param.mods.is_empty(), "plain parameter carries no val/var");

    assert_eq!(templ.inits.len(), 2);
    assert_eq!(templ.stats.len(), 1);
    let StatKind::Defn(inner) = &templ.stats[0].kind else {
        panic!("expected member def");
    };
    let DefnKind::Def { body, .. } = &inner.kind else {
        panic!("expected def member");
    };
    assert!(matches!(body.kind, TermKind::Name(_)));
}

#[test]
fn case_class_and_case_object() {
    let parsed = source("case class Point(x: Int, y: Int)");
    let DefnKind::Class { mods, ctor, .. } = single_defn(&parsed) else {
        panic!("expected class");
    };
    assert!(mods.iter().any(|m| matches!(m.kind, ModKind::Case)));
    assert_eq!(ctor.paramss[0].params.len(), 2);

    let obj = source("case object Empty");
    let DefnKind::Object { mods, .. } = single_defn(&obj) else {
        panic!("expected object");
    };
    assert!(mods.iter().any(|m| matches!(m.kind, ModKind::Case)));
}

#[test]
fn val_params_in_primary_ctor() {
    let parsed = source("class Box(val value: Int, var dirty: Boolean)");
    let DefnKind::Class { ctor, .. } = single_defn(&parsed) else {
        panic!("expected class");
    };
    let params = &ctor.paramss[0].params;
    assert!(params[0].mods.iter().any(|m| matches!(m.kind, ModKind::ValParam)));
    assert!(params[1].mods.iter().any(|m| matches!(m.kind, ModKind::VarParam)));
}

#[test]
fn repeated_modifier_is_an_error() {
    let err = source_err_with("final final class C", &Dialect::modern());
    assert!(err.message().contains("repeated modifier"));
}

#[test]
fn illegal_modifier_combination() {
    let err = source_err_with("final abstract class C", &Dialect::modern());
    assert!(err.message().contains("illegal combination of modifiers"));
    let access = source_err_with("private protected def f: Int", &Dialect::modern());
    assert!(access.message().contains("illegal combination"));
}

#[test]
fn misplaced_modifiers() {
    let lazy_var = source_err_with("lazy var x = 1", &Dialect::modern());
    assert!(lazy_var.message().contains("lazy"));
    let sealed_val = source_err_with("sealed val x = 1", &Dialect::modern());
    assert!(sealed_val.message().contains("sealed"));
}

#[test]
fn access_qualifiers() {
    let parsed = source("private[core] def f: Int = 1");
    let DefnKind::Def { mods, .. } = single_defn(&parsed) else {
        panic!("expected def");
    };
    let ModKind::Private { within } = &mods[0].kind else {
        panic!("expected private modifier");
    };
    assert_eq!(parsed.text(within.expect("qualifier")), "core");
}

#[test]
fn enum_with_cases() {
    let parsed = source("enum Color { case Red, Green\ncase Rgb(hex: Int) }");
    let DefnKind::Enum { templ, .. } = single_defn(&parsed) else {
        panic!("expected enum");
    };
    assert_eq!(templ.stats.len(), 2);
    let StatKind::Defn(first) = &templ.stats[0].kind else {
        panic!("expected case");
    };
    assert!(matches!(first.kind, DefnKind::RepeatedEnumCase { .. }));
    let StatKind::Defn(second) = &templ.stats[1].kind else {
        panic!("expected case");
    };
    assert!(matches!(second.kind, DefnKind::EnumCase { .. }));
}

#[test]
fn enums_are_dialect_gated() {
    // `enum` is an ordinary identifier in the classic dialect.
    let err = source_err_with("enum Color { case Red }", &Dialect::classic());
    assert!(!err.message().is_empty());
}

#[test]
fn given_structural_instance() {
    let parsed =
        source("given intOrd: Ord[Int] with { def compare(a: Int, b: Int) = a - b }");
    let DefnKind::Given {
        name,
        tparams,
        paramss,
        templ,
        ..
    } = single_defn(&parsed)
    else {
        panic!("expected given");
    };
    assert_eq!(parsed.text(name.as_ref().expect("name").name), "intOrd");
    assert!(tparams.is_empty());
    assert!(paramss.is_empty());
    assert_eq!(templ.inits.len(), 1);
    assert!(matches!(templ.inits[0].tpe.kind, TypeKind::Apply { .. }));
    assert_eq!(templ.stats.len(), 1);
    let StatKind::Defn(member) = &templ.stats[0].kind else {
        panic!("expected member");
    };
    let DefnKind::Def { name, body, .. } = &member.kind else {
        panic!("expected compare def");
    };
    assert_eq!(parsed.text(name.name), "compare");
    let TermKind::ApplyInfix { op, .. } = &body.kind else {
        panic!("expected subtraction body");
    };
    assert_eq!(parsed.text(op.name), "-");
}

#[test]
fn given_alias_and_abstract_given() {
    let alias = source("given pool: Pool = makePool()");
    assert!(matches!(single_defn(&alias), DefnKind::GivenAlias { .. }));

    let anonymous = source("given Pool = makePool()");
    let DefnKind::GivenAlias { name, .. } = single_defn(&anonymous) else {
        panic!("expected anonymous alias");
    };
    assert!(name.is_none());

    let abstract_given = source("given pool: Pool");
    let StatKind::Decl(decl) = &abstract_given.tree.stats[0].kind else {
        panic!("expected declaration");
    };
    assert!(matches!(decl.kind, DeclKind::Given { .. }));
}

#[test]
fn anonymous_abstract_given_is_an_error() {
    let err = source_err_with("given Pool", &Dialect::modern());
    assert!(err.message().contains("anonymous given cannot be abstract"));
}

#[test]
fn given_with_using_clause() {
    let parsed = source("given listOrd[T](using ord: Ord[T]): Ord[List[T]] = make(ord)");
    let DefnKind::GivenAlias {
        tparams, paramss, ..
    } = single_defn(&parsed)
    else {
        panic!("expected given alias");
    };
    assert_eq!(tparams.len(), 1);
    assert_eq!(paramss.len(), 1);
}

#[test]
fn extension_group() {
    let parsed = source("extension (x: Int) def doubled: Int = x + x");
    let DefnKind::ExtensionGroup { paramss, body, .. } = single_defn(&parsed) else {
        panic!("expected extension group");
    };
    assert_eq!(paramss.len(), 1);
    assert_eq!(body.len(), 1);

    let braced = source("extension (x: Int) { def a: Int = x\ndef b: Int = x }");
    let DefnKind::ExtensionGroup { body, .. } = single_defn(&braced) else {
        panic!("expected extension group");
    };
    assert_eq!(body.len(), 2);
}

#[test]
fn secondary_constructor() {
    let parsed = source("class C(x: Int) { def this() = this(0) }");
    let DefnKind::Class { templ, .. } = single_defn(&parsed) else {
        panic!("expected class");
    };
    let StatKind::Ctor(ctor) = &templ.stats[0].kind else {
        panic!("expected secondary constructor, got {:?}", templ.stats[0]);
    };
    assert_eq!(ctor.init.argss.len(), 1);
    assert!(ctor.stats.is_empty());
}

#[test]
fn secondary_constructor_with_body() {
    let parsed = source("class C(x: Int) { def this(s: String) = { this(0); log(s) } }");
    let DefnKind::Class { templ, .. } = single_defn(&parsed) else {
        panic!("expected class");
    };
    let StatKind::Ctor(ctor) = &templ.stats[0].kind else {
        panic!("expected secondary constructor");
    };
    assert_eq!(ctor.stats.len(), 1);
}

#[test]
fn secondary_constructor_must_delegate_first() {
    let err = source_err_with(
        "class C(x: Int) { def this(s: String) = { log(s) } }",
        &Dialect::modern(),
    );
    assert!(err.message().contains("`this` expected"));
}

#[test]
fn trait_with_self_type() {
    let parsed = source("trait Logging { self: Service => def log(m: String): Unit = out(m) }");
    let DefnKind::Trait { templ, .. } = single_defn(&parsed) else {
        panic!("expected trait");
    };
    let self_type = templ.self_type.as_ref().expect("self type");
    assert_eq!(parsed.text(self_type.name.expect("name")), "self");
    assert!(self_type.decltpe.is_some());
    assert_eq!(templ.stats.len(), 1);
}

#[test]
fn self_type_without_ascription() {
    let parsed = source("class C { outer => val x = 1 }");
    let DefnKind::Class { templ, .. } = single_defn(&parsed) else {
        panic!("expected class");
    };
    assert!(templ.self_type.is_some());
    assert_eq!(templ.stats.len(), 1);
}

#[test]
fn colon_eol_template_body() {
    let parsed = source("class C:\n  def f: Int = 1\n  def g: Int = 2");
    let DefnKind::Class { templ, .. } = single_defn(&parsed) else {
        panic!("expected class");
    };
    assert_eq!(templ.stats.len(), 2);
}

#[test]
fn end_marker_statement() {
    let parsed = source("object Registry:\n  val x = 1\nend Registry");
    assert_eq!(parsed.tree.stats.len(), 2);
    let StatKind::EndMarker { name } = &parsed.tree.stats[1].kind else {
        panic!("expected end marker, got {:?}", parsed.tree.stats[1]);
    };
    assert_eq!(parsed.text(*name), "Registry");
}

#[test]
fn derives_clause() {
    let parsed = source("case class Point(x: Int) derives Show");
    let DefnKind::Class { templ, .. } = single_defn(&parsed) else {
        panic!("expected class");
    };
    assert_eq!(templ.derives.len(), 1);
}

#[test]
fn package_header_wraps_following_statements() {
    let parsed = source("package app.core\nclass C");
    let StatKind::Pkg { reference, stats } = &parsed.tree.stats[0].kind else {
        panic!("expected package, got {:?}", parsed.tree.stats[0]);
    };
    assert!(matches!(reference.kind, TermKind::Select { .. }));
    assert_eq!(stats.len(), 1);
}

#[test]
fn braced_packaging() {
    let parsed = source("package app { class A }\npackage lib { class B }");
    assert_eq!(parsed.tree.stats.len(), 2);
}

#[test]
fn package_object() {
    let parsed = source_with("package object app { val x = 1 }", &Dialect::classic());
    assert!(matches!(
        parsed.tree.stats[0].kind,
        StatKind::PkgObject { .. }
    ));
}

#[test]
fn import_forms() {
    let simple = source("import app.core.Registry");
    let StatKind::Import(import) = &simple.tree.stats[0].kind else {
        panic!("expected import");
    };
    let importer = &import.importers[0];
    assert!(matches!(
        importer.importees[0].kind,
        ImporteeKind::Name { .. }
    ));

    let wildcard = source_with("import app.core._", &Dialect::classic());
    let StatKind::Import(import) = &wildcard.tree.stats[0].kind else {
        panic!("expected import");
    };
    assert!(matches!(
        import.importers[0].importees[0].kind,
        ImporteeKind::Wildcard
    ));

    let star = source("import app.core.*");
    let StatKind::Import(import) = &star.tree.stats[0].kind else {
        panic!("expected import");
    };
    assert!(matches!(
        import.importers[0].importees[0].kind,
        ImporteeKind::Wildcard
    ));
}

#[test]
fn import_selectors() {
    let parsed = source_with(
        "import app.{Registry => Reg, Hidden => _, Rest}",
        &Dialect::classic(),
    );
    let StatKind::Import(import) = &parsed.tree.stats[0].kind else {
        panic!("expected import");
    };
    let importees = &import.importers[0].importees;
    assert!(matches!(importees[0].kind, ImporteeKind::Rename { .. }));
    assert!(matches!(importees[1].kind, ImporteeKind::Unimport { .. }));
    assert!(matches!(importees[2].kind, ImporteeKind::Name { .. }));
}

#[test]
fn import_given_selectors() {
    let all = source("import app.given");
    let StatKind::Import(import) = &all.tree.stats[0].kind else {
        panic!("expected import");
    };
    assert!(matches!(
        import.importers[0].importees[0].kind,
        ImporteeKind::GivenAll
    ));

    let typed = source("import app.{given Ord[Int]}");
    let StatKind::Import(import) = &typed.tree.stats[0].kind else {
        panic!("expected import");
    };
    assert!(matches!(
        import.importers[0].importees[0].kind,
        ImporteeKind::Given { .. }
    ));
}

#[test]
fn export_clause() {
    let parsed = source("export impl.Registry");
    assert!(matches!(
        parsed.tree.stats[0].kind,
        StatKind::Export(_)
    ));
}

#[test]
fn indented_method_body() {
    let parsed = source("def f: Int =\n  val x = 1\n  x + 1");
    let DefnKind::Def { body, .. } = single_defn(&parsed) else {
        panic!("expected def");
    };
    let TermKind::Block { stats } = &body.kind else {
        panic!("expected indented block body, got {body:?}");
    };
    assert_eq!(stats.len(), 2);
}

#[test]
fn dialect_monotonicity_on_shared_subset() {
    let text = "class C { def f(x: Int): Int = x }";
    for dialect in [Dialect::classic(), Dialect::standard(), Dialect::modern()] {
        let parsed = source_with(text, &dialect);
        assert_eq!(parsed.tree.stats.len(), 1);
        assert!(matches!(parsed.tree.stats[0].kind, StatKind::Defn(_)));
    }
}
