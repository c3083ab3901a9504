//! Type parsing tests.

use vela_ir::ast::TypeKind;
use vela_ir::Dialect;

use super::{typ, typ_err, typ_with};

#[test]
fn simple_and_applied_types() {
    assert!(matches!(typ("Int").tree.kind, TypeKind::Name(_)));
    let applied = typ("List[Int]");
    let TypeKind::Apply { args, .. } = &applied.tree.kind else {
        panic!("expected application, got {:?}", applied.tree);
    };
    assert_eq!(args.len(), 1);
}

#[test]
fn qualified_type() {
    let parsed = typ("a.b.C");
    let TypeKind::Select { qual, name } = &parsed.tree.kind else {
        panic!("expected select, got {:?}", parsed.tree);
    };
    assert_eq!(parsed.text(name.name), "C");
    assert!(matches!(
        qual.kind,
        vela_ir::ast::TermKind::Select { .. }
    ));
}

#[test]
fn singleton_type() {
    let parsed = typ("x.type");
    assert!(matches!(parsed.tree.kind, TypeKind::Singleton { .. }));
    let qualified = typ("a.b.type");
    assert!(matches!(qualified.tree.kind, TypeKind::Singleton { .. }));
}

#[test]
fn projection() {
    let parsed = typ("A#B");
    assert!(matches!(parsed.tree.kind, TypeKind::Project { .. }));
}

#[test]
fn function_types() {
    let single = typ("Int => String");
    let TypeKind::Function { params, .. } = &single.tree.kind else {
        panic!("expected function type, got {:?}", single.tree);
    };
    assert_eq!(params.len(), 1);

    let multi = typ("(Int, String) => Int");
    let TypeKind::Function { params, .. } = &multi.tree.kind else {
        panic!("expected function type, got {:?}", multi.tree);
    };
    assert_eq!(params.len(), 2);

    let curried = typ("Int => Int => Int");
    let TypeKind::Function { res, .. } = &curried.tree.kind else {
        panic!("expected function type, got {:?}", curried.tree);
    };
    assert!(matches!(res.kind, TypeKind::Function { .. }));
}

#[test]
fn context_function_type() {
    let parsed = typ("Int ?=> String");
    assert!(matches!(
        parsed.tree.kind,
        TypeKind::ContextFunction { .. }
    ));
}

#[test]
fn dependent_function_type() {
    let parsed = typ("(x: Entry) => Int");
    let TypeKind::DependentFunction { params, .. } = &parsed.tree.kind else {
        panic!("expected dependent function type, got {:?}", parsed.tree);
    };
    assert_eq!(params.len(), 1);
    assert!(params[0].name.is_some());
}

#[test]
fn mixed_function_syntaxes_error() {
    let err = typ_err("(x: Int, String) => Int");
    assert!(err
        .message()
        .contains("can't mix function type and dependent function type syntaxes"));
}

#[test]
fn typed_params_without_arrow_error() {
    let err = typ_err("(x: Int)");
    assert!(err
        .message()
        .contains("can't mix function type and dependent function type syntaxes"));
}

#[test]
fn tuple_type() {
    let parsed = typ("(Int, String)");
    let TypeKind::Tuple { args } = &parsed.tree.kind else {
        panic!("expected tuple, got {:?}", parsed.tree);
    };
    assert_eq!(args.len(), 2);
}

#[test]
fn type_lambda() {
    let parsed = typ("[X] =>> List[X]");
    let TypeKind::Lambda { tparams, .. } = &parsed.tree.kind else {
        panic!("expected type lambda, got {:?}", parsed.tree);
    };
    assert_eq!(tparams.len(), 1);
}

#[test]
fn polymorphic_function_type() {
    let parsed = typ("[X] => X => X");
    assert!(matches!(parsed.tree.kind, TypeKind::PolyFunction { .. }));
}

#[test]
fn polymorphic_function_type_requires_function_body() {
    let err = typ_err("[X] => Int");
    assert!(err.message().contains("function type"));
}

#[test]
fn infix_types_follow_term_precedence() {
    // & binds tighter than |
    let parsed = typ("A | B & C");
    let TypeKind::ApplyInfix { op, rhs, .. } = &parsed.tree.kind else {
        panic!("expected infix type, got {:?}", parsed.tree);
    };
    assert_eq!(parsed.text(op.name), "|");
    assert!(matches!(rhs.kind, TypeKind::ApplyInfix { .. }));
}

#[test]
fn compound_with_type() {
    let parsed = typ_with("A with B", &Dialect::classic());
    assert!(matches!(parsed.tree.kind, TypeKind::With { .. }));
}

#[test]
fn refinements() {
    let refined = typ("Entry { def close: Unit }");
    let TypeKind::Refine { tpe, stats } = &refined.tree.kind else {
        panic!("expected refinement, got {:?}", refined.tree);
    };
    assert!(tpe.is_some());
    assert_eq!(stats.len(), 1);

    let bare = typ("{ def close: Unit }");
    let TypeKind::Refine { tpe, .. } = &bare.tree.kind else {
        panic!("expected refinement, got {:?}", bare.tree);
    };
    assert!(tpe.is_none());
}

#[test]
fn existential_type() {
    let parsed = typ_with("List[T] forSome { type T }", &Dialect::classic());
    assert!(matches!(parsed.tree.kind, TypeKind::Existential { .. }));
}

#[test]
fn match_type() {
    let parsed = typ("X match { case Int => String case Long => Int }");
    let TypeKind::Match { cases, .. } = &parsed.tree.kind else {
        panic!("expected match type, got {:?}", parsed.tree);
    };
    assert_eq!(cases.len(), 2);
}

#[test]
fn wildcards_with_bounds() {
    let underscore = typ("_ <: Entry");
    let TypeKind::Wildcard { bounds } = &underscore.tree.kind else {
        panic!("expected wildcard, got {:?}", underscore.tree);
    };
    assert!(bounds.hi.is_some());

    let question = typ("List[?]");
    let TypeKind::Apply { args, .. } = &question.tree.kind else {
        panic!("expected application, got {:?}", question.tree);
    };
    assert!(matches!(args[0].kind, TypeKind::Wildcard { .. }));
}

#[test]
fn annotated_type() {
    let parsed = typ("Entry @unchecked");
    assert!(matches!(parsed.tree.kind, TypeKind::Annotate { .. }));
}

#[test]
fn literal_singleton_type() {
    let parsed = typ("42");
    assert!(matches!(parsed.tree.kind, TypeKind::Literal(_)));
}

#[test]
fn type_lambdas_gated_by_dialect() {
    let interner_err = super::run_type_err_classic("[X] =>> List[X]");
    assert!(interner_err.message().contains("expected"));
}
