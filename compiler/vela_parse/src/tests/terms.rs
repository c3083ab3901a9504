//! Expression parsing tests.

use vela_ir::ast::{EnumeratorKind, Lit, TermKind};
use vela_ir::Dialect;

use super::{term, term_err, term_err_with, term_with};

#[test]
fn empty_params_lambda() {
    let parsed = term("()  =>  x");
    let TermKind::Function { params, body } = &parsed.tree.kind else {
        panic!("expected function, got {:?}", parsed.tree);
    };
    assert!(params.is_empty());
    let TermKind::Name(name) = body.kind else {
        panic!("expected name body, got {body:?}");
    };
    assert_eq!(parsed.text(name), "x");
}

#[test]
fn partial_function_literal() {
    let parsed = term("{ case x => x }");
    let TermKind::PartialFunction { cases } = &parsed.tree.kind else {
        panic!("expected partial function, got {:?}", parsed.tree);
    };
    assert_eq!(cases.len(), 1);
    let case = &cases[0];
    assert!(case.cond.is_none());
    assert!(matches!(
        case.pat.kind,
        vela_ir::ast::PatKind::Var { .. }
    ));
    assert!(matches!(case.body.kind, TermKind::Name(_)));
}

#[test]
fn mixed_precedence_and_right_associativity() {
    // `+` outranks `:`-tier operators, and `::` is right-associative:
    // a + b :: c :: d  ==  (a + b) :: (c :: d)
    let parsed = term("a + b :: c :: d");
    let TermKind::ApplyInfix { lhs, op, args, .. } = &parsed.tree.kind else {
        panic!("expected infix, got {:?}", parsed.tree);
    };
    assert_eq!(parsed.text(op.name), "::");
    let TermKind::ApplyInfix { op: plus, .. } = &lhs.kind else {
        panic!("expected a + b on the left, got {lhs:?}");
    };
    assert_eq!(parsed.text(plus.name), "+");
    let TermKind::ApplyInfix { op: inner, args: innermost, .. } = &args[0].kind else {
        panic!("expected c :: d on the right, got {:?}", args[0]);
    };
    assert_eq!(parsed.text(inner.name), "::");
    assert!(matches!(innermost[0].kind, TermKind::Name(_)));
}

#[test]
fn left_associative_operators_group_left() {
    // a + b + c  ==  (a + b) + c
    let parsed = term("a + b + c");
    let TermKind::ApplyInfix { lhs, args, .. } = &parsed.tree.kind else {
        panic!("expected infix, got {:?}", parsed.tree);
    };
    assert!(matches!(lhs.kind, TermKind::ApplyInfix { .. }));
    assert!(matches!(args[0].kind, TermKind::Name(_)));
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let parsed = term("a + b * c");
    let TermKind::ApplyInfix { lhs, op, args, .. } = &parsed.tree.kind else {
        panic!("expected infix, got {:?}", parsed.tree);
    };
    assert_eq!(parsed.text(op.name), "+");
    assert!(matches!(lhs.kind, TermKind::Name(_)));
    assert!(matches!(args[0].kind, TermKind::ApplyInfix { .. }));
}

#[test]
fn mixed_associativity_is_an_error() {
    let err = term_err("a +: b + c");
    assert!(err
        .message()
        .contains("left- and right-associative operators with same precedence may not be mixed"));
}

#[test]
fn postfix_operator() {
    let parsed = term("x toString");
    let TermKind::ApplyPostfix { operand, op } = &parsed.tree.kind else {
        panic!("expected postfix, got {:?}", parsed.tree);
    };
    assert!(matches!(operand.kind, TermKind::Name(_)));
    assert_eq!(parsed.text(op.name), "toString");
}

#[test]
fn application_chains() {
    let parsed = term("f[Int](1)(2)");
    let TermKind::Apply { fun: outer, args: second } = &parsed.tree.kind else {
        panic!("expected apply, got {:?}", parsed.tree);
    };
    assert!(matches!(second[0].kind, TermKind::Lit(Lit::Int(2))));
    let TermKind::Apply { fun: inner, args: first } = &outer.kind else {
        panic!("expected inner apply, got {outer:?}");
    };
    assert!(matches!(first[0].kind, TermKind::Lit(Lit::Int(1))));
    assert!(matches!(inner.kind, TermKind::ApplyType { .. }));
}

#[test]
fn selection_chain() {
    let parsed = term("a.b.c");
    let TermKind::Select { qual, name } = &parsed.tree.kind else {
        panic!("expected select, got {:?}", parsed.tree);
    };
    assert_eq!(parsed.text(name.name), "c");
    assert!(matches!(qual.kind, TermKind::Select { .. }));
}

#[test]
fn single_param_lambda() {
    let parsed = term("x => x + 1");
    let TermKind::Function { params, body } = &parsed.tree.kind else {
        panic!("expected function, got {:?}", parsed.tree);
    };
    assert_eq!(params.len(), 1);
    assert!(params[0].decltpe.is_none());
    assert!(matches!(body.kind, TermKind::ApplyInfix { .. }));
}

#[test]
fn typed_param_lambda() {
    let parsed = term("(x: Int) => x");
    let TermKind::Function { params, .. } = &parsed.tree.kind else {
        panic!("expected function, got {:?}", parsed.tree);
    };
    assert_eq!(params.len(), 1);
    assert!(params[0].decltpe.is_some());
}

#[test]
fn using_param_lambda() {
    let parsed = term("(using x: Int) => x");
    let TermKind::Function { params, .. } = &parsed.tree.kind else {
        panic!("expected function, got {:?}", parsed.tree);
    };
    assert!(params[0]
        .mods
        .iter()
        .any(|m| matches!(m.kind, vela_ir::ast::ModKind::Using)));
}

#[test]
fn tuple_param_lambda() {
    let parsed = term("(a, b) => a");
    let TermKind::Function { params, .. } = &parsed.tree.kind else {
        panic!("expected function, got {:?}", parsed.tree);
    };
    assert_eq!(params.len(), 2);
}

#[test]
fn illegal_formal_parameter() {
    let err = term_err("1 => 2");
    assert!(err.message().contains("not a legal formal parameter"));
}

#[test]
fn if_with_parens() {
    let parsed = term_with("if (a) b else c", &Dialect::classic());
    let TermKind::If { else_branch, .. } = &parsed.tree.kind else {
        panic!("expected if, got {:?}", parsed.tree);
    };
    assert!(else_branch.is_some());
}

#[test]
fn if_then_else_keyword_form() {
    let parsed = term("if a then b else c");
    assert!(matches!(parsed.tree.kind, TermKind::If { .. }));
}

#[test]
fn bare_condition_rejected_by_classic() {
    let err = term_err_with("if a then b else c", &Dialect::classic());
    assert!(err.message().contains("does not support"));
}

#[test]
fn while_forms() {
    let classic = term_with("while (a) b", &Dialect::classic());
    assert!(matches!(classic.tree.kind, TermKind::While { .. }));
    let modern = term("while a do b");
    assert!(matches!(modern.tree.kind, TermKind::While { .. }));
}

#[test]
fn do_while_is_classic_only() {
    let parsed = term_with("do x while (y)", &Dialect::classic());
    assert!(matches!(parsed.tree.kind, TermKind::Do { .. }));
    let err = term_err("do x while (y)");
    assert!(err.message().contains("does not support"));
}

#[test]
fn try_catch_finally() {
    let parsed = term("try f() catch { case e => g() } finally h()");
    let TermKind::Try {
        cases,
        finally_branch,
        ..
    } = &parsed.tree.kind
    else {
        panic!("expected try, got {:?}", parsed.tree);
    };
    assert_eq!(cases.len(), 1);
    assert!(finally_branch.is_some());
}

#[test]
fn try_with_expression_handler() {
    let parsed = term_with("try f() catch handler", &Dialect::classic());
    assert!(matches!(
        parsed.tree.kind,
        TermKind::TryWithHandler { .. }
    ));
}

#[test]
fn throw_and_return() {
    assert!(matches!(term("throw boom").tree.kind, TermKind::Throw { .. }));
    let ret = term("return 1");
    let TermKind::Return { expr } = &ret.tree.kind else {
        panic!("expected return, got {:?}", ret.tree);
    };
    assert!(expr.is_some());
}

#[test]
fn assignment() {
    let parsed = term("x = 1");
    assert!(matches!(parsed.tree.kind, TermKind::Assign { .. }));
    let select = term("a.b = 1");
    assert!(matches!(select.tree.kind, TermKind::Assign { .. }));
}

#[test]
fn ascription() {
    let parsed = term("x: Int");
    assert!(matches!(parsed.tree.kind, TermKind::Ascribe { .. }));
}

#[test]
fn for_yield_with_guard() {
    let parsed = term("for (x <- xs if x > 0) yield x");
    let TermKind::ForYield { enums, body } = &parsed.tree.kind else {
        panic!("expected for-yield, got {:?}", parsed.tree);
    };
    assert_eq!(enums.len(), 2);
    let EnumeratorKind::Generator { pat, rhs } = &enums[0].kind else {
        panic!("expected generator, got {:?}", enums[0]);
    };
    assert!(matches!(pat.kind, vela_ir::ast::PatKind::Var { .. }));
    assert!(matches!(rhs.kind, TermKind::Name(_)));
    let EnumeratorKind::Guard { cond } = &enums[1].kind else {
        panic!("expected guard, got {:?}", enums[1]);
    };
    let TermKind::ApplyInfix { op, args, .. } = &cond.kind else {
        panic!("expected comparison, got {cond:?}");
    };
    assert_eq!(parsed.text(op.name), ">");
    assert!(matches!(args[0].kind, TermKind::Lit(Lit::Int(0))));
    assert!(matches!(body.kind, TermKind::Name(_)));
}

#[test]
fn for_with_value_binding() {
    let parsed = term("for (x <- xs; y = x) yield y");
    let TermKind::ForYield { enums, .. } = &parsed.tree.kind else {
        panic!("expected for-yield, got {:?}", parsed.tree);
    };
    assert!(matches!(enums[1].kind, EnumeratorKind::Val { .. }));
}

#[test]
fn val_in_for_is_deprecated() {
    let parsed = term_with("for (x <- xs; val y = x) yield y", &Dialect::classic());
    assert_eq!(parsed.warnings.len(), 1);
    assert!(parsed.warnings[0].message.contains("deprecated"));
}

#[test]
fn match_expression() {
    let parsed = term("x match { case 1 => a case 2 => b }");
    let TermKind::Match { cases, .. } = &parsed.tree.kind else {
        panic!("expected match, got {:?}", parsed.tree);
    };
    assert_eq!(cases.len(), 2);
}

#[test]
fn match_in_classic_dialect() {
    let parsed = term_with("x match { case 1 => a }", &Dialect::classic());
    assert!(matches!(parsed.tree.kind, TermKind::Match { .. }));
}

#[test]
fn match_chains_with_infix_precedence() {
    // The match keyword behaves as a letter-initial operator.
    let parsed = term("x match { case 1 => a } match { case 2 => b }");
    let TermKind::Match { expr, .. } = &parsed.tree.kind else {
        panic!("expected match, got {:?}", parsed.tree);
    };
    assert!(matches!(expr.kind, TermKind::Match { .. }));
}

#[test]
fn match_without_cases_is_an_error() {
    let err = term_err("x match { }");
    assert!(err.message().contains("match statement requires cases"));
}

#[test]
fn interpolated_string() {
    let parsed = term(r#"s"a $x b""#);
    let TermKind::Interpolate {
        prefix,
        parts,
        args,
    } = &parsed.tree.kind
    else {
        panic!("expected interpolation, got {:?}", parsed.tree);
    };
    assert_eq!(parsed.text(prefix.name), "s");
    assert_eq!(parts.len(), 2);
    assert_eq!(args.len(), 1);
    assert!(matches!(args[0].kind, TermKind::Name(_)));
}

#[test]
fn interpolated_block_splice() {
    let parsed = term(r#"s"v=${x + 1}""#);
    let TermKind::Interpolate { args, .. } = &parsed.tree.kind else {
        panic!("expected interpolation, got {:?}", parsed.tree);
    };
    assert!(matches!(args[0].kind, TermKind::ApplyInfix { .. }));
}

#[test]
fn xml_literal_expression() {
    let parsed = term_with("<a>{x}</a>", &Dialect::classic());
    let TermKind::Xml { parts, args } = &parsed.tree.kind else {
        panic!("expected xml, got {:?}", parsed.tree);
    };
    assert_eq!(parts.len(), 2);
    assert_eq!(args.len(), 1);
}

#[test]
fn macro_quote_and_splice() {
    let quoted = term("'{ x + 1 }");
    assert!(matches!(quoted.tree.kind, TermKind::QuotedExpr { .. }));
    let quoted_type = term("'[ List[Int] ]");
    assert!(matches!(quoted_type.tree.kind, TermKind::QuotedType { .. }));
    let spliced = term("${ x }");
    assert!(matches!(spliced.tree.kind, TermKind::SplicedExpr { .. }));
}

#[test]
fn quotes_rejected_by_classic() {
    let err = term_err_with("'{ x }", &Dialect::classic());
    assert!(err.message().contains("does not support"));
}

#[test]
fn eta_expansion() {
    let parsed = term("f _");
    assert!(matches!(parsed.tree.kind, TermKind::Eta { .. }));
}

#[test]
fn new_expressions() {
    let simple = term("new C(1)");
    let TermKind::New { init } = &simple.tree.kind else {
        panic!("expected new, got {:?}", simple.tree);
    };
    assert_eq!(init.argss.len(), 1);

    let anon = term("new C with D { def f = 1 }");
    let TermKind::NewAnonymous { templ } = &anon.tree.kind else {
        panic!("expected anonymous new, got {:?}", anon.tree);
    };
    assert_eq!(templ.inits.len(), 2);
    assert_eq!(templ.stats.len(), 1);
}

#[test]
fn tuples_and_unit() {
    assert!(matches!(
        term("(1, 2)").tree.kind,
        TermKind::Tuple { .. }
    ));
    assert!(matches!(term("()").tree.kind, TermKind::Lit(Lit::Unit)));
}

#[test]
fn block_with_local_definition() {
    let parsed = term("{ val x = 1; x }");
    let TermKind::Block { stats } = &parsed.tree.kind else {
        panic!("expected block, got {:?}", parsed.tree);
    };
    assert_eq!(stats.len(), 2);
}

#[test]
fn vararg_splice_in_arguments() {
    let parsed = term("f(xs: _*)");
    let TermKind::Apply { args, .. } = &parsed.tree.kind else {
        panic!("expected apply, got {:?}", parsed.tree);
    };
    assert!(matches!(args[0].kind, TermKind::Repeated { .. }));
}

#[test]
fn vararg_splice_outside_arguments_is_an_error() {
    let err = term_err("(xs: _*)");
    assert!(err.message().contains("repeated argument not allowed here"));
}

#[test]
fn named_argument() {
    let parsed = term("f(x = 1)");
    let TermKind::Apply { args, .. } = &parsed.tree.kind else {
        panic!("expected apply, got {:?}", parsed.tree);
    };
    assert!(matches!(args[0].kind, TermKind::Assign { .. }));
}

#[test]
fn using_argument_list() {
    let parsed = term("f(using ord)");
    assert!(matches!(parsed.tree.kind, TermKind::ApplyUsing { .. }));
}

#[test]
fn prefix_operators() {
    let parsed = term("!flag");
    assert!(matches!(parsed.tree.kind, TermKind::ApplyUnary { .. }));
    let negated = term("-5");
    assert!(matches!(negated.tree.kind, TermKind::Lit(Lit::Int(-5))));
}

#[test]
fn int_literal_range() {
    assert!(matches!(
        term("2147483647").tree.kind,
        TermKind::Lit(Lit::Int(i32::MAX))
    ));
    assert!(matches!(
        term("-2147483648").tree.kind,
        TermKind::Lit(Lit::Int(i32::MIN))
    ));
    let err = term_err("2147483648");
    assert!(err.message().contains("out of range"));
}

#[test]
fn long_literal_range() {
    assert!(matches!(
        term("42L").tree.kind,
        TermKind::Lit(Lit::Long(42))
    ));
    let err = term_err("99999999999999999999L");
    assert!(err.message().contains("out of range"));
}

#[test]
fn implicit_lambda() {
    let parsed = term("implicit x => x");
    let TermKind::Function { params, .. } = &parsed.tree.kind else {
        panic!("expected function, got {:?}", parsed.tree);
    };
    assert!(params[0]
        .mods
        .iter()
        .any(|m| matches!(m.kind, vela_ir::ast::ModKind::Implicit)));
}

#[test]
fn context_function_literal() {
    let parsed = term("(x: Int) ?=> x");
    assert!(matches!(
        parsed.tree.kind,
        TermKind::ContextFunction { .. }
    ));
}

#[test]
fn infix_chain_continues_past_newline_after_operator() {
    let parsed = term("{ a +\n  b }");
    let TermKind::Block { stats } = &parsed.tree.kind else {
        panic!("expected block, got {:?}", parsed.tree);
    };
    assert_eq!(stats.len(), 1);
    let vela_ir::ast::StatKind::Term(inner) = &stats[0].kind else {
        panic!("expected term stat, got {:?}", stats[0]);
    };
    assert!(matches!(inner.kind, TermKind::ApplyInfix { .. }));
}

#[test]
fn leading_infix_operator_continues_expression() {
    let parsed = term("{ a\n  + b }");
    let TermKind::Block { stats } = &parsed.tree.kind else {
        panic!("expected block, got {:?}", parsed.tree);
    };
    assert_eq!(stats.len(), 1, "leading + should continue the expression");
}

#[test]
fn origin_is_trimmed_over_trivia() {
    let parsed = term("  x  ");
    assert_eq!(parsed.tree.origin.span.start, 2);
    assert_eq!(parsed.tree.origin.span.end, 3);
}

#[test]
fn quasi_unquote_in_term() {
    let dialect = Dialect::modern().unquoting();
    let parsed = term_with("f($x)", &dialect);
    let TermKind::Apply { args, .. } = &parsed.tree.kind else {
        panic!("expected apply, got {:?}", parsed.tree);
    };
    assert!(matches!(args[0].kind, TermKind::Quasi(_)));
}
