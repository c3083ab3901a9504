//! Entry-point and invariant tests.

use vela_ir::ast::{Origin, StatKind, TermKind};
use vela_ir::visit::{self, Visitor};
use vela_ir::{Dialect, Input, StringInterner};

use crate::Parser;

use super::{source, stat, term};

fn with_parser<T>(
    text: &str,
    dialect: &Dialect,
    f: impl FnOnce(&mut Parser<'_>) -> T,
) -> T {
    let interner = StringInterner::new();
    let input = Input::new(text);
    let tokens = vela_lexer::lex(text, dialect, &interner);
    let mut parser = Parser::new(&input, &tokens, dialect, &interner);
    f(&mut parser)
}

#[test]
fn every_entry_point_returns_its_family() {
    let modern = Dialect::modern();
    with_parser("val x = 1", &modern, |p| {
        p.parse_source().expect("source");
    });
    with_parser("val x = 1", &modern, |p| {
        p.parse_stat().expect("stat");
    });
    with_parser("a + b", &modern, |p| {
        p.parse_term().expect("term");
    });
    with_parser("List[Int]", &modern, |p| {
        p.parse_type().expect("type");
    });
    with_parser("Pair(a, _)", &modern, |p| {
        p.parse_pat().expect("pattern");
    });
    with_parser("case x if x > 0 => x", &modern, |p| {
        p.parse_case().expect("case");
    });
    with_parser("def this(x: Int) = this(x, 0)", &modern, |p| {
        p.parse_ctor().expect("ctor");
    });
    with_parser("Ord[Int]", &modern, |p| {
        p.parse_init().expect("init");
    });
    with_parser("self: Service =>", &modern, |p| {
        p.parse_self().expect("self type");
    });
    with_parser("Base with Mix { def f: Int = 1 }", &modern, |p| {
        p.parse_template().expect("template");
    });
    with_parser("private[core]", &modern, |p| {
        p.parse_mod().expect("modifier");
    });
    with_parser("x <- xs", &modern, |p| {
        p.parse_enumerator().expect("enumerator");
    });
    with_parser("app.core.{Registry}", &modern, |p| {
        p.parse_importer().expect("importer");
    });
    with_parser("Registry => Reg", &modern, |p| {
        p.parse_importee().expect("importee");
    });
    with_parser("x: Int = 0", &modern, |p| {
        p.parse_term_param().expect("term param");
    });
    with_parser("+T <: Entry", &modern, |p| {
        p.parse_type_param().expect("type param");
    });
}

#[test]
fn unquote_entry_points_require_the_dialect() {
    let quasi = Dialect::modern().unquoting();
    with_parser("$x + 1", &quasi, |p| {
        p.parse_unquote_term().expect("unquote term");
    });
    with_parser("Pair($x, _)", &quasi, |p| {
        p.parse_unquote_pat().expect("unquote pattern");
    });
    with_parser("$x + 1", &Dialect::modern(), |p| {
        p.parse_unquote_term()
            .expect_err("unquoting needs the quasiquote dialect");
    });
}

#[test]
fn repl_input_splits_on_at_delimiters() {
    let parsed = with_parser(
        "val x = 1\n@\nval y = 2\n@\nx + y",
        &Dialect::modern(),
        |p| p.parse_repl_input().expect("repl input"),
    );
    assert_eq!(parsed.sources.len(), 3);
    assert_eq!(parsed.sources[0].stats.len(), 1);
    assert_eq!(parsed.sources[2].stats.len(), 1);
}

#[test]
fn trailing_garbage_is_rejected() {
    with_parser("val x = 1 )", &Dialect::modern(), |p| {
        let err = p.parse_source().expect_err("unbalanced close paren");
        assert!(err.message().contains("found"));
    });
}

#[test]
fn warnings_flow_to_the_sink() {
    let classic = Dialect::classic();
    with_parser("def run { go() }", &classic, |p| {
        p.parse_source().expect("source");
        let mut queue = vela_diagnostic::DiagnosticQueue::new();
        p.drain_warnings_into(&mut queue);
        assert_eq!(queue.warning_count(), 1);
        assert!(!queue.has_errors());
    });
}

/// Collects every term/type/pattern origin in the tree.
struct OriginCollector {
    origins: Vec<Origin>,
}

impl Visitor for OriginCollector {
    fn visit_term(&mut self, term: &vela_ir::ast::Term) {
        self.origins.push(term.origin);
        visit::walk_term(self, term);
    }

    fn visit_type(&mut self, tpe: &vela_ir::ast::Type) {
        self.origins.push(tpe.origin);
        visit::walk_type(self, tpe);
    }

    fn visit_pat(&mut self, pat: &vela_ir::ast::Pat) {
        self.origins.push(pat.origin);
        visit::walk_pat(self, pat);
    }

    fn visit_stat(&mut self, stat: &vela_ir::ast::Stat) {
        self.origins.push(stat.origin);
        visit::walk_stat(self, stat);
    }
}

#[test]
fn origins_are_ordered_and_in_bounds() {
    let text = "class C[T](x: T) extends B { def f: Int = x match { case _ => 1 } }";
    let parsed = source(text);
    let mut collector = OriginCollector {
        origins: vec![parsed.tree.origin],
    };
    collector.visit_source(&parsed.tree);
    for origin in &collector.origins {
        assert!(origin.token_start <= origin.token_end, "bad origin {origin:?}");
        assert!(origin.span.start <= origin.span.end, "bad span {origin:?}");
        assert!(
            (origin.span.end as usize) <= text.len(),
            "span out of bounds {origin:?}"
        );
    }
}

#[test]
fn children_lie_within_their_parent() {
    let parsed = source("class C { def f: Int = 1 + 2 }");
    let class_origin = parsed.tree.stats[0].origin;
    let StatKind::Defn(defn) = &parsed.tree.stats[0].kind else {
        panic!("expected class");
    };
    let vela_ir::ast::DefnKind::Class { templ, .. } = &defn.kind else {
        panic!("expected class defn");
    };
    for stat in &templ.stats {
        assert!(
            class_origin.encloses(&stat.origin),
            "member {:?} outside class {:?}",
            stat.origin,
            class_origin
        );
    }
}

#[test]
fn infix_node_spans_cover_both_operands() {
    let parsed = term("alpha + beta");
    let TermKind::ApplyInfix { lhs, args, .. } = &parsed.tree.kind else {
        panic!("expected infix");
    };
    assert!(parsed.tree.origin.encloses(&lhs.origin));
    assert!(parsed.tree.origin.encloses(&args[0].origin));
    assert_eq!(parsed.tree.origin.span.start, lhs.origin.span.start);
    assert_eq!(parsed.tree.origin.span.end, args[0].origin.span.end);
}

#[test]
fn stat_entry_accepts_definitions_and_expressions() {
    assert!(matches!(
        stat("def f: Int = 1").tree.kind,
        StatKind::Defn(_)
    ));
    assert!(matches!(stat("f(1)").tree.kind, StatKind::Term(_)));
}

#[test]
fn fork_restore_roundtrip_under_speculation() {
    // A given that fails its signature speculation must parse through the
    // anonymous path with the cursor fully restored.
    let parsed = source("given Ord[Int] with { def compare(a: Int, b: Int) = 0 }");
    let StatKind::Defn(defn) = &parsed.tree.stats[0].kind else {
        panic!("expected given");
    };
    let vela_ir::ast::DefnKind::Given { name, templ, .. } = &defn.kind else {
        panic!("expected structural given, got {:?}", defn.kind);
    };
    assert!(name.is_none());
    assert_eq!(templ.stats.len(), 1);
}
