//! Lexer tests.

#![allow(clippy::unwrap_used, reason = "test assertions use unwrap for clarity")]

use crate::lex;
use vela_ir::{Dialect, StringInterner, TokenKind, TokenList};

fn lex_modern(source: &str) -> (TokenList, StringInterner) {
    let interner = StringInterner::new();
    let tokens = lex(source, &Dialect::modern(), &interner);
    (tokens, interner)
}

fn significant_kinds(tokens: &TokenList) -> Vec<TokenKind> {
    tokens
        .iter()
        .filter(|t| !t.kind.is_trivia())
        .map(|t| t.kind.clone())
        .collect()
}

#[test]
fn bof_and_eof_bracket_the_stream() {
    let (tokens, _) = lex_modern("val x = 1");
    assert_eq!(tokens[0].kind, TokenKind::Bof);
    assert_eq!(tokens[tokens.len() - 1].kind, TokenKind::Eof);
}

#[test]
fn trivia_is_preserved() {
    let (tokens, _) = lex_modern("val  x");
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
    assert!(kinds.contains(&TokenKind::Whitespace));
}

#[test]
fn keywords_and_idents() {
    let (tokens, interner) = lex_modern("class Box");
    let kinds = significant_kinds(&tokens);
    assert_eq!(kinds.len(), 2);
    assert_eq!(kinds[0], TokenKind::KwClass);
    match &kinds[1] {
        TokenKind::Ident(name) => assert_eq!(interner.lookup(*name), "Box"),
        other => panic!("expected identifier, got {other:?}"),
    }
}

#[test]
fn dialect_gates_given_keyword() {
    let interner = StringInterner::new();
    let classic = lex("given", &Dialect::classic(), &interner);
    let modern = lex("given", &Dialect::modern(), &interner);
    assert!(matches!(
        significant_kinds(&classic)[0],
        TokenKind::Ident(_)
    ));
    assert_eq!(significant_kinds(&modern)[0], TokenKind::KwGiven);
}

#[test]
fn newline_vs_blank_line() {
    let (tokens, _) = lex_modern("a\nb\n\nc");
    let line_ends: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind.is_line_end())
        .map(|t| t.kind.clone())
        .collect();
    assert_eq!(line_ends, vec![TokenKind::Newline, TokenKind::BlankLine]);
}

#[test]
fn reserved_ops_vs_operator_idents() {
    let (tokens, interner) = lex_modern("a => b ++ c <- d");
    let kinds = significant_kinds(&tokens);
    assert_eq!(kinds[1], TokenKind::FatArrow);
    match &kinds[3] {
        TokenKind::Ident(name) => assert_eq!(interner.lookup(*name), "++"),
        other => panic!("expected operator identifier, got {other:?}"),
    }
    assert_eq!(kinds[5], TokenKind::LeftArrow);
}

#[test]
fn colon_alone_is_reserved_but_cons_is_not() {
    let (tokens, interner) = lex_modern("x: Int :: y");
    let kinds = significant_kinds(&tokens);
    assert_eq!(kinds[1], TokenKind::Colon);
    match &kinds[3] {
        TokenKind::Ident(name) => assert_eq!(interner.lookup(*name), "::"),
        other => panic!("expected ::, got {other:?}"),
    }
}

#[test]
fn numeric_literals_keep_cleaned_text() {
    let (tokens, interner) = lex_modern("1_000 42L 3.14 2.5f 0xFF");
    let kinds = significant_kinds(&tokens);
    match &kinds[0] {
        TokenKind::IntLit(name) => assert_eq!(interner.lookup(*name), "1000"),
        other => panic!("expected int, got {other:?}"),
    }
    assert!(matches!(kinds[1], TokenKind::LongLit(_)));
    assert!(matches!(kinds[2], TokenKind::DoubleLit(_)));
    assert!(matches!(kinds[3], TokenKind::FloatLit(_)));
    match &kinds[4] {
        TokenKind::IntLit(name) => assert_eq!(interner.lookup(*name), "0xFF"),
        other => panic!("expected hex int, got {other:?}"),
    }
}

#[test]
fn string_and_char_literals() {
    let (tokens, interner) = lex_modern(r#""hi\n" 'a'"#);
    let kinds = significant_kinds(&tokens);
    match &kinds[0] {
        TokenKind::StringLit(name) => assert_eq!(interner.lookup(*name), "hi\n"),
        other => panic!("expected string, got {other:?}"),
    }
    assert_eq!(kinds[1], TokenKind::CharLit('a'));
}

#[test]
fn triple_quoted_string_is_raw() {
    let (tokens, interner) = lex_modern(r#""""a\nb""""#);
    let kinds = significant_kinds(&tokens);
    match &kinds[0] {
        TokenKind::StringLit(name) => assert_eq!(interner.lookup(*name), "a\\nb"),
        other => panic!("expected string, got {other:?}"),
    }
}

#[test]
fn backquoted_identifier() {
    let (tokens, interner) = lex_modern("`type`");
    match &significant_kinds(&tokens)[0] {
        TokenKind::QuotedIdent(name) => assert_eq!(interner.lookup(*name), "type"),
        other => panic!("expected backquoted identifier, got {other:?}"),
    }
}

#[test]
fn interpolation_token_stream() {
    let (tokens, interner) = lex_modern(r#"s"a $x b""#);
    let kinds = significant_kinds(&tokens);
    match &kinds[0] {
        TokenKind::InterpId(name) => assert_eq!(interner.lookup(*name), "s"),
        other => panic!("expected interpolator id, got {other:?}"),
    }
    assert_eq!(kinds[1], TokenKind::InterpStart);
    assert!(matches!(kinds[2], TokenKind::InterpPart(_)));
    assert_eq!(kinds[3], TokenKind::InterpSpliceStart);
    assert!(matches!(kinds[4], TokenKind::Ident(_)));
    assert_eq!(kinds[5], TokenKind::InterpSpliceEnd);
    assert!(matches!(kinds[6], TokenKind::InterpPart(_)));
    assert_eq!(kinds[7], TokenKind::InterpEnd);
}

#[test]
fn interpolation_block_splice() {
    let (tokens, _) = lex_modern(r#"s"v=${x + 1}!""#);
    let kinds = significant_kinds(&tokens);
    let splice_start = kinds
        .iter()
        .position(|k| *k == TokenKind::InterpSpliceStart)
        .unwrap();
    let splice_end = kinds
        .iter()
        .position(|k| *k == TokenKind::InterpSpliceEnd)
        .unwrap();
    // `x`, `+`, `1` live between the splice markers.
    assert_eq!(splice_end - splice_start, 4);
    assert_eq!(*kinds.last().unwrap(), TokenKind::InterpEnd);
}

#[test]
fn interpolation_dollar_escape() {
    let (tokens, interner) = lex_modern(r#"s"a$$b""#);
    let kinds = significant_kinds(&tokens);
    match &kinds[2] {
        TokenKind::InterpPart(name) => assert_eq!(interner.lookup(*name), "a$b"),
        other => panic!("expected part, got {other:?}"),
    }
}

#[test]
fn nested_braces_in_splice() {
    let (tokens, _) = lex_modern(r#"s"${ if (a) { b } else c }""#);
    let kinds = significant_kinds(&tokens);
    // Exactly one splice end, at the outermost closing brace.
    let ends = kinds
        .iter()
        .filter(|k| **k == TokenKind::InterpSpliceEnd)
        .count();
    assert_eq!(ends, 1);
    assert_eq!(*kinds.last().unwrap(), TokenKind::InterpEnd);
}

#[test]
fn xml_literal_tokens() {
    let interner = StringInterner::new();
    let tokens = lex("val x = <a>hi</a>", &Dialect::classic(), &interner);
    let kinds = significant_kinds(&tokens);
    assert!(kinds.contains(&TokenKind::XmlStart));
    assert!(kinds.iter().any(|k| matches!(k, TokenKind::XmlPart(_))));
    assert!(kinds.contains(&TokenKind::XmlEnd));
}

#[test]
fn xml_with_splice() {
    let interner = StringInterner::new();
    let tokens = lex("val x = <a>{y}</a>", &Dialect::classic(), &interner);
    let kinds = significant_kinds(&tokens);
    assert!(kinds.contains(&TokenKind::XmlSpliceStart));
    assert!(kinds.contains(&TokenKind::XmlSpliceEnd));
}

#[test]
fn comparison_is_not_xml() {
    let interner = StringInterner::new();
    let tokens = lex("a <b", &Dialect::classic(), &interner);
    let kinds = significant_kinds(&tokens);
    assert!(!kinds.contains(&TokenKind::XmlStart));
}

#[test]
fn symbol_literals_gated_by_dialect() {
    let interner = StringInterner::new();
    let classic = lex("'sym", &Dialect::classic(), &interner);
    assert!(matches!(
        significant_kinds(&classic)[0],
        TokenKind::SymbolLit(_)
    ));
    let modern = lex("'sym", &Dialect::modern(), &interner);
    let kinds = significant_kinds(&modern);
    assert_eq!(kinds[0], TokenKind::MacroQuote);
    assert!(matches!(kinds[1], TokenKind::Ident(_)));
}

#[test]
fn unquote_token_in_quasiquote_dialect() {
    let interner = StringInterner::new();
    let tokens = lex("$x + 1", &Dialect::modern().unquoting(), &interner);
    let kinds = significant_kinds(&tokens);
    assert_eq!(kinds[0], TokenKind::Unquote);
    assert!(matches!(kinds[1], TokenKind::Ident(_)));
}

#[test]
fn underscore_and_op_suffix_idents() {
    let (tokens, interner) = lex_modern("_ foo_+");
    let kinds = significant_kinds(&tokens);
    assert_eq!(kinds[0], TokenKind::Underscore);
    match &kinds[1] {
        TokenKind::Ident(name) => assert_eq!(interner.lookup(*name), "foo_+"),
        other => panic!("expected identifier, got {other:?}"),
    }
}

#[test]
fn block_comments_nest() {
    let (tokens, _) = lex_modern("a /* x /* y */ z */ b");
    let kinds = significant_kinds(&tokens);
    assert_eq!(kinds.len(), 2);
    let comments = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::BlockComment)
        .count();
    assert_eq!(comments, 1);
}
