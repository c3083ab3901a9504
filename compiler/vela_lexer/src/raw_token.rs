//! Raw token definition.
//!
//! The `RawToken` enum is the logos-derived tokenizer output before
//! dialect-aware keyword filtering, string interning, and final token
//! conversion. Trivia is not skipped: the parser trims node origins over
//! whitespace and comments, so they must survive as tokens.

use logos::{Lexer, Logos};

/// Raw token from logos (before interning and dialect filtering).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawToken {
    // === Trivia ===
    #[regex(r"[ \t\r]+")]
    Whitespace,

    /// One or more line breaks with only horizontal space between them.
    /// Classified as a blank-line run when it contains two or more breaks.
    #[regex(r"\n([ \t\r]*\n)*")]
    Newlines,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", lex_block_comment)]
    BlockComment,

    // === Keywords (dialect-gated ones are filtered in convert) ===
    #[token("abstract")]
    Abstract,
    #[token("case")]
    Case,
    #[token("catch")]
    Catch,
    #[token("class")]
    Class,
    #[token("def")]
    Def,
    #[token("do")]
    Do,
    #[token("else")]
    Else,
    #[token("enum")]
    Enum,
    #[token("export")]
    Export,
    #[token("extends")]
    Extends,
    #[token("false")]
    False,
    #[token("final")]
    Final,
    #[token("finally")]
    Finally,
    #[token("for")]
    For,
    #[token("forSome")]
    ForSome,
    #[token("given")]
    Given,
    #[token("if")]
    If,
    #[token("implicit")]
    Implicit,
    #[token("import")]
    Import,
    #[token("lazy")]
    Lazy,
    #[token("match")]
    Match,
    #[token("new")]
    New,
    #[token("null")]
    Null,
    #[token("object")]
    Object,
    #[token("override")]
    Override,
    #[token("package")]
    Package,
    #[token("private")]
    Private,
    #[token("protected")]
    Protected,
    #[token("return")]
    Return,
    #[token("sealed")]
    Sealed,
    #[token("super")]
    Super,
    #[token("this")]
    This,
    #[token("throw")]
    Throw,
    #[token("trait")]
    Trait,
    #[token("true")]
    True,
    #[token("try")]
    Try,
    #[token("type")]
    Type,
    #[token("val")]
    Val,
    #[token("var")]
    Var,
    #[token("while")]
    While,
    #[token("with")]
    With,
    #[token("yield")]
    Yield,

    // === Identifiers ===
    /// Alphanumeric identifier, optionally with an operator suffix after a
    /// trailing underscore (`futures_+`).
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*_[!#%&*+\-/:<=>?@\\^|~]+")]
    Ident,

    /// Backquoted identifier: always a stable reference.
    #[regex(r"`[^`\n]+`")]
    QuotedIdent,

    /// A run of operator characters. Reserved sequences (`=>`, `<-`, ...)
    /// are separated out during conversion. Low priority so `//` and `/*`
    /// resolve to comments.
    #[regex(r"[!#%&*+\-/:<=>?@\\^|~]+", priority = 1)]
    OpIdent,

    // === Literals ===
    #[regex(r"0[xX][0-9a-fA-F_]+[Ll]?")]
    HexInt,

    #[regex(r"[0-9][0-9_]*[Ll]?")]
    Int,

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+[fFdD]?")]
    #[regex(r"[0-9][0-9_]*[fFdD]")]
    FloatingPoint,

    #[regex(r"'([^'\\\n]|\\[^\n])'")]
    Char,

    /// Symbol literal or (under macro dialects) a quoted identifier.
    #[regex(r"'[A-Za-z_][A-Za-z0-9_]*")]
    Symbol,

    /// Bare quote: begins `'{ ... }` or `'[ ... ]`.
    #[token("'")]
    Quote,

    #[token("\"\"\"", lex_triple_string)]
    TripleString,

    #[regex(r#""(\\.|[^"\\\n])*""#)]
    String,

    // === Punctuation ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
}

/// Consume a block comment, honoring nesting. Unterminated comments run
/// to the end of input.
fn lex_block_comment(lex: &mut Lexer<RawToken>) {
    let rem = lex.remainder();
    let bytes = rem.as_bytes();
    let mut depth = 1usize;
    let mut i = 0usize;
    while i < bytes.len() && depth > 0 {
        if bytes[i] == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'*' {
            depth += 1;
            i += 2;
        } else if bytes[i] == b'*' && i + 1 < bytes.len() && bytes[i + 1] == b'/' {
            depth -= 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    lex.bump(i);
}

/// Consume a triple-quoted string body up to and including the closing
/// quotes, with any extra trailing quotes folded into the literal.
fn lex_triple_string(lex: &mut Lexer<RawToken>) {
    let rem = lex.remainder();
    let bytes = rem.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'"' && rem[i..].starts_with("\"\"\"") {
            // Fold extra quotes: """a""""" ends with the last triple.
            let mut end = i + 3;
            while end < bytes.len() && bytes[end] == b'"' {
                end += 1;
            }
            lex.bump(end);
            return;
        }
        i += 1;
    }
    // Unterminated: consume everything.
    lex.bump(bytes.len());
}
