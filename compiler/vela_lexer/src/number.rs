//! Numeric literal token construction.
//!
//! The lexer only classifies and cleans numeric literals (underscores
//! stripped, suffix removed). Decoding the value and diagnosing range
//! overflow is the parser's job, so the token payload is the cleaned
//! text.

use vela_ir::{StringInterner, TokenKind};

use crate::raw_token::RawToken;

/// Build the token kind for a numeric raw token.
pub(crate) fn numeric_token_kind(
    raw: RawToken,
    slice: &str,
    interner: &StringInterner,
) -> TokenKind {
    let (body, suffix) = split_suffix(slice);
    let cleaned: String = body.chars().filter(|&c| c != '_').collect();
    let name = interner.intern(&cleaned);

    match raw {
        RawToken::Int | RawToken::HexInt => match suffix {
            Some('l' | 'L') => TokenKind::LongLit(name),
            _ => TokenKind::IntLit(name),
        },
        RawToken::FloatingPoint => match suffix {
            Some('f' | 'F') => TokenKind::FloatLit(name),
            _ => TokenKind::DoubleLit(name),
        },
        _ => TokenKind::Error,
    }
}

/// Split a trailing type suffix (`L`, `f`, `d`) from the literal body.
///
/// Hex literals need care: every letter of `0xFD` is a digit, so only a
/// trailing `l`/`L` counts as a suffix there.
fn split_suffix(slice: &str) -> (&str, Option<char>) {
    let is_hex = slice.starts_with("0x") || slice.starts_with("0X");
    match slice.chars().last() {
        Some(c @ ('l' | 'L')) => (&slice[..slice.len() - 1], Some(c)),
        Some(c @ ('f' | 'F' | 'd' | 'D')) if !is_hex => (&slice[..slice.len() - 1], Some(c)),
        _ => (slice, None),
    }
}
