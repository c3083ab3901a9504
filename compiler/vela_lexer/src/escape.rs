//! Escape sequence processing for string and character literals.

/// Unescape a string literal body.
///
/// Supports `\n`, `\r`, `\t`, `\b`, `\f`, `\\`, `\"`, `\'`, `\0`, and
/// `\uXXXX`. Invalid escapes are preserved literally.
pub(crate) fn unescape_string(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('0') => out.push('\0'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => {
                        out.push(decoded);
                        for _ in 0..4 {
                            chars.next();
                        }
                    }
                    _ => {
                        out.push('\\');
                        out.push('u');
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Unescape a character literal body, returning the replacement character
/// for malformed input.
pub(crate) fn unescape_char(content: &str) -> char {
    let unescaped = unescape_string(content);
    unescaped.chars().next().unwrap_or('\u{FFFD}')
}
