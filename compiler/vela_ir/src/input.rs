//! Source input buffers.
//!
//! An `Input` is a shared immutable handle over a character buffer. It may
//! be a slice of a larger buffer (REPL segments, quasiquote fragments), in
//! which case parser-local positions are remapped to absolute positions for
//! diagnostics via `absolute()`.

use std::fmt;
use std::sync::Arc;

use crate::Span;

/// Shared immutable source buffer.
///
/// Cloning is cheap (reference-counted). A sliced input remembers its
/// offset into the outer buffer so diagnostics can report absolute
/// positions.
#[derive(Clone)]
pub struct Input {
    text: Arc<str>,
    /// Byte offset of `text` within the outermost buffer.
    base_offset: u32,
    /// Byte offsets of line starts within `text`, always starting with 0.
    line_starts: Arc<[u32]>,
}

impl Input {
    /// Create an input owning the full buffer.
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let line_starts = compute_line_starts(&text);
        Input {
            text,
            base_offset: 0,
            line_starts,
        }
    }

    /// Create an input that is a slice of this one.
    ///
    /// Positions inside the slice are local; `absolute()` remaps them.
    pub fn slice(&self, span: Span) -> Input {
        let sub: Arc<str> = Arc::from(&self.text[span.to_range()]);
        let line_starts = compute_line_starts(&sub);
        Input {
            text: sub,
            base_offset: self.base_offset + span.start,
            line_starts,
        }
    }

    /// The buffer text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text covered by a (local) span.
    #[inline]
    pub fn text_at(&self, span: Span) -> &str {
        &self.text[span.to_range()]
    }

    /// Length of the buffer in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Remap a local position to an absolute position in the outer buffer.
    #[inline]
    pub fn absolute(&self, local: u32) -> u32 {
        self.base_offset + local
    }

    /// Remap a local span to an absolute span in the outer buffer.
    #[inline]
    pub fn absolute_span(&self, span: Span) -> Span {
        Span::new(self.absolute(span.start), self.absolute(span.end))
    }

    /// Column (0-based, in bytes) of a local offset within its line.
    ///
    /// Used by the parser to compare indentation depths.
    pub fn column_of(&self, offset: u32) -> u32 {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        offset - self.line_starts[line]
    }

    /// Line index (0-based) of a local offset.
    pub fn line_of(&self, offset: u32) -> u32 {
        match self.line_starts.binary_search(&offset) {
            Ok(i) => i as u32,
            Err(i) => (i - 1) as u32,
        }
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("len", &self.text.len())
            .field("base_offset", &self.base_offset)
            .finish()
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Input::new(text)
    }
}

fn compute_line_starts(text: &str) -> Arc<[u32]> {
    let mut starts = vec![0u32];
    for (i, b) in text.bytes().enumerate() {
        if b == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts.into()
}
