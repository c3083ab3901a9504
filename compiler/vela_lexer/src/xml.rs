//! XML literal scanning.
//!
//! Entered from the driver when a `<` at expression position begins a
//! literal. Markup text between splices is emitted as raw `XmlPart`
//! tokens; `{ expr }` splices re-enter normal token scanning through the
//! `XmlSplice` mode, and `{{`/`}}` escape a literal brace into the text.
//!
//! The scanner is character-level: it tracks element nesting depth and a
//! within-tag flag so a splice can interrupt even an attribute list.

use vela_ir::{Span, TokenKind};

use crate::{Lexer, Mode, XmlTagKind};

impl Lexer<'_> {
    pub(crate) fn enter_xml(&mut self) {
        let here = self.pos();
        self.emit(TokenKind::XmlStart, Span::point(here));
        self.modes.push(Mode::Xml {
            tag_depth: 0,
            in_tag: None,
        });
    }

    /// Scan markup up to the next splice or the end of the literal.
    pub(crate) fn scan_xml_parts(&mut self) {
        let (mut depth, mut in_tag) = match self.modes.last() {
            Some(Mode::Xml { tag_depth, in_tag }) => (*tag_depth, *in_tag),
            _ => (0, None),
        };

        let start = self.pos();
        let rem = self.remainder();
        let bytes = rem.as_bytes();
        let mut i = 0usize;

        loop {
            if i >= bytes.len() {
                self.flush_xml_part(start, i);
                self.bump(i);
                let here = self.pos();
                self.emit(TokenKind::Error, Span::point(here));
                self.modes.pop();
                return;
            }

            if let Some(tag) = in_tag {
                match bytes[i] {
                    b'"' | b'\'' => {
                        let quote = bytes[i];
                        i += 1;
                        while i < bytes.len() && bytes[i] != quote {
                            i += 1;
                        }
                        i = (i + 1).min(bytes.len());
                    }
                    b'{' => {
                        self.save_xml_state(depth, in_tag);
                        self.begin_xml_splice(start, i);
                        return;
                    }
                    b'>' => {
                        let self_closing = i > 0 && bytes[i - 1] == b'/';
                        i += 1;
                        match tag {
                            XmlTagKind::Open if self_closing => {}
                            XmlTagKind::Open => depth += 1,
                            XmlTagKind::Close => depth = depth.saturating_sub(1),
                        }
                        in_tag = None;
                        if depth == 0 {
                            self.flush_xml_part(start, i);
                            self.bump(i);
                            let here = self.pos();
                            self.emit(TokenKind::XmlEnd, Span::point(here));
                            self.modes.pop();
                            return;
                        }
                    }
                    _ => i += 1,
                }
                continue;
            }

            match bytes[i] {
                b'<' => {
                    if rem[i..].starts_with("<!--") {
                        let close = rem[i..].find("-->").map(|j| i + j + 3);
                        i = close.unwrap_or(bytes.len());
                    } else if rem[i..].starts_with("<![CDATA[") {
                        let close = rem[i..].find("]]>").map(|j| i + j + 3);
                        i = close.unwrap_or(bytes.len());
                    } else if rem[i..].starts_with("</") {
                        in_tag = Some(XmlTagKind::Close);
                        i += 2;
                    } else {
                        in_tag = Some(XmlTagKind::Open);
                        i += 1;
                    }
                }
                b'{' => {
                    if rem[i..].starts_with("{{") {
                        i += 2;
                    } else {
                        self.save_xml_state(depth, in_tag);
                        self.begin_xml_splice(start, i);
                        return;
                    }
                }
                b'}' if rem[i..].starts_with("}}") => i += 2,
                _ => {
                    let c = rem[i..].chars().next().unwrap_or('\u{FFFD}');
                    i += c.len_utf8();
                }
            }
        }
    }

    fn save_xml_state(&mut self, depth: u32, tag: Option<XmlTagKind>) {
        if let Some(Mode::Xml { tag_depth, in_tag }) = self.modes.last_mut() {
            *tag_depth = depth;
            *in_tag = tag;
        }
    }

    fn begin_xml_splice(&mut self, part_start: u32, brace_offset: usize) {
        self.flush_xml_part(part_start, brace_offset);
        self.bump(brace_offset + 1);
        let brace = part_start + brace_offset as u32;
        self.emit(TokenKind::XmlSpliceStart, Span::new(brace, brace + 1));
        self.modes.push(Mode::XmlSplice { depth: 0 });
    }

    fn flush_xml_part(&mut self, start: u32, len: usize) {
        let end = start + len as u32;
        let text = &self.source[start as usize..end as usize];
        let name = self.intern(text);
        self.emit(TokenKind::XmlPart(name), Span::new(start, end));
    }
}
