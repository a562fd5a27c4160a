//! AJR: the text codec.
//!
//! Every scalar is one whitespace-delimited word. Strings are written as
//! `<UTF-16 length> <text>\n`, or just `0 ` when empty. Output wraps onto a
//! new line once the current line is longer than the preferred width.
//! The header is `AJR <version>`, followed from 2.2 on by the charset name.

use std::borrow::Cow;
use std::io::{self, Write};

use encoding_rs::{Encoding, UTF_8};
use jdr_types::{Feature, JdrVersion};
use tracing::debug;

use crate::canvas::CanvasGraphics;
use crate::error::{InvalidFormat, JdrError, JdrResult, Location};
use crate::handle::{FormatHandle, FormatReader, FormatWriter, Session};
use crate::tag::FieldTag;

pub const MAGIC: &str = "AJR";
pub const DEFAULT_PREFERRED_WIDTH: usize = 80;
pub const DEFAULT_WORD_LIMIT: usize = 255;

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

/// Writes AJR text.
pub struct AjrWriter<'a, W: Write> {
    out: W,
    session: Session,
    canvas: &'a mut CanvasGraphics,
    encoding: &'static Encoding,
    preferred_width: usize,
    column: usize,
    needs_separator: bool,
}

impl<'a, W: Write> AjrWriter<'a, W> {
    pub fn new(
        out: W,
        canvas: &'a mut CanvasGraphics,
        session: Session,
        encoding: &'static Encoding,
    ) -> Self {
        Self {
            out,
            session,
            canvas,
            encoding,
            preferred_width: DEFAULT_PREFERRED_WIDTH,
            column: 0,
            needs_separator: false,
        }
    }

    pub fn with_preferred_width(mut self, width: usize) -> Self {
        self.preferred_width = width;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn encode<'t>(&self, text: &'t str) -> JdrResult<Cow<'t, [u8]>> {
        if self.encoding == UTF_8 {
            return Ok(Cow::Borrowed(text.as_bytes()));
        }
        let (bytes, _, had_errors) = self.encoding.encode(text);
        if had_errors {
            let mut buf = [0u8; 4];
            let character = text
                .chars()
                .find(|c| self.encoding.encode(c.encode_utf8(&mut buf)).2)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            return Err(JdrError::Unmappable {
                charset: self.encoding.name().to_string(),
                character,
            });
        }
        Ok(bytes)
    }

    fn emit(&mut self, text: &str) -> JdrResult<()> {
        let bytes = self.encode(text)?;
        self.out.write_all(&bytes)?;
        for c in text.chars() {
            if c == '\n' {
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        Ok(())
    }

    fn write_word(&mut self, word: &str) -> JdrResult<()> {
        if self.needs_separator {
            if self.column > self.preferred_width {
                self.emit("\n")?;
            } else {
                self.emit(" ")?;
            }
        }
        self.emit(word)?;
        self.needs_separator = true;
        Ok(())
    }
}

impl<W: Write> FormatHandle for AjrWriter<'_, W> {
    fn session(&self) -> &Session {
        &self.session
    }

    fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    fn canvas(&self) -> &CanvasGraphics {
        &*self.canvas
    }

    fn canvas_mut(&mut self) -> &mut CanvasGraphics {
        &mut *self.canvas
    }
}

impl<W: Write> FormatWriter for AjrWriter<'_, W> {
    fn write_int(&mut self, value: i32) -> JdrResult<()> {
        self.write_word(&value.to_string())
    }

    fn write_double(&mut self, value: f64) -> JdrResult<()> {
        // Debug formatting is the shortest form that parses back exactly.
        self.write_word(&format!("{value:?}"))
    }

    fn write_byte(&mut self, value: u8) -> JdrResult<()> {
        self.write_word(&value.to_string())
    }

    fn write_bool(&mut self, value: bool) -> JdrResult<()> {
        self.write_word(if value { "1" } else { "0" })
    }

    fn write_char(&mut self, value: char) -> JdrResult<()> {
        let mut buf = [0u8; 4];
        self.write_word(value.encode_utf8(&mut buf))
    }

    fn write_string(&mut self, value: &str) -> JdrResult<()> {
        let len = value.encode_utf16().count();
        self.write_word(&len.to_string())?;
        self.emit(" ")?;
        if len > 0 {
            self.emit(value)?;
            self.emit("\n")?;
        }
        self.needs_separator = false;
        Ok(())
    }

    fn write_format_tag(&mut self) -> JdrResult<()> {
        let version = self.version();
        self.write_word(MAGIC)?;
        self.write_word(version.as_str())?;
        if self.supports(Feature::CharsetToken) {
            self.write_word(self.encoding.name())?;
        }
        self.emit("\n")?;
        self.needs_separator = false;
        Ok(())
    }

    fn flush(&mut self) -> JdrResult<()> {
        if self.column > 0 {
            self.emit("\n")?;
            self.needs_separator = false;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
struct Mark {
    pos: usize,
    line: usize,
    column: usize,
    token_start: Location,
    limit: usize,
}

/// Reads AJR text.
///
/// The whole input is decoded up front. Line and column counters advance on
/// every character consumed, including separators.
pub struct AjrReader<'a> {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    token_start: Location,
    mark: Option<Mark>,
    word_limit: usize,
    encoding: &'static Encoding,
    malformed: bool,
    session: Session,
    canvas: &'a mut CanvasGraphics,
}

impl<'a> AjrReader<'a> {
    pub fn new(
        bytes: &[u8],
        encoding: &'static Encoding,
        canvas: &'a mut CanvasGraphics,
        session: Session,
    ) -> Self {
        let (text, malformed) = encoding.decode_with_bom_removal(bytes);
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line: 1,
            column: 0,
            token_start: Location { line: 1, column: 1 },
            mark: None,
            word_limit: DEFAULT_WORD_LIMIT,
            encoding,
            malformed,
            session,
            canvas,
        }
    }

    pub fn with_word_limit(mut self, limit: usize) -> Self {
        self.word_limit = limit;
        self
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn eof() -> JdrError {
        JdrError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "unexpected end of AJR data",
        ))
    }

    fn read_word(&mut self) -> JdrResult<String> {
        while self.peek().is_some_and(is_separator) {
            self.next_char();
        }
        if self.peek().is_none() {
            return Err(Self::eof());
        }
        self.token_start = Location {
            line: self.line,
            column: self.column + 1,
        };
        let mut word = String::new();
        let mut len = 0;
        while let Some(c) = self.peek().filter(|c| !is_separator(*c)) {
            if len >= self.word_limit {
                return Err(JdrError::BufferOverflow {
                    limit: self.word_limit,
                    location: Some(self.token_start),
                });
            }
            word.push(c);
            len += 1;
            self.next_char();
        }
        Ok(word)
    }

    fn parse_word<T: std::str::FromStr>(&mut self, tag: FieldTag) -> JdrResult<T> {
        let word = self.read_word()?;
        word.parse().map_err(|_| self.invalid_value(tag, word))
    }
}

impl FormatHandle for AjrReader<'_> {
    fn session(&self) -> &Session {
        &self.session
    }

    fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    fn canvas(&self) -> &CanvasGraphics {
        &*self.canvas
    }

    fn canvas_mut(&mut self) -> &mut CanvasGraphics {
        &mut *self.canvas
    }
}

impl FormatReader for AjrReader<'_> {
    fn read_int(&mut self, tag: FieldTag) -> JdrResult<i32> {
        self.parse_word(tag)
    }

    fn read_double(&mut self, tag: FieldTag) -> JdrResult<f64> {
        self.parse_word(tag)
    }

    fn read_byte(&mut self, tag: FieldTag) -> JdrResult<u8> {
        self.parse_word(tag)
    }

    fn read_bool(&mut self, tag: FieldTag) -> JdrResult<bool> {
        match self.read_word()?.as_str() {
            "1" => Ok(true),
            "0" => Ok(false),
            other => Err(self.invalid_value(tag, other.to_string())),
        }
    }

    fn read_char(&mut self, tag: FieldTag) -> JdrResult<char> {
        let word = self.read_word()?;
        let mut chars = word.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(self.invalid_value(tag, word)),
        }
    }

    fn read_string(&mut self, tag: FieldTag) -> JdrResult<String> {
        let len = self.read_int(tag)?;
        if len < 0 {
            return Err(self.invalid_value(tag, len.to_string()));
        }
        if self.peek().is_some_and(is_separator) {
            self.next_char();
        }
        let len = len as usize;
        let mut text = String::with_capacity(len);
        let mut units = 0;
        while units < len {
            let c = self.next_char().ok_or_else(Self::eof)?;
            units += c.len_utf16();
            text.push(c);
        }
        if units > len {
            // The length ends inside a surrogate pair.
            return Err(self.invalid_value(tag, len.to_string()));
        }
        Ok(text)
    }

    fn read_format_tag(&mut self) -> JdrResult<JdrVersion> {
        let magic = self.read_word()?;
        if magic != MAGIC {
            return Err(self.invalid_value(FieldTag::FormatTag, magic));
        }
        let token = self.read_word()?;
        let version: JdrVersion = token.parse()?;
        self.session.set_version(version);
        if Feature::CharsetToken.is_supported_by(version) {
            let label = self.read_word()?;
            let declared = Encoding::for_label(label.as_bytes())
                .ok_or_else(|| self.invalid_value(FieldTag::Encoding, label.clone()))?;
            if declared != self.encoding {
                return Err(JdrError::CharsetMismatch {
                    declared: declared.name().to_string(),
                    decoded: self.encoding.name().to_string(),
                });
            }
        }
        if self.malformed {
            if Feature::CharsetToken.is_supported_by(version) {
                return Err(InvalidFormat {
                    tag: FieldTag::Encoding,
                    value: self.encoding.name().to_string(),
                    location: None,
                }
                .into());
            }
            // Older files do not name their charset, so decode lossily.
            let text = self
                .canvas()
                .message("io.lossy_charset", &[&self.encoding.name(), &version]);
            self.warning(text);
        }
        debug!(%version, charset = self.encoding.name(), "read AJR header");
        Ok(version)
    }

    fn mark(&mut self, limit: usize) {
        self.mark = Some(Mark {
            pos: self.pos,
            line: self.line,
            column: self.column,
            token_start: self.token_start,
            limit,
        });
    }

    fn reset(&mut self) -> JdrResult<()> {
        match self.mark.take() {
            Some(mark) if self.pos - mark.pos <= mark.limit => {
                self.pos = mark.pos;
                self.line = mark.line;
                self.column = mark.column;
                self.token_start = mark.token_start;
                Ok(())
            }
            _ => Err(JdrError::MarkInvalidated),
        }
    }

    fn location(&self) -> Option<Location> {
        Some(self.token_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::MessageLog;

    fn written(f: impl FnOnce(&mut AjrWriter<'_, &mut Vec<u8>>)) -> String {
        let mut canvas = CanvasGraphics::new();
        let mut buf = Vec::new();
        let mut w = AjrWriter::new(&mut buf, &mut canvas, Session::new(JdrVersion::V2_2), UTF_8);
        f(&mut w);
        drop(w);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_string_costs_two_characters() {
        let text = written(|w| {
            w.write_string("").unwrap();
            w.write_int(5).unwrap();
        });
        assert_eq!(text, "0 5");
    }

    #[test]
    fn non_empty_string_ends_with_newline() {
        let text = written(|w| {
            w.write_int(1).unwrap();
            w.write_string("a b").unwrap();
            w.write_bool(true).unwrap();
        });
        assert_eq!(text, "1 3 a b\n1");
    }

    #[test]
    fn long_lines_wrap() {
        let text = written(|w| {
            for _ in 0..100 {
                w.write_double(0.125).unwrap();
            }
        });
        assert!(text.contains('\n'));
        for line in text.lines() {
            assert!(line.len() <= 80 + 6, "line too long: {}", line.len());
        }
    }

    #[test]
    fn header_includes_charset_from_2_2() {
        let text = written(|w| w.write_format_tag().unwrap());
        assert_eq!(text, "AJR 2.2 UTF-8\n");

        let mut canvas = CanvasGraphics::new();
        let mut buf = Vec::new();
        let mut w = AjrWriter::new(&mut buf, &mut canvas, Session::new(JdrVersion::V2_1), UTF_8);
        w.write_format_tag().unwrap();
        drop(w);
        assert_eq!(buf, b"AJR 2.1\n");
    }

    #[test]
    fn error_reports_line_of_token() {
        let mut canvas = CanvasGraphics::new();
        let mut r = AjrReader::new(b"12\n34\n5x", UTF_8, &mut canvas, Session::new(JdrVersion::V2_2));
        assert_eq!(r.read_int(FieldTag::GroupSize).unwrap(), 12);
        assert_eq!(r.read_int(FieldTag::GroupSize).unwrap(), 34);
        let err = r.read_int(FieldTag::GroupSize).unwrap_err();
        let invalid = err.invalid_format().unwrap();
        assert_eq!(invalid.location, Some(Location { line: 3, column: 1 }));
        assert_eq!(invalid.value, "5x");
        assert!(err.to_string().starts_with("Line 3, Column 1:"));
    }

    #[test]
    fn overlong_word_overflows() {
        let input = format!("1 {}", "9".repeat(300));
        let mut canvas = CanvasGraphics::new();
        let mut r = AjrReader::new(input.as_bytes(), UTF_8, &mut canvas, Session::new(JdrVersion::V2_2));
        r.read_int(FieldTag::GroupSize).unwrap();
        match r.read_int(FieldTag::GroupSize) {
            Err(JdrError::BufferOverflow { limit, location }) => {
                assert_eq!(limit, 255);
                assert_eq!(location, Some(Location { line: 1, column: 3 }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn strings_roundtrip_with_embedded_newlines() {
        let text = written(|w| {
            w.write_string("two\nlines ").unwrap();
            w.write_string("").unwrap();
            w.write_char('Z').unwrap();
        });
        let mut canvas = CanvasGraphics::new();
        let mut r = AjrReader::new(text.as_bytes(), UTF_8, &mut canvas, Session::new(JdrVersion::V2_2));
        assert_eq!(r.read_string(FieldTag::Text).unwrap(), "two\nlines ");
        assert_eq!(r.read_string(FieldTag::Text).unwrap(), "");
        assert_eq!(r.read_char(FieldTag::SegmentId).unwrap(), 'Z');
    }

    #[test]
    fn eof_mid_stream() {
        let mut canvas = CanvasGraphics::new();
        let mut r = AjrReader::new(b"  \n", UTF_8, &mut canvas, Session::new(JdrVersion::V2_2));
        assert!(r.read_int(FieldTag::GroupSize).unwrap_err().is_unexpected_eof());
    }

    #[test]
    fn declared_charset_mismatch() {
        let mut canvas = CanvasGraphics::new();
        let mut r = AjrReader::new(
            b"AJR 2.2 ISO-8859-1\n",
            UTF_8,
            &mut canvas,
            Session::new(JdrVersion::V2_2),
        );
        match r.read_format_tag() {
            Err(JdrError::CharsetMismatch { declared, decoded }) => {
                assert_eq!(declared, "windows-1252");
                assert_eq!(decoded, "UTF-8");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unmappable_character() {
        let mut canvas = CanvasGraphics::new();
        let mut buf = Vec::new();
        let latin1 = Encoding::for_label(b"latin1").unwrap();
        let mut w = AjrWriter::new(&mut buf, &mut canvas, Session::new(JdrVersion::V2_2), latin1);
        match w.write_string("x\u{4e2d}") {
            Err(JdrError::Unmappable { character, .. }) => assert_eq!(character, '\u{4e2d}'),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn reset_restores_position_and_location() {
        let mut canvas = CanvasGraphics::new();
        let mut r = AjrReader::new(b"1 2\n3", UTF_8, &mut canvas, Session::new(JdrVersion::V1_7));
        r.read_int(FieldTag::AnchorIndex).unwrap();
        r.mark(1024);
        r.read_int(FieldTag::AnchorIndex).unwrap();
        r.read_int(FieldTag::AnchorIndex).unwrap();
        r.reset().unwrap();
        assert_eq!(r.read_int(FieldTag::AnchorIndex).unwrap(), 2);
        assert_eq!(r.location(), Some(Location { line: 1, column: 3 }));
    }

    #[test]
    fn string_length_counts_utf16_units() {
        let text = written(|w| {
            w.write_string("a\u{1F600}b").unwrap();
            w.write_int(7).unwrap();
        });
        assert_eq!(text, "4 a\u{1F600}b\n7");

        let mut canvas = CanvasGraphics::new();
        let mut r = AjrReader::new(text.as_bytes(), UTF_8, &mut canvas, Session::new(JdrVersion::V2_2));
        assert_eq!(r.read_string(FieldTag::Text).unwrap(), "a\u{1F600}b");
        assert_eq!(r.read_int(FieldTag::GroupSize).unwrap(), 7);
    }

    #[test]
    fn length_inside_surrogate_pair_is_rejected() {
        let mut canvas = CanvasGraphics::new();
        let input = "2 a\u{1F600}\n".as_bytes();
        let mut r = AjrReader::new(input, UTF_8, &mut canvas, Session::new(JdrVersion::V2_2));
        let err = r.read_string(FieldTag::Text).unwrap_err();
        assert_eq!(err.invalid_format().unwrap().tag, FieldTag::Text);
    }

    #[test]
    fn malformed_text_before_2_2_decodes_lossily() {
        let log = MessageLog::new();
        let mut canvas = CanvasGraphics::with_messages(log.clone());
        let input = b"AJR 2.1\n4 caf\xE9\n";
        let mut r = AjrReader::new(input, UTF_8, &mut canvas, Session::new(JdrVersion::V2_2));
        assert_eq!(r.read_format_tag().unwrap(), JdrVersion::V2_1);
        assert_eq!(r.read_string(FieldTag::Text).unwrap(), "caf\u{FFFD}");
        drop(r);
        assert_eq!(log.warnings().len(), 1);
    }

    #[test]
    fn malformed_text_with_charset_token_is_an_error() {
        let mut canvas = CanvasGraphics::new();
        let input = b"AJR 2.2 UTF-8\n4 caf\xE9\n";
        let mut r = AjrReader::new(input, UTF_8, &mut canvas, Session::new(JdrVersion::V2_2));
        let err = r.read_format_tag().unwrap_err();
        assert_eq!(err.invalid_format().unwrap().tag, FieldTag::Encoding);
    }

    #[test]
    fn bad_magic() {
        let mut canvas = CanvasGraphics::new();
        let mut r = AjrReader::new(b"XJR 1.0", UTF_8, &mut canvas, Session::new(JdrVersion::V2_2));
        let err = r.read_format_tag().unwrap_err();
        assert_eq!(err.invalid_format().unwrap().tag, FieldTag::FormatTag);
    }
}
