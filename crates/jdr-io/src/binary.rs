//! JDR: the binary codec.
//!
//! Wire primitives:
//! ```text
//! int     4 bytes, big-endian two's complement
//! double  8 bytes, big-endian IEEE-754
//! byte    1 byte
//! boolean 1 byte (0 or 1)
//! char    2 bytes, big-endian UTF-16 code unit
//! string  int count of UTF-16 units, then the units
//! ```
//! The header is the three chars `JDR` followed by the version string.

use std::io::{Read, Write};

use jdr_types::JdrVersion;
use tracing::debug;

use crate::canvas::CanvasGraphics;
use crate::error::{InvalidFormat, JdrError, JdrResult, Location};
use crate::handle::{FormatHandle, FormatReader, FormatWriter, Session};
use crate::mark::MarkReader;
use crate::tag::FieldTag;

pub const MAGIC: &str = "JDR";

/// Writes JDR binary data.
pub struct JdrWriter<'a, W: Write> {
    out: W,
    session: Session,
    canvas: &'a mut CanvasGraphics,
}

impl<'a, W: Write> JdrWriter<'a, W> {
    pub fn new(out: W, canvas: &'a mut CanvasGraphics, session: Session) -> Self {
        Self {
            out,
            session,
            canvas,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn put(&mut self, bytes: &[u8]) -> JdrResult<()> {
        self.out.write_all(bytes)?;
        Ok(())
    }
}

impl<W: Write> FormatHandle for JdrWriter<'_, W> {
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

impl<W: Write> FormatWriter for JdrWriter<'_, W> {
    fn write_int(&mut self, value: i32) -> JdrResult<()> {
        self.put(&value.to_be_bytes())
    }

    fn write_double(&mut self, value: f64) -> JdrResult<()> {
        self.put(&value.to_be_bytes())
    }

    fn write_byte(&mut self, value: u8) -> JdrResult<()> {
        self.put(&[value])
    }

    fn write_bool(&mut self, value: bool) -> JdrResult<()> {
        self.put(&[u8::from(value)])
    }

    fn write_char(&mut self, value: char) -> JdrResult<()> {
        let mut units = [0u16; 2];
        match value.encode_utf16(&mut units) {
            [unit] => {
                let unit = *unit;
                self.put(&unit.to_be_bytes())
            }
            _ => Err(JdrError::Unmappable {
                charset: "UTF-16 char".into(),
                character: value,
            }),
        }
    }

    fn write_string(&mut self, value: &str) -> JdrResult<()> {
        let units: Vec<u16> = value.encode_utf16().collect();
        self.write_int(units.len() as i32)?;
        let mut bytes = Vec::with_capacity(units.len() * 2);
        for unit in units {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        self.put(&bytes)
    }

    fn write_format_tag(&mut self) -> JdrResult<()> {
        for c in MAGIC.chars() {
            self.write_char(c)?;
        }
        let version = self.version();
        self.write_string(version.as_str())
    }

    fn flush(&mut self) -> JdrResult<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Reads JDR binary data.
pub struct JdrReader<'a, R: Read> {
    input: MarkReader<R>,
    session: Session,
    canvas: &'a mut CanvasGraphics,
}

impl<'a, R: Read> JdrReader<'a, R> {
    pub fn new(input: R, canvas: &'a mut CanvasGraphics, session: Session) -> Self {
        Self {
            input: MarkReader::new(input),
            session,
            canvas,
        }
    }

    fn take<const N: usize>(&mut self) -> JdrResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.input.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn read_unit(&mut self) -> JdrResult<u16> {
        Ok(u16::from_be_bytes(self.take::<2>()?))
    }
}

impl<R: Read> FormatHandle for JdrReader<'_, R> {
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

impl<R: Read> FormatReader for JdrReader<'_, R> {
    fn read_int(&mut self, _tag: FieldTag) -> JdrResult<i32> {
        Ok(i32::from_be_bytes(self.take::<4>()?))
    }

    fn read_double(&mut self, _tag: FieldTag) -> JdrResult<f64> {
        Ok(f64::from_be_bytes(self.take::<8>()?))
    }

    fn read_byte(&mut self, _tag: FieldTag) -> JdrResult<u8> {
        Ok(self.take::<1>()?[0])
    }

    fn read_bool(&mut self, tag: FieldTag) -> JdrResult<bool> {
        match self.take::<1>()?[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(self.invalid_value(tag, other.to_string())),
        }
    }

    fn read_char(&mut self, tag: FieldTag) -> JdrResult<char> {
        let unit = self.read_unit()?;
        char::from_u32(unit as u32).ok_or_else(|| self.invalid_value(tag, format!("\\u{unit:04x}")))
    }

    fn read_string(&mut self, tag: FieldTag) -> JdrResult<String> {
        let len = self.read_int(tag)?;
        if len < 0 {
            return Err(self.invalid_value(tag, len.to_string()));
        }
        let mut units = Vec::with_capacity((len as usize).min(4096));
        for _ in 0..len {
            units.push(self.read_unit()?);
        }
        String::from_utf16(&units).map_err(|_| self.invalid_value(tag, format!("{len} UTF-16 units")))
    }

    fn read_format_tag(&mut self) -> JdrResult<JdrVersion> {
        let mut magic = String::new();
        for _ in 0..MAGIC.len() {
            let unit = self.read_unit()?;
            magic.push(char::from_u32(unit as u32).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
        if magic != MAGIC {
            return Err(InvalidFormat {
                tag: FieldTag::FormatTag,
                value: magic,
                location: None,
            }
            .into());
        }
        let token = self.read_string(FieldTag::Version)?;
        let version: JdrVersion = token.parse()?;
        self.session.set_version(version);
        debug!(%version, "read JDR header");
        Ok(version)
    }

    fn mark(&mut self, limit: usize) {
        self.input.mark(limit);
    }

    fn reset(&mut self) -> JdrResult<()> {
        if self.input.reset() {
            Ok(())
        } else {
            Err(JdrError::MarkInvalidated)
        }
    }

    fn location(&self) -> Option<Location> {
        None
    }
}
