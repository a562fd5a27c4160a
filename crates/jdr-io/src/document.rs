//! File-level entry point: format detection, codec selection and the AJR
//! charset restart.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use encoding_rs::Encoding;
use jdr_types::{CompleteObject, JdrVersion, SettingsFlag};
use tracing::debug;

use crate::binary::{JdrReader, JdrWriter};
use crate::canvas::CanvasGraphics;
use crate::config::{encoding_for, IoConfig};
use crate::error::{InvalidFormat, JdrError, JdrResult};
use crate::handle::Session;
use crate::image::{load_image, save_image, LoadedImage};
use crate::registry::Registries;
use crate::tag::FieldTag;
use crate::text::{AjrReader, AjrWriter};

/// The two on-disk encodings of a drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// Binary.
    Jdr,
    /// Text.
    Ajr,
}

impl Format {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Jdr => "jdr",
            Self::Ajr => "ajr",
        }
    }

    /// Recognise a file from its first bytes.
    pub fn detect(bytes: &[u8]) -> Option<Format> {
        const JDR_MAGIC: [u8; 6] = [0, b'J', 0, b'D', 0, b'R'];
        if bytes.starts_with(&JDR_MAGIC) {
            return Some(Self::Jdr);
        }
        let text = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let start = text.iter().position(|b| !b.is_ascii_whitespace())?;
        text[start..].starts_with(b"AJR").then_some(Self::Ajr)
    }

    /// Guess from a file extension.
    pub fn from_path(path: &Path) -> Option<Format> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = JdrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jdr" => Ok(Self::Jdr),
            "ajr" => Ok(Self::Ajr),
            other => Err(JdrError::Config(format!("unknown format '{other}'"))),
        }
    }
}

/// Recognise a file from its first bytes.
pub fn detect_format(bytes: &[u8]) -> Option<Format> {
    Format::detect(bytes)
}

/// How to save an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaveOptions {
    pub format: Format,
    pub version: JdrVersion,
    pub settings: SettingsFlag,
}

impl SaveOptions {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            version: JdrVersion::LATEST,
            settings: SettingsFlag::AllSettings,
        }
    }

    pub fn with_version(mut self, version: JdrVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_settings(mut self, settings: SettingsFlag) -> Self {
        self.settings = settings;
        self
    }
}

/// Saves and loads drawings with a fixed configuration.
///
/// ```no_run
/// use jdr_io::{CanvasGraphics, Format, IoConfig, JdrIo};
/// use jdr_types::CompleteObject;
///
/// let io = JdrIo::new(IoConfig::default())?;
/// let mut canvas = CanvasGraphics::new();
/// let root = CompleteObject::group(Vec::new());
/// io.save_file("drawing.ajr".as_ref(), &root, &mut canvas, io.save_options(Format::Ajr))?;
/// let loaded = io.load_file("drawing.ajr".as_ref(), &mut canvas)?;
/// assert_eq!(loaded.root, root);
/// # Ok::<(), jdr_io::JdrError>(())
/// ```
#[derive(Clone)]
pub struct JdrIo {
    config: IoConfig,
    registries: Arc<Registries>,
}

impl JdrIo {
    pub fn new(config: IoConfig) -> JdrResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registries: Registries::standard(),
        })
    }

    pub fn with_registries(mut self, registries: Arc<Registries>) -> Self {
        self.registries = registries;
        self
    }

    pub fn config(&self) -> &IoConfig {
        &self.config
    }

    pub fn registries(&self) -> &Arc<Registries> {
        &self.registries
    }

    /// Options for `format` using the configured version and settings.
    pub fn save_options(&self, format: Format) -> SaveOptions {
        SaveOptions::new(format)
            .with_version(self.config.default_version)
            .with_settings(self.config.default_settings)
    }

    fn session(&self, version: JdrVersion, base_path: Option<&Path>) -> Session {
        let session = Session::from_config(&self.config, version)
            .with_registries(Arc::clone(&self.registries));
        match base_path {
            Some(base) => session.with_base_path(base),
            None => session,
        }
    }

    /// Write `root` to `out`, returning the writer.
    pub fn save<W: Write>(
        &self,
        out: W,
        root: &CompleteObject,
        canvas: &mut CanvasGraphics,
        options: SaveOptions,
    ) -> JdrResult<W> {
        let session = self.session(options.version, None);
        debug!(format = %options.format, version = %options.version, "saving");
        match options.format {
            Format::Jdr => {
                let mut writer = JdrWriter::new(out, canvas, session);
                save_image(&mut writer, root, options.settings)?;
                Ok(writer.into_inner())
            }
            Format::Ajr => {
                let encoding = self.config.encoding()?;
                let mut writer = AjrWriter::new(out, canvas, session, encoding)
                    .with_preferred_width(self.config.preferred_width);
                save_image(&mut writer, root, options.settings)?;
                Ok(writer.into_inner())
            }
        }
    }

    /// Load an image from memory. Relative bitmap names are resolved
    /// against `base_path`.
    pub fn load(
        &self,
        bytes: &[u8],
        canvas: &mut CanvasGraphics,
        base_path: Option<&Path>,
    ) -> JdrResult<LoadedImage> {
        match Format::detect(bytes) {
            Some(Format::Jdr) => {
                let session = self.session(JdrVersion::LATEST, base_path);
                let mut reader = JdrReader::new(bytes, canvas, session);
                load_image(&mut reader)
            }
            Some(Format::Ajr) => {
                let encoding = self.config.encoding()?;
                match self.load_ajr(bytes, canvas, base_path, encoding) {
                    Err(JdrError::CharsetMismatch { declared, decoded }) => {
                        debug!(%declared, %decoded, "restarting AJR load");
                        let encoding = encoding_for(&declared)?;
                        self.load_ajr(bytes, canvas, base_path, encoding)
                            .map_err(|err| match err {
                                JdrError::CharsetMismatch { declared, .. } => InvalidFormat {
                                    tag: FieldTag::Encoding,
                                    value: declared,
                                    location: None,
                                }
                                .into(),
                                other => other,
                            })
                    }
                    other => other,
                }
            }
            None => {
                let preview: String = bytes
                    .iter()
                    .take(8)
                    .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
                    .collect();
                Err(InvalidFormat {
                    tag: FieldTag::FormatTag,
                    value: preview,
                    location: None,
                }
                .into())
            }
        }
    }

    fn load_ajr(
        &self,
        bytes: &[u8],
        canvas: &mut CanvasGraphics,
        base_path: Option<&Path>,
        encoding: &'static Encoding,
    ) -> JdrResult<LoadedImage> {
        let session = self.session(JdrVersion::LATEST, base_path);
        let mut reader =
            AjrReader::new(bytes, encoding, canvas, session).with_word_limit(self.config.word_buffer);
        load_image(&mut reader)
    }

    pub fn save_file(
        &self,
        path: &Path,
        root: &CompleteObject,
        canvas: &mut CanvasGraphics,
        options: SaveOptions,
    ) -> JdrResult<()> {
        let file = File::create(path)?;
        self.save(BufWriter::new(file), root, canvas, options)?;
        debug!(path = %path.display(), "saved");
        Ok(())
    }

    /// Load a file. Bitmaps are resolved relative to its directory.
    pub fn load_file(&self, path: &Path, canvas: &mut CanvasGraphics) -> JdrResult<LoadedImage> {
        let bytes = fs::read(path)?;
        self.load(&bytes, canvas, path.parent())
    }
}

impl fmt::Debug for JdrIo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JdrIo")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_both_formats() {
        assert_eq!(detect_format(&[0, b'J', 0, b'D', 0, b'R', 0, 0]), Some(Format::Jdr));
        assert_eq!(detect_format(b"AJR 2.2 UTF-8\n"), Some(Format::Ajr));
        assert_eq!(detect_format(b"\xEF\xBB\xBF  AJR 1.0\n"), Some(Format::Ajr));
        assert_eq!(detect_format(b"%!PS-Adobe"), None);
        assert_eq!(detect_format(b""), None);
    }

    #[test]
    fn format_from_path() {
        assert_eq!(Format::from_path(Path::new("a/b.JDR")), Some(Format::Jdr));
        assert_eq!(Format::from_path(Path::new("x.ajr")), Some(Format::Ajr));
        assert_eq!(Format::from_path(Path::new("x.svg")), None);
        assert_eq!(Format::from_path(Path::new("noext")), None);
    }

    #[test]
    fn unknown_header_is_format_error() {
        let io = JdrIo::new(IoConfig::default()).unwrap();
        let mut canvas = CanvasGraphics::new();
        let err = io.load(b"hello", &mut canvas, None).unwrap_err();
        assert_eq!(err.invalid_format().unwrap().tag, FieldTag::FormatTag);
    }

    #[test]
    fn save_options_follow_config() {
        let config = IoConfig {
            default_version: JdrVersion::V1_5,
            default_settings: SettingsFlag::PaperOnly,
            ..IoConfig::default()
        };
        let io = JdrIo::new(config).unwrap();
        let options = io.save_options(Format::Jdr);
        assert_eq!(options.version, JdrVersion::V1_5);
        assert_eq!(options.settings, SettingsFlag::PaperOnly);
    }
}
