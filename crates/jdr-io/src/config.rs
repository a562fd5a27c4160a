use std::path::Path;

use encoding_rs::Encoding;
use jdr_types::{JdrVersion, SettingsFlag};
use serde::{Deserialize, Serialize};

use crate::error::{JdrError, JdrResult};

/// What to do with a bitmap whose file cannot be found on load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingBitmaps {
    /// Keep the object and warn.
    #[default]
    Keep,
    /// Warn and drop the object.
    Discard,
}

/// Configuration for the JDR and AJR codecs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Version written when none is requested.
    pub default_version: JdrVersion,
    /// Settings written when none are requested.
    pub default_settings: SettingsFlag,
    /// AJR output wraps before the next word once a line is longer than this.
    pub preferred_width: usize,
    /// Longest AJR word accepted on load.
    pub word_buffer: usize,
    /// Charset used to write AJR files and to start decoding them.
    pub charset: String,
    /// Lookahead allowed for the version 1.7 anchor recovery.
    pub mark_limit: usize,
    pub missing_bitmaps: MissingBitmaps,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            default_version: JdrVersion::LATEST,
            default_settings: SettingsFlag::AllSettings,
            preferred_width: 80,
            word_buffer: 255,
            charset: "UTF-8".into(),
            mark_limit: 1024,
            missing_bitmaps: MissingBitmaps::Keep,
        }
    }
}

impl IoConfig {
    pub fn from_toml_str(text: &str) -> JdrResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| JdrError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> JdrResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> JdrResult<String> {
        toml::to_string_pretty(self).map_err(|e| JdrError::Config(e.to_string()))
    }

    pub fn validate(&self) -> JdrResult<()> {
        if self.word_buffer == 0 {
            return Err(JdrError::Config("word_buffer must be positive".into()));
        }
        if self.mark_limit == 0 {
            return Err(JdrError::Config("mark_limit must be positive".into()));
        }
        self.encoding()?;
        Ok(())
    }

    /// The configured AJR charset.
    pub fn encoding(&self) -> JdrResult<&'static Encoding> {
        encoding_for(&self.charset)
    }
}

/// Look up a charset that can be used both to read and to write AJR.
pub fn encoding_for(label: &str) -> JdrResult<&'static Encoding> {
    match Encoding::for_label(label.trim().as_bytes()) {
        Some(enc) if enc.output_encoding() == enc => Ok(enc),
        _ => Err(JdrError::UnsupportedCharset(label.to_string())),
    }
}
