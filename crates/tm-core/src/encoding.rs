//! Text encodings accepted for migration files

use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoding used to read and write `.migration` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FileEncoding {
    #[default]
    #[serde(rename = "utf-8", alias = "utf8", alias = "UTF-8")]
    Utf8,
    #[serde(
        rename = "latin-1",
        alias = "latin1",
        alias = "iso-8859-1",
        alias = "ISO-8859-1"
    )]
    Latin1,
}

impl FileEncoding {
    /// Name written into the `coding:` header of new migration files
    pub fn name(&self) -> &'static str {
        match self {
            FileEncoding::Utf8 => "utf-8",
            FileEncoding::Latin1 => "latin-1",
        }
    }

    /// Decode raw file bytes. Latin-1 maps every byte to the code point of
    /// the same value, so it never fails.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, String> {
        match self {
            FileEncoding::Utf8 => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| format!("not valid utf-8: {e}"))?;
                Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
            }
            FileEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    pub fn encode(&self, text: &str) -> Result<Vec<u8>, String> {
        match self {
            FileEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            FileEncoding::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c))
                        .map_err(|_| format!("character '{c}' cannot be encoded as latin-1"))
                })
                .collect(),
        }
    }
}

impl fmt::Display for FileEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "encoding_test.rs"]
mod tests;
