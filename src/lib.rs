//! # textconv - Text File Encoding Converter
//!
//! Converts text files between character encodings, with heuristic encoding
//! detection and first-class support for the Greek Windows-1253 legacy
//! codepage. Decoding and encoding are lossy: undecodable byte sequences
//! become U+FFFD, unencodable characters become `?`, and a leading
//! byte-order mark is stripped before re-encoding.
//!
//! ## Quick Start
//!
//! ```rust
//! use textconv::{Converter, Encoding, OutputPolicy};
//!
//! // Re-encode UTF-8 input to the Greek legacy codepage.
//! let converter = Converter::new(Encoding::UTF8, OutputPolicy::Legacy);
//! let output = converter.convert("Καλημέρα".as_bytes());
//! assert_eq!(output, [0xCA, 0xE1, 0xEB, 0xE7, 0xEC, 0xDD, 0xF1, 0xE1]);
//! ```
//!
//! Deciding *which* encoding to read a file as lives in [`resolve`];
//! the statistical guesser lives in [`detection`].

#![deny(missing_docs)]

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub mod detection;
pub mod resolve;
mod tables;

/// Result type for encoding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or converting.
#[derive(Debug)]
pub enum Error {
    /// An encoding code or name that does not map to a supported encoding.
    UnknownEncoding(String),
    /// A file could not be read or written.
    Io {
        /// The file the operation failed on.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownEncoding(name) => write!(f, "unsupported encoding: {name}"),
            Error::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UnknownEncoding(_) => None,
            Error::Io { source, .. } => Some(source),
        }
    }
}

/// Supported character encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[allow(non_camel_case_types)]
pub enum Encoding {
    /// UTF-8 Unicode encoding (variable length, 1-4 bytes).
    UTF8,
    /// UTF-16 Unicode encoding, little endian.
    UTF16LE,
    /// UTF-16 Unicode encoding, big endian.
    UTF16BE,
    /// Windows-1253, the single-byte Greek legacy codepage.
    WINDOWS_1253,
}

impl Encoding {
    /// Canonical name of this encoding.
    pub fn name(self) -> &'static str {
        match self {
            Encoding::UTF8 => "UTF-8",
            Encoding::UTF16LE => "UTF-16LE",
            Encoding::UTF16BE => "UTF-16BE",
            Encoding::WINDOWS_1253 => "Windows-1253",
        }
    }

    /// Byte order mark for this encoding, if it has one.
    pub fn bom(self) -> Option<&'static [u8]> {
        match self {
            Encoding::UTF8 => Some(&[0xEF, 0xBB, 0xBF]),
            Encoding::UTF16LE => Some(&[0xFF, 0xFE]),
            Encoding::UTF16BE => Some(&[0xFE, 0xFF]),
            Encoding::WINDOWS_1253 => None,
        }
    }

    /// Parse an encoding name, accepting common aliases.
    pub fn from_name(name: &str) -> Result<Self> {
        let encoding = match name.trim().to_uppercase().as_str() {
            "UTF8" | "UTF-8" => Encoding::UTF8,
            "UTF16LE" | "UTF-16LE" | "UTF-16-LE" => Encoding::UTF16LE,
            "UTF16BE" | "UTF-16BE" | "UTF-16-BE" => Encoding::UTF16BE,
            "WINDOWS1253" | "WINDOWS-1253" | "WIN1253" | "CP1253" | "CP-1253" => {
                Encoding::WINDOWS_1253
            }
            _ => return Err(Error::UnknownEncoding(name.trim().to_string())),
        };
        Ok(encoding)
    }

    /// Decode `data` under this encoding, replacing undecodable byte
    /// sequences with U+FFFD. Never fails.
    pub fn decode_lossy(self, data: &[u8]) -> String {
        match self {
            Encoding::UTF8 => String::from_utf8_lossy(data).into_owned(),
            Encoding::UTF16LE | Encoding::UTF16BE => {
                let units: Vec<u16> = data
                    .chunks_exact(2)
                    .map(|pair| match self {
                        Encoding::UTF16LE => u16::from_le_bytes([pair[0], pair[1]]),
                        _ => u16::from_be_bytes([pair[0], pair[1]]),
                    })
                    .collect();
                let mut text = String::from_utf16_lossy(&units);
                if data.len() % 2 != 0 {
                    // Dangling trailing byte.
                    text.push(char::REPLACEMENT_CHARACTER);
                }
                text
            }
            Encoding::WINDOWS_1253 => data
                .iter()
                .map(|&byte| tables::decode_byte(byte).unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect(),
        }
    }
}

impl std::str::FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Encoding::from_name(s)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Final output encoding policy.
///
/// The two historical variants of this tool differed only here: one wrote
/// the Greek legacy codepage and tagged the output filename, the other wrote
/// UTF-8 with a BOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputPolicy {
    /// Encode to Windows-1253, replacing unencodable characters with `?`.
    /// Output converted from legacy-codepage input gains an `_ANSI` filename
    /// suffix before the extension.
    Legacy,
    /// Encode to UTF-8 and write a leading byte-order mark.
    Utf8Bom,
}

impl OutputPolicy {
    /// The encoding this policy writes.
    pub fn target(self) -> Encoding {
        match self {
            OutputPolicy::Legacy => Encoding::WINDOWS_1253,
            OutputPolicy::Utf8Bom => Encoding::UTF8,
        }
    }

    /// Encode `text` under this policy. Never fails; unencodable characters
    /// are replaced with `?`.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            OutputPolicy::Legacy => {
                let reverse = tables::char_to_byte();
                text.chars()
                    .map(|ch| {
                        if ch.is_ascii() {
                            ch as u8
                        } else {
                            reverse.get(&ch).copied().unwrap_or(b'?')
                        }
                    })
                    .collect()
            }
            OutputPolicy::Utf8Bom => {
                let mut output = Vec::with_capacity(3 + text.len());
                output.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
                output.extend_from_slice(text.as_bytes());
                output
            }
        }
    }

    /// The actual output path for a conversion from `source`.
    ///
    /// Legacy-codepage input converted under the legacy policy keeps the
    /// historical convention of an `_ANSI` suffix before the extension;
    /// everything else uses `requested` unchanged.
    pub fn output_path(self, requested: &Path, source: Encoding) -> PathBuf {
        if self == OutputPolicy::Legacy && source == Encoding::WINDOWS_1253 {
            append_before_extension(requested, "_ANSI")
        } else {
            requested.to_path_buf()
        }
    }
}

fn append_before_extension(path: &Path, suffix: &str) -> PathBuf {
    let mut name = match path.file_stem() {
        Some(stem) => stem.to_os_string(),
        None => std::ffi::OsString::new(),
    };
    name.push(suffix);
    if let Some(extension) = path.extension() {
        name.push(".");
        name.push(extension);
    }
    path.with_file_name(name)
}

/// Whole-file converter: lossy decode, BOM strip, policy encode.
#[derive(Debug, Clone, Copy)]
pub struct Converter {
    source: Encoding,
    policy: OutputPolicy,
}

impl Converter {
    /// Create a converter reading `source` and writing per `policy`.
    pub fn new(source: Encoding, policy: OutputPolicy) -> Self {
        Self { source, policy }
    }

    /// The encoding input is decoded under.
    pub fn source(&self) -> Encoding {
        self.source
    }

    /// The output policy.
    pub fn policy(&self) -> OutputPolicy {
        self.policy
    }

    /// Convert raw input bytes to output bytes.
    ///
    /// Decodes lossily, strips a single leading U+FEFF, and re-encodes
    /// lossily. Never fails.
    pub fn convert(&self, input: &[u8]) -> Vec<u8> {
        let text = self.source.decode_lossy(input);
        let stripped = text.strip_prefix('\u{FEFF}').unwrap_or(text.as_str());
        self.policy.encode(stripped)
    }

    /// Convert `input` into `output`, fully overwriting it.
    pub fn convert_file(&self, input: &Path, output: &Path) -> Result<()> {
        let data = fs::read(input).map_err(|source| Error::Io {
            path: input.to_path_buf(),
            source,
        })?;
        let converted = self.convert(&data);
        fs::write(output, converted).map_err(|source| Error::Io {
            path: output.to_path_buf(),
            source,
        })
    }
}
