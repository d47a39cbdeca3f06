//! Encoding resolution: which encoding should a file be read as?
//!
//! The answer comes from the first of three sources that applies: an
//! explicit hint (symbolic code or encoding name), a trial decode against
//! the Greek legacy codepage, or heuristic detection over the file content.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::detection::{DetectionResult, EncodingDetector};
use crate::{Encoding, Error, Result, tables};

/// Outcome of encoding resolution.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// Concrete encoding to decode the input under.
    pub encoding: Encoding,
    /// Detector output, present only when the heuristic path ran.
    pub detection: Option<DetectionResult>,
}

/// Map a symbolic encoding code to a concrete encoding.
///
/// `"1"`, `"2"` and `"3"` select UTF-8, UTF-16LE and UTF-16BE; any other
/// value is parsed as an encoding name. Unknown names are an error rather
/// than an undefined encoding.
pub fn encoding_from_code(code: &str) -> Result<Encoding> {
    match code.trim() {
        "1" => Ok(Encoding::UTF8),
        "2" => Ok(Encoding::UTF16LE),
        "3" => Ok(Encoding::UTF16BE),
        name => Encoding::from_name(name),
    }
}

/// Trial-decode `data` against the Greek legacy codepage.
///
/// Classifies as legacy only when every byte is assigned and at least one
/// byte is outside ASCII. Pure-ASCII content is shared by every supported
/// encoding and is left to the detector instead, and a recognized byte-order
/// mark is decisive evidence against a single-byte codepage.
pub fn is_legacy_codepage(data: &[u8]) -> bool {
    let bom_present = [Encoding::UTF8, Encoding::UTF16LE, Encoding::UTF16BE]
        .iter()
        .any(|encoding| encoding.bom().is_some_and(|bom| data.starts_with(bom)));

    !bom_present
        && data.iter().any(|&byte| byte >= 0x80)
        && data.iter().all(|&byte| tables::decode_byte(byte).is_some())
}

/// Resolve the encoding to read `input` as.
///
/// With a hint the file is not touched; without one the whole file is read
/// for the legacy probe and, failing that, for detection. A detection pass
/// that guesses nothing falls back to UTF-8.
pub fn resolve(input: &Path, hint: Option<&str>) -> Result<Resolution> {
    if let Some(code) = hint {
        return Ok(Resolution {
            encoding: encoding_from_code(code)?,
            detection: None,
        });
    }

    let data = fs::read(input).map_err(|source| Error::Io {
        path: input.to_path_buf(),
        source,
    })?;

    if is_legacy_codepage(&data) {
        return Ok(Resolution {
            encoding: Encoding::WINDOWS_1253,
            detection: None,
        });
    }

    let detection = EncodingDetector::new().detect(&data);
    Ok(Resolution {
        encoding: detection.encoding(),
        detection: Some(detection),
    })
}
