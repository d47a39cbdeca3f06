//! Heuristic encoding detection with confidence scoring.
//!
//! Statistical guesses only: a byte-order mark is the one certain signal,
//! everything else is scored from byte patterns and ranked. Callers decide
//! what to do with a low-confidence or absent guess.

use serde::Serialize;

use crate::{Encoding, tables};

/// Result of encoding detection.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionResult {
    /// Most likely encoding, `None` when nothing scored.
    pub guess: Option<Encoding>,
    /// Confidence of the guess, 0.0 to 1.0.
    pub confidence: f64,
    /// Whether the guess came from a byte-order mark.
    pub bom_detected: bool,
    /// All candidate encodings with their scores, best first.
    pub candidates: Vec<(Encoding, f64)>,
}

impl DetectionResult {
    /// The guessed encoding with the UTF-8 fallback applied.
    pub fn encoding(&self) -> Encoding {
        self.guess.unwrap_or(Encoding::UTF8)
    }
}

/// Byte-level encoding detector.
#[derive(Debug, Default)]
pub struct EncodingDetector;

impl EncodingDetector {
    /// Create a new detector.
    pub fn new() -> Self {
        Self
    }

    /// Detect the encoding of `data`.
    pub fn detect(&self, data: &[u8]) -> DetectionResult {
        if let Some(encoding) = self.detect_bom(data) {
            return DetectionResult {
                guess: Some(encoding),
                confidence: 1.0,
                bom_detected: true,
                candidates: vec![(encoding, 1.0)],
            };
        }

        let mut candidates = Vec::new();

        if let Some(confidence) = self.score_utf8(data) {
            candidates.push((Encoding::UTF8, confidence));
        } else if let Some(confidence) = self.score_windows_1253(data) {
            // The legacy codepage only competes when the data is not
            // well-formed UTF-8.
            candidates.push((Encoding::WINDOWS_1253, confidence));
        }

        if let Some((encoding, confidence)) = self.score_utf16(data) {
            candidates.push((encoding, confidence));
        }

        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

        let (guess, confidence) = match candidates.first() {
            Some(&(encoding, confidence)) => (Some(encoding), confidence),
            None => (None, 0.0),
        };

        DetectionResult {
            guess,
            confidence,
            bom_detected: false,
            candidates,
        }
    }

    fn detect_bom(&self, data: &[u8]) -> Option<Encoding> {
        if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
            Some(Encoding::UTF8)
        } else if data.starts_with(&[0xFF, 0xFE]) {
            Some(Encoding::UTF16LE)
        } else if data.starts_with(&[0xFE, 0xFF]) {
            Some(Encoding::UTF16BE)
        } else {
            None
        }
    }

    /// Score well-formed UTF-8. Multi-byte sequences raise confidence;
    /// pure ASCII stays moderate since every supported encoding shares it.
    fn score_utf8(&self, data: &[u8]) -> Option<f64> {
        if data.is_empty() {
            return None;
        }
        let text = std::str::from_utf8(data).ok()?;

        let total = text.chars().count();
        let multibyte = text.chars().filter(|ch| !ch.is_ascii()).count();
        if multibyte == 0 {
            return Some(0.8);
        }

        let ratio = multibyte as f64 / total as f64;
        Some(0.7 + 0.3 * ratio)
    }

    /// Score UTF-16 from null-byte placement. Latin-range UTF-16 text has a
    /// zero byte in every other position; the denser side picks the
    /// endianness.
    fn score_utf16(&self, data: &[u8]) -> Option<(Encoding, f64)> {
        if data.len() < 2 || data.len() % 2 != 0 {
            return None;
        }

        let pairs = data.len() / 2;
        let mut le_hits = 0usize;
        let mut be_hits = 0usize;

        for chunk in data.chunks_exact(2) {
            if chunk[1] == 0 && chunk[0] != 0 {
                le_hits += 1;
            }
            if chunk[0] == 0 && chunk[1] != 0 {
                be_hits += 1;
            }
        }

        let le_ratio = le_hits as f64 / pairs as f64;
        let be_ratio = be_hits as f64 / pairs as f64;

        if le_ratio > 0.4 && le_ratio >= be_ratio {
            Some((Encoding::UTF16LE, 0.5 + 0.45 * le_ratio))
        } else if be_ratio > 0.4 {
            Some((Encoding::UTF16BE, 0.5 + 0.45 * be_ratio))
        } else {
            None
        }
    }

    /// Score the Greek legacy codepage from the high-byte profile:
    /// assigned Greek-block positions raise confidence, unassigned bytes
    /// sink it.
    fn score_windows_1253(&self, data: &[u8]) -> Option<f64> {
        let high: Vec<u8> = data.iter().copied().filter(|&b| b >= 0x80).collect();
        if high.is_empty() {
            return None;
        }

        let mut greek = 0usize;
        let mut unassigned = 0usize;
        for &byte in &high {
            match tables::decode_byte(byte) {
                Some(ch) if ('\u{0384}'..='\u{03CE}').contains(&ch) => greek += 1,
                Some(_) => {}
                None => unassigned += 1,
            }
        }

        let greek_ratio = greek as f64 / high.len() as f64;
        let penalty = unassigned as f64 / high.len() as f64;
        let score = 0.5 + 0.4 * greek_ratio - 0.6 * penalty;

        if score > 0.3 { Some(score.min(0.9)) } else { None }
    }
}
