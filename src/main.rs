//! Command-line entry point.
//!
//! `textconv <input_file> <output_file> [encoding_code]` converts a text
//! file to the Greek legacy codepage. With fewer than two arguments the
//! parameters are read from `param.txt` next to the executable. All relative
//! paths resolve against the executable's directory.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use textconv::{Converter, OutputPolicy, resolve};

/// Convert a text file between character encodings.
#[derive(Parser)]
#[command(name = "textconv")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input file, relative to the executable's directory
    input: Option<PathBuf>,

    /// Output file, relative to the executable's directory
    output: Option<PathBuf>,

    /// Source encoding: 1 (UTF-8), 2 (UTF-16LE), 3 (UTF-16BE), or an
    /// encoding name; auto-detected when omitted
    encoding: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    let base = base_dir();

    let (input, output, hint) = match (cli.input, cli.output) {
        (Some(input), Some(output)) => (input, output, cli.encoding),
        _ => match params_from_file(&base) {
            Ok(Some(params)) => params,
            Ok(None) => {
                println!("param.txt is missing required parameters.");
                return;
            }
            Err(err) => {
                eprintln!("Error reading param.txt: {err:#}");
                process::exit(1);
            }
        },
    };

    run(&base, &input, &output, hint.as_deref(), OutputPolicy::Legacy);
}

/// Directory all relative paths resolve against: the executable's directory,
/// or the current directory when it cannot be determined.
fn base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Read the fallback parameter file: UTF-8, one value per line, surrounding
/// whitespace trimmed, blank lines ignored. Returns `None` when fewer than
/// two usable lines are present.
fn params_from_file(base: &Path) -> Result<Option<(PathBuf, PathBuf, Option<String>)>> {
    let path = base.join("param.txt");
    println!("Reading parameters from {}", path.display());

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut lines = raw.lines().map(str::trim).filter(|line| !line.is_empty());
    let input = match lines.next() {
        Some(line) => PathBuf::from(line),
        None => return Ok(None),
    };
    let output = match lines.next() {
        Some(line) => PathBuf::from(line),
        None => return Ok(None),
    };
    let hint = lines.next().map(str::to_string);

    Ok(Some((input, output, hint)))
}

/// Resolve the source encoding, then convert. Conversion problems are
/// reported, not escalated; only parameter-file failures are fatal.
fn run(base: &Path, input: &Path, output: &Path, hint: Option<&str>, policy: OutputPolicy) {
    let input = base.join(input);
    let requested_output = base.join(output);

    let resolution = match resolve::resolve(&input, hint) {
        Ok(resolution) => resolution,
        Err(err) => {
            println!("Conversion failed: {err}");
            return;
        }
    };

    if let Some(detection) = &resolution.detection {
        println!(
            "Detected encoding: {} (confidence {:.2})",
            detection.encoding().name(),
            detection.confidence
        );
    }

    let output = policy.output_path(&requested_output, resolution.encoding);
    if output != requested_output {
        println!("Output file renamed to: {}", output.display());
    }

    let converter = Converter::new(resolution.encoding, policy);
    match converter.convert_file(&input, &output) {
        Ok(()) => println!("Conversion successful. Saved to: {}", output.display()),
        Err(err) => println!("Conversion failed: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_base(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("textconv-cli-{tag}-{}", process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn params_parse_with_trimming_and_blank_lines() {
        let base = scratch_base("params");
        fs::write(base.join("param.txt"), "\n  in.txt  \n\nout.txt\n2\n").unwrap();

        let (input, output, hint) = params_from_file(&base).unwrap().unwrap();
        assert_eq!(input, PathBuf::from("in.txt"));
        assert_eq!(output, PathBuf::from("out.txt"));
        assert_eq!(hint.as_deref(), Some("2"));
    }

    #[test]
    fn params_without_hint_line() {
        let base = scratch_base("params-nohint");
        fs::write(base.join("param.txt"), "in.txt\nout.txt\n").unwrap();

        let (_, _, hint) = params_from_file(&base).unwrap().unwrap();
        assert!(hint.is_none());
    }

    #[test]
    fn params_with_one_line_are_incomplete() {
        let base = scratch_base("params-short");
        fs::write(base.join("param.txt"), "in.txt\n\n").unwrap();
        assert!(params_from_file(&base).unwrap().is_none());
    }

    #[test]
    fn missing_param_file_is_an_error() {
        let base = scratch_base("params-missing");
        let _ = fs::remove_file(base.join("param.txt"));
        assert!(params_from_file(&base).is_err());
    }

    #[test]
    fn param_driven_conversion_produces_the_output_file() {
        let base = scratch_base("run-params");
        fs::write(base.join("param.txt"), "in.txt\nout.txt\n").unwrap();
        fs::write(base.join("in.txt"), b"ascii body\n").unwrap();

        let (input, output, hint) = params_from_file(&base).unwrap().unwrap();
        run(&base, &input, &output, hint.as_deref(), OutputPolicy::Legacy);

        // ASCII resolves as UTF-8 via detection; the legacy policy keeps the
        // bytes and the requested filename.
        assert_eq!(fs::read(base.join("out.txt")).unwrap(), b"ascii body\n");
    }

    #[test]
    fn explicit_utf8_hint_replaces_invalid_sequences() {
        let base = scratch_base("run-hint");
        fs::write(base.join("in.txt"), b"ab\xFFcd").unwrap();

        run(
            &base,
            Path::new("in.txt"),
            Path::new("out.txt"),
            Some("1"),
            OutputPolicy::Legacy,
        );

        assert_eq!(fs::read(base.join("out.txt")).unwrap(), b"ab?cd");
    }

    #[test]
    fn utf16le_hint_decodes_the_pairs() {
        let base = scratch_base("run-utf16");
        // "Γεια" in UTF-16LE.
        fs::write(
            base.join("in.txt"),
            [0x93, 0x03, 0xB5, 0x03, 0xB9, 0x03, 0xB1, 0x03],
        )
        .unwrap();

        run(
            &base,
            Path::new("in.txt"),
            Path::new("out.txt"),
            Some("2"),
            OutputPolicy::Legacy,
        );

        assert_eq!(
            fs::read(base.join("out.txt")).unwrap(),
            [0xC3, 0xE5, 0xE9, 0xE1]
        );
    }

    #[test]
    fn legacy_input_renames_the_output() {
        let base = scratch_base("run-rename");
        // "καλημέρα" in Windows-1253 routes through the legacy probe.
        fs::write(
            base.join("in.txt"),
            [0xEA, 0xE1, 0xEB, 0xE7, 0xEC, 0xDD, 0xF1, 0xE1],
        )
        .unwrap();

        run(
            &base,
            Path::new("in.txt"),
            Path::new("out.txt"),
            None,
            OutputPolicy::Legacy,
        );

        assert!(base.join("out_ANSI.txt").exists());
        assert!(!base.join("out.txt").exists());
        assert_eq!(
            fs::read(base.join("out_ANSI.txt")).unwrap(),
            [0xEA, 0xE1, 0xEB, 0xE7, 0xEC, 0xDD, 0xF1, 0xE1]
        );
    }

    #[test]
    fn bom_input_converts_without_the_bom() {
        let base = scratch_base("run-bom");
        let mut data = vec![0xEF, 0xBB, 0xBF];
        data.extend_from_slice("hello".as_bytes());
        fs::write(base.join("in.txt"), &data).unwrap();

        run(
            &base,
            Path::new("in.txt"),
            Path::new("out.txt"),
            None,
            OutputPolicy::Legacy,
        );

        assert_eq!(fs::read(base.join("out.txt")).unwrap(), b"hello");
    }

    #[test]
    fn unknown_hint_reports_and_writes_nothing() {
        let base = scratch_base("run-unknown");
        fs::write(base.join("in.txt"), b"whatever").unwrap();

        run(
            &base,
            Path::new("in.txt"),
            Path::new("out.txt"),
            Some("4"),
            OutputPolicy::Legacy,
        );

        assert!(!base.join("out.txt").exists());
    }

    #[test]
    fn utf8_bom_policy_end_to_end() {
        let base = scratch_base("run-utf8bom");
        // Legacy Greek input, Unicode output variant.
        fs::write(base.join("in.txt"), [0xEA, 0xE1, 0xEB, 0xE7]).unwrap();

        run(
            &base,
            Path::new("in.txt"),
            Path::new("out.txt"),
            None,
            OutputPolicy::Utf8Bom,
        );

        let written = fs::read(base.join("out.txt")).unwrap();
        assert!(written.starts_with(&[0xEF, 0xBB, 0xBF]));
        assert_eq!(&written[3..], "καλη".as_bytes());
        assert_eq!(
            textconv::Encoding::UTF8.decode_lossy(&written[3..]),
            "καλη"
        );
    }
}
