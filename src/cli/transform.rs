//! Transform command implementation.
//!
//! Every input gets its own `Document` and `ErrorCollection`, so inputs are
//! processed in parallel. Results are written back in input order.

use std::ffi::OsStr;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::cli::TransformArgs;
use crate::config::AmpifyConfig;
use crate::error::ErrorCollection;
use crate::pipeline::Pipeline;
use crate::{debug, log};

const STDIN_NAME: &str = "stdin.html";

/// Per-input entry of the JSON report.
#[derive(Debug, Serialize)]
pub struct DocumentReport {
    pub path: String,
    /// The original markup was emitted instead of the transformed one.
    pub fell_back: bool,
    /// Set when the input could not be parsed at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    pub errors: ErrorCollection,
}

/// Result of processing one input.
#[derive(Debug)]
struct Processed {
    input: PathBuf,
    html: String,
    report: DocumentReport,
}

/// Execute transform command
pub fn run_transform(args: &TransformArgs, config: &AmpifyConfig) -> Result<()> {
    let pipeline = Pipeline::from_config(config);
    debug!("transform"; "pipeline: {}", pipeline.names().join(" → "));

    if let Some(dir) = &args.output {
        check_output_names(&args.inputs)?;
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let sources = read_inputs(&args.inputs)?;
    let processed: Vec<Processed> = sources
        .into_par_iter()
        .map(|(input, source)| process(&pipeline, input, source, args.strict))
        .collect();

    let mut fallbacks = 0usize;
    for item in &processed {
        fallbacks += usize::from(item.report.fell_back);
        write_output(item, args.output.as_deref())?;
    }

    if let Some(path) = &args.report {
        let reports: Vec<&DocumentReport> = processed.iter().map(|p| &p.report).collect();
        let json = serde_json::to_string_pretty(&reports)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        debug!("transform"; "wrote report to {}", path.display());
    }

    let total = processed.len();
    if fallbacks > 0 {
        log!("done"; "transformed {} of {} documents ({} fell back to the original)", total - fallbacks, total, fallbacks);
    } else {
        log!("done"; "transformed {} documents", total);
    }
    Ok(())
}

/// Read every input up front; `-` reads stdin once.
fn read_inputs(inputs: &[PathBuf]) -> Result<Vec<(PathBuf, String)>> {
    if inputs.iter().filter(|p| is_stdin(p)).count() > 1 {
        bail!("`-` (stdin) can only be given once");
    }

    inputs
        .iter()
        .map(|path| {
            let source = if is_stdin(path) {
                let mut buf = String::new();
                io::stdin().lock().read_to_string(&mut buf)?;
                buf
            } else {
                fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?
            };
            Ok((path.clone(), source))
        })
        .collect()
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// File name an input is written under in the output directory.
fn output_name(input: &Path) -> Result<&OsStr> {
    if is_stdin(input) {
        return Ok(OsStr::new(STDIN_NAME));
    }
    input
        .file_name()
        .with_context(|| format!("{} has no file name", input.display()))
}

/// Inputs that would land on the same output file are rejected up front.
fn check_output_names(inputs: &[PathBuf]) -> Result<()> {
    let mut seen: FxHashMap<&OsStr, &Path> = FxHashMap::default();
    for input in inputs {
        let name = output_name(input)?;
        if let Some(first) = seen.insert(name, input) {
            bail!(
                "{} and {} would both be written to {}",
                first.display(),
                input.display(),
                Path::new(name).display()
            );
        }
    }
    Ok(())
}

/// Transform one document, falling back to the source when required.
fn process(pipeline: &Pipeline, input: PathBuf, source: String, strict: bool) -> Processed {
    let path = input.display().to_string();

    match pipeline.run_html(&source) {
        Ok(output) => {
            for error in &output.errors {
                debug!("transform"; "{}: {}", path, error);
            }
            let fell_back = strict && output.errors.has_errors();
            if fell_back {
                log!("warning"; "{}: {} errors, keeping original markup", path, output.errors.len());
            }
            let html = if fell_back { source } else { output.to_html() };
            Processed {
                input,
                html,
                report: DocumentReport {
                    path,
                    fell_back,
                    parse_error: None,
                    errors: output.errors,
                },
            }
        }
        Err(err) => {
            log!("error"; "{}: {}, keeping original markup", path, err);
            Processed {
                input,
                html: source,
                report: DocumentReport {
                    path,
                    fell_back: true,
                    parse_error: Some(err.to_string()),
                    errors: ErrorCollection::new(),
                },
            }
        }
    }
}

/// Write into `dir` under the input's file name, or to stdout.
fn write_output(item: &Processed, dir: Option<&Path>) -> Result<()> {
    match dir {
        Some(dir) => {
            let target = dir.join(output_name(&item.input)?);
            fs::write(&target, &item.html)
                .with_context(|| format!("failed to write {}", target.display()))?;
            debug!("transform"; "wrote {}", target.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(item.html.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const GOOD: &str =
        r#"<html><head></head><body><amp-img src="a.png" width="300" height="200"></amp-img></body></html>"#;
    const BAD: &str =
        r#"<html><head></head><body><amp-img src="a.png" width="1x" height="200"></amp-img></body></html>"#;

    fn args(inputs: Vec<PathBuf>, out: &Path) -> TransformArgs {
        TransformArgs {
            inputs,
            output: Some(out.to_path_buf()),
            strict: false,
            report: None,
            verbose: false,
        }
    }

    fn setup(files: &[(&str, &str)]) -> (TempDir, Vec<PathBuf>) {
        let dir = TempDir::new().unwrap();
        let paths = files
            .iter()
            .map(|(name, content)| {
                let path = dir.path().join(name);
                fs::write(&path, content).unwrap();
                path
            })
            .collect();
        (dir, paths)
    }

    #[test]
    fn test_transform_to_directory() {
        let (dir, inputs) = setup(&[("a.html", GOOD), ("b.html", BAD)]);
        let out = dir.path().join("out");
        run_transform(&args(inputs, &out), &AmpifyConfig::default()).unwrap();

        let a = fs::read_to_string(out.join("a.html")).unwrap();
        assert!(a.contains(r#"transformed="self;v=1""#));
        assert!(a.contains(r#"layout="fixed""#));

        // Not strict: partial result is still written
        let b = fs::read_to_string(out.join("b.html")).unwrap();
        assert!(b.contains(r#"transformed="self;v=1""#));
    }

    #[test]
    fn test_strict_falls_back() {
        let (dir, inputs) = setup(&[("good.html", GOOD), ("bad.html", BAD)]);
        let out = dir.path().join("out");
        let report = dir.path().join("report.json");
        let args = TransformArgs {
            strict: true,
            report: Some(report.clone()),
            ..args(inputs, &out)
        };
        run_transform(&args, &AmpifyConfig::default()).unwrap();

        assert_eq!(fs::read_to_string(out.join("bad.html")).unwrap(), BAD);
        assert_ne!(fs::read_to_string(out.join("good.html")).unwrap(), GOOD);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["fell_back"], false);
        assert_eq!(entries[1]["fell_back"], true);
        assert_eq!(entries[1]["errors"][0]["kind"], "InvalidLength");
    }

    #[test]
    fn test_unparseable_input_kept() {
        let (dir, inputs) = setup(&[("empty.html", "   ")]);
        let out = dir.path().join("out");
        run_transform(&args(inputs, &out), &AmpifyConfig::default()).unwrap();
        assert_eq!(fs::read_to_string(out.join("empty.html")).unwrap(), "   ");
    }

    #[test]
    fn test_missing_input_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.html");
        let result = run_transform(&args(vec![missing], dir.path()), &AmpifyConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_output_name_collision_is_error() {
        let dir = TempDir::new().unwrap();
        let mut inputs = Vec::new();
        for sub in ["a", "b"] {
            let path = dir.path().join(sub).join("index.html");
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, GOOD).unwrap();
            inputs.push(path);
        }
        let out = dir.path().join("out");

        let err = run_transform(&args(inputs, &out), &AmpifyConfig::default()).unwrap_err();
        assert!(err.to_string().contains("index.html"));
        assert!(!out.exists());
    }
}
