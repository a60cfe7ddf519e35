use crate::verify::Verifier;
use js2ts_common::{CommonError, FileSystem};
use js2ts_inference::{analyze, annotate, InferenceEngine, InferenceError, InferenceOptions};
use js2ts_parser::{format_error, parse, serialize, Serializer};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Pipeline stage a file failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Read,
    Parse,
    Annotate,
    Verify,
    Write,
}

/// Per-file failure. Each variant names the file it concerns.
#[derive(Error, Debug)]
pub enum TranspileError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: CommonError,
    },

    #[error("Failed to parse {}:\n{message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Failed to annotate {}: {source}", .path.display())]
    Annotate {
        path: PathBuf,
        #[source]
        source: InferenceError,
    },

    /// The output was written but did not pass verification
    #[error("TypeScript validation failed for {}:\n{}", .path.display(), .diagnostics.join("\n"))]
    Verification {
        path: PathBuf,
        diagnostics: Vec<String>,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: CommonError,
    },

    /// Another input in the batch already maps to the same output file
    #[error("{} would overwrite {}, already written for {}", .path.display(), .output.display(), .claimed_by.display())]
    OutputConflict {
        path: PathBuf,
        output: PathBuf,
        claimed_by: PathBuf,
    },
}

impl TranspileError {
    pub fn stage(&self) -> Stage {
        match self {
            TranspileError::Read { .. } => Stage::Read,
            TranspileError::Parse { .. } => Stage::Parse,
            TranspileError::Annotate { .. } => Stage::Annotate,
            TranspileError::Verification { .. } => Stage::Verify,
            TranspileError::Write { .. } | TranspileError::OutputConflict { .. } => Stage::Write,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failed,
}

/// Outcome of one input file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    /// Output path, when the file was written
    pub output: Option<PathBuf>,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub out_dir: PathBuf,
    pub compact: bool,
    pub inference: InferenceOptions,
}

/// Batch driver: parse, analyze, annotate, emit, write and verify each file
pub struct Driver<'a> {
    fs: &'a dyn FileSystem,
    verifier: Option<&'a dyn Verifier>,
    options: DriverOptions,
}

impl<'a> Driver<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        verifier: Option<&'a dyn Verifier>,
        options: DriverOptions,
    ) -> Self {
        Self {
            fs,
            verifier,
            options,
        }
    }

    /// `<outDir>/<stem>.ts` for an input file
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        self.options.out_dir.join(format!("{}.ts", stem))
    }

    /// Process every input in parallel. One file failing never stops the
    /// others; reports come back in input order.
    ///
    /// Inputs that map to an output path an earlier input already claimed
    /// fail without being processed.
    pub fn run(&self, inputs: &[PathBuf]) -> Vec<FileReport> {
        info!(files = inputs.len(), out_dir = %self.options.out_dir.display(), "transpiling");

        let conflicts = self.output_conflicts(inputs);

        inputs
            .par_iter()
            .zip(conflicts.par_iter())
            .map(|(input, conflict)| {
                let result = match conflict {
                    Some(claimed_by) => Err(TranspileError::OutputConflict {
                        path: input.clone(),
                        output: self.output_path(input),
                        claimed_by: claimed_by.clone(),
                    }),
                    None => self.transpile_file(input),
                };
                self.report(input, result)
            })
            .collect()
    }

    /// For each input, the earlier input whose output path it shares
    fn output_conflicts(&self, inputs: &[PathBuf]) -> Vec<Option<PathBuf>> {
        let mut claimed: HashMap<PathBuf, &PathBuf> = HashMap::new();

        inputs
            .iter()
            .map(|input| match claimed.entry(self.output_path(input)) {
                Entry::Occupied(first) => Some(first.get().to_path_buf()),
                Entry::Vacant(slot) => {
                    slot.insert(input);
                    None
                }
            })
            .collect()
    }

    fn report(&self, input: &Path, result: Result<PathBuf, TranspileError>) -> FileReport {
        match result {
            Ok(output) => FileReport {
                input: input.to_path_buf(),
                output: Some(output),
                status: Status::Success,
                stage: None,
                error: None,
            },
            Err(err) => {
                warn!(input = %input.display(), stage = ?err.stage(), "transpile failed");
                let output = match err.stage() {
                    Stage::Verify => Some(self.output_path(input)),
                    _ => None,
                };
                FileReport {
                    input: input.to_path_buf(),
                    output,
                    status: Status::Failed,
                    stage: Some(err.stage()),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    /// Transpile one file, returning the path written
    pub fn transpile_file(&self, input: &Path) -> Result<PathBuf, TranspileError> {
        let source = self
            .fs
            .read_to_string(input)
            .map_err(|source| TranspileError::Read {
                path: input.to_path_buf(),
                source,
            })?;

        let text = self.transpile_source(input, &source)?;

        let output = self.output_path(input);
        self.fs
            .create_dir_all(&self.options.out_dir)
            .and_then(|_| self.fs.write(&output, &text))
            .map_err(|source| TranspileError::Write {
                path: output.clone(),
                source,
            })?;
        debug!(input = %input.display(), output = %output.display(), "wrote output");

        if let Some(verifier) = self.verifier {
            let diagnostics = verifier.verify(&file_name(&output), &text);
            if !diagnostics.is_empty() {
                return Err(TranspileError::Verification {
                    path: output,
                    diagnostics,
                });
            }
        }

        Ok(output)
    }

    /// Parse, analyze, annotate and emit one source text
    pub fn transpile_source(&self, input: &Path, source: &str) -> Result<String, TranspileError> {
        let program = parse(source).map_err(|e| TranspileError::Parse {
            path: input.to_path_buf(),
            message: format_error(&e, &file_name(input), source),
        })?;

        // Each file gets its own engine, and with it its own cache
        let mut engine = InferenceEngine::new(self.options.inference.clone());
        let record = analyze(&program, &mut engine);
        let stats = engine.cache().stats();
        debug!(hits = stats.hits, misses = stats.misses, "inference cache");

        let annotated = annotate(program, &record, &self.options.inference).map_err(|source| {
            TranspileError::Annotate {
                path: input.to_path_buf(),
                source,
            }
        })?;

        Ok(if self.options.compact {
            Serializer::compact().serialize(&annotated)
        } else {
            serialize(&annotated)
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}
