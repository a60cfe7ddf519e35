use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use js2ts_inference::{analyze as analyze_program, AnalysisRecord, InferenceEngine};
use js2ts_parser::{format_error, parse};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// JavaScript file to analyze
    pub file: String,

    /// Write the JSON record to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

pub fn analyze(args: AnalyzeArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = PathBuf::from(cwd).join(&args.file);

    let record = analyze_file(&path, &config)?;
    let json = serde_json::to_string_pretty(&record)?;

    match &args.output {
        Some(output) => {
            let output_path = PathBuf::from(cwd).join(output);
            fs::write(&output_path, json)?;
            println!(
                "  {} Analysis written to {}",
                "✓".green(),
                output_path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn analyze_file(path: &Path, config: &Config) -> Result<AnalysisRecord> {
    let source = fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;

    let program = parse(&source).map_err(|e| {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        anyhow!("\n{}", format_error(&e, file_name, &source))
    })?;

    let mut engine = InferenceEngine::new(config.inference_options());
    Ok(analyze_program(&program, &mut engine))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        fs::write(
            dir.path().join("test.js"),
            "let x = 42;\nconst obj = { a: 1, b: 'test' };\nfunction add(a, b) {\n    return a + b;\n}\nconst arr = [1, 'two', true];\n",
        )
        .unwrap();

        analyze(
            AnalyzeArgs {
                file: "test.js".to_string(),
                output: Some("analysis-output.json".to_string()),
            },
            &cwd,
        )
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("analysis-output.json")).unwrap(),
        )
        .unwrap();

        assert_eq!(json["variableDeclarations"].as_array().unwrap().len(), 3);
        assert_eq!(
            json["variableDeclarations"][1]["declarations"][0]["tsType"],
            "{ a: number; b: string }"
        );
        assert_eq!(json["functionDefinitions"][0]["name"], "add");
        assert_eq!(
            json["functionDefinitions"][0]["signature"],
            "(a: number, b: number) => number"
        );
        assert_eq!(json["typeAnnotations"]["obj"], "Obj");
        assert_eq!(json["interfaces"]["Obj"], "{ a: number; b: string }");
    }

    #[test]
    fn test_analyze_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = analyze(
            AnalyzeArgs {
                file: "nope.js".to_string(),
                output: None,
            },
            &dir.path().display().to_string(),
        )
        .unwrap_err();

        assert!(err.to_string().starts_with("Failed to read"));
    }
}
