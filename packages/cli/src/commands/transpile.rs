use crate::config::Config;
use crate::driver::{Driver, DriverOptions};
use crate::inputs::resolve_inputs;
use crate::verify::{SyntaxVerifier, Verifier};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use js2ts_common::RealFileSystem;
use js2ts_inference::ReturnAnnotations;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct TranspileArgs {
    /// Input file, directory or glob pattern (e.g. "src/*.js")
    #[arg(short, long)]
    pub input: String,

    /// Output directory for TypeScript files (overrides config)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Emit minimal whitespace
    #[arg(long)]
    pub compact: bool,

    /// Skip re-parsing the emitted TypeScript
    #[arg(long)]
    pub no_verify: bool,

    /// Annotate returns as `number` or `any` only
    #[arg(long)]
    pub narrow_returns: bool,
}

impl TranspileArgs {
    /// Driver options from the config, with flags taking precedence
    fn driver_options(&self, config: &Config, cwd: &str) -> DriverOptions {
        let mut inference = config.inference_options();
        if self.narrow_returns {
            inference.return_annotations = ReturnAnnotations::Narrow;
        }

        DriverOptions {
            out_dir: match &self.output {
                Some(out) => PathBuf::from(cwd).join(out),
                None => config.get_out_dir(cwd),
            },
            compact: self.compact || config.compact,
            inference,
        }
    }

    fn verify(&self, config: &Config) -> bool {
        config.verify && !self.no_verify
    }
}

pub fn transpile(args: TranspileArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let files = resolve_inputs(&args.input, cwd)?;

    println!("{}", "🔨 Transpiling JavaScript files...".bright_blue().bold());
    println!("Found {} files", files.len());

    let fs = RealFileSystem;
    let verifier: Option<&dyn Verifier> = if args.verify(&config) {
        Some(&SyntaxVerifier)
    } else {
        None
    };
    let driver = Driver::new(&fs, verifier, args.driver_options(&config, cwd));
    let reports = driver.run(&files);

    let mut error_count = 0;
    for report in &reports {
        let input = report
            .input
            .strip_prefix(cwd)
            .unwrap_or(report.input.as_path())
            .display();
        match (&report.output, &report.error) {
            (Some(output), None) => {
                println!("  {} {} → {}", "✓".green(), input, output.display());
            }
            (_, error) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    input,
                    error.as_deref().unwrap_or("failed").red()
                );
            }
        }
    }

    println!();
    if error_count > 0 {
        return Err(anyhow!("{} file(s) failed to process", error_count));
    }

    println!(
        "{} Transpiled {} files successfully",
        "✅".green(),
        reports.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CONFIG_NAME;
    use std::fs;

    fn args(input: &str) -> TranspileArgs {
        TranspileArgs {
            input: input.to_string(),
            output: None,
            compact: false,
            no_verify: false,
            narrow_returns: false,
        }
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config {
            out_dir: "build".to_string(),
            verify: true,
            ..Config::default()
        };

        let defaults = args("src").driver_options(&config, "/work");
        assert_eq!(defaults.out_dir, PathBuf::from("/work/build"));
        assert!(!defaults.compact);
        assert_eq!(defaults.inference.return_annotations, ReturnAnnotations::Full);

        let flagged = TranspileArgs {
            output: Some("ts".to_string()),
            compact: true,
            no_verify: true,
            narrow_returns: true,
            ..args("src")
        };
        let options = flagged.driver_options(&config, "/work");
        assert_eq!(options.out_dir, PathBuf::from("/work/ts"));
        assert!(options.compact);
        assert_eq!(options.inference.return_annotations, ReturnAnnotations::Narrow);
        assert!(!flagged.verify(&config));
    }

    #[test]
    fn test_transpile_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(
            dir.path().join("src/file1.js"),
            "let counter = 0;\nconst user = { name: \"Alice\", age: 30, isActive: true };\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("src/file2.js"),
            "const mixedData = [42, \"hello\", false];\nfunction combine(a, b, c) { return `${a} ${b} ${c}`; }\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "compact": true }"#,
        )
        .unwrap();

        transpile(args("src"), &cwd).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("dist/file1.ts")).unwrap(),
            "interface User{name:string;age:number;isActive:boolean;}let counter:number=0;const user:User={name:\"Alice\",age:30,isActive:true};"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("dist/file2.ts")).unwrap(),
            "const mixedData:Array<number|string|boolean>=[42,\"hello\",false];function combine(a:any,b:any,c:any):any{return`${a} ${b} ${c}`;}"
        );
    }

    #[test]
    fn test_transpile_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        fs::write(dir.path().join("broken.js"), "let x = ;").unwrap();

        let err = transpile(args("broken.js"), &cwd).unwrap_err();
        assert_eq!(err.to_string(), "1 file(s) failed to process");
    }
}
