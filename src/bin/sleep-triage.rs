//! Sleep Triage CLI - Command-line interface for the sleep-disorder classifier
//!
//! Commands:
//! - predict: Classify one set of feature values given as flags
//! - batch: Classify newline-delimited JSON requests (batch mode)
//! - tree: Print the decision tree as an outline or Graphviz DOT

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use sleep_triage::diagram::{render_dot, render_text};
use sleep_triage::input::{features_from_value, parse_feature_value};
use sleep_triage::types::{Assessment, Feature, FeatureSet};
use sleep_triage::{ComputeError, SleepClassifier, TRIAGE_VERSION};

/// Sleep Triage - Fixed decision-tree screening for sleep disorders
#[derive(Parser)]
#[command(name = "sleep-triage")]
#[command(author = "Synheart AI Inc")]
#[command(version = TRIAGE_VERSION)]
#[command(about = "Classify likely sleep disorders from daily signals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one set of feature values
    Predict {
        /// Sleep duration (hours)
        #[arg(long, allow_negative_numbers = true)]
        sleep_duration: String,

        /// Heart rate (bpm)
        #[arg(long, allow_negative_numbers = true)]
        heart_rate: String,

        /// Daily step count
        #[arg(long, allow_negative_numbers = true)]
        daily_steps: String,

        /// Body mass index
        #[arg(long, allow_negative_numbers = true)]
        bmi: String,

        /// Output format
        #[arg(long, default_value = "text")]
        format: ReportFormat,
    },

    /// Classify newline-delimited JSON requests (batch mode)
    Batch {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Report invalid lines on stderr and continue instead of failing
        #[arg(long)]
        skip_invalid: bool,
    },

    /// Print the decision tree
    Tree {
        /// Emit Graphviz DOT source instead of an outline
        #[arg(long)]
        dot: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum ReportFormat {
    /// Human-readable report
    Text,
    /// Compact JSON assessment
    Json,
    /// Pretty-printed JSON assessment
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one assessment per line)
    Ndjson,
    /// JSON array of assessments
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let report = CliError::from(e);
            eprintln!(
                "{}",
                serde_json::to_string(&report).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), TriageCliError> {
    match cli.command {
        Commands::Predict {
            sleep_duration,
            heart_rate,
            daily_steps,
            bmi,
            format,
        } => {
            let features = FeatureSet::from_values(
                parse_feature_value(Feature::SleepDuration, &sleep_duration)?,
                parse_feature_value(Feature::HeartRate, &heart_rate)?,
                parse_feature_value(Feature::DailySteps, &daily_steps)?,
                parse_feature_value(Feature::Bmi, &bmi)?,
            );
            cmd_predict(&features, format)
        }

        Commands::Batch {
            input,
            output,
            output_format,
            skip_invalid,
        } => cmd_batch(&input, &output, output_format, skip_invalid),

        Commands::Tree { dot } => cmd_tree(dot),
    }
}

fn cmd_predict(features: &FeatureSet, format: ReportFormat) -> Result<(), TriageCliError> {
    let classifier = SleepClassifier::new();
    let assessment = classifier.assess(features)?;

    match format {
        ReportFormat::Text => print!("{}", format_report(&assessment)),
        ReportFormat::Json => println!("{}", serde_json::to_string(&assessment)?),
        ReportFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(&assessment)?),
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    output_format: OutputFormat,
    skip_invalid: bool,
) -> Result<(), TriageCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            eprintln!("Reading NDJSON requests from stdin (Ctrl-D to finish)");
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let assessments = classify_lines(&input_data, skip_invalid)?;

    let output_data = format_output(&assessments, &output_format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_tree(dot: bool) -> Result<(), TriageCliError> {
    let classifier = SleepClassifier::new();

    if dot {
        print!("{}", render_dot(classifier.tree()));
    } else {
        print!("{}", render_text(classifier.tree()));
    }

    Ok(())
}

// Helper functions

/// Classify every non-blank NDJSON line. With `skip_invalid`, failed lines are
/// reported on stderr and dropped; a batch with nothing left is an error.
fn classify_lines(
    input_data: &str,
    skip_invalid: bool,
) -> Result<Vec<Assessment>, TriageCliError> {
    let classifier = SleepClassifier::new();
    let mut assessments: Vec<Assessment> = Vec::new();
    let mut total = 0usize;

    for (index, line) in input_data.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        total += 1;

        let result = serde_json::from_str::<serde_json::Value>(line)
            .map_err(ComputeError::from)
            .and_then(|value| features_from_value(&value))
            .and_then(|features| classifier.assess(&features));

        match result {
            Ok(assessment) => assessments.push(assessment),
            Err(e) if skip_invalid => {
                let detail = LineErrorDetail {
                    line: index + 1,
                    error: e.to_string(),
                };
                eprintln!("{}", serde_json::to_string(&detail)?);
            }
            Err(e) => return Err(TriageCliError::Line(index + 1, e)),
        }
    }

    if total == 0 {
        return Err(TriageCliError::NoRequests);
    }
    if assessments.is_empty() {
        return Err(TriageCliError::NoValidRequests(total));
    }

    Ok(assessments)
}

fn format_report(assessment: &Assessment) -> String {
    let rule = "=".repeat(50);
    let mut out = String::new();

    out.push_str("INPUT FEATURES:\n");
    out.push_str(&rule);
    out.push('\n');
    for feature in Feature::ALL {
        if let Some(value) = assessment.features.get(feature) {
            out.push_str(&format!("{}: {}\n", feature.display_name(), value));
        }
    }

    out.push_str("\nDECISION PATH:\n");
    out.push_str(&rule);
    out.push('\n');
    for (i, step) in assessment.path.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, step));
    }

    out.push_str(&format!("\nRESULT: {}\n", assessment.label));
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("\n{}\n", assessment.recommendation));
    out
}

fn format_output(
    assessments: &[Assessment],
    format: &OutputFormat,
) -> Result<String, TriageCliError> {
    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for assessment in assessments {
                lines.push(serde_json::to_string(assessment)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(assessments)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(assessments)?),
    }
}

// Error types

#[derive(Debug)]
enum TriageCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    Line(usize, ComputeError),
    NoRequests,
    NoValidRequests(usize),
}

impl From<io::Error> for TriageCliError {
    fn from(e: io::Error) -> Self {
        TriageCliError::Io(e)
    }
}

impl From<ComputeError> for TriageCliError {
    fn from(e: ComputeError) -> Self {
        TriageCliError::Compute(e)
    }
}

impl From<serde_json::Error> for TriageCliError {
    fn from(e: serde_json::Error) -> Self {
        TriageCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<TriageCliError> for CliError {
    fn from(e: TriageCliError) -> Self {
        match e {
            TriageCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            TriageCliError::Compute(e) => compute_error(e, None),
            TriageCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            TriageCliError::Line(line, e) => compute_error(e, Some(line)),
            TriageCliError::NoRequests => CliError {
                code: "NO_REQUESTS".to_string(),
                message: "No requests found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            TriageCliError::NoValidRequests(count) => CliError {
                code: "NO_VALID_REQUESTS".to_string(),
                message: format!("All {} requests failed", count),
                hint: Some("Review the per-line errors reported on stderr".to_string()),
            },
        }
    }
}

fn compute_error(e: ComputeError, line: Option<usize>) -> CliError {
    let (code, hint) = match &e {
        ComputeError::MissingFeature(_) => (
            "MISSING_FEATURE",
            "Provide sleep_duration, heart_rate, daily_steps and bmi",
        ),
        ComputeError::InvalidFeature { .. } => ("INVALID_INPUT", "Values must not be negative"),
        ComputeError::UnknownFeature(_) => (
            "UNKNOWN_FEATURE",
            "Valid keys: sleep_duration, heart_rate, daily_steps, bmi",
        ),
        ComputeError::ParseError(_) => ("PARSE_ERROR", "Values must be numbers"),
        ComputeError::JsonError(_) => ("JSON_ERROR", "Check JSON syntax"),
    };

    let message = match line {
        Some(line) => format!("line {}: {}", line, e),
        None => e.to_string(),
    };

    CliError {
        code: code.to_string(),
        message,
        hint: Some(hint.to_string()),
    }
}

#[derive(serde::Serialize)]
struct LineErrorDetail {
    line: usize,
    error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sleep_triage::types::Label;

    fn predict_args(heart_rate: &str) -> Vec<&str> {
        vec![
            "sleep-triage",
            "predict",
            "--sleep-duration",
            "6",
            "--heart-rate",
            heart_rate,
            "--daily-steps",
            "4000",
            "--bmi",
            "22",
        ]
    }

    #[test]
    fn test_predict_accepts_negative_flag_value() {
        let cli = Cli::try_parse_from(predict_args("-1")).unwrap();

        match run(cli) {
            Err(TriageCliError::Compute(ComputeError::InvalidFeature { feature, value })) => {
                assert_eq!(feature, Feature::HeartRate);
                assert_eq!(value, -1.0);
            }
            other => panic!("expected InvalidFeature, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_value_reports_invalid_input() {
        let cli = Cli::try_parse_from(predict_args("-1")).unwrap();
        let report = CliError::from(run(cli).unwrap_err());

        assert_eq!(report.code, "INVALID_INPUT");
    }

    #[test]
    fn test_batch_classifies_lines() {
        let input = concat!(
            r#"{"sleep_duration": 6.0, "heart_rate": 70, "daily_steps": 4000, "bmi": 22}"#,
            "\n\n",
            r#"{"sleep_duration": 8.0, "heart_rate": 85, "daily_steps": 6000, "bmi": 30}"#,
            "\n",
        );

        let assessments = classify_lines(input, false).unwrap();
        let labels: Vec<Label> = assessments.iter().map(|a| a.label).collect();

        assert_eq!(labels, vec![Label::SleepApnea, Label::Insomnia]);
    }

    #[test]
    fn test_batch_fails_on_invalid_line() {
        let input = concat!(
            r#"{"sleep_duration": 6.0, "heart_rate": 70, "daily_steps": 4000, "bmi": 22}"#,
            "\n",
            r#"{"sleep_duration": 8.0}"#,
            "\n",
        );

        assert!(matches!(
            classify_lines(input, false),
            Err(TriageCliError::Line(2, ComputeError::MissingFeature(Feature::DailySteps)))
        ));
    }

    #[test]
    fn test_batch_with_every_line_skipped_is_an_error() {
        let input = "not json\n{\"bmi\": -3}\n";

        assert!(matches!(
            classify_lines(input, true),
            Err(TriageCliError::NoValidRequests(2))
        ));
    }

    #[test]
    fn test_batch_empty_input() {
        assert!(matches!(
            classify_lines("\n  \n", true),
            Err(TriageCliError::NoRequests)
        ));
    }
}
