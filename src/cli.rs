//! CLI argument parsing for perflogic

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for evaluation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text report (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

/// Built-in confidence presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// 95% confidence, 5% equality interval
    Default,
    /// 99% confidence, 2% equality interval
    Strict,
    /// 90% confidence, 10% equality interval
    Lenient,
}

#[derive(Parser, Debug)]
#[command(name = "perflogic")]
#[command(version)]
#[command(about = "Statistically backed performance formulas over measured samples", long_about = None)]
pub struct Cli {
    /// Enable debug tracing output to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate annotated formulas against a sample directory
    Evaluate(EvaluateArgs),
    /// Show the header and summary of one sample file
    Inspect(InspectArgs),
    /// Copy a sample file into a sample directory under a measurement identity
    Import(ImportArgs),
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Sample directory
    #[arg(long, value_name = "DIR")]
    pub samples: PathBuf,

    /// JSON array of annotations with their formulas
    #[arg(long, value_name = "FILE")]
    pub formulas: PathBuf,

    /// Evaluator configuration (TOML)
    #[arg(long, value_name = "FILE", conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Confidence preset used when no config file is given
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Worker threads (overrides the config file)
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Sample file to read
    pub file: PathBuf,

    /// Multiply every sample by this factor
    #[arg(long, default_value = "1.0")]
    pub scale: f64,

    /// Sigma-clip with this multiplier before summarizing
    #[arg(long, value_name = "K", conflicts_with = "quantile")]
    pub sigma: Option<f64>,

    /// Maximum sigma-clip rounds
    #[arg(long, default_value = "10")]
    pub max_iterations: usize,

    /// Quantile-clip to [LOW, HIGH] percentiles before summarizing
    #[arg(long, num_args = 2, value_names = ["LOW", "HIGH"])]
    pub quantile: Option<Vec<f64>>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Sample directory
    #[arg(long, value_name = "DIR")]
    pub samples: PathBuf,

    #[arg(long)]
    pub method: String,

    #[arg(long)]
    pub generator: String,

    #[arg(long)]
    pub machine: String,

    /// Sample file to import
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_evaluate() {
        let cli = Cli::parse_from([
            "perflogic",
            "evaluate",
            "--samples",
            "data",
            "--formulas",
            "formulas.json",
        ]);
        assert!(!cli.debug);
        match cli.command {
            Command::Evaluate(args) => {
                assert_eq!(args.samples, PathBuf::from("data"));
                assert_eq!(args.format, OutputFormat::Text);
                assert!(args.config.is_none());
                assert!(args.jobs.is_none());
            }
            other => panic!("Expected evaluate, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_evaluate_options() {
        let cli = Cli::parse_from([
            "perflogic",
            "--debug",
            "evaluate",
            "--samples",
            "data",
            "--formulas",
            "f.json",
            "--format",
            "json",
            "-j",
            "4",
            "--preset",
            "lenient",
        ]);
        assert!(cli.debug);
        match cli.command {
            Command::Evaluate(args) => {
                assert_eq!(args.format, OutputFormat::Json);
                assert_eq!(args.jobs, Some(4));
                assert_eq!(args.preset, Some(Preset::Lenient));
            }
            other => panic!("Expected evaluate, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_config_conflicts_with_preset() {
        let result = Cli::try_parse_from([
            "perflogic",
            "evaluate",
            "--samples",
            "d",
            "--formulas",
            "f.json",
            "--config",
            "c.toml",
            "--preset",
            "strict",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_inspect_quantile() {
        let cli = Cli::parse_from([
            "perflogic",
            "inspect",
            "a.samples",
            "--quantile",
            "5",
            "95",
        ]);
        match cli.command {
            Command::Inspect(args) => {
                assert_eq!(args.quantile, Some(vec![5.0, 95.0]));
                assert_eq!(args.scale, 1.0);
                assert!(args.sigma.is_none());
            }
            other => panic!("Expected inspect, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_inspect_sigma_conflicts_with_quantile() {
        let result = Cli::try_parse_from([
            "perflogic",
            "inspect",
            "a.samples",
            "--sigma",
            "3",
            "--quantile",
            "5",
            "95",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["perflogic"]).is_err());
    }
}
