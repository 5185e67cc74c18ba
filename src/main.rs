use anyhow::{Context, Result};
use clap::Parser;
use perflogic::cli::{Cli, Command, EvaluateArgs, ImportArgs, InspectArgs, OutputFormat, Preset};
use perflogic::config::{ClipMode, EvaluatorConfig};
use perflogic::evaluator::Evaluator;
use perflogic::formula::{Annotation, Measurement};
use perflogic::json_output::JsonReport;
use perflogic::logic::StatisticalResult;
use perflogic::report;
use perflogic::sample::DirectorySampleStore;
use perflogic::sample_file::{SampleFileReader, UNKNOWN};
use perflogic::sink::TracingSink;
use perflogic::statistics::SampleSummary;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; warnings by default, everything with --debug
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &EvaluateArgs) -> Result<EvaluatorConfig> {
    let mut config = match (&args.config, args.preset) {
        (Some(path), _) => EvaluatorConfig::from_file(path)?,
        (None, Some(Preset::Strict)) => EvaluatorConfig::strict(),
        (None, Some(Preset::Lenient)) => EvaluatorConfig::lenient(),
        (None, Some(Preset::Default)) | (None, None) => EvaluatorConfig::default(),
    };
    if let Some(jobs) = args.jobs {
        config.parallelism = jobs;
    }
    Ok(config)
}

fn load_annotations(path: &Path) -> Result<Vec<Annotation>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid formulas file {}", path.display()))
}

fn run_evaluate(args: &EvaluateArgs) -> Result<ExitCode> {
    let config = load_config(args)?;
    let annotations = load_annotations(&args.formulas)?;
    let store = Arc::new(DirectorySampleStore::new(&args.samples));

    let evaluator = Evaluator::new(config, store)?;
    let results = evaluator.run(&annotations, &mut TracingSink)?;

    match args.format {
        OutputFormat::Text => print!("{}", report::to_run_report_string(&results)),
        OutputFormat::Json => println!("{}", JsonReport::from_results(&results).to_json()?),
    }

    let any_false = results
        .iter()
        .any(|annotation| annotation.count(StatisticalResult::False) > 0);
    Ok(if any_false {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

fn format_count(count: i64) -> String {
    if count == UNKNOWN {
        "unknown".to_string()
    } else {
        count.to_string()
    }
}

fn print_summary(title: &str, summary: &SampleSummary) {
    println!("{}:", title);
    println!("  count:  {}", summary.count);
    println!("  mean:   {:.6}", summary.mean);
    println!("  median: {:.6}", summary.median);
    println!("  sd:     {:.6}", summary.std_dev);
    println!("  min:    {:.6}", summary.min);
    println!("  max:    {:.6}", summary.max);
    println!("  cv:     {:.4}", summary.coefficient_of_variation());
}

fn run_inspect(args: &InspectArgs) -> Result<()> {
    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let mut reader = SampleFileReader::new(BufReader::new(file))
        .with_context(|| format!("Invalid sample file {}", args.file.display()))?;
    let samples = reader
        .read_all(args.scale)
        .with_context(|| format!("Invalid sample file {}", args.file.display()))?;
    let properties = reader.properties().clone();

    println!("Identification: {}", reader.identification());
    println!("Date: {}", properties.date.as_deref().unwrap_or("unknown"));
    println!("Declared samples: {}", format_count(properties.sample_count));
    println!("Declared warm-up: {}", format_count(properties.warmup_count));
    for (key, value) in &properties.extra {
        println!("{}: {}", key, value);
    }
    println!();

    print_summary("Samples", &SampleSummary::compute(&samples, &properties));

    let clip = match (args.sigma, args.quantile.as_deref()) {
        (Some(multiplier), _) => Some(ClipMode::Sigma {
            multiplier,
            max_iterations: args.max_iterations,
        }),
        (None, Some([lower, upper])) => Some(ClipMode::Quantile {
            lower: *lower,
            upper: *upper,
        }),
        (None, Some(_)) => anyhow::bail!("--quantile takes exactly two values"),
        (None, None) => None,
    };
    if let Some(clip) = clip {
        let clipped = clip.apply(&samples);
        println!();
        print_summary(
            &format!("Clipped ({} removed)", samples.len() - clipped.len()),
            &SampleSummary::compute(&clipped, &properties),
        );
    }

    Ok(())
}

fn run_import(args: &ImportArgs) -> Result<()> {
    // Reject files the evaluator could not read later
    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let count = SampleFileReader::new(BufReader::new(file))
        .and_then(|mut reader| reader.read_all(1.0))
        .with_context(|| format!("Invalid sample file {}", args.file.display()))?
        .len();

    let measurement = Measurement::new(&args.method, &args.generator, &args.machine);
    let store = DirectorySampleStore::new(&args.samples);
    let path = store
        .import_file(&measurement, &args.file)
        .with_context(|| format!("Failed to import into {}", args.samples.display()))?;

    println!("Imported {} samples for {} -> {}", count, measurement, path.display());
    Ok(())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_tracing(cli.debug);

    match &cli.command {
        Command::Evaluate(args) => run_evaluate(args),
        Command::Inspect(args) => run_inspect(args).map(|()| ExitCode::SUCCESS),
        Command::Import(args) => run_import(args).map(|()| ExitCode::SUCCESS),
    }
}
