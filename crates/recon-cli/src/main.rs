//! # recon-cli
//!
//! Command-line interface for reconstruction anomaly detection on sector
//! return series.

use clap::{Args, Parser, Subcommand};
use recon::{
    AnomalyPipeline, DenseAutoencoder, ExclusionRange, MovingAverageReconstructor, PipelineConfig,
    Reconstructor, RunLength,
};
use recon_data::{load_sector_returns, LoadOptions};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "recon")]
#[command(about = "Reconstruction-error anomaly detection CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calibrate thresholds and report point anomalies
    Detect {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Histogram bins for validation errors
        #[arg(long, default_value = "50")]
        bins: usize,

        /// Output file for the JSON report (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Calibrate thresholds only and print them as JSON
    Calibrate {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct PipelineArgs {
    /// Input CSV with a date column and one return column per sector
    #[arg(short, long)]
    input: PathBuf,

    /// Name of the date column
    #[arg(long, default_value = "date")]
    date_column: String,

    /// Factor applied to every return
    #[arg(long, default_value = "100.0")]
    scale: f64,

    /// Autoencoder weights (JSON)
    #[arg(short, long, conflicts_with = "moving_average")]
    weights: Option<PathBuf>,

    /// Use the moving-average baseline with this span instead of a trained model
    #[arg(long, value_name = "SPAN")]
    moving_average: Option<usize>,

    /// Pipeline configuration (JSON); flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window length L
    #[arg(long)]
    seq_len: Option<usize>,

    /// Threshold quantile in (0, 1)
    #[arg(short, long)]
    quantile: Option<f64>,

    /// First excluded anchor date (YYYY-MM-DD)
    #[arg(long, requires = "exclude_end")]
    exclude_start: Option<String>,

    /// Last excluded anchor date (YYYY-MM-DD)
    #[arg(long, requires = "exclude_start")]
    exclude_end: Option<String>,

    /// Keep every anchor date
    #[arg(long, conflicts_with_all = ["exclude_start", "exclude_end"])]
    no_exclusion: bool,

    /// Require L flagged samples ending at the index instead of the L - 1 before it
    #[arg(long)]
    full_run_length: bool,

    /// Reconstruct windows in parallel
    #[arg(long)]
    parallel: bool,
}

/// Merge the configuration file (or defaults) with command-line overrides.
fn build_config(args: &PipelineArgs) -> CliResult<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .map_err(|e| format!("Failed to load config {:?}: {}", path, e))?,
        None => PipelineConfig::default(),
    };

    if let Some(seq_len) = args.seq_len {
        config.window.sequence_length = seq_len;
    }
    if let Some(quantile) = args.quantile {
        config.calibration.quantile = quantile;
    }
    if let (Some(start), Some(end)) = (&args.exclude_start, &args.exclude_end) {
        let range = ExclusionRange::parse(start, end).map_err(|e| e.to_string())?;
        config.exclusion = Some(range);
    }
    if args.no_exclusion {
        config.exclusion = None;
    }
    if args.full_run_length {
        config.run_length = RunLength::Full;
    }
    if args.parallel {
        config.parallel = true;
    }

    config.validate().map_err(|e| format!("Invalid configuration: {}", e))?;
    Ok(config)
}

/// Load the reconstruction model named on the command line.
fn build_model(args: &PipelineArgs) -> CliResult<Box<dyn Reconstructor>> {
    match (&args.weights, args.moving_average) {
        (Some(path), _) => {
            let model = DenseAutoencoder::from_json_file(path)
                .map_err(|e| format!("Failed to load weights {:?}: {}", path, e))?;
            Ok(Box::new(model))
        }
        (None, Some(span)) => {
            let model = MovingAverageReconstructor::new(span).map_err(|e| e.to_string())?;
            Ok(Box::new(model))
        }
        (None, None) => Err("Either --weights or --moving-average is required".to_string()),
    }
}

fn build_pipeline(args: &PipelineArgs) -> CliResult<AnomalyPipeline<Box<dyn Reconstructor>>> {
    let config = build_config(args)?;
    let model = build_model(args)?;
    AnomalyPipeline::new(model, config).map_err(|e| e.to_string())
}

fn load_input(args: &PipelineArgs) -> CliResult<recon::Series> {
    let options = LoadOptions::default()
        .with_date_column(args.date_column.clone())
        .with_scale(args.scale);
    load_sector_returns(&args.input, &options)
        .map_err(|e| format!("Failed to load {:?}: {}", args.input, e))
}

/// Write JSON to file or stdout
fn write_json(json: &serde_json::Value, output: Option<&PathBuf>) -> CliResult<()> {
    if let Some(path) = output {
        let mut file = File::create(path).map_err(|e| format!("Failed to create output: {}", e))?;
        serde_json::to_writer_pretty(&mut file, json)
            .map_err(|e| format!("Failed to write JSON: {}", e))?;
        println!("Results written to {:?}", path);
    } else {
        let text = serde_json::to_string_pretty(json)
            .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
        println!("{}", text);
    }
    Ok(())
}

/// Run detect command
fn run_detect(args: PipelineArgs, bins: usize, output: Option<PathBuf>) -> CliResult<()> {
    let pipeline = build_pipeline(&args)?;
    let series = load_input(&args)?;
    let report = pipeline.run(&series).map_err(|e| e.to_string())?;

    eprintln!("Model: {}", report.model);
    eprintln!("Rows: {} x {} sectors", series.len(), series.sector_count());
    for dataset in [&report.in_sample, &report.out_of_sample] {
        eprintln!(
            "{}: {} samples, {} flagged, {} point anomalies",
            dataset.label,
            dataset.sample_count(),
            dataset.anomalous_samples(),
            dataset.points.count()
        );
    }

    let json = serde_json::to_value(report.summary(bins))
        .map_err(|e| format!("Failed to serialize report: {}", e))?;
    write_json(&json, output.as_ref())
}

/// Run calibrate command
fn run_calibrate(args: PipelineArgs, output: Option<PathBuf>) -> CliResult<()> {
    let pipeline = build_pipeline(&args)?;
    let series = load_input(&args)?;
    let calibration = pipeline.calibrate(&series).map_err(|e| e.to_string())?;

    let json = serde_json::json!({
        "model": pipeline.model().name(),
        "validation_samples": calibration.errors.sample_count(),
        "thresholds": calibration.thresholds,
    });
    write_json(&json, output.as_ref())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recon=info,recon_core=info".into()),
        )
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Detect {
            pipeline,
            bins,
            output,
        } => run_detect(pipeline, bins, output),

        Commands::Calibrate { pipeline, output } => run_calibrate(pipeline, output),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args() -> PipelineArgs {
        PipelineArgs {
            input: PathBuf::from("returns.csv"),
            date_column: "date".to_string(),
            scale: 100.0,
            moving_average: Some(5),
            ..PipelineArgs::default()
        }
    }

    #[test]
    fn test_cli_parses_detect() {
        let cli = Cli::try_parse_from([
            "recon",
            "detect",
            "--input",
            "returns.csv",
            "--moving-average",
            "3",
            "--seq-len",
            "10",
            "--full-run-length",
        ])
        .unwrap();
        match cli.command {
            Commands::Detect { pipeline, bins, .. } => {
                assert_eq!(pipeline.moving_average, Some(3));
                assert_eq!(pipeline.seq_len, Some(10));
                assert!(pipeline.full_run_length);
                assert_eq!(bins, 50);
            }
            _ => panic!("expected detect"),
        }
    }

    #[test]
    fn test_cli_rejects_conflicting_models() {
        assert!(Cli::try_parse_from([
            "recon",
            "calibrate",
            "--input",
            "r.csv",
            "--weights",
            "w.json",
            "--moving-average",
            "3",
        ])
        .is_err());
    }

    #[test]
    fn test_defaults_match_pipeline_config() {
        assert_eq!(build_config(&args()).unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"window": {{"sequence_length": 30}}, "calibration": {{"quantile": 0.9}}}}"#)
            .unwrap();

        let mut a = args();
        a.config = Some(file.path().to_path_buf());
        a.quantile = Some(0.99);
        a.exclude_start = Some("2020-03-01".to_string());
        a.exclude_end = Some("2020-06-30".to_string());
        a.parallel = true;

        let config = build_config(&a).unwrap();
        assert_eq!(config.window.sequence_length, 30);
        assert_eq!(config.calibration.quantile, 0.99);
        assert_eq!(
            config.exclusion,
            Some(ExclusionRange::parse("2020-03-01", "2020-06-30").unwrap())
        );
        assert!(config.parallel);
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        let mut a = args();
        a.quantile = Some(1.5);
        assert!(build_config(&a).is_err());

        let mut a = args();
        a.exclude_start = Some("2020-13-01".to_string());
        a.exclude_end = Some("2020-06-30".to_string());
        assert!(build_config(&a).is_err());
    }

    #[test]
    fn test_model_selection() {
        assert_eq!(build_model(&args()).unwrap().name(), "moving-average");

        let mut a = args();
        a.moving_average = None;
        assert!(build_model(&a).is_err());

        a.weights = Some(PathBuf::from("/nonexistent/weights.json"));
        let error = build_model(&a).err().unwrap();
        assert!(error.contains("Failed to load weights"));
    }
}
