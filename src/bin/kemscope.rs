//! kemscope command-line harness
//!
//! Runs the timing analyzer against one parameter set with countermeasures
//! enabled, disabled, or both, and writes one report directory per setting.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use kemscope::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Hardened run followed by an unhardened run, then a comparison
    Both,
    Hardened,
    Unhardened,
}

impl Mode {
    fn settings(self) -> &'static [Countermeasures] {
        match self {
            Mode::Both => &Countermeasures::ALL,
            Mode::Hardened => &[Countermeasures::Enabled],
            Mode::Unhardened => &[Countermeasures::Disabled],
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Parameter set identifier (ML-KEM-512, ML-KEM-768, ML-KEM-1024)
    #[arg(long, default_value = "ML-KEM-512")]
    param_set: String,

    /// Trials per run; overrides the configuration file
    #[arg(long)]
    samples: Option<usize>,

    /// Which countermeasure settings to analyze
    #[arg(long, value_enum, default_value_t = Mode::Both)]
    mode: Mode,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Untimed trials before measurement starts
    #[arg(long)]
    warmup: Option<usize>,

    /// Analyzer configuration in TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory receiving one sub-directory per setting
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Also write report.json
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<AnalyzerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            AnalyzerConfig::from_toml_str(&source)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => AnalyzerConfig::default(),
    };

    if let Some(samples) = args.samples {
        config = config.with_samples(samples);
    }
    if let Some(warmup) = args.warmup {
        config = config.with_warmup(warmup);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    config.validate().context("invalid analyzer configuration")?;
    Ok(config)
}

fn write_report(dir: &Path, report: &AnalysisReport, json: bool) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let text_path = dir.join("report.txt");
    fs::write(&text_path, render_text(report))
        .with_context(|| format!("writing {}", text_path.display()))?;
    info!("Wrote {}", text_path.display());

    if json {
        let json_path = dir.join("report.json");
        let body = report.to_json().context("serializing report")?;
        fs::write(&json_path, body).with_context(|| format!("writing {}", json_path.display()))?;
        info!("Wrote {}", json_path.display());
    }
    Ok(())
}

fn analyze(
    params: &'static ParameterSet,
    countermeasures: Countermeasures,
    config: &AnalyzerConfig,
    stop: &Arc<AtomicBool>,
) -> Result<AnalysisReport> {
    let mut kem = match config.seed {
        Some(seed) => KemCore::with_seed(params, countermeasures, seed),
        None => KemCore::new(params, countermeasures),
    };
    let mut analyzer = TimingAnalyzer::new(config.clone())?.with_stop_flag(Arc::clone(stop));

    info!(
        "Analyzing {} {} ({} trials)",
        params.name, countermeasures, config.num_samples
    );
    Ok(analyzer.run(&mut kem))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let params = ParameterSet::by_name(&args.param_set).with_context(|| {
        format!(
            "choose one of: {}",
            ParameterSet::names().collect::<Vec<_>>().join(", ")
        )
    })?;

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed))
            .context("installing Ctrl-C handler")?;
    }

    let mut hardened = None;
    let mut unhardened = None;

    for &countermeasures in args.mode.settings() {
        if stop.load(Ordering::Relaxed) {
            warn!("Interrupted, skipping {} run", countermeasures);
            break;
        }

        let report = analyze(params, countermeasures, &config, &stop)?;
        if report.is_partial() {
            warn!(
                "{} run stopped after {} of {} trials",
                countermeasures, report.completed_trials, report.requested_trials
            );
        }
        info!("{}: {}", countermeasures, report.verdict.summary());

        write_report(&args.output.join(countermeasures.label()), &report, args.json)?;

        match countermeasures {
            Countermeasures::Enabled => hardened = Some(report),
            Countermeasures::Disabled => unhardened = Some(report),
        }
    }

    if let (Some(hardened), Some(unhardened)) = (&hardened, &unhardened) {
        let comparison = compare_runs(hardened, unhardened);
        for line in render_comparison(&comparison, config.verdict.low_cv_percent).lines() {
            info!("{}", line);
        }
    }

    Ok(())
}
