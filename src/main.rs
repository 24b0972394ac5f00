//! ART Insight: adherence assessment for one patient record.
//!
//! ```bash
//! art-insight [--json] [PATIENT_JSON | -]
//! ```
//!
//! Reads the record from the given file, or stdin when the path is `-` or
//! omitted, and prints the report to stdout. Logs go to stderr or a file.
//! With `--json`, empty findings lists carry the same placeholder line as
//! the Markdown output.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use art_insight::adapters::artifacts::load_artifacts;
use art_insight::adapters::intake::read_patient_record;
use art_insight::adapters::sanitize::SanitizingMakeWriter;
use art_insight::config::{LogMode, Settings};
use art_insight::InsightService;

struct Args {
    json: bool,
    input: Option<PathBuf>,
}

fn usage() -> &'static str {
    "Usage: art-insight [--json] [PATIENT_JSON | -]"
}

fn parse_args() -> Result<Args> {
    let mut json = false;
    let mut input: Option<PathBuf> = None;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "-h" | "--help" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            "-" => input = None,
            other if other.starts_with("--") => bail!("unknown option {other}\n{}", usage()),
            _ if input.is_some() => bail!("more than one input path\n{}", usage()),
            _ => input = Some(PathBuf::from(arg)),
        }
    }
    Ok(Args { json, input })
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let settings = Settings::from_env();

    let (writer, _guard) = match settings.log_mode {
        LogMode::File => {
            if let Some(parent) = settings.log_file.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("creating log directory {}", parent.display())
                    })?;
                }
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&settings.log_file)
                .with_context(|| format!("opening log file {}", settings.log_file.display()))?;
            tracing_appender::non_blocking(file)
        }
        LogMode::Stderr => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(SanitizingMakeWriter::new(writer)),
        )
        .init();

    let artifacts = load_artifacts(&settings.artifact_dir, settings.require_manifest)
        .with_context(|| {
            format!(
                "loading artifacts from {}",
                settings.artifact_dir.display()
            )
        })?;
    let service = InsightService::new(artifacts).context("artifacts are inconsistent")?;
    tracing::info!(
        n_features = service.schema().len(),
        thresholds = ?service.thresholds(),
        "Ready to assess"
    );

    let raw = match &args.input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            read_patient_record(file)
        }
        None => read_patient_record(std::io::stdin().lock()),
    }
    .context("reading patient record")?;

    let report = service.assess(&raw).context("assessing patient record")?;

    let rendered = if args.json {
        serde_json::to_string_pretty(&report)?
    } else {
        report.to_markdown()
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    stdout.flush()?;
    Ok(())
}
