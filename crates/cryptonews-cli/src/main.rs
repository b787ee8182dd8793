mod settings;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use cryptonews_core::{FeedbackSubmission, ParseInput, SourceMeta};
use cryptonews_engine::{load_cases, run_cases};
use cryptonews_server::{AppState, ServerConfig};
use cryptonews_store::{ParseRun, ParseStore};
use serde_json::{Map, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "cryptonews", version)]
#[command(about = "Classify crypto news text into a structured event record")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify one text and print the record as JSON
    Parse {
        /// Text to classify; read from stdin when omitted
        text: Option<String>,

        /// Skip refinement providers that cannot promise repeatable output
        #[arg(long)]
        deterministic: bool,

        /// Caller-supplied id stored with the run
        #[arg(long)]
        input_id: Option<String>,

        #[arg(long)]
        source_url: Option<String>,

        #[arg(long)]
        source_name: Option<String>,
    },
    /// Serve the HTTP API
    Serve,
    /// Record a correction for a stored parse run
    Feedback {
        #[arg(long)]
        parse_id: Option<i64>,

        #[arg(long)]
        input_id: Option<String>,

        /// Corrected fields as a JSON object
        #[arg(long, value_name = "JSON")]
        expected: String,

        #[arg(long)]
        notes: Option<String>,
    },
    /// Export feedback as eval cases (JSONL)
    ExportFeedback {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Run golden cases and report mismatches
    Eval {
        #[arg(value_name = "PATH", default_value = "eval/golden_cases.jsonl")]
        cases: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings;

    match cli.command {
        Command::Parse {
            text,
            deterministic,
            input_id,
            source_url,
            source_name,
        } => {
            let text = match text {
                Some(t) => t,
                None => read_stdin()?,
            };
            let meta = SourceMeta {
                input_id,
                source_url,
                source_name,
                source_published_at: None,
            };
            parse(&settings, &text, deterministic, &meta).await?;
        }
        Command::Serve => serve(&settings).await?,
        Command::Feedback {
            parse_id,
            input_id,
            expected,
            notes,
        } => {
            let expected: Map<String, Value> =
                serde_json::from_str(&expected).context("--expected must be a JSON object")?;
            let submission = FeedbackSubmission {
                parse_id,
                input_id,
                expected,
                notes,
            };
            if !submission.is_correlated() {
                bail!("feedback needs --parse-id or --input-id");
            }
            let store = settings.open_store()?;
            let id = store.store_feedback(&submission)?;
            println!("{id}");
        }
        Command::ExportFeedback { out } => {
            let store = settings.open_store()?;
            let count = export_feedback(&store, out.as_deref())?;
            info!(count, "exported feedback");
        }
        Command::Eval { cases } => {
            let cases = load_cases(&cases)
                .with_context(|| format!("loading cases from {}", cases.display()))?;
            let report = run_cases(&settings.classifier(), &cases)?;
            println!("{report}");
            if !report.all_passed() {
                bail!("{} of {} cases failed", report.total() - report.passed(), report.total());
            }
        }
    }

    Ok(())
}

fn read_stdin() -> anyhow::Result<String> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("reading text from stdin")?;
    Ok(text)
}

async fn parse(
    settings: &Settings,
    text: &str,
    deterministic: bool,
    meta: &SourceMeta,
) -> anyhow::Result<()> {
    let input = ParseInput::new(text, deterministic)?;
    let record = settings.classifier().classify(&input).await;

    if let Some(store) = settings.optional_store()? {
        let run = ParseRun {
            text: input.text(),
            meta,
            record: &record,
        };
        match store.store_parse(run) {
            Ok(id) => info!(parse_id = id, "persisted parse run"),
            Err(e) => warn!(error = %e, "failed to persist parse run"),
        }
    }

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let mut state = AppState::new(settings.classifier()).with_api_key(settings.api_key.clone());
    if let Some(store) = settings.optional_store()? {
        state = state.with_store(Box::new(store));
    }
    if state.api_key.is_none() {
        warn!("no API key configured, /parse and /feedback are open");
    }

    let config = ServerConfig {
        bind: settings.bind.clone(),
    };
    cryptonews_server::serve(&config, state)
        .await
        .with_context(|| format!("serving on {}", config.bind))
}

/// Write one eval case per line. Returns the number written.
fn export_feedback(store: &dyn ParseStore, out: Option<&Path>) -> anyhow::Result<usize> {
    let cases = store.export_feedback()?;
    let mut writer: Box<dyn Write> = match out {
        Some(path) => Box::new(io::BufWriter::new(
            std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    for case in &cases {
        serde_json::to_writer(&mut writer, case)?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(cases.len())
}
