//! Runtime settings: command-line flags with environment fallbacks.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use clap::builder::BoolishValueParser;
use cryptonews_engine::{Classifier, ClassifierConfig, DEFAULT_MODEL_VERSION, HttpRefiner};
use cryptonews_store::DuckStore;
use tracing::info;

#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Model version tag stamped on every record
    #[arg(long, env = "MODEL_VERSION", default_value = DEFAULT_MODEL_VERSION, global = true)]
    pub model_version: String,

    /// DuckDB file for parse runs and feedback
    #[arg(long, env = "DB_PATH", default_value = "data.duckdb", global = true)]
    pub db_path: PathBuf,

    /// Persist parse runs; the env var accepts 1/0, true/false, yes/no, on/off
    #[arg(
        long = "persist",
        env = "ENABLE_PERSISTENCE",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub persist: bool,

    /// Bearer token required on /parse and /feedback
    #[arg(long, env = "API_KEY", global = true)]
    pub api_key: Option<String>,

    /// Listen address for `serve`
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8080", global = true)]
    pub bind: String,

    /// Refinement provider URL; unset disables refinement
    #[arg(long, env = "REFINE_ENDPOINT", global = true)]
    pub refine_endpoint: Option<String>,

    #[arg(long, env = "REFINE_TIMEOUT_MS", default_value_t = 2000, global = true)]
    pub refine_timeout_ms: u64,
}

impl Settings {
    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            model_version: self.model_version.clone(),
            refine_timeout: Duration::from_millis(self.refine_timeout_ms),
            ..ClassifierConfig::default()
        }
    }

    pub fn classifier(&self) -> Classifier {
        let classifier = Classifier::new(self.classifier_config());
        match self.refine_endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => {
                info!(endpoint, "refinement enabled");
                classifier.with_refiner(Arc::new(HttpRefiner::new(endpoint.to_string())))
            }
            _ => classifier,
        }
    }

    pub fn open_store(&self) -> anyhow::Result<DuckStore> {
        DuckStore::open_persistent(&self.db_path)
            .with_context(|| format!("opening store at {}", self.db_path.display()))
    }

    /// The store, when persistence is enabled.
    pub fn optional_store(&self) -> anyhow::Result<Option<DuckStore>> {
        if self.persist {
            self.open_store().map(Some)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, FromArgMatches, Parser};

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        settings: Settings,
    }

    fn parse(args: &[&str]) -> Settings {
        let mut argv = vec!["cryptonews"];
        argv.extend_from_slice(args);
        Harness::try_parse_from(argv).unwrap().settings
    }

    #[test]
    fn flags_reach_classifier_config() {
        let settings = parse(&["--model-version", "test-model", "--refine-timeout-ms", "250"]);
        let config = settings.classifier_config();
        assert_eq!(config.model_version, "test-model");
        assert_eq!(config.refine_timeout, Duration::from_millis(250));
        assert_eq!(config.low_confidence_threshold, 0.65);
    }

    #[test]
    fn persistence_flag_accepts_numeric_env_values() {
        let cmd = || Harness::command().no_binary_name(true);

        // SAFETY: other tests may parse settings concurrently, but none of
        // them asserts on persistence, and both values set here are valid.
        unsafe { std::env::set_var("ENABLE_PERSISTENCE", "1") };
        let enabled = cmd().try_get_matches_from(Vec::<&str>::new());
        unsafe { std::env::set_var("ENABLE_PERSISTENCE", "0") };
        let disabled = cmd().try_get_matches_from(Vec::<&str>::new());
        unsafe { std::env::remove_var("ENABLE_PERSISTENCE") };

        let enabled = Settings::from_arg_matches(&enabled.unwrap()).unwrap();
        let disabled = Settings::from_arg_matches(&disabled.unwrap()).unwrap();
        assert!(enabled.persist);
        assert!(!disabled.persist);
    }

    #[test]
    fn persistence_opens_store_on_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("runs.duckdb");
        let settings = parse(&["--persist", "--db-path", path.to_str().unwrap()]);
        let store = settings.optional_store().unwrap().unwrap();
        assert_eq!(store.parse_run_count().unwrap(), 0);
        assert!(path.exists());
    }
}
