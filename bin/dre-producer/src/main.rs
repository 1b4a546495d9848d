//! ---
//! dre_section: "03-producer"
//! dre_subsection: "binary"
//! dre_type: "source"
//! dre_scope: "code"
//! dre_description: "Binary entrypoint emitting dice rolls until interrupted."
//! dre_version: "v0.1.0"
//! dre_owner: "tbd"
//! ---
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dre_common::{
    init_tracing, ConfigError, DiceConfig, EnvSource, LogFormat, LoggingConfig, ProcessEnv,
    ProducerConfig,
};
use dre_sim::{RollDriver, RollEmitter, StopReason, TracingSink};
use tokio::signal;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

const SERVICE_NAME: &str = "dre-producer";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogFormat {
    Pretty,
    StructuredJson,
}

impl From<CliLogFormat> for LogFormat {
    fn from(value: CliLogFormat) -> Self {
        match value {
            CliLogFormat::Pretty => LogFormat::Pretty,
            CliLogFormat::StructuredJson => LogFormat::StructuredJson,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Emit simulated dice rolls at a fixed interval",
    long_about = "Emit simulated dice rolls at a fixed interval.\n\n\
                  The interval is read from MESSAGE_INTERVAL_SECONDS (default 3). \
                  A .env file in the working directory (or the file named by \
                  --env-file) is loaded before any other setting is read."
)]
struct Cli {
    /// Number of dice rolled per emission
    #[arg(long, env = "DICE_COUNT", default_value_t = 2)]
    dice: u32,

    /// Number of sides on each die
    #[arg(long, env = "DICE_SIDES", default_value_t = 6)]
    sides: u32,

    /// Random seed for a reproducible roll sequence
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many emissions instead of running until interrupted
    #[arg(long)]
    max_emissions: Option<u64>,

    /// Directory receiving the rolling log file
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Console log layout
    #[arg(long, value_enum, default_value_t = CliLogFormat::Pretty)]
    log_format: CliLogFormat,

    /// Environment file to load instead of ./.env
    #[arg(long, value_name = "FILE")]
    env_file: Option<PathBuf>,
}

impl Cli {
    fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            directory: self.log_dir.clone(),
            format: self.log_format.into(),
            file_prefix: None,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Loaded ahead of clap so DICE_COUNT / DICE_SIDES from the file apply.
    let dotenv_path = load_env_file(env_file_arg(std::env::args_os()).as_deref())?;
    let cli = Cli::parse();
    let _log_guard = init_tracing(SERVICE_NAME, &cli.logging_config())?;
    if let Some(path) = dotenv_path {
        debug!(path = %path.display(), explicit = cli.env_file.is_some(), "loaded environment file");
    }

    info!("START producer...");
    info!("Hit CTRL c (or CMD c) to close.");

    let config = match build_config(&cli, &ProcessEnv) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid producer configuration");
            return Err(err).context("failed to resolve producer configuration");
        }
    };
    debug!(config = %serde_json::to_string(&config)?, "effective configuration");

    let mut emitter = RollEmitter::new(DiceConfig::default(), config.seed)?;
    emitter.set_dice_count(config.dice.dice)?;
    emitter.set_side_count(config.dice.sides)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("interrupt received; stopping producer");
        let _ = shutdown_tx.send(true);
    });

    let mut driver = RollDriver::new(emitter, TracingSink, config.interval)
        .with_max_emissions(config.max_emissions);
    let summary = driver.run(shutdown_rx).await;

    match summary.stop {
        StopReason::Cancelled => info!(emissions = summary.emissions, "producer interrupted"),
        StopReason::LimitReached => info!(emissions = summary.emissions, "emission limit reached"),
        StopReason::Exhausted => warn!(emissions = summary.emissions, "roll source exhausted"),
    }
    info!("NOTE: See the `{}` folder to learn more.", config.logging.directory.display());
    info!("END producer.....");
    Ok(())
}

/// Find `--env-file FILE` or `--env-file=FILE` in raw arguments.
fn env_file_arg<I, T>(args: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into).skip(1);
    while let Some(arg) = args.next() {
        if arg == "--" {
            break;
        }
        if arg == "--env-file" {
            return args.next().map(PathBuf::from);
        }
        if let Some(value) = arg.to_str().and_then(|a| a.strip_prefix("--env-file=")) {
            return Some(PathBuf::from(value));
        }
    }
    None
}

/// Load an explicit environment file, or `./.env` when present. Variables
/// already set in the process take precedence.
fn load_env_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("unable to load environment file {}", path.display()))?;
            Ok(Some(path.to_path_buf()))
        }
        None => Ok(dotenvy::dotenv().ok()),
    }
}

fn build_config<E: EnvSource + ?Sized>(cli: &Cli, env: &E) -> Result<ProducerConfig, ConfigError> {
    let dice = DiceConfig::new(cli.dice, cli.sides)?;
    let mut config = ProducerConfig::from_env(env, dice)?;
    config.seed = cli.seed;
    config.max_emissions = cli.max_emissions;
    config.logging = cli.logging_config();
    Ok(config)
}

async fn shutdown_signal() {
    tokio::select! {
        result = signal::ctrl_c() => {
            if let Err(err) = result {
                warn!(error = %err, "unable to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        },
        _ = terminate() => {},
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            term.recv().await;
        }
        Err(err) => {
            warn!(error = %err, "unable to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use dre_common::{MapEnv, INTERVAL_ENV};
    use std::time::Duration;

    fn base_cli() -> Cli {
        Cli {
            dice: 2,
            sides: 6,
            seed: None,
            max_emissions: None,
            log_dir: PathBuf::from("logs"),
            log_format: CliLogFormat::Pretty,
            env_file: None,
        }
    }

    #[test]
    fn build_config_defaults_interval() {
        let config = build_config(&base_cli(), &MapEnv::new()).unwrap();
        assert_eq!(config.interval, Duration::from_secs(3));
        assert_eq!(config.dice, DiceConfig { dice: 2, sides: 6 });
    }

    #[test]
    fn build_config_carries_cli_overrides() {
        let mut cli = base_cli();
        cli.dice = 4;
        cli.sides = 10;
        cli.seed = Some(9);
        cli.max_emissions = Some(12);
        cli.log_format = CliLogFormat::StructuredJson;
        let env = MapEnv::new().with(INTERVAL_ENV, "7");
        let config = build_config(&cli, &env).unwrap();
        assert_eq!(config.interval, Duration::from_secs(7));
        assert_eq!(config.dice, DiceConfig { dice: 4, sides: 10 });
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.max_emissions, Some(12));
        assert_eq!(config.logging.format, LogFormat::StructuredJson);
    }

    #[test]
    fn build_config_rejects_bad_interval() {
        let env = MapEnv::new().with(INTERVAL_ENV, "abc");
        assert!(matches!(
            build_config(&base_cli(), &env),
            Err(ConfigError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn build_config_rejects_zero_dice() {
        let mut cli = base_cli();
        cli.dice = 0;
        assert!(matches!(
            build_config(&cli, &MapEnv::new()),
            Err(ConfigError::InvalidDiceCount(0))
        ));
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "dre-producer",
            "--dice",
            "3",
            "--sides",
            "20",
            "--max-emissions",
            "5",
            "--log-format",
            "structured-json",
            "--env-file",
            "producer.env",
        ])
        .unwrap();
        assert_eq!(cli.dice, 3);
        assert_eq!(cli.sides, 20);
        assert_eq!(cli.max_emissions, Some(5));
        assert!(matches!(cli.log_format, CliLogFormat::StructuredJson));
        assert_eq!(cli.env_file, Some(PathBuf::from("producer.env")));
    }

    #[test]
    fn env_file_arg_finds_both_spellings() {
        assert_eq!(
            env_file_arg(["dre-producer", "--dice", "3", "--env-file", "a.env"]),
            Some(PathBuf::from("a.env"))
        );
        assert_eq!(
            env_file_arg(["dre-producer", "--env-file=b.env"]),
            Some(PathBuf::from("b.env"))
        );
        assert_eq!(env_file_arg(["dre-producer", "--dice", "3"]), None);
        assert_eq!(env_file_arg(["dre-producer", "--", "--env-file", "c.env"]), None);
    }

    #[test]
    fn load_env_file_reads_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("producer.env");
        std::fs::write(&path, "DRE_ENV_FILE_MARKER=loaded\n").unwrap();
        let loaded = load_env_file(Some(&path)).unwrap();
        assert_eq!(loaded, Some(path));
        assert_eq!(std::env::var("DRE_ENV_FILE_MARKER").unwrap(), "loaded");
    }

    #[test]
    fn load_env_file_rejects_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_file(Some(&dir.path().join("missing.env"))).is_err());
    }
}
