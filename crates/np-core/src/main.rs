//! Nagios Probe Core CLI
//!
//! Runs one configured Nagios check against a target and prints the
//! resulting metrics in the Prometheus text exposition format:
//! - `probe`: run a module and print its metrics
//! - `check-config`: load and validate the configuration
//! - `version`: print version information

use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use np_config::validate::validate_prober_config;
use np_config::{resolve_config, ConfigSource, ProberConfig, ProberKind, ValidationError};
use np_core::exit_codes::ExitCode;
use np_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use np_core::probe::{render, BinaryResolver, Deadline, NagiosProber, ProbeRequest};
use np_siteacc::{CredentialSource, SiteAccountsClient};
use prometheus::{Gauge, Registry};
use tracing::{debug, error, info};

/// Nagios Probe Core - run Nagios plugins as Prometheus probes
#[derive(Parser)]
#[command(name = "np-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to prober.yml (overrides NP_CONFIG and the default locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human or json)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a module against a target and print its metrics
    Probe(ProbeArgs),

    /// Load and validate the configuration
    CheckConfig,

    /// Print version information
    Version {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct ProbeArgs {
    /// Module name from the configuration
    #[arg(long)]
    module: String,

    /// Probe target
    #[arg(long)]
    target: String,

    /// Request parameter (repeatable), e.g. --param site=CERN
    #[arg(long = "param", value_parser = parse_key_val)]
    params: Vec<(String, String)>,

    /// Override the module timeout
    #[arg(long)]
    timeout_ms: Option<u64>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("invalid parameter '{s}': expected key=value"))
}

fn main() {
    let cli = Cli::parse();

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let exit_code = match &cli.command {
        Commands::Probe(args) => run_probe(&cli.global, args),
        Commands::CheckConfig => run_check_config(&cli.global),
        Commands::Version { json } => {
            print_version(*json);
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.as_i32());
}

/// Load the configuration from the resolved location.
///
/// No file anywhere yields an empty configuration; an explicit `--config`
/// that does not exist is an error.
fn load_config(global: &GlobalOpts) -> Result<(ProberConfig, ConfigSource), ValidationError> {
    if let Some(path) = &global.config {
        if !path.exists() {
            return Err(ValidationError::IoError(format!(
                "config file not found: {}",
                path.display()
            )));
        }
    }

    let paths = resolve_config(global.config.as_deref());
    let config = match &paths.prober {
        Some(path) => {
            debug!(path = %path.display(), source = %paths.prober_source, "loading configuration");
            ProberConfig::from_file(path)?
        }
        None => ProberConfig::default(),
    };
    validate_prober_config(&config)?;
    Ok((config, paths.prober_source))
}

fn run_probe(global: &GlobalOpts, args: &ProbeArgs) -> ExitCode {
    let config = match load_config(global) {
        Ok((config, _)) => config,
        Err(e) => {
            error!(code = e.code(), error = %e, "invalid configuration");
            return fail(ExitCode::ConfigError, e);
        }
    };

    let Some(module) = config.module(&args.module) else {
        return fail(
            ExitCode::ArgsError,
            format!(
                "unknown module '{}' (available: {})",
                args.module,
                config.module_names().join(", ")
            ),
        );
    };
    if module.prober != ProberKind::Nagios {
        return fail(
            ExitCode::ArgsError,
            format!(
                "module '{}' uses prober '{}', only nagios modules can be run",
                args.module, module.prober
            ),
        );
    }

    let credentials = config
        .site_accounts
        .as_ref()
        .filter(|c| c.is_configured())
        .map(|c| Arc::new(SiteAccountsClient::new(c.clone())) as Arc<dyn CredentialSource>);
    let prober = NagiosProber::new(BinaryResolver::from_env(), credentials);

    let timeout = Duration::from_millis(args.timeout_ms.unwrap_or_else(|| module.timeout_ms()));
    let mut request = ProbeRequest::new(&args.target);
    request.params = args.params.clone();

    let registry = Registry::new();
    let started = Instant::now();
    let success = match prober.probe(&request, &module.nagios, &registry, Deadline::after(timeout)) {
        Ok(success) => success,
        Err(e) => {
            error!(error = %e, "failed to publish probe result");
            return fail(ExitCode::InternalError, e);
        }
    };

    if let Err(e) = publish_probe_status(&registry, success, started.elapsed()) {
        return fail(ExitCode::InternalError, e);
    }

    match render(&registry) {
        Ok(text) => print!("{text}"),
        Err(e) => return fail(ExitCode::InternalError, e),
    }

    info!(module = %args.module, target = %args.target, success, "probe finished");
    if success {
        ExitCode::Success
    } else {
        ExitCode::ProbeFailed
    }
}

/// Add the exporter-level `probe_success` and `probe_duration_seconds` gauges.
fn publish_probe_status(
    registry: &Registry,
    success: bool,
    duration: Duration,
) -> Result<(), prometheus::Error> {
    let probe_success = Gauge::new("probe_success", "Displays whether or not the probe was a success")?;
    registry.register(Box::new(probe_success.clone()))?;
    probe_success.set(if success { 1.0 } else { 0.0 });

    let probe_duration = Gauge::new(
        "probe_duration_seconds",
        "Returns how long the probe took to complete in seconds",
    )?;
    registry.register(Box::new(probe_duration.clone()))?;
    probe_duration.set(duration.as_secs_f64());

    Ok(())
}

fn run_check_config(global: &GlobalOpts) -> ExitCode {
    match load_config(global) {
        Ok((config, source)) => {
            println!("configuration OK ({source})");
            for name in config.module_names() {
                println!("  module: {name}");
            }
            if config.site_accounts.as_ref().is_some_and(|c| c.is_configured()) {
                println!("  site accounts: configured");
            }
            ExitCode::Success
        }
        Err(e) => fail(
            ExitCode::ConfigError,
            format!("configuration error {}: {e}", e.code()),
        ),
    }
}

/// Report an error on stderr tagged with the exit code name.
fn fail(code: ExitCode, message: impl Display) -> ExitCode {
    eprintln!("np-core: [{}] {message}", code.code_name());
    code
}

fn print_version(json: bool) {
    if json {
        let version_info = serde_json::json!({
            "np_core_version": env!("CARGO_PKG_VERSION"),
            "rust_version": env!("CARGO_PKG_RUST_VERSION"),
        });
        println!("{version_info}");
    } else {
        println!("np-core {}", env!("CARGO_PKG_VERSION"));
    }
}
