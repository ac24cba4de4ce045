mod cli;
mod commands;
mod error;
mod output;

use std::time::Duration;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use voltdesk_config::{self as config, Config, Profile};
use voltdesk_core::{Console, ConsoleConfig, TlsVerification};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::commands::Target;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a backend
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "voltdesk", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let cfg = config::load_config()?;
            let profile_name = cfg.active_profile_name(cli.global.profile.as_deref());
            let profile = resolve_profile(&cfg, &profile_name, &cli.global)?;
            let console = Console::new(&console_config(&profile, &cfg, &cli.global)?)?;

            match config::load_session(&profile_name) {
                Ok(Some(session)) => {
                    console.restore_session(session);
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "ignoring unreadable session file"),
            }

            let target = Target {
                name: &profile_name,
                username: profile.username.as_deref(),
            };

            debug!(profile = %profile_name, "dispatching command");
            let result = tokio::select! {
                result = commands::dispatch(cmd, &console, &target, &cli.global) => result,
                _ = tokio::signal::ctrl_c() => Err(CliError::Interrupted),
            };
            console.shutdown();
            result
        }
    }
}

/// The named profile with `--server` applied, or a bare profile when only
/// `--server` was given.
fn resolve_profile(cfg: &Config, name: &str, global: &GlobalOpts) -> Result<Profile, CliError> {
    if let Some(profile) = cfg.profiles.get(name) {
        let mut profile = profile.clone();
        if let Some(ref server) = global.server {
            profile.server.clone_from(server);
        }
        return Ok(profile);
    }

    match global.server {
        Some(ref server) => Ok(Profile::new(server.clone())),
        None if global.profile.is_some() => {
            Err(commands::config_cmd::profile_not_found(cfg, name))
        }
        None => Err(CliError::NoConfig {
            path: config::config_path().display().to_string(),
        }),
    }
}

/// Translate the profile, then apply `-k` and `--timeout`.
fn console_config(
    profile: &Profile,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<ConsoleConfig, CliError> {
    let mut console_config = config::profile_to_console_config(profile, &cfg.defaults)?;
    if global.insecure {
        console_config.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        console_config.timeout = Duration::from_secs(secs);
    }
    Ok(console_config)
}
