mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fieldsync_config::{ConfigError, Profile};
use fieldsync_core::{SyncConfig, SyncStore};

use crate::cli::{Cli, Command, GlobalOpts};
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
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Local-only commands never contact the service
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "fieldsync", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let config = build_sync_config(&cli.global)?;
            let store = SyncStore::from_config(&config)?;

            tracing::debug!(command = ?cmd, url = %config.api_url, "dispatching command");
            commands::dispatch(cmd, &store, &config, &cli.global).await
        }
    }
}

/// Build a `SyncConfig` from the config file, profile, and CLI overrides.
fn build_sync_config(global: &GlobalOpts) -> Result<SyncConfig, CliError> {
    let cfg = fieldsync_config::load_config()?;

    if let Some(url) = &global.api_url {
        // --api-url overrides the profile's URL, or stands alone
        let mut profile = fieldsync_config::resolve_profile(&cfg, global.profile.as_deref())
            .map_or_else(|_| Profile::new(url.clone()), |(_, p)| p.clone());
        profile.api_url.clone_from(url);
        return Ok(fieldsync_config::profile_to_sync_config(&profile, &cfg.defaults)?);
    }

    match fieldsync_config::resolve_profile(&cfg, global.profile.as_deref()) {
        Ok((_, profile)) => Ok(fieldsync_config::profile_to_sync_config(profile, &cfg.defaults)?),
        Err(ConfigError::UnknownProfile { path, .. }) if cfg.profiles.is_empty() => {
            Err(CliError::NoConfig { path })
        }
        Err(ConfigError::UnknownProfile { name, .. }) => {
            let mut available: Vec<_> = cfg.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            Err(CliError::ProfileNotFound {
                name,
                available: available.join(", "),
            })
        }
        Err(other) => Err(other.into()),
    }
}
