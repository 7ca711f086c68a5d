//! Config subcommand handlers.

use dialoguer::{Confirm, Input};

use fieldsync_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util::{self, prompt_err};

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(
                &fieldsync_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = fieldsync_config::load_config()?;
            let out = match global.output {
                OutputFormat::Table => toml::to_string_pretty(&cfg)?,
                OutputFormat::Plain => {
                    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
                    names.sort_unstable();
                    names.join("\n")
                }
                format => output::render_single(format, &cfg, |_| String::new(), |_| String::new())?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Init => init(global),
    }
}

/// Add (or replace) a profile. Non-interactive when `--api-url` is given.
fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = fieldsync_config::load_config()?;

    let (name, profile) = match &global.api_url {
        Some(url) => (
            global.profile.clone().unwrap_or_else(|| "default".into()),
            Profile::new(url.clone()),
        ),
        None => prompt_profile(&cfg, global)?,
    };

    // Refuse to write a profile that could never connect
    fieldsync_config::profile_to_sync_config(&profile, &cfg.defaults)?;

    if cfg.profiles.contains_key(&name) && !global.yes {
        util::require_interactive("overwrite profile", false)?;
        let overwrite = Confirm::new()
            .with_prompt(format!("Profile '{name}' exists. Overwrite?"))
            .default(false)
            .interact()
            .map_err(prompt_err)?;
        if !overwrite {
            return Ok(());
        }
    }

    cfg.profiles.insert(name.clone(), profile);
    let default_is_valid = cfg
        .default_profile
        .as_ref()
        .is_some_and(|d| cfg.profiles.contains_key(d));
    if !default_is_valid {
        cfg.default_profile = Some(name.clone());
    }

    let path = fieldsync_config::save_config(&cfg)?;
    if !global.quiet {
        eprintln!("Saved profile '{name}' to {}", path.display());
    }
    Ok(())
}

fn prompt_profile(cfg: &Config, global: &GlobalOpts) -> Result<(String, Profile), CliError> {
    util::require_interactive("config init", false)?;

    eprintln!("fieldsync configuration");
    eprintln!("   Config path: {}\n", fieldsync_config::config_path().display());

    let name: String = Input::new()
        .with_prompt("Profile name")
        .default(global.profile.clone().unwrap_or_else(|| "default".into()))
        .interact_text()
        .map_err(prompt_err)?;

    let api_url: String = Input::new()
        .with_prompt("Service URL")
        .default("http://localhost:3000/api".into())
        .interact_text()
        .map_err(prompt_err)?;

    let interval: u64 = Input::new()
        .with_prompt("Polling interval (seconds)")
        .default(cfg.defaults.polling_interval_secs)
        .interact_text()
        .map_err(prompt_err)?;

    let mut profile = Profile::new(api_url);
    if interval != cfg.defaults.polling_interval_secs {
        profile.polling_interval_secs = Some(interval);
    }
    Ok((name, profile))
}
