//! Configuration file command.

use std::path::Path;

use anyhow::Context;
use clap::{Args, Subcommand};
use tonegen_config::{ToneConfig, user_config_file};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

pub fn run(args: ConfigArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let path = config_path.map_or_else(user_config_file, Path::to_path_buf);

    match args.command.unwrap_or(ConfigCommand::Show) {
        ConfigCommand::Show => {
            let config = ToneConfig::load_or_default(config_path)
                .with_context(|| format!("loading {}", path.display()))?;
            let source = if path.is_file() {
                path.display().to_string()
            } else {
                "built-in defaults".to_string()
            };
            println!("# source: {source}");
            print!("{}", config.to_toml()?);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            ToneConfig::default().save(&path)?;
            println!("Wrote {}", path.display());
        }
        ConfigCommand::Path => println!("{}", path.display()),
    }
    Ok(())
}
