use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use dialog_stack::Config;
use super::run::RunCommand;
use super::schema::SchemaCommand;

/// Layered overlay dialogs: replay and inspect dialog stack sessions
#[derive(Parser)]
#[command(
    name = "dialog-stack",
    version,
    about = "Replay and inspect layered overlay dialog sessions",
    long_about = r#"Replays scripted dialog sessions against an in-memory host document and
prints how the dialog stack, z-order and transitions evolve.

Examples:
  dialog-stack run session.yaml              # Replay a scenario
  dialog-stack run session.yaml --realtime   # Sleep through wait steps
  dialog-stack schema --target scenario      # Print the scenario JSON schema
  dialog-stack config                        # Print the effective configuration"#
)]
pub struct Cli {
    /// Configuration file (JSON); overrides the default search paths
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a scenario file
    Run(RunCommand),
    /// Generate JSON schemas for scenarios and configuration
    Schema(SchemaCommand),
    /// Print the effective configuration
    Config,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.load_config().await?;
        debug!("Configuration initialized: {:?}", config);

        match self.command {
            Commands::Run(run_cmd) => run_cmd.execute(config).await,
            Commands::Schema(schema_cmd) => schema_cmd.execute().await,
            Commands::Config => {
                println!("{}", serde_json::to_string_pretty(&config)?);
                Ok(())
            }
        }
    }

    async fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => {
                let mut config = Config::load_from_path(path).await?;
                config.load_from_env();
                config.validate()?;
                Ok(config)
            }
            None => Config::init().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["dialog-stack", "run", "x.yaml", "-r"]).unwrap();
        assert!(!cli.debug);
        assert!(cli.config.is_none());

        match cli.command {
            Commands::Run(run) => {
                assert_eq!(run.scenario, PathBuf::from("x.yaml"));
                assert!(run.realtime);
                assert!(!run.quiet);
            }
            _ => panic!("expected run subcommand"),
        }

        assert!(Cli::try_parse_from(["dialog-stack", "run"]).is_err());
    }

    #[test]
    fn test_parse_config_with_global_flags() {
        let cli = Cli::try_parse_from(["dialog-stack", "config", "--config", "c.json", "-d"]).unwrap();
        assert!(matches!(cli.command, Commands::Config));
        assert_eq!(cli.config, Some(PathBuf::from("c.json")));
        assert!(cli.debug);
    }

    #[test]
    fn test_parse_schema() {
        let cli = Cli::try_parse_from(["dialog-stack", "schema", "--target", "config", "-f", "yaml"]).unwrap();
        match cli.command {
            Commands::Schema(schema) => assert!(schema.output.is_none()),
            _ => panic!("expected schema subcommand"),
        }

        assert!(Cli::try_parse_from(["dialog-stack", "schema", "--target", "layers"]).is_err());
    }

    #[tokio::test]
    async fn test_load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dialog-stack.json");
        std::fs::write(&path, r#"{ "z_baseline": 200 }"#).unwrap();
        let path = path.to_string_lossy().into_owned();

        let cli = Cli::try_parse_from(["dialog-stack", "--config", path.as_str(), "config"]).unwrap();
        let config = cli.load_config().await.unwrap();
        assert_eq!(config.z_baseline, 200);
        assert_eq!(config.hide_delay_ms, Config::default().hide_delay_ms);
    }

    #[tokio::test]
    async fn test_load_config_rejects_invalid_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dialog-stack.json");
        std::fs::write(&path, r#"{ "backdrop_tint": { "r": 0, "g": 0, "b": 0, "a": 1.5 } }"#).unwrap();
        let path = path.to_string_lossy().into_owned();

        let cli = Cli::try_parse_from(["dialog-stack", "--config", path.as_str(), "config"]).unwrap();
        let err = cli.load_config().await.unwrap_err();
        assert!(err.to_string().contains("backdrop_tint"));

        let cli = Cli::try_parse_from(["dialog-stack", "--config", "/nonexistent/dialog-stack.json", "config"]).unwrap();
        assert!(cli.load_config().await.is_err());
    }
}
