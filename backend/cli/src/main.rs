mod config_cmd;
mod serve_cmd;
mod terminal_output;
mod verify_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use eventgate_config::EventGateConfig;
use eventgate_logging::{init_logger, LogOptions};

#[derive(Parser)]
#[command(name = "eventgate")]
#[command(about = "EventGate: verified Slack Events API webhook receiver")]
#[command(version)]
struct Cli {
    /// Config file (default: $EVENTGATE_CONFIG_DIR/config.yaml or ~/.eventgate/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Verify and decode a captured delivery
    Verify {
        /// File holding the exact request body
        #[arg(long)]
        body: PathBuf,
        /// Value of the X-Slack-Request-Timestamp header
        #[arg(long)]
        timestamp: String,
        /// Value of the X-Slack-Signature header
        #[arg(long)]
        signature: String,
        /// Signing secret (default: SLACK_SIGNING_SECRET, then the config file)
        #[arg(long)]
        secret: Option<String>,
        /// Pin "now" to this Unix time, for replaying old captures
        #[arg(long)]
        now: Option<i64>,
    },
    /// Load, validate and print the redacted config
    CheckConfig,
}

fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| eventgate_config::config_file_path(&eventgate_config::config_dir()))
}

fn log_options(config: &EventGateConfig) -> LogOptions {
    LogOptions {
        level: config.logging.level.clone(),
        json: config.logging.json,
        log_dir: config.logging.dir.clone(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config);

    match cli.command {
        Commands::Serve { port } => {
            let mut config = eventgate_config::load(&config_path).await?;
            if let Some(port) = port {
                config.server.port = port;
            }
            init_logger(&log_options(&config));
            eventgate_config::ensure_valid(&config)?;
            serve_cmd::run(config).await?;
        }
        Commands::Verify {
            body,
            timestamp,
            signature,
            secret,
            now,
        } => {
            init_logger(&LogOptions {
                level: "warn".to_string(),
                ..LogOptions::default()
            });
            let args = verify_cmd::VerifyArgs {
                body,
                timestamp,
                signature,
                secret,
                now,
            };
            verify_cmd::run(args, &config_path).await?;
        }
        Commands::CheckConfig => {
            init_logger(&LogOptions {
                level: "warn".to_string(),
                ..LogOptions::default()
            });
            config_cmd::run(&config_path).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_verify() {
        let cli = Cli::try_parse_from([
            "eventgate",
            "verify",
            "--body",
            "body.json",
            "--timestamp",
            "1533878462",
            "--signature",
            "v0=abc",
            "--now",
            "1533878462",
        ])
        .unwrap();
        match cli.command {
            Commands::Verify { now, secret, .. } => {
                assert_eq!(now, Some(1533878462));
                assert!(secret.is_none());
            }
            _ => panic!("expected verify"),
        }
    }

    #[test]
    fn parses_global_config() {
        let cli = Cli::try_parse_from(["eventgate", "serve", "--port", "9000", "-c", "/tmp/eg.yaml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/eg.yaml")));
        assert!(matches!(cli.command, Commands::Serve { port: Some(9000) }));
    }
}
