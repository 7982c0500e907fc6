use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use places_indexer::{Dependencies, IndexerConfig, IndexingError};
use places_service::token_from_cookie_header;

#[derive(Parser, Debug)]
#[command(name = "places-indexer")]
#[command(about = "Load geotagged places into OpenSearch and query them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the places index if it does not exist
    Provision,
    /// Parse a tab-separated export and bulk load it
    Load {
        /// Path to the export
        file: PathBuf,
    },
    /// Print one page of the listing
    Places {
        #[arg(long)]
        page: String,
    },
    /// Print the three places nearest to a point
    Recommend {
        #[arg(long, allow_hyphen_values = true)]
        lat: String,
        #[arg(long, allow_hyphen_values = true)]
        lon: String,
        /// Access token from the `token` command
        #[arg(long)]
        token: Option<String>,
        /// Raw `Cookie` header carrying the token
        #[arg(long, conflicts_with = "token")]
        cookie: Option<String>,
    },
    /// Issue an access token
    Token {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
}

impl Commands {
    fn needs_backend(&self) -> bool {
        !matches!(self, Commands::Token { .. })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(
    command: Commands,
    config: &IndexerConfig,
    deps: &Dependencies,
) -> Result<String, IndexingError> {
    if command.needs_backend() {
        deps.verify_backend().await?;
    }

    match command {
        Commands::Provision => {
            let outcome = deps.provisioner.ensure_index().await?;
            Ok(json!({
                "index": config.index.index_name,
                "outcome": format!("{:?}", outcome),
            })
            .to_string())
        }
        Commands::Load { file } => {
            let summary = deps.ingestor.run(&file).await?;
            Ok(summary.to_string())
        }
        Commands::Places { page } => {
            let response = deps.service.places(&page).await?;
            Ok(serde_json::to_string_pretty(&response)?)
        }
        Commands::Recommend {
            lat,
            lon,
            token,
            cookie,
        } => {
            let token = token.or_else(|| {
                cookie
                    .as_deref()
                    .and_then(token_from_cookie_header)
                    .map(str::to_string)
            });
            let response = deps
                .service
                .recommend(token.as_deref(), &lat, &lon)
                .await?;
            Ok(serde_json::to_string_pretty(&response)?)
        }
        Commands::Token { username, password } => {
            let username = username.as_deref().unwrap_or(&config.credentials.username);
            let password = password.as_deref().unwrap_or(&config.credentials.password);
            let grant = deps.service.issue_token(username, password)?;
            info!(subject = %username, "Issued token");
            Ok(serde_json::to_string_pretty(&grant.response)?)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = IndexerConfig::from_env().context("reading configuration")?;
    let deps = Dependencies::new(&config).context("initializing dependencies")?;

    match run(cli.command, &config, &deps).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            println!("{}", json!({ "error": e.reason() }));
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_load() {
        let cli = Cli::try_parse_from(["places-indexer", "load", "data.csv"]).unwrap();
        match cli.command {
            Commands::Load { file } => assert_eq!(file, PathBuf::from("data.csv")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_recommend_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "places-indexer",
            "recommend",
            "--lat",
            "-33.86",
            "--lon",
            "-151.2",
            "--token",
            "abc",
        ])
        .unwrap();

        match cli.command {
            Commands::Recommend {
                lat, lon, token, ..
            } => {
                assert_eq!(lat, "-33.86");
                assert_eq!(lon, "-151.2");
                assert_eq!(token.as_deref(), Some("abc"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_token_and_cookie_conflict() {
        let result = Cli::try_parse_from([
            "places-indexer",
            "recommend",
            "--lat",
            "1",
            "--lon",
            "2",
            "--token",
            "a",
            "--cookie",
            "token=b",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_token_command_skips_backend() {
        let cli = Cli::try_parse_from(["places-indexer", "token"]).unwrap();
        assert!(!cli.command.needs_backend());

        let cli = Cli::try_parse_from(["places-indexer", "places", "--page", "2"]).unwrap();
        assert!(cli.command.needs_backend());
    }

    #[tokio::test]
    async fn test_run_token_command() {
        let config = IndexerConfig::from_lookup(|_| None).unwrap();
        let deps = Dependencies::new(&config).unwrap();

        let output = run(
            Commands::Token {
                username: None,
                password: None,
            },
            &config,
            &deps,
        )
        .await
        .unwrap();

        let body: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[tokio::test]
    async fn test_run_token_wrong_password() {
        let config = IndexerConfig::from_lookup(|_| None).unwrap();
        let deps = Dependencies::new(&config).unwrap();

        let err = run(
            Commands::Token {
                username: Some("user".into()),
                password: Some("nope".into()),
            },
            &config,
            &deps,
        )
        .await
        .unwrap_err();
        assert_eq!(err.reason(), "invalid_credentials");
    }
}
