//! Balanced CLI
//!
//! Command-line interface for the Balanced payments API.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use balanced_client::{Error, HttpClient, JsonObject, RequestOptions, SharedConfig};

#[derive(Parser)]
#[command(name = "balanced")]
#[command(author, version, about = "Balanced payments API CLI client", long_about = None)]
struct Cli {
    /// API key secret used for authentication [env: BALANCED_API_KEY_SECRET]
    #[arg(long)]
    api_key: Option<String>,

    /// Root URI of the API, without the version segment [env: BALANCED_ROOT_URI]
    #[arg(long)]
    root_uri: Option<String>,

    /// API version number [env: BALANCED_API_VERSION]
    #[arg(long)]
    api_version: Option<String>,

    /// Print failing responses instead of turning them into errors
    #[arg(long, global = true)]
    no_raise: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a resource
    Get {
        /// Path relative to the versioned URI, or a full URL
        path: String,
        /// Query parameters (key=value), repeatable
        #[arg(long = "query", short = 'q', value_parser = parse_pair)]
        query: Vec<(String, String)>,
    },
    /// Create a resource
    Post {
        path: String,
        /// JSON request body
        #[arg(long, short = 'd')]
        data: Option<String>,
    },
    /// Update a resource
    Put {
        path: String,
        /// JSON request body
        #[arg(long, short = 'd')]
        data: Option<String>,
    },
    /// Delete a resource
    Delete { path: String },
    /// Show the resolved configuration
    Config,
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got: {}", s))
}

fn parse_body(data: Option<String>) -> Result<RequestOptions> {
    let mut options = RequestOptions::new();
    if let Some(data) = data {
        let body = serde_json::from_str(&data).context("--data must be valid JSON")?;
        options = options.json(body);
    }
    Ok(options)
}

/// Flags given on the command line win over whatever `config` was loaded with.
fn apply_flags(config: &SharedConfig, cli: &Cli) {
    if let Some(key) = &cli.api_key {
        config.configure(Some(key.as_str()));
    }
    if let Some(root_uri) = &cli.root_uri {
        config.set_root_uri(root_uri.as_str());
    }
    if let Some(api_version) = &cli.api_version {
        config.set_api_version(api_version.as_str());
    }
}

fn mask(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{}****", visible)
}

fn print_json(body: &JsonObject) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(body)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = SharedConfig::from_env();
    apply_flags(&config, &cli);

    let client = HttpClient::with_config(config);
    let no_raise = cli.no_raise;
    let raise_policy = move |options: RequestOptions| {
        if no_raise {
            options.without_auto_raise()
        } else {
            options
        }
    };

    let result = match cli.command {
        Commands::Get { path, query } => {
            let mut req = RequestOptions::new();
            for (key, value) in query {
                req = req.query(key, value);
            }
            client.get(&path, raise_policy(req)).await
        }
        Commands::Post { path, data } => {
            client.post(&path, raise_policy(parse_body(data)?)).await
        }
        Commands::Put { path, data } => client.put(&path, raise_policy(parse_body(data)?)).await,
        Commands::Delete { path } => {
            client
                .delete(&path, raise_policy(RequestOptions::new()))
                .await
        }
        Commands::Config => {
            let snapshot = client.config().snapshot();
            println!("uri:         {}", snapshot.uri());
            println!("version:     {}", snapshot.version());
            println!("user agent:  {}", snapshot.user_agent);
            match snapshot.api_key_secret.as_deref() {
                Some(key) => println!("api key:     {}", mask(key)),
                None => println!("api key:     (not set)"),
            }
            return Ok(());
        }
    };

    match result {
        Ok(body) => print_json(&body),
        Err(Error::Http(err)) => {
            eprintln!("✗ {} ({}): {}", err.kind, err.status_code, err.description);
            if let Some(category) = &err.category_code {
                eprintln!("  category: {}", category);
            }
            if let Some(additional) = &err.additional {
                eprintln!("  {}", additional);
            }
            if let Some(redirect) = &err.redirect_uri {
                eprintln!("  follow up at: {}", redirect);
            }
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("limit=10"),
            Ok(("limit".to_string(), "10".to_string()))
        );
        assert_eq!(
            parse_pair("q=a=b"),
            Ok(("q".to_string(), "a=b".to_string()))
        );
        assert!(parse_pair("limit").is_err());
    }

    #[test]
    fn test_parse_body() {
        let options = parse_body(Some(r#"{"amount": 100}"#.to_string())).unwrap();
        assert_eq!(options.json, Some(serde_json::json!({"amount": 100})));
        assert!(parse_body(None).unwrap().json.is_none());
        assert!(parse_body(Some("{".to_string())).is_err());
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("ak-test-2q80HU"), "ak-t****");
        assert_eq!(mask("ab"), "ab****");
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "balanced",
            "--root-uri",
            "http://localhost:5000",
            "get",
            "customers",
            "-q",
            "limit=2",
        ])
        .unwrap();
        assert_eq!(cli.root_uri.as_deref(), Some("http://localhost:5000"));
        assert!(cli.api_version.is_none());
        assert!(matches!(
            cli.command,
            Commands::Get { ref path, ref query } if path == "customers" && query.len() == 1
        ));
    }

    fn env_config() -> SharedConfig {
        SharedConfig::from_lookup(|name| match name {
            "BALANCED_API_KEY_SECRET" => Some("ak-env".to_string()),
            "BALANCED_ROOT_URI" => Some("http://env.local".to_string()),
            "BALANCED_API_VERSION" => Some("1.1".to_string()),
            _ => None,
        })
    }

    #[test]
    fn test_flags_override_environment() {
        let cli = Cli::try_parse_from([
            "balanced",
            "--api-key",
            "ak-flag",
            "--root-uri",
            "http://localhost:5000/",
            "config",
        ])
        .unwrap();
        let config = env_config();
        apply_flags(&config, &cli);

        assert_eq!(config.api_key_secret().as_deref(), Some("ak-flag"));
        assert_eq!(config.root_uri(), "http://localhost:5000");
        assert_eq!(config.uri(), "http://localhost:5000/v1.1");
    }

    #[test]
    fn test_environment_used_without_flags() {
        let cli = Cli::try_parse_from(["balanced", "config"]).unwrap();
        let config = env_config();
        apply_flags(&config, &cli);

        assert_eq!(config.api_key_secret().as_deref(), Some("ak-env"));
        assert_eq!(config.uri(), "http://env.local/v1.1");
    }
}
