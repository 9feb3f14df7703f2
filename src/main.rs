use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vecmatch_api::{MatchRequest, Pipeline, RestApi};
use vecmatch_core::{MatchConfig, MatchPolicy, SourceKind};
use vecmatch_storage::{CatalogLoader, ContextStores};

/// Match feature vectors against a catalog of reference vectors
#[derive(Parser, Debug)]
#[command(name = "vecmatch")]
#[command(about = "Cosine similarity matching against owner/file vector catalogs", long_about = None)]
struct Args {
    /// Log level or filter directives (e.g. "debug", "vecmatch_core=trace")
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match one batch of input vectors and print the result as JSON
    Match {
        /// Input file: a JSON array of vectors or a full request with
        /// `payload` and `cosineOptions` ("-" reads stdin)
        #[arg(short, long, default_value = "-")]
        input: String,

        #[command(flatten)]
        defaults: DefaultsArgs,
    },

    /// Serve the match pipeline over HTTP
    Serve {
        /// HTTP API port
        #[arg(long, default_value_t = 6333)]
        http_port: u16,

        /// JSON document preloading flow/global context variables
        #[arg(long)]
        store: Option<PathBuf>,

        #[command(flatten)]
        defaults: DefaultsArgs,
    },
}

/// Static defaults, overridable per request
#[derive(clap::Args, Debug)]
struct DefaultsArgs {
    /// Catalog source: path, flow or global
    #[arg(long, default_value = "path")]
    file_type: SourceKind,

    /// Catalog file path or context variable name
    #[arg(long, default_value = "")]
    file: String,

    /// Minimum similarity kept in results, in [0, 1]
    #[arg(long, default_value_t = 0.0)]
    threshold: f32,

    /// Aggregation policy: best or all
    #[arg(long, default_value = "best")]
    policy: MatchPolicy,
}

impl From<DefaultsArgs> for MatchConfig {
    fn from(args: DefaultsArgs) -> Self {
        MatchConfig {
            file_type: args.file_type,
            file: args.file,
            threshold: args.threshold,
            policy: args.policy,
        }
    }
}

fn read_request(input: &str) -> anyhow::Result<MatchRequest> {
    let data = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {input}"))?
    };

    let value: Value = serde_json::from_str(&data).context("input is not valid JSON")?;
    let request: MatchRequest = if value.is_object() {
        serde_json::from_value(value)?
    } else {
        MatchRequest {
            payload: value,
            ..Default::default()
        }
    };
    Ok(request)
}

/// Build the log filter from `--log-level`, falling back to `info`
fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

type HttpExit = std::result::Result<std::thread::Result<std::io::Result<()>>, tokio::task::JoinError>;

/// Describe an abnormal HTTP server exit, `None` for a clean stop
fn http_exit_error(res: &HttpExit) -> Option<String> {
    match res {
        Ok(Ok(Ok(()))) => None,
        Ok(Ok(Err(e))) => Some(format!("HTTP server error: {}", e)),
        Ok(Err(_)) => Some("HTTP server thread panicked".to_string()),
        Err(e) => Some(format!("HTTP server join failed: {}", e)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(&args.log_level))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Match { input, defaults } => {
            let pipeline = Pipeline::new(defaults.into(), CatalogLoader::default())?;
            let request = read_request(&input)?;
            let output = pipeline.invoke(&request).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Serve {
            http_port,
            store,
            defaults,
        } => {
            let stores = match &store {
                Some(path) => ContextStores::from_file(path)?,
                None => ContextStores::in_memory(),
            };
            let pipeline = Arc::new(Pipeline::new(defaults.into(), CatalogLoader::new(stores))?);

            info!("Starting vecmatch v{}", env!("CARGO_PKG_VERSION"));
            info!("Defaults: {:?}", pipeline.defaults());
            if let Some(path) = &store {
                info!("Context store preloaded from {:?}", path);
            }

            let http_handle = std::thread::spawn(move || {
                let sys = actix_web::rt::System::new();
                sys.block_on(RestApi::start(pipeline, http_port))
            });

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                }
                res = tokio::task::spawn_blocking(move || http_handle.join()) => {
                    match http_exit_error(&res) {
                        Some(message) => error!("{}", message),
                        None => info!("HTTP server stopped"),
                    }
                }
            }

            info!("Shutting down...");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_accepts_levels_and_directives() {
        assert_eq!(log_filter("debug").to_string().to_lowercase(), "debug");
        assert_eq!(
            log_filter("vecmatch_core=trace").to_string().to_lowercase(),
            "vecmatch_core=trace"
        );
    }

    #[test]
    fn test_http_exit_error() {
        assert_eq!(http_exit_error(&Ok(Ok(Ok(())))), None);

        let failed: HttpExit = Ok(Ok(Err(std::io::Error::other("bind failed"))));
        assert!(http_exit_error(&failed).unwrap().contains("bind failed"));

        let panicked = std::thread::spawn(|| -> std::io::Result<()> { panic!("boom") }).join();
        assert_eq!(
            http_exit_error(&Ok(panicked)).as_deref(),
            Some("HTTP server thread panicked")
        );
    }
}
