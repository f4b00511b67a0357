use crate::dispatcher::Dispatcher;
use crate::inventory::{
    render_curl, render_curl_markdown, render_httpie, render_insomnia, render_json,
    render_postman, render_text, summarize, Environment, ExportTarget,
};
use crate::logging::{init_logging_with_config, LogConfig};
use crate::registry::sample_table;
use crate::runtime_config::{RuntimeConfig, DEFAULT_ADDR};
use crate::server::{AppService, HttpServer};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

/// Command-line interface for switchyard
#[derive(Parser, Debug)]
#[command(name = "switchyard", version)]
#[command(about = "Method + path router serving a sample JSON API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the sample API over HTTP
    Serve {
        /// Listen address
        #[arg(long, env = "SWITCHYARD_ADDR", default_value = DEFAULT_ADDR)]
        addr: String,
    },
    /// Print the registered routes or export them for an API client
    Routes {
        #[arg(long, value_enum, default_value_t = RoutesFormat::Text)]
        format: RoutesFormat,

        /// Environment the exported requests are addressed at
        #[arg(long, value_enum, default_value_t = Environment::Dev)]
        env: Environment,

        /// Base URL overriding the environment's default
        #[arg(long)]
        base_url: Option<String>,

        /// Project name used in collection titles
        #[arg(long, default_value = "switchyard")]
        project: String,
    },
}

/// Output format of `switchyard routes`
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RoutesFormat {
    Text,
    Json,
    Curl,
    CurlMarkdown,
    Postman,
    Insomnia,
    Httpie,
}

/// Parse the command line and run the selected command.
///
/// # Errors
///
/// Logging setup, route registration, binding the listen address or a server
/// thread failure.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { addr } => serve(&addr),
        Commands::Routes {
            format,
            env,
            base_url,
            project,
        } => {
            let mut target = ExportTarget::new(project, env);
            if let Some(base_url) = base_url {
                target = target.with_base_url(&base_url);
            }
            print!("{}", routes(format, &target)?);
            Ok(())
        }
    }
}

fn serve(addr: &str) -> Result<()> {
    init_logging_with_config(&LogConfig::from_env())?;

    let config = RuntimeConfig::from_env();
    config.apply();
    info!(stack_size = config.stack_size, "Coroutine runtime configured");

    let table = sample_table().context("Failed to register sample API")?;
    let service = AppService::new(Dispatcher::new(table));
    let handle = HttpServer(service)
        .start(addr)
        .with_context(|| format!("Failed to start server on {addr}"))?;
    info!(addr = %handle.addr(), "Serving sample API");
    handle
        .join()
        .map_err(|e| anyhow!("Server thread panicked: {e:?}"))
}

/// Render the sample table in `format`, addressing exports at `target`.
///
/// # Errors
///
/// Route registration or JSON serialization failure.
pub(crate) fn routes(format: RoutesFormat, target: &ExportTarget) -> Result<String> {
    let table = sample_table().context("Failed to register sample API")?;
    let summaries = summarize(&table);
    let mut out = match format {
        RoutesFormat::Text => return Ok(render_text(&summaries)),
        RoutesFormat::Curl => return Ok(render_curl(&summaries, target)),
        RoutesFormat::CurlMarkdown => return Ok(render_curl_markdown(&summaries, target)),
        RoutesFormat::Json => render_json(&summaries)?,
        RoutesFormat::Postman => render_postman(&summaries, target)?,
        RoutesFormat::Insomnia => render_insomnia(&summaries, target)?,
        RoutesFormat::Httpie => render_httpie(&summaries, target)?,
    };
    out.push('\n');
    Ok(out)
}
