use crate::prelude::*;
use clap::Parser;

mod client;
mod config;
mod error;
mod mcp;
mod prelude;
mod reddit;

#[cfg(test)]
mod test_support;

use client::RedlibClient;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Expose a Redlib instance's JSON API as Model Context Protocol tools"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Redlib base URL. Falls back to ~/.config/redlib/config.json, then http://localhost:8080
    #[clap(long, env = "REDLIB_URL", global = true)]
    redlib_url: Option<String>,

    /// Whether to display additional information.
    #[clap(long, env = "REDLIB_MCP_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

/// Everything a tool call needs, built once at startup.
#[derive(Debug, Clone)]
pub struct Context {
    pub client: RedlibClient,
    pub verbose: bool,
}

impl Context {
    pub fn new(client: RedlibClient, verbose: bool) -> Self {
        Self { client, verbose }
    }

    pub fn from_global(global: &Global) -> Self {
        let base_url = config::load_base_url(global.redlib_url.clone());
        Self::new(RedlibClient::new(&base_url), global.verbose)
    }
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Reddit operations through Redlib
    Reddit(crate::reddit::App),

    /// Model Context Protocol server
    MCP(crate::mcp::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();
    let ctx = Context::from_global(&app.global);

    log::debug!("Using Redlib instance at {}", ctx.client.base_url());

    match app.command {
        SubCommands::Reddit(sub_app) => crate::reddit::run(sub_app, ctx).await,
        SubCommands::MCP(sub_app) => crate::mcp::run(sub_app, ctx).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
