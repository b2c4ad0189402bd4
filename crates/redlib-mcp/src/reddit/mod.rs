use crate::prelude::{eprintln, println, *};
use crate::Context;
use redlib_mcp_core::normalize::{classify_url, HostKind};
use redlib_mcp_core::routes::ApiRequest;
use redlib_mcp_core::shape::ShapedEnvelope;

pub mod listing;
pub mod post;
pub mod wiki;

// Re-export public data functions
pub use listing::{search_data, subreddit_data, user_data, SearchOptions, SubredditOptions, UserOptions};
pub use post::{duplicates_data, post_data, DuplicatesOptions, PostOptions};
pub use wiki::{wiki_data, WikiOptions};

#[derive(Debug, clap::Parser)]
#[command(name = "reddit")]
#[command(about = "Reddit operations through a Redlib instance")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List posts from a subreddit
    #[clap(name = "subreddit")]
    Subreddit(SubredditOptions),

    /// Read a post and its comments
    #[clap(name = "post")]
    Post(PostOptions),

    /// Read a user's profile listing
    #[clap(name = "user")]
    User(UserOptions),

    /// Search posts, optionally within one subreddit
    #[clap(name = "search")]
    Search(SearchOptions),

    /// Read a subreddit wiki page
    #[clap(name = "wiki")]
    Wiki(WikiOptions),

    /// List other submissions of the same link
    #[clap(name = "duplicates")]
    Duplicates(DuplicatesOptions),
}

pub async fn run(app: App, ctx: Context) -> Result<()> {
    if ctx.verbose {
        eprintln!("Redlib base: {}", ctx.client.base_url());
        eprintln!();
    }

    let output = match app.command {
        Commands::Subreddit(options) => subreddit_data(&ctx, &options).await?,
        Commands::Post(options) => post_data(&ctx, &options).await?,
        Commands::User(options) => user_data(&ctx, &options).await?,
        Commands::Search(options) => search_data(&ctx, &options).await?,
        Commands::Wiki(options) => wiki_data(&ctx, &options).await?,
        Commands::Duplicates(options) => duplicates_data(&ctx, &options).await?,
    };

    println!("{}", to_json_string(&output)?);

    Ok(())
}

/// Treat empty strings from tool callers the same as an omitted argument.
pub(crate) fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Log identifiers that point at hosts we don't recognize. They are still used.
pub(crate) fn note_identifier(ctx: &Context, identifier: &str) {
    if classify_url(identifier, ctx.client.host()) == Some(HostKind::Foreign) {
        log::debug!("Treating URL on unrecognized host as a path: {identifier}");
    }
}

/// Fetch and shape one request.
pub(crate) async fn fetch(ctx: &Context, request: ApiRequest) -> Result<ShapedEnvelope> {
    if ctx.verbose {
        eprintln!("GET {} {:?}", ctx.client.url_for(&request.path), request.query);
    }

    ctx.client.fetch_shaped(&request).await
}

pub fn to_json_string(output: &ShapedEnvelope) -> Result<String> {
    serde_json::to_string_pretty(output).map_err(|e| eyre!("JSON serialization failed: {}", e))
}
