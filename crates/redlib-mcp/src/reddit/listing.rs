use crate::prelude::*;
use crate::Context;
use redlib_mcp_core::routes::{search_request, subreddit_request, user_request};
use redlib_mcp_core::shape::ShapedEnvelope;

use super::{fetch, given, note_identifier};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct SubredditOptions {
    /// Subreddit name, r/ path, or Reddit/Redlib URL (e.g., "rust" or "https://reddit.com/r/rust")
    pub subreddit: String,

    /// Sort order: hot, new, top, rising, controversial
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Time filter for top/controversial: hour, day, week, month, year, all
    #[arg(short, long)]
    pub time: Option<String>,

    /// Pagination cursor from a previous response's "after"
    #[arg(short, long)]
    pub after: Option<String>,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct UserOptions {
    /// Username, u/ or user/ path, or profile URL (e.g., "spez")
    pub user: String,

    /// Listing: overview, submitted, comments
    #[arg(short, long)]
    pub listing: Option<String>,

    /// Pagination cursor from a previous response's "after"
    #[arg(short, long)]
    pub after: Option<String>,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct SearchOptions {
    /// Search query
    pub query: String,

    /// Restrict the search to one subreddit
    #[arg(short = 'r', long)]
    pub subreddit: Option<String>,

    /// Pagination cursor from a previous response's "after"
    #[arg(short, long)]
    pub after: Option<String>,
}

/// Fetches a subreddit listing, shaped for LLM consumption
pub async fn subreddit_data(ctx: &Context, options: &SubredditOptions) -> Result<ShapedEnvelope> {
    note_identifier(ctx, &options.subreddit);

    let request = subreddit_request(
        &options.subreddit,
        given(&options.sort),
        given(&options.time),
        given(&options.after),
        ctx.client.host(),
    );

    fetch(ctx, request).await
}

/// Fetches a user's profile listing
pub async fn user_data(ctx: &Context, options: &UserOptions) -> Result<ShapedEnvelope> {
    note_identifier(ctx, &options.user);

    let request = user_request(
        &options.user,
        given(&options.listing),
        given(&options.after),
        ctx.client.host(),
    );

    fetch(ctx, request).await
}

/// Searches posts, globally or within one subreddit
pub async fn search_data(ctx: &Context, options: &SearchOptions) -> Result<ShapedEnvelope> {
    let request = search_request(
        &options.query,
        given(&options.subreddit),
        given(&options.after),
        ctx.client.host(),
    );

    fetch(ctx, request).await
}
