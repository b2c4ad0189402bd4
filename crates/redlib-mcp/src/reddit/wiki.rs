use crate::prelude::*;
use crate::Context;
use redlib_mcp_core::routes::wiki_request;
use redlib_mcp_core::shape::ShapedEnvelope;

use super::{fetch, given, note_identifier};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct WikiOptions {
    /// Subreddit name, r/ path, or URL
    pub subreddit: String,

    /// Wiki page name (default: index)
    #[arg(short, long)]
    pub page: Option<String>,
}

/// Fetches a subreddit wiki page
pub async fn wiki_data(ctx: &Context, options: &WikiOptions) -> Result<ShapedEnvelope> {
    note_identifier(ctx, &options.subreddit);

    let request = wiki_request(&options.subreddit, given(&options.page), ctx.client.host());

    fetch(ctx, request).await
}
