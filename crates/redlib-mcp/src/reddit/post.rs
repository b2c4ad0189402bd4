use crate::prelude::*;
use crate::Context;
use redlib_mcp_core::routes::{duplicates_request, post_request};
use redlib_mcp_core::shape::ShapedEnvelope;

use super::{fetch, given, note_identifier};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct PostOptions {
    /// Post ID, permalink, or full URL (e.g., "abc123" or "https://reddit.com/r/rust/comments/abc123/title")
    pub post: String,

    /// Focus on one comment thread (comment ID)
    #[arg(short, long)]
    pub comment_id: Option<String>,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct DuplicatesOptions {
    /// Post ID, permalink, or full URL
    pub post: String,
}

/// Fetches a post with its comment tree
pub async fn post_data(ctx: &Context, options: &PostOptions) -> Result<ShapedEnvelope> {
    note_identifier(ctx, &options.post);

    let request = post_request(&options.post, given(&options.comment_id), ctx.client.host());

    fetch(ctx, request).await
}

/// Fetches other submissions of the same link
pub async fn duplicates_data(ctx: &Context, options: &DuplicatesOptions) -> Result<ShapedEnvelope> {
    note_identifier(ctx, &options.post);

    let request = duplicates_request(&options.post, ctx.client.host());

    fetch(ctx, request).await
}
