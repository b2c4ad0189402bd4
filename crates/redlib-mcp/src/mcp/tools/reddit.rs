use crate::prelude::{eprintln, *};
use crate::reddit::{
    DuplicatesOptions, PostOptions, SearchOptions, SubredditOptions, UserOptions, WikiOptions,
};
use crate::Context;

use super::{execution_error, parse_arguments, text_result, JsonRpcError};

pub async fn handle_get_subreddit(
    arguments: Option<serde_json::Value>,
    ctx: &Context,
) -> Result<serde_json::Value, JsonRpcError> {
    let args: SubredditOptions = parse_arguments(arguments)?;

    if ctx.verbose {
        eprintln!(
            "Calling get_subreddit: subreddit={}, sort={:?}, time={:?}, after={:?}",
            args.subreddit, args.sort, args.time, args.after
        );
    }

    let output = crate::reddit::subreddit_data(ctx, &args)
        .await
        .map_err(execution_error)?;

    text_result(&output)
}

pub async fn handle_get_post(
    arguments: Option<serde_json::Value>,
    ctx: &Context,
) -> Result<serde_json::Value, JsonRpcError> {
    let args: PostOptions = parse_arguments(arguments)?;

    if ctx.verbose {
        eprintln!(
            "Calling get_post: post={}, comment_id={:?}",
            args.post, args.comment_id
        );
    }

    let output = crate::reddit::post_data(ctx, &args)
        .await
        .map_err(execution_error)?;

    text_result(&output)
}

pub async fn handle_get_user(
    arguments: Option<serde_json::Value>,
    ctx: &Context,
) -> Result<serde_json::Value, JsonRpcError> {
    let args: UserOptions = parse_arguments(arguments)?;

    if ctx.verbose {
        eprintln!(
            "Calling get_user: user={}, listing={:?}, after={:?}",
            args.user, args.listing, args.after
        );
    }

    let output = crate::reddit::user_data(ctx, &args)
        .await
        .map_err(execution_error)?;

    text_result(&output)
}

pub async fn handle_search_reddit(
    arguments: Option<serde_json::Value>,
    ctx: &Context,
) -> Result<serde_json::Value, JsonRpcError> {
    let args: SearchOptions = parse_arguments(arguments)?;

    if ctx.verbose {
        eprintln!(
            "Calling search_reddit: query={}, subreddit={:?}, after={:?}",
            args.query, args.subreddit, args.after
        );
    }

    let output = crate::reddit::search_data(ctx, &args)
        .await
        .map_err(execution_error)?;

    text_result(&output)
}

pub async fn handle_get_wiki(
    arguments: Option<serde_json::Value>,
    ctx: &Context,
) -> Result<serde_json::Value, JsonRpcError> {
    let args: WikiOptions = parse_arguments(arguments)?;

    if ctx.verbose {
        eprintln!(
            "Calling get_wiki: subreddit={}, page={:?}",
            args.subreddit, args.page
        );
    }

    let output = crate::reddit::wiki_data(ctx, &args)
        .await
        .map_err(execution_error)?;

    text_result(&output)
}

pub async fn handle_get_duplicates(
    arguments: Option<serde_json::Value>,
    ctx: &Context,
) -> Result<serde_json::Value, JsonRpcError> {
    let args: DuplicatesOptions = parse_arguments(arguments)?;

    if ctx.verbose {
        eprintln!("Calling get_duplicates: post={}", args.post);
    }

    let output = crate::reddit::duplicates_data(ctx, &args)
        .await
        .map_err(execution_error)?;

    text_result(&output)
}
