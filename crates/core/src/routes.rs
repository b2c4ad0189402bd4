//! Request construction for the six Redlib operations
//!
//! Each builder normalizes the caller's identifier and appends the
//! operation-specific path segments and query parameters. The transport adds
//! the JSON suffix; nothing here performs I/O.

use crate::normalize::{normalize_post, normalize_subreddit, normalize_user};

pub const DEFAULT_SORT: &str = "hot";
pub const DEFAULT_LISTING: &str = "overview";
pub const DEFAULT_WIKI_PAGE: &str = "index";

/// A canonical Redlib request: path plus query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Append a query parameter when `value` is present.
    pub fn with_param(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// `/r/<name>/<sort>` with optional `t` and `after`.
pub fn subreddit_request(
    subreddit: &str,
    sort: Option<&str>,
    time: Option<&str>,
    after: Option<&str>,
    alt_host: Option<&str>,
) -> ApiRequest {
    let path = format!(
        "{}/{}",
        normalize_subreddit(subreddit, alt_host),
        sort.unwrap_or(DEFAULT_SORT)
    );

    ApiRequest::new(path)
        .with_param("t", time)
        .with_param("after", after)
}

/// `/comments/<id>` or a full permalink, optionally focused on one comment.
pub fn post_request(post: &str, comment_id: Option<&str>, alt_host: Option<&str>) -> ApiRequest {
    let mut path = normalize_post(post, alt_host);

    if let Some(comment_id) = comment_id {
        path.push('/');
        path.push_str(comment_id.trim_start_matches('/'));
    }

    ApiRequest::new(path)
}

/// `/user/<name>/<listing>` with optional `after`.
pub fn user_request(
    user: &str,
    listing: Option<&str>,
    after: Option<&str>,
    alt_host: Option<&str>,
) -> ApiRequest {
    let path = format!(
        "{}/{}",
        normalize_user(user, alt_host),
        listing.unwrap_or(DEFAULT_LISTING)
    );

    ApiRequest::new(path).with_param("after", after)
}

/// `/search` or `/r/<sub>/search`, always with `q`.
pub fn search_request(
    query: &str,
    subreddit: Option<&str>,
    after: Option<&str>,
    alt_host: Option<&str>,
) -> ApiRequest {
    let path = match subreddit {
        Some(subreddit) => format!("{}/search", normalize_subreddit(subreddit, alt_host)),
        None => "/search".to_string(),
    };

    ApiRequest::new(path)
        .with_param("q", Some(query))
        .with_param("after", after)
}

/// `/r/<name>/wiki/<page>`.
pub fn wiki_request(subreddit: &str, page: Option<&str>, alt_host: Option<&str>) -> ApiRequest {
    ApiRequest::new(format!(
        "{}/wiki/{}",
        normalize_subreddit(subreddit, alt_host),
        page.unwrap_or(DEFAULT_WIKI_PAGE)
    ))
}

/// The post path with its first `/comments/` swapped for `/duplicates/`.
pub fn duplicates_request(post: &str, alt_host: Option<&str>) -> ApiRequest {
    let post = post_request(post, None, alt_host);
    ApiRequest::new(post.path.replacen("/comments/", "/duplicates/", 1))
}
