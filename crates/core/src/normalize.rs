//! Identifier normalization
//!
//! Pure functions that turn whatever a caller hands us (full Reddit or Redlib
//! URLs, bare names, `r/`/`u/` prefixed paths) into canonical Redlib paths.
//!
//! The normalizer is permissive: it never rejects input. Degenerate input such
//! as an empty string yields a degenerate path (`/r/`), and URLs pointing at
//! unknown hosts are still reduced to their path component.

use url::Url;

/// Hostnames of the upstream service whose URLs map 1:1 onto Redlib paths.
pub const UPSTREAM_HOSTS: [&str; 6] = [
    "reddit.com",
    "www.reddit.com",
    "old.reddit.com",
    "np.reddit.com",
    "i.reddit.com",
    "m.reddit.com",
];

/// Where an absolute URL points, relative to the hosts we know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    /// One of [`UPSTREAM_HOSTS`]
    Upstream,
    /// The configured Redlib mirror
    Mirror,
    /// Anything else. Still treated as path-bearing.
    Foreign,
}

/// Authority (`host[:port]`, lower-cased) of a parsed URL.
fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    })
}

/// Extract the authority of a configured base address.
///
/// Accepts either a full URL (`https://redlib.example.com`) or a bare host.
pub fn host_of(base_url: &str) -> Option<String> {
    if base_url.starts_with("http://") || base_url.starts_with("https://") {
        Url::parse(base_url).ok().as_ref().and_then(authority)
    } else if base_url.is_empty() {
        None
    } else {
        Some(base_url.trim_end_matches('/').to_lowercase())
    }
}

/// Classify an authority against the upstream set and the optional mirror.
pub fn classify_host(host: &str, alt_host: Option<&str>) -> HostKind {
    let host = host.to_lowercase();

    if UPSTREAM_HOSTS.contains(&host.as_str()) {
        HostKind::Upstream
    } else if alt_host.is_some_and(|alt| alt.eq_ignore_ascii_case(&host)) {
        HostKind::Mirror
    } else {
        HostKind::Foreign
    }
}

/// Classify an absolute URL input. Returns `None` for non-URL input.
pub fn classify_url(input: &str, alt_host: Option<&str>) -> Option<HostKind> {
    if !is_absolute_url(input) {
        return None;
    }

    let url = Url::parse(input).ok()?;
    let host = authority(&url)?;
    Some(classify_host(&host, alt_host))
}

fn is_absolute_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Path component of an absolute URL, exactly as written.
///
/// Everything after the authority up to the first `?` or `#`. No decoding,
/// no dot-segment resolution, so a URL and its path normalize identically.
fn raw_url_path(input: &str) -> &str {
    let Some((_, rest)) = input.split_once("://") else {
        return "";
    };
    let rest = rest.split(['?', '#']).next().unwrap_or_default();

    match rest.find('/') {
        Some(idx) => &rest[idx..],
        None => "",
    }
}

/// Normalize any URL or path to a clean, absolute, query-free path.
///
/// * `https://reddit.com/r/rust?sort=new` -> `/r/rust`
/// * `r/rust/` -> `/r/rust`
/// * `/` -> `""`
pub fn normalize_path(input: &str, _alt_host: Option<&str>) -> String {
    // Upstream, mirror and foreign hosts all reduce to the path component.
    // The host only matters for logging, see `classify_url`.
    let mut path = if is_absolute_url(input) {
        raw_url_path(input).to_string()
    } else {
        input.to_string()
    };

    if let Some(idx) = path.find('?') {
        path.truncate(idx);
    }

    if !path.starts_with('/') {
        path.insert(0, '/');
    }

    path.trim_end_matches('/').to_string()
}

/// `path` with all leading slashes removed contains no further `/`.
fn is_single_segment(path: &str) -> bool {
    !path.trim_start_matches('/').contains('/')
}

/// Normalize a subreddit reference to `/r/<name>`.
///
/// Paths that already name a subreddit or a user, and multi-segment paths,
/// pass through unchanged.
pub fn normalize_subreddit(input: &str, alt_host: Option<&str>) -> String {
    let path = normalize_path(input, alt_host);

    if !path.starts_with("/r/") && !path.starts_with("/user/") && is_single_segment(&path) {
        return format!("/r/{}", path.trim_start_matches('/'));
    }

    path
}

/// Normalize a user reference to `/user/<name>`.
///
/// `u/name` and `user/name` are equivalent.
pub fn normalize_user(input: &str, alt_host: Option<&str>) -> String {
    let mut path = normalize_path(input, alt_host);

    if let Some(rest) = path.strip_prefix("/u/") {
        path = format!("/user/{rest}");
    }

    if !path.starts_with("/user/") && !path.starts_with("/r/") && is_single_segment(&path) {
        return format!("/user/{}", path.trim_start_matches('/'));
    }

    path
}

/// Normalize a post reference.
///
/// A bare id becomes `/comments/<id>`; full permalinks are kept verbatim.
pub fn normalize_post(input: &str, alt_host: Option<&str>) -> String {
    let path = normalize_path(input, alt_host);
    let token = path.trim_start_matches('/');

    if !token.contains('/') && !token.starts_with("comments") {
        return format!("/comments/{token}");
    }

    path
}
