//! Response shaping
//!
//! Redlib responses carry dozens of fields an LLM never needs (award lists,
//! preference blobs, moderation flags). These functions prune them down to a
//! fixed whitelist per node kind and collapse `author` objects to the plain
//! author name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kinds of nodes that have their own field whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Post,
    Comment,
}

const POST_FIELDS: &[&str] = &[
    "id",
    "title",
    "body",
    "author",
    "subreddit",
    "permalink",
    "url",
    "domain",
    "score",
    "upvote_ratio",
    "num_comments",
    "created",
    "created_ts",
    "flair",
    "post_type",
    "nsfw",
    "spoiler",
];

const COMMENT_FIELDS: &[&str] = &[
    "id",
    "kind",
    "body",
    "author",
    "score",
    "created",
    "created_ts",
    "edited",
    "parent_id",
    "replies",
];

impl NodeKind {
    /// Fields kept for this kind of node.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            NodeKind::Post => POST_FIELDS,
            NodeKind::Comment => COMMENT_FIELDS,
        }
    }

    pub fn keeps(self, field: &str) -> bool {
        self.fields().contains(&field)
    }
}

/// Backend response envelope. `error` is carried but never inspected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub error: Value,
}

/// Envelope returned to tool callers. Has no `error` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapedEnvelope {
    pub data: Value,
}

/// `{"name": "spez", ...}` -> `"spez"`. Strings and other values are kept.
fn collapse_author(author: &Value) -> Value {
    match author {
        Value::Object(obj) => obj.get("name").cloned().unwrap_or(Value::Null),
        other => other.clone(),
    }
}

fn filter_fields(node: &Map<String, Value>, kind: NodeKind) -> Map<String, Value> {
    node.iter()
        .filter(|(key, _)| kind.keeps(key))
        .map(|(key, value)| {
            let value = if key == "author" {
                collapse_author(value)
            } else {
                value.clone()
            };
            (key.clone(), value)
        })
        .collect()
}

/// Shape every element of a sequence with `f`, passing non-objects through.
fn shape_each(value: &Value, f: fn(&Map<String, Value>) -> Map<String, Value>) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| match item {
                    Value::Object(obj) => Value::Object(f(obj)),
                    other => other.clone(),
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Keep only whitelisted post fields and collapse `author`.
pub fn strip_post(post: &Map<String, Value>) -> Map<String, Value> {
    filter_fields(post, NodeKind::Post)
}

/// Keep only whitelisted comment fields and collapse `author`, recursing into
/// `replies`.
pub fn strip_comment(comment: &Map<String, Value>) -> Map<String, Value> {
    let mut stripped = filter_fields(comment, NodeKind::Comment);

    if let Some(replies) = stripped.get_mut("replies") {
        *replies = shape_each(replies, strip_comment);
    }

    stripped
}

/// Shape the `data` branch of an envelope.
///
/// Known keys are shaped, `error` is dropped, everything else passes through.
pub fn strip_response(data: &Value) -> Value {
    let Value::Object(obj) = data else {
        return data.clone();
    };

    let shaped = obj
        .iter()
        .filter(|(key, _)| key.as_str() != "error")
        .map(|(key, value)| {
            let value = match key.as_str() {
                "post" => match value {
                    Value::Object(post) => Value::Object(strip_post(post)),
                    other => other.clone(),
                },
                "posts" | "duplicates" => shape_each(value, strip_post),
                "comments" => shape_each(value, strip_comment),
                _ => value.clone(),
            };
            (key.clone(), value)
        })
        .collect();

    Value::Object(shaped)
}

/// Shape a whole envelope, dropping its `error`.
pub fn shape_envelope(envelope: &Envelope) -> ShapedEnvelope {
    ShapedEnvelope {
        data: strip_response(&envelope.data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_strip_post_basic() {
        let post = obj(json!({
            "id": "abc123",
            "title": "Test Post",
            "body": "Content here",
            "author": {"name": "user1", "flair": {"text": "flair"}},
            "score": 100,
            "subreddit": "rust",
            "permalink": "/r/rust/comments/abc123",
            "extra_field": "should be removed",
            "awards": [{"name": "Gold"}]
        }));

        let result = strip_post(&post);

        assert_eq!(result["id"], "abc123");
        assert_eq!(result["title"], "Test Post");
        assert_eq!(result["body"], "Content here");
        assert_eq!(result["author"], "user1");
        assert_eq!(result["score"], 100);
        assert_eq!(result["subreddit"], "rust");
        assert!(!result.contains_key("extra_field"));
        assert!(!result.contains_key("awards"));
    }

    #[test]
    fn test_strip_post_only_whitelisted_keys() {
        let post = obj(json!({
            "id": "1",
            "title": "t",
            "gallery": [],
            "media": {"height": 10},
            "ws_url": "wss://",
            "nsfw": false,
            "num_comments": 4
        }));

        let result = strip_post(&post);

        assert!(result.keys().all(|k| NodeKind::Post.keeps(k)));
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_strip_post_string_author_kept() {
        let post = obj(json!({"id": "1", "author": "already_a_name"}));
        assert_eq!(strip_post(&post)["author"], "already_a_name");
    }

    #[test]
    fn test_strip_post_author_without_name_is_null() {
        let post = obj(json!({"id": "1", "author": {"flair": "x"}}));
        assert_eq!(strip_post(&post)["author"], Value::Null);
    }

    #[test]
    fn test_strip_post_does_not_synthesize() {
        let post = obj(json!({"id": "1"}));
        let result = strip_post(&post);
        assert_eq!(result.len(), 1);
        assert!(!result.contains_key("author"));
    }

    #[test]
    fn test_strip_comment_basic() {
        let comment = obj(json!({
            "id": "xyz789",
            "body": "A comment",
            "author": {"name": "commenter", "flair": {"text": "mod"}},
            "score": 50,
            "created": "1234567890",
            "kind": "t1",
            "post_link": "/r/rust/comments/abc123",
            "prefs": {"show_nsfw": true},
            "replies": []
        }));

        let result = strip_comment(&comment);

        assert_eq!(result["id"], "xyz789");
        assert_eq!(result["body"], "A comment");
        assert_eq!(result["author"], "commenter");
        assert_eq!(result["score"], 50);
        assert_eq!(result["kind"], "t1");
        assert!(!result.contains_key("post_link"));
        assert!(!result.contains_key("prefs"));
        assert_eq!(result["replies"], json!([]));
    }

    #[test]
    fn test_strip_comment_nested_replies() {
        let comment = obj(json!({
            "id": "parent",
            "body": "Parent",
            "author": {"name": "user1"},
            "kind": "t1",
            "replies": [
                {
                    "id": "child",
                    "body": "Child",
                    "author": {"name": "user2"},
                    "post_link": "should be removed",
                    "replies": [
                        {"id": "grandchild", "author": {"name": "user3"}, "prefs": {}},
                        {"id": "grandchild2", "author": {"name": "user4"}}
                    ]
                }
            ]
        }));

        let result = strip_comment(&comment);

        assert_eq!(result["author"], "user1");
        let replies = result["replies"].as_array().unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0]["author"], "user2");
        assert!(replies[0].get("post_link").is_none());

        let grandchildren = replies[0]["replies"].as_array().unwrap();
        assert_eq!(grandchildren.len(), 2);
        assert_eq!(grandchildren[0]["author"], "user3");
        assert!(grandchildren[0].get("prefs").is_none());
        assert_eq!(grandchildren[1]["author"], "user4");
    }

    #[test]
    fn test_strip_comment_absent_replies_not_synthesized() {
        let comment = obj(json!({"id": "c1", "body": "leaf"}));
        assert!(!strip_comment(&comment).contains_key("replies"));
    }

    #[test]
    fn test_strip_comment_non_array_replies_passes_through() {
        let comment = obj(json!({"id": "c1", "replies": ""}));
        assert_eq!(strip_comment(&comment)["replies"], "");
    }

    #[test]
    fn test_strip_response_full() {
        let data = json!({
            "post": {
                "id": "abc123",
                "title": "Test",
                "author": {"name": "poster"},
                "extra": "gone"
            },
            "comments": [
                {
                    "id": "c1",
                    "body": "Hi",
                    "author": {"name": "commenter"},
                    "post_link": "removed",
                    "replies": []
                }
            ],
            "after": "cursor123",
            "error": null
        });

        let result = strip_response(&data);

        assert_eq!(result["post"]["id"], "abc123");
        assert_eq!(result["post"]["author"], "poster");
        assert!(result["post"].get("extra").is_none());
        assert_eq!(result["comments"][0]["author"], "commenter");
        assert!(result["comments"][0].get("post_link").is_none());
        assert_eq!(result["after"], "cursor123");
        assert!(result.get("error").is_none());
    }

    #[test]
    fn test_strip_response_listing_posts() {
        let data = json!({
            "subreddit": {"name": "rust"},
            "posts": [{"title": "Hello Rust", "id": "123", "author": {"name": "user1"}, "awards": []}],
            "after": "abc123"
        });

        assert_eq!(
            strip_response(&data),
            json!({
                "subreddit": {"name": "rust"},
                "posts": [{"title": "Hello Rust", "id": "123", "author": "user1"}],
                "after": "abc123"
            })
        );
    }

    #[test]
    fn test_strip_response_duplicates() {
        let data = json!({
            "post": {"id": "abc123", "title": "Test", "author": {"name": "poster"}},
            "duplicates": [{"id": "xyz789", "title": "Dup", "author": {"name": "other"}, "media": {}}]
        });

        assert_eq!(
            strip_response(&data),
            json!({
                "post": {"id": "abc123", "title": "Test", "author": "poster"},
                "duplicates": [{"id": "xyz789", "title": "Dup", "author": "other"}]
            })
        );
    }

    #[test]
    fn test_strip_response_unknown_keys_pass_through() {
        let data = json!({
            "subreddit": "rust",
            "wiki_page": "index",
            "content": "# Wiki content",
            "user": {"name": "spez", "karma": 1}
        });

        assert_eq!(strip_response(&data), data);
    }

    #[test]
    fn test_strip_response_null() {
        assert_eq!(strip_response(&Value::Null), Value::Null);
    }

    #[test]
    fn test_shape_envelope_drops_error() {
        let envelope: Envelope = serde_json::from_value(json!({
            "data": {"post": {"id": "abc123", "title": "Test", "author": {"name": "poster"}, "extra": "gone"}},
            "error": null
        }))
        .unwrap();

        let shaped = serde_json::to_value(shape_envelope(&envelope)).unwrap();

        assert_eq!(
            shaped,
            json!({"data": {"post": {"id": "abc123", "title": "Test", "author": "poster"}}})
        );
    }

    #[test]
    fn test_shape_envelope_ignores_upstream_error() {
        let envelope: Envelope = serde_json::from_value(json!({
            "data": null,
            "error": "Subreddit not found"
        }))
        .unwrap();

        assert_eq!(
            serde_json::to_value(shape_envelope(&envelope)).unwrap(),
            json!({"data": null})
        );
    }

    #[test]
    fn test_envelope_missing_keys_default_to_null() {
        let envelope: Envelope = serde_json::from_value(json!({})).unwrap();
        assert_eq!(envelope.data, Value::Null);
        assert_eq!(shape_envelope(&envelope).data, Value::Null);
    }
}
