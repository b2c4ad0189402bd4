mod reddit;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// Re-export types needed by tool handlers
pub use super::{JsonRpcError, Tool};

// MCP Protocol types for tools
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
pub struct ToolsCapability {}

#[derive(Debug, Serialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ToolsList {
    pub tools: Vec<Tool>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

pub fn handle_initialize() -> Result<serde_json::Value, JsonRpcError> {
    let result = InitializeResult {
        protocol_version: "2024-11-05".to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {}),
        },
        server_info: ServerInfo {
            name: "redlib-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    serde_json::to_value(result).map_err(internal_error)
}

pub fn handle_tools_list() -> Result<serde_json::Value, JsonRpcError> {
    let tools = vec![
        Tool {
            name: "get_subreddit".to_string(),
            description: "List posts from a subreddit through Redlib. Accepts a bare name ('rust'), an 'r/rust' path, or a full Reddit URL. Returns posts trimmed to user-facing fields, plus an 'after' cursor for the next page.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "subreddit": {
                        "type": "string",
                        "description": "Subreddit name, r/ path, or URL"
                    },
                    "sort": {
                        "type": "string",
                        "description": "Sort order: hot, new, top, rising, controversial (default: hot)"
                    },
                    "time": {
                        "type": "string",
                        "description": "Time window for top/controversial: hour, day, week, month, year, all"
                    },
                    "after": {
                        "type": "string",
                        "description": "Pagination cursor from a previous response"
                    }
                },
                "required": ["subreddit"]
            }),
        },
        Tool {
            name: "get_post".to_string(),
            description: "Read a Reddit post and its comment tree. Accepts a post ID ('abc123'), a '/comments/...' path, or a full Reddit URL. Pass comment_id to focus on one comment thread.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "post": {
                        "type": "string",
                        "description": "Post ID, permalink, or URL"
                    },
                    "comment_id": {
                        "type": "string",
                        "description": "Comment ID to focus the thread on (optional)"
                    }
                },
                "required": ["post"]
            }),
        },
        Tool {
            name: "get_user".to_string(),
            description: "Read a Reddit user's profile listing. Accepts a username, a 'u/name' or 'user/name' path, or a profile URL.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "user": {
                        "type": "string",
                        "description": "Username, u/ path, or URL"
                    },
                    "listing": {
                        "type": "string",
                        "description": "Listing to read: overview, submitted, comments (default: overview)"
                    },
                    "after": {
                        "type": "string",
                        "description": "Pagination cursor from a previous response"
                    }
                },
                "required": ["user"]
            }),
        },
        Tool {
            name: "search_reddit".to_string(),
            description: "Search Reddit posts through Redlib, either site-wide or restricted to one subreddit.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search terms"
                    },
                    "subreddit": {
                        "type": "string",
                        "description": "Restrict the search to this subreddit (optional)"
                    },
                    "after": {
                        "type": "string",
                        "description": "Pagination cursor from a previous response"
                    }
                },
                "required": ["query"]
            }),
        },
        Tool {
            name: "get_wiki".to_string(),
            description: "Read a subreddit wiki page.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "subreddit": {
                        "type": "string",
                        "description": "Subreddit name, r/ path, or URL"
                    },
                    "page": {
                        "type": "string",
                        "description": "Wiki page name (default: index)"
                    }
                },
                "required": ["subreddit"]
            }),
        },
        Tool {
            name: "get_duplicates".to_string(),
            description: "List other submissions of the same link as a post. Accepts the same post identifiers as get_post.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "post": {
                        "type": "string",
                        "description": "Post ID, permalink, or URL"
                    }
                },
                "required": ["post"]
            }),
        },
    ];

    let result = ToolsList { tools };

    serde_json::to_value(result).map_err(internal_error)
}

pub async fn handle_tools_call(
    params: Option<serde_json::Value>,
    ctx: &crate::Context,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: CallToolParams = serde_json::from_value(params.unwrap_or(serde_json::Value::Null))
        .map_err(|e| JsonRpcError {
            code: -32602,
            message: format!("Invalid params: {e}"),
            data: None,
        })?;

    match params.name.as_str() {
        "get_subreddit" => reddit::handle_get_subreddit(params.arguments, ctx).await,
        "get_post" => reddit::handle_get_post(params.arguments, ctx).await,
        "get_user" => reddit::handle_get_user(params.arguments, ctx).await,
        "search_reddit" => reddit::handle_search_reddit(params.arguments, ctx).await,
        "get_wiki" => reddit::handle_get_wiki(params.arguments, ctx).await,
        "get_duplicates" => reddit::handle_get_duplicates(params.arguments, ctx).await,
        _ => Err(JsonRpcError {
            code: -32602,
            message: format!("Unknown tool: {}", params.name),
            data: None,
        }),
    }
}

fn parse_arguments<T: DeserializeOwned>(
    arguments: Option<serde_json::Value>,
) -> Result<T, JsonRpcError> {
    serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null)).map_err(|e| JsonRpcError {
        code: -32602,
        message: format!("Invalid arguments: {e}"),
        data: None,
    })
}

fn execution_error(e: impl std::fmt::Display) -> JsonRpcError {
    JsonRpcError {
        code: -32603,
        message: format!("Tool execution error: {e}"),
        data: None,
    }
}

fn internal_error(e: impl std::fmt::Display) -> JsonRpcError {
    JsonRpcError {
        code: -32603,
        message: format!("Internal error: {e}"),
        data: None,
    }
}

/// Wrap a serializable payload as pretty-printed JSON text content.
fn text_result<T: Serialize>(payload: &T) -> Result<serde_json::Value, JsonRpcError> {
    let json_string = serde_json::to_string_pretty(payload).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Serialization error: {e}"),
        data: None,
    })?;

    let result = CallToolResult {
        content: vec![Content::Text { text: json_string }],
        is_error: None,
    };

    serde_json::to_value(result).map_err(internal_error)
}
