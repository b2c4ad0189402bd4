//! OpenID Connect gating for the HTTP transport
//!
//! Settings come from `ACCESS_*` environment variables (Cloudflare Access
//! style). When the client credentials are absent, auth is disabled. This
//! module decides settings and builds the OAuth metadata documents; fetching
//! the discovery document and validating tokens happens in the shell.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const CLIENT_ID_VAR: &str = "ACCESS_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "ACCESS_CLIENT_SECRET";
pub const TEAM_NAME_VAR: &str = "ACCESS_TEAM_NAME";
pub const CONFIG_URL_VAR: &str = "ACCESS_CONFIG_URL";
pub const SERVER_URL_VAR: &str = "MCP_SERVER_URL";

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("ACCESS_CLIENT_ID and ACCESS_CLIENT_SECRET are set but neither ACCESS_TEAM_NAME nor ACCESS_CONFIG_URL is")]
    MissingDiscoverySource,

    #[error("discovery document has neither jwks_uri nor userinfo_endpoint to validate tokens against")]
    NoTokenValidation,
}

/// Resolved OIDC settings.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessSettings {
    pub client_id: String,
    pub discovery_url: String,
    pub server_url: String,
}

impl std::fmt::Debug for AccessSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessSettings")
            .field("client_id", &self.client_id)
            .field("discovery_url", &self.discovery_url)
            .field("server_url", &self.server_url)
            .finish()
    }
}

impl AccessSettings {
    /// Build settings from a variable lookup (usually `std::env::var`).
    ///
    /// Returns `Ok(None)` when the client credentials are not both present.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let (Some(client_id), Some(_secret)) =
            (non_empty(CLIENT_ID_VAR), non_empty(CLIENT_SECRET_VAR))
        else {
            return Ok(None);
        };

        let discovery_url = match (non_empty(CONFIG_URL_VAR), non_empty(TEAM_NAME_VAR)) {
            (Some(url), _) => url,
            (None, Some(team)) => discovery_url_for_team(&team, &client_id),
            (None, None) => return Err(AuthError::MissingDiscoverySource),
        };

        let server_url = non_empty(SERVER_URL_VAR)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        Ok(Some(Self {
            client_id,
            discovery_url,
            server_url,
        }))
    }

    /// Public URL of the MCP endpoint guarded by these settings.
    pub fn resource_url(&self) -> String {
        format!("{}/mcp", self.server_url)
    }

    pub fn protected_resource_metadata_url(&self) -> String {
        format!("{}/.well-known/oauth-protected-resource", self.server_url)
    }
}

/// Cloudflare Access per-application discovery document location.
pub fn discovery_url_for_team(team: &str, client_id: &str) -> String {
    format!(
        "https://{team}.cloudflareaccess.com/cdn-cgi/access/sso/oidc/{client_id}/.well-known/openid-configuration"
    )
}

/// The subset of an OpenID discovery document we use.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OidcDiscovery {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    #[serde(default)]
    pub userinfo_endpoint: Option<String>,
    #[serde(default)]
    pub jwks_uri: Option<String>,
    #[serde(default)]
    pub response_types_supported: Vec<String>,
    #[serde(default)]
    pub grant_types_supported: Vec<String>,
    #[serde(default)]
    pub scopes_supported: Vec<String>,
    #[serde(default)]
    pub code_challenge_methods_supported: Vec<String>,
}

/// How bearer tokens are checked against the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenValidation<'a> {
    /// Verify the JWT signature locally against the provider's key set.
    Jwks(&'a str),
    /// Ask the provider: a 2xx from userinfo means the token is good.
    Userinfo(&'a str),
}

impl OidcDiscovery {
    /// Prefer local JWT verification, fall back to the userinfo endpoint.
    pub fn token_validation(&self) -> Result<TokenValidation<'_>, AuthError> {
        match (self.jwks_uri.as_deref(), self.userinfo_endpoint.as_deref()) {
            (Some(jwks_uri), _) => Ok(TokenValidation::Jwks(jwks_uri)),
            (None, Some(userinfo)) => Ok(TokenValidation::Userinfo(userinfo)),
            (None, None) => Err(AuthError::NoTokenValidation),
        }
    }
}

fn or_default(values: &[String], default: &[&str]) -> Vec<String> {
    if values.is_empty() {
        default.iter().map(|s| s.to_string()).collect()
    } else {
        values.to_vec()
    }
}

/// RFC 8414 authorization server metadata derived from discovery.
pub fn authorization_server_metadata(discovery: &OidcDiscovery) -> Value {
    let mut metadata = json!({
        "issuer": discovery.issuer,
        "authorization_endpoint": discovery.authorization_endpoint,
        "token_endpoint": discovery.token_endpoint,
        "response_types_supported": or_default(&discovery.response_types_supported, &["code"]),
        "grant_types_supported": or_default(
            &discovery.grant_types_supported,
            &["authorization_code", "refresh_token"],
        ),
        "code_challenge_methods_supported": or_default(
            &discovery.code_challenge_methods_supported,
            &["S256"],
        ),
    });

    if let Some(jwks_uri) = &discovery.jwks_uri {
        metadata["jwks_uri"] = json!(jwks_uri);
    }
    if !discovery.scopes_supported.is_empty() {
        metadata["scopes_supported"] = json!(discovery.scopes_supported);
    }

    metadata
}

/// RFC 9728 protected resource metadata for the MCP endpoint.
pub fn protected_resource_metadata(settings: &AccessSettings, discovery: &OidcDiscovery) -> Value {
    json!({
        "resource": settings.resource_url(),
        "authorization_servers": [discovery.issuer],
        "bearer_methods_supported": ["header"],
    })
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// `WWW-Authenticate` value sent with 401 responses.
pub fn www_authenticate(settings: &AccessSettings) -> String {
    format!(
        "Bearer resource_metadata=\"{}\"",
        settings.protected_resource_metadata_url()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn discovery() -> OidcDiscovery {
        serde_json::from_value(json!({
            "issuer": "https://test-team.cloudflareaccess.com",
            "authorization_endpoint": "https://test-team.cloudflareaccess.com/cdn-cgi/access/sso/oidc/authorize",
            "token_endpoint": "https://test-team.cloudflareaccess.com/cdn-cgi/access/sso/oidc/token",
            "jwks_uri": "https://test-team.cloudflareaccess.com/cdn-cgi/access/certs",
            "userinfo_endpoint": "https://test-team.cloudflareaccess.com/cdn-cgi/access/sso/oidc/userinfo",
            "response_types_supported": ["code"],
            "subject_types_supported": ["public"],
            "id_token_signing_alg_values_supported": ["RS256"]
        }))
        .unwrap()
    }

    #[test]
    fn test_from_lookup_disabled_without_credentials() {
        assert_eq!(AccessSettings::from_lookup(lookup(&[])).unwrap(), None);
        assert_eq!(
            AccessSettings::from_lookup(lookup(&[(CLIENT_ID_VAR, "id")])).unwrap(),
            None
        );
    }

    #[test]
    fn test_from_lookup_team_name() {
        let settings = AccessSettings::from_lookup(lookup(&[
            (CLIENT_ID_VAR, "test-client-id"),
            (CLIENT_SECRET_VAR, "test-secret"),
            (TEAM_NAME_VAR, "test-team"),
            (SERVER_URL_VAR, "http://localhost:8000/"),
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(settings.client_id, "test-client-id");
        assert_eq!(
            settings.discovery_url,
            "https://test-team.cloudflareaccess.com/cdn-cgi/access/sso/oidc/test-client-id/.well-known/openid-configuration"
        );
        assert_eq!(settings.server_url, "http://localhost:8000");
        assert_eq!(settings.resource_url(), "http://localhost:8000/mcp");
    }

    #[test]
    fn test_from_lookup_explicit_config_url_wins() {
        let settings = AccessSettings::from_lookup(lookup(&[
            (CLIENT_ID_VAR, "id"),
            (CLIENT_SECRET_VAR, "secret"),
            (TEAM_NAME_VAR, "team"),
            (CONFIG_URL_VAR, "https://idp.example.com/.well-known/openid-configuration"),
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(
            settings.discovery_url,
            "https://idp.example.com/.well-known/openid-configuration"
        );
        assert_eq!(settings.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_from_lookup_missing_discovery_source() {
        let err = AccessSettings::from_lookup(lookup(&[
            (CLIENT_ID_VAR, "id"),
            (CLIENT_SECRET_VAR, "secret"),
        ]))
        .unwrap_err();

        assert_eq!(err, AuthError::MissingDiscoverySource);
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let settings = AccessSettings::from_lookup(lookup(&[
            (CLIENT_ID_VAR, "id"),
            (CLIENT_SECRET_VAR, "super-secret"),
            (TEAM_NAME_VAR, "team"),
        ]))
        .unwrap()
        .unwrap();

        assert!(!format!("{settings:?}").contains("super-secret"));
    }

    #[test]
    fn test_authorization_server_metadata() {
        let metadata = authorization_server_metadata(&discovery());

        assert_eq!(metadata["issuer"], "https://test-team.cloudflareaccess.com");
        assert!(metadata.get("authorization_endpoint").is_some());
        assert!(metadata.get("token_endpoint").is_some());
        assert_eq!(metadata["response_types_supported"], json!(["code"]));
        assert_eq!(metadata["code_challenge_methods_supported"], json!(["S256"]));
        assert_eq!(
            metadata["jwks_uri"],
            "https://test-team.cloudflareaccess.com/cdn-cgi/access/certs"
        );
        assert!(metadata.get("scopes_supported").is_none());
    }

    #[test]
    fn test_protected_resource_metadata() {
        let settings = AccessSettings {
            client_id: "id".to_string(),
            discovery_url: "unused".to_string(),
            server_url: "https://mcp.example.com".to_string(),
        };

        let metadata = protected_resource_metadata(&settings, &discovery());

        assert_eq!(metadata["resource"], "https://mcp.example.com/mcp");
        assert_eq!(
            metadata["authorization_servers"],
            json!(["https://test-team.cloudflareaccess.com"])
        );
    }

    #[test]
    fn test_token_validation_prefers_jwks() {
        let mut doc = discovery();
        assert_eq!(
            doc.token_validation(),
            Ok(TokenValidation::Jwks(
                "https://test-team.cloudflareaccess.com/cdn-cgi/access/certs"
            ))
        );

        doc.jwks_uri = None;
        assert_eq!(
            doc.token_validation(),
            Ok(TokenValidation::Userinfo(
                "https://test-team.cloudflareaccess.com/cdn-cgi/access/sso/oidc/userinfo"
            ))
        );

        doc.userinfo_endpoint = None;
        assert_eq!(doc.token_validation(), Err(AuthError::NoTokenValidation));
    }

    #[test]
    fn test_token_validation_jwks_only_document() {
        let doc: OidcDiscovery = serde_json::from_value(json!({
            "issuer": "https://test-team.cloudflareaccess.com",
            "authorization_endpoint": "https://test-team.cloudflareaccess.com/cdn-cgi/access/sso/oidc/authorize",
            "token_endpoint": "https://test-team.cloudflareaccess.com/cdn-cgi/access/sso/oidc/token",
            "jwks_uri": "https://test-team.cloudflareaccess.com/cdn-cgi/access/certs",
            "response_types_supported": ["code"],
            "subject_types_supported": ["public"],
            "id_token_signing_alg_values_supported": ["RS256"]
        }))
        .unwrap();

        assert!(matches!(doc.token_validation(), Ok(TokenValidation::Jwks(_))));
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer  abc "), Some("abc"));
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
    }

    #[test]
    fn test_www_authenticate() {
        let settings = AccessSettings {
            client_id: "id".to_string(),
            discovery_url: "unused".to_string(),
            server_url: "http://localhost:8000".to_string(),
        };

        assert_eq!(
            www_authenticate(&settings),
            "Bearer resource_metadata=\"http://localhost:8000/.well-known/oauth-protected-resource\""
        );
    }
}
