//! Bearer-token gating for the HTTP transport.
//!
//! The discovery document is fetched once at startup. Tokens are verified as
//! JWTs against the provider's key set when it publishes `jwks_uri`, otherwise
//! by asking its userinfo endpoint. The key set is fetched on first use and
//! refreshed when a token names a key we have not seen.

use crate::prelude::*;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use jsonwebtoken::{jwk::JwkSet, Algorithm, DecodingKey, Validation};
use redlib_mcp_core::auth::{
    authorization_server_metadata, bearer_token, protected_resource_metadata, www_authenticate,
    AccessSettings, OidcDiscovery, TokenValidation,
};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug)]
enum Validator {
    Jwks {
        uri: String,
        keys: RwLock<Option<JwkSet>>,
    },
    Userinfo(String),
}

#[derive(Debug)]
pub struct AuthState {
    pub settings: AccessSettings,
    pub discovery: OidcDiscovery,
    validator: Validator,
    http: reqwest::Client,
}

impl AuthState {
    /// Returns `Ok(None)` when the `ACCESS_*` credentials are not configured.
    pub async fn from_env() -> Result<Option<Self>> {
        let Some(settings) = AccessSettings::from_lookup(|key| std::env::var(key).ok())? else {
            return Ok(None);
        };

        Self::discover(settings).await.map(Some)
    }

    pub async fn discover(settings: AccessSettings) -> Result<Self> {
        let http = reqwest::Client::new();

        log::info!("Fetching OIDC discovery from {}", settings.discovery_url);

        let response = http
            .get(&settings.discovery_url)
            .send()
            .await
            .map_err(|e| eyre!("Failed to fetch OIDC discovery document: {e}"))?;

        if !response.status().is_success() {
            return Err(eyre!(
                "OIDC discovery returned HTTP {} from {}",
                response.status().as_u16(),
                settings.discovery_url
            ));
        }

        let discovery: OidcDiscovery = response
            .json()
            .await
            .map_err(|e| eyre!("Invalid OIDC discovery document: {e}"))?;

        let validator = match discovery.token_validation()? {
            TokenValidation::Jwks(uri) => Validator::Jwks {
                uri: uri.to_string(),
                keys: RwLock::new(None),
            },
            TokenValidation::Userinfo(endpoint) => Validator::Userinfo(endpoint.to_string()),
        };

        Ok(Self {
            settings,
            discovery,
            validator,
            http,
        })
    }

    pub async fn validate(&self, token: &str) -> bool {
        let outcome = match &self.validator {
            Validator::Jwks { uri, keys } => self.verify_jwt(uri, keys, token).await,
            Validator::Userinfo(endpoint) => self.ask_userinfo(endpoint, token).await,
        };

        match outcome {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Token rejected: {e}");
                false
            }
        }
    }

    /// Signature, `exp`, issuer and audience (our client id) must all check out.
    async fn verify_jwt(&self, uri: &str, keys: &RwLock<Option<JwkSet>>, token: &str) -> Result<()> {
        let header = jsonwebtoken::decode_header(token)?;

        if matches!(header.alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(eyre!("symmetric JWT algorithm {:?} not accepted", header.alg));
        }

        let key = self.signing_key(uri, keys, header.kid.as_deref()).await?;

        let mut validation = Validation::new(header.alg);
        validation.set_issuer(&[&self.discovery.issuer]);
        validation.set_audience(&[&self.settings.client_id]);

        jsonwebtoken::decode::<serde_json::Value>(token, &key, &validation)?;

        Ok(())
    }

    async fn signing_key(
        &self,
        uri: &str,
        keys: &RwLock<Option<JwkSet>>,
        kid: Option<&str>,
    ) -> Result<DecodingKey> {
        let cached = {
            let guard = keys.read().await;
            find_key(guard.as_ref(), kid)?
        };
        if let Some(key) = cached {
            return Ok(key);
        }

        log::debug!("Fetching JWKS from {uri}");

        let fresh: JwkSet = self
            .http
            .get(uri)
            .send()
            .await
            .map_err(|e| eyre!("Failed to fetch JWKS: {e}"))?
            .error_for_status()
            .map_err(|e| eyre!("JWKS request failed: {e}"))?
            .json()
            .await
            .map_err(|e| eyre!("Invalid JWKS document: {e}"))?;

        let key = find_key(Some(&fresh), kid)?;
        *keys.write().await = Some(fresh);

        key.ok_or_else(|| eyre!("No JWKS key matches kid {kid:?}"))
    }

    async fn ask_userinfo(&self, endpoint: &str, token: &str) -> Result<()> {
        let response = self
            .http
            .get(endpoint)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| eyre!("Userinfo request failed: {e}"))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(eyre!("userinfo returned HTTP {}", response.status().as_u16()))
        }
    }
}

/// Key named by `kid`, or the first key when the token names none.
fn find_key(set: Option<&JwkSet>, kid: Option<&str>) -> Result<Option<DecodingKey>> {
    let Some(set) = set else {
        return Ok(None);
    };

    let jwk = match kid {
        Some(kid) => set.find(kid),
        None => set.keys.first(),
    };

    Ok(jwk.map(DecodingKey::from_jwk).transpose()?)
}

fn unauthorized(auth: &AuthState) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, www_authenticate(&auth.settings))],
        Json(serde_json::json!({"error": "unauthorized"})),
    )
        .into_response()
}

pub async fn require_bearer(
    State(auth): State<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_string);

    let Some(token) = token else {
        return unauthorized(&auth);
    };

    if !auth.validate(&token).await {
        log::debug!("Rejected bearer token for {}", request.uri().path());
        return unauthorized(&auth);
    }

    next.run(request).await
}

async fn authorization_server(State(auth): State<Arc<AuthState>>) -> Json<serde_json::Value> {
    Json(authorization_server_metadata(&auth.discovery))
}

async fn protected_resource(State(auth): State<Arc<AuthState>>) -> Json<serde_json::Value> {
    Json(protected_resource_metadata(&auth.settings, &auth.discovery))
}

/// OAuth metadata routes. Left open so clients can find the login flow.
pub fn well_known_router(auth: Arc<AuthState>) -> Router {
    Router::new()
        .route(
            "/.well-known/oauth-authorization-server",
            get(authorization_server),
        )
        .route(
            "/.well-known/oauth-protected-resource",
            get(protected_resource),
        )
        .with_state(auth)
}
