use crate::prelude::{eprintln, *};
use crate::Context;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use super::auth::{self, AuthState};
use super::cli::HttpOptions;

pub async fn run_http(options: HttpOptions, ctx: Context) -> Result<()> {
    let auth = AuthState::from_env().await?.map(Arc::new);

    match &auth {
        Some(auth) => log::info!(
            "OIDC auth enabled, issuer {}",
            auth.discovery.issuer
        ),
        None => log::info!("OIDC auth disabled, MCP endpoints are open"),
    }

    let addr = format!("{}:{}", options.host, options.port);
    let verbose = ctx.verbose;

    if verbose {
        eprintln!("Starting MCP server with HTTP transport on {addr}...");
        eprintln!("Redlib base: {}", ctx.client.base_url());
    }

    let app_router = router(Arc::new(ctx), auth);

    if verbose {
        eprintln!("MCP server listening on http://{addr}");
        eprintln!("MCP endpoint: http://{addr}/mcp");
        eprintln!("SSE endpoint: http://{addr}/sse");
        eprintln!("Message endpoint: http://{addr}/message");
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    axum::serve(listener, app_router)
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

/// MCP routes, gated by `auth` when present, plus the OAuth metadata routes.
pub fn router(ctx: Arc<Context>, auth: Option<Arc<AuthState>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app_router = Router::new()
        .route("/mcp", post(message_handler))
        .route("/message", post(message_handler))
        .route("/sse", get(sse_handler))
        .with_state(ctx);

    if let Some(state) = auth {
        app_router = app_router
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_bearer,
            ))
            .merge(auth::well_known_router(state));
    }

    app_router.layer(cors)
}

async fn sse_handler(
    State(_ctx): State<Arc<Context>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = stream::once(async { Ok(Event::default().data("MCP SSE endpoint ready")) });
    Sse::new(stream)
}

// The raw body goes straight to the dispatcher so malformed JSON becomes a
// JSON-RPC parse error instead of an HTTP rejection.
async fn message_handler(State(ctx): State<Arc<Context>>, body: String) -> Response {
    match super::handle_request(&body, &ctx).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
