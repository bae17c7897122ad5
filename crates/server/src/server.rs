use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::headers::{
    Authorization, HeaderMapExt,
    authorization::{Basic, Bearer},
};
use jsonwebtoken::{DecodingKey, Validation};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{categories, expenses, summary, user};
use ledger::{Caller, Ledger};

/// Transport half of the identity strategies: how requests authenticate.
///
/// The matching [`ledger::IdentityMode`] decides what the resolved
/// credential means; this only decides what the middleware does with the
/// HTTP headers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    /// No credential handling at all.
    Open,
    /// Verify `Authorization: Bearer` tokens (HS256) when present.
    Bearer,
    /// Check `Authorization: Basic` credentials against the users table.
    Session,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub mode: AuthMode,
    /// Shared HS256 secret; required in bearer mode.
    pub secret: Option<String>,
}

#[derive(Clone)]
pub struct ServerState {
    pub ledger: Arc<Ledger>,
    pub db: DatabaseConnection,
    pub auth: AuthConfig,
}

fn verify_bearer(
    auth: &AuthConfig,
    token: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, StatusCode> {
    let Some(secret) = auth.secret.as_deref() else {
        tracing::error!("bearer mode enabled without a secret");
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    };

    let data = jsonwebtoken::decode::<serde_json::Map<String, serde_json::Value>>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;

    Ok(data.claims)
}

async fn check_credentials(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<String, StatusCode> {
    if username.is_empty() || password.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let found: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .filter(user::Column::Password.eq(password))
        .one(db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    match found {
        Some(user) => Ok(user.username),
        None => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn auth(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let caller = match state.auth.mode {
        AuthMode::Open => Caller::anonymous(),
        AuthMode::Bearer => match request.headers().typed_get::<Authorization<Bearer>>() {
            Some(header) => Caller::with_claims(verify_bearer(&state.auth, header.token())?),
            // An absent token still reaches the ledger, which reports the
            // missing credential itself.
            None => Caller::anonymous(),
        },
        AuthMode::Session => {
            let header = request
                .headers()
                .typed_get::<Authorization<Basic>>()
                .ok_or(StatusCode::UNAUTHORIZED)?;
            let username =
                check_credentials(&state.db, header.username(), header.password()).await?;
            Caller::with_session_user(username)
        }
    };

    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/expenses", post(expenses::add).get(expenses::list))
        .route("/summary", get(summary::get_summary))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .route("/categories", get(categories::list))
        .with_state(state)
}

pub async fn run(ledger: Ledger, db: DatabaseConnection, auth: AuthConfig) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(ledger, db, auth, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    ledger: Ledger,
    db: DatabaseConnection,
    auth: AuthConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        ledger: Arc::new(ledger),
        db,
        auth,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    ledger: Ledger,
    db: DatabaseConnection,
    auth: AuthConfig,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(ledger, db, auth, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
