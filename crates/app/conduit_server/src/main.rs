//! Conduit API server binary.
//!
//! Connects to PostgreSQL, runs migrations, loads the signing key and serves
//! the login / current-user API until Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use conduit_api::config::{ApiConfig, parse_token_ttl};
use conduit_core::auth::jwt::TokenService;
use conduit_core::auth::password::{PasswordScheme, dummy_password, hash_password};
use conduit_core::auth::queries::upsert_credentials;
use conduit_core::models::auth::NewCredentials;
use conduit_core::store::PgCredentialStore;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "conduit_server", about = "Conduit API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    bind_addr: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/conduit"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// JWT signing secret. Takes precedence over `--jwt-secret-file`.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// File containing the JWT signing secret.
    #[arg(long, env = "JWT_SECRET_FILE")]
    jwt_secret_file: Option<PathBuf>,

    /// Token lifetime in seconds; 0 issues tokens that never expire.
    #[arg(long, env = "TOKEN_TTL_SECS", default_value = "0")]
    token_ttl_secs: String,

    /// Scheme the stored password hashes use (`sha512` or `bcrypt`).
    #[arg(long, env = "PASSWORD_SCHEME", default_value = "sha512")]
    password_scheme: PasswordScheme,

    /// Insert (or reset) the demo user jake@jake.jake / jakejake at startup.
    #[arg(long, default_value_t = false)]
    seed_demo_user: bool,
}

/// Upsert the demo account used by the conduit walkthrough.
async fn seed_demo_user(
    pool: &PgPool,
    scheme: PasswordScheme,
) -> Result<(), Box<dyn std::error::Error>> {
    let stored = hash_password(scheme, "jakejake")?;
    let creds = NewCredentials {
        email: "jake@jake.jake".into(),
        username: "jake".into(),
        bio: Some("I work at statefarm".into()),
        image: None,
        password_hash: stored.hash,
        password_salt: stored.salt,
    };
    let user_id = upsert_credentials(pool, &creds).await?;
    info!(%user_id, "seeded demo user");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,conduit_api=debug,conduit_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    let config = ApiConfig {
        bind_addr: args.bind_addr,
        pg_connection_url: args.database_url,
        jwt_secret: args.jwt_secret,
        jwt_secret_file: args.jwt_secret_file,
        token_ttl: parse_token_ttl(&args.token_ttl_secs)?,
        password_scheme: args.password_scheme,
    };

    // Key problems are fatal before anything is served.
    let signing_key = config.signing_key()?;
    let tokens = TokenService::new(&signing_key);
    match config.token_ttl {
        Some(ttl) => info!(ttl_secs = ttl.num_seconds(), "issuing expiring tokens"),
        None => warn!("TOKEN_TTL_SECS unset: issuing tokens that never expire"),
    }

    info!(
        max_connections = args.max_connections,
        password_scheme = %config.password_scheme,
        "configuring connection pool"
    );
    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&config.pg_connection_url)
        .await?;

    info!("running database migrations");
    conduit_api::migrate(&pool).await?;

    if args.seed_demo_user {
        seed_demo_user(&pool, config.password_scheme).await?;
    }

    // Hash the unknown-email dummy now rather than on the first failed login.
    let scheme = config.password_scheme;
    if tokio::task::spawn_blocking(move || dummy_password(scheme).is_none()).await? {
        warn!("could not prepare dummy password hash");
    }

    let store = Arc::new(PgCredentialStore::new(pool));
    let state = conduit_api::AppState::new(store, tokens, config.clone());
    let app = conduit_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
