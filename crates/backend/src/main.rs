use agro_backend::routes::configure_routes;
use agro_backend::shared::config::load_config;
use agro_backend::shared::data::db::initialize_database;
use agro_backend::state::AppState;
use agro_backend::system::auth::jwt::{resolve_secret, JwtSettings};
use agro_backend::system::middleware::request_logger::request_logger;
use agro_backend::system::{self, users};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};

    let (config, config_source) = load_config()?;
    system::tracing::initialize(&config.logging)?;
    tracing::info!("Configuration loaded from {}", config_source);

    let db = initialize_database(&config.database).await?;

    let secret = resolve_secret(&db, config.auth.jwt_secret.as_deref()).await?;
    let jwt = JwtSettings::new(secret, config.auth.token_lifetime_hours);

    users::service::ensure_bootstrap_admin(&db, &config.auth).await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let app = configure_routes(AppState::new(db, jwt))
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let addr = format!("{}:{}", config.server.host, config.server.port);

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: {} is already in use. Please ensure no other process is using this port.",
                    addr
                );
            } else {
                tracing::error!("Failed to bind to {}. Error: {}", addr, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
