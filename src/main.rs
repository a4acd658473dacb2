use std::sync::Arc;

use axum::http::HeaderValue;
use gymdesk::{
    gym::repository::PostgresGymRepository,
    invitation::repository::PostgresInvitationRepository,
    member::repository::PostgresMemberRepository,
    session::{HttpAuthApi, SessionAuthenticator},
    workout::repository::PostgresWorkoutRepository,
    AppConfig, AppStateBuilder, RouterOptions,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gymdesk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting gym management server");

    let config = AppConfig::from_env()?;

    let http_client = reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()?;

    let tokens = config.token_config();
    if tokens.uses_default_secret() {
        warn!("AUTH_JWT_SECRET not set, using the development default");
    }
    let auth_api = Arc::new(HttpAuthApi::new(http_client.clone(), config.auth.clone()));
    let authenticator = SessionAuthenticator::new(auth_api, tokens)
        .with_refresh_cookie_max_age(config.refresh_cookie_max_age);

    let mut builder = AppStateBuilder::new(Arc::new(authenticator))
        .with_session_gate(config.session_gate())
        .with_cookie_options(config.cookie_options())
        .with_content_config(config.content.clone())
        .with_assistant_config(config.assistant.clone())
        .with_http_client(http_client);

    // Easy to switch between implementations: Postgres when configured, in-memory otherwise
    match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::PgPool::connect(database_url).await?;
            info!("Connected to database");
            builder = builder
                .with_gym_repository(Arc::new(PostgresGymRepository::new(pool.clone())))
                .with_member_repository(Arc::new(PostgresMemberRepository::new(pool.clone())))
                .with_invitation_repository(Arc::new(PostgresInvitationRepository::new(
                    pool.clone(),
                )))
                .with_workout_repository(Arc::new(PostgresWorkoutRepository::new(pool)));
        }
        None => warn!("DATABASE_URL not set, using in-memory repositories"),
    }

    let allowed_origin = config
        .allowed_origin
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()?;

    let app = gymdesk::app(
        builder.build(),
        RouterOptions {
            static_dir: config.static_dir.clone(),
            allowed_origin,
        },
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
