mod model;
mod server;

use tracing_subscriber::EnvFilter;

use crate::server::{
    config::Config,
    error::AppError,
    router,
    service::{auth::JwtKeys, mail::Mailer, notifier::NotificationHub},
    startup,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    startup::check_for_admin(&db, &config).await?;

    let mailer = Mailer::new(config.smtp.as_ref(), config.frontend_origin.clone())?;
    let state = AppState::new(
        db,
        JwtKeys::new(&config.jwt_secret),
        NotificationHub::new(),
        mailer,
    );

    let app = router::router(&config).with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
