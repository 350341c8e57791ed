use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};

use quiz_admin::{app_state::AppState, config::Config, db::Database, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    if !cfg!(debug_assertions) {
        config.validate_for_production();
    }

    let db = Database::connect(&config)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let state = AppState::new(config.clone(), &db)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let state = web::Data::new(Arc::new(state));

    log::info!(
        "Starting admin front-end on http://{}:{}",
        config.web_server_host,
        config.web_server_port
    );

    let result = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .bind((config.web_server_host.as_str(), config.web_server_port))?
    .run()
    .await;

    log::info!("Server stopped, closing the store connection");
    db.shutdown().await;

    result
}
