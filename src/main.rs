use actix_web::{web, App, HttpServer};
use snapmorph::server::{self, AppState};
use snapmorph::{Config, ReplicateClient};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = snapmorph::logger::init() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    // Merge .env before resolving the environment; values already set in
    // the environment are never overwritten.
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    let config = Config::from_env();

    // Missing credential is fatal: print the setup instructions and stop
    // before any interactive surface exists.
    let token = match config.resolve_token() {
        Ok(token) => {
            log::info!("✅ API token loaded successfully");
            token
        }
        Err(e) => {
            log::error!("❌ {} not found!", snapmorph::config::TOKEN_VAR);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    snapmorph::logger::log_startup_info(
        "snapmorph",
        env!("CARGO_PKG_VERSION"),
        &config.server.host,
        config.server.port,
    );
    log::info!("🤖 Model: {}", config.replicate.model);

    let state = web::Data::new(AppState {
        client: ReplicateClient::new(token, config.replicate.model.clone()),
    });

    let bind = (config.server.host.clone(), config.server.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().limit(server::JSON_PAYLOAD_LIMIT))
            .configure(server::routes)
    })
    .bind(bind)?
    .run()
    .await
}
