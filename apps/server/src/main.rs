//! Botnest server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use botnest_lib::config::Config;
use botnest_lib::services::{BotService, ScriptFlavor, reply};
use botnest_lib::{api, cli, db, middleware};

/// Perform health check (for Docker healthcheck).
fn health_check() -> bool {
    Config::from_env().is_ok()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        std::process::exit(if health_check() { 0 } else { 1 });
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - SUPABASE_URL and SUPABASE_KEY must be set (or BOTNEST_STORE=memory in development)");
            error!("  - BOTNEST_REPLY=chat requires OPEN_ROUTER_API_KEY");
            error!("  - BOTNEST_REPLY=inference requires HF_API_TOKEN");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Botnest Server");
    info!("  Environment: {}", config.environment);
    info!("  Store: {}", config.store.kind());
    info!("  Reply strategy: {}", config.reply.kind());
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    // Build the store client and reply strategy once, before serving
    let store = match db::connect(&config.store) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to initialize record store: {}", e);
            std::process::exit(1);
        }
    };
    let reply = match reply::from_settings(&config.reply) {
        Ok(reply) => reply,
        Err(e) => {
            error!("Failed to initialize reply strategy: {}", e);
            std::process::exit(1);
        }
    };
    let bots = BotService::new(store, reply, ScriptFlavor::for_reply(&config.reply));
    info!("Record store and reply strategy initialized");

    if config.cli_mode {
        info!("CLI mode enabled, reading commands from stdin");
        actix_web::rt::spawn(cli::run_stdin(bots.clone()));
    }

    let bind_address = config.bind_address();
    let is_development = config.is_development();

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (2 workers - development mode)",
            bind_address
        );
        2
    } else {
        let cpus = num_cpus::get();
        info!("Starting server at http://{} ({} workers)", bind_address, cpus);
        cpus
    };

    let bots = web::Data::new(bots);

    HttpServer::new(move || {
        // The explore page and bot widgets call the endpoint from other origins
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(middleware::RequestLogger)
            .app_data(bots.clone())
            .service(
                web::scope("/api/v1")
                    .configure(api::configure_health_routes)
                    .configure(api::configure_bot_routes),
            )
            // Path used by deployed bot pages
            .service(web::resource("/.netlify/functions/bot").to(api::bots::handle_bot))
            .configure(api::configure_explore_routes)
            .service(
                SwaggerUi::new("/api/v1/docs/{_:.*}")
                    .url("/api/v1/openapi.json", api::ApiDoc::openapi()),
            )
    })
    .workers(worker_count)
    .bind(&bind_address)?
    .run()
    .await
}
