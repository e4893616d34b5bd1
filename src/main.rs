mod api;
mod config;
mod database;
mod jobs;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{middleware::Compress, middleware::Logger, web, App, HttpServer};
use config::AppConfig;
use database::JsonStore;
use dotenv::dotenv;
use services::{HttpMediaFetcher, MediaCache};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("❌ {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    let to_io = |e: utils::AppError| std::io::Error::new(std::io::ErrorKind::Other, e.to_string());

    log::info!("🚀 Starting Feed Mockup Service...");
    log::info!("📂 Data directory: {}", config.data_dir.display());
    if config.google.client_id.is_none() {
        log::warn!("⚠️ GOOGLE_CLIENT_ID not set, sign-in is disabled");
    }

    let store = JsonStore::new(&config.data_dir);
    store.ensure_dir().await.map_err(to_io)?;

    let fetcher = HttpMediaFetcher::new(config.cache.max_download_bytes).map_err(to_io)?;
    let cache = MediaCache::new(&config.cache_dir, Arc::new(fetcher), config.cache.max_age);
    cache.initialize().await.map_err(to_io)?;

    // 🧹 Start cache cleanup
    log::info!("📅 Starting background jobs...");
    jobs::cache_cleanup::start_cache_cleanup(cache.clone(), config.cache.sweep_interval).await;
    log::info!("✅ Background jobs started");

    let bind_address = config.bind_address();
    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);
    log::info!("📄 OpenAPI spec at: http://{}/api-docs/openapi.json", bind_address);

    let serve_client = config.static_dir.is_dir();
    if !serve_client {
        log::warn!("⚠️ Static client directory {} not found, serving API only", config.static_dir.display());
    }

    let store_data = web::Data::new(store);
    let cache_data = web::Data::new(cache);
    let config_data = web::Data::new(config);

    // Start HTTP server
    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_origin("http://localhost:3001")
            .allowed_origin("http://localhost:5500")
            .allowed_origin("http://127.0.0.1:5500")
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);
        if let Some(client_url) = &config_data.client_url {
            cors = cors.allowed_origin(client_url);
        }

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        let cache_root = cache_data.root().to_path_buf();
        let static_dir = config_data.static_dir.clone();

        App::new()
            .app_data(store_data.clone())
            .app_data(cache_data.clone())
            .app_data(config_data.clone())
            .app_data(api::json_config(config_data.json_limit))
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(middleware::RequestMetrics)
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi),
            )
            .configure(api::routes)
            // Cached media
            .service(Files::new(services::cache_service::PUBLIC_PREFIX, cache_root))
            // Browser client, mounted last so it never shadows the API
            .configure(move |cfg| {
                if serve_client {
                    cfg.service(Files::new("/", static_dir).index_file("index.html"));
                }
            })
    })
    .bind(bind_address)?
    .run()
    .await
}
