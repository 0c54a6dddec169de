use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;

use taskboard::auth::google::GoogleOAuth;
use taskboard::auth::{AuthMiddleware, TokenIssuer};
use taskboard::config::Config;
use taskboard::email::Mailer;
use taskboard::{error, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    // Store connection failure at startup is fatal: fail fast, no retry.
    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let issuer = TokenIssuer::new(&config);
    let mailer = Mailer::new(&config);
    let google = config.google.clone().map(GoogleOAuth::new);
    let addr = config.server_addr();

    log::info!("Starting server at http://{}:{}", addr.0, addr.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(issuer.clone()))
            .app_data(web::Data::new(mailer.clone()))
            .app_data(web::Data::new(google.clone()))
            .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
            .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
            // Wraps execute in reverse registration order: the gate runs
            // innermost, after CORS has answered any preflight.
            .wrap(AuthMiddleware)
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .service(routes::health::index)
            .service(routes::health::health)
            .configure(routes::config)
    })
    .bind(addr)?
    .run()
    .await
}
