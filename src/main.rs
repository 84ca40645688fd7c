use actix_web::{middleware::Logger, web, App, HttpServer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod api;
mod auth;
mod config;
mod db;
mod entities;
mod error;
mod models;
mod services;

use config::Config;
use db::create_postgres_pool;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().expect("Failed to load configuration");

    log::info!(
        "Starting server on {}:{}",
        config.server.host,
        config.server.port
    );
    let pool = create_postgres_pool(&config)
        .await
        .expect("Failed to create Postgres pool");

    log::info!("Database connection established");

    let openapi = api::ApiDoc::openapi();

    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(pool.clone()))
            .route(
                "/api/docs",
                web::get().to(|| async {
                    actix_web::HttpResponse::PermanentRedirect()
                        .append_header(("Location", "/api/docs/"))
                        .finish()
                }),
            )
            .service(
                SwaggerUi::new("/api/docs/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            .service(
                web::scope("/api")
                    .route("/signup", web::post().to(api::auth::signup))
                    .route("/login", web::post().to(api::auth::login))
                    .route("/timeline", web::get().to(api::messages::timeline))
                    .service(
                        web::scope("/users")
                            .route("", web::get().to(api::users::list_users))
                            .route("/profile", web::patch().to(api::users::update_profile))
                            .route("/delete", web::post().to(api::users::delete_account))
                            .route(
                                "/follow/{user_id}",
                                web::post().to(api::users::follow_user),
                            )
                            .route(
                                "/stop-following/{user_id}",
                                web::post().to(api::users::stop_following),
                            )
                            .route(
                                "/add_like/{message_id}",
                                web::post().to(api::users::add_like),
                            )
                            .route(
                                "/delete_like/{message_id}",
                                web::post().to(api::users::delete_like),
                            )
                            .route("/{user_id}", web::get().to(api::users::show_user))
                            .route(
                                "/{user_id}/following",
                                web::get().to(api::users::list_following),
                            )
                            .route(
                                "/{user_id}/followers",
                                web::get().to(api::users::list_followers),
                            )
                            .route("/{user_id}/likes", web::get().to(api::users::list_likes)),
                    )
                    .service(
                        web::scope("/messages")
                            .route("/new", web::post().to(api::messages::create_message))
                            .route(
                                "/{message_id}",
                                web::get().to(api::messages::show_message),
                            )
                            .route(
                                "/{message_id}/delete",
                                web::post().to(api::messages::delete_message),
                            ),
                    ),
            )
    })
    .bind(format!("{}:{}", server_host, server_port))?
    .run()
    .await
}
