mod config;
mod db;
mod dtos;
mod error;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod services;
mod validation;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use deadpool_postgres::Pool;
use log::{error, info};

use crate::handlers::auth_handlers::{login, me, register};
use crate::handlers::category_handlers::{create_category, list_categories};
use crate::handlers::comment_handlers::{create_comment, list_comments};
use crate::handlers::health::health;
use crate::handlers::post_handlers::{
    create_post, delete_post, get_post, like_post, list_posts, unlike_post, update_post,
};
use crate::handlers::static_handlers::{asset, index};
use crate::handlers::upload_handlers::{serve_upload, upload_image};
use crate::middleware::rate_limit::{RateLimit, RateLimitConfig};
use crate::services::auth_services::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub pg_pool: Pool,
    pub upload_dir: String,
    pub static_dir: String,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    dotenv::dotenv().ok();

    let app_config = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let pg_pool = match config::get_pg_pool() {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to create PG pool: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = db::init_schema(&pg_pool).await {
        error!("Failed to initialize schema: {}", e);
        std::process::exit(1);
    }

    let auth_service = AuthService::new(
        app_config.jwt_secret.clone(),
        app_config.token_ttl_hours,
    );
    let auth_data = web::Data::new(auth_service);

    let state = web::Data::new(AppState {
        pg_pool,
        upload_dir: app_config.upload_dir.clone(),
        static_dir: app_config.static_dir.clone(),
    });

    let rate_limit = RateLimit::new(RateLimitConfig {
        req_per_second: app_config.rate_limit_per_second,
        burst_size: app_config.rate_limit_burst,
    });

    let allowed_origins = app_config.allowed_origins.clone();
    let bind_address = app_config.bind_address.clone();

    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                "authorization",
                "content-type",
                "accept",
                "x-requested-with",
            ])
            .supports_credentials()
            .max_age(3600);

        for origin in allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
        {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(auth_data.clone())
            .service(
                web::scope("/api")
                    .wrap(rate_limit.clone())
                    .service(
                        web::scope("/auth")
                            .service(register) // POST /api/auth/register
                            .service(login) // POST /api/auth/login
                            .service(me), // GET  /api/auth/me
                    )
                    .service(
                        web::scope("/posts")
                            .service(list_posts) // GET    /api/posts
                            .service(create_post) // POST   /api/posts
                            .service(like_post) // POST   /api/posts/{id}/like
                            .service(unlike_post) // POST   /api/posts/{id}/unlike
                            .service(get_post) // GET    /api/posts/{id}
                            .service(update_post) // PUT    /api/posts/{id}
                            .service(delete_post), // DELETE /api/posts/{id}
                    )
                    .service(
                        web::scope("/comments")
                            .service(list_comments) // GET  /api/comments/post/{post_id}
                            .service(create_comment), // POST /api/comments/post/{post_id}
                    )
                    .service(
                        web::scope("/categories")
                            .service(list_categories) // GET  /api/categories
                            .service(create_category), // POST /api/categories
                    )
                    .service(upload_image), // POST /api/upload
            )
            .service(health) // GET /health
            .service(serve_upload) // GET /uploads/{filename}
            .service(index) // GET /
            .service(asset) // GET /static/{filename}
    })
    .bind(&bind_address)?
    .run()
    .await
}
