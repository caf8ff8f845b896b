use actix_web::{HttpResponse, get, post, web};
use log::info;

use crate::AppState;
use crate::dtos::auth::{AuthOut, LoginIn, RegisterIn};
use crate::error::AppError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::repositories::user_repository::UserRepository;
use crate::services::auth_services::AuthService;
use crate::validation::validate_register;

#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    svc: web::Data<AuthService>,
    body: web::Json<RegisterIn>,
) -> Result<HttpResponse, AppError> {
    let errors = validate_register(&body);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let hash = svc.hash_password(&body.password)?;
    let user = UserRepository::create(
        &state.pg_pool,
        body.username.trim(),
        body.email.trim(),
        &hash,
    )
    .await?;
    info!("registered user {}", user.username);

    let token = svc.issue_token(&user)?;
    Ok(HttpResponse::Created().json(AuthOut {
        token,
        user: user.to_public(),
    }))
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    svc: web::Data<AuthService>,
    body: web::Json<LoginIn>,
) -> Result<HttpResponse, AppError> {
    let user = UserRepository::find_by_email(&state.pg_pool, body.email.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

    if !svc.verify_password(&body.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let token = svc.issue_token(&user)?;
    Ok(HttpResponse::Ok().json(AuthOut {
        token,
        user: user.to_public(),
    }))
}

#[get("/me")]
pub async fn me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = UserRepository::find_by_id(&state.pg_pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(HttpResponse::Ok().json(user.to_public()))
}
