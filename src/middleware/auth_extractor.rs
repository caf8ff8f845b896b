use actix_web::{Error, FromRequest, HttpRequest, dev::Payload, web};
use futures::future::{Ready, ready};
use log::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::Role;
use crate::services::auth_services::AuthService;

/// Requester identity derived from a validated bearer token.
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: Role,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<AuthenticatedUser, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;
    let header = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid header format".into()))?;

    if !header.starts_with("Bearer ") {
        return Err(AppError::Unauthorized("Invalid auth header format".into()).into());
    }
    let token = header.trim_start_matches("Bearer ").trim();

    let svc = req
        .app_data::<web::Data<AuthService>>()
        .ok_or_else(|| AppError::Internal("AuthService not registered".into()))?;

    let claims = svc.decode_token(token).map_err(|e| {
        debug!("token rejected: {}", e);
        AppError::Unauthorized("Invalid token".into())
    })?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid token".into()))?;

    Ok(AuthenticatedUser {
        user_id,
        role: Role::parse(&claims.role),
    })
}
