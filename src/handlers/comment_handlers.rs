use actix_web::{HttpResponse, get, post, web};
use uuid::Uuid;

use crate::AppState;
use crate::dtos::comment::CommentIn;
use crate::error::AppError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::repositories::comment_repository::CommentRepository;
use crate::repositories::post_repository::PostRepository;
use crate::validation::validate_comment;

#[get("/post/{post_id}")]
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let comments = CommentRepository::list_by_post(&state.pg_pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}

#[post("/post/{post_id}")]
pub async fn create_comment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<CommentIn>,
) -> Result<HttpResponse, AppError> {
    let errors = validate_comment(&body);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    let post_id = path.into_inner();
    PostRepository::find(&state.pg_pool, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;
    let comment =
        CommentRepository::create(&state.pg_pool, post_id, user.user_id, &body.content).await?;
    Ok(HttpResponse::Created().json(comment))
}
