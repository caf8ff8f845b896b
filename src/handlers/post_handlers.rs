use actix_web::{HttpResponse, delete, get, post, put, web};
use log::info;
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use crate::dtos::post::{LikeOut, ListPostsQuery, PostIn, PostPage};
use crate::error::AppError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::repositories::post_repository::{PostFilter, PostRepository};
use crate::validation::validate_post;

#[get("")]
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse, AppError> {
    let page = query.page();
    let limit = query.limit();
    let filter = PostFilter {
        search: query.search.clone(),
        category: query.category.clone(),
    };
    let (posts, total) = PostRepository::list(&state.pg_pool, &filter, page, limit).await?;
    Ok(HttpResponse::Ok().json(PostPage::new(posts, total, page, limit)))
}

#[get("/{id}")]
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let post = PostRepository::get(&state.pg_pool, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;
    Ok(HttpResponse::Ok().json(post))
}

#[post("")]
pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<PostIn>,
) -> Result<HttpResponse, AppError> {
    let errors = validate_post(&body);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    let created = PostRepository::create(&state.pg_pool, user.user_id, &body).await?;
    info!("post {} created by {}", created.id, user.user_id);
    Ok(HttpResponse::Created().json(created))
}

#[put("/{id}")]
pub async fn update_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<PostIn>,
) -> Result<HttpResponse, AppError> {
    let errors = validate_post(&body);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    let id = path.into_inner();
    let post = PostRepository::find(&state.pg_pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;
    if !post.can_modify(user.user_id, user.role) {
        return Err(AppError::Forbidden(
            "You are not authorized to update this post".into(),
        ));
    }
    let updated = PostRepository::update(&state.pg_pool, id, &body).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/{id}")]
pub async fn delete_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let post = PostRepository::find(&state.pg_pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;
    if !post.can_modify(user.user_id, user.role) {
        return Err(AppError::Forbidden(
            "You are not authorized to delete this post".into(),
        ));
    }
    // comments referencing this post are kept
    PostRepository::delete(&state.pg_pool, id).await?;
    info!("post {} deleted by {}", id, user.user_id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Post deleted" })))
}

#[post("/{id}/like")]
pub async fn like_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    PostRepository::find(&state.pg_pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;
    match PostRepository::like(&state.pg_pool, id, user.user_id).await? {
        Some(likes) => Ok(HttpResponse::Ok().json(LikeOut {
            message: "Post liked",
            likes,
        })),
        None => Err(AppError::BadRequest("You already liked this post".into())),
    }
}

#[post("/{id}/unlike")]
pub async fn unlike_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    PostRepository::find(&state.pg_pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;
    match PostRepository::unlike(&state.pg_pool, id, user.user_id).await? {
        Some(likes) => Ok(HttpResponse::Ok().json(LikeOut {
            message: "Post unliked",
            likes,
        })),
        None => Err(AppError::BadRequest("You have not liked this post".into())),
    }
}
