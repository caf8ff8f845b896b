use actix_web::{HttpResponse, get, post, web};

use crate::AppState;
use crate::dtos::category_dtos::CategoryIn;
use crate::error::AppError;
use crate::repositories::category_repository::CategoryRepository;
use crate::validation::validate_category_name;

#[get("")]
pub async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let categories = CategoryRepository::list(&state.pg_pool).await?;
    Ok(HttpResponse::Ok().json(categories))
}

#[post("")]
pub async fn create_category(
    state: web::Data<AppState>,
    body: web::Json<CategoryIn>,
) -> Result<HttpResponse, AppError> {
    let errors = validate_category_name(&body.name);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    let category = CategoryRepository::create(&state.pg_pool, body.name.trim()).await?;
    Ok(HttpResponse::Created().json(category))
}
