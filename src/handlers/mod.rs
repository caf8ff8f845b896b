pub mod auth_handlers;
pub mod category_handlers;
pub mod comment_handlers;
pub mod health;
pub mod post_handlers;
pub mod static_handlers;
pub mod upload_handlers;
