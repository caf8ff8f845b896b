pub mod category_repository;
pub mod comment_repository;
pub mod post_repository;
pub mod user_repository;
