pub mod auth_dtos;
pub mod category_dtos;
pub mod comment_dtos;
pub mod post_dtos;
pub mod upload_dtos;
// alias so call sites can use `crate::dtos::auth` / `crate::dtos::post`
pub use auth_dtos as auth;
pub use comment_dtos as comment;
pub use post_dtos as post;
