use std::path::Path;

use actix_multipart::Multipart;
use actix_web::{HttpResponse, get, post, web};
use futures::StreamExt;
use log::info;
use uuid::Uuid;

use crate::AppState;
use crate::dtos::upload_dtos::UploadOut;
use crate::error::AppError;

const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

fn extension_for(content_type: &mime::Mime) -> Option<&'static str> {
    if content_type.type_() != mime::IMAGE {
        return None;
    }
    match content_type.subtype().as_str() {
        "jpeg" | "jpg" => Some("jpg"),
        "png" => Some("png"),
        "gif" => Some("gif"),
        "webp" => Some("webp"),
        _ => None,
    }
}

/// POST /api/upload — multipart field `image`, stored under the upload dir
/// with a random name; responds with the relative URL.
#[post("/upload")]
pub async fn upload_image(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {e}")))?;
        if field.name() != Some("image") {
            continue;
        }

        let ext = field
            .content_type()
            .and_then(extension_for)
            .ok_or_else(|| {
                AppError::BadRequest(
                    "Invalid file type. Only JPEG, PNG, GIF, and WEBP are allowed.".into(),
                )
            })?;

        let mut data: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::BadRequest(format!("Upload interrupted: {e}")))?;
            if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::BadRequest("File too large (max 5 MB)".into()));
            }
            data.extend_from_slice(&chunk);
        }

        std::fs::create_dir_all(&state.upload_dir)?;
        let filename = format!("{}.{}", Uuid::new_v4(), ext);
        let file_path = format!("{}/{}", state.upload_dir, filename);
        std::fs::write(&file_path, &data)?;
        info!("stored upload {} ({} bytes)", file_path, data.len());

        return Ok(HttpResponse::Created().json(UploadOut {
            image_url: format!("/uploads/{}", filename),
        }));
    }

    Err(AppError::BadRequest("No file uploaded".into()))
}

/// GET /uploads/{filename} — serve a stored image.
#[get("/uploads/{filename}")]
pub async fn serve_upload(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let filename = path.into_inner();
    let safe_filename = crate::handlers::static_handlers::safe_name(&filename);

    let file_path = format!("{}/{}", state.upload_dir, safe_filename);
    let data = std::fs::read(&file_path)
        .map_err(|_| AppError::NotFound("File not found".into()))?;

    let content_type = match Path::new(safe_filename)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };

    Ok(HttpResponse::Ok().content_type(content_type).body(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_known_image_types_map_to_extensions() {
        assert_eq!(extension_for(&mime::IMAGE_JPEG), Some("jpg"));
        assert_eq!(extension_for(&mime::IMAGE_PNG), Some("png"));
        assert_eq!(extension_for(&mime::IMAGE_GIF), Some("gif"));
        assert_eq!(extension_for(&mime::TEXT_PLAIN), None);
        assert_eq!(extension_for(&mime::APPLICATION_OCTET_STREAM), None);
    }

    #[test]
    fn webp_is_accepted() {
        let webp: mime::Mime = "image/webp".parse().unwrap();
        assert_eq!(extension_for(&webp), Some("webp"));
    }

    #[actix_web::test]
    async fn serve_upload_stays_inside_the_upload_dir() {
        use actix_web::{App, http::StatusCode, test, web};

        let dir = std::env::temp_dir().join(format!("inkpost-uploads-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("shot.png"), b"\x89PNG").unwrap();
        // sits one level above the upload dir and must stay unreachable
        let outside = format!("outside-{}.png", Uuid::new_v4());
        std::fs::write(dir.parent().unwrap().join(&outside), b"\x89PNG").unwrap();

        let mut cfg = deadpool_postgres::Config::new();
        cfg.host = Some("localhost".into());
        cfg.user = Some("unused".into());
        cfg.dbname = Some("unused".into());
        let pool = cfg
            .create_pool(
                Some(deadpool_postgres::Runtime::Tokio1),
                tokio_postgres::NoTls,
            )
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState {
                    pg_pool: pool,
                    upload_dir: dir.to_string_lossy().into_owned(),
                    static_dir: "static".into(),
                }))
                .service(serve_upload),
        )
        .await;

        let ok = test::call_service(
            &app,
            test::TestRequest::get().uri("/uploads/shot.png").to_request(),
        )
        .await;
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(ok.headers().get("content-type").unwrap(), "image/png");

        // percent-encoded traversal collapses to a basename lookup inside
        // the upload dir, where no such file exists
        let sneaky = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/uploads/..%2F{outside}"))
                .to_request(),
        )
        .await;
        assert_eq!(sneaky.status(), StatusCode::NOT_FOUND);

        std::fs::remove_dir_all(&dir).unwrap();
        std::fs::remove_file(std::env::temp_dir().join(&outside)).unwrap();
    }
}
