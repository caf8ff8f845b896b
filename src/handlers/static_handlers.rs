use std::path::Path;

use actix_web::{HttpResponse, get, web};

use crate::AppState;
use crate::error::AppError;

/// Strip any directory components from a requested filename so lookups can
/// never leave the serving directory.
pub(crate) fn safe_name(filename: &str) -> &str {
    Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("invalid")
}

/// GET / — single-page client shell.
#[get("/")]
pub async fn index(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let body = std::fs::read(format!("{}/index.html", state.static_dir))
        .map_err(|_| AppError::NotFound("Client not built".into()))?;
    Ok(HttpResponse::Ok()
        .content_type(mime::TEXT_HTML_UTF_8)
        .body(body))
}

/// GET /static/{filename} — client assets.
#[get("/static/{filename}")]
pub async fn asset(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let filename = path.into_inner();
    let safe_filename = safe_name(&filename);

    let file_path = format!("{}/{}", state.static_dir, safe_filename);
    let data = std::fs::read(&file_path)
        .map_err(|_| AppError::NotFound("File not found".into()))?;

    let content_type = match Path::new(safe_filename)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    };

    Ok(HttpResponse::Ok().content_type(content_type).body(data))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};
    use uuid::Uuid;

    use super::*;

    #[test]
    async fn traversal_names_are_stripped_to_the_basename() {
        assert_eq!(safe_name("../../etc/passwd"), "passwd");
        assert_eq!(safe_name("/etc/shadow"), "shadow");
        assert_eq!(safe_name("app.js"), "app.js");
        assert_eq!(safe_name(".."), "invalid");
        assert_eq!(safe_name(""), "invalid");
    }

    // Lazy pool: nothing connects until a handler asks for a client, which
    // these handlers never do.
    fn dummy_pool() -> deadpool_postgres::Pool {
        let mut cfg = deadpool_postgres::Config::new();
        cfg.host = Some("localhost".into());
        cfg.user = Some("unused".into());
        cfg.dbname = Some("unused".into());
        cfg.create_pool(
            Some(deadpool_postgres::Runtime::Tokio1),
            tokio_postgres::NoTls,
        )
        .unwrap()
    }

    fn temp_static_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("inkpost-static-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[actix_web::test]
    async fn index_serves_the_client_shell() {
        let dir = temp_static_dir();
        std::fs::write(dir.join("index.html"), "<!doctype html>").unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState {
                    pg_pool: dummy_pool(),
                    upload_dir: "uploads".into(),
                    static_dir: dir.to_string_lossy().into_owned(),
                }))
                .service(index),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[actix_web::test]
    async fn asset_serves_known_files_and_404s_the_rest() {
        let dir = temp_static_dir();
        std::fs::write(dir.join("app.js"), "console.log(1)").unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState {
                    pg_pool: dummy_pool(),
                    upload_dir: "uploads".into(),
                    static_dir: dir.to_string_lossy().into_owned(),
                }))
                .service(asset),
        )
        .await;

        let ok = test::call_service(
            &app,
            test::TestRequest::get().uri("/static/app.js").to_request(),
        )
        .await;
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(
            ok.headers().get("content-type").unwrap(),
            "application/javascript; charset=utf-8"
        );

        let missing = test::call_service(
            &app,
            test::TestRequest::get().uri("/static/missing.css").to_request(),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
