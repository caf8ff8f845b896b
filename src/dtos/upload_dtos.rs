use serde::Serialize;

/// Relative URL of a stored image, served under `/uploads`.
#[derive(Debug, Serialize)]
pub struct UploadOut {
    pub image_url: String,
}
