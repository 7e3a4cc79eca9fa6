use askama::Template;

use crate::errors::{AppError, AppResult};

/// Upload form served on `GET /`.
#[derive(Template)]
#[template(path = "index.html")]
pub struct UploadFormPage {
    pub max_file_size: u64,
    pub expiration_hours: u64,
    pub accepted_suffixes: String,
}

/// Confirmation shown to browsers after a successful upload.
#[derive(Template)]
#[template(path = "uploaded.html")]
pub struct UploadedPage<'a> {
    pub share_url: &'a str,
    pub expires: &'a str,
    pub file_name: &'a str,
}

pub fn render<T: Template>(page: &T) -> AppResult<String> {
    page.render()
        .map_err(|e| AppError::Internal(format!("template rendering failed: {}", e)))
}
