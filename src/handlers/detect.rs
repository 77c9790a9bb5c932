use axum::{
    extract::{Multipart, State},
    response::Response,
};
use tracing::{info, warn};

use crate::error::PestError;
use crate::inference::preprocess::ALLOWED_EXTENSIONS;
use crate::middleware::SessionUser;
use crate::router::PestState;
use crate::views::{APP_TITLE, DetectPage, Notice, UploadView, render};

/// Multipart field carrying the picture.
pub const IMAGE_FIELD: &str = "image";

fn page(username: String, notice: Option<Notice>, upload: Option<UploadView>) -> DetectPage {
    let accept = ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");
    DetectPage {
        title: APP_TITLE,
        username,
        accept,
        notice,
        upload,
    }
}

/// GET /detect
pub async fn detect_form(SessionUser(username): SessionUser) -> Result<Response, PestError> {
    render(&page(username, None, None))
}

/// POST /detect -> classify the uploaded picture and show remedies.
pub async fn detect_submit(
    State(state): State<PestState>,
    SessionUser(username): SessionUser,
    mut multipart: Multipart,
) -> Result<Response, PestError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        upload = Some((filename, bytes.to_vec()));
    }

    let Some((filename, bytes)) = upload.filter(|(_, b)| !b.is_empty()) else {
        return render(&page(
            username,
            Some(Notice::warning("Please choose an image to upload")),
            None,
        ));
    };

    info!(username = %username, file = %filename, bytes = bytes.len(), "image uploaded");

    match state.models.classify(&filename, bytes.clone()).await {
        Ok(prediction) => {
            let view = UploadView::new(&filename, &bytes, &prediction);
            render(&page(username, None, Some(view)))
        }
        Err(PestError::UnsupportedImage(_)) => render(&page(
            username,
            Some(Notice::error(format!(
                "Unsupported file type. Allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            ))),
            None,
        )),
        Err(PestError::ImageDecode(e)) => {
            warn!(file = %filename, error = %e, "upload is not a readable image");
            render(&page(
                username,
                Some(Notice::error("The uploaded file could not be read as an image")),
                None,
            ))
        }
        Err(e) => Err(e),
    }
}
