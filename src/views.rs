//! askama page templates. Sources live in `templates/`.

use askama::Template;
use axum::response::{Html, IntoResponse, Response};
use base64::Engine;

use crate::error::PestError;
use crate::inference::Prediction;

pub const APP_TITLE: &str = "Pest Detection System";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeKind {
    pub fn css(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Info => "info",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub title: &'static str,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub title: &'static str,
    pub notice: Option<Notice>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub title: &'static str,
    pub notice: Option<Notice>,
}

#[derive(Template)]
#[template(path = "detect.html")]
pub struct DetectPage {
    pub title: &'static str,
    pub username: String,
    pub accept: String,
    pub notice: Option<Notice>,
    pub upload: Option<UploadView>,
}

/// The uploaded picture plus what the model made of it.
pub struct UploadView {
    pub filename: String,
    pub data_uri: String,
    /// Predicted class, then confidence.
    pub results: Vec<Notice>,
    pub remedies: Vec<&'static str>,
}

impl UploadView {
    pub fn new(filename: &str, bytes: &[u8], prediction: &Prediction) -> Self {
        let mime = image::guess_format(bytes)
            .map(|f| f.to_mime_type())
            .unwrap_or("application/octet-stream");
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self {
            filename: filename.to_string(),
            data_uri: format!("data:{mime};base64,{encoded}"),
            results: vec![
                Notice::success(format!("Prediction: {}", prediction.class.name())),
                Notice::info(format!("Confidence: {}", prediction.confidence_label())),
            ],
            remedies: prediction.class.remedies().to_vec(),
        }
    }
}

/// Render a template into an HTML response.
pub fn render<T: Template>(page: &T) -> Result<Response, PestError> {
    Ok(Html(page.render()?).into_response())
}
