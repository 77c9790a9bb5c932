#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use axum_extra::extract::cookie::Key;
use image::{ImageFormat, Rgb, RgbImage};
use pest_detect::PestError;
use pest_detect::config::ModelConfig;
use pest_detect::db::UsersStorage;
use pest_detect::inference::preprocess::ImageTensor;
use pest_detect::inference::{ModelCache, NUM_CLASSES, PestModel};
use pest_detect::router::{PestState, pest_router};
use pest_detect::service::{AccountService, PasswordScheme};
use sqlx::sqlite::SqlitePoolOptions;
use std::io::Cursor;
use std::sync::Arc;
use tower::ServiceExt;

pub const BOUNDARY: &str = "pest-detect-test-boundary";

/// Always answers with the same score vector.
pub struct FixedModel(pub Vec<f32>);

impl PestModel for FixedModel {
    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>, PestError> {
        assert_eq!(input.shape(), [1, 8, 8, 3]);
        Ok(self.0.clone())
    }
}

pub fn peaked_scores(index: usize, peak: f32) -> Vec<f32> {
    let rest = (1.0 - peak) / (NUM_CLASSES as f32 - 1.0);
    (0..NUM_CLASSES)
        .map(|i| if i == index { peak } else { rest })
        .collect()
}

pub async fn test_app(scores: Vec<f32>, max_upload_bytes: usize) -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory sqlite");
    let storage = UsersStorage::new(pool);
    storage.init_schema().await.expect("schema init failed");

    let accounts = AccountService::new(storage, PasswordScheme::Sha256);
    let settings = ModelConfig {
        input_size: 8,
        ..ModelConfig::default()
    };
    let models = ModelCache::preloaded(Arc::new(FixedModel(scores)), settings);
    let state = PestState::new(accounts, models, Key::generate(), true, max_upload_bytes);
    pest_router(state)
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::empty()).expect("failed to build request")
}

pub fn multipart_request(filename: &str, bytes: &[u8], cookie: Option<&str>) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method("POST")
        .uri("/detect")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::from(body)).expect("failed to build request")
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.expect("request failed")
}

pub async fn body_string(resp: Response<Body>) -> String {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(body.to_vec()).expect("response body was not utf-8")
}

/// `name=value` pair from the first `Set-Cookie` header, ready for a `Cookie` header.
pub fn session_cookie(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn location(resp: &Response<Body>) -> Option<&str> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(20, 10, Rgb([120, 200, 40]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .expect("failed to encode png");
    buf.into_inner()
}

/// Register and log in, returning the session cookie.
pub async fn logged_in(app: &Router, username: &str, password: &str) -> String {
    let body = format!("username={username}&password={password}");
    send(app, form_request("/register", &body)).await;
    let resp = send(app, form_request("/login", &body)).await;
    session_cookie(&resp).expect("login did not set a session cookie")
}
