use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde_json::{Value, json};

use crate::error::PestError;
use crate::middleware::session::session_username;
use crate::router::PestState;
use crate::views::{APP_TITLE, HomePage, render};

/// GET / -> welcome page, or straight to the detector when already logged in.
pub async fn home(jar: PrivateCookieJar) -> Result<Response, PestError> {
    if session_username(&jar).is_some() {
        return Ok(Redirect::to("/detect").into_response());
    }
    render(&HomePage { title: APP_TITLE })
}

/// GET /health
pub async fn health(State(state): State<PestState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model_loaded": state.models.is_loaded(),
    }))
}
