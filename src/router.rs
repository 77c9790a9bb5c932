use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;

use crate::handlers::{auth, detect, pages};
use crate::inference::ModelCache;
use crate::service::AccountService;

#[derive(Clone)]
pub struct PestState {
    pub accounts: AccountService,
    pub models: ModelCache,
    pub key: Key,
    pub insecure_cookie: bool,
    pub max_upload_bytes: usize,
}

impl PestState {
    pub fn new(
        accounts: AccountService,
        models: ModelCache,
        key: Key,
        insecure_cookie: bool,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            accounts,
            models,
            key,
            insecure_cookie,
            max_upload_bytes,
        }
    }
}

impl FromRef<PestState> for Key {
    fn from_ref(state: &PestState) -> Self {
        state.key.clone()
    }
}

pub fn pest_router(state: PestState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/", get(pages::home))
        .route("/health", get(pages::health))
        .route(
            "/register",
            get(auth::register_form).post(auth::register_submit),
        )
        .route("/login", get(auth::login_form).post(auth::login_submit))
        .route("/logout", post(auth::logout))
        .route(
            "/detect",
            get(detect::detect_form)
                .post(detect::detect_submit)
                .layer(upload_limit),
        )
        .with_state(state)
}
