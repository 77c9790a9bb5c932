use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;

use crate::error::PestError;
use crate::middleware::session::{end_session, session_username, start_session};
use crate::router::PestState;
use crate::service::{LoginOutcome, RegisterOutcome};
use crate::views::{APP_TITLE, LoginPage, Notice, RegisterPage, render};

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// GET /register
pub async fn register_form(jar: PrivateCookieJar) -> Result<Response, PestError> {
    if session_username(&jar).is_some() {
        return Ok(Redirect::to("/detect").into_response());
    }
    render(&RegisterPage {
        title: APP_TITLE,
        notice: None,
    })
}

/// POST /register
pub async fn register_submit(
    State(state): State<PestState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, PestError> {
    let notice = match state.accounts.register(&form.username, &form.password).await? {
        RegisterOutcome::Created => Notice::success("Account Created Successfully!"),
        RegisterOutcome::UsernameTaken => Notice::error("Username already exists!"),
        RegisterOutcome::MissingFields => Notice::warning("Please fill all fields"),
    };
    render(&RegisterPage {
        title: APP_TITLE,
        notice: Some(notice),
    })
}

/// GET /login
pub async fn login_form(jar: PrivateCookieJar) -> Result<Response, PestError> {
    if session_username(&jar).is_some() {
        return Ok(Redirect::to("/detect").into_response());
    }
    render(&LoginPage {
        title: APP_TITLE,
        notice: None,
    })
}

/// POST /login -> sets the session cookie and moves on to the detector.
pub async fn login_submit(
    State(state): State<PestState>,
    jar: PrivateCookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, PestError> {
    let notice = match state.accounts.login(&form.username, &form.password).await? {
        LoginOutcome::Authenticated(username) => {
            let jar = start_session(jar, &username, state.insecure_cookie);
            return Ok((jar, Redirect::to("/detect")).into_response());
        }
        LoginOutcome::InvalidCredentials => Notice::error("Invalid Credentials"),
    };
    render(&LoginPage {
        title: APP_TITLE,
        notice: Some(notice),
    })
}

/// POST /logout
pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    (end_session(jar), Redirect::to("/"))
}
