use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use tracing::{debug, warn};

use crate::error::PestError;

/// Encrypted cookie carrying the authenticated username.
pub const SESSION_COOKIE: &str = "pest_session";

/// The logged-in user. Requests without a valid session are sent back to `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser(pub String);

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        match session_username(&jar) {
            Some(username) => Ok(Self(username)),
            None => {
                debug!(path = %parts.uri.path(), "no session; redirecting home");
                Err(Redirect::to("/").into_response())
            }
        }
    }
}

/// Minimum length of `basic.cookie_secret`, as required by key derivation.
pub const MIN_SECRET_LEN: usize = 32;

/// Derive the cookie key from the configured secret, or make a random one.
/// A random key means sessions do not survive a restart.
pub fn session_key(secret: Option<&str>) -> Result<Key, PestError> {
    match secret {
        Some(s) if s.len() >= MIN_SECRET_LEN => Ok(Key::derive_from(s.as_bytes())),
        Some(s) => Err(PestError::InvalidConfig(format!(
            "cookie_secret must be at least {MIN_SECRET_LEN} bytes, got {}",
            s.len()
        ))),
        None => {
            warn!("no cookie_secret configured; sessions will not survive a restart");
            Ok(Key::generate())
        }
    }
}

pub fn session_username(jar: &PrivateCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|u| !u.is_empty())
}

pub fn start_session(jar: PrivateCookieJar, username: &str, insecure: bool) -> PrivateCookieJar {
    jar.add(build_cookie(username.to_string(), insecure))
}

pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(Cookie::build(Cookie::new(SESSION_COOKIE, "")).path("/").build())
}

fn build_cookie(value: String, insecure: bool) -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(!insecure)
        .same_site(SameSite::Lax)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_round_trips_through_private_jar() {
        let key = Key::generate();
        let jar = start_session(PrivateCookieJar::new(key), "alice", false);
        assert_eq!(session_username(&jar).as_deref(), Some("alice"));

        let jar = end_session(jar);
        assert_eq!(session_username(&jar), None);
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(matches!(
            session_key(Some("too-short")),
            Err(PestError::InvalidConfig(_))
        ));
        assert!(session_key(Some(&"x".repeat(MIN_SECRET_LEN))).is_ok());
        assert!(session_key(None).is_ok());
    }

    #[test]
    fn derived_key_is_stable_across_restarts() {
        let secret = "s".repeat(48);
        let first = session_key(Some(&secret)).unwrap();
        let second = session_key(Some(&secret)).unwrap();
        assert_eq!(first.master(), second.master());
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = build_cookie("bob".into(), false);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));

        let cookie = build_cookie("bob".into(), true);
        assert_eq!(cookie.secure(), Some(false));
    }
}
