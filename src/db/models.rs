use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of `users`. `password` holds whatever the configured
/// [`PasswordScheme`](crate::service::password::PasswordScheme) produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct DbUser {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}
