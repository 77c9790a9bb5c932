pub mod accounts;
pub mod password;

pub use accounts::{AccountService, LoginOutcome, RegisterOutcome};
pub use password::PasswordScheme;
