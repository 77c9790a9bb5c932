pub mod auth;
pub mod detect;
pub mod pages;
