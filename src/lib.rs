pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod inference;
pub mod middleware;
pub mod router;
pub mod service;
pub mod views;

pub use error::PestError;
pub use inference::{ModelCache, PestModel, Prediction};
pub use service::AccountService;
