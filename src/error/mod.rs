mod app;
mod config;
mod content;
mod http;
mod validation;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use content::ContentError;
pub use http::HttpError;
pub use validation::ValidationError;
